//! # Document Store
//!
//! Single authority over the current document.
//!
//! ## Lifecycle of a write
//!
//! ```text
//! validate (managers) → cascade (working copy) → commit
//!                                                 ├─ record undo snapshot
//!                                                 ├─ stamp updated_at
//!                                                 └─ run commit hooks (persistence)
//! ```
//!
//! Validation failures never commit. They become the store's single
//! current error and are returned to the caller. Deleting something that
//! is not there returns [`DeleteOutcome::Missing`] and leaves the error alone.

use crate::cascade;
use crate::managers::area::{self, AreaPatch};
use crate::managers::content::{self, ContentDraft, ContentPatch};
use crate::managers::frame::{self, FramePatch};
use crate::managers::link::{self, LinkDraft, LinkStylePatch};
use crate::managers::property::{self, PropertyPatch};
use crate::managers::shape::{self, ShapePatch};
use crate::managers::DeletePlan;
use crate::undo_stack::UndoStack;
use crate::{DeleteRejection, ValidationError};
use notegraph_model::{
    Area, Clock, Content, Dimension, Document, GraphFrame, HierarchyLevelConfig, Link, Position, Property, Shape,
    SystemClock, Timestamp,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Called with every newly installed document
pub type CommitHook = Box<dyn Fn(&Arc<Document>) + Send + Sync>;

/// Result of a cascade delete
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(DeletePlan),
    /// Nothing to delete; not an error
    Missing { reason: String },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            DeleteOutcome::Missing { reason } => Some(reason),
            DeleteOutcome::Deleted(_) => None,
        }
    }
}

impl From<Result<DeletePlan, DeleteRejection>> for DeleteOutcome {
    fn from(result: Result<DeletePlan, DeleteRejection>) -> Self {
        match result {
            Ok(plan) => DeleteOutcome::Deleted(plan),
            Err(rejection) => DeleteOutcome::Missing {
                reason: rejection.reason,
            },
        }
    }
}

pub struct DocumentStore {
    document: Arc<Document>,
    undo: UndoStack,

    /// Set while an undo snapshot is being installed so that installing it
    /// does not record another snapshot
    replaying: bool,

    error: Option<String>,
    clock: Arc<dyn Clock>,
    hooks: Vec<CommitHook>,
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("updated_at", &self.document.updated_at)
            .field("undo_levels", &self.undo.undo_levels())
            .field("error", &self.error)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl DocumentStore {
    pub fn new(document: Document) -> Self {
        Self::with_clock(document, Arc::new(SystemClock))
    }

    pub fn with_clock(document: Document, clock: Arc<dyn Clock>) -> Self {
        Self {
            document: Arc::new(document),
            undo: UndoStack::new(),
            replaying: false,
            error: None,
            clock,
            hooks: Vec::new(),
        }
    }

    /// Replace the default undo depth
    pub fn with_undo_limit(mut self, max_levels: usize) -> Self {
        self.undo = UndoStack::with_max_levels(max_levels);
        self
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    /// Register a hook run after every install (writes, undo, replace)
    pub fn on_commit(&mut self, hook: CommitHook) {
        self.hooks.push(hook);
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // ---------------------------------------------------------------------
    // Areas
    // ---------------------------------------------------------------------

    pub fn create_area(&mut self, name: &str) -> Result<Arc<Area>, ValidationError> {
        self.write("create_area", |doc, now| {
            let area = Arc::new(area::create_area(name, doc, now)?);
            let mut next = doc.clone();
            next.areas.push(Arc::clone(&area));
            Ok((next, area))
        })
    }

    pub fn update_area(&mut self, area_id: &str, patch: AreaPatch) -> Result<Arc<Area>, ValidationError> {
        self.write("update_area", |doc, now| {
            let area = Arc::new(area::update_area(area_id, patch, doc, now)?);
            let mut next = doc.clone();
            if let Some(slot) = next.areas.iter_mut().find(|a| a.id == area.id) {
                *slot = Arc::clone(&area);
            }
            Ok((next, area))
        })
    }

    pub fn delete_area(&mut self, area_id: &str) -> DeleteOutcome {
        let planned = area::plan_area_deletion(area_id, &self.document);
        self.delete("delete_area", planned)
    }

    pub fn set_current_area(&mut self, area_id: Option<&str>) -> Result<(), ValidationError> {
        self.navigate(|doc| {
            if let Some(id) = area_id {
                if doc.area(id).is_none() {
                    return Err(ValidationError::AreaNotFound(id.to_string()));
                }
            }
            let mut next = doc.clone();
            next.current_area_id = area_id.map(str::to_string);
            Ok(next)
        })
    }

    // ---------------------------------------------------------------------
    // Contents
    // ---------------------------------------------------------------------

    pub fn create_content(
        &mut self,
        area_id: &str,
        title: &str,
        draft: ContentDraft,
    ) -> Result<Arc<Content>, ValidationError> {
        self.write("create_content", |doc, now| {
            let content = content::create_content(area_id, title, draft, doc, now)?;
            let mut next = doc.clone();
            let content = cascade::insert_content(&mut next, content);
            cascade::sync_auto_links(&mut next, &content.id, now);
            cascade::sync_parent_link(&mut next, &content.id, now);
            Ok((next, content))
        })
    }

    pub fn update_content(&mut self, content_id: &str, patch: ContentPatch) -> Result<Arc<Content>, ValidationError> {
        self.write("update_content", |doc, now| {
            let content = content::update_content(content_id, patch, doc, now)?;
            let mut next = doc.clone();
            let content = cascade::replace_content(&mut next, content);
            cascade::sync_auto_links(&mut next, content_id, now);
            cascade::sync_parent_link(&mut next, content_id, now);
            Ok((next, content))
        })
    }

    pub fn delete_content(&mut self, content_id: &str) -> DeleteOutcome {
        let planned = content::plan_content_deletion(content_id, &self.document);
        self.delete("delete_content", planned)
    }

    pub fn close_content(&mut self, content_id: &str) -> Result<Arc<Content>, ValidationError> {
        self.replace_with("close_content", |doc, now| content::close_content(content_id, doc, now))
    }

    pub fn open_content(&mut self, content_id: &str) -> Result<Arc<Content>, ValidationError> {
        self.replace_with("open_content", |doc, now| content::open_content(content_id, doc, now))
    }

    pub fn set_node_position(&mut self, content_id: &str, position: Position) -> Result<Arc<Content>, ValidationError> {
        self.replace_with("set_node_position", |doc, now| {
            content::set_node_position(content_id, position, doc, now)
        })
    }

    /// Move a content to another area. Same area is a no-op without a commit.
    pub fn change_content_area(&mut self, content_id: &str, area_id: &str) -> Result<Arc<Content>, ValidationError> {
        if let Some(current) = self.document.content(content_id) {
            if current.area_id == area_id {
                return Ok(Arc::clone(current));
            }
        }

        self.write("change_content_area", |doc, now| {
            let from_area_id = content::find(content_id, doc)?.area_id.clone();
            let moved = content::move_content(content_id, area_id, doc, now)?;
            let mut next = doc.clone();
            let moved = cascade::replace_content(&mut next, moved);
            cascade::move_between_areas(&mut next, content_id, &from_area_id, area_id);
            Ok((next, moved))
        })
    }

    pub fn set_content_parent(
        &mut self,
        content_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Arc<Content>, ValidationError> {
        self.write("set_content_parent", |doc, now| {
            let child = content::set_parent(content_id, parent_id, doc, now)?;
            let mut next = doc.clone();
            let child = cascade::replace_content(&mut next, child);
            cascade::sync_parent_link(&mut next, content_id, now);
            Ok((next, child))
        })
    }

    pub fn set_current_content(&mut self, content_id: Option<&str>) -> Result<(), ValidationError> {
        self.navigate(|doc| {
            if let Some(id) = content_id {
                content::find(id, doc)?;
            }
            let mut next = doc.clone();
            next.current_content_id = content_id.map(str::to_string);
            Ok(next)
        })
    }

    // ---------------------------------------------------------------------
    // Shapes
    // ---------------------------------------------------------------------

    pub fn add_shape_to_content(&mut self, content_id: &str, shape: Shape) -> Result<Arc<Content>, ValidationError> {
        self.replace_with("add_shape", |doc, now| {
            shape::add_shape(content::find(content_id, doc)?, shape, now)
        })
    }

    pub fn update_shape_in_content(
        &mut self,
        content_id: &str,
        shape_id: &str,
        patch: ShapePatch,
    ) -> Result<Arc<Content>, ValidationError> {
        self.replace_with("update_shape", |doc, now| {
            shape::update_shape(content::find(content_id, doc)?, shape_id, patch, now)
        })
    }

    pub fn remove_shape_from_content(&mut self, content_id: &str, shape_id: &str) -> Result<Arc<Content>, ValidationError> {
        self.replace_with("remove_shape", |doc, now| {
            shape::remove_shape(content::find(content_id, doc)?, shape_id, now)
        })
    }

    // ---------------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------------

    /// Add a property; a `link` property also materializes its `auto` link
    pub fn add_property_to_content(
        &mut self,
        content_id: &str,
        property: Property,
    ) -> Result<Arc<Content>, ValidationError> {
        self.write("add_property", |doc, now| {
            let owner = property::add_property(content::find(content_id, doc)?, property, now)?;
            let mut next = doc.clone();
            let owner = cascade::replace_content(&mut next, owner);
            cascade::sync_auto_links(&mut next, content_id, now);
            Ok((next, owner))
        })
    }

    pub fn update_property_in_content(
        &mut self,
        content_id: &str,
        property_id: &str,
        patch: PropertyPatch,
    ) -> Result<Arc<Content>, ValidationError> {
        self.write("update_property", |doc, now| {
            let owner = property::update_property(content::find(content_id, doc)?, property_id, patch, now)?;
            let mut next = doc.clone();
            let owner = cascade::replace_content(&mut next, owner);
            cascade::sync_auto_links(&mut next, content_id, now);
            Ok((next, owner))
        })
    }

    /// Remove a property together with every link tied to it
    pub fn remove_property_from_content(
        &mut self,
        content_id: &str,
        property_id: &str,
    ) -> Result<Arc<Content>, ValidationError> {
        self.write("remove_property", |doc, now| {
            let owner = property::remove_property(content::find(content_id, doc)?, property_id, now)?;
            let mut next = doc.clone();
            let owner = cascade::replace_content(&mut next, owner);
            let removed = cascade::remove_property_links(&mut next, property_id);
            debug!(property_id, removed, "Removed property links");
            Ok((next, owner))
        })
    }

    // ---------------------------------------------------------------------
    // Links
    // ---------------------------------------------------------------------

    pub fn create_link(&mut self, draft: LinkDraft) -> Result<Arc<Link>, ValidationError> {
        self.write("create_link", |doc, now| {
            let link = Arc::new(link::create_link(draft, doc, now)?);
            let mut next = doc.clone();
            next.links.push(Arc::clone(&link));
            Ok((next, link))
        })
    }

    pub fn update_link(&mut self, link_id: &str, patch: LinkStylePatch) -> Result<Arc<Link>, ValidationError> {
        self.write("update_link", |doc, _now| {
            let link = Arc::new(link::update_link_style(link_id, patch, doc)?);
            let mut next = doc.clone();
            if let Some(slot) = next.links.iter_mut().find(|l| l.id == link.id) {
                *slot = Arc::clone(&link);
            }
            Ok((next, link))
        })
    }

    pub fn delete_link(&mut self, link_id: &str) -> DeleteOutcome {
        let planned = link::plan_link_deletion(link_id, &self.document);
        self.delete("delete_link", planned)
    }

    // ---------------------------------------------------------------------
    // Graph frames and hierarchy display
    // ---------------------------------------------------------------------

    pub fn add_graph_frame(
        &mut self,
        name: &str,
        area_id: Option<&str>,
        position: Position,
        dimension: Dimension,
    ) -> Result<GraphFrame, ValidationError> {
        self.write("add_graph_frame", |doc, now| {
            let frame = frame::create_frame(name, area_id, position, dimension, doc, now)?;
            let mut next = doc.clone();
            next.graph_frames.push(frame.clone());
            Ok((next, frame))
        })
    }

    pub fn update_graph_frame(&mut self, frame_id: &str, patch: FramePatch) -> Result<GraphFrame, ValidationError> {
        self.write("update_graph_frame", |doc, now| {
            let frame = frame::update_frame(frame_id, patch, doc, now)?;
            let mut next = doc.clone();
            if let Some(slot) = next.graph_frames.iter_mut().find(|f| f.id == frame.id) {
                *slot = frame.clone();
            }
            Ok((next, frame))
        })
    }

    pub fn remove_graph_frame(&mut self, frame_id: &str) -> DeleteOutcome {
        let planned = frame::plan_frame_deletion(frame_id, &self.document);
        self.delete("remove_graph_frame", planned)
    }

    pub fn set_hierarchy_level_configs(&mut self, configs: Vec<HierarchyLevelConfig>) {
        let mut next = Document::clone(&self.document);
        next.hierarchy_level_configs = Some(configs);
        self.commit(next);
    }

    // ---------------------------------------------------------------------
    // Whole-document replacement and history
    // ---------------------------------------------------------------------

    /// Install a document wholesale (sync pull, import). Not undoable and
    /// not restamped: the incoming `updated_at` is kept.
    pub fn replace_document(&mut self, document: Document) {
        info!(updated_at = document.updated_at, "Replacing document");
        self.install(Arc::new(document), false);
    }

    /// Restore the latest snapshot exactly. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo.pop() else {
            return false;
        };

        self.replaying = true;
        self.install(snapshot, true);
        self.replaying = false;

        debug!(remaining = self.undo.undo_levels(), "Undo applied");
        true
    }

    /// Coalesce the following writes into one undo step (reentrant)
    pub fn pause_undo(&mut self) {
        self.undo.pause(Arc::clone(&self.document));
    }

    pub fn resume_undo(&mut self) {
        self.undo.resume();
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_levels()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn now(&self) -> Timestamp {
        self.clock.now_millis()
    }

    /// Validate and build the next document, then commit it or record the error
    fn write<T>(
        &mut self,
        op: &'static str,
        build: impl FnOnce(&Document, Timestamp) -> Result<(Document, T), ValidationError>,
    ) -> Result<T, ValidationError> {
        let now = self.now();
        match build(&self.document, now) {
            Ok((next, value)) => {
                debug!(op, "Committing write");
                self.commit(next);
                Ok(value)
            }
            Err(e) => Err(self.reject(op, e)),
        }
    }

    /// Write whose only effect is replacing one content
    fn replace_with(
        &mut self,
        op: &'static str,
        build: impl FnOnce(&Document, Timestamp) -> Result<Content, ValidationError>,
    ) -> Result<Arc<Content>, ValidationError> {
        self.write(op, |doc, now| {
            let content = build(doc, now)?;
            let mut next = doc.clone();
            let content = cascade::replace_content(&mut next, content);
            Ok((next, content))
        })
    }

    fn delete(&mut self, op: &'static str, planned: Result<DeletePlan, DeleteRejection>) -> DeleteOutcome {
        if let Ok(plan) = &planned {
            let mut next = Document::clone(&self.document);
            cascade::apply_deletion(&mut next, plan, self.now());
            self.commit(next);
        } else {
            debug!(op, "Nothing to delete");
        }
        planned.into()
    }

    /// Navigation is persisted but neither undoable nor a content change,
    /// so `updated_at` is left alone.
    fn navigate(&mut self, build: impl FnOnce(&Document) -> Result<Document, ValidationError>) -> Result<(), ValidationError> {
        match build(&self.document) {
            Ok(next) => {
                self.install(Arc::new(next), false);
                Ok(())
            }
            Err(e) => Err(self.reject("navigate", e)),
        }
    }

    fn reject(&mut self, op: &'static str, error: ValidationError) -> ValidationError {
        warn!(op, error = %error, "Write rejected");
        self.error = Some(error.to_string());
        error
    }

    fn commit(&mut self, mut next: Document) {
        next.updated_at = next_timestamp(self.document.updated_at, self.now());
        self.install(Arc::new(next), true);
    }

    fn install(&mut self, next: Arc<Document>, record_undo: bool) {
        let previous = std::mem::replace(&mut self.document, next);
        if record_undo && !self.replaying {
            self.undo.record(previous);
        }

        for hook in &self.hooks {
            hook(&self.document);
        }
    }
}

/// Logical timestamps never repeat or go backwards, even if the wall clock does
fn next_timestamp(previous: Timestamp, now: Timestamp) -> Timestamp {
    now.max(previous.saturating_add(1))
}
