use super::{required, DeletePlan};
use crate::{DeleteRejection, ValidationError};
use notegraph_model::{
    new_id, Content, ContentBody, ContentStatus, Document, Position, Property, Shape, Timestamp,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Optional fields for a new content
#[derive(Debug, Clone, Default)]
pub struct ContentDraft {
    pub status: Option<ContentStatus>,
    pub emoji: Option<String>,
    pub parent_id: Option<String>,
    pub node_position: Option<Position>,
    pub shapes: Vec<Shape>,
    pub properties: Vec<Property>,
}

/// Subset of fields to change. `id`, `area_id` and `created_at` are not
/// patchable; moving between areas goes through [`move_content`].
#[derive(Debug, Clone, Default)]
pub struct ContentPatch {
    pub title: Option<String>,
    pub status: Option<ContentStatus>,
    pub body: Option<ContentBody>,
    pub properties: Option<Vec<Property>>,
    pub parent_id: Option<Option<String>>,
    pub node_position: Option<Option<Position>>,
    pub emoji: Option<Option<String>>,
}

pub fn create_content(
    area_id: &str,
    title: &str,
    draft: ContentDraft,
    doc: &Document,
    now: Timestamp,
) -> Result<Content, ValidationError> {
    if doc.area(area_id).is_none() {
        return Err(ValidationError::AreaNotFound(area_id.to_string()));
    }
    let title = required(title).ok_or(ValidationError::ContentTitleRequired)?;

    let id = new_id();
    check_embedded_ids(&id, &draft.shapes, &draft.properties)?;
    if let Some(parent_id) = &draft.parent_id {
        check_parent(&id, parent_id, doc)?;
    }

    Ok(Content {
        id,
        area_id: area_id.to_string(),
        title,
        status: draft.status.unwrap_or_default(),
        body: ContentBody {
            shapes: draft.shapes,
        },
        properties: draft.properties,
        parent_id: draft.parent_id,
        node_position: draft.node_position,
        emoji: draft.emoji,
        created_at: now,
        updated_at: now,
    })
}

pub fn update_content(
    content_id: &str,
    patch: ContentPatch,
    doc: &Document,
    now: Timestamp,
) -> Result<Content, ValidationError> {
    let current = find(content_id, doc)?;
    let mut next = Content::clone(current);

    if let Some(title) = patch.title {
        next.title = title;
    }
    if let Some(status) = patch.status {
        next.status = status;
    }
    if let Some(body) = patch.body {
        next.body = body;
    }
    if let Some(properties) = patch.properties {
        next.properties = properties;
    }
    if let Some(parent_id) = patch.parent_id {
        if let Some(parent_id) = &parent_id {
            check_parent(content_id, parent_id, doc)?;
        }
        next.parent_id = parent_id;
    }
    if let Some(node_position) = patch.node_position {
        next.node_position = node_position;
    }
    if let Some(emoji) = patch.emoji {
        next.emoji = emoji;
    }
    check_embedded_ids(content_id, &next.body.shapes, &next.properties)?;

    next.id = current.id.clone();
    next.area_id = current.area_id.clone();
    next.created_at = current.created_at;
    next.updated_at = now;

    Ok(next)
}

pub fn close_content(content_id: &str, doc: &Document, now: Timestamp) -> Result<Content, ValidationError> {
    let current = find(content_id, doc)?;
    if current.is_closed() {
        return Err(ValidationError::ContentAlreadyClosed(content_id.to_string()));
    }

    let mut next = Content::clone(current);
    next.status = ContentStatus::Closed;
    next.updated_at = now;
    Ok(next)
}

/// Reopen for editing. The graph position is dropped so the node is laid
/// out again when it closes.
pub fn open_content(content_id: &str, doc: &Document, now: Timestamp) -> Result<Content, ValidationError> {
    let mut next = Content::clone(find(content_id, doc)?);
    next.status = ContentStatus::Open;
    next.node_position = None;
    next.updated_at = now;
    Ok(next)
}

pub fn set_node_position(
    content_id: &str,
    position: Position,
    doc: &Document,
    now: Timestamp,
) -> Result<Content, ValidationError> {
    let mut next = Content::clone(find(content_id, doc)?);
    next.node_position = Some(position);
    next.updated_at = now;
    Ok(next)
}

/// Content re-homed in `area_id`. Area indexes are the store's concern.
pub fn move_content(
    content_id: &str,
    area_id: &str,
    doc: &Document,
    now: Timestamp,
) -> Result<Content, ValidationError> {
    let current = find(content_id, doc)?;
    if doc.area(area_id).is_none() {
        return Err(ValidationError::AreaNotFound(area_id.to_string()));
    }

    let mut next = Content::clone(current);
    next.area_id = area_id.to_string();
    next.updated_at = now;
    Ok(next)
}

/// No cycle check: the hierarchy only requires the parent to exist.
pub fn set_parent(
    content_id: &str,
    parent_id: Option<&str>,
    doc: &Document,
    now: Timestamp,
) -> Result<Content, ValidationError> {
    let current = find(content_id, doc)?;
    if let Some(parent_id) = parent_id {
        check_parent(content_id, parent_id, doc)?;
    }

    let mut next = Content::clone(current);
    next.parent_id = parent_id.map(str::to_string);
    next.updated_at = now;
    Ok(next)
}

pub fn plan_content_deletion(content_id: &str, doc: &Document) -> Result<DeletePlan, DeleteRejection> {
    if doc.content(content_id).is_none() {
        return Err(DeleteRejection::new(format!("Content not found: {}", content_id)));
    }

    let mut plan = DeletePlan {
        content_ids: vec![content_id.to_string()],
        ..DeletePlan::default()
    };
    collect_content_dependents(&mut plan, doc);
    Ok(plan)
}

/// Fill in the links and orphaned children that depend on `plan.content_ids`
pub(crate) fn collect_content_dependents(plan: &mut DeletePlan, doc: &Document) {
    let removed: HashSet<&str> = plan.content_ids.iter().map(String::as_str).collect();

    plan.link_ids.extend(
        doc.links
            .iter()
            .filter(|l| removed.contains(l.from_content_id.as_str()) || removed.contains(l.to_content_id.as_str()))
            .map(|l| l.id.clone()),
    );

    plan.orphaned_ids.extend(
        doc.contents
            .iter()
            .filter(|c| !removed.contains(c.id.as_str()))
            .filter(|c| c.parent_id.as_deref().is_some_and(|p| removed.contains(p)))
            .map(|c| c.id.clone()),
    );
}

pub fn children_of<'a>(parent_id: &str, doc: &'a Document) -> Vec<&'a Arc<Content>> {
    doc.contents
        .iter()
        .filter(|c| c.parent_id.as_deref() == Some(parent_id))
        .collect()
}

/// Case-insensitive title search, optionally within one area
pub fn search_contents<'a>(query: &str, area_id: Option<&str>, doc: &'a Document) -> Vec<&'a Arc<Content>> {
    let needle = query.trim().to_lowercase();
    doc.contents
        .iter()
        .filter(|c| area_id.map_or(true, |a| c.area_id == a))
        .filter(|c| c.title.to_lowercase().contains(&needle))
        .collect()
}

pub(crate) fn find<'a>(content_id: &str, doc: &'a Document) -> Result<&'a Arc<Content>, ValidationError> {
    doc.content(content_id)
        .ok_or_else(|| ValidationError::ContentNotFound(content_id.to_string()))
}

fn check_parent(content_id: &str, parent_id: &str, doc: &Document) -> Result<(), ValidationError> {
    if parent_id == content_id {
        return Err(ValidationError::SelfParent(content_id.to_string()));
    }
    if doc.content(parent_id).is_none() {
        return Err(ValidationError::ContentNotFound(parent_id.to_string()));
    }
    Ok(())
}

fn check_embedded_ids(content_id: &str, shapes: &[Shape], properties: &[Property]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for shape in shapes {
        if !seen.insert(shape.id.as_str()) {
            return Err(ValidationError::DuplicateShape {
                content_id: content_id.to_string(),
                shape_id: shape.id.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for property in properties {
        if !seen.insert(property.id.as_str()) {
            return Err(ValidationError::DuplicateProperty {
                content_id: content_id.to_string(),
                property_id: property.id.clone(),
            });
        }
    }
    Ok(())
}
