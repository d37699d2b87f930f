//! # Cascades
//!
//! Secondary changes that keep the four collections consistent after a
//! primary write:
//! - Deleting an area or content removes dependent contents, links, frame
//!   memberships and navigation pointers
//! - Area `content_ids` caches follow every insert, move and delete
//! - `link` properties materialize `auto` links; removing the property
//!   removes them
//! - `parent_id` is mirrored by one `parent` link
//!
//! Each function edits a working copy owned by the store. Unchanged
//! entities keep their `Arc`, so undo snapshots keep sharing them.

use crate::managers::link::{create_link, LinkDraft};
use crate::managers::property::link_targets;
use crate::managers::DeletePlan;
use notegraph_model::{Content, Document, LinkType, Timestamp};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Remove everything named by `plan` and detach what pointed at it
pub fn apply_deletion(doc: &mut Document, plan: &DeletePlan, now: Timestamp) {
    let areas: HashSet<&str> = plan.area_ids.iter().map(String::as_str).collect();
    let contents: HashSet<&str> = plan.content_ids.iter().map(String::as_str).collect();
    let links: HashSet<&str> = plan.link_ids.iter().map(String::as_str).collect();
    let frames: HashSet<&str> = plan.frame_ids.iter().map(String::as_str).collect();
    let orphaned: HashSet<&str> = plan.orphaned_ids.iter().map(String::as_str).collect();

    doc.areas.retain(|a| !areas.contains(a.id.as_str()));
    doc.contents.retain(|c| !contents.contains(c.id.as_str()));
    doc.links.retain(|l| !links.contains(l.id.as_str()));
    doc.graph_frames.retain(|f| !frames.contains(f.id.as_str()));

    if !contents.is_empty() {
        for area in &mut doc.areas {
            if area.content_ids.iter().any(|id| contents.contains(id.as_str())) {
                Arc::make_mut(area)
                    .content_ids
                    .retain(|id| !contents.contains(id.as_str()));
            }
        }
        for frame in &mut doc.graph_frames {
            frame.content_ids.retain(|id| !contents.contains(id.as_str()));
        }
    }

    for content in &mut doc.contents {
        if orphaned.contains(content.id.as_str()) {
            let content = Arc::make_mut(content);
            content.parent_id = None;
            content.updated_at = now;
        }
    }

    if doc
        .current_area_id
        .as_deref()
        .is_some_and(|id| areas.contains(id))
    {
        doc.current_area_id = None;
    }
    if doc
        .current_content_id
        .as_deref()
        .is_some_and(|id| contents.contains(id))
    {
        doc.current_content_id = None;
    }

    debug!(
        areas = areas.len(),
        contents = contents.len(),
        links = links.len(),
        frames = frames.len(),
        orphaned = orphaned.len(),
        "Applied cascade delete"
    );
}

/// Append a new content and register it with its area
pub fn insert_content(doc: &mut Document, content: Content) -> Arc<Content> {
    let content = Arc::new(content);
    if let Some(area) = doc.areas.iter_mut().find(|a| a.id == content.area_id) {
        Arc::make_mut(area).content_ids.push(content.id.clone());
    }
    doc.contents.push(Arc::clone(&content));
    content
}

/// Swap in a new version of an existing content, keeping its position
pub fn replace_content(doc: &mut Document, content: Content) -> Arc<Content> {
    let content = Arc::new(content);
    if let Some(slot) = doc.contents.iter_mut().find(|c| c.id == content.id) {
        *slot = Arc::clone(&content);
    }
    content
}

/// Move a content id between two area caches
pub fn move_between_areas(doc: &mut Document, content_id: &str, from_area_id: &str, to_area_id: &str) {
    for area in &mut doc.areas {
        if area.id == from_area_id {
            Arc::make_mut(area).content_ids.retain(|id| id != content_id);
        } else if area.id == to_area_id && !area.content_ids.iter().any(|id| id == content_id) {
            Arc::make_mut(area).content_ids.push(content_id.to_string());
        }
    }
}

/// Reconcile the `auto` links owned by one content with its `link` properties.
///
/// Stale links (property gone or retargeted) are dropped; missing ones are
/// synthesized. A synthesis that fails validation (target missing, target is
/// the owner, pair already linked) is skipped, not reported.
pub fn sync_auto_links(doc: &mut Document, content_id: &str, now: Timestamp) {
    let Some(content) = doc.content(content_id).cloned() else {
        return;
    };
    let wanted: Vec<(&str, &str)> = link_targets(&content)
        .map(|(property, target)| (property.id.as_str(), target))
        .collect();

    doc.links.retain(|l| {
        let owned = l.link_type == LinkType::Auto && l.from_content_id == content_id;
        match (&l.property_id, owned) {
            (Some(property_id), true) => wanted
                .iter()
                .any(|(p, target)| *p == property_id.as_str() && *target == l.to_content_id),
            _ => true,
        }
    });

    for (property_id, target) in wanted {
        if doc.links.iter().any(|l| l.property_id.as_deref() == Some(property_id)) {
            continue;
        }

        match create_link(LinkDraft::auto(content_id, target, property_id), doc, now) {
            Ok(link) => {
                debug!(link_id = %link.id, property_id, target, "Materialized auto link");
                doc.links.push(Arc::new(link));
            }
            Err(e) => {
                debug!(property_id, target, error = %e, "Skipped auto link");
            }
        }
    }
}

/// Drop every link tied to `property_id`
pub fn remove_property_links(doc: &mut Document, property_id: &str) -> usize {
    let before = doc.links.len();
    doc.links
        .retain(|l| l.property_id.as_deref() != Some(property_id));
    before - doc.links.len()
}

/// Keep exactly one `parent` link (parent → child) matching `parent_id`
pub fn sync_parent_link(doc: &mut Document, content_id: &str, now: Timestamp) {
    let Some(parent_id) = doc.content(content_id).map(|c| c.parent_id.clone()) else {
        return;
    };

    doc.links.retain(|l| {
        !(l.link_type == LinkType::Parent
            && l.to_content_id == content_id
            && Some(l.from_content_id.as_str()) != parent_id.as_deref())
    });

    if let Some(parent_id) = parent_id {
        if doc.link_between(&parent_id, content_id).is_some() {
            return;
        }
        match create_link(LinkDraft::parent(parent_id.as_str(), content_id), doc, now) {
            Ok(link) => doc.links.push(Arc::new(link)),
            Err(e) => debug!(content_id, parent_id = %parent_id, error = %e, "Skipped parent link"),
        }
    }
}
