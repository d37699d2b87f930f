//! # Entity Managers
//!
//! Pure operations per entity: create, update, delete planning and queries.
//!
//! Every function takes the whole current document by shared reference and
//! returns a brand-new value or a [`ValidationError`](crate::ValidationError).
//! Nothing here mutates its document argument or keeps state between calls.
//! Sequencing results into a new document is the store's job.

pub mod area;
pub mod content;
pub mod frame;
pub mod link;
pub mod property;
pub mod shape;

use serde::Serialize;

/// Ids removed (or detached) by one cascade delete
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePlan {
    pub area_ids: Vec<String>,
    pub content_ids: Vec<String>,
    pub link_ids: Vec<String>,
    pub frame_ids: Vec<String>,
    /// Surviving contents whose `parent_id` points into `content_ids`
    pub orphaned_ids: Vec<String>,
}

/// Trim `value`, returning `None` when nothing is left
pub(crate) fn required(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
