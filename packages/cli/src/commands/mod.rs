pub mod area;
pub mod content;
pub mod graph;
pub mod init;
pub mod link;
pub mod sync;
pub mod transfer;

pub use area::{area, AreaCommand};
pub use content::{content, ContentCommand};
pub use graph::{graph, stats, GraphArgs, StatsArgs};
pub use init::{init, InitArgs};
pub use link::{link, LinkCommand};
pub use sync::{sync, SyncArgs};
pub use transfer::{export, import, ExportArgs, ImportArgs};

use anyhow::{anyhow, Result};
use chrono::DateTime;
use notegraph_editor::managers::area::find_area_by_name;
use notegraph_editor::DeleteOutcome;
use notegraph_model::{Area, Content, Document, Timestamp};
use std::sync::Arc;

/// Find an area by id, falling back to its name
pub(crate) fn resolve_area(key: &str, doc: &Document) -> Result<Arc<Area>> {
    doc.area(key)
        .or_else(|| find_area_by_name(key, doc))
        .cloned()
        .ok_or_else(|| anyhow!("No area with id or name \"{}\"", key))
}

/// Find a content by id, falling back to a unique exact title
pub(crate) fn resolve_content(key: &str, doc: &Document) -> Result<Arc<Content>> {
    if let Some(content) = doc.content(key) {
        return Ok(Arc::clone(content));
    }

    let mut matches = doc.contents.iter().filter(|c| c.title == key);
    match (matches.next(), matches.next()) {
        (Some(content), None) => Ok(Arc::clone(content)),
        (Some(_), Some(_)) => Err(anyhow!("Title \"{}\" is ambiguous, use the content id", key)),
        _ => Err(anyhow!("No content with id or title \"{}\"", key)),
    }
}

pub(crate) fn ensure_deleted(outcome: DeleteOutcome) -> Result<()> {
    match outcome {
        DeleteOutcome::Deleted(_) => Ok(()),
        DeleteOutcome::Missing { reason } => Err(anyhow!(reason)),
    }
}

pub(crate) fn format_timestamp(millis: Timestamp) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}
