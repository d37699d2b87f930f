use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Named grouping of contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: String,
    pub name: String,

    /// Denormalized cache of the ids of contents whose `area_id` is this area.
    /// Kept in sync by the store, never by the managers.
    #[serde(default)]
    pub content_ids: Vec<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
