use crate::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Drawn by the user
    Manual,
    /// Materialized from a `link` property; lives and dies with it
    Auto,
    /// Mirrors a content's `parent_id`
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowMode {
    None,
    Forward,
    Backward,
    Both,
}

/// Directed edge between two contents
///
/// Direction is kept for display, but at most one link may exist between
/// any unordered pair of contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub from_content_id: String,
    pub to_content_id: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_mode: Option<ArrowMode>,
    pub created_at: Timestamp,
}

impl Link {
    pub fn touches(&self, content_id: &str) -> bool {
        self.from_content_id == content_id || self.to_content_id == content_id
    }

    /// True if this link joins `a` and `b` in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from_content_id == a && self.to_content_id == b)
            || (self.from_content_id == b && self.to_content_id == a)
    }

    /// The endpoint opposite `content_id`, if this link touches it
    pub fn other_end(&self, content_id: &str) -> Option<&str> {
        if self.from_content_id == content_id {
            Some(&self.to_content_id)
        } else if self.to_content_id == content_id {
            Some(&self.from_content_id)
        } else {
            None
        }
    }
}
