use notegraph_model::{ArrowMode, LineStyle, Link, LinkType};
use serde::{Deserialize, Serialize};

/// Display-style overrides are copied straight from the link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_mode: Option<ArrowMode>,
}

impl From<&Link> for GraphEdge {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id.clone(),
            source: link.from_content_id.clone(),
            target: link.to_content_id.clone(),
            link_type: link.link_type,
            color: link.color.clone(),
            line_style: link.line_style,
            arrow_mode: link.arrow_mode,
        }
    }
}

impl GraphEdge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
