use notegraph_model::{Content, ContentStatus, HierarchyLevelConfig, Position};
use serde::{Deserialize, Serialize};

/// Node color when neither the caller nor a hierarchy level sets one
pub const DEFAULT_NODE_COLOR: &str = "#6366f1";

/// Box that unplaced nodes are scattered into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Distance kept from every edge of the box
    pub margin: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            margin: 50.0,
        }
    }
}

impl Viewport {
    /// Deterministic point inside the box derived from `seed`
    pub fn place(&self, seed: &str) -> Position {
        let hash = crc32fast::hash(seed.as_bytes());
        let x_unit = (hash & 0xffff) as f64 / 65535.0;
        let y_unit = (hash >> 16) as f64 / 65535.0;

        let usable_width = (self.width - 2.0 * self.margin).max(0.0);
        let usable_height = (self.height - 2.0 * self.margin).max(0.0);

        Position::new(
            self.margin + x_unit * usable_width,
            self.margin + y_unit * usable_height,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub area_id: String,
    pub label: String,
    pub color: String,
    pub position: Position,
    /// UI hint only; every status is a node
    pub status: ContentStatus,
    /// Depth in the parent hierarchy (roots are 0)
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

/// Builds nodes with a fixed color policy and viewport
#[derive(Debug, Clone)]
pub struct NodeFactory<'a> {
    color: Option<&'a str>,
    viewport: Viewport,
    levels: &'a [HierarchyLevelConfig],
}

impl<'a> NodeFactory<'a> {
    pub fn new(color: Option<&'a str>, viewport: Viewport, levels: &'a [HierarchyLevelConfig]) -> Self {
        Self {
            color,
            viewport,
            levels,
        }
    }

    pub fn create(&self, content: &Content, level: u32) -> GraphNode {
        let level_config = self.levels.iter().find(|l| l.level == level);

        let color = self
            .color
            .or_else(|| level_config.and_then(|l| l.color.as_deref()))
            .unwrap_or(DEFAULT_NODE_COLOR)
            .to_string();

        GraphNode {
            id: content.id.clone(),
            area_id: content.area_id.clone(),
            label: label_for(content),
            color,
            position: content
                .node_position
                .unwrap_or_else(|| self.viewport.place(&content.id)),
            status: content.status,
            level,
            size: level_config.and_then(|l| l.node_size),
        }
    }
}

/// Title, prefixed with the emoji when one is set
pub fn label_for(content: &Content) -> String {
    match content.emoji.as_deref().filter(|e| !e.is_empty()) {
        Some(emoji) => format!("{} {}", emoji, content.title),
        None => content.title.clone(),
    }
}
