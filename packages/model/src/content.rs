use crate::{Position, Property, Shape, Timestamp};
use serde::{Deserialize, Serialize};

/// OPEN contents are being edited; CLOSED ones are shown as finished nodes.
/// Both appear in the graph projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentBody {
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

/// Primary document unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,
    pub area_id: String,
    pub title: String,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default)]
    pub body: ContentBody,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Content {
    pub fn shape(&self, shape_id: &str) -> Option<&Shape> {
        self.body.shapes.iter().find(|s| s.id == shape_id)
    }

    pub fn property(&self, property_id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == property_id)
    }

    pub fn is_closed(&self) -> bool {
        self.status == ContentStatus::Closed
    }
}
