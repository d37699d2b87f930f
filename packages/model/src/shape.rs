use crate::{Dimension, Position, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Text,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub roughness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: "transparent".to_string(),
            stroke: "#1e1e1e".to_string(),
            stroke_width: 2.0,
            opacity: 1.0,
            roughness: 1.0,
            font_family: None,
            font_size: None,
        }
    }
}

/// Embedded image data for `image` shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub data_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Drawable primitive, always owned by exactly one content's body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: String,
    #[serde(rename = "type")]
    pub shape_type: ShapeType,
    pub position: Position,
    pub dimension: Dimension,
    #[serde(default)]
    pub style: ShapeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Polyline for `line` and `arrow` shapes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Position>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
    pub created_at: Timestamp,
}
