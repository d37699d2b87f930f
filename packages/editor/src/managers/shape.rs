//! Shapes live inside a content's body; every operation here returns the
//! whole updated content.
//!
//! Duplicate ids on add and unknown ids on update/remove are hard failures.

use crate::ValidationError;
use notegraph_model::{new_id, Content, Dimension, ImagePayload, Position, Shape, ShapeStyle, ShapeType, Timestamp};

#[derive(Debug, Clone, Default)]
pub struct ShapePatch {
    pub position: Option<Position>,
    pub dimension: Option<Dimension>,
    pub style: Option<ShapeStyle>,
    pub text: Option<Option<String>>,
    pub points: Option<Option<Vec<Position>>>,
    pub image: Option<Option<ImagePayload>>,
}

/// New shape with the default style
pub fn create_shape(shape_type: ShapeType, position: Position, dimension: Dimension, now: Timestamp) -> Shape {
    let points = match shape_type {
        ShapeType::Line | ShapeType::Arrow => Some(vec![
            Position::new(0.0, 0.0),
            Position::new(dimension.width, dimension.height),
        ]),
        _ => None,
    };

    Shape {
        id: new_id(),
        shape_type,
        position,
        dimension,
        style: ShapeStyle::default(),
        text: None,
        points,
        image: None,
        created_at: now,
    }
}

pub fn add_shape(content: &Content, shape: Shape, now: Timestamp) -> Result<Content, ValidationError> {
    if content.shape(&shape.id).is_some() {
        return Err(ValidationError::DuplicateShape {
            content_id: content.id.clone(),
            shape_id: shape.id,
        });
    }

    let mut next = content.clone();
    next.body.shapes.push(shape);
    next.updated_at = now;
    Ok(next)
}

pub fn update_shape(
    content: &Content,
    shape_id: &str,
    patch: ShapePatch,
    now: Timestamp,
) -> Result<Content, ValidationError> {
    let mut next = content.clone();
    let shape = next
        .body
        .shapes
        .iter_mut()
        .find(|s| s.id == shape_id)
        .ok_or_else(|| not_found(content, shape_id))?;

    if let Some(position) = patch.position {
        shape.position = position;
    }
    if let Some(dimension) = patch.dimension {
        shape.dimension = dimension;
    }
    if let Some(style) = patch.style {
        shape.style = style;
    }
    if let Some(text) = patch.text {
        shape.text = text;
    }
    if let Some(points) = patch.points {
        shape.points = points;
    }
    if let Some(image) = patch.image {
        shape.image = image;
    }

    next.updated_at = now;
    Ok(next)
}

pub fn remove_shape(content: &Content, shape_id: &str, now: Timestamp) -> Result<Content, ValidationError> {
    let index = content
        .body
        .shapes
        .iter()
        .position(|s| s.id == shape_id)
        .ok_or_else(|| not_found(content, shape_id))?;

    let mut next = content.clone();
    next.body.shapes.remove(index);
    next.updated_at = now;
    Ok(next)
}

fn not_found(content: &Content, shape_id: &str) -> ValidationError {
    ValidationError::ShapeNotFound {
        content_id: content.id.clone(),
        shape_id: shape_id.to_string(),
    }
}
