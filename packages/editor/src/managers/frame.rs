use super::{required, DeletePlan};
use crate::{DeleteRejection, ValidationError};
use notegraph_model::{new_id, Dimension, Document, GraphFrame, Position, Timestamp};

#[derive(Debug, Clone, Default)]
pub struct FramePatch {
    pub name: Option<String>,
    pub content_ids: Option<Vec<String>>,
    pub position: Option<Position>,
    pub dimension: Option<Dimension>,
    pub color: Option<Option<String>>,
}

pub fn create_frame(
    name: &str,
    area_id: Option<&str>,
    position: Position,
    dimension: Dimension,
    doc: &Document,
    now: Timestamp,
) -> Result<GraphFrame, ValidationError> {
    let name = required(name).ok_or(ValidationError::FrameNameRequired)?;
    if let Some(area_id) = area_id {
        if doc.area(area_id).is_none() {
            return Err(ValidationError::AreaNotFound(area_id.to_string()));
        }
    }

    Ok(GraphFrame {
        id: new_id(),
        name,
        area_id: area_id.map(str::to_string),
        content_ids: Vec::new(),
        position,
        dimension,
        color: None,
        created_at: now,
        updated_at: now,
    })
}

pub fn update_frame(
    frame_id: &str,
    patch: FramePatch,
    doc: &Document,
    now: Timestamp,
) -> Result<GraphFrame, ValidationError> {
    let mut next = doc
        .graph_frame(frame_id)
        .cloned()
        .ok_or_else(|| ValidationError::FrameNotFound(frame_id.to_string()))?;

    if let Some(name) = patch.name {
        next.name = required(&name).ok_or(ValidationError::FrameNameRequired)?;
    }
    if let Some(content_ids) = patch.content_ids {
        if let Some(missing) = content_ids.iter().find(|id| doc.content(id).is_none()) {
            return Err(ValidationError::ContentNotFound(missing.clone()));
        }
        next.content_ids = content_ids;
    }
    if let Some(position) = patch.position {
        next.position = position;
    }
    if let Some(dimension) = patch.dimension {
        next.dimension = dimension;
    }
    if let Some(color) = patch.color {
        next.color = color;
    }
    next.updated_at = now;

    Ok(next)
}

pub fn plan_frame_deletion(frame_id: &str, doc: &Document) -> Result<DeletePlan, DeleteRejection> {
    if doc.graph_frame(frame_id).is_none() {
        return Err(DeleteRejection::new(format!("Graph frame not found: {}", frame_id)));
    }

    Ok(DeletePlan {
        frame_ids: vec![frame_id.to_string()],
        ..DeletePlan::default()
    })
}
