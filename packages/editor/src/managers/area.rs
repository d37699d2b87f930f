use super::{content::collect_content_dependents, required, DeletePlan};
use crate::{DeleteRejection, ValidationError};
use notegraph_model::{new_id, Area, Document, Timestamp};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct AreaPatch {
    pub name: Option<String>,
}

pub fn create_area(name: &str, doc: &Document, now: Timestamp) -> Result<Area, ValidationError> {
    let name = validate_name(name, None, doc)?;

    Ok(Area {
        id: new_id(),
        name,
        content_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

pub fn update_area(
    area_id: &str,
    patch: AreaPatch,
    doc: &Document,
    now: Timestamp,
) -> Result<Area, ValidationError> {
    let current = doc
        .area(area_id)
        .ok_or_else(|| ValidationError::AreaNotFound(area_id.to_string()))?;

    let mut next = Area::clone(current);
    if let Some(name) = patch.name {
        next.name = validate_name(&name, Some(area_id), doc)?;
    }
    next.updated_at = now;

    Ok(next)
}

/// Everything that goes with an area: its contents, their links, frames
/// scoped to it
pub fn plan_area_deletion(area_id: &str, doc: &Document) -> Result<DeletePlan, DeleteRejection> {
    if doc.area(area_id).is_none() {
        return Err(DeleteRejection::new(format!("Area not found: {}", area_id)));
    }

    let mut plan = DeletePlan {
        area_ids: vec![area_id.to_string()],
        content_ids: doc.contents_in_area(area_id).map(|c| c.id.clone()).collect(),
        ..DeletePlan::default()
    };
    collect_content_dependents(&mut plan, doc);

    plan.frame_ids.extend(
        doc.graph_frames
            .iter()
            .filter(|f| f.area_id.as_deref() == Some(area_id))
            .map(|f| f.id.clone()),
    );

    Ok(plan)
}

/// Case-insensitive lookup by trimmed name
pub fn find_area_by_name<'a>(name: &str, doc: &'a Document) -> Option<&'a Arc<Area>> {
    let wanted = name.trim().to_lowercase();
    doc.areas.iter().find(|a| a.name.trim().to_lowercase() == wanted)
}

pub fn areas_sorted_by_name(doc: &Document) -> Vec<&Arc<Area>> {
    let mut areas: Vec<_> = doc.areas.iter().collect();
    areas.sort_by_key(|a| a.name.to_lowercase());
    areas
}

fn validate_name(name: &str, exclude_id: Option<&str>, doc: &Document) -> Result<String, ValidationError> {
    let name = required(name).ok_or(ValidationError::AreaNameRequired)?;

    let taken = find_area_by_name(&name, doc).is_some_and(|existing| Some(existing.id.as_str()) != exclude_id);
    if taken {
        return Err(ValidationError::DuplicateAreaName(name));
    }

    Ok(name)
}
