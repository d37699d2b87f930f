use super::DeletePlan;
use crate::{DeleteRejection, ValidationError};
use notegraph_model::{new_id, ArrowMode, Document, LineStyle, Link, LinkType, Timestamp};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Requested link; validated by [`create_link`]
#[derive(Debug, Clone)]
pub struct LinkDraft {
    pub from_content_id: String,
    pub to_content_id: String,
    pub link_type: LinkType,
    pub property_id: Option<String>,
    pub color: Option<String>,
    pub line_style: Option<LineStyle>,
    pub arrow_mode: Option<ArrowMode>,
}

impl LinkDraft {
    pub fn manual(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, LinkType::Manual, None)
    }

    pub fn auto(from: impl Into<String>, to: impl Into<String>, property_id: impl Into<String>) -> Self {
        Self::new(from, to, LinkType::Auto, Some(property_id.into()))
    }

    pub fn parent(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::new(parent, child, LinkType::Parent, None)
    }

    fn new(from: impl Into<String>, to: impl Into<String>, link_type: LinkType, property_id: Option<String>) -> Self {
        Self {
            from_content_id: from.into(),
            to_content_id: to.into(),
            link_type,
            property_id,
            color: None,
            line_style: None,
            arrow_mode: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkStylePatch {
    pub color: Option<Option<String>>,
    pub line_style: Option<Option<LineStyle>>,
    pub arrow_mode: Option<Option<ArrowMode>>,
}

pub fn create_link(draft: LinkDraft, doc: &Document, now: Timestamp) -> Result<Link, ValidationError> {
    for endpoint in [&draft.from_content_id, &draft.to_content_id] {
        if doc.content(endpoint).is_none() {
            return Err(ValidationError::LinkEndpointNotFound(endpoint.clone()));
        }
    }
    if draft.from_content_id == draft.to_content_id {
        return Err(ValidationError::SelfLink);
    }
    if doc.link_between(&draft.from_content_id, &draft.to_content_id).is_some() {
        return Err(ValidationError::DuplicateLink(draft.from_content_id, draft.to_content_id));
    }
    if draft.link_type == LinkType::Auto && draft.property_id.is_none() {
        return Err(ValidationError::MissingPropertyId);
    }

    Ok(Link {
        id: new_id(),
        from_content_id: draft.from_content_id,
        to_content_id: draft.to_content_id,
        link_type: draft.link_type,
        property_id: draft.property_id,
        color: draft.color,
        line_style: draft.line_style,
        arrow_mode: draft.arrow_mode,
        created_at: now,
    })
}

pub fn update_link_style(link_id: &str, patch: LinkStylePatch, doc: &Document) -> Result<Link, ValidationError> {
    let mut next = Link::clone(
        doc.link(link_id)
            .ok_or_else(|| ValidationError::LinkNotFound(link_id.to_string()))?,
    );

    if let Some(color) = patch.color {
        next.color = color;
    }
    if let Some(line_style) = patch.line_style {
        next.line_style = line_style;
    }
    if let Some(arrow_mode) = patch.arrow_mode {
        next.arrow_mode = arrow_mode;
    }

    Ok(next)
}

pub fn plan_link_deletion(link_id: &str, doc: &Document) -> Result<DeletePlan, DeleteRejection> {
    if doc.link(link_id).is_none() {
        return Err(DeleteRejection::new(format!("Link not found: {}", link_id)));
    }

    Ok(DeletePlan {
        link_ids: vec![link_id.to_string()],
        ..DeletePlan::default()
    })
}

pub fn links_for_content<'a>(content_id: &'a str, doc: &'a Document) -> Vec<&'a Arc<Link>> {
    doc.links_touching(content_id).collect()
}

pub fn links_for_property<'a>(property_id: &str, doc: &'a Document) -> Vec<&'a Arc<Link>> {
    doc.links
        .iter()
        .filter(|l| l.property_id.as_deref() == Some(property_id))
        .collect()
}

/// Would adding `from → to` close a directed cycle?
///
/// Builds the adjacency of every existing link plus the proposed edge, then
/// walks depth-first from `from` looking for an edge back onto the current
/// path. Advisory: no write path consults it.
pub fn would_create_cycle(from: &str, to: &str, doc: &Document) -> bool {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for link in &doc.links {
        adjacency
            .entry(link.from_content_id.as_str())
            .or_default()
            .push(link.to_content_id.as_str());
    }
    adjacency.entry(from).or_default().push(to);

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();
    // (node, index of next neighbour to explore)
    let mut stack: Vec<(&str, usize)> = vec![(from, 0)];
    visited.insert(from);
    on_stack.insert(from);

    while let Some((node, next)) = stack.last_mut() {
        let neighbours = adjacency.get(*node).map(Vec::as_slice).unwrap_or(&[]);

        if let Some(&neighbour) = neighbours.get(*next) {
            *next += 1;
            if on_stack.contains(neighbour) {
                return true;
            }
            if visited.insert(neighbour) {
                on_stack.insert(neighbour);
                stack.push((neighbour, 0));
            }
        } else {
            on_stack.remove(*node);
            stack.pop();
        }
    }

    false
}
