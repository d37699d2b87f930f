//! Graph manager
//!
//! Derives the node/edge view of a document. Nothing here is cached or
//! stored: the same document always yields the same graph, so callers
//! rebuild on every read.

use crate::edge::GraphEdge;
use crate::node::{GraphNode, NodeFactory, Viewport};
use notegraph_model::{Content, Document, GraphFrame, LinkType};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Caller-supplied presentation settings
#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    /// Overrides default and hierarchy colors for every node
    pub node_color: Option<String>,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Frames visible under the same area filter
    pub frames: Vec<GraphFrame>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges pointing at `id`
    pub fn incoming(&self, id: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.target == id).collect()
    }

    /// Edges leaving `id`
    pub fn outgoing(&self, id: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.source == id).collect()
    }

    /// Neighbours in either direction, each listed once
    pub fn connected_ids(&self, id: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .filter_map(|e| {
                if e.source == id {
                    Some(e.target.as_str())
                } else if e.target == id {
                    Some(e.source.as_str())
                } else {
                    None
                }
            })
            .filter(|other| seen.insert(*other))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub manual_link_count: usize,
    pub auto_link_count: usize,
}

/// Project `doc` (optionally one area of it) to nodes and edges.
///
/// Every content is a node whatever its status. An edge is kept only when
/// both of its endpoints are selected.
pub fn build_graph(doc: &Document, area_id: Option<&str>, options: &GraphOptions) -> Graph {
    let selected = select_contents(doc, area_id);
    let selected_ids: HashSet<&str> = selected.iter().map(|c| c.id.as_str()).collect();

    let levels = doc.hierarchy_level_configs.as_deref().unwrap_or(&[]);
    let factory = NodeFactory::new(options.node_color.as_deref(), options.viewport, levels);
    let parents = parent_index(doc);

    let nodes: Vec<GraphNode> = selected
        .iter()
        .map(|content| factory.create(content, depth_of(&content.id, &parents)))
        .collect();

    let edges: Vec<GraphEdge> = doc
        .links
        .iter()
        .filter(|l| selected_ids.contains(l.from_content_id.as_str()) && selected_ids.contains(l.to_content_id.as_str()))
        .map(|l| GraphEdge::from(l.as_ref()))
        .collect();

    let frames = doc
        .graph_frames
        .iter()
        .filter(|f| match (area_id, f.area_id.as_deref()) {
            (Some(wanted), Some(scope)) => wanted == scope,
            _ => true,
        })
        .cloned()
        .collect();

    debug!(area_id = ?area_id, nodes = nodes.len(), edges = edges.len(), "Built graph");

    Graph { nodes, edges, frames }
}

/// Counts for the same selection [`build_graph`] would make, without
/// building nodes
pub fn graph_stats(doc: &Document, area_id: Option<&str>) -> GraphStats {
    let mut stats = GraphStats::default();
    let mut selected_ids = HashSet::new();

    for content in select_contents(doc, area_id) {
        selected_ids.insert(content.id.as_str());
        stats.node_count += 1;
    }

    for link in &doc.links {
        if !(selected_ids.contains(link.from_content_id.as_str()) && selected_ids.contains(link.to_content_id.as_str())) {
            continue;
        }
        stats.edge_count += 1;
        match link.link_type {
            LinkType::Manual => stats.manual_link_count += 1,
            LinkType::Auto => stats.auto_link_count += 1,
            LinkType::Parent => {}
        }
    }

    stats
}

fn select_contents<'a>(doc: &'a Document, area_id: Option<&str>) -> Vec<&'a Content> {
    doc.contents
        .iter()
        .filter(|c| area_id.map_or(true, |a| c.area_id == a))
        .map(|c| c.as_ref())
        .collect()
}

fn parent_index(doc: &Document) -> HashMap<&str, &str> {
    doc.contents
        .iter()
        .filter_map(|c| c.parent_id.as_deref().map(|p| (c.id.as_str(), p)))
        .collect()
}

/// Number of ancestors. Parent chains are not cycle-checked on write, so a
/// loop stops the walk at the first repeated id.
fn depth_of(id: &str, parents: &HashMap<&str, &str>) -> u32 {
    let mut seen = HashSet::from([id]);
    let mut depth = 0;
    let mut current = id;

    while let Some(&parent) = parents.get(current) {
        if !seen.insert(parent) {
            break;
        }
        depth += 1;
        current = parent;
    }

    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_follows_parents() {
        let parents = HashMap::from([("c", "b"), ("b", "a")]);
        assert_eq!(depth_of("a", &parents), 0);
        assert_eq!(depth_of("b", &parents), 1);
        assert_eq!(depth_of("c", &parents), 2);
    }

    #[test]
    fn test_depth_stops_on_cycle() {
        let parents = HashMap::from([("a", "b"), ("b", "a")]);
        assert_eq!(depth_of("a", &parents), 1);
    }

    #[test]
    fn test_empty_document() {
        let graph = build_graph(&Document::default(), None, &GraphOptions::default());
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert_eq!(graph_stats(&Document::default(), None), GraphStats::default());
    }
}
