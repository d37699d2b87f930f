//! # Document
//!
//! The whole persisted state: four related collections plus navigation.
//!
//! Entity collections hold `Arc<T>`. Cloning a document copies pointers,
//! so an undo snapshot only pays for the entities that a write replaced.

use crate::{Area, Content, GraphFrame, HierarchyLevelConfig, Link, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Current persisted schema version
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub areas: Vec<Arc<Area>>,
    #[serde(default)]
    pub contents: Vec<Arc<Content>>,
    #[serde(default)]
    pub links: Vec<Arc<Link>>,
    #[serde(default)]
    pub graph_frames: Vec<GraphFrame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_level_configs: Option<Vec<HierarchyLevelConfig>>,
    /// Always null on disk; the graph is derived, never stored
    #[serde(default)]
    pub graph: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_content_id: Option<String>,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            areas: Vec::new(),
            contents: Vec::new(),
            links: Vec::new(),
            graph_frames: Vec::new(),
            hierarchy_level_configs: None,
            graph: None,
            current_area_id: None,
            current_content_id: None,
            version: SCHEMA_VERSION,
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl Document {
    /// Empty document created at `now`. `updated_at` stays 0 until the first write.
    pub fn empty(now: Timestamp) -> Self {
        Self {
            created_at: now,
            ..Self::default()
        }
    }

    pub fn area(&self, id: &str) -> Option<&Arc<Area>> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn content(&self, id: &str) -> Option<&Arc<Content>> {
        self.contents.iter().find(|c| c.id == id)
    }

    pub fn link(&self, id: &str) -> Option<&Arc<Link>> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn graph_frame(&self, id: &str) -> Option<&GraphFrame> {
        self.graph_frames.iter().find(|f| f.id == id)
    }

    pub fn contents_in_area<'a>(&'a self, area_id: &'a str) -> impl Iterator<Item = &'a Arc<Content>> {
        self.contents.iter().filter(move |c| c.area_id == area_id)
    }

    pub fn links_touching<'a>(&'a self, content_id: &'a str) -> impl Iterator<Item = &'a Arc<Link>> {
        self.links.iter().filter(move |l| l.touches(content_id))
    }

    /// Link joining `a` and `b` in either direction
    pub fn link_between(&self, a: &str, b: &str) -> Option<&Arc<Link>> {
        self.links.iter().find(|l| l.connects(a, b))
    }

    /// Recompute every area's `content_ids` from the contents' `area_id`.
    ///
    /// Order follows the contents collection. Areas whose cache is already
    /// correct keep their `Arc`.
    pub fn rebuild_area_index(&mut self) {
        for area in &mut self.areas {
            let ids: Vec<String> = self
                .contents
                .iter()
                .filter(|c| c.area_id == area.id)
                .map(|c| c.id.clone())
                .collect();

            if area.content_ids != ids {
                Arc::make_mut(area).content_ids = ids;
            }
        }
    }

    /// Number of entities across all collections, embedded ones included
    pub fn entity_count(&self) -> usize {
        let embedded: usize = self
            .contents
            .iter()
            .map(|c| c.body.shapes.len() + c.properties.len())
            .sum();
        self.areas.len() + self.contents.len() + self.links.len() + embedded
    }
}
