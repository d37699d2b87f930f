//! # Notegraph Model
//!
//! Value types for a notegraph document.
//!
//! ```text
//! Document
//!  ├── areas:    Area      (name, content_ids cache)
//!  ├── contents: Content   (area_id, status, body.shapes, properties)
//!  ├── links:    Link      (from → to, manual | auto | parent)
//!  └── graph_frames, hierarchy_level_configs
//! ```
//!
//! Nothing in this crate validates or mutates. Validation lives in the
//! editor's managers; this crate only describes the persisted shape.

mod area;
mod clock;
mod content;
mod document;
mod frame;
mod geometry;
mod id_generator;
mod link;
mod property;
mod shape;

pub use area::Area;
pub use clock::{Clock, ManualClock, SystemClock};
pub use content::{Content, ContentBody, ContentStatus};
pub use document::{Document, SCHEMA_VERSION};
pub use frame::{GraphFrame, HierarchyLevelConfig};
pub use geometry::{Dimension, Position};
pub use id_generator::new_id;
pub use link::{ArrowMode, LineStyle, Link, LinkType};
pub use property::{Property, PropertyType, PropertyValue};
pub use shape::{ImagePayload, Shape, ShapeStyle, ShapeType};

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;
