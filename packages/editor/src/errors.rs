//! Error types for the editor

use thiserror::Error;

/// Malformed write rejected by a manager before anything is committed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Area name is required")]
    AreaNameRequired,

    #[error("An area named \"{0}\" already exists")]
    DuplicateAreaName(String),

    #[error("Area not found: {0}")]
    AreaNotFound(String),

    #[error("Content title is required")]
    ContentTitleRequired,

    #[error("Content not found: {0}")]
    ContentNotFound(String),

    #[error("Content is already closed: {0}")]
    ContentAlreadyClosed(String),

    #[error("Content cannot be its own parent: {0}")]
    SelfParent(String),

    #[error("Shape {shape_id} already exists in content {content_id}")]
    DuplicateShape { content_id: String, shape_id: String },

    #[error("Shape {shape_id} not found in content {content_id}")]
    ShapeNotFound { content_id: String, shape_id: String },

    #[error("Property name is required")]
    PropertyNameRequired,

    #[error("Property {property_id} already exists in content {content_id}")]
    DuplicateProperty {
        content_id: String,
        property_id: String,
    },

    #[error("Property {property_id} not found in content {content_id}")]
    PropertyNotFound {
        content_id: String,
        property_id: String,
    },

    #[error("Link endpoint not found: {0}")]
    LinkEndpointNotFound(String),

    #[error("A content cannot link to itself")]
    SelfLink,

    #[error("A link already exists between {0} and {1}")]
    DuplicateLink(String, String),

    #[error("Auto links require a property id")]
    MissingPropertyId,

    #[error("Link not found: {0}")]
    LinkNotFound(String),

    #[error("Graph frame name is required")]
    FrameNameRequired,

    #[error("Graph frame not found: {0}")]
    FrameNotFound(String),
}

/// Delete of an entity that is not there
///
/// Not an error condition for callers: deleting what is already gone is a
/// normal idempotent pattern, so the store turns this into a value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason}")]
pub struct DeleteRejection {
    pub reason: String,
}

impl DeleteRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
