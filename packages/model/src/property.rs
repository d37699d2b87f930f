use crate::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    Tag,
    Date,
    ShortText,
    LongText,
    Number,
    Link,
}

/// Typed property value
///
/// Serialized as `{"type": "...", "value": ...}` and flattened into the
/// owning [`Property`], so the value can never disagree with its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PropertyValue {
    Tag(Vec<String>),
    /// Milliseconds since the Unix epoch
    Date(Timestamp),
    ShortText(String),
    LongText(String),
    Number(f64),
    /// Id of the target content
    Link(String),
}

impl PropertyValue {
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyValue::Tag(_) => PropertyType::Tag,
            PropertyValue::Date(_) => PropertyType::Date,
            PropertyValue::ShortText(_) => PropertyType::ShortText,
            PropertyValue::LongText(_) => PropertyType::LongText,
            PropertyValue::Number(_) => PropertyType::Number,
            PropertyValue::Link(_) => PropertyType::Link,
        }
    }
}

/// Typed attribute attached to a content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub value: PropertyValue,
    pub created_at: Timestamp,
}

impl Property {
    pub fn property_type(&self) -> PropertyType {
        self.value.property_type()
    }

    /// Target content id when this is a `link` property
    pub fn link_target(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::Link(target) => Some(target.as_str()),
            _ => None,
        }
    }
}
