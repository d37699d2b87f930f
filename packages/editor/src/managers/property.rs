//! Properties are embedded in a content; the same hard-failure rules as
//! shapes apply. Link materialization for `link` properties happens in the
//! store's cascade step, not here.

use super::required;
use crate::ValidationError;
use notegraph_model::{new_id, Content, Property, PropertyValue, Timestamp};

#[derive(Debug, Clone, Default)]
pub struct PropertyPatch {
    pub name: Option<String>,
    pub value: Option<PropertyValue>,
}

pub fn create_property(name: &str, value: PropertyValue, now: Timestamp) -> Result<Property, ValidationError> {
    let name = required(name).ok_or(ValidationError::PropertyNameRequired)?;

    Ok(Property {
        id: new_id(),
        name,
        value,
        created_at: now,
    })
}

pub fn add_property(content: &Content, property: Property, now: Timestamp) -> Result<Content, ValidationError> {
    if content.property(&property.id).is_some() {
        return Err(ValidationError::DuplicateProperty {
            content_id: content.id.clone(),
            property_id: property.id,
        });
    }

    let mut next = content.clone();
    next.properties.push(property);
    next.updated_at = now;
    Ok(next)
}

pub fn update_property(
    content: &Content,
    property_id: &str,
    patch: PropertyPatch,
    now: Timestamp,
) -> Result<Content, ValidationError> {
    let mut next = content.clone();
    let property = next
        .properties
        .iter_mut()
        .find(|p| p.id == property_id)
        .ok_or_else(|| not_found(content, property_id))?;

    if let Some(name) = patch.name {
        property.name = required(&name).ok_or(ValidationError::PropertyNameRequired)?;
    }
    if let Some(value) = patch.value {
        property.value = value;
    }

    next.updated_at = now;
    Ok(next)
}

pub fn remove_property(content: &Content, property_id: &str, now: Timestamp) -> Result<Content, ValidationError> {
    let index = content
        .properties
        .iter()
        .position(|p| p.id == property_id)
        .ok_or_else(|| not_found(content, property_id))?;

    let mut next = content.clone();
    next.properties.remove(index);
    next.updated_at = now;
    Ok(next)
}

/// `link` properties of a content paired with their target ids
pub fn link_targets(content: &Content) -> impl Iterator<Item = (&Property, &str)> {
    content
        .properties
        .iter()
        .filter_map(|p| p.link_target().map(|target| (p, target)))
}

fn not_found(content: &Content, property_id: &str) -> ValidationError {
    ValidationError::PropertyNotFound {
        content_id: content.id.clone(),
        property_id: property_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notegraph_model::{ContentBody, ContentStatus, PropertyType};

    fn content() -> Content {
        Content {
            id: "c1".to_string(),
            area_id: "a1".to_string(),
            title: "Draft".to_string(),
            status: ContentStatus::Open,
            body: ContentBody::default(),
            properties: vec![],
            parent_id: None,
            node_position: None,
            emoji: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_name_required() {
        let result = create_property(" ", PropertyValue::Number(1.0), 0);
        assert_eq!(result, Err(ValidationError::PropertyNameRequired));
    }

    #[test]
    fn test_duplicate_property_fails() {
        let property = create_property("due", PropertyValue::Date(100), 1).unwrap();
        let c = add_property(&content(), property.clone(), 2).unwrap();

        assert!(matches!(
            add_property(&c, property, 3),
            Err(ValidationError::DuplicateProperty { .. })
        ));
    }

    #[test]
    fn test_update_changes_type_with_value() {
        let property = create_property("ref", PropertyValue::ShortText("x".to_string()), 1).unwrap();
        let id = property.id.clone();
        let c = add_property(&content(), property, 1).unwrap();

        let patch = PropertyPatch {
            value: Some(PropertyValue::Link("c2".to_string())),
            ..PropertyPatch::default()
        };
        let updated = update_property(&c, &id, patch, 2).unwrap();

        assert_eq!(updated.properties[0].property_type(), PropertyType::Link);
        assert_eq!(link_targets(&updated).count(), 1);
    }

    #[test]
    fn test_remove_missing_property_fails() {
        assert!(matches!(
            remove_property(&content(), "ghost", 1),
            Err(ValidationError::PropertyNotFound { .. })
        ));
    }
}
