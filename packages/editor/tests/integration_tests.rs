//! Integration tests for the editor crate

use notegraph_editor::managers::content::{ContentDraft, ContentPatch};
use notegraph_editor::managers::frame::FramePatch;
use notegraph_editor::managers::link::LinkDraft;
use notegraph_editor::managers::property::create_property;
use notegraph_editor::managers::shape::create_shape;
use notegraph_editor::{DeleteOutcome, DocumentStore, ValidationError};
use notegraph_model::{
    ContentStatus, Dimension, Document, LinkType, ManualClock, Position, PropertyValue, ShapeType,
};
use std::sync::Arc;

fn store() -> DocumentStore {
    DocumentStore::with_clock(Document::default(), Arc::new(ManualClock::new(10_000)))
}

fn rect() -> notegraph_model::Shape {
    create_shape(
        ShapeType::Rectangle,
        Position::new(10.0, 10.0),
        Dimension::new(120.0, 80.0),
        0,
    )
}

#[test]
fn test_notes_scenario() {
    let mut store = store();

    let area = store.create_area("Notes").unwrap();
    let draft = store.create_content(&area.id, "Draft", ContentDraft::default()).unwrap();
    store.add_shape_to_content(&draft.id, rect()).unwrap();
    store.add_shape_to_content(&draft.id, rect()).unwrap();
    let draft = store.close_content(&draft.id).unwrap();

    assert_eq!(draft.body.shapes.len(), 2);
    assert_eq!(draft.status, ContentStatus::Closed);

    let doc = store.document();
    assert_eq!(doc.contents_in_area(&area.id).count(), 1);
    assert!(doc.links.is_empty());

    let second = store.create_content(&area.id, "Second", ContentDraft::default()).unwrap();
    store.close_content(&second.id).unwrap();
    let link = store.create_link(LinkDraft::manual(draft.id.clone(), second.id.clone())).unwrap();

    let doc = store.document();
    assert_eq!(doc.links.len(), 1);
    assert_eq!(doc.links[0].id, link.id);
    assert_eq!(doc.content(&draft.id).unwrap().id, draft.id);
    assert_eq!(doc.area(&area.id).unwrap().content_ids, vec![draft.id.clone(), second.id.clone()]);
}

#[test]
fn test_delete_area_cascades() {
    let mut store = store();
    let notes = store.create_area("Notes").unwrap();
    let other = store.create_area("Other").unwrap();

    let a = store.create_content(&notes.id, "A", ContentDraft::default()).unwrap();
    let b = store.create_content(&notes.id, "B", ContentDraft::default()).unwrap();
    let c = store.create_content(&other.id, "C", ContentDraft::default()).unwrap();
    store.create_link(LinkDraft::manual(a.id.clone(), b.id.clone())).unwrap();
    store.create_link(LinkDraft::manual(a.id.clone(), c.id.clone())).unwrap();

    store.set_current_area(Some(notes.id.as_str())).unwrap();
    store.set_current_content(Some(a.id.as_str())).unwrap();

    let outcome = store.delete_area(&notes.id);
    let DeleteOutcome::Deleted(plan) = outcome else {
        panic!("expected deletion");
    };
    assert_eq!(plan.content_ids.len(), 2);
    assert_eq!(plan.link_ids.len(), 2);

    let doc = store.document();
    assert!(doc.area(&notes.id).is_none());
    assert!(doc.contents.iter().all(|content| content.area_id != notes.id));
    assert!(doc.links.is_empty());
    assert_eq!(doc.current_area_id, None);
    assert_eq!(doc.current_content_id, None);
    assert_eq!(doc.area(&other.id).unwrap().content_ids, vec![c.id.clone()]);
}

#[test]
fn test_delete_content_removes_links_and_index_entry() {
    let mut store = store();
    let area = store.create_area("Notes").unwrap();
    let a = store.create_content(&area.id, "A", ContentDraft::default()).unwrap();
    let b = store.create_content(&area.id, "B", ContentDraft::default()).unwrap();
    store.create_link(LinkDraft::manual(b.id.clone(), a.id.clone())).unwrap();

    assert!(store.delete_content(&a.id).is_deleted());

    let doc = store.document();
    assert!(doc.links_touching(&a.id).next().is_none());
    assert_eq!(doc.area(&area.id).unwrap().content_ids, vec![b.id.clone()]);

    // idempotent
    let again = store.delete_content(&a.id);
    assert!(matches!(again, DeleteOutcome::Missing { .. }));
    assert_eq!(store.current_error(), None);
}

#[test]
fn test_reverse_link_is_duplicate() {
    let mut store = store();
    let area = store.create_area("Notes").unwrap();
    let a = store.create_content(&area.id, "A", ContentDraft::default()).unwrap();
    let b = store.create_content(&area.id, "B", ContentDraft::default()).unwrap();

    store.create_link(LinkDraft::manual(a.id.clone(), b.id.clone())).unwrap();
    let result = store.create_link(LinkDraft::manual(b.id.clone(), a.id.clone()));

    assert!(matches!(result, Err(ValidationError::DuplicateLink(_, _))));
    assert!(store.current_error().is_some());
    assert_eq!(store.document().links.len(), 1);
}

#[test]
fn test_link_property_materializes_auto_link() {
    let mut store = store();
    let area = store.create_area("Notes").unwrap();
    let x = store.create_content(&area.id, "X", ContentDraft::default()).unwrap();
    let target = store.create_content(&area.id, "Target", ContentDraft::default()).unwrap();

    let property = create_property("related", PropertyValue::Link(target.id.clone()), 0).unwrap();
    let property_id = property.id.clone();
    store.add_property_to_content(&x.id, property).unwrap();

    let doc = store.document();
    assert_eq!(doc.links.len(), 1);
    let link = &doc.links[0];
    assert_eq!(link.from_content_id, x.id);
    assert_eq!(link.to_content_id, target.id);
    assert_eq!(link.link_type, LinkType::Auto);
    assert_eq!(link.property_id.as_deref(), Some(property_id.as_str()));

    store.remove_property_from_content(&x.id, &property_id).unwrap();
    assert!(store.document().links.is_empty());
}

#[test]
fn test_auto_link_skipped_when_pair_already_linked() {
    let mut store = store();
    let area = store.create_area("Notes").unwrap();
    let x = store.create_content(&area.id, "X", ContentDraft::default()).unwrap();
    let y = store.create_content(&area.id, "Y", ContentDraft::default()).unwrap();
    store.create_link(LinkDraft::manual(y.id.clone(), x.id.clone())).unwrap();

    let property = create_property("related", PropertyValue::Link(y.id.clone()), 0).unwrap();
    let owner = store.add_property_to_content(&x.id, property).unwrap();

    assert_eq!(owner.properties.len(), 1);
    assert_eq!(store.document().links.len(), 1);
    assert_eq!(store.document().links[0].link_type, LinkType::Manual);
    assert_eq!(store.current_error(), None);
}

#[test]
fn test_change_content_area_moves_index_entry() {
    let mut store = store();
    let from = store.create_area("From").unwrap();
    let to = store.create_area("To").unwrap();
    let content = store.create_content(&from.id, "Wanderer", ContentDraft::default()).unwrap();

    let moved = store.change_content_area(&content.id, &to.id).unwrap();
    assert_eq!(moved.area_id, to.id);

    let doc = store.document();
    assert!(doc.area(&from.id).unwrap().content_ids.is_empty());
    assert_eq!(doc.area(&to.id).unwrap().content_ids, vec![content.id.clone()]);
}

#[test]
fn test_update_content_protects_identity() {
    let mut store = store();
    let area = store.create_area("Notes").unwrap();
    let content = store.create_content(&area.id, "Draft", ContentDraft::default()).unwrap();

    let patch = ContentPatch {
        title: Some("Final".to_string()),
        emoji: Some(Some("📝".to_string())),
        ..ContentPatch::default()
    };
    let updated = store.update_content(&content.id, patch).unwrap();

    assert_eq!(updated.id, content.id);
    assert_eq!(updated.area_id, content.area_id);
    assert_eq!(updated.created_at, content.created_at);
    assert_eq!(updated.title, "Final");
}

#[test]
fn test_shape_errors_are_hard_failures() {
    let mut store = store();
    let area = store.create_area("Notes").unwrap();
    let content = store.create_content(&area.id, "Draft", ContentDraft::default()).unwrap();
    let shape = rect();

    store.add_shape_to_content(&content.id, shape.clone()).unwrap();
    let duplicate = store.add_shape_to_content(&content.id, shape);
    assert!(matches!(duplicate, Err(ValidationError::DuplicateShape { .. })));

    let missing = store.remove_shape_from_content(&content.id, "ghost");
    assert!(matches!(missing, Err(ValidationError::ShapeNotFound { .. })));
}

#[test]
fn test_parent_link_tracks_hierarchy() {
    let mut store = store();
    let area = store.create_area("Notes").unwrap();
    let parent = store.create_content(&area.id, "Parent", ContentDraft::default()).unwrap();
    let child = store.create_content(&area.id, "Child", ContentDraft::default()).unwrap();

    store.set_content_parent(&child.id, Some(parent.id.as_str())).unwrap();
    let doc = store.document();
    assert_eq!(doc.links.len(), 1);
    assert_eq!(doc.links[0].link_type, LinkType::Parent);
    assert_eq!(doc.links[0].from_content_id, parent.id);

    // deleting the parent orphans the child
    store.delete_content(&parent.id);
    let doc = store.document();
    assert_eq!(doc.content(&child.id).unwrap().parent_id, None);
    assert!(doc.links.is_empty());

    assert_eq!(
        store.set_content_parent(&child.id, Some(child.id.as_str())),
        Err(ValidationError::SelfParent(child.id.clone()))
    );
}

#[test]
fn test_document_serializes_with_null_graph() {
    let mut store = store();
    store.create_area("Notes").unwrap();

    let json = serde_json::to_value(store.document().as_ref()).unwrap();
    assert!(json["graph"].is_null());
    assert!(json["graphFrames"].is_array());
    assert_eq!(json["areas"][0]["name"], "Notes");
    assert!(json["updatedAt"].as_i64().unwrap() > 0);
}

#[test]
fn test_deleted_content_leaves_its_frames() {
    let mut store = store();
    let area = store.create_area("Notes").unwrap();
    let a = store.create_content(&area.id, "A", ContentDraft::default()).unwrap();
    let b = store.create_content(&area.id, "B", ContentDraft::default()).unwrap();

    let frame = store
        .add_graph_frame("Sprint", None, Position::new(0.0, 0.0), Dimension::new(400.0, 300.0))
        .unwrap();
    let patch = FramePatch {
        content_ids: Some(vec![a.id.clone(), b.id.clone()]),
        ..FramePatch::default()
    };
    store.update_graph_frame(&frame.id, patch).unwrap();

    assert!(store.delete_content(&a.id).is_deleted());

    let doc = store.document();
    let frame = doc.graph_frame(&frame.id).unwrap();
    assert_eq!(frame.content_ids, vec![b.id.clone()]);
}

#[test]
fn test_delete_area_removes_scoped_frames() {
    let mut store = store();
    let notes = store.create_area("Notes").unwrap();
    let other = store.create_area("Other").unwrap();

    let scoped = store
        .add_graph_frame("Notes frame", Some(notes.id.as_str()), Position::default(), Dimension::default())
        .unwrap();
    let elsewhere = store
        .add_graph_frame("Other frame", Some(other.id.as_str()), Position::default(), Dimension::default())
        .unwrap();
    let unscoped = store
        .add_graph_frame("Everywhere", None, Position::default(), Dimension::default())
        .unwrap();

    let DeleteOutcome::Deleted(plan) = store.delete_area(&notes.id) else {
        panic!("expected deletion");
    };
    assert_eq!(plan.frame_ids, vec![scoped.id.clone()]);

    let doc = store.document();
    assert!(doc.graph_frame(&scoped.id).is_none());
    assert!(doc.graph_frame(&elsewhere.id).is_some());
    assert!(doc.graph_frame(&unscoped.id).is_some());

    // undo brings the frame back with the area
    assert!(store.undo());
    assert!(store.document().graph_frame(&scoped.id).is_some());
}

#[test]
fn test_graph_frame_update_and_remove() {
    let mut store = store();
    let area = store.create_area("Notes").unwrap();

    assert_eq!(
        store.add_graph_frame("  ", None, Position::default(), Dimension::default()),
        Err(ValidationError::FrameNameRequired)
    );

    let frame = store
        .add_graph_frame("Draft", Some(area.id.as_str()), Position::default(), Dimension::default())
        .unwrap();
    let renamed = store
        .update_graph_frame(
            &frame.id,
            FramePatch {
                name: Some("Review".to_string()),
                color: Some(Some("#ffcc00".to_string())),
                ..FramePatch::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Review");
    assert_eq!(renamed.color.as_deref(), Some("#ffcc00"));
    assert_eq!(store.document().graph_frame(&frame.id), Some(&renamed));

    let unknown = FramePatch {
        content_ids: Some(vec!["ghost".to_string()]),
        ..FramePatch::default()
    };
    assert_eq!(
        store.update_graph_frame(&frame.id, unknown),
        Err(ValidationError::ContentNotFound("ghost".to_string()))
    );
    store.clear_error();

    let DeleteOutcome::Deleted(plan) = store.remove_graph_frame(&frame.id) else {
        panic!("expected deletion");
    };
    assert_eq!(plan.frame_ids, vec![frame.id.clone()]);
    assert!(store.document().graph_frames.is_empty());

    let outcome = store.remove_graph_frame(&frame.id);
    assert!(matches!(outcome, DeleteOutcome::Missing { .. }));
    assert!(outcome.reason().unwrap().contains(&frame.id));
    assert_eq!(store.current_error(), None);
}
