use super::*;
use crate::config::EditorConfig;
use crate::types::ShapeKind;

fn surface() -> Size {
    Size::new(1280.0, 720.0)
}

#[test]
fn unknown_fields_are_dropped_on_load() {
    let json = r#"{
        "version": 1,
        "width": 100,
        "height": 50,
        "objects": [
            {"type": "rect", "left": 0, "top": 0, "width": 100, "height": 50,
             "name": "clip", "selectable": false, "fill": "white", "shadow": "x"},
            {"type": "circle", "radius": 10, "left": 5, "top": 5, "width": 20, "height": 20,
             "evented": false, "fill": "red"}
        ]
    }"#;
    let scene = parse_document(json).unwrap().into_scene(surface(), &mut ImageStore::default()).unwrap();
    let out = serde_json::to_string(&DocumentFile::from_scene(&scene)).unwrap();
    assert!(!out.contains("shadow"));
    assert!(!out.contains("evented"));
    assert!(out.contains("\"fill\":\"red\""));
}

#[test]
fn missing_defaults_are_filled_in() {
    let json = r#"{"objects": [
        {"type": "rect", "left": 0, "top": 0, "width": 10, "height": 10, "name": "clip"},
        {"type": "textbox", "text": "hi", "left": 0, "top": 0, "width": 10, "height": 10}
    ]}"#;
    let doc = parse_document(json).unwrap();
    assert_eq!(doc.version, DOCUMENT_VERSION);
    let text = &doc.objects[1];
    assert_eq!(text.scale_x, 1.0);
    assert_eq!(text.opacity, 1.0);
    assert!(text.selectable);
    match &text.body {
        crate::objects::ObjectBody::Textbox(content) => {
            assert_eq!(content.font_family, "Arial");
            assert_eq!(content.font_size, 32.0);
            assert_eq!(content.font_weight, 400);
        }
        other => panic!("expected a textbox, got {other:?}"),
    }
}

#[test]
fn workspace_entry_lands_at_the_back() {
    let json = r#"{"objects": [
        {"type": "rect", "left": 0, "top": 0, "width": 10, "height": 10, "name": "clip", "selectable": false}
    ]}"#;
    let scene = parse_document(json).unwrap().into_scene(surface(), &mut ImageStore::default()).unwrap();
    assert_eq!(scene.z_index(scene.workspace_key().unwrap()), Some(0));
    assert_eq!(scene.surface_size(), surface());
}

#[test]
fn unknown_object_type_is_a_parse_error() {
    let json = r#"{"width": 10, "height": 10, "objects": [{"type": "spiral"}]}"#;
    assert!(matches!(parse_document(json), Err(EditorError::Parse(_))));
}

#[test]
fn newer_version_still_loads() {
    let json = r#"{"version": 99, "width": 10, "height": 10, "objects": []}"#;
    let doc = parse_document(json).unwrap();
    assert_eq!(doc.version, 99);
    assert!(doc.into_scene(surface(), &mut ImageStore::default()).is_ok());
}

#[test]
fn export_json_is_tab_indented_and_parses_back() {
    let mut editor = Editor::new(EditorConfig::default());
    editor.add_shape(ShapeKind::Heart);
    let json = editor.export_json().unwrap();
    assert!(json.contains("\n\t\"version\": 1"));

    let doc = parse_document(&json).unwrap();
    assert_eq!(doc.objects.len(), 2);
    assert_eq!(doc.background.as_deref(), Some("white"));
    assert_eq!((doc.width, doc.height), (900.0, 1200.0));
}

#[test]
fn objects_json_carries_ids() {
    let mut editor = Editor::new(EditorConfig::default());
    let key = editor.add_shape(ShapeKind::Circle);
    let objects: Vec<serde_json::Value> = serde_json::from_str(&editor.get_objects_json()).unwrap();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[1]["id"], serde_json::json!(key.to_raw()));
    assert_eq!(objects[1]["type"], "circle");
    assert_eq!(objects[0]["name"], "clip");
}
