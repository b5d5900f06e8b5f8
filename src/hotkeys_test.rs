use super::*;
use crate::config::EditorConfig;

fn key(key: &str, ctrl: bool) -> KeyEvent {
    KeyEvent { key: key.into(), ctrl_key: ctrl, ..Default::default() }
}

#[test]
fn bound_chords() {
    assert_eq!(resolve(&key("Backspace", false)), Some(Command::Delete));
    assert_eq!(resolve(&key("z", true)), Some(Command::Undo));
    assert_eq!(resolve(&key("Z", true)), Some(Command::Undo));
    assert_eq!(resolve(&key("y", true)), Some(Command::Redo));
    assert_eq!(resolve(&key("=", true)), Some(Command::ZoomIn));
    assert_eq!(resolve(&key("+", true)), Some(Command::ZoomIn));
    assert_eq!(resolve(&key("-", true)), Some(Command::ZoomOut));
    assert_eq!(resolve(&key("0", true)), Some(Command::AutoZoom));

    let meta = KeyEvent { key: "z".into(), meta_key: true, ..Default::default() };
    assert_eq!(resolve(&meta), Some(Command::Undo));
}

#[test]
fn unmodified_and_unbound_keys_are_ignored() {
    assert_eq!(resolve(&key("z", false)), None);
    assert_eq!(resolve(&key("q", true)), None);
}

#[test]
fn typing_in_form_fields_is_ignored() {
    for tag in ["INPUT", "textarea"] {
        let event = KeyEvent { key: "Backspace".into(), target: Some(tag.into()), ..Default::default() };
        assert_eq!(resolve(&event), None);
    }
    let canvas = KeyEvent { key: "Backspace".into(), target: Some("CANVAS".into()), ..Default::default() };
    assert_eq!(resolve(&canvas), Some(Command::Delete));
}

#[test]
fn handle_key_runs_the_command() {
    let mut editor = Editor::new(EditorConfig::default());
    assert_eq!(editor.handle_key(&key("q", false)).unwrap(), None);

    let a = editor.add_circle();
    let b = editor.add_star();
    editor.clear_selection();
    let out = editor.handle_key(&key("a", true)).unwrap().unwrap();
    assert_eq!(out["selection"].as_array().unwrap().len(), 2);
    assert_eq!(editor.selection(), &[a, b]);

    editor.handle_key(&key("Backspace", false)).unwrap();
    assert_eq!(editor.scene().len(), 1);
    editor.handle_key(&key("z", true)).unwrap();
    assert_eq!(editor.scene().len(), 3);
}

#[test]
fn key_event_parses_dom_fields() {
    let event: KeyEvent = serde_json::from_str(r#"{"key": "v", "metaKey": true, "target": "DIV"}"#).unwrap();
    assert_eq!(event.key, "v");
    assert!(event.meta_key && !event.ctrl_key);
    assert_eq!(resolve(&event), Some(Command::Paste));
}
