use super::*;
use crate::config::EditorConfig;
use crate::types::ShapeKind;

fn editor() -> Editor {
    Editor::new(EditorConfig::default())
}

#[test]
fn paste_cascades_diagonally() {
    let mut editor = editor();
    let original = editor.add_shape(ShapeKind::Rectangle);
    let (left, top) = {
        let obj = editor.object(original).unwrap();
        (obj.left, obj.top)
    };
    editor.copy();

    for step in 1..=3 {
        let pasted = editor.paste();
        assert_eq!(pasted.len(), 1);
        let obj = editor.object(pasted[0]).unwrap();
        let offset = 10.0 * step as f64;
        assert_eq!((obj.left, obj.top), (left + offset, top + offset));
        assert_eq!(editor.selection(), &pasted[..]);
    }
    assert_eq!(editor.scene().len(), 5);
    assert_eq!(editor.history().actions().last(), Some(&"Paste"));
}

#[test]
fn paste_with_empty_clipboard_is_a_noop() {
    let mut editor = editor();
    assert!(editor.paste().is_empty());
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn copy_with_empty_selection_keeps_previous_slot() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Circle);
    editor.copy();
    editor.clear_selection();
    editor.copy();
    assert_eq!(editor.clipboard.len(), 1);
}

#[test]
fn multi_selection_pastes_every_object() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Circle);
    editor.add_shape(ShapeKind::Star);
    editor.select_all();
    editor.copy();

    let pasted = editor.paste();
    assert_eq!(pasted.len(), 2);
    assert_eq!(editor.selection(), &pasted[..]);
    // one snapshot for the whole paste
    assert_eq!(editor.history().len(), 4);
}

#[test]
fn clipboard_survives_undo() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Heart);
    editor.copy();
    editor.undo().unwrap();

    let pasted = editor.paste();
    assert_eq!(pasted.len(), 1);
    assert_eq!(editor.scene().len(), 2);
}
