use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::error::EditorError;
use crate::types::ShapeKind;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn editor() -> Editor {
    Editor::new(EditorConfig::default())
}

#[test]
fn new_editor_starts_with_one_snapshot() {
    let editor = editor();
    assert_eq!(editor.history().len(), 1);
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
    assert!(editor.load_error().is_none());

    let ws = editor.workspace().unwrap();
    assert_eq!(ws.scaled_size(), (900.0, 1200.0));
    assert_eq!(editor.history().current(), Some(editor.snapshot().as_str()));
}

#[test]
fn snapshot_round_trip_is_byte_identical() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Star);
    editor.add_shape(ShapeKind::SoftRectangle);
    editor.add_text("Hello\nworld", &crate::factory::TextOptions::heading());
    editor.change_fill_color("#FF0000");

    let saved = editor.snapshot();
    let restored = Editor::with_state(EditorConfig::default(), &saved);
    assert!(restored.load_error().is_none());
    assert_eq!(restored.snapshot(), saved);
    assert_eq!(restored.scene().len(), editor.scene().len());
}

#[test]
fn undo_and_redo_walk_the_same_states() {
    let mut editor = editor();
    let s0 = editor.snapshot();
    editor.add_shape(ShapeKind::Circle);
    let s1 = editor.snapshot();
    editor.add_shape(ShapeKind::Rectangle);
    let s2 = editor.snapshot();

    assert!(editor.undo().unwrap());
    assert_eq!(editor.snapshot(), s1);
    assert!(editor.undo().unwrap());
    assert_eq!(editor.snapshot(), s0);
    assert!(!editor.can_undo());

    assert!(editor.redo().unwrap());
    assert_eq!(editor.snapshot(), s1);
    assert!(editor.redo().unwrap());
    assert_eq!(editor.snapshot(), s2);
    assert!(!editor.can_redo());
    assert_eq!(editor.history().len(), 3);
}

#[test]
fn undo_and_redo_at_the_ends_are_noops() {
    let mut editor = editor();
    assert!(!editor.undo().unwrap());
    assert!(!editor.redo().unwrap());
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn new_action_after_undo_truncates_redo_branch() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Circle);
    editor.add_shape(ShapeKind::Rectangle);
    editor.undo().unwrap();
    assert!(editor.can_redo());

    editor.add_shape(ShapeKind::Triangle);
    assert!(!editor.can_redo());
    assert_eq!(editor.history().len(), 3);
    assert_eq!(editor.history().actions(), vec!["Initial State", "Add Shape", "Add Shape"]);
    assert_eq!(editor.history().index(), 2);
}

#[test]
fn undo_clears_selection_and_releases_batch() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Circle);
    assert_eq!(editor.selection().len(), 1);

    editor.undo().unwrap();
    assert!(editor.selection().is_empty());
    assert!(!editor.history().in_batch());
}

#[test]
fn corrupt_initial_document_falls_back_to_blank() {
    let editor = Editor::with_state(EditorConfig::default(), "{\"objects\": [ nope");
    assert!(editor.load_error().is_some());
    assert!(!editor.can_undo());
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.workspace().unwrap().scaled_size(), (900.0, 1200.0));
}

#[test]
fn document_without_workspace_or_size_is_rejected() {
    let editor = Editor::with_state(EditorConfig::default(), r#"{"objects": []}"#);
    assert!(editor.load_error().is_some());
    assert!(editor.workspace().is_some());
}

#[test]
fn document_without_workspace_entry_gets_one_from_its_size() {
    let json = r##"{"width": 500, "height": 400, "background": "#eeeeee", "objects": []}"##;
    let editor = Editor::with_state(EditorConfig::default(), json);
    assert!(editor.load_error().is_none());
    let ws = editor.workspace().unwrap();
    assert_eq!(ws.scaled_size(), (500.0, 400.0));
    assert_eq!(ws.fill.as_deref(), Some("#eeeeee"));
}

#[test]
fn bad_load_json_leaves_document_untouched() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Circle);
    let before = editor.snapshot();
    let entries = editor.history().len();

    let err = editor.load_json("not json").unwrap_err();
    assert!(matches!(err, EditorError::Parse(_)));
    assert_eq!(editor.snapshot(), before);
    assert_eq!(editor.history().len(), entries);
}

#[test]
fn load_json_is_recorded_and_undoable() {
    let mut source = editor();
    source.add_shape(ShapeKind::Hexagon);
    let json = source.snapshot();

    let mut editor = editor();
    let blank = editor.snapshot();
    editor.load_json(&json).unwrap();
    assert_eq!(editor.snapshot(), json);
    assert_eq!(editor.history().actions().last(), Some(&"Load"));

    editor.undo().unwrap();
    assert_eq!(editor.snapshot(), blank);
}

#[test]
fn auto_zoom_fits_workspace_and_is_idempotent() {
    let mut editor = editor();
    let first = editor.auto_zoom();
    let transform = editor.viewport().transform;
    let second = editor.auto_zoom();

    assert!(approx_eq(first, 0.85 * 0.6));
    assert!(approx_eq(first, second));
    assert_eq!(editor.viewport().transform, transform);

    let center = editor.workspace().unwrap().center_point();
    let screen = editor.viewport().world_to_screen(center);
    assert!(approx_eq(screen.x, 640.0));
    assert!(approx_eq(screen.y, 360.0));
}

#[test]
fn clip_follows_workspace_after_viewport_changes() {
    let mut editor = editor();
    editor.zoom_in();
    editor.zoom_out();
    editor.resize_surface(800.0, 600.0);
    editor.change_size(400.0, 300.0).unwrap();
    assert_eq!(editor.viewport().clip, editor.scene().workspace_bounds());
    assert_eq!(editor.surface_size(), Size::new(800.0, 600.0));
}

#[test]
fn collapsed_surface_keeps_the_viewport_usable() {
    let mut editor = editor();
    let fitted = editor.viewport().transform;
    editor.resize_surface(0.0, 0.0);
    assert_eq!(editor.viewport().transform, fitted);
    assert_eq!(editor.surface_size(), Size::new(0.0, 0.0));

    editor.zoom_in();
    let (x, y) = editor.viewport().pan();
    assert!(x.is_finite() && y.is_finite());
    assert!(editor.select_point(0.0, 0.0, false).is_empty());

    editor.resize_surface(1280.0, 720.0);
    assert!(approx_eq(editor.viewport().zoom(), 0.85 * 0.6));
    assert_eq!(editor.viewport().clip, editor.scene().workspace_bounds());
}

#[test]
fn save_listener_receives_each_recorded_snapshot() {
    let patches: Rc<RefCell<Vec<ProjectPatch>>> = Rc::default();
    let mut editor = editor();
    {
        let patches = Rc::clone(&patches);
        editor.set_save_listener(move |patch| patches.borrow_mut().push(patch.clone()));
    }

    editor.add_shape(ShapeKind::Circle);
    editor.change_opacity(0.5);
    editor.clear_selection();
    // nothing selected, nothing recorded
    editor.change_opacity(0.5);

    let patches = patches.borrow();
    assert_eq!(patches.len(), 2);
    assert_eq!(patches[1].json.as_deref(), Some(editor.snapshot().as_str()));
    assert_eq!(patches[1].width, Some(900.0));
    assert_eq!(patches[1].height, Some(1200.0));
}

#[test]
fn persist_notifies_without_recording() {
    let count = Rc::new(RefCell::new(0));
    let mut editor = editor();
    {
        let count = Rc::clone(&count);
        editor.set_save_listener(move |_| *count.borrow_mut() += 1);
    }
    editor.persist();
    assert_eq!(*count.borrow(), 1);
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn selection_cleared_listener_fires_once_per_clear() {
    let cleared = Rc::new(RefCell::new(0));
    let mut editor = editor();
    {
        let cleared = Rc::clone(&cleared);
        editor.set_selection_cleared_listener(move || *cleared.borrow_mut() += 1);
    }
    editor.add_shape(ShapeKind::Circle);
    editor.clear_selection();
    editor.clear_selection();
    assert_eq!(*cleared.borrow(), 1);
    assert_eq!(editor.last_selection_event(), Some(&SelectionEvent::Cleared));
}

#[test]
fn teardown_drops_listeners_and_is_idempotent() {
    let count = Rc::new(RefCell::new(0));
    let mut editor = editor();
    {
        let count = Rc::clone(&count);
        editor.set_save_listener(move |_| *count.borrow_mut() += 1);
    }
    editor.teardown();
    editor.teardown();
    assert!(editor.is_torn_down());

    editor.add_shape(ShapeKind::Circle);
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn history_json_lists_actions() {
    let mut editor = editor();
    editor.add_shape(ShapeKind::Circle);
    assert_eq!(editor.get_history(), r#"["Initial State","Add Shape"]"#);
}

#[test]
fn select_all_skips_workspace() {
    let mut editor = editor();
    let a = editor.add_shape(ShapeKind::Circle);
    let b = editor.add_shape(ShapeKind::Rectangle);
    editor.select_all();
    assert_eq!(editor.selection(), &[a, b]);
    assert_eq!(editor.last_selection_event(), Some(&SelectionEvent::Updated(vec![a, b])));
}

#[test]
fn select_point_hits_and_shift_toggles() {
    let mut editor = editor();
    let key = editor.add_shape(ShapeKind::Circle);
    editor.clear_selection();

    // workspace center lands on the surface center after auto-zoom
    assert_eq!(editor.select_point(640.0, 360.0, false), vec![key]);
    assert_eq!(editor.select_point(640.0, 360.0, true), Vec::new());
    assert_eq!(editor.select_point(640.0, 360.0, true), vec![key]);
    assert_eq!(editor.select_point(5.0, 5.0, false), Vec::new());
}

#[test]
fn select_rect_collects_overlapping_objects() {
    let mut editor = editor();
    let a = editor.add_shape(ShapeKind::Circle);
    let b = editor.add_shape(ShapeKind::Diamond);
    editor.clear_selection();

    let selected = editor.select_rect(0.0, 0.0, 1280.0, 720.0, false);
    assert_eq!(selected, vec![a, b]);
    assert!(editor.select_rect(0.0, 0.0, 10.0, 10.0, false).is_empty());
}

#[test]
fn select_ignores_unknown_and_workspace_keys() {
    let mut editor = editor();
    let ws = editor.scene().workspace_key().unwrap();
    editor.select(&[ws, ObjectKey::from_raw(u64::MAX)]);
    assert!(editor.selection().is_empty());
}
