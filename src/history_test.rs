use super::*;

fn snap(n: u32) -> String {
    format!("{{\"objects\":[{n}]}}")
}

#[test]
fn new_history_has_one_entry_and_cannot_move() {
    let history = History::new(snap(0));
    assert_eq!(history.len(), 1);
    assert_eq!(history.index(), 0);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn save_appends_and_moves_to_end() {
    let mut history = History::new(snap(0));
    assert!(history.save(snap(1), "Add"));
    assert!(history.save(snap(2), "Add"));
    assert_eq!(history.len(), 3);
    assert_eq!(history.index(), 2);
    assert!(history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.actions(), vec!["Initial State", "Add", "Add"]);
}

#[test]
fn identical_snapshot_is_not_recorded() {
    let mut history = History::new(snap(0));
    assert!(!history.save(snap(0), "Noop"));
    assert_eq!(history.len(), 1);
}

#[test]
fn save_inside_batch_is_dropped() {
    let mut history = History::new(snap(0));
    let token = history.begin_batch().unwrap();
    assert!(history.in_batch());
    assert!(!history.save(snap(1), "Restore"));
    history.end_batch(token);
    assert_eq!(history.len(), 1);
    assert!(history.save(snap(1), "Add"));
}

#[test]
fn nested_batch_is_rejected() {
    let mut history = History::new(snap(0));
    let token = history.begin_batch().unwrap();
    assert!(matches!(history.begin_batch(), Err(EditorError::BatchReentered)));
    history.end_batch(token);
    let again = history.begin_batch().unwrap();
    history.end_batch(again);
}

#[test]
fn seek_requires_open_batch() {
    let mut history = History::new(snap(0));
    history.save(snap(1), "Add");

    let token = history.begin_batch().unwrap();
    assert_eq!(history.seek(&token, 0), Some(snap(0).as_str()));
    assert_eq!(history.seek(&token, 5), None);
    history.end_batch(token);
    assert_eq!(history.index(), 0);

    let stale = history.begin_batch().unwrap();
    history.end_batch(BatchToken { id: stale.id });
    assert_eq!(history.seek(&stale, 1), None);
    assert_eq!(history.index(), 0);
}

#[test]
fn new_save_after_seek_back_truncates_redo_branch() {
    let mut history = History::new(snap(0));
    history.save(snap(1), "Add");
    history.save(snap(2), "Add");

    let token = history.begin_batch().unwrap();
    history.seek(&token, 1);
    history.end_batch(token);
    assert!(history.can_redo());

    history.save(snap(3), "Fill");
    assert!(!history.can_redo());
    assert_eq!(history.len(), 3);
    assert_eq!(history.current(), Some(snap(3).as_str()));
    assert_eq!(history.entry(2), Some(snap(3).as_str()));
}

#[test]
fn reset_discards_prior_history() {
    let mut history = History::new(snap(0));
    history.save(snap(1), "Add");
    history.reset(snap(9));
    assert_eq!(history.len(), 1);
    assert_eq!(history.index(), 0);
    assert!(!history.can_undo());
    assert_eq!(history.current(), Some(snap(9).as_str()));
}
