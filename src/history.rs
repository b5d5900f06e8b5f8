//! Linear undo/redo over full-document snapshots.
//!
//! The list is append-only except that recording a new snapshot after an
//! undo discards the redo branch. Restoring a snapshot replaces the whole
//! document, which itself produces scene events; those must not be recorded
//! or undo would overwrite the redo branch with the state it just restored.
//! Restores therefore run inside a batch: [`History::begin_batch`] hands out
//! a single [`BatchToken`], `save` is dropped while it is outstanding, and
//! moving the index requires presenting the token.

use serde::Serialize;

use crate::error::{EditorError, Result};

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

#[derive(Clone, Debug, Serialize)]
pub struct HistoryEntry {
    pub action: String,
    #[serde(skip)]
    pub snapshot: String,
}

/// Proof that a batch is open. Not `Clone`; consumed by `end_batch`.
#[derive(Debug)]
#[must_use = "an open batch suppresses every save until it is ended"]
pub struct BatchToken {
    id: u64,
}

#[derive(Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
    open_batch: Option<u64>,
    next_batch: u64,
}

impl History {
    /// History containing exactly one snapshot at index 0.
    pub fn new(initial: String) -> Self {
        let mut history = History::default();
        history.reset(initial);
        history
    }

    /// Discards everything and starts over from `snapshot`.
    pub fn reset(&mut self, snapshot: String) {
        self.entries.clear();
        self.entries.push(HistoryEntry { action: "Initial State".to_string(), snapshot });
        self.index = 0;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.index).map(|e| e.snapshot.as_str())
    }

    pub fn entry(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.snapshot.as_str())
    }

    pub fn actions(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.action.as_str()).collect()
    }

    pub fn in_batch(&self) -> bool {
        self.open_batch.is_some()
    }

    /// Records a snapshot. Returns `false` when dropped because a batch is
    /// open or the snapshot equals the current entry.
    pub fn save(&mut self, snapshot: String, action: &str) -> bool {
        if self.open_batch.is_some() {
            tracing::debug!(action, "history save skipped inside batch");
            return false;
        }
        if self.current() == Some(snapshot.as_str()) {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry { action: action.to_string(), snapshot });
        self.index = self.entries.len() - 1;
        tracing::debug!(action, index = self.index, "history saved");
        true
    }

    pub fn begin_batch(&mut self) -> Result<BatchToken> {
        if self.open_batch.is_some() {
            return Err(EditorError::BatchReentered);
        }
        let id = self.next_batch;
        self.next_batch += 1;
        self.open_batch = Some(id);
        Ok(BatchToken { id })
    }

    pub fn end_batch(&mut self, token: BatchToken) {
        debug_assert_eq!(self.open_batch, Some(token.id), "ended a batch that is not open");
        if self.open_batch == Some(token.id) {
            self.open_batch = None;
        }
    }

    /// Moves the index; only valid while `token`'s batch is open.
    pub fn seek(&mut self, token: &BatchToken, index: usize) -> Option<&str> {
        if self.open_batch != Some(token.id) || index >= self.entries.len() {
            return None;
        }
        self.index = index;
        self.entries.get(index).map(|e| e.snapshot.as_str())
    }
}
