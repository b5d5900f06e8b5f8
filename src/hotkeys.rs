use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::commands::Command;
use crate::engine::Editor;
use crate::error::Result;

#[cfg(test)]
#[path = "hotkeys_test.rs"]
mod hotkeys_test;

/// Keyboard event as reported by the host page.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: String,
    pub ctrl_key: bool,
    pub meta_key: bool,
    /// Tag name of the focused element, e.g. `INPUT`.
    pub target: Option<String>,
}

impl KeyEvent {
    fn typing(&self) -> bool {
        self.target
            .as_deref()
            .map_or(false, |tag| tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea"))
    }
}

/// Maps a key chord to an editor command. Keys typed into form fields are
/// ignored.
pub fn resolve(event: &KeyEvent) -> Option<Command> {
    if event.typing() {
        return None;
    }
    if event.key == "Backspace" {
        return Some(Command::Delete);
    }
    if !(event.ctrl_key || event.meta_key) {
        return None;
    }
    let command = match event.key.to_ascii_lowercase().as_str() {
        "z" => Command::Undo,
        "y" => Command::Redo,
        "=" | "+" => Command::ZoomIn,
        "-" => Command::ZoomOut,
        "0" => Command::AutoZoom,
        "c" => Command::Copy,
        "v" => Command::Paste,
        "s" => Command::Persist,
        "a" => Command::SelectAll,
        _ => return None,
    };
    Some(command)
}

impl Editor {
    /// Handles a key event. Returns `None` when the chord is not bound.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<Option<Value>> {
        let Some(command) = resolve(event) else {
            return Ok(None);
        };
        tracing::trace!(key = %event.key, "hotkey");
        self.execute(command).map(Some)
    }
}
