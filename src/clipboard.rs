use crate::engine::Editor;
use crate::objects::SceneObject;
use crate::scene::ObjectKey;

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

/// Single copy slot. Holds owned clones so it survives document replaces
/// (undo, load) that invalidate every handle.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    objects: Vec<SceneObject>,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    fn replace(&mut self, objects: Vec<SceneObject>) {
        self.objects = objects;
    }

    /// Moves the slot so the next paste lands one step further along.
    fn advance(&mut self, dx: f64, dy: f64) {
        for object in &mut self.objects {
            object.translate(dx, dy);
        }
    }
}

impl Editor {
    /// Copies the active selection. No-op when nothing is selected.
    pub fn copy(&mut self) {
        let objects: Vec<SceneObject> = self
            .selection
            .keys()
            .iter()
            .filter_map(|&key| self.scene.get(key))
            .filter(|obj| !obj.is_workspace())
            .cloned()
            .collect();
        if objects.is_empty() {
            return;
        }
        tracing::debug!(count = objects.len(), "copied to clipboard");
        self.clipboard.replace(objects);
    }

    /// Inserts offset clones of the clipboard and selects them. Successive
    /// pastes cascade diagonally.
    pub fn paste(&mut self) -> Vec<ObjectKey> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let offset = self.config.paste_offset;
        self.clear_selection();

        let mut keys = Vec::with_capacity(self.clipboard.len());
        for object in self.clipboard.objects() {
            let mut clone = object.clone();
            clone.translate(offset, offset);
            keys.push(self.scene.add(clone));
        }
        self.clipboard.advance(offset, offset);
        self.select(&keys);
        self.commit("Paste");
        keys
    }
}
