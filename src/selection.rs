use kurbo::{Point, Rect};

use crate::engine::Editor;
use crate::scene::{ObjectKey, Scene};

/// What changed in the active selection, mirroring the canvas's
/// created/updated/cleared notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    Created(Vec<ObjectKey>),
    Updated(Vec<ObjectKey>),
    Cleared,
}

/// Handles of the active objects, in selection order.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    keys: Vec<ObjectKey>,
}

impl Selection {
    pub fn keys(&self) -> &[ObjectKey] {
        &self.keys
    }

    pub fn first(&self) -> Option<ObjectKey> {
        self.keys.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.keys.contains(&key)
    }

    /// Replaces the selection, dropping unknown and non-selectable keys.
    pub(crate) fn set(&mut self, scene: &Scene, keys: &[ObjectKey]) -> Option<SelectionEvent> {
        let was_empty = self.keys.is_empty();
        let mut next: Vec<ObjectKey> = Vec::with_capacity(keys.len());
        for &key in keys {
            let selectable = scene.get(key).map_or(false, |obj| obj.selectable);
            if selectable && !next.contains(&key) {
                next.push(key);
            }
        }
        if next == self.keys {
            return None;
        }
        self.keys = next;
        Some(match (was_empty, self.keys.is_empty()) {
            (_, true) => SelectionEvent::Cleared,
            (true, false) => SelectionEvent::Created(self.keys.clone()),
            (false, false) => SelectionEvent::Updated(self.keys.clone()),
        })
    }

    pub(crate) fn clear(&mut self) -> Option<SelectionEvent> {
        if self.keys.is_empty() {
            return None;
        }
        self.keys.clear();
        Some(SelectionEvent::Cleared)
    }

    /// Drops handles whose objects no longer exist.
    pub(crate) fn retain_live(&mut self, scene: &Scene) -> Option<SelectionEvent> {
        let before = self.keys.len();
        self.keys.retain(|&key| scene.contains_key(key));
        if before > 0 && self.keys.is_empty() {
            Some(SelectionEvent::Cleared)
        } else {
            None
        }
    }
}

impl Editor {
    pub fn selection(&self) -> &[ObjectKey] {
        self.selection.keys()
    }

    pub fn select(&mut self, keys: &[ObjectKey]) {
        let event = self.selection.set(&self.scene, keys);
        self.emit_selection(event);
    }

    pub fn clear_selection(&mut self) {
        let event = self.selection.clear();
        self.emit_selection(event);
    }

    /// Selects every selectable object; the workspace is never included.
    pub fn select_all(&mut self) {
        let keys: Vec<ObjectKey> = self
            .scene
            .ordered()
            .filter(|(_, obj)| obj.selectable)
            .map(|(key, _)| key)
            .collect();
        self.select(&keys);
    }

    /// Click selection at a surface-pixel position. With `shift` the hit
    /// object is toggled in the current selection.
    pub fn select_point(&mut self, sx: f64, sy: f64, shift: bool) -> Vec<ObjectKey> {
        let world = self.viewport.screen_to_world(Point::new(sx, sy));
        let hit = self.scene.hit_test(world);

        let mut keys: Vec<ObjectKey> = if shift { self.selection.keys().to_vec() } else { Vec::new() };
        if let Some(key) = hit {
            if let Some(pos) = keys.iter().position(|&k| k == key) {
                if shift {
                    keys.remove(pos);
                }
            } else {
                keys.push(key);
            }
        }
        self.select(&keys);
        self.selection.keys().to_vec()
    }

    /// Marquee selection between two surface-pixel corners.
    pub fn select_rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, shift: bool) -> Vec<ObjectKey> {
        let a = self.viewport.screen_to_world(Point::new(x1, y1));
        let b = self.viewport.screen_to_world(Point::new(x2, y2));
        let marquee = Rect::from_points(a, b);

        let mut keys: Vec<ObjectKey> = if shift { self.selection.keys().to_vec() } else { Vec::new() };
        for (key, obj) in self.scene.ordered() {
            if !obj.selectable {
                continue;
            }
            let bounds = obj.bounds();
            let overlaps = bounds.x0 < marquee.x1 && bounds.x1 > marquee.x0 && bounds.y0 < marquee.y1 && bounds.y1 > marquee.y0;
            if overlaps && !keys.contains(&key) {
                keys.push(key);
            }
        }
        self.select(&keys);
        self.selection.keys().to_vec()
    }

    pub(crate) fn emit_selection(&mut self, event: Option<SelectionEvent>) {
        let Some(event) = event else {
            return;
        };
        tracing::trace!(?event, "selection changed");
        if event == SelectionEvent::Cleared {
            if let Some(callback) = self.listeners.selection_cleared.as_mut() {
                callback();
            }
        }
        self.last_selection_event = Some(event);
    }
}
