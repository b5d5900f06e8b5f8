use kurbo::{Point, Rect, Size};
use slotmap::{new_key_type, Key, KeyData, SlotMap};

use crate::objects::SceneObject;

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

new_key_type! {
    pub struct ObjectKey;
}

impl ObjectKey {
    /// Stable numeric form handed to the host page.
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    pub fn from_raw(raw: u64) -> Self {
        ObjectKey::from(KeyData::from_ffi(raw))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SceneEvent {
    Added(ObjectKey),
    Removed(ObjectKey),
    Modified(ObjectKey),
    Reordered,
    Cleared,
}

pub struct Scene {
    objects: SlotMap<ObjectKey, SceneObject>,
    order: Vec<ObjectKey>,
    workspace: Option<ObjectKey>,
    surface: Size,
    events: Vec<SceneEvent>,
}

impl Scene {
    /// Empty scene on a surface of the given size, with no workspace.
    pub fn empty(surface: Size) -> Self {
        Scene {
            objects: SlotMap::with_key(),
            order: Vec::new(),
            workspace: None,
            surface,
            events: Vec::new(),
        }
    }

    /// Creates the surface and inserts a workspace centered within it.
    pub fn initialize(surface: Size, workspace: Size, fill: &str) -> Self {
        let mut scene = Scene::empty(surface);
        let mut page = SceneObject::workspace(workspace.width, workspace.height, fill);
        page.set_center(Point::new(surface.width / 2.0, surface.height / 2.0));
        scene.add(page);
        scene
    }

    pub fn surface_size(&self) -> Size {
        self.surface
    }

    pub fn set_surface_size(&mut self, size: Size) {
        self.surface = size;
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains_key(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    pub fn workspace_key(&self) -> Option<ObjectKey> {
        self.workspace
    }

    pub fn workspace(&self) -> Option<&SceneObject> {
        self.workspace.and_then(|key| self.objects.get(key))
    }

    pub fn workspace_bounds(&self) -> Option<Rect> {
        self.workspace().map(|ws| {
            let (w, h) = ws.scaled_size();
            Rect::new(ws.left, ws.top, ws.left + w, ws.top + h)
        })
    }

    /// Objects back to front, workspace included.
    pub fn ordered(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> + '_ {
        self.order.iter().filter_map(move |&key| self.objects.get(key).map(|obj| (key, obj)))
    }

    pub fn keys(&self) -> &[ObjectKey] {
        &self.order
    }

    pub fn z_index(&self, key: ObjectKey) -> Option<usize> {
        self.order.iter().position(|&k| k == key)
    }

    /// Appends an object at the top of the stack. A workspace-tagged object
    /// becomes the workspace when none exists yet; otherwise it is demoted to
    /// an ordinary object so the scene never holds two.
    pub fn add(&mut self, mut object: SceneObject) -> ObjectKey {
        let becomes_workspace = object.is_workspace() && self.workspace.is_none();
        if object.is_workspace() && !becomes_workspace {
            tracing::warn!("dropping duplicate workspace tag from added object");
            object.name = None;
            object.selectable = true;
            object.has_controls = true;
        }
        let key = self.objects.insert(object);
        if becomes_workspace {
            self.workspace = Some(key);
            self.order.insert(0, key);
        } else {
            self.order.push(key);
        }
        self.events.push(SceneEvent::Added(key));
        key
    }

    /// Removes an object. The workspace cannot be removed individually.
    pub fn remove(&mut self, key: ObjectKey) -> Option<SceneObject> {
        if Some(key) == self.workspace {
            return None;
        }
        let object = self.objects.remove(key)?;
        self.order.retain(|&k| k != key);
        self.events.push(SceneEvent::Removed(key));
        Some(object)
    }

    /// Applies `f` to an object and records a modification.
    pub fn modify<R>(&mut self, key: ObjectKey, f: impl FnOnce(&mut SceneObject) -> R) -> Option<R> {
        let object = self.objects.get_mut(key)?;
        let result = f(object);
        self.events.push(SceneEvent::Modified(key));
        Some(result)
    }

    /// Drops every object, workspace included. Used for full replaces.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.order.clear();
        self.workspace = None;
        self.events.push(SceneEvent::Cleared);
    }

    /// Moves an object so its center sits on the workspace center.
    pub fn center(&mut self, key: ObjectKey) {
        let Some(center) = self.workspace().map(|ws| ws.center_point()) else {
            return;
        };
        if let Some(object) = self.objects.get_mut(key) {
            object.set_center(center);
        }
    }

    pub fn bring_forward(&mut self, key: ObjectKey) -> bool {
        match self.z_index(key) {
            Some(pos) if pos + 1 < self.order.len() => {
                self.order.swap(pos, pos + 1);
                self.events.push(SceneEvent::Reordered);
                true
            }
            _ => false,
        }
    }

    pub fn send_backwards(&mut self, key: ObjectKey) -> bool {
        match self.z_index(key) {
            Some(pos) if pos > 0 => {
                self.order.swap(pos, pos - 1);
                self.events.push(SceneEvent::Reordered);
                true
            }
            _ => false,
        }
    }

    pub fn send_workspace_to_back(&mut self) {
        let Some(key) = self.workspace else {
            return;
        };
        if let Some(pos) = self.z_index(key) {
            if pos != 0 {
                let key = self.order.remove(pos);
                self.order.insert(0, key);
            }
        }
    }

    /// Top-most selectable object under a scene-space point.
    pub fn hit_test(&self, point: Point) -> Option<ObjectKey> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&key| self.objects.get(key).map_or(false, |obj| obj.selectable && obj.contains(point)))
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}
