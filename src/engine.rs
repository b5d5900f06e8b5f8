use kurbo::Size;

use crate::clipboard::Clipboard;
use crate::collab::ProjectPatch;
use crate::config::EditorConfig;
use crate::error::Result;
use crate::history::History;
use crate::image_ops::ImageStore;
use crate::io::{self, DocumentFile};
use crate::objects::SceneObject;
use crate::scene::{ObjectKey, Scene};
use crate::selection::{Selection, SelectionEvent};
use crate::style::{Brush, StyleState};
use crate::viewport::Viewport;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Host callbacks. Both are optional; the editor works without listeners.
#[derive(Default)]
pub struct Listeners {
    /// Called after every recorded history snapshot.
    pub save: Option<Box<dyn FnMut(&ProjectPatch)>>,
    pub selection_cleared: Option<Box<dyn FnMut()>>,
}

/// One editing session over one document.
///
/// Every mutating command goes through [`Editor::commit`], which drains the
/// scene's change events and records at most one history snapshot per
/// command invocation.
pub struct Editor {
    pub(crate) config: EditorConfig,
    pub(crate) scene: Scene,
    pub(crate) style: StyleState,
    pub(crate) selection: Selection,
    pub(crate) clipboard: Clipboard,
    pub(crate) history: History,
    pub(crate) viewport: Viewport,
    pub(crate) brush: Option<Brush>,
    pub(crate) images: ImageStore,
    pub(crate) listeners: Listeners,
    pub(crate) last_selection_event: Option<SelectionEvent>,
    load_error: Option<String>,
    torn_down: bool,
}

impl Editor {
    /// Blank document: a workspace of the configured size centered on the
    /// surface.
    pub fn new(config: EditorConfig) -> Self {
        let scene = Scene::initialize(config.surface_size(), config.workspace_size(), &config.workspace_fill);
        Editor::from_scene(config, scene, ImageStore::default())
    }

    /// Hydrates a saved document. A document that fails to parse is logged
    /// and replaced by the blank one; the failure stays queryable through
    /// [`Editor::load_error`].
    pub fn with_state(config: EditorConfig, initial: &str) -> Self {
        let mut images = ImageStore::default();
        let parsed = io::parse_document(initial).and_then(|doc| doc.into_scene(config.surface_size(), &mut images));
        match parsed {
            Ok(scene) => Editor::from_scene(config, scene, images),
            Err(err) => {
                tracing::warn!(%err, "initial document rejected, starting from a blank workspace");
                let mut editor = Editor::new(config);
                editor.load_error = Some(err.to_string());
                editor
            }
        }
    }

    fn from_scene(config: EditorConfig, mut scene: Scene, images: ImageStore) -> Self {
        scene.drain_events();
        let mut editor = Editor {
            config,
            scene,
            style: StyleState::default(),
            selection: Selection::default(),
            clipboard: Clipboard::default(),
            history: History::default(),
            viewport: Viewport::default(),
            brush: None,
            images,
            listeners: Listeners::default(),
            last_selection_event: None,
            load_error: None,
            torn_down: false,
        };
        editor.auto_zoom();
        let snapshot = editor.snapshot();
        editor.history.reset(snapshot);
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn object(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.scene.get(key)
    }

    pub fn workspace(&self) -> Option<&SceneObject> {
        self.scene.workspace()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn last_selection_event(&self) -> Option<&SelectionEvent> {
        self.last_selection_event.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn set_save_listener(&mut self, listener: impl FnMut(&ProjectPatch) + 'static) {
        self.listeners.save = Some(Box::new(listener));
    }

    pub fn set_selection_cleared_listener(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.selection_cleared = Some(Box::new(listener));
    }

    /// Compact JSON of the current document, as stored in history.
    pub fn snapshot(&self) -> String {
        let doc = DocumentFile::from_scene(&self.scene);
        serde_json::to_string(&doc).unwrap_or_else(|err| {
            tracing::error!(%err, "snapshot serialization failed");
            String::new()
        })
    }

    /// Records one history entry if the scene changed since the last commit.
    pub(crate) fn commit(&mut self, action: &str) -> bool {
        if self.scene.drain_events().is_empty() {
            return false;
        }
        let snapshot = self.snapshot();
        if !self.history.save(snapshot, action) {
            return false;
        }
        self.notify_save();
        true
    }

    fn notify_save(&mut self) {
        if self.listeners.save.is_none() {
            return;
        }
        let patch = self.project_patch();
        if let Some(listener) = self.listeners.save.as_mut() {
            listener(&patch);
        }
    }

    /// Current document as a project update.
    pub fn project_patch(&self) -> ProjectPatch {
        let (width, height) = self.scene.workspace().map_or((0.0, 0.0), |ws| ws.scaled_size());
        ProjectPatch {
            name: None,
            json: Some(self.history.current().map_or_else(|| self.snapshot(), str::to_string)),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Pushes the current document to the save listener without recording
    /// history.
    pub fn persist(&mut self) {
        self.notify_save();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> Result<bool> {
        if !self.history.can_undo() {
            return Ok(false);
        }
        self.travel(self.history.index() - 1, "Undo")
    }

    pub fn redo(&mut self) -> Result<bool> {
        if !self.history.can_redo() {
            return Ok(false);
        }
        self.travel(self.history.index() + 1, "Redo")
    }

    /// Replaces the document with the snapshot at `index` while a batch is
    /// open, so the replacement itself is not recorded.
    fn travel(&mut self, index: usize, action: &str) -> Result<bool> {
        let Some(snapshot) = self.history.entry(index).map(str::to_string) else {
            return Ok(false);
        };
        let scene = io::parse_document(&snapshot)?.into_scene(self.scene.surface_size(), &mut self.images)?;

        let token = self.history.begin_batch()?;
        self.history.seek(&token, index);
        self.replace_scene(scene);
        self.commit(action);
        self.history.end_batch(token);
        tracing::debug!(action, index, "history moved");
        Ok(true)
    }

    /// Host-initiated load. The document is only replaced when `json`
    /// parses; the load is recorded so it can be undone.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let scene = io::parse_document(json)?.into_scene(self.scene.surface_size(), &mut self.images)?;
        self.replace_scene(scene);
        self.auto_zoom();
        self.commit("Load");
        Ok(())
    }

    fn replace_scene(&mut self, mut scene: Scene) {
        scene.set_surface_size(self.scene.surface_size());
        self.scene = scene;
        let event = self.selection.clear();
        self.emit_selection(event);
        self.viewport.clip = self.scene.workspace_bounds();
    }

    pub fn get_history(&self) -> String {
        serde_json::to_string(&self.history.actions()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn surface_size(&self) -> Size {
        self.scene.surface_size()
    }

    /// Fits the workspace to the surface. No-op without a workspace.
    pub fn auto_zoom(&mut self) -> f64 {
        let Some(bounds) = self.scene.workspace_bounds() else {
            return self.viewport.zoom();
        };
        self.viewport.auto_zoom(self.scene.surface_size(), bounds, &self.config)
    }

    /// Container resize: adopt the new surface size and refit.
    pub fn resize_surface(&mut self, width: f64, height: f64) -> f64 {
        self.scene.set_surface_size(Size::new(width, height));
        self.auto_zoom()
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.viewport.zoom_in(self.scene.surface_size(), &self.config)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.viewport.zoom_out(self.scene.surface_size(), &self.config)
    }

    /// Ends the session: aborts pending image loads and drops listeners.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let aborted = self.images.abort_all();
        tracing::debug!(aborted, "editor torn down");
        self.listeners = Listeners::default();
        self.torn_down = true;
    }
}
