use kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::engine::Editor;
use crate::error::{EditorError, Result};
use crate::image_ops::ImageStore;
use crate::objects::SceneObject;
use crate::scene::Scene;
use crate::types::WORKSPACE_FILL;

#[cfg(test)]
#[path = "io_test.rs"]
mod io_test;

pub const DOCUMENT_VERSION: u32 = 1;

fn document_version() -> u32 {
    DOCUMENT_VERSION
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DocumentFile {
    #[serde(default = "document_version")]
    pub version: u32,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

pub fn parse_document(json: &str) -> Result<DocumentFile> {
    let doc: DocumentFile = serde_json::from_str(json)?;
    if doc.version > DOCUMENT_VERSION {
        tracing::warn!(version = doc.version, "document written by a newer editor");
    }
    Ok(doc)
}

impl DocumentFile {
    pub fn from_scene(scene: &Scene) -> Self {
        let (width, height) = scene.workspace().map_or((0.0, 0.0), |ws| ws.scaled_size());
        DocumentFile {
            version: DOCUMENT_VERSION,
            width,
            height,
            background: scene.workspace().and_then(|ws| ws.fill.clone()),
            objects: scene.ordered().map(|(_, obj)| obj.clone()).collect(),
        }
    }

    /// Builds a scene on a surface of the given size. Documents without a
    /// workspace entry get one synthesized from `width`/`height`; a document
    /// with neither is rejected.
    pub fn into_scene(self, surface: Size, images: &mut ImageStore) -> Result<Scene> {
        let has_workspace = self.objects.iter().any(SceneObject::is_workspace);
        let mut scene = if has_workspace {
            Scene::empty(surface)
        } else if self.width > 0.0 && self.height > 0.0 {
            let fill = self.background.as_deref().unwrap_or(WORKSPACE_FILL);
            Scene::initialize(surface, Size::new(self.width, self.height), fill)
        } else {
            return Err(EditorError::MissingWorkspace);
        };

        for mut object in self.objects {
            images.hydrate(&mut object);
            scene.add(object);
        }
        tracing::debug!(objects = scene.len(), "document loaded");
        Ok(scene)
    }
}

/// JSON with tab indentation, as written by the save-as-file action.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(out).map_err(|e| EditorError::Export(e.to_string()))
}

impl Editor {
    pub fn export_json(&self) -> Result<String> {
        to_pretty_json(&DocumentFile::from_scene(&self.scene))
    }

    pub fn get_objects_json(&self) -> String {
        let objects: Vec<serde_json::Value> = self
            .scene
            .ordered()
            .filter_map(|(key, obj)| {
                let mut value = serde_json::to_value(obj).ok()?;
                value.as_object_mut()?.insert("id".to_string(), key.to_raw().into());
                Some(value)
            })
            .collect();
        serde_json::to_string(&objects).unwrap_or_else(|_| "[]".to_string())
    }
}
