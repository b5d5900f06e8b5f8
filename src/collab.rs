use std::cell::RefCell;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EditorConfig;
use crate::engine::Editor;
use crate::error::EditorError;
use crate::image_ops::{add_image, ImageLoader};
use crate::scene::ObjectKey;

#[cfg(test)]
#[path = "collab_test.rs"]
mod collab_test;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollabError {
    #[error("project not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("service error: {0}")]
    Service(String),
}

impl CollabError {
    /// HTTP status the project API answers with.
    pub fn status(&self) -> u16 {
        match self {
            CollabError::NotFound => 404,
            CollabError::Unauthorized => 401,
            CollabError::Service(_) => 500,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub json: String,
    pub width: f64,
    pub height: f64,
}

/// Partial project update; absent fields are left unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl ProjectRecord {
    pub fn apply(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(json) = patch.json {
            self.json = json;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
    }
}

pub trait ProjectStore {
    fn load(&self, id: &str) -> LocalBoxFuture<'_, Result<ProjectRecord, CollabError>>;
    /// Last write wins.
    fn save(&self, id: &str, patch: ProjectPatch) -> LocalBoxFuture<'_, Result<(), CollabError>>;
}

/// Reply from an image endpoint. `fallback` asks the caller to retry with
/// an in-browser model; the editor treats it as "no image".
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageReply {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub fallback: bool,
}

pub trait ImageService {
    fn remove_background(&self, src: &str) -> LocalBoxFuture<'_, Result<ImageReply, CollabError>>;
    fn generate(&self, prompt: &str) -> LocalBoxFuture<'_, Result<ImageReply, CollabError>>;
}

#[derive(Debug, Error)]
pub enum ServiceImageError {
    #[error(transparent)]
    Service(#[from] CollabError),

    #[error("service asked for a client-side fallback")]
    Fallback,

    #[error("service returned no image")]
    Empty,

    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// Opens a stored project: the workspace takes the project's size and the
/// saved JSON hydrates the document.
pub async fn open_project(
    store: &dyn ProjectStore,
    id: &str,
    mut config: EditorConfig,
) -> Result<Editor, CollabError> {
    let record = store.load(id).await?;
    if record.width > 0.0 && record.height > 0.0 {
        config.workspace_width = record.width;
        config.workspace_height = record.height;
    }
    let editor = if record.json.trim().is_empty() {
        Editor::new(config)
    } else {
        Editor::with_state(config, &record.json)
    };
    tracing::debug!(id, "project opened");
    Ok(editor)
}

/// Pushes the current document to the store.
pub async fn save_project(store: &dyn ProjectStore, id: &str, editor: &RefCell<Editor>) -> Result<(), CollabError> {
    let patch = editor.borrow().project_patch();
    store.save(id, patch).await
}

/// Feeds a service reply into the image factory.
pub async fn add_service_image(
    editor: &RefCell<Editor>,
    loader: &dyn ImageLoader,
    reply: Result<ImageReply, CollabError>,
) -> Result<ObjectKey, ServiceImageError> {
    let reply = reply?;
    if reply.fallback {
        return Err(ServiceImageError::Fallback);
    }
    let src = reply.image.ok_or(ServiceImageError::Empty)?;
    Ok(add_image(editor, loader, &src).await?)
}
