use kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::types::WORKSPACE_FILL;

/// Fraction of the container the workspace occupies after auto-zoom.
pub const ZOOM_RATIO: f64 = 0.85;
pub const ZOOM_STEP: f64 = 0.05;
pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 1.0;
/// Diagonal offset applied to each paste.
pub const PASTE_OFFSET: f64 = 10.0;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub workspace_width: f64,
    pub workspace_height: f64,
    pub workspace_fill: String,
    pub surface_width: f64,
    pub surface_height: f64,
    pub zoom_ratio: f64,
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub paste_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            workspace_width: 900.0,
            workspace_height: 1200.0,
            workspace_fill: WORKSPACE_FILL.to_string(),
            surface_width: 1280.0,
            surface_height: 720.0,
            zoom_ratio: ZOOM_RATIO,
            zoom_step: ZOOM_STEP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            paste_offset: PASTE_OFFSET,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn surface_size(&self) -> Size {
        Size::new(self.surface_width, self.surface_height)
    }

    pub fn workspace_size(&self) -> Size {
        Size::new(self.workspace_width, self.workspace_height)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.workspace_width > 0.0 && self.workspace_height > 0.0) {
            return Err(EditorError::Config("workspace size must be positive".into()));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(EditorError::Config(format!(
                "zoom range [{}, {}] is empty",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_ratio > 0.0 && self.zoom_ratio <= 1.0) {
            return Err(EditorError::Config("zoom ratio must be in (0, 1]".into()));
        }
        Ok(())
    }
}
