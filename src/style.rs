use serde::{Deserialize, Serialize};

use crate::types::{FILL_COLOR, FONT_FAMILY, STROKE_COLOR, STROKE_DASH_ARRAY, STROKE_WIDTH};

/// "Current" style values that seed newly created objects.
///
/// Owned by one editor session; toolbars write it directly and setters
/// write it alongside the selection so new objects pick up the last choice.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyleState {
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub stroke_dash_array: Vec<f64>,
    pub font_family: String,
}

impl Default for StyleState {
    fn default() -> Self {
        StyleState {
            fill_color: FILL_COLOR.to_string(),
            stroke_color: STROKE_COLOR.to_string(),
            stroke_width: STROKE_WIDTH,
            stroke_dash_array: STROKE_DASH_ARRAY.to_vec(),
            font_family: FONT_FAMILY.to_string(),
        }
    }
}

/// Freehand brush settings, mirrored from the stroke style.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Brush {
    pub width: f64,
    pub color: String,
}

impl Brush {
    pub fn from_style(style: &StyleState) -> Self {
        Brush { width: style.stroke_width, color: style.stroke_color.clone() }
    }
}
