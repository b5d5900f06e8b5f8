use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use kurbo::Rect;
use serde::Serialize;

use crate::engine::Editor;
use crate::error::{EditorError, Result};
use crate::raster::rasterize;
use crate::svg::export_svg;
use crate::types::ExportFormat;

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

const JPEG_QUALITY: u8 = 92;

/// A downloadable file produced by an export.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub width: f64,
    pub height: f64,
    pub data_url: String,
}

fn data_url(format: ExportFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime(), general_purpose::STANDARD.encode(bytes))
}

fn encode(image: RgbaImage, format: ExportFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let dynamic = DynamicImage::ImageRgba8(image);
    match format {
        ExportFormat::Png => dynamic.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?,
        ExportFormat::Jpg => {
            let rgb = DynamicImage::ImageRgb8(dynamic.to_rgb8());
            rgb.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Jpeg(JPEG_QUALITY))?
        }
        other => return Err(EditorError::Export(format!("{} is not a raster format", other.extension()))),
    }
    Ok(bytes)
}

impl Editor {
    fn export_region(&self) -> Result<Rect> {
        self.scene.workspace_bounds().ok_or(EditorError::MissingWorkspace)
    }

    /// Runs `f` with the viewport reset to identity, then refits.
    fn with_identity_viewport<T>(&mut self, f: impl FnOnce(&Self) -> T) -> T {
        self.viewport.reset();
        let out = f(self);
        self.auto_zoom();
        out
    }

    /// Workspace rendered to pixels. JPEG output drops the alpha channel.
    pub fn export_raster(&mut self, format: ExportFormat) -> Result<Vec<u8>> {
        let region = self.export_region()?;
        let image = self.with_identity_viewport(|editor| rasterize(region, editor.scene.ordered().map(|(_, obj)| obj)))?;
        encode(image, format)
    }

    pub fn export_svg(&mut self) -> Result<String> {
        let region = self.export_region()?;
        Ok(self.with_identity_viewport(|editor| {
            let background = editor.scene.workspace().and_then(|ws| ws.fill.as_deref());
            export_svg(region, background, editor.scene.ordered().map(|(_, obj)| obj))
        }))
    }

    pub fn export(&mut self, format: ExportFormat) -> Result<Artifact> {
        let region = self.export_region()?;
        let bytes = match format {
            ExportFormat::Png | ExportFormat::Jpg => self.export_raster(format)?,
            ExportFormat::Svg => self.export_svg()?.into_bytes(),
            ExportFormat::Json => self.export_json()?.into_bytes(),
        };
        tracing::debug!(format = format.extension(), bytes = bytes.len(), "exported");
        Ok(Artifact {
            format,
            file_name: format!("untitled.{}", format.extension()),
            width: region.width(),
            height: region.height(),
            data_url: data_url(format, &bytes),
        })
    }
}
