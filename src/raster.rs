use image::{Rgba, RgbaImage};
use kurbo::{BezPath, ParamCurveNearest, Point, Rect, Shape};

use crate::color::parse_color;
use crate::error::{EditorError, Result};
use crate::image_ops::filtered_pixels;
use crate::objects::{ObjectBody, SceneObject};

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

/// Largest raster export, in pixels (8K by 8K).
pub const MAX_EXPORT_PIXELS: usize = 8192 * 8192;

/// Premultiplied-free RGBA accumulation buffer in 0..1 floats.
struct Canvas {
    width: u32,
    height: u32,
    origin: Point,
    data: Vec<[f32; 4]>,
}

impl Canvas {
    fn new(region: Rect) -> Result<Self> {
        let (w, h) = (region.width().round().max(1.0), region.height().round().max(1.0));
        let too_large = || EditorError::Export(format!("{w}x{h} exceeds the {MAX_EXPORT_PIXELS} pixel export limit"));
        if !(w <= f64::from(u32::MAX) && h <= f64::from(u32::MAX)) {
            return Err(too_large());
        }
        let (width, height) = (w as u32, h as u32);
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n <= MAX_EXPORT_PIXELS)
            .ok_or_else(too_large)?;
        Ok(Canvas {
            width,
            height,
            origin: region.origin(),
            data: vec![[0.0; 4]; pixels],
        })
    }

    fn pixel_center(&self, x: u32, y: u32) -> Point {
        Point::new(self.origin.x + f64::from(x) + 0.5, self.origin.y + f64::from(y) + 0.5)
    }

    /// Pixel index range covering a scene-space rect, clamped to the canvas.
    fn span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = (rect.x0 - self.origin.x).floor().max(0.0) as u32;
        let y0 = (rect.y0 - self.origin.y).floor().max(0.0) as u32;
        let x1 = ((rect.x1 - self.origin.x).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((rect.y1 - self.origin.y).ceil().max(0.0) as u32).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba<u8>, opacity: f64) {
        let [r, g, b, a] = color.0.map(|c| f32::from(c) / 255.0);
        let src_a = a * opacity as f32;
        if src_a <= 0.0 {
            return;
        }
        let dst = &mut self.data[y as usize * self.width as usize + x as usize];
        let out_a = src_a + dst[3] * (1.0 - src_a);
        for (i, c) in [r, g, b].into_iter().enumerate() {
            dst[i] = if out_a > 0.0 { (c * src_a + dst[i] * dst[3] * (1.0 - src_a)) / out_a } else { 0.0 };
        }
        dst[3] = out_a;
    }

    fn into_image(self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width, self.height);
        for (px, src) in out.pixels_mut().zip(self.data) {
            *px = Rgba(src.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8));
        }
        out
    }
}

fn paint(value: Option<&str>) -> Option<Rgba<u8>> {
    let color = parse_color(value?)?;
    (color.0[3] > 0).then_some(color)
}

fn fill_outline(canvas: &mut Canvas, outline: &BezPath, color: Rgba<u8>, opacity: f64) {
    let Some((x0, y0, x1, y1)) = canvas.span(outline.bounding_box()) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            if outline.contains(canvas.pixel_center(x, y)) {
                canvas.blend(x, y, color, opacity);
            }
        }
    }
}

fn stroke_outline(canvas: &mut Canvas, outline: &BezPath, width: f64, color: Rgba<u8>, opacity: f64) {
    let half = width / 2.0;
    let Some((x0, y0, x1, y1)) = canvas.span(outline.bounding_box().inflate(half, half)) else {
        return;
    };
    let segments: Vec<_> = outline.segments().collect();
    let limit = half * half;
    for y in y0..y1 {
        for x in x0..x1 {
            let p = canvas.pixel_center(x, y);
            if segments.iter().any(|seg| seg.nearest(p, 0.1).distance_sq <= limit) {
                canvas.blend(x, y, color, opacity);
            }
        }
    }
}

fn draw_image(canvas: &mut Canvas, object: &SceneObject) {
    let Some(pixels) = object.image().and_then(filtered_pixels) else {
        return;
    };
    let (nw, nh) = pixels.dimensions();
    if nw == 0 || nh == 0 || object.width <= 0.0 || object.height <= 0.0 {
        return;
    }
    let to_local = object.world_transform().inverse();
    let Some((x0, y0, x1, y1)) = canvas.span(object.bounds()) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let local = to_local * canvas.pixel_center(x, y);
            if local.x < 0.0 || local.y < 0.0 || local.x >= object.width || local.y >= object.height {
                continue;
            }
            let sx = ((local.x / object.width) * f64::from(nw)) as u32;
            let sy = ((local.y / object.height) * f64::from(nh)) as u32;
            let src = *pixels.get_pixel(sx.min(nw - 1), sy.min(nh - 1));
            canvas.blend(x, y, src, object.opacity);
        }
    }
}

fn draw_object(canvas: &mut Canvas, object: &SceneObject) {
    match object.body {
        ObjectBody::Image(_) => return draw_image(canvas, object),
        ObjectBody::Textbox(_) => return,
        _ => {}
    }
    let outline = object.world_outline();
    // open freehand strokes are never filled
    if !matches!(object.body, ObjectBody::Path { .. }) {
        if let Some(fill) = paint(object.fill.as_deref()) {
            fill_outline(canvas, &outline, fill, object.opacity);
        }
    }
    if object.stroke_width > 0.0 {
        if let Some(stroke) = paint(object.stroke.as_deref()) {
            stroke_outline(canvas, &outline, object.scaled_stroke_width(), stroke, object.opacity);
        }
    }
}

/// Renders `objects` (back to front) into an image covering `region`.
/// Regions over [`MAX_EXPORT_PIXELS`] are rejected before allocating.
pub fn rasterize<'a>(region: Rect, objects: impl IntoIterator<Item = &'a SceneObject>) -> Result<RgbaImage> {
    let mut canvas = Canvas::new(region)?;
    for object in objects {
        draw_object(&mut canvas, object);
    }
    Ok(canvas.into_image())
}
