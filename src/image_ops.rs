use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use base64::{engine::general_purpose, Engine as _};
use futures::future::{self, AbortHandle, AbortRegistration, Abortable, Aborted, FutureExt, LocalBoxFuture};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::engine::Editor;
use crate::error::{EditorError, Result};
use crate::objects::{ImageContent, ObjectBody, SceneObject};
use crate::scene::ObjectKey;
use crate::types::ImageFilter;

#[cfg(test)]
#[path = "image_ops_test.rs"]
mod image_ops_test;

/// Source of decoded bitmaps.
pub trait ImageLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, Result<RgbaImage>>;
}

/// Decodes `data:` URLs in place. Used natively and for inlined images.
pub struct DataUrlLoader;

impl ImageLoader for DataUrlLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, Result<RgbaImage>> {
        future::ready(decode_data_url(src)).boxed_local()
    }
}

/// Shortened source for logs and errors; data URLs can be megabytes long.
pub(crate) fn short_src(src: &str) -> String {
    const MAX: usize = 48;
    match src.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &src[..idx]),
        None => src.to_string(),
    }
}

pub fn decode_data_url(src: &str) -> Result<RgbaImage> {
    let fail = |reason: &str| EditorError::ImageLoad { src: short_src(src), reason: reason.to_string() };

    let (meta, payload) = src
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| fail("not a data url"))?;
    if !meta.ends_with(";base64") {
        return Err(fail("only base64 data urls are supported"));
    }
    let bytes = general_purpose::STANDARD.decode(payload.trim()).map_err(|e| fail(&e.to_string()))?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| fail(&e.to_string()))?;
    Ok(decoded.to_rgba8())
}

/// Claim on an in-flight load.
#[derive(Debug)]
pub struct LoadTicket {
    id: u64,
    src: String,
}

impl LoadTicket {
    pub fn src(&self) -> &str {
        &self.src
    }
}

/// Decoded bitmaps by source, plus abort handles of pending loads.
#[derive(Default)]
pub struct ImageStore {
    cache: HashMap<String, Rc<RgbaImage>>,
    pending: HashMap<u64, AbortHandle>,
    next_ticket: u64,
}

impl ImageStore {
    pub fn get(&self, src: &str) -> Option<Rc<RgbaImage>> {
        self.cache.get(src).cloned()
    }

    pub fn insert(&mut self, src: &str, pixels: RgbaImage) -> Rc<RgbaImage> {
        let pixels = Rc::new(pixels);
        self.cache.insert(src.to_string(), Rc::clone(&pixels));
        pixels
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Reattaches decoded pixels to a deserialized image object. Inline
    /// data URLs are decoded on the spot; remote sources stay empty until
    /// loaded again.
    pub fn hydrate(&mut self, object: &mut SceneObject) {
        let Some(image) = object.image_mut() else {
            return;
        };
        if image.pixels.is_some() {
            return;
        }
        if let Some(pixels) = self.cache.get(&image.src) {
            image.pixels = Some(Rc::clone(pixels));
            return;
        }
        if image.src.starts_with("data:") {
            match decode_data_url(&image.src) {
                Ok(pixels) => image.pixels = Some(self.insert(&image.src, pixels)),
                Err(err) => tracing::warn!(%err, "inline image could not be decoded"),
            }
        }
    }

    fn register(&mut self, src: &str) -> (LoadTicket, AbortRegistration) {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending.insert(id, handle);
        (LoadTicket { id, src: src.to_string() }, registration)
    }

    /// Returns whether the ticket was still pending.
    fn settle(&mut self, ticket: &LoadTicket) -> bool {
        self.pending.remove(&ticket.id).is_some()
    }

    pub fn abort_all(&mut self) -> usize {
        let count = self.pending.len();
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
        count
    }
}

impl Editor {
    pub fn begin_image_load(&mut self, src: &str) -> Result<(LoadTicket, AbortRegistration)> {
        if self.is_torn_down() {
            return Err(EditorError::ImageLoadCancelled(short_src(src)));
        }
        tracing::debug!(src = %short_src(src), "image load started");
        Ok(self.images.register(src))
    }

    /// Settles a load. Nothing is inserted when the load failed, was
    /// aborted, or the session ended while it was in flight.
    pub fn finish_image_load(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<Result<RgbaImage>, Aborted>,
    ) -> Result<ObjectKey> {
        let was_pending = self.images.settle(&ticket);
        let pixels = match result {
            Err(Aborted) => return Err(EditorError::ImageLoadCancelled(short_src(&ticket.src))),
            Ok(Err(err)) => {
                tracing::warn!(%err, "image load failed");
                return Err(err);
            }
            Ok(Ok(pixels)) => pixels,
        };
        if !was_pending || self.is_torn_down() {
            return Err(EditorError::ImageLoadCancelled(short_src(&ticket.src)));
        }
        self.insert_image(&ticket.src, pixels)
    }

    /// Adds a decoded image stretched to the workspace on each axis.
    pub(crate) fn insert_image(&mut self, src: &str, pixels: RgbaImage) -> Result<ObjectKey> {
        let (ww, wh) = self.scene.workspace().ok_or(EditorError::MissingWorkspace)?.scaled_size();
        let (nw, nh) = pixels.dimensions();
        if nw == 0 || nh == 0 {
            return Err(EditorError::ImageLoad { src: short_src(src), reason: "image has no pixels".into() });
        }

        let pixels = self.images.insert(src, pixels);
        let content = ImageContent {
            src: src.to_string(),
            filter: None,
            cross_origin: Some("anonymous".to_string()),
            pixels: Some(pixels),
        };
        let mut object = SceneObject::new(ObjectBody::Image(content), f64::from(nw), f64::from(nh));
        object.scale_x = ww / f64::from(nw);
        object.scale_y = wh / f64::from(nh);

        let key = self.add_and_select(object);
        self.commit("Add Image");
        Ok(key)
    }
}

/// Loads `src` and inserts it as an image object.
pub async fn add_image(editor: &RefCell<Editor>, loader: &dyn ImageLoader, src: &str) -> Result<ObjectKey> {
    let (ticket, registration) = editor.borrow_mut().begin_image_load(src)?;
    let result = Abortable::new(loader.load(src), registration).await;
    editor.borrow_mut().finish_image_load(ticket, result)
}

type ColorMatrix = [f32; 20];

const SEPIA: ColorMatrix = [
    0.393, 0.769, 0.189, 0.0, 0.0, //
    0.349, 0.686, 0.168, 0.0, 0.0, //
    0.272, 0.534, 0.131, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

const BROWNIE: ColorMatrix = [
    0.59970, 0.34553, -0.27082, 0.0, 0.186, //
    -0.03770, 0.86095, 0.15059, 0.0, -0.1449, //
    0.24113, -0.07441, 0.44972, 0.0, -0.02965, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

const VINTAGE: ColorMatrix = [
    0.62793, 0.32021, -0.03965, 0.0, 0.03784, //
    0.02578, 0.64411, 0.03259, 0.0, 0.02926, //
    0.04660, -0.08512, 0.52416, 0.0, 0.02023, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

const KODACHROME: ColorMatrix = [
    1.12855, -0.39673, -0.03992, 0.0, 0.24991, //
    -0.16404, 1.08352, -0.05498, 0.0, 0.09698, //
    -0.16786, -0.56034, 1.60148, 0.0, 0.13972, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

const TECHNICOLOR: ColorMatrix = [
    1.91252, -0.85453, -0.09155, 0.0, 0.04624, //
    -0.30878, 1.76589, -0.10601, 0.0, -0.27589, //
    -0.23110, -0.75018, 1.84759, 0.0, 0.12137, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

const POLAROID: ColorMatrix = [
    1.438, -0.062, -0.062, 0.0, 0.0, //
    -0.122, 1.378, -0.122, 0.0, 0.0, //
    -0.016, -0.016, 1.483, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0,
];

/// Row-major 4x5 matrix; the last column is an offset in 0..1 units.
fn color_matrix(pixels: &RgbaImage, m: &ColorMatrix) -> RgbaImage {
    let mut out = pixels.clone();
    for px in out.pixels_mut() {
        let [r, g, b, a] = px.0.map(|c| f32::from(c) / 255.0);
        let row = |i: usize| m[i] * r + m[i + 1] * g + m[i + 2] * b + m[i + 3] * a + m[i + 4];
        *px = Rgba([unit_to_u8(row(0)), unit_to_u8(row(5)), unit_to_u8(row(10)), unit_to_u8(row(15))]);
    }
    out
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn saturation_matrix(amount: f32) -> ColorMatrix {
    let (lr, lg, lb) = (0.2126 * (1.0 - amount), 0.7152 * (1.0 - amount), 0.0722 * (1.0 - amount));
    [
        lr + amount, lg, lb, 0.0, 0.0, //
        lr, lg + amount, lb, 0.0, 0.0, //
        lr, lg, lb + amount, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn luma(px: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = px.0;
    (0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)).round() as u8
}

fn map_pixels(pixels: &RgbaImage, f: impl Fn(&Rgba<u8>) -> Rgba<u8>) -> RgbaImage {
    let mut out = pixels.clone();
    for px in out.pixels_mut() {
        *px = f(px);
    }
    out
}

fn pixelate(pixels: &RgbaImage, block: u32) -> RgbaImage {
    let (w, h) = pixels.dimensions();
    let small = imageops::resize(pixels, (w / block).max(1), (h / block).max(1), FilterType::Nearest);
    imageops::resize(&small, w, h, FilterType::Nearest)
}

/// Applies a named filter to a copy of `pixels`.
pub fn apply_filter(pixels: &RgbaImage, filter: ImageFilter) -> RgbaImage {
    match filter {
        ImageFilter::Polaroid => color_matrix(pixels, &POLAROID),
        ImageFilter::Sepia => color_matrix(pixels, &SEPIA),
        ImageFilter::Kodachrome => color_matrix(pixels, &KODACHROME),
        ImageFilter::Brownie => color_matrix(pixels, &BROWNIE),
        ImageFilter::Vintage => color_matrix(pixels, &VINTAGE),
        ImageFilter::Technicolor => color_matrix(pixels, &TECHNICOLOR),
        ImageFilter::Contrast => imageops::contrast(pixels, 30.0),
        ImageFilter::Brightness => imageops::brighten(pixels, 25),
        ImageFilter::Greyscale => map_pixels(pixels, |px| {
            let l = luma(px);
            Rgba([l, l, l, px.0[3]])
        }),
        ImageFilter::BlackWhite => map_pixels(pixels, |px| {
            let l = if luma(px) >= 128 { 255 } else { 0 };
            Rgba([l, l, l, px.0[3]])
        }),
        ImageFilter::Pixelate => pixelate(pixels, 8),
        ImageFilter::Invert => {
            let mut out = pixels.clone();
            imageops::invert(&mut out);
            out
        }
        ImageFilter::Blur => imageops::blur(pixels, 2.0),
        ImageFilter::Sharpen => imageops::filter3x3(pixels, &[0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0]),
        ImageFilter::Emboss => imageops::filter3x3(pixels, &[-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0]),
        ImageFilter::RemoveColor => color_matrix(pixels, &saturation_matrix(0.2)),
        ImageFilter::Vibrance => color_matrix(pixels, &saturation_matrix(1.5)),
        ImageFilter::Saturation => color_matrix(pixels, &saturation_matrix(2.0)),
        ImageFilter::BlendColor => map_pixels(pixels, |px| {
            // 30% multiply toward a warm tint
            let tint = [255.0_f32, 200.0, 150.0];
            let mut out = px.0;
            for (c, t) in out.iter_mut().zip(tint) {
                let blended = f32::from(*c) * 0.7 + f32::from(*c) * (t / 255.0) * 0.3;
                *c = blended.round().clamp(0.0, 255.0) as u8;
            }
            Rgba(out)
        }),
        ImageFilter::HueRotate => imageops::huerotate(pixels, 90),
        ImageFilter::Resize => {
            let (w, h) = pixels.dimensions();
            let half = imageops::resize(pixels, (w / 2).max(1), (h / 2).max(1), FilterType::Triangle);
            imageops::resize(&half, w, h, FilterType::Triangle)
        }
        ImageFilter::Gamma => map_pixels(pixels, |px| {
            let mut out = px.0;
            for c in out.iter_mut().take(3) {
                *c = unit_to_u8((f32::from(*c) / 255.0).powf(1.0 / 1.2));
            }
            Rgba(out)
        }),
    }
}

/// Decoded pixels of an image object with its filter applied.
pub fn filtered_pixels(image: &ImageContent) -> Option<Rc<RgbaImage>> {
    let pixels = image.pixels.as_ref()?;
    Some(match image.filter {
        Some(filter) => Rc::new(apply_filter(pixels, filter)),
        None => Rc::clone(pixels),
    })
}
