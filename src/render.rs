use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement, Path2d};

use crate::engine::Editor;
use crate::objects::{ObjectBody, SceneObject};

const SELECTION_COLOR: &str = "#4facfe";

fn apply_transform(ctx: &CanvasRenderingContext2d, coeffs: [f64; 6]) {
    let [a, b, c, d, e, f] = coeffs;
    let _ = ctx.transform(a, b, c, d, e, f);
}

fn dash_array(values: &[f64]) -> js_sys::Array {
    let dash = js_sys::Array::new();
    for &d in values {
        dash.push(&JsValue::from_f64(d));
    }
    dash
}

impl Editor {
    /// Draws the scene onto a 2D context: viewport transform, workspace,
    /// content clipped to the workspace, then the selection outline.
    pub fn render(&self, ctx: &CanvasRenderingContext2d, images: &HashMap<String, HtmlImageElement>) {
        let surface = self.scene.surface_size();
        ctx.save();
        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, surface.width, surface.height);
        apply_transform(ctx, self.viewport.transform.as_coeffs());

        let mut objects = self.scene.ordered();
        if let Some((_, workspace)) = objects.next() {
            ctx.save();
            ctx.set_shadow_color("rgba(0,0,0,0.8)");
            ctx.set_shadow_blur(5.0);
            self.render_object(ctx, workspace, images);
            ctx.restore();
        }

        ctx.save();
        if let Some(clip) = self.viewport.clip {
            ctx.begin_path();
            ctx.rect(clip.x0, clip.y0, clip.width(), clip.height());
            ctx.clip();
        }
        for (_, obj) in objects {
            self.render_object(ctx, obj, images);
        }
        ctx.restore();

        self.render_selection_overlay(ctx);
        ctx.restore();
    }

    fn render_object(&self, ctx: &CanvasRenderingContext2d, obj: &SceneObject, images: &HashMap<String, HtmlImageElement>) {
        ctx.save();
        apply_transform(ctx, obj.world_transform().as_coeffs());
        ctx.set_global_alpha(obj.opacity);
        ctx.set_fill_style_str(obj.fill.as_deref().unwrap_or("transparent"));
        ctx.set_stroke_style_str(obj.stroke.as_deref().unwrap_or("transparent"));
        // scales with the object on both axes, as in SVG export
        ctx.set_line_width(obj.stroke_width);
        let _ = ctx.set_line_dash(&dash_array(obj.stroke_dash_array.as_deref().unwrap_or(&[])));

        match &obj.body {
            ObjectBody::Image(image) => {
                if let Some(filter) = image.filter {
                    ctx.set_filter(filter.css());
                }
                if let Some(element) = images.get(&image.src) {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(element, 0.0, 0.0, obj.width, obj.height);
                }
            }
            ObjectBody::Textbox(text) => {
                ctx.set_font(&format!(
                    "{} {} {}px {}",
                    text.font_style.as_str(),
                    text.font_weight,
                    text.font_size,
                    text.font_family
                ));
                let (x, align) = match text.text_align.svg_anchor() {
                    "middle" => (obj.width / 2.0, "center"),
                    "end" => (obj.width, "right"),
                    _ => (0.0, "left"),
                };
                ctx.set_text_align(align);
                let line_height = obj.height / text.line_count() as f64;
                for (i, line) in text.text.lines().enumerate() {
                    let _ = ctx.fill_text(line, x, text.font_size + i as f64 * line_height);
                }
            }
            _ => {
                if let Ok(path) = Path2d::new_with_path_string(&obj.local_outline().to_svg()) {
                    if !matches!(obj.body, ObjectBody::Path { .. }) {
                        ctx.fill_with_path_2d(&path);
                    }
                    if obj.stroke_width > 0.0 {
                        ctx.stroke_with_path(&path);
                    }
                }
            }
        }
        ctx.restore();
    }

    fn render_selection_overlay(&self, ctx: &CanvasRenderingContext2d) {
        let zoom = self.viewport.zoom().max(f64::EPSILON);
        ctx.save();
        ctx.set_stroke_style_str(SELECTION_COLOR);
        ctx.set_line_width(1.5 / zoom);
        let _ = ctx.set_line_dash(&js_sys::Array::new());
        for key in self.active_objects() {
            if let Some(obj) = self.scene.get(key) {
                let b = obj.bounds();
                ctx.stroke_rect(b.x0, b.y0, b.width(), b.height());
            }
        }
        ctx.restore();
    }
}
