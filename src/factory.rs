use serde::{Deserialize, Serialize};

use crate::engine::Editor;
use crate::objects::{points_extent, ObjectBody, SceneObject, TextContent};
use crate::scene::ObjectKey;
use crate::shapes::polygon_for;
use crate::types::{
    FontStyle, ShapeKind, TextAlign, CIRCLE_RADIUS, DIAMOND_SIZE, ELLIPSE_RY_RATIO, PRESET_ORIGIN, RECTANGLE_SIZE,
    SOFT_RECTANGLE_RADIUS, TEXTBOX_WIDTH, TEXT_LINE_HEIGHT, TRIANGLE_SIZE,
};

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

/// Per-call overrides for text boxes.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOptions {
    pub font_size: Option<f64>,
    pub font_weight: Option<u32>,
    pub font_family: Option<String>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub fill: Option<String>,
    pub width: Option<f64>,
}

impl TextOptions {
    pub fn heading() -> Self {
        TextOptions { font_size: Some(80.0), font_weight: Some(700), ..Default::default() }
    }

    pub fn subheading() -> Self {
        TextOptions { font_size: Some(44.0), font_weight: Some(500), ..Default::default() }
    }

    pub fn paragraph() -> Self {
        TextOptions { font_size: Some(32.0), ..Default::default() }
    }
}

fn preset_size(kind: ShapeKind) -> (f64, f64) {
    match kind {
        ShapeKind::Circle | ShapeKind::Ellipse => (CIRCLE_RADIUS * 2.0, CIRCLE_RADIUS * 2.0),
        ShapeKind::Rectangle | ShapeKind::SoftRectangle => RECTANGLE_SIZE,
        ShapeKind::Diamond => DIAMOND_SIZE,
        _ => TRIANGLE_SIZE,
    }
}

/// Unstyled object for a shape kind, placed at the preset origin.
pub fn build_shape(kind: ShapeKind) -> SceneObject {
    let (w, h) = preset_size(kind);
    let mut object = match kind {
        ShapeKind::Circle => SceneObject::new(ObjectBody::Circle { radius: CIRCLE_RADIUS }, w, h),
        ShapeKind::Ellipse => {
            let (rx, ry) = (CIRCLE_RADIUS, CIRCLE_RADIUS * ELLIPSE_RY_RATIO);
            SceneObject::new(ObjectBody::Ellipse { rx, ry }, rx * 2.0, ry * 2.0)
        }
        ShapeKind::Rectangle => SceneObject::new(ObjectBody::Rect { rx: 0.0, ry: 0.0 }, w, h),
        ShapeKind::SoftRectangle => SceneObject::new(
            ObjectBody::Rect { rx: SOFT_RECTANGLE_RADIUS, ry: SOFT_RECTANGLE_RADIUS },
            w,
            h,
        ),
        ShapeKind::Triangle => SceneObject::new(ObjectBody::Triangle, w, h),
        _ => match polygon_for(kind) {
            Some(generator) => {
                let points = generator.generate_points(w, h);
                let (pw, ph) = points_extent(&points);
                SceneObject::new(ObjectBody::Polygon { points }, pw, ph)
            }
            None => SceneObject::new(ObjectBody::Rect { rx: 0.0, ry: 0.0 }, w, h),
        },
    };
    object.left = PRESET_ORIGIN.0;
    object.top = PRESET_ORIGIN.1;
    object
}

impl Editor {
    /// Adds an object centered on the workspace and makes it the sole
    /// selection. Does not commit; callers record history.
    pub fn add_and_select(&mut self, object: SceneObject) -> ObjectKey {
        let key = self.scene.add(object);
        self.scene.center(key);
        self.select(&[key]);
        key
    }

    pub fn add_shape(&mut self, kind: ShapeKind) -> ObjectKey {
        let mut object = build_shape(kind);
        object.fill = Some(self.style.fill_color.clone());
        object.stroke = Some(self.style.stroke_color.clone());
        object.stroke_width = self.style.stroke_width;
        object.stroke_dash_array = Some(self.style.stroke_dash_array.clone());

        let key = self.add_and_select(object);
        self.commit("Add Shape");
        tracing::debug!(?kind, "shape added");
        key
    }

    pub fn add_circle(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Circle)
    }

    pub fn add_soft_rectangle(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::SoftRectangle)
    }

    pub fn add_rectangle(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Rectangle)
    }

    pub fn add_triangle(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Triangle)
    }

    pub fn add_inverse_triangle(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::InverseTriangle)
    }

    pub fn add_diamond(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Diamond)
    }

    pub fn add_star(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Star)
    }

    pub fn add_pentagon(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Pentagon)
    }

    pub fn add_hexagon(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Hexagon)
    }

    pub fn add_arrow_right(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::ArrowRight)
    }

    pub fn add_arrow_left(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::ArrowLeft)
    }

    pub fn add_arrow_up(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::ArrowUp)
    }

    pub fn add_arrow_down(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::ArrowDown)
    }

    pub fn add_heart(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Heart)
    }

    pub fn add_plus(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Plus)
    }

    pub fn add_ellipse(&mut self) -> ObjectKey {
        self.add_shape(ShapeKind::Ellipse)
    }

    /// Text box colored with the current fill, then caller overrides.
    pub fn add_text(&mut self, text: &str, options: &TextOptions) -> ObjectKey {
        let mut content = TextContent::new(text);
        content.font_family = self.style.font_family.clone();
        if let Some(size) = options.font_size {
            content.font_size = size;
        }
        if let Some(weight) = options.font_weight {
            content.font_weight = weight;
        }
        if let Some(family) = &options.font_family {
            content.font_family = family.clone();
        }
        if let Some(style) = options.font_style {
            content.font_style = style;
        }
        if let Some(align) = options.text_align {
            content.text_align = align;
        }

        let width = options.width.unwrap_or(TEXTBOX_WIDTH);
        let height = content.font_size * TEXT_LINE_HEIGHT * content.line_count() as f64;
        let mut object = SceneObject::new(ObjectBody::Textbox(content), width, height);
        object.left = PRESET_ORIGIN.0;
        object.top = PRESET_ORIGIN.1;
        object.fill = Some(options.fill.clone().unwrap_or_else(|| self.style.fill_color.clone()));

        let key = self.add_and_select(object);
        self.commit("Add Text");
        key
    }
}
