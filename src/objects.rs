use std::rc::Rc;

use image::RgbaImage;
use kurbo::{Affine, BezPath, Ellipse, Point, Rect, RoundedRect, Shape, Vec2};
use serde::{Deserialize, Serialize};

use crate::types::{FontStyle, ImageFilter, TextAlign, FONT_FAMILY, FONT_SIZE, FONT_WEIGHT, WORKSPACE_NAME};

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

/// A drawable object in the scene graph.
///
/// The serialized form of this struct is the persisted allow-list: every
/// field below is written to snapshots and export JSON, nothing else is.
/// Runtime-only state (decoded bitmaps) lives behind `#[serde(skip)]`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    #[serde(flatten)]
    pub body: ObjectBody,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    #[serde(default)]
    pub angle: f64, // degrees, about the center
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dash_array: Option<Vec<f64>>,
    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default = "yes")]
    pub selectable: bool,
    #[serde(default = "yes")]
    pub has_controls: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Variant-specific payload, tagged by the `type` key.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectBody {
    Rect {
        #[serde(default)]
        rx: f64,
        #[serde(default)]
        ry: f64,
    },
    Circle {
        radius: f64,
    },
    Ellipse {
        rx: f64,
        ry: f64,
    },
    Triangle,
    Polygon {
        points: Vec<Point>,
    },
    Textbox(TextContent),
    Image(ImageContent),
    Path {
        path: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub text: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_weight")]
    pub font_weight: u32,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub linethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub text_align: TextAlign,
}

fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    FONT_SIZE
}

fn default_font_weight() -> u32 {
    FONT_WEIGHT
}

impl TextContent {
    pub fn new(text: &str) -> Self {
        TextContent {
            text: text.to_string(),
            font_family: default_font_family(),
            font_size: FONT_SIZE,
            font_weight: FONT_WEIGHT,
            font_style: FontStyle::Normal,
            linethrough: false,
            underline: false,
            text_align: TextAlign::Left,
        }
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ImageFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_origin: Option<String>,
    #[serde(skip)]
    pub pixels: Option<Rc<RgbaImage>>,
}

/// Capability query for objects that carry text styling.
pub trait HasTextStyle {
    fn text_style(&self) -> Option<&TextContent>;
    fn text_style_mut(&mut self) -> Option<&mut TextContent>;

    fn is_text(&self) -> bool {
        self.text_style().is_some()
    }
}

impl HasTextStyle for SceneObject {
    fn text_style(&self) -> Option<&TextContent> {
        match &self.body {
            ObjectBody::Textbox(text) => Some(text),
            _ => None,
        }
    }

    fn text_style_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.body {
            ObjectBody::Textbox(text) => Some(text),
            _ => None,
        }
    }
}

impl SceneObject {
    /// Bare object with neutral styling. Factories fill in the rest.
    pub fn new(body: ObjectBody, width: f64, height: f64) -> Self {
        SceneObject {
            body,
            left: 0.0,
            top: 0.0,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            stroke_dash_array: None,
            opacity: 1.0,
            selectable: true,
            has_controls: true,
            name: None,
        }
    }

    pub fn workspace(width: f64, height: f64, fill: &str) -> Self {
        let mut obj = SceneObject::new(ObjectBody::Rect { rx: 0.0, ry: 0.0 }, width, height);
        obj.fill = Some(fill.to_string());
        obj.name = Some(WORKSPACE_NAME.to_string());
        obj.selectable = false;
        obj.has_controls = false;
        obj
    }

    pub fn is_workspace(&self) -> bool {
        self.name.as_deref() == Some(WORKSPACE_NAME)
    }

    pub fn kind_name(&self) -> &'static str {
        match self.body {
            ObjectBody::Rect { .. } => "rect",
            ObjectBody::Circle { .. } => "circle",
            ObjectBody::Ellipse { .. } => "ellipse",
            ObjectBody::Triangle => "triangle",
            ObjectBody::Polygon { .. } => "polygon",
            ObjectBody::Textbox(_) => "textbox",
            ObjectBody::Image(_) => "image",
            ObjectBody::Path { .. } => "path",
        }
    }

    pub fn image(&self) -> Option<&ImageContent> {
        match &self.body {
            ObjectBody::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn image_mut(&mut self) -> Option<&mut ImageContent> {
        match &mut self.body {
            ObjectBody::Image(img) => Some(img),
            _ => None,
        }
    }

    /// On-page size after scaling.
    pub fn scaled_size(&self) -> (f64, f64) {
        (self.width * self.scale_x, self.height * self.scale_y)
    }

    /// Stroke width in scene units. Strokes scale with the object; uneven
    /// scaling uses the geometric mean of the two axes.
    pub fn scaled_stroke_width(&self) -> f64 {
        self.stroke_width * (self.scale_x * self.scale_y).abs().sqrt()
    }

    pub fn center_point(&self) -> Point {
        let (w, h) = self.scaled_size();
        Point::new(self.left + w / 2.0, self.top + h / 2.0)
    }

    pub fn set_center(&mut self, center: Point) {
        let (w, h) = self.scaled_size();
        self.left = center.x - w / 2.0;
        self.top = center.y - h / 2.0;
    }

    /// Maps local (unscaled, origin at the top-left of the box) coordinates
    /// into scene coordinates.
    pub fn world_transform(&self) -> Affine {
        let (w, h) = self.scaled_size();
        let half = Vec2::new(w / 2.0, h / 2.0);
        Affine::translate(Vec2::new(self.left, self.top) + half)
            * Affine::rotate(self.angle.to_radians())
            * Affine::translate(-half)
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Outline in local coordinates.
    pub fn local_outline(&self) -> BezPath {
        let (w, h) = (self.width, self.height);
        match &self.body {
            ObjectBody::Rect { rx, ry } => {
                let radius = rx.max(*ry).min(w.min(h) / 2.0);
                RoundedRect::new(0.0, 0.0, w, h, radius).to_path(0.1)
            }
            ObjectBody::Circle { .. } | ObjectBody::Ellipse { .. } => {
                Ellipse::from_rect(Rect::new(0.0, 0.0, w, h)).to_path(0.1)
            }
            ObjectBody::Triangle => polygon_path(&[Point::new(w / 2.0, 0.0), Point::new(w, h), Point::new(0.0, h)]),
            ObjectBody::Polygon { points } => {
                let offset = points_origin(points);
                let shifted: Vec<Point> = points.iter().map(|p| *p - offset.to_vec2()).collect();
                polygon_path(&shifted)
            }
            ObjectBody::Path { path } => BezPath::from_svg(path).unwrap_or_default(),
            ObjectBody::Textbox(_) | ObjectBody::Image(_) => Rect::new(0.0, 0.0, w, h).to_path(0.1),
        }
    }

    pub fn world_outline(&self) -> BezPath {
        let mut path = self.local_outline();
        path.apply_affine(self.world_transform());
        path
    }

    /// Axis-aligned bounds in scene coordinates.
    pub fn bounds(&self) -> Rect {
        let (w, h) = (self.width, self.height);
        let t = self.world_transform();
        let corners = [
            t * Point::new(0.0, 0.0),
            t * Point::new(w, 0.0),
            t * Point::new(w, h),
            t * Point::new(0.0, h),
        ];
        let mut rect = Rect::from_points(corners[0], corners[1]);
        for p in &corners[2..] {
            rect = rect.union_pt(*p);
        }
        rect
    }

    pub fn contains(&self, point: Point) -> bool {
        let local = self.world_transform().inverse() * point;
        let outline = self.local_outline();
        match self.body {
            ObjectBody::Path { .. } | ObjectBody::Textbox(_) | ObjectBody::Image(_) => {
                outline.bounding_box().contains(local)
            }
            _ => outline.contains(local),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.top += dy;
    }

    pub fn to_svg_element(&self, origin: Point) -> String {
        let (w, h) = self.scaled_size();
        let mut attrs = Vec::new();
        let transform = format!(
            "translate({} {}) rotate({}) translate({} {}) scale({} {})",
            self.left - origin.x + w / 2.0,
            self.top - origin.y + h / 2.0,
            self.angle,
            -w / 2.0,
            -h / 2.0,
            self.scale_x,
            self.scale_y
        );
        attrs.push(format!(r##"transform="{}""##, transform));

        if self.opacity < 1.0 {
            attrs.push(format!(r##"opacity="{}""##, self.opacity));
        }

        let fill = match self.fill.as_deref() {
            None | Some("") | Some("transparent") => "none".to_string(),
            Some(fill) => xml_escape(fill),
        };
        attrs.push(format!(r##"fill="{}""##, fill));

        match self.stroke.as_deref() {
            Some(stroke) if self.stroke_width > 0.0 && stroke != "transparent" && !stroke.is_empty() => {
                attrs.push(format!(r##"stroke="{}""##, xml_escape(stroke)));
                attrs.push(format!(r##"stroke-width="{}""##, self.stroke_width));
                if let Some(dash) = self.stroke_dash_array.as_ref().filter(|d| !d.is_empty()) {
                    let dash = dash.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(" ");
                    attrs.push(format!(r##"stroke-dasharray="{}""##, dash));
                }
            }
            _ => attrs.push(r##"stroke="none""##.to_string()),
        }

        let attr_str = attrs.join(" ");
        let (w, h) = (self.width, self.height);

        match &self.body {
            ObjectBody::Rect { rx, ry } => {
                if *rx > 0.0 || *ry > 0.0 {
                    format!(r##"<rect width="{}" height="{}" rx="{}" ry="{}" {} />"##, w, h, rx, ry, attr_str)
                } else {
                    format!(r##"<rect width="{}" height="{}" {} />"##, w, h, attr_str)
                }
            }
            ObjectBody::Circle { .. } | ObjectBody::Ellipse { .. } => {
                format!(r##"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" {} />"##, w / 2.0, h / 2.0, w / 2.0, h / 2.0, attr_str)
            }
            ObjectBody::Triangle => {
                format!(r##"<polygon points="{},0 {},{} 0,{}" {} />"##, w / 2.0, w, h, h, attr_str)
            }
            ObjectBody::Polygon { points } => {
                let offset = points_origin(points);
                let pts = points
                    .iter()
                    .map(|p| format!("{},{}", p.x - offset.x, p.y - offset.y))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!(r##"<polygon points="{}" {} />"##, pts, attr_str)
            }
            ObjectBody::Path { path } => {
                format!(r##"<path d="{}" {} />"##, xml_escape(path), attr_str)
            }
            ObjectBody::Textbox(text) => {
                let x = match text.text_align {
                    TextAlign::Center => w / 2.0,
                    TextAlign::Right => w,
                    _ => 0.0,
                };
                let mut decoration = Vec::new();
                if text.underline {
                    decoration.push("underline");
                }
                if text.linethrough {
                    decoration.push("line-through");
                }
                let decoration = if decoration.is_empty() {
                    String::new()
                } else {
                    format!(r##" text-decoration="{}""##, decoration.join(" "))
                };
                format!(
                    r##"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" text-anchor="{}"{} {}>{}</text>"##,
                    x,
                    text.font_size,
                    xml_escape(&text.font_family),
                    text.font_size,
                    text.font_weight,
                    text.font_style.as_str(),
                    text.text_align.svg_anchor(),
                    decoration,
                    attr_str,
                    xml_escape(&text.text)
                )
            }
            ObjectBody::Image(img) => {
                format!(
                    r##"<image width="{}" height="{}" href="{}" preserveAspectRatio="none" {} />"##,
                    w,
                    h,
                    xml_escape(&img.src),
                    attr_str
                )
            }
        }
    }
}

/// Top-left corner of a point list's bounding box.
pub fn points_origin(points: &[Point]) -> Point {
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    if min_x.is_finite() && min_y.is_finite() {
        Point::new(min_x, min_y)
    } else {
        Point::ORIGIN
    }
}

/// Width and height of a point list's bounding box.
pub fn points_extent(points: &[Point]) -> (f64, f64) {
    let origin = points_origin(points);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    if max_x.is_finite() && max_y.is_finite() {
        (max_x - origin.x, max_y - origin.y)
    } else {
        (0.0, 0.0)
    }
}

fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(*p);
        } else {
            path.line_to(*p);
        }
    }
    if !points.is_empty() {
        path.close_path();
    }
    path
}

pub(crate) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
