use kurbo::{Affine, BezPath, Point, Shape};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::Editor;
use crate::error::{EditorError, Result};
use crate::factory::TextOptions;
use crate::objects::{HasTextStyle, ObjectBody, SceneObject, TextContent};
use crate::scene::ObjectKey;
use crate::style::Brush;
use crate::types::{
    ExportFormat, FontStyle, ImageFilter, ShapeKind, TextAlign, FONT_SIZE, FONT_WEIGHT, OPACITY, TEXT_LINE_HEIGHT,
};

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

/// Style of the first selected object, with defaults filled in.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStyle {
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub stroke_dash_array: Vec<f64>,
    pub opacity: f64,
    pub font_family: String,
    pub font_weight: u32,
    pub font_style: FontStyle,
    pub font_linethrough: bool,
    pub font_underline: bool,
    pub text_align: TextAlign,
    pub font_size: f64,
}

/// Partial transform from an interactive move/scale/rotate gesture.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectTransform {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub angle: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
}

impl Editor {
    /// Selected objects in selection order, never the workspace.
    pub fn active_objects(&self) -> Vec<ObjectKey> {
        self.selection
            .keys()
            .iter()
            .copied()
            .filter(|&key| self.scene.get(key).map_or(false, |obj| !obj.is_workspace()))
            .collect()
    }

    fn first_active(&self) -> Option<&SceneObject> {
        self.active_objects().first().and_then(|&key| self.scene.get(key))
    }

    fn first_active_text(&self) -> Option<&TextContent> {
        self.first_active().and_then(|obj| obj.text_style())
    }

    pub fn get_active_fill_color(&self) -> String {
        self.first_active()
            .and_then(|obj| obj.fill.clone())
            .unwrap_or_else(|| self.style.fill_color.clone())
    }

    pub fn get_active_stroke_color(&self) -> String {
        self.first_active()
            .and_then(|obj| obj.stroke.clone())
            .unwrap_or_else(|| self.style.stroke_color.clone())
    }

    /// A zero width counts as unset.
    pub fn get_active_stroke_width(&self) -> f64 {
        self.first_active()
            .map(|obj| obj.stroke_width)
            .filter(|width| *width > 0.0)
            .unwrap_or(self.style.stroke_width)
    }

    pub fn get_active_stroke_dash_array(&self) -> Vec<f64> {
        self.first_active()
            .and_then(|obj| obj.stroke_dash_array.clone())
            .unwrap_or_else(|| self.style.stroke_dash_array.clone())
    }

    pub fn get_active_opacity(&self) -> f64 {
        self.first_active().map_or(OPACITY, |obj| obj.opacity)
    }

    pub fn get_active_font_family(&self) -> String {
        self.first_active_text()
            .map(|text| text.font_family.clone())
            .unwrap_or_else(|| self.style.font_family.clone())
    }

    pub fn get_active_font_weight(&self) -> u32 {
        self.first_active_text().map_or(FONT_WEIGHT, |text| text.font_weight)
    }

    pub fn get_active_font_style(&self) -> FontStyle {
        self.first_active_text().map_or(FontStyle::Normal, |text| text.font_style)
    }

    pub fn get_active_font_linethrough(&self) -> bool {
        self.first_active_text().map_or(false, |text| text.linethrough)
    }

    pub fn get_active_font_underline(&self) -> bool {
        self.first_active_text().map_or(false, |text| text.underline)
    }

    pub fn get_active_text_align(&self) -> TextAlign {
        self.first_active_text().map_or(TextAlign::Left, |text| text.text_align)
    }

    pub fn get_active_font_size(&self) -> f64 {
        self.first_active_text().map_or(FONT_SIZE, |text| text.font_size)
    }

    pub fn active_style(&self) -> ActiveStyle {
        ActiveStyle {
            fill_color: self.get_active_fill_color(),
            stroke_color: self.get_active_stroke_color(),
            stroke_width: self.get_active_stroke_width(),
            stroke_dash_array: self.get_active_stroke_dash_array(),
            opacity: self.get_active_opacity(),
            font_family: self.get_active_font_family(),
            font_weight: self.get_active_font_weight(),
            font_style: self.get_active_font_style(),
            font_linethrough: self.get_active_font_linethrough(),
            font_underline: self.get_active_font_underline(),
            text_align: self.get_active_text_align(),
            font_size: self.get_active_font_size(),
        }
    }

    fn apply_to_active(&mut self, mut f: impl FnMut(&mut SceneObject)) {
        for key in self.active_objects() {
            self.scene.modify(key, &mut f);
        }
    }

    fn apply_to_active_text(&mut self, mut f: impl FnMut(&mut TextContent)) {
        for key in self.active_objects() {
            if !self.scene.get(key).map_or(false, |obj| obj.is_text()) {
                continue;
            }
            self.scene.modify(key, |obj| {
                if let Some(text) = obj.text_style_mut() {
                    f(text);
                }
            });
        }
    }

    pub fn change_fill_color(&mut self, value: &str) {
        self.style.fill_color = value.to_string();
        self.apply_to_active(|obj| obj.fill = Some(value.to_string()));
        self.commit("Fill Color");
    }

    /// Text has no visible stroke, so on text objects this sets the fill.
    pub fn change_stroke_color(&mut self, value: &str) {
        self.style.stroke_color = value.to_string();
        if let Some(brush) = self.brush.as_mut() {
            brush.color = value.to_string();
        }
        self.apply_to_active(|obj| {
            if obj.is_text() {
                obj.fill = Some(value.to_string());
            } else {
                obj.stroke = Some(value.to_string());
            }
        });
        self.commit("Stroke Color");
    }

    pub fn change_stroke_width(&mut self, value: f64) {
        self.style.stroke_width = value;
        if let Some(brush) = self.brush.as_mut() {
            brush.width = value;
        }
        self.apply_to_active(|obj| obj.stroke_width = value);
        self.commit("Stroke Width");
    }

    pub fn change_stroke_dash_array(&mut self, value: &[f64]) {
        self.style.stroke_dash_array = value.to_vec();
        self.apply_to_active(|obj| obj.stroke_dash_array = Some(value.to_vec()));
        self.commit("Stroke Style");
    }

    pub fn change_opacity(&mut self, value: f64) {
        let value = value.clamp(0.0, 1.0);
        self.apply_to_active(|obj| obj.opacity = value);
        self.commit("Opacity");
    }

    pub fn change_font_family(&mut self, value: &str) {
        self.style.font_family = value.to_string();
        self.apply_to_active_text(|text| text.font_family = value.to_string());
        self.commit("Font Family");
    }

    pub fn change_font_size(&mut self, value: f64) {
        self.apply_to_active_text(|text| text.font_size = value);
        self.commit("Font Size");
    }

    pub fn change_font_weight(&mut self, value: u32) {
        self.apply_to_active_text(|text| text.font_weight = value);
        self.commit("Font Weight");
    }

    pub fn change_font_style(&mut self, value: FontStyle) {
        self.apply_to_active_text(|text| text.font_style = value);
        self.commit("Font Style");
    }

    pub fn change_font_linethrough(&mut self, value: bool) {
        self.apply_to_active_text(|text| text.linethrough = value);
        self.commit("Linethrough");
    }

    pub fn change_font_underline(&mut self, value: bool) {
        self.apply_to_active_text(|text| text.underline = value);
        self.commit("Underline");
    }

    pub fn change_text_align(&mut self, value: TextAlign) {
        self.apply_to_active_text(|text| text.text_align = value);
        self.commit("Text Align");
    }

    /// Sets the named filter on selected images; unknown names clear it.
    pub fn change_image_filter(&mut self, name: &str) {
        let filter = ImageFilter::from_name(name);
        for key in self.active_objects() {
            if self.scene.get(key).and_then(SceneObject::image).is_none() {
                continue;
            }
            self.scene.modify(key, |obj| {
                if let Some(image) = obj.image_mut() {
                    image.filter = filter;
                }
            });
        }
        self.commit("Image Filter");
    }

    pub fn bring_forward(&mut self) {
        for key in self.active_objects() {
            self.scene.bring_forward(key);
        }
        self.scene.send_workspace_to_back();
        self.commit("Bring Forward");
    }

    pub fn send_backwards(&mut self) {
        for key in self.active_objects() {
            self.scene.send_backwards(key);
        }
        self.scene.send_workspace_to_back();
        self.commit("Send Backwards");
    }

    /// Removes every selected object and clears the selection.
    pub fn delete(&mut self) {
        let keys = self.active_objects();
        for key in &keys {
            self.scene.remove(*key);
        }
        self.clear_selection();
        self.commit("Delete");
        tracing::debug!(count = keys.len(), "objects deleted");
    }

    /// Resizes the workspace and refits the viewport.
    pub fn change_size(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width > 0.0 && height > 0.0) {
            return Err(EditorError::Config(format!("workspace size {width}x{height} must be positive")));
        }
        let Some(key) = self.scene.workspace_key() else {
            return Ok(());
        };
        self.scene.modify(key, |ws| {
            ws.width = width;
            ws.height = height;
            ws.scale_x = 1.0;
            ws.scale_y = 1.0;
        });
        self.auto_zoom();
        self.commit("Resize");
        Ok(())
    }

    pub fn change_background(&mut self, value: &str) {
        let Some(key) = self.scene.workspace_key() else {
            return;
        };
        self.scene.modify(key, |ws| ws.fill = Some(value.to_string()));
        self.commit("Background");
    }

    pub fn modify(&mut self, key: ObjectKey, transform: &ObjectTransform) -> Result<()> {
        if !self.scene.contains_key(key) {
            return Err(EditorError::UnknownObject(key.to_raw()));
        }
        if Some(key) == self.scene.workspace_key() {
            tracing::debug!("ignoring transform of the workspace");
            return Ok(());
        }
        self.scene.modify(key, |obj| {
            if let Some(left) = transform.left {
                obj.left = left;
            }
            if let Some(top) = transform.top {
                obj.top = top;
            }
            if let Some(angle) = transform.angle {
                obj.angle = angle;
            }
            if let Some(scale_x) = transform.scale_x {
                obj.scale_x = scale_x;
            }
            if let Some(scale_y) = transform.scale_y {
                obj.scale_y = scale_y;
            }
        });
        self.commit("Modify");
        Ok(())
    }

    /// Replaces the text of a text box and regrows its height.
    pub fn set_text(&mut self, key: ObjectKey, value: &str) -> Result<()> {
        let object = self.scene.get(key).ok_or(EditorError::UnknownObject(key.to_raw()))?;
        if !object.is_text() {
            return Ok(());
        }
        self.scene.modify(key, |obj| {
            let mut lines = 1;
            let mut size = FONT_SIZE;
            if let Some(text) = obj.text_style_mut() {
                text.text = value.to_string();
                lines = text.line_count();
                size = text.font_size;
            }
            obj.height = size * TEXT_LINE_HEIGHT * lines as f64;
        });
        self.commit("Edit Text");
        Ok(())
    }

    pub fn is_drawing_mode(&self) -> bool {
        self.brush.is_some()
    }

    pub fn brush(&self) -> Option<&Brush> {
        self.brush.as_ref()
    }

    /// Clears the selection and arms the brush with the stroke style.
    pub fn enable_drawing_mode(&mut self) {
        self.clear_selection();
        self.brush = Some(Brush::from_style(&self.style));
    }

    pub fn disable_drawing_mode(&mut self) {
        self.brush = None;
    }

    /// Turns a brush stroke (scene coordinates) into a path object.
    /// Returns `None` for an empty stroke.
    pub fn add_freehand_path(&mut self, points: &[Point]) -> Result<Option<ObjectKey>> {
        let brush = self.brush.clone().ok_or(EditorError::DrawingDisabled)?;
        let Some((first, rest)) = points.split_first() else {
            return Ok(None);
        };

        let mut path = BezPath::new();
        path.move_to(*first);
        if rest.is_empty() {
            path.line_to(*first);
        }
        for p in rest {
            path.line_to(*p);
        }
        let bbox = path.bounding_box();
        path.apply_affine(Affine::translate(-bbox.origin().to_vec2()));

        let mut object = SceneObject::new(ObjectBody::Path { path: path.to_svg() }, bbox.width(), bbox.height());
        object.left = bbox.x0;
        object.top = bbox.y0;
        object.stroke = Some(brush.color);
        object.stroke_width = brush.width;

        let key = self.scene.add(object);
        self.commit("Draw");
        Ok(Some(key))
    }
}

/// Every operation the host can invoke, as `{"action": ..., "params": {...}}`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", content = "params", rename_all = "snake_case")]
pub enum Command {
    AddShape { kind: ShapeKind },
    AddText {
        text: String,
        #[serde(default)]
        options: TextOptions,
    },
    AddFreehandPath { points: Vec<Point> },
    Select { ids: Vec<u64> },
    ClearSelection,
    SelectAll,
    SelectPoint {
        x: f64,
        y: f64,
        #[serde(default)]
        shift: bool,
    },
    SelectRect {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        #[serde(default)]
        shift: bool,
    },
    Delete,
    Copy,
    Paste,
    Undo,
    Redo,
    ChangeFillColor { value: String },
    ChangeStrokeColor { value: String },
    ChangeStrokeWidth { value: f64 },
    ChangeStrokeDashArray { value: Vec<f64> },
    ChangeOpacity { value: f64 },
    ChangeFontFamily { value: String },
    ChangeFontSize { value: f64 },
    ChangeFontWeight { value: u32 },
    ChangeFontStyle { value: FontStyle },
    ChangeFontLinethrough { value: bool },
    ChangeFontUnderline { value: bool },
    ChangeTextAlign { value: TextAlign },
    ChangeImageFilter { value: String },
    BringForward,
    SendBackwards,
    ChangeSize { width: f64, height: f64 },
    ChangeBackground { value: String },
    AutoZoom,
    ZoomIn,
    ZoomOut,
    Resize { width: f64, height: f64 },
    EnableDrawingMode,
    DisableDrawingMode,
    Modify {
        id: u64,
        #[serde(flatten)]
        transform: ObjectTransform,
    },
    SetText { id: u64, text: String },
    LoadJson { json: String },
    Export { format: ExportFormat },
    Persist,
    GetActiveStyle,
    GetHistory,
    GetObjects,
    GetSelection,
    GetState,
}

impl Command {
    /// Parses a command envelope. Empty `params` objects are accepted for
    /// actions that take none.
    pub fn parse(json: &str) -> Result<Command> {
        let mut value: Value = serde_json::from_str(json)?;
        if let Some(envelope) = value.as_object_mut() {
            let empty = envelope.get("params").map_or(false, |p| p.as_object().map_or(false, |m| m.is_empty()));
            if empty {
                envelope.remove("params");
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}

fn keys_json(keys: &[ObjectKey]) -> Value {
    Value::from(keys.iter().map(|key| key.to_raw()).collect::<Vec<u64>>())
}

impl Editor {
    fn key_for(&self, id: u64) -> Result<ObjectKey> {
        let key = ObjectKey::from_raw(id);
        if self.scene.contains_key(key) {
            Ok(key)
        } else {
            Err(EditorError::UnknownObject(id))
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Value> {
        tracing::trace!(?command, "execute");
        let output = match command {
            Command::AddShape { kind } => json!({ "id": self.add_shape(kind).to_raw() }),
            Command::AddText { text, options } => json!({ "id": self.add_text(&text, &options).to_raw() }),
            Command::AddFreehandPath { points } => {
                json!({ "id": self.add_freehand_path(&points)?.map(|key| key.to_raw()) })
            }
            Command::Select { ids } => {
                let keys = ids.into_iter().map(|id| self.key_for(id)).collect::<Result<Vec<_>>>()?;
                self.select(&keys);
                json!({ "selection": keys_json(self.selection()) })
            }
            Command::ClearSelection => {
                self.clear_selection();
                json!({ "success": true })
            }
            Command::SelectAll => {
                self.select_all();
                json!({ "selection": keys_json(self.selection()) })
            }
            Command::SelectPoint { x, y, shift } => json!({ "selection": keys_json(&self.select_point(x, y, shift)) }),
            Command::SelectRect { x1, y1, x2, y2, shift } => {
                json!({ "selection": keys_json(&self.select_rect(x1, y1, x2, y2, shift)) })
            }
            Command::Delete => {
                self.delete();
                json!({ "success": true })
            }
            Command::Copy => {
                self.copy();
                json!({ "success": true })
            }
            Command::Paste => json!({ "ids": keys_json(&self.paste()) }),
            Command::Undo => json!({ "success": self.undo()? }),
            Command::Redo => json!({ "success": self.redo()? }),
            Command::ChangeFillColor { value } => {
                self.change_fill_color(&value);
                json!({ "success": true })
            }
            Command::ChangeStrokeColor { value } => {
                self.change_stroke_color(&value);
                json!({ "success": true })
            }
            Command::ChangeStrokeWidth { value } => {
                self.change_stroke_width(value);
                json!({ "success": true })
            }
            Command::ChangeStrokeDashArray { value } => {
                self.change_stroke_dash_array(&value);
                json!({ "success": true })
            }
            Command::ChangeOpacity { value } => {
                self.change_opacity(value);
                json!({ "success": true })
            }
            Command::ChangeFontFamily { value } => {
                self.change_font_family(&value);
                json!({ "success": true })
            }
            Command::ChangeFontSize { value } => {
                self.change_font_size(value);
                json!({ "success": true })
            }
            Command::ChangeFontWeight { value } => {
                self.change_font_weight(value);
                json!({ "success": true })
            }
            Command::ChangeFontStyle { value } => {
                self.change_font_style(value);
                json!({ "success": true })
            }
            Command::ChangeFontLinethrough { value } => {
                self.change_font_linethrough(value);
                json!({ "success": true })
            }
            Command::ChangeFontUnderline { value } => {
                self.change_font_underline(value);
                json!({ "success": true })
            }
            Command::ChangeTextAlign { value } => {
                self.change_text_align(value);
                json!({ "success": true })
            }
            Command::ChangeImageFilter { value } => {
                self.change_image_filter(&value);
                json!({ "success": true })
            }
            Command::BringForward => {
                self.bring_forward();
                json!({ "success": true })
            }
            Command::SendBackwards => {
                self.send_backwards();
                json!({ "success": true })
            }
            Command::ChangeSize { width, height } => {
                self.change_size(width, height)?;
                json!({ "success": true })
            }
            Command::ChangeBackground { value } => {
                self.change_background(&value);
                json!({ "success": true })
            }
            Command::AutoZoom => json!({ "zoom": self.auto_zoom() }),
            Command::ZoomIn => json!({ "zoom": self.zoom_in() }),
            Command::ZoomOut => json!({ "zoom": self.zoom_out() }),
            Command::Resize { width, height } => json!({ "zoom": self.resize_surface(width, height) }),
            Command::EnableDrawingMode => {
                self.enable_drawing_mode();
                json!({ "success": true })
            }
            Command::DisableDrawingMode => {
                self.disable_drawing_mode();
                json!({ "success": true })
            }
            Command::Modify { id, transform } => {
                let key = self.key_for(id)?;
                self.modify(key, &transform)?;
                json!({ "success": true })
            }
            Command::SetText { id, text } => {
                let key = self.key_for(id)?;
                self.set_text(key, &text)?;
                json!({ "success": true })
            }
            Command::LoadJson { json } => {
                self.load_json(&json)?;
                json!({ "success": true })
            }
            Command::Export { format } => serde_json::to_value(self.export(format)?)?,
            Command::Persist => {
                self.persist();
                json!({ "success": true })
            }
            Command::GetActiveStyle => serde_json::to_value(self.active_style())?,
            Command::GetHistory => json!({
                "actions": self.history.actions(),
                "index": self.history.index(),
            }),
            Command::GetObjects => serde_json::from_str(&self.get_objects_json())?,
            Command::GetSelection => json!({ "selection": keys_json(self.selection()) }),
            Command::GetState => json!({
                "canUndo": self.can_undo(),
                "canRedo": self.can_redo(),
                "zoom": self.viewport.zoom(),
                "drawing": self.is_drawing_mode(),
                "loadError": self.load_error(),
            }),
        };
        Ok(output)
    }
}
