use super::*;
use crate::config::EditorConfig;
use crate::objects::HasTextStyle;
use crate::types::{FILL_COLOR, STROKE_WIDTH};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn editor() -> Editor {
    Editor::new(EditorConfig::default())
}

const ALL_KINDS: [ShapeKind; 16] = [
    ShapeKind::Circle,
    ShapeKind::SoftRectangle,
    ShapeKind::Rectangle,
    ShapeKind::Triangle,
    ShapeKind::InverseTriangle,
    ShapeKind::Diamond,
    ShapeKind::Star,
    ShapeKind::Pentagon,
    ShapeKind::Hexagon,
    ShapeKind::ArrowRight,
    ShapeKind::ArrowLeft,
    ShapeKind::ArrowUp,
    ShapeKind::ArrowDown,
    ShapeKind::Heart,
    ShapeKind::Plus,
    ShapeKind::Ellipse,
];

#[test]
fn presets_have_expected_geometry() {
    let circle = build_shape(ShapeKind::Circle);
    assert!(matches!(circle.body, ObjectBody::Circle { radius } if radius == 150.0));
    assert_eq!((circle.width, circle.height), (300.0, 300.0));

    let ellipse = build_shape(ShapeKind::Ellipse);
    assert!(matches!(ellipse.body, ObjectBody::Ellipse { rx, ry } if rx == 150.0 && approx_eq(ry, 90.0)));

    let soft = build_shape(ShapeKind::SoftRectangle);
    assert!(matches!(soft.body, ObjectBody::Rect { rx, ry } if rx == 10.0 && ry == 10.0));

    let diamond = build_shape(ShapeKind::Diamond);
    assert!(approx_eq(diamond.width, 420.0));
    assert!(approx_eq(diamond.height, 420.0));

    assert_eq!((circle.left, circle.top), (100.0, 100.0));
}

#[test]
fn shapes_are_deterministic() {
    for kind in ALL_KINDS {
        let a = serde_json::to_string(&build_shape(kind)).unwrap();
        let b = serde_json::to_string(&build_shape(kind)).unwrap();
        assert_eq!(a, b, "{kind:?}");
    }
}

#[test]
fn every_kind_is_centered_styled_and_selected() {
    let mut editor = editor();
    let center = editor.workspace().unwrap().center_point();
    for kind in ALL_KINDS {
        let key = editor.add_shape(kind);
        let obj = editor.object(key).unwrap();
        let c = obj.center_point();
        assert!(approx_eq(c.x, center.x) && approx_eq(c.y, center.y), "{kind:?}");
        assert_eq!(obj.fill.as_deref(), Some(FILL_COLOR));
        assert_eq!(obj.stroke_width, STROKE_WIDTH);
        assert_eq!(obj.stroke_dash_array.as_deref(), Some(&[][..]));
        assert_eq!(editor.selection(), &[key]);
    }
    assert_eq!(editor.history().len(), ALL_KINDS.len() + 1);
}

#[test]
fn new_shapes_pick_up_the_style_state() {
    let mut editor = editor();
    editor.change_fill_color("#00ff00");
    editor.change_stroke_width(7.0);
    editor.change_stroke_dash_array(&[5.0, 5.0]);

    let key = editor.add_triangle();
    let obj = editor.object(key).unwrap();
    assert_eq!(obj.fill.as_deref(), Some("#00ff00"));
    assert_eq!(obj.stroke_width, 7.0);
    assert_eq!(obj.stroke_dash_array.as_deref(), Some(&[5.0, 5.0][..]));
}

#[test]
fn text_uses_current_fill_and_overrides() {
    let mut editor = editor();
    editor.change_fill_color("#123456");
    let key = editor.add_text("Title", &TextOptions::heading());
    let obj = editor.object(key).unwrap();
    let text = obj.text_style().unwrap();

    assert_eq!(obj.fill.as_deref(), Some("#123456"));
    assert_eq!(text.font_size, 80.0);
    assert_eq!(text.font_weight, 700);
    assert_eq!(text.font_family, "Arial");
    assert_eq!(obj.width, TEXTBOX_WIDTH);
    assert!(approx_eq(obj.height, 80.0 * TEXT_LINE_HEIGHT));
    assert_eq!(editor.history().actions().last(), Some(&"Add Text"));
}

#[test]
fn text_height_grows_with_lines() {
    let mut editor = editor();
    let key = editor.add_text("a\nb\nc", &TextOptions::paragraph());
    let obj = editor.object(key).unwrap();
    assert!(approx_eq(obj.height, 32.0 * TEXT_LINE_HEIGHT * 3.0));
}

#[test]
fn text_options_parse_from_camel_case() {
    let options: TextOptions = serde_json::from_str(r##"{"fontSize": 44, "fontWeight": 500, "fill": "#fff"}"##).unwrap();
    assert_eq!(options.font_size, Some(44.0));
    assert_eq!(options.font_weight, Some(500));
    assert_eq!(options.fill.as_deref(), Some("#fff"));
    assert_eq!(options.text_align, None);
}

#[test]
fn add_and_select_does_not_record() {
    let mut editor = editor();
    let key = editor.add_and_select(build_shape(ShapeKind::Plus));
    assert_eq!(editor.selection(), &[key]);
    assert_eq!(editor.history().len(), 1);
}
