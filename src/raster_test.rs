use std::rc::Rc;

use super::*;
use crate::objects::ImageContent;

fn rect(left: f64, top: f64, w: f64, h: f64, fill: Option<&str>) -> SceneObject {
    let mut obj = SceneObject::new(ObjectBody::Rect { rx: 0.0, ry: 0.0 }, w, h);
    obj.left = left;
    obj.top = top;
    obj.fill = fill.map(str::to_string);
    obj
}

fn region() -> Rect {
    Rect::new(0.0, 0.0, 10.0, 10.0)
}

#[test]
fn output_covers_the_region() {
    let image = rasterize(Rect::new(50.0, 50.0, 80.0, 70.0), std::iter::empty()).unwrap();
    assert_eq!(image.dimensions(), (30, 20));
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
fn later_objects_paint_over_earlier_ones() {
    let background = rect(0.0, 0.0, 10.0, 10.0, Some("white"));
    let square = rect(2.0, 2.0, 4.0, 4.0, Some("#ff0000"));
    let image = rasterize(region(), [&background, &square]).unwrap();

    assert_eq!(image.get_pixel(3, 3).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(image.get_pixel(7, 7).0, [255, 255, 255, 255]);
}

#[test]
fn region_origin_is_respected() {
    let square = rect(100.0, 100.0, 2.0, 2.0, Some("blue"));
    let image = rasterize(Rect::new(100.0, 100.0, 104.0, 104.0), [&square]).unwrap();
    assert_eq!(image.get_pixel(1, 1).0, [0, 0, 255, 255]);
    assert_eq!(image.get_pixel(3, 3).0[3], 0);
}

#[test]
fn opacity_blends_over_background() {
    let background = rect(0.0, 0.0, 10.0, 10.0, Some("white"));
    let mut square = rect(0.0, 0.0, 10.0, 10.0, Some("red"));
    square.opacity = 0.5;
    let [r, g, b, a] = rasterize(region(), [&background, &square]).unwrap().get_pixel(5, 5).0;
    assert_eq!((r, a), (255, 255));
    assert!((127..=128).contains(&g));
    assert_eq!(g, b);
}

#[test]
fn stroke_only_outline() {
    let mut square = rect(2.0, 2.0, 6.0, 6.0, None);
    square.stroke = Some("#00ff00".into());
    square.stroke_width = 2.0;
    let image = rasterize(region(), [&square]).unwrap();
    assert_eq!(image.get_pixel(2, 5).0, [0, 255, 0, 255]);
    assert_eq!(image.get_pixel(5, 5).0[3], 0);
}

#[test]
fn transparent_and_unknown_paints_are_skipped() {
    let clear = rect(0.0, 0.0, 10.0, 10.0, Some("transparent"));
    let odd = rect(0.0, 0.0, 10.0, 10.0, Some("url(#gradient)"));
    let image = rasterize(region(), [&clear, &odd]).unwrap();
    assert!(image.pixels().all(|px| px.0[3] == 0));
}

#[test]
fn freehand_paths_are_never_filled() {
    let mut path = SceneObject::new(ObjectBody::Path { path: "M0 0L10 0L10 10L0 10".into() }, 10.0, 10.0);
    path.fill = Some("red".into());
    let image = rasterize(region(), [&path]).unwrap();
    assert!(image.pixels().all(|px| px.0[3] == 0));
}

#[test]
fn text_is_not_rasterized() {
    let mut text = SceneObject::new(ObjectBody::Textbox(crate::objects::TextContent::new("hi")), 10.0, 10.0);
    text.fill = Some("black".into());
    let image = rasterize(region(), [&text]).unwrap();
    assert!(image.pixels().all(|px| px.0[3] == 0));
}

#[test]
fn images_are_sampled_through_their_transform() {
    let mut pixels = RgbaImage::new(2, 1);
    pixels.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    pixels.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
    let content = ImageContent { src: "x".into(), filter: None, cross_origin: None, pixels: Some(Rc::new(pixels)) };

    let mut image = SceneObject::new(ObjectBody::Image(content), 2.0, 1.0);
    image.scale_x = 5.0;
    image.scale_y = 10.0;
    let out = rasterize(region(), [&image]).unwrap();
    assert_eq!(out.get_pixel(1, 5).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(8, 5).0, [0, 0, 255, 255]);
}

#[test]
fn oversized_regions_are_rejected() {
    let huge = Rect::new(0.0, 0.0, 65536.0, 65537.0);
    assert!(matches!(rasterize(huge, std::iter::empty()), Err(EditorError::Export(_))));

    let just_over = Rect::new(0.0, 0.0, 8192.0, 8193.0);
    assert!(rasterize(just_over, std::iter::empty()).is_err());
}

#[test]
fn strokes_scale_with_the_object() {
    let mut square = rect(1.0, 1.0, 4.0, 4.0, None);
    square.scale_x = 2.0;
    square.scale_y = 2.0;
    square.stroke = Some("#00ff00".into());
    square.stroke_width = 2.0;
    assert_eq!(square.scaled_stroke_width(), 4.0);

    let image = rasterize(region(), [&square]).unwrap();
    // 1.5 from the left edge, inside the doubled band
    assert_eq!(image.get_pixel(2, 5).0, [0, 255, 0, 255]);
    assert_eq!(image.get_pixel(4, 5).0[3], 0);
}

#[test]
fn uneven_scale_uses_the_mean_stroke() {
    let mut image = rect(0.0, 0.0, 10.0, 10.0, None);
    image.stroke_width = 2.0;
    image.scale_x = 4.0;
    image.scale_y = 1.0;
    assert_eq!(image.scaled_stroke_width(), 4.0);
}
