#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn workspace() -> Rect {
    // 900x1200 page centered on a 1280x720 surface
    Rect::new(190.0, -240.0, 1090.0, 960.0)
}

#[test]
fn scale_to_fit_uses_tighter_axis() {
    assert!(approx_eq(scale_to_fit(Size::new(900.0, 1200.0), Size::new(1280.0, 720.0)), 0.6));
    assert!(approx_eq(scale_to_fit(Size::new(100.0, 50.0), Size::new(400.0, 400.0)), 4.0));
}

#[test]
fn scale_to_fit_degenerate_object_is_one() {
    assert_eq!(scale_to_fit(Size::new(0.0, 10.0), Size::new(100.0, 100.0)), 1.0);
}

#[test]
fn auto_zoom_applies_padding_ratio() {
    let config = EditorConfig::default();
    let mut viewport = Viewport::default();
    let zoom = viewport.auto_zoom(Size::new(1280.0, 720.0), workspace(), &config);
    assert!(approx_eq(zoom, 0.85 * 0.6));
    assert!(approx_eq(viewport.zoom(), zoom));
}

#[test]
fn auto_zoom_centers_workspace_in_container() {
    let config = EditorConfig::default();
    let mut viewport = Viewport::default();
    viewport.auto_zoom(Size::new(1280.0, 720.0), workspace(), &config);

    let on_screen = viewport.world_to_screen(workspace().center());
    assert!(approx_eq(on_screen.x, 640.0));
    assert!(approx_eq(on_screen.y, 360.0));
}

#[test]
fn auto_zoom_is_idempotent() {
    let config = EditorConfig::default();
    let mut viewport = Viewport::default();
    viewport.auto_zoom(Size::new(1000.0, 800.0), workspace(), &config);
    let first = viewport.transform.as_coeffs();
    viewport.auto_zoom(Size::new(1000.0, 800.0), workspace(), &config);
    let second = viewport.transform.as_coeffs();
    for (a, b) in first.iter().zip(second.iter()) {
        assert!(approx_eq(*a, *b));
    }
}

#[test]
fn auto_zoom_sets_clip_to_workspace() {
    let config = EditorConfig::default();
    let mut viewport = Viewport::default();
    viewport.auto_zoom(Size::new(1000.0, 800.0), workspace(), &config);
    assert_eq!(viewport.clip, Some(workspace()));
}

#[test]
fn zoom_in_steps_and_clamps_to_max() {
    let config = EditorConfig::default();
    let surface = Size::new(1000.0, 800.0);
    let mut viewport = Viewport::default();
    viewport.zoom_to_point(Point::new(500.0, 400.0), 0.9);

    assert!(approx_eq(viewport.zoom_in(surface, &config), 0.95));
    assert!(approx_eq(viewport.zoom_in(surface, &config), 1.0));
    assert!(approx_eq(viewport.zoom_in(surface, &config), 1.0));
}

#[test]
fn zoom_out_clamps_to_min() {
    let config = EditorConfig::default();
    let surface = Size::new(1000.0, 800.0);
    let mut viewport = Viewport::default();
    viewport.zoom_to_point(Point::new(500.0, 400.0), 0.22);

    assert!(approx_eq(viewport.zoom_out(surface, &config), 0.2));
    assert!(approx_eq(viewport.zoom_out(surface, &config), 0.2));
}

#[test]
fn zoom_keeps_surface_center_fixed() {
    let config = EditorConfig::default();
    let surface = Size::new(1000.0, 800.0);
    let mut viewport = Viewport::default();
    viewport.auto_zoom(surface, workspace(), &config);

    let center = Point::new(500.0, 400.0);
    let before = viewport.screen_to_world(center);
    viewport.zoom_in(surface, &config);
    let after = viewport.screen_to_world(center);
    assert!(approx_eq(before.x, after.x));
    assert!(approx_eq(before.y, after.y));
}

#[test]
fn screen_world_round_trip() {
    let mut viewport = Viewport::default();
    viewport.zoom_to_point(Point::new(100.0, 100.0), 0.5);
    let world = Point::new(37.0, -12.5);
    let back = viewport.screen_to_world(viewport.world_to_screen(world));
    assert!(approx_eq(back.x, world.x));
    assert!(approx_eq(back.y, world.y));
}

#[test]
fn collapsed_container_keeps_the_current_fit() {
    let config = EditorConfig::default();
    let mut viewport = Viewport::default();
    viewport.auto_zoom(Size::new(1280.0, 720.0), workspace(), &config);
    let fitted = viewport.transform;

    let zoom = viewport.auto_zoom(Size::new(0.0, 0.0), workspace(), &config);
    assert!(approx_eq(zoom, 0.51));
    assert_eq!(viewport.transform, fitted);
    assert_eq!(viewport.clip, Some(workspace()));
}

#[test]
fn zooming_a_collapsed_matrix_stays_finite() {
    let config = EditorConfig::default();
    let mut viewport = Viewport { transform: Affine::scale(0.0), clip: None };
    let surface = Size::new(200.0, 100.0);

    let zoom = viewport.zoom_in(surface, &config);
    let (x, y) = viewport.pan();
    assert!(approx_eq(zoom, config.min_zoom));
    assert!(x.is_finite() && y.is_finite());
    assert!(viewport.screen_to_world(Point::new(10.0, 10.0)).x.is_finite());
}
