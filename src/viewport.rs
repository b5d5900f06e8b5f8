use kurbo::{Affine, Point, Rect, Size};

use crate::config::EditorConfig;

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Scene to surface pixels, `screen = zoom * world + pan`.
    pub transform: Affine,
    /// Scene-space clip region; always the workspace bounds once set.
    pub clip: Option<Rect>,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { transform: Affine::IDENTITY, clip: None }
    }
}

/// Uniform scale that fits `object` inside `container`.
pub fn scale_to_fit(object: Size, container: Size) -> f64 {
    if object.width <= 0.0 || object.height <= 0.0 {
        return 1.0;
    }
    (container.width / object.width).min(container.height / object.height)
}

impl Viewport {
    pub fn zoom(&self) -> f64 {
        self.transform.as_coeffs()[0]
    }

    pub fn pan(&self) -> (f64, f64) {
        let c = self.transform.as_coeffs();
        (c[4], c[5])
    }

    pub fn reset(&mut self) {
        self.transform = Affine::IDENTITY;
    }

    /// Sets the zoom level while keeping the scene point under `anchor`
    /// (surface pixels) fixed on screen.
    pub fn zoom_to_point(&mut self, anchor: Point, zoom: f64) {
        // a collapsed matrix has no inverse; treat the anchor as scene space
        let world = if self.is_invertible() { self.transform.inverse() * anchor } else { anchor };
        self.transform = Affine::new([zoom, 0.0, 0.0, zoom, anchor.x - world.x * zoom, anchor.y - world.y * zoom]);
    }

    /// Fits the workspace into the container at the configured padding ratio
    /// and centers it. Returns the new zoom.
    /// A collapsed container (zero or negative size) keeps the current
    /// transform.
    pub fn auto_zoom(&mut self, container: Size, workspace: Rect, config: &EditorConfig) -> f64 {
        self.clip = Some(workspace);
        let zoom = config.zoom_ratio * scale_to_fit(workspace.size(), container);
        if !(container.width > 0.0 && container.height > 0.0 && zoom.is_finite() && zoom > 0.0) {
            tracing::debug!(width = container.width, height = container.height, "skipping fit to collapsed container");
            return self.zoom();
        }
        let center = Point::new(container.width / 2.0, container.height / 2.0);

        self.reset();
        self.zoom_to_point(center, zoom);

        let ws_center = workspace.center();
        let c = self.transform.as_coeffs();
        self.transform = Affine::new([
            c[0],
            c[1],
            c[2],
            c[3],
            container.width / 2.0 - ws_center.x * c[0],
            container.height / 2.0 - ws_center.y * c[3],
        ]);
        zoom
    }

    pub fn zoom_in(&mut self, surface: Size, config: &EditorConfig) -> f64 {
        self.step_zoom(surface, config.zoom_step, config)
    }

    pub fn zoom_out(&mut self, surface: Size, config: &EditorConfig) -> f64 {
        self.step_zoom(surface, -config.zoom_step, config)
    }

    fn step_zoom(&mut self, surface: Size, delta: f64, config: &EditorConfig) -> f64 {
        let zoom = (self.zoom() + delta).clamp(config.min_zoom, config.max_zoom);
        let center = Point::new(surface.width / 2.0, surface.height / 2.0);
        self.zoom_to_point(center, zoom);
        zoom
    }

    fn is_invertible(&self) -> bool {
        let det = self.transform.determinant();
        det.is_finite() && det != 0.0
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        if !self.is_invertible() {
            return screen;
        }
        self.transform.inverse() * screen
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.transform * world
    }
}
