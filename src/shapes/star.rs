use super::*;

/// Ratio of the inner to the outer radius of the default star.
pub const STAR_INNER_RATIO: f64 = 0.4;

pub struct StarShape {
    pub points: u32,
    pub inner_ratio: f64,
}

impl Default for StarShape {
    fn default() -> Self {
        StarShape { points: 5, inner_ratio: STAR_INNER_RATIO }
    }
}

impl PolygonShape for StarShape {
    fn id(&self) -> &'static str {
        "star"
    }

    fn generate_points(&self, w: f64, h: f64) -> Vec<Point> {
        let outer = w / 2.0;
        let inner = outer * self.inner_ratio;
        let (cx, cy) = (w / 2.0, h / 2.0);
        let count = self.points * 2;

        (0..count)
            .map(|i| {
                let angle = (i as f64 * PI * 2.0) / count as f64 - PI / 2.0;
                let r = if i % 2 == 0 { outer } else { inner };
                Point::new(cx + angle.cos() * r, cy + angle.sin() * r)
            })
            .collect()
    }
}
