use super::*;

/// N-gon inscribed in a circle of radius `w / 2`.
pub struct RegularPolygonShape {
    pub id: &'static str,
    pub sides: u32,
    /// Angle of the first vertex, in radians.
    pub start_angle: f64,
}

impl RegularPolygonShape {
    pub fn pentagon() -> Self {
        RegularPolygonShape { id: "pentagon", sides: 5, start_angle: -PI / 2.0 }
    }

    pub fn hexagon() -> Self {
        RegularPolygonShape { id: "hexagon", sides: 6, start_angle: 0.0 }
    }
}

impl PolygonShape for RegularPolygonShape {
    fn id(&self) -> &'static str {
        self.id
    }

    fn generate_points(&self, w: f64, h: f64) -> Vec<Point> {
        let radius = w / 2.0;
        let (cx, cy) = (w / 2.0, h / 2.0);
        (0..self.sides)
            .map(|i| {
                let angle = (i as f64 * PI * 2.0) / self.sides as f64 + self.start_angle;
                Point::new(cx + angle.cos() * radius, cy + angle.sin() * radius)
            })
            .collect()
    }
}
