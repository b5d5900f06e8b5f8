use super::*;

pub struct DiamondShape;

impl PolygonShape for DiamondShape {
    fn id(&self) -> &'static str {
        "diamond"
    }

    fn generate_points(&self, w: f64, h: f64) -> Vec<Point> {
        vec![
            Point::new(w / 2.0, 0.0),
            Point::new(w, h / 2.0),
            Point::new(w / 2.0, h),
            Point::new(0.0, h / 2.0),
        ]
    }
}

pub struct InverseTriangleShape;

impl PolygonShape for InverseTriangleShape {
    fn id(&self) -> &'static str {
        "inverse-triangle"
    }

    fn generate_points(&self, w: f64, h: f64) -> Vec<Point> {
        vec![Point::new(0.0, 0.0), Point::new(w, 0.0), Point::new(w / 2.0, h)]
    }
}

/// Plus sign with bars 20% of the width thick.
pub struct PlusShape;

impl PolygonShape for PlusShape {
    fn id(&self) -> &'static str {
        "plus"
    }

    fn generate_points(&self, w: f64, h: f64) -> Vec<Point> {
        let t = w * 0.2;
        let (x0, x1) = (w / 2.0 - t / 2.0, w / 2.0 + t / 2.0);
        let (y0, y1) = (h / 2.0 - t / 2.0, h / 2.0 + t / 2.0);
        vec![
            Point::new(x0, 0.0),
            Point::new(x1, 0.0),
            Point::new(x1, y0),
            Point::new(w, y0),
            Point::new(w, y1),
            Point::new(x1, y1),
            Point::new(x1, h),
            Point::new(x0, h),
            Point::new(x0, y1),
            Point::new(0.0, y1),
            Point::new(0.0, y0),
            Point::new(x0, y0),
        ]
    }
}
