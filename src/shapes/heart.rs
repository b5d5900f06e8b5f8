use super::*;

const ARC_STEPS: u32 = 10;

pub struct HeartShape;

impl PolygonShape for HeartShape {
    fn id(&self) -> &'static str {
        "heart"
    }

    fn generate_points(&self, w: f64, h: f64) -> Vec<Point> {
        let cx = w / 2.0;
        let top_y = h * 0.3;
        let mut points = Vec::with_capacity((ARC_STEPS as usize + 1) * 2 + 1);

        // left lobe, traced from the outside in
        for i in 0..=ARC_STEPS {
            let angle = PI - (i as f64 / ARC_STEPS as f64) * PI;
            points.push(Point::new(
                cx - w * 0.25 + w * 0.25 * angle.cos(),
                top_y + h * 0.15 * angle.sin(),
            ));
        }
        for i in 0..=ARC_STEPS {
            let angle = (i as f64 / ARC_STEPS as f64) * PI;
            points.push(Point::new(
                cx + w * 0.25 + w * 0.25 * angle.cos(),
                top_y + h * 0.15 * angle.sin(),
            ));
        }
        points.push(Point::new(cx, h * 0.9));
        points
    }
}
