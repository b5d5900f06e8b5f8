use super::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArrowDirection {
    Right,
    Left,
    Up,
    Down,
}

/// Block arrow: shaft spans 30%..70% of the cross axis, head starts at 70%
/// (or 30% when pointing backwards) of the main axis.
pub struct ArrowShape {
    pub direction: ArrowDirection,
}

impl PolygonShape for ArrowShape {
    fn id(&self) -> &'static str {
        match self.direction {
            ArrowDirection::Right => "arrow-right",
            ArrowDirection::Left => "arrow-left",
            ArrowDirection::Up => "arrow-up",
            ArrowDirection::Down => "arrow-down",
        }
    }

    fn generate_points(&self, w: f64, h: f64) -> Vec<Point> {
        let p = Point::new;
        match self.direction {
            ArrowDirection::Right => vec![
                p(0.0, h * 0.3),
                p(w * 0.7, h * 0.3),
                p(w * 0.7, 0.0),
                p(w, h / 2.0),
                p(w * 0.7, h),
                p(w * 0.7, h * 0.7),
                p(0.0, h * 0.7),
            ],
            ArrowDirection::Left => vec![
                p(w, h * 0.3),
                p(w * 0.3, h * 0.3),
                p(w * 0.3, 0.0),
                p(0.0, h / 2.0),
                p(w * 0.3, h),
                p(w * 0.3, h * 0.7),
                p(w, h * 0.7),
            ],
            ArrowDirection::Up => vec![
                p(w * 0.3, h),
                p(w * 0.3, h * 0.3),
                p(0.0, h * 0.3),
                p(w / 2.0, 0.0),
                p(w, h * 0.3),
                p(w * 0.7, h * 0.3),
                p(w * 0.7, h),
            ],
            ArrowDirection::Down => vec![
                p(w * 0.3, 0.0),
                p(w * 0.3, h * 0.7),
                p(0.0, h * 0.7),
                p(w / 2.0, h),
                p(w, h * 0.7),
                p(w * 0.7, h * 0.7),
                p(w * 0.7, 0.0),
            ],
        }
    }
}
