pub use kurbo::Point;
pub use std::f64::consts::PI;

use crate::types::ShapeKind;

#[cfg(test)]
#[path = "shapes_test.rs"]
mod shapes_test;

pub trait PolygonShape {
    fn id(&self) -> &'static str;
    fn generate_points(&self, width: f64, height: f64) -> Vec<Point>;
}

pub mod arrow;
pub mod basic;
pub mod heart;
pub mod regular;
pub mod star;

/// Generator for a polygon-backed shape kind; `None` for kinds built from
/// native primitives (rects, circles, ellipses, triangles).
pub fn polygon_for(kind: ShapeKind) -> Option<Box<dyn PolygonShape>> {
    use arrow::{ArrowDirection, ArrowShape};

    let shape: Box<dyn PolygonShape> = match kind {
        ShapeKind::InverseTriangle => Box::new(basic::InverseTriangleShape),
        ShapeKind::Diamond => Box::new(basic::DiamondShape),
        ShapeKind::Plus => Box::new(basic::PlusShape),
        ShapeKind::Star => Box::new(star::StarShape::default()),
        ShapeKind::Pentagon => Box::new(regular::RegularPolygonShape::pentagon()),
        ShapeKind::Hexagon => Box::new(regular::RegularPolygonShape::hexagon()),
        ShapeKind::Heart => Box::new(heart::HeartShape),
        ShapeKind::ArrowRight => Box::new(ArrowShape { direction: ArrowDirection::Right }),
        ShapeKind::ArrowLeft => Box::new(ArrowShape { direction: ArrowDirection::Left }),
        ShapeKind::ArrowUp => Box::new(ArrowShape { direction: ArrowDirection::Up }),
        ShapeKind::ArrowDown => Box::new(ArrowShape { direction: ArrowDirection::Down }),
        ShapeKind::Circle
        | ShapeKind::SoftRectangle
        | ShapeKind::Rectangle
        | ShapeKind::Triangle
        | ShapeKind::Ellipse => return None,
    };
    Some(shape)
}
