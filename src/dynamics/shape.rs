use core::f32::consts::PI;

use crate::math::Vec2;

/// Shape descriptor for a rigid body. A tagged variant rather than a trait
/// hierarchy: the body stays a single concrete record and dispatches on this.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle of the given full extents, centered on the
    /// body origin in local space.
    Box { size: Vec2 },
    /// Solid disk. Carries no local vertices.
    Circle { radius: f32 },
}

impl Shape {
    /// Local-space vertices relative to the body origin. Boxes yield their
    /// four corners counter-clockwise starting bottom-left; circles yield
    /// nothing.
    pub fn local_vertices(&self) -> Vec<Vec2> {
        match *self {
            Shape::Box { size } => {
                let half = size * 0.5;
                vec![
                    Vec2::new(-half.x, -half.y),
                    Vec2::new(half.x, -half.y),
                    Vec2::new(half.x, half.y),
                    Vec2::new(-half.x, half.y),
                ]
            }
            Shape::Circle { .. } => Vec::new(),
        }
    }

    #[inline]
    pub fn area(&self) -> f32 {
        match *self {
            Shape::Box { size } => size.x * size.y,
            Shape::Circle { radius } => radius * radius * PI,
        }
    }

    /// Moment of inertia about the centroid for the given mass: thin
    /// rectangular plate for boxes, solid disk for circles.
    #[inline]
    pub fn inertia(&self, mass: f32) -> f32 {
        match *self {
            Shape::Box { size } => mass * (size.x * size.x + size.y * size.y) / 12.0,
            Shape::Circle { radius } => 0.5 * mass * radius * radius,
        }
    }
}
