use crate::math::Vec2;

/// Axis-aligned bounding box given by its min and max corners.
///
/// Each body owns one and overwrites it in place when its pose changes;
/// `min <= max` holds componentwise whenever it has been recomputed.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Overlap test used by the broad phase.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}
