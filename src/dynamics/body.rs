use core::fmt;

use crate::collision::Aabb;
use crate::dynamics::constraint::resolve_pin;
use crate::dynamics::shape::Shape;
use crate::math::Vec2;

/// Construction rejected because the definition would produce a body with
/// zero or negative mass properties.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BodyError {
    NonPositiveDensity(f32),
    NonPositiveExtent(Vec2),
    NonPositiveRadius(f32),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BodyError::NonPositiveDensity(d) => {
                write!(f, "non-static body requires a strictly positive density, got {d}")
            }
            BodyError::NonPositiveExtent(s) => {
                write!(f, "box extents must be strictly positive, got ({}, {})", s.x, s.y)
            }
            BodyError::NonPositiveRadius(r) => {
                write!(f, "circle radius must be strictly positive, got {r}")
            }
        }
    }
}

impl std::error::Error for BodyError {}

/// Per-field overrides applied after the shape-derived defaults, so a caller
/// can replace derived values (including mass and inertia) directly. Inverses
/// are always recomputed from the final mass and inertia.
#[derive(Copy, Clone, Debug, Default)]
pub struct BodyOptions {
    pub is_static: bool,
    pub density: Option<f32>,
    pub restitution: Option<f32>,
    pub static_friction: Option<f32>,
    pub dynamic_friction: Option<f32>,
    pub angle: Option<f32>,
    pub linear_velocity: Option<Vec2>,
    pub angular_velocity: Option<f32>,
    pub mass: Option<f32>,
    pub inertia: Option<f32>,
    /// World-space anchor for the point constraint. `Some` makes the body
    /// constraint-active; the anchor itself is owned by the caller and is
    /// never written by this crate.
    pub pin: Option<Vec2>,
}

#[derive(Copy, Clone, Debug)]
pub struct BodyDef {
    pub position: Vec2,
    pub shape: Shape,
    pub options: BodyOptions,
}

impl BodyDef {
    #[inline]
    pub fn new(position: Vec2, shape: Shape) -> Self {
        Self {
            position,
            shape,
            options: BodyOptions::default(),
        }
    }
}

impl Default for BodyDef {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Shape::Box { size: Vec2::new(1.0, 1.0) })
    }
}

/// A rigid body: pose, motion state, mass properties, and two lazily cached
/// pieces of derived geometry (world-space vertices and bounding box).
///
/// The caches sit behind dirty flags. Every pose mutation marks them stale;
/// the accessors recompute on the next read and reuse the cached value until
/// the pose changes again. Nothing recomputes eagerly.
#[derive(Clone, Debug)]
pub struct Body {
    pub shape: Shape,

    pub position: Vec2,
    pub angle: f32,

    pub linear_velocity: Vec2,
    pub angular_velocity: f32,

    /// Force accumulator, cleared by every `update`. `apply_force` overwrites
    /// it rather than summing: last write wins.
    pub force: Vec2,

    pub density: f32,
    pub area: f32,
    pub mass: f32,
    pub inv_mass: f32,
    pub inertia: f32,
    pub inv_inertia: f32,

    pub restitution: f32,
    // Stored for the fuller contact model; the pin resolver does not read them.
    pub static_friction: f32,
    pub dynamic_friction: f32,

    pub is_static: bool,
    pub pin: Option<Vec2>,

    local_vertices: Vec<Vec2>,
    world_vertices: Vec<Vec2>,
    transform_stale: bool,
    aabb: Aabb,
    aabb_stale: bool,
}

#[inline]
fn inverse_or_zero(x: f32) -> f32 {
    if x > 0.0 && x.is_finite() { 1.0 / x } else { 0.0 }
}

impl Body {
    pub fn from_def(def: BodyDef) -> Result<Self, BodyError> {
        let opts = def.options;
        let density = opts.density.unwrap_or(1.0);

        if !opts.is_static {
            if !(density > 0.0) || !density.is_finite() {
                return Err(BodyError::NonPositiveDensity(density));
            }
            match def.shape {
                Shape::Box { size } => {
                    if !(size.x > 0.0 && size.y > 0.0) {
                        return Err(BodyError::NonPositiveExtent(size));
                    }
                }
                Shape::Circle { radius } => {
                    if !(radius > 0.0) {
                        return Err(BodyError::NonPositiveRadius(radius));
                    }
                }
            }
        }

        let area = def.shape.area();
        let (mut mass, mut inertia) = if opts.is_static {
            // Static bodies behave as infinitely heavy: zero inverses, the
            // mass fields themselves stay at the zero sentinel and are never
            // read by integration.
            (0.0, 0.0)
        } else {
            let mass = density * area;
            (mass, def.shape.inertia(mass))
        };

        // Explicit overrides win over the derived values.
        if let Some(m) = opts.mass {
            mass = m;
        }
        if let Some(i) = opts.inertia {
            inertia = i;
        }
        let (inv_mass, inv_inertia) = if opts.is_static {
            (0.0, 0.0)
        } else {
            (inverse_or_zero(mass), inverse_or_zero(inertia))
        };

        Ok(Self {
            shape: def.shape,
            position: def.position,
            angle: opts.angle.unwrap_or(0.0),
            linear_velocity: opts.linear_velocity.unwrap_or(Vec2::ZERO),
            angular_velocity: opts.angular_velocity.unwrap_or(0.0),
            force: Vec2::ZERO,
            density,
            area,
            mass,
            inv_mass,
            inertia,
            inv_inertia,
            restitution: opts.restitution.unwrap_or(0.4),
            static_friction: opts.static_friction.unwrap_or(0.6),
            dynamic_friction: opts.dynamic_friction.unwrap_or(0.4),
            is_static: opts.is_static,
            pin: opts.pin,
            local_vertices: def.shape.local_vertices(),
            world_vertices: Vec::new(),
            // Both caches start stale so the first access recomputes from the
            // fully constructed state.
            transform_stale: true,
            aabb: Aabb::default(),
            aabb_stale: true,
        })
    }

    /// World-space vertices, `position + local.rotate(angle)` each. Recomputed
    /// only when the transform cache is stale; empty for circles.
    pub fn transformed_points(&mut self) -> &[Vec2] {
        self.refresh_transform();
        &self.world_vertices
    }

    fn refresh_transform(&mut self) {
        if !self.transform_stale {
            return;
        }
        let position = self.position;
        let angle = self.angle;
        self.world_vertices.clear();
        self.world_vertices
            .extend(self.local_vertices.iter().map(|&p| position + p.rotate(angle)));
        self.transform_stale = false;
    }

    /// Current bounding box, recomputed shape-specifically when stale.
    pub fn aabb(&mut self) -> Aabb {
        if self.aabb_stale {
            match self.shape {
                Shape::Box { .. } => {
                    self.refresh_transform();
                    // Infinity sentinels so the first vertex wins both folds.
                    let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
                    let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
                    for p in &self.world_vertices {
                        min.x = min.x.min(p.x);
                        min.y = min.y.min(p.y);
                        max.x = max.x.max(p.x);
                        max.y = max.y.max(p.y);
                    }
                    self.aabb = Aabb::new(min, max);
                }
                Shape::Circle { radius } => {
                    // Rotation-invariant: a square of side 2r on the center.
                    let r = Vec2::new(radius, radius);
                    self.aabb = Aabb::new(self.position - r, self.position + r);
                }
            }
            self.aabb_stale = false;
        }
        self.aabb
    }

    /// Advance one step of semi-implicit Euler. Static bodies do not move.
    ///
    /// Constraint-active bodies run the pin resolver before integrating. The
    /// force accumulator is consumed as a ready velocity-per-time
    /// contribution (`linear_velocity += force * dt`) and cleared.
    pub fn update(&mut self, dt: f32) {
        if self.is_static {
            return;
        }
        if let Some(anchor) = self.pin {
            resolve_pin(self, anchor);
        }

        self.linear_velocity += self.force * dt;
        self.position += self.linear_velocity * dt;
        self.angle += self.angular_velocity * dt;

        self.force = Vec2::ZERO;
        self.mark_pose_stale();
    }

    #[inline]
    pub fn rotate(&mut self, delta: f32) {
        self.angle += delta;
        self.mark_pose_stale();
    }

    #[inline]
    pub fn rotate_to(&mut self, angle: f32) {
        self.angle = angle;
        self.mark_pose_stale();
    }

    /// Rotate `delta` radians about an external pivot, applying the resulting
    /// displacement to the position.
    pub fn rotate_about(&mut self, delta: f32, pivot: Vec2) {
        self.angle += delta;
        let displacement = self.position.rotate_about(delta, pivot) - self.position;
        self.position += displacement;
        self.mark_pose_stale();
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
        match self.shape {
            // No vertex cache to invalidate, but the box still follows the
            // center on the next read.
            Shape::Circle { .. } => self.aabb_stale = true,
            _ => self.mark_pose_stale(),
        }
    }

    #[inline]
    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
        self.mark_pose_stale();
    }

    /// Overwrite the force accumulator. Deliberately not additive: a second
    /// call before the next `update` discards the first.
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.force = force;
    }

    #[inline]
    pub(crate) fn mark_pose_stale(&mut self) {
        self.transform_stale = true;
        self.aabb_stale = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f32::consts::PI;

    fn dynamic_box(size: Vec2) -> Body {
        Body::from_def(BodyDef::new(Vec2::ZERO, Shape::Box { size })).unwrap()
    }

    #[test]
    fn static_body_has_zero_mass_and_inverses() {
        let def = BodyDef {
            options: BodyOptions {
                is_static: true,
                ..Default::default()
            },
            ..BodyDef::new(Vec2::new(1.0, 2.0), Shape::Box { size: Vec2::new(3.0, 4.0) })
        };
        let b = Body::from_def(def).unwrap();

        assert_relative_eq!(b.mass, 0.0);
        assert_relative_eq!(b.inv_mass, 0.0);
        assert_relative_eq!(b.inertia, 0.0);
        assert_relative_eq!(b.inv_inertia, 0.0);
    }

    #[test]
    fn box_mass_properties_follow_density_and_size() {
        let b = dynamic_box(Vec2::new(10.0, 10.0));

        assert_relative_eq!(b.area, 100.0);
        assert_relative_eq!(b.mass, 100.0);
        assert_relative_eq!(b.inv_mass, 0.01);
        assert_relative_eq!(b.inertia, 100.0 * 200.0 / 12.0, epsilon = 1e-3);
        assert_relative_eq!(b.inv_inertia, 12.0 / 20000.0, epsilon = 1e-7);
    }

    #[test]
    fn circle_mass_properties() {
        let b = Body::from_def(BodyDef {
            options: BodyOptions {
                density: Some(2.0),
                ..Default::default()
            },
            ..BodyDef::new(Vec2::ZERO, Shape::Circle { radius: 3.0 })
        })
        .unwrap();

        assert_relative_eq!(b.mass, 2.0 * 9.0 * PI, epsilon = 1e-3);
        assert_relative_eq!(b.inertia, 0.5 * b.mass * 9.0, epsilon = 1e-3);
        assert_relative_eq!(b.inv_mass * b.mass, 1.0, epsilon = 1e-6);
        assert_relative_eq!(b.inv_inertia * b.inertia, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn construction_rejects_bad_dynamic_definitions() {
        let r = Body::from_def(BodyDef {
            options: BodyOptions {
                density: Some(0.0),
                ..Default::default()
            },
            ..BodyDef::default()
        });
        assert_eq!(r.unwrap_err(), BodyError::NonPositiveDensity(0.0));

        let r = Body::from_def(BodyDef::new(
            Vec2::ZERO,
            Shape::Box { size: Vec2::new(5.0, 0.0) },
        ));
        assert!(matches!(r, Err(BodyError::NonPositiveExtent(_))));

        let r = Body::from_def(BodyDef::new(Vec2::ZERO, Shape::Circle { radius: -1.0 }));
        assert_eq!(r.unwrap_err(), BodyError::NonPositiveRadius(-1.0));

        // A static body with zero size is allowed; it never integrates.
        let r = Body::from_def(BodyDef {
            options: BodyOptions {
                is_static: true,
                ..Default::default()
            },
            ..BodyDef::new(Vec2::ZERO, Shape::Circle { radius: 0.0 })
        });
        assert!(r.is_ok());
    }

    #[test]
    fn overrides_apply_after_derivation() {
        let b = Body::from_def(BodyDef {
            options: BodyOptions {
                mass: Some(8.0),
                inertia: Some(4.0),
                restitution: Some(0.9),
                ..Default::default()
            },
            ..BodyDef::new(Vec2::ZERO, Shape::Box { size: Vec2::new(2.0, 2.0) })
        })
        .unwrap();

        // Derived mass would have been 4; the override wins and the inverses
        // follow the final values.
        assert_relative_eq!(b.mass, 8.0);
        assert_relative_eq!(b.inv_mass, 0.125);
        assert_relative_eq!(b.inertia, 4.0);
        assert_relative_eq!(b.inv_inertia, 0.25);
        assert_relative_eq!(b.restitution, 0.9);
    }

    #[test]
    fn apply_force_overwrites_previous_force() {
        let mut b = dynamic_box(Vec2::new(1.0, 1.0));
        b.apply_force(Vec2::new(5.0, 5.0));
        b.apply_force(Vec2::new(1.0, -2.0));

        assert_relative_eq!(b.force.x, 1.0);
        assert_relative_eq!(b.force.y, -2.0);
    }

    #[test]
    fn update_is_noop_for_static_bodies() {
        let mut b = Body::from_def(BodyDef {
            options: BodyOptions {
                is_static: true,
                linear_velocity: Some(Vec2::new(3.0, 0.0)),
                ..Default::default()
            },
            ..BodyDef::new(Vec2::new(7.0, 8.0), Shape::Box { size: Vec2::new(1.0, 1.0) })
        })
        .unwrap();

        b.apply_force(Vec2::new(100.0, 100.0));
        b.update(0.5);

        assert_relative_eq!(b.position.x, 7.0);
        assert_relative_eq!(b.position.y, 8.0);
        assert_relative_eq!(b.angle, 0.0);
        assert_relative_eq!(b.linear_velocity.x, 3.0);
        assert_relative_eq!(b.angular_velocity, 0.0);
    }

    #[test]
    fn update_integrates_force_then_position() {
        let mut b = dynamic_box(Vec2::new(2.0, 2.0));
        let f = Vec2::new(3.0, -1.5);
        let dt = 0.25;

        b.apply_force(f);
        b.update(dt);

        // v = F*dt, x = x0 + v*dt = F*dt^2.
        assert_relative_eq!(b.linear_velocity.x, f.x * dt, epsilon = 1e-6);
        assert_relative_eq!(b.linear_velocity.y, f.y * dt, epsilon = 1e-6);
        assert_relative_eq!(b.position.x, f.x * dt * dt, epsilon = 1e-6);
        assert_relative_eq!(b.position.y, f.y * dt * dt, epsilon = 1e-6);

        // Accumulator cleared.
        assert_relative_eq!(b.force.x, 0.0);
        assert_relative_eq!(b.force.y, 0.0);
    }

    #[test]
    fn update_advances_angle() {
        let mut b = Body::from_def(BodyDef {
            options: BodyOptions {
                angular_velocity: Some(2.0),
                ..Default::default()
            },
            ..BodyDef::default()
        })
        .unwrap();

        b.update(0.5);
        assert_relative_eq!(b.angle, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn transformed_points_follow_pose() {
        let mut b = dynamic_box(Vec2::new(2.0, 2.0));
        let pts = b.transformed_points().to_vec();
        assert_eq!(pts[0], Vec2::new(-1.0, -1.0));

        b.move_to(Vec2::new(10.0, 0.0));
        let pts = b.transformed_points().to_vec();
        assert_eq!(pts[0], Vec2::new(9.0, -1.0));

        b.rotate(PI);
        let pts = b.transformed_points().to_vec();
        assert_relative_eq!(pts[0].x, 11.0, epsilon = 1e-5);
        assert_relative_eq!(pts[0].y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn repeated_reads_reuse_the_cache() {
        let mut b = dynamic_box(Vec2::new(3.0, 1.0));
        b.rotate(0.3);

        let first = b.transformed_points().to_vec();
        let second = b.transformed_points().to_vec();
        assert_eq!(first, second);

        let a1 = b.aabb();
        let a2 = b.aabb();
        assert_eq!(a1, a2);
    }

    #[test]
    fn circle_move_by_refreshes_bounding_box() {
        let mut b = Body::from_def(BodyDef::new(Vec2::ZERO, Shape::Circle { radius: 2.0 }))
            .unwrap();
        let _ = b.aabb();

        b.move_by(Vec2::new(5.0, -1.0));
        let aabb = b.aabb();
        assert_relative_eq!(aabb.min.x, 3.0);
        assert_relative_eq!(aabb.min.y, -3.0);
        assert_relative_eq!(aabb.max.x, 7.0);
        assert_relative_eq!(aabb.max.y, 1.0);
    }

    #[test]
    fn rotate_about_moves_position_around_pivot() {
        let mut b = dynamic_box(Vec2::new(1.0, 1.0));
        b.move_to(Vec2::new(2.0, 0.0));
        b.rotate_about(core::f32::consts::FRAC_PI_2, Vec2::ZERO);

        assert_relative_eq!(b.position.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(b.position.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(b.angle, core::f32::consts::FRAC_PI_2, epsilon = 1e-6);
    }
}
