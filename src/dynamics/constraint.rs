use crate::dynamics::body::Body;
use crate::math::Vec2;

/// Signed speed of the body's designated contact point along the contact
/// normal toward `anchor`. Negative means the point is closing in.
///
/// The designated point is the body's first world-space vertex; bodies with
/// no vertices report zero.
pub fn closing_speed(body: &mut Body, anchor: Vec2) -> f32 {
    let Some(&contact) = body.transformed_points().first() else {
        return 0.0;
    };
    let normal = (contact - anchor).normalize();
    let lever = anchor - body.position;
    let relative_velocity = -(body.linear_velocity + lever.perp() * body.angular_velocity);
    relative_velocity.dot(normal)
}

/// Single-contact, single-iteration impulse resolution against a fixed
/// world-space anchor.
///
/// When the body's first world-space vertex is closing in on `anchor`, an
/// impulse along the contact normal cancels the closing velocity scaled by
/// `1 + restitution`, split between linear and angular motion through the
/// effective mass. Separating contacts pass through untouched, as do static
/// bodies and bodies without vertices.
pub fn resolve_pin(body: &mut Body, anchor: Vec2) {
    if body.inv_mass == 0.0 {
        return;
    }
    let Some(&contact) = body.transformed_points().first() else {
        return;
    };

    let offset = contact - anchor;
    let normal = offset.normalize();
    let restitution = body.restitution;

    let lever = anchor - body.position;
    let lever_perp = lever.perp();

    let angular_at_contact = lever_perp * body.angular_velocity;
    let relative_velocity = -(body.linear_velocity + angular_at_contact);
    let closing = relative_velocity.dot(normal);
    if closing > 0.0 {
        return;
    }

    let perp_dot_normal = lever_perp.dot(normal);
    let effective_mass = body.inv_mass + perp_dot_normal * perp_dot_normal * body.inv_inertia;

    let j = -(1.0 + restitution) * closing / effective_mass;
    let impulse = normal * j;

    // TODO: split the positional snap out of the velocity resolution. The
    // offset is a length; subtracting it from linear_velocity mixes units.
    body.position -= offset;
    body.linear_velocity -= offset;

    body.linear_velocity -= impulse * body.inv_mass;
    body.angular_velocity -= lever.cross(impulse) * body.inv_inertia;

    // Position changed, so the cached geometry is stale.
    body.mark_pose_stale();
}
