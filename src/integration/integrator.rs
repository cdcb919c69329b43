use crate::math::vec2::Vec2;
use crate::objects::Body;

/// Adds the weight of a dynamic body (`gravity * mass`) to its force accumulator.
pub fn apply_gravity(body: &mut Body, gravity: Vec2) {
    if body.is_dynamic() && gravity != Vec2::ZERO {
        body.apply_force(gravity * body.mass);
    }
}

/// Integrates the body's state forward in time using Semi-Implicit Euler.
pub fn integrate(body: &mut Body, dt: f32) {
    if !body.is_dynamic() || !body.is_valid() {
        // Static object, do not integrate
        body.clear_force();
        return;
    }

    // a = F/m
    let acceleration = body.force / body.mass;
    // v = v + a*dt
    body.velocity += acceleration * dt;
    // p = p + v*dt
    body.position += body.velocity * dt;

    // Clear the accumulator for the next step
    body.clear_force();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::BodyKind;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_integrate_linear_motion_no_force() {
        let mut body = Body::new();
        body.velocity = Vec2::new(10.0, -5.0);

        integrate(&mut body, 0.1);

        assert!((body.position.x - 1.0).abs() < EPSILON);
        assert!((body.position.y - -0.5).abs() < EPSILON);
        assert_eq!(body.velocity, Vec2::new(10.0, -5.0)); // Velocity unchanged
        assert_eq!(body.force, Vec2::ZERO);
    }

    #[test]
    fn test_integrate_unit_force() {
        let mut body = Body::new();
        body.apply_force(Vec2::new(1.0, 0.0));

        integrate(&mut body, 0.1);

        assert_relative_eq!(body.velocity.x, 0.1, epsilon = EPSILON);
        assert_relative_eq!(body.velocity.y, 0.0, epsilon = EPSILON);
        assert_relative_eq!(body.position.x, 0.01, epsilon = EPSILON);
        assert_relative_eq!(body.position.y, 0.0, epsilon = EPSILON);
        assert_eq!(body.force, Vec2::ZERO);
    }

    #[test]
    fn test_integrate_heavier_body() {
        let mut body = Body::new();
        body.mass = 2.0;
        body.apply_force(Vec2::new(10.0, 0.0));

        integrate(&mut body, 0.1);

        // a = (5, 0), v = (0.5, 0), p = (0.05, 0)
        assert_relative_eq!(body.velocity.x, 0.5, epsilon = EPSILON);
        assert_relative_eq!(body.position.x, 0.05, epsilon = EPSILON);
    }

    #[test]
    fn test_static_body_not_moved() {
        let mut body = Body::new();
        body.kind = BodyKind::Static;
        body.velocity = Vec2::new(3.0, 3.0);
        apply_gravity(&mut body, Vec2::new(0.0, -9.81));
        assert_eq!(body.force, Vec2::ZERO);

        body.apply_force(Vec2::new(5.0, 0.0));
        integrate(&mut body, 0.1);
        assert_eq!(body.position, Vec2::ZERO);
        assert_eq!(body.velocity, Vec2::new(3.0, 3.0));
        assert_eq!(body.force, Vec2::ZERO);
    }

    #[test]
    fn test_gravity_scales_with_mass() {
        let mut body = Body::new();
        body.mass = 3.0;
        apply_gravity(&mut body, Vec2::new(0.0, -10.0));
        assert_eq!(body.force, Vec2::new(0.0, -30.0));

        integrate(&mut body, 0.5);
        assert_relative_eq!(body.velocity.y, -5.0, epsilon = EPSILON);
    }
}
