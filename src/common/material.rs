//! Defines physical material properties.

use serde::{Deserialize, Serialize};

/// Surface properties of a collider affecting contact resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Coefficient of restitution (bounciness). Range [0, 1].
    /// 0 = perfectly inelastic (no bounce), 1 = perfectly elastic.
    pub restitution: f32,
    /// Coefficient of friction. Range [0, infinity).
    /// Stored with the collider; the contact solver resolves along the normal only.
    pub friction: f32,
}

impl Material {
    /// Creates a new material with the given restitution and friction.
    pub fn new(restitution: f32, friction: f32) -> Self {
        Material {
            // Clamp values to reasonable ranges
            restitution: restitution.clamp(0.0, 1.0),
            friction: friction.max(0.0),
        }
    }

    pub fn bouncy() -> Self {
        Material::new(1.0, 0.0)
    }

    pub fn inelastic() -> Self {
        Material::new(0.0, 0.5)
    }
}

impl Default for Material {
    /// Moderate restitution, moderate friction.
    fn default() -> Self {
        Material {
            restitution: 0.2,
            friction: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_new_clamps() {
        let m = Material::new(1.5, -0.3);
        assert_eq!(m.restitution, 1.0);
        assert_eq!(m.friction, 0.0);
        let m = Material::new(-0.1, 0.7);
        assert_eq!(m.restitution, 0.0);
        assert_eq!(m.friction, 0.7);
    }
}
