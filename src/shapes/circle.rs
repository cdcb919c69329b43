use crate::collision::AABB;
use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// A circle, `center` being an offset from the owning body's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Result<Self> {
        if !(radius >= 0.0) {
            return Err(PhysicsError::InvalidShape(format!(
                "circle radius must be non-negative, got {radius}"
            )));
        }
        Ok(Self { center, radius })
    }

    /// Circle centered on the body origin.
    pub fn with_radius(radius: f32) -> Result<Self> {
        Self::new(Vec2::ZERO, radius)
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            center: self.center + offset,
            radius: self.radius,
        }
    }

    pub fn bounds(&self) -> AABB {
        let r = Vec2::splat(self.radius);
        AABB::new(self.center - r, self.center + r)
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            radius: 0.5,
        }
    }
}
