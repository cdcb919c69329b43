use crate::collision::AABB;
use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as center + half size.
/// `center` is an offset from the owning body's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl Rectangle {
    pub fn new(center: Vec2, half_size: Vec2) -> Result<Self> {
        if !(half_size.x >= 0.0 && half_size.y >= 0.0) {
            return Err(PhysicsError::InvalidShape(format!(
                "rectangle half size must be non-negative, got {half_size:?}"
            )));
        }
        Ok(Self { center, half_size })
    }

    /// Builds a rectangle from two opposite corners, in any order.
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        let lo = min.min(max);
        let hi = min.max(max);
        Self {
            center: (lo + hi) * 0.5,
            half_size: (hi - lo) * 0.5,
        }
    }

    /// Half size with the sign dropped; `half_size` is public and may be
    /// edited after construction.
    pub fn extents(&self) -> Vec2 {
        self.half_size.abs()
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.extents()
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.extents()
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            center: self.center + offset,
            half_size: self.half_size,
        }
    }

    pub fn bounds(&self) -> AABB {
        AABB::new(self.min(), self.max())
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_size: Vec2::splat(0.5),
        }
    }
}
