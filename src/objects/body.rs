use crate::math::vec2::Vec2;
use crate::storage::slot_arena::Slot;
use serde::{Deserialize, Serialize};

/// How a body takes part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moved by the integrator or the contact solver
    Static,
    #[default]
    Dynamic,
}

/// Point-mass rigid body (linear motion only).
///
/// A body with `mass <= 0` marks a free slot; [`Body::new`] hands out
/// mass 1 so a freshly created body is immediately valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    /// Accumulated force, cleared after every integration step
    pub force: Vec2,
    pub kind: BodyKind,
}

impl Body {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            mass: 1.0,
            force: Vec2::ZERO,
            kind: BodyKind::Dynamic,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.mass > 0.0
    }

    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// 1/mass for dynamic bodies, 0 for static ones and free slots.
    pub fn inverse_mass(&self) -> f32 {
        if self.is_dynamic() && self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Adds `force` to the accumulator.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn clear_force(&mut self) {
        self.force = Vec2::ZERO;
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

impl Slot for Body {
    fn is_valid(&self) -> bool {
        Body::is_valid(self)
    }

    fn invalid() -> Self {
        Self {
            mass: 0.0,
            ..Self::new()
        }
    }
}
