use crate::common::Material;
use crate::shapes::ShapeKind;
use crate::storage::handle::{BodyRef, ColliderRef};
use crate::storage::slot_arena::Slot;

/// Attaches a shape to a body.
///
/// The geometry itself lives in the world's per-kind shape stores at
/// `shape_index`; `shape == ShapeKind::None` marks a free slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: ShapeKind,
    pub shape_index: usize,
    pub body: BodyRef,
    /// Handle of this collider, set when it is created
    pub self_ref: ColliderRef,
    pub material: Material,
    /// Triggers report overlaps but are never pushed apart
    pub is_trigger: bool,
}

impl Collider {
    pub fn new(body: BodyRef, shape: ShapeKind, shape_index: usize) -> Self {
        Self {
            shape,
            shape_index,
            body,
            self_ref: ColliderRef::new(0, 0),
            material: Material::default(),
            is_trigger: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.shape != ShapeKind::None
    }

    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    pub fn restitution(&self) -> f32 {
        self.material.restitution
    }

    pub fn friction(&self) -> f32 {
        self.material.friction
    }
}

impl Slot for Collider {
    fn is_valid(&self) -> bool {
        Collider::is_valid(self)
    }

    fn invalid() -> Self {
        Self::new(BodyRef::new(0, 0), ShapeKind::None, 0)
    }
}
