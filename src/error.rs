//! Error types for the physics core

use crate::shapes::ShapeKind;
use thiserror::Error;

/// Which store a handle or index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Body,
    Collider,
    Shape(ShapeKind),
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Body => write!(f, "body"),
            StoreKind::Collider => write!(f, "collider"),
            StoreKind::Shape(kind) => write!(f, "{kind:?} shape"),
        }
    }
}

/// Physics core errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// The handle's generation no longer matches the slot: the entity is gone
    #[error("stale {kind} reference {index}v{generation} (slot is at generation {current})")]
    StaleReference {
        kind: StoreKind,
        index: usize,
        generation: usize,
        current: usize,
    },

    /// Index past the end of a store
    #[error("{kind} index {index} out of range (len={len})")]
    IndexOutOfRange {
        kind: StoreKind,
        index: usize,
        len: usize,
    },

    /// Two handles expected to be distinct point at the same slot
    #[error("{kind} handles both refer to slot {index}")]
    AliasedHandles { kind: StoreKind, index: usize },

    /// A per-kind shape accessor was used on a collider of another kind
    #[error("expected a {expected:?} collider, found {found:?}")]
    ShapeKindMismatch {
        expected: ShapeKind,
        found: ShapeKind,
    },

    /// Shape parameters are unusable
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A bounded allocator refused to grow a store
    #[error("allocation of {requested} bytes failed ({available} bytes available)")]
    AllocationFailed { requested: usize, available: usize },
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
