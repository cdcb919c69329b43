//! 2D point-mass physics: generational body and collider stores, a
//! quad-tree broad phase, circle/rectangle narrow phase and impulse-based
//! contact resolution with trigger enter/stay/exit callbacks.

pub mod collision;
pub mod common;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod storage;
pub mod world;

// Re-export key types for easier use
pub use collision::{ColliderPair, Contact, Intersection, PairingMode, QuadTree, QuadTreeConfig, AABB};
pub use common::Material;
pub use error::{PhysicsError, Result};
pub use math::vec2::Vec2;
pub use objects::{Body, BodyKind, Collider};
pub use shapes::{Circle, Polygon, Rectangle, Shape, ShapeKind};
pub use storage::{BodyRef, ColliderRef};
pub use world::{AllocatorConfig, TriggerListener, World, WorldConfig};
