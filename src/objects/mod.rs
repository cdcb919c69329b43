pub mod body;
pub mod collider;

pub use body::{Body, BodyKind};
pub use collider::Collider;
