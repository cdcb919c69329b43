pub mod aabb;
pub mod detection;
pub mod manifold;
pub mod pair;
pub mod quad_tree;

// Re-export key types
pub use aabb::AABB;
pub use detection::intersect;
pub use manifold::{Contact, Intersection};
pub use pair::ColliderPair;
pub use quad_tree::{PairingMode, QuadEntry, QuadNode, QuadTree, QuadTreeConfig};
