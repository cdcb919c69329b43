use crate::storage::handle::ColliderRef;

/// Unordered pair of colliders.
///
/// The two handles are stored sorted, so `ColliderPair::new(a, b)` and
/// `ColliderPair::new(b, a)` are equal and hash the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderPair {
    first: ColliderRef,
    second: ColliderRef,
}

impl ColliderPair {
    pub fn new(a: ColliderRef, b: ColliderRef) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> ColliderRef {
        self.first
    }

    pub fn second(&self) -> ColliderRef {
        self.second
    }

    pub fn contains(&self, collider: ColliderRef) -> bool {
        self.first == collider || self.second == collider
    }
}
