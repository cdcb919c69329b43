//! Generational handles into the world's stores
//!
//! A handle is an `(index, generation)` pair. The store bumps a slot's
//! generation every time the entity in it is destroyed, so a handle kept
//! across a destroy no longer matches and is reported as stale instead of
//! silently resolving to whatever now lives in the recycled slot.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::objects::{Body, Collider};

/// Reference to a [`Body`] slot.
pub type BodyRef = Handle<Body>;
/// Reference to a [`Collider`] slot.
pub type ColliderRef = Handle<Collider>;

/// A type-safe generational handle to an entity of type `T`
pub struct Handle<T> {
    index: usize,
    generation: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Create a handle from index and generation
    #[inline]
    pub const fn new(index: usize, generation: usize) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index in the store
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Generation the slot had when this handle was issued
    #[inline]
    pub const fn generation(&self) -> usize {
        self.generation
    }
}

// Manual trait implementations to avoid T bounds
impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.index, self.generation).cmp(&(other.index, other.generation))
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = core::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        write!(f, "{}Ref({}v{})", short, self.index, self.generation)
    }
}
