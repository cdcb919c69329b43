pub mod allocator;
pub mod handle;
pub mod shape_store;
pub mod slot_arena;

pub use allocator::{
    Allocator, AllocatorStats, HeapAllocator, LinearAllocator, ProxyAllocator, SharedAllocator,
};
pub use handle::{BodyRef, ColliderRef, Handle};
pub use shape_store::{ShapeStore, ShapeStores};
pub use slot_arena::{Slot, SlotArena};
