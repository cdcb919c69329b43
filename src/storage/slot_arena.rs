//! Growable generational arena
//!
//! Slots are never freed, only recycled: `create` reuses the first slot
//! whose entity is invalid and grows the storage when there is none,
//! `destroy` writes the invalid sentinel back and bumps the slot's
//! generation so outstanding handles go stale.

use core::alloc::Layout;

use crate::error::{PhysicsError, Result, StoreKind};
use crate::storage::allocator::SharedAllocator;
use crate::storage::handle::Handle;

/// Entities stored in a [`SlotArena`] carry their own liveness sentinel.
pub trait Slot {
    /// True while the slot holds a live entity
    fn is_valid(&self) -> bool;

    /// The sentinel value of a free slot
    fn invalid() -> Self;
}

impl<S> Slot for Option<S> {
    fn is_valid(&self) -> bool {
        self.is_some()
    }

    fn invalid() -> Self {
        None
    }
}

/// Length after one growth step: `max(len * factor, len + 1)`.
pub(crate) fn grown_len(len: usize, growth_factor: f32) -> usize {
    let scaled = (len as f32 * growth_factor) as usize;
    scaled.max(len + 1)
}

pub struct SlotArena<T: Slot> {
    kind: StoreKind,
    entries: Vec<T>,
    generations: Vec<usize>,
    /// Generation given to newly grown slots; raised past every issued
    /// generation on `clear`
    base_generation: usize,
    growth_factor: f32,
    allocator: SharedAllocator,
    /// Blocks reserved from the allocator, returned on `clear`
    blocks: Vec<Layout>,
}

impl<T: Slot> SlotArena<T> {
    pub fn new(kind: StoreKind, allocator: SharedAllocator, growth_factor: f32) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            generations: Vec::new(),
            base_generation: 0,
            growth_factor,
            allocator,
            blocks: Vec::new(),
        }
    }

    /// Arena with `count` free slots already reserved.
    pub fn with_slots(
        kind: StoreKind,
        allocator: SharedAllocator,
        growth_factor: f32,
        count: usize,
    ) -> Result<Self> {
        let mut arena = Self::new(kind, allocator, growth_factor);
        arena.reserve(count)?;
        Ok(arena)
    }

    /// Grows the arena to at least `count` slots.
    pub fn reserve(&mut self, count: usize) -> Result<()> {
        self.grow_to(count)
    }

    /// Stores `value` in the first free slot, growing when none is left.
    /// The slot keeps its current generation.
    pub fn create(&mut self, value: T) -> Result<Handle<T>> {
        let index = match self.entries.iter().position(|e| !e.is_valid()) {
            Some(index) => index,
            None => {
                let first_new = self.entries.len();
                self.grow_to(grown_len(first_new, self.growth_factor))?;
                first_new
            }
        };
        self.entries[index] = value;
        Ok(Handle::new(index, self.generations[index]))
    }

    /// Resets the slot to the invalid sentinel and bumps its generation.
    /// Stale handles are rejected, so a double destroy is an error.
    pub fn destroy(&mut self, handle: Handle<T>) -> Result<()> {
        self.check(handle)?;
        let index = handle.index();
        self.entries[index] = T::invalid();
        self.generations[index] += 1;
        Ok(())
    }

    pub fn get(&self, handle: Handle<T>) -> Result<&T> {
        self.check(handle)?;
        Ok(&self.entries[handle.index()])
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Result<&mut T> {
        self.check(handle)?;
        Ok(&mut self.entries[handle.index()])
    }

    /// Mutable access to two distinct entities at once.
    pub fn get_pair_mut(&mut self, a: Handle<T>, b: Handle<T>) -> Result<(&mut T, &mut T)> {
        self.check(a)?;
        self.check(b)?;
        let (i, j) = (a.index(), b.index());
        if i == j {
            return Err(PhysicsError::AliasedHandles {
                kind: self.kind,
                index: i,
            });
        }
        if i < j {
            let (lo, hi) = self.entries.split_at_mut(j);
            Ok((&mut lo[i], &mut hi[0]))
        } else {
            let (lo, hi) = self.entries.split_at_mut(i);
            Ok((&mut hi[0], &mut lo[j]))
        }
    }

    /// True when `handle` still refers to a live entity.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.check(handle).is_ok()
    }

    /// Handle of the live entity at `index`, if any.
    pub fn handle_at(&self, index: usize) -> Option<Handle<T>> {
        let entry = self.entries.get(index)?;
        entry
            .is_valid()
            .then(|| Handle::new(index, self.generations[index]))
    }

    pub fn generation(&self, index: usize) -> Option<usize> {
        self.generations.get(index).copied()
    }

    /// Total number of slots, live or free.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of live entities.
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_valid()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.entries
            .iter()
            .zip(self.generations.iter())
            .enumerate()
            .filter(|(_, (e, _))| e.is_valid())
            .map(|(i, (e, &generation))| (Handle::new(i, generation), e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> {
        self.entries
            .iter_mut()
            .zip(self.generations.iter())
            .enumerate()
            .filter(|(_, (e, _))| e.is_valid())
            .map(|(i, (e, &generation))| (Handle::new(i, generation), e))
    }

    /// Drops every slot and returns the reserved blocks to the allocator.
    /// Handles issued before the clear stay stale once slots are reused.
    pub fn clear(&mut self) {
        let mut allocator = self.allocator.borrow_mut();
        for layout in self.blocks.drain(..) {
            allocator.deallocate(layout);
        }
        if let Some(&newest) = self.generations.iter().max() {
            self.base_generation = self.base_generation.max(newest + 1);
        }
        self.entries.clear();
        self.generations.clear();
    }

    fn check(&self, handle: Handle<T>) -> Result<()> {
        let index = handle.index();
        let current = *self
            .generations
            .get(index)
            .ok_or(PhysicsError::IndexOutOfRange {
                kind: self.kind,
                index,
                len: self.generations.len(),
            })?;
        if current != handle.generation() || !self.entries[index].is_valid() {
            return Err(PhysicsError::StaleReference {
                kind: self.kind,
                index,
                generation: handle.generation(),
                current,
            });
        }
        Ok(())
    }

    fn grow_to(&mut self, new_len: usize) -> Result<()> {
        let old_len = self.entries.len();
        let additional = new_len.saturating_sub(old_len);
        if additional == 0 {
            return Ok(());
        }
        let layout = Layout::array::<(T, usize)>(additional).map_err(|_| {
            PhysicsError::AllocationFailed {
                requested: usize::MAX,
                available: 0,
            }
        })?;
        self.allocator.borrow_mut().allocate(layout)?;
        self.blocks.push(layout);

        self.entries.reserve_exact(additional);
        self.entries.extend((0..additional).map(|_| T::invalid()));
        self.generations.resize(new_len, self.base_generation);
        log::debug!("{} store grew from {} to {} slots", self.kind, old_len, new_len);
        Ok(())
    }
}

impl<T: Slot> Drop for SlotArena<T> {
    fn drop(&mut self) {
        if let Ok(mut allocator) = self.allocator.try_borrow_mut() {
            for layout in self.blocks.drain(..) {
                allocator.deallocate(layout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::allocator::{HeapAllocator, LinearAllocator};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Entity {
        weight: f32,
    }

    impl Slot for Entity {
        fn is_valid(&self) -> bool {
            self.weight > 0.0
        }

        fn invalid() -> Self {
            Entity { weight: 0.0 }
        }
    }

    fn heap() -> SharedAllocator {
        Rc::new(RefCell::new(HeapAllocator::new()))
    }

    fn arena() -> SlotArena<Entity> {
        SlotArena::new(StoreKind::Body, heap(), 2.0)
    }

    #[test]
    fn test_grown_len() {
        assert_eq!(grown_len(0, 2.0), 1);
        assert_eq!(grown_len(1, 2.0), 2);
        assert_eq!(grown_len(4, 2.0), 8);
        assert_eq!(grown_len(3, 1.0), 4);
        assert_eq!(grown_len(10, 1.5), 15);
    }

    #[test]
    fn test_create_grows_and_reuses() {
        let mut arena = arena();
        let a = arena.create(Entity { weight: 1.0 }).unwrap();
        let b = arena.create(Entity { weight: 2.0 }).unwrap();
        let c = arena.create(Entity { weight: 3.0 }).unwrap();
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));
        assert_eq!(arena.capacity(), 4);
        assert_eq!(arena.live_count(), 3);

        arena.destroy(b).unwrap();
        let d = arena.create(Entity { weight: 4.0 }).unwrap();
        assert_eq!(d.index(), 1);
        assert_eq!(d.generation(), b.generation() + 1);
        assert_eq!(arena.get(d).unwrap().weight, 4.0);
    }

    #[test]
    fn test_handle_survives_growth() {
        let mut arena = arena();
        let first = arena.create(Entity { weight: 1.0 }).unwrap();
        for i in 0..20 {
            arena.create(Entity { weight: 2.0 + i as f32 }).unwrap();
        }
        assert_eq!(first.generation(), 0);
        assert_eq!(arena.get(first).unwrap().weight, 1.0);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut arena = arena();
        let a = arena.create(Entity { weight: 1.0 }).unwrap();
        arena.destroy(a).unwrap();

        let err = arena.get(a).unwrap_err();
        assert_eq!(
            err,
            PhysicsError::StaleReference {
                kind: StoreKind::Body,
                index: 0,
                generation: 0,
                current: 1
            }
        );
        // Double destroy does not bump the generation twice
        assert!(arena.destroy(a).is_err());
        assert_eq!(arena.generation(0), Some(1));
        assert!(!arena.contains(a));
    }

    #[test]
    fn test_get_pair_mut() {
        let mut arena = arena();
        let a = arena.create(Entity { weight: 1.0 }).unwrap();
        let b = arena.create(Entity { weight: 2.0 }).unwrap();
        {
            let (eb, ea) = arena.get_pair_mut(b, a).unwrap();
            assert_eq!((ea.weight, eb.weight), (1.0, 2.0));
            ea.weight = 5.0;
            eb.weight = 6.0;
        }
        assert_eq!(arena.get(a).unwrap().weight, 5.0);
        assert_eq!(arena.get(b).unwrap().weight, 6.0);
        assert!(matches!(
            arena.get_pair_mut(a, a),
            Err(PhysicsError::AliasedHandles { index: 0, .. })
        ));
    }

    #[test]
    fn test_out_of_range_handle() {
        let arena = arena();
        assert!(matches!(
            arena.get(Handle::new(5, 0)),
            Err(PhysicsError::IndexOutOfRange { index: 5, len: 0, .. })
        ));
    }

    #[test]
    fn test_preallocated_slots_start_invalid() {
        let arena: SlotArena<Entity> =
            SlotArena::with_slots(StoreKind::Body, heap(), 2.0, 3).unwrap();
        assert_eq!(arena.capacity(), 3);
        assert_eq!(arena.live_count(), 0);
        assert!(arena.get(Handle::new(1, 0)).is_err());
        assert_eq!(arena.handle_at(1), None);
    }

    #[test]
    fn test_iter_skips_free_slots() {
        let mut arena = arena();
        let a = arena.create(Entity { weight: 1.0 }).unwrap();
        let b = arena.create(Entity { weight: 2.0 }).unwrap();
        arena.destroy(a).unwrap();
        let live: Vec<_> = arena.iter().map(|(h, _)| h).collect();
        assert_eq!(live, vec![b]);

        for (_, e) in arena.iter_mut() {
            e.weight *= 10.0;
        }
        assert_eq!(arena.get(b).unwrap().weight, 20.0);
    }

    #[test]
    fn test_growth_charges_allocator() {
        let allocator: SharedAllocator = Rc::new(RefCell::new(HeapAllocator::new()));
        let mut arena: SlotArena<Entity> = SlotArena::new(StoreKind::Body, allocator.clone(), 2.0);
        arena.create(Entity { weight: 1.0 }).unwrap();
        arena.create(Entity { weight: 1.0 }).unwrap();
        assert!(allocator.borrow().used() > 0);

        arena.clear();
        assert_eq!(allocator.borrow().used(), 0);
        assert_eq!(arena.capacity(), 0);
    }

    #[test]
    fn test_bounded_allocator_refuses_growth() {
        let slot = core::mem::size_of::<(Entity, usize)>();
        let allocator: SharedAllocator = Rc::new(RefCell::new(LinearAllocator::new(slot * 3)));
        let mut arena: SlotArena<Entity> = SlotArena::new(StoreKind::Body, allocator, 2.0);
        // 0 -> 1 -> 2 slots fit, the 2 -> 4 step does not
        arena.create(Entity { weight: 1.0 }).unwrap();
        arena.create(Entity { weight: 1.0 }).unwrap();
        assert!(matches!(
            arena.create(Entity { weight: 1.0 }),
            Err(PhysicsError::AllocationFailed { .. })
        ));
        assert_eq!(arena.live_count(), 2);
    }

    #[test]
    fn test_handles_stay_stale_across_clear() {
        let mut arena = arena();
        let old = arena.create(Entity { weight: 7.0 }).unwrap();
        let recycled = arena.create(Entity { weight: 1.0 }).unwrap();
        arena.destroy(recycled).unwrap();
        arena.clear();

        let fresh = arena.create(Entity { weight: 1.0 }).unwrap();
        assert_eq!(fresh.index(), old.index());
        assert!(fresh.generation() > recycled.generation());
        assert!(matches!(
            arena.get(old),
            Err(PhysicsError::StaleReference { index: 0, .. })
        ));
        assert_eq!(arena.get(fresh).unwrap().weight, 1.0);

        // Preallocated slots after a clear start at the raised generation too
        arena.clear();
        arena.reserve(3).unwrap();
        assert!(arena.generation(1).unwrap() > fresh.generation());
    }
}
