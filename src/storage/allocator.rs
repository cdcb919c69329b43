//! Pluggable allocation strategies backing the world's stores
//!
//! Stores keep their data in ordinary `Vec`s; before a store grows it asks
//! its allocator for the bytes the new block needs, and it hands them back
//! when it is torn down. The strategy decides whether growth is allowed and
//! keeps the books:
//! - [`HeapAllocator`]: unbounded passthrough
//! - [`LinearAllocator`]: bump offset inside a fixed budget, bulk reset only
//! - [`ProxyAllocator`]: wraps another allocator and records its traffic

use core::alloc::Layout;
use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{PhysicsError, Result};

/// Allocator shared by every store of one world
pub type SharedAllocator = Rc<RefCell<dyn Allocator>>;

/// Counters reported by [`Allocator::stats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorStats {
    pub allocations: usize,
    pub deallocations: usize,
    pub failed_allocations: usize,
    pub bytes_in_use: usize,
    pub peak_bytes: usize,
}

/// Common trait for all allocation strategies
pub trait Allocator: fmt::Debug {
    /// Reserve memory for `layout`
    fn allocate(&mut self, layout: Layout) -> Result<()>;

    /// Return memory previously reserved with the same layout
    fn deallocate(&mut self, layout: Layout);

    /// Forget every outstanding allocation
    fn reset(&mut self);

    /// Total capacity, `None` when unbounded
    fn capacity(&self) -> Option<usize>;

    /// Currently used bytes
    fn used(&self) -> usize;

    /// Remaining bytes, `None` when unbounded
    fn available(&self) -> Option<usize> {
        self.capacity().map(|c| c.saturating_sub(self.used()))
    }

    fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            bytes_in_use: self.used(),
            ..AllocatorStats::default()
        }
    }
}

/// Align a value up to the given alignment
#[inline]
pub const fn align_up(value: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

/// Unbounded allocator that only tracks how many bytes are in use
#[derive(Debug, Default)]
pub struct HeapAllocator {
    used: usize,
}

impl HeapAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Allocator for HeapAllocator {
    fn allocate(&mut self, layout: Layout) -> Result<()> {
        self.used += layout.size();
        Ok(())
    }

    fn deallocate(&mut self, layout: Layout) {
        self.used = self.used.saturating_sub(layout.size());
    }

    fn reset(&mut self) {
        self.used = 0;
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn used(&self) -> usize {
        self.used
    }
}

/// Linear (arena) allocator
///
/// Allocations are served by bumping an offset inside a fixed budget.
/// Individual deallocations are not supported - only bulk reset.
#[derive(Debug)]
pub struct LinearAllocator {
    capacity: usize,
    offset: usize,
}

impl LinearAllocator {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            offset: 0,
        }
    }

    /// Current bump offset
    pub fn current_offset(&self) -> usize {
        self.offset
    }
}

impl Allocator for LinearAllocator {
    fn allocate(&mut self, layout: Layout) -> Result<()> {
        let aligned = align_up(self.offset, layout.align());
        let end = aligned.checked_add(layout.size()).unwrap_or(usize::MAX);
        if end > self.capacity {
            return Err(PhysicsError::AllocationFailed {
                requested: layout.size(),
                available: self.capacity.saturating_sub(self.offset),
            });
        }
        self.offset = end;
        Ok(())
    }

    fn deallocate(&mut self, _layout: Layout) {
        // Linear allocator doesn't support individual deallocation
    }

    fn reset(&mut self) {
        self.offset = 0;
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn used(&self) -> usize {
        self.offset
    }
}

/// Instrumented allocator: forwards to `inner` and counts what passes through
#[derive(Debug)]
pub struct ProxyAllocator<A: Allocator> {
    inner: A,
    name: &'static str,
    stats: AllocatorStats,
}

impl<A: Allocator> ProxyAllocator<A> {
    pub fn new(name: &'static str, inner: A) -> Self {
        Self {
            inner,
            name,
            stats: AllocatorStats::default(),
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<A: Allocator> Allocator for ProxyAllocator<A> {
    fn allocate(&mut self, layout: Layout) -> Result<()> {
        match self.inner.allocate(layout) {
            Ok(()) => {
                self.stats.allocations += 1;
                self.stats.bytes_in_use += layout.size();
                self.stats.peak_bytes = self.stats.peak_bytes.max(self.stats.bytes_in_use);
                log::trace!(
                    "[{}] allocate {} bytes (in use: {})",
                    self.name,
                    layout.size(),
                    self.stats.bytes_in_use
                );
                Ok(())
            }
            Err(err) => {
                self.stats.failed_allocations += 1;
                log::trace!("[{}] allocation of {} bytes refused", self.name, layout.size());
                Err(err)
            }
        }
    }

    fn deallocate(&mut self, layout: Layout) {
        self.inner.deallocate(layout);
        self.stats.deallocations += 1;
        self.stats.bytes_in_use = self.stats.bytes_in_use.saturating_sub(layout.size());
        log::trace!(
            "[{}] deallocate {} bytes (in use: {})",
            self.name,
            layout.size(),
            self.stats.bytes_in_use
        );
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.stats.bytes_in_use = 0;
    }

    fn capacity(&self) -> Option<usize> {
        self.inner.capacity()
    }

    fn used(&self) -> usize {
        self.inner.used()
    }

    fn stats(&self) -> AllocatorStats {
        self.stats
    }
}
