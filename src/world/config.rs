//! World configuration

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::collision::{PairingMode, QuadTreeConfig, AABB};
use crate::math::vec2::Vec2;
use crate::storage::allocator::{HeapAllocator, LinearAllocator, ProxyAllocator, SharedAllocator};

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Gravity vector (default: -9.81 in Y)
    pub gravity: Vec2,

    /// Body slots reserved at init
    pub preallocated_bodies: usize,

    /// Collider slots reserved at init
    pub preallocated_colliders: usize,

    /// Store growth: `max(len * growth_factor, len + 1)`
    pub growth_factor: f32,

    /// Root boundary of the broad phase
    pub world_bounds: AABB,

    pub quad_tree: QuadTreeConfig,

    /// Share of the penetration removed per contact (1.0 = all of it)
    pub positional_correction_percent: f32,

    /// Penetration left uncorrected
    pub positional_correction_slop: f32,

    pub allocator: AllocatorConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            preallocated_bodies: 0,
            preallocated_colliders: 0,
            growth_factor: 2.0,
            world_bounds: AABB::from_center(Vec2::ZERO, Vec2::splat(1000.0)),
            quad_tree: QuadTreeConfig::default(),
            positional_correction_percent: 1.0,
            positional_correction_slop: 0.0,
            allocator: AllocatorConfig::default(),
        }
    }
}

impl WorldConfig {
    /// No gravity, for top-down scenes
    pub fn top_down() -> Self {
        Self {
            gravity: Vec2::ZERO,
            ..Default::default()
        }
    }

    /// Softer positional correction that leaves a little overlap to settle stacks
    pub fn stable_stacking() -> Self {
        Self {
            positional_correction_percent: 0.8,
            positional_correction_slop: 0.01,
            ..Default::default()
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_preallocated(mut self, bodies: usize, colliders: usize) -> Self {
        self.preallocated_bodies = bodies;
        self.preallocated_colliders = colliders;
        self
    }

    pub fn with_world_bounds(mut self, bounds: AABB) -> Self {
        self.world_bounds = bounds;
        self
    }

    pub fn with_pairing(mut self, pairing: PairingMode) -> Self {
        self.quad_tree.pairing = pairing;
        self
    }

    pub fn with_allocator(mut self, allocator: AllocatorConfig) -> Self {
        self.allocator = allocator;
        self
    }
}

/// Backing strategy for store growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AllocatorStrategy {
    #[default]
    Heap,
    /// Fixed budget; growth past it fails with `AllocationFailed`
    Linear { capacity_bytes: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    pub strategy: AllocatorStrategy,
    /// Wrap the strategy in a `ProxyAllocator` that counts traffic
    pub instrumented: bool,
}

impl AllocatorConfig {
    pub fn heap() -> Self {
        Self::default()
    }

    pub fn linear(capacity_bytes: usize) -> Self {
        Self {
            strategy: AllocatorStrategy::Linear { capacity_bytes },
            instrumented: false,
        }
    }

    pub fn instrumented(mut self) -> Self {
        self.instrumented = true;
        self
    }

    pub fn build(&self) -> SharedAllocator {
        match (self.strategy, self.instrumented) {
            (AllocatorStrategy::Heap, false) => Rc::new(RefCell::new(HeapAllocator::new())),
            (AllocatorStrategy::Heap, true) => Rc::new(RefCell::new(ProxyAllocator::new(
                "heap",
                HeapAllocator::new(),
            ))),
            (AllocatorStrategy::Linear { capacity_bytes }, false) => {
                Rc::new(RefCell::new(LinearAllocator::new(capacity_bytes)))
            }
            (AllocatorStrategy::Linear { capacity_bytes }, true) => Rc::new(RefCell::new(
                ProxyAllocator::new("linear", LinearAllocator::new(capacity_bytes)),
            )),
        }
    }
}
