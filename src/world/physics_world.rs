use std::collections::HashSet;

use crate::collision::{self, ColliderPair, Intersection, QuadTree, AABB};
use crate::error::{PhysicsError, Result, StoreKind};
use crate::integration::integrator;
use crate::math::vec2::Vec2;
use crate::objects::{Body, Collider};
use crate::shapes::{Circle, Polygon, Rectangle, Shape, ShapeKind};
use crate::storage::allocator::{AllocatorStats, SharedAllocator};
use crate::storage::handle::{BodyRef, ColliderRef};
use crate::storage::shape_store::ShapeStores;
use crate::storage::slot_arena::SlotArena;

use super::config::WorldConfig;
use super::contact_solver::ContactSolver;
use super::listener::TriggerListener;

/// Which listener callback a pair produced this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerEvent {
    Enter,
    Stay,
    Exit,
}

/// Everything the update loop needs about one candidate pair.
struct PairTest {
    body_a: BodyRef,
    body_b: BodyRef,
    restitution_a: f32,
    restitution_b: f32,
    is_trigger: bool,
    intersection: Intersection,
}

/// Owns every body, collider and shape, and steps them forward.
pub struct World {
    config: WorldConfig,
    allocator: SharedAllocator,
    bodies: SlotArena<Body>,
    colliders: SlotArena<Collider>,
    shapes: ShapeStores,
    quad_tree: QuadTree,
    /// Pairs that overlapped at the end of the last update
    touching: HashSet<ColliderPair>,
    solver: ContactSolver,
    listener: Option<Box<dyn TriggerListener>>,
    updating: bool,
}

impl World {
    /// Creates an empty world with the default configuration.
    pub fn new() -> Self {
        let config = WorldConfig::default();
        let allocator = config.allocator.build();
        Self::assemble(
            config.clone(),
            allocator.clone(),
            SlotArena::new(StoreKind::Body, allocator.clone(), config.growth_factor),
            SlotArena::new(StoreKind::Collider, allocator, config.growth_factor),
        )
    }

    /// Creates a world from `config`, reserving the configured slots.
    pub fn with_config(config: WorldConfig) -> Result<Self> {
        let allocator = config.allocator.build();
        let bodies = SlotArena::with_slots(
            StoreKind::Body,
            allocator.clone(),
            config.growth_factor,
            config.preallocated_bodies,
        )?;
        let colliders = SlotArena::with_slots(
            StoreKind::Collider,
            allocator.clone(),
            config.growth_factor,
            config.preallocated_colliders,
        )?;
        Ok(Self::assemble(config, allocator, bodies, colliders))
    }

    fn assemble(
        config: WorldConfig,
        allocator: SharedAllocator,
        bodies: SlotArena<Body>,
        colliders: SlotArena<Collider>,
    ) -> Self {
        Self {
            shapes: ShapeStores::new(allocator.clone(), config.growth_factor),
            quad_tree: QuadTree::new(config.world_bounds, config.quad_tree),
            touching: HashSet::new(),
            solver: ContactSolver::new(
                config.positional_correction_percent,
                config.positional_correction_slop,
            ),
            listener: None,
            updating: false,
            config,
            allocator,
            bodies,
            colliders,
        }
    }

    /// Resets the world and reserves `preallocated_body_count` body slots.
    /// Negative counts are treated as zero.
    pub fn init(&mut self, gravity: Vec2, preallocated_body_count: i32) -> Result<()> {
        self.deinit();
        if preallocated_body_count < 0 {
            log::debug!(
                "negative preallocation ({}) clamped to 0",
                preallocated_body_count
            );
        }
        let count = preallocated_body_count.max(0) as usize;

        self.config.gravity = gravity;
        self.config.preallocated_bodies = count;
        self.bodies.reserve(count)?;
        self.colliders.reserve(self.config.preallocated_colliders)?;
        log::debug!("world initialised: gravity={:?}, {} body slots", gravity, count);
        Ok(())
    }

    /// Drops every entity and hands all store memory back to the allocator.
    /// The listener and configuration are kept.
    pub fn deinit(&mut self) {
        self.touching.clear();
        self.quad_tree.clear();
        self.shapes.clear();
        self.colliders.clear();
        self.bodies.clear();
        self.allocator.borrow_mut().reset();
    }

    /// Current configuration, including gravity.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Gravity applied to dynamic bodies each update.
    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    /// Set gravity
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    /// Installs `listener`, returning the previous one.
    pub fn set_contact_listener(
        &mut self,
        listener: Box<dyn TriggerListener>,
    ) -> Option<Box<dyn TriggerListener>> {
        self.listener.replace(listener)
    }

    /// Removes and returns the installed listener.
    pub fn take_contact_listener(&mut self) -> Option<Box<dyn TriggerListener>> {
        self.listener.take()
    }

    // ---- bodies ----

    /// Creates a dynamic body of mass 1 at the origin.
    pub fn create_body(&mut self) -> Result<BodyRef> {
        let body = self.bodies.create(Body::new())?;
        log::debug!("created {:?}", body);
        Ok(body)
    }

    /// Frees the body's slot. Its colliders stay alive but are left out of
    /// collision detection until destroyed.
    pub fn destroy_body(&mut self, body: BodyRef) -> Result<()> {
        self.bodies.destroy(body)?;
        log::debug!("destroyed {:?}", body);
        Ok(())
    }

    /// Mutable access to a live body. Fails on a stale handle.
    pub fn get_body(&mut self, body: BodyRef) -> Result<&mut Body> {
        self.bodies.get_mut(body)
    }

    /// Shared access to a live body.
    pub fn body(&self, body: BodyRef) -> Result<&Body> {
        self.bodies.get(body)
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.live_count()
    }

    /// Iterates live bodies with their handles.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyRef, &Body)> {
        self.bodies.iter()
    }

    // ---- colliders ----

    /// Attaches a collider with the default shape of `kind` to `body`.
    pub fn create_collider(&mut self, body: BodyRef, kind: ShapeKind) -> Result<ColliderRef> {
        let shape = match kind {
            ShapeKind::None => {
                return Err(PhysicsError::InvalidShape(
                    "cannot create a collider without a shape".into(),
                ))
            }
            ShapeKind::Circle => Shape::Circle(Circle::default()),
            ShapeKind::Rectangle => Shape::Rectangle(Rectangle::default()),
            ShapeKind::Polygon => Shape::Polygon(Polygon::default()),
        };
        self.create_collider_with_shape(body, shape)
    }

    /// Attaches a collider with the given geometry to `body`.
    pub fn create_collider_with_shape(&mut self, body: BodyRef, shape: Shape) -> Result<ColliderRef> {
        self.bodies.get(body)?;
        let (kind, shape_index) = self.shapes.insert(shape)?;
        let handle = match self.colliders.create(Collider::new(body, kind, shape_index)) {
            Ok(handle) => handle,
            Err(err) => {
                self.shapes.remove(kind, shape_index)?;
                return Err(err);
            }
        };
        self.colliders.get_mut(handle)?.self_ref = handle;
        log::debug!("created {:?} ({:?} #{}) on {:?}", handle, kind, shape_index, body);
        Ok(handle)
    }

    /// Frees the collider and its shape. Touching pairs that include it are
    /// dropped on the next update without an exit event.
    pub fn destroy_collider(&mut self, collider: ColliderRef) -> Result<()> {
        let (kind, index) = {
            let c = self.colliders.get(collider)?;
            (c.shape, c.shape_index)
        };
        self.colliders.destroy(collider)?;
        self.shapes.remove(kind, index)?;
        log::debug!("destroyed {:?}", collider);
        Ok(())
    }

    /// Mutable access to a live collider. Fails on a stale handle.
    pub fn get_collider(&mut self, collider: ColliderRef) -> Result<&mut Collider> {
        self.colliders.get_mut(collider)
    }

    /// Shared access to a live collider.
    pub fn collider(&self, collider: ColliderRef) -> Result<&Collider> {
        self.colliders.get(collider)
    }

    /// Number of live colliders.
    pub fn collider_count(&self) -> usize {
        self.colliders.live_count()
    }

    /// Iterates live colliders with their handles.
    pub fn colliders(&self) -> impl Iterator<Item = (ColliderRef, &Collider)> {
        self.colliders.iter()
    }

    /// Circle stored at `shape_index` (see [`Collider::shape_index`]).
    pub fn get_circle_collider(&mut self, shape_index: usize) -> Result<&mut Circle> {
        self.shapes.circles.get_mut(shape_index)
    }

    /// Rectangle stored at `shape_index`.
    pub fn get_rectangle_collider(&mut self, shape_index: usize) -> Result<&mut Rectangle> {
        self.shapes.rectangles.get_mut(shape_index)
    }

    /// Polygon stored at `shape_index`.
    pub fn get_polygon_collider(&mut self, shape_index: usize) -> Result<&mut Polygon> {
        self.shapes.polygons.get_mut(shape_index)
    }

    /// The circle owned by `collider`. Fails with `ShapeKindMismatch` when
    /// the collider has another shape.
    pub fn get_circle_shape(&mut self, collider: ColliderRef) -> Result<&mut Circle> {
        let index = self.shape_index_of(collider, ShapeKind::Circle)?;
        self.shapes.circles.get_mut(index)
    }

    /// The rectangle owned by `collider`.
    pub fn get_rectangle_shape(&mut self, collider: ColliderRef) -> Result<&mut Rectangle> {
        let index = self.shape_index_of(collider, ShapeKind::Rectangle)?;
        self.shapes.rectangles.get_mut(index)
    }

    /// The polygon owned by `collider`.
    pub fn get_polygon_shape(&mut self, collider: ColliderRef) -> Result<&mut Polygon> {
        let index = self.shape_index_of(collider, ShapeKind::Polygon)?;
        self.shapes.polygons.get_mut(index)
    }

    fn shape_index_of(&self, collider: ColliderRef, expected: ShapeKind) -> Result<usize> {
        let c = self.colliders.get(collider)?;
        if c.shape != expected {
            return Err(PhysicsError::ShapeKindMismatch {
                expected,
                found: c.shape,
            });
        }
        Ok(c.shape_index)
    }

    /// The collider's shape placed at its body's position.
    pub fn world_shape(&self, collider: ColliderRef) -> Result<Shape> {
        let c = self.colliders.get(collider)?;
        let position = self.bodies.get(c.body)?.position;
        self.shapes.world_shape(c.shape, c.shape_index, position)
    }

    // ---- introspection ----

    /// Broad phase as rebuilt by the last update.
    pub fn quad_tree(&self) -> &QuadTree {
        &self.quad_tree
    }

    /// Pairs overlapping as of the last update.
    pub fn touching_pairs(&self) -> impl Iterator<Item = &ColliderPair> {
        self.touching.iter()
    }

    /// True when `a` and `b` overlapped at the end of the last update.
    pub fn is_touching(&self, a: ColliderRef, b: ColliderRef) -> bool {
        self.touching.contains(&ColliderPair::new(a, b))
    }

    /// Usage counters of the allocator backing every store.
    pub fn allocator_stats(&self) -> AllocatorStats {
        self.allocator.borrow().stats()
    }

    // ---- simulation ----

    /// Advances the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.updating {
            log::warn!("World::update called from a trigger callback; ignored");
            return;
        }
        self.updating = true;
        let mut listener = self.listener.take();

        self.integrate(dt);
        self.rebuild_broad_phase();

        let mut candidates = self.quad_tree.query_pairs();
        candidates.sort_unstable();
        candidates.dedup();

        let mut tested = HashSet::with_capacity(candidates.len());
        let mut resolved = 0usize;
        for pair in candidates {
            let Some(test) = self.test_pair(pair) else {
                continue;
            };
            tested.insert(pair);

            let touching = test.intersection.is_touching();
            let event = match (touching, self.touching.contains(&pair)) {
                (true, false) => {
                    self.touching.insert(pair);
                    Some(TriggerEvent::Enter)
                }
                (true, true) => Some(TriggerEvent::Stay),
                (false, true) => {
                    self.touching.remove(&pair);
                    Some(TriggerEvent::Exit)
                }
                (false, false) => None,
            };

            if test.is_trigger {
                if let (Some(event), Some(listener)) = (event, listener.as_deref_mut()) {
                    self.dispatch(listener, event, pair);
                }
            } else if let Intersection::Contact(contact) = test.intersection {
                if let Ok((a, b)) = self.bodies.get_pair_mut(test.body_a, test.body_b) {
                    self.solver
                        .resolve(a, b, test.restitution_a, test.restitution_b, &contact);
                    resolved += 1;
                }
            }
        }

        self.drop_unreported_pairs(&tested, &mut listener);

        log::trace!(
            "update dt={} tested={} touching={} resolved={}",
            dt,
            tested.len(),
            self.touching.len(),
            resolved
        );

        // Keep a listener installed from inside a callback
        if self.listener.is_none() {
            self.listener = listener;
        }
        self.updating = false;
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        let mut count = 0usize;
        for (_, body) in self.bodies.iter_mut() {
            integrator::apply_gravity(body, gravity);
            integrator::integrate(body, dt);
            count += 1;
        }
        log::trace!("integrated {} bodies", count);
    }

    /// Re-inserts the world bounds of every collider whose body is alive.
    fn rebuild_broad_phase(&mut self) {
        self.quad_tree.clear();
        for (handle, collider) in self.colliders.iter() {
            let Ok(body) = self.bodies.get(collider.body) else {
                continue;
            };
            let bounds = match self.shape_bounds(collider, body.position) {
                Ok(Some(bounds)) => bounds,
                Ok(None) => continue,
                Err(err) => {
                    log::warn!("skipping {:?}: {}", handle, err);
                    continue;
                }
            };
            self.quad_tree.insert(bounds, handle);
        }
        log::trace!("broad phase holds {} colliders", self.quad_tree.len());
    }

    fn shape_bounds(&self, collider: &Collider, position: Vec2) -> Result<Option<AABB>> {
        let shape = self
            .shapes
            .world_shape(collider.shape, collider.shape_index, position)?;
        Ok(shape.bounds())
    }

    /// Narrow phase for one candidate. `None` when the pair must be skipped:
    /// a collider or body went away this frame, or both colliders share a body.
    fn test_pair(&self, pair: ColliderPair) -> Option<PairTest> {
        let (a, b) = match (
            self.colliders.get(pair.first()),
            self.colliders.get(pair.second()),
        ) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(err), _) | (_, Err(err)) => {
                log::warn!("skipping candidate {:?}: {}", pair, err);
                return None;
            }
        };
        if a.body == b.body {
            return None;
        }

        let shape_a = self.world_shape(pair.first()).ok()?;
        let shape_b = self.world_shape(pair.second()).ok()?;

        Some(PairTest {
            body_a: a.body,
            body_b: b.body,
            restitution_a: a.restitution(),
            restitution_b: b.restitution(),
            is_trigger: a.is_trigger() || b.is_trigger(),
            intersection: collision::intersect(&shape_a, &shape_b),
        })
    }

    /// Removes touching pairs the broad phase did not report this frame.
    /// Pairs whose colliders are both still active get an exit event.
    fn drop_unreported_pairs(
        &mut self,
        tested: &HashSet<ColliderPair>,
        listener: &mut Option<Box<dyn TriggerListener>>,
    ) {
        let mut gone: Vec<ColliderPair> = self
            .touching
            .iter()
            .filter(|pair| !tested.contains(pair))
            .copied()
            .collect();
        gone.sort_unstable();

        for pair in gone {
            self.touching.remove(&pair);
            let (Some(a), Some(b)) = (
                self.active_collider(pair.first()),
                self.active_collider(pair.second()),
            ) else {
                log::debug!("dropped {:?}: collider no longer active", pair);
                continue;
            };
            let is_trigger = a.is_trigger() || b.is_trigger();
            if is_trigger {
                if let Some(listener) = listener.as_deref_mut() {
                    self.dispatch(listener, TriggerEvent::Exit, pair);
                }
            }
        }
    }

    /// The collider, if it and its body are both alive.
    fn active_collider(&self, collider: ColliderRef) -> Option<&Collider> {
        let c = self.colliders.get(collider).ok()?;
        self.bodies.contains(c.body).then_some(c)
    }

    fn dispatch(&mut self, listener: &mut dyn TriggerListener, event: TriggerEvent, pair: ColliderPair) {
        let (a, b) = (pair.first(), pair.second());
        match event {
            TriggerEvent::Enter => listener.on_trigger_enter(self, a, b),
            TriggerEvent::Stay => listener.on_trigger_stay(self, a, b),
            TriggerEvent::Exit => listener.on_trigger_exit(self, a, b),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
