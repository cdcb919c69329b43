use crate::storage::handle::ColliderRef;
use crate::world::physics_world::World;

/// Receives trigger overlap events from [`World::update`].
///
/// Events fire only for pairs where at least one collider is a trigger.
/// Callbacks get the world back and may create, destroy or query
/// entities; calling `update` from a callback is ignored.
pub trait TriggerListener {
    /// The pair started overlapping this frame
    fn on_trigger_enter(&mut self, world: &mut World, a: ColliderRef, b: ColliderRef);

    /// The pair was already overlapping and still is
    fn on_trigger_stay(&mut self, world: &mut World, a: ColliderRef, b: ColliderRef);

    /// The pair stopped overlapping
    fn on_trigger_exit(&mut self, world: &mut World, a: ColliderRef, b: ColliderRef);
}
