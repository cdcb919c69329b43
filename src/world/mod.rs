pub mod config;
pub mod contact_solver;
pub mod listener;
pub mod physics_world;

pub use config::{AllocatorConfig, AllocatorStrategy, WorldConfig};
pub use contact_solver::ContactSolver;
pub use listener::TriggerListener;
pub use physics_world::World;
