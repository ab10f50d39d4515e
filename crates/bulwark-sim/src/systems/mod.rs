//! Per-tick systems operating on the entity store.
//!
//! Systems are free functions; the engine calls them in a fixed order.
//! They own no state: entities live in the store, stats on the tower,
//! and the economy in the director.

pub mod cleanup;
pub mod collision;
pub mod enemy_advance;
pub mod projectiles;
pub mod snapshot;
pub mod targeting;
