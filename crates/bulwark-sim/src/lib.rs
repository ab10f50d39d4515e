//! Simulation engine for Bulwark.
//!
//! Owns the hecs entity store, the tower and the director, runs the
//! per-tick systems in a fixed order, and produces `GameStateSnapshot`s.

pub mod director;
pub mod engine;
pub mod store;
pub mod systems;
pub mod tower;
pub mod world_setup;

pub use bulwark_core as core;
pub use director::{Director, SpawnOutcome};
pub use engine::{SimConfig, SimulationEngine};
pub use tower::{Tower, UpgradeOutcome};

#[cfg(test)]
mod tests;
