//! Bulwark headless application.
//!
//! Runs the simulation engine on its own game loop thread and exposes a
//! small session API (start, send command, poll snapshot, stop) that a
//! frontend or the bundled binary drives.

pub mod config;
pub mod game_loop;
pub mod session;
pub mod state;

pub use bulwark_core as core;
