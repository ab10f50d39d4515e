//! Core types and definitions for the Bulwark simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! geometry, components, commands, state snapshots, events, constants
//! and game configuration. It has no dependency on a runtime or driver.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod geometry;
pub mod state;
pub mod types;
