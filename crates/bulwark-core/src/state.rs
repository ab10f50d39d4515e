//! Game state snapshot: the complete visible state handed to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AudioEvent, DisplayMessage};
use crate::types::{Position, SimTime};

/// Complete game state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub tower: TowerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub points: i64,
    pub kills: u32,
    pub messages: Vec<DisplayMessage>,
    pub audio_events: Vec<AudioEvent>,
}

/// Tower stat block for the HUD and renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TowerView {
    pub position: Position,
    pub radius: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub range: f64,
    pub fire_interval_ms: f64,
    pub damage: f64,
    pub projectile_speed: f64,
    pub projectile_radius: f64,
}

/// A live enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    /// Spawn sequence number, unique for the lifetime of a run.
    pub id: u64,
    pub type_id: String,
    pub color: String,
    pub position: Position,
    pub radius: f64,
    pub hp: f64,
    pub phase: EnemyPhase,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u64,
    pub position: Position,
    pub radius: f64,
}
