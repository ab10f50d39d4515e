//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::EnemyPhase;
use crate::geometry::Shape;
use crate::types::Heading;

/// Insertion sequence. Systems iterate entities sorted by this value so
/// that iteration order is stable across removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpawnOrder(pub u64);

/// Collision shape attached to an entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider(pub Shape);

/// Hit points of a damageable entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub hp: f64,
}

/// Enemy stat row and behavior state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Catalog key; drives rendering only.
    pub type_id: String,
    /// Units per second.
    pub speed: f64,
    /// Melee damage per attack.
    pub damage: f64,
    pub attack_interval_ms: f64,
    /// Timestamp of the last melee hit (spawn time until the first one).
    pub last_attack_ms: f64,
    /// Points paid out on death.
    pub point_value: i64,
    pub spawn_cost: i64,
    pub color: String,
    pub phase: EnemyPhase,
}

/// Tower projectile in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    /// Fixed at spawn; projectiles do not home.
    pub heading: Heading,
    /// Units per tick.
    pub speed: f64,
    pub damage: f64,
    /// Set on the first hit; the entity is despawned in the same tick.
    pub consumed: bool,
}
