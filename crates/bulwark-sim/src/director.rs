//! Director: point economy, enemy catalog and kill bookkeeping.
//!
//! Spawning is the player's purchase; every death pays the enemy's
//! point value back exactly once.

use hecs::Entity;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use bulwark_core::components::Enemy;
use bulwark_core::config::{EnemyTypeSpec, GameConfig};
use bulwark_core::enums::{EnemyPhase, MessageLevel};
use bulwark_core::events::{AudioEvent, EventLog};
use bulwark_core::types::{Bounds, Position};

use crate::store::EntityStore;
use crate::world_setup;

/// Result of a spawn request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned { entity: Entity },
    /// Not enough points; nothing changed.
    Insufficient { cost: i64 },
    /// No catalog row with that id.
    UnknownType,
    /// Requests are only honored while a run is in progress.
    NotPlaying,
}

/// Arena edge an enemy enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Owns the point balance, kill counter and the read-only enemy catalog.
#[derive(Debug, Clone)]
pub struct Director {
    catalog: Vec<EnemyTypeSpec>,
    bounds: Bounds,
    spawn_edge_offset: f64,
    starting_points: i64,
    points: i64,
    kills: u32,
}

impl SpawnOutcome {
    pub fn is_spawned(&self) -> bool {
        matches!(self, SpawnOutcome::Spawned { .. })
    }

    /// Player-facing reason for a failed spawn, if there is one.
    pub fn reason(&self) -> Option<String> {
        match self {
            SpawnOutcome::Insufficient { cost } => Some(insufficient_message(*cost)),
            _ => None,
        }
    }
}

impl SpawnEdge {
    const ALL: [SpawnEdge; 4] = [
        SpawnEdge::Top,
        SpawnEdge::Right,
        SpawnEdge::Bottom,
        SpawnEdge::Left,
    ];
}

fn insufficient_message(cost: i64) -> String {
    format!("Insufficient points. Enemy cost: +{cost}")
}

impl Director {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            catalog: config.enemy_types.clone(),
            bounds: config.bounds(),
            spawn_edge_offset: config.spawn_edge_offset,
            starting_points: config.starting_points,
            points: config.starting_points,
            kills: 0,
        }
    }

    pub fn points(&self) -> i64 {
        self.points
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn catalog(&self) -> &[EnemyTypeSpec] {
        &self.catalog
    }

    pub fn enemy_type(&self, type_id: &str) -> Option<&EnemyTypeSpec> {
        self.catalog.iter().find(|t| t.type_id == type_id)
    }

    pub fn can_afford(&self, cost: i64) -> bool {
        self.points >= cost
    }

    pub fn add_points(&mut self, amount: i64) {
        self.points = self.points.saturating_add(amount);
    }

    pub fn subtract_points(&mut self, amount: i64) {
        self.points = self.points.saturating_sub(amount);
    }

    /// Back to the configured starting balance.
    pub fn reset_points(&mut self) {
        self.points = self.starting_points;
    }

    pub fn reset_kills(&mut self) {
        self.kills = 0;
    }

    /// Buy an enemy of `type_id` and place it just outside a random edge.
    pub fn spawn_enemy(
        &mut self,
        type_id: &str,
        store: &mut EntityStore,
        rng: &mut ChaCha8Rng,
        now_ms: f64,
        events: &mut EventLog,
    ) -> SpawnOutcome {
        let Some(spec) = self.enemy_type(type_id).cloned() else {
            warn!(type_id, "spawn requested for unknown enemy type");
            return SpawnOutcome::UnknownType;
        };

        if !self.can_afford(spec.cost) {
            debug!(type_id, cost = spec.cost, points = self.points, "spawn refused");
            events.message(MessageLevel::Warning, insufficient_message(spec.cost), now_ms);
            return SpawnOutcome::Insufficient { cost: spec.cost };
        }

        let (edge, position) = self.spawn_point(rng);
        let entity = world_setup::spawn_enemy(store, &spec, position, now_ms);
        self.subtract_points(spec.cost);
        events.audio(AudioEvent::Spawned {
            type_id: spec.type_id.clone(),
        });

        debug!(
            type_id,
            ?edge,
            x = position.x,
            y = position.y,
            points = self.points,
            "enemy spawned"
        );
        SpawnOutcome::Spawned { entity }
    }

    /// Pay out an enemy's reward and remove it.
    ///
    /// Returns false without touching anything if the enemy was already
    /// rewarded or no longer exists.
    pub fn enemy_dies(
        &mut self,
        entity: Entity,
        store: &mut EntityStore,
        events: &mut EventLog,
    ) -> bool {
        let (point_value, type_id) = match store.world_mut().query_one_mut::<&mut Enemy>(entity) {
            Ok(enemy) if enemy.phase != EnemyPhase::Dead => {
                enemy.phase = EnemyPhase::Dead;
                (enemy.point_value, enemy.type_id.clone())
            }
            _ => return false,
        };

        self.add_points(point_value);
        self.kills += 1;
        store.despawn(entity);
        events.audio(AudioEvent::EnemyDestroyed {
            type_id: type_id.clone(),
        });

        info!(
            type_id = %type_id,
            reward = point_value,
            points = self.points,
            kills = self.kills,
            "enemy destroyed"
        );
        true
    }

    /// Uniformly random edge, uniformly random point along it,
    /// pushed `spawn_edge_offset` units outside the arena.
    pub fn spawn_point(&self, rng: &mut ChaCha8Rng) -> (SpawnEdge, Position) {
        let edge = SpawnEdge::ALL[rng.gen_range(0..SpawnEdge::ALL.len())];
        let Bounds { width, height } = self.bounds;
        let offset = self.spawn_edge_offset;

        let position = match edge {
            SpawnEdge::Top => Position::new(rng.gen::<f64>() * width, -offset),
            SpawnEdge::Right => Position::new(width + offset, rng.gen::<f64>() * height),
            SpawnEdge::Bottom => Position::new(rng.gen::<f64>() * width, height + offset),
            SpawnEdge::Left => Position::new(-offset, rng.gen::<f64>() * height),
        };
        (edge, position)
    }
}
