//! Game configuration: arena size, economy, tower defaults and the enemy catalog.
//!
//! Defaults reproduce the stock game. A JSON file with the same shape can
//! override any of it; missing fields fall back to the defaults.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::types::Bounds;

/// Why a configuration could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("arena must have positive finite size, got {width}x{height}")]
    InvalidArena { width: f64, height: f64 },
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidSetting { field: &'static str, value: f64 },
    #[error("enemy catalog is empty")]
    EmptyCatalog,
    #[error("enemy type `{0}` is defined more than once")]
    DuplicateEnemyType(String),
    #[error("enemy type `{type_id}` has invalid {field}: {value}")]
    InvalidEnemyStat {
        type_id: String,
        field: &'static str,
        value: f64,
    },
    #[error("tower {field} {value} is outside [{min}, {max}]")]
    TowerStatOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// One row of the enemy catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTypeSpec {
    pub type_id: String,
    /// Units per second.
    pub speed: f64,
    pub radius: f64,
    pub hp: f64,
    pub damage: f64,
    pub color: String,
    pub attack_interval_ms: f64,
    pub point_value: i64,
    pub cost: i64,
}

/// Starting tower stats. Clamped on construction like any later change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    pub radius: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub range: f64,
    pub fire_interval_ms: f64,
    pub damage: f64,
    pub projectile_speed: f64,
    pub projectile_radius: f64,
}

/// Full game configuration supplied at simulation construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena_width: f64,
    pub arena_height: f64,
    pub spawn_edge_offset: f64,
    pub starting_points: i64,
    pub upgrade_base_cost: i64,
    pub tower: TowerConfig,
    pub enemy_types: Vec<EnemyTypeSpec>,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            radius: TOWER_RADIUS,
            hp: TOWER_HP,
            max_hp: TOWER_HP,
            range: TOWER_RANGE,
            fire_interval_ms: TOWER_FIRE_INTERVAL_MS,
            damage: TOWER_DAMAGE,
            projectile_speed: TOWER_PROJECTILE_SPEED,
            projectile_radius: TOWER_PROJECTILE_RADIUS,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            spawn_edge_offset: SPAWN_EDGE_OFFSET,
            starting_points: STARTING_POINTS,
            upgrade_base_cost: UPGRADE_BASE_COST,
            tower: TowerConfig::default(),
            enemy_types: default_enemy_catalog(),
        }
    }
}

/// The five stock enemy types.
pub fn default_enemy_catalog() -> Vec<EnemyTypeSpec> {
    let row = |type_id: &str,
               speed: f64,
               radius: f64,
               hp: f64,
               damage: f64,
               color: &str,
               attack_interval_ms: f64,
               point_value: i64,
               cost: i64| EnemyTypeSpec {
        type_id: type_id.to_string(),
        speed,
        radius,
        hp,
        damage,
        color: color.to_string(),
        attack_interval_ms,
        point_value,
        cost,
    };
    vec![
        row("BasicEnemy", 200.0, 5.0, 2.0, 1.0, "grey", 100.0, 6, 5),
        row("FastEnemy", 3000.0, 7.0, 2.0, 1.0, "red", 10.0, 12, 10),
        row("HeavyEnemy", 500.0, 10.0, 5.0, 5.0, "blue", 250.0, 18, 15),
        row("PowerfulEnemy", 700.0, 8.0, 3.0, 10.0, "green", 100.0, 24, 20),
        row("CunningEnemy", 200.0, 12.0, 15.0, 14.0, "yellow", 300.0, 30, 25),
    ]
}

impl GameConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.arena_width, self.arena_height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.arena_width) || !positive(self.arena_height) {
            return Err(ConfigError::InvalidArena {
                width: self.arena_width,
                height: self.arena_height,
            });
        }

        let settings = [
            ("spawn_edge_offset", self.spawn_edge_offset),
            ("starting_points", self.starting_points as f64),
            ("upgrade_base_cost", self.upgrade_base_cost as f64),
        ];
        for (field, value) in settings {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidSetting { field, value });
            }
        }

        if self.enemy_types.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for spec in &self.enemy_types {
            if !seen.insert(spec.type_id.as_str()) {
                return Err(ConfigError::DuplicateEnemyType(spec.type_id.clone()));
            }
            spec.validate()?;
        }

        self.tower.validate()
    }
}

impl EnemyTypeSpec {
    fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("speed", self.speed, self.speed >= 0.0),
            ("radius", self.radius, self.radius > 0.0),
            ("hp", self.hp, self.hp > 0.0),
            ("damage", self.damage, self.damage >= 0.0),
            ("attack_interval_ms", self.attack_interval_ms, self.attack_interval_ms >= 0.0),
            ("cost", self.cost as f64, self.cost >= 0),
        ];
        for (field, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(ConfigError::InvalidEnemyStat {
                    type_id: self.type_id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl TowerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("radius", self.radius, TOWER_RADIUS_MIN, TOWER_RADIUS_MAX),
            ("max_hp", self.max_hp, TOWER_HP_MIN, TOWER_MAX_HP_CAP),
            ("hp", self.hp, TOWER_HP_MIN, self.max_hp),
            ("range", self.range, TOWER_RANGE_MIN, TOWER_RANGE_MAX),
            (
                "fire_interval_ms",
                self.fire_interval_ms,
                TOWER_FIRE_INTERVAL_MIN_MS,
                TOWER_FIRE_INTERVAL_MAX_MS,
            ),
            ("damage", self.damage, TOWER_DAMAGE_MIN, TOWER_DAMAGE_MAX),
            (
                "projectile_speed",
                self.projectile_speed,
                TOWER_PROJECTILE_SPEED_MIN,
                TOWER_PROJECTILE_SPEED_MAX,
            ),
            (
                "projectile_radius",
                self.projectile_radius,
                TOWER_PROJECTILE_RADIUS_MIN,
                TOWER_PROJECTILE_RADIUS_MAX,
            ),
        ];
        for (field, value, min, max) in checks {
            if !(value.is_finite() && value >= min && value <= max) {
                return Err(ConfigError::TowerStatOutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}
