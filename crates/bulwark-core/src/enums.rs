//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Playing,
    Paused,
    /// Tower destroyed. Only a reset leaves this phase.
    Stopped,
}

/// Enemy behavior phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    /// Walking in a straight line toward the tower.
    #[default]
    Approaching,
    /// Touching the tower; attacks on its own interval.
    InRange,
    /// hp reached zero, reward paid.
    Dead,
}

/// Upgradeable tower stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerStat {
    Health,
    Range,
    FireRate,
    Damage,
    ProjectileSpeed,
    ProjectileRadius,
}

/// Scalar applied to upgrade cost and effect, driven by a held modifier key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum UpgradeMultiplier {
    #[default]
    X1,
    X2,
    X10,
}

/// Severity of a player-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageLevel {
    Info,
    Warning,
}

impl TowerStat {
    pub const ALL: [TowerStat; 6] = [
        TowerStat::Health,
        TowerStat::Range,
        TowerStat::FireRate,
        TowerStat::Damage,
        TowerStat::ProjectileSpeed,
        TowerStat::ProjectileRadius,
    ];

    /// Parse a stat name as typed by a button label or key binding.
    /// Case, whitespace, `_` and `-` are ignored: "Projectile Speed" == "projectile_speed".
    pub fn parse(id: &str) -> Option<TowerStat> {
        let normalized: String = id
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "health" => Some(TowerStat::Health),
            "range" => Some(TowerStat::Range),
            "firerate" => Some(TowerStat::FireRate),
            "damage" => Some(TowerStat::Damage),
            "projectilespeed" => Some(TowerStat::ProjectileSpeed),
            "projectileradius" => Some(TowerStat::ProjectileRadius),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TowerStat::Health => "Health",
            TowerStat::Range => "Range",
            TowerStat::FireRate => "Fire Rate",
            TowerStat::Damage => "Damage",
            TowerStat::ProjectileSpeed => "Projectile Speed",
            TowerStat::ProjectileRadius => "Projectile Radius",
        }
    }
}

impl UpgradeMultiplier {
    pub fn factor(&self) -> u32 {
        match self {
            UpgradeMultiplier::X1 => 1,
            UpgradeMultiplier::X2 => 2,
            UpgradeMultiplier::X10 => 10,
        }
    }
}

impl TryFrom<u32> for UpgradeMultiplier {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UpgradeMultiplier::X1),
            2 => Ok(UpgradeMultiplier::X2),
            10 => Ok(UpgradeMultiplier::X10),
            other => Err(format!("unsupported upgrade multiplier {other}, expected 1, 2 or 10")),
        }
    }
}

impl From<UpgradeMultiplier> for u32 {
    fn from(m: UpgradeMultiplier) -> Self {
        m.factor()
    }
}
