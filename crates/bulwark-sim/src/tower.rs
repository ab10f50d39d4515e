//! The player's tower: clamped stat block, target acquisition, firing and upgrades.

use hecs::Entity;
use tracing::{debug, warn};

use bulwark_core::config::TowerConfig;
use bulwark_core::constants::*;
use bulwark_core::enums::{MessageLevel, TowerStat, UpgradeMultiplier};
use bulwark_core::events::{AudioEvent, EventLog};
use bulwark_core::geometry::Shape;
use bulwark_core::state::TowerView;
use bulwark_core::types::Position;

use crate::director::Director;
use crate::store::EntityStore;
use crate::world_setup;

/// Result of an upgrade request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Upgraded { stat: TowerStat, cost: i64 },
    /// Not enough points; nothing changed.
    Insufficient { stat: TowerStat, cost: i64 },
    UnknownStat,
    NotPlaying,
}

/// Stationary defensive structure. Every stat change goes through a
/// setter that clamps it to its declared range.
#[derive(Debug, Clone)]
pub struct Tower {
    position: Position,
    radius: f64,
    hp: f64,
    max_hp: f64,
    range: f64,
    fire_interval_ms: f64,
    damage: f64,
    projectile_speed: f64,
    projectile_radius: f64,
    last_fire_ms: f64,
}

/// NaN collapses to the lower bound so a bad delta can never poison a stat.
fn clamp_stat(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.max(min).min(max)
    }
}

impl Tower {
    pub fn new(position: Position, config: &TowerConfig) -> Self {
        let mut tower = Self {
            position,
            radius: TOWER_RADIUS_MIN,
            hp: 0.0,
            max_hp: clamp_stat(config.max_hp, TOWER_HP_MIN, TOWER_MAX_HP_CAP),
            range: TOWER_RANGE_MIN,
            fire_interval_ms: TOWER_FIRE_INTERVAL_MAX_MS,
            damage: TOWER_DAMAGE_MIN,
            projectile_speed: TOWER_PROJECTILE_SPEED_MIN,
            projectile_radius: TOWER_PROJECTILE_RADIUS_MIN,
            last_fire_ms: 0.0,
        };
        tower.set_radius(config.radius);
        tower.set_hp(config.hp);
        tower.set_max_hp(config.max_hp);
        tower.set_range(config.range);
        tower.set_fire_interval_ms(config.fire_interval_ms);
        tower.set_damage(config.damage);
        tower.set_projectile_speed(config.projectile_speed);
        tower.set_projectile_radius(config.projectile_radius);
        tower
    }

    // --- Getters ---

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn hp(&self) -> f64 {
        self.hp
    }

    pub fn max_hp(&self) -> f64 {
        self.max_hp
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn fire_interval_ms(&self) -> f64 {
        self.fire_interval_ms
    }

    pub fn damage(&self) -> f64 {
        self.damage
    }

    pub fn projectile_speed(&self) -> f64 {
        self.projectile_speed
    }

    pub fn projectile_radius(&self) -> f64 {
        self.projectile_radius
    }

    pub fn last_fire_ms(&self) -> f64 {
        self.last_fire_ms
    }

    pub fn shape(&self) -> Shape {
        Shape::circle(self.radius)
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0.0
    }

    // --- Setters ---

    pub fn set_radius(&mut self, value: f64) {
        self.radius = clamp_stat(value, TOWER_RADIUS_MIN, TOWER_RADIUS_MAX);
    }

    pub fn set_hp(&mut self, value: f64) {
        self.hp = clamp_stat(value, TOWER_HP_MIN, self.max_hp);
    }

    /// Max hp never drops below current hp.
    pub fn set_max_hp(&mut self, value: f64) {
        self.max_hp = clamp_stat(value, self.hp, TOWER_MAX_HP_CAP);
    }

    pub fn set_range(&mut self, value: f64) {
        self.range = clamp_stat(value, TOWER_RANGE_MIN, TOWER_RANGE_MAX);
    }

    pub fn set_fire_interval_ms(&mut self, value: f64) {
        self.fire_interval_ms =
            clamp_stat(value, TOWER_FIRE_INTERVAL_MIN_MS, TOWER_FIRE_INTERVAL_MAX_MS);
    }

    pub fn set_damage(&mut self, value: f64) {
        self.damage = clamp_stat(value, TOWER_DAMAGE_MIN, TOWER_DAMAGE_MAX);
    }

    pub fn set_projectile_speed(&mut self, value: f64) {
        self.projectile_speed =
            clamp_stat(value, TOWER_PROJECTILE_SPEED_MIN, TOWER_PROJECTILE_SPEED_MAX);
    }

    pub fn set_projectile_radius(&mut self, value: f64) {
        self.projectile_radius =
            clamp_stat(value, TOWER_PROJECTILE_RADIUS_MIN, TOWER_PROJECTILE_RADIUS_MAX);
    }

    // --- Relative changes ---

    pub fn add_radius(&mut self, delta: f64) {
        self.set_radius(self.radius + delta);
    }

    pub fn remove_radius(&mut self, delta: f64) {
        self.set_radius(self.radius - delta);
    }

    pub fn add_hp(&mut self, delta: f64) {
        self.set_hp(self.hp + delta);
    }

    pub fn remove_hp(&mut self, delta: f64) {
        self.set_hp(self.hp - delta);
    }

    pub fn add_max_hp(&mut self, delta: f64) {
        self.set_max_hp(self.max_hp + delta);
    }

    pub fn remove_max_hp(&mut self, delta: f64) {
        self.set_max_hp(self.max_hp - delta);
    }

    pub fn add_range(&mut self, delta: f64) {
        self.set_range(self.range + delta);
    }

    pub fn remove_range(&mut self, delta: f64) {
        self.set_range(self.range - delta);
    }

    /// Faster firing: shortens the interval.
    pub fn add_fire_rate(&mut self, delta_ms: f64) {
        self.set_fire_interval_ms(self.fire_interval_ms - delta_ms);
    }

    /// Slower firing: lengthens the interval.
    pub fn remove_fire_rate(&mut self, delta_ms: f64) {
        self.set_fire_interval_ms(self.fire_interval_ms + delta_ms);
    }

    pub fn add_damage(&mut self, delta: f64) {
        self.set_damage(self.damage + delta);
    }

    pub fn remove_damage(&mut self, delta: f64) {
        self.set_damage(self.damage - delta);
    }

    pub fn add_projectile_speed(&mut self, delta: f64) {
        self.set_projectile_speed(self.projectile_speed + delta);
    }

    pub fn remove_projectile_speed(&mut self, delta: f64) {
        self.set_projectile_speed(self.projectile_speed - delta);
    }

    pub fn add_projectile_radius(&mut self, delta: f64) {
        self.set_projectile_radius(self.projectile_radius + delta);
    }

    pub fn remove_projectile_radius(&mut self, delta: f64) {
        self.set_projectile_radius(self.projectile_radius - delta);
    }

    /// Hit test for clicks on the tower (toggles the upgrade panel).
    pub fn contains_point(&self, point: &Position) -> bool {
        self.position.distance_to(point) <= self.radius
    }

    // --- Combat ---

    /// Nearest enemy within range. Candidates must be in store order;
    /// on equal distance the earlier one wins.
    pub fn scan_for_enemies(&self, candidates: &[(Entity, Position)]) -> Option<(Entity, Position)> {
        let mut closest: Option<(Entity, Position)> = None;
        let mut closest_distance = f64::INFINITY;

        for &(entity, pos) in candidates {
            let distance = self.position.distance_to(&pos);
            if distance < closest_distance && distance <= self.range {
                closest = Some((entity, pos));
                closest_distance = distance;
            }
        }
        closest
    }

    /// Fire one projectile at `target` if the fire interval has elapsed.
    /// The projectile leaves from the tower's edge. A target sitting exactly
    /// on the tower centre has no direction and is not fired at.
    pub fn try_fire(
        &mut self,
        target: &Position,
        now_ms: f64,
        store: &mut EntityStore,
        events: &mut EventLog,
    ) -> Option<Entity> {
        if now_ms - self.last_fire_ms < self.fire_interval_ms {
            return None;
        }
        let heading = self.position.direction_to(target)?;

        let origin = self.position.offset(heading, self.radius);
        let entity = world_setup::spawn_projectile(
            store,
            origin,
            heading,
            self.projectile_speed,
            self.projectile_radius,
            self.damage,
        );
        self.last_fire_ms = now_ms;
        events.audio(AudioEvent::ProjectileFired);
        Some(entity)
    }

    // --- Upgrades ---

    /// Buy an upgrade of `stat_id`, scaled by `multiplier`.
    pub fn upgrade(
        &mut self,
        stat_id: &str,
        multiplier: UpgradeMultiplier,
        base_cost: i64,
        director: &mut Director,
        now_ms: f64,
        events: &mut EventLog,
    ) -> UpgradeOutcome {
        let Some(stat) = TowerStat::parse(stat_id) else {
            warn!(stat_id, "upgrade requested for unknown stat");
            return UpgradeOutcome::UnknownStat;
        };

        let factor = multiplier.factor();
        let cost = base_cost.saturating_mul(i64::from(factor));
        if !director.can_afford(cost) {
            events.message(
                MessageLevel::Warning,
                format!("Insufficient points. Upgrade cost: {cost}"),
                now_ms,
            );
            debug!(stat = stat.label(), cost, points = director.points(), "upgrade refused");
            return UpgradeOutcome::Insufficient { stat, cost };
        }

        director.subtract_points(cost);
        let steps = f64::from(factor);
        let change = match stat {
            TowerStat::Health => {
                let amount = UPGRADE_HEALTH_STEP * steps;
                self.add_max_hp(amount);
                self.add_hp(amount);
                format!("+{amount}")
            }
            TowerStat::Range => {
                let amount = UPGRADE_RANGE_STEP * steps;
                self.add_range(amount);
                format!("+{amount}")
            }
            TowerStat::FireRate => {
                let amount = UPGRADE_FIRE_INTERVAL_STEP_MS * steps;
                self.add_fire_rate(amount);
                format!("-{amount} ms")
            }
            TowerStat::Damage => {
                let amount = UPGRADE_DAMAGE_STEP * steps;
                self.add_damage(amount);
                format!("+{amount}")
            }
            TowerStat::ProjectileSpeed => {
                let amount = UPGRADE_PROJECTILE_SPEED_STEP * steps;
                self.add_projectile_speed(amount);
                format!("+{amount}")
            }
            TowerStat::ProjectileRadius => {
                let amount = UPGRADE_PROJECTILE_RADIUS_STEP * steps;
                self.add_projectile_radius(amount);
                format!("+{amount}")
            }
        };

        events.message(
            MessageLevel::Info,
            format!("{} {change} for {cost} points", stat.label()),
            now_ms,
        );
        debug!(stat = stat.label(), cost, points = director.points(), "tower upgraded");
        UpgradeOutcome::Upgraded { stat, cost }
    }

    pub fn view(&self) -> TowerView {
        TowerView {
            position: self.position,
            radius: self.radius,
            hp: self.hp,
            max_hp: self.max_hp,
            range: self.range,
            fire_interval_ms: self.fire_interval_ms,
            damage: self.damage,
            projectile_speed: self.projectile_speed,
            projectile_radius: self.projectile_radius,
        }
    }
}
