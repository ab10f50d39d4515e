//! Entity spawn factories.
//!
//! Builds the component bundles for enemies and projectiles and inserts
//! them into the entity store.

use hecs::Entity;

use bulwark_core::components::{Collider, Enemy, Health, Projectile};
use bulwark_core::config::EnemyTypeSpec;
use bulwark_core::enums::EnemyPhase;
use bulwark_core::geometry::Shape;
use bulwark_core::types::{Heading, Position};

use crate::store::EntityStore;

/// Spawn an enemy with full catalog stats at `position`.
/// The attack timer starts at `now_ms`.
pub fn spawn_enemy(
    store: &mut EntityStore,
    spec: &EnemyTypeSpec,
    position: Position,
    now_ms: f64,
) -> Entity {
    let enemy = Enemy {
        type_id: spec.type_id.clone(),
        speed: spec.speed,
        damage: spec.damage,
        attack_interval_ms: spec.attack_interval_ms,
        last_attack_ms: now_ms,
        point_value: spec.point_value,
        spawn_cost: spec.cost,
        color: spec.color.clone(),
        phase: EnemyPhase::Approaching,
    };

    store.spawn((
        enemy,
        position,
        Collider(Shape::circle(spec.radius)),
        Health { hp: spec.hp },
    ))
}

/// Spawn a projectile travelling along `heading` at `speed` units per tick.
pub fn spawn_projectile(
    store: &mut EntityStore,
    origin: Position,
    heading: Heading,
    speed: f64,
    radius: f64,
    damage: f64,
) -> Entity {
    store.spawn((
        Projectile {
            heading,
            speed,
            damage,
            consumed: false,
        },
        origin,
        Collider(Shape::circle(radius)),
    ))
}
