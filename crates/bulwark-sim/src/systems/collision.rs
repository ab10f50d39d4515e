//! Projectile/enemy collision and damage.

use hecs::Entity;
use tracing::debug;

use bulwark_core::components::{Collider, Health, Projectile};
use bulwark_core::types::Position;

use crate::store::EntityStore;

/// Resolve hits for this tick. Returns the number of hits.
///
/// Each enemy takes at most one hit per tick: the first unconsumed
/// projectile in spawn order that overlaps it. A projectile hits at most
/// once. Consumed projectiles are removed before returning.
pub fn run(store: &mut EntityStore) -> usize {
    let enemies = store.enemy_positions();
    let mut projectiles: Vec<(Entity, Position, Collider, f64)> = store
        .projectiles_in_order()
        .into_iter()
        .filter_map(|entity| {
            let world = store.world();
            let pos = *world.get::<&Position>(entity).ok()?;
            let collider = *world.get::<&Collider>(entity).ok()?;
            let projectile = world.get::<&Projectile>(entity).ok()?;
            (!projectile.consumed).then_some((entity, pos, collider, projectile.damage))
        })
        .collect();

    let mut hits = 0;
    for (enemy, enemy_pos) in enemies {
        let Ok(enemy_collider) = store.world().get::<&Collider>(enemy).map(|c| *c) else {
            continue;
        };

        let Some(index) = projectiles.iter().position(|(_, pos, collider, _)| {
            collider.0.overlaps(pos, &enemy_collider.0, &enemy_pos)
        }) else {
            continue;
        };
        let (projectile, _, _, damage) = projectiles.remove(index);

        let world = store.world_mut();
        if let Ok(health) = world.query_one_mut::<&mut Health>(enemy) {
            health.hp -= damage;
            debug!(?enemy, ?projectile, damage, hp = health.hp, "projectile hit");
        }
        if let Ok(p) = world.query_one_mut::<&mut Projectile>(projectile) {
            p.consumed = true;
        }
        hits += 1;
    }

    store.purge_consumed_projectiles();
    hits
}
