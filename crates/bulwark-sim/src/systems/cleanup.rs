//! Cleanup system: pays out and removes enemies whose hp ran out.

use hecs::Entity;

use bulwark_core::components::Health;
use bulwark_core::events::EventLog;

use crate::director::Director;
use crate::store::EntityStore;

/// Route every enemy with `hp <= 0` through `Director::enemy_dies`.
/// Returns how many were rewarded this tick.
pub fn run(store: &mut EntityStore, director: &mut Director, events: &mut EventLog) -> usize {
    let dead: Vec<Entity> = store
        .enemies_in_order()
        .into_iter()
        .filter(|&entity| {
            let world = store.world();
            let hp = match world.get::<&Health>(entity) {
                Ok(health) => health.hp,
                Err(_) => return false,
            };
            hp <= 0.0
        })
        .collect();

    dead.into_iter()
        .filter(|&entity| director.enemy_dies(entity, store, events))
        .count()
}
