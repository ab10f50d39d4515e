//! Snapshot system: reads the store and tower and builds a `GameStateSnapshot`.
//!
//! Read-only; never modifies the world.

use hecs::{Entity, World};

use bulwark_core::components::*;
use bulwark_core::enums::GamePhase;
use bulwark_core::events::{AudioEvent, DisplayMessage};
use bulwark_core::state::*;
use bulwark_core::types::{Position, SimTime};

use crate::director::Director;
use crate::store::EntityStore;
use crate::tower::Tower;

/// Build a complete snapshot. Entity lists are in spawn order.
pub fn build_snapshot(
    store: &EntityStore,
    tower: &Tower,
    director: &Director,
    time: &SimTime,
    phase: GamePhase,
    messages: Vec<DisplayMessage>,
    audio_events: Vec<AudioEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        tower: tower.view(),
        enemies: build_enemies(store),
        projectiles: build_projectiles(store),
        points: director.points(),
        kills: director.kills(),
        messages,
        audio_events,
    }
}

fn build_enemies(store: &EntityStore) -> Vec<EnemyView> {
    let world = store.world();
    store
        .enemies_in_order()
        .into_iter()
        .filter_map(|entity| enemy_view(world, entity))
        .collect()
}

fn enemy_view(world: &World, entity: Entity) -> Option<EnemyView> {
    let mut query = world
        .query_one::<(&SpawnOrder, &Enemy, &Position, &Collider, &Health)>(entity)
        .ok()?;
    let view = query
        .get()
        .map(|(order, enemy, pos, collider, health)| EnemyView {
            id: order.0,
            type_id: enemy.type_id.clone(),
            color: enemy.color.clone(),
            position: *pos,
            radius: collider.0.bounding_radius(),
            hp: health.hp,
            phase: enemy.phase,
        });
    view
}

fn build_projectiles(store: &EntityStore) -> Vec<ProjectileView> {
    let world = store.world();
    store
        .projectiles_in_order()
        .into_iter()
        .filter_map(|entity| {
            let order = *world.get::<&SpawnOrder>(entity).ok()?;
            let pos = *world.get::<&Position>(entity).ok()?;
            let collider = *world.get::<&Collider>(entity).ok()?;
            Some(ProjectileView {
                id: order.0,
                position: pos,
                radius: collider.0.bounding_radius(),
            })
        })
        .collect()
}
