//! Tower targeting: pick the nearest enemy in range and fire at it.

use hecs::Entity;

use bulwark_core::events::EventLog;

use crate::store::EntityStore;
use crate::tower::Tower;

/// Scan and fire once. The target is not remembered between ticks.
/// Returns the projectile spawned this tick, if any.
pub fn run(
    store: &mut EntityStore,
    tower: &mut Tower,
    now_ms: f64,
    events: &mut EventLog,
) -> Option<Entity> {
    let candidates = store.enemy_positions();
    let (_target, target_pos) = tower.scan_for_enemies(&candidates)?;
    tower.try_fire(&target_pos, now_ms, store, events)
}
