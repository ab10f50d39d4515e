//! Enemy behavior: approach the tower, then melee it on a timer.

use tracing::debug;

use bulwark_core::components::{Collider, Enemy};
use bulwark_core::enums::EnemyPhase;
use bulwark_core::events::{AudioEvent, EventLog};
use bulwark_core::types::Position;

use crate::store::EntityStore;
use crate::tower::Tower;

/// Advance every enemy in spawn order.
///
/// Approaching enemies walk straight at the tower centre by
/// `speed * dt_secs`, never past the point of contact. Once an enemy's
/// circle touches the tower it switches to `InRange` for good and, from the
/// next tick on, attacks every `attack_interval_ms`.
pub fn run(
    store: &mut EntityStore,
    tower: &mut Tower,
    now_ms: f64,
    dt_secs: f64,
    events: &mut EventLog,
) {
    let tower_pos = tower.position();
    let tower_shape = tower.shape();

    for entity in store.enemies_in_order() {
        let Ok((enemy, pos, collider)) = store
            .world_mut()
            .query_one_mut::<(&mut Enemy, &mut Position, &Collider)>(entity)
        else {
            continue;
        };

        // An enemy either moves or attacks in a tick, never both.
        let attacking = enemy.phase == EnemyPhase::InRange;
        if !attacking {
            if collider.0.overlaps(pos, &tower_shape, &tower_pos) {
                enemy.phase = EnemyPhase::InRange;
                debug!(?entity, type_id = %enemy.type_id, "enemy reached tower");
            } else if let Some(heading) = pos.direction_to(&tower_pos) {
                let gap = (pos.distance_to(&tower_pos)
                    - collider.0.bounding_radius()
                    - tower_shape.bounding_radius())
                .max(0.0);
                let reach = enemy.speed * dt_secs;
                if reach >= gap {
                    // Stop at contact instead of passing through the tower.
                    *pos = pos.offset(heading, gap);
                    enemy.phase = EnemyPhase::InRange;
                    debug!(?entity, type_id = %enemy.type_id, "enemy reached tower");
                } else {
                    *pos = pos.offset(heading, reach);
                }
            }
        }

        if attacking
            && now_ms - enemy.last_attack_ms >= enemy.attack_interval_ms
        {
            tower.remove_hp(enemy.damage);
            enemy.last_attack_ms = now_ms;
            events.audio(AudioEvent::TowerDamaged {
                damage: enemy.damage,
            });
            debug!(
                ?entity,
                type_id = %enemy.type_id,
                damage = enemy.damage,
                tower_hp = tower.hp(),
                "tower hit"
            );
        }
    }
}
