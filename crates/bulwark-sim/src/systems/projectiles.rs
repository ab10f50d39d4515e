//! Projectile flight: bounds expiry and straight-line motion.

use bulwark_core::components::Projectile;
use bulwark_core::types::{Bounds, Position};

use crate::store::EntityStore;

/// Remove projectiles that left the arena.
pub fn purge_expired(store: &mut EntityStore, bounds: &Bounds) -> usize {
    store.purge_expired_projectiles(bounds)
}

/// Move every projectile `speed` units along its heading.
/// Projectiles step once per tick regardless of elapsed time.
pub fn advance(store: &mut EntityStore) {
    for (_entity, (pos, projectile)) in store
        .world_mut()
        .query_mut::<(&mut Position, &Projectile)>()
    {
        *pos = pos.offset(projectile.heading, projectile.speed);
    }
}
