//! Entity store: the hecs world holding enemies and projectiles.
//!
//! Every entity gets a `SpawnOrder` on insertion. hecs itself does not keep
//! insertion order across despawns, so all ordered iteration goes through
//! the `*_in_order` snapshots here. Removal is always collect-then-despawn.

use hecs::{DynamicBundle, Entity, EntityBuilder, World};

use bulwark_core::components::{Enemy, Projectile, SpawnOrder};
use bulwark_core::types::{Bounds, Position};

/// Owns the live enemies and projectiles.
#[derive(Default)]
pub struct EntityStore {
    world: World,
    next_order: u64,
    despawn_buffer: Vec<Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the underlying world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Insert an entity, tagging it with the next spawn sequence number.
    pub fn spawn(&mut self, bundle: impl DynamicBundle) -> Entity {
        let order = SpawnOrder(self.next_order);
        self.next_order += 1;

        let mut builder = EntityBuilder::new();
        builder.add_bundle(bundle).add(order);
        self.world.spawn(builder.build())
    }

    /// Remove an entity. Returns false if it was already gone.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Live enemies in spawn order.
    pub fn enemies_in_order(&self) -> Vec<Entity> {
        let mut ordered: Vec<(SpawnOrder, Entity)> = self
            .world
            .query::<(&SpawnOrder, &Enemy)>()
            .iter()
            .map(|(entity, (order, _))| (*order, entity))
            .collect();
        ordered.sort_unstable_by_key(|(order, _)| *order);
        ordered.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Live enemies with their positions, in spawn order.
    pub fn enemy_positions(&self) -> Vec<(Entity, Position)> {
        let mut ordered: Vec<(SpawnOrder, Entity, Position)> = self
            .world
            .query::<(&SpawnOrder, &Position, &Enemy)>()
            .iter()
            .map(|(entity, (order, pos, _))| (*order, entity, *pos))
            .collect();
        ordered.sort_unstable_by_key(|(order, _, _)| *order);
        ordered
            .into_iter()
            .map(|(_, entity, pos)| (entity, pos))
            .collect()
    }

    /// Live projectiles in spawn order.
    pub fn projectiles_in_order(&self) -> Vec<Entity> {
        let mut ordered: Vec<(SpawnOrder, Entity)> = self
            .world
            .query::<(&SpawnOrder, &Projectile)>()
            .iter()
            .map(|(entity, (order, _))| (*order, entity))
            .collect();
        ordered.sort_unstable_by_key(|(order, _)| *order);
        ordered.into_iter().map(|(_, entity)| entity).collect()
    }

    pub fn enemy_count(&self) -> usize {
        self.world.query::<&Enemy>().iter().count()
    }

    pub fn projectile_count(&self) -> usize {
        self.world.query::<&Projectile>().iter().count()
    }

    /// Remove projectiles that left the arena. Returns how many were removed.
    pub fn purge_expired_projectiles(&mut self, bounds: &Bounds) -> usize {
        self.despawn_buffer.clear();
        for (entity, (pos, _projectile)) in self.world.query_mut::<(&Position, &Projectile)>() {
            if !bounds.contains(pos) {
                self.despawn_buffer.push(entity);
            }
        }
        self.flush_despawns()
    }

    /// Remove projectiles that already hit something this tick.
    pub fn purge_consumed_projectiles(&mut self) -> usize {
        self.despawn_buffer.clear();
        for (entity, projectile) in self.world.query_mut::<&Projectile>() {
            if projectile.consumed {
                self.despawn_buffer.push(entity);
            }
        }
        self.flush_despawns()
    }

    /// Drop every entity. Spawn order keeps counting.
    pub fn clear(&mut self) {
        self.world.clear();
    }

    fn flush_despawns(&mut self) -> usize {
        let mut removed = 0;
        for entity in self.despawn_buffer.drain(..) {
            if self.world.despawn(entity).is_ok() {
                removed += 1;
            }
        }
        removed
    }
}
