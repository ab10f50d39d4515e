//! Tests for the simulation engine, tower, director and per-tick systems.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bulwark_core::commands::PlayerCommand;
use bulwark_core::components::{Enemy, Health, Projectile, SpawnOrder};
use bulwark_core::config::{GameConfig, TowerConfig};
use bulwark_core::constants::*;
use bulwark_core::enums::*;
use bulwark_core::events::{AudioEvent, EventLog};
use bulwark_core::types::{Position, SimTime};

use crate::director::{Director, SpawnOutcome};
use crate::engine::{SimConfig, SimulationEngine};
use crate::store::EntityStore;
use crate::systems::{cleanup, collision, projectiles};
use crate::tower::{Tower, UpgradeOutcome};
use crate::world_setup;

/// 60 Hz frame spacing used by the scenario tests.
const FRAME_MS: f64 = 16.0;

fn playing_engine(config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config);
    engine.start();
    engine
}

fn config_with_points(points: i64) -> SimConfig {
    SimConfig {
        game: GameConfig {
            starting_points: points,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn default_tower() -> Tower {
    Tower::new(Position::new(400.0, 300.0), &TowerConfig::default())
}

fn enemy_type(type_id: &str) -> bulwark_core::config::EnemyTypeSpec {
    Director::new(&GameConfig::default())
        .enemy_type(type_id)
        .cloned()
        .unwrap()
}

fn enemy_position(engine: &SimulationEngine, entity: hecs::Entity) -> Position {
    *engine.store().world().get::<&Position>(entity).unwrap()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let run = || {
        let mut engine = SimulationEngine::new(SimConfig {
            seed: 12345,
            ..Default::default()
        });
        engine.queue_command(PlayerCommand::Start);
        let mut snapshots = Vec::new();
        for frame in 0..600u32 {
            if frame % 40 == 0 {
                engine.queue_command(PlayerCommand::Spawn {
                    type_id: "BasicEnemy".into(),
                });
            }
            if frame == 100 {
                engine.queue_command(PlayerCommand::Upgrade {
                    stat_id: "damage".into(),
                    multiplier: UpgradeMultiplier::X10,
                });
            }
            let snap = engine.tick(f64::from(frame) * FRAME_MS);
            snapshots.push(serde_json::to_string(&snap).unwrap());
        }
        snapshots
    };

    let a = run();
    let b = run();
    assert_eq!(a.len(), b.len());
    for (tick, (json_a, json_b)) in a.iter().zip(&b).enumerate() {
        assert_eq!(json_a, json_b, "Snapshots diverged at tick {tick}");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = playing_engine(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = playing_engine(SimConfig {
        seed: 222,
        ..Default::default()
    });

    for _ in 0..5 {
        engine_a.request_spawn("BasicEnemy");
        engine_b.request_spawn("BasicEnemy");
    }
    let snap_a = engine_a.tick(0.0);
    let snap_b = engine_b.tick(0.0);

    let pos_a: Vec<Position> = snap_a.enemies.iter().map(|e| e.position).collect();
    let pos_b: Vec<Position> = snap_b.enemies.iter().map(|e| e.position).collect();
    assert_eq!(pos_a.len(), 5);
    assert_ne!(pos_a, pos_b, "Different seeds should place enemies differently");
}

// ---- Director ----

#[test]
fn test_spawn_points_sit_just_outside_one_edge() {
    let config = GameConfig::default();
    let director = Director::new(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let (w, h, off) = (ARENA_WIDTH, ARENA_HEIGHT, SPAWN_EDGE_OFFSET);

    for _ in 0..500 {
        let (_edge, p) = director.spawn_point(&mut rng);
        let on_top = p.y == -off && (0.0..=w).contains(&p.x);
        let on_bottom = p.y == h + off && (0.0..=w).contains(&p.x);
        let on_left = p.x == -off && (0.0..=h).contains(&p.y);
        let on_right = p.x == w + off && (0.0..=h).contains(&p.y);
        assert!(
            on_top || on_bottom || on_left || on_right,
            "Spawn point {p:?} is not on an edge band"
        );
    }
}

#[test]
fn test_spawn_deducts_cost_and_stamps_attack_timer() {
    let mut engine = playing_engine(SimConfig::default());
    engine.tick(1234.0);

    let outcome = engine.request_spawn("HeavyEnemy");
    let SpawnOutcome::Spawned { entity } = outcome else {
        panic!("expected a spawn, got {outcome:?}");
    };
    assert_eq!(engine.points(), STARTING_POINTS - 15);

    let enemy = engine.store().world().get::<&Enemy>(entity).unwrap();
    assert_eq!(enemy.last_attack_ms, 1234.0);
    assert_eq!(enemy.phase, EnemyPhase::Approaching);
    let health = engine.store().world().get::<&Health>(entity).unwrap();
    assert_eq!(health.hp, 5.0);
    drop(enemy);
    drop(health);

    let snap = engine.tick(1250.0);
    assert!(snap.audio_events.contains(&AudioEvent::Spawned {
        type_id: "HeavyEnemy".into()
    }));
}

#[test]
fn test_affordability_gate_blocks_spawn() {
    let mut engine = playing_engine(config_with_points(7));

    assert!(engine.request_spawn("BasicEnemy").is_spawned());
    assert_eq!(engine.points(), 2);

    let outcome = engine.request_spawn("BasicEnemy");
    assert_eq!(outcome, SpawnOutcome::Insufficient { cost: 5 });
    assert_eq!(
        outcome.reason().as_deref(),
        Some("Insufficient points. Enemy cost: +5")
    );
    assert_eq!(engine.points(), 2, "Failed spawn must not change points");
    assert_eq!(engine.store().enemy_count(), 1);

    let snap = engine.tick(0.0);
    assert_eq!(snap.messages.len(), 1);
    assert_eq!(snap.messages[0].level, MessageLevel::Warning);
    assert_eq!(snap.messages[0].text, "Insufficient points. Enemy cost: +5");

    let snap = engine.tick(FRAME_MS);
    assert!(snap.messages.is_empty(), "Messages are drained once");
}

#[test]
fn test_exact_balance_is_affordable() {
    let mut engine = playing_engine(config_with_points(25));
    assert!(engine.request_spawn("CunningEnemy").is_spawned());
    assert_eq!(engine.points(), 0);
    assert_eq!(
        engine.request_spawn("BasicEnemy"),
        SpawnOutcome::Insufficient { cost: 5 }
    );
}

#[test]
fn test_unknown_enemy_type_is_silent() {
    let mut engine = playing_engine(SimConfig::default());
    let outcome = engine.request_spawn("DragonEnemy");
    assert_eq!(outcome, SpawnOutcome::UnknownType);
    assert!(outcome.reason().is_none());
    assert_eq!(engine.points(), STARTING_POINTS);

    let snap = engine.tick(0.0);
    assert!(snap.messages.is_empty());
    assert!(snap.enemies.is_empty());
}

#[test]
fn test_enemy_dies_rewards_once() {
    let config = GameConfig::default();
    let mut director = Director::new(&config);
    let mut store = EntityStore::new();
    let mut events = EventLog::default();

    let entity =
        world_setup::spawn_enemy(&mut store, &enemy_type("FastEnemy"), Position::new(0.0, 0.0), 0.0);

    assert!(director.enemy_dies(entity, &mut store, &mut events));
    assert!(!director.enemy_dies(entity, &mut store, &mut events));

    assert_eq!(director.points(), STARTING_POINTS + 12);
    assert_eq!(director.kills(), 1);
    assert!(!store.contains(entity));
    assert_eq!(
        events.audio,
        vec![AudioEvent::EnemyDestroyed {
            type_id: "FastEnemy".into()
        }]
    );
}

#[test]
fn test_reset_points_restores_starting_balance() {
    let mut director = Director::new(&GameConfig::default());
    director.subtract_points(400);
    director.add_points(6);
    assert_eq!(director.points(), STARTING_POINTS - 394);
    director.reset_points();
    director.reset_kills();
    assert_eq!(director.points(), STARTING_POINTS);
    assert_eq!(director.kills(), 0);
}

// ---- Tower ----

#[test]
fn test_tower_defaults_from_config() {
    let tower = default_tower();
    assert_eq!(tower.radius(), 25.0);
    assert_eq!(tower.hp(), 100.0);
    assert_eq!(tower.max_hp(), 100.0);
    assert_eq!(tower.range(), 100.0);
    assert_eq!(tower.fire_interval_ms(), 1000.0);
    assert_eq!(tower.damage(), 1.0);
    assert_eq!(tower.projectile_speed(), 1.0);
    assert_eq!(tower.projectile_radius(), 1.0);
    assert_eq!(tower.last_fire_ms(), 0.0);
}

#[test]
fn test_tower_setters_clamp() {
    let mut tower = default_tower();

    tower.add_hp(50.0);
    assert_eq!(tower.hp(), 100.0, "hp is capped at max_hp");
    tower.remove_hp(500.0);
    assert_eq!(tower.hp(), 0.0);
    assert!(tower.is_destroyed());

    tower.set_range(10_000.0);
    assert_eq!(tower.range(), TOWER_RANGE_MAX);
    tower.remove_range(10_000.0);
    assert_eq!(tower.range(), 0.0);

    tower.add_fire_rate(5000.0);
    assert_eq!(tower.fire_interval_ms(), TOWER_FIRE_INTERVAL_MIN_MS);
    tower.remove_fire_rate(1_000_000.0);
    assert_eq!(tower.fire_interval_ms(), TOWER_FIRE_INTERVAL_MAX_MS);

    tower.set_radius(1.0);
    assert_eq!(tower.radius(), TOWER_RADIUS_MIN);
    tower.set_projectile_speed(0.0);
    assert_eq!(tower.projectile_speed(), TOWER_PROJECTILE_SPEED_MIN);
    tower.set_damage(f64::NAN);
    assert_eq!(tower.damage(), TOWER_DAMAGE_MIN);
}

#[test]
fn test_max_hp_never_below_hp() {
    let mut tower = default_tower();
    tower.remove_max_hp(60.0);
    assert_eq!(tower.max_hp(), 100.0, "max_hp is floored at current hp");

    tower.set_hp(30.0);
    tower.set_max_hp(10.0);
    assert_eq!(tower.max_hp(), 30.0);
}

#[derive(Debug, Clone)]
enum StatOp {
    Hp(f64),
    MaxHp(f64),
    Range(f64),
    FireRate(f64),
    Damage(f64),
    Speed(f64),
    Radius(f64),
    ProjectileRadius(f64),
}

fn stat_op() -> impl Strategy<Value = StatOp> {
    let delta = -20_000.0f64..20_000.0;
    prop_oneof![
        delta.clone().prop_map(StatOp::Hp),
        delta.clone().prop_map(StatOp::MaxHp),
        delta.clone().prop_map(StatOp::Range),
        delta.clone().prop_map(StatOp::FireRate),
        delta.clone().prop_map(StatOp::Damage),
        delta.clone().prop_map(StatOp::Speed),
        delta.clone().prop_map(StatOp::Radius),
        delta.prop_map(StatOp::ProjectileRadius),
    ]
}

proptest! {
    #[test]
    fn prop_tower_stats_stay_in_bounds(ops in prop::collection::vec(stat_op(), 0..64)) {
        let mut tower = default_tower();
        for op in ops {
            match op {
                StatOp::Hp(d) => tower.add_hp(d),
                StatOp::MaxHp(d) => tower.add_max_hp(d),
                StatOp::Range(d) => tower.add_range(d),
                StatOp::FireRate(d) => tower.add_fire_rate(d),
                StatOp::Damage(d) => tower.remove_damage(d),
                StatOp::Speed(d) => tower.add_projectile_speed(d),
                StatOp::Radius(d) => tower.remove_radius(d),
                StatOp::ProjectileRadius(d) => tower.add_projectile_radius(d),
            }
            prop_assert!(tower.hp() >= 0.0 && tower.hp() <= tower.max_hp());
            prop_assert!(tower.max_hp() <= TOWER_MAX_HP_CAP);
            prop_assert!((TOWER_RADIUS_MIN..=TOWER_RADIUS_MAX).contains(&tower.radius()));
            prop_assert!((TOWER_RANGE_MIN..=TOWER_RANGE_MAX).contains(&tower.range()));
            prop_assert!((TOWER_FIRE_INTERVAL_MIN_MS..=TOWER_FIRE_INTERVAL_MAX_MS)
                .contains(&tower.fire_interval_ms()));
            prop_assert!((TOWER_DAMAGE_MIN..=TOWER_DAMAGE_MAX).contains(&tower.damage()));
            prop_assert!((TOWER_PROJECTILE_SPEED_MIN..=TOWER_PROJECTILE_SPEED_MAX)
                .contains(&tower.projectile_speed()));
            prop_assert!((TOWER_PROJECTILE_RADIUS_MIN..=TOWER_PROJECTILE_RADIUS_MAX)
                .contains(&tower.projectile_radius()));
        }
    }
}

#[test]
fn test_scan_picks_nearest_and_first_on_ties() {
    let tower = default_tower();
    let mut store = EntityStore::new();
    let basic = enemy_type("BasicEnemy");

    let far = world_setup::spawn_enemy(&mut store, &basic, Position::new(480.0, 300.0), 0.0);
    let tie_a = world_setup::spawn_enemy(&mut store, &basic, Position::new(450.0, 300.0), 0.0);
    let tie_b = world_setup::spawn_enemy(&mut store, &basic, Position::new(350.0, 300.0), 0.0);
    let _out = world_setup::spawn_enemy(&mut store, &basic, Position::new(400.0, 401.0), 0.0);

    let candidates = store.enemy_positions();
    assert_eq!(candidates.len(), 4);
    let (target, _) = tower.scan_for_enemies(&candidates).unwrap();
    assert_eq!(target, tie_a, "Earlier enemy wins an exact tie");
    assert_ne!(target, tie_b);
    assert_ne!(target, far);
}

#[test]
fn test_scan_range_is_inclusive() {
    let tower = default_tower();
    let mut store = EntityStore::new();
    let basic = enemy_type("BasicEnemy");

    let outside = world_setup::spawn_enemy(&mut store, &basic, Position::new(400.0, 400.5), 0.0);
    assert!(tower.scan_for_enemies(&store.enemy_positions()).is_none());

    let edge = world_setup::spawn_enemy(&mut store, &basic, Position::new(400.0, 200.0), 0.0);
    let (target, _) = tower.scan_for_enemies(&store.enemy_positions()).unwrap();
    assert_eq!(target, edge);
    assert_ne!(target, outside);
}

#[test]
fn test_fire_interval_gates_shots() {
    let mut tower = default_tower();
    let mut store = EntityStore::new();
    let mut events = EventLog::default();
    let target = Position::new(500.0, 300.0);

    assert!(tower.try_fire(&target, 500.0, &mut store, &mut events).is_none());
    let shot = tower
        .try_fire(&target, 1000.0, &mut store, &mut events)
        .expect("interval elapsed");
    assert!(tower.try_fire(&target, 1999.0, &mut store, &mut events).is_none());
    assert!(tower.try_fire(&target, 2000.0, &mut store, &mut events).is_some());

    assert_eq!(store.projectile_count(), 2);
    assert_eq!(tower.last_fire_ms(), 2000.0);
    assert_eq!(
        events.audio,
        vec![AudioEvent::ProjectileFired, AudioEvent::ProjectileFired]
    );

    // Leaves from the tower's edge, heading at the target.
    let pos = *store.world().get::<&Position>(shot).unwrap();
    assert!((pos.x - 425.0).abs() < 1e-9);
    assert!((pos.y - 300.0).abs() < 1e-9);
}

#[test]
fn test_no_fire_at_coincident_target() {
    let mut tower = default_tower();
    let mut store = EntityStore::new();
    let mut events = EventLog::default();

    let centre = tower.position();
    assert!(tower.try_fire(&centre, 5000.0, &mut store, &mut events).is_none());
    assert_eq!(store.projectile_count(), 0);
    assert_eq!(tower.last_fire_ms(), 0.0, "A skipped shot does not reset the timer");
}

#[test]
fn test_upgrade_applies_multiplier_and_cost() {
    let mut engine = playing_engine(SimConfig::default());

    let outcome = engine.request_upgrade("damage", UpgradeMultiplier::X2);
    assert_eq!(
        outcome,
        UpgradeOutcome::Upgraded {
            stat: TowerStat::Damage,
            cost: 10
        }
    );
    assert_eq!(engine.tower().damage(), 3.0);
    assert_eq!(engine.points(), STARTING_POINTS - 10);

    engine.request_upgrade("Health", UpgradeMultiplier::X1);
    assert_eq!(engine.tower().max_hp(), 110.0);
    assert_eq!(engine.tower().hp(), 110.0);

    engine.request_upgrade("fire rate", UpgradeMultiplier::X10);
    assert_eq!(engine.tower().fire_interval_ms(), TOWER_FIRE_INTERVAL_MIN_MS);
    assert_eq!(engine.points(), STARTING_POINTS - 10 - 5 - 50);

    let snap = engine.tick(0.0);
    let texts: Vec<&str> = snap.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Damage +2 for 10 points",
            "Health +10 for 5 points",
            "Fire Rate -1000 ms for 50 points",
        ]
    );
}

#[test]
fn test_upgrade_insufficient_points() {
    let mut engine = playing_engine(config_with_points(9));

    let outcome = engine.request_upgrade("range", UpgradeMultiplier::X2);
    assert_eq!(
        outcome,
        UpgradeOutcome::Insufficient {
            stat: TowerStat::Range,
            cost: 10
        }
    );
    assert_eq!(engine.points(), 9);
    assert_eq!(engine.tower().range(), TOWER_RANGE);

    let snap = engine.tick(0.0);
    assert_eq!(snap.messages[0].text, "Insufficient points. Upgrade cost: 10");
}

#[test]
fn test_upgrade_unknown_stat_is_noop() {
    let mut engine = playing_engine(SimConfig::default());
    assert_eq!(
        engine.request_upgrade("armor", UpgradeMultiplier::X10),
        UpgradeOutcome::UnknownStat
    );
    assert_eq!(engine.points(), STARTING_POINTS);
    assert!(engine.tick(0.0).messages.is_empty());
}

#[test]
fn test_upgrade_cost_saturates_instead_of_overflowing() {
    let mut config = SimConfig::default();
    config.game.upgrade_base_cost = i64::MAX;
    let mut engine = playing_engine(config);

    assert_eq!(
        engine.request_upgrade("damage", UpgradeMultiplier::X2),
        UpgradeOutcome::Insufficient {
            stat: TowerStat::Damage,
            cost: i64::MAX
        }
    );
    assert_eq!(engine.points(), STARTING_POINTS);
    assert_eq!(engine.tower().damage(), TOWER_DAMAGE);
}

#[test]
fn test_point_balance_saturates() {
    let mut director = Director::new(&GameConfig::default());
    director.add_points(i64::MAX);
    assert_eq!(director.points(), i64::MAX);
    director.reset_points();
    director.subtract_points(i64::MAX);
    director.subtract_points(i64::MAX);
    assert_eq!(director.points(), i64::MIN);
}

// ---- Systems ----

#[test]
fn test_projectile_expires_after_leaving_bounds() {
    let mut store = EntityStore::new();
    let bounds = GameConfig::default().bounds();
    let heading = Position::new(0.0, 0.0)
        .direction_to(&Position::new(1.0, 0.0))
        .unwrap();
    let shot = world_setup::spawn_projectile(
        &mut store,
        Position::new(799.5, 300.0),
        heading,
        1.0,
        1.0,
        1.0,
    );

    assert_eq!(projectiles::purge_expired(&mut store, &bounds), 0);
    projectiles::advance(&mut store);
    let pos = *store.world().get::<&Position>(shot).unwrap();
    assert_eq!(pos.x, 800.5);

    assert_eq!(projectiles::purge_expired(&mut store, &bounds), 1);
    assert!(!store.contains(shot));
    assert_eq!(projectiles::purge_expired(&mut store, &bounds), 0);
}

#[test]
fn test_collision_one_hit_per_enemy_per_tick() {
    let mut store = EntityStore::new();
    let mut director = Director::new(&GameConfig::default());
    let mut events = EventLog::default();
    let at = Position::new(100.0, 100.0);
    let heading = at.direction_to(&Position::new(0.0, 100.0)).unwrap();

    let enemy = world_setup::spawn_enemy(&mut store, &enemy_type("BasicEnemy"), at, 0.0);
    let first = world_setup::spawn_projectile(&mut store, at, heading, 1.0, 1.0, 1.0);
    let second = world_setup::spawn_projectile(&mut store, at, heading, 1.0, 1.0, 1.0);

    assert_eq!(collision::run(&mut store), 1);
    assert!(!store.contains(first), "Earliest projectile is used first");
    assert!(store.contains(second));
    assert_eq!(store.world().get::<&Health>(enemy).unwrap().hp, 1.0);
    assert_eq!(cleanup::run(&mut store, &mut director, &mut events), 0);

    assert_eq!(collision::run(&mut store), 1);
    assert_eq!(store.projectile_count(), 0);
    assert_eq!(cleanup::run(&mut store, &mut director, &mut events), 1);
    assert_eq!(cleanup::run(&mut store, &mut director, &mut events), 0);

    assert_eq!(director.kills(), 1);
    assert_eq!(director.points(), STARTING_POINTS + 6);
    assert_eq!(store.enemy_count(), 0);
}

#[test]
fn test_projectile_hits_only_one_enemy() {
    let mut store = EntityStore::new();
    let at = Position::new(200.0, 200.0);
    let heading = at.direction_to(&Position::new(0.0, 0.0)).unwrap();

    let a = world_setup::spawn_enemy(&mut store, &enemy_type("CunningEnemy"), at, 0.0);
    let b = world_setup::spawn_enemy(&mut store, &enemy_type("CunningEnemy"), at, 0.0);
    let shot = world_setup::spawn_projectile(&mut store, at, heading, 1.0, 1.0, 4.0);

    assert_eq!(collision::run(&mut store), 1);
    assert!(!store.contains(shot));
    assert_eq!(store.world().get::<&Health>(a).unwrap().hp, 11.0);
    assert_eq!(store.world().get::<&Health>(b).unwrap().hp, 15.0);

    let leftover = store
        .world()
        .query::<&Projectile>()
        .iter()
        .count();
    assert_eq!(leftover, 0);
}

#[test]
fn test_store_order_survives_despawn() {
    let mut store = EntityStore::new();
    let basic = enemy_type("BasicEnemy");
    let spawned: Vec<hecs::Entity> = (0..6)
        .map(|i| {
            world_setup::spawn_enemy(&mut store, &basic, Position::new(f64::from(i), 0.0), 0.0)
        })
        .collect();

    assert!(store.despawn(spawned[1]));
    assert!(store.despawn(spawned[4]));
    assert!(!store.despawn(spawned[4]), "Second despawn reports false");

    let replacement = world_setup::spawn_enemy(&mut store, &basic, Position::new(9.0, 0.0), 0.0);
    assert_eq!(
        store.enemies_in_order(),
        vec![spawned[0], spawned[2], spawned[3], spawned[5], replacement]
    );
}

#[test]
fn test_store_clear_keeps_counting_spawn_order() {
    let mut store = EntityStore::new();
    let basic = enemy_type("BasicEnemy");
    let first = world_setup::spawn_enemy(&mut store, &basic, Position::new(0.0, 0.0), 0.0);
    let heading = Position::new(0.0, 0.0)
        .direction_to(&Position::new(0.0, 1.0))
        .unwrap();
    world_setup::spawn_projectile(&mut store, Position::new(5.0, 5.0), heading, 4.0, 2.0, 1.0);

    store.clear();
    assert_eq!(store.enemy_count(), 0);
    assert_eq!(store.projectile_count(), 0);
    assert!(!store.contains(first));

    let next = world_setup::spawn_enemy(&mut store, &basic, Position::new(1.0, 0.0), 0.0);
    let order = store.world().get::<&SpawnOrder>(next).unwrap().0;
    assert_eq!(order, 2, "Spawn order keeps counting across a clear");
}

// ---- Engine: movement and timing ----

#[test]
fn test_first_tick_after_start_does_not_move() {
    let mut engine = playing_engine(SimConfig::default());
    let SpawnOutcome::Spawned { entity } = engine.request_spawn("BasicEnemy") else {
        panic!("spawn failed");
    };
    let start = enemy_position(&engine, entity);

    engine.tick(5000.0);
    assert_eq!(enemy_position(&engine, entity), start);

    engine.tick(5000.0 + FRAME_MS);
    let moved = enemy_position(&engine, entity);
    let travelled = start.distance_to(&moved);
    assert!(
        (travelled - 200.0 * 0.016).abs() < 1e-9,
        "BasicEnemy should move speed * dt, moved {travelled}"
    );
    let tower = engine.tower().position();
    assert!(moved.distance_to(&tower) < start.distance_to(&tower));
}

#[test]
fn test_movement_is_proportional_to_elapsed_time() {
    let mut engine = playing_engine(SimConfig::default());
    let SpawnOutcome::Spawned { entity } = engine.request_spawn("BasicEnemy") else {
        panic!("spawn failed");
    };
    engine.tick(0.0);
    let start = enemy_position(&engine, entity);

    // A slow driver: one whole second between ticks.
    engine.tick(1000.0);
    let travelled = start.distance_to(&enemy_position(&engine, entity));
    assert!(
        (travelled - 200.0).abs() < 1e-9,
        "BasicEnemy should cover 200 units in 1 s, moved {travelled}"
    );
}

#[test]
fn test_clock_stepping_back_does_not_move_enemies() {
    let mut engine = playing_engine(SimConfig::default());
    let SpawnOutcome::Spawned { entity } = engine.request_spawn("BasicEnemy") else {
        panic!("spawn failed");
    };
    engine.tick(1000.0);
    let start = enemy_position(&engine, entity);

    engine.tick(500.0);
    assert_eq!(enemy_position(&engine, entity), start);
}

#[test]
fn test_non_finite_timestamp_is_ignored() {
    let shots = |snap: &bulwark_core::state::GameStateSnapshot| {
        snap.audio_events
            .iter()
            .filter(|e| matches!(e, AudioEvent::ProjectileFired))
            .count()
    };
    let mut engine = playing_engine(SimConfig::default());
    engine.tick(0.0);
    let at = Position::new(480.0, 300.0);
    world_setup::spawn_enemy(engine.store_mut(), &enemy_type("CunningEnemy"), at, 0.0);

    assert_eq!(shots(&engine.tick(1000.0)), 1, "Interval elapsed, tower fires");

    let snap = engine.tick(f64::NAN);
    assert_eq!(snap.time.now_ms, 1000.0, "NaN keeps the previous clock");
    assert_eq!(shots(&snap), 0);

    // The fire interval still gates shots after the bad timestamp.
    assert_eq!(shots(&engine.tick(f64::INFINITY)), 0);
    assert_eq!(shots(&engine.tick(1000.0 + FRAME_MS)), 0);
    assert_eq!(engine.tower().last_fire_ms(), 1000.0);
}

#[test]
fn test_fast_enemy_stops_at_contact() {
    let mut engine = playing_engine(SimConfig::default());
    let SpawnOutcome::Spawned { entity } = engine.request_spawn("FastEnemy") else {
        panic!("spawn failed");
    };
    engine.tick(0.0);
    let arrival = engine.tick(250.0);

    let pos = enemy_position(&engine, entity);
    let distance = pos.distance_to(&engine.tower().position());
    assert!(
        (distance - 32.0).abs() < 1e-6,
        "FastEnemy should stop touching the tower, distance {distance}"
    );
    let phase = engine.store().world().get::<&Enemy>(entity).unwrap().phase;
    assert_eq!(phase, EnemyPhase::InRange);

    // Arriving takes the whole tick; the first swing comes on the next one.
    let hit = |e: &AudioEvent| matches!(e, AudioEvent::TowerDamaged { .. });
    assert!(!arrival.audio_events.iter().any(hit));
    assert_eq!(engine.tower().hp(), TOWER_HP);
    let next = engine.tick(250.0 + FRAME_MS);
    assert_eq!(next.audio_events.iter().filter(|&e| hit(e)).count(), 1);
    assert_eq!(engine.tower().hp(), TOWER_HP - 1.0);
}

#[test]
fn test_in_range_enemy_attacks_on_interval() {
    let mut engine = playing_engine(SimConfig::default());
    engine.request_spawn("HeavyEnemy");
    engine.tick(0.0);

    // Walk into contact; 500 units/s covers any spawn distance in well under 2 s.
    let mut now = 0.0;
    let mut damage_events = 0;
    while now < 2000.0 {
        now += FRAME_MS;
        let snap = engine.tick(now);
        damage_events += snap
            .audio_events
            .iter()
            .filter(|e| matches!(e, AudioEvent::TowerDamaged { .. }))
            .count();
    }
    assert!(damage_events > 0, "HeavyEnemy should be attacking by now");
    assert_eq!(
        engine.tower().hp(),
        100.0 - 5.0 * damage_events as f64,
        "Each attack removes exactly the enemy's damage"
    );

    // One more interval worth of frames lands exactly one more hit.
    let hp_before = engine.tower().hp();
    let mut extra = 0;
    for _ in 0..16 {
        now += FRAME_MS;
        extra += engine
            .tick(now)
            .audio_events
            .iter()
            .filter(|e| matches!(e, AudioEvent::TowerDamaged { .. }))
            .count();
    }
    assert_eq!(extra, 1, "256 ms of contact covers one 250 ms interval");
    assert_eq!(engine.tower().hp(), hp_before - 5.0);
}

// ---- Engine: lifecycle ----

#[test]
fn test_requests_rejected_outside_a_run() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert_eq!(engine.phase(), GamePhase::MainMenu);
    assert_eq!(engine.request_spawn("BasicEnemy"), SpawnOutcome::NotPlaying);
    assert_eq!(
        engine.request_upgrade("damage", UpgradeMultiplier::X1),
        UpgradeOutcome::NotPlaying
    );
    assert_eq!(engine.points(), STARTING_POINTS);

    engine.toggle_pause();
    assert_eq!(engine.phase(), GamePhase::MainMenu, "Pause needs a running game");
}

#[test]
fn test_pause_freezes_simulation() {
    let mut engine = playing_engine(SimConfig::default());
    let SpawnOutcome::Spawned { entity } = engine.request_spawn("BasicEnemy") else {
        panic!("spawn failed");
    };
    engine.tick(0.0);
    engine.tick(FRAME_MS);
    let ticks = engine.time().tick;

    engine.toggle_pause();
    assert_eq!(engine.phase(), GamePhase::Paused);
    let frozen = enemy_position(&engine, entity);
    for i in 2..50 {
        let snap = engine.tick(f64::from(i) * FRAME_MS);
        assert_eq!(snap.phase, GamePhase::Paused);
    }
    assert_eq!(enemy_position(&engine, entity), frozen);
    assert_eq!(engine.time().tick, ticks, "No ticks counted while paused");

    // Requests still go through while paused.
    assert!(engine.request_spawn("BasicEnemy").is_spawned());

    engine.toggle_pause();
    engine.tick(10_000.0);
    assert_eq!(
        enemy_position(&engine, entity),
        frozen,
        "First tick after resume integrates no time"
    );
    engine.tick(10_000.0 + FRAME_MS);
    assert_ne!(enemy_position(&engine, entity), frozen);
}

#[test]
fn test_tower_destroyed_stops_game() {
    let mut engine = playing_engine(SimConfig::default());
    engine.tower_mut().set_hp(5.0);
    engine.request_spawn("PowerfulEnemy");

    let mut now = 0.0;
    while engine.phase() == GamePhase::Playing && now < 10_000.0 {
        engine.tick(now);
        now += FRAME_MS;
    }
    assert_eq!(engine.phase(), GamePhase::Stopped);
    assert_eq!(engine.tower().hp(), 0.0);
    assert_eq!(engine.kills(), 0);

    // Terminal: nothing restarts it and the clock stops counting ticks.
    let ticks = engine.time().tick;
    engine.start();
    engine.toggle_pause();
    assert_eq!(engine.phase(), GamePhase::Stopped);
    assert_eq!(engine.request_spawn("BasicEnemy"), SpawnOutcome::NotPlaying);
    let snap = engine.tick(now + 1000.0);
    assert_eq!(snap.phase, GamePhase::Stopped);
    assert_eq!(engine.time().tick, ticks);
}

#[test]
fn test_reset_returns_to_main_menu() {
    let mut engine = playing_engine(SimConfig::default());
    engine.request_spawn("BasicEnemy");
    engine.request_upgrade("range", UpgradeMultiplier::X10);
    engine.tick(0.0);
    engine.tick(500.0);

    engine.reset();
    assert_eq!(engine.phase(), GamePhase::MainMenu);
    assert_eq!(engine.points(), STARTING_POINTS);
    assert_eq!(engine.kills(), 0);
    assert_eq!(engine.store().enemy_count(), 0);
    assert_eq!(engine.store().projectile_count(), 0);
    assert_eq!(engine.tower().range(), TOWER_RANGE);
    assert_eq!(engine.time().tick, 0);
    assert_eq!(engine.time().now_ms, 500.0);
}

#[test]
fn test_reset_replays_same_spawn_points() {
    let mut engine = playing_engine(SimConfig::default());
    engine.request_spawn("BasicEnemy");
    let first = engine.tick(0.0).enemies[0].position;

    engine.reset();
    engine.start();
    engine.request_spawn("BasicEnemy");
    let again = engine.tick(0.0).enemies[0].position;
    assert_eq!(first, again, "Reset reseeds the RNG");
}

#[test]
fn test_queued_commands_run_in_order() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([
        PlayerCommand::Start,
        PlayerCommand::Spawn {
            type_id: "BasicEnemy".into(),
        },
        PlayerCommand::Upgrade {
            stat_id: "damage".into(),
            multiplier: UpgradeMultiplier::X1,
        },
    ]);
    let snap = engine.tick(0.0);
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.points, STARTING_POINTS - 10);
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.tower.damage, 2.0);

    engine.queue_commands([
        PlayerCommand::Reset,
        PlayerCommand::Start,
        PlayerCommand::Spawn {
            type_id: "HeavyEnemy".into(),
        },
    ]);
    let snap = engine.tick(FRAME_MS);
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.points, STARTING_POINTS - 15);
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].type_id, "HeavyEnemy");
    assert_eq!(snap.tower.damage, 1.0);
}

#[test]
fn test_tower_shoots_down_enemy_and_pays_reward() {
    let mut engine = playing_engine(SimConfig::default());
    engine.request_spawn("BasicEnemy");
    engine.request_upgrade("damage", UpgradeMultiplier::X2);
    engine.request_upgrade("projectile speed", UpgradeMultiplier::X10);
    engine.request_upgrade("projectile radius", UpgradeMultiplier::X10);
    let spent = 5 + 10 + 50 + 50;

    let mut now = 0.0;
    let mut destroyed = Vec::new();
    let mut fired = 0;
    while engine.kills() == 0 && now < 10_000.0 {
        let snap = engine.tick(now);
        for event in snap.audio_events {
            match event {
                AudioEvent::EnemyDestroyed { type_id } => destroyed.push(type_id),
                AudioEvent::ProjectileFired => fired += 1,
                _ => {}
            }
        }
        now += FRAME_MS;
    }

    assert_eq!(engine.kills(), 1);
    assert_eq!(destroyed, vec!["BasicEnemy".to_string()]);
    assert!(fired >= 1);
    assert_eq!(engine.points(), STARTING_POINTS - spent + 6);
    assert_eq!(engine.store().enemy_count(), 0);
    assert_eq!(engine.phase(), GamePhase::Playing);
}

#[test]
fn test_tower_contains_click() {
    let engine = SimulationEngine::new(SimConfig::default());
    assert!(engine.tower_contains(400.0, 300.0));
    assert!(engine.tower_contains(425.0, 300.0));
    assert!(!engine.tower_contains(426.0, 300.0));
}

#[test]
fn test_try_new_rejects_invalid_config() {
    let mut config = SimConfig::default();
    config.game.enemy_types.clear();
    assert!(SimulationEngine::try_new(config).is_err());
    assert!(SimulationEngine::try_new(SimConfig::default()).is_ok());
}

#[test]
fn test_snapshot_lists_entities_in_spawn_order() {
    let mut engine = playing_engine(SimConfig::default());
    for type_id in ["CunningEnemy", "BasicEnemy", "HeavyEnemy"] {
        engine.request_spawn(type_id);
    }
    let snap = engine.tick(0.0);
    let ids: Vec<u64> = snap.enemies.iter().map(|e| e.id).collect();
    let types: Vec<&str> = snap.enemies.iter().map(|e| e.type_id.as_str()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(types, vec!["CunningEnemy", "BasicEnemy", "HeavyEnemy"]);
    assert_eq!(snap.enemies[0].radius, 12.0);
    assert_eq!(snap.enemies[0].color, "yellow");
    assert_eq!(snap.tower.position, Position::new(400.0, 300.0));

    let SimTime { tick, now_ms } = snap.time;
    assert_eq!(tick, 1);
    assert_eq!(now_ms, 0.0);
}

#[test]
fn test_store_mut_allows_direct_placement() {
    let mut engine = playing_engine(SimConfig::default());
    let basic = enemy_type("BasicEnemy");
    let entity =
        world_setup::spawn_enemy(engine.store_mut(), &basic, Position::new(400.0, 270.0), 0.0);

    // Already touching the tower: switches to InRange and attacks at once.
    let snap = engine.tick(200.0);
    assert_eq!(snap.enemies[0].phase, EnemyPhase::InRange);
    assert_eq!(engine.tower().hp(), 99.0);
    assert!(engine.store().contains(entity));
}

#[test]
fn test_sim_config_partial_json_uses_defaults() {
    let config: SimConfig = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
    assert_eq!(config.seed, 9);
    assert_eq!(config.game, GameConfig::default());

    let engine = SimulationEngine::try_new(config).unwrap();
    assert_eq!(engine.config().seed, 9);
    assert_eq!(engine.director().catalog().len(), 5);
}

#[test]
fn test_basic_enemy_full_lifecycle() {
    let mut engine = playing_engine(SimConfig::default());
    let SpawnOutcome::Spawned { entity } = engine.request_spawn("BasicEnemy") else {
        panic!("spawn failed");
    };
    assert_eq!(engine.points(), 4995);
    assert_eq!(engine.store().enemy_count(), 1);
    {
        let enemy = engine.store().world().get::<&Enemy>(entity).unwrap();
        assert_eq!(enemy.speed, 200.0);
        assert_eq!(enemy.damage, 1.0);
        assert_eq!(enemy.attack_interval_ms, 100.0);
        assert_eq!(enemy.point_value, 6);
        assert_eq!(engine.store().world().get::<&Health>(entity).unwrap().hp, 2.0);
    }

    let mut now = 0.0;
    let mut attack_times = Vec::new();
    while engine.kills() == 0 && now < 20_000.0 {
        let snap = engine.tick(now);
        for event in &snap.audio_events {
            if let AudioEvent::TowerDamaged { damage } = event {
                assert_eq!(*damage, 1.0);
                attack_times.push(now);
            }
        }
        now += FRAME_MS;
    }

    assert_eq!(engine.kills(), 1);
    assert_eq!(engine.points(), 4995 + 6);
    assert!(!engine.store().contains(entity));
    assert!(!attack_times.is_empty(), "Enemy should reach the tower first");
    for pair in attack_times.windows(2) {
        assert!(
            pair[1] - pair[0] >= 100.0,
            "Attacks closer than the interval: {pair:?}"
        );
    }
    assert_eq!(engine.tower().hp(), 100.0 - attack_times.len() as f64);
    assert_eq!(engine.phase(), GamePhase::Playing);
}
