//! Simulation constants and tuning parameters.

// --- Arena ---

/// Default arena width (canvas units).
pub const ARENA_WIDTH: f64 = 800.0;

/// Default arena height (canvas units).
pub const ARENA_HEIGHT: f64 = 600.0;

/// Distance outside the arena edge at which enemies appear.
pub const SPAWN_EDGE_OFFSET: f64 = 10.0;

// --- Economy ---

/// Points the director starts a run with.
pub const STARTING_POINTS: i64 = 5000;

/// Base cost of a single upgrade step, before the multiplier.
pub const UPGRADE_BASE_COST: i64 = 5;

// --- Tower defaults ---

pub const TOWER_RADIUS: f64 = 25.0;
pub const TOWER_HP: f64 = 100.0;
pub const TOWER_RANGE: f64 = 100.0;
/// Milliseconds between shots. Lower is faster.
pub const TOWER_FIRE_INTERVAL_MS: f64 = 1000.0;
pub const TOWER_DAMAGE: f64 = 1.0;
pub const TOWER_PROJECTILE_SPEED: f64 = 1.0;
pub const TOWER_PROJECTILE_RADIUS: f64 = 1.0;

// --- Tower stat bounds ---

pub const TOWER_RADIUS_MIN: f64 = 10.0;
pub const TOWER_RADIUS_MAX: f64 = 500.0;
pub const TOWER_HP_MIN: f64 = 0.0;
/// Ceiling for max hp. The stat is otherwise only bounded below by current hp.
pub const TOWER_MAX_HP_CAP: f64 = 1_000_000.0;
pub const TOWER_RANGE_MIN: f64 = 0.0;
pub const TOWER_RANGE_MAX: f64 = 500.0;
pub const TOWER_FIRE_INTERVAL_MIN_MS: f64 = 10.0;
pub const TOWER_FIRE_INTERVAL_MAX_MS: f64 = 5000.0;
pub const TOWER_DAMAGE_MIN: f64 = 0.0;
pub const TOWER_DAMAGE_MAX: f64 = 1000.0;
pub const TOWER_PROJECTILE_SPEED_MIN: f64 = 1.0;
pub const TOWER_PROJECTILE_SPEED_MAX: f64 = 100.0;
pub const TOWER_PROJECTILE_RADIUS_MIN: f64 = 1.0;
pub const TOWER_PROJECTILE_RADIUS_MAX: f64 = 100.0;

// --- Upgrade increments (per multiplier step) ---

/// Added to both hp and max hp.
pub const UPGRADE_HEALTH_STEP: f64 = 10.0;
pub const UPGRADE_RANGE_STEP: f64 = 10.0;
/// Removed from the fire interval.
pub const UPGRADE_FIRE_INTERVAL_STEP_MS: f64 = 100.0;
pub const UPGRADE_DAMAGE_STEP: f64 = 1.0;
pub const UPGRADE_PROJECTILE_SPEED_STEP: f64 = 1.0;
pub const UPGRADE_PROJECTILE_RADIUS_STEP: f64 = 1.0;

// --- Timing ---

/// How long a client keeps a display message on screen.
pub const MESSAGE_FADE_MS: f64 = 2000.0;
