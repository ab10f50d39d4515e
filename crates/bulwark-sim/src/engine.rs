//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the entity store, the tower, the director and the
//! RNG, processes player commands, runs all systems, and produces
//! `GameStateSnapshot`s. Completely headless; every timestamp comes in
//! through `tick(now_ms)`, so a fixed seed and timestamp script replays
//! exactly.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bulwark_core::commands::PlayerCommand;
use bulwark_core::config::{ConfigError, GameConfig};
use bulwark_core::enums::{GamePhase, UpgradeMultiplier};
use bulwark_core::events::EventLog;
use bulwark_core::state::GameStateSnapshot;
use bulwark_core::types::{Bounds, Position, SimTime};

use crate::director::{Director, SpawnOutcome};
use crate::store::EntityStore;
use crate::systems;
use crate::tower::{Tower, UpgradeOutcome};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the world and all game state.
pub struct SimulationEngine {
    config: SimConfig,
    bounds: Bounds,
    store: EntityStore,
    tower: Tower,
    director: Director,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    /// Timestamp of the previous Playing tick; `None` right after start or resume.
    last_frame_ms: Option<f64>,
    command_queue: VecDeque<PlayerCommand>,
    events: EventLog,
}

impl SimulationEngine {
    /// Create a new engine in `MainMenu`. The configuration is trusted;
    /// use `try_new` for configuration read from outside.
    pub fn new(config: SimConfig) -> Self {
        let bounds = config.game.bounds();
        Self {
            bounds,
            store: EntityStore::new(),
            tower: Tower::new(bounds.center(), &config.game.tower),
            director: Director::new(&config.game),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            last_frame_ms: None,
            command_queue: VecDeque::new(),
            events: EventLog::default(),
            config,
        }
    }

    /// Validate the game configuration, then create the engine.
    pub fn try_new(config: SimConfig) -> Result<Self, ConfigError> {
        config.game.validate()?;
        Ok(Self::new(config))
    }

    // --- Lifecycle ---

    /// `MainMenu -> Playing`. Ignored in any other phase.
    pub fn start(&mut self) {
        if self.phase == GamePhase::MainMenu {
            self.phase = GamePhase::Playing;
            self.last_frame_ms = None;
            info!(seed = self.config.seed, points = self.director.points(), "game started");
        }
    }

    /// `Playing <-> Paused`. Ignored in `MainMenu` and `Stopped`.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                info!(now_ms = self.time.now_ms, "game paused");
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.last_frame_ms = None;
                info!(now_ms = self.time.now_ms, "game resumed");
            }
            GamePhase::MainMenu | GamePhase::Stopped => {}
        }
    }

    /// Throw away the run and rebuild from the same config and seed.
    /// Queued commands and the clock reading survive.
    pub fn reset(&mut self) {
        let now_ms = self.time.now_ms;
        let queue = std::mem::take(&mut self.command_queue);
        *self = Self::new(self.config.clone());
        self.command_queue = queue;
        self.time.now_ms = now_ms;
        info!("game reset");
    }

    // --- Requests ---

    /// Buy an enemy of `type_id`.
    pub fn request_spawn(&mut self, type_id: &str) -> SpawnOutcome {
        if !self.accepts_requests() {
            debug!(type_id, phase = ?self.phase, "spawn ignored outside a run");
            return SpawnOutcome::NotPlaying;
        }
        self.director.spawn_enemy(
            type_id,
            &mut self.store,
            &mut self.rng,
            self.time.now_ms,
            &mut self.events,
        )
    }

    /// Buy a tower upgrade.
    pub fn request_upgrade(
        &mut self,
        stat_id: &str,
        multiplier: UpgradeMultiplier,
    ) -> UpgradeOutcome {
        if !self.accepts_requests() {
            debug!(stat_id, phase = ?self.phase, "upgrade ignored outside a run");
            return UpgradeOutcome::NotPlaying;
        }
        self.tower.upgrade(
            stat_id,
            multiplier,
            self.config.game.upgrade_base_cost,
            &mut self.director,
            self.time.now_ms,
            &mut self.events,
        )
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    // --- Tick ---

    /// Advance the simulation to `now_ms` and return the resulting snapshot.
    ///
    /// Queued commands run first. Systems only run while `Playing`; the
    /// snapshot is produced in every phase. A non-finite `now_ms` is
    /// ignored and the previous clock reading is reused.
    pub fn tick(&mut self, now_ms: f64) -> GameStateSnapshot {
        let now_ms = if now_ms.is_finite() {
            now_ms
        } else {
            warn!(now_ms, "non-finite timestamp ignored");
            self.time.now_ms
        };
        self.time.now_ms = now_ms;
        self.process_commands();

        if self.phase == GamePhase::Playing {
            let dt_secs = self.frame_dt(now_ms);
            self.run_systems(now_ms, dt_secs);
            self.time.tick += 1;

            if self.tower.is_destroyed() {
                self.phase = GamePhase::Stopped;
                info!(
                    tick = self.time.tick,
                    points = self.director.points(),
                    kills = self.director.kills(),
                    "tower destroyed, game over"
                );
            }
        }

        let (audio_events, messages) = self.events.drain();
        systems::snapshot::build_snapshot(
            &self.store,
            &self.tower,
            &self.director,
            &self.time,
            self.phase,
            messages,
            audio_events,
        )
    }

    // --- Queries ---

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn points(&self) -> i64 {
        self.director.points()
    }

    pub fn kills(&self) -> u32 {
        self.director.kills()
    }

    pub fn tower(&self) -> &Tower {
        &self.tower
    }

    pub fn director(&self) -> &Director {
        &self.director
    }

    /// Get a read-only reference to the entity store.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Click hit-test against the tower.
    pub fn tower_contains(&self, x: f64, y: f64) -> bool {
        self.tower.contains_point(&Position::new(x, y))
    }

    /// Mutable tower access for tests that need a specific stat block.
    #[cfg(test)]
    pub(crate) fn tower_mut(&mut self) -> &mut Tower {
        &mut self.tower
    }

    /// Mutable store access for tests that place entities directly.
    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    // --- Internals ---

    fn accepts_requests(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }

    /// Seconds since the previous Playing tick. Never negative, so a clock
    /// that steps backwards freezes movement for one tick.
    fn frame_dt(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_frame_ms {
            Some(prev) => ((now_ms - prev) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        if dt.is_nan() {
            0.0
        } else {
            dt
        }
    }

    /// Process all queued commands in FIFO order.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Start => self.start(),
            PlayerCommand::TogglePause => self.toggle_pause(),
            PlayerCommand::Reset => self.reset(),
            PlayerCommand::Spawn { type_id } => {
                self.request_spawn(&type_id);
            }
            PlayerCommand::Upgrade {
                stat_id,
                multiplier,
            } => {
                self.request_upgrade(&stat_id, multiplier);
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, now_ms: f64, dt_secs: f64) {
        // 1. Enemy movement and melee
        systems::enemy_advance::run(
            &mut self.store,
            &mut self.tower,
            now_ms,
            dt_secs,
            &mut self.events,
        );
        // 2. Projectiles that left the arena
        systems::projectiles::purge_expired(&mut self.store, &self.bounds);
        // 3. Projectile flight
        systems::projectiles::advance(&mut self.store);
        // 4. Hits
        systems::collision::run(&mut self.store);
        // 5. Rewards for dead enemies
        systems::cleanup::run(&mut self.store, &mut self.director, &mut self.events);
        // 6. Tower scan and fire
        systems::targeting::run(&mut self.store, &mut self.tower, now_ms, &mut self.events);
    }
}
