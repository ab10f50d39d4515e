//! Environment-driven settings for the headless binary.
//!
//! - `BULWARK_CONFIG`: path to a JSON `GameConfig` (defaults when unset)
//! - `BULWARK_SEED`: RNG seed (default 42)
//! - `BULWARK_RUN_SECS`: how long the scripted session runs (default 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use bulwark_core::config::{ConfigError, GameConfig};
use bulwark_sim::engine::SimConfig;

pub const CONFIG_PATH_VAR: &str = "BULWARK_CONFIG";
pub const SEED_VAR: &str = "BULWARK_SEED";
pub const RUN_SECS_VAR: &str = "BULWARK_RUN_SECS";

const DEFAULT_RUN_SECS: f64 = 10.0;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error(transparent)]
    Game(#[from] ConfigError),
    #[error("{var} must be {expected}, got {value:?}")]
    InvalidVar {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Everything the binary needs to run a session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sim: SimConfig,
    pub config_path: Option<PathBuf>,
    pub run_for: Duration,
}

impl AppConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, so tests can supply their own environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppConfigError> {
        let config_path = lookup(CONFIG_PATH_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let game = match &config_path {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        game.validate()?;

        let mut sim = SimConfig {
            game,
            ..Default::default()
        };
        if let Some(raw) = lookup(SEED_VAR) {
            sim.seed = raw
                .trim()
                .parse()
                .map_err(|_| AppConfigError::InvalidVar {
                    var: SEED_VAR,
                    expected: "an unsigned integer",
                    value: raw.clone(),
                })?;
        }

        let run_secs = match lookup(RUN_SECS_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or(AppConfigError::InvalidVar {
                    var: RUN_SECS_VAR,
                    expected: "a positive number of seconds",
                    value: raw,
                })?,
            None => DEFAULT_RUN_SECS,
        };

        Ok(Self {
            sim,
            config_path,
            run_for: Duration::from_secs_f64(run_secs),
        })
    }
}
