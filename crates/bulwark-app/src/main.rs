use std::process::ExitCode;
use std::time::{Duration, Instant};

use bulwark_app::config::AppConfig;
use bulwark_app::session;
use bulwark_app::state::AppState;
use bulwark_core::commands::PlayerCommand;
use bulwark_core::enums::{GamePhase, UpgradeMultiplier};

/// How often the driver reports progress while the session runs.
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Opening moves of the scripted session: start, buy a mixed wave, shore up the tower.
fn opening() -> Vec<PlayerCommand> {
    let spawn = |type_id: &str| PlayerCommand::Spawn {
        type_id: type_id.to_string(),
    };
    let upgrade = |stat_id: &str, multiplier| PlayerCommand::Upgrade {
        stat_id: stat_id.to_string(),
        multiplier,
    };
    vec![
        PlayerCommand::Start,
        upgrade("damage", UpgradeMultiplier::X2),
        upgrade("projectile speed", UpgradeMultiplier::X10),
        upgrade("projectile radius", UpgradeMultiplier::X2),
        upgrade("fire rate", UpgradeMultiplier::X2),
        upgrade("range", UpgradeMultiplier::X10),
        spawn("BasicEnemy"),
        spawn("BasicEnemy"),
        spawn("HeavyEnemy"),
        spawn("PowerfulEnemy"),
        spawn("FastEnemy"),
    ]
}

fn run(config: AppConfig) -> Result<(), session::SessionError> {
    let state = AppState::new();
    session::start_simulation(&state, config.sim)?;
    for command in opening() {
        session::send_command(&state, command)?;
    }

    let started = Instant::now();
    while started.elapsed() < config.run_for {
        std::thread::sleep(REPORT_INTERVAL.min(config.run_for.saturating_sub(started.elapsed())));
        let Some(snap) = session::get_snapshot(&state)? else {
            continue;
        };
        tracing::info!(
            phase = ?snap.phase,
            points = snap.points,
            kills = snap.kills,
            tower_hp = snap.tower.hp,
            enemies = snap.enemies.len(),
            projectiles = snap.projectiles.len(),
            "status"
        );
        if snap.phase == GamePhase::Stopped {
            break;
        }
    }

    session::stop_simulation(&state)?;
    if let Some(snap) = session::get_snapshot(&state)? {
        tracing::info!(
            phase = ?snap.phase,
            ticks = snap.time.tick,
            points = snap.points,
            kills = snap.kills,
            tower_hp = snap.tower.hp,
            "session finished"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        seed = config.sim.seed,
        config = ?config.config_path,
        run_secs = config.run_for.as_secs_f64(),
        "starting bulwark"
    );

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "session failed");
            ExitCode::FAILURE
        }
    }
}
