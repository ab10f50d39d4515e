//! Game loop thread: drives the simulation engine at 60 Hz and publishes snapshots.
//!
//! The engine is created inside the thread so the thread owns it outright.
//! Commands arrive via an `mpsc` channel; the latest snapshot is stored in
//! shared state for polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use bulwark_core::state::GameStateSnapshot;
use bulwark_sim::engine::{SimConfig, SimulationEngine};

use crate::state::GameLoopCommand;

/// Loop frequency in Hz.
pub const TICK_RATE: u32 = 60;

/// Nominal spacing between ticks.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawn the game loop on a named thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("bulwark-game-loop".into())
        .spawn(move || {
            let engine = SimulationEngine::new(config);
            run_game_loop(engine, cmd_rx, &latest_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown or channel disconnect.
///
/// Timestamps handed to the engine are milliseconds since the loop started.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let started = Instant::now();
    let mut next_tick_time = started;
    let mut last_phase = engine.phase();
    info!(seed = engine.config().seed, "game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    debug!(?cmd, "command received");
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = engine.time().tick, "game loop shutting down");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (the engine handles pause and game over)
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        let snapshot = engine.tick(now_ms);

        if snapshot.phase != last_phase {
            info!(from = ?last_phase, to = ?snapshot.phase, "phase changed");
            last_phase = snapshot.phase;
        }

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; skip the backlog and keep ticking from now.
            next_tick_time = now;
        }
    }
}
