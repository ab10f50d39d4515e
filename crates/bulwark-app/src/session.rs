//! Session API: the entry points a frontend calls.
//!
//! Bridges requests to the game loop thread over its channel and serves
//! the latest snapshot from shared state.

use thiserror::Error;

use bulwark_core::commands::PlayerCommand;
use bulwark_core::state::GameStateSnapshot;
use bulwark_sim::engine::SimConfig;

use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop is gone")]
    LoopGone,
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(state: &AppState, config: SimConfig) -> Result<(), SessionError> {
    let mut tx_lock = state
        .command_tx
        .lock()
        .map_err(|_| SessionError::Poisoned)?;
    if tx_lock.is_some() {
        return Err(SessionError::AlreadyRunning);
    }

    let (cmd_tx, handle) = game_loop::spawn_game_loop(config, state.latest_snapshot.clone())?;
    *tx_lock = Some(cmd_tx);
    *state
        .loop_handle
        .lock()
        .map_err(|_| SessionError::Poisoned)? = Some(handle);
    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), SessionError> {
    let tx_lock = state
        .command_tx
        .lock()
        .map_err(|_| SessionError::Poisoned)?;

    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|_| SessionError::LoopGone),
        None => Err(SessionError::NotStarted),
    }
}

/// Get the latest snapshot (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>, SessionError> {
    let lock = state
        .latest_snapshot
        .lock()
        .map_err(|_| SessionError::Poisoned)?;
    Ok(lock.clone())
}

/// Stop the game loop and wait for its thread to finish.
/// The last snapshot stays available afterwards.
pub fn stop_simulation(state: &AppState) -> Result<(), SessionError> {
    let tx = state
        .command_tx
        .lock()
        .map_err(|_| SessionError::Poisoned)?
        .take()
        .ok_or(SessionError::NotStarted)?;
    // A send error only means the loop already exited.
    let _ = tx.send(GameLoopCommand::Shutdown);

    let handle = state
        .loop_handle
        .lock()
        .map_err(|_| SessionError::Poisoned)?
        .take();
    if let Some(handle) = handle {
        handle.join().map_err(|_| SessionError::LoopGone)?;
    }
    Ok(())
}
