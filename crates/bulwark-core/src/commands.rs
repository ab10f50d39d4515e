//! Player commands sent from the input layer to the simulation.
//!
//! Commands are either applied directly through the engine's methods or
//! queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::UpgradeMultiplier;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Leave the main menu and start playing.
    Start,
    /// Pause while playing, resume while paused.
    TogglePause,
    /// Throw away the current run and return to the main menu.
    Reset,
    /// Buy an enemy of the given catalog type.
    Spawn { type_id: String },
    /// Buy a tower upgrade. Held-key repeats arrive as separate commands.
    Upgrade {
        stat_id: String,
        #[serde(default)]
        multiplier: UpgradeMultiplier,
    },
}
