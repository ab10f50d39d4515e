//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::MessageLevel;

/// Audio cues for the frontend sound player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// An enemy was bought and entered the arena.
    Spawned { type_id: String },
    /// An enemy died and its reward was paid.
    EnemyDestroyed { type_id: String },
    /// An enemy landed a melee hit on the tower.
    TowerDamaged { damage: f64 },
    /// The tower fired a projectile.
    ProjectileFired,
}

/// Short-lived text for the player. The client fades it out
/// `MESSAGE_FADE_MS` after `emitted_at_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub level: MessageLevel,
    pub text: String,
    pub emitted_at_ms: f64,
}

/// Feedback accumulated during commands and ticks, drained into the next snapshot.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub audio: Vec<AudioEvent>,
    pub messages: Vec<DisplayMessage>,
}

impl EventLog {
    pub fn audio(&mut self, event: AudioEvent) {
        self.audio.push(event);
    }

    pub fn message(&mut self, level: MessageLevel, text: impl Into<String>, now_ms: f64) {
        self.messages.push(DisplayMessage {
            level,
            text: text.into(),
            emitted_at_ms: now_ms,
        });
    }

    /// Take everything recorded so far, leaving the log empty.
    pub fn drain(&mut self) -> (Vec<AudioEvent>, Vec<DisplayMessage>) {
        (
            std::mem::take(&mut self.audio),
            std::mem::take(&mut self.messages),
        )
    }
}
