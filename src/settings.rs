//! Game settings and preferences
//!
//! Edited through the Preferences dialog and saved by the persistence
//! collaborator only when that dialog is confirmed.

use serde::{Deserialize, Serialize};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Score multiplier applied by the simulation
    pub fn score_multiplier(&self) -> u64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Audio ===
    /// Sound effects on/off
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,

    // === Behaviour ===
    /// Show the auto-pause dialog when the window loses focus
    pub auto_pause_dialog: bool,
    /// Level a new game starts on
    pub start_level: u32,
    /// Ask before switching screen depth
    pub ask_switch_depth: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            sound: true,
            volume: 0.8,
            auto_pause_dialog: true,
            start_level: 1,
            ask_switch_depth: true,
        }
    }
}

impl Settings {
    /// Start level clamped into the configured range
    pub fn start_level(&self, max_level: u32) -> u32 {
        self.start_level.clamp(1, max_level.max(1))
    }
}
