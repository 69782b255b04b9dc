//! MAFF - runtime core for a single-player arcade shooter
//!
//! Core modules:
//! - `runtime`: Frame scheduler, pause controller, dialog stack, input routing
//! - `sim`: Gameplay simulation collaborator interface
//! - `platform`: Window/view collaborator interface and raw input events
//! - `persistence`: Preferences and high-score storage
//! - `config`: Data-driven runtime configuration

pub mod config;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod runtime;
pub mod settings;
pub mod sim;

pub use config::{Config, Layout, Rect};
pub use error::{ConfigError, DialogError, PersistenceError};
pub use highscores::HighScores;
pub use runtime::Runtime;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed frame rate of the game timer (30 Hz)
    pub const TICKS_PER_SECOND: u32 = 30;
    /// Fixed frame period derived from `TICKS_PER_SECOND`
    pub const TICK_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / TICKS_PER_SECOND as u64);
    /// Maximum ticks delivered by a single scheduler poll (prevents spiral of death)
    pub const MAX_CATCH_UP_TICKS: u32 = 8;

    /// Highest selectable level
    pub const MAX_LEVEL: u32 = 30;
    /// Number of weapons in the default roster
    pub const WEAPON_COUNT: u8 = 4;

    /// Main window content size
    pub const VIEW_WIDTH: i32 = 640;
    pub const VIEW_HEIGHT: i32 = 480;
    /// Height of the weapon strip along the bottom of the view
    pub const INTERFACE_HEIGHT: i32 = 64;

    /// Longest player name accepted by the high score entry dialog
    pub const MAX_NAME_LEN: usize = 15;
}
