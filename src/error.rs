//! Error types
//!
//! Only collaborator failures and rejected dialog actions produce errors.
//! Stray input (unknown keys, clicks outside any zone) is ignored instead.

use thiserror::Error;

use crate::runtime::DialogKind;

/// Preferences / high score storage failure
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A dialog action that could not be applied; the dialog stays open
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("Dialog {0:?} is already open")]
    Duplicate(DialogKind),

    #[error("No dialog is open")]
    NoActiveDialog,

    #[error("Expected dialog {expected:?}, but {active:?} is active")]
    WrongDialog {
        expected: DialogKind,
        active: DialogKind,
    },

    #[error("Level {level} out of range (1..={max})")]
    LevelOutOfRange { level: u32, max: u32 },

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Invalid runtime configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
