//! Preferences and high score persistence
//!
//! The runtime only talks to the [`Persistence`] trait. It is invoked from
//! the Preferences OK, High Score Entry OK and High Scores Reset paths.
//! Failures keep the dialog open with an error indicator.
//!
//! Stores:
//! - [`JsonStore`]: serde_json files in a directory
//! - [`MemoryStore`]: in-memory, with failure injection for tests

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::highscores::HighScores;
use crate::settings::Settings;

/// Storage collaborator for preferences and the high score table
pub trait Persistence {
    fn load_preferences(&mut self) -> Result<Settings, PersistenceError>;
    fn save_preferences(&mut self, settings: &Settings) -> Result<(), PersistenceError>;
    fn load_high_scores(&mut self) -> Result<HighScores, PersistenceError>;
    fn save_high_scores(&mut self, scores: &HighScores) -> Result<(), PersistenceError>;

    /// Erase the persisted high score table
    fn clear_high_scores(&mut self) -> Result<(), PersistenceError> {
        self.save_high_scores(&HighScores::new())
    }
}

/// JSON files in a directory
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    const PREFERENCES_FILE: &'static str = "preferences.json";
    const HIGH_SCORES_FILE: &'static str = "highscores.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: serde::de::DeserializeOwned + Default>(
        &self,
        file: &str,
    ) -> Result<T, PersistenceError> {
        let path = self.dir.join(file);
        if !path.exists() {
            log::info!("{} not found, using defaults", path.display());
            return Ok(T::default());
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write via a temp file so a failed write never truncates the old file
    fn write<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl Persistence for JsonStore {
    fn load_preferences(&mut self) -> Result<Settings, PersistenceError> {
        let settings = self.read(Self::PREFERENCES_FILE)?;
        log::info!("Loaded preferences");
        Ok(settings)
    }

    fn save_preferences(&mut self, settings: &Settings) -> Result<(), PersistenceError> {
        self.write(Self::PREFERENCES_FILE, settings)?;
        log::info!("Preferences saved");
        Ok(())
    }

    fn load_high_scores(&mut self) -> Result<HighScores, PersistenceError> {
        let scores: HighScores = self.read(Self::HIGH_SCORES_FILE)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    fn save_high_scores(&mut self, scores: &HighScores) -> Result<(), PersistenceError> {
        self.write(Self::HIGH_SCORES_FILE, scores)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

/// In-memory store; `fail_writes` makes every save fail
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub settings: Option<Settings>,
    pub high_scores: Option<HighScores>,
    pub fail_writes: bool,
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_writable(&mut self) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Unavailable("store is read-only".into()));
        }
        self.writes += 1;
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn load_preferences(&mut self) -> Result<Settings, PersistenceError> {
        Ok(self.settings.clone().unwrap_or_default())
    }

    fn save_preferences(&mut self, settings: &Settings) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn load_high_scores(&mut self) -> Result<HighScores, PersistenceError> {
        Ok(self.high_scores.clone().unwrap_or_default())
    }

    fn save_high_scores(&mut self, scores: &HighScores) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.high_scores = Some(scores.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_json_store_missing_files_default() {
        let temp = tempdir().unwrap();
        let mut store = JsonStore::new(temp.path().join("missing"));
        assert_eq!(store.load_preferences().unwrap(), Settings::default());
        assert!(store.load_high_scores().unwrap().is_empty());
    }

    #[test]
    fn test_json_store_persists() {
        let temp = tempdir().unwrap();
        let mut store = JsonStore::new(temp.path());

        let mut settings = Settings::default();
        settings.sound = false;
        store.save_preferences(&settings).unwrap();

        let mut scores = HighScores::new();
        scores.add_score("Ann", 500, 4);
        store.save_high_scores(&scores).unwrap();

        let mut reopened = JsonStore::new(temp.path());
        assert_eq!(reopened.load_preferences().unwrap(), settings);
        assert_eq!(reopened.load_high_scores().unwrap(), scores);

        reopened.clear_high_scores().unwrap();
        assert!(reopened.load_high_scores().unwrap().is_empty());
    }

    #[test]
    fn test_json_store_corrupt_file_is_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("highscores.json"), "not json").unwrap();

        let mut store = JsonStore::new(temp.path());
        assert!(matches!(store.load_high_scores(), Err(PersistenceError::Json(_))));
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let mut store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        assert!(store.save_preferences(&Settings::default()).is_err());
        assert!(store.clear_high_scores().is_err());
        assert_eq!(store.writes, 0);

        store.fail_writes = false;
        assert!(store.save_preferences(&Settings::default()).is_ok());
        assert_eq!(store.writes, 1);
    }
}
