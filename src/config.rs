//! Runtime configuration
//!
//! Defaults come from [`crate::consts`]; a JSON file may override any field.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::runtime::WeaponId;

/// Axis-aligned rectangle in view coordinates (`max` is exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: IVec2,
    pub max: IVec2,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            min: IVec2::new(x, y),
            max: IVec2::new(x + width, y + height),
        }
    }

    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.min.x && point.y >= self.min.y && point.x < self.max.x && point.y < self.max.y
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }
}

/// A clickable weapon selector in the interface strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponZone {
    pub rect: Rect,
    pub weapon: WeaponId,
}

/// Interactive regions of the main view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Area where clicks fire the selected weapon
    pub play_field: Rect,
    /// Weapon selection buttons
    pub weapon_zones: Vec<WeaponZone>,
}

impl Default for Layout {
    fn default() -> Self {
        let strip_top = VIEW_HEIGHT - INTERFACE_HEIGHT;
        let zone_width = VIEW_WIDTH / WEAPON_COUNT as i32;
        let weapon_zones = (0..WEAPON_COUNT)
            .map(|i| WeaponZone {
                rect: Rect::new(i as i32 * zone_width, strip_top, zone_width, INTERFACE_HEIGHT),
                weapon: WeaponId(i),
            })
            .collect();

        Self {
            play_field: Rect::new(0, 0, VIEW_WIDTH, strip_top),
            weapon_zones,
        }
    }
}

/// A weapon available to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: WeaponId,
    pub name: String,
}

fn default_roster() -> Vec<Weapon> {
    const NAMES: [&str; WEAPON_COUNT as usize] = ["Cannon", "Machine Gun", "Flak", "Missile"];
    NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Weapon {
            id: WeaponId(i as u8),
            name: (*name).to_string(),
        })
        .collect()
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Game timer frequency
    pub ticks_per_second: u32,
    /// Cap on ticks delivered per scheduler poll
    pub max_catch_up_ticks: u32,
    /// Highest level accepted by level select
    pub max_level: u32,
    /// Inset of the game content inside the window (border/chrome)
    pub viewport_offset: IVec2,
    /// Weapon roster, indexed by digit keys in order
    pub weapons: Vec<Weapon>,
    /// Interactive regions of the main view
    pub layout: Layout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticks_per_second: TICKS_PER_SECOND,
            max_catch_up_ticks: MAX_CATCH_UP_TICKS,
            max_level: MAX_LEVEL,
            viewport_offset: IVec2::ZERO,
            weapons: default_roster(),
            layout: Layout::default(),
        }
    }
}

impl Config {
    /// Fixed period of the frame timer
    pub fn tick_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.ticks_per_second.max(1) as u64)
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid("ticks_per_second must be positive".into()));
        }
        if self.max_catch_up_ticks == 0 {
            return Err(ConfigError::Invalid("max_catch_up_ticks must be positive".into()));
        }
        if self.max_level == 0 {
            return Err(ConfigError::Invalid("max_level must be at least 1".into()));
        }
        if self.weapons.is_empty() {
            return Err(ConfigError::Invalid("weapon roster is empty".into()));
        }

        let mut seen = HashSet::new();
        for weapon in &self.weapons {
            if !seen.insert(weapon.id) {
                return Err(ConfigError::Invalid(format!("duplicate weapon id {}", weapon.id.0)));
            }
        }
        if self.layout.play_field.is_empty() {
            return Err(ConfigError::Invalid("play field is empty".into()));
        }
        Ok(())
    }
}
