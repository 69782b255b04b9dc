//! Game session: score, level and weapon context for the current game

use serde::{Deserialize, Serialize};

use super::WeaponId;
use crate::sim::TickReport;

/// State owned by the runtime for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub active_weapon: WeaponId,
    pub is_game_over: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(1, WeaponId::default())
    }
}

impl GameSession {
    pub fn new(level: u32, weapon: WeaponId) -> Self {
        Self {
            score: 0,
            level: level.max(1),
            active_weapon: weapon,
            is_game_over: false,
        }
    }

    /// Start over at `level`, keeping the weapon selection
    pub fn reset(&mut self, level: u32) {
        *self = Self::new(level, self.active_weapon);
    }

    /// Fold a tick report into the session.
    ///
    /// Returns true when this report ended the game.
    pub fn apply(&mut self, report: &TickReport, max_level: u32) -> bool {
        if self.is_game_over {
            return false;
        }

        self.score = self.score.saturating_add(report.score_delta);

        if report.level_complete && self.level < max_level {
            self.level += 1;
            log::info!("Advanced to level {}", self.level);
        }

        if report.game_over {
            self.is_game_over = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_level() {
        let session = GameSession::new(0, WeaponId(2));
        assert_eq!(session.level, 1);
        assert_eq!(session.active_weapon, WeaponId(2));
    }

    #[test]
    fn test_apply_accumulates_and_caps_level() {
        let mut session = GameSession::new(2, WeaponId(0));
        let report = TickReport {
            score_delta: 50,
            level_complete: true,
            ..Default::default()
        };
        assert!(!session.apply(&report, 3));
        assert!(!session.apply(&report, 3));
        assert_eq!(session.score, 100);
        assert_eq!(session.level, 3);
    }

    #[test]
    fn test_game_over_freezes_score() {
        let mut session = GameSession::default();
        let over = TickReport {
            score_delta: 10,
            game_over: true,
            ..Default::default()
        };
        assert!(session.apply(&over, 30));
        assert!(session.is_game_over);
        assert!(!session.apply(&over, 30));
        assert_eq!(session.score, 10);
    }

    #[test]
    fn test_reset_keeps_weapon() {
        let mut session = GameSession::new(4, WeaponId(3));
        session.score = 900;
        session.is_game_over = true;
        session.reset(1);
        assert_eq!(session, GameSession::new(1, WeaponId(3)));
    }
}
