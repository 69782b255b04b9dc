//! Gameplay simulation interface
//!
//! Projectiles, terrain and scoring rules live behind [`Simulation`]. The
//! runtime advances it once per unsuspended frame and forwards fire/aim
//! intents from the weapon controller; it never inspects game objects.

use glam::IVec2;

use crate::runtime::{GameSession, WeaponId};
use crate::settings::Settings;

/// Outcome of a single simulation tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Points earned this tick
    pub score_delta: u64,
    /// Player lost
    pub game_over: bool,
    /// Current level cleared
    pub level_complete: bool,
}

/// Gameplay simulation collaborator
pub trait Simulation {
    /// Advance the world by one fixed tick
    fn advance(&mut self, session: &GameSession) -> TickReport;

    /// Fire `weapon` at `target` (compensated view coordinates)
    fn fire(&mut self, weapon: WeaponId, target: IVec2);

    /// Pointer moved over the play field
    fn aim(&mut self, _target: IVec2) {}

    /// Pointer released
    fn release(&mut self, _target: IVec2) {}

    /// Drop any queued shots
    fn empty_fire_buffer(&mut self) {}

    /// Rebuild the world for a fresh game starting at `level`, using the
    /// player's difficulty
    fn reset(&mut self, level: u32, settings: &Settings);
}
