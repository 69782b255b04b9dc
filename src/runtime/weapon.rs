//! Weapon selection and firing
//!
//! `fire` is the only path from player intent to a gameplay mutation.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::GameSession;
use crate::config::Weapon;
use crate::sim::Simulation;

/// Index into the weapon roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponId(pub u8);

#[derive(Debug, Clone)]
pub struct WeaponController {
    roster: Vec<Weapon>,
}

impl WeaponController {
    pub fn new(roster: Vec<Weapon>) -> Self {
        Self { roster }
    }

    pub fn is_valid(&self, id: WeaponId) -> bool {
        self.roster.iter().any(|w| w.id == id)
    }

    /// First weapon in the roster
    pub fn default_weapon(&self) -> WeaponId {
        self.roster.first().map(|w| w.id).unwrap_or_default()
    }

    /// Select a weapon. Unknown ids (stale zone mappings) leave the
    /// selection unchanged and return false.
    pub fn select(&self, session: &mut GameSession, id: WeaponId) -> bool {
        if !self.is_valid(id) {
            log::debug!("Ignoring unknown weapon id {}", id.0);
            return false;
        }
        if session.active_weapon != id {
            log::debug!("Selected weapon {}", id.0);
        }
        session.active_weapon = id;
        true
    }

    /// Fire the active weapon at `target`. Does nothing while suspended or
    /// after game over; returns whether the simulation was called.
    pub fn fire<S: Simulation + ?Sized>(
        &self,
        session: &GameSession,
        suspended: bool,
        sim: &mut S,
        target: IVec2,
    ) -> bool {
        if suspended || session.is_game_over {
            return false;
        }
        sim.fire(session.active_weapon, target);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::settings::Settings;
    use crate::sim::TickReport;

    #[derive(Default)]
    struct Shots(Vec<(WeaponId, IVec2)>);

    impl Simulation for Shots {
        fn advance(&mut self, _session: &GameSession) -> TickReport {
            TickReport::default()
        }

        fn fire(&mut self, weapon: WeaponId, target: IVec2) {
            self.0.push((weapon, target));
        }

        fn reset(&mut self, _level: u32, _settings: &Settings) {}
    }

    fn controller() -> WeaponController {
        WeaponController::new(Config::default().weapons)
    }

    #[test]
    fn test_select_validates_roster() {
        let weapons = controller();
        let mut session = GameSession::default();

        assert!(weapons.select(&mut session, WeaponId(2)));
        assert_eq!(session.active_weapon, WeaponId(2));

        assert!(!weapons.select(&mut session, WeaponId(99)));
        assert_eq!(session.active_weapon, WeaponId(2));
    }

    #[test]
    fn test_fire_uses_selected_weapon_once() {
        let weapons = controller();
        let mut session = GameSession::default();
        let mut sim = Shots::default();

        weapons.select(&mut session, WeaponId(1));
        assert!(weapons.fire(&session, false, &mut sim, IVec2::new(30, 40)));
        assert_eq!(sim.0, vec![(WeaponId(1), IVec2::new(30, 40))]);
    }

    #[test]
    fn test_fire_blocked_when_suspended_or_over() {
        let weapons = controller();
        let mut session = GameSession::default();
        let mut sim = Shots::default();

        assert!(!weapons.fire(&session, true, &mut sim, IVec2::ONE));
        session.is_game_over = true;
        assert!(!weapons.fire(&session, false, &mut sim, IVec2::ONE));
        assert!(sim.0.is_empty());
    }
}
