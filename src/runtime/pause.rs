//! Pause controller
//!
//! Simulation is suspended when the user paused, the window was
//! deactivated, or any dialog is open. The dialog source is read from the
//! stack on every query so the three flags can never drift apart.

use super::dialog::DialogStack;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseController {
    user_paused: bool,
    auto_paused: bool,
}

impl PauseController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_paused(&mut self, paused: bool) {
        if self.user_paused != paused {
            log::debug!("User pause: {}", paused);
        }
        self.user_paused = paused;
    }

    pub fn toggle_user_paused(&mut self) -> bool {
        self.set_user_paused(!self.user_paused);
        self.user_paused
    }

    pub fn set_auto_paused(&mut self, paused: bool) {
        if self.auto_paused != paused {
            log::debug!("Auto pause: {}", paused);
        }
        self.auto_paused = paused;
    }

    pub fn user_paused(&self) -> bool {
        self.user_paused
    }

    pub fn auto_paused(&self) -> bool {
        self.auto_paused
    }

    pub fn is_suspended(&self, dialogs: &DialogStack) -> bool {
        self.user_paused || self.auto_paused || !dialogs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::dialog::Dialog;

    #[test]
    fn test_auto_pause_round_trip() {
        let dialogs = DialogStack::new();
        let mut pause = PauseController::new();
        assert!(!pause.is_suspended(&dialogs));

        pause.set_auto_paused(true);
        assert!(pause.is_suspended(&dialogs));

        pause.set_auto_paused(false);
        assert!(!pause.is_suspended(&dialogs));
    }

    #[test]
    fn test_user_pause_hidden_by_dialog() {
        let mut dialogs = DialogStack::new();
        let mut pause = PauseController::new();
        dialogs.push(Dialog::About).unwrap();

        pause.toggle_user_paused();
        assert!(pause.is_suspended(&dialogs));
        pause.toggle_user_paused();
        assert!(pause.is_suspended(&dialogs));

        dialogs.pop();
        assert!(!pause.is_suspended(&dialogs));
    }

    #[test]
    fn test_suspension_truth_table() {
        for user in [false, true] {
            for auto in [false, true] {
                for dialog in [false, true] {
                    let mut dialogs = DialogStack::new();
                    if dialog {
                        dialogs.push(Dialog::Instructions).unwrap();
                    }
                    let mut pause = PauseController::new();
                    pause.set_user_paused(user);
                    pause.set_auto_paused(auto);

                    assert_eq!(
                        pause.is_suspended(&dialogs),
                        user || auto || dialog,
                        "user={user} auto={auto} dialog={dialog}"
                    );
                }
            }
        }
    }
}
