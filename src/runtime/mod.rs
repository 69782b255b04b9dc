//! Runtime core
//!
//! [`Runtime`] owns the game session, dialog stack, pause state and frame
//! scheduler, and routes every host event:
//!
//! ```text
//! raw event -> compensate -> dialog open? -> active dialog handler
//!                                       \-> gameplay (weapons, pause, menu)
//! ```
//!
//! Everything runs on the host's single event thread. Each entry point
//! finishes all of its state changes before returning.

pub mod dialog;
pub mod input;
pub mod pause;
pub mod scheduler;
pub mod session;
pub mod weapon;

use std::time::Instant;

use glam::IVec2;

pub use dialog::{Dialog, DialogAction, DialogEntry, DialogKind, DialogStack};
pub use input::{GameplayAction, InputTranslator, Zone};
pub use pause::PauseController;
pub use scheduler::{FrameScheduler, Timer};
pub use session::GameSession;
pub use weapon::{WeaponController, WeaponId};

use crate::config::Config;
use crate::error::{DialogError, PersistenceError};
use crate::highscores::HighScores;
use crate::persistence::Persistence;
use crate::platform::{Command, InputEvent, View};
use crate::settings::Settings;
use crate::sim::Simulation;

pub struct Runtime<S: Simulation, P: Persistence, V: View> {
    config: Config,
    session: GameSession,
    dialogs: DialogStack,
    pause: PauseController,
    scheduler: FrameScheduler,
    input: InputTranslator,
    weapons: WeaponController,
    settings: Settings,
    high_scores: HighScores,
    simulation: S,
    persistence: P,
    view: V,
    /// Answer of the last Ask Switch Depth dialog, until taken
    switch_depth_answer: Option<bool>,
    frames_simulated: u64,
    quit_requested: bool,
}

impl<S: Simulation, P: Persistence, V: View> Runtime<S, P, V> {
    /// Build the runtime and start a fresh game. Preferences and high
    /// scores that fail to load fall back to defaults.
    pub fn new(config: Config, mut simulation: S, mut persistence: P, view: V) -> Self {
        let settings = persistence.load_preferences().unwrap_or_else(|e| {
            log::warn!("Failed to load preferences, using defaults: {}", e);
            Settings::default()
        });
        let high_scores = persistence.load_high_scores().unwrap_or_else(|e| {
            log::warn!("Failed to load high scores, starting fresh: {}", e);
            HighScores::new()
        });

        let weapons = WeaponController::new(config.weapons.clone());
        let level = settings.start_level(config.max_level);
        let session = GameSession::new(level, weapons.default_weapon());
        simulation.reset(level, &settings);

        Self {
            scheduler: FrameScheduler::new(config.tick_period(), config.max_catch_up_ticks),
            input: InputTranslator::from_config(&config),
            config,
            session,
            dialogs: DialogStack::new(),
            pause: PauseController::new(),
            weapons,
            settings,
            high_scores,
            simulation,
            persistence,
            view,
            switch_depth_answer: None,
            frames_simulated: 0,
            quit_requested: false,
        }
    }

    // === Accessors ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn dialogs(&self) -> &DialogStack {
        &self.dialogs
    }

    pub fn pause(&self) -> &PauseController {
        &self.pause
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn input(&self) -> &InputTranslator {
        &self.input
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn frames_simulated(&self) -> u64 {
        self.frames_simulated
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Suspended by user pause, auto-pause, or any open dialog
    pub fn is_suspended(&self) -> bool {
        self.pause.is_suspended(&self.dialogs)
    }

    // === Frame scheduling ===

    /// Arm the frame timer
    pub fn start(&mut self, now: Instant) {
        self.scheduler.start(now);
    }

    /// Disarm the frame timer. Must be called before the window is torn down.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
    }

    /// Resynchronise the timer phase
    pub fn restart_timer(&mut self, now: Instant) {
        self.scheduler.restart(now);
    }

    /// Run every tick due at `now`; returns how many fired
    pub fn on_timer(&mut self, now: Instant) -> u32 {
        let due = self.scheduler.poll(now);
        for _ in 0..due {
            self.do_frame();
        }
        due
    }

    /// Host timer callback for a specific timer generation. Firings from a
    /// replaced or stopped timer are dropped.
    pub fn timer_fired(&mut self, generation: u64) -> bool {
        if !self.scheduler.accepts(generation) {
            log::warn!("Dropping stale timer firing (generation {})", generation);
            return false;
        }
        self.do_frame();
        true
    }

    /// One tick. Suspended ticks and ticks after game over change nothing.
    fn do_frame(&mut self) {
        if self.is_suspended() || self.session.is_game_over {
            return;
        }

        let report = self.simulation.advance(&self.session);
        self.frames_simulated += 1;
        let ended = self.session.apply(&report, self.config.max_level);
        self.view.request_redraw();

        if ended {
            log::info!(
                "Game over: score {} on level {}",
                self.session.score,
                self.session.level
            );
            let _ = self.push_dialog(Dialog::GameOver);
        }
    }

    // === Pause ===

    pub fn set_user_paused(&mut self, paused: bool) {
        let was = self.is_suspended();
        self.pause.set_user_paused(paused);
        self.after_change(was);
    }

    pub fn toggle_pause(&mut self) {
        let was = self.is_suspended();
        let paused = self.pause.toggle_user_paused();
        self.after_change(was);
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
    }

    pub fn set_auto_paused(&mut self, paused: bool) {
        let was = self.is_suspended();
        self.pause.set_auto_paused(paused);
        self.after_change(was);
    }

    /// Window lost focus: auto-pause, and offer the Auto-Pause dialog
    /// when a game is running and the preference asks for it.
    pub fn window_deactivated(&mut self) {
        if self.pause.auto_paused() {
            return;
        }
        self.set_auto_paused(true);
        log::info!("Auto-paused (window deactivated)");

        if self.settings.auto_pause_dialog && !self.session.is_game_over {
            let _ = self.push_dialog(Dialog::AutoPause);
        }
    }

    /// Window regained focus: resync the timer and drop the auto-pause,
    /// unless the Auto-Pause dialog is still waiting for its OK.
    pub fn window_activated(&mut self) {
        self.resync_timer();
        if self.dialogs.contains(DialogKind::AutoPause) {
            log::debug!("Auto-pause held until the dialog is dismissed");
            return;
        }
        self.set_auto_paused(false);
    }

    fn resync_timer(&mut self) {
        if self.scheduler.is_running() {
            self.scheduler.restart(Instant::now());
        }
    }

    /// Every visible change requests a redraw; entering suspension also
    /// drops queued shots so they cannot fire after the pause ends.
    fn after_change(&mut self, was_suspended: bool) {
        if !was_suspended && self.is_suspended() {
            self.simulation.empty_fire_buffer();
        }
        self.view.request_redraw();
    }

    // === Game lifecycle ===

    /// Start a new game at the preferred start level
    pub fn new_game(&mut self) {
        let level = self.settings.start_level(self.config.max_level);
        self.start_game(level);
    }

    fn start_game(&mut self, level: u32) {
        self.session.reset(level);
        self.simulation.reset(level, &self.settings);
        self.simulation.empty_fire_buffer();
        self.pause.set_user_paused(false);
        log::info!(
            "New game at level {} ({})",
            level,
            self.settings.difficulty.as_str()
        );
        self.view.request_redraw();
    }

    /// End the current game. Unless `immediate`, show the Game Over dialog.
    pub fn end_game(&mut self, immediate: bool) {
        if self.session.is_game_over {
            return;
        }
        self.session.is_game_over = true;
        self.simulation.empty_fire_buffer();
        log::info!("Game ended with score {}", self.session.score);

        if immediate {
            self.view.request_redraw();
        } else {
            let _ = self.push_dialog(Dialog::GameOver);
        }
    }

    pub fn quit(&mut self) {
        log::info!("Quit requested");
        self.quit_requested = true;
        self.scheduler.stop();
    }

    // === Weapons ===

    pub fn select_weapon(&mut self, id: WeaponId) -> bool {
        let selected = self.weapons.select(&mut self.session, id);
        if selected {
            self.view.request_redraw();
        }
        selected
    }

    /// Fire the active weapon at a compensated point
    pub fn fire(&mut self, target: IVec2) -> bool {
        let suspended = self.is_suspended();
        self.weapons
            .fire(&self.session, suspended, &mut self.simulation, target)
    }

    // === Input routing ===

    /// Route one raw host event
    pub fn handle_event(&mut self, event: InputEvent) {
        let event = self.input.compensate(event);

        if let InputEvent::MenuCommand { id } = event {
            if Command::from_id(id) == Some(Command::Quit) {
                self.quit();
                return;
            }
        }

        if let Some(entry) = self.dialogs.top_mut() {
            let action = entry.dialog.handle_input(&event);
            self.apply_dialog_action(action);
            return;
        }

        match self.input.gameplay_action(&event) {
            Some(action) => self.apply_gameplay_action(action),
            None => log::trace!("Ignoring {:?}", event),
        }
    }

    fn apply_gameplay_action(&mut self, action: GameplayAction) {
        match action {
            GameplayAction::SelectWeapon(id) => {
                self.select_weapon(id);
            }
            GameplayAction::Fire(point) => {
                self.fire(point);
            }
            GameplayAction::Aim(point) => {
                if !self.is_suspended() && !self.session.is_game_over {
                    self.simulation.aim(point);
                }
            }
            GameplayAction::Release(point) => {
                if !self.is_suspended() && !self.session.is_game_over {
                    self.simulation.release(point);
                }
            }
            GameplayAction::TogglePause => self.toggle_pause(),
            GameplayAction::Command(command) => self.handle_command(command),
        }
    }

    fn handle_command(&mut self, command: Command) {
        let dialog = match command {
            Command::About => Dialog::About,
            Command::Instructions => Dialog::Instructions,
            Command::Preferences => Dialog::Preferences {
                draft: self.settings.clone(),
            },
            Command::HighScores => Dialog::HighScores,
            Command::LevelSelect => Dialog::level_select(self.session.level),
            Command::NewGame => return self.new_game(),
            Command::EndGame => return self.end_game(false),
            Command::Pause => return self.toggle_pause(),
            Command::Quit => return self.quit(),
            Command::DialogOk | Command::DialogCancel | Command::ResetScores => return,
        };
        let _ = self.push_dialog(dialog);
    }

    fn apply_dialog_action(&mut self, action: DialogAction) {
        let result = match action {
            DialogAction::None => Ok(()),
            DialogAction::Edited => {
                self.view.request_redraw();
                Ok(())
            }
            DialogAction::Ok => self.dialog_ok(),
            DialogAction::Cancel => self.dialog_cancel(),
            DialogAction::Reset => self.high_scores_reset(),
            DialogAction::NewGame => self.game_over_new_game(),
        };
        if let Err(e) = result {
            log::debug!("Dialog action {:?} rejected: {}", action, e);
        }
    }

    // === Dialogs ===

    /// Open a dialog. A kind already on the stack is rejected.
    pub fn push_dialog(&mut self, dialog: Dialog) -> Result<(), DialogError> {
        let was = self.is_suspended();
        self.dialogs.push(dialog)?;
        self.after_change(was);
        Ok(())
    }

    /// Ask whether to switch screen depth (generic OK/Cancel confirmation)
    pub fn ask_switch_depth(&mut self) -> Result<(), DialogError> {
        if !self.settings.ask_switch_depth {
            self.switch_depth_answer = Some(true);
            return Ok(());
        }
        self.push_dialog(Dialog::AskSwitchDepth)
    }

    /// Answer of the last Ask Switch Depth dialog
    pub fn take_switch_depth_answer(&mut self) -> Option<bool> {
        self.switch_depth_answer.take()
    }

    /// Draft settings of an open Preferences dialog
    pub fn preferences_draft_mut(&mut self) -> Option<&mut Settings> {
        match self.dialogs.top_mut() {
            Some(DialogEntry {
                dialog: Dialog::Preferences { draft },
                ..
            }) => Some(draft),
            _ => None,
        }
    }

    fn close_top(&mut self) -> Option<DialogEntry> {
        let entry = self.dialogs.pop();
        self.view.request_redraw();
        entry
    }

    fn expect_top(&self, expected: DialogKind) -> Result<(), DialogError> {
        match self.dialogs.top_kind() {
            None => Err(DialogError::NoActiveDialog),
            Some(active) if active != expected => Err(DialogError::WrongDialog { expected, active }),
            Some(_) => Ok(()),
        }
    }

    /// Record a persistence failure on the active dialog, which stays open
    fn persistence_failed(&mut self, err: PersistenceError) -> DialogError {
        log::warn!("Persistence failed: {}", err);
        if let Some(entry) = self.dialogs.top_mut() {
            entry.error = Some(err.to_string());
        }
        self.view.request_redraw();
        DialogError::from(err)
    }

    /// OK / default button of the active dialog
    pub fn dialog_ok(&mut self) -> Result<(), DialogError> {
        let dialog = self
            .dialogs
            .top()
            .map(|e| e.dialog.clone())
            .ok_or(DialogError::NoActiveDialog)?;

        match dialog {
            Dialog::Preferences { .. } => self.preferences_ok(),
            Dialog::LevelSelect { level, .. } => self.level_select_ok(level),
            Dialog::HighScoreEntry { name, .. } => self.high_score_entry_ok(&name),
            Dialog::GameOver => self.game_over_ok(),
            Dialog::AutoPause => self.auto_pause_resume(),
            Dialog::AskSwitchDepth => {
                self.switch_depth_answer = Some(true);
                self.close_top();
                Ok(())
            }
            Dialog::HighScores | Dialog::About | Dialog::Instructions => {
                self.close_top();
                Ok(())
            }
        }
    }

    /// Cancel the active dialog, discarding its payload. Auto-Pause only
    /// closes through Resume; Game Over cancel behaves like OK.
    pub fn dialog_cancel(&mut self) -> Result<(), DialogError> {
        match self.dialogs.top_kind().ok_or(DialogError::NoActiveDialog)? {
            DialogKind::AutoPause => {
                log::debug!("Auto-pause dialog only closes on resume");
                Ok(())
            }
            DialogKind::GameOver => self.game_over_ok(),
            DialogKind::AskSwitchDepth => {
                self.switch_depth_answer = Some(false);
                self.close_top();
                Ok(())
            }
            _ => {
                self.close_top();
                Ok(())
            }
        }
    }

    /// Save and apply the edited preferences
    pub fn preferences_ok(&mut self) -> Result<(), DialogError> {
        let draft = match self.dialogs.top() {
            Some(DialogEntry {
                dialog: Dialog::Preferences { draft },
                ..
            }) => draft.clone(),
            _ => {
                self.expect_top(DialogKind::Preferences)?;
                return Err(DialogError::NoActiveDialog);
            }
        };

        if let Err(e) = self.persistence.save_preferences(&draft) {
            return Err(self.persistence_failed(e));
        }
        self.settings = draft;
        self.close_top();
        Ok(())
    }

    /// Clear the persisted and in-memory high score table; the dialog stays open
    pub fn high_scores_reset(&mut self) -> Result<(), DialogError> {
        self.expect_top(DialogKind::HighScores)?;
        if let Err(e) = self.persistence.clear_high_scores() {
            return Err(self.persistence_failed(e));
        }
        self.high_scores.clear();
        if let Some(entry) = self.dialogs.top_mut() {
            entry.error = None;
        }
        log::info!("High scores reset");
        self.view.request_redraw();
        Ok(())
    }

    /// Jump to `level`. Out-of-range levels are rejected and the dialog stays open.
    pub fn level_select_ok(&mut self, level: u32) -> Result<(), DialogError> {
        self.expect_top(DialogKind::LevelSelect)?;
        let max = self.config.max_level;
        if level < 1 || level > max {
            log::debug!("Rejected level {} (1..={})", level, max);
            return Err(DialogError::LevelOutOfRange { level, max });
        }
        self.close_top();
        self.start_game(level);
        Ok(())
    }

    /// Record the pending score under `name` and save the table
    pub fn high_score_entry_ok(&mut self, name: &str) -> Result<(), DialogError> {
        let (score, level) = match self.dialogs.top() {
            Some(DialogEntry {
                dialog: Dialog::HighScoreEntry { score, level, .. },
                ..
            }) => (*score, *level),
            _ => {
                self.expect_top(DialogKind::HighScoreEntry)?;
                return Err(DialogError::NoActiveDialog);
            }
        };

        let mut table = self.high_scores.clone();
        let rank = table.add_score(name, score, level);
        if let Err(e) = self.persistence.save_high_scores(&table) {
            return Err(self.persistence_failed(e));
        }
        self.high_scores = table;
        if let Some(rank) = rank {
            log::info!("New high score #{}: {}", rank, score);
        }
        self.close_top();
        Ok(())
    }

    /// Dismiss Game Over; a qualifying score moves on to name entry
    pub fn game_over_ok(&mut self) -> Result<(), DialogError> {
        self.expect_top(DialogKind::GameOver)?;
        self.close_top();

        let score = self.session.score;
        if let Some(rank) = self.high_scores.potential_rank(score) {
            log::info!("Score {} would place #{}", score, rank);
            let _ = self.push_dialog(Dialog::HighScoreEntry {
                name: String::new(),
                score,
                level: self.session.level,
            });
        }
        Ok(())
    }

    /// Game Over "New Game": close and start over
    pub fn game_over_new_game(&mut self) -> Result<(), DialogError> {
        self.expect_top(DialogKind::GameOver)?;
        self.close_top();
        self.new_game();
        Ok(())
    }

    /// Auto-Pause "Resume": lift the auto-pause and resync the timer
    pub fn auto_pause_resume(&mut self) -> Result<(), DialogError> {
        self.expect_top(DialogKind::AutoPause)?;
        self.close_top();
        self.set_auto_paused(false);
        self.resync_timer();
        Ok(())
    }
}
