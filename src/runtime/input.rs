//! Input translator
//!
//! Turns raw window events into viewport-compensated events and, for
//! gameplay, into semantic actions. Compensation happens once, before the
//! runtime decides whether a dialog or gameplay gets the event.

use glam::IVec2;

use super::WeaponId;
use crate::config::{Config, Layout};
use crate::platform::{Command, InputEvent, Key};

/// Interactive region under a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Weapon(WeaponId),
    PlayField,
}

/// Gameplay intent produced from an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameplayAction {
    SelectWeapon(WeaponId),
    Fire(IVec2),
    Aim(IVec2),
    Release(IVec2),
    TogglePause,
    Command(Command),
}

#[derive(Debug, Clone)]
pub struct InputTranslator {
    /// Window chrome/border inset subtracted from raw coordinates
    offset: IVec2,
    layout: Layout,
    /// Weapons in digit-key order ('1' selects the first)
    hotkeys: Vec<WeaponId>,
}

impl InputTranslator {
    pub fn new(offset: IVec2, layout: Layout, hotkeys: Vec<WeaponId>) -> Self {
        Self {
            offset,
            layout,
            hotkeys,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.viewport_offset,
            config.layout.clone(),
            config.weapons.iter().map(|w| w.id).collect(),
        )
    }

    /// Map a raw window point into game view coordinates
    pub fn translate_pointer(&self, raw: IVec2) -> IVec2 {
        raw - self.offset
    }

    /// Return `event` with pointer coordinates compensated; other events pass through
    pub fn compensate(&self, event: InputEvent) -> InputEvent {
        let fix = |x: i32, y: i32| self.translate_pointer(IVec2::new(x, y));
        match event {
            InputEvent::PointerDown { x, y } => {
                let p = fix(x, y);
                InputEvent::PointerDown { x: p.x, y: p.y }
            }
            InputEvent::PointerUp { x, y } => {
                let p = fix(x, y);
                InputEvent::PointerUp { x: p.x, y: p.y }
            }
            InputEvent::PointerMoved { x, y } => {
                let p = fix(x, y);
                InputEvent::PointerMoved { x: p.x, y: p.y }
            }
            other => other,
        }
    }

    /// Zone under a compensated point. Weapon buttons win over the play field.
    pub fn interface_option(&self, point: IVec2) -> Option<Zone> {
        if let Some(zone) = self.layout.weapon_zones.iter().find(|z| z.rect.contains(point)) {
            return Some(Zone::Weapon(zone.weapon));
        }
        if self.layout.play_field.contains(point) {
            return Some(Zone::PlayField);
        }
        None
    }

    /// Gameplay meaning of a compensated event; `None` means ignore it
    pub fn gameplay_action(&self, event: &InputEvent) -> Option<GameplayAction> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                let point = IVec2::new(x, y);
                match self.interface_option(point)? {
                    Zone::Weapon(id) => Some(GameplayAction::SelectWeapon(id)),
                    Zone::PlayField => Some(GameplayAction::Fire(point)),
                }
            }
            InputEvent::PointerMoved { x, y } => {
                let point = IVec2::new(x, y);
                match self.interface_option(point)? {
                    Zone::PlayField => Some(GameplayAction::Aim(point)),
                    Zone::Weapon(_) => None,
                }
            }
            InputEvent::PointerUp { x, y } => Some(GameplayAction::Release(IVec2::new(x, y))),
            InputEvent::KeyDown { code } => self.key_action(code),
            InputEvent::MenuCommand { id } => match Command::from_id(id)? {
                Command::Pause => Some(GameplayAction::TogglePause),
                // Dialog buttons mean nothing without a dialog
                Command::DialogOk | Command::DialogCancel | Command::ResetScores => None,
                command => Some(GameplayAction::Command(command)),
            },
        }
    }

    /// Fixed key table for gameplay
    pub fn key_action(&self, key: Key) -> Option<GameplayAction> {
        match key {
            Key::Escape | Key::Char('p') | Key::Char('P') => Some(GameplayAction::TogglePause),
            Key::Char(c @ '1'..='9') => {
                let index = c.to_digit(10)? as usize - 1;
                self.hotkeys.get(index).copied().map(GameplayAction::SelectWeapon)
            }
            _ => None,
        }
    }
}
