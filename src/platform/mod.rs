//! Platform abstraction layer
//!
//! Handles the boundary with the host window system:
//! - Raw input events (pointer, keyboard, menu commands)
//! - Redraw requests
//!
//! Coordinates are in the window's own space; the runtime compensates for
//! the viewport inset itself.

/// Window/view collaborator
pub trait View {
    /// Ask the host to redraw the game view
    fn request_redraw(&mut self);
}

/// View that ignores redraw requests (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl View for NullView {
    fn request_redraw(&mut self) {}
}

/// Keys the runtime understands; anything else arrives as `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Backspace,
    Char(char),
    Other(u32),
}

/// Raw event from the host, consumed synchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown { x: i32, y: i32 },
    PointerUp { x: i32, y: i32 },
    PointerMoved { x: i32, y: i32 },
    KeyDown { code: Key },
    MenuCommand { id: u32 },
}

/// Build a four-char command id the way classic Mac menus encode them
pub const fn four_char_code(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

/// Menu / button commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    About,
    Instructions,
    Preferences,
    HighScores,
    LevelSelect,
    NewGame,
    EndGame,
    Pause,
    Quit,
    /// Default button of the active dialog
    DialogOk,
    /// Cancel button of the active dialog
    DialogCancel,
    /// High Scores "Reset" button
    ResetScores,
}

impl Command {
    const TABLE: [(Command, u32); 12] = [
        (Command::About, four_char_code(b"abou")),
        (Command::Instructions, four_char_code(b"inst")),
        (Command::Preferences, four_char_code(b"pref")),
        (Command::HighScores, four_char_code(b"hisc")),
        (Command::LevelSelect, four_char_code(b"levl")),
        (Command::NewGame, four_char_code(b"new ")),
        (Command::EndGame, four_char_code(b"endg")),
        (Command::Pause, four_char_code(b"paus")),
        (Command::Quit, four_char_code(b"quit")),
        (Command::DialogOk, four_char_code(b"ok  ")),
        (Command::DialogCancel, four_char_code(b"not!")),
        (Command::ResetScores, four_char_code(b"rset")),
    ];

    /// Look up a command id; unknown ids map to `None`
    pub fn from_id(id: u32) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, code)| *code == id)
            .map(|(command, _)| *command)
    }

    pub fn id(self) -> u32 {
        Self::TABLE
            .iter()
            .find(|(command, _)| *command == self)
            .map(|(_, code)| *code)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_ids_are_unique_and_resolve() {
        for (command, id) in Command::TABLE {
            assert_eq!(Command::from_id(id), Some(command));
            assert_eq!(command.id(), id);
        }
        assert_eq!(four_char_code(b"quit"), 0x7175_6974);
    }

    #[test]
    fn test_unknown_command_id() {
        assert_eq!(Command::from_id(0), None);
        assert_eq!(Command::from_id(four_char_code(b"zzzz")), None);
    }
}
