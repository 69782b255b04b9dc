//! Modal dialog stack
//!
//! Only the top entry receives input. At most one entry of each kind may be
//! stacked; a duplicate push is rejected and leaves the stack untouched.
//!
//! Dialog input is resolved here into a [`DialogAction`] by a single
//! dispatch on the dialog kind. Applying the action (OK/Cancel/Reset/New
//! Game) needs the session and collaborators, so the runtime does that.

use glam::IVec2;

use crate::consts::MAX_NAME_LEN;
use crate::error::DialogError;
use crate::platform::{Command, InputEvent, Key};
use crate::settings::Settings;

/// Dialog kinds, one entry per kind at most
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    Preferences,
    HighScores,
    LevelSelect,
    About,
    Instructions,
    HighScoreEntry,
    GameOver,
    AutoPause,
    AskSwitchDepth,
}

impl DialogKind {
    pub const ALL: [DialogKind; 9] = [
        DialogKind::Preferences,
        DialogKind::HighScores,
        DialogKind::LevelSelect,
        DialogKind::About,
        DialogKind::Instructions,
        DialogKind::HighScoreEntry,
        DialogKind::GameOver,
        DialogKind::AutoPause,
        DialogKind::AskSwitchDepth,
    ];
}

/// A dialog with its pending payload
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    /// Preferences being edited; applied only on OK
    Preferences { draft: Settings },
    HighScores,
    /// Level typed so far; `edited` is false until the first digit
    LevelSelect { level: u32, edited: bool },
    About,
    Instructions,
    /// Name entry for a qualifying score
    HighScoreEntry { name: String, score: u64, level: u32 },
    GameOver,
    AutoPause,
    AskSwitchDepth,
}

impl Dialog {
    pub fn kind(&self) -> DialogKind {
        match self {
            Dialog::Preferences { .. } => DialogKind::Preferences,
            Dialog::HighScores => DialogKind::HighScores,
            Dialog::LevelSelect { .. } => DialogKind::LevelSelect,
            Dialog::About => DialogKind::About,
            Dialog::Instructions => DialogKind::Instructions,
            Dialog::HighScoreEntry { .. } => DialogKind::HighScoreEntry,
            Dialog::GameOver => DialogKind::GameOver,
            Dialog::AutoPause => DialogKind::AutoPause,
            Dialog::AskSwitchDepth => DialogKind::AskSwitchDepth,
        }
    }

    /// Level select entry starting from `level`
    pub fn level_select(level: u32) -> Self {
        Dialog::LevelSelect {
            level,
            edited: false,
        }
    }

    /// Resolve an input event (already viewport-compensated) for this dialog.
    ///
    /// Text edits are applied to the payload in place and report
    /// [`DialogAction::Edited`].
    pub fn handle_input(&mut self, event: &InputEvent) -> DialogAction {
        match *event {
            InputEvent::KeyDown { code } => self.handle_key(code),
            InputEvent::MenuCommand { id } => match Command::from_id(id) {
                Some(command) => self.handle_command(command),
                None => DialogAction::None,
            },
            InputEvent::PointerDown { x, y } => self.handle_click(IVec2::new(x, y)),
            InputEvent::PointerUp { .. } | InputEvent::PointerMoved { .. } => DialogAction::None,
        }
    }

    fn handle_click(&mut self, _point: IVec2) -> DialogAction {
        match self {
            // Click anywhere dismisses the info screens
            Dialog::About | Dialog::Instructions => DialogAction::Ok,
            _ => DialogAction::None,
        }
    }

    fn handle_command(&mut self, command: Command) -> DialogAction {
        match (self.kind(), command) {
            (_, Command::DialogOk) => DialogAction::Ok,
            (_, Command::DialogCancel) => DialogAction::Cancel,
            (DialogKind::HighScores, Command::ResetScores) => DialogAction::Reset,
            (DialogKind::GameOver, Command::NewGame) => DialogAction::NewGame,
            _ => DialogAction::None,
        }
    }

    fn handle_key(&mut self, key: Key) -> DialogAction {
        match self {
            Dialog::About | Dialog::Instructions => return DialogAction::Ok,
            Dialog::LevelSelect { level, edited } => match key {
                Key::Char(c) if c.is_ascii_digit() => {
                    let digit = c.to_digit(10).unwrap_or(0);
                    let base = if *edited { *level } else { 0 };
                    *level = base.saturating_mul(10).saturating_add(digit).min(9999);
                    *edited = true;
                    return DialogAction::Edited;
                }
                Key::Backspace => {
                    *level /= 10;
                    *edited = true;
                    return DialogAction::Edited;
                }
                _ => {}
            },
            Dialog::HighScoreEntry { name, .. } => match key {
                Key::Char(c) if !c.is_control() => {
                    if name.chars().count() < MAX_NAME_LEN {
                        name.push(c);
                    }
                    return DialogAction::Edited;
                }
                Key::Space => {
                    if name.chars().count() < MAX_NAME_LEN {
                        name.push(' ');
                    }
                    return DialogAction::Edited;
                }
                Key::Backspace => {
                    name.pop();
                    return DialogAction::Edited;
                }
                _ => {}
            },
            _ => {}
        }

        match key {
            Key::Enter => DialogAction::Ok,
            Key::Escape => DialogAction::Cancel,
            _ => DialogAction::None,
        }
    }
}

/// What the active dialog wants done after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    None,
    /// Payload changed; redraw only
    Edited,
    Ok,
    Cancel,
    /// High Scores: clear the table, stay open
    Reset,
    /// Game Over: start a new game
    NewGame,
}

/// A stacked dialog plus its error indicator
#[derive(Debug, Clone, PartialEq)]
pub struct DialogEntry {
    pub dialog: Dialog,
    /// Set when the last OK/Reset failed to persist
    pub error: Option<String>,
}

impl DialogEntry {
    pub fn kind(&self) -> DialogKind {
        self.dialog.kind()
    }
}

/// Ordered dialog stack; the last entry is active
#[derive(Debug, Clone, Default)]
pub struct DialogStack {
    entries: Vec<DialogEntry>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a dialog, making it active. Rejects a kind that is already stacked.
    pub fn push(&mut self, dialog: Dialog) -> Result<(), DialogError> {
        let kind = dialog.kind();
        if self.contains(kind) {
            log::warn!("Ignoring duplicate {:?} dialog", kind);
            return Err(DialogError::Duplicate(kind));
        }
        log::debug!("Dialog opened: {:?} (depth {})", kind, self.entries.len() + 1);
        self.entries.push(DialogEntry {
            dialog,
            error: None,
        });
        Ok(())
    }

    /// Remove the active dialog
    pub fn pop(&mut self) -> Option<DialogEntry> {
        let entry = self.entries.pop();
        if let Some(entry) = &entry {
            log::debug!("Dialog closed: {:?} (depth {})", entry.kind(), self.entries.len());
        }
        entry
    }

    pub fn top(&self) -> Option<&DialogEntry> {
        self.entries.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut DialogEntry> {
        self.entries.last_mut()
    }

    pub fn top_kind(&self) -> Option<DialogKind> {
        self.top().map(DialogEntry::kind)
    }

    pub fn contains(&self, kind: DialogKind) -> bool {
        self.entries.iter().any(|e| e.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Kinds from bottom to top
    pub fn kinds(&self) -> impl Iterator<Item = DialogKind> + '_ {
        self.entries.iter().map(DialogEntry::kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dialog_for(kind: DialogKind) -> Dialog {
        match kind {
            DialogKind::Preferences => Dialog::Preferences {
                draft: Settings::default(),
            },
            DialogKind::HighScores => Dialog::HighScores,
            DialogKind::LevelSelect => Dialog::level_select(1),
            DialogKind::About => Dialog::About,
            DialogKind::Instructions => Dialog::Instructions,
            DialogKind::HighScoreEntry => Dialog::HighScoreEntry {
                name: String::new(),
                score: 10,
                level: 1,
            },
            DialogKind::GameOver => Dialog::GameOver,
            DialogKind::AutoPause => Dialog::AutoPause,
            DialogKind::AskSwitchDepth => Dialog::AskSwitchDepth,
        }
    }

    fn key(code: Key) -> InputEvent {
        InputEvent::KeyDown { code }
    }

    #[test]
    fn test_push_pop_top() {
        let mut stack = DialogStack::new();
        assert!(stack.top().is_none());

        stack.push(Dialog::About).unwrap();
        stack.push(Dialog::AutoPause).unwrap();
        assert_eq!(stack.top_kind(), Some(DialogKind::AutoPause));
        assert_eq!(stack.len(), 2);

        assert_eq!(stack.pop().map(|e| e.kind()), Some(DialogKind::AutoPause));
        assert_eq!(stack.top_kind(), Some(DialogKind::About));
        stack.pop();
        assert!(stack.is_empty());
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_duplicate_push_rejected() {
        let mut stack = DialogStack::new();
        stack.push(Dialog::level_select(3)).unwrap();
        stack.push(Dialog::About).unwrap();

        let err = stack.push(Dialog::level_select(9)).unwrap_err();
        assert!(matches!(err, DialogError::Duplicate(DialogKind::LevelSelect)));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top_kind(), Some(DialogKind::About));
    }

    #[test]
    fn test_enter_and_escape_on_every_kind() {
        for kind in DialogKind::ALL {
            let mut dialog = dialog_for(kind);
            assert_eq!(dialog.handle_input(&key(Key::Enter)), DialogAction::Ok, "{:?}", kind);
            let mut dialog = dialog_for(kind);
            let expected = match kind {
                DialogKind::About | DialogKind::Instructions => DialogAction::Ok,
                _ => DialogAction::Cancel,
            };
            assert_eq!(dialog.handle_input(&key(Key::Escape)), expected, "{:?}", kind);
        }
    }

    #[test]
    fn test_level_select_editing() {
        let mut dialog = Dialog::level_select(7);
        assert_eq!(dialog.handle_input(&key(Key::Char('1'))), DialogAction::Edited);
        assert_eq!(dialog.handle_input(&key(Key::Char('2'))), DialogAction::Edited);
        assert_eq!(dialog, Dialog::LevelSelect { level: 12, edited: true });

        dialog.handle_input(&key(Key::Backspace));
        assert_eq!(dialog, Dialog::LevelSelect { level: 1, edited: true });

        assert_eq!(dialog.handle_input(&key(Key::Char('x'))), DialogAction::None);
    }

    #[test]
    fn test_name_entry_editing() {
        let mut dialog = dialog_for(DialogKind::HighScoreEntry);
        for c in "Zed".chars() {
            dialog.handle_input(&key(Key::Char(c)));
        }
        dialog.handle_input(&key(Key::Backspace));
        match &dialog {
            Dialog::HighScoreEntry { name, .. } => assert_eq!(name, "Ze"),
            other => panic!("unexpected {:?}", other),
        }

        for _ in 0..40 {
            dialog.handle_input(&key(Key::Char('a')));
        }
        match &dialog {
            Dialog::HighScoreEntry { name, .. } => assert_eq!(name.len(), MAX_NAME_LEN),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_commands_by_kind() {
        let reset = InputEvent::MenuCommand {
            id: Command::ResetScores.id(),
        };
        let new_game = InputEvent::MenuCommand {
            id: Command::NewGame.id(),
        };

        assert_eq!(Dialog::HighScores.handle_input(&reset), DialogAction::Reset);
        assert_eq!(Dialog::GameOver.handle_input(&reset), DialogAction::None);
        assert_eq!(Dialog::GameOver.handle_input(&new_game), DialogAction::NewGame);
        assert_eq!(Dialog::AutoPause.handle_input(&new_game), DialogAction::None);
        assert_eq!(
            Dialog::AutoPause.handle_input(&InputEvent::MenuCommand { id: 12345 }),
            DialogAction::None
        );
    }

    #[test]
    fn test_click_closes_info_screens_only() {
        let click = InputEvent::PointerDown { x: 10, y: 10 };
        assert_eq!(Dialog::About.handle_input(&click), DialogAction::Ok);
        assert_eq!(Dialog::Instructions.handle_input(&click), DialogAction::Ok);
        assert_eq!(Dialog::GameOver.handle_input(&click), DialogAction::None);
    }

    proptest! {
        #[test]
        fn never_two_entries_of_same_kind(ops in prop::collection::vec((any::<bool>(), 0usize..9), 0..64)) {
            let mut stack = DialogStack::new();
            for (is_push, index) in ops {
                if is_push {
                    let _ = stack.push(dialog_for(DialogKind::ALL[index]));
                } else {
                    stack.pop();
                }

                let kinds: Vec<DialogKind> = stack.kinds().collect();
                for (i, a) in kinds.iter().enumerate() {
                    prop_assert!(kinds[i + 1..].iter().all(|b| b != a));
                }
            }
        }
    }
}
