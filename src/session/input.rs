use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::state::SessionState;

/// A key event as seen by a running test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Rune(char),
    Space,
    Backspace,
    DeleteWord,
    Restart,
    Menu,
    Quit,
}

impl KeyAction {
    /// Returns `None` for keys a running test ignores (enter, tab, arrows).
    pub fn classify(key: &KeyEvent) -> Option<Self> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char('c') if ctrl => Some(Self::Quit),
            KeyCode::Char('q') if ctrl => Some(Self::Menu),
            KeyCode::Char('r') if ctrl => Some(Self::Restart),
            KeyCode::Char('w') if ctrl => Some(Self::DeleteWord),
            KeyCode::Char('h') if ctrl => Some(Self::Backspace),
            KeyCode::Backspace if ctrl || alt => Some(Self::DeleteWord),
            KeyCode::Backspace => Some(Self::Backspace),
            KeyCode::Char(' ') => Some(Self::Space),
            KeyCode::Char(_) if ctrl || alt => None,
            KeyCode::Char(ch) => Some(Self::Rune(ch)),
            _ => None,
        }
    }

    pub fn is_edit(self) -> bool {
        matches!(
            self,
            Self::Rune(_) | Self::Space | Self::Backspace | Self::DeleteWord
        )
    }

    /// Applies an editing action; control actions leave the state untouched.
    pub fn apply(self, state: SessionState) -> SessionState {
        match self {
            Self::Rune(ch) => state.append_rune(ch),
            Self::Space => state.append_space(),
            Self::Backspace => state.backspace(),
            Self::DeleteWord => state.delete_word(),
            Self::Restart | Self::Menu | Self::Quit => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn classifies_typing_keys() {
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(KeyAction::Rune('a'))
        );
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(KeyAction::Rune('A'))
        );
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(KeyAction::Space)
        );
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(KeyAction::Backspace)
        );
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Char('h'), KeyModifiers::CONTROL)),
            Some(KeyAction::Backspace)
        );
    }

    #[test]
    fn classifies_control_keys() {
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Char('w'), KeyModifiers::CONTROL)),
            Some(KeyAction::DeleteWord)
        );
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Backspace, KeyModifiers::ALT)),
            Some(KeyAction::DeleteWord)
        );
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(KeyAction::Restart)
        );
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Some(KeyAction::Menu)
        );
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn ignores_enter_tab_and_unbound_chords() {
        for code in [KeyCode::Enter, KeyCode::Tab, KeyCode::Up] {
            assert_eq!(KeyAction::classify(&key(code, KeyModifiers::NONE)), None);
        }
        assert_eq!(
            KeyAction::classify(&key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn apply_routes_to_state_transitions() {
        let state = SessionState::new("ab cd");
        let state = KeyAction::Rune('a').apply(state);
        let state = KeyAction::Space.apply(state);
        assert_eq!(state.cursor(), 3);
        let state = KeyAction::Restart.apply(state);
        assert_eq!(state.cursor(), 3);
        let state = KeyAction::DeleteWord.apply(state);
        assert_eq!(state.cursor(), 0);
    }
}
