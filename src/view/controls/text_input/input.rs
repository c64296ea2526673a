//! Text input handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{FocusState, TextInputState};

/// Events that can be returned from text input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    /// Text was changed
    Changed(String),
    /// Enter was pressed on the input
    Submitted(String),
    /// Escape was pressed
    Cancelled,
}

impl TextInputState {
    /// Handle a keyboard event for this text input.
    ///
    /// Returns `Some(TextInputEvent)` if the event was consumed, `None` if
    /// it was not relevant (the caller may treat it as navigation).
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<TextInputEvent> {
        if !self.is_enabled() || self.focus != FocusState::Focused {
            return None;
        }

        match key.code {
            KeyCode::Enter => Some(TextInputEvent::Submitted(self.value.clone())),
            KeyCode::Esc => Some(TextInputEvent::Cancelled),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.backspace();
                    Some(TextInputEvent::Changed(self.value.clone()))
                } else {
                    None
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.len() {
                    self.delete();
                    Some(TextInputEvent::Changed(self.value.clone()))
                } else {
                    None
                }
            }
            KeyCode::Left => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.move_home();
                } else {
                    self.move_left();
                }
                None
            }
            KeyCode::Right => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.move_end();
                } else {
                    self.move_right();
                }
                None
            }
            KeyCode::Home => {
                self.move_home();
                None
            }
            KeyCode::End => {
                self.move_end();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(c);
                Some(TextInputEvent::Changed(self.value.clone()))
            }
            _ => None,
        }
    }
}
