//! Single-line text input control
//!
//! Renders as: `Label : [value     ]`
//!
//! The cursor is a byte offset into `value`, always on a char boundary.

mod input;
mod render;

use ratatui::layout::Rect;
use ratatui::style::Color;

pub use input::TextInputEvent;
pub use render::render_text_input;

use super::FocusState;

/// State for a text input control
#[derive(Debug, Clone)]
pub struct TextInputState {
    /// Label shown to the left of the field
    pub label: String,
    /// Placeholder shown while the value is empty
    pub placeholder: String,
    /// Current value
    pub value: String,
    /// Cursor byte offset into `value`
    pub cursor: usize,
    /// Focus state
    pub focus: FocusState,
}

impl TextInputState {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            placeholder: String::new(),
            value: String::new(),
            cursor: 0,
            focus: FocusState::Normal,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.value.len();
        self
    }

    pub fn with_focus(mut self, focus: FocusState) -> Self {
        self.focus = focus;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.focus != FocusState::Disabled
    }

    /// Byte offset of the char preceding the cursor.
    fn prev_char_start(&self) -> Option<usize> {
        self.value[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    /// Byte length of the char at the cursor.
    fn char_len_at_cursor(&self) -> Option<usize> {
        self.value[self.cursor..].chars().next().map(char::len_utf8)
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(start) = self.prev_char_start() {
            self.value.remove(start);
            self.cursor = start;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(start) = self.prev_char_start() {
            self.cursor = start;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(len) = self.char_len_at_cursor() {
            self.cursor += len;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.len();
    }
}

/// Colors for the text input control
#[derive(Debug, Clone, Copy)]
pub struct TextInputColors {
    pub label: Color,
    pub text: Color,
    pub border: Color,
    pub placeholder: Color,
    pub focused: Color,
    pub disabled: Color,
    pub cursor: Color,
}

impl TextInputColors {
    pub fn from_theme(theme: &crate::view::theme::Theme) -> Self {
        Self {
            label: theme.label,
            text: theme.text,
            border: theme.border,
            placeholder: theme.placeholder,
            focused: theme.focused,
            disabled: theme.disabled,
            cursor: theme.text,
        }
    }
}

/// Layout information returned after rendering for hit testing
#[derive(Debug, Clone, Copy, Default)]
pub struct TextInputLayout {
    /// The editable field area (between the brackets)
    pub input_area: Rect,
    /// Label plus field
    pub full_area: Rect,
}

impl TextInputLayout {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.full_area.x
            && x < self.full_area.x + self.full_area.width
            && y >= self.full_area.y
            && y < self.full_area.y + self.full_area.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_cursor_track_bytes() {
        let mut state = TextInputState::new("Host");
        state.insert('d');
        state.insert('b');
        assert_eq!(state.value, "db");
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn backspace_removes_the_char_before_the_cursor() {
        let mut state = TextInputState::new("Host").with_value("abc");
        state.move_left();
        state.backspace();
        assert_eq!(state.value, "ac");
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn multibyte_chars_stay_on_boundaries() {
        let mut state = TextInputState::new("Schema").with_value("héllo");
        state.move_home();
        state.move_right();
        state.move_right();
        assert_eq!(state.cursor, 1 + 'é'.len_utf8());
        state.backspace();
        assert_eq!(state.value, "hllo");
    }

    #[test]
    fn delete_removes_the_char_at_the_cursor() {
        let mut state = TextInputState::new("Port").with_value("5432");
        state.move_home();
        state.delete();
        assert_eq!(state.value, "432");
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn with_value_places_the_cursor_at_the_end() {
        let state = TextInputState::new("Host").with_value("db1");
        assert_eq!(state.cursor, 3);
    }
}
