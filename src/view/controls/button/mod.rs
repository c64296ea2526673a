//! Button control for triggering actions
//!
//! Renders as: `[ Button Text ]`

mod render;

use ratatui::layout::Rect;
use ratatui::style::Color;

pub use render::{render_button, render_button_row};

use super::FocusState;

/// State for a button control
#[derive(Debug, Clone)]
pub struct ButtonState {
    /// Button label text
    pub label: String,
    /// Focus state
    pub focus: FocusState,
}

impl ButtonState {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            focus: FocusState::Normal,
        }
    }

    pub fn with_focus(mut self, focus: FocusState) -> Self {
        self.focus = focus;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.focus != FocusState::Disabled
    }
}

/// Colors for the button control
#[derive(Debug, Clone, Copy)]
pub struct ButtonColors {
    pub text: Color,
    pub border: Color,
    pub focused: Color,
    pub disabled: Color,
}

impl ButtonColors {
    pub fn from_theme(theme: &crate::view::theme::Theme) -> Self {
        Self {
            text: theme.text,
            border: theme.border,
            focused: theme.focused,
            disabled: theme.disabled,
        }
    }
}

/// Layout information returned after rendering for hit testing
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonLayout {
    /// The clickable button area
    pub button_area: Rect,
}

impl ButtonLayout {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.button_area.x
            && x < self.button_area.x + self.button_area.width
            && y >= self.button_area.y
            && y < self.button_area.y + self.button_area.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn test_frame<F>(width: u16, height: u16, f: F)
    where
        F: FnOnce(&mut ratatui::Frame, Rect),
    {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = Rect::new(0, 0, width, height);
                f(frame, area);
            })
            .unwrap();
    }

    fn colors() -> ButtonColors {
        ButtonColors {
            text: Color::White,
            border: Color::Gray,
            focused: Color::Cyan,
            disabled: Color::DarkGray,
        }
    }

    #[test]
    fn button_layout_matches_label_width() {
        test_frame(20, 1, |frame, area| {
            let state = ButtonState::new("OK");
            let layout = render_button(frame, area, &state, &colors());
            assert_eq!(layout.button_area.width, 6); // "[ OK ]"
        });
    }

    #[test]
    fn button_hit_detection() {
        test_frame(20, 1, |frame, area| {
            let state = ButtonState::new("Cancel");
            let layout = render_button(frame, area, &state, &colors());
            assert!(layout.contains(0, 0));
            assert!(layout.contains(9, 0));
            assert!(!layout.contains(15, 0));
        });
    }

    #[test]
    fn button_row_lays_out_left_to_right() {
        test_frame(40, 1, |frame, area| {
            let cancel = ButtonState::new("Cancel");
            let submit = ButtonState::new("Submit");
            let c = colors();
            let layouts = render_button_row(frame, area, &[(&cancel, &c), (&submit, &c)], 2);
            assert_eq!(layouts.len(), 2);
            assert!(layouts[0].button_area.x < layouts[1].button_area.x);
        });
    }

    #[test]
    fn disabled_button_is_not_enabled() {
        let state = ButtonState::new("Submit").with_focus(FocusState::Disabled);
        assert!(!state.is_enabled());
    }
}
