//! Color palette for the UI

use ratatui::style::Color;

/// Colors shared across the shell and the form panel.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Panel and control borders
    pub border: Color,
    /// Field labels and table headers
    pub label: Color,
    /// Entered text
    pub text: Color,
    /// Placeholder text in empty inputs
    pub placeholder: Color,
    /// Focused control highlight
    pub focused: Color,
    /// Disabled controls (e.g. Submit while a request is in flight)
    pub disabled: Color,
    /// Success notifications
    pub success: Color,
    /// Failure notifications
    pub error: Color,
    /// Key hints
    pub hint: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Color::Gray,
            label: Color::White,
            text: Color::White,
            placeholder: Color::DarkGray,
            focused: Color::Cyan,
            disabled: Color::DarkGray,
            success: Color::Green,
            error: Color::Red,
            hint: Color::DarkGray,
        }
    }
}
