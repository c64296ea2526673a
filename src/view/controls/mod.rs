//! Reusable form controls
//!
//! Each control follows the same shape: a state struct, input handling that
//! returns an event enum, and a render function that returns layout
//! information for mouse hit testing.

pub mod button;
pub mod text_input;

pub use button::{render_button, render_button_row, ButtonColors, ButtonLayout, ButtonState};
pub use text_input::{
    render_text_input, TextInputColors, TextInputEvent, TextInputLayout, TextInputState,
};

/// Focus state shared by all controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Normal,
    Focused,
    Disabled,
}
