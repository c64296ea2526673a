//! Button rendering

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::{ButtonColors, ButtonLayout, ButtonState, FocusState};

/// Render a button control. Returns layout information for hit testing.
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    state: &ButtonState,
    colors: &ButtonColors,
) -> ButtonLayout {
    if area.height == 0 || area.width < 4 {
        return ButtonLayout::default();
    }

    let (text_color, border_color) = match state.focus {
        FocusState::Normal => (colors.text, colors.border),
        FocusState::Focused => (colors.focused, colors.focused),
        FocusState::Disabled => (colors.disabled, colors.disabled),
    };

    // "[ " + label + " ]"
    let button_width = (state.label.len() + 4) as u16;
    let actual_width = button_width.min(area.width);
    let max_label_len = actual_width.saturating_sub(4) as usize;
    let display_label: String = state.label.chars().take(max_label_len).collect();

    let mut style = Style::default().fg(text_color);
    if state.focus == FocusState::Focused {
        style = style.add_modifier(Modifier::BOLD);
    }

    let line = Line::from(vec![
        Span::styled("[", Style::default().fg(border_color)),
        Span::raw(" "),
        Span::styled(display_label, style),
        Span::raw(" "),
        Span::styled("]", Style::default().fg(border_color)),
    ]);

    let button_area = Rect::new(area.x, area.y, actual_width, 1);
    frame.render_widget(Paragraph::new(line), button_area);

    ButtonLayout { button_area }
}

/// Render a row of buttons separated by `gap` columns.
pub fn render_button_row(
    frame: &mut Frame,
    area: Rect,
    buttons: &[(&ButtonState, &ButtonColors)],
    gap: u16,
) -> Vec<ButtonLayout> {
    if buttons.is_empty() || area.height == 0 {
        return Vec::new();
    }

    let mut layouts = Vec::with_capacity(buttons.len());
    let mut x = area.x;

    for (state, colors) in buttons {
        let button_width = (state.label.len() + 4) as u16;
        if x + button_width > area.x + area.width {
            break;
        }

        let layout = render_button(frame, Rect::new(x, area.y, button_width, 1), state, colors);
        layouts.push(layout);
        x += button_width + gap;
    }

    layouts
}
