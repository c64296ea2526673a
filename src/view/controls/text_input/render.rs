//! Text input rendering

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{FocusState, TextInputColors, TextInputLayout, TextInputState};

/// Render a text input control.
///
/// `field_width` is the width of the bracketed field (not including the
/// label); `label_width` aligns labels across a column of inputs.
///
/// Returns layout information for hit testing.
pub fn render_text_input(
    frame: &mut Frame,
    area: Rect,
    state: &TextInputState,
    colors: &TextInputColors,
    field_width: u16,
    label_width: u16,
) -> TextInputLayout {
    if area.height == 0 || area.width < 5 {
        return TextInputLayout::default();
    }

    let (label_color, text_color, border_color) = match state.focus {
        FocusState::Normal => (colors.label, colors.text, colors.border),
        FocusState::Focused => (colors.focused, colors.text, colors.focused),
        FocusState::Disabled => (colors.disabled, colors.disabled, colors.disabled),
    };

    // A cell without a label (mapping table) renders as just `[value]`.
    let has_label = !state.label.is_empty() || label_width > 0;
    let label_width = label_width.max(state.label.len() as u16);
    // Label, ": ", "[", field, "]"
    let prefix_width = if has_label { label_width + 2 } else { 0 };
    let field_width = field_width.min(area.width.saturating_sub(prefix_width + 2));
    let inner_width = field_width as usize;

    let (display_text, is_placeholder) =
        if state.value.is_empty() && !state.placeholder.is_empty() {
            (state.placeholder.as_str(), true)
        } else {
            (state.value.as_str(), false)
        };

    // Scroll horizontally so the cursor stays inside the field.
    let cursor_visual = state.value[..state.cursor.min(state.value.len())].width();
    let scroll = cursor_visual.saturating_sub(inner_width.saturating_sub(1));

    let mut visible = String::new();
    let mut skipped = 0;
    let mut used = 0;
    for ch in display_text.chars() {
        let w = ch.width().unwrap_or(0);
        if skipped < scroll {
            skipped += w;
            continue;
        }
        if used + w > inner_width {
            break;
        }
        visible.push(ch);
        used += w;
    }
    let padding = " ".repeat(inner_width.saturating_sub(used));

    let text_style = if is_placeholder {
        Style::default().fg(colors.placeholder)
    } else {
        Style::default().fg(text_color)
    };

    let mut spans = Vec::with_capacity(5);
    if has_label {
        let padded_label = format!("{:width$}", state.label, width = label_width as usize);
        spans.push(Span::styled(padded_label, Style::default().fg(label_color)));
        spans.push(Span::styled(": ", Style::default().fg(label_color)));
    }
    spans.push(Span::styled("[", Style::default().fg(border_color)));
    spans.push(Span::styled(format!("{}{}", visible, padding), text_style));
    spans.push(Span::styled("]", Style::default().fg(border_color)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let input_start = area.x + prefix_width + 1;
    let input_area = Rect::new(input_start, area.y, field_width, 1);

    // Draw the cursor as a reversed cell.
    if state.focus == FocusState::Focused && !is_placeholder {
        let cursor_x = input_start + (cursor_visual - scroll) as u16;
        if cursor_x < input_start + field_width {
            let cursor_char = state.value[state.cursor..]
                .chars()
                .next()
                .unwrap_or(' ');
            let span = Span::styled(
                cursor_char.to_string(),
                Style::default()
                    .fg(colors.cursor)
                    .add_modifier(Modifier::REVERSED),
            );
            frame.render_widget(
                Paragraph::new(Line::from(vec![span])),
                Rect::new(cursor_x, area.y, 1, 1),
            );
        }
    }

    TextInputLayout {
        input_area,
        full_area: Rect::new(area.x, area.y, prefix_width + 2 + field_width, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render_to_string(state: &TextInputState, width: u16) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = Rect::new(0, 0, width, 1);
                let colors = TextInputColors {
                    label: ratatui::style::Color::White,
                    text: ratatui::style::Color::White,
                    border: ratatui::style::Color::Gray,
                    placeholder: ratatui::style::Color::DarkGray,
                    focused: ratatui::style::Color::Cyan,
                    disabled: ratatui::style::Color::DarkGray,
                    cursor: ratatui::style::Color::White,
                };
                render_text_input(frame, area, state, &colors, 16, 6);
            })
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for x in 0..width {
            out.push_str(buffer[(x, 0)].symbol());
        }
        out
    }

    #[test]
    fn renders_label_and_value() {
        let state = TextInputState::new("Host").with_value("db1");
        let text = render_to_string(&state, 30);
        assert!(text.contains("Host"));
        assert!(text.contains("db1"));
        assert!(text.contains('['));
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let state = TextInputState::new("Host").with_placeholder("Enter host");
        let text = render_to_string(&state, 30);
        assert!(text.contains("Enter host"));
    }

    #[test]
    fn tiny_area_renders_nothing() {
        let state = TextInputState::new("Host");
        let backend = TestBackend::new(3, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let colors = TextInputColors {
                    label: ratatui::style::Color::White,
                    text: ratatui::style::Color::White,
                    border: ratatui::style::Color::Gray,
                    placeholder: ratatui::style::Color::DarkGray,
                    focused: ratatui::style::Color::Cyan,
                    disabled: ratatui::style::Color::DarkGray,
                    cursor: ratatui::style::Color::White,
                };
                let layout = render_text_input(
                    frame,
                    Rect::new(0, 0, 3, 1),
                    &state,
                    &colors,
                    16,
                    6,
                );
                assert_eq!(layout.input_area, Rect::default());
            })
            .unwrap();
    }
}
