//! Connector form panel
//!
//! A modal panel over the editable form state: five labeled inputs, a
//! two-column mapping table, an add-row affordance and Cancel/Submit
//! buttons. The panel is a focus machine; every edit is written through to
//! the underlying [`ConnectorForm`] so payload derivation always reads the
//! model, never the widgets.

use crate::model::form::{ConnectorForm, ConnectorPayload, Field, MappingColumn};
use crate::view::controls::{
    render_button, render_button_row, render_text_input, ButtonColors, ButtonLayout, ButtonState,
    FocusState, TextInputColors, TextInputEvent, TextInputLayout, TextInputState,
};
use crate::view::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const LABEL_WIDTH: u16 = 10;
const PANEL_WIDTH: u16 = 58;

/// What currently holds keyboard focus inside the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    /// One of the five scalar inputs (index into [`Field::ALL`])
    Field(usize),
    /// A cell of the mapping table
    Mapping { row: usize, column: MappingColumn },
    AddRow,
    Cancel,
    Submit,
}

/// Per-mount lifecycle: the panel starts in `Editing`, enters `Submitting`
/// for the duration of the network call, and returns to `Editing` whatever
/// the outcome. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
}

/// Actions the panel hands back to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Close/cancel: unmount the panel, discarding its state
    Close,
    /// The user asked to submit
    Submit,
}

/// Result of asking the panel for a submittable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDisposition {
    /// All required fields present; here is the derived payload
    Ready(ConnectorPayload),
    /// Validation failed; the message names the missing fields
    Blocked(String),
    /// A submission is already in flight (single-flight rule)
    AlreadyInFlight,
}

/// Rects of the last render, for mouse hit testing.
#[derive(Debug, Clone, Default)]
pub struct FormLayout {
    fields: Vec<TextInputLayout>,
    /// Visible mapping cells: (row index, json-key cell, column-name cell)
    cells: Vec<(usize, TextInputLayout, TextInputLayout)>,
    add_row: ButtonLayout,
    cancel: ButtonLayout,
    submit: ButtonLayout,
}

pub struct FormPanel {
    form: ConnectorForm,
    field_inputs: Vec<TextInputState>,
    mapping_inputs: Vec<(TextInputState, TextInputState)>,
    add_row_button: ButtonState,
    cancel_button: ButtonState,
    submit_button: ButtonState,
    focus: FormFocus,
    phase: FormPhase,
    /// First visible mapping row
    scroll: usize,
    layout: FormLayout,
}

impl Default for FormPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl FormPanel {
    pub fn new() -> Self {
        let field_inputs = Field::ALL
            .into_iter()
            .map(|f| TextInputState::new(f.label()).with_placeholder(f.placeholder()))
            .collect();

        let mut panel = Self {
            form: ConnectorForm::new(),
            field_inputs,
            mapping_inputs: vec![blank_row_inputs()],
            add_row_button: ButtonState::new("+ Field Mapping"),
            cancel_button: ButtonState::new("Cancel"),
            submit_button: ButtonState::new("Submit"),
            focus: FormFocus::Field(0),
            phase: FormPhase::Editing,
            scroll: 0,
            layout: FormLayout::default(),
        };
        panel.apply_focus();
        panel
    }

    pub fn form(&self) -> &ConnectorForm {
        &self.form
    }

    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Total number of focusable slots, in tab order: fields, mapping cells
    /// row by row, then the three buttons.
    fn slot_count(&self) -> usize {
        Field::ALL.len() + self.mapping_inputs.len() * 2 + 3
    }

    fn slot_of(&self, focus: FormFocus) -> usize {
        let fields = Field::ALL.len();
        let cells = self.mapping_inputs.len() * 2;
        match focus {
            FormFocus::Field(i) => i,
            FormFocus::Mapping { row, column } => {
                fields + row * 2 + usize::from(column == MappingColumn::ColumnName)
            }
            FormFocus::AddRow => fields + cells,
            FormFocus::Cancel => fields + cells + 1,
            FormFocus::Submit => fields + cells + 2,
        }
    }

    fn focus_at(&self, slot: usize) -> FormFocus {
        let fields = Field::ALL.len();
        let cells = self.mapping_inputs.len() * 2;
        if slot < fields {
            FormFocus::Field(slot)
        } else if slot < fields + cells {
            let cell = slot - fields;
            FormFocus::Mapping {
                row: cell / 2,
                column: if cell % 2 == 0 {
                    MappingColumn::JsonKey
                } else {
                    MappingColumn::ColumnName
                },
            }
        } else {
            match slot - fields - cells {
                0 => FormFocus::AddRow,
                1 => FormFocus::Cancel,
                _ => FormFocus::Submit,
            }
        }
    }

    pub fn focus_next(&mut self) {
        let next = (self.slot_of(self.focus) + 1) % self.slot_count();
        self.set_focus(self.focus_at(next));
    }

    pub fn focus_prev(&mut self) {
        let slot = self.slot_of(self.focus);
        let prev = if slot == 0 { self.slot_count() - 1 } else { slot - 1 };
        self.set_focus(self.focus_at(prev));
    }

    pub fn set_focus(&mut self, focus: FormFocus) {
        self.focus = focus;
        self.apply_focus();
    }

    /// Push the current focus into every control's focus state.
    fn apply_focus(&mut self) {
        for (i, input) in self.field_inputs.iter_mut().enumerate() {
            input.focus = if self.focus == FormFocus::Field(i) {
                FocusState::Focused
            } else {
                FocusState::Normal
            };
        }
        for (row, (key_input, column_input)) in self.mapping_inputs.iter_mut().enumerate() {
            key_input.focus = focus_for_cell(self.focus, row, MappingColumn::JsonKey);
            column_input.focus = focus_for_cell(self.focus, row, MappingColumn::ColumnName);
        }
        self.add_row_button.focus = button_focus(self.focus == FormFocus::AddRow);
        self.cancel_button.focus = button_focus(self.focus == FormFocus::Cancel);
        self.submit_button.focus = if self.phase == FormPhase::Submitting {
            FocusState::Disabled
        } else {
            button_focus(self.focus == FormFocus::Submit)
        };

        // Entering an input puts the cursor at the end of its value.
        if let Some(input) = self.focused_input_mut() {
            input.move_end();
        }
    }

    fn focused_input_mut(&mut self) -> Option<&mut TextInputState> {
        match self.focus {
            FormFocus::Field(i) => self.field_inputs.get_mut(i),
            FormFocus::Mapping { row, column } => {
                self.mapping_inputs.get_mut(row).map(|(key, col)| match column {
                    MappingColumn::JsonKey => key,
                    MappingColumn::ColumnName => col,
                })
            }
            _ => None,
        }
    }

    /// Write an edited value through to the model.
    fn sync_model(&mut self, value: String) {
        match self.focus {
            FormFocus::Field(i) => self.form.set_field(Field::ALL[i], value),
            FormFocus::Mapping { row, column } => self.form.update_mapping(row, column, value),
            _ => {}
        }
    }

    /// Append a blank mapping row and focus its JSON-key cell.
    pub fn add_row(&mut self) {
        self.form.add_row();
        self.mapping_inputs.push(blank_row_inputs());
        let row = self.mapping_inputs.len() - 1;
        self.set_focus(FormFocus::Mapping {
            row,
            column: MappingColumn::JsonKey,
        });
    }

    /// Validate and derive the payload for submission.
    ///
    /// Never issues any network call itself; the owner drives the actual
    /// request so it can hold the handle.
    pub fn request_submit(&self) -> SubmitDisposition {
        if self.phase == FormPhase::Submitting {
            return SubmitDisposition::AlreadyInFlight;
        }

        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
            return SubmitDisposition::Blocked(format!(
                "Please fill in all fields (missing: {})",
                names.join(", ")
            ));
        }

        SubmitDisposition::Ready(self.form.payload())
    }

    /// Mark the in-flight phase. The Submit button goes disabled until
    /// [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) {
        self.phase = FormPhase::Submitting;
        self.apply_focus();
    }

    /// Return to `Editing`, whatever the outcome was.
    pub fn finish_submit(&mut self) {
        self.phase = FormPhase::Editing;
        self.apply_focus();
    }

    /// Handle a keyboard event. Returns an action for the owner when the
    /// panel wants to close or submit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return Some(FormAction::Submit);
        }

        match key.code {
            KeyCode::Esc => Some(FormAction::Close),
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                None
            }
            KeyCode::Enter => match self.focus {
                FormFocus::AddRow => {
                    self.add_row();
                    None
                }
                FormFocus::Cancel => Some(FormAction::Close),
                FormFocus::Submit => Some(FormAction::Submit),
                // Enter on an input behaves like a form: advance focus.
                _ => {
                    self.focus_next();
                    None
                }
            },
            _ => {
                let event = self.focused_input_mut().and_then(|input| input.handle_key(key));
                if let Some(TextInputEvent::Changed(value)) = event {
                    self.sync_model(value);
                }
                None
            }
        }
    }

    /// Handle a mouse event against the last rendered layout.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> Option<FormAction> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let (x, y) = (event.column, event.row);

        for (i, layout) in self.layout.fields.clone().into_iter().enumerate() {
            if layout.contains(x, y) {
                self.set_focus(FormFocus::Field(i));
                return None;
            }
        }
        for (row, key_cell, column_cell) in self.layout.cells.clone() {
            if key_cell.contains(x, y) {
                self.set_focus(FormFocus::Mapping {
                    row,
                    column: MappingColumn::JsonKey,
                });
                return None;
            }
            if column_cell.contains(x, y) {
                self.set_focus(FormFocus::Mapping {
                    row,
                    column: MappingColumn::ColumnName,
                });
                return None;
            }
        }
        if self.layout.add_row.contains(x, y) {
            self.set_focus(FormFocus::AddRow);
            self.add_row();
            return None;
        }
        if self.layout.cancel.contains(x, y) {
            return Some(FormAction::Close);
        }
        if self.layout.submit.contains(x, y) {
            self.set_focus(FormFocus::Submit);
            return Some(FormAction::Submit);
        }
        None
    }

    /// Render the panel centered in `area` and remember the layout for hit
    /// testing.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let rows = self.mapping_inputs.len();
        // Fields, blank, table header, rows, add-row, blank, buttons.
        let wanted_inner = Field::ALL.len() + 3 + rows + 2;
        let rect = centered_rect(area, PANEL_WIDTH, wanted_inner as u16 + 2);
        if rect.width < 20 || rect.height < 8 {
            return;
        }

        frame.render_widget(Clear, rect);
        let title = match self.phase {
            FormPhase::Editing => " Connector Configuration ",
            FormPhase::Submitting => " Connector Configuration — submitting… ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(Span::styled(title, Style::default().fg(theme.label)))
            .title_bottom(Line::from(Span::styled(
                " Tab next · Enter advance · Ctrl+S submit · Esc close ",
                Style::default().fg(theme.hint),
            )));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let input_colors = TextInputColors::from_theme(theme);
        let button_colors = ButtonColors::from_theme(theme);
        let field_width = inner.width.saturating_sub(LABEL_WIDTH + 4);

        self.layout = FormLayout::default();
        let mut y = inner.y;

        for input in &self.field_inputs {
            let line = Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1);
            let layout =
                render_text_input(frame, line, input, &input_colors, field_width, LABEL_WIDTH);
            self.layout.fields.push(layout);
            y += 1;
        }
        y += 1;

        // Mapping table: header plus as many rows as fit, keeping the
        // focused row visible.
        let fixed_below = 3; // add-row, blank, buttons
        let table_height = (inner.y + inner.height)
            .saturating_sub(y + 1 + fixed_below) as usize;
        let visible = table_height.clamp(1, rows);
        if let FormFocus::Mapping { row, .. } = self.focus {
            if row < self.scroll {
                self.scroll = row;
            } else if row >= self.scroll + visible {
                self.scroll = row + 1 - visible;
            }
        }
        self.scroll = self.scroll.min(rows - visible);

        let cell_width = inner.width.saturating_sub(8) / 2;
        let right_x = inner.x + 1 + cell_width + 4;
        let header = Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{:width$}", "JSON Key", width = cell_width as usize + 3),
                Style::default().fg(theme.label),
            ),
            Span::raw(" "),
            Span::styled("Column Name", Style::default().fg(theme.label)),
        ]);
        frame.render_widget(
            Paragraph::new(header),
            Rect::new(inner.x, y, inner.width, 1),
        );
        y += 1;

        for row in self.scroll..self.scroll + visible {
            let (key_input, column_input) = &self.mapping_inputs[row];
            let key_layout = render_text_input(
                frame,
                Rect::new(inner.x + 1, y, cell_width + 2, 1),
                key_input,
                &input_colors,
                cell_width,
                0,
            );
            let column_layout = render_text_input(
                frame,
                Rect::new(right_x, y, cell_width + 2, 1),
                column_input,
                &input_colors,
                cell_width,
                0,
            );
            self.layout.cells.push((row, key_layout, column_layout));
            y += 1;
        }

        self.layout.add_row = render_button(
            frame,
            Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1),
            &self.add_row_button,
            &button_colors,
        );
        y += 2;

        let button_layouts = render_button_row(
            frame,
            Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1),
            &[
                (&self.cancel_button, &button_colors),
                (&self.submit_button, &button_colors),
            ],
            2,
        );
        if let [cancel, submit] = &button_layouts[..] {
            self.layout.cancel = *cancel;
            self.layout.submit = *submit;
        }
    }
}

fn blank_row_inputs() -> (TextInputState, TextInputState) {
    (TextInputState::new(""), TextInputState::new(""))
}

fn focus_for_cell(focus: FormFocus, row: usize, column: MappingColumn) -> FocusState {
    if focus == (FormFocus::Mapping { row, column }) {
        FocusState::Focused
    } else {
        FocusState::Normal
    }
}

fn button_focus(focused: bool) -> FocusState {
    if focused {
        FocusState::Focused
    } else {
        FocusState::Normal
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
