//! Application shell
//!
//! Owns the "form visible" flag, the status line and the in-flight
//! submission handle. Mounting and unmounting the form panel is one toggle
//! operation; the panel's state dies with it on close.

use crate::services::submit::{self, SubmitHandle, SubmitOutcome};
use crate::view::controls::{render_button, ButtonColors, ButtonLayout, ButtonState, FocusState};
use crate::view::form::{FormAction, FormPanel, SubmitDisposition};
use crate::view::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One user-facing notification, shown on the bottom row until replaced.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

pub struct App {
    theme: Theme,
    endpoint: String,
    panel: Option<FormPanel>,
    pending: Option<SubmitHandle>,
    status: Option<StatusLine>,
    trigger_button: ButtonState,
    trigger_layout: ButtonLayout,
    should_quit: bool,
}

impl App {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            theme: Theme::default(),
            endpoint: endpoint.into(),
            panel: None,
            pending: None,
            status: None,
            trigger_button: ButtonState::new("Configure Connector")
                .with_focus(FocusState::Focused),
            trigger_layout: ButtonLayout::default(),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn form_visible(&self) -> bool {
        self.panel.is_some()
    }

    pub fn panel(&self) -> Option<&FormPanel> {
        self.panel.as_ref()
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// Flip the form visibility. Opening mounts a blank panel; closing
    /// discards the panel state and detaches any in-flight submission (its
    /// outcome becomes unobservable).
    pub fn toggle_form(&mut self) {
        if self.panel.take().is_some() {
            self.pending = None;
        } else {
            self.panel = Some(FormPanel::new());
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusLine {
            kind,
            text: text.into(),
        });
    }

    /// Drain the submission channel. Returns true when something changed
    /// and a render is due.
    pub fn process_async_messages(&mut self) -> bool {
        let Some(handle) = &self.pending else {
            return false;
        };
        let Some(outcome) = handle.try_outcome() else {
            return false;
        };
        self.pending = None;

        let Some(panel) = &mut self.panel else {
            // The form closed while the request was in flight.
            return false;
        };
        panel.finish_submit();

        match outcome {
            SubmitOutcome::Accepted => {
                self.set_status(StatusKind::Success, "Configuration saved");
            }
            SubmitOutcome::Rejected(detail) => {
                self.set_status(StatusKind::Error, format!("Save failed: {}", detail));
            }
            SubmitOutcome::TransportFailed => {
                self.set_status(
                    StatusKind::Error,
                    "Could not reach the configuration endpoint",
                );
            }
        }
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.panel.is_some() {
            let action = self
                .panel
                .as_mut()
                .and_then(|panel| panel.handle_key(key));
            if let Some(action) = action {
                self.perform(action);
            }
            return;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_form(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.panel.is_some() {
            let action = self
                .panel
                .as_mut()
                .and_then(|panel| panel.handle_mouse(event));
            if let Some(action) = action {
                self.perform(action);
            }
            return;
        }

        if event.kind == MouseEventKind::Down(MouseButton::Left)
            && self.trigger_layout.contains(event.column, event.row)
        {
            self.toggle_form();
        }
    }

    fn perform(&mut self, action: FormAction) {
        match action {
            FormAction::Close => self.toggle_form(),
            FormAction::Submit => self.trigger_submit(),
        }
    }

    fn trigger_submit(&mut self) {
        let Some(panel) = &mut self.panel else {
            return;
        };
        match panel.request_submit() {
            SubmitDisposition::Blocked(message) => {
                self.set_status(StatusKind::Error, message);
            }
            SubmitDisposition::AlreadyInFlight => {
                tracing::debug!("Ignoring submit while a request is in flight");
            }
            SubmitDisposition::Ready(payload) => {
                tracing::info!(endpoint = %self.endpoint, "Submitting connector config");
                self.pending = Some(submit::submit(&self.endpoint, &payload));
                panel.begin_submit();
                self.set_status(StatusKind::Info, "Submitting configuration…");
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let theme = self.theme;
        let area = frame.area();
        if area.height < 2 {
            return;
        }
        let body = Rect::new(area.x, area.y, area.width, area.height - 1);

        if let Some(panel) = &mut self.panel {
            panel.render(frame, body, &theme);
        } else {
            let width = (self.trigger_button.label.len() + 4) as u16;
            let x = body.x + body.width.saturating_sub(width) / 2;
            let y = body.y + body.height / 2;
            self.trigger_layout = render_button(
                frame,
                Rect::new(x, y, width, 1),
                &self.trigger_button,
                &ButtonColors::from_theme(&theme),
            );

            let hint = "Enter to configure a connector · q to quit";
            let hint_x = body.x + body.width.saturating_sub(hint.len() as u16) / 2;
            if y + 2 < body.y + body.height {
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        hint,
                        Style::default().fg(theme.hint),
                    ))),
                    Rect::new(hint_x, y + 2, hint.len() as u16, 1),
                );
            }
        }

        if let Some(status) = &self.status {
            let color = match status.kind {
                StatusKind::Info => theme.hint,
                StatusKind::Success => theme.success,
                StatusKind::Error => theme.error,
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    status.text.clone(),
                    Style::default().fg(color),
                ))),
                Rect::new(area.x, area.y + area.height - 1, area.width, 1),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form::Field;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn fill_required(app: &mut App) {
        for value in ["db1", "5432", "public", "orders", "app42"] {
            type_str(app, value);
            app.handle_key(key(KeyCode::Tab));
        }
    }

    #[test]
    fn enter_mounts_the_form_and_escape_unmounts_it() {
        let mut app = App::new("http://127.0.0.1:1/save_connector_config/");
        assert!(!app.form_visible());

        app.handle_key(key(KeyCode::Enter));
        assert!(app.form_visible());

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.form_visible());
    }

    #[test]
    fn reopening_starts_from_a_blank_form() {
        let mut app = App::new("http://127.0.0.1:1/save_connector_config/");
        app.toggle_form();
        type_str(&mut app, "db1");
        assert_eq!(app.panel().unwrap().form().field(Field::Host), "db1");

        app.toggle_form();
        app.toggle_form();
        assert_eq!(app.panel().unwrap().form().field(Field::Host), "");
    }

    #[test]
    fn q_quits_only_while_the_form_is_hidden() {
        let mut app = App::new("http://127.0.0.1:1/save_connector_config/");
        app.toggle_form();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        assert_eq!(app.panel().unwrap().form().field(Field::Host), "q");

        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn submit_with_missing_fields_sets_a_validation_status_and_no_request() {
        let mut app = App::new("http://127.0.0.1:1/save_connector_config/");
        app.toggle_form();

        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        app.handle_key(ctrl_s);

        let status = app.status().expect("validation status expected");
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("Please fill in"));
        assert!(app.pending.is_none());
        assert!(!app.panel().unwrap().is_submitting());
    }

    #[test]
    fn closing_mid_flight_detaches_the_request() {
        let mut app = App::new("http://127.0.0.1:1/save_connector_config/");
        app.toggle_form();
        fill_required(&mut app);

        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        app.handle_key(ctrl_s);
        assert!(app.pending.is_some());

        app.handle_key(key(KeyCode::Esc));
        assert!(app.pending.is_none());
        assert!(!app.form_visible());
    }
}
