use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::{
    event::events::Event,
    session::error::validate_signup,
    ui::{
        components::{spinner::Spinner, text_input::TextInput},
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
    util::colors,
};

const FIELDS: [&str; 3] = ["Username", "Email", "Password"];

/// Account creation form, opened on top of the login form.
pub struct Signup {
    inputs: [TextInput; 3],
    focus: usize,
    submitting: bool,
    error: Option<String>,
}

impl Default for Signup {
    fn default() -> Self {
        Self {
            inputs: [TextInput::default(), TextInput::default(), TextInput::masked()],
            focus: 0,
            submitting: false,
            error: None,
        }
    }
}

impl Signup {
    fn submit(&mut self, ctx: &AppContext) {
        let [username, email, password] = &self.inputs;
        let username = username.value().trim().to_string();
        let email = email.value().trim().to_string();
        let password = password.value().to_string();

        if let Err(e) = validate_signup(&username, &email, &password) {
            self.error = Some(e.to_string());
            return;
        }

        self.error = None;
        self.submitting = true;

        let session = ctx.session.clone();
        let tx = ctx.event_tx.clone();
        tokio::spawn(async move {
            let event = match session.signup(&username, &email, &password).await {
                Ok(()) => Event::SignupSucceeded,
                Err(e) => Event::SignupFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });
    }
}

#[async_trait]
impl View for Signup {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, _ctx: &AppContext) {
        let [column] = Layout::horizontal([Constraint::Length(48)])
            .flex(Flex::Center)
            .areas(area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .flex(Flex::Center)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(column);

        let heading = Paragraph::new(Line::from("Create account").style(
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ))
        .centered();
        f.render_widget(heading, chunks[0]);

        for (i, (input, title)) in self.inputs.iter().zip(FIELDS).enumerate() {
            f.render_widget(input.widget(title, self.focus == i), chunks[i + 1]);
        }

        if self.submitting {
            let spinner = Spinner::default()
                .with_style(Style::default().fg(colors::PRIMARY))
                .with_label("Creating account...");
            f.render_widget(spinner, chunks[4]);
        } else if let Some(error) = &self.error {
            let error = Paragraph::new(error.as_str())
                .style(Style::default().fg(colors::ERROR))
                .centered();
            f.render_widget(error, chunks[4]);
        }

        let hint = Paragraph::new("Enter next/submit · ↑↓ switch field · Esc back")
            .style(Style::default().fg(colors::NEUTRAL))
            .centered();
        f.render_widget(hint, chunks[5]);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        if self.submitting {
            return Some(Action::None);
        }

        match key.code {
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Up => {
                self.focus = (self.focus + FIELDS.len() - 1) % FIELDS.len();
                Some(Action::None)
            }
            KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELDS.len();
                Some(Action::None)
            }
            KeyCode::Enter => {
                if self.focus + 1 < FIELDS.len() {
                    self.focus += 1;
                } else {
                    self.submit(ctx);
                }
                Some(Action::None)
            }
            _ if self.inputs[self.focus].handle_key(key) => {
                self.error = None;
                Some(Action::None)
            }
            _ => None,
        }
    }

    fn on_paste(&mut self, text: &str) -> bool {
        self.inputs[self.focus].insert_str(text);
        true
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        match event {
            Event::SignupSucceeded => self.submitting = false,
            Event::SignupFailed(message) => {
                self.submitting = false;
                self.error = Some(message.clone());
            }
            _ => {}
        }
    }
}
