use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
};
use tracing::debug;

use crate::{
    event::events::Event,
    session::error::validate_login,
    ui::{
        components::{spinner::Spinner, text_input::TextInput},
        context::AppContext,
        state::{AppState, Route},
        traits::{Action, View},
    },
    util::colors,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Field {
    #[default]
    Email,
    Password,
}

#[derive(Default)]
pub struct Login {
    email: TextInput,
    password: TextInput,
    focus: Field,
    submitting: bool,
    error: Option<String>,
}

impl Login {
    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }

    fn submit(&mut self, ctx: &AppContext) {
        let email = self.email.value().trim().to_string();
        let password = self.password.value().to_string();

        if let Err(e) = validate_login(&email, &password) {
            self.error = Some(e.to_string());
            return;
        }

        self.error = None;
        self.submitting = true;

        let session = ctx.session.clone();
        let tx = ctx.event_tx.clone();
        tokio::spawn(async move {
            let event = match session.authenticate(&email, &password).await {
                Ok(()) => Event::LoginSucceeded(email),
                Err(e) => Event::LoginFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });
    }
}

#[async_trait]
impl View for Login {
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
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(column);

        let heading = Paragraph::new(Line::from("Sign in").style(
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ))
        .centered();
        f.render_widget(heading, chunks[0]);

        f.render_widget(
            self.email.widget("Email", self.focus == Field::Email),
            chunks[1],
        );
        f.render_widget(
            self.password.widget("Password", self.focus == Field::Password),
            chunks[2],
        );

        if self.submitting {
            let spinner = Spinner::default()
                .with_style(Style::default().fg(colors::PRIMARY))
                .with_label("Signing in...");
            f.render_widget(spinner, chunks[3]);
        } else if let Some(error) = &self.error {
            let error = Paragraph::new(error.as_str())
                .style(Style::default().fg(colors::ERROR))
                .centered();
            f.render_widget(error, chunks[3]);
        }

        let hint = Paragraph::new("Enter sign in · ↑↓ switch field · Ctrl-N create account")
            .style(Style::default().fg(colors::NEUTRAL))
            .centered();
        f.render_widget(hint, chunks[4]);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        if self.submitting {
            return match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => None,
                _ => Some(Action::None),
            };
        }

        match key.code {
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Push(Route::Signup))
            }
            KeyCode::Up | KeyCode::Down => {
                self.toggle_focus();
                Some(Action::None)
            }
            KeyCode::Enter => {
                match self.focus {
                    Field::Email => self.focus = Field::Password,
                    Field::Password => self.submit(ctx),
                }
                Some(Action::None)
            }
            _ if self.focused_input().handle_key(key) => {
                self.error = None;
                Some(Action::None)
            }
            _ => None,
        }
    }

    fn on_paste(&mut self, text: &str) -> bool {
        self.focused_input().insert_str(text);
        true
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        match event {
            Event::LoginSucceeded(_) => {
                self.submitting = false;
                self.password.clear();
            }
            Event::LoginFailed(message) => {
                debug!(%message, "login_form_rejected");
                self.submitting = false;
                self.error = Some(message.clone());
            }
            _ => {}
        }
    }
}
