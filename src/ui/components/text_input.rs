use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::util::colors;

/// Single-line editable field.
#[derive(Debug, Default, Clone)]
pub struct TextInput {
    value: String,
    masked: bool,
}

impl TextInput {
    pub fn masked() -> Self {
        Self {
            value: String::new(),
            masked: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn insert_str(&mut self, text: &str) {
        self.value
            .extend(text.chars().filter(|c| !c.is_control()));
    }

    /// Applies an editing key. Returns false for keys that are not edits.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                true
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let trimmed = self.value.trim_end().len();
                let cut = self.value[..trimmed]
                    .rfind(char::is_whitespace)
                    .map(|i| i + 1)
                    .unwrap_or(0);
                self.value.truncate(cut);
                true
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => false,
            KeyCode::Char(c) => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    pub fn widget<'a>(&'a self, title: &'a str, focused: bool) -> Paragraph<'a> {
        let border_style = if focused {
            Style::default().fg(colors::PRIMARY)
        } else {
            Style::default().fg(colors::NEUTRAL)
        };

        let shown = if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        };

        let mut line = Line::from(Span::styled(shown, Style::default().fg(colors::TEXT)));
        if focused {
            line.push_span(Span::styled("▏", Style::default().fg(colors::PRIMARY)));
        }

        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        )
    }
}
