use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    symbols::{self, border},
    text::{Line, ToSpan},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::{audio::RepeatMode, util::colors};

pub struct PlayerControlsWidget {
    repeat_mode: RepeatMode,
    shuffled: bool,
    /// Percent, 0 when muted.
    volume: u8,
    muted: bool,
}

impl PlayerControlsWidget {
    pub fn new(repeat_mode: RepeatMode, shuffled: bool, volume: f32, muted: bool) -> Self {
        Self {
            repeat_mode,
            shuffled,
            volume: if muted {
                0
            } else {
                (volume.clamp(0.0, 1.0) * 100.0).round() as u8
            },
            muted,
        }
    }
}

impl Widget for PlayerControlsWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let repeat_icon = match self.repeat_mode {
            RepeatMode::None => "↻".fg(colors::NEUTRAL),
            RepeatMode::One => "↻1".fg(colors::PRIMARY),
            RepeatMode::All => "↻∞".fg(colors::PRIMARY),
        };
        let shuffle_icon = if self.shuffled {
            "⤮".fg(colors::PRIMARY)
        } else {
            "⤮".fg(colors::NEUTRAL)
        };

        let mut controls_text = Line::default();
        controls_text.push_span(repeat_icon);
        controls_text.push_span("  ");
        controls_text.push_span(shuffle_icon);

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(9), Constraint::Length(12)])
            .split(area);

        let controls_block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_set(border::Set {
                top_left: symbols::line::ROUNDED.horizontal_down,
                top_right: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                bottom_right: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });
        Paragraph::new(controls_text)
            .block(controls_block)
            .centered()
            .render(layout[0], buf);

        let volume_text = if self.muted {
            "muted".to_span().fg(colors::NEUTRAL)
        } else {
            ratatui::text::Span::from(format!("{}%", self.volume)).fg(colors::TEXT)
        };

        let volume_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::Set {
                top_left: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });

        Gauge::default()
            .block(volume_block)
            .gauge_style(Style::new().fg(colors::PRIMARY).bg(colors::NEUTRAL))
            .ratio(self.volume as f64 / 100.0)
            .label(volume_text)
            .render(layout[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_a_percentage() {
        assert_eq!(PlayerControlsWidget::new(RepeatMode::None, false, 0.55, false).volume, 55);
        assert_eq!(PlayerControlsWidget::new(RepeatMode::None, false, 0.55, true).volume, 0);
        assert_eq!(PlayerControlsWidget::new(RepeatMode::All, true, 3.0, false).volume, 100);
    }
}
