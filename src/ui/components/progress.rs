use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    symbols::{self, border},
    text::ToSpan,
    widgets::{Block, Borders, Widget},
};

use crate::{
    audio::{PlaybackState, PlayerStatus},
    ui::components::gauge::PlaybackGauge,
    util::{colors, format::format_duration},
};

/// Track title and the played/buffered bar.
pub struct ProgressWidget<'a> {
    state: &'a PlaybackState,
}

impl<'a> ProgressWidget<'a> {
    pub fn new(state: &'a PlaybackState) -> Self {
        Self { state }
    }

    fn title(&self) -> String {
        let Some(track) = &self.state.current_track else {
            return "No track".to_string();
        };
        let icon = match (self.state.loading, self.state.status) {
            (true, _) => "…",
            (false, PlayerStatus::Playing) => "▶",
            (false, PlayerStatus::Paused) => "⏸",
            (false, PlayerStatus::Stopped) => "■",
        };
        format!("{icon}  {} by {}", track.title, track.artist)
    }
}

impl Widget for ProgressWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = format!(
            "{} / {}",
            format_duration(self.state.current_time),
            format_duration(self.state.duration)
        );

        PlaybackGauge::default()
            .block(
                Block::default()
                    .title_top(self.title())
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_set(border::Set {
                        top_right: symbols::line::ROUNDED.horizontal_down,
                        bottom_right: symbols::line::ROUNDED.horizontal_up,
                        ..symbols::border::ROUNDED
                    }),
            )
            .ratios(self.state.ratio(), self.state.buffered)
            .label(label.to_span().fg(colors::TEXT))
            .played_style(Style::default().bg(colors::PRIMARY))
            .buffered_style(Style::default().bg(colors::BUFFERED))
            .remaining_style(Style::default().bg(colors::BACKGROUND))
            .render(area, buf);
    }
}
