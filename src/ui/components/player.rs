use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
};

use crate::{
    audio::PlaybackState,
    ui::components::{controls::PlayerControlsWidget, progress::ProgressWidget},
};

/// Bottom bar shown on every surface.
pub struct PlayerWidget<'a> {
    state: &'a PlaybackState,
}

impl<'a> PlayerWidget<'a> {
    pub fn new(state: &'a PlaybackState) -> Self {
        Self { state }
    }
}

impl Widget for PlayerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(21)])
            .split(area);

        ProgressWidget::new(self.state).render(layout[0], buf);
        PlayerControlsWidget::new(
            self.state.repeat_mode,
            self.state.shuffled,
            self.state.volume,
            self.state.muted,
        )
        .render(layout[1], buf);
    }
}
