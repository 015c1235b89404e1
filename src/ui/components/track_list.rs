use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    catalog::Track,
    ui::{context::AppContext, util::get_active_track_icon},
    util::{
        colors,
        format::{format_duration, truncate},
    },
};

/// Selectable track rows shared by the library and favourites.
#[derive(Debug, Default)]
pub struct TrackList {
    state: ListState,
}

impl TrackList {
    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn selected<'a>(&self, tracks: &'a [Track]) -> Option<&'a Track> {
        self.state.selected().and_then(|i| tracks.get(i))
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.state.select(None);
            return;
        }
        let next = self.state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.state.select(Some(next));
    }

    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.state.select(None);
            return;
        }
        let previous = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.state.select(Some(previous));
    }

    /// Keeps the selection inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        match (self.state.selected(), len) {
            (_, 0) => self.state.select(None),
            (None, _) => self.state.select(Some(0)),
            (Some(i), len) if i >= len => self.state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        title: &str,
        tracks: &[Track],
        empty_text: &str,
        ctx: &AppContext,
    ) {
        let block = Block::default()
            .borders(Borders::TOP)
            .title(title)
            .border_style(Style::default().fg(colors::NEUTRAL));

        if tracks.is_empty() {
            let empty = Paragraph::new(empty_text)
                .style(Style::default().fg(colors::NEUTRAL))
                .centered()
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        self.clamp(tracks.len());

        let playback = ctx.player.snapshot();
        let current_id = playback.current_track.as_ref().map(|t| t.id.as_str());
        let title_width = (area.width as usize).saturating_sub(32).max(12) / 2;

        let items: Vec<ListItem> = tracks
            .iter()
            .map(|track| {
                let is_current = current_id == Some(track.id.as_str());
                let prefix = if is_current {
                    format!("{} ", get_active_track_icon(playback.is_playing()))
                } else {
                    "  ".to_string()
                };
                let heart = if ctx.session.is_favorite(&track.id) {
                    Span::styled(" ♥", Style::default().fg(colors::FAVORITE))
                } else {
                    Span::raw("  ")
                };

                let line = Line::from(vec![
                    Span::raw(prefix),
                    Span::raw(format!("{:<w$}", truncate(&track.title, title_width), w = title_width)),
                    Span::styled(
                        format!("  {:<w$}", truncate(&track.artist, title_width), w = title_width),
                        Style::default().fg(colors::NEUTRAL),
                    ),
                    Span::styled(
                        format!("  {:>5}", format_duration(track.duration)),
                        Style::default().fg(colors::NEUTRAL),
                    ),
                    heart,
                ]);

                let item = ListItem::new(line);
                if is_current {
                    item.style(
                        Style::default()
                            .fg(colors::SECONDARY)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    item
                }
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_stays_in_bounds() {
        let mut list = TrackList::default();
        list.select_previous(3);
        assert_eq!(list.selected_index(), Some(0));
        list.select_next(3);
        list.select_next(3);
        list.select_next(3);
        assert_eq!(list.selected_index(), Some(2));
        list.clamp(1);
        assert_eq!(list.selected_index(), Some(0));
        list.clamp(0);
        assert_eq!(list.selected_index(), None);
    }
}
