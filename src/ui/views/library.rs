use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
};

use crate::{
    catalog::Track,
    event::events::Event,
    ui::{
        components::{spinner::Spinner, text_input::TextInput, track_list::TrackList},
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
    util::colors,
};

/// Whole catalog with incremental search.
#[derive(Default)]
pub struct Library {
    search: TextInput,
    is_editing: bool,
    results: Vec<Track>,
    list: TrackList,
    /// Set when the query changed outside `handle_input`.
    stale: bool,
}

impl Library {
    fn refresh(&mut self, ctx: &AppContext) {
        self.results = ctx.catalog.search(self.search.value());
        self.list.clamp(self.results.len());
        self.stale = false;
    }
}

#[async_trait]
impl View for Library {
    async fn on_mount(&mut self, ctx: &AppContext) {
        self.refresh(ctx);
    }

    async fn on_event(&mut self, event: &Event, ctx: &AppContext) {
        if matches!(event, Event::CatalogLoaded(_) | Event::CatalogFailed(_)) {
            self.refresh(ctx);
        }
    }

    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        if self.stale {
            self.refresh(ctx);
        }

        f.render_widget(self.search.widget("Search (/)", self.is_editing), chunks[0]);

        if state.ui.catalog_loading && self.results.is_empty() {
            let spinner = Spinner::default()
                .with_style(Style::default().fg(colors::PRIMARY))
                .with_label("Loading tracks...");
            f.render_widget(spinner, chunks[1]);
            return;
        }

        let title = format!(" {} of {} tracks ", self.results.len(), ctx.catalog.len());
        let empty = if self.search.value().is_empty() {
            "No tracks available"
        } else {
            "No tracks match your search"
        };
        self.list
            .render(f, chunks[1], &title, &self.results, empty, ctx);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        if self.is_editing {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => {
                    self.is_editing = false;
                    Some(Action::None)
                }
                KeyCode::Up | KeyCode::Down => {
                    self.is_editing = false;
                    self.handle_input(key, state, ctx).await
                }
                _ if self.search.handle_key(key) => {
                    self.refresh(ctx);
                    Some(Action::None)
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('/') => {
                self.is_editing = true;
                Some(Action::None)
            }
            KeyCode::Esc if !self.search.value().is_empty() => {
                self.search.clear();
                self.refresh(ctx);
                Some(Action::None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.select_next(self.results.len());
                Some(Action::None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.select_previous(self.results.len());
                Some(Action::None)
            }
            KeyCode::Enter => self
                .list
                .selected(&self.results)
                .cloned()
                .map(Action::PlayTrack),
            KeyCode::Char('f') => {
                let track = self.list.selected(&self.results)?;
                let added = ctx.session.toggle_favorite(&track.id);
                let verb = if added { "Added to" } else { "Removed from" };
                Some(Action::Notify(format!("{verb} favourites: {}", track.title)))
            }
            _ => None,
        }
    }

    fn on_paste(&mut self, text: &str) -> bool {
        self.is_editing = true;
        self.search.insert_str(text);
        self.stale = true;
        true
    }
}
