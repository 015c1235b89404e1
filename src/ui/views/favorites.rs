use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{Frame, layout::Rect};

use crate::{
    catalog::Track,
    ui::{
        components::track_list::TrackList,
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
};

#[derive(Default)]
pub struct Favorites {
    list: TrackList,
}

/// Catalog tracks in the favourites set, in catalog order.
fn favourite_tracks(ctx: &AppContext) -> Vec<Track> {
    let session = ctx.session.snapshot();
    ctx.catalog
        .tracks()
        .iter()
        .filter(|t| session.is_favorite(&t.id))
        .cloned()
        .collect()
}

#[async_trait]
impl View for Favorites {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState, ctx: &AppContext) {
        let tracks = favourite_tracks(ctx);
        let title = format!(" {} favourites ", tracks.len());
        self.list
            .render(f, area, &title, &tracks, "No favourite songs yet", ctx);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        let tracks = favourite_tracks(ctx);

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.select_next(tracks.len());
                Some(Action::None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.select_previous(tracks.len());
                Some(Action::None)
            }
            KeyCode::Enter => self.list.selected(&tracks).cloned().map(Action::PlayTrack),
            KeyCode::Char('f') => {
                let track = self.list.selected(&tracks)?;
                ctx.session.toggle_favorite(&track.id);
                Some(Action::Notify(format!(
                    "Removed from favourites: {}",
                    track.title
                )))
            }
            _ => None,
        }
    }
}
