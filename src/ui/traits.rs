use async_trait::async_trait;
use ratatui::crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::{
    catalog::Track,
    event::events::Event,
    ui::{context::AppContext, state::AppState, state::Route},
};

/// What a view asks the app to do after handling a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PlayTrack(Track),
    /// Open a form on top of the current view.
    Push(Route),
    /// Back to the previous view on the stack.
    Back,
    Notify(String),
    /// The key was consumed; nothing else to do.
    None,
}

#[async_trait]
pub trait View: Send {
    async fn on_mount(&mut self, _ctx: &AppContext) {}

    async fn on_event(&mut self, _event: &Event, _ctx: &AppContext) {}

    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext);

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action>;

    /// Bracketed paste; returns whether the text was taken.
    fn on_paste(&mut self, _text: &str) -> bool {
        false
    }
}
