use crate::event::events::Event;
use crate::ui::context::AppContext;
use crate::ui::state::{AppState, Route};
use crate::ui::traits::{Action, View};
use crate::ui::views;
use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;

/// View stack. Surfaces replace the whole stack; forms like signup are
/// pushed on top and popped on the way back.
pub struct Router {
    pub stack: Vec<(Route, Box<dyn View>)>,
}

impl Router {
    pub fn new(route: Route) -> Self {
        Self {
            stack: vec![(route, views::create(route))],
        }
    }

    pub fn route(&self) -> Route {
        self.stack.last().map(|(r, _)| *r).unwrap_or_default()
    }

    pub async fn push(&mut self, route: Route, ctx: &AppContext) {
        let mut view = views::create(route);
        view.on_mount(ctx).await;
        self.stack.push((route, view));
    }

    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub async fn replace_all(&mut self, route: Route, ctx: &AppContext) {
        self.stack.clear();
        self.push(route, ctx).await;
    }

    pub fn active_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
        self.stack.last_mut().map(|(_, v)| v)
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        if let Some(view) = self.active_view_mut() {
            view.render(f, area, state, ctx);
        }
    }

    pub async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        match self.active_view_mut() {
            Some(view) => view.handle_input(key, state, ctx).await,
            None => None,
        }
    }

    pub fn paste(&mut self, text: &str) -> bool {
        self.active_view_mut().is_some_and(|v| v.on_paste(text))
    }

    pub async fn on_event(&mut self, event: &Event, ctx: &AppContext) {
        for (_, view) in &mut self.stack {
            view.on_event(event, ctx).await;
        }
    }
}
