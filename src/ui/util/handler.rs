use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::{
    event::events::Event,
    ui::{
        app::App,
        input::InputHandler,
        state::{NoticeLevel, Route},
        traits::Action,
        tui::{TerminalEvent, Tui},
    },
};

pub struct EventHandler;

impl EventHandler {
    /// Waits for the next terminal event, then drains app events. Returns
    /// whether the screen needs a redraw.
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<bool> {
        let mut should_render = false;
        if let Some(evt) = tui.next().await
            && Self::handle_event(app, evt, tui).await?
        {
            should_render = true;
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_action(app, evt).await;
            should_render = true;
        }

        Ok(should_render)
    }

    pub async fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<bool> {
        match evt {
            TerminalEvent::Init => app.init().await,
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key).await,
            TerminalEvent::Paste(text) => {
                app.router.paste(&text);
            }
            TerminalEvent::Tick => {
                app.state.ui.expire_notice();
                return Ok(app.has_focus);
            }
            TerminalEvent::Resize(..) => {}
        }

        Ok(true)
    }

    pub async fn handle_action(app: &mut App, evt: Event) {
        app.router.on_event(&evt, &app.ctx).await;

        match evt {
            Event::CatalogLoaded(count) => {
                app.state.ui.catalog_loading = false;
                debug!(count, "catalog_ready");
            }
            Event::CatalogFailed(message) => {
                app.state.ui.catalog_loading = false;
                app.state.ui.notify(
                    format!("Failed to load tracks: {message}"),
                    NoticeLevel::Error,
                );
            }
            Event::TrackEnded => app.ctx.player.on_natural_end(),
            Event::PlaybackFailed { message, .. } => {
                app.state
                    .ui
                    .notify(format!("Playback failed: {message}"), NoticeLevel::Error);
            }
            Event::LoginSucceeded(email) => {
                app.state
                    .ui
                    .notify(format!("Logged in as {email}"), NoticeLevel::Info);
                app.navigate(Route::Library).await;
                app.load_catalog();
            }
            Event::SignupSucceeded => {
                if app.router.pop() {
                    app.state.ui.current_route = app.router.route();
                }
                app.state
                    .ui
                    .notify("Account created. Please log in.", NoticeLevel::Info);
            }
            Event::FavoriteSyncFailed { message, .. } => {
                app.state.ui.notify(
                    format!("Could not update favourites: {message}"),
                    NoticeLevel::Error,
                );
            }
            Event::UploadFinished(summary) => {
                if summary.failed > 0 {
                    app.state.ui.notify(
                        format!(
                            "Uploaded {}, failed {}",
                            summary.completed, summary.failed
                        ),
                        NoticeLevel::Error,
                    );
                } else if summary.completed > 0 {
                    app.state.ui.notify(
                        format!("Uploaded {} file(s)", summary.completed),
                        NoticeLevel::Info,
                    );
                }
            }
            Event::FavoritesLoaded(_)
            | Event::TrackStarted(_)
            | Event::LoginFailed(_)
            | Event::SignupFailed(_)
            | Event::FilesStaged(_)
            | Event::MetadataExtracted(_)
            | Event::UploadStatusChanged { .. } => {}
        }
    }

    async fn dispatch_action(app: &mut App, action: Action) {
        match action {
            Action::PlayTrack(track) => app.ctx.player.play(track),
            Action::Push(route) => {
                app.router.push(route, &app.ctx).await;
                app.state.ui.current_route = route;
            }
            Action::Back => {
                if app.router.pop() {
                    app.state.ui.current_route = app.router.route();
                }
            }
            Action::Notify(text) => app.state.ui.notify(text, NoticeLevel::Info),
            Action::None => {}
        }
    }

    /// Quit, logout and surface switching work everywhere, forms included.
    /// Other keys go to the active view first.
    pub async fn handle_key_event(app: &mut App, key: KeyEvent) {
        let always_global = matches!(
            (key.code, key.modifiers),
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
                | (KeyCode::Char('l'), KeyModifiers::CONTROL)
                | (KeyCode::Tab, _)
                | (KeyCode::BackTab, _)
        );

        if !always_global
            && let Some(action) = app.router.handle_input(key, &app.state, &app.ctx).await
        {
            Self::dispatch_action(app, action).await;
            return;
        }

        if let Some(msg) = InputHandler::handle_key(key) {
            app.update(msg).await;
        }
    }
}
