use std::sync::Arc;

use flume::Receiver;
use tracing::info;

use crate::{
    audio::{PlaybackController, playback::PlaybackEngine, stream_manager::StreamManager},
    catalog::{Catalog, CatalogLoader},
    config::Config,
    event::events::Event,
    http::ApiService,
    session::SessionStore,
    upload::{UploadQueue, metadata::FilenameExtractor},
    util::task::TaskManager,
};

use super::{
    context::AppContext,
    layout::AppLayout,
    message::AppMessage,
    router::Router,
    state::{AppState, NoticeLevel, Route},
    tui::{self, TerminalEvent},
    util::handler::EventHandler,
};

pub struct App {
    pub ctx: AppContext,
    pub router: Router,
    pub state: AppState,
    pub event_rx: Receiver<Event>,
    pub task_manager: TaskManager,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub async fn new(config: Config) -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();
        let api = Arc::new(ApiService::new(&config)?);
        let catalog = Catalog::new();

        let engine = PlaybackEngine::new(StreamManager::new(api.http_client()))?;
        let player = Arc::new(PlaybackController::new(
            Arc::new(engine),
            catalog.clone(),
            config.audio.clone(),
            event_tx.clone(),
        ));
        let session = SessionStore::new(api.clone(), event_tx.clone());
        let uploads = UploadQueue::new(
            Arc::new(FilenameExtractor::default()),
            api.clone(),
            config.upload.clone(),
            event_tx.clone(),
        );

        info!(endpoint = %config.endpoint, upload_endpoint = %config.upload_endpoint, "app_starting");

        Ok(Self {
            ctx: AppContext {
                api,
                catalog,
                player,
                session,
                uploads,
                event_tx,
            },
            router: Router::new(Route::Login),
            state: AppState::default(),
            event_rx,
            task_manager: TaskManager::new(),
            has_focus: true,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        EventHandler::handle_event(self, TerminalEvent::Init, &mut tui).await?;
        while !self.should_quit {
            tui.draw(|f| {
                let area = f.area();
                AppLayout::new(self).render(f, area);
            })?;

            while !EventHandler::handle_events(self, &mut tui).await? {
                if self.should_quit {
                    break;
                }
            }
        }

        self.task_manager.abort_all();
        self.ctx.player.reset();
        tui.exit()?;
        info!("app_stopped");
        Ok(())
    }

    /// Mounts the first view and starts the catalog download.
    pub async fn init(&mut self) {
        if let Some(view) = self.router.active_view_mut() {
            view.on_mount(&self.ctx).await;
        }
        self.state.ui.current_route = self.router.route();
        self.load_catalog();
    }

    /// Fetches the catalog, then the favourites when someone is logged in.
    /// A reload replaces one still in flight.
    pub fn load_catalog(&mut self) {
        self.state.ui.catalog_loading = true;

        let loader = CatalogLoader::new(self.ctx.api.clone(), self.ctx.catalog.clone());
        let session = self.ctx.session.clone();
        let tx = self.ctx.event_tx.clone();

        self.task_manager.spawn(
            "catalog",
            tokio::spawn(async move {
                match loader.load().await {
                    Ok(count) => {
                        let _ = tx.send(Event::CatalogLoaded(count));
                        if session.is_logged_in()
                            && let Ok(count) = session.refresh_favorites().await
                        {
                            let _ = tx.send(Event::FavoritesLoaded(count));
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Event::CatalogFailed(e.user_message()));
                    }
                }
            }),
        );
    }

    /// Replaces the view stack. Login-only routes bounce to the login form,
    /// and crossing between player and admin surfaces stops playback.
    pub async fn navigate(&mut self, route: Route) {
        let target = if route.requires_login() && !self.ctx.session.is_logged_in() {
            self.state
                .ui
                .notify("Please log in first", NoticeLevel::Info);
            Route::Login
        } else {
            route
        };

        let current = self.router.route();
        if target == current && self.router.stack.len() == 1 {
            return;
        }
        if current.surface() != target.surface() {
            self.ctx.player.reset();
        }

        self.router.replace_all(target, &self.ctx).await;
        self.state.ui.current_route = target;
    }

    async fn cycle_surface(&mut self, forward: bool) {
        let logged_in = self.ctx.session.is_logged_in();
        let mut route = self.router.route();
        for _ in 0..Route::TABS.len() {
            route = route.cycle(forward);
            if logged_in || !route.requires_login() {
                break;
            }
        }
        self.navigate(route).await;
    }

    pub async fn logout(&mut self) {
        if !self.ctx.session.is_logged_in() {
            return;
        }
        self.ctx.session.logout();
        self.ctx.player.reset();
        self.router.replace_all(Route::Login, &self.ctx).await;
        self.state.ui.current_route = Route::Login;
        self.state.ui.notify("Logged out", NoticeLevel::Info);
    }

    pub async fn update(&mut self, msg: AppMessage) {
        let player = &self.ctx.player;
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::Logout => self.logout().await,

            AppMessage::TogglePlayPause => player.toggle_play_pause(),
            AppMessage::NextTrack => player.next(),
            AppMessage::PreviousTrack => player.previous(),
            AppMessage::VolumeUp => player.volume_up(),
            AppMessage::VolumeDown => player.volume_down(),
            AppMessage::ToggleMute => {
                player.toggle_mute();
            }
            AppMessage::SeekForward => player.seek_relative(player.seek_step()),
            AppMessage::SeekBackward => player.seek_relative(-player.seek_step()),
            AppMessage::SeekToTenth(tenth) => player.seek_to(f64::from(tenth) / 10.0),
            AppMessage::ToggleShuffle => {
                let on = player.toggle_shuffle();
                let text = if on { "Shuffle on" } else { "Shuffle off" };
                self.state.ui.notify(text, NoticeLevel::Info);
            }
            AppMessage::ToggleRepeat => {
                let mode = player.cycle_repeat_mode();
                self.state
                    .ui
                    .notify(format!("Repeat {}", mode.label()), NoticeLevel::Info);
            }

            AppMessage::NextSurface => self.cycle_surface(true).await,
            AppMessage::PreviousSurface => self.cycle_surface(false).await,
        }
    }
}
