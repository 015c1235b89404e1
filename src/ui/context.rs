use std::sync::Arc;

use flume::Sender;

use crate::{
    audio::PlaybackController, catalog::Catalog, event::events::Event, http::ApiService,
    session::SessionStore, upload::UploadQueue,
};

/// Everything views may touch, passed by reference.
pub struct AppContext {
    pub api: Arc<ApiService>,
    pub catalog: Catalog,
    pub player: Arc<PlaybackController>,
    pub session: SessionStore,
    pub uploads: UploadQueue,
    pub event_tx: Sender<Event>,
}
