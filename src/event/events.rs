use crate::{
    catalog::Track,
    upload::{UploadId, UploadStatus, UploadSummary},
};

#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Event {
    // Catalog
    CatalogLoaded(usize),
    CatalogFailed(String),
    FavoritesLoaded(usize),

    // Playback
    TrackStarted(Track),
    TrackEnded,
    PlaybackFailed { track_id: String, message: String },

    // Session
    LoginSucceeded(String),
    LoginFailed(String),
    SignupSucceeded,
    SignupFailed(String),
    FavoriteSyncFailed { track_id: String, message: String },

    // Uploads
    FilesStaged(usize),
    MetadataExtracted(UploadId),
    UploadStatusChanged { id: UploadId, status: UploadStatus },
    UploadFinished(UploadSummary),
}
