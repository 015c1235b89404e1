pub mod heuristics;
pub mod item;
pub mod metadata;
pub mod pipeline;

use std::path::Path;

use async_trait::async_trait;

use crate::http::{error::ApiError, models::UploadedTrack};

pub use item::{UploadId, UploadItem, UploadStatus};
pub use metadata::{MetadataExtractor, TrackMetadata, UploadMetadata};
pub use pipeline::{UploadQueue, UploadStats, UploadSummary};

#[async_trait]
pub trait TrackUploader: Send + Sync {
    async fn upload_track(
        &self,
        path: &Path,
        metadata: &UploadMetadata,
    ) -> Result<UploadedTrack, ApiError>;
}
