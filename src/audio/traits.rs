use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::audio::{error::AudioError, progress::TrackProgress};

/// The single audio output the controller drives.
///
/// `load` replaces whatever was loaded before and leaves the output paused;
/// the controller decides whether to start it.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Returns the decoded length when the container reports one.
    async fn load(
        &self,
        url: &str,
        progress: Arc<TrackProgress>,
    ) -> Result<Option<Duration>, AudioError>;

    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn seek(&self, position: Duration) -> Result<(), AudioError>;
    fn set_volume(&self, volume: f32);
    fn position(&self) -> Duration;

    /// True once a loaded source has played through.
    fn has_ended(&self) -> bool;
}
