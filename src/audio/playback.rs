use std::{
    io::Cursor,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::debug;

use crate::audio::{
    error::AudioError,
    progress::TrackProgress,
    stream_manager::StreamManager,
    traits::MediaElement,
    util::{construct_sink, setup_device_config},
};

/// The rodio output: one stream, one sink.
pub struct PlaybackEngine {
    _stream: OutputStream,
    sink: Arc<Sink>,
    streams: StreamManager,
    loaded: AtomicBool,
}

impl PlaybackEngine {
    pub fn new(streams: StreamManager) -> Result<Self, AudioError> {
        let (device, stream_config, sample_format) = setup_device_config()?;
        let (stream, sink) = construct_sink(device, &stream_config, sample_format)?;
        sink.pause();

        Ok(Self {
            _stream: stream,
            sink: Arc::new(sink),
            streams,
            loaded: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl MediaElement for PlaybackEngine {
    async fn load(
        &self,
        url: &str,
        progress: Arc<TrackProgress>,
    ) -> Result<Option<Duration>, AudioError> {
        self.stop();

        let data = self.streams.fetch(url, &progress).await?;
        let decoder = tokio::task::spawn_blocking(move || Decoder::new(Cursor::new(data)))
            .await
            .map_err(|e| AudioError::StreamError(e.to_string()))??;

        let duration = decoder.total_duration();
        debug!(url, ?duration, "decoder_ready");

        self.sink.pause();
        self.sink.append(decoder);
        self.loaded.store(true, Ordering::SeqCst);
        Ok(duration)
    }

    fn play(&self) {
        self.sink.play();
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn stop(&self) {
        self.loaded.store(false, Ordering::SeqCst);
        self.sink.stop();
    }

    fn seek(&self, position: Duration) -> Result<(), AudioError> {
        self.sink
            .try_seek(position)
            .map_err(|e| AudioError::SeekError(e.to_string()))
    }

    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn has_ended(&self) -> bool {
        self.loaded.load(Ordering::SeqCst) && self.sink.empty()
    }
}
