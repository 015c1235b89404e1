use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use chrono::{Datelike, Local};
use rodio::{Decoder, Source};
use serde::Serialize;
use tracing::debug;

use super::heuristics::{
    UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_GENRE, artist_from_filename, format_from_filename,
    genre_from_filename, title_from_filename,
};
use crate::audio::error::AudioError;

/// Best-effort description of a local audio file, serialized in the
/// camelCase shape the upload endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMetadata {
    /// Whole seconds, 0 when the file could not be probed.
    pub duration: u64,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub album: String,
    /// Year of the upload; files carry no release date we can read.
    pub year: i32,
    pub file_size: u64,
    pub format: String,
    pub bit_rate: Option<u32>,
    pub sample_rate: Option<u32>,
}

impl TrackMetadata {
    pub fn from_filename(filename: &str, file_size: u64, duration: Duration) -> Self {
        Self {
            duration: duration.as_secs_f64().round() as u64,
            title: title_from_filename(filename),
            artist: artist_from_filename(filename).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            genre: genre_from_filename(filename).unwrap_or_else(|| UNKNOWN_GENRE.to_string()),
            album: UNKNOWN_ALBUM.to_string(),
            year: Local::now().year(),
            file_size,
            format: format_from_filename(filename),
            bit_rate: None,
            sample_rate: None,
        }
    }
}

/// Metadata part of the multipart upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    #[serde(flatten)]
    pub track: TrackMetadata,
    pub original_filename: String,
}

/// Reads the playable length of a local file.
pub trait DurationProbe: Send + Sync {
    fn probe(&self, path: &Path) -> Result<Duration, AudioError>;
}

/// Probes by opening the file with the playback decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecoderProbe;

impl DurationProbe for DecoderProbe {
    fn probe(&self, path: &Path) -> Result<Duration, AudioError> {
        let file = File::open(path).map_err(|e| AudioError::DecodingError(e.to_string()))?;
        let decoder = Decoder::new(BufReader::new(file))?;
        decoder
            .total_duration()
            .ok_or_else(|| AudioError::DecodingError("duration unavailable".to_string()))
    }
}

#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Never fails: anything that cannot be determined gets a default.
    async fn extract(&self, path: &Path, file_size: u64) -> TrackMetadata;
}

pub struct FilenameExtractor {
    probe: Arc<dyn DurationProbe>,
}

impl FilenameExtractor {
    pub fn new(probe: Arc<dyn DurationProbe>) -> Self {
        Self { probe }
    }
}

impl Default for FilenameExtractor {
    fn default() -> Self {
        Self::new(Arc::new(DecoderProbe))
    }
}

#[async_trait]
impl MetadataExtractor for FilenameExtractor {
    async fn extract(&self, path: &Path, file_size: u64) -> TrackMetadata {
        let probe = self.probe.clone();
        let owned: PathBuf = path.to_path_buf();

        let duration = match tokio::task::spawn_blocking(move || probe.probe(&owned)).await {
            Ok(Ok(duration)) => duration,
            Ok(Err(e)) => {
                debug!(path = %path.display(), error = %e, "duration_probe_failed");
                Duration::ZERO
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "duration_probe_aborted");
                Duration::ZERO
            }
        };

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        TrackMetadata::from_filename(&filename, file_size, duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct FixedProbe(Option<Duration>);

    impl DurationProbe for FixedProbe {
        fn probe(&self, _path: &Path) -> Result<Duration, AudioError> {
            self.0
                .ok_or_else(|| AudioError::DecodingError("unreadable".into()))
        }
    }

    #[tokio::test]
    async fn artist_and_title_from_dash_filename() {
        let extractor = FilenameExtractor::new(Arc::new(FixedProbe(Some(
            Duration::from_millis(200_600),
        ))));
        let meta = extractor
            .extract(Path::new("/tmp/Artist - Song.mp3"), 4_000_000)
            .await;

        assert_eq!(meta.artist, "Artist");
        assert_eq!(meta.title, "Artist Song");
        assert_eq!(meta.duration, 201);
        assert_eq!(meta.format, "mp3");
        assert_eq!(meta.album, "Unknown Album");
        assert_eq!(meta.genre, "Unknown Genre");
        assert_eq!(meta.file_size, 4_000_000);
    }

    #[tokio::test]
    async fn genre_keyword_is_detected() {
        let extractor = FilenameExtractor::new(Arc::new(FixedProbe(Some(Duration::ZERO))));
        let meta = extractor.extract(Path::new("my_rock_track.wav"), 10).await;
        assert_eq!(meta.genre, "Rock");
        assert_eq!(meta.artist, "Unknown Artist");
        assert_eq!(meta.format, "wav");
    }

    #[tokio::test]
    async fn unreadable_audio_gets_zero_duration() {
        let mut file = tempfile::Builder::new()
            .suffix(".mp3")
            .tempfile()
            .unwrap();
        file.write_all(b"definitely not an mp3 frame").unwrap();

        let extractor = FilenameExtractor::default();
        let meta = extractor.extract(file.path(), 27).await;
        assert_eq!(meta.duration, 0);
        assert_eq!(meta.format, "mp3");
    }

    #[test]
    fn upload_metadata_serializes_camel_case() {
        let meta = UploadMetadata {
            track: TrackMetadata::from_filename("Artist - Song.mp3", 12, Duration::from_secs(3)),
            original_filename: "Artist - Song.mp3".into(),
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["originalFilename"], "Artist - Song.mp3");
        assert_eq!(json["fileSize"], 12);
        assert_eq!(json["duration"], 3);
        assert_eq!(json["year"], Local::now().year());
        assert!(json["bitRate"].is_null());
        assert!(json["sampleRate"].is_null());
    }
}
