use std::time::Duration;

use crate::http::models::{TrackRecord, UploadedTrack};

pub const DEFAULT_THUMBNAIL: &str = "music.png";

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_GENRE: &str = "Unknown Genre";

/// A playable catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub album: Option<String>,
    pub duration: Duration,
    pub url: String,
    pub thumbnail: String,
    pub format: Option<String>,
}

impl Track {
    pub fn is_same(&self, other: &Track) -> bool {
        self.id == other.id
    }

    /// Haystack used by catalog search.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.artist, self.genre)
    }
}

impl From<TrackRecord> for Track {
    fn from(record: TrackRecord) -> Self {
        let format = record
            .format
            .map(|f| f.to_lowercase())
            .or_else(|| format_from_url(&record.cloudinary_url));

        Self {
            id: record.id,
            title: non_empty_or(record.title, UNKNOWN_TITLE),
            artist: non_empty_or(record.artist, UNKNOWN_ARTIST),
            genre: non_empty_or(record.genre, UNKNOWN_GENRE),
            album: record.album.filter(|a| !a.trim().is_empty()),
            duration: seconds(record.duration),
            thumbnail: record
                .thumbnail
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string()),
            format,
            url: record.cloudinary_url,
        }
    }
}

impl From<UploadedTrack> for Track {
    fn from(uploaded: UploadedTrack) -> Self {
        Self {
            format: format_from_url(&uploaded.cloudinary_url),
            id: uploaded.id,
            title: non_empty_or(Some(uploaded.title), UNKNOWN_TITLE),
            artist: non_empty_or(Some(uploaded.artist), UNKNOWN_ARTIST),
            genre: non_empty_or(Some(uploaded.genre), UNKNOWN_GENRE),
            album: uploaded.album,
            duration: seconds(uploaded.duration),
            url: uploaded.cloudinary_url,
            thumbnail: DEFAULT_THUMBNAIL.to_string(),
        }
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub(crate) fn seconds(value: Option<f64>) -> Duration {
    match value {
        Some(secs) if secs.is_finite() && secs > 0.0 => Duration::from_secs_f64(secs),
        _ => Duration::ZERO,
    }
}

fn format_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 5 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TrackRecord {
        TrackRecord {
            id: "665f0c".into(),
            cloudinary_url: "https://res.cloudinary.com/demo/video/upload/v1/song.MP3?x=1".into(),
            title: Some("Blue Train".into()),
            artist: Some("John Coltrane".into()),
            genre: Some("Jazz".into()),
            album: None,
            duration: Some(643.4),
            format: None,
            thumbnail: None,
        }
    }

    #[test]
    fn record_is_normalized() {
        let track = Track::from(record());
        assert_eq!(track.id, "665f0c");
        assert_eq!(track.url, "https://res.cloudinary.com/demo/video/upload/v1/song.MP3?x=1");
        assert_eq!(track.thumbnail, DEFAULT_THUMBNAIL);
        assert_eq!(track.format.as_deref(), Some("mp3"));
        assert_eq!(track.duration, Duration::from_secs_f64(643.4));
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let mut r = record();
        r.title = Some("   ".into());
        r.artist = None;
        r.duration = Some(f64::NAN);
        let track = Track::from(r);
        assert_eq!(track.title, UNKNOWN_TITLE);
        assert_eq!(track.artist, UNKNOWN_ARTIST);
        assert_eq!(track.duration, Duration::ZERO);
    }

    #[test]
    fn negative_duration_is_zero() {
        assert_eq!(seconds(Some(-3.0)), Duration::ZERO);
        assert_eq!(seconds(None), Duration::ZERO);
    }

    #[test]
    fn url_without_extension_has_no_format() {
        assert_eq!(format_from_url("https://cdn.example.com/stream/1234"), None);
        assert_eq!(format_from_url("https://cdn.example.com/a.flac").as_deref(), Some("flac"));
    }
}
