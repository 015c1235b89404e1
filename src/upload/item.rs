use std::{fmt, path::Path, path::PathBuf};

use uuid::Uuid;

use super::metadata::TrackMetadata;

/// Locally generated identity of a staged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Error,
}

impl UploadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Completed => "completed",
            UploadStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadItem {
    pub id: UploadId,
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub status: UploadStatus,
    /// 0..=100
    pub progress: u8,
    pub metadata: Option<TrackMetadata>,
    pub server_id: Option<String>,
    pub media_url: Option<String>,
    pub error: Option<String>,
}

impl UploadItem {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            id: UploadId::new(),
            path,
            name,
            size,
            status: UploadStatus::Pending,
            progress: 0,
            metadata: None,
            server_id: None,
            media_url: None,
            error: None,
        }
    }

    /// Pending with metadata extracted.
    pub fn is_ready(&self) -> bool {
        self.status == UploadStatus::Pending && self.metadata.is_some()
    }
}

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "m4a", "ogg", "opus"];

pub fn audio_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp3" => Some("audio/mpeg"),
        "flac" => Some("audio/flac"),
        "ogg" => Some("audio/ogg"),
        "opus" => Some("audio/opus"),
        "wav" => Some("audio/wav"),
        "m4a" | "aac" => Some("audio/mp4"),
        _ => None,
    }
}

pub fn is_audio_file(path: &Path) -> bool {
    audio_mime_type(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_pending_without_metadata() {
        let item = UploadItem::new(PathBuf::from("/music/Artist - Song.mp3"), 2048);
        assert_eq!(item.name, "Artist - Song.mp3");
        assert_eq!(item.status, UploadStatus::Pending);
        assert_eq!(item.progress, 0);
        assert!(!item.is_ready());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(UploadId::new(), UploadId::new());
    }

    #[test]
    fn mime_types() {
        assert_eq!(audio_mime_type(Path::new("a.MP3")), Some("audio/mpeg"));
        assert_eq!(audio_mime_type(Path::new("a.m4a")), Some("audio/mp4"));
        assert_eq!(audio_mime_type(Path::new("cover.jpg")), None);
        assert!(!is_audio_file(Path::new("README")));
        assert_eq!(AUDIO_EXTENSIONS.len(), 7);
    }
}
