use serde::{Deserialize, Serialize};

/// Track record as served by `GET /api/get/music_data`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrackRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub cloudinary_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Successful answer of `POST /api/upload/music`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UploadedTrack {
    pub id: String,
    pub cloudinary_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `{Status, Message}` envelope used by the account endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StatusResponse {
    #[serde(rename = "Status")]
    pub status: bool,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FavouritesResponse {
    #[serde(rename = "Data", default)]
    pub data: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateUserRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct FavouriteUpdate<'a> {
    pub email: &'a str,
    pub song_id: &'a str,
}

/// Pulls a readable message out of an error body. FastAPI sends `detail` either
/// as a string or as a list of validation objects.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::Null => None,
        serde_json::Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_record_tolerates_missing_optional_fields() {
        let record: TrackRecord = serde_json::from_str(
            r#"{"_id":"abc","cloudinary_url":"https://cdn.example.com/a.mp3","title":"A"}"#,
        )
        .unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.title.as_deref(), Some("A"));
        assert!(record.artist.is_none());
        assert!(record.duration.is_none());
    }

    #[test]
    fn status_response_uses_capitalized_keys() {
        let resp: StatusResponse =
            serde_json::from_str(r#"{"Status":false,"Message":"User not found"}"#).unwrap();
        assert!(!resp.status);
        assert_eq!(resp.message.as_deref(), Some("User not found"));
    }

    #[test]
    fn error_detail_handles_string_and_list() {
        assert_eq!(
            error_detail(r#"{"detail":"Unsupported format"}"#).as_deref(),
            Some("Unsupported format")
        );
        let list = error_detail(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert!(list.contains("field required"));
        assert_eq!(error_detail(r#"{"detail":""}"#), None);
        assert_eq!(error_detail("<html>bad gateway</html>"), None);
    }
}
