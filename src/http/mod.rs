pub mod error;
pub mod models;

use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    catalog::{CatalogSource, Track},
    config::Config,
    session::SessionRemote,
    upload::{TrackUploader, UploadMetadata, item::audio_mime_type},
};
use error::ApiError;
use models::{
    CreateUserRequest, FavouriteUpdate, FavouritesResponse, LoginRequest, StatusResponse,
    TrackRecord, UploadedTrack, error_detail,
};

const UPLOAD_FAILED: &str = "Upload failed";

/// Client for the catalog/account API and the separately deployed upload API.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    endpoint: String,
    upload_endpoint: String,
}

impl ApiService {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            upload_endpoint: config.upload_endpoint.clone(),
        }
    }

    /// Shared connection pool, also used for audio downloads.
    pub fn http_client(&self) -> Client {
        self.client.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub async fn fetch_music_data(&self) -> Result<Vec<TrackRecord>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/get/music_data"))
            .send()
            .await?;
        let records: Vec<TrackRecord> = parse_json(response, "Failed to fetch tracks").await?;
        debug!(count = records.len(), "music_data_fetched");
        Ok(records)
    }

    pub async fn upload_music(
        &self,
        path: &Path,
        metadata: &UploadMetadata,
    ) -> Result<UploadedTrack, ApiError> {
        if !path.is_file() {
            return Err(ApiError::FileNotFound(path.display().to_string()));
        }

        let contents = tokio::fs::read(path).await?;
        let size = contents.len();
        let file_part = Part::bytes(contents)
            .file_name(metadata.original_filename.clone())
            .mime_str(audio_mime_type(path).unwrap_or("application/octet-stream"))?;
        let metadata_json =
            serde_json::to_string(metadata).map_err(|e| ApiError::Parse(e.to_string()))?;

        let form = Form::new()
            .part("audio_file", file_part)
            .text("metadata", metadata_json);

        let response = self
            .client
            .post(format!("{}/api/upload/music", self.upload_endpoint))
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadedTrack = parse_json(response, UPLOAD_FAILED).await?;
        info!(
            id = %uploaded.id,
            file = %metadata.original_filename,
            size,
            "track_uploaded"
        );
        Ok(uploaded)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<StatusResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/api/music-web-app/login/user"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        parse_status(response).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<StatusResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/api/music-web-app/create/user"))
            .json(&CreateUserRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;
        parse_status(response).await
    }

    pub async fn fetch_favourites(&self, email: &str) -> Result<Vec<String>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/music-web-app/fetch/favourite/user/song/"))
            .query(&[("email", email)])
            .send()
            .await?;
        let favourites: FavouritesResponse =
            parse_json(response, "Failed to fetch favourites").await?;
        Ok(favourites.data)
    }

    pub async fn update_favourite(&self, email: &str, song_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/api/music-web-app/update/favourite/user/song/"))
            .json(&FavouriteUpdate { email, song_id })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(ApiError::Server {
            status: status.as_u16(),
            message: error_detail(&body).unwrap_or_else(|| "Failed to update favourite".into()),
        })
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: error_detail(&body).unwrap_or_else(|| fallback.to_string()),
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Account endpoints answer `{Status, Message}`, sometimes with an error
/// status code; the body wins whenever it parses.
async fn parse_status(response: Response) -> Result<StatusResponse, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<StatusResponse>(&body) {
        Ok(parsed) => Ok(parsed),
        Err(_) if !status.is_success() => Err(ApiError::Server {
            status: status.as_u16(),
            message: error_detail(&body).unwrap_or_else(|| status.to_string()),
        }),
        Err(e) => Err(ApiError::Parse(e.to_string())),
    }
}

#[async_trait]
impl CatalogSource for ApiService {
    async fn fetch_tracks(&self) -> Result<Vec<Track>, ApiError> {
        Ok(self
            .fetch_music_data()
            .await?
            .into_iter()
            .map(Track::from)
            .collect())
    }
}

#[async_trait]
impl TrackUploader for ApiService {
    async fn upload_track(
        &self,
        path: &Path,
        metadata: &UploadMetadata,
    ) -> Result<UploadedTrack, ApiError> {
        self.upload_music(path, metadata).await
    }
}

#[async_trait]
impl SessionRemote for ApiService {
    async fn login(&self, email: &str, password: &str) -> Result<StatusResponse, ApiError> {
        ApiService::login(self, email, password).await
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<StatusResponse, ApiError> {
        ApiService::create_user(self, username, email, password).await
    }

    async fn fetch_favourites(&self, email: &str) -> Result<Vec<String>, ApiError> {
        ApiService::fetch_favourites(self, email).await
    }

    async fn update_favourite(&self, email: &str, song_id: &str) -> Result<(), ApiError> {
        ApiService::update_favourite(self, email, song_id).await
    }
}
