use std::time::Duration;

use thiserror::Error;

use crate::audio::config::AudioConfig;

pub const ENDPOINT_ENV: &str = "CLOUDTUNE_ENDPOINT";
pub const UPLOAD_ENDPOINT_ENV: &str = "CLOUDTUNE_UPLOAD_ENDPOINT";

const DEFAULT_ENDPOINT: &str = "https://docker-python-server.onrender.com";
const DEFAULT_UPLOAD_ENDPOINT: &str = "https://python-server-pearl.vercel.app";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} cannot be empty")]
    EmptyEndpoint { name: &'static str },

    #[error("{name} must start with http:// or https:// (got {value})")]
    InvalidScheme { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub progress_tick: Duration,
    /// Synthetic progress never passes this value before the server answers.
    pub progress_cap: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            progress_tick: Duration::from_millis(500),
            progress_cap: 90,
        }
    }
}

/// Runtime configuration, resolved once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalog, account and favourites API.
    pub endpoint: String,
    /// Base URL of the upload API. Deployed separately from `endpoint`.
    pub upload_endpoint: String,
    pub audio: AudioConfig,
    pub upload: UploadConfig,
}

impl Config {
    pub fn new(endpoint: &str, upload_endpoint: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: normalize_endpoint(ENDPOINT_ENV, endpoint)?,
            upload_endpoint: normalize_endpoint(UPLOAD_ENDPOINT_ENV, upload_endpoint)?,
            audio: AudioConfig::default(),
            upload: UploadConfig::default(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint =
            std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let upload_endpoint = std::env::var(UPLOAD_ENDPOINT_ENV)
            .unwrap_or_else(|_| DEFAULT_UPLOAD_ENDPOINT.to_string());

        Self::new(&endpoint, &upload_endpoint)
    }
}

fn normalize_endpoint(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim().trim_end_matches('/');
    if value.is_empty() {
        return Err(ConfigError::EmptyEndpoint { name });
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::InvalidScheme {
            name,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = Config::new("https://api.example.com/", "http://localhost:8000//").unwrap();
        assert_eq!(config.endpoint, "https://api.example.com");
        assert_eq!(config.upload_endpoint, "http://localhost:8000");
    }

    #[test]
    fn empty_endpoint_rejected() {
        let err = Config::new("  ", "https://up.example.com").unwrap_err();
        assert_eq!(err, ConfigError::EmptyEndpoint { name: ENDPOINT_ENV });
    }

    #[test]
    fn endpoint_without_scheme_rejected() {
        let err = Config::new("https://api.example.com", "ftp://up.example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScheme { name, .. } if name == UPLOAD_ENDPOINT_ENV));
    }

    #[test]
    fn defaults_match_upload_contract() {
        let config = Config::new("https://a.example.com", "https://b.example.com").unwrap();
        assert_eq!(config.upload.progress_cap, 90);
        assert_eq!(config.upload.progress_tick, Duration::from_millis(500));
        assert_eq!(config.audio.volume, 1.0);
    }
}
