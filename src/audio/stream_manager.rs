use std::{sync::Arc, time::Instant};

use reqwest::Client;
use tracing::{debug, info};

use crate::audio::{cache::SourceCache, error::AudioError, progress::TrackProgress};

/// Downloads track audio, reporting buffered bytes as chunks arrive.
#[derive(Clone)]
pub struct StreamManager {
    http_client: Client,
    cache: SourceCache,
}

impl StreamManager {
    pub fn new(http_client: Client) -> Self {
        Self {
            http_client,
            cache: SourceCache::new(),
        }
    }

    pub async fn fetch(
        &self,
        url: &str,
        progress: &TrackProgress,
    ) -> Result<Arc<[u8]>, AudioError> {
        if let Some(data) = self.cache.get(url) {
            debug!(url, "stream_manager_cache_hit");
            progress.set_total_bytes(data.len() as u64);
            progress.set_buffered_bytes(data.len() as u64);
            return Ok(data);
        }

        let start = Instant::now();
        let mut response = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let total = response.content_length().unwrap_or(0);
        progress.set_total_bytes(total);

        let mut data = Vec::with_capacity(total as usize);
        while let Some(chunk) = response.chunk().await? {
            data.extend_from_slice(&chunk);
            progress.set_buffered_bytes(data.len() as u64);
        }

        if data.is_empty() {
            return Err(AudioError::StreamError(format!("empty response from {url}")));
        }
        if total == 0 {
            progress.set_total_bytes(data.len() as u64);
        }

        info!(
            url,
            bytes = data.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "stream_manager_downloaded"
        );

        let data: Arc<[u8]> = Arc::from(data);
        self.cache.insert(url.to_string(), data.clone());
        Ok(data)
    }
}
