pub mod search;
pub mod track;

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::http::error::ApiError;

pub use track::Track;

/// Where catalog records come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_tracks(&self) -> Result<Vec<Track>, ApiError>;
}

/// Ordered, shared track list. Cloning shares the same storage.
#[derive(Clone, Default)]
pub struct Catalog {
    tracks: Arc<ArcSwap<Vec<Track>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        let catalog = Self::new();
        catalog.replace(tracks);
        catalog
    }

    pub fn replace(&self, tracks: Vec<Track>) {
        self.tracks.store(Arc::new(tracks));
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
    }

    pub fn tracks(&self) -> Arc<Vec<Track>> {
        self.tracks.load_full()
    }

    pub fn len(&self) -> usize {
        self.tracks.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.load().is_empty()
    }

    pub fn search(&self, query: &str) -> Vec<Track> {
        search::filter_tracks(&self.tracks.load(), query)
    }
}

/// Fetches the catalog from a [`CatalogSource`] into a [`Catalog`].
///
/// A load never retries. It replaces the catalog on success and empties it on
/// failure.
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    catalog: Catalog,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>, catalog: Catalog) -> Self {
        Self { source, catalog }
    }

    pub async fn load(&self) -> Result<usize, ApiError> {
        match self.source.fetch_tracks().await {
            Ok(tracks) => {
                let count = tracks.len();
                self.catalog.replace(tracks);
                info!(count, "catalog_loaded");
                Ok(count)
            }
            Err(e) => {
                self.catalog.clear();
                warn!(error = %e, "catalog_load_failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    fn track(id: &str) -> Track {
        Track {
            id: id.into(),
            title: format!("Track {id}"),
            artist: "Artist".into(),
            genre: "Pop".into(),
            album: None,
            duration: Duration::from_secs(120),
            url: format!("https://cdn.example.com/{id}.mp3"),
            thumbnail: track::DEFAULT_THUMBNAIL.into(),
            format: Some("mp3".into()),
        }
    }

    struct ScriptedSource {
        responses: Mutex<Vec<Result<Vec<Track>, ApiError>>>,
    }

    #[async_trait]
    impl CatalogSource for ScriptedSource {
        async fn fetch_tracks(&self) -> Result<Vec<Track>, ApiError> {
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn loader(responses: Vec<Result<Vec<Track>, ApiError>>) -> (CatalogLoader, Catalog) {
        let catalog = Catalog::new();
        let loader = CatalogLoader::new(
            Arc::new(ScriptedSource {
                responses: Mutex::new(responses),
            }),
            catalog.clone(),
        );
        (loader, catalog)
    }

    #[tokio::test]
    async fn repeated_loads_replace_instead_of_append() {
        let (loader, catalog) = loader(vec![
            Ok(vec![track("a"), track("b")]),
            Ok(vec![track("c")]),
        ]);

        assert_eq!(loader.load().await.unwrap(), 2);
        assert_eq!(loader.load().await.unwrap(), 1);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tracks()[0].id, "c");
    }

    #[tokio::test]
    async fn failed_load_leaves_catalog_empty() {
        let (loader, catalog) = loader(vec![
            Ok(vec![track("a")]),
            Err(ApiError::Server {
                status: 503,
                message: "unavailable".into(),
            }),
        ]);

        loader.load().await.unwrap();
        assert!(loader.load().await.is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn clones_share_storage() {
        let catalog = Catalog::new();
        let view = catalog.clone();
        catalog.replace(vec![track("x"), track("y")]);
        assert_eq!(view.len(), 2);
        assert_eq!(view.tracks()[1].id, "y");
    }
}
