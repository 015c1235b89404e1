pub mod error;
pub mod store;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::http::{error::ApiError, models::StatusResponse};

pub use error::{AuthError, ValidationError};
pub use store::SessionStore;

/// In-memory login state. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user_email: Option<String>,
    pub logged_in: bool,
    pub favorites: HashSet<String>,
}

impl Session {
    pub fn is_favorite(&self, track_id: &str) -> bool {
        self.favorites.contains(track_id)
    }
}

/// Account and favourites endpoints.
#[async_trait]
pub trait SessionRemote: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<StatusResponse, ApiError>;

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<StatusResponse, ApiError>;

    async fn fetch_favourites(&self, email: &str) -> Result<Vec<String>, ApiError>;

    /// Flips membership server-side.
    async fn update_favourite(&self, email: &str, song_id: &str) -> Result<(), ApiError>;
}
