use std::sync::{Arc, Mutex, RwLock};

use flume::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    Session, SessionRemote,
    error::{AuthError, validate_login, validate_signup},
};
use crate::{
    event::events::Event,
    http::error::ApiError,
    util::sync::{lock, read, write},
};

const LOGIN_FAILED: &str = "Login failed.";
const SIGNUP_FAILED: &str = "Signup failed.";

/// Shared session state plus the calls that change it.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
    remote: Arc<dyn SessionRemote>,
    sync_tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    event_tx: Sender<Event>,
}

impl SessionStore {
    pub fn new(remote: Arc<dyn SessionRemote>, event_tx: Sender<Event>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::default())),
            remote,
            sync_tasks: Arc::new(Mutex::new(Vec::new())),
            event_tx,
        }
    }

    pub fn snapshot(&self) -> Session {
        read(&self.session).clone()
    }

    pub fn is_logged_in(&self) -> bool {
        read(&self.session).logged_in
    }

    pub fn user_email(&self) -> Option<String> {
        read(&self.session).user_email.clone()
    }

    pub fn is_favorite(&self, track_id: &str) -> bool {
        read(&self.session).is_favorite(track_id)
    }

    /// Marks `email` as the authenticated user. Favourites start empty until
    /// the server listing arrives.
    pub fn login(&self, email: &str) {
        let mut session = write(&self.session);
        *session = Session {
            user_email: Some(email.to_string()),
            logged_in: true,
            ..Session::default()
        };
        info!(email, "session_login");
    }

    pub fn logout(&self) {
        *write(&self.session) = Session::default();
        info!("session_logout");
    }

    /// Replaces the favourites with a listing fetched for `email`. Returns
    /// false, leaving the session alone, when `email` is no longer the
    /// logged-in user.
    pub fn set_favorites(&self, email: &str, ids: Vec<String>) -> bool {
        let mut session = write(&self.session);
        if !session.logged_in || session.user_email.as_deref() != Some(email) {
            return false;
        }
        session.favorites = ids.into_iter().collect();
        true
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(), AuthError> {
        validate_login(email, password)?;

        match self.remote.login(email, password).await {
            Ok(response) if response.status => {
                self.login(email);
                Ok(())
            }
            Ok(response) => {
                let message = non_empty(response.message).unwrap_or_else(|| LOGIN_FAILED.into());
                debug!(email, %message, "login_rejected");
                Err(AuthError::Rejected(message))
            }
            Err(e) => {
                warn!(error = %e, "login_request_failed");
                Err(AuthError::Transport(e))
            }
        }
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<(), AuthError> {
        validate_signup(username, email, password)?;

        match self.remote.create_user(username, email, password).await {
            Ok(response) if response.status => {
                info!(email, "account_created");
                Ok(())
            }
            Ok(response) => Err(AuthError::Rejected(
                non_empty(response.message).unwrap_or_else(|| SIGNUP_FAILED.into()),
            )),
            Err(e) => {
                warn!(error = %e, "signup_request_failed");
                Err(AuthError::Transport(e))
            }
        }
    }

    /// Replaces the favourites with the server listing. A failure leaves the
    /// set as it was, and a listing for a user who has since logged out is
    /// dropped.
    pub async fn refresh_favorites(&self) -> Result<usize, ApiError> {
        let Some(email) = self.user_email() else {
            return Ok(0);
        };

        match self.remote.fetch_favourites(&email).await {
            Ok(ids) => {
                let count = ids.len();
                if !self.set_favorites(&email, ids) {
                    debug!(email, "favourites_discarded_session_changed");
                    return Ok(0);
                }
                debug!(count, "favourites_loaded");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "favourites_fetch_failed");
                Err(e)
            }
        }
    }

    /// Flips membership locally and returns the new membership. The server is
    /// told in the background; a failure there is reported but not rolled back.
    pub fn toggle_favorite(&self, track_id: &str) -> bool {
        let (now_favorite, email) = {
            let mut session = write(&self.session);
            let now_favorite = if session.favorites.remove(track_id) {
                false
            } else {
                session.favorites.insert(track_id.to_string());
                true
            };
            (now_favorite, session.user_email.clone())
        };

        let Some(email) = email else {
            debug!(track_id, "favourite_toggled_offline");
            return now_favorite;
        };

        let remote = self.remote.clone();
        let event_tx = self.event_tx.clone();
        let track_id = track_id.to_string();
        let task = tokio::spawn(async move {
            if let Err(e) = remote.update_favourite(&email, &track_id).await {
                warn!(track_id = %track_id, error = %e, "favourite_sync_failed");
                let _ = event_tx.send(Event::FavoriteSyncFailed {
                    track_id,
                    message: e.user_message(),
                });
            }
        });

        let mut tasks = lock(&self.sync_tasks);
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);

        now_favorite
    }

    /// Waits for background favourite updates started so far.
    pub async fn settle(&self) {
        let tasks: Vec<_> = lock(&self.sync_tasks).drain(..).collect();
        for task in tasks {
            let _ = task.await;
        }
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}
