use std::time::{Duration, Instant};

const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub ui: UiState,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub current_route: Route,
    pub notice: Option<Notice>,
    pub catalog_loading: bool,
}

impl UiState {
    pub fn notify(&mut self, text: impl Into<String>, level: NoticeLevel) {
        self.notice = Some(Notice {
            text: text.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    /// Drops the notice once it has been on screen long enough.
    pub fn expire_notice(&mut self) {
        self.expire_notice_at(Instant::now());
    }

    fn expire_notice_at(&mut self, now: Instant) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.shown_at) > NOTICE_TTL)
        {
            self.notice = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Login,
    Signup,
    Library,
    Favorites,
    Upload,
}

/// The two halves of the app; playback resets when crossing between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Player,
    Admin,
}

impl Route {
    /// Sidebar order, cycled with Tab.
    pub const TABS: [Route; 3] = [Route::Library, Route::Favorites, Route::Upload];

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Signup => "Signup",
            Route::Library => "Library",
            Route::Favorites => "Favourites",
            Route::Upload => "Upload",
        }
    }

    pub fn requires_login(&self) -> bool {
        matches!(self, Route::Library | Route::Favorites)
    }

    pub fn surface(&self) -> Surface {
        match self {
            Route::Upload => Surface::Admin,
            _ => Surface::Player,
        }
    }

    pub fn tab_index(&self) -> Option<usize> {
        Self::TABS.iter().position(|r| r == self)
    }

    /// Next tab; forms count as sitting before the first tab.
    pub fn cycle(&self, forward: bool) -> Route {
        let len = Self::TABS.len();
        let index = match (self.tab_index(), forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        Self::TABS[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_cycle_both_ways() {
        assert_eq!(Route::Library.cycle(true), Route::Favorites);
        assert_eq!(Route::Upload.cycle(true), Route::Library);
        assert_eq!(Route::Library.cycle(false), Route::Upload);
        assert_eq!(Route::Login.cycle(true), Route::Library);
    }

    #[test]
    fn only_upload_is_admin() {
        assert_eq!(Route::Upload.surface(), Surface::Admin);
        assert_eq!(Route::Favorites.surface(), Surface::Player);
        assert!(Route::Favorites.requires_login());
        assert!(!Route::Upload.requires_login());
    }

    #[test]
    fn notices_expire() {
        let mut ui = UiState::default();
        ui.notify("hello", NoticeLevel::Info);
        ui.expire_notice();
        assert!(ui.notice.is_some());
        ui.expire_notice_at(Instant::now() + Duration::from_secs(60));
        assert!(ui.notice.is_none());
    }
}
