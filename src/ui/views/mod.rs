pub mod favorites;
pub mod library;
pub mod login;
pub mod signup;
pub mod upload;

pub use favorites::Favorites;
pub use library::Library;
pub use login::Login;
pub use signup::Signup;
pub use upload::Upload;

use crate::ui::{state::Route, traits::View};

pub fn create(route: Route) -> Box<dyn View> {
    match route {
        Route::Login => Box::new(Login::default()),
        Route::Signup => Box::new(Signup::default()),
        Route::Library => Box::new(Library::default()),
        Route::Favorites => Box::new(Favorites::default()),
        Route::Upload => Box::new(Upload::default()),
    }
}
