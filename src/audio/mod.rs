pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod playback;
pub mod progress;
pub mod queue;
pub mod state;
pub mod stream_manager;
pub mod traits;
pub mod util;

pub use controller::PlaybackController;
pub use state::{PlaybackState, PlayerStatus, RepeatMode};
