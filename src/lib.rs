pub mod audio;
pub mod catalog;
pub mod config;
pub mod event;
pub mod http;
pub mod session;
pub mod ui;
pub mod upload;
pub mod util;
