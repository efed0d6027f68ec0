//! ytloop - YouTube Looper
//!
//! Loop a section of a YouTube video between two timestamps, with speed
//! control and a shareable loop link. The video itself is played by an
//! external player driven through [`backend::VideoPlayer`].

pub mod backend;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod logging;
pub mod player;
pub mod theme;
pub mod time;
pub mod video;

pub use config::Config;
pub use theme::current_theme;
