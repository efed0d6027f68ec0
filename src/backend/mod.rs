//! Video player backends.
//!
//! The looper never decodes video itself; it drives an external player
//! through the [`VideoPlayer`] trait, mirroring the imperative API of the
//! embeddable YouTube player (`play`, `pause`, `seekTo`, `getCurrentTime`,
//! `getDuration`, `setPlaybackRate`) plus its `ready`/`state-change` events.
//!
//! - `mpv`: drives an mpv process over its JSON IPC socket
//! - `simulated`: an in-process clock, for headless runs and tests

mod error;
mod ipc;
mod mpv;
mod simulated;

pub use error::PlayerError;
pub use mpv::{MpvConfig, MpvPlayer};
pub use simulated::SimulatedPlayer;

use serde::{Deserialize, Serialize};

use crate::video::VideoId;

/// Player state, using the YouTube IFrame API numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    /// Numeric code as reported by the YouTube player.
    pub fn code(self) -> i32 {
        match self {
            Self::Unstarted => -1,
            Self::Ended => 0,
            Self::Playing => 1,
            Self::Paused => 2,
            Self::Buffering => 3,
            Self::Cued => 5,
        }
    }

    /// Short label for the status line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unstarted => "unstarted",
            Self::Ended => "ended",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Buffering => "buffering",
            Self::Cued => "cued",
        }
    }
}

/// Asynchronous notification from a player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The loaded video is ready to be controlled; duration is known.
    Ready,
    /// Playback state changed.
    StateChange(PlayerState),
    /// The player reported an error (e.g. the video could not be loaded).
    Error(String),
}

/// An externally driven video player.
///
/// Queries take `&mut self` because backends may need to talk to another
/// process to answer them.
pub trait VideoPlayer {
    /// Backend name for display/logging.
    fn name(&self) -> &'static str;

    /// Load a video, replacing the current one. Readiness is signalled later
    /// through [`PlayerEvent::Ready`].
    fn load(&mut self, video: &VideoId) -> Result<(), PlayerError>;

    fn play(&mut self) -> Result<(), PlayerError>;

    fn pause(&mut self) -> Result<(), PlayerError>;

    /// Seek to an absolute position in seconds.
    ///
    /// `allow_seek_ahead` permits seeking beyond already buffered data.
    fn seek_to(&mut self, seconds: f64, allow_seek_ahead: bool) -> Result<(), PlayerError>;

    /// Current playback position in seconds.
    fn current_time(&mut self) -> Result<f64, PlayerError>;

    /// Duration of the loaded video in seconds (0 when unknown).
    fn duration(&mut self) -> Result<f64, PlayerError>;

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), PlayerError>;

    /// Drain pending events in arrival order.
    fn poll_events(&mut self) -> Vec<PlayerEvent>;

    /// Stop playback and release resources.
    fn shutdown(&mut self) {}
}

impl<P: VideoPlayer + ?Sized> VideoPlayer for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn load(&mut self, video: &VideoId) -> Result<(), PlayerError> {
        (**self).load(video)
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        (**self).play()
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        (**self).pause()
    }

    fn seek_to(&mut self, seconds: f64, allow_seek_ahead: bool) -> Result<(), PlayerError> {
        (**self).seek_to(seconds, allow_seek_ahead)
    }

    fn current_time(&mut self) -> Result<f64, PlayerError> {
        (**self).current_time()
    }

    fn duration(&mut self) -> Result<f64, PlayerError> {
        (**self).duration()
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), PlayerError> {
        (**self).set_playback_rate(rate)
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        (**self).poll_events()
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}

/// Which backend to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// mpv with yt-dlp, controlled over JSON IPC
    #[default]
    Mpv,
    /// In-process clock without video output
    Simulated,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Mpv => "mpv",
            Self::Simulated => "simulated",
        }
    }
}
