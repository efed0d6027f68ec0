//! The looper
//!
//! Plays a section of a video over and over: while playing, the playhead is
//! polled and sent back to the loop start whenever it reaches the loop end.
//!
//! # Architecture
//!
//! The player is organized into submodules:
//! - `state`: LoopState struct and shared types (Thumb, InputResult)
//! - `polling`: the cancellable fixed-interval pollers
//! - `looping`: the loop check
//! - `session`: LoopSession tying a `VideoPlayer` to the state and pollers
//! - `input/`: Keyboard and mouse input handling
//! - `render/`: UI rendering (range bar, progress, status, help, prompt)
//! - `native`: the terminal run loop
//!
//! # Usage
//!
//! ```no_run
//! use ytloop::backend::SimulatedPlayer;
//! use ytloop::player::{run_looper, LoopSession, SessionOptions};
//! use ytloop::video::{resolve_input, VideoId};
//!
//! let link = resolve_input("?videoId=dQw4w9WgXcQ&start=43&end=51").unwrap();
//! let default = VideoId::parse("dQw4w9WgXcQ").unwrap();
//! let mut session = LoopSession::new(
//!     SimulatedPlayer::new(212.0),
//!     link,
//!     default,
//!     SessionOptions::default(),
//! );
//! let outcome = run_looper(&mut session).unwrap();
//! println!("{}", outcome.link_url);
//! ```

pub(crate) mod input;
mod looping;
mod native;
mod polling;
pub mod render;
mod session;
pub mod state;

pub use looping::loop_target;
pub use native::{run_looper, LoopOutcome};
pub use polling::Poller;
pub use session::{LoopSession, SessionOptions};
pub use state::{InputResult, LoopState, Thumb, PLAYBACK_RATES};
