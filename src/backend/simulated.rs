//! In-process player driven by the wall clock.
//!
//! Has no video output. Useful for trying the looper without mpv and as a
//! deterministic stand-in in tests (see [`SimulatedPlayer::advance`]).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::debug;

use super::error::PlayerError;
use super::{PlayerEvent, PlayerState, VideoPlayer};
use crate::video::VideoId;

/// A clock-based player with a fixed duration per video.
#[derive(Debug)]
pub struct SimulatedPlayer {
    duration: f64,
    loaded: Option<VideoId>,
    position: f64,
    rate: f64,
    playing: bool,
    /// Wall clock anchor while playing; `None` when manual stepping is used
    anchor: Option<Instant>,
    realtime: bool,
    events: VecDeque<PlayerEvent>,
    seeks: usize,
}

impl SimulatedPlayer {
    /// Player that advances with the wall clock.
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            loaded: None,
            position: 0.0,
            rate: 1.0,
            playing: false,
            anchor: None,
            realtime: true,
            events: VecDeque::new(),
            seeks: 0,
        }
    }

    /// Player whose position only moves through [`advance`](Self::advance).
    pub fn manual(duration: f64) -> Self {
        Self {
            realtime: false,
            ..Self::new(duration)
        }
    }

    /// Move the playhead forward by `elapsed` wall time (scaled by the rate).
    pub fn advance(&mut self, elapsed: Duration) {
        if self.playing {
            self.position += elapsed.as_secs_f64() * self.rate;
            self.clamp_to_end();
        }
    }

    /// Whether the player is currently playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current playback rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Number of seeks performed so far.
    pub fn seek_count(&self) -> usize {
        self.seeks
    }

    /// Fold elapsed wall time into the position.
    fn sync(&mut self) {
        if !self.realtime {
            return;
        }
        // The anchor is only set while playing
        if let Some(anchor) = self.anchor {
            let now = Instant::now();
            self.position += now.duration_since(anchor).as_secs_f64() * self.rate;
            self.anchor = Some(now);
            self.clamp_to_end();
        }
    }

    fn clamp_to_end(&mut self) {
        if self.position >= self.duration {
            self.position = self.duration;
            if self.playing {
                self.playing = false;
                self.anchor = None;
                self.events
                    .push_back(PlayerEvent::StateChange(PlayerState::Ended));
            }
        }
    }

    fn require_loaded(&self) -> Result<(), PlayerError> {
        if self.loaded.is_some() {
            Ok(())
        } else {
            Err(PlayerError::NotReady)
        }
    }
}

impl VideoPlayer for SimulatedPlayer {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn load(&mut self, video: &VideoId) -> Result<(), PlayerError> {
        debug!("simulated load of {}", video);
        self.loaded = Some(video.clone());
        self.position = 0.0;
        self.playing = false;
        self.anchor = None;
        self.events.clear();
        self.events
            .push_back(PlayerEvent::StateChange(PlayerState::Unstarted));
        self.events.push_back(PlayerEvent::Ready);
        self.events
            .push_back(PlayerEvent::StateChange(PlayerState::Cued));
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.require_loaded()?;
        self.sync();
        if self.position >= self.duration {
            // Restart like a player at EOF would
            self.position = 0.0;
        }
        if !self.playing {
            self.playing = true;
            self.anchor = self.realtime.then(Instant::now);
            self.events
                .push_back(PlayerEvent::StateChange(PlayerState::Playing));
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.require_loaded()?;
        self.sync();
        if self.playing {
            self.playing = false;
            self.anchor = None;
            self.events
                .push_back(PlayerEvent::StateChange(PlayerState::Paused));
        }
        Ok(())
    }

    fn seek_to(&mut self, seconds: f64, _allow_seek_ahead: bool) -> Result<(), PlayerError> {
        self.require_loaded()?;
        self.sync();
        self.position = seconds.clamp(0.0, self.duration);
        self.seeks += 1;
        if self.playing {
            self.anchor = self.realtime.then(Instant::now);
        }
        Ok(())
    }

    fn current_time(&mut self) -> Result<f64, PlayerError> {
        self.sync();
        Ok(self.position)
    }

    fn duration(&mut self) -> Result<f64, PlayerError> {
        Ok(if self.loaded.is_some() {
            self.duration
        } else {
            0.0
        })
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), PlayerError> {
        self.sync();
        self.rate = rate;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        self.sync();
        self.events.drain(..).collect()
    }

    fn shutdown(&mut self) {
        self.playing = false;
        self.anchor = None;
    }
}
