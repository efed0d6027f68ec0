//! Loop state management
//!
//! Contains the central `LoopState` struct that holds everything the looper
//! shows and edits, as well as shared types used across player modules.

use ratatui::layout::Rect;

use crate::backend::PlayerState;
use crate::video::{LoopLink, VideoId};

/// Playback rates offered by YouTube, slowest first.
pub const PLAYBACK_RATES: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// Result of processing an input event.
///
/// Returned by input handlers to signal control flow decisions to the main
/// loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Keep running
    Continue,
    /// Exit the looper
    Quit,
}

/// One of the two range handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thumb {
    Start,
    End,
}

/// Central state for a loop session.
///
/// Loop bounds always satisfy `0 <= start <= end <= duration`; once the
/// duration is at least one step long they are also at least one step apart.
#[derive(Debug)]
pub struct LoopState {
    // === Video ===
    /// Video being looped
    pub video_id: VideoId,
    /// Whether the player reported ready for the current video
    pub ready: bool,
    /// Last state reported by the player
    pub player_state: PlayerState,
    /// Duration of the current video in seconds (0 until ready)
    pub duration: f64,

    // === Loop bounds ===
    /// Loop start in seconds
    pub start: f64,
    /// Loop end in seconds
    pub end: f64,
    /// Granularity of slider and keyboard range edits
    pub step: f64,
    /// Bounds from a loop link, applied once the duration is known
    pending_start: Option<f64>,
    pending_end: Option<f64>,

    // === Playback ===
    pub paused: bool,
    /// Playback rate, one of [`PLAYBACK_RATES`]
    pub speed: f64,
    /// Last observed playhead position in seconds
    pub current_time: f64,
    /// Playhead position as a percentage of the duration
    pub progress: f64,
    /// Whether the loop check runs
    pub repeat: bool,

    // === UI ===
    pub show_help: bool,
    /// Text of the open input prompt, if any
    pub prompt: Option<String>,
    pub error: Option<String>,
    pub status: Option<String>,
    /// Thumb held by the mouse
    pub dragging: Option<Thumb>,
    /// Screen areas of the last render, for mouse hit testing
    pub range_bar: Option<Rect>,
    pub progress_bar: Option<Rect>,

    // === Rendering flags ===
    /// True when screen needs to be redrawn
    pub needs_render: bool,
}

impl LoopState {
    /// Create state for a video that has not been loaded yet.
    pub fn new(video_id: VideoId, step: f64) -> Self {
        Self {
            video_id,
            ready: false,
            player_state: PlayerState::Unstarted,
            duration: 0.0,

            start: 0.0,
            end: 0.0,
            step: if step > 0.0 { step } else { 1.0 },
            pending_start: None,
            pending_end: None,

            paused: true,
            speed: 1.0,
            current_time: 0.0,
            progress: 0.0,
            repeat: true,

            show_help: false,
            prompt: None,
            error: None,
            status: None,
            dragging: None,
            range_bar: None,
            progress_bar: None,

            needs_render: true,
        }
    }

    /// Switch to a new video, keeping speed and repeat.
    ///
    /// Bounds are remembered until [`on_ready`](Self::on_ready) knows the
    /// duration.
    pub fn load(&mut self, video_id: VideoId, start: Option<f64>, end: Option<f64>) {
        self.video_id = video_id;
        self.ready = false;
        self.player_state = PlayerState::Unstarted;
        self.duration = 0.0;
        self.start = 0.0;
        self.end = 0.0;
        self.pending_start = start;
        self.pending_end = end;
        self.paused = true;
        self.current_time = 0.0;
        self.progress = 0.0;
        self.dragging = None;
        self.error = None;
        self.needs_render = true;
    }

    /// Record the duration and apply pending bounds.
    ///
    /// A missing or zero end means "until the end of the video". Returns the
    /// resulting loop start.
    pub fn on_ready(&mut self, duration: f64) -> f64 {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.ready = true;

        let start = self.pending_start.take().unwrap_or(0.0);
        let end = match self.pending_end.take() {
            Some(end) if end > 0.0 => end,
            _ => self.duration,
        };
        (self.start, self.end) = self.constrain(start, end, Thumb::Start);
        self.update_position(self.current_time);
        self.start
    }

    /// Move both bounds as the range slider does: values snap to the step.
    ///
    /// The thumb that moved wins when the bounds would collide. Returns true
    /// if the start changed.
    pub fn set_range(&mut self, start: f64, end: f64) -> bool {
        let moved = if (start - self.start).abs() > f64::EPSILON {
            Thumb::Start
        } else {
            Thumb::End
        };
        let start = self.snap(start);
        let end = self.snap(end);
        self.apply(start, end, moved)
    }

    /// Move one thumb to a time, snapping to the step.
    pub fn move_thumb(&mut self, thumb: Thumb, time: f64) -> bool {
        let time = self.snap(time);
        match thumb {
            Thumb::Start => self.apply(time, self.end, Thumb::Start),
            Thumb::End => self.apply(self.start, time, Thumb::End),
        }
    }

    /// Put the start exactly at `time`.
    pub fn set_start_at(&mut self, time: f64) -> bool {
        self.apply(time, self.end, Thumb::Start)
    }

    /// Put the end exactly at `time`.
    pub fn set_end_at(&mut self, time: f64) -> bool {
        self.apply(self.start, time, Thumb::End)
    }

    /// Move a thumb by a number of steps.
    pub fn nudge(&mut self, thumb: Thumb, steps: i32) -> bool {
        let delta = f64::from(steps) * self.step;
        match thumb {
            Thumb::Start => self.move_thumb(Thumb::Start, self.start + delta),
            Thumb::End => self.move_thumb(Thumb::End, self.end + delta),
        }
    }

    /// Apply bounds from a link to the current video; missing ones stay.
    ///
    /// Until ready the bounds replace the pending ones. Returns true if the
    /// start changed.
    pub fn apply_bounds(&mut self, start: Option<f64>, end: Option<f64>) -> bool {
        if !self.ready {
            self.pending_start = start.or(self.pending_start);
            self.pending_end = end.or(self.pending_end);
            self.needs_render = true;
            return false;
        }
        let start = start.unwrap_or(self.start);
        let end = end.unwrap_or(self.end);
        self.apply(start, end, Thumb::Start)
    }

    /// Loop the whole video again.
    pub fn reset_range(&mut self) -> bool {
        self.apply(0.0, self.duration, Thumb::Start)
    }

    /// The thumb a click at `time` should grab.
    pub fn nearest_thumb(&self, time: f64) -> Thumb {
        if time <= self.start {
            Thumb::Start
        } else if time >= self.end {
            Thumb::End
        } else if time - self.start <= self.end - time {
            Thumb::Start
        } else {
            Thumb::End
        }
    }

    /// Record an observed playhead position.
    pub fn update_position(&mut self, time: f64) {
        self.current_time = time.max(0.0);
        self.progress = if self.duration > 0.0 {
            (self.current_time / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        self.needs_render = true;
    }

    /// Step to the next faster rate (max 2x).
    pub fn speed_up(&mut self) {
        let idx = rate_index(self.speed);
        self.speed = PLAYBACK_RATES[(idx + 1).min(PLAYBACK_RATES.len() - 1)];
        self.needs_render = true;
    }

    /// Step to the next slower rate (min 0.25x).
    pub fn speed_down(&mut self) {
        let idx = rate_index(self.speed);
        self.speed = PLAYBACK_RATES[idx.saturating_sub(1)];
        self.needs_render = true;
    }

    /// Set the speed to the closest supported rate.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = PLAYBACK_RATES[rate_index(speed)];
        self.needs_render = true;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.needs_render = true;
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
        self.needs_render = true;
    }

    /// Open the URL/ID prompt with an empty buffer.
    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
        self.error = None;
        self.needs_render = true;
    }

    pub fn close_prompt(&mut self) {
        self.prompt = None;
        self.needs_render = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.error = None;
        self.needs_render = true;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.needs_render = true;
    }

    /// Close the help overlay or the prompt.
    ///
    /// Returns true if something was closed, false if should quit.
    pub fn exit_mode_or_quit(&mut self) -> bool {
        if self.show_help {
            self.show_help = false;
        } else if self.prompt.is_some() {
            self.prompt = None;
        } else {
            return false;
        }
        self.needs_render = true;
        true
    }

    /// Current state as a loop link.
    ///
    /// Before the player is ready the bounds from the loaded link are
    /// kept.
    pub fn link(&self) -> LoopLink {
        if self.ready {
            LoopLink::new(self.video_id.clone(), Some(self.start), Some(self.end))
        } else {
            LoopLink::new(self.video_id.clone(), self.pending_start, self.pending_end)
        }
    }

    fn apply(&mut self, start: f64, end: f64, moved: Thumb) -> bool {
        let previous = self.start;
        (self.start, self.end) = self.constrain(start, end, moved);
        self.needs_render = true;
        (self.start - previous).abs() > f64::EPSILON
    }

    /// Clamp into `[0, duration]` and keep the minimum gap, pushing the
    /// thumb that did not move.
    fn constrain(&self, start: f64, end: f64, moved: Thumb) -> (f64, f64) {
        let duration = self.duration;
        let mut start = start.clamp(0.0, duration);
        let mut end = end.clamp(0.0, duration);
        let gap = if duration >= self.step { self.step } else { 0.0 };

        if end - start < gap {
            match moved {
                Thumb::Start => {
                    end = (start + gap).min(duration);
                    start = start.min(end - gap).max(0.0);
                }
                Thumb::End => {
                    start = (end - gap).max(0.0);
                    end = end.max(start + gap).min(duration);
                }
            }
        }
        (start, end)
    }

    fn snap(&self, time: f64) -> f64 {
        (time / self.step).round() * self.step
    }
}

/// Index of the supported rate closest to `speed`.
fn rate_index(speed: f64) -> usize {
    PLAYBACK_RATES
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (*a - speed)
                .abs()
                .partial_cmp(&(*b - speed).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(3)
}
