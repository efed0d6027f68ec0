//! Loop session: the player, the loop state and the two pollers.
//!
//! All mutation happens on the caller's thread. The session reacts to player
//! events ([`LoopSession::handle_player_event`]), advances its pollers on
//! [`LoopSession::tick`], and exposes one method per user action.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::looping::loop_target;
use super::polling::Poller;
use super::state::{LoopState, Thumb};
use crate::backend::{PlayerError, PlayerEvent, PlayerState, VideoPlayer};
use crate::clipboard::Copy;
use crate::config::Config;
use crate::video::{resolve_input, LoopLink, VideoId, INVALID_INPUT_MESSAGE};

/// Tunables for a session, usually taken from the config.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub progress_interval: Duration,
    pub loop_interval: Duration,
    /// Range slider granularity in seconds
    pub range_step: f64,
    /// Arrow key seek distance in seconds
    pub seek_step: f64,
    pub speed: f64,
    pub repeat: bool,
    pub pause_on_ready: bool,
    /// Prefix for rendered loop links
    pub link_base: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            progress_interval: config.playback.progress_interval(),
            loop_interval: config.playback.loop_interval(),
            range_step: config.playback.range_step_secs,
            seek_step: config.playback.seek_step_secs,
            speed: config.playback.default_speed,
            repeat: config.playback.repeat,
            pause_on_ready: config.player.pause_on_ready,
            link_base: config.link.base_url.clone(),
        }
    }
}

/// A looping session over one player.
pub struct LoopSession<P: VideoPlayer> {
    player: P,
    state: LoopState,
    progress_poller: Poller,
    loop_poller: Poller,
    clipboard: Copy,
    options: SessionOptions,
}

impl<P: VideoPlayer> LoopSession<P> {
    /// Create a session for `link`, falling back to `default_video` when the
    /// link names no video.
    pub fn new(player: P, link: LoopLink, default_video: VideoId, options: SessionOptions) -> Self {
        let video_id = link.video_id.unwrap_or(default_video);
        let mut state = LoopState::new(video_id.clone(), options.range_step);
        state.load(video_id, link.start, link.end);
        state.set_speed(options.speed);
        state.repeat = options.repeat;

        Self {
            player,
            state,
            progress_poller: Poller::new(options.progress_interval),
            loop_poller: Poller::new(options.loop_interval),
            clipboard: Copy::new(),
            options,
        }
    }

    /// Replace the clipboard (for testing).
    pub fn with_clipboard(mut self, clipboard: Copy) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Load the initial video.
    pub fn start(&mut self) -> Result<(), PlayerError> {
        info!(
            "starting session for {} on {}",
            self.state.video_id,
            self.player.name()
        );
        self.player.load(&self.state.video_id)
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LoopState {
        &mut self.state
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Whether the progress and loop pollers are running.
    pub fn is_polling(&self) -> (bool, bool) {
        (self.progress_poller.is_active(), self.loop_poller.is_active())
    }

    /// Drain and handle everything the player reported.
    pub fn pump_events(&mut self) {
        for event in self.player.poll_events() {
            self.handle_player_event(event);
        }
    }

    pub fn handle_player_event(&mut self, event: PlayerEvent) {
        debug!("player event: {:?}", event);
        match event {
            PlayerEvent::Ready => self.on_ready(),
            PlayerEvent::StateChange(player_state) => self.on_state_change(player_state),
            PlayerEvent::Error(message) => {
                warn!("player error: {}", message);
                self.state.set_error(message);
            }
        }
    }

    fn on_ready(&mut self) {
        let duration = match self.player.duration() {
            Ok(duration) => duration,
            Err(e) => {
                self.record(Err(e));
                0.0
            }
        };
        let start = self.state.on_ready(duration);
        info!(
            "{} ready: duration {:.2}s, loop {:.2}..{:.2}",
            self.state.video_id, duration, self.state.start, self.state.end
        );

        let result = if self.options.pause_on_ready {
            self.player.pause()
        } else {
            self.player.play()
        };
        self.record(result);
        let rate = self.player.set_playback_rate(self.state.speed);
        self.record(rate);
        if start > 0.0 {
            self.seek(start);
        }
    }

    fn on_state_change(&mut self, player_state: PlayerState) {
        debug!("state {} ({})", player_state.label(), player_state.code());
        self.state.player_state = player_state;
        self.state.needs_render = true;
        match player_state {
            PlayerState::Playing => {
                self.state.paused = false;
                let now = Instant::now();
                self.progress_poller.start(now);
                self.loop_poller.start(now);
            }
            PlayerState::Paused | PlayerState::Cued => {
                self.state.paused = true;
                self.stop_polling();
                self.refresh_position();
            }
            PlayerState::Ended => {
                if self.state.repeat && self.state.ready {
                    debug!("ended, restarting at {:.2}", self.state.start);
                    self.seek(self.state.start);
                    let result = self.player.play();
                    self.record(result);
                } else {
                    self.state.paused = true;
                    self.stop_polling();
                    self.refresh_position();
                }
            }
            PlayerState::Buffering | PlayerState::Unstarted => {}
        }
    }

    /// Run whichever pollers are due.
    pub fn tick(&mut self, now: Instant) {
        if self.loop_poller.due(now) {
            self.check_loop();
        }
        if self.progress_poller.due(now) {
            self.refresh_position();
        }
    }

    /// Time until the next poller run, `None` when paused.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        match (
            self.progress_poller.time_until_due(now),
            self.loop_poller.time_until_due(now),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn check_loop(&mut self) {
        if !self.state.repeat || !self.state.ready {
            return;
        }
        let position = match self.player.current_time() {
            Ok(position) => position,
            Err(e) => return self.record(Err(e)),
        };
        if let Some(target) = loop_target(position, self.state.start, self.state.end) {
            debug!("loop end {:.2} reached at {:.2}", self.state.end, position);
            self.seek(target);
        }
    }

    fn refresh_position(&mut self) {
        match self.player.current_time() {
            Ok(position) => self.state.update_position(position),
            Err(e) => self.record(Err(e)),
        }
    }

    fn stop_polling(&mut self) {
        self.progress_poller.cancel();
        self.loop_poller.cancel();
    }

    fn seek(&mut self, seconds: f64) {
        let result = self.player.seek_to(seconds, true);
        if result.is_ok() {
            self.state.update_position(seconds);
        }
        self.record(result);
    }

    /// Surface a player failure in the status line.
    fn record(&mut self, result: Result<(), PlayerError>) {
        if let Err(e) = result {
            warn!("{} player: {}", self.player.name(), e);
            self.state.set_error(e.to_string());
        }
    }

    /// Follow a change of the loop start with the playhead.
    fn follow_start(&mut self, start_changed: bool) {
        if start_changed && self.state.ready {
            self.seek(self.state.start);
        }
    }

    // === Range ===

    /// Slider change; the playhead jumps to a new start.
    pub fn set_range(&mut self, start: f64, end: f64) {
        let changed = self.state.set_range(start, end);
        self.follow_start(changed);
    }

    /// Drag a thumb to a time.
    pub fn move_thumb(&mut self, thumb: Thumb, time: f64) {
        let changed = self.state.move_thumb(thumb, time);
        self.follow_start(changed);
    }

    /// Start the loop at the playhead.
    pub fn set_start_here(&mut self) {
        if !self.state.ready {
            return;
        }
        self.refresh_position();
        let here = self.state.current_time;
        self.state.set_start_at(here);
    }

    /// End the loop at the playhead.
    pub fn set_end_here(&mut self) {
        if !self.state.ready {
            return;
        }
        self.refresh_position();
        let here = self.state.current_time;
        let changed = self.state.set_end_at(here);
        self.follow_start(changed);
    }

    pub fn nudge_start(&mut self, steps: i32) {
        let changed = self.state.nudge(Thumb::Start, steps);
        self.follow_start(changed);
    }

    pub fn nudge_end(&mut self, steps: i32) {
        let changed = self.state.nudge(Thumb::End, steps);
        self.follow_start(changed);
    }

    /// Loop the whole video.
    pub fn reset_range(&mut self) {
        let changed = self.state.reset_range();
        self.follow_start(changed);
    }

    pub fn toggle_repeat(&mut self) {
        self.state.toggle_repeat();
        let message = if self.state.repeat {
            "Repeat on"
        } else {
            "Repeat off"
        };
        self.state.set_status(message);
    }

    // === Transport ===

    pub fn toggle_play(&mut self) {
        if !self.state.ready {
            debug!("ignoring play/pause before ready");
            return;
        }
        let result = if self.state.paused {
            self.player.play()
        } else {
            self.player.pause()
        };
        self.record(result);
    }

    /// Seek relative to the playhead, within the video.
    pub fn seek_relative(&mut self, delta: f64) {
        if !self.state.ready {
            return;
        }
        self.refresh_position();
        let target = (self.state.current_time + delta).clamp(0.0, self.state.duration);
        self.seek(target);
    }

    /// Seek to an absolute time, within the video.
    pub fn seek_to(&mut self, time: f64) {
        if !self.state.ready {
            return;
        }
        self.seek(time.clamp(0.0, self.state.duration));
    }

    /// Jump back to the loop start.
    pub fn seek_to_start(&mut self) {
        self.seek_to(self.state.start);
    }

    pub fn seek_step(&self) -> f64 {
        self.options.seek_step
    }

    pub fn speed_up(&mut self) {
        self.state.speed_up();
        self.apply_speed();
    }

    pub fn speed_down(&mut self) {
        self.state.speed_down();
        self.apply_speed();
    }

    fn apply_speed(&mut self) {
        if self.state.ready {
            let result = self.player.set_playback_rate(self.state.speed);
            self.record(result);
        }
    }

    // === Input ===

    /// Switch to the video named by `text`.
    ///
    /// Accepts a video ID, a YouTube URL or a loop link. Invalid input sets
    /// the error message and leaves everything else as it was. Returns
    /// whether the input was accepted.
    pub fn submit_input(&mut self, text: &str) -> bool {
        let link = match resolve_input(text) {
            Ok(link) => link,
            Err(e) => {
                debug!("rejected input {:?}: {}", text, e);
                self.state.set_error(INVALID_INPUT_MESSAGE);
                return false;
            }
        };
        self.state.close_prompt();

        let Some(video_id) = link.video_id else {
            // Bounds only: apply them to the current video
            let changed = self.state.apply_bounds(link.start, link.end);
            self.follow_start(changed);
            return true;
        };

        info!("loading {}", video_id);
        self.stop_polling();
        self.state.load(video_id, link.start, link.end);
        let result = self.player.load(&self.state.video_id);
        self.record(result);
        true
    }

    // === Link ===

    /// Current state as a loop link.
    pub fn link(&self) -> LoopLink {
        self.state.link()
    }

    /// The loop link rendered with the configured base URL.
    pub fn link_url(&self) -> String {
        self.link().to_url(&self.options.link_base)
    }

    /// Copy the loop link to the clipboard.
    pub fn copy_link(&mut self) {
        let url = self.link_url();
        match self.clipboard.text(&url) {
            Ok(method) => {
                info!("copied {} with {}", url, method.name());
                self.state.set_status(format!("Copied {}", url));
            }
            Err(e) => {
                warn!("copy failed: {}", e);
                self.state.set_error(e.to_string());
            }
        }
    }

    /// Stop polling and shut the player down.
    pub fn teardown(&mut self) {
        info!("tearing down session for {}", self.state.video_id);
        self.stop_polling();
        self.player.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedPlayer;

    fn session(link: &str) -> LoopSession<SimulatedPlayer> {
        let link = LoopLink::parse(link).unwrap();
        let default = VideoId::parse("dQw4w9WgXcQ").unwrap();
        let mut session = LoopSession::new(
            SimulatedPlayer::manual(100.0),
            link,
            default,
            SessionOptions::default(),
        )
        .with_clipboard(Copy::with_tools(vec![]));
        session.start().unwrap();
        session.pump_events();
        session
    }

    fn play(session: &mut LoopSession<SimulatedPlayer>) {
        session.toggle_play();
        session.pump_events();
    }

    #[test]
    fn ready_pauses_and_applies_link_bounds() {
        let session = session("?videoId=dQw4w9WgXcQ&start=10&end=20");
        let state = session.state();

        assert!(state.ready);
        assert!(state.paused);
        assert_eq!((state.start, state.end), (10.0, 20.0));
        assert_eq!(state.current_time, 10.0);
        assert!(!session.player().is_playing());
    }

    #[test]
    fn missing_video_falls_back_to_default() {
        let session = session("?start=5");
        assert_eq!(session.state().video_id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(session.state().start, 5.0);
        assert_eq!(session.state().end, 100.0);
    }

    #[test]
    fn playing_starts_pollers_and_pausing_cancels_them() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        assert_eq!(session.is_polling(), (false, false));

        play(&mut session);
        assert!(!session.state().paused);
        assert_eq!(session.is_polling(), (true, true));
        assert!(session.next_wakeup(Instant::now()).is_some());

        session.toggle_play();
        session.pump_events();
        assert!(session.state().paused);
        assert_eq!(session.is_polling(), (false, false));
        assert_eq!(session.next_wakeup(Instant::now()), None);
    }

    #[test]
    fn crossing_the_end_seeks_to_start() {
        let mut session = session("?videoId=dQw4w9WgXcQ&start=10&end=20");
        play(&mut session);

        session.player_mut().advance(Duration::from_secs(11));
        session.tick(Instant::now() + Duration::from_secs(1));

        assert_eq!(session.player_mut().current_time().unwrap(), 10.0);
        assert_eq!(session.state().current_time, 10.0);
    }

    #[test]
    fn progress_tracks_position() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        play(&mut session);

        session.player_mut().advance(Duration::from_secs(25));
        session.tick(Instant::now() + Duration::from_secs(1));
        assert_eq!(session.state().progress, 25.0);
    }

    #[test]
    fn repeat_off_lets_playback_run_past_end() {
        let mut session = session("?videoId=dQw4w9WgXcQ&start=10&end=20");
        session.toggle_repeat();
        play(&mut session);

        session.player_mut().advance(Duration::from_secs(15));
        session.tick(Instant::now() + Duration::from_secs(1));
        assert_eq!(session.state().current_time, 25.0);
    }

    #[test]
    fn ended_with_repeat_restarts_at_loop_start() {
        let mut session = session("?videoId=dQw4w9WgXcQ&start=90");
        play(&mut session);

        session.player_mut().advance(Duration::from_secs(30));
        session.pump_events();

        assert!(session.player().is_playing());
        assert_eq!(session.player_mut().current_time().unwrap(), 90.0);
    }

    #[test]
    fn ended_without_repeat_stops() {
        let mut session = session("?videoId=dQw4w9WgXcQ&start=90");
        session.toggle_repeat();
        play(&mut session);

        session.player_mut().advance(Duration::from_secs(30));
        session.pump_events();

        assert!(session.state().paused);
        assert_eq!(session.is_polling(), (false, false));
        assert_eq!(session.state().progress, 100.0);
    }

    #[test]
    fn changing_start_seeks_the_player() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        let seeks = session.player().seek_count();

        session.set_range(30.0, 100.0);
        assert_eq!(session.player().seek_count(), seeks + 1);
        assert_eq!(session.player_mut().current_time().unwrap(), 30.0);

        session.set_range(30.0, 60.0);
        assert_eq!(session.player().seek_count(), seeks + 1);
    }

    #[test]
    fn set_start_and_end_here_use_the_playhead() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        play(&mut session);

        session.player_mut().advance(Duration::from_millis(12_500));
        session.set_start_here();
        session.player_mut().advance(Duration::from_millis(10_250));
        session.set_end_here();

        assert_eq!(session.state().start, 12.5);
        assert_eq!(session.state().end, 22.75);
    }

    #[test]
    fn nudges_move_thumbs_by_step() {
        let mut session = session("?videoId=dQw4w9WgXcQ&start=10&end=20");
        session.nudge_start(2);
        session.nudge_end(-3);
        assert_eq!((session.state().start, session.state().end), (12.0, 17.0));

        session.reset_range();
        assert_eq!((session.state().start, session.state().end), (0.0, 100.0));
    }

    #[test]
    fn speed_changes_reach_the_player() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        session.speed_up();
        session.speed_up();
        assert_eq!(session.player().rate(), 1.5);
        session.speed_down();
        assert_eq!(session.player().rate(), 1.25);
    }

    #[test]
    fn seek_relative_is_clamped() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        session.seek_relative(-5.0);
        assert_eq!(session.state().current_time, 0.0);
        session.seek_relative(250.0);
        assert_eq!(session.state().current_time, 100.0);
    }

    #[test]
    fn invalid_input_changes_nothing() {
        let mut session = session("?videoId=dQw4w9WgXcQ&start=10&end=20");
        session.state_mut().open_prompt();

        assert!(!session.submit_input("not a video"));
        let state = session.state();
        assert_eq!(state.video_id.as_str(), "dQw4w9WgXcQ");
        assert_eq!((state.start, state.end), (10.0, 20.0));
        assert_eq!(state.error.as_deref(), Some(INVALID_INPUT_MESSAGE));
        assert!(state.prompt.is_some());
    }

    #[test]
    fn valid_input_loads_new_video() {
        let mut session = session("?videoId=dQw4w9WgXcQ&start=10&end=20");
        assert!(session.submit_input("https://youtu.be/9bZkp7q19f0"));
        assert!(!session.state().ready);
        assert_eq!(session.state().video_id.as_str(), "9bZkp7q19f0");

        session.pump_events();
        assert!(session.state().ready);
        assert_eq!((session.state().start, session.state().end), (0.0, 100.0));
    }

    #[test]
    fn bounds_submitted_while_loading_survive_ready() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        assert!(session.submit_input("https://youtu.be/9bZkp7q19f0?start=5&end=9"));
        assert!(!session.state().ready);

        assert!(session.submit_input("?start=30&end=45"));
        assert_eq!(session.state().video_id.as_str(), "9bZkp7q19f0");

        session.pump_events();
        assert_eq!((session.state().start, session.state().end), (30.0, 45.0));
        assert_eq!(session.state().current_time, 30.0);
    }

    #[test]
    fn watch_url_with_bounds_loads_that_video() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        assert!(session.submit_input("https://www.youtube.com/watch?v=9bZkp7q19f0&start=30"));
        session.pump_events();
        assert_eq!(session.state().video_id.as_str(), "9bZkp7q19f0");
        assert_eq!((session.state().start, session.state().end), (30.0, 100.0));
    }

    #[test]
    fn link_reflects_current_range() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        session.set_range(4.0, 9.0);
        assert_eq!(session.link_url(), "?videoId=dQw4w9WgXcQ&start=4&end=9");
    }

    #[test]
    fn copy_without_tools_reports_error() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        session.copy_link();
        assert!(session.state().error.is_some());
    }

    #[test]
    fn player_errors_are_shown() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        session.handle_player_event(PlayerEvent::Error("video unavailable".to_string()));
        assert_eq!(session.state().error.as_deref(), Some("video unavailable"));
    }

    #[test]
    fn teardown_stops_everything() {
        let mut session = session("?videoId=dQw4w9WgXcQ");
        play(&mut session);
        session.teardown();
        assert_eq!(session.is_polling(), (false, false));
        assert!(!session.player().is_playing());
    }
}
