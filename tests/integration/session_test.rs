//! Integration tests for loop sessions driven by the simulated player

use std::time::{Duration, Instant};

use ytloop::backend::{PlayerEvent, SimulatedPlayer, VideoPlayer};
use ytloop::clipboard::Copy;
use ytloop::player::{LoopSession, SessionOptions};
use ytloop::time::format_seconds;
use ytloop::video::{resolve_input, LoopLink, VideoId, INVALID_INPUT_MESSAGE};

fn session_for(input: &str, duration: f64) -> LoopSession<SimulatedPlayer> {
    let link = resolve_input(input).unwrap();
    let mut session = LoopSession::new(
        SimulatedPlayer::manual(duration),
        link,
        VideoId::parse("dQw4w9WgXcQ").unwrap(),
        SessionOptions::default(),
    )
    .with_clipboard(Copy::with_tools(vec![]));
    session.start().unwrap();
    session.pump_events();
    session
}

/// Advance the player and run one poll cycle `step` later.
fn frame(session: &mut LoopSession<SimulatedPlayer>, clock: &mut Instant, step: Duration) {
    session.player_mut().advance(step);
    *clock += step;
    session.pump_events();
    session.tick(*clock);
}

#[test]
fn playback_stays_inside_the_loop() {
    let mut session = session_for("?videoId=dQw4w9WgXcQ&start=30&end=35", 212.0);
    session.toggle_play();
    session.pump_events();

    let mut clock = Instant::now();
    let step = SessionOptions::default().loop_interval;
    let tolerance = step.as_secs_f64() * 1.0001;
    let mut wraps = 0;
    let mut last = session.state().current_time;

    for _ in 0..2_000 {
        frame(&mut session, &mut clock, step);
        let position = session.player_mut().current_time().unwrap();
        assert!(position >= 30.0, "fell before start: {}", position);
        assert!(position < 35.0 + tolerance, "ran past end: {}", position);
        if position < last {
            // The first position after a wrap is the loop start
            assert_eq!(position, 30.0);
            wraps += 1;
        }
        last = position;
    }

    // 2000 frames of 16ms is 32s of playback over a 5s loop
    assert!(wraps >= 5, "only {} wraps", wraps);
}

#[test]
fn pausing_stops_the_loop_check() {
    let mut session = session_for("?videoId=dQw4w9WgXcQ&start=0&end=10", 60.0);
    session.toggle_play();
    session.pump_events();
    assert_eq!(session.is_polling(), (true, true));

    session.toggle_play();
    session.pump_events();
    assert_eq!(session.is_polling(), (false, false));

    // Moving the playhead past the end while paused does not loop
    session.seek_to(20.0);
    let seeks = session.player().seek_count();
    session.tick(Instant::now() + Duration::from_secs(1));
    assert_eq!(session.player().seek_count(), seeks);
    assert_eq!(session.state().current_time, 20.0);
}

#[test]
fn changing_speed_shortens_real_time_per_loop() {
    let mut session = session_for("?videoId=dQw4w9WgXcQ&start=0&end=10", 60.0);
    session.speed_up();
    session.speed_up();
    session.speed_up();
    session.speed_up();
    assert_eq!(session.state().speed, 2.0);

    session.toggle_play();
    session.pump_events();
    let mut clock = Instant::now();
    frame(&mut session, &mut clock, Duration::from_secs(4));
    assert_eq!(session.state().current_time, 8.0);
}

#[test]
fn invalid_inputs_leave_the_video_alone() {
    let mut session = session_for("?videoId=dQw4w9WgXcQ&start=5&end=15", 60.0);

    for input in [
        "",
        "dQw4w9WgXc",
        "dQw4w9WgXcQQ",
        "https://vimeo.com/123456789",
        "https://www.youtube.com/watch?list=PL123",
        "?videoId=short",
    ] {
        assert!(!session.submit_input(input), "accepted {:?}", input);
        assert_eq!(session.state().video_id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(session.state().error.as_deref(), Some(INVALID_INPUT_MESSAGE));
        assert_eq!((session.state().start, session.state().end), (5.0, 15.0));
    }
}

#[test]
fn loading_a_loop_link_applies_its_bounds() {
    let mut session = session_for("dQw4w9WgXcQ", 60.0);
    assert!(session.submit_input("https://example.com/?videoId=9bZkp7q19f0&start=12&end=24"));
    session.pump_events();

    assert_eq!(session.state().video_id.as_str(), "9bZkp7q19f0");
    assert_eq!((session.state().start, session.state().end), (12.0, 24.0));
    assert_eq!(session.state().current_time, 12.0);
}

#[test]
fn link_round_trips_through_a_new_session() {
    let mut session = session_for("dQw4w9WgXcQ", 120.0);
    session.set_range(42.0, 57.0);
    session.speed_down();
    let url = session.link_url();

    let restored = session_for(&url, 120.0);
    assert_eq!(restored.link(), session.link());
    assert_eq!(
        LoopLink::parse(&url).unwrap(),
        LoopLink::new(VideoId::parse("dQw4w9WgXcQ").unwrap(), Some(42.0), Some(57.0))
    );
}

#[test]
fn player_errors_surface_without_changing_state() {
    let mut session = session_for("?videoId=dQw4w9WgXcQ&start=5&end=15", 60.0);
    session.handle_player_event(PlayerEvent::Error("This video is unavailable".into()));

    assert_eq!(
        session.state().error.as_deref(),
        Some("This video is unavailable")
    );
    assert_eq!((session.state().start, session.state().end), (5.0, 15.0));
}

#[test]
fn time_labels_match_expected_format() {
    assert_eq!(format_seconds(0.0), "00:00.00");
    assert_eq!(format_seconds(65.0), "01:05.00");
    assert_eq!(format_seconds(3661.0), "1:01:01.00");
}
