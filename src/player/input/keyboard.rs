//! Keyboard input handling for the looper.
//!
//! Handles all keyboard shortcuts: transport, loop range editing, speed,
//! the URL/ID prompt and the help overlay.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::backend::VideoPlayer;
use crate::player::session::LoopSession;
use crate::player::state::InputResult;

/// Handle a keyboard event.
pub fn handle_key_event<P: VideoPlayer>(key: KeyEvent, session: &mut LoopSession<P>) -> InputResult {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return InputResult::Quit;
    }

    // If help is showing, any key closes it
    if session.state().show_help {
        session.state_mut().toggle_help();
        return InputResult::Continue;
    }

    if session.state().prompt.is_some() {
        handle_prompt_key(key, session);
        return InputResult::Continue;
    }

    let state = session.state_mut();
    if state.status.is_some() || state.error.is_some() {
        state.status = None;
        state.error = None;
        state.needs_render = true;
    }

    match key.code {
        // === Quit ===
        KeyCode::Char('q') => return InputResult::Quit,
        KeyCode::Esc => {
            if !session.state_mut().exit_mode_or_quit() {
                return InputResult::Quit;
            }
        }

        // === Modes ===
        KeyCode::Char('?') => session.state_mut().toggle_help(),
        KeyCode::Char('o') | KeyCode::Char('/') => session.state_mut().open_prompt(),

        // === Transport ===
        KeyCode::Char(' ') => session.toggle_play(),
        KeyCode::Left => session.seek_relative(-session.seek_step()),
        KeyCode::Right => session.seek_relative(session.seek_step()),
        KeyCode::Home => session.seek_to_start(),
        KeyCode::Char('+') | KeyCode::Char('=') => session.speed_up(),
        KeyCode::Char('-') | KeyCode::Char('_') => session.speed_down(),

        // === Loop range ===
        KeyCode::Char('[') => session.set_start_here(),
        KeyCode::Char(']') => session.set_end_here(),
        KeyCode::Char(',') => session.nudge_start(-1),
        KeyCode::Char('.') => session.nudge_start(1),
        KeyCode::Char('<') => session.nudge_end(-1),
        KeyCode::Char('>') => session.nudge_end(1),
        KeyCode::Char('x') => session.reset_range(),
        KeyCode::Char('r') => session.toggle_repeat(),

        // === Link ===
        KeyCode::Char('c') => session.copy_link(),

        _ => {}
    }
    InputResult::Continue
}

/// Keys while the URL/ID prompt is open.
fn handle_prompt_key<P: VideoPlayer>(key: KeyEvent, session: &mut LoopSession<P>) {
    match key.code {
        KeyCode::Esc => session.state_mut().close_prompt(),
        KeyCode::Enter => {
            let text = session.state().prompt.clone().unwrap_or_default();
            session.submit_input(&text);
        }
        KeyCode::Backspace => {
            let state = session.state_mut();
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.pop();
            }
            state.error = None;
            state.needs_render = true;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let state = session.state_mut();
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.push(c);
            }
            state.needs_render = true;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedPlayer;
    use crate::clipboard::Copy;
    use crate::player::session::SessionOptions;
    use crate::video::{LoopLink, VideoId, INVALID_INPUT_MESSAGE};

    fn session() -> LoopSession<SimulatedPlayer> {
        let mut session = LoopSession::new(
            SimulatedPlayer::manual(60.0),
            LoopLink::parse("?videoId=dQw4w9WgXcQ&start=10&end=20").unwrap(),
            VideoId::parse("dQw4w9WgXcQ").unwrap(),
            SessionOptions::default(),
        )
        .with_clipboard(Copy::with_tools(vec![]));
        session.start().unwrap();
        session.pump_events();
        session
    }

    fn press(session: &mut LoopSession<SimulatedPlayer>, code: KeyCode) -> InputResult {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), session)
    }

    fn type_text(session: &mut LoopSession<SimulatedPlayer>, text: &str) {
        for c in text.chars() {
            press(session, KeyCode::Char(c));
        }
    }

    #[test]
    fn quit_keys() {
        let mut session = session();
        assert_eq!(press(&mut session, KeyCode::Char('q')), InputResult::Quit);
        assert_eq!(press(&mut session, KeyCode::Esc), InputResult::Quit);
        assert_eq!(
            handle_key_event(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &mut session
            ),
            InputResult::Quit
        );
    }

    #[test]
    fn space_toggles_playback() {
        let mut session = session();
        press(&mut session, KeyCode::Char(' '));
        session.pump_events();
        assert!(!session.state().paused);
        assert!(session.player().is_playing());
    }

    #[test]
    fn help_swallows_next_key() {
        let mut session = session();
        press(&mut session, KeyCode::Char('?'));
        assert!(session.state().show_help);

        assert_eq!(press(&mut session, KeyCode::Char('q')), InputResult::Continue);
        assert!(!session.state().show_help);
    }

    #[test]
    fn range_keys_edit_bounds() {
        let mut session = session();
        press(&mut session, KeyCode::Char('.'));
        press(&mut session, KeyCode::Char('>'));
        press(&mut session, KeyCode::Char('>'));
        assert_eq!((session.state().start, session.state().end), (11.0, 22.0));

        press(&mut session, KeyCode::Char('x'));
        assert_eq!((session.state().start, session.state().end), (0.0, 60.0));
    }

    #[test]
    fn repeat_and_speed_keys() {
        let mut session = session();
        press(&mut session, KeyCode::Char('r'));
        assert!(!session.state().repeat);
        press(&mut session, KeyCode::Char('-'));
        assert_eq!(session.state().speed, 0.75);
    }

    #[test]
    fn prompt_accepts_typed_video() {
        let mut session = session();
        press(&mut session, KeyCode::Char('o'));
        type_text(&mut session, "9bZkp7q19f0");
        press(&mut session, KeyCode::Enter);

        assert!(session.state().prompt.is_none());
        assert_eq!(session.state().video_id.as_str(), "9bZkp7q19f0");
    }

    #[test]
    fn prompt_keeps_invalid_input_open() {
        let mut session = session();
        press(&mut session, KeyCode::Char('/'));
        type_text(&mut session, "qx");
        press(&mut session, KeyCode::Backspace);
        assert_eq!(session.state().prompt.as_deref(), Some("q"));

        press(&mut session, KeyCode::Enter);
        assert_eq!(session.state().error.as_deref(), Some(INVALID_INPUT_MESSAGE));
        assert_eq!(session.state().prompt.as_deref(), Some("q"));
        assert_eq!(session.state().video_id.as_str(), "dQw4w9WgXcQ");

        press(&mut session, KeyCode::Esc);
        assert!(session.state().prompt.is_none());
    }

    #[test]
    fn arrows_seek_by_step() {
        let mut session = session();
        press(&mut session, KeyCode::Right);
        assert_eq!(session.state().current_time, 15.0);
        press(&mut session, KeyCode::Home);
        assert_eq!(session.state().current_time, 10.0);
    }
}
