//! Input handling for the looper.
//!
//! This module handles keyboard and mouse input events, dispatching
//! them to the session and returning control flow signals.

mod keyboard;
mod mouse;

pub use keyboard::handle_key_event;
pub use mouse::{handle_mouse_event, time_at_column};

use crossterm::event::{Event, KeyEventKind};

use crate::backend::VideoPlayer;
use crate::player::session::LoopSession;
use crate::player::state::InputResult;

/// Handle any input event, dispatching to the appropriate handler.
pub fn handle_event<P: VideoPlayer>(event: Event, session: &mut LoopSession<P>) -> InputResult {
    match event {
        // Windows reports releases too
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(key, session),
        Event::Mouse(mouse) => handle_mouse_event(mouse, session),
        Event::Paste(text) => {
            let state = session.state_mut();
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.push_str(text.trim());
                state.needs_render = true;
            }
            InputResult::Continue
        }
        Event::Resize(_, _) => {
            session.state_mut().needs_render = true;
            InputResult::Continue
        }
        _ => InputResult::Continue, // Ignore focus events, etc.
    }
}
