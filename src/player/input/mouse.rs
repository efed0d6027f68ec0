//! Mouse input handling for the looper.
//!
//! Clicking the range bar grabs the nearest thumb and dragging moves it;
//! clicking the progress bar seeks.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::backend::VideoPlayer;
use crate::player::session::LoopSession;
use crate::player::state::InputResult;

/// Handle a mouse event.
pub fn handle_mouse_event<P: VideoPlayer>(
    mouse: MouseEvent,
    session: &mut LoopSession<P>,
) -> InputResult {
    let state = session.state();
    if state.show_help || state.prompt.is_some() || !state.ready {
        return InputResult::Continue;
    }
    let duration = state.duration;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(time) = hit(state.range_bar, mouse, duration) {
                let thumb = state.nearest_thumb(time);
                session.state_mut().dragging = Some(thumb);
                session.move_thumb(thumb, time);
            } else if let Some(time) = hit(state.progress_bar, mouse, duration) {
                session.seek_to(time);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let (Some(thumb), Some(area)) = (state.dragging, state.range_bar) {
                // Dragging past the ends pins the thumb there
                let column = mouse
                    .column
                    .clamp(area.x, area.x + area.width.saturating_sub(1));
                if let Some(time) = time_at_column(area, column, duration) {
                    session.move_thumb(thumb, time);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            session.state_mut().dragging = None;
        }
        _ => {}
    }

    InputResult::Continue
}

fn hit(area: Option<Rect>, mouse: MouseEvent, duration: f64) -> Option<f64> {
    let area = area?;
    if mouse.row < area.y || mouse.row >= area.y + area.height {
        return None;
    }
    time_at_column(area, mouse.column, duration)
}

/// Map a screen column inside `area` to a time.
///
/// The first column is 0 and the last column is the duration.
pub fn time_at_column(area: Rect, column: u16, duration: f64) -> Option<f64> {
    if area.width == 0 || column < area.x || column >= area.x + area.width {
        return None;
    }
    let span = f64::from(area.width.saturating_sub(1).max(1));
    let ratio = f64::from(column - area.x) / span;
    Some((ratio * duration).clamp(0.0, duration))
}
