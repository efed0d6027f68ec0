//! Rendering components for the looper.
//!
//! This module lays out the screen and contains the widgets for the range
//! bar, progress gauge, status line, footer, help overlay and input prompt.

mod help;
mod status;
mod timeline;

pub use help::{help_lines, render_help, HELP_SECTIONS};
pub use status::{
    format_speed, header_line, render_footer, render_prompt, render_status_line, FOOTER_KEYS,
    PROMPT_KEYS,
};
pub use timeline::{
    build_range_bar_chars, column_for_time, render_progress, render_range_bar,
    render_range_labels, RangeBar,
};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use crate::player::state::LoopState;
use crate::theme::current_theme;

/// Draw the whole looper screen.
///
/// Records the range bar and progress bar areas in `state` for mouse hit
/// testing and clears `needs_render`.
pub fn draw(frame: &mut Frame, state: &mut LoopState, backend: &str, link: &str) {
    let theme = current_theme();
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1),
            Constraint::Length(1), // range bar
            Constraint::Length(1), // range labels
            Constraint::Length(1),
            Constraint::Length(1), // progress
            Constraint::Length(1),
            Constraint::Length(1), // status
            Constraint::Min(0),
            Constraint::Length(1), // footer
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(header_line(state, backend, &theme)),
        chunks[0],
    );
    render_range_bar(frame, chunks[2], state, &theme);
    render_range_labels(frame, chunks[3], state, &theme);
    render_progress(frame, chunks[5], state, &theme);
    render_status_line(frame, chunks[7], state, link, &theme);

    let keys = if state.prompt.is_some() {
        PROMPT_KEYS
    } else {
        FOOTER_KEYS
    };
    render_footer(frame, chunks[9], keys, &theme);

    if let Some(input) = &state.prompt {
        render_prompt(frame, area, input, state.error.as_deref(), &theme);
    }
    if state.show_help {
        render_help(frame, area, &theme);
    }

    state.needs_render = false;
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
