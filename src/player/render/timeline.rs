//! Range bar and progress gauge.
//!
//! The range bar shows the whole video with the loop section highlighted and
//! a handle at each bound. The progress gauge below it shows the playhead.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

use crate::player::state::{LoopState, Thumb};
use crate::theme::Theme;
use crate::time::format_seconds;

const TRACK: char = '─';
const RANGE: char = '━';
const HANDLE: char = '█';
const PLAYHEAD: char = '┃';

/// Column of `time` on a bar `width` columns wide.
///
/// The first column is 0 and the last is the duration, matching
/// [`time_at_column`](crate::player::input::time_at_column).
pub fn column_for_time(time: f64, duration: f64, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    if duration <= 0.0 {
        return 0;
    }
    let ratio = (time / duration).clamp(0.0, 1.0);
    ((ratio * (width - 1) as f64).round() as usize).min(width - 1)
}

/// The range bar's characters and the columns of its handles.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBar {
    pub chars: Vec<char>,
    pub start_col: usize,
    pub end_col: usize,
}

impl RangeBar {
    pub fn in_range(&self, col: usize) -> bool {
        col >= self.start_col && col <= self.end_col
    }
}

/// Build the range bar character array.
///
/// The loop section is drawn heavy and the handles replace the characters at
/// their columns. The playhead is marked unless a handle sits on it.
pub fn build_range_bar_chars(
    width: usize,
    start: f64,
    end: f64,
    duration: f64,
    playhead: f64,
) -> RangeBar {
    let start_col = column_for_time(start, duration, width);
    let end_col = column_for_time(end, duration, width);

    let mut chars: Vec<char> = (0..width)
        .map(|i| if i >= start_col && i <= end_col { RANGE } else { TRACK })
        .collect();

    if width > 0 {
        let head = column_for_time(playhead, duration, width);
        chars[head] = PLAYHEAD;
        chars[start_col] = HANDLE;
        chars[end_col] = HANDLE;
    }

    RangeBar {
        chars,
        start_col,
        end_col,
    }
}

/// Render the range bar into a single row and remember where it is.
pub fn render_range_bar(frame: &mut Frame, area: Rect, state: &mut LoopState, theme: &Theme) {
    state.range_bar = Some(area);
    let bar = build_range_bar_chars(
        area.width as usize,
        state.start,
        state.end,
        state.duration,
        state.current_time,
    );

    let handle_style = |thumb: Thumb| {
        let style = theme.accent_bold_style();
        if state.dragging == Some(thumb) {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    };

    let spans: Vec<Span<'static>> = bar
        .chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let style = if i == bar.start_col {
                handle_style(Thumb::Start)
            } else if i == bar.end_col {
                handle_style(Thumb::End)
            } else if c == PLAYHEAD {
                theme.text_style()
            } else if bar.in_range(i) {
                theme.range_style()
            } else {
                theme.text_secondary_style()
            };
            Span::styled(c.to_string(), style)
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Label row under the range bar: loop start on the left, end on the right.
pub fn render_range_labels(frame: &mut Frame, area: Rect, state: &LoopState, theme: &Theme) {
    let left = format!("◀ {}", format_seconds(state.start));
    let right = format!("{} ▶", format_seconds(state.end));
    let length = format_seconds(state.end - state.start);

    let used = left.chars().count() + right.chars().count();
    let free = (area.width as usize).saturating_sub(used);
    let middle = if free >= length.len() + 6 {
        let label = format!("loop {}", length);
        let pad = free.saturating_sub(label.len());
        format!("{}{}{}", " ".repeat(pad / 2), label, " ".repeat(pad - pad / 2))
    } else {
        " ".repeat(free)
    };

    let line = Line::from(vec![
        Span::styled(left, theme.accent_style()),
        Span::styled(middle, theme.text_secondary_style()),
        Span::styled(right, theme.accent_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the progress gauge and remember where it is.
pub fn render_progress(frame: &mut Frame, area: Rect, state: &mut LoopState, theme: &Theme) {
    state.progress_bar = Some(area);
    let label = format!(
        "{} / {}  ({:.0}%)",
        format_seconds(state.current_time),
        format_seconds(state.duration),
        state.progress
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent).bg(theme.text_secondary))
        .ratio((state.progress / 100.0).clamp(0.0, 1.0))
        .label(Span::styled(label, theme.text_style().add_modifier(Modifier::BOLD)));
    frame.render_widget(gauge, area);
}
