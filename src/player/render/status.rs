//! Header, status line, footer and the input prompt.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_fixed;
use crate::player::state::LoopState;
use crate::theme::Theme;

/// Footer key hints in normal mode.
pub const FOOTER_KEYS: &[(&str, &str)] = &[
    ("space", "play"),
    ("[ ]", "set start/end"),
    ("+/-", "speed"),
    ("o", "open"),
    ("c", "copy link"),
    ("?", "help"),
    ("q", "quit"),
];

/// Footer key hints while the prompt is open.
pub const PROMPT_KEYS: &[(&str, &str)] = &[("enter", "load"), ("esc", "cancel")];

/// Speed as shown to the user (`1x`, `0.75x`).
pub fn format_speed(speed: f64) -> String {
    let text = format!("{:.2}", speed);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{}x", text)
}

/// One line summary: video, player state, speed and repeat.
pub fn header_line(state: &LoopState, backend: &str, theme: &Theme) -> Line<'static> {
    let player = if state.ready {
        state.player_state.label()
    } else {
        "loading"
    };
    let repeat = if state.repeat { "repeat on" } else { "repeat off" };

    Line::from(vec![
        Span::styled("ytloop ", theme.accent_bold_style()),
        Span::styled(state.video_id.to_string(), theme.text_style()),
        Span::styled(format!("  [{} {}]", backend, player), theme.text_secondary_style()),
        Span::styled(
            format!("  speed {}", format_speed(state.speed)),
            theme.text_style(),
        ),
        Span::styled(format!("  {}", repeat), theme.text_secondary_style()),
    ])
}

/// Render a status line: the error if any, else the message, else the link.
pub fn render_status_line(frame: &mut Frame, area: Rect, state: &LoopState, link: &str, theme: &Theme) {
    let line = if let Some(error) = &state.error {
        Line::from(Span::styled(error.clone(), theme.error_style()))
    } else if let Some(status) = &state.status {
        Line::from(Span::styled(status.clone(), theme.text_style()))
    } else {
        Line::from(vec![
            Span::styled("link ", theme.text_secondary_style()),
            Span::styled(link.to_string(), theme.text_style()),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render a centered footer with keybinding hints.
///
/// Takes pairs of (key, description) and joins them with " | " separators.
pub fn render_footer(frame: &mut Frame, area: Rect, keys: &[(&str, &str)], theme: &Theme) {
    let footer = Paragraph::new(Line::from(build_footer_spans(keys, theme)))
        .style(Style::default().fg(theme.text_secondary))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Build styled spans for footer keybinding hints.
///
/// Each key is highlighted with the theme accent color, descriptions use
/// the secondary text color, and entries are separated by " | ".
fn build_footer_spans(keys: &[(&str, &str)], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(keys.len() * 3);
    for (i, (key, desc)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", theme.text_secondary_style()));
        }
        spans.push(Span::styled(key.to_string(), theme.accent_style()));
        spans.push(Span::styled(
            format!(": {}", desc),
            theme.text_secondary_style(),
        ));
    }
    spans
}

/// Render the URL/ID prompt as a modal box.
pub fn render_prompt(frame: &mut Frame, area: Rect, input: &str, error: Option<&str>, theme: &Theme) {
    let width = area.width.saturating_sub(4).clamp(20, 72);
    let popup = centered_fixed(width, 5, area);

    let block = Block::default()
        .title(" YouTube URL or video ID ")
        .borders(Borders::ALL)
        .border_style(theme.accent_style());

    // Keep the end of long input visible
    let room = (width as usize).saturating_sub(5);
    let skip = input.chars().count().saturating_sub(room);
    let visible: String = input.chars().skip(skip).collect();

    let message = match error {
        Some(e) => Line::from(Span::styled(e.to_string(), theme.error_style())),
        None => Line::from(Span::styled(
            "e.g. https://youtu.be/dQw4w9WgXcQ",
            theme.text_secondary_style(),
        )),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("> ", theme.accent_style()),
            Span::styled(visible, theme.text_style()),
            Span::styled("_", theme.accent_style()),
        ]),
        Line::from(""),
        message,
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
