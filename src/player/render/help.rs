//! Help overlay rendering for the looper.
//!
//! Displays a centered box with all keyboard and mouse shortcuts.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_fixed;
use crate::theme::Theme;

/// Shortcut sections: (heading, [(keys, description)]).
pub const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Playback",
        &[
            ("Space", "Play / Pause"),
            ("<- / ->", "Seek -/+ seek step"),
            ("Home", "Go to loop start"),
            ("+ / -", "Speed up / down"),
        ],
    ),
    (
        "Loop range",
        &[
            ("[ / ]", "Set start / end at playhead"),
            (", / .", "Move start -/+ one step"),
            ("< / >", "Move end -/+ one step"),
            ("x", "Clear range (whole video)"),
            ("r", "Toggle repeat"),
            ("Mouse", "Drag handles, click bar to seek"),
        ],
    ),
    (
        "Video",
        &[
            ("o or /", "Open URL / ID prompt"),
            ("c", "Copy loop link"),
        ],
    ),
    (
        "General",
        &[("?", "Show this help"), ("q / Esc", "Quit")],
    ),
];

const KEY_WIDTH: usize = 10;

/// Help text as styled lines.
pub fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, (heading, keys)) in HELP_SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            heading.to_string(),
            theme.accent_bold_style(),
        )));
        for (key, desc) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<width$}", key, width = KEY_WIDTH), theme.accent_style()),
                Span::styled(desc.to_string(), theme.text_style()),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        theme.text_secondary_style(),
    )));
    lines
}

/// Render the help overlay over `area`.
pub fn render_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let lines = help_lines(theme);
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    let popup = centered_fixed(width, height, area);

    let block = Block::default()
        .title(" ytloop help ")
        .borders(Borders::ALL)
        .border_style(theme.accent_style());

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
