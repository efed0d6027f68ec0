//! Theme configuration for TUI and CLI
//!
//! Centralizes all color and style definitions.
//! Provides both ratatui styles (for the looper) and ANSI escape codes (for CLI).

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary text color (used for most content)
    pub text_primary: Color,
    /// Secondary/dimmed text color
    pub text_secondary: Color,
    /// Accent color for highlights and key hints
    pub accent: Color,
    /// The selected loop range on the range bar
    pub range: Color,
    /// Error/warning color
    pub error: Color,
    /// Success color
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}

impl Theme {
    /// Light gray text with a green accent.
    /// Uses standard ANSI colors for consistent terminal rendering.
    pub fn standard() -> Self {
        Self {
            text_primary: Color::Gray,
            text_secondary: Color::DarkGray,
            accent: Color::Green,
            range: Color::LightRed,
            error: Color::Red,
            success: Color::Green,
        }
    }

    /// No colors at all, for `NO_COLOR`.
    pub fn monochrome() -> Self {
        Self {
            text_primary: Color::Reset,
            text_secondary: Color::Reset,
            accent: Color::Reset,
            range: Color::Reset,
            error: Color::Reset,
            success: Color::Reset,
        }
    }

    // Style helpers

    /// Style for primary text content.
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Style for secondary/dimmed text.
    pub fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Style for accented/highlighted text.
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for bold accented text (keybindings, etc).
    pub fn accent_bold_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn range_style(&self) -> Style {
        Style::default().fg(self.range)
    }

    /// Style for error text.
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    // ANSI color helpers for CLI output

    /// Format text with the accent color (for CLI output).
    pub fn accent_text(&self, text: &str) -> String {
        paint(self.accent, text)
    }

    /// Format text with the primary color (for CLI output).
    pub fn primary_text(&self, text: &str) -> String {
        paint(self.text_primary, text)
    }

    /// Format text with the secondary color (for CLI output).
    pub fn secondary_text(&self, text: &str) -> String {
        paint(self.text_secondary, text)
    }

    /// Format text with the error color (for CLI output).
    pub fn error_text(&self, text: &str) -> String {
        paint(self.error, text)
    }

    /// Format text with the success color (for CLI output).
    pub fn success_text(&self, text: &str) -> String {
        paint(self.success, text)
    }
}

/// Raw ANSI sequences for CLI output that is not tied to a theme color.
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
}

/// Wrap text in the color's escape code; uncolored text is returned as is.
fn paint(color: Color, text: &str) -> String {
    match color_to_ansi(color) {
        "" => text.to_string(),
        code => format!("{}{}{}", code, text, ansi::RESET),
    }
}

/// Convert a ratatui Color to an ANSI escape code.
fn color_to_ansi(color: Color) -> &'static str {
    match color {
        Color::Black => "\x1b[30m",
        Color::Red => "\x1b[31m",
        Color::Green => "\x1b[32m",
        Color::Yellow => "\x1b[33m",
        Color::Blue => "\x1b[34m",
        Color::Magenta => "\x1b[35m",
        Color::Cyan => "\x1b[36m",
        Color::Gray => "\x1b[37m",
        Color::DarkGray => "\x1b[90m",
        Color::LightRed => "\x1b[91m",
        Color::LightGreen => "\x1b[92m",
        Color::LightYellow => "\x1b[93m",
        Color::LightBlue => "\x1b[94m",
        Color::LightMagenta => "\x1b[95m",
        Color::LightCyan => "\x1b[96m",
        Color::White => "\x1b[97m",
        // Reset, RGB and indexed colors stay uncolored
        _ => "",
    }
}

/// Theme for this process: monochrome when `NO_COLOR` is set.
pub fn current_theme() -> Theme {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        Theme::monochrome()
    } else {
        Theme::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_standard() {
        let theme = Theme::default();
        assert_eq!(theme.text_primary, Color::Gray);
        assert_eq!(theme.accent, Color::Green);
    }

    #[test]
    fn style_helpers_return_correct_colors() {
        let theme = Theme::standard();
        assert_eq!(theme.text_style().fg, Some(Color::Gray));
        assert_eq!(theme.text_secondary_style().fg, Some(Color::DarkGray));
        assert_eq!(theme.accent_style().fg, Some(Color::Green));
        assert_eq!(theme.range_style().fg, Some(Color::LightRed));
    }

    #[test]
    fn ansi_text_helpers_wrap_with_color_codes() {
        let theme = Theme::standard();

        let accent = theme.accent_text("test");
        assert!(accent.starts_with("\x1b[32m"));
        assert!(accent.ends_with("\x1b[0m"));
        assert!(accent.contains("test"));

        let error = theme.error_text("oops");
        assert_eq!(error, "\x1b[31moops\x1b[0m");
    }

    #[test]
    fn monochrome_leaves_text_plain() {
        let theme = Theme::monochrome();
        assert_eq!(theme.primary_text("hello"), "hello");
        assert_eq!(theme.success_text("done"), "done");
    }

    #[test]
    fn color_to_ansi_maps_standard_colors() {
        assert_eq!(color_to_ansi(Color::Green), "\x1b[32m");
        assert_eq!(color_to_ansi(Color::Red), "\x1b[31m");
        assert_eq!(color_to_ansi(Color::DarkGray), "\x1b[90m");
        assert_eq!(color_to_ansi(Color::Reset), "");
    }
}
