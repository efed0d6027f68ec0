//! Time formatting and parsing for loop bounds.

/// Format seconds as `[H:]MM:SS.ff`.
///
/// Hours are shown only when non-zero; minutes and seconds are zero padded
/// and seconds always carry two decimals. Negative and non-finite input is
/// treated as zero.
pub fn format_seconds(input: f64) -> String {
    let input = if input.is_finite() && input > 0.0 {
        input
    } else {
        0.0
    };

    let hours = (input / 3600.0).floor() as u64;
    let rem = input % 3600.0;
    let minutes = (rem / 60.0).floor() as u64;
    let seconds = rem % 60.0;

    let hours_str = if hours > 0 {
        format!("{}:", hours)
    } else {
        String::new()
    };
    format!("{}{:02}:{:05.2}", hours_str, minutes, seconds)
}

/// Error parsing a time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time '{input}': expected SS, MM:SS or H:MM:SS")]
pub struct TimeParseError {
    pub input: String,
}

/// Parse `SS[.ff]`, `MM:SS[.ff]` or `H:MM:SS[.ff]` into seconds.
pub fn parse_time(input: &str) -> Result<f64, TimeParseError> {
    let err = || TimeParseError {
        input: input.to_string(),
    };
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(err());
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return Err(err());
    }

    let (last, rest) = parts.split_last().ok_or_else(err)?;
    let seconds: f64 = last.parse().map_err(|_| err())?;
    if !seconds.is_finite() || seconds < 0.0 || (!rest.is_empty() && seconds >= 60.0) {
        return Err(err());
    }

    let mut total = seconds;
    let mut multiplier = 60.0;
    for (i, part) in rest.iter().rev().enumerate() {
        let value: u64 = part.parse().map_err(|_| err())?;
        // Minutes are bounded when an hour field is present
        if i == 0 && rest.len() == 2 && value >= 60 {
            return Err(err());
        }
        total += value as f64 * multiplier;
        multiplier *= 60.0;
    }
    Ok(total)
}
