//! YouTube video identifier validation and extraction.
//!
//! Accepts a bare 11-character identifier or any of the common YouTube URL
//! shapes that carry one, and rejects everything else with a single,
//! user-facing error message.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Message shown to the user when input is neither an ID nor a YouTube URL.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid Youtube URL or Video ID";

/// Input that is neither a video ID nor a recognised YouTube URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid Youtube URL or Video ID")]
pub struct InvalidVideoInput {
    /// The rejected input, as given
    pub input: String,
}

/// A validated 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("static regex"))
}

/// URL shapes that carry a video ID, each with the ID in capture group 1.
fn url_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // youtube.com/watch?v=ID (v may appear anywhere in the query)
            r"^(?:https?://)?(?:www\.|m\.|music\.)?youtube\.com/watch/?\?(?:[^#]*&)?v=([A-Za-z0-9_-]{11})(?:[&#].*)?$",
            // youtu.be/ID
            r"^(?:https?://)?(?:www\.)?youtu\.be/([A-Za-z0-9_-]{11})(?:[?#/].*)?$",
            // youtube.com/embed/ID, /shorts/ID, /live/ID, /v/ID
            r"^(?:https?://)?(?:www\.|m\.)?youtube(?:-nocookie)?\.com/(?:embed|shorts|live|v)/([A-Za-z0-9_-]{11})(?:[?#/].*)?$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static regex"))
        .collect()
    })
}

impl VideoId {
    /// Parse user input into a video ID.
    ///
    /// A bare identifier is accepted unchanged; a YouTube URL has its
    /// identifier extracted. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, InvalidVideoInput> {
        let trimmed = input.trim();

        if id_pattern().is_match(trimmed) {
            return Ok(Self(trimmed.to_string()));
        }

        url_patterns()
            .iter()
            .find_map(|re| re.captures(trimmed))
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| InvalidVideoInput {
                input: input.to_string(),
            })
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoId {
    type Err = InvalidVideoInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoId {
    type Error = InvalidVideoInput;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}
