//! Loop links: the `videoId`/`start`/`end` query parameters.
//!
//! A loop link is the only persisted state of a session. It can be given as a
//! bare query string (`?videoId=dQw4w9WgXcQ&start=10&end=20`) or as any URL
//! that carries those parameters.

use std::fmt;

use url::form_urlencoded;
use url::Url;

use super::id::{InvalidVideoInput, VideoId};

/// Query parameter holding the video identifier.
pub const VIDEO_ID_PARAM: &str = "videoId";
/// Query parameter holding the loop start in seconds.
pub const START_PARAM: &str = "start";
/// Query parameter holding the loop end in seconds.
pub const END_PARAM: &str = "end";

/// Errors when reading a loop link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error(transparent)]
    InvalidVideo(#[from] InvalidVideoInput),

    #[error("Not a loop link: {0}")]
    NotALink(String),
}

/// Session state as mirrored into query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopLink {
    pub video_id: Option<VideoId>,
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl LoopLink {
    /// Create a link for a video with optional loop bounds.
    pub fn new(video_id: VideoId, start: Option<f64>, end: Option<f64>) -> Self {
        Self {
            video_id: Some(video_id),
            start,
            end,
        }
    }

    /// Whether `input` looks like a loop link rather than a plain video input.
    ///
    /// Watch URLs also carry a query string, so only the presence of one of
    /// our own parameter names counts.
    pub fn looks_like_link(input: &str) -> bool {
        let query = match extract_query(input.trim()) {
            Some(q) => q,
            None => return false,
        };
        form_urlencoded::parse(query.as_bytes())
            .any(|(k, _)| k == VIDEO_ID_PARAM || k == START_PARAM || k == END_PARAM)
    }

    /// Parse a loop link from a query string or URL.
    ///
    /// Unknown parameters are ignored, as are `start`/`end` values that are
    /// not finite non-negative numbers. An invalid `videoId` is an error.
    pub fn parse(input: &str) -> Result<Self, LinkError> {
        let trimmed = input.trim();
        let query =
            extract_query(trimmed).ok_or_else(|| LinkError::NotALink(trimmed.to_string()))?;

        let mut link = LoopLink::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                VIDEO_ID_PARAM => link.video_id = Some(VideoId::parse(&value)?),
                START_PARAM => link.start = parse_seconds(&value),
                END_PARAM => link.end = parse_seconds(&value),
                _ => {}
            }
        }
        Ok(link)
    }

    /// Encode as a query string without the leading `?`.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(id) = &self.video_id {
            serializer.append_pair(VIDEO_ID_PARAM, id.as_str());
        }
        if let Some(start) = self.start {
            serializer.append_pair(START_PARAM, &format_param_seconds(start));
        }
        if let Some(end) = self.end {
            serializer.append_pair(END_PARAM, &format_param_seconds(end));
        }
        serializer.finish()
    }

    /// Render the link against a base URL (empty base gives `?query`).
    pub fn to_url(&self, base: &str) -> String {
        let query = self.to_query();
        if base.is_empty() {
            return format!("?{}", query);
        }
        match Url::parse(base) {
            Ok(mut url) => {
                url.set_query(Some(&query));
                url.to_string()
            }
            Err(_) => {
                let base = base.trim_end_matches('?');
                format!("{}?{}", base, query)
            }
        }
    }
}

impl fmt::Display for LoopLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.to_query())
    }
}

/// Pull the query component out of a bare query string or a URL.
fn extract_query(input: &str) -> Option<&str> {
    let query = match input.find('?') {
        Some(pos) => &input[pos + 1..],
        None if input.contains('=') => input,
        None => return None,
    };
    Some(query.split('#').next().unwrap_or(query))
}

fn parse_seconds(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Format seconds for a query value: the shortest text that parses back
/// to the same value, so integral values lose the `.0`.
fn format_param_seconds(seconds: f64) -> String {
    format!("{}", seconds)
}
