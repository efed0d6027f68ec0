//! Video addressing: identifiers and loop links.

mod id;
mod link;

pub use id::{InvalidVideoInput, VideoId, INVALID_INPUT_MESSAGE};
pub use link::{LinkError, LoopLink, END_PARAM, START_PARAM, VIDEO_ID_PARAM};

/// Resolve command-line input into a loop link.
///
/// Loop links keep their bounds. Plain IDs and YouTube URLs become a link
/// for that video; a YouTube URL carrying `start`/`end` keeps them too.
pub fn resolve_input(input: &str) -> Result<LoopLink, LinkError> {
    if !LoopLink::looks_like_link(input) {
        return Ok(LoopLink::new(VideoId::parse(input)?, None, None));
    }

    let link = LoopLink::parse(input);
    if matches!(&link, Ok(parsed) if parsed.video_id.is_some()) {
        return link;
    }
    match VideoId::parse(input) {
        Ok(id) => {
            let (start, end) = link.map(|l| (l.start, l.end)).unwrap_or((None, None));
            Ok(LoopLink::new(id, start, end))
        }
        // Bounds only, or a broken videoId
        Err(_) => link,
    }
}
