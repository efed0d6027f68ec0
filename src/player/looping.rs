//! The loop check.

/// Where to seek when the playhead reached the loop end, if anywhere.
///
/// An empty range never triggers, otherwise a video shorter than one step
/// would seek on every frame.
pub fn loop_target(position: f64, start: f64, end: f64) -> Option<f64> {
    (end > start && position >= end).then_some(start)
}
