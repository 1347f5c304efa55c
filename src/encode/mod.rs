//! Video output: frame sinks and the single-session recorder.

/// `ffmpeg`-based sink (WebM/MP4 via system `ffmpeg`).
pub mod ffmpeg;
/// Playback-to-video driver with the one-active-recording rule.
pub mod recorder;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
