//! Encoding sinks.
//!
//! Sinks consume composed frames in non-decreasing elapsed order and hand back the encoded
//! container bytes when the session ends.

/// `ffmpeg`-based sink (container bytes streamed from the system `ffmpeg`).
pub mod ffmpeg;
/// Output container/codec preference list and runtime capability probing.
pub mod format;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
pub(crate) mod slots;
