//! Render orchestration: frame clocks, the pollable slideshow state machine, and the session that
//! ties decoding, composition and encoding together.

/// Frame clocks driving the render loop.
pub mod clock;
/// JSON render jobs.
pub mod job;
/// The render entry points.
pub mod render_session;
/// Pollable per-tick state machine.
pub mod state;
