use crate::compose::frame::{FrameDescriptor, describe_frame};
use crate::foundation::core::TIME_EPSILON;
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::plan::Timeline;

/// Result of advancing the slideshow to a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    /// Compose and submit this frame.
    Frame(FrameDescriptor),
    /// Elapsed reached the narration length; stop the session.
    Finished,
}

/// Pollable render loop state, free of any surface or encoder.
///
/// Once [`Tick::Finished`] is returned every later call returns it too.
#[derive(Clone, Debug)]
pub struct SlideshowState {
    timeline: Timeline,
    canvas_width: f64,
    last_elapsed: Option<f64>,
    finished: bool,
}

impl SlideshowState {
    /// State for `timeline` drawn on a canvas `canvas_width` pixels wide.
    pub fn new(timeline: Timeline, canvas_width: f64) -> Self {
        Self {
            timeline,
            canvas_width,
            last_elapsed: None,
            finished: false,
        }
    }

    /// Schedule being played.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Whether the terminal state was reached.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Move to `elapsed` seconds.
    ///
    /// Fails on non-finite or decreasing `elapsed`.
    pub fn advance(&mut self, elapsed: f64) -> ReelResult<Tick> {
        if self.finished {
            return Ok(Tick::Finished);
        }
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(ReelError::validation(format!(
                "elapsed must be finite and >= 0, got {elapsed}"
            )));
        }
        if let Some(last) = self.last_elapsed
            && elapsed + TIME_EPSILON < last
        {
            return Err(ReelError::validation(format!(
                "elapsed went backwards: {elapsed}s after {last}s"
            )));
        }
        self.last_elapsed = Some(elapsed);

        if elapsed + TIME_EPSILON >= self.timeline.duration_secs() {
            self.finished = true;
            return Ok(Tick::Finished);
        }
        describe_frame(&self.timeline, self.canvas_width, elapsed).map(Tick::Frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
