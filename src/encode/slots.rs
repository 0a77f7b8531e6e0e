use crate::foundation::core::{Fps, TIME_EPSILON};
use crate::foundation::error::{ReelError, ReelResult};

/// What a sink must write for one pushed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SlotWrite {
    /// Copies of the previously written frame filling slots the caller skipped. When nothing has
    /// been written yet, these are copies of the pushed frame instead.
    pub(crate) repeat_last: u64,
    /// Whether the pushed frame itself occupies a new slot.
    pub(crate) write: bool,
}

impl SlotWrite {
    const DROP: Self = Self {
        repeat_last: 0,
        write: false,
    };
}

/// Maps wall-clock tick times onto fixed `1 / fps` output slots.
///
/// Constant-rate output keeps the encoded length equal to the narration no matter how unevenly
/// the ticks arrive: late ticks are back-filled, early duplicates dropped, and [`Self::finish`]
/// pads up to `ceil(duration * fps)` slots.
#[derive(Clone, Debug)]
pub(crate) struct FrameSlots {
    fps: Fps,
    total: u64,
    written: u64,
    last_elapsed: Option<f64>,
}

impl FrameSlots {
    pub(crate) fn new(fps: Fps, duration_secs: f64) -> Self {
        Self {
            fps,
            total: fps.secs_to_frames_ceil(duration_secs),
            written: 0,
            last_elapsed: None,
        }
    }

    pub(crate) fn admit(&mut self, elapsed: f64) -> ReelResult<SlotWrite> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(ReelError::validation(format!(
                "frame elapsed must be finite and >= 0, got {elapsed}"
            )));
        }
        if let Some(last) = self.last_elapsed
            && elapsed + TIME_EPSILON < last
        {
            return Err(ReelError::validation(format!(
                "frame pushed out of order: {elapsed}s after {last}s"
            )));
        }
        self.last_elapsed = Some(elapsed);

        let slot = self.fps.secs_to_frames_floor(elapsed);
        if slot >= self.total || slot < self.written {
            return Ok(SlotWrite::DROP);
        }
        let plan = SlotWrite {
            repeat_last: slot - self.written,
            write: true,
        };
        self.written = slot + 1;
        Ok(plan)
    }

    /// Number of trailing copies of the last frame needed to fill the stream.
    pub(crate) fn finish(&mut self) -> u64 {
        let pad = self.total.saturating_sub(self.written);
        self.written = self.total;
        pad
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/slots.rs"]
mod tests;
