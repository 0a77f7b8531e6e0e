use std::path::PathBuf;

use crate::encode::format::OutputFormat;
use crate::encode::slots::FrameSlots;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] when the encode session starts.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Constant output frame rate.
    pub fps: Fps,
    /// Container and codecs to produce.
    pub format: OutputFormat,
    /// Exact output length in seconds (the narration duration).
    pub duration_secs: f64,
    /// Target video bitrate in bits per second.
    pub video_bitrate: u32,
    /// Optional external raw PCM audio file input.
    pub audio: Option<AudioInputConfig>,
}

impl SinkConfig {
    /// Reject configurations no encoder can honour.
    pub fn validate(&self) -> ReelResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("sink width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "sink width/height must be even (required for yuv420p output)",
            ));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(ReelError::validation(format!(
                "sink duration must be finite and > 0, got {}",
                self.duration_secs
            )));
        }
        Ok(())
    }

    pub(crate) fn frame_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Raw PCM audio input configuration for sinks that support audio encoding.
#[derive(Debug, Clone)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Sink contract for one encode session.
///
/// Ordering contract: `push_frame` is called with non-decreasing `elapsed`. A session ends with
/// exactly one of `end` (returning the encoded output chunks in order) or `abort`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push the frame composed for `elapsed` seconds.
    fn push_frame(&mut self, elapsed: f64, frame: &FrameRGBA) -> ReelResult<()>;
    /// Finalize and return the encoded output chunks.
    fn end(&mut self) -> ReelResult<Vec<Vec<u8>>>;
    /// Tear the session down without producing output. Safe to call in any state.
    fn abort(&mut self);
}

/// In-memory sink for tests and debugging.
///
/// Applies the same constant-rate slot scheduling as the encoding sinks, so `frames` is exactly
/// what an encoder would have received.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    slots: Option<FrameSlots>,
    pushed: Vec<f64>,
    /// Frames in output slot order.
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
    aborted: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Elapsed times of every `push_frame` call, in call order.
    pub fn pushed_elapsed(&self) -> &[f64] {
        &self.pushed
    }

    /// Whether `end` completed.
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Whether `abort` was called on a started session.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    fn push_slot(&mut self, frame: FrameRGBA) {
        let idx = FrameIndex(self.frames.len() as u64);
        self.frames.push((idx, frame));
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        cfg.validate()?;
        self.slots = Some(FrameSlots::new(cfg.fps, cfg.duration_secs));
        self.cfg = Some(cfg);
        self.frames.clear();
        self.pushed.clear();
        self.ended = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, elapsed: f64, frame: &FrameRGBA) -> ReelResult<()> {
        let slots = self
            .slots
            .as_mut()
            .ok_or_else(|| ReelError::encode("in-memory sink not started"))?;
        let plan = slots.admit(elapsed)?;
        self.pushed.push(elapsed);

        for _ in 0..plan.repeat_last {
            let fill = self
                .frames
                .last()
                .map(|(_, f)| f.clone())
                .unwrap_or_else(|| frame.clone());
            self.push_slot(fill);
        }
        if plan.write {
            self.push_slot(frame.clone());
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<Vec<Vec<u8>>> {
        let mut slots = self
            .slots
            .take()
            .ok_or_else(|| ReelError::encode("in-memory sink not started"))?;
        let pad = slots.finish();
        if pad > 0 {
            let last = self
                .frames
                .last()
                .map(|(_, f)| f.clone())
                .ok_or_else(|| ReelError::encode("session ended before any frame was pushed"))?;
            for _ in 0..pad {
                self.push_slot(last.clone());
            }
        }
        self.ended = true;
        Ok(Vec::new())
    }

    fn abort(&mut self) {
        if self.slots.take().is_some() {
            self.aborted = true;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
