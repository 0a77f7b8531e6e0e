use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::temp::TempFileGuard;
use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate narration is decoded to.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Decoded narration, owned by one render for its lifetime.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub samples: Arc<Vec<f32>>,
}

impl AudioTrack {
    /// Build a track, rejecting empty or malformed buffers.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> ReelResult<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(ReelError::decode(
                "audio sample_rate and channels must be non-zero",
            ));
        }
        if !samples.len().is_multiple_of(usize::from(channels)) {
            return Err(ReelError::decode(
                "interleaved sample count is not a multiple of the channel count",
            ));
        }
        if samples.is_empty() {
            return Err(ReelError::decode("decoded audio contains no samples"));
        }
        Ok(Self {
            sample_rate,
            channels,
            samples: Arc::new(samples),
        })
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> u64 {
        (self.samples.len() / usize::from(self.channels)) as u64
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Write the samples as raw interleaved `f32le`.
    pub(crate) fn write_f32le(&self, out_path: &std::path::Path) -> ReelResult<()> {
        let mut bytes = Vec::<u8>::with_capacity(self.samples.len() * 4);
        for &sample in self.samples.iter() {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        std::fs::write(out_path, bytes)
            .with_context(|| format!("failed to write audio file '{}'", out_path.display()))?;
        Ok(())
    }
}

/// Turns encoded narration bytes into an [`AudioTrack`].
///
/// `close` releases whatever the decoder holds (temp files, child processes). The render calls
/// it exactly once on every exit path, after which the decoder is not used again.
pub trait AudioDecoder {
    /// Decode `bytes` into PCM.
    fn decode(&mut self, bytes: &[u8]) -> ReelResult<AudioTrack>;
    /// Release decoding resources.
    fn close(&mut self);
}

/// Decodes through the system `ffmpeg` binary to 48 kHz stereo `f32`.
#[derive(Debug)]
pub struct FfmpegAudioDecoder {
    sample_rate: u32,
    staged: TempFileGuard,
}

impl Default for FfmpegAudioDecoder {
    fn default() -> Self {
        Self::new(MIX_SAMPLE_RATE)
    }
}

impl FfmpegAudioDecoder {
    /// Decoder resampling to `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            staged: TempFileGuard::default(),
        }
    }
}

impl AudioDecoder for FfmpegAudioDecoder {
    fn decode(&mut self, bytes: &[u8]) -> ReelResult<AudioTrack> {
        if bytes.is_empty() {
            return Err(ReelError::decode("audio input is empty"));
        }

        self.staged.release();
        self.staged = TempFileGuard::reserve("narration", "bin");
        let staged = self
            .staged
            .path()
            .ok_or_else(|| ReelError::decode("failed to reserve audio staging path"))?
            .to_path_buf();
        stage_audio(&staged, bytes)?;

        let out = std::process::Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&staged)
            .args([
                "-vn",
                "-f",
                "f32le",
                "-acodec",
                "pcm_f32le",
                "-ac",
                "2",
                "-ar",
                &self.sample_rate.to_string(),
                "pipe:1",
            ])
            .output()
            .map_err(|e| ReelError::decode(format!("failed to run ffmpeg for audio decode: {e}")))?;

        if !out.status.success() {
            return Err(ReelError::decode(format!(
                "ffmpeg audio decode failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let samples = f32le_to_samples(&out.stdout)?;
        AudioTrack::new(self.sample_rate, 2, samples)
    }

    fn close(&mut self) {
        self.staged.release();
    }
}

pub(crate) fn f32le_to_samples(bytes: &[u8]) -> ReelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn stage_audio(path: &std::path::Path, bytes: &[u8]) -> ReelResult<()> {
    std::fs::write(path, bytes).map_err(|e| {
        ReelError::decode(format!("failed to stage audio at '{}': {e}", path.display()))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
