use std::io::{Read, Write as _};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::slots::FrameSlots;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

const STDOUT_CHUNK_BYTES: usize = 64 * 1024;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Value passed to `-loglevel`.
    pub loglevel: String,
}

impl Default for FfmpegSinkOpts {
    fn default() -> Self {
        Self {
            bg_rgba: [0, 0, 0, 255],
            loglevel: "error".to_string(),
        }
    }
}

/// Sink that spawns the system `ffmpeg`, streams raw frames to stdin and collects the container
/// from stdout.
///
/// Audio is optional and provided through `SinkConfig.audio`. Dropping a started sink kills the
/// child process.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<JoinHandle<std::io::Result<Vec<Vec<u8>>>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    has_last: bool,
    slots: Option<FrameSlots>,
    cfg: Option<SinkConfig>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stdout_drain: None,
            stderr_drain: None,
            scratch: Vec::new(),
            has_last: false,
            slots: None,
            cfg: None,
        }
    }

    fn write_scratch(&mut self, copies: u64) -> ReelResult<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("ffmpeg sink is already finalized"));
        };
        for _ in 0..copies {
            stdin.write_all(&self.scratch).map_err(|e| {
                ReelError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
            })?;
        }
        Ok(())
    }

    fn join_stderr(&mut self) -> String {
        match self.stderr_drain.take().map(JoinHandle::join) {
            Some(Ok(Ok(bytes))) => String::from_utf8_lossy(&bytes).trim().to_string(),
            _ => String::new(),
        }
    }
}

impl Default for FfmpegSink {
    fn default() -> Self {
        Self::new(FfmpegSinkOpts::default())
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        cfg.validate()?;
        if self.child.is_some() {
            return Err(ReelError::encode("ffmpeg sink already has an active session"));
        }
        if !is_ffmpeg_on_path() {
            return Err(ReelError::encode(
                "ffmpeg is required for encoding, but was not found on PATH",
            ));
        }

        let mut cmd = build_command(&cfg, &self.opts)?;
        let mut child = cmd.spawn().map_err(|e| {
            ReelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (Some(stdin), Some(mut stdout), Some(mut stderr)) = (stdin, stdout, stderr) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ReelError::encode("failed to open ffmpeg pipes (unexpected)"));
        };

        let stdout_drain = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            let mut buf = vec![0u8; STDOUT_CHUNK_BYTES];
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                chunks.push(buf[..n].to_vec());
            }
            Ok(chunks)
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            mime = cfg.format.mime_type,
            width = cfg.width,
            height = cfg.height,
            duration_secs = cfg.duration_secs,
            "ffmpeg encode session started"
        );

        self.scratch = vec![0u8; cfg.frame_len()];
        self.has_last = false;
        self.slots = Some(FrameSlots::new(cfg.fps, cfg.duration_secs));
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_drain = Some(stdout_drain);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, elapsed: f64, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(ReelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let plan = self
            .slots
            .as_mut()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?
            .admit(elapsed)?;
        if !plan.write {
            return Ok(());
        }

        if self.has_last {
            self.write_scratch(plan.repeat_last)?;
        }
        flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;
        let leading = if self.has_last { 0 } else { plan.repeat_last };
        self.has_last = true;
        self.write_scratch(leading + 1)
    }

    fn end(&mut self) -> ReelResult<Vec<Vec<u8>>> {
        let mut slots = self
            .slots
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;
        let pad = slots.finish();
        if pad > 0 {
            if !self.has_last {
                self.abort();
                return Err(ReelError::encode(
                    "session ended before any frame was pushed",
                ));
            }
            if let Err(e) = self.write_scratch(pad) {
                self.abort();
                return Err(e);
            }
        }

        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg sink not started"))?;
        let status = child
            .wait()
            .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;

        let chunks = match self.stdout_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::encode("ffmpeg stdout drain thread panicked"))?
                .map_err(|e| ReelError::encode(format!("ffmpeg stdout read failed: {e}")))?,
            None => Vec::new(),
        };
        let stderr = self.join_stderr();
        self.cfg = None;

        if !status.success() {
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {status}: {stderr}"
            )));
        }
        if chunks.is_empty() {
            return Err(ReelError::encode("ffmpeg produced no output"));
        }
        Ok(chunks)
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!("ffmpeg encode session aborted");
        }
        if let Some(handle) = self.stdout_drain.take() {
            let _ = handle.join();
        }
        let _ = self.join_stderr();
        self.slots = None;
        self.cfg = None;
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.abort();
    }
}

fn build_command(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> ReelResult<Command> {
    let mut cmd = Command::new("ffmpeg");
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Input: raw RGBA8 frames. `ffmpeg` does not understand premul, so frames are flattened
    // before being written to stdin (push_frame).
    cmd.args([
        "-hide_banner",
        "-loglevel",
        &opts.loglevel,
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        &format!("{}x{}", cfg.width, cfg.height),
    ]);
    push_input_fps(&mut cmd, cfg.fps);
    cmd.args(["-i", "pipe:0"]);

    if let Some(audio) = cfg.audio.as_ref() {
        if audio.sample_rate == 0 {
            return Err(ReelError::validation(
                "audio sample_rate must be non-zero when audio is enabled",
            ));
        }
        if audio.channels == 0 {
            return Err(ReelError::validation(
                "audio channels must be non-zero when audio is enabled",
            ));
        }
        cmd.args([
            "-f",
            "f32le",
            "-ar",
            &audio.sample_rate.to_string(),
            "-ac",
            &audio.channels.to_string(),
            "-i",
        ])
        .arg(&audio.path)
        .args(["-map", "0:v:0", "-map", "1:a:0", "-c:a", cfg.format.audio_encoder]);
    } else {
        cmd.arg("-an");
    }

    cmd.args([
        "-c:v",
        cfg.format.video_encoder,
        "-pix_fmt",
        "yuv420p",
        "-b:v",
        &cfg.video_bitrate.to_string(),
        "-t",
        &format!("{:.6}", cfg.duration_secs),
    ]);
    if cfg.format.needs_fragmented_output() {
        // stdout is not seekable, so the moov atom cannot be patched at the end.
        cmd.args(["-movflags", "frag_keyframe+empty_moov"]);
    }
    cmd.args(["-f", cfg.format.muxer, "pipe:1"]);
    Ok(cmd)
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> ReelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (s[0] as u16 + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (s[1] as u16 + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (s[2] as u16 + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
