use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng as _;

use crate::assets::decode::ImageSource;
use crate::assets::media::{AudioDecoder, AudioTrack, FfmpegAudioDecoder};
use crate::assets::temp::TempFileGuard;
use crate::compose::frame::describe_frame;
use crate::encode::ffmpeg::FfmpegSink;
use crate::encode::format::{FfmpegFormatProbe, FormatSupport, select_output_format};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::hook::catalog::pick_hook;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::{OverlayText, SlideCompositor};
use crate::session::clock::{ClockMode, FrameClock};
use crate::session::state::{SlideshowState, Tick};
use crate::timeline::plan::{Timeline, plan_timeline};

/// Default target video bitrate in bits per second.
pub const DEFAULT_VIDEO_BITRATE: u32 = 5_000_000;

/// Options controlling a slideshow render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOpts {
    /// Output canvas (720x1280 portrait by default).
    pub canvas: Canvas,
    /// Capture rate.
    pub fps: Fps,
    /// Target video bitrate in bits per second.
    pub video_bitrate: u32,
    /// Clock driving the frame loop.
    pub clock: ClockMode,
    /// Seed for hook selection. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::PORTRAIT_720P,
            fps: Fps::default(),
            video_bitrate: DEFAULT_VIDEO_BITRATE,
            clock: ClockMode::default(),
            seed: None,
        }
    }
}

impl RenderOpts {
    /// Reject options no render can run with.
    pub fn validate(&self) -> ReelResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.video_bitrate == 0 {
            return Err(ReelError::validation("video_bitrate must be > 0"));
        }
        Ok(())
    }
}

/// Inputs for one render, as supplied by the caller.
#[derive(Clone, Debug, Default)]
pub struct RenderRequest {
    /// Encoded source images, in display order.
    pub images: Vec<Vec<u8>>,
    /// Encoded narration audio.
    pub audio: Vec<u8>,
    /// Optional watermark label, drawn as `@label`.
    pub watermark: Option<String>,
    /// Font for the hook and watermark. Without one, text layers are skipped.
    pub font: Option<Arc<Vec<u8>>>,
}

/// Render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct RenderStats {
    /// Clock ticks observed, including the terminal one.
    pub ticks: u64,
    /// Frames composed and submitted to the sink.
    pub frames_composed: u64,
    /// Narration length, which is also the output length.
    pub duration_secs: f64,
    /// Slides in the planned timeline.
    pub slide_count: usize,
}

/// The finished deliverable of one render.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Encoded container bytes.
    pub bytes: Arc<[u8]>,
    /// File extension of the container actually produced (`mp4` or `webm`).
    pub extension: &'static str,
    /// MIME type of the selected format.
    pub mime_type: &'static str,
    /// Hook caption shown in the opening seconds.
    pub hook: &'static str,
    /// Loop statistics.
    pub stats: RenderStats,
}

/// Decoded inputs and the derived schedule, shared by full renders and previews.
#[derive(Debug)]
pub struct PreparedRender {
    /// Decoded narration.
    pub audio: AudioTrack,
    /// Decoded source images.
    pub images: ImageSource,
    /// Slide schedule over the narration.
    pub timeline: Timeline,
    /// Hook caption for this render.
    pub hook: &'static str,
}

/// Calls [`AudioDecoder::close`] exactly once, on whichever exit path comes first.
struct DecoderGuard<'a> {
    decoder: &'a mut dyn AudioDecoder,
    closed: bool,
}

impl<'a> DecoderGuard<'a> {
    fn new(decoder: &'a mut dyn AudioDecoder) -> Self {
        Self {
            decoder,
            closed: false,
        }
    }

    fn decode(&mut self, bytes: &[u8]) -> ReelResult<AudioTrack> {
        self.decoder.decode(bytes)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.decoder.close();
        }
    }
}

impl Drop for DecoderGuard<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Aborts the sink unless the session ended cleanly.
struct SinkGuard<'a> {
    sink: &'a mut dyn FrameSink,
    open: bool,
}

impl<'a> SinkGuard<'a> {
    fn begin(sink: &'a mut dyn FrameSink, cfg: SinkConfig) -> ReelResult<Self> {
        let guard = Self { sink, open: true };
        guard.sink.begin(cfg)?;
        Ok(guard)
    }

    fn end(mut self) -> ReelResult<Vec<Vec<u8>>> {
        // A failed `end` is followed by an abort on drop.
        let out = self.sink.end();
        self.open = out.is_err();
        out
    }
}

impl Drop for SinkGuard<'_> {
    fn drop(&mut self) {
        if self.open {
            self.sink.abort();
        }
    }
}

/// Renders slideshows with one set of options.
///
/// Each call to [`Self::render`] is one self-contained session: it owns its decoder, surface and
/// encode session from start to finish and releases them on every exit path.
#[derive(Debug)]
pub struct RenderSession {
    opts: RenderOpts,
    cancel: Option<Arc<AtomicBool>>,
}

impl RenderSession {
    /// Create a session after validating `opts`.
    pub fn new(opts: RenderOpts) -> ReelResult<Self> {
        opts.validate()?;
        Ok(Self { opts, cancel: None })
    }

    /// Abort the frame loop when `flag` becomes `true`. Checked once per tick.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Options this session renders with.
    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Decode inputs, plan the timeline and pick the hook, without composing anything.
    pub fn prepare(
        &self,
        req: &RenderRequest,
        decoder: &mut dyn AudioDecoder,
    ) -> ReelResult<PreparedRender> {
        let mut decoder = DecoderGuard::new(decoder);
        let prepared = self.prepare_with(req, &mut decoder);
        decoder.close();
        prepared
    }

    fn prepare_with(
        &self,
        req: &RenderRequest,
        decoder: &mut DecoderGuard<'_>,
    ) -> ReelResult<PreparedRender> {
        let audio = decoder.decode(&req.audio)?;
        let images = ImageSource::decode_all(&req.images)?;
        let timeline = plan_timeline(images.len(), audio.duration_secs())?;
        let hook = match self.opts.seed {
            Some(seed) => pick_hook(&mut rand::rngs::StdRng::seed_from_u64(seed)),
            None => pick_hook(&mut rand::rngs::StdRng::from_entropy()),
        };
        Ok(PreparedRender {
            audio,
            images,
            timeline,
            hook,
        })
    }

    /// Compose the single frame shown at `elapsed` seconds.
    pub fn preview_frame(
        &self,
        req: &RenderRequest,
        decoder: &mut dyn AudioDecoder,
        elapsed: f64,
    ) -> ReelResult<FrameRGBA> {
        let prepared = self.prepare(req, decoder)?;
        let desc = describe_frame(&prepared.timeline, self.opts.canvas.w(), elapsed)?;
        let mut compositor = SlideCompositor::new(
            self.opts.canvas,
            &prepared.images,
            &overlay_for(req, prepared.hook),
        )?;
        compositor.compose(&desc)
    }

    /// Render with the clock selected in [`RenderOpts::clock`].
    pub fn render(
        &self,
        req: &RenderRequest,
        decoder: &mut dyn AudioDecoder,
        formats: &dyn FormatSupport,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderResult> {
        let mut clock = self.opts.clock.build(self.opts.fps);
        self.render_with_clock(req, decoder, formats, sink, clock.as_mut())
    }

    /// Render, taking tick times from `clock`.
    #[tracing::instrument(skip_all, fields(images = req.images.len()))]
    pub fn render_with_clock(
        &self,
        req: &RenderRequest,
        decoder: &mut dyn AudioDecoder,
        formats: &dyn FormatSupport,
        sink: &mut dyn FrameSink,
        clock: &mut dyn FrameClock,
    ) -> ReelResult<RenderResult> {
        let mut decoder = DecoderGuard::new(decoder);
        let prepared = self.prepare_with(req, &mut decoder)?;
        let duration_secs = prepared.audio.duration_secs();

        let mut compositor = SlideCompositor::new(
            self.opts.canvas,
            &prepared.images,
            &overlay_for(req, prepared.hook),
        )?;
        let format = select_output_format(formats);

        let mut audio_tmp = TempFileGuard::reserve("narration", "f32le");
        let audio_path = audio_tmp
            .path()
            .ok_or_else(|| ReelError::encode("failed to reserve audio temp path"))?
            .to_path_buf();
        prepared.audio.write_f32le(&audio_path)?;

        let cfg = SinkConfig {
            width: self.opts.canvas.width,
            height: self.opts.canvas.height,
            fps: self.opts.fps,
            format,
            duration_secs,
            video_bitrate: self.opts.video_bitrate,
            audio: Some(AudioInputConfig {
                path: audio_path,
                sample_rate: prepared.audio.sample_rate,
                channels: prepared.audio.channels,
            }),
        };

        tracing::info!(
            duration_secs,
            slides = prepared.timeline.slide_count(),
            mime = format.mime_type,
            hook = prepared.hook,
            "render session started"
        );

        let mut state = SlideshowState::new(prepared.timeline.clone(), self.opts.canvas.w());
        let mut stats = RenderStats {
            duration_secs,
            slide_count: prepared.timeline.slide_count(),
            ..RenderStats::default()
        };

        let session = SinkGuard::begin(sink, cfg)?;
        // Frame time and the encoder's audio both start at zero once the sink is live.
        clock.start();
        loop {
            if self
                .cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                tracing::info!(frames = stats.frames_composed, "render cancelled");
                return Err(ReelError::Cancelled);
            }

            let elapsed = clock.next_tick();
            stats.ticks += 1;
            let desc = match state.advance(elapsed)? {
                Tick::Finished => break,
                Tick::Frame(desc) => desc,
            };
            let frame = compositor.compose(&desc)?;
            session.sink.push_frame(elapsed, &frame)?;
            stats.frames_composed += 1;
        }

        let chunks = session.end()?;
        audio_tmp.release();
        decoder.close();

        let bytes: Arc<[u8]> = chunks.concat().into();
        tracing::info!(
            bytes = bytes.len(),
            frames = stats.frames_composed,
            "render session finished"
        );

        Ok(RenderResult {
            bytes,
            extension: format.extension(),
            mime_type: format.mime_type,
            hook: prepared.hook,
            stats,
        })
    }
}

fn overlay_for(req: &RenderRequest, hook: &str) -> OverlayText {
    OverlayText {
        font: req.font.clone(),
        hook: hook.to_string(),
        watermark: req.watermark.clone(),
    }
}

/// Render through the system `ffmpeg`: ffmpeg audio decode, runtime format probe, ffmpeg sink.
pub fn render_with_ffmpeg(req: &RenderRequest, opts: RenderOpts) -> ReelResult<RenderResult> {
    let session = RenderSession::new(opts)?;
    let formats = FfmpegFormatProbe::probe()?;
    let mut decoder = FfmpegAudioDecoder::default();
    let mut sink = FfmpegSink::default();
    session.render(req, &mut decoder, &formats, &mut sink)
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
