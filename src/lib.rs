//! Promoreel renders short vertical promo videos from still images and one narration track.
//!
//! A render is one self-contained session:
//!
//! - Decode the narration and source images
//! - Plan a [`Timeline`] whose slides sum exactly to the narration length
//! - Drive a frame loop from a [`FrameClock`], composing Ken-Burns slides, push transitions,
//!   a vignette, an optional watermark and an opening hook caption
//! - Stream frames into a [`FrameSink`] and collect one [`RenderResult`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod compose;
mod foundation;
mod hook;
mod render;
mod timeline;

/// Encoding sinks and output format selection.
pub mod encode;
/// Session-oriented rendering API.
pub mod session;

pub use crate::assets::decode::{ImageSource, PreparedImage, decode_image};
pub use crate::assets::media::{AudioDecoder, AudioTrack, FfmpegAudioDecoder, MIX_SAMPLE_RATE};
pub use crate::compose::frame::{
    FrameDescriptor, HOOK_FLASH_PERIOD_SECS, HOOK_VISIBLE_SECS, HookOverlay, SlideLayer,
    SlidePhase, describe_frame,
};
pub use crate::compose::zoom::{ZOOM_RANGE, ZoomDir, cover_scale, zoom_factor};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8Premul, TIME_EPSILON};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::hook::catalog::{HOOKS, pick_hook, split_hook_lines};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::{OverlayText, SlideCompositor};
pub use crate::render::text::{SYSTEM_FONT_CANDIDATES, find_system_font};
pub use crate::timeline::plan::{
    BASELINE_SLIDE_SECS, MAX_SLIDES, TRANSITION_FRACTION, Timeline, plan_timeline,
};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::format::{
    BASELINE_FORMAT, FfmpegFormatProbe, FormatSupport, OutputFormat, PREFERRED_FORMATS,
    select_output_format,
};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::session::clock::{ClockMode, FixedStepClock, FrameClock, RealtimeClock};
pub use crate::session::job::RenderJob;
pub use crate::session::render_session::{
    DEFAULT_VIDEO_BITRATE, PreparedRender, RenderOpts, RenderRequest, RenderResult,
    RenderSession, RenderStats, render_with_ffmpeg,
};
pub use crate::session::state::{SlideshowState, Tick};
