use std::collections::BTreeSet;

use crate::foundation::error::{ReelError, ReelResult};

/// One container/codec combination the encoder can be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OutputFormat {
    /// MIME type reported to callers, e.g. `video/mp4;codecs=avc1,aac`.
    pub mime_type: &'static str,
    /// ffmpeg muxer name.
    pub muxer: &'static str,
    /// ffmpeg video encoder name.
    pub video_encoder: &'static str,
    /// ffmpeg audio encoder name.
    pub audio_encoder: &'static str,
}

impl OutputFormat {
    /// File extension matching the container actually produced.
    pub fn extension(&self) -> &'static str {
        if self.mime_type.contains("mp4") {
            "mp4"
        } else {
            "webm"
        }
    }

    /// Whether the muxer needs fragmented output to stream to a non-seekable pipe.
    pub(crate) fn needs_fragmented_output(&self) -> bool {
        self.muxer == "mp4"
    }
}

/// Formats tried in order; the first one the runtime supports wins.
pub const PREFERRED_FORMATS: &[OutputFormat] = &[
    OutputFormat {
        mime_type: "video/mp4;codecs=avc1,aac",
        muxer: "mp4",
        video_encoder: "libx264",
        audio_encoder: "aac",
    },
    OutputFormat {
        mime_type: "video/mp4",
        muxer: "mp4",
        video_encoder: "mpeg4",
        audio_encoder: "aac",
    },
    OutputFormat {
        mime_type: "video/webm;codecs=h264",
        muxer: "webm",
        video_encoder: "libx264",
        audio_encoder: "libopus",
    },
    OutputFormat {
        mime_type: "video/webm;codecs=vp9",
        muxer: "webm",
        video_encoder: "libvpx-vp9",
        audio_encoder: "libopus",
    },
];

/// Returned when nothing in [`PREFERRED_FORMATS`] is supported.
pub const BASELINE_FORMAT: OutputFormat = OutputFormat {
    mime_type: "video/webm",
    muxer: "webm",
    video_encoder: "libvpx",
    audio_encoder: "libvorbis",
};

/// Runtime capability query for output formats.
pub trait FormatSupport {
    /// Whether `format` can be produced right now.
    fn supports(&self, format: &OutputFormat) -> bool;
}

/// Pick the first supported entry of [`PREFERRED_FORMATS`], else [`BASELINE_FORMAT`].
pub fn select_output_format(support: &dyn FormatSupport) -> OutputFormat {
    let chosen = PREFERRED_FORMATS
        .iter()
        .find(|f| support.supports(f))
        .copied()
        .unwrap_or(BASELINE_FORMAT);
    tracing::debug!(mime = chosen.mime_type, "selected output format");
    chosen
}

/// Capabilities of the system `ffmpeg`, read from `-muxers` and `-encoders` once.
#[derive(Clone, Debug, Default)]
pub struct FfmpegFormatProbe {
    muxers: BTreeSet<String>,
    encoders: BTreeSet<String>,
}

impl FfmpegFormatProbe {
    /// Query the `ffmpeg` found on `PATH`.
    pub fn probe() -> ReelResult<Self> {
        let muxers = run_listing("-muxers")?;
        let encoders = run_listing("-encoders")?;
        Ok(Self::from_listings(&muxers, &encoders))
    }

    /// Build from captured `ffmpeg -muxers` / `ffmpeg -encoders` output.
    pub fn from_listings(muxers: &str, encoders: &str) -> Self {
        Self {
            muxers: parse_listing(muxers, |flags| flags.contains('E')),
            encoders: parse_listing(encoders, |_| true),
        }
    }

    /// Whether the muxer list names `muxer`.
    pub fn has_muxer(&self, muxer: &str) -> bool {
        self.muxers.contains(muxer)
    }

    /// Whether the encoder list names `encoder`.
    pub fn has_encoder(&self, encoder: &str) -> bool {
        self.encoders.contains(encoder)
    }
}

impl FormatSupport for FfmpegFormatProbe {
    fn supports(&self, format: &OutputFormat) -> bool {
        container_accepts(format)
            && self.has_muxer(format.muxer)
            && self.has_encoder(format.video_encoder)
            && self.has_encoder(format.audio_encoder)
    }
}

/// Codec restrictions of the muxers we emit.
fn container_accepts(format: &OutputFormat) -> bool {
    match format.muxer {
        "webm" => {
            matches!(
                format.video_encoder,
                "libvpx" | "libvpx-vp9" | "libaom-av1" | "libsvtav1"
            ) && matches!(format.audio_encoder, "libopus" | "libvorbis")
        }
        _ => true,
    }
}

fn run_listing(flag: &str) -> ReelResult<String> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-hide_banner", flag])
        .output()
        .map_err(|e| ReelError::encode(format!("failed to run ffmpeg {flag}: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::encode(format!(
            "ffmpeg {flag} exited with status {}",
            out.status
        )));
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// Names listed after the dashed separator line, keeping rows whose flag column passes `keep`.
fn parse_listing(text: &str, keep: impl Fn(&str) -> bool) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut in_body = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if !in_body {
            in_body = !trimmed.is_empty() && trimmed.chars().all(|c| c == '-');
            continue;
        }
        let mut cols = trimmed.split_whitespace();
        let (Some(flags), Some(name)) = (cols.next(), cols.next()) else {
            continue;
        };
        if keep(flags) {
            names.extend(name.split(',').map(str::to_owned));
        }
    }
    names
}

#[cfg(test)]
#[path = "../../tests/unit/encode/format.rs"]
mod tests;
