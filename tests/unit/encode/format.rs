use super::*;

const MUXERS: &str = "\
File formats:
 D. = Demuxing supported
 .E = Muxing supported
 --
  E mp4             MP4 (MPEG-4 Part 14)
 D  mov,mp4,m4a,3gp,3g2,mj2 QuickTime / MOV
  E webm            WebM
";

const ENCODERS_FULL: &str = "\
Encoders:
 V..... = Video
 A..... = Audio
 ------
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10 (codec h264)
 V....D mpeg4                MPEG-4 part 2
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 V....D libvpx               libvpx VP8 (codec vp8)
 A....D aac                  AAC (Advanced Audio Coding)
 A....D libopus              libopus Opus (codec opus)
 A....D libvorbis            libvorbis (codec vorbis)
";

const ENCODERS_NO_X264: &str = "\
Encoders:
 ------
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 A....D aac                  AAC (Advanced Audio Coding)
 A....D libopus              libopus Opus (codec opus)
";

struct Nothing;

impl FormatSupport for Nothing {
    fn supports(&self, _format: &OutputFormat) -> bool {
        false
    }
}

struct Everything;

impl FormatSupport for Everything {
    fn supports(&self, _format: &OutputFormat) -> bool {
        true
    }
}

#[test]
fn listing_parser_reads_names_after_separator() {
    let probe = FfmpegFormatProbe::from_listings(MUXERS, ENCODERS_FULL);
    assert!(probe.has_muxer("mp4"));
    assert!(probe.has_muxer("webm"));
    // Demux-only rows are not muxers.
    assert!(!probe.has_muxer("mov"));
    assert!(!probe.has_muxer("File"));
    assert!(probe.has_encoder("libx264"));
    assert!(probe.has_encoder("libvorbis"));
    assert!(!probe.has_encoder("Video"));
}

#[test]
fn full_ffmpeg_prefers_h264_mp4() {
    let probe = FfmpegFormatProbe::from_listings(MUXERS, ENCODERS_FULL);
    let f = select_output_format(&probe);
    assert_eq!(f, PREFERRED_FORMATS[0]);
    assert_eq!(f.extension(), "mp4");
}

#[test]
fn h264_in_webm_is_never_selected() {
    let probe = FfmpegFormatProbe::from_listings(MUXERS, ENCODERS_FULL);
    assert!(!probe.supports(&PREFERRED_FORMATS[2]));
}

#[test]
fn falls_through_to_vp9_webm() {
    let muxers = "--\n  E webm  WebM\n";
    let probe = FfmpegFormatProbe::from_listings(muxers, ENCODERS_NO_X264);
    let f = select_output_format(&probe);
    assert_eq!(f.mime_type, "video/webm;codecs=vp9");
    assert_eq!(f.extension(), "webm");
}

#[test]
fn nothing_supported_returns_baseline() {
    let f = select_output_format(&Nothing);
    assert_eq!(f, BASELINE_FORMAT);
    assert_eq!(f.extension(), "webm");
}

#[test]
fn selection_is_first_match_in_order() {
    assert_eq!(select_output_format(&Everything), PREFERRED_FORMATS[0]);
}

#[test]
fn extension_follows_mime() {
    for f in PREFERRED_FORMATS {
        let expected = if f.mime_type.contains("mp4") {
            "mp4"
        } else {
            "webm"
        };
        assert_eq!(f.extension(), expected);
    }
    assert!(PREFERRED_FORMATS[0].needs_fragmented_output());
    assert!(!BASELINE_FORMAT.needs_fragmented_output());
}
