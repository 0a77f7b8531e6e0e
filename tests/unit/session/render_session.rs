use super::*;

use crate::encode::sink::InMemorySink;

#[derive(Default)]
struct CountingDecoder {
    closes: u32,
}

impl AudioDecoder for CountingDecoder {
    fn decode(&mut self, _bytes: &[u8]) -> ReelResult<AudioTrack> {
        AudioTrack::new(10, 1, vec![0.0; 10])
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

#[test]
fn decoder_guard_closes_once_even_after_explicit_close() {
    let mut dec = CountingDecoder::default();
    {
        let mut guard = DecoderGuard::new(&mut dec);
        guard.decode(b"x").unwrap();
        guard.close();
        guard.close();
    }
    assert_eq!(dec.closes, 1);
}

#[test]
fn decoder_guard_closes_on_drop() {
    let mut dec = CountingDecoder::default();
    drop(DecoderGuard::new(&mut dec));
    assert_eq!(dec.closes, 1);
}

#[test]
fn sink_guard_aborts_unless_ended() {
    let cfg = SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::default(),
        format: crate::encode::format::BASELINE_FORMAT,
        duration_secs: 1.0,
        video_bitrate: DEFAULT_VIDEO_BITRATE,
        audio: None,
    };

    let mut sink = InMemorySink::new();
    drop(SinkGuard::begin(&mut sink, cfg.clone()).unwrap());
    assert!(sink.aborted());

    let mut sink = InMemorySink::new();
    let guard = SinkGuard::begin(&mut sink, cfg).unwrap();
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![255; 16],
        premultiplied: true,
    };
    guard.sink.push_frame(0.0, &frame).unwrap();
    guard.end().unwrap();
    assert!(sink.ended());
    assert!(!sink.aborted());
    assert_eq!(sink.frames().len(), 30);
}

#[test]
fn opts_default_to_portrait_30fps_5mbps_realtime() {
    let o = RenderOpts::default();
    assert_eq!(o.canvas, Canvas::PORTRAIT_720P);
    assert_eq!(o.fps, Fps { num: 30, den: 1 });
    assert_eq!(o.video_bitrate, 5_000_000);
    assert_eq!(o.clock, ClockMode::Realtime);
    assert_eq!(o.seed, None);
    assert!(o.validate().is_ok());
}

#[test]
fn opts_fill_missing_json_fields_from_default() {
    let o: RenderOpts = serde_json::from_str(r#"{"clock":"fixed_step","seed":7}"#).unwrap();
    assert_eq!(o.clock, ClockMode::FixedStep);
    assert_eq!(o.seed, Some(7));
    assert_eq!(o.canvas, Canvas::PORTRAIT_720P);
}

#[test]
fn session_rejects_bad_opts() {
    let mut o = RenderOpts::default();
    o.video_bitrate = 0;
    assert!(RenderSession::new(o).is_err());

    let mut o = RenderOpts::default();
    o.canvas = Canvas {
        width: 721,
        height: 1280,
    };
    assert!(RenderSession::new(o).is_err());

    let mut o = RenderOpts::default();
    o.fps = Fps { num: 0, den: 1 };
    assert!(RenderSession::new(o).is_err());
}
