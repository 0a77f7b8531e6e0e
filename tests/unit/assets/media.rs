use super::*;

#[test]
fn duration_counts_frames_not_samples() {
    let track = AudioTrack::new(4, 2, vec![0.0; 16]).unwrap();
    assert_eq!(track.frames(), 8);
    assert!((track.duration_secs() - 2.0).abs() < 1e-12);
}

#[test]
fn malformed_tracks_are_decode_errors() {
    assert!(matches!(
        AudioTrack::new(48_000, 2, Vec::new()),
        Err(ReelError::Decode(_))
    ));
    assert!(matches!(
        AudioTrack::new(48_000, 2, vec![0.0; 3]),
        Err(ReelError::Decode(_))
    ));
    assert!(matches!(
        AudioTrack::new(0, 2, vec![0.0; 2]),
        Err(ReelError::Decode(_))
    ));
}

#[test]
fn f32le_parsing_checks_alignment() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0.5f32.to_le_bytes());
    bytes.extend_from_slice(&(-1.0f32).to_le_bytes());
    assert_eq!(f32le_to_samples(&bytes).unwrap(), vec![0.5, -1.0]);
    assert!(f32le_to_samples(&bytes[..5]).is_err());
}

#[test]
fn write_f32le_round_trips_through_disk() {
    let track = AudioTrack::new(8, 1, vec![0.25, -0.75]).unwrap();
    let guard = crate::assets::temp::TempFileGuard::reserve("test", "f32le");
    let path = guard.path().unwrap().to_path_buf();
    track.write_f32le(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(f32le_to_samples(&bytes).unwrap(), vec![0.25, -0.75]);
    drop(guard);
    assert!(!path.exists());
}

#[test]
fn ffmpeg_decoder_rejects_garbage_and_cleans_up() {
    if !crate::encode::ffmpeg::is_ffmpeg_on_path() {
        return;
    }
    let mut dec = FfmpegAudioDecoder::default();
    let err = dec.decode(b"this is not audio").unwrap_err();
    assert!(matches!(err, ReelError::Decode(_)), "{err}");
    let staged = dec.staged.path().map(|p| p.to_path_buf());
    dec.close();
    if let Some(p) = staged {
        assert!(!p.exists());
    }
}

#[test]
fn ffmpeg_decoder_rejects_empty_input_without_spawning() {
    let mut dec = FfmpegAudioDecoder::default();
    assert!(matches!(dec.decode(&[]), Err(ReelError::Decode(_))));
    dec.close();
}

#[test]
fn staging_failure_is_a_decode_error() {
    let dir = crate::assets::temp::TempFileGuard::reserve("missing-dir", "d");
    let path = dir.path().unwrap().join("narration.bin");
    assert!(matches!(
        stage_audio(&path, b"abc"),
        Err(ReelError::Decode(_))
    ));
}
