use super::*;

#[test]
fn fps_validation_and_conversions() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 30.0).abs() < 1e-12);
    assert_eq!(fps.secs_to_frames_floor(1.0), 30);
    assert_eq!(fps.secs_to_frames_ceil(6.0), 180);
    assert_eq!(fps.secs_to_frames_ceil(0.5), 15);
    assert_eq!(fps.secs_to_frames_ceil(0.51), 16);
}

#[test]
fn slot_floor_tolerates_rounding_below_an_edge() {
    let fps = Fps::default();
    assert_eq!(fps.secs_to_frames_floor(0.1 - 1e-12), 3);
    assert_eq!(fps.secs_to_frames_floor(0.1 - 1e-6), 2);
}

#[test]
fn canvas_validation_rejects_odd_and_zero() {
    assert!(Canvas::PORTRAIT_720P.validate().is_ok());
    assert!(
        Canvas {
            width: 721,
            height: 1280
        }
        .validate()
        .is_err()
    );
    assert!(
        Canvas {
            width: 0,
            height: 2
        }
        .validate()
        .is_err()
    );
    assert!(
        Canvas {
            width: 70_000,
            height: 2
        }
        .validate()
        .is_err()
    );
}

#[test]
fn premul_from_straight_rounds() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
}

#[test]
fn rem_secs_stays_in_range() {
    assert!((rem_secs(5.0, 2.0) - 1.0).abs() < 1e-12);
    assert_eq!(rem_secs(4.0, 2.0), 0.0);
    let r = rem_secs(-1e-18, 2.0);
    assert!((0.0..2.0).contains(&r));
}
