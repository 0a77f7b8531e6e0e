use super::*;
use crate::timeline::plan::plan_timeline;

const W: f64 = 720.0;

#[test]
fn steady_state_at_start() {
    let t = plan_timeline(3, 6.0).unwrap();
    let f = describe_frame(&t, W, 0.0).unwrap();
    assert_eq!(f.slide, 0);
    assert_eq!(f.next_slide, 1);
    assert_eq!(f.phase, SlidePhase::Steady { progress: 0.0 });
    assert_eq!(f.layers.len(), 1);
    assert_eq!(f.layers[0].offset_x, 0.0);
    assert!((f.layers[0].zoom() - 1.0).abs() < 1e-12);
}

#[test]
fn steady_progress_reaches_one_at_transition_start() {
    let t = plan_timeline(3, 6.0).unwrap();
    // Steady part of slide 0 is [0, 1.6).
    let f = describe_frame(&t, W, 0.8).unwrap();
    match f.phase {
        SlidePhase::Steady { progress } => assert!((progress - 0.5).abs() < 1e-9),
        other => panic!("expected steady, got {other:?}"),
    }
    let f = describe_frame(&t, W, 1.6).unwrap();
    match f.phase {
        SlidePhase::Steady { progress } => assert!((progress - 1.0).abs() < 1e-9),
        other => panic!("expected steady, got {other:?}"),
    }
}

#[test]
fn transition_pushes_in_lockstep() {
    let t = plan_timeline(3, 6.0).unwrap();
    let f = describe_frame(&t, W, 1.8).unwrap();
    let SlidePhase::Transition { progress, eased } = f.phase else {
        panic!("expected transition, got {:?}", f.phase);
    };
    assert!((progress - 0.5).abs() < 1e-9);
    assert!((eased - 0.75).abs() < 1e-9);

    let out = f.layers[0];
    let inc = f.layers[1];
    assert_eq!((out.slide, inc.slide), (0, 1));
    assert_eq!(out.zoom_progress, 1.0);
    assert_eq!(inc.zoom_progress, 0.0);
    assert!((-out.offset_x + inc.offset_x - W).abs() < 1e-9);
    assert!((out.offset_x + W * 0.75).abs() < 1e-9);
}

#[test]
fn transition_offsets_are_monotonic() {
    let t = plan_timeline(3, 6.0).unwrap();
    let mut prev_out = f64::INFINITY;
    let mut prev_in = f64::INFINITY;
    let mut e = 1.6 + 1e-6;
    while e < 2.0 {
        let f = describe_frame(&t, W, e).unwrap();
        assert_eq!(f.layers.len(), 2, "elapsed {e}");
        let shift = -f.layers[0].offset_x;
        assert!((shift + f.layers[1].offset_x - W).abs() < 1e-9);
        assert!(f.layers[0].offset_x <= prev_out);
        assert!(f.layers[1].offset_x <= prev_in);
        prev_out = f.layers[0].offset_x;
        prev_in = f.layers[1].offset_x;
        e += 0.01;
    }
}

#[test]
fn zoom_parity_follows_sequence_position_not_image() {
    // Two sources, 8 s: sequence [0, 1, 0, 1]; slide 2 shows image 0 again but zooms in.
    let t = plan_timeline(2, 8.0).unwrap();
    let f1 = describe_frame(&t, W, 2.5).unwrap();
    assert_eq!(f1.layers[0].image, 1);
    assert_eq!(f1.layers[0].zoom_dir, ZoomDir::Out);
    let f3 = describe_frame(&t, W, 6.5).unwrap();
    assert_eq!((f3.slide, f3.layers[0].image), (3, 1));
    assert_eq!(f3.layers[0].zoom_dir, ZoomDir::Out);
    let f2 = describe_frame(&t, W, 4.5).unwrap();
    assert_eq!((f2.slide, f2.layers[0].image), (2, 0));
    assert_eq!(f2.layers[0].zoom_dir, ZoomDir::In);
}

#[test]
fn last_slide_wraps_to_first_during_transition() {
    let t = plan_timeline(3, 6.0).unwrap();
    let f = describe_frame(&t, W, 5.9).unwrap();
    assert_eq!(f.slide, 2);
    assert_eq!(f.next_slide, 0);
    assert_eq!(f.layers[1].image, 0);
}

#[test]
fn slide_index_never_escapes_the_sequence() {
    for (n, d) in [(1usize, 0.5f64), (3, 6.0), (2, 500.0), (7, 31.3)] {
        let t = plan_timeline(n, d).unwrap();
        let mut e = 0.0;
        while e < d {
            let f = describe_frame(&t, W, e).unwrap();
            assert!(f.slide < t.slide_count());
            assert!(f.next_slide < t.slide_count());
            e += 1.0 / 60.0;
        }
    }
}

#[test]
fn boundary_ticks_do_not_flap() {
    let t = plan_timeline(3, 6.0).unwrap();
    // A tick a rounding error short of 2.0 belongs to slide 1.
    let f = describe_frame(&t, W, 2.0 - 1e-12).unwrap();
    assert_eq!(f.slide, 1);
    assert_eq!(f.phase, SlidePhase::Steady { progress: 0.0 });
}

#[test]
fn hook_visibility_window_and_flash() {
    let t = plan_timeline(3, 6.0).unwrap();
    let mut e = 0.0;
    while e < 6.0 {
        let f = describe_frame(&t, W, e).unwrap();
        assert_eq!(f.hook.is_some(), e < HOOK_VISIBLE_SECS, "elapsed {e}");
        e += 1.0 / 30.0;
    }
    assert!(describe_frame(&t, W, 3.5).unwrap().hook.is_none());
    assert_eq!(
        describe_frame(&t, W, 0.1).unwrap().hook,
        Some(HookOverlay { flash: true })
    );
    assert_eq!(
        describe_frame(&t, W, 0.3).unwrap().hook,
        Some(HookOverlay { flash: false })
    );
    assert_eq!(
        describe_frame(&t, W, 3.1).unwrap().hook,
        Some(HookOverlay { flash: true })
    );
}

#[test]
fn single_slide_short_audio_transitions_into_itself() {
    let t = plan_timeline(1, 0.5).unwrap();
    let f = describe_frame(&t, W, 0.45).unwrap();
    assert!(matches!(f.phase, SlidePhase::Transition { .. }));
    assert_eq!(f.layers[0].image, 0);
    assert_eq!(f.layers[1].image, 0);
}

#[test]
fn negative_or_nan_elapsed_is_rejected() {
    let t = plan_timeline(3, 6.0).unwrap();
    assert!(describe_frame(&t, W, -0.1).is_err());
    assert!(describe_frame(&t, W, f64::NAN).is_err());
}
