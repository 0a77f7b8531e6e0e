use super::*;

use crate::timeline::plan::plan_timeline;

fn state(images: usize, duration: f64) -> SlideshowState {
    SlideshowState::new(plan_timeline(images, duration).unwrap(), 720.0)
}

#[test]
fn produces_frames_until_duration_then_finishes() {
    let mut s = state(3, 6.0);
    assert!(matches!(s.advance(0.0).unwrap(), Tick::Frame(_)));
    assert!(matches!(s.advance(5.99).unwrap(), Tick::Frame(_)));
    assert_eq!(s.advance(6.0).unwrap(), Tick::Finished);
    assert!(s.is_finished());
}

#[test]
fn finished_is_terminal() {
    let mut s = state(1, 0.5);
    assert_eq!(s.advance(0.7).unwrap(), Tick::Finished);
    assert_eq!(s.advance(0.1).unwrap(), Tick::Finished);
    assert_eq!(s.advance(0.0).unwrap(), Tick::Finished);
}

#[test]
fn decreasing_elapsed_is_rejected() {
    let mut s = state(2, 4.0);
    s.advance(1.0).unwrap();
    assert!(s.advance(0.5).is_err());
    // Equal is fine.
    assert!(s.advance(1.0).is_ok());
    assert!(s.advance(f64::INFINITY).is_err());
}

#[test]
fn fixed_step_walk_stays_in_range_and_counts_frames() {
    let mut s = state(2, 500.0);
    let count = s.timeline().slide_count();
    let mut frames = 0u64;
    let mut n = 0u64;
    loop {
        match s.advance(n as f64 / 30.0).unwrap() {
            Tick::Finished => break,
            Tick::Frame(d) => {
                assert!(d.slide < count);
                assert!(d.next_slide < count);
                frames += 1;
            }
        }
        n += 1;
    }
    assert_eq!(frames, 15_000);
}

#[test]
fn hook_window_boundary() {
    let mut s = state(3, 6.0);
    let Tick::Frame(before) = s.advance(3.49).unwrap() else {
        panic!("expected frame");
    };
    assert!(before.hook.is_some());
    let Tick::Frame(after) = s.advance(3.5).unwrap() else {
        panic!("expected frame");
    };
    assert!(after.hook.is_none());
}
