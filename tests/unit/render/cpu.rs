use super::*;

use crate::assets::decode::PreparedImage;
use crate::compose::frame::describe_frame;
use crate::compose::zoom::ZoomDir;
use crate::render::text::find_system_font;
use crate::timeline::plan::plan_timeline;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
    let mut bytes = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        bytes.extend_from_slice(&rgba);
    }
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(bytes),
    }
}

fn red_and_blue() -> ImageSource {
    ImageSource::from_prepared(vec![
        solid(32, 48, [255, 0, 0, 255]),
        solid(32, 48, [0, 0, 255, 255]),
    ])
    .unwrap()
}

const SMALL: Canvas = Canvas {
    width: 64,
    height: 96,
};

#[test]
fn steady_frame_shows_current_slide_with_clear_centre() {
    let images = red_and_blue();
    let timeline = plan_timeline(images.len(), 4.0).unwrap();
    let mut comp = SlideCompositor::new(SMALL, &images, &OverlayText::default()).unwrap();
    assert!(!comp.has_text());

    let desc = describe_frame(&timeline, SMALL.w(), 0.5).unwrap();
    let frame = comp.compose(&desc).unwrap();
    assert_eq!((frame.width, frame.height), (64, 96));
    assert_eq!(frame.data.len(), 64 * 96 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(32, 48).unwrap(), [255, 0, 0, 255]);
}

#[test]
fn corners_are_darkened_by_the_vignette() {
    let images = red_and_blue();
    let timeline = plan_timeline(images.len(), 4.0).unwrap();
    let mut comp = SlideCompositor::new(SMALL, &images, &OverlayText::default()).unwrap();

    let frame = comp.compose(&describe_frame(&timeline, SMALL.w(), 0.5).unwrap()).unwrap();
    let corner = frame.pixel(0, 0).unwrap();
    assert_eq!(corner[3], 255);
    assert!(corner[0] < 250, "corner red {}", corner[0]);
    assert!(corner[0] > 150, "corner red {}", corner[0]);
}

#[test]
fn transition_frame_pushes_incoming_slide_from_the_right() {
    let images = red_and_blue();
    let timeline = plan_timeline(images.len(), 4.0).unwrap();
    let mut comp = SlideCompositor::new(SMALL, &images, &OverlayText::default()).unwrap();

    // 0.2s before the boundary: linear progress 0.5, eased 0.75, shift 48px.
    let desc = describe_frame(&timeline, SMALL.w(), 1.8).unwrap();
    let frame = comp.compose(&desc).unwrap();

    let left = frame.pixel(4, 48).unwrap();
    assert!(left[0] > 200 && left[2] == 0, "left {left:?}");
    let right = frame.pixel(44, 48).unwrap();
    assert!(right[2] > 200 && right[0] == 0, "right {right:?}");
}

#[test]
fn frames_are_opaque_everywhere() {
    let images = red_and_blue();
    let timeline = plan_timeline(images.len(), 4.0).unwrap();
    let mut comp = SlideCompositor::new(SMALL, &images, &OverlayText::default()).unwrap();
    for elapsed in [0.0, 1.7, 1.95, 3.9] {
        let frame = comp
            .compose(&describe_frame(&timeline, SMALL.w(), elapsed).unwrap())
            .unwrap();
        assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
    }
}

#[test]
fn layer_with_unknown_image_is_an_invariant_error() {
    let images = red_and_blue();
    let mut comp = SlideCompositor::new(SMALL, &images, &OverlayText::default()).unwrap();
    let desc = FrameDescriptor {
        elapsed: 0.0,
        slide: 0,
        next_slide: 1,
        phase: crate::compose::frame::SlidePhase::Steady { progress: 0.0 },
        layers: vec![SlideLayer {
            slide: 0,
            image: 7,
            offset_x: 0.0,
            zoom_progress: 0.0,
            zoom_dir: ZoomDir::In,
        }],
        hook: None,
    };
    let err = comp.compose(&desc).unwrap_err();
    assert!(matches!(err, ReelError::Invariant(_)), "{err}");
}

#[test]
fn odd_canvas_fails_surface_acquisition() {
    let images = red_and_blue();
    let err = SlideCompositor::new(
        Canvas {
            width: 63,
            height: 96,
        },
        &images,
        &OverlayText::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, ReelError::Context(_)), "{err}");
}

#[test]
fn garbage_font_fails_surface_acquisition() {
    let images = red_and_blue();
    let overlay = OverlayText {
        font: Some(Arc::new(b"not a font".to_vec())),
        hook: "xin chao".to_string(),
        watermark: None,
    };
    let err = SlideCompositor::new(SMALL, &images, &overlay).err().unwrap();
    assert!(matches!(err, ReelError::Context(_)), "{err}");
}

#[test]
fn hook_is_drawn_only_inside_its_window() {
    let Some(font) = find_system_font() else {
        return;
    };
    let canvas = Canvas::PORTRAIT_720P;
    let images = red_and_blue();
    let timeline = plan_timeline(images.len(), 8.0).unwrap();
    let overlay = OverlayText {
        font: Some(font),
        hook: "Đừng bỏ lỡ".to_string(),
        watermark: None,
    };
    let mut with_text = SlideCompositor::new(canvas, &images, &overlay).unwrap();
    let mut plain = SlideCompositor::new(canvas, &images, &OverlayText::default()).unwrap();
    assert!(with_text.has_text());

    let early = describe_frame(&timeline, canvas.w(), 0.3).unwrap();
    assert!(early.hook.is_some());
    assert_ne!(
        with_text.compose(&early).unwrap().data,
        plain.compose(&early).unwrap().data
    );

    let late = describe_frame(&timeline, canvas.w(), 3.6).unwrap();
    assert!(late.hook.is_none());
    assert_eq!(
        with_text.compose(&late).unwrap().data,
        plain.compose(&late).unwrap().data
    );
}

#[test]
fn watermark_lands_in_the_bottom_right_corner() {
    let Some(font) = find_system_font() else {
        return;
    };
    let canvas = Canvas::PORTRAIT_720P;
    let images = red_and_blue();
    let timeline = plan_timeline(images.len(), 8.0).unwrap();
    let overlay = OverlayText {
        font: Some(font),
        hook: String::new(),
        watermark: Some("shop".to_string()),
    };
    let mut with_text = SlideCompositor::new(canvas, &images, &overlay).unwrap();
    let mut plain = SlideCompositor::new(canvas, &images, &OverlayText::default()).unwrap();

    let desc = describe_frame(&timeline, canvas.w(), 5.0).unwrap();
    let a = with_text.compose(&desc).unwrap();
    let b = plain.compose(&desc).unwrap();

    let mut changed = Vec::new();
    for y in 0..canvas.height {
        for x in 0..canvas.width {
            if a.pixel(x, y) != b.pixel(x, y) {
                changed.push((x, y));
            }
        }
    }
    assert!(!changed.is_empty());
    assert!(changed.iter().all(|&(x, y)| x > canvas.width / 2 && y > canvas.height / 2));
}
