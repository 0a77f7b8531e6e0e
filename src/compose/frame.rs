use crate::animation::ease::Ease;
use crate::compose::zoom::{ZoomDir, zoom_factor};
use crate::foundation::core::{TIME_EPSILON, rem_secs};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::plan::Timeline;

/// The hook caption is drawn while `elapsed` is below this.
pub const HOOK_VISIBLE_SECS: f64 = 3.5;
/// Blink period of the hook's flash outline; it is lit for the first half.
pub const HOOK_FLASH_PERIOD_SECS: f64 = 0.5;

/// Where the current slide is in its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum SlidePhase {
    /// Ken-Burns only. `progress` in `[0, 1]` across the non-transition part of the slide.
    Steady {
        /// Zoom progress of the current slide.
        progress: f64,
    },
    /// Pushing to the next slide.
    Transition {
        /// Linear transition progress in `[0, 1]`.
        progress: f64,
        /// `progress` after ease-out-quad.
        eased: f64,
    },
}

/// One image layer to draw, back to front.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SlideLayer {
    /// Position in the slide sequence.
    pub slide: usize,
    /// Source image index.
    pub image: usize,
    /// Horizontal shift in canvas pixels.
    pub offset_x: f64,
    /// Ken-Burns progress used for the zoom factor.
    pub zoom_progress: f64,
    /// Zoom direction, keyed on `slide` parity.
    pub zoom_dir: ZoomDir,
}

impl SlideLayer {
    /// Zoom multiplier applied on top of the cover-fit scale.
    pub fn zoom(&self) -> f64 {
        zoom_factor(self.zoom_dir, self.zoom_progress)
    }
}

/// State of the hook overlay for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct HookOverlay {
    /// Whether the blinking outline is lit on this frame.
    pub flash: bool,
}

/// Everything needed to draw one frame, independent of any surface or encoder.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameDescriptor {
    /// Seconds since the session started.
    pub elapsed: f64,
    /// Current slide position.
    pub slide: usize,
    /// Slide that follows `slide` (wraps to 0 after the last).
    pub next_slide: usize,
    /// Steady or transitioning.
    pub phase: SlidePhase,
    /// Image layers in draw order (outgoing before incoming).
    pub layers: Vec<SlideLayer>,
    /// Hook overlay, present only during the opening seconds.
    pub hook: Option<HookOverlay>,
}

/// Describe the frame shown at `elapsed` seconds.
///
/// Pure: the same timeline, width and time always produce the same descriptor.
pub fn describe_frame(
    timeline: &Timeline,
    canvas_width: f64,
    elapsed: f64,
) -> ReelResult<FrameDescriptor> {
    if !elapsed.is_finite() || elapsed < 0.0 {
        return Err(ReelError::validation(format!(
            "elapsed must be finite and >= 0, got {elapsed}"
        )));
    }
    let count = timeline.slide_count();
    let slide_duration = timeline.slide_duration();
    let transition_duration = timeline.transition_duration();

    let slide = (((elapsed + TIME_EPSILON) / slide_duration).floor() as usize).min(count - 1);
    let next_slide = (slide + 1) % count;

    let time_in_slide = (elapsed - slide as f64 * slide_duration).clamp(0.0, slide_duration);
    let time_remaining = slide_duration - time_in_slide;

    let (phase, layers) = if time_remaining + TIME_EPSILON < transition_duration {
        let progress = (1.0 - time_remaining / transition_duration).clamp(0.0, 1.0);
        let eased = Ease::OutQuad.apply(progress);
        let shift = canvas_width * eased;
        let outgoing = SlideLayer {
            slide,
            image: timeline.image_for(slide)?,
            offset_x: -shift,
            zoom_progress: 1.0,
            zoom_dir: ZoomDir::for_slide(slide),
        };
        let incoming = SlideLayer {
            slide: next_slide,
            image: timeline.image_for(next_slide)?,
            offset_x: canvas_width - shift,
            zoom_progress: 0.0,
            zoom_dir: ZoomDir::for_slide(next_slide),
        };
        (
            SlidePhase::Transition { progress, eased },
            vec![outgoing, incoming],
        )
    } else {
        let progress = (time_in_slide / (slide_duration - transition_duration)).clamp(0.0, 1.0);
        let current = SlideLayer {
            slide,
            image: timeline.image_for(slide)?,
            offset_x: 0.0,
            zoom_progress: progress,
            zoom_dir: ZoomDir::for_slide(slide),
        };
        (SlidePhase::Steady { progress }, vec![current])
    };

    let hook = (elapsed < HOOK_VISIBLE_SECS).then(|| HookOverlay {
        flash: rem_secs(elapsed, HOOK_FLASH_PERIOD_SECS) < HOOK_FLASH_PERIOD_SECS / 2.0,
    });

    Ok(FrameDescriptor {
        elapsed,
        slide,
        next_slide,
        phase,
        layers,
        hook,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
