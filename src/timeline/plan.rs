use crate::foundation::core::TIME_EPSILON;
use crate::foundation::error::{ReelError, ReelResult};

/// Target on-screen time per slide before the exact duration is recomputed.
pub const BASELINE_SLIDE_SECS: f64 = 2.0;
/// Upper bound on the number of slides in one render.
pub const MAX_SLIDES: usize = 60;
/// Fraction of each slide spent in the outgoing push transition.
pub const TRANSITION_FRACTION: f64 = 0.2;

/// Slide schedule for one render. Computed once before the frame loop and never mutated.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Timeline {
    duration_secs: f64,
    slide_duration: f64,
    transition_duration: f64,
    slide_sequence: Vec<usize>,
    source_count: usize,
}

impl Timeline {
    /// Total length in seconds (the narration duration).
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Seconds each slide stays on screen, including its outgoing transition.
    pub fn slide_duration(&self) -> f64 {
        self.slide_duration
    }

    /// Seconds of each slide spent pushing to the next one.
    pub fn transition_duration(&self) -> f64 {
        self.transition_duration
    }

    /// Source image index per slide, in display order.
    pub fn slide_sequence(&self) -> &[usize] {
        &self.slide_sequence
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slide_sequence.len()
    }

    /// Number of distinct source images the sequence indexes into.
    pub fn source_count(&self) -> usize {
        self.source_count
    }

    /// Source image shown by slide `slide`.
    ///
    /// Out-of-range lookups cannot happen for indices produced by the frame clock; reaching one
    /// means the schedule is corrupt, so this fails instead of wrapping silently.
    pub fn image_for(&self, slide: usize) -> ReelResult<usize> {
        let image = *self.slide_sequence.get(slide).ok_or_else(|| {
            ReelError::invariant(format!(
                "slide {slide} out of range (slide count {})",
                self.slide_count()
            ))
        })?;
        if image >= self.source_count {
            return Err(ReelError::invariant(format!(
                "slide {slide} maps to image {image}, only {} sources",
                self.source_count
            )));
        }
        Ok(image)
    }
}

/// Plan the slide schedule for `image_count` sources narrated over `duration_secs`.
///
/// The source list is appended to itself in order until the baseline pace covers the narration,
/// then capped at [`MAX_SLIDES`]. The exact per-slide duration is recomputed so the slides sum to
/// the narration length; with few images and long audio (or at the cap) slides run longer than
/// the baseline rather than dropping any source.
#[tracing::instrument(level = "debug")]
pub fn plan_timeline(image_count: usize, duration_secs: f64) -> ReelResult<Timeline> {
    if image_count == 0 {
        return Err(ReelError::input("no images to render"));
    }
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(ReelError::input(format!(
            "audio duration must be finite and > 0, got {duration_secs}"
        )));
    }

    let mut slide_count = image_count;
    while (slide_count as f64) * BASELINE_SLIDE_SECS + TIME_EPSILON < duration_secs
        && slide_count < MAX_SLIDES
    {
        slide_count += image_count;
    }
    let slide_count = slide_count.min(MAX_SLIDES);

    let slide_duration = duration_secs / slide_count as f64;
    let transition_duration = slide_duration * TRANSITION_FRACTION;
    let slide_sequence = (0..slide_count).map(|i| i % image_count).collect();

    tracing::debug!(
        slide_count,
        slide_duration,
        transition_duration,
        "planned slideshow timeline"
    );

    Ok(Timeline {
        duration_secs,
        slide_duration,
        transition_duration,
        slide_sequence,
        source_count: image_count,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/plan.rs"]
mod tests;
