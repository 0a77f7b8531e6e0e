use crate::animation::ease::Ease;
use crate::foundation::core::{Affine, Canvas};

/// Extra scale reached at the zoomed-in end of a Ken-Burns move.
pub const ZOOM_RANGE: f64 = 0.1;

/// Direction of the Ken-Burns move for a slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ZoomDir {
    /// 1.0 -> 1.1 over the slide.
    In,
    /// 1.1 -> 1.0 over the slide.
    Out,
}

impl ZoomDir {
    /// Even slide positions zoom in, odd ones zoom out.
    ///
    /// Keyed on the position in the (duplicated) slide sequence, so a repeated image may zoom in
    /// on one pass and out on the next.
    pub fn for_slide(slide: usize) -> Self {
        if slide.is_multiple_of(2) {
            Self::In
        } else {
            Self::Out
        }
    }
}

/// Zoom multiplier on top of the cover-fit scale at normalized slide `progress`.
pub fn zoom_factor(dir: ZoomDir, progress: f64) -> f64 {
    let p = Ease::Linear.apply(progress);
    match dir {
        ZoomDir::In => 1.0 + p * ZOOM_RANGE,
        ZoomDir::Out => 1.0 + ZOOM_RANGE - p * ZOOM_RANGE,
    }
}

/// Smallest uniform scale at which an `img_w` x `img_h` image covers the whole canvas.
pub fn cover_scale(img_w: u32, img_h: u32, canvas: Canvas) -> f64 {
    let sx = canvas.w() / f64::from(img_w.max(1));
    let sy = canvas.h() / f64::from(img_h.max(1));
    sx.max(sy)
}

/// Image-space to canvas-space transform for one slide layer.
///
/// The scaled image is centred on the canvas and then shifted horizontally by `offset_x`.
pub fn slide_transform(img_w: u32, img_h: u32, canvas: Canvas, zoom: f64, offset_x: f64) -> Affine {
    let scale = cover_scale(img_w, img_h, canvas) * zoom;
    let draw_w = f64::from(img_w) * scale;
    let draw_h = f64::from(img_h) * scale;
    let x = (canvas.w() - draw_w) / 2.0 + offset_x;
    let y = (canvas.h() - draw_h) / 2.0;
    Affine::translate((x, y)) * Affine::scale(scale)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/zoom.rs"]
mod tests;
