use std::sync::Arc;

use crate::foundation::core::{Affine, Canvas, Rgba8Premul};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::lerp_u8;

/// Alpha of the vignette at and beyond its outer radius.
pub const VIGNETTE_EDGE_ALPHA: f64 = 0.4;

/// Colour stop for vertical gradients, straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GradientStop {
    /// Canvas-space y of the stop.
    pub(crate) y: f64,
    pub(crate) rgba: [u8; 4],
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::context("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::context("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::context("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Premultiplied canvas-sized radial darkening.
///
/// Transparent inside `width / 3` of the centre, ramping linearly to black at
/// [`VIGNETTE_EDGE_ALPHA`] at a radius of `height`.
pub(crate) fn vignette_bytes(canvas: Canvas) -> Vec<u8> {
    let (w, h) = (canvas.width as usize, canvas.height as usize);
    let cx = canvas.w() / 2.0;
    let cy = canvas.h() / 2.0;
    let r0 = canvas.w() / 3.0;
    let r1 = canvas.h();
    let span = (r1 - r0).max(f64::EPSILON);

    let mut bytes = vec![0u8; w.saturating_mul(h).saturating_mul(4)];
    for y in 0..h {
        let dy = y as f64 + 0.5 - cy;
        for x in 0..w {
            let dx = x as f64 + 0.5 - cx;
            let t = (((dx * dx + dy * dy).sqrt() - r0) / span).clamp(0.0, 1.0);
            // Black, so premultiplied rgb stays zero.
            bytes[(y * w + x) * 4 + 3] = (t * VIGNETTE_EDGE_ALPHA * 255.0).round() as u8;
        }
    }
    bytes
}

/// Premultiplied canvas-sized vertical gradient through `stops` (sorted by `y`), clamped
/// outside the first and last stop.
pub(crate) fn vertical_gradient_bytes(canvas: Canvas, stops: &[GradientStop]) -> Vec<u8> {
    let (w, h) = (canvas.width as usize, canvas.height as usize);
    let mut bytes = vec![0u8; w.saturating_mul(h).saturating_mul(4)];
    for y in 0..h {
        let c = sample_stops(stops, y as f64 + 0.5);
        let row = &mut bytes[y * w * 4..(y + 1) * w * 4];
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&c.to_array());
        }
    }
    bytes
}

pub(crate) fn sample_stops(stops: &[GradientStop], y: f64) -> Rgba8Premul {
    let Some(first) = stops.first() else {
        return Rgba8Premul::transparent();
    };
    let mut rgba = first.rgba;
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if y <= a.y {
            break;
        }
        if y >= b.y {
            rgba = b.rgba;
            continue;
        }
        let t = (y - a.y) / (b.y - a.y).max(f64::EPSILON);
        rgba = [
            lerp_u8(a.rgba[0], b.rgba[0], t),
            lerp_u8(a.rgba[1], b.rgba[1], t),
            lerp_u8(a.rgba[2], b.rgba[2], t),
            lerp_u8(a.rgba[3], b.rgba[3], t),
        ];
        break;
    }
    Rgba8Premul::from_straight_rgba(rgba[0], rgba[1], rgba[2], rgba[3])
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;
