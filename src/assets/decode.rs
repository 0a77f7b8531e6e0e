use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::premultiply_rgba8_in_place;

#[derive(Clone, Debug)]
/// Raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Ordered, immutable set of decoded source images (never empty once built).
#[derive(Clone, Debug)]
pub struct ImageSource {
    images: Arc<[PreparedImage]>,
}

impl ImageSource {
    /// Decode every source in order.
    ///
    /// The first image that fails to decode aborts the whole load; there is no skip-and-continue.
    pub fn decode_all<B: AsRef<[u8]>>(sources: &[B]) -> ReelResult<Self> {
        if sources.is_empty() {
            return Err(ReelError::input("no images to render"));
        }
        let images = sources
            .iter()
            .enumerate()
            .map(|(index, bytes)| {
                decode_image(bytes.as_ref())
                    .map_err(|e| ReelError::image_load(index, format!("{e:#}")))
            })
            .collect::<ReelResult<Vec<_>>>()?;
        Ok(Self {
            images: images.into(),
        })
    }

    /// Build from already-decoded images.
    pub fn from_prepared(images: Vec<PreparedImage>) -> ReelResult<Self> {
        if images.is_empty() {
            return Err(ReelError::input("no images to render"));
        }
        Ok(Self {
            images: images.into(),
        })
    }

    /// Number of source images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always `false` for a constructed source; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image at `index`, failing fast on an out-of-range request.
    pub fn get(&self, index: usize) -> ReelResult<&PreparedImage> {
        self.images.get(index).ok_or_else(|| {
            ReelError::invariant(format!(
                "image index {index} out of range ({} sources)",
                self.images.len()
            ))
        })
    }

    /// Iterate images in order.
    pub fn iter(&self) -> impl Iterator<Item = &PreparedImage> {
        self.images.iter()
    }
}

/// Decode encoded image bytes (PNG, JPEG, WebP, ...) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> anyhow::Result<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    anyhow::ensure!(width > 0 && height > 0, "image has zero size");
    anyhow::ensure!(
        width <= u32::from(u16::MAX) && height <= u32::from(u16::MAX),
        "image {width}x{height} exceeds the 65535px surface limit"
    );

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
