use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};

/// A shaped single-line label placed on the canvas.
pub(crate) struct PlacedText {
    pub(crate) layout: parley::Layout<()>,
    /// Canvas-space offset of the layout's top-left corner.
    pub(crate) origin: (f32, f32),
}

impl PlacedText {
    /// Positioned glyphs of every run, in canvas space, with their font size.
    pub(crate) fn glyph_runs(&self) -> Vec<(f32, Vec<vello_cpu::Glyph>)> {
        let (ox, oy) = self.origin;
        let mut runs = Vec::new();
        for line in self.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run
                    .glyphs()
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x + ox,
                        y: g.y + oy,
                    })
                    .collect();
                runs.push((run.run().font_size(), glyphs));
            }
        }
        runs
    }
}

/// Parley contexts bound to one registered font.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and prepare layout contexts for it.
    pub(crate) fn with_font(font_bytes: Arc<Vec<u8>>) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.as_ref().clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::context("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::context("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
            0,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Font handle for glyph rendering.
    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape `text` as one unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
    ) -> ReelResult<parley::Layout<()>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Well-known locations of bold sans fonts with Vietnamese coverage, tried in order when no
/// font is configured.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Black.ttf",
    "C:\\Windows\\Fonts\\ariblk.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Read the first readable entry of [`SYSTEM_FONT_CANDIDATES`].
pub fn find_system_font() -> Option<Arc<Vec<u8>>> {
    SYSTEM_FONT_CANDIDATES.iter().find_map(|p| {
        let bytes = std::fs::read(p).ok()?;
        tracing::debug!(path = p, "using system font");
        Some(Arc::new(bytes))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
