use std::sync::Arc;

use crate::assets::decode::ImageSource;
use crate::compose::frame::{FrameDescriptor, SlideLayer};
use crate::compose::zoom::slide_transform;
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::FrameRGBA;
use crate::render::paint::{
    GradientStop, affine_to_cpu, rgba_premul_to_image, vertical_gradient_bytes, vignette_bytes,
};
use crate::render::text::{PlacedText, TextLayoutEngine};

const HOOK_SIZE_PX: f32 = 75.0;
const HOOK_LINE_PITCH_PX: f32 = 85.0;
const HOOK_GRADIENT_HALF_SPAN_PX: f64 = 50.0;
const HOOK_OUTLINE_WIDTH: f64 = 4.0;
const HOOK_FAUX_BOLD_WIDTH: f64 = 1.5;
const HOOK_FLASH_WIDTH: f64 = 2.0;
const HOOK_FLASH_RGBA: [u8; 4] = [0, 255, 255, 255];

const WATERMARK_SIZE_PX: f32 = 24.0;
const WATERMARK_PADDING_PX: f32 = 30.0;
const WATERMARK_OUTLINE_WIDTH: f64 = 3.0;
const WATERMARK_FILL_RGBA: [u8; 4] = [255, 255, 255, 204];

/// Text drawn over the slides for one render.
#[derive(Clone, Debug, Default)]
pub struct OverlayText {
    /// Font used for the hook and watermark. Without one, text layers are skipped.
    pub font: Option<Arc<Vec<u8>>>,
    /// Hook caption, fixed for the whole render.
    pub hook: String,
    /// Watermark label; drawn as `@label` when set.
    pub watermark: Option<String>,
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

struct TextOverlays {
    font: vello_cpu::peniko::FontData,
    hook_lines: Vec<PlacedText>,
    hook_fill: vello_cpu::Image,
    watermark: Option<PlacedText>,
}

/// Owns the composition surface for one render and turns [`FrameDescriptor`]s into pixels.
///
/// Layer order: black background, slide layers, vignette, watermark, hook.
pub struct SlideCompositor {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    target: vello_cpu::Pixmap,
    slides: Vec<ImagePaint>,
    vignette: vello_cpu::Image,
    text: Option<TextOverlays>,
}

impl SlideCompositor {
    /// Acquire a surface of `canvas` size and prepare every paint the render needs.
    ///
    /// Any failure here is a [`ReelError::Context`]: the render cannot start without a surface.
    pub fn new(canvas: Canvas, images: &ImageSource, overlay: &OverlayText) -> ReelResult<Self> {
        canvas
            .validate()
            .map_err(|e| ReelError::context(format!("unusable canvas: {e}")))?;
        let (w, h) = (canvas.width as u16, canvas.height as u16);

        let slides = images
            .iter()
            .map(|img| {
                Ok(ImagePaint {
                    paint: rgba_premul_to_image(&img.rgba8_premul, img.width, img.height)?,
                    w: img.width,
                    h: img.height,
                })
            })
            .collect::<ReelResult<Vec<_>>>()?;

        let vignette = rgba_premul_to_image(&vignette_bytes(canvas), canvas.width, canvas.height)?;

        let text = match overlay.font.clone() {
            Some(font) => Some(prepare_text(canvas, font, overlay)?),
            None => {
                tracing::warn!("no font configured; hook and watermark text will not be drawn");
                None
            }
        };

        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            target: vello_cpu::Pixmap::new(w, h),
            slides,
            vignette,
            text,
        })
    }

    /// Canvas this compositor draws into.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Whether hook/watermark text can be drawn.
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Rasterize one frame.
    pub fn compose(&mut self, frame: &FrameDescriptor) -> ReelResult<FrameRGBA> {
        let (cw, ch) = (self.canvas.w(), self.canvas.h());
        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, cw, ch));

        for layer in &frame.layers {
            draw_slide(ctx, &self.slides, self.canvas, layer)?;
        }

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(self.vignette.clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, cw, ch));

        if let Some(text) = &self.text {
            if let Some(label) = &text.watermark {
                draw_watermark(ctx, &text.font, label);
            }
            if let Some(hook) = frame.hook {
                draw_hook(ctx, text, hook.flash);
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.target);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.target.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_slide(
    ctx: &mut vello_cpu::RenderContext,
    slides: &[ImagePaint],
    canvas: Canvas,
    layer: &SlideLayer,
) -> ReelResult<()> {
    let p = slides.get(layer.image).ok_or_else(|| {
        ReelError::invariant(format!(
            "slide {} references image {} but only {} are loaded",
            layer.slide,
            layer.image,
            slides.len()
        ))
    })?;
    let tr: Affine = slide_transform(p.w, p.h, canvas, layer.zoom(), layer.offset_x);
    ctx.set_transform(affine_to_cpu(tr));
    ctx.set_paint(p.paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(p.w),
        f64::from(p.h),
    ));
    Ok(())
}

fn draw_watermark(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    label: &PlacedText,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for (size, glyphs) in label.glyph_runs() {
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(WATERMARK_OUTLINE_WIDTH));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.glyph_run(font)
            .font_size(size)
            .stroke_glyphs(glyphs.iter().copied());

        let [r, g, b, a] = WATERMARK_FILL_RGBA;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.glyph_run(font)
            .font_size(size)
            .fill_glyphs(glyphs.into_iter());
    }
}

fn draw_hook(ctx: &mut vello_cpu::RenderContext, text: &TextOverlays, flash: bool) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for line in &text.hook_lines {
        for (size, glyphs) in line.glyph_runs() {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(HOOK_OUTLINE_WIDTH));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.glyph_run(&text.font)
                .font_size(size)
                .stroke_glyphs(glyphs.iter().copied());

            ctx.set_paint(text.hook_fill.clone());
            ctx.glyph_run(&text.font)
                .font_size(size)
                .fill_glyphs(glyphs.iter().copied());
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(HOOK_FAUX_BOLD_WIDTH));
            ctx.glyph_run(&text.font)
                .font_size(size)
                .stroke_glyphs(glyphs.iter().copied());

            if flash {
                let [r, g, b, a] = HOOK_FLASH_RGBA;
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(HOOK_FLASH_WIDTH));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.glyph_run(&text.font)
                    .font_size(size)
                    .stroke_glyphs(glyphs.into_iter());
            }
        }
    }
}

fn prepare_text(
    canvas: Canvas,
    font_bytes: Arc<Vec<u8>>,
    overlay: &OverlayText,
) -> ReelResult<TextOverlays> {
    let mut engine = TextLayoutEngine::with_font(font_bytes)?;
    let (cw, ch) = (canvas.w() as f32, canvas.h() as f32);

    let lines = crate::hook::catalog::split_hook_lines(&overlay.hook);
    let first_centre = ch / 2.0 - ((lines.len().saturating_sub(1)) as f32 * HOOK_LINE_PITCH_PX) / 2.0;
    let mut hook_lines = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let layout = engine.layout_line(line, HOOK_SIZE_PX)?;
        let centre_y = first_centre + i as f32 * HOOK_LINE_PITCH_PX;
        let origin = ((cw - layout.width()) / 2.0, centre_y - layout.height() / 2.0);
        hook_lines.push(PlacedText { layout, origin });
    }

    let watermark = match overlay.watermark.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => {
            let layout = engine.layout_line(&format!("@{label}"), WATERMARK_SIZE_PX)?;
            let origin = (
                cw - WATERMARK_PADDING_PX - layout.width(),
                ch - WATERMARK_PADDING_PX - layout.height(),
            );
            Some(PlacedText { layout, origin })
        }
        _ => None,
    };

    let cy = canvas.h() / 2.0;
    let stops = [
        GradientStop {
            y: cy - HOOK_GRADIENT_HALF_SPAN_PX,
            rgba: [0xFF, 0xFF, 0x00, 0xFF],
        },
        GradientStop {
            y: cy,
            rgba: [0xFF, 0xA5, 0x00, 0xFF],
        },
        GradientStop {
            y: cy + HOOK_GRADIENT_HALF_SPAN_PX,
            rgba: [0xFF, 0x45, 0x00, 0xFF],
        },
    ];
    let hook_fill = rgba_premul_to_image(
        &vertical_gradient_bytes(canvas, &stops),
        canvas.width,
        canvas.height,
    )?;

    Ok(TextOverlays {
        font: engine.font().clone(),
        hook_lines,
        hook_fill,
        watermark,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
