use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{StarcrossError, StarcrossResult};
use crate::layout::measure::{TextBrushRgba8, TextShaper};
use crate::render::surface::{FrameRGBA, LineStyle, Surface, TextStyle};
use std::sync::Arc;

/// Options for [`CpuSurface`].
#[derive(Debug, Clone, Copy)]
pub struct CpuSurfaceOpts {
    /// Logical canvas size.
    pub canvas: Canvas,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f64,
}

impl CpuSurfaceOpts {
    /// Options for `canvas` at ratio 1.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            pixel_ratio: 1.0,
        }
    }

    /// Return options with a different pixel ratio.
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Backing store size in device pixels.
    pub fn device_size(&self) -> StarcrossResult<(u16, u16)> {
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(StarcrossError::validation(
                "pixel_ratio must be finite and > 0",
            ));
        }
        let dim = |logical: u32, name: &str| -> StarcrossResult<u16> {
            let px = (f64::from(logical) * self.pixel_ratio).round();
            if px < 1.0 || px > f64::from(u16::MAX) {
                return Err(StarcrossError::validation(format!(
                    "device {name} {px} is outside 1..={}",
                    u16::MAX
                )));
            }
            Ok(px as u16)
        };
        Ok((
            dim(self.canvas.width, "width")?,
            dim(self.canvas.height, "height")?,
        ))
    }
}

struct GlyphSource {
    shaper: TextShaper,
    font: vello_cpu::peniko::FontData,
}

/// Raster [`Surface`] powered by `vello_cpu`, with Parley shaping for words.
///
/// Draw calls are recorded into a render context and rasterized on [`CpuSurface::snapshot`].
/// Earlier raster output is carried forward as a backdrop image, which is how partial clears
/// and [`CpuSurface::restore`] work.
pub struct CpuSurface {
    opts: CpuSurfaceOpts,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    target: vello_cpu::Pixmap,
    glyphs: Option<GlyphSource>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.opts.canvas)
            .field("pixel_ratio", &self.opts.pixel_ratio)
            .field("device", &(self.width, self.height))
            .field("has_font", &self.glyphs.is_some())
            .finish()
    }
}

impl CpuSurface {
    /// Create a transparent surface. Without a shaper, [`Surface::fill_text`] draws nothing.
    pub fn new(opts: CpuSurfaceOpts, shaper: Option<TextShaper>) -> StarcrossResult<Self> {
        let (width, height) = opts.device_size()?;
        let glyphs = shaper.map(|shaper| {
            let bytes = shaper.font_bytes().as_ref().clone();
            let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
            GlyphSource { shaper, font }
        });
        if glyphs.is_none() {
            tracing::warn!("no font configured, words will not be drawn");
        }
        Ok(Self {
            opts,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            target: vello_cpu::Pixmap::new(width, height),
            glyphs,
        })
    }

    /// Backing store size in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    /// Logical canvas this surface draws.
    pub fn canvas(&self) -> Canvas {
        self.opts.canvas
    }

    /// Whether words can be drawn.
    pub fn has_font(&self) -> bool {
        self.glyphs.is_some()
    }

    /// Rasterize everything drawn so far and return it as a premultiplied frame.
    pub fn snapshot(&mut self) -> StarcrossResult<FrameRGBA> {
        self.commit()?;
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.target.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    /// Replace the surface content with `frame`, which must match the device size.
    pub fn restore(&mut self, frame: &FrameRGBA) -> StarcrossResult<()> {
        if frame.width != u32::from(self.width) || frame.height != u32::from(self.height) {
            return Err(StarcrossError::render(format!(
                "restore size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        if !frame.premultiplied {
            return Err(StarcrossError::render("restore expects a premultiplied frame"));
        }
        let pixmap = pixmap_from_premul_bytes(&frame.data, self.width, self.height)?;
        self.reset_with_backdrop(Some(pixmap));
        Ok(())
    }

    fn logical_to_device(&self) -> vello_cpu::kurbo::Affine {
        affine_to_cpu(Affine::scale(self.opts.pixel_ratio))
    }

    fn commit(&mut self) -> StarcrossResult<()> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.target);
        let backdrop =
            pixmap_from_premul_bytes(self.target.data_as_u8_slice(), self.width, self.height)?;
        self.reset_with_backdrop(Some(backdrop));
        Ok(())
    }

    fn reset_with_backdrop(&mut self, backdrop: Option<vello_cpu::Pixmap>) {
        self.ctx.reset();
        let Some(pixmap) = backdrop else {
            return;
        };
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn device_rect(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let r = self.opts.pixel_ratio;
        let clamp = |v: f64, max: u16| (v.max(0.0).min(f64::from(max))) as usize;
        (
            clamp((rect.x0 * r).floor(), self.width),
            clamp((rect.y0 * r).floor(), self.height),
            clamp((rect.x1 * r).ceil(), self.width),
            clamp((rect.y1 * r).ceil(), self.height),
        )
    }
}

impl Surface for CpuSurface {
    fn clear_rect(&mut self, rect: Rect) -> StarcrossResult<()> {
        let rect = rect.abs();
        let (x0, y0, x1, y1) = self.device_rect(rect);
        if x0 == 0 && y0 == 0 && x1 == usize::from(self.width) && y1 == usize::from(self.height) {
            self.reset_with_backdrop(None);
            return Ok(());
        }
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.target);
        let stride = usize::from(self.width) * 4;
        let data = self.target.data_as_u8_slice_mut();
        for row in y0..y1 {
            data[row * stride + x0 * 4..row * stride + x1 * 4].fill(0);
        }
        let backdrop =
            pixmap_from_premul_bytes(self.target.data_as_u8_slice(), self.width, self.height)?;
        self.reset_with_backdrop(Some(backdrop));
        Ok(())
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) -> StarcrossResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let device = self.logical_to_device();
        let Some(glyphs) = self.glyphs.as_mut() else {
            return Ok(());
        };
        let c = style.color;
        let brush = TextBrushRgba8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        };
        let layout = glyphs
            .shaper
            .layout_line(text, style.font_size as f32, brush)?;

        self.ctx.set_transform(
            device * affine_to_cpu(Affine::translate((origin.x, origin.y))),
        );
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                // Shift so the run baseline lands on `origin.y`.
                let baseline = run.baseline();
                let positioned = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - baseline,
                });
                self.ctx
                    .glyph_run(&glyphs.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(positioned);
            }
        }
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, style: &LineStyle) -> StarcrossResult<()> {
        if !style.width.is_finite() || style.width <= 0.0 {
            return Err(StarcrossError::render("stroke width must be finite and > 0"));
        }
        let c = style.color.with_opacity(style.opacity);
        if c.a == 0 {
            return Ok(());
        }
        self.ctx.set_transform(self.logical_to_device());
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        self.ctx
            .set_stroke(vello_cpu::kurbo::Stroke::new(style.width));
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(vello_cpu::kurbo::Point::new(from.x, from.y));
        path.line_to(vello_cpu::kurbo::Point::new(to.x, to.y));
        self.ctx.stroke_path(&path);
        Ok(())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u16,
    height: u16,
) -> StarcrossResult<vello_cpu::Pixmap> {
    if bytes.len() != usize::from(width) * usize::from(height) * 4 {
        return Err(StarcrossError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let opaque = bytes.chunks_exact(4).all(|px| px[3] == 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, width, height, !opaque,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
