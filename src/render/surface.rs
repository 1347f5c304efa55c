use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{StarcrossError, StarcrossResult};
use crate::foundation::math::flatten_premul_px;

/// A rendered frame as RGBA8 pixels.
///
/// Frames coming out of [`crate::CpuSurface`] are **premultiplied alpha**; the flag makes this
/// explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
            premultiplied: true,
        }
    }

    /// RGBA of the pixel at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Composite over an opaque background, producing straight RGBA with alpha 255.
    pub fn flattened(&self, background: Rgba8) -> StarcrossResult<FrameRGBA> {
        if !self.premultiplied {
            return Err(StarcrossError::render(
                "flattening expects a premultiplied frame",
            ));
        }
        let bg = [background.r, background.g, background.b];
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            data.extend_from_slice(&flatten_premul_px([px[0], px[1], px[2], px[3]], bg));
        }
        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        })
    }

    /// Write the frame, flattened over `background`, as a PNG file.
    pub fn save_png(&self, path: &std::path::Path, background: Rgba8) -> StarcrossResult<()> {
        use anyhow::Context as _;
        crate::encode::ffmpeg::ensure_parent_dir(path)?;
        let flat = self.flattened(background)?;
        image::save_buffer_with_format(
            path,
            &flat.data,
            flat.width,
            flat.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Fill settings for [`Surface::fill_text`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Fill color.
    pub color: Rgba8,
    /// Font size in logical pixels.
    pub font_size: f64,
}

/// Stroke settings for [`Surface::stroke_line`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Rgba8,
    /// Opacity applied to each stroke individually.
    pub opacity: f32,
    /// Stroke width in logical pixels.
    pub width: f64,
}

/// Drawing target used by the scene renderer. Coordinates are logical canvas pixels.
pub trait Surface {
    /// Reset `rect` to fully transparent.
    fn clear_rect(&mut self, rect: Rect) -> StarcrossResult<()>;
    /// Draw `text` with its left edge and baseline at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) -> StarcrossResult<()>;
    /// Draw a straight segment.
    fn stroke_line(&mut self, from: Point, to: Point, style: &LineStyle) -> StarcrossResult<()>;
}
