use crate::foundation::error::{StarcrossError, StarcrossResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Width measurement hook used by the layout engine.
pub trait TextMeasure {
    /// Advance width of `text` in pixels at `font_size_px`.
    fn measure(&mut self, text: &str, font_size_px: f64) -> f64;
}

/// Deterministic measurer: every `char` advances by `advance_em * font_size_px`.
///
/// Used when no font file is configured and throughout the tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasure {
    /// Advance per character, in ems.
    pub advance_em: f64,
}

impl Default for FixedAdvanceMeasure {
    fn default() -> Self {
        Self { advance_em: 0.5 }
    }
}

impl TextMeasure for FixedAdvanceMeasure {
    fn measure(&mut self, text: &str, font_size_px: f64) -> f64 {
        text.chars().count() as f64 * self.advance_em * font_size_px
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Stateful helper for building single-line Parley layouts from raw font bytes.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font_bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper")
            .field("family_name", &self.family_name)
            .field("font_bytes_len", &self.font_bytes.len())
            .finish()
    }
}

impl TextShaper {
    /// Register `font_bytes` with a fresh Parley font context.
    pub fn from_font_bytes(font_bytes: impl Into<Arc<Vec<u8>>>) -> StarcrossResult<Self> {
        let font_bytes = font_bytes.into();
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            StarcrossError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| StarcrossError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_bytes,
        })
    }

    /// Read a TTF/OTF file and register it.
    pub fn from_font_path(path: &Path) -> StarcrossResult<Self> {
        use anyhow::Context as _;
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font file '{}'", path.display()))?;
        Self::from_font_bytes(bytes)
    }

    /// Family name resolved from the font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Raw font bytes, shared with glyph rendering.
    pub fn font_bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.font_bytes)
    }

    /// Shape `text` on a single unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> StarcrossResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(StarcrossError::validation(
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
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Glyph-accurate measurer backed by Parley shaping. Widths are cached per string and size.
#[derive(Debug)]
pub struct ParleyMeasure {
    shaper: TextShaper,
    cache: HashMap<(String, u64), f64>,
}

impl ParleyMeasure {
    /// Wrap an existing shaper.
    pub fn new(shaper: TextShaper) -> Self {
        Self {
            shaper,
            cache: HashMap::new(),
        }
    }

    /// Number of distinct `(text, size)` pairs measured so far.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

impl TextMeasure for ParleyMeasure {
    fn measure(&mut self, text: &str, font_size_px: f64) -> f64 {
        let key = (text.to_owned(), font_size_px.to_bits());
        if let Some(w) = self.cache.get(&key) {
            return *w;
        }
        // Trailing whitespace counts toward the advance, so use the full width.
        let w = match self
            .shaper
            .layout_line(text, font_size_px as f32, TextBrushRgba8::default())
        {
            Ok(layout) => f64::from(layout.full_width()),
            Err(e) => {
                tracing::warn!(error = %e, "text measurement failed, treating as zero width");
                0.0
            }
        };
        self.cache.insert(key, w);
        w
    }
}
