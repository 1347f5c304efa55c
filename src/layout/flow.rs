//! Greedy word flow into fixed-width rows, plus the fit-to-height and centering post-passes.

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{StarcrossError, StarcrossResult};
use crate::layout::measure::TextMeasure;
use crate::text::tokenize::Token;

/// Geometry inputs of one layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowParams {
    /// Logical canvas the text block must fit.
    pub canvas: Canvas,
    /// Padding applied on every side.
    pub padding: f64,
    /// Baseline-to-baseline distance.
    pub line_height: f64,
    /// Unscaled font size in pixels.
    pub font_size: f64,
}

impl FlowParams {
    /// Reject geometry that would make wrapping or scaling meaningless.
    pub fn validate(&self) -> StarcrossResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(StarcrossError::validation("canvas width/height must be > 0"));
        }
        for (name, v) in [
            ("padding", self.padding),
            ("line_height", self.line_height),
            ("font_size", self.font_size),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(StarcrossError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if self.line_height == 0.0 || self.font_size == 0.0 {
            return Err(StarcrossError::validation(
                "line_height and font_size must be > 0",
            ));
        }
        Ok(())
    }
}

/// A token placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedWord {
    /// The word being drawn.
    pub token: Token,
    /// Left edge and baseline where the word is drawn.
    pub origin: Point,
    /// Anchor for connector endpoints: horizontal middle of the glyphs, half a font size above
    /// the baseline.
    pub center: Point,
    /// Measured advance of the word including its trailing space (unscaled).
    pub width: f64,
}

impl PositionedWord {
    /// Right edge used by the centering pass.
    pub fn right(&self) -> f64 {
        self.origin.x + self.width
    }
}

/// Output of one layout pass. A new pass fully replaces it.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    words: Vec<PositionedWord>,
    content_height: f64,
    content_scale: f64,
    rows: usize,
}

impl LayoutResult {
    /// Positioned words in text order.
    pub fn words(&self) -> &[PositionedWord] {
        &self.words
    }

    /// Height the unscaled text block needs: last baseline plus bottom padding.
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// Uniform scale applied by [`fit_to_height`]; `1.0` when the text already fits.
    pub fn content_scale(&self) -> f64 {
        self.content_scale
    }

    /// Number of rows used by the flow pass.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tight horizontal extent `(min left edge, max right edge)`, `None` without words.
    pub fn horizontal_bounds(&self) -> Option<(f64, f64)> {
        let min_x = self
            .words
            .iter()
            .map(|w| w.origin.x)
            .fold(f64::INFINITY, f64::min);
        let max_x = self
            .words
            .iter()
            .map(PositionedWord::right)
            .fold(f64::NEG_INFINITY, f64::max);
        (min_x.is_finite() && max_x.is_finite()).then_some((min_x, max_x))
    }
}

/// Greedy line wrap starting at `(P, P + H)`.
///
/// A token wraps when it would cross `W - P` and is not the first on its row. Oversized tokens
/// are never split and may overflow the right margin.
pub fn flow_words(
    tokens: Vec<Token>,
    params: &FlowParams,
    measure: &mut dyn TextMeasure,
) -> LayoutResult {
    let pad = params.padding;
    let right_limit = f64::from(params.canvas.width) - pad;
    let mut x = pad;
    let mut y = pad + params.line_height;
    let mut rows = usize::from(!tokens.is_empty());
    let mut words = Vec::with_capacity(tokens.len());

    for token in tokens {
        let advance = measure.measure(&format!("{} ", token.raw()), params.font_size);
        if x + advance > right_limit && x > pad {
            x = pad;
            y += params.line_height;
            rows += 1;
        }
        let glyph_width = measure.measure(token.raw(), params.font_size);
        words.push(PositionedWord {
            origin: Point::new(x, y),
            center: Point::new(x + glyph_width / 2.0, y - params.font_size / 2.0),
            width: advance,
            token,
        });
        x += advance;
    }

    LayoutResult {
        words,
        content_height: y + pad,
        content_scale: 1.0,
        rows,
    }
}

/// Shrink positions uniformly when the content is taller than the canvas.
///
/// Origins and centers are scaled, widths are not; the renderer scales the font size by the
/// returned factor instead.
pub fn fit_to_height(layout: &mut LayoutResult, canvas_height: f64) -> f64 {
    if layout.content_height <= canvas_height || layout.content_height <= 0.0 {
        layout.content_scale = 1.0;
        return 1.0;
    }
    let scale = canvas_height / layout.content_height;
    for w in &mut layout.words {
        w.origin = Point::new(w.origin.x * scale, w.origin.y * scale);
        w.center = Point::new(w.center.x * scale, w.center.y * scale);
    }
    layout.content_scale = scale;
    scale
}

/// Shift every word so the tight bounding box sits in the horizontal middle of the canvas.
///
/// Returns the applied offset; `0.0` when there is nothing to center.
pub fn center_horizontally(layout: &mut LayoutResult, canvas_width: f64) -> f64 {
    let Some((min_x, max_x)) = layout.horizontal_bounds() else {
        return 0.0;
    };
    if max_x <= min_x {
        return 0.0;
    }
    let used = max_x - min_x;
    let offset = (canvas_width - used) / 2.0 - min_x;
    for w in &mut layout.words {
        w.origin.x += offset;
        w.center.x += offset;
    }
    offset
}

/// Full layout pass: flow, fit to height, center.
#[tracing::instrument(skip(tokens, measure), fields(tokens = tokens.len()))]
pub fn layout_tokens(
    tokens: Vec<Token>,
    params: &FlowParams,
    measure: &mut dyn TextMeasure,
) -> StarcrossResult<LayoutResult> {
    params.validate()?;
    let mut layout = flow_words(tokens, params, measure);
    let scale = fit_to_height(&mut layout, f64::from(params.canvas.height));
    let offset = center_horizontally(&mut layout, f64::from(params.canvas.width));
    tracing::debug!(
        words = layout.words.len(),
        rows = layout.rows,
        content_height = layout.content_height,
        scale,
        offset,
        "layout pass complete"
    );
    Ok(layout)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/flow.rs"]
mod tests;
