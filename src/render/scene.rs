//! Scene drawing: words in the text color, then the revealed prefix of the connection list.

use crate::connect::builder::Connection;
use crate::foundation::error::StarcrossResult;
use crate::layout::flow::{LayoutResult, PositionedWord};
use crate::render::cpu::CpuSurface;
use crate::render::surface::{FrameRGBA, LineStyle, Surface, TextStyle};
use crate::session::config::VisualConfig;

/// Everything needed to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct SceneFrame<'a> {
    /// Positioned words after fit and centering.
    pub layout: &'a LayoutResult,
    /// Connections in reveal order.
    pub connections: &'a [Connection],
    /// How many leading connections are visible.
    pub revealed: usize,
    /// Bumped whenever `connections` is rebuilt.
    pub generation: u64,
}

/// Text style at the layout's content scale.
pub fn text_style(cfg: &VisualConfig, content_scale: f64) -> TextStyle {
    TextStyle {
        color: cfg.text_color,
        font_size: cfg.font_size * content_scale,
    }
}

/// Connector style at the layout's content scale.
pub fn line_style(cfg: &VisualConfig, content_scale: f64) -> LineStyle {
    LineStyle {
        color: cfg.line_color,
        opacity: cfg.line_opacity,
        width: cfg.line_width(content_scale),
    }
}

/// Draw every word at its origin.
pub fn draw_words(
    surface: &mut dyn Surface,
    words: &[PositionedWord],
    style: &TextStyle,
) -> StarcrossResult<()> {
    for w in words {
        surface.fill_text(w.token.raw(), w.origin, style)?;
    }
    Ok(())
}

/// Stroke each connection between its two anchors.
pub fn draw_connections(
    surface: &mut dyn Surface,
    connections: &[Connection],
    style: &LineStyle,
) -> StarcrossResult<()> {
    for c in connections {
        surface.stroke_line(c.from.point, c.to.point, style)?;
    }
    Ok(())
}

/// Clear the canvas, draw all words, then the first `revealed` connections.
pub fn render_scene(
    surface: &mut dyn Surface,
    scene: &SceneFrame<'_>,
    cfg: &VisualConfig,
) -> StarcrossResult<()> {
    let scale = scene.layout.content_scale();
    surface.clear_rect(cfg.canvas.rect())?;
    draw_words(surface, scene.layout.words(), &text_style(cfg, scale))?;
    let n = scene.revealed.min(scene.connections.len());
    draw_connections(surface, &scene.connections[..n], &line_style(cfg, scale))
}

/// Frame producer for playback and recording.
///
/// The word layer is rasterized once and reused. While the revealed count only grows, each
/// frame strokes just the newly revealed connections on top of the previous frame, and an
/// unchanged count returns the previous frame as is. A smaller count or a new generation
/// restarts from the word layer.
#[derive(Debug)]
pub struct SceneRenderer {
    surface: CpuSurface,
    cfg: VisualConfig,
    text_layer: Option<FrameRGBA>,
    last: Option<FrameRGBA>,
    drawn: usize,
    generation: u64,
}

impl SceneRenderer {
    /// Wrap a surface; `cfg` supplies colors and widths.
    pub fn new(surface: CpuSurface, cfg: VisualConfig) -> Self {
        Self {
            surface,
            cfg,
            text_layer: None,
            last: None,
            drawn: 0,
            generation: 0,
        }
    }

    /// Drop the cached word layer, e.g. after a new layout.
    pub fn invalidate(&mut self) {
        self.text_layer = None;
        self.last = None;
        self.drawn = 0;
    }

    /// Number of connections present in the last produced frame.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Device size of produced frames.
    pub fn frame_size(&self) -> (u32, u32) {
        self.surface.device_size()
    }

    /// Produce the frame for `scene`.
    pub fn render(&mut self, scene: &SceneFrame<'_>) -> StarcrossResult<FrameRGBA> {
        let scale = scene.layout.content_scale();
        let revealed = scene.revealed.min(scene.connections.len());

        let text_layer = match self.text_layer.take() {
            Some(layer) => layer,
            None => {
                self.surface.clear_rect(self.cfg.canvas.rect())?;
                draw_words(
                    &mut self.surface,
                    scene.layout.words(),
                    &text_style(&self.cfg, scale),
                )?;
                let layer = self.surface.snapshot()?;
                tracing::debug!(words = scene.layout.words().len(), "word layer cached");
                self.drawn = 0;
                self.generation = scene.generation;
                layer
            }
        };

        if revealed < self.drawn || scene.generation != self.generation {
            self.surface.restore(&text_layer)?;
            self.drawn = 0;
            self.generation = scene.generation;
            self.last = None;
        }
        self.text_layer = Some(text_layer);

        if revealed == self.drawn
            && let Some(last) = &self.last
        {
            return Ok(last.clone());
        }
        draw_connections(
            &mut self.surface,
            &scene.connections[self.drawn..revealed],
            &line_style(&self.cfg, scale),
        )?;
        self.drawn = revealed;
        let frame = self.surface.snapshot()?;
        self.last = Some(frame.clone());
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
