//! Cosmetic configuration and the per-run playback options.

use crate::connect::builder::{PairingPolicy, RevealPolicy};
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{StarcrossError, StarcrossResult};
use crate::layout::flow::FlowParams;
use crate::playback::ease::Ease;

/// Cosmetic constants of a visualization.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Logical canvas, portrait 1080x1920 by default.
    pub canvas: Canvas,
    /// Unscaled font size in px.
    pub font_size: f64,
    /// Baseline-to-baseline distance in px.
    pub line_height: f64,
    /// Padding on every side in px.
    pub padding: f64,
    /// Word color.
    pub text_color: Rgba8,
    /// Connector color.
    pub line_color: Rgba8,
    /// Connector opacity in `[0, 1]`.
    pub line_opacity: f32,
    /// Background fill.
    pub background: Rgba8,
    /// Run length at normal speed, in ms.
    pub base_duration_ms: f64,
    /// Lower bound for the connector width.
    pub min_line_width: f64,
    /// Connector width per unit of content scale.
    pub line_width_per_scale: f64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::PORTRAIT_1080,
            font_size: 4.0,
            line_height: 6.0,
            padding: 40.0,
            text_color: Rgba8::rgb(0x99, 0x99, 0x99),
            line_color: Rgba8::rgb(0xcc, 0x00, 0x00),
            line_opacity: 0.4,
            background: Rgba8::rgb(0xff, 0xff, 0xff),
            base_duration_ms: 30_000.0,
            min_line_width: 0.05,
            line_width_per_scale: 0.15,
        }
    }
}

impl VisualConfig {
    /// Reject values that would break layout, playback or rendering.
    pub fn validate(&self) -> StarcrossResult<()> {
        self.flow_params().validate()?;
        if !self.line_opacity.is_finite() || !(0.0..=1.0).contains(&self.line_opacity) {
            return Err(StarcrossError::validation(
                "line_opacity must be within [0, 1]",
            ));
        }
        if !self.base_duration_ms.is_finite() || self.base_duration_ms <= 0.0 {
            return Err(StarcrossError::validation(
                "base_duration_ms must be finite and > 0",
            ));
        }
        for (name, v) in [
            ("min_line_width", self.min_line_width),
            ("line_width_per_scale", self.line_width_per_scale),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(StarcrossError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Geometry for the layout pass.
    pub fn flow_params(&self) -> FlowParams {
        FlowParams {
            canvas: self.canvas,
            padding: self.padding,
            line_height: self.line_height,
            font_size: self.font_size,
        }
    }

    /// Connector width for a given content scale: thin but still visible.
    pub fn line_width(&self, content_scale: f64) -> f64 {
        self.min_line_width
            .max(self.line_width_per_scale * content_scale)
    }
}

/// Playback speed preset.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    /// Twice the base duration.
    Slow,
    /// Base duration.
    #[default]
    Normal,
    /// Half the base duration.
    Fast,
}

impl Speed {
    /// Multiplier applied to the base duration.
    pub fn duration_factor(self) -> f64 {
        match self {
            Self::Slow => 2.0,
            Self::Normal => 1.0,
            Self::Fast => 0.5,
        }
    }
}

/// Selectable policies, read once when a session starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Duration preset.
    pub speed: Speed,
    /// Reveal order ("story").
    pub story: RevealPolicy,
    /// How markers are paired.
    pub pairing: PairingPolicy,
    /// Reveal easing.
    pub ease: Ease,
    /// Shuffle seed; drawn at random when absent.
    pub seed: Option<u64>,
}
