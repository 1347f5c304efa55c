//! The controller object: one text, one layout, one connection list, one playback timeline.

use crate::connect::builder::{Connection, PairingPolicy, RevealPolicy, build_connections};
use crate::connect::markers::{MarkerCategory, MarkerSet, extract_markers};
use crate::foundation::error::StarcrossResult;
use crate::foundation::math::group_thousands;
use crate::layout::flow::{LayoutResult, layout_tokens};
use crate::layout::measure::TextMeasure;
use crate::playback::ease::Ease;
use crate::playback::frames::{FrameRequestId, FrameRequester};
use crate::playback::scheduler::{PlaybackEvent, PlaybackPhase, PlaybackScheduler, PlaybackState};
use crate::render::scene::SceneFrame;
use crate::session::config::{PlaybackOptions, Speed, VisualConfig};
use crate::text::tokenize::tokenize;

/// Non-fatal input condition. Playback stays valid and simply has nothing to reveal.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputNotice {
    /// The text has no tokens.
    EmptyInput,
    /// At least one marker category has no occurrence, so there are no connections.
    NoMarkersFound {
        /// Categories with zero occurrences.
        missing: Vec<MarkerCategory>,
    },
}

impl std::fmt::Display for InputNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("the text is empty"),
            Self::NoMarkersFound { missing } => {
                let names: Vec<&str> = missing.iter().map(|c| c.label()).collect();
                write!(f, "no occurrences of {}", names.join(" or "))
            }
        }
    }
}

/// Serializable overview of a session, printed by `starcross info`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Summary {
    /// Tokens in the source text.
    pub tokens: usize,
    /// Rows used by the layout.
    pub rows: usize,
    /// Fit-to-height scale.
    pub content_scale: f64,
    /// Category A occurrences.
    pub romeo: usize,
    /// Category B occurrences.
    pub juliet: usize,
    /// Connections built.
    pub connections: usize,
    /// Pairing policy in effect.
    pub pairing: PairingPolicy,
    /// Reveal order in effect.
    pub story: RevealPolicy,
    /// Easing in effect.
    pub ease: Ease,
    /// Speed preset in effect.
    pub speed: Speed,
    /// Run length in ms.
    pub duration_ms: f64,
    /// Shuffle seed of this session.
    pub seed: u64,
    /// Input diagnostic, if any.
    pub notice: Option<InputNotice>,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} Romeo, {} Juliet, {} lines",
            group_thousands(self.romeo),
            group_thousands(self.juliet),
            group_thousands(self.connections)
        )
    }
}

/// Session controller.
///
/// Owns the layout, markers, connections and the playback scheduler. Layout is computed once;
/// changing the pairing or story rebuilds only the connections.
#[derive(Debug)]
pub struct Visualization {
    cfg: VisualConfig,
    options: PlaybackOptions,
    seed: u64,
    token_count: usize,
    layout: LayoutResult,
    markers: MarkerSet,
    connections: Vec<Connection>,
    generation: u64,
    playback: PlaybackScheduler,
    touched: bool,
}

impl Visualization {
    /// Tokenize, lay out, extract markers and build connections for `text`.
    ///
    /// Empty text and missing markers are not errors; see [`Visualization::notice`].
    #[tracing::instrument(skip(text, cfg, measure), fields(bytes = text.len()))]
    pub fn new(
        text: &str,
        cfg: VisualConfig,
        options: PlaybackOptions,
        measure: &mut dyn TextMeasure,
    ) -> StarcrossResult<Self> {
        cfg.validate()?;
        let tokens = tokenize(text);
        let token_count = tokens.len();
        let layout = layout_tokens(tokens, &cfg.flow_params(), measure)?;
        let markers = extract_markers(layout.words());
        let seed = options.seed.unwrap_or_else(rand::random);
        let options = PlaybackOptions {
            seed: Some(seed),
            ..options
        };
        let connections = build_connections(&markers, options.pairing, options.story, seed);
        let playback = PlaybackScheduler::new(
            connections.len(),
            cfg.base_duration_ms * options.speed.duration_factor(),
            options.ease,
        )?;

        tracing::info!(
            tokens = token_count,
            romeo = markers.a.len(),
            juliet = markers.b.len(),
            connections = connections.len(),
            seed,
            "visualization ready"
        );
        Ok(Self {
            cfg,
            options,
            seed,
            token_count,
            layout,
            markers,
            connections,
            generation: 0,
            playback,
            touched: false,
        })
    }

    /// Cosmetic configuration.
    pub fn config(&self) -> &VisualConfig {
        &self.cfg
    }

    /// Options in effect; `seed` is always set.
    pub fn options(&self) -> PlaybackOptions {
        self.options
    }

    /// Shuffle seed of this session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Positioned words.
    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    /// Marker anchors.
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Connections in reveal order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Playback state snapshot.
    pub fn playback(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Connections currently revealed.
    pub fn revealed(&self) -> usize {
        self.playback.cursor()
    }

    /// `true` while frame updates are scheduled.
    pub fn is_running(&self) -> bool {
        self.playback.is_running()
    }

    /// `true` once every connection is revealed.
    pub fn is_complete(&self) -> bool {
        self.playback.is_complete()
    }

    /// Input diagnostic, if any.
    pub fn notice(&self) -> Option<InputNotice> {
        if self.token_count == 0 {
            return Some(InputNotice::EmptyInput);
        }
        let mut missing = Vec::new();
        if self.markers.a.is_empty() {
            missing.push(MarkerCategory::A);
        }
        if self.markers.b.is_empty() {
            missing.push(MarkerCategory::B);
        }
        (!missing.is_empty()).then_some(InputNotice::NoMarkersFound { missing })
    }

    /// What to draw right now.
    pub fn scene(&self) -> SceneFrame<'_> {
        SceneFrame {
            layout: &self.layout,
            connections: &self.connections,
            revealed: self.playback.cursor(),
            generation: self.generation,
        }
    }

    /// Switch the reveal order. Returns whether the connections were rebuilt.
    pub fn set_story(&mut self, story: RevealPolicy, frames: &mut dyn FrameRequester) -> bool {
        if self.options.story == story {
            return false;
        }
        self.options.story = story;
        self.rebuild(frames);
        true
    }

    /// Switch the pairing policy. Returns whether the connections were rebuilt.
    pub fn set_pairing(&mut self, pairing: PairingPolicy, frames: &mut dyn FrameRequester) -> bool {
        if self.options.pairing == pairing {
            return false;
        }
        self.options.pairing = pairing;
        self.rebuild(frames);
        true
    }

    /// Switch the speed preset, keeping linear progress if running.
    pub fn set_speed(&mut self, speed: Speed, now_ms: f64) -> StarcrossResult<()> {
        self.playback
            .set_duration_ms(self.cfg.base_duration_ms * speed.duration_factor(), now_ms)?;
        self.options.speed = speed;
        Ok(())
    }

    /// Switch the easing curve.
    pub fn set_ease(&mut self, ease: Ease, now_ms: f64) {
        self.playback.set_ease(ease, now_ms);
        self.options.ease = ease;
    }

    /// Start or resume. No-op without connections. Returns whether playback is running.
    pub fn start(&mut self, now_ms: f64, frames: &mut dyn FrameRequester) -> bool {
        if self.connections.is_empty() {
            tracing::debug!("start ignored: nothing to reveal");
            return false;
        }
        self.touched = true;
        self.playback.start(now_ms, frames)
    }

    /// Pause, keeping the cursor.
    pub fn pause(&mut self, frames: &mut dyn FrameRequester) {
        self.playback.pause(frames);
    }

    /// Stop and return the cursor to 0.
    pub fn reset(&mut self, frames: &mut dyn FrameRequester) {
        self.touched = true;
        self.playback.reset(frames);
    }

    /// Deliver a fired frame request. Returns whether it was applied.
    pub fn on_frame(
        &mut self,
        id: FrameRequestId,
        now_ms: f64,
        frames: &mut dyn FrameRequester,
    ) -> bool {
        self.playback.on_frame(id, now_ms, frames)
    }

    /// Take the playback events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.playback.drain_events()
    }

    /// Overview for display or JSON output.
    pub fn summary(&self) -> Summary {
        let state = self.playback.state();
        Summary {
            tokens: self.token_count,
            rows: self.layout.rows(),
            content_scale: self.layout.content_scale(),
            romeo: self.markers.a.len(),
            juliet: self.markers.b.len(),
            connections: self.connections.len(),
            pairing: self.options.pairing,
            story: self.options.story,
            ease: self.options.ease,
            speed: self.options.speed,
            duration_ms: state.duration_ms,
            seed: self.seed,
            notice: self.notice(),
        }
    }

    /// One-line status text at `now_ms`.
    pub fn status(&self, now_ms: f64) -> String {
        let state = self.playback.state();
        let total = group_thousands(state.total);
        if self.token_count == 0 {
            return "0 / 0 lines".to_owned();
        }
        if state.total == 0 {
            return self.summary().to_string();
        }
        match state.phase {
            PlaybackPhase::Running | PlaybackPhase::Paused => {
                let elapsed_s = (self.playback.elapsed_ms(now_ms) / 1000.0).floor() as u64;
                let duration_s = (state.duration_ms / 1000.0).round() as u64;
                format!(
                    "{} / {total} lines · {elapsed_s}s / {duration_s}s",
                    group_thousands(state.cursor)
                )
            }
            PlaybackPhase::Idle if self.playback.is_complete() => {
                format!("{total} lines · completed")
            }
            PlaybackPhase::Idle if self.touched => {
                format!("{} / {total} lines", group_thousands(state.cursor))
            }
            PlaybackPhase::Idle => self.summary().to_string(),
        }
    }

    fn rebuild(&mut self, frames: &mut dyn FrameRequester) {
        self.connections = build_connections(
            &self.markers,
            self.options.pairing,
            self.options.story,
            self.seed,
        );
        self.generation += 1;
        self.playback.set_total(self.connections.len(), frames);
        tracing::info!(
            pairing = ?self.options.pairing,
            story = ?self.options.story,
            connections = self.connections.len(),
            seed = self.seed,
            "connections rebuilt"
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/visualization.rs"]
mod tests;
