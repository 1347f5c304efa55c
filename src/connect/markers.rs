//! Marker anchors: every "Romeo" and "Juliet" occurrence in layout order.

use crate::foundation::core::Point;
use crate::layout::flow::PositionedWord;

/// Normalized literal for marker category A.
pub const MARKER_A: &str = "romeo";
/// Normalized literal for marker category B.
pub const MARKER_B: &str = "juliet";

/// Which of the two fixed marker classes a word belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerCategory {
    /// "Romeo" and anything whose normalized form starts with it.
    A,
    /// "Juliet" and anything whose normalized form starts with it.
    B,
}

impl MarkerCategory {
    /// Classify a positioned word. The two literals are disjoint prefixes, so at most one applies.
    pub fn of(word: &PositionedWord) -> Option<Self> {
        if word.token.matches_marker(MARKER_A) {
            Some(Self::A)
        } else if word.token.matches_marker(MARKER_B) {
            Some(Self::B)
        } else {
            None
        }
    }

    /// Display name used in status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "Romeo",
            Self::B => "Juliet",
        }
    }
}

/// Anchor of one marker occurrence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPoint {
    /// Index of the source word in the layout.
    pub word_index: usize,
    /// Connector endpoint (the word's center).
    pub point: Point,
}

/// Marker anchors of one layout pass, each list in text order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerSet {
    /// Category A anchors.
    pub a: Vec<MarkerPoint>,
    /// Category B anchors.
    pub b: Vec<MarkerPoint>,
}

impl MarkerSet {
    /// `true` when either category has no occurrence, so no connection can exist.
    pub fn is_degenerate(&self) -> bool {
        self.a.is_empty() || self.b.is_empty()
    }
}

/// Single pass over the layout collecting both categories.
pub fn extract_markers(words: &[PositionedWord]) -> MarkerSet {
    let mut set = MarkerSet::default();
    for (word_index, w) in words.iter().enumerate() {
        let mp = MarkerPoint {
            word_index,
            point: w.center,
        };
        match MarkerCategory::of(w) {
            Some(MarkerCategory::A) => set.a.push(mp),
            Some(MarkerCategory::B) => set.b.push(mp),
            None => {}
        }
    }
    tracing::debug!(a = set.a.len(), b = set.b.len(), "markers extracted");
    set
}
