//! Connection construction (pairing policy) and reveal ordering (reveal policy).

use crate::connect::markers::{MarkerPoint, MarkerSet};
use rand::SeedableRng as _;
use rand::seq::SliceRandom as _;

/// One line segment from a category-A anchor to a category-B anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    /// Category A endpoint.
    pub from: MarkerPoint,
    /// Category B endpoint.
    pub to: MarkerPoint,
}

impl Connection {
    /// Stable identity of the pair, independent of reveal order.
    pub fn key(&self) -> (usize, usize) {
        (self.from.word_index, self.to.word_index)
    }
}

/// Rule generating the connection set from the two marker lists.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PairingPolicy {
    /// Every A with every B: `|A| * |B|` connections.
    #[default]
    Cross,
    /// `A[i]` with `B[m-1-i]` for `i < min(|A|, |B|)`.
    Linear,
}

/// Rule ordering the connection set for progressive display.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    /// Uniform shuffle driven by the session seed.
    #[default]
    Random,
    /// Keep construction order.
    Chronological,
}

/// Emit connections in construction order.
pub fn pair_markers(markers: &MarkerSet, pairing: PairingPolicy) -> Vec<Connection> {
    let (a, b) = (&markers.a, &markers.b);
    match pairing {
        PairingPolicy::Cross => {
            let mut out = Vec::with_capacity(a.len().saturating_mul(b.len()));
            for &from in a {
                for &to in b {
                    out.push(Connection { from, to });
                }
            }
            out
        }
        PairingPolicy::Linear => {
            let m = b.len();
            a.iter()
                .take(m)
                .enumerate()
                .map(|(i, &from)| Connection {
                    from,
                    to: b[m - 1 - i],
                })
                .collect()
        }
    }
}

/// Reorder in place according to `reveal`. The seed only matters for [`RevealPolicy::Random`].
pub fn apply_reveal_order(connections: &mut [Connection], reveal: RevealPolicy, seed: u64) {
    match reveal {
        RevealPolicy::Chronological => {}
        RevealPolicy::Random => {
            // Fisher-Yates over a seeded source: same seed, same order.
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            connections.shuffle(&mut rng);
        }
    }
}

/// Pair then order. Fully determined by `(markers, pairing, reveal, seed)`.
#[tracing::instrument(skip(markers), fields(a = markers.a.len(), b = markers.b.len()))]
pub fn build_connections(
    markers: &MarkerSet,
    pairing: PairingPolicy,
    reveal: RevealPolicy,
    seed: u64,
) -> Vec<Connection> {
    let mut connections = pair_markers(markers, pairing);
    apply_reveal_order(&mut connections, reveal, seed);
    tracing::debug!(connections = connections.len(), "connections built");
    connections
}

#[cfg(test)]
#[path = "../../tests/unit/connect/builder.rs"]
mod tests;
