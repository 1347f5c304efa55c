//! Time-driven reveal cursor.
//!
//! The cursor is derived from elapsed wall-clock time on every frame and never incremented
//! directly. Resuming back-computes the start timestamp from the current cursor through the
//! inverse easing curve, so pause/resume neither skips nor repeats connections.

use crate::foundation::error::{StarcrossError, StarcrossResult};
use crate::playback::ease::Ease;
use crate::playback::frames::{FrameRequestId, FrameRequester};

/// Coarse scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    /// Not running; cursor is at 0 or at the end.
    Idle,
    /// Frame updates are being scheduled.
    Running,
    /// Stopped mid-way; cursor keeps its last value.
    Paused,
}

/// Observable state change, consumed by whatever presents controls and status.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    /// Playback entered `Running` from `cursor`.
    Started {
        /// Cursor the run resumes from.
        cursor: usize,
        /// Connection count.
        total: usize,
    },
    /// A frame update moved the cursor. Consecutive advances not yet drained are merged.
    Advanced {
        /// New cursor.
        cursor: usize,
        /// Connection count.
        total: usize,
    },
    /// Playback was paused.
    Paused {
        /// Cursor kept while paused.
        cursor: usize,
        /// Connection count.
        total: usize,
    },
    /// Every connection is revealed and no further frames are scheduled.
    Completed {
        /// Connection count.
        total: usize,
    },
    /// Cursor returned to 0.
    Reset {
        /// Connection count.
        total: usize,
    },
    /// The connection count changed under the cursor.
    Retargeted {
        /// Cursor after clamping.
        cursor: usize,
        /// New connection count.
        total: usize,
    },
}

/// Snapshot of the scheduler fields.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PlaybackState {
    /// Connections currently revealed, `0 <= cursor <= total`.
    pub cursor: usize,
    /// Connections available.
    pub total: usize,
    /// Current phase.
    pub phase: PlaybackPhase,
    /// Timestamp (ms) the current run is measured from.
    pub start_ms: f64,
    /// Time to reveal everything, in ms.
    pub duration_ms: f64,
    /// Easing applied to linear progress.
    pub ease: Ease,
}

/// Reveal-cursor state machine driven by an external frame source.
#[derive(Debug)]
pub struct PlaybackScheduler {
    state: PlaybackState,
    pending: Option<FrameRequestId>,
    events: Vec<PlaybackEvent>,
}

fn validate_duration(duration_ms: f64) -> StarcrossResult<()> {
    if !duration_ms.is_finite() || duration_ms <= 0.0 {
        return Err(StarcrossError::validation(
            "playback duration_ms must be finite and > 0",
        ));
    }
    Ok(())
}

impl PlaybackScheduler {
    /// Idle scheduler over `total` connections.
    pub fn new(total: usize, duration_ms: f64, ease: Ease) -> StarcrossResult<Self> {
        validate_duration(duration_ms)?;
        Ok(Self {
            state: PlaybackState {
                cursor: 0,
                total,
                phase: PlaybackPhase::Idle,
                start_ms: 0.0,
                duration_ms,
                ease,
            },
            pending: None,
            events: Vec::new(),
        })
    }

    /// Field snapshot.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Connections currently revealed.
    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    /// Connections available.
    pub fn total(&self) -> usize {
        self.state.total
    }

    /// Current phase.
    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase
    }

    /// `true` while frame updates are scheduled.
    pub fn is_running(&self) -> bool {
        self.state.phase == PlaybackPhase::Running
    }

    /// `true` once every connection has been revealed and playback stopped.
    pub fn is_complete(&self) -> bool {
        self.state.phase == PlaybackPhase::Idle
            && self.state.total > 0
            && self.state.cursor == self.state.total
    }

    /// The frame request the scheduler is waiting on, if any.
    pub fn pending_frame(&self) -> Option<FrameRequestId> {
        self.pending
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Playback time corresponding to the current state at `now_ms`.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        let s = &self.state;
        if s.phase == PlaybackPhase::Running {
            return (now_ms - s.start_ms).clamp(0.0, s.duration_ms);
        }
        if s.total == 0 {
            return 0.0;
        }
        s.ease.invert(s.cursor as f64 / s.total as f64) * s.duration_ms
    }

    /// Begin or resume playback and run the first update immediately.
    ///
    /// A cursor at the end restarts from 0. With zero connections this is a no-op and the
    /// scheduler stays idle. Returns whether playback is running afterwards.
    pub fn start(&mut self, now_ms: f64, frames: &mut dyn FrameRequester) -> bool {
        let total = self.state.total;
        if total == 0 {
            return false;
        }
        if self.is_running() {
            return true;
        }
        if self.state.cursor >= total {
            self.state.cursor = 0;
        }
        let progress = self.state.cursor as f64 / total as f64;
        self.state.start_ms = now_ms - self.state.ease.invert(progress) * self.state.duration_ms;
        self.state.phase = PlaybackPhase::Running;
        self.events.push(PlaybackEvent::Started {
            cursor: self.state.cursor,
            total,
        });
        tracing::debug!(cursor = self.state.cursor, total, "playback started");
        self.update(now_ms, frames);
        self.is_running()
    }

    /// Deliver a fired frame request. Stale or unknown ids are ignored.
    ///
    /// Returns whether the update was applied.
    pub fn on_frame(
        &mut self,
        id: FrameRequestId,
        now_ms: f64,
        frames: &mut dyn FrameRequester,
    ) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        self.update(now_ms, frames);
        true
    }

    /// `Running -> Paused`; cancels the outstanding frame request in any state.
    pub fn pause(&mut self, frames: &mut dyn FrameRequester) {
        self.cancel_pending(frames);
        if self.is_running() {
            self.state.phase = PlaybackPhase::Paused;
            self.events.push(PlaybackEvent::Paused {
                cursor: self.state.cursor,
                total: self.state.total,
            });
            tracing::debug!(cursor = self.state.cursor, "playback paused");
        }
    }

    /// From any state: cancel pending updates, cursor to 0, `Idle`.
    pub fn reset(&mut self, frames: &mut dyn FrameRequester) {
        self.cancel_pending(frames);
        self.state.cursor = 0;
        self.state.phase = PlaybackPhase::Idle;
        self.events.push(PlaybackEvent::Reset {
            total: self.state.total,
        });
    }

    /// Replace the connection count after a rebuild.
    ///
    /// Running playback is paused first; the cursor is clamped to the new count. A cursor at the
    /// end leaves the scheduler `Idle` (complete), a cursor strictly inside the new range leaves
    /// it `Paused`, so `Idle` always means 0 or the end.
    pub fn set_total(&mut self, total: usize, frames: &mut dyn FrameRequester) {
        self.cancel_pending(frames);
        if self.is_running() {
            self.state.phase = PlaybackPhase::Paused;
        }
        self.state.total = total;
        self.state.cursor = self.state.cursor.min(total);
        if self.state.cursor == total {
            self.state.phase = PlaybackPhase::Idle;
        } else if self.state.cursor > 0 {
            self.state.phase = PlaybackPhase::Paused;
        }
        self.events.push(PlaybackEvent::Retargeted {
            cursor: self.state.cursor,
            total,
        });
    }

    /// Change the run length, keeping the current linear progress.
    pub fn set_duration_ms(&mut self, duration_ms: f64, now_ms: f64) -> StarcrossResult<()> {
        validate_duration(duration_ms)?;
        if self.is_running() {
            let old = self.state.duration_ms;
            let linear = ((now_ms - self.state.start_ms) / old).clamp(0.0, 1.0);
            self.state.start_ms = now_ms - linear * duration_ms;
        }
        self.state.duration_ms = duration_ms;
        Ok(())
    }

    /// Change the easing curve, keeping the current cursor.
    pub fn set_ease(&mut self, ease: Ease, now_ms: f64) {
        self.state.ease = ease;
        if self.is_running() && self.state.total > 0 {
            let progress = self.state.cursor as f64 / self.state.total as f64;
            self.state.start_ms = now_ms - ease.invert(progress) * self.state.duration_ms;
        }
    }

    fn cancel_pending(&mut self, frames: &mut dyn FrameRequester) {
        if let Some(id) = self.pending.take() {
            frames.cancel_frame(id);
        }
    }

    fn update(&mut self, now_ms: f64, frames: &mut dyn FrameRequester) {
        if !self.is_running() {
            return;
        }
        let total = self.state.total;
        let elapsed = now_ms - self.state.start_ms;
        let linear = (elapsed / self.state.duration_ms).clamp(0.0, 1.0);
        let eased = self.state.ease.apply(linear);
        let derived = ((eased * total as f64).floor() as usize).min(total);
        // Float error in the resume back-computation must not step the cursor backwards.
        let cursor = derived.max(self.state.cursor);
        if cursor != self.state.cursor {
            self.state.cursor = cursor;
            // Undrained consecutive advances collapse into the latest one.
            match self.events.last_mut() {
                Some(PlaybackEvent::Advanced { cursor: last, .. }) => *last = cursor,
                _ => self.events.push(PlaybackEvent::Advanced { cursor, total }),
            }
        }

        if linear >= 1.0 {
            self.state.cursor = total;
            self.state.phase = PlaybackPhase::Idle;
            self.events.push(PlaybackEvent::Completed { total });
            tracing::debug!(total, "playback completed");
        } else {
            self.pending = Some(frames.request_frame());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
