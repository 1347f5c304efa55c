//! The injected "next frame" capability and a deterministic queue for simulated time.

use std::collections::VecDeque;

/// Handle of one requested display-refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// Injected "schedule next tick" capability.
///
/// The scheduler requests a frame only while running and cancels the outstanding request on
/// pause/reset. Hosts call back into the scheduler with the id they were handed.
pub trait FrameRequester {
    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameRequestId;
    /// Withdraw a request that has not fired yet.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Simulated refresh source: requests queue up until the caller fires them.
///
/// Drives playback in tests and in offline recording, where time advances in fixed steps.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: VecDeque<FrameRequestId>,
    cancelled: u64,
}

impl FrameQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total number of requests withdrawn so far.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Fire everything requested so far, oldest first (one display refresh).
    pub fn take_due(&mut self) -> Vec<FrameRequestId> {
        self.pending.drain(..).collect()
    }
}

impl FrameRequester for FrameQueue {
    fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.next_id);
        self.next_id += 1;
        self.pending.push_back(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        let before = self.pending.len();
        self.pending.retain(|p| *p != id);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}
