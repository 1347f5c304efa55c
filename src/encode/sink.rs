use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{StarcrossError, StarcrossResult};
use crate::render::surface::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in capture order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StarcrossResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StarcrossResult<()>;
    /// Called once after the last frame; flushes and finalizes the output.
    fn end(&mut self) -> StarcrossResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StarcrossResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StarcrossResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StarcrossResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Shares one sink between the recorder and the caller, so captured frames stay inspectable.
impl<S: FrameSink + ?Sized> FrameSink for std::sync::Arc<std::sync::Mutex<S>> {
    fn begin(&mut self, cfg: SinkConfig) -> StarcrossResult<()> {
        lock(self)?.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StarcrossResult<()> {
        lock(self)?.push_frame(idx, frame)
    }

    fn end(&mut self) -> StarcrossResult<()> {
        lock(self)?.end()
    }
}

fn lock<S: ?Sized>(
    shared: &std::sync::Mutex<S>,
) -> StarcrossResult<std::sync::MutexGuard<'_, S>> {
    shared
        .lock()
        .map_err(|_| StarcrossError::encode("shared sink mutex poisoned"))
}
