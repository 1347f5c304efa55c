use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{StarcrossError, StarcrossResult};
use crate::playback::frames::FrameQueue;
use crate::render::scene::SceneRenderer;
use crate::render::surface::FrameRGBA;
use crate::session::visualization::Visualization;

/// Totals of a finished recording.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordingStats {
    /// Frames handed to the sink.
    pub frames: u64,
    /// Video length in ms at the recording fps.
    pub duration_ms: f64,
}

struct ActiveRecording {
    sink: Box<dyn FrameSink>,
    fps: Fps,
    next: FrameIndex,
}

/// Owner of at most one active recording.
///
/// `start` while a recording is active is rejected; `stop` finalizes the sink before another
/// recording can begin.
#[derive(Default)]
pub struct Recorder {
    active: Option<ActiveRecording>,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("active", &self.is_active())
            .field("frames", &self.frames_captured())
            .finish()
    }
}

impl Recorder {
    /// Idle recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` between `start` and `stop`.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Frames captured by the active recording.
    pub fn frames_captured(&self) -> u64 {
        self.active.as_ref().map_or(0, |a| a.next.0)
    }

    /// Begin a recording into `sink`.
    pub fn start(&mut self, mut sink: Box<dyn FrameSink>, cfg: SinkConfig) -> StarcrossResult<()> {
        if self.active.is_some() {
            return Err(StarcrossError::encode("a recording is already active"));
        }
        let fps = cfg.fps;
        tracing::info!(width = cfg.width, height = cfg.height, fps = fps.as_f64(), "recording started");
        sink.begin(cfg)?;
        self.active = Some(ActiveRecording {
            sink,
            fps,
            next: FrameIndex(0),
        });
        Ok(())
    }

    /// Append one frame to the active recording.
    pub fn capture(&mut self, frame: &FrameRGBA) -> StarcrossResult<FrameIndex> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| StarcrossError::encode("no active recording"))?;
        let idx = active.next;
        active.sink.push_frame(idx, frame)?;
        active.next = FrameIndex(idx.0 + 1);
        Ok(idx)
    }

    /// Finalize the active recording. The recorder is idle afterwards even if the sink fails.
    pub fn stop(&mut self) -> StarcrossResult<RecordingStats> {
        let mut active = self
            .active
            .take()
            .ok_or_else(|| StarcrossError::encode("no active recording"))?;
        active.sink.end()?;
        let stats = RecordingStats {
            frames: active.next.0,
            duration_ms: active.fps.frame_time_ms(active.next),
        };
        tracing::info!(frames = stats.frames, duration_ms = stats.duration_ms, "recording stopped");
        Ok(stats)
    }
}

/// Record a full run of `vis` from cursor 0 to completion.
///
/// Time is simulated: frame `i` is captured at `i / fps`, after the playback update due at that
/// time. The last frame shows every connection. Without connections a single frame is captured.
#[tracing::instrument(skip_all, fields(connections = vis.connections().len()))]
pub fn record_playback(
    vis: &mut Visualization,
    renderer: &mut SceneRenderer,
    recorder: &mut Recorder,
    sink: Box<dyn FrameSink>,
    fps: Fps,
) -> StarcrossResult<RecordingStats> {
    let (width, height) = renderer.frame_size();
    recorder.start(sink, SinkConfig { width, height, fps })?;

    let driven = drive(vis, renderer, recorder, fps);
    let stopped = recorder.stop();
    driven?;
    stopped
}

fn drive(
    vis: &mut Visualization,
    renderer: &mut SceneRenderer,
    recorder: &mut Recorder,
    fps: Fps,
) -> StarcrossResult<()> {
    let mut frames = FrameQueue::new();
    vis.reset(&mut frames);
    vis.start(0.0, &mut frames);

    let duration_ms = vis.playback().duration_ms;
    let limit = (duration_ms / fps.frame_duration_ms()).ceil() as u64 + 2;
    let mut idx = FrameIndex(0);
    loop {
        let now = fps.frame_time_ms(idx);
        for id in frames.take_due() {
            vis.on_frame(id, now, &mut frames);
        }
        let frame = renderer.render(&vis.scene())?;
        recorder.capture(&frame)?;

        if !vis.is_running() {
            return Ok(());
        }
        if idx.0 >= limit {
            return Err(StarcrossError::playback(format!(
                "playback did not complete within {limit} frames"
            )));
        }
        idx = FrameIndex(idx.0 + 1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/recorder.rs"]
mod tests;
