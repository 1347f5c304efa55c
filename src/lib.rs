//! Starcross lays a text out on a portrait canvas and animates straight connector lines between
//! every "Romeo" and every "Juliet" in it.
//!
//! The pipeline is session-oriented:
//!
//! - Load the text ([`load_text`], optionally [`clean_extracted_text`])
//! - Build a [`Visualization`]: tokenize, lay out, extract markers, build connections
//! - Drive it with [`Visualization::start`] / [`Visualization::on_frame`] from any frame source
//! - Draw frames with a [`SceneRenderer`], or record a full run with [`record_playback`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod connect;
/// Frame sinks and recording.
pub mod encode;
pub(crate) mod layout;
pub(crate) mod playback;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod text;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect, Rgba8, Rgba8Premul};
pub use crate::foundation::error::{StarcrossError, StarcrossResult};

pub use crate::connect::builder::{
    Connection, PairingPolicy, RevealPolicy, apply_reveal_order, build_connections, pair_markers,
};
pub use crate::connect::markers::{
    MARKER_A, MARKER_B, MarkerCategory, MarkerPoint, MarkerSet, extract_markers,
};
pub use crate::encode::ffmpeg::{
    Container, DEFAULT_RECORDING_NAME, FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path,
};
pub use crate::encode::recorder::{Recorder, RecordingStats, record_playback};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::layout::flow::{
    FlowParams, LayoutResult, PositionedWord, center_horizontally, fit_to_height, flow_words,
    layout_tokens,
};
pub use crate::layout::measure::{
    FixedAdvanceMeasure, ParleyMeasure, TextBrushRgba8, TextMeasure, TextShaper,
};
pub use crate::playback::ease::Ease;
pub use crate::playback::frames::{FrameQueue, FrameRequestId, FrameRequester};
pub use crate::playback::scheduler::{
    PlaybackEvent, PlaybackPhase, PlaybackScheduler, PlaybackState,
};
pub use crate::render::cpu::{CpuSurface, CpuSurfaceOpts};
pub use crate::render::scene::{
    SceneFrame, SceneRenderer, draw_connections, draw_words, line_style, render_scene, text_style,
};
pub use crate::render::surface::{FrameRGBA, LineStyle, Surface, TextStyle};
pub use crate::session::config::{PlaybackOptions, Speed, VisualConfig};
pub use crate::session::visualization::{InputNotice, Summary, Visualization};
pub use crate::text::source::{clean_extracted_text, load_text};
pub use crate::text::tokenize::{Token, matches_marker, normalize, tokenize};
