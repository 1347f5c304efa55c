/// Convenience result type used across starcross.
pub type StarcrossResult<T> = Result<T, StarcrossError>;

/// Top-level error taxonomy used by library APIs.
///
/// Empty input and missing markers are not errors; they surface as
/// [`crate::InputNotice`] on the session summary.
#[derive(thiserror::Error, Debug)]
pub enum StarcrossError {
    /// Invalid configuration, options or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// The source text could not be obtained. Terminal for a session.
    #[error("load failed: could not read '{source_name}': {reason}")]
    LoadFailed {
        /// Path (or `-` for stdin) the text was requested from.
        source_name: String,
        /// Underlying cause plus remediation hint.
        reason: String,
    },

    /// Misuse of the playback API that cannot be guarded silently.
    #[error("playback error: {0}")]
    Playback(String),

    /// Raster backend failures.
    #[error("render error: {0}")]
    Render(String),

    /// Frame sink / video encoder failures.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StarcrossError {
    /// Build a [`StarcrossError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StarcrossError::LoadFailed`] value.
    pub fn load_failed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`StarcrossError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`StarcrossError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StarcrossError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Return `true` for the terminal source-loading failure.
    pub fn is_load_failed(&self) -> bool {
        matches!(self, Self::LoadFailed { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
