//! Crate error type
//!
//! Only session setup can fail. Per-tick evaluation is total.

/// Result alias that carries [`DanceError`].
pub type Result<T> = std::result::Result<T, DanceError>;

#[derive(Debug, thiserror::Error)]
pub enum DanceError {
    /// `init_cursors` was called before a beatmap was attached.
    #[error("no beatmap set: call set_beatmap before init_cursors")]
    BeatmapNotSet,
    /// Settings failed validation.
    #[error("invalid dance settings: {0}")]
    InvalidSettings(String),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl DanceError {
    pub fn invalid_settings<T: Into<String>>(msg: T) -> Self {
        Self::InvalidSettings(msg.into())
    }
}
