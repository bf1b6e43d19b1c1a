use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = SpeechError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// The offline model directory is absent. Recoverable: the user is
    /// shown install instructions, never a crash.
    #[error("speech model not found at {}", .0.display())]
    MissingModel(PathBuf),
    #[error("listener failed to start: {0}")]
    ListenerStart(String),
    #[error("backend not available: {0}")]
    Unsupported(&'static str),
}
