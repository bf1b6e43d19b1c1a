use thiserror::Error;

pub type Result<T, E = PlaybackError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio device error: {0}")]
    Device(String),
    #[error("audio source error: {0}")]
    Source(String),
}
