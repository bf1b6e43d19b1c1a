use thiserror::Error;

pub type Result<T, E = LibraryError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("catalog read failed: {0}")]
    Io(String),
    #[error("catalog parse failed: {0}")]
    Parse(String),
}
