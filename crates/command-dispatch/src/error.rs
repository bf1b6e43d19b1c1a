use thiserror::Error;

pub type Result<T, E = DispatchError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid command pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Library(#[from] media_library::LibraryError),
}
