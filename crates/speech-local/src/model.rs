use std::path::Path;

use crate::{Result, SpeechError};

/// Check that the offline recognizer model is installed.
///
/// Engines require a pre-supplied model directory at a known location
/// before any listening mode can start. Its absence is a user-facing,
/// recoverable condition.
pub fn ensure_model(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(SpeechError::MissingModel(dir.to_path_buf()))
    }
}

/// Install instructions shown when the model directory is missing.
pub fn model_install_help(dir: &Path) -> String {
    format!(
        "To use offline voice commands, download an offline speech model, \
         unzip it, and place the folder at {}. Then restart the assistant.",
        dir.display()
    )
}
