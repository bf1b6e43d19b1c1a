//! speech-local: offline speech recognition and synthesis seams
//!
//! This crate defines the listener/synthesizer traits the assistant talks
//! through, the recognizer result schema, and transcript extraction. The
//! default build enables a `mock` backend so binaries and tests compile on
//! any host without a speech model installed.

mod types;
pub use types::{Alternative, ListenerConfig, RecognizerResult, Utterance};

mod error;
pub use error::{Result, SpeechError};

mod traits;
pub use traits::{SpeechListener, SpeechSynthesizer, UtteranceSink};

mod transcript;
pub use transcript::extract_transcript;

mod model;
pub use model::{ensure_model, model_install_help};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockListener, MockSynthesizer};

pub mod plugin;
