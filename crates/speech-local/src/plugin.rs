use tracing::debug;

#[cfg(feature = "mock")]
use crate::MockListener;
use crate::{ListenerConfig, Result, SpeechError, SpeechListener};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ListenerBackendKind {
    Mock,
    Vosk,
    WhisperCpp,
}

/// Construct a listener backend by kind.
pub fn new_listener_backend(
    kind: ListenerBackendKind,
    cfg: ListenerConfig,
) -> Result<Box<dyn SpeechListener>> {
    debug!(?kind, "constructing listener backend");
    match kind {
        ListenerBackendKind::Mock => {
            #[cfg(feature = "mock")]
            {
                // The mock ignores grammar constraints and sample rate.
                let _ = cfg;
                Ok(Box::new(MockListener::silent()))
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = cfg;
                Err(SpeechError::Unsupported("mock feature not enabled"))
            }
        }
        ListenerBackendKind::Vosk => Err(SpeechError::Unsupported(
            "vosk backend not yet integrated",
        )),
        ListenerBackendKind::WhisperCpp => Err(SpeechError::Unsupported(
            "whisper_cpp backend not yet integrated",
        )),
    }
}
