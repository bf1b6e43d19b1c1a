use tokio::sync::mpsc::UnboundedSender;

use crate::{Result, Utterance};

/// Where a listener delivers completed utterances.
pub type UtteranceSink = UnboundedSender<Utterance>;

/// A microphone capture session backed by an offline recognizer.
///
/// Implementations deliver one `Utterance` per completed phrase into the
/// sink passed to `start`. At most one listener may be capturing at a time;
/// the coordinator enforces that invariant.
pub trait SpeechListener: Send {
    /// Begin capturing. Fails with `SpeechError::MissingModel` when the
    /// offline model is absent, or `ListenerStart` for device errors.
    fn start(&mut self, sink: UtteranceSink) -> Result<()>;

    /// Stop capturing and release the microphone.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Text-to-speech output.
pub trait SpeechSynthesizer: Send {
    /// Speak `text`, replacing any utterance still pending (flush-replace
    /// semantics; there is no queue of pending utterances).
    fn speak(&mut self, text: &str);
}
