use std::sync::Arc;

use media_library::MediaCatalog;
use playback_control::PlaybackController;
use speech_local::SpeechSynthesizer;

/// Everything one assistant instance owns.
///
/// Constructed on start, released with `shutdown` on stop, and passed by
/// reference to whatever needs it. Replaces the long-lived singletons of a
/// typical mobile port with a single owned object.
pub struct Session {
    pub controller: PlaybackController,
    pub catalog: Arc<dyn MediaCatalog + Send + Sync>,
    pub synthesizer: Box<dyn SpeechSynthesizer>,
}

impl Session {
    pub fn new(
        controller: PlaybackController,
        catalog: Arc<dyn MediaCatalog + Send + Sync>,
        synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            controller,
            catalog,
            synthesizer,
        }
    }

    pub fn speak(&mut self, phrase: &str) {
        self.synthesizer.speak(phrase);
    }

    /// Stop output and release playback resources.
    pub fn shutdown(&mut self) {
        self.controller.stop();
    }
}
