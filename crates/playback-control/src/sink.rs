use crate::Result;

/// Low-level audio output the controller drives. Implementations own
/// decoding and the output device; the controller never touches samples.
pub trait AudioSink: Send {
    /// Prepare `uri` for playback, replacing whatever was loaded. The sink
    /// starts paused; `play` makes it audible.
    fn load(&mut self, uri: &str) -> Result<()>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Drop the loaded source and release the output.
    fn stop(&mut self);
}

/// A sink that plays nothing. Backs tests and hosts without audio output.
pub struct NullSink;

impl AudioSink for NullSink {
    fn load(&mut self, _uri: &str) -> Result<()> {
        Ok(())
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn stop(&mut self) {}
}
