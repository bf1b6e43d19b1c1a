//! playback-control: playback session state and controller facade
//!
//! The controller owns the queue, current position, play/pause flag, and
//! shuffle/repeat settings, and drives a low-level `AudioSink` that does the
//! actual decoding and output. Decoding and transport stay behind the sink
//! trait; a no-op `NullSink` backs tests, and a rodio-based sink is
//! available behind the `audio` feature.

mod types;
pub use types::{NowPlaying, PlaybackSnapshot, RepeatMode};

mod error;
pub use error::{PlaybackError, Result};

mod sink;
pub use sink::{AudioSink, NullSink};

mod controller;
pub use controller::PlaybackController;

#[cfg(feature = "audio")]
mod rodio_sink;
#[cfg(feature = "audio")]
pub use rodio_sink::RodioSink;
