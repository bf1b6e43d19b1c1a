use serde::{Deserialize, Serialize};

/// Queue traversal repeat mode. Affects traversal order only, never the
/// queue contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    #[default]
    Off,
    All,
}

/// What the UI shows for the current track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: Option<String>,
    pub playing: bool,
}

/// A read-only view of the playback state, consumed by the command grammar
/// to gate state-dependent rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub paused: bool,
    /// Whether a queue is loaded (a track is available to resume).
    pub loaded: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}
