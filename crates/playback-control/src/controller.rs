use rand::seq::SliceRandom;
use tracing::{debug, warn};

use media_library::Track;

use crate::{AudioSink, NowPlaying, PlaybackSnapshot, RepeatMode};

/// Facade over the audio sink that owns all playback session state.
///
/// Invariants: a non-empty queue always has a valid current position, and
/// `order` is a permutation of the queue indices. Shuffle and repeat change
/// traversal only; the queue itself is never reordered. Every operation is
/// synchronous and becomes a no-op when its preconditions fail.
pub struct PlaybackController {
    sink: Box<dyn AudioSink>,
    queue: Vec<Track>,
    /// Traversal order over queue indices; identity unless shuffling.
    order: Vec<usize>,
    /// Position within `order`, not within `queue`.
    pos: usize,
    playing: bool,
    shuffle: bool,
    repeat: RepeatMode,
}

impl PlaybackController {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            queue: Vec::new(),
            order: Vec::new(),
            pos: 0,
            playing: false,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }

    /// Replace the queue and move to `start_index` (clamped). Playback does
    /// not start until `play` is called. An empty queue clears everything.
    pub fn load(&mut self, queue: Vec<Track>, start_index: usize) {
        if queue.is_empty() {
            self.stop();
            self.queue.clear();
            self.order.clear();
            self.pos = 0;
            return;
        }
        let start = start_index.min(queue.len() - 1);
        self.queue = queue;
        if self.shuffle {
            self.order = shuffled_order(self.queue.len(), start);
            self.pos = 0;
        } else {
            self.order = (0..self.queue.len()).collect();
            self.pos = start;
        }
        self.playing = false;
        debug!(tracks = self.queue.len(), start, "queue loaded");
        self.load_current();
    }

    pub fn play(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        self.playing = true;
        self.sink.play();
    }

    pub fn pause(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        self.playing = false;
        self.sink.pause();
    }

    /// Stop output entirely. The queue stays loaded.
    pub fn stop(&mut self) {
        self.playing = false;
        self.sink.stop();
    }

    pub fn skip_next(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        if self.pos + 1 >= self.order.len() {
            match self.repeat {
                RepeatMode::All => self.pos = 0,
                // Past the tail with repeat off: stay on the last track, paused.
                RepeatMode::Off => {
                    self.pause();
                    return;
                }
            }
        } else {
            self.pos += 1;
        }
        self.restart_current();
    }

    pub fn skip_previous(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        if self.pos == 0 {
            if self.repeat == RepeatMode::All {
                self.pos = self.order.len() - 1;
            }
            // Repeat off at the head: restart the head track.
        } else {
            self.pos -= 1;
        }
        self.restart_current();
    }

    /// Turning shuffle on generates a fresh traversal permutation with the
    /// current track first; turning it off restores queue order at the
    /// current track.
    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
        if self.queue.is_empty() {
            return;
        }
        let current = self.order[self.pos];
        if on {
            self.order = shuffled_order(self.queue.len(), current);
            self.pos = 0;
        } else {
            self.order = (0..self.queue.len()).collect();
            self.pos = current;
        }
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn current(&self) -> Option<&Track> {
        self.order.get(self.pos).and_then(|&i| self.queue.get(i))
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.current().map(|track| NowPlaying {
            title: track.title.clone(),
            artist: track.artist.clone(),
            playing: self.playing,
        })
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            paused: !self.playing,
            loaded: !self.queue.is_empty(),
            shuffle: self.shuffle,
            repeat: self.repeat,
        }
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    fn load_current(&mut self) {
        if let Some(track) = self.current().cloned() {
            if let Err(e) = self.sink.load(&track.uri) {
                warn!("failed to load {}: {e}", track.uri);
            }
        }
    }

    fn restart_current(&mut self) {
        self.load_current();
        if self.playing {
            self.sink.play();
        }
    }
}

/// A permutation of `0..len` starting at `current`.
fn shuffled_order(len: usize, current: usize) -> Vec<usize> {
    let mut rest: Vec<usize> = (0..len).filter(|&i| i != current).collect();
    rest.shuffle(&mut rand::thread_rng());
    let mut order = Vec::with_capacity(len);
    order.push(current);
    order.extend(rest);
    order
}
