use regex::Regex;
use tracing::debug;

use playback_control::{PlaybackSnapshot, RepeatMode};

use crate::Result;

/// A playback intent extracted from one transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pause,
    Resume,
    Next,
    Previous,
    Shuffle(bool),
    Repeat(RepeatMode),
    /// Free-text library search; `None` means the whole catalog.
    PlayQuery(Option<String>),
}

/// The ordered, first-match-wins rule set mapping transcripts to commands.
///
/// The resume rule is gated on the playback snapshot: it only fires while
/// playback is paused with a queue loaded, so a bare "play" while playing
/// falls through to the query rule. Same transcript plus same snapshot
/// always yields the same single command; rules after a match are never
/// evaluated.
pub struct CommandGrammar {
    shuffle: Regex,
    repeat: Regex,
    play_query: Regex,
}

const RESUME_WORDS: &[&str] = &["resume", "continue", "play"];

impl CommandGrammar {
    pub fn new() -> Result<Self> {
        Ok(Self {
            shuffle: Regex::new(r"shuffle\s+(on|off)")?,
            repeat: Regex::new(r"repeat\s+(on|off)")?,
            play_query: Regex::new(r"^play\s+(.*)$")?,
        })
    }

    /// Evaluate the rules in priority order against a lowercased transcript.
    pub fn parse(&self, text: &str, snapshot: &PlaybackSnapshot) -> Option<Command> {
        // Keep trailing whitespace: the query rule matches "play " with a
        // blank remainder, which means "all tracks".
        let text = text.trim_start();
        if text.trim().is_empty() {
            return None;
        }
        if text.contains("pause") {
            return Some(Command::Pause);
        }
        if snapshot.paused
            && snapshot.loaded
            && RESUME_WORDS.iter().any(|word| text.contains(word))
        {
            return Some(Command::Resume);
        }
        if text.contains("next") {
            return Some(Command::Next);
        }
        if text.contains("previous") || text.contains("back") {
            return Some(Command::Previous);
        }
        if let Some(caps) = self.shuffle.captures(text) {
            return Some(Command::Shuffle(&caps[1] == "on"));
        }
        if let Some(caps) = self.repeat.captures(text) {
            let mode = if &caps[1] == "on" {
                RepeatMode::All
            } else {
                RepeatMode::Off
            };
            return Some(Command::Repeat(mode));
        }
        if let Some(caps) = self.play_query.captures(text) {
            let query = caps[1].trim();
            let filter = (!query.is_empty()).then(|| query.to_string());
            return Some(Command::PlayQuery(filter));
        }
        if text.contains("play music") {
            return Some(Command::PlayQuery(None));
        }
        debug!("no rule matched transcript {text:?}");
        None
    }
}

/// One-shot parse with a freshly built grammar.
pub fn parse_command(text: &str, snapshot: &PlaybackSnapshot) -> Option<Command> {
    CommandGrammar::new().ok()?.parse(text, snapshot)
}
