//! command-dispatch: transcript grammar and playback command dispatch
//!
//! This crate turns lowercased transcripts into playback intents via an
//! ordered, first-match-wins rule set, and applies exactly one intent to
//! the playback controller (or runs a library query). Unrecognized
//! transcripts map to no command at all: no action, no feedback.

mod error;
pub use error::{DispatchError, Result};

mod grammar;
pub use grammar::{parse_command, Command, CommandGrammar};

mod dispatch;
pub use dispatch::{apply_query_results, dispatch, dispatch_with_catalog, DispatchOutcome};
