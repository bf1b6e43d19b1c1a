use tracing::info;

use media_library::{MediaCatalog, Track};
use playback_control::{PlaybackController, RepeatMode};

use crate::{Command, Result};

/// What happened when a command was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The command took effect; speak this confirmation.
    Spoken(String),
    /// The command needs a library query before the queue can change. The
    /// caller runs the query off the interactive context and feeds the
    /// results to `apply_query_results`.
    Query(Option<String>),
}

/// Apply one parsed command to the controller. Transport and mode commands
/// take effect immediately; a play-query is handed back to the caller so
/// the catalog scan can run off-thread.
pub fn dispatch(command: Command, controller: &mut PlaybackController) -> DispatchOutcome {
    match command {
        Command::Pause => {
            controller.pause();
            DispatchOutcome::Spoken("Paused".to_string())
        }
        Command::Resume => {
            controller.play();
            DispatchOutcome::Spoken("Resumed".to_string())
        }
        Command::Next => {
            controller.skip_next();
            DispatchOutcome::Spoken("Next".to_string())
        }
        Command::Previous => {
            controller.skip_previous();
            DispatchOutcome::Spoken("Previous".to_string())
        }
        Command::Shuffle(on) => {
            controller.set_shuffle(on);
            let phrase = if on { "Shuffle on" } else { "Shuffle off" };
            DispatchOutcome::Spoken(phrase.to_string())
        }
        Command::Repeat(mode) => {
            controller.set_repeat(mode);
            let phrase = match mode {
                RepeatMode::All => "Repeat on",
                RepeatMode::Off => "Repeat off",
            };
            DispatchOutcome::Spoken(phrase.to_string())
        }
        Command::PlayQuery(filter) => DispatchOutcome::Query(filter),
    }
}

/// Replace the queue with query results and start playback from the first
/// track. An empty result set leaves the queue untouched.
pub fn apply_query_results(controller: &mut PlaybackController, tracks: Vec<Track>) -> String {
    if tracks.is_empty() {
        return "No matches found".to_string();
    }
    let first = tracks[0].clone();
    info!(results = tracks.len(), first = %first.title, "starting playback from query");
    controller.load(tracks, 0);
    controller.play();
    format!(
        "Now playing {} — {}",
        first.artist.as_deref().unwrap_or("Unknown"),
        first.title
    )
}

/// Synchronous dispatch including the library query. Used by one-shot
/// callers; the coordinator runs the query stage on a blocking task instead.
pub fn dispatch_with_catalog(
    command: Command,
    controller: &mut PlaybackController,
    catalog: &dyn MediaCatalog,
) -> Result<String> {
    match dispatch(command, controller) {
        DispatchOutcome::Spoken(phrase) => Ok(phrase),
        DispatchOutcome::Query(filter) => {
            let tracks = media_library::query(catalog, filter.as_deref())?;
            Ok(apply_query_results(controller, tracks))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_library::MemoryCatalog;
    use playback_control::NullSink;

    fn track(id: u64, title: &str, artist: Option<&str>) -> Track {
        Track {
            id,
            title: title.to_string(),
            artist: artist.map(str::to_string),
            album: None,
            uri: format!("file:///music/{id}.mp3"),
        }
    }

    fn controller() -> PlaybackController {
        PlaybackController::new(Box::new(NullSink))
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new(vec![
            track(1, "Banana Sun", Some("The Peels")),
            track(2, "apple pie", None),
        ])
    }

    #[test]
    fn pause_while_playing_speaks_paused() {
        let mut ctl = controller();
        ctl.load(vec![track(1, "one", None)], 0);
        ctl.play();
        let phrase =
            dispatch_with_catalog(Command::Pause, &mut ctl, &catalog()).expect("dispatch");
        assert_eq!(phrase, "Paused");
        assert!(ctl.snapshot().paused);
    }

    #[test]
    fn play_query_replaces_queue_and_reports_first_track() {
        let mut ctl = controller();
        let phrase = dispatch_with_catalog(
            Command::PlayQuery(Some("banana".to_string())),
            &mut ctl,
            &catalog(),
        )
        .expect("dispatch");
        assert_eq!(phrase, "Now playing The Peels — Banana Sun");
        assert_eq!(ctl.queue().len(), 1);
        assert!(!ctl.snapshot().paused);
    }

    #[test]
    fn missing_artist_reads_as_unknown() {
        let mut ctl = controller();
        let phrase = dispatch_with_catalog(
            Command::PlayQuery(Some("apple".to_string())),
            &mut ctl,
            &catalog(),
        )
        .expect("dispatch");
        assert_eq!(phrase, "Now playing Unknown — apple pie");
    }

    #[test]
    fn empty_query_result_leaves_queue_untouched() {
        let mut ctl = controller();
        ctl.load(vec![track(9, "keep me", None)], 0);
        let phrase = dispatch_with_catalog(
            Command::PlayQuery(Some("jazz".to_string())),
            &mut ctl,
            &catalog(),
        )
        .expect("dispatch");
        assert_eq!(phrase, "No matches found");
        assert_eq!(ctl.queue().len(), 1);
        assert_eq!(ctl.queue()[0].title, "keep me");
    }

    #[test]
    fn absent_filter_loads_the_whole_catalog() {
        let mut ctl = controller();
        let phrase = dispatch_with_catalog(Command::PlayQuery(None), &mut ctl, &catalog())
            .expect("dispatch");
        // Title-ascending order puts "apple pie" first
        assert_eq!(phrase, "Now playing Unknown — apple pie");
        assert_eq!(ctl.queue().len(), 2);
    }

    #[test]
    fn shuffle_command_flips_flag_without_queue_change() {
        let mut ctl = controller();
        ctl.load(vec![track(1, "one", None), track(2, "two", None)], 0);
        let before: Vec<u64> = ctl.queue().iter().map(|t| t.id).collect();
        let phrase = dispatch_with_catalog(Command::Shuffle(true), &mut ctl, &catalog())
            .expect("dispatch");
        assert_eq!(phrase, "Shuffle on");
        assert!(ctl.snapshot().shuffle);
        let after: Vec<u64> = ctl.queue().iter().map(|t| t.id).collect();
        assert_eq!(before, after);
    }
}
