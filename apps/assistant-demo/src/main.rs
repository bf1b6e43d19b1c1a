//! Voice Music Assistant Demo Application
//!
//! Demonstrates the full pipeline end-to-end:
//! Transcript → Command Grammar → Playback Controller → Spoken Feedback
//!
//! Runs against mock speech backends by default. With a catalog file it
//! loads your library; without one it uses a small built-in one.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use assistant_core::{Coordinator, CoordinatorConfig, Session};
use command_dispatch::{dispatch_with_catalog, parse_command};
use media_library::{load_catalog, MemoryCatalog, Track};
use playback_control::{AudioSink, PlaybackController};
use speech_local::{
    ensure_model, extract_transcript, model_install_help, MockListener, SpeechSynthesizer,
};

#[derive(Parser)]
#[command(name = "assistant-demo")]
#[command(about = "Voice Music Assistant Demo")]
struct Args {
    /// Path to a JSON catalog file (uses built-in demo tracks if omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory holding an offline speech model
    #[arg(long, default_value = "models/speech")]
    model_dir: PathBuf,

    /// Interactive mode (read transcripts from stdin)
    #[arg(long)]
    interactive: bool,

    /// Test a specific command transcript and exit
    #[arg(long)]
    test_command: Option<String>,
}

/// Speaks by printing. Stands in for a platform TTS engine.
struct ConsoleSynthesizer;

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&mut self, text: &str) {
        println!("🔊 {text}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();

    info!("🎵 Starting Voice Music Assistant Demo");

    if let Err(e) = ensure_model(&args.model_dir) {
        warn!("no offline speech model: {e}");
        println!("{}", model_install_help(&args.model_dir));
        println!("Continuing with mock speech backends.\n");
    }

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => MemoryCatalog::new(demo_tracks()),
    };
    info!(tracks = catalog.len(), "catalog ready");

    let controller = PlaybackController::new(make_sink()?);
    let mut session = Session::new(
        controller,
        Arc::new(catalog),
        Box::new(ConsoleSynthesizer),
    );

    if let Some(test_cmd) = args.test_command {
        run_single_transcript(&test_cmd, &mut session)?;
    } else if args.interactive {
        run_interactive(&mut session)?;
    } else {
        run_scripted_demo(&mut session)?;
        session = run_wake_cycle_demo(session).await?;
    }

    session.shutdown();
    info!("✅ Assistant demo completed");
    Ok(())
}

/// Parse and dispatch one raw transcript, printing what happened.
fn run_single_transcript(transcript: &str, session: &mut Session) -> Result<()> {
    println!("🎤 Heard: \"{transcript}\"");

    let snapshot = session.controller.snapshot();
    match parse_command(&transcript.to_lowercase(), &snapshot) {
        Some(command) => {
            let phrase =
                dispatch_with_catalog(command, &mut session.controller, session.catalog.as_ref())?;
            session.speak(&phrase);
            if let Some(now) = session.controller.now_playing() {
                println!(
                    "   queue: {} tracks, current: {}",
                    session.controller.queue().len(),
                    now.title
                );
            }
        }
        None => {
            println!("   (not a music command, ignored)");
        }
    }
    Ok(())
}

fn run_interactive(session: &mut Session) -> Result<()> {
    println!("🎤 Interactive Voice Music Assistant Demo");
    println!("Type transcripts and press Enter (or 'quit' to exit):");
    println!("Examples:");
    println!("  - 'play music'");
    println!("  - 'play blinding'");
    println!("  - 'pause' / 'resume'");
    println!("  - 'next song' / 'previous song'");
    println!("  - 'shuffle on' / 'repeat off'");
    println!("A line starting with '{{' is treated as a recognizer JSON payload.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("🎤 Transcript: ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();

        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        // Accept either a raw transcript or a full recognizer payload
        let transcript = if line.starts_with('{') {
            match extract_transcript(line) {
                Some(text) => text,
                None => {
                    println!("   (malformed recognizer payload, ignored)");
                    continue;
                }
            }
        } else {
            line.to_string()
        };

        run_single_transcript(&transcript, session)?;
        println!();
    }

    Ok(())
}

fn run_scripted_demo(session: &mut Session) -> Result<()> {
    let demo_transcripts = vec![
        "play blinding",
        "next song",
        "shuffle on",
        "pause",
        "resume",
        "play midnight",
        "repeat on",
        "what's the weather",
    ];

    println!(
        "🎤 Running scripted demo with {} transcripts",
        demo_transcripts.len()
    );
    println!();

    for (i, transcript) in demo_transcripts.iter().enumerate() {
        println!("{}/{}: {}", i + 1, demo_transcripts.len(), transcript);
        run_single_transcript(transcript, session)?;
        println!();
    }

    Ok(())
}

/// Drive one wake-word cycle through the coordinator with scripted
/// recognizer payloads standing in for the microphone.
async fn run_wake_cycle_demo(session: Session) -> Result<Session> {
    println!("🎤 Wake-word cycle: \"hey music\" → \"play midnight\"");

    let wake = MockListener::scripted(vec![r#"{"text": "hey music"}"#.to_string()]);
    let command = MockListener::scripted(vec![r#"{"text": "play midnight"}"#.to_string()]);

    let (coordinator, handle) = Coordinator::new(
        session,
        Box::new(wake),
        Box::new(command),
        CoordinatorConfig::default(),
    )?;
    let task = tokio::spawn(coordinator.run());

    // Let the cycle complete: ack, command, grace delay, back to wake
    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    handle.shutdown();
    let session = task.await?;

    if let Some(now) = session.controller.now_playing() {
        println!(
            "   now playing: {} — {}",
            now.artist.as_deref().unwrap_or("Unknown"),
            now.title
        );
    }
    println!("🎉 Demo completed.");
    Ok(session)
}

fn demo_tracks() -> Vec<Track> {
    let entries = [
        (1, "Midnight City", Some("M83"), Some("Hurry Up, We're Dreaming")),
        (2, "Blinding Lights", Some("The Weeknd"), Some("After Hours")),
        (3, "Bohemian Rhapsody", Some("Queen"), Some("A Night at the Opera")),
        (4, "Take Five", Some("The Dave Brubeck Quartet"), Some("Time Out")),
        (5, "Clair de Lune", None, None),
    ];
    entries
        .iter()
        .map(|(id, title, artist, album)| Track {
            id: *id,
            title: (*title).to_string(),
            artist: artist.map(str::to_string),
            album: album.map(str::to_string),
            uri: format!("file:///music/{id}.mp3"),
        })
        .collect()
}

#[cfg(feature = "audio")]
fn make_sink() -> Result<Box<dyn AudioSink>> {
    Ok(Box::new(playback_control::RodioSink::new()?))
}

#[cfg(not(feature = "audio"))]
fn make_sink() -> Result<Box<dyn AudioSink>> {
    Ok(Box::new(playback_control::NullSink))
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
