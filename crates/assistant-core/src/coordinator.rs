use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use command_dispatch::{
    apply_query_results, dispatch, Command, CommandGrammar, DispatchError, DispatchOutcome,
};
use speech_local::{extract_transcript, SpeechError, SpeechListener, Utterance};

use crate::Session;

const ACK: &str = "Yes?";
const LISTENING: &str = "Listening";
const STOPPED_LISTENING: &str = "Stopped listening";
const START_FAILED: &str = "Failed to start listening";
const MODEL_MISSING: &str =
    "Speech model not found. Install an offline model to use voice commands.";

/// Which listening mode is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningMode {
    /// No listener active: before startup, during teardown, or after a
    /// listener failed to start.
    Idle,
    /// Constrained recognizer listening only for the wake phrase.
    WakeListening,
    /// General recognizer listening for any utterance.
    CommandListening,
}

/// Events consumed by the coordinator loop, strictly in arrival order.
#[derive(Debug)]
pub enum CoordinatorEvent {
    WakeUtterance(Utterance),
    CommandUtterance(Utterance),
    /// The bounded command window elapsed. Generations make a stale timeout
    /// from a replaced session harmless.
    CommandTimeout { generation: u64 },
    /// Manual UI affordance flipping between wake and command mode.
    Toggle,
    Shutdown,
}

/// Configuration for the wake/command listening state machine.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub wake_phrase: String,
    /// How long command mode stays open after a wake word.
    pub command_timeout: Duration,
    /// Pause before re-arming the wake listener after a dispatched command,
    /// so synthesis is not captured by the next microphone session.
    pub grace_delay: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            wake_phrase: "hey music".to_string(),
            command_timeout: Duration::from_secs(10),
            grace_delay: Duration::from_millis(300),
        }
    }
}

/// Sends control events into a running coordinator.
#[derive(Clone)]
pub struct CoordinatorHandle {
    events: UnboundedSender<CoordinatorEvent>,
}

impl CoordinatorHandle {
    pub fn toggle(&self) {
        let _ = self.events.send(CoordinatorEvent::Toggle);
    }

    pub fn shutdown(&self) {
        let _ = self.events.send(CoordinatorEvent::Shutdown);
    }
}

#[derive(Copy, Clone)]
enum ListenerSource {
    Wake,
    Command,
}

/// The wake/command listening state machine.
///
/// All transitions and all playback mutation happen on the loop that
/// consumes the event channel, so no locking is needed. Starting either
/// listening mode first stops the other; a single forwarder slot carries
/// utterances from whichever listener is active, which keeps two capture
/// sessions from ever feeding the loop at once.
pub struct Coordinator {
    session: Session,
    wake: Box<dyn SpeechListener>,
    command: Box<dyn SpeechListener>,
    grammar: CommandGrammar,
    config: CoordinatorConfig,
    mode: ListeningMode,
    events_tx: UnboundedSender<CoordinatorEvent>,
    events_rx: UnboundedReceiver<CoordinatorEvent>,
    forward: Option<JoinHandle<()>>,
    timeout: Option<JoinHandle<()>>,
    timeout_generation: u64,
    /// Whether the current command session was entered via the wake word.
    via_wake: bool,
}

impl Coordinator {
    pub fn new(
        session: Session,
        wake: Box<dyn SpeechListener>,
        command: Box<dyn SpeechListener>,
        config: CoordinatorConfig,
    ) -> Result<(Self, CoordinatorHandle), DispatchError> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let handle = CoordinatorHandle {
            events: events_tx.clone(),
        };
        let coordinator = Self {
            session,
            wake,
            command,
            grammar: CommandGrammar::new()?,
            config,
            mode: ListeningMode::Idle,
            events_tx,
            events_rx,
            forward: None,
            timeout: None,
            timeout_generation: 0,
            via_wake: false,
        };
        Ok((coordinator, handle))
    }

    pub fn mode(&self) -> ListeningMode {
        self.mode
    }

    /// Enter wake listening and process events until shutdown. Returns the
    /// session so the caller can release it.
    pub async fn run(mut self) -> Session {
        self.start_wake();
        while let Some(event) = self.events_rx.recv().await {
            if matches!(event, CoordinatorEvent::Shutdown) {
                break;
            }
            self.handle_event(event).await;
        }
        self.stop_all();
        info!("coordinator stopped");
        self.session
    }

    async fn handle_event(&mut self, event: CoordinatorEvent) {
        match event {
            CoordinatorEvent::WakeUtterance(utterance) => {
                if self.mode != ListeningMode::WakeListening {
                    return;
                }
                let Some(text) = extract_transcript(&utterance.payload) else {
                    return;
                };
                if text.contains(self.config.wake_phrase.as_str()) {
                    info!(captured_at = ?utterance.ts, "wake phrase detected");
                    self.session.speak(ACK);
                    self.start_command(true);
                }
            }
            CoordinatorEvent::CommandUtterance(utterance) => {
                if self.mode != ListeningMode::CommandListening {
                    return;
                }
                let Some(text) = extract_transcript(&utterance.payload) else {
                    return;
                };
                if text.trim().is_empty() {
                    return;
                }
                debug!(captured_at = ?utterance.ts, "command utterance");
                let snapshot = self.session.controller.snapshot();
                let Some(command) = self.grammar.parse(&text, &snapshot) else {
                    // Silent ignore: no action, no feedback
                    debug!("unrecognized transcript: {text:?}");
                    return;
                };
                self.run_command(command).await;
                if self.via_wake {
                    tokio::time::sleep(self.config.grace_delay).await;
                    self.start_wake();
                }
            }
            CoordinatorEvent::CommandTimeout { generation } => {
                if generation != self.timeout_generation
                    || self.mode != ListeningMode::CommandListening
                {
                    return;
                }
                info!("command window elapsed, returning to wake listening");
                self.start_wake();
            }
            CoordinatorEvent::Toggle => match self.mode {
                ListeningMode::CommandListening => {
                    self.session.speak(STOPPED_LISTENING);
                    self.start_wake();
                }
                ListeningMode::WakeListening | ListeningMode::Idle => {
                    self.start_command(false);
                }
            },
            CoordinatorEvent::Shutdown => {}
        }
    }

    async fn run_command(&mut self, command: Command) {
        match dispatch(command, &mut self.session.controller) {
            DispatchOutcome::Spoken(phrase) => self.session.speak(&phrase),
            DispatchOutcome::Query(filter) => {
                // The scan runs off this loop; results come back here before
                // the queue is touched.
                let catalog = Arc::clone(&self.session.catalog);
                let result = tokio::task::spawn_blocking(move || {
                    media_library::query(catalog.as_ref(), filter.as_deref())
                })
                .await;
                match result {
                    Ok(Ok(tracks)) => {
                        let phrase = apply_query_results(&mut self.session.controller, tracks);
                        self.session.speak(&phrase);
                    }
                    Ok(Err(e)) => warn!("library query failed: {e}"),
                    Err(e) => warn!("library query task failed: {e}"),
                }
            }
        }
    }

    fn start_wake(&mut self) {
        self.stop_all();
        let (tx, rx) = mpsc::unbounded_channel();
        match self.wake.start(tx) {
            Ok(()) => {
                self.spawn_forwarder(rx, ListenerSource::Wake);
                self.mode = ListeningMode::WakeListening;
                self.via_wake = false;
                debug!("wake listening started");
            }
            Err(e) => self.fail_listener("wake", e),
        }
    }

    fn start_command(&mut self, with_timeout: bool) {
        self.stop_all();
        let (tx, rx) = mpsc::unbounded_channel();
        match self.command.start(tx) {
            Ok(()) => {
                self.spawn_forwarder(rx, ListenerSource::Command);
                self.mode = ListeningMode::CommandListening;
                self.via_wake = with_timeout;
                self.session.speak(LISTENING);
                if with_timeout {
                    self.arm_timeout();
                }
                debug!(with_timeout, "command listening started");
            }
            Err(e) => self.fail_listener("command", e),
        }
    }

    fn fail_listener(&mut self, which: &str, error: SpeechError) {
        warn!("{which} listener failed to start: {error}");
        let phrase = match error {
            SpeechError::MissingModel(_) => MODEL_MISSING,
            _ => START_FAILED,
        };
        self.session.speak(phrase);
        self.mode = ListeningMode::Idle;
    }

    fn spawn_forwarder(&mut self, mut rx: UnboundedReceiver<Utterance>, source: ListenerSource) {
        let events = self.events_tx.clone();
        self.forward = Some(tokio::spawn(async move {
            while let Some(utterance) = rx.recv().await {
                let event = match source {
                    ListenerSource::Wake => CoordinatorEvent::WakeUtterance(utterance),
                    ListenerSource::Command => CoordinatorEvent::CommandUtterance(utterance),
                };
                if events.send(event).is_err() {
                    break;
                }
            }
        }));
    }

    fn arm_timeout(&mut self) {
        let generation = self.timeout_generation;
        let events = self.events_tx.clone();
        let window = self.config.command_timeout;
        self.timeout = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let _ = events.send(CoordinatorEvent::CommandTimeout { generation });
        }));
    }

    fn cancel_timeout(&mut self) {
        // Bumping the generation disarms a timeout event that already made
        // it into the channel.
        self.timeout_generation += 1;
        if let Some(handle) = self.timeout.take() {
            handle.abort();
        }
    }

    fn stop_all(&mut self) {
        self.wake.stop();
        self.command.stop();
        if let Some(handle) = self.forward.take() {
            handle.abort();
        }
        self.cancel_timeout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use media_library::{MemoryCatalog, Track};
    use playback_control::{NullSink, PlaybackController};
    use speech_local::{MockSynthesizer, Result as SpeechResult, UtteranceSink};

    #[derive(Default)]
    struct ProbeState {
        active: AtomicBool,
        starts: AtomicUsize,
    }

    #[derive(Clone, Default)]
    struct Probe(Arc<ProbeState>);

    impl Probe {
        fn active(&self) -> bool {
            self.0.active.load(Ordering::SeqCst)
        }

        fn starts(&self) -> usize {
            self.0.starts.load(Ordering::SeqCst)
        }
    }

    /// Listener double that exposes its capture state to the test and
    /// delivers a scripted payload sequence on first start.
    struct ProbeListener {
        probe: Probe,
        script: Vec<String>,
        fail_with: Option<fn() -> SpeechError>,
    }

    impl ProbeListener {
        fn scripted(script: &[&str]) -> (Probe, Self) {
            let probe = Probe::default();
            let listener = Self {
                probe: probe.clone(),
                script: script.iter().map(|s| s.to_string()).collect(),
                fail_with: None,
            };
            (probe, listener)
        }

        fn failing(fail_with: fn() -> SpeechError) -> (Probe, Self) {
            let probe = Probe::default();
            let listener = Self {
                probe: probe.clone(),
                script: Vec::new(),
                fail_with: Some(fail_with),
            };
            (probe, listener)
        }
    }

    impl SpeechListener for ProbeListener {
        fn start(&mut self, sink: UtteranceSink) -> SpeechResult<()> {
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            self.probe.0.active.store(true, Ordering::SeqCst);
            self.probe.0.starts.fetch_add(1, Ordering::SeqCst);
            for payload in self.script.drain(..) {
                let _ = sink.send(Utterance::now(payload));
            }
            Ok(())
        }

        fn stop(&mut self) {
            self.probe.0.active.store(false, Ordering::SeqCst);
        }

        fn is_active(&self) -> bool {
            self.probe.active()
        }
    }

    fn payload(text: &str) -> String {
        format!(r#"{{"text": "{text}"}}"#)
    }

    fn track(id: u64, title: &str) -> Track {
        Track {
            id,
            title: title.to_string(),
            artist: None,
            album: None,
            uri: format!("file:///music/{id}.mp3"),
        }
    }

    fn session_with(
        synth: &MockSynthesizer,
        catalog: Vec<Track>,
        queue: Vec<Track>,
        playing: bool,
    ) -> Session {
        let mut controller = PlaybackController::new(Box::new(NullSink));
        if !queue.is_empty() {
            controller.load(queue, 0);
            if playing {
                controller.play();
            }
        }
        Session::new(
            controller,
            Arc::new(MemoryCatalog::new(catalog)),
            Box::new(synth.clone()),
        )
    }

    fn spawn_coordinator(
        session: Session,
        wake: ProbeListener,
        command: ProbeListener,
    ) -> (tokio::task::JoinHandle<Session>, CoordinatorHandle) {
        let (coordinator, handle) = Coordinator::new(
            session,
            Box::new(wake),
            Box::new(command),
            CoordinatorConfig::default(),
        )
        .expect("coordinator");
        (tokio::spawn(coordinator.run()), handle)
    }

    fn assert_exclusive(wake: &Probe, command: &Probe) {
        assert!(
            !(wake.active() && command.active()),
            "both listeners active at once"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wake_phrase_switches_to_command_listening() {
        let synth = MockSynthesizer::new();
        let (wake_probe, wake) = ProbeListener::scripted(&[&payload("hey music please")]);
        let (cmd_probe, command) = ProbeListener::scripted(&[]);
        let session = session_with(&synth, vec![], vec![], false);

        let (task, handle) = spawn_coordinator(session, wake, command);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!wake_probe.active());
        assert!(cmd_probe.active());
        assert_exclusive(&wake_probe, &cmd_probe);
        assert_eq!(synth.spoken(), vec!["Yes?", "Listening"]);

        handle.shutdown();
        task.await.expect("join");
    }

    #[tokio::test(start_paused = true)]
    async fn pause_command_round_trips_back_to_wake() {
        let synth = MockSynthesizer::new();
        let (wake_probe, wake) = ProbeListener::scripted(&[&payload("hey music")]);
        let (cmd_probe, command) = ProbeListener::scripted(&[&payload("pause")]);
        let session = session_with(&synth, vec![], vec![track(1, "one")], true);

        let (task, handle) = spawn_coordinator(session, wake, command);
        // Past the 300ms grace delay back to wake listening
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(synth.spoken(), vec!["Yes?", "Listening", "Paused"]);
        assert!(wake_probe.active());
        assert!(!cmd_probe.active());
        assert_eq!(wake_probe.starts(), 2);
        assert_exclusive(&wake_probe, &cmd_probe);

        handle.shutdown();
        let session = task.await.expect("join");
        assert!(session.controller.snapshot().paused);
    }

    #[tokio::test(start_paused = true)]
    async fn command_timeout_returns_to_wake_exactly_once() {
        let synth = MockSynthesizer::new();
        let (wake_probe, wake) = ProbeListener::scripted(&[&payload("hey music")]);
        let (cmd_probe, command) = ProbeListener::scripted(&[]);
        let session = session_with(&synth, vec![], vec![], false);

        let (task, handle) = spawn_coordinator(session, wake, command);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cmd_probe.active());

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(wake_probe.active());
        assert!(!cmd_probe.active());
        assert_eq!(wake_probe.starts(), 2);

        // No further transitions from stale timers
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(wake_probe.starts(), 2);
        assert_eq!(cmd_probe.starts(), 1);

        handle.shutdown();
        task.await.expect("join");
    }

    #[tokio::test(start_paused = true)]
    async fn unrecognized_transcript_is_silently_ignored() {
        let synth = MockSynthesizer::new();
        let (wake_probe, wake) = ProbeListener::scripted(&[&payload("hey music")]);
        let (cmd_probe, command) = ProbeListener::scripted(&[&payload("banana")]);
        let queue = vec![track(1, "one")];
        let session = session_with(&synth, vec![], queue.clone(), true);

        let (task, handle) = spawn_coordinator(session, wake, command);
        tokio::time::sleep(Duration::from_millis(500)).await;

        // No action, no feedback, still in command mode until the timeout
        assert_eq!(synth.spoken(), vec!["Yes?", "Listening"]);
        assert!(cmd_probe.active());
        assert!(!wake_probe.active());

        handle.shutdown();
        let session = task.await.expect("join");
        assert_eq!(session.controller.queue(), queue.as_slice());
        assert!(!session.controller.snapshot().paused);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_transcript_keeps_the_command_window_open() {
        let synth = MockSynthesizer::new();
        let (_wake_probe, wake) = ProbeListener::scripted(&[&payload("hey music")]);
        // A recognizer can emit an empty final result; it must neither act
        // nor end the session, so the pause behind it still dispatches.
        let (_cmd_probe, command) = ProbeListener::scripted(&[&payload(""), &payload("pause")]);
        let session = session_with(&synth, vec![], vec![track(1, "one")], true);

        let (task, handle) = spawn_coordinator(session, wake, command);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(synth.spoken(), vec!["Yes?", "Listening", "Paused"]);

        handle.shutdown();
        let session = task.await.expect("join");
        assert!(session.controller.snapshot().paused);
    }

    #[tokio::test(start_paused = true)]
    async fn play_query_without_matches_keeps_queue() {
        let synth = MockSynthesizer::new();
        let (_wake_probe, wake) = ProbeListener::scripted(&[&payload("hey music")]);
        let (_cmd_probe, command) = ProbeListener::scripted(&[&payload("play jazz")]);
        let catalog = vec![track(1, "Banana Sun")];
        let queue = vec![track(9, "keep me")];
        let session = session_with(&synth, catalog, queue.clone(), true);

        let (task, handle) = spawn_coordinator(session, wake, command);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(
            synth.spoken(),
            vec!["Yes?", "Listening", "No matches found"]
        );

        handle.shutdown();
        let session = task.await.expect("join");
        assert_eq!(session.controller.queue(), queue.as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn shuffle_on_flips_flag_without_touching_queue() {
        let synth = MockSynthesizer::new();
        let (_wake_probe, wake) = ProbeListener::scripted(&[&payload("hey music")]);
        let (_cmd_probe, command) = ProbeListener::scripted(&[&payload("shuffle on")]);
        let queue = vec![track(1, "one"), track(2, "two")];
        let session = session_with(&synth, vec![], queue.clone(), true);

        let (task, handle) = spawn_coordinator(session, wake, command);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(synth.spoken(), vec!["Yes?", "Listening", "Shuffle on"]);

        handle.shutdown();
        let session = task.await.expect("join");
        assert!(session.controller.snapshot().shuffle);
        assert_eq!(session.controller.queue(), queue.as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_toggle_bypasses_the_timeout() {
        let synth = MockSynthesizer::new();
        let (wake_probe, wake) = ProbeListener::scripted(&[]);
        let (cmd_probe, command) = ProbeListener::scripted(&[]);
        let session = session_with(&synth, vec![], vec![], false);

        let (task, handle) = spawn_coordinator(session, wake, command);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(wake_probe.active());

        handle.toggle();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cmd_probe.active());
        assert!(!wake_probe.active());

        // Manual command mode has no timeout
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(cmd_probe.active());

        handle.toggle();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(wake_probe.active());
        assert!(!cmd_probe.active());
        assert_eq!(synth.spoken(), vec!["Listening", "Stopped listening"]);

        handle.shutdown();
        task.await.expect("join");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_listener_start_leaves_idle_with_feedback() {
        let synth = MockSynthesizer::new();
        let (wake_probe, wake) =
            ProbeListener::failing(|| SpeechError::ListenerStart("no microphone".to_string()));
        let (cmd_probe, command) = ProbeListener::scripted(&[]);
        let session = session_with(&synth, vec![], vec![], false);

        let (task, handle) = spawn_coordinator(session, wake, command);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!wake_probe.active());
        assert!(!cmd_probe.active());
        assert_eq!(synth.spoken(), vec!["Failed to start listening"]);

        handle.shutdown();
        task.await.expect("join");
    }

    #[tokio::test(start_paused = true)]
    async fn missing_model_is_prompted_not_fatal() {
        let synth = MockSynthesizer::new();
        let (_wake_probe, wake) = ProbeListener::failing(|| {
            SpeechError::MissingModel(std::path::PathBuf::from("/data/model"))
        });
        let (_cmd_probe, command) = ProbeListener::scripted(&[]);
        let session = session_with(&synth, vec![], vec![], false);

        let (task, handle) = spawn_coordinator(session, wake, command);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let spoken = synth.spoken();
        assert_eq!(spoken.len(), 1);
        assert!(spoken[0].contains("Speech model not found"));

        handle.shutdown();
        task.await.expect("join");
    }
}
