use std::sync::{Arc, Mutex};

use crate::{Result, SpeechListener, SpeechSynthesizer, Utterance, UtteranceSink};

/// A scripted in-process listener. Delivers each payload once, in order,
/// when started; a second start delivers nothing further.
pub struct MockListener {
    script: Vec<String>,
    active: bool,
}

impl MockListener {
    /// A listener that never produces utterances.
    pub fn silent() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn scripted(script: Vec<String>) -> Self {
        Self {
            script,
            active: false,
        }
    }
}

impl SpeechListener for MockListener {
    fn start(&mut self, sink: UtteranceSink) -> Result<()> {
        self.active = true;
        for payload in self.script.drain(..) {
            let _ = sink.send(Utterance::now(payload));
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[derive(Default)]
struct SpeakLog {
    spoken: Vec<String>,
    pending: Option<String>,
}

/// A synthesizer that records what it was asked to speak. Clones share the
/// same log, so a test can keep one clone while the assistant owns another.
#[derive(Clone, Default)]
pub struct MockSynthesizer {
    log: Arc<Mutex<SpeakLog>>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything ever requested, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.log.lock().map(|l| l.spoken.clone()).unwrap_or_default()
    }

    /// The utterance that would currently be audible, if any.
    pub fn pending(&self) -> Option<String> {
        self.log.lock().ok().and_then(|l| l.pending.clone())
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn speak(&mut self, text: &str) {
        if let Ok(mut log) = self.log.lock() {
            // flush-replace: a new utterance supersedes any pending one
            log.pending = Some(text.to_string());
            log.spoken.push(text.to_string());
        }
    }
}
