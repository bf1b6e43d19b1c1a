use std::fs::File;
use std::io::BufReader;
use std::sync::mpsc::{self, Sender};
use std::thread;

use tracing::warn;

use crate::{AudioSink, PlaybackError, Result};

enum SinkCommand {
    Load(String),
    Play,
    Pause,
    Stop,
}

/// Audio output backed by rodio.
///
/// The output stream is not `Send`, so a dedicated thread owns it and the
/// controller talks to it over a channel. Decode failures are logged on
/// that thread; the controller keeps going.
pub struct RodioSink {
    tx: Sender<SinkCommand>,
}

impl RodioSink {
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel::<SinkCommand>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        thread::spawn(move || {
            let (stream, handle) = match rodio::OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = ready_tx.send(Err(PlaybackError::Device(e.to_string())));
                    return;
                }
            };
            let _stream = stream;
            let _ = ready_tx.send(Ok(()));

            let mut sink: Option<rodio::Sink> = None;
            while let Ok(command) = rx.recv() {
                match command {
                    SinkCommand::Load(uri) => {
                        if let Some(old) = sink.take() {
                            old.stop();
                        }
                        match build_sink(&handle, &uri) {
                            Ok(new_sink) => sink = Some(new_sink),
                            Err(e) => warn!("failed to load {uri}: {e}"),
                        }
                    }
                    SinkCommand::Play => {
                        if let Some(s) = &sink {
                            s.play();
                        }
                    }
                    SinkCommand::Pause => {
                        if let Some(s) = &sink {
                            s.pause();
                        }
                    }
                    SinkCommand::Stop => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                    }
                }
            }
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { tx }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(PlaybackError::Device("audio thread exited".to_string())),
        }
    }
}

fn build_sink(handle: &rodio::OutputStreamHandle, uri: &str) -> Result<rodio::Sink> {
    let file = File::open(uri).map_err(|e| PlaybackError::Source(e.to_string()))?;
    let source =
        rodio::Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Source(e.to_string()))?;
    let sink = rodio::Sink::try_new(handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
    sink.append(source);
    sink.pause();
    Ok(sink)
}

impl AudioSink for RodioSink {
    fn load(&mut self, uri: &str) -> Result<()> {
        self.tx
            .send(SinkCommand::Load(uri.to_string()))
            .map_err(|_| PlaybackError::Device("audio thread exited".to_string()))
    }

    fn play(&mut self) {
        let _ = self.tx.send(SinkCommand::Play);
    }

    fn pause(&mut self) {
        let _ = self.tx.send(SinkCommand::Pause);
    }

    fn stop(&mut self) {
        let _ = self.tx.send(SinkCommand::Stop);
    }
}
