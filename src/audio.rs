//! Audio output backed by rodio.
//!
//! rodio's output stream is not `Send`, so the stream and its sink live on
//! a dedicated thread. The rest of the app talks to it through a command
//! channel and hears back through an event channel.

use anyhow::{anyhow, Result};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::io::Cursor;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub enum AudioCommand {
    Load {
        song_id: String,
        bytes: Vec<u8>,
        autoplay: bool,
    },
    Play,
    Pause,
    Stop,
    Shutdown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioEvent {
    Loaded { song_id: String, duration_ms: u32 },
    Finished { song_id: String },
    Failed { song_id: String, message: String },
}

pub struct AudioBackend {
    commands: mpsc::Sender<AudioCommand>,
    thread: Option<JoinHandle<()>>,
}

impl AudioBackend {
    /// Open the default output device.
    ///
    /// Blocks until the output thread reports whether the device opened, so
    /// call it off the async runtime.
    pub fn new() -> Result<(Self, UnboundedReceiver<AudioEvent>)> {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = mpsc::channel::<std::result::Result<(), String>>();

        let thread = std::thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                OutputLoop::new(handle, event_tx).run(command_rx);
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                tracing::info!("Audio output opened");
                Ok((
                    Self {
                        commands: command_tx,
                        thread: Some(thread),
                    },
                    event_rx,
                ))
            }
            Ok(Err(message)) => {
                let _ = thread.join();
                Err(anyhow!("Failed to open audio output: {}", message))
            }
            Err(_) => Err(anyhow!("Audio output thread exited during startup")),
        }
    }

    /// A backend with no output thread; commands land on the returned receiver.
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, mpsc::Receiver<AudioCommand>) {
        let (command_tx, command_rx) = mpsc::channel();
        (
            Self {
                commands: command_tx,
                thread: None,
            },
            command_rx,
        )
    }

    pub fn load(&self, song_id: String, bytes: Vec<u8>, autoplay: bool) -> Result<()> {
        tracing::debug!(song_id = %song_id, bytes = bytes.len(), autoplay, "Loading track into sink");
        self.send(AudioCommand::Load { song_id, bytes, autoplay })
    }

    pub fn play(&self) -> Result<()> {
        self.send(AudioCommand::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(AudioCommand::Pause)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(AudioCommand::Stop)
    }

    fn send(&self, command: AudioCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Audio output thread is gone"))
    }
}

impl Drop for AudioBackend {
    fn drop(&mut self) {
        let _ = self.commands.send(AudioCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// State owned by the output thread.
struct OutputLoop {
    handle: rodio::OutputStreamHandle,
    events: UnboundedSender<AudioEvent>,
    sink: Option<Sink>,
    song_id: Option<String>,
    finish_reported: bool,
}

impl OutputLoop {
    fn new(handle: rodio::OutputStreamHandle, events: UnboundedSender<AudioEvent>) -> Self {
        Self {
            handle,
            events,
            sink: None,
            song_id: None,
            finish_reported: false,
        }
    }

    fn run(mut self, commands: mpsc::Receiver<AudioCommand>) {
        loop {
            match commands.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCommand::Shutdown) => break,
                Ok(command) => self.handle_command(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.check_finished();
        }

        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        tracing::debug!("Audio output thread exiting");
    }

    fn handle_command(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Load { song_id, bytes, autoplay } => self.load(song_id, bytes, autoplay),
            AudioCommand::Play => {
                if let Some(sink) = &self.sink {
                    sink.play();
                }
            }
            AudioCommand::Pause => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
            }
            AudioCommand::Stop => {
                if let Some(sink) = self.sink.take() {
                    sink.stop();
                }
                self.song_id = None;
            }
            AudioCommand::Shutdown => {}
        }
    }

    fn load(&mut self, song_id: String, bytes: Vec<u8>, autoplay: bool) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.song_id = None;

        let source = match Decoder::new(Cursor::new(bytes)) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(song_id = %song_id, error = %e, "Could not decode track");
                let _ = self.events.send(AudioEvent::Failed {
                    song_id,
                    message: format!("Could not decode track: {e}"),
                });
                return;
            }
        };

        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::error!(song_id = %song_id, error = %e, "Could not create sink");
                let _ = self.events.send(AudioEvent::Failed {
                    song_id,
                    message: format!("Audio output unavailable: {e}"),
                });
                return;
            }
        };

        let duration_ms = source
            .total_duration()
            .map(|d| d.as_millis().min(u32::MAX as u128) as u32)
            .unwrap_or(0);

        sink.pause();
        sink.append(source);
        if autoplay {
            sink.play();
        }

        self.sink = Some(sink);
        self.song_id = Some(song_id.clone());
        self.finish_reported = false;
        let _ = self.events.send(AudioEvent::Loaded { song_id, duration_ms });
    }

    fn check_finished(&mut self) {
        if self.finish_reported {
            return;
        }
        let (Some(sink), Some(song_id)) = (&self.sink, &self.song_id) else {
            return;
        };
        if sink.empty() {
            self.finish_reported = true;
            let _ = self.events.send(AudioEvent::Finished {
                song_id: song_id.clone(),
            });
        }
    }
}
