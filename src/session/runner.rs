//! Session runner: the consumer task.
//!
//! [`SessionRunner::run`] is the single consumer of the session.  It serves
//! control commands (start / stop / toggle) and producer messages from one
//! `tokio::select!` loop, so the [`SessionController`] it owns is only ever
//! touched from this task.  Everything the presentation layer needs is
//! published as [`SessionUpdate`]s.
//!
//! ```text
//! hotkey / main ──SessionCommand──▶ ┌──────────────┐ ──SessionUpdate──▶ presenter
//!                                   │ SessionRunner│
//! producer thread ─ProducerMessage─▶└──────────────┘
//! ```

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::asr::Recognizer;
use crate::audio::{CaptureError, SourceFactory};
use crate::dialogue::{ReplyEvent, Transcript};

use super::controller::{ResetHandle, SessionController};
use super::producer::{self, ProducerEvent, ProducerHandle, ProducerMessage};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SessionError {
    /// The audio source could not be opened; the session never started.
    #[error("audio source unavailable: {0}")]
    ResourceUnavailable(#[from] CaptureError),

    /// The recognizer was lost (a previous producer thread died).
    #[error("speech recognizer unavailable")]
    RecognizerUnavailable,

    #[error("failed to spawn producer thread: {0}")]
    Spawn(std::io::Error),
}

/// Control surface of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
    /// Stop when running, start otherwise.
    Toggle,
}

/// What the presentation layer is told.
#[derive(Debug)]
pub enum SessionUpdate {
    Started { session: u64 },
    /// One transcript line, in transcript order.
    Reply(ReplyEvent),
    Stopped { session: u64, transcript: Transcript },
    Error(SessionError),
}

// ---------------------------------------------------------------------------
// SessionRunner
// ---------------------------------------------------------------------------

pub struct SessionRunner {
    controller: SessionController,
    factory: Arc<dyn SourceFactory>,
    /// Parked here between sessions; owned by the producer during one.
    recognizer: Option<Box<dyn Recognizer>>,
    producer: Option<ProducerHandle>,
    producer_rx: Option<mpsc::Receiver<ProducerMessage>>,
    reset: ResetHandle,
    updates: mpsc::Sender<SessionUpdate>,
    channel_capacity: usize,
    next_session: u64,
}

enum Wake {
    Command(Option<SessionCommand>),
    Producer(Option<ProducerMessage>),
}

impl SessionRunner {
    pub fn new(
        controller: SessionController,
        factory: Arc<dyn SourceFactory>,
        recognizer: Box<dyn Recognizer>,
        updates: mpsc::Sender<SessionUpdate>,
        channel_capacity: usize,
    ) -> Self {
        Self {
            controller,
            factory,
            recognizer: Some(recognizer),
            producer: None,
            producer_rx: None,
            reset: ResetHandle::new(),
            updates,
            channel_capacity: channel_capacity.max(1),
            next_session: 0,
        }
    }

    /// Serve commands until the command channel closes, then stop any
    /// running session.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        loop {
            let wake = tokio::select! {
                biased;
                cmd = commands.recv() => Wake::Command(cmd),
                msg = next_message(&mut self.producer_rx) => Wake::Producer(msg),
            };

            match wake {
                Wake::Command(Some(cmd)) => self.handle_command(cmd).await,
                Wake::Command(None) => break,
                Wake::Producer(Some(msg)) => self.handle_producer(msg).await,
                Wake::Producer(None) => {
                    log::warn!("session: producer channel closed unexpectedly");
                    self.stop().await;
                }
            }
        }

        self.stop().await;
        log::info!("session: command channel closed, runner exiting");
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        log::debug!("session: command {cmd:?}");
        match cmd {
            SessionCommand::Start => self.start().await,
            SessionCommand::Stop => self.stop().await,
            SessionCommand::Toggle if self.controller.is_active() => self.stop().await,
            SessionCommand::Toggle => self.start().await,
        }
    }

    async fn start(&mut self) {
        if self.controller.is_active() {
            log::debug!("session: already running");
            return;
        }
        let Some(recognizer) = self.recognizer.take() else {
            self.publish(SessionUpdate::Error(SessionError::RecognizerUnavailable))
                .await;
            return;
        };

        self.next_session += 1;
        let session = self.next_session;
        let (tx, rx) = mpsc::channel(self.channel_capacity);

        match producer::spawn(
            session,
            Arc::clone(&self.factory),
            recognizer,
            self.reset.clone(),
            tx,
        )
        .await
        {
            Ok(handle) => {
                self.controller.start_session(session, self.reset.clone());
                self.producer = Some(handle);
                self.producer_rx = Some(rx);
                self.publish(SessionUpdate::Started { session }).await;
            }
            Err((error, recognizer)) => {
                self.recognizer = recognizer;
                log::error!("session: cannot start: {error}");
                self.publish(SessionUpdate::Error(error)).await;
            }
        }
    }

    async fn stop(&mut self) {
        let Some(session) = self.controller.session_id() else {
            return;
        };
        let transcript = self.controller.stop_session().unwrap_or_default();

        // Dropping the receiver unblocks a producer stuck on a full channel.
        self.producer_rx = None;
        if let Some(handle) = self.producer.take() {
            self.recognizer = handle.stop().await;
        }
        self.publish(SessionUpdate::Stopped {
            session,
            transcript,
        })
        .await;
    }

    async fn handle_producer(&mut self, msg: ProducerMessage) {
        match msg.event {
            ProducerEvent::Asr(event) => {
                let is_endpoint = event.is_endpoint;
                let added = self.controller.on_asr_event(msg.session, event);
                if is_endpoint {
                    if let Some(producer) = &self.producer {
                        producer.ack_endpoint();
                    }
                }
                for reply in added {
                    self.publish(SessionUpdate::Reply(reply)).await;
                }
            }
            ProducerEvent::Finished => {
                log::info!("session: audio source ended");
                self.stop().await;
            }
            ProducerEvent::Failed(message) => {
                log::error!("session: producer failed: {message}");
                self.stop().await;
            }
        }
    }

    async fn publish(&mut self, update: SessionUpdate) {
        if self.updates.send(update).await.is_err() {
            log::trace!("session: no presenter listening");
        }
    }
}

async fn next_message(rx: &mut Option<mpsc::Receiver<ProducerMessage>>) -> Option<ProducerMessage> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
