//! Audio producer thread: source → recognizer → hand-off channel.
//!
//! One dedicated OS thread per session.  It opens the audio source itself
//! (cpal streams must stay on the thread that built them), reports whether
//! that worked, then loops:
//!
//! ```text
//! read_chunk ──▶ apply pending reset ──▶ accept_waveform ──▶ blocking_send(AsrEvent)
//! ```
//!
//! After every endpoint event the loop waits for the consumer to acknowledge
//! the turn ([`ProducerHandle::ack_endpoint`]).  By then any reset the turn
//! asked for is already requested, so the next buffer goes into a clean
//! recognizer even when the source delivers audio faster than real time.
//!
//! The loop checks the `running` flag once per buffer, so a stop is observed
//! within one read interval.  Dropping the receiving end also ends the loop
//! at the next send, and dropping the handle releases a pending ack wait.  The recognizer is handed back through the join handle
//! so the next session can reuse the loaded model.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};

use crate::asr::Recognizer;
use crate::audio::{AudioSource, CaptureError, SourceFactory};

use super::controller::{AsrEvent, ResetHandle};
use super::runner::SessionError;

/// What the producer reports for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerEvent {
    Asr(AsrEvent),
    /// The source ran out; a final endpoint event has already been sent.
    Finished,
    /// Reading audio failed mid-session.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerMessage {
    pub session: u64,
    pub event: ProducerEvent,
}

type OpenAck = Result<(), (CaptureError, Box<dyn Recognizer>)>;

/// Live producer thread of one session.
pub struct ProducerHandle {
    session: u64,
    running: Arc<AtomicBool>,
    turn_ack: std_mpsc::Sender<()>,
    /// Hands the recognizer back when the loop exits.
    join: JoinHandle<Option<Box<dyn Recognizer>>>,
}

impl std::fmt::Debug for ProducerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProducerHandle")
            .field("session", &self.session)
            .field("running", &self.running.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Start the producer for `session` and wait until its source is open.
///
/// On failure the recognizer is returned with the error (when it could be
/// recovered) and no producer loop ever runs.
pub async fn spawn(
    session: u64,
    factory: Arc<dyn SourceFactory>,
    recognizer: Box<dyn Recognizer>,
    reset: ResetHandle,
    tx: mpsc::Sender<ProducerMessage>,
) -> Result<ProducerHandle, (SessionError, Option<Box<dyn Recognizer>>)> {
    let running = Arc::new(AtomicBool::new(true));
    let (ack_tx, ack_rx) = oneshot::channel::<OpenAck>();
    let (turn_ack, turn_rx) = std_mpsc::channel::<()>();

    let flag = Arc::clone(&running);
    let join = thread::Builder::new()
        .name("asr-producer".into())
        .spawn(move || {
            let source = match factory.open() {
                Ok(source) => source,
                Err(e) => {
                    // Ack failure: the recognizer goes back with the error.
                    let _ = ack_tx.send(Err((e, recognizer)));
                    return None;
                }
            };
            log::info!("producer: session {session} reading from {}", factory.describe());
            let _ = ack_tx.send(Ok(()));
            Some(run(session, source, recognizer, reset, flag, tx, turn_rx))
        })
        .map_err(|e| (SessionError::Spawn(e), None))?;

    match ack_rx.await {
        Ok(Ok(())) => Ok(ProducerHandle {
            session,
            running,
            turn_ack,
            join,
        }),
        Ok(Err((e, recognizer))) => {
            log::error!("producer: cannot open audio source: {e}");
            Err((SessionError::ResourceUnavailable(e), Some(recognizer)))
        }
        Err(_) => Err((SessionError::RecognizerUnavailable, None)),
    }
}

impl ProducerHandle {
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Ask the loop to exit after its current read.  Idempotent.
    pub fn signal_stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Release the producer waiting on the endpoint event just consumed.
    ///
    /// Call after the event went through the controller, so a reset it
    /// requested is visible to the producer before its next buffer.
    pub fn ack_endpoint(&self) {
        let _ = self.turn_ack.send(());
    }

    /// Stop and wait for the thread, recovering the recognizer.
    pub async fn stop(self) -> Option<Box<dyn Recognizer>> {
        self.signal_stop();
        drop(self.turn_ack);
        let join = self.join;
        match tokio::task::spawn_blocking(move || join.join()).await {
            Ok(Ok(recognizer)) => recognizer,
            Ok(Err(_)) | Err(_) => {
                log::error!("producer: thread panicked");
                None
            }
        }
    }
}

fn run(
    session: u64,
    mut source: Box<dyn AudioSource>,
    mut recognizer: Box<dyn Recognizer>,
    reset: ResetHandle,
    running: Arc<AtomicBool>,
    tx: mpsc::Sender<ProducerMessage>,
    turn_ack: std_mpsc::Receiver<()>,
) -> Box<dyn Recognizer> {
    let send = |event: ProducerEvent| tx.blocking_send(ProducerMessage { session, event }).is_ok();

    recognizer.reset();
    let mut applied = reset.current();

    while running.load(Ordering::Acquire) {
        let chunk = match source.read_chunk() {
            Ok(Some(chunk)) => chunk,
            Ok(None) => {
                if running.load(Ordering::Acquire) {
                    finish(&mut *recognizer, &reset, &mut applied, &send);
                }
                break;
            }
            Err(e) => {
                log::error!("producer: audio read failed: {e}");
                send(ProducerEvent::Failed(e.to_string()));
                break;
            }
        };

        apply_reset(&mut *recognizer, &reset, &mut applied);
        if chunk.is_empty() {
            continue;
        }

        if let Err(e) = recognizer.accept_waveform(&chunk) {
            log::warn!("producer: recognizer rejected buffer: {e}");
            continue;
        }

        let is_endpoint = recognizer.is_endpoint();
        let event = AsrEvent {
            text: recognizer.text().to_string(),
            is_endpoint,
            epoch: applied,
        };
        if !send(ProducerEvent::Asr(event)) {
            log::debug!("producer: consumer gone, exiting");
            break;
        }
        if is_endpoint && turn_ack.recv().is_err() {
            log::debug!("producer: session closed while awaiting turn ack");
            break;
        }
    }

    log::info!("producer: session {session} finished");
    recognizer
}

fn apply_reset(recognizer: &mut dyn Recognizer, reset: &ResetHandle, applied: &mut u64) {
    let wanted = reset.current();
    if wanted != *applied {
        recognizer.reset();
        *applied = wanted;
    }
}

fn finish(
    recognizer: &mut dyn Recognizer,
    reset: &ResetHandle,
    applied: &mut u64,
    send: &impl Fn(ProducerEvent) -> bool,
) {
    apply_reset(recognizer, reset, applied);
    if let Err(e) = recognizer.input_finished() {
        log::warn!("producer: final decode failed: {e}");
    }
    let last = AsrEvent {
        text: recognizer.text().to_string(),
        is_endpoint: true,
        epoch: *applied,
    };
    if send(ProducerEvent::Asr(last)) {
        send(ProducerEvent::Finished);
    }
}
