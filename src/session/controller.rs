//! Per-session orchestration of assembler, dialogue and transcript.
//!
//! [`SessionController`] is the consumer side of the session: it lives on a
//! single task, receives [`AsrEvent`]s in arrival order and is the only code
//! that touches the dialogue state and the transcript.
//!
//! ASR resets cross a thread boundary.  The controller bumps the shared
//! [`ResetHandle`] epoch; the producer resets its recognizer before feeding
//! the next buffer and stamps every event with the epoch it decoded under.
//! Events stamped with an older epoch still describe the utterance that was
//! just consumed, so they are dropped here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::dialogue::{DialogueMachine, DialogueState, EntityExtractor, ReplyEvent, Transcript};

use super::assembler::{FinalizedUtterance, UtteranceAssembler};

// ---------------------------------------------------------------------------
// ResetHandle / AsrEvent
// ---------------------------------------------------------------------------

/// Reset requests shared between consumer and producer.
#[derive(Debug, Clone, Default)]
pub struct ResetHandle {
    epoch: Arc<AtomicU64>,
}

impl ResetHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the producer to reset its recognizer; returns the new epoch.
    pub fn request(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn current(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }
}

/// One recognizer observation, produced once per audio buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsrEvent {
    pub text: String,
    pub is_endpoint: bool,
    /// Reset epoch the recognizer had applied when this was produced.
    pub epoch: u64,
}

// ---------------------------------------------------------------------------
// SessionController
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ActiveSession {
    id: u64,
    reset: ResetHandle,
    /// Events older than this epoch are stale.
    min_epoch: u64,
}

#[derive(Debug)]
pub struct SessionController {
    assembler: UtteranceAssembler,
    dialogue: DialogueMachine,
    transcript: Transcript,
    active: Option<ActiveSession>,
}

impl SessionController {
    pub fn new(extractor: EntityExtractor) -> Self {
        Self {
            assembler: UtteranceAssembler::new(),
            dialogue: DialogueMachine::new(extractor),
            transcript: Transcript::new(),
            active: None,
        }
    }

    /// Begin session `id` from a clean slate.
    pub fn start_session(&mut self, id: u64, reset: ResetHandle) {
        self.clear();
        let min_epoch = reset.current();
        self.active = Some(ActiveSession {
            id,
            reset,
            min_epoch,
        });
        log::info!("session: {id} started");
    }

    /// End the active session and hand back its transcript.
    ///
    /// Returns `None` when no session is active, so repeated stops are no-ops.
    pub fn stop_session(&mut self) -> Option<Transcript> {
        let session = self.active.take()?;
        let transcript = std::mem::take(&mut self.transcript);
        self.clear();
        log::info!(
            "session: {} stopped ({} transcript lines)",
            session.id,
            transcript.len()
        );
        Some(transcript)
    }

    /// Feed one recognizer observation; returns the transcript lines it added.
    pub fn on_asr_event(&mut self, session: u64, event: AsrEvent) -> Vec<ReplyEvent> {
        let Some(active) = &self.active else {
            return Vec::new();
        };
        if active.id != session || event.epoch < active.min_epoch {
            log::trace!("session: dropped stale event {:?}", event.text);
            return Vec::new();
        }

        match self.assembler.on_asr_event(&event.text, event.is_endpoint) {
            Some(utterance) => self.on_finalized_utterance(utterance),
            None => Vec::new(),
        }
    }

    /// Route a completed turn through the dialogue; returns the lines added.
    pub fn on_finalized_utterance(&mut self, utterance: FinalizedUtterance) -> Vec<ReplyEvent> {
        if self.active.is_none() {
            return Vec::new();
        }
        log::debug!("session: finalized {:?}", utterance.text);

        let outcome = self.dialogue.on_utterance(&utterance.text);
        let added = self.transcript.append(outcome.events).to_vec();

        if outcome.reset_asr {
            if let Some(active) = &mut self.active {
                active.min_epoch = active.reset.request();
            }
            self.assembler.reset();
        }
        added
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn session_id(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn dialogue_state(&self) -> DialogueState {
        self.dialogue.state()
    }

    pub fn dialogue(&self) -> &DialogueMachine {
        &self.dialogue
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    fn clear(&mut self) {
        self.assembler.reset();
        self.dialogue.reset();
        self.transcript = Transcript::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::Speaker;
    use crate::lexicon::Lexicon;

    fn controller() -> SessionController {
        SessionController::new(EntityExtractor::new(Arc::new(Lexicon::builtin())))
    }

    fn event(text: &str, is_endpoint: bool, epoch: u64) -> AsrEvent {
        AsrEvent {
            text: text.into(),
            is_endpoint,
            epoch,
        }
    }

    /// Speak `text` as a start marker followed by an endpoint.
    fn say(c: &mut SessionController, session: u64, text: &str, epoch: u64) -> Vec<ReplyEvent> {
        c.on_asr_event(session, event(text, false, epoch));
        c.on_asr_event(session, event(text, true, epoch))
    }

    #[test]
    fn reset_handle_epochs_increase() {
        let h = ResetHandle::new();
        assert_eq!(h.current(), 0);
        assert_eq!(h.request(), 1);
        assert_eq!(h.clone().request(), 2);
        assert_eq!(h.current(), 2);
    }

    #[test]
    fn inactive_controller_ignores_events() {
        let mut c = controller();
        assert!(say(&mut c, 1, "三楼", 0).is_empty());
        assert!(c.transcript().is_empty());
        assert!(c.stop_session().is_none());
    }

    #[test]
    fn turn_requests_asr_reset_and_drops_stale_events() {
        let mut c = controller();
        let reset = ResetHandle::new();
        c.start_session(1, reset.clone());

        let added = say(&mut c, 1, "我要咖啡", 0);
        assert_eq!(added.len(), 2);
        assert_eq!(reset.current(), 1);

        // Still epoch 0: the recognizer has not applied the reset yet.
        assert!(say(&mut c, 1, "我要咖啡拿铁", 0).is_empty());
        assert_eq!(c.dialogue_state(), DialogueState::AwaitingCoffeeType);

        let added = say(&mut c, 1, "拿铁", 1);
        assert_eq!(added[1].text, "您需要冰咖啡还是热咖啡？");
        assert_eq!(reset.current(), 2);
    }

    #[test]
    fn silent_turn_keeps_asr_running() {
        let mut c = controller();
        let reset = ResetHandle::new();
        c.start_session(1, reset.clone());
        say(&mut c, 1, "我要咖啡", 0);

        assert!(say(&mut c, 1, "嗯", 1).is_empty());
        assert_eq!(reset.current(), 1);
        // Recognizer text keeps growing without a reset.
        let added = c.on_asr_event(1, event("嗯美式", true, 1));
        assert_eq!(added.len(), 2);
        assert_eq!(reset.current(), 2);
    }

    #[test]
    fn events_from_other_sessions_are_dropped() {
        let mut c = controller();
        c.start_session(2, ResetHandle::new());
        assert!(say(&mut c, 1, "三楼", 0).is_empty());
        assert_eq!(say(&mut c, 2, "三楼", 0).len(), 2);
    }

    #[test]
    fn transcript_is_appended_in_order() {
        let mut c = controller();
        c.start_session(1, ResetHandle::new());
        say(&mut c, 1, "我要咖啡", 0);
        say(&mut c, 1, "美式", 1);
        say(&mut c, 1, "热的", 2);

        let lines: Vec<(Speaker, &str)> = c
            .transcript()
            .events()
            .iter()
            .map(|e| (e.speaker, e.text.as_str()))
            .collect();
        assert_eq!(
            lines,
            vec![
                (Speaker::User, "我要咖啡"),
                (Speaker::System, "好的，您是需要拿铁还是美式？"),
                (Speaker::User, "美式"),
                (Speaker::System, "您需要冰咖啡还是热咖啡？"),
                (Speaker::User, "热的"),
                (Speaker::System, "您想要的是一份热美式"),
            ]
        );
    }

    #[test]
    fn restart_clears_all_session_state() {
        let mut c = controller();
        let reset = ResetHandle::new();
        c.start_session(1, reset.clone());
        say(&mut c, 1, "我要咖啡", 0);
        say(&mut c, 1, "拿铁", 1);
        assert_eq!(c.dialogue_state(), DialogueState::AwaitingCoffeeTemperature);

        let transcript = c.stop_session().unwrap();
        assert_eq!(transcript.len(), 4);
        assert!(c.stop_session().is_none(), "second stop is a no-op");

        c.start_session(2, reset.clone());
        assert_eq!(c.dialogue_state(), DialogueState::Idle);
        assert!(c.dialogue().order().is_empty());
        assert!(c.transcript().is_empty());
        assert_eq!(c.session_id(), Some(2));
    }

    #[test]
    fn finalized_utterance_outside_session_is_ignored() {
        let mut c = controller();
        let added = c.on_finalized_utterance(FinalizedUtterance {
            text: "三楼".into(),
        });
        assert!(added.is_empty());
    }
}
