//! Reply events and the append-only session transcript.

use serde::{Deserialize, Serialize};

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The finalized utterance of the person speaking.
    User,
    /// A reply generated by the dialogue state machine.
    System,
}

/// One transcript line.  Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyEvent {
    pub speaker: Speaker,
    pub text: String,
}

impl ReplyEvent {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            text: text.into(),
        }
    }
}

/// Ordered transcript of one session.
///
/// Only appending is exposed; a session discards the whole transcript by
/// replacing it with a fresh one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    events: Vec<ReplyEvent>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `events` in order and return the newly appended slice.
    pub fn append(&mut self, events: impl IntoIterator<Item = ReplyEvent>) -> &[ReplyEvent] {
        let start = self.events.len();
        self.events.extend(events);
        &self.events[start..]
    }

    pub fn events(&self) -> &[ReplyEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_returns_only_new_events() {
        let mut t = Transcript::new();
        t.append([ReplyEvent::user("a")]);
        let added = t.append([ReplyEvent::user("b"), ReplyEvent::system("c")]).to_vec();

        assert_eq!(added, vec![ReplyEvent::user("b"), ReplyEvent::system("c")]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.events()[0], ReplyEvent::user("a"));
    }

    #[test]
    fn serialises_speaker_in_lower_case() {
        let json = serde_json::to_string(&ReplyEvent::system("ok")).unwrap();
        assert_eq!(json, r#"{"speaker":"system","text":"ok"}"#);
    }
}
