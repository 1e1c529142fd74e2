//! Dialogue core — entity extraction, slot filling and the transcript.
//!
//! * [`EntityExtractor`] — floor lookup plus coffee keyword sets.
//! * [`DialogueMachine`] / [`transition`] — the Idle / AwaitingCoffeeType /
//!   AwaitingCoffeeTemperature state machine.
//! * [`ReplyEvent`] / [`Transcript`] — append-only session transcript.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use voice_concierge::dialogue::{DialogueMachine, DialogueState, EntityExtractor};
//! use voice_concierge::lexicon::Lexicon;
//!
//! let mut machine = DialogueMachine::new(EntityExtractor::new(Arc::new(Lexicon::builtin())));
//!
//! for text in ["我要咖啡", "拿铁", "冰的"] {
//!     let outcome = machine.on_utterance(text);
//!     assert!(outcome.reset_asr);
//! }
//! assert_eq!(machine.state(), DialogueState::Idle);
//! ```

pub mod extract;
pub mod machine;
pub mod reply;

pub use extract::{CoffeeKind, EntityExtractor, Temperature};
pub use machine::{
    transition, CoffeeOrder, DialogueContext, DialogueMachine, DialogueState, FloorRequest,
    Transition, TurnOutcome,
};
pub use reply::{ReplyEvent, Speaker, Transcript};
