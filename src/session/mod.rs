//! Recording sessions: producer thread, consumer task and their hand-off.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────── asr-producer thread ──────────────┐
//! │ AudioSource ─▶ Recognizer ─▶ AsrEvent{epoch}     │
//! └──────────────────────┬──────────────────────────┘
//!                        │ mpsc (bounded, per session)
//!                        ▼
//! ┌──────────────── SessionRunner task ─────────────┐
//! │ SessionController                               │
//! │   UtteranceAssembler ─▶ DialogueMachine         │
//! │          ▲                    │                 │
//! │          └── reset ◀──────────┤ reset_asr       │
//! │                               ▼                 │
//! │                          Transcript ─▶ SessionUpdate
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Only the runner task touches dialogue state and the transcript; the
//! producer only posts events and observes the [`ResetHandle`] epoch.

pub mod assembler;
pub mod controller;
pub mod producer;
pub mod runner;

pub use assembler::{FinalizedUtterance, UtteranceAssembler};
pub use controller::{AsrEvent, ResetHandle, SessionController};
pub use producer::{ProducerEvent, ProducerHandle, ProducerMessage};
pub use runner::{SessionCommand, SessionError, SessionRunner, SessionUpdate};
