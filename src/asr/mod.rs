//! Speech recognition collaborator.
//!
//! ```text
//! producer ──accept_waveform──▶ Recognizer ──text / is_endpoint──▶ producer
//!                                   │
//!                      StreamingRecognizer<E: SttEngine>
//!                        ├─ RingBuffer (current utterance)
//!                        ├─ EndpointDetector (energy VAD, rules 1-3)
//!                        └─ E::transcribe  (WhisperEngine in production)
//! ```
//!
//! ```rust,no_run
//! use voice_concierge::asr::{
//!     Recognizer, StreamingConfig, StreamingRecognizer, TranscribeParams, WhisperEngine,
//! };
//!
//! let engine = WhisperEngine::load("models/ggml-base.bin", TranscribeParams::default()).unwrap();
//! let mut rec = StreamingRecognizer::new(engine, StreamingConfig::default());
//! rec.accept_waveform(&vec![0.0; 1_600]).unwrap();
//! println!("{} (endpoint: {})", rec.text(), rec.is_endpoint());
//! ```

pub mod endpoint;
pub mod engine;
pub mod recognizer;
pub mod transcribe;

pub use endpoint::{EndpointDetector, EndpointRules};
pub use engine::{SttEngine, SttError, WhisperEngine, MAX_AUDIO_SAMPLES, MIN_AUDIO_SAMPLES};
pub use recognizer::{Recognizer, StreamingConfig, StreamingRecognizer};
pub use transcribe::{optimal_threads, TranscribeParams};

#[cfg(test)]
pub use engine::MockSttEngine;
