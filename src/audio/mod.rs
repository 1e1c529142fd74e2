//! Audio input: microphone / WAV sources → 16 kHz mono chunks.
//!
//! # Pipeline
//!
//! ```text
//! cpal callback ─┐
//!                ├─▶ to_recognizer_format ─▶ AudioSource::read_chunk ─▶ producer
//! hound reader ──┘
//! ```
//!
//! The producer thread owns the [`AudioSource`]; everything it reads is
//! already at [`TARGET_SAMPLE_RATE`] and mono.  [`RingBuffer`] and
//! [`VadDetector`] are used by the streaming recognizer to hold and segment
//! the utterance being decoded.
//!
//! ```rust,no_run
//! use voice_concierge::audio::{SourceFactory, WavFileFactory};
//!
//! let factory = WavFileFactory::new("order.wav", 100, false);
//! let mut source = factory.open().unwrap();
//! while let Some(chunk) = source.read_chunk().unwrap() {
//!     println!("{} samples", chunk.len());
//! }
//! ```

pub mod buffer;
pub mod capture;
pub mod resample;
pub mod source;
pub mod vad;
pub mod wav;

pub use buffer::RingBuffer;
pub use capture::{MicrophoneFactory, MicrophoneSource};
pub use resample::{downmix, resample, to_recognizer_format, TARGET_SAMPLE_RATE};
pub use source::{samples_per_buffer, AudioSource, CaptureError, SourceFactory};
pub use vad::{Frame, VadDetector};
pub use wav::{load_wav_mono_16k, WavFileFactory, WavSource};
