//! Audio source abstraction used by the producer thread.
//!
//! A [`SourceFactory`] is handed to the session producer; the producer calls
//! [`SourceFactory::open`] **on its own thread** (cpal streams are not `Send`
//! on every platform) and then pulls ~100 ms chunks with
//! [`AudioSource::read_chunk`] until the session stops or the source ends.

use thiserror::Error;

/// Failures opening or reading an audio source.
///
/// Any of these during `open` means the session cannot start.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("input device {0:?} not found")]
    DeviceNotFound(String),

    #[error("failed to query input devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("audio stream disconnected")]
    Disconnected,

    #[error("cannot read WAV file {path}: {message}")]
    Wav { path: String, message: String },
}

/// A blocking stream of 16 kHz mono chunks.
pub trait AudioSource {
    /// Block until roughly one buffer interval of audio is available.
    ///
    /// * `Ok(Some(chunk))` — the next samples; may be empty when the device
    ///   produced nothing within the read timeout.
    /// * `Ok(None)` — the source is exhausted.
    fn read_chunk(&mut self) -> Result<Option<Vec<f32>>, CaptureError>;
}

/// Opens a fresh [`AudioSource`] for each session.
pub trait SourceFactory: Send + Sync {
    fn open(&self) -> Result<Box<dyn AudioSource>, CaptureError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Number of 16 kHz samples in `buffer_ms` milliseconds (at least one).
pub fn samples_per_buffer(buffer_ms: u32) -> usize {
    (crate::audio::TARGET_SAMPLE_RATE as usize * buffer_ms as usize / 1000).max(1)
}
