//! Microphone capture via `cpal`.
//!
//! [`MicrophoneFactory::open`] builds and starts an input stream whose
//! callback forwards raw interleaved buffers over a std channel.  The
//! returned [`MicrophoneSource`] regroups them into fixed-length 16 kHz mono
//! chunks.  Dropping the source drops the cpal stream, which stops capture.

use std::sync::mpsc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::resample::to_recognizer_format;
use super::source::{samples_per_buffer, AudioSource, CaptureError, SourceFactory};

/// One buffer as delivered by the cpal callback.
#[derive(Debug, Clone)]
struct RawChunk {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

// ---------------------------------------------------------------------------
// MicrophoneFactory
// ---------------------------------------------------------------------------

/// Opens the configured (or default) input device once per session.
#[derive(Debug, Clone)]
pub struct MicrophoneFactory {
    /// Device name; `None` picks the host default.
    device: Option<String>,
    buffer_ms: u32,
}

impl MicrophoneFactory {
    pub fn new(device: Option<String>, buffer_ms: u32) -> Self {
        Self { device, buffer_ms }
    }

    fn find_device(&self, host: &cpal::Host) -> Result<cpal::Device, CaptureError> {
        match &self.device {
            None => host.default_input_device().ok_or(CaptureError::NoDevice),
            Some(wanted) => host
                .input_devices()?
                .find(|d| d.name().map(|n| &n == wanted).unwrap_or(false))
                .ok_or_else(|| CaptureError::DeviceNotFound(wanted.clone())),
        }
    }
}

impl SourceFactory for MicrophoneFactory {
    fn open(&self) -> Result<Box<dyn AudioSource>, CaptureError> {
        let host = cpal::default_host();
        let device = self.find_device(&host)?;

        let supported = device.default_input_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();
        let config: cpal::StreamConfig = supported.into();

        let (tx, rx) = mpsc::channel::<RawChunk>();
        let stream = device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Receiver gone means the session is shutting down.
                let _ = tx.send(RawChunk {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                });
            },
            |err: cpal::StreamError| {
                log::error!("capture: cpal stream error: {err}");
            },
            None,
        )?;
        stream.play()?;

        log::info!(
            "capture: microphone open ({} Hz, {} ch)",
            sample_rate,
            channels
        );

        Ok(Box::new(MicrophoneSource {
            _stream: stream,
            rx,
            pending: Vec::new(),
            chunk_samples: samples_per_buffer(self.buffer_ms),
            timeout: Duration::from_millis(u64::from(self.buffer_ms.max(10)) * 2),
        }))
    }

    fn describe(&self) -> String {
        match &self.device {
            Some(name) => format!("microphone {name:?}"),
            None => "default microphone".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// MicrophoneSource
// ---------------------------------------------------------------------------

/// Live microphone stream regrouped into recognizer-sized chunks.
pub struct MicrophoneSource {
    _stream: cpal::Stream,
    rx: mpsc::Receiver<RawChunk>,
    pending: Vec<f32>,
    chunk_samples: usize,
    /// Upper bound on one read so a stalled device cannot block cancellation.
    timeout: Duration,
}

impl AudioSource for MicrophoneSource {
    fn read_chunk(&mut self) -> Result<Option<Vec<f32>>, CaptureError> {
        while self.pending.len() < self.chunk_samples {
            match self.rx.recv_timeout(self.timeout) {
                Ok(raw) => self.pending.extend(to_recognizer_format(
                    &raw.samples,
                    raw.sample_rate,
                    raw.channels,
                )),
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    return Ok(Some(std::mem::take(&mut self.pending)));
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(CaptureError::Disconnected);
                }
            }
        }

        let rest = self.pending.split_off(self.chunk_samples);
        Ok(Some(std::mem::replace(&mut self.pending, rest)))
    }
}
