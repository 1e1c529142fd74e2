//! WAV file playback as an [`AudioSource`].
//!
//! The whole file is decoded up front with `hound`, converted to 16 kHz mono
//! and handed out in buffer-sized chunks.  With `realtime` set, each chunk is
//! paced to wall-clock time so the session behaves as if someone were
//! speaking into the microphone.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use super::resample::{to_recognizer_format, TARGET_SAMPLE_RATE};
use super::source::{samples_per_buffer, AudioSource, CaptureError, SourceFactory};

/// Opens the same WAV file for every session.
#[derive(Debug, Clone)]
pub struct WavFileFactory {
    path: PathBuf,
    buffer_ms: u32,
    realtime: bool,
}

impl WavFileFactory {
    pub fn new(path: impl Into<PathBuf>, buffer_ms: u32, realtime: bool) -> Self {
        Self {
            path: path.into(),
            buffer_ms,
            realtime,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceFactory for WavFileFactory {
    fn open(&self) -> Result<Box<dyn AudioSource>, CaptureError> {
        let samples = load_wav_mono_16k(&self.path)?;
        log::info!(
            "capture: {} loaded ({:.2}s)",
            self.path.display(),
            samples.len() as f32 / TARGET_SAMPLE_RATE as f32
        );
        Ok(Box::new(WavSource::new(
            samples,
            samples_per_buffer(self.buffer_ms),
            self.realtime,
        )))
    }

    fn describe(&self) -> String {
        format!("wav file {}", self.path.display())
    }
}

/// Decode `path` into 16 kHz mono `f32`, whatever its native layout.
pub fn load_wav_mono_16k(path: &Path) -> Result<Vec<f32>, CaptureError> {
    let wav_err = |e: hound::Error| CaptureError::Wav {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut reader = hound::WavReader::open(path).map_err(wav_err)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(wav_err)?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(wav_err)?,
    };

    Ok(to_recognizer_format(
        &interleaved,
        spec.sample_rate,
        spec.channels,
    ))
}

/// In-memory samples handed out chunk by chunk.
pub struct WavSource {
    samples: Vec<f32>,
    pos: usize,
    chunk_samples: usize,
    /// Wall-clock pacing: `(start, samples already due)`.
    pacing: Option<Instant>,
}

impl WavSource {
    pub fn new(samples: Vec<f32>, chunk_samples: usize, realtime: bool) -> Self {
        Self {
            samples,
            pos: 0,
            chunk_samples: chunk_samples.max(1),
            pacing: realtime.then(Instant::now),
        }
    }
}

impl AudioSource for WavSource {
    fn read_chunk(&mut self) -> Result<Option<Vec<f32>>, CaptureError> {
        if self.pos >= self.samples.len() {
            return Ok(None);
        }

        let end = (self.pos + self.chunk_samples).min(self.samples.len());
        let chunk = self.samples[self.pos..end].to_vec();
        self.pos = end;

        if let Some(start) = self.pacing {
            let due = Duration::from_secs_f64(self.pos as f64 / f64::from(TARGET_SAMPLE_RATE));
            if let Some(wait) = due.checked_sub(start.elapsed()) {
                thread::sleep(wait);
            }
        }

        Ok(Some(chunk))
    }
}
