//! Batch speech-to-text engines.
//!
//! [`SttEngine`] decodes one complete buffer of 16 kHz mono audio into text.
//! [`super::StreamingRecognizer`] calls it repeatedly on the growing utterance
//! to emulate a streaming recognizer.  [`WhisperEngine`] is the production
//! implementation; `MockSttEngine` (tests only) replays scripted answers.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::transcribe::TranscribeParams;

/// 0.5 s at 16 kHz; Whisper refuses anything shorter.
pub const MIN_AUDIO_SAMPLES: usize = 8_000;
/// 60 s at 16 kHz.
pub const MAX_AUDIO_SAMPLES: usize = 960_000;

#[derive(Debug, Clone, Error)]
pub enum SttError {
    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("whisper context initialisation failed: {0}")]
    ContextInit(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("audio too short: {0} samples (minimum {MIN_AUDIO_SAMPLES})")]
    AudioTooShort(usize),

    #[error("audio too long: {0} samples (maximum {MAX_AUDIO_SAMPLES})")]
    AudioTooLong(usize),
}

/// Whole-buffer decoder. Input is 16 kHz mono `f32`.
pub trait SttEngine: Send {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError>;
}

fn check_length(audio: &[f32]) -> Result<(), SttError> {
    match audio.len() {
        n if n < MIN_AUDIO_SAMPLES => Err(SttError::AudioTooShort(n)),
        n if n > MAX_AUDIO_SAMPLES => Err(SttError::AudioTooLong(n)),
        _ => Ok(()),
    }
}

/// Drop Whisper's non-speech annotations such as `[BLANK_AUDIO]` or `(音乐)`.
fn is_annotation(segment: &str) -> bool {
    let s = segment.trim();
    s.is_empty()
        || (s.starts_with('[') && s.ends_with(']'))
        || (s.starts_with('(') && s.ends_with(')'))
        || (s.starts_with('（') && s.ends_with('）'))
}

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

pub struct WhisperEngine {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// SAFETY: whisper-rs declares WhisperContext Send + Sync; the weights are
// read-only once loaded and every decode creates its own state.
unsafe impl Send for WhisperEngine {}

impl WhisperEngine {
    /// Load a GGML model file.
    ///
    /// # Errors
    ///
    /// [`SttError::ModelNotFound`] when the file is missing (or its path is not
    /// UTF-8), [`SttError::ContextInit`] when whisper.cpp rejects it.
    pub fn load(model_path: impl AsRef<Path>, params: TranscribeParams) -> Result<Self, SttError> {
        let path = model_path.as_ref();
        let path_str = path
            .exists()
            .then(|| path.to_str())
            .flatten()
            .ok_or_else(|| SttError::ModelNotFound(path.display().to_string()))?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        log::info!("asr: loaded whisper model {}", path.display());
        Ok(Self { ctx, params })
    }

    pub fn params(&self) -> &TranscribeParams {
        &self.params
    }

    fn full_params(&self) -> FullParams<'_, '_> {
        let mut fp = FullParams::new(SamplingStrategy::Greedy {
            best_of: self.params.best_of,
        });
        fp.set_language(self.params.language_hint());
        fp.set_n_threads(self.params.n_threads);
        if let Some(prompt) = &self.params.initial_prompt {
            fp.set_initial_prompt(prompt);
        }
        // Each decode covers the current utterance only.
        fp.set_no_context(true);
        fp.set_print_progress(false);
        fp.set_print_realtime(false);
        fp.set_print_special(false);
        fp.set_print_timestamps(false);
        fp
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        check_length(audio)?;

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;
        state
            .full(self.full_params(), audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let n = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;
            if !is_annotation(&segment) {
                text.push_str(segment.trim());
            }
        }
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------

/// Replays scripted transcripts; the last one repeats once the script runs
/// out. Enforces the same length contract as Whisper.
#[cfg(test)]
pub struct MockSttEngine {
    script: std::sync::Mutex<std::collections::VecDeque<Result<String, SttError>>>,
    last: std::sync::Mutex<Result<String, SttError>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockSttEngine {
    pub fn ok(text: impl Into<String>) -> Self {
        Self::script(vec![Ok(text.into())])
    }

    pub fn script(responses: Vec<Result<String, SttError>>) -> Self {
        Self {
            script: std::sync::Mutex::new(responses.into()),
            last: std::sync::Mutex::new(Ok(String::new())),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        check_length(audio)?;
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *last = next;
        }
        last.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_replays_then_repeats_last() {
        let engine = MockSttEngine::script(vec![Ok("我要".into()), Ok("我要咖啡".into())]);
        let audio = vec![0.0_f32; MIN_AUDIO_SAMPLES];
        assert_eq!(engine.transcribe(&audio).unwrap(), "我要");
        assert_eq!(engine.transcribe(&audio).unwrap(), "我要咖啡");
        assert_eq!(engine.transcribe(&audio).unwrap(), "我要咖啡");
        assert_eq!(engine.calls(), 3);
    }

    #[test]
    fn length_contract() {
        let engine = MockSttEngine::ok("x");
        assert!(matches!(
            engine.transcribe(&vec![0.0; MIN_AUDIO_SAMPLES - 1]),
            Err(SttError::AudioTooShort(7_999))
        ));
        assert!(matches!(
            engine.transcribe(&vec![0.0; MAX_AUDIO_SAMPLES + 1]),
            Err(SttError::AudioTooLong(_))
        ));
        assert_eq!(engine.calls(), 0);
    }

    #[test]
    fn missing_model_is_model_not_found() {
        let result = WhisperEngine::load("/nonexistent/ggml-base.bin", TranscribeParams::default());
        assert!(
            matches!(result, Err(SttError::ModelNotFound(ref p)) if p.contains("ggml-base.bin")),
            "got {result:?}"
        );
    }

    #[test]
    fn annotations_are_filtered() {
        assert!(is_annotation(" [BLANK_AUDIO]"));
        assert!(is_annotation("(音乐)"));
        assert!(is_annotation("（笑声）"));
        assert!(is_annotation("   "));
        assert!(!is_annotation("我要去三楼"));
    }

    #[test]
    fn box_dyn_engine() {
        let engine: Box<dyn SttEngine> = Box::new(MockSttEngine::ok("ok"));
        assert_eq!(engine.transcribe(&vec![0.0; MIN_AUDIO_SAMPLES]).unwrap(), "ok");
    }
}
