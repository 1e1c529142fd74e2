//! Decoder parameters for one Whisper pass.

use crate::config::SttConfig;

/// Default prompt nudging Whisper towards simplified-Chinese output.
pub const MANDARIN_PROMPT: &str = "以下是普通话的句子。";

/// Settings handed to every [`super::WhisperEngine`] decode.
///
/// ```
/// use voice_concierge::asr::TranscribeParams;
///
/// let params = TranscribeParams {
///     language: "en".into(),
///     initial_prompt: None,
///     ..TranscribeParams::default()
/// };
/// assert_eq!(params.best_of, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TranscribeParams {
    /// ISO-639-1 code, or `"auto"` for detection.
    pub language: String,
    pub n_threads: i32,
    /// Greedy candidates per step; 1 is the fastest.
    pub best_of: i32,
    pub initial_prompt: Option<String>,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "zh".into(),
            n_threads: optimal_threads(),
            best_of: 1,
            initial_prompt: Some(MANDARIN_PROMPT.into()),
        }
    }
}

impl TranscribeParams {
    pub fn from_config(stt: &SttConfig) -> Self {
        let n_threads = if stt.threads == 0 {
            optimal_threads()
        } else {
            stt.threads as i32
        };
        let initial_prompt = (stt.language == "zh").then(|| MANDARIN_PROMPT.to_string());
        Self {
            language: stt.language.clone(),
            n_threads,
            initial_prompt,
            ..Self::default()
        }
    }

    /// `None` when the language should be auto-detected.
    pub fn language_hint(&self) -> Option<&str> {
        (self.language != "auto").then_some(self.language.as_str())
    }
}

/// Available CPU parallelism, capped at 8 where Whisper stops scaling.
pub fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}
