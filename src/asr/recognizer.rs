//! Streaming recognizer interface and a Whisper-backed implementation.
//!
//! The session producer only ever talks to [`Recognizer`]: push ~100 ms of
//! audio, read the current text and endpoint flag, reset between turns.
//! [`StreamingRecognizer`] provides those semantics on top of any batch
//! [`SttEngine`] by re-decoding the (bounded) current utterance whenever
//! enough new voiced audio has arrived, and by deriving the endpoint flag
//! from [`EndpointDetector`].

use crate::audio::{RingBuffer, VadDetector, TARGET_SAMPLE_RATE};
use crate::config::AppConfig;

use super::endpoint::{EndpointDetector, EndpointRules};
use super::engine::{SttEngine, SttError, MAX_AUDIO_SAMPLES, MIN_AUDIO_SAMPLES};

/// Incremental speech recognizer fed from the producer thread.
pub trait Recognizer: Send {
    /// Append 16 kHz mono samples and update [`text`](Self::text) /
    /// [`is_endpoint`](Self::is_endpoint).
    fn accept_waveform(&mut self, samples: &[f32]) -> Result<(), SttError>;

    /// No more audio will come; flush and force an endpoint.
    fn input_finished(&mut self) -> Result<(), SttError>;

    /// Transcript of the current utterance so far.
    fn text(&self) -> &str;

    fn is_endpoint(&self) -> bool;

    /// Forget the current utterance: audio, text and endpoint state.
    fn reset(&mut self);
}

/// Tuning for [`StreamingRecognizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingConfig {
    pub decode_interval_ms: u32,
    pub max_utterance_secs: u32,
    pub vad_threshold: f32,
    pub rules: EndpointRules,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            decode_interval_ms: 1_000,
            max_utterance_secs: 30,
            vad_threshold: 0.01,
            rules: EndpointRules::default(),
        }
    }
}

impl StreamingConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            decode_interval_ms: config.stt.decode_interval_ms,
            max_utterance_secs: config.audio.max_utterance_secs,
            vad_threshold: config.audio.vad_threshold,
            rules: config.endpoint,
        }
    }
}

/// Turns a batch engine into a [`Recognizer`].
pub struct StreamingRecognizer<E> {
    engine: E,
    vad: VadDetector,
    audio: RingBuffer<f32>,
    endpoint: EndpointDetector,
    decode_interval: usize,
    since_decode: usize,
    /// Voiced audio arrived since the last decode.
    dirty: bool,
    text: String,
    at_endpoint: bool,
}

impl<E: SttEngine> StreamingRecognizer<E> {
    pub fn new(engine: E, config: StreamingConfig) -> Self {
        let sr = TARGET_SAMPLE_RATE as usize;
        let capacity = (config.max_utterance_secs.max(1) as usize * sr).min(MAX_AUDIO_SAMPLES);
        let vad = VadDetector::new(config.vad_threshold);

        Self {
            engine,
            audio: RingBuffer::new(capacity),
            endpoint: EndpointDetector::new(vad.clone(), config.rules, TARGET_SAMPLE_RATE),
            vad,
            decode_interval: (config.decode_interval_ms as usize * sr / 1000).max(1),
            since_decode: 0,
            dirty: false,
            text: String::new(),
            at_endpoint: false,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn decode(&mut self) -> Result<(), SttError> {
        self.since_decode = 0;
        self.dirty = false;

        let snapshot = self.audio.snapshot();
        let speech = self.vad.trim_silence(&snapshot);
        if speech.is_empty() {
            return Ok(());
        }

        let mut input = speech.to_vec();
        if input.len() < MIN_AUDIO_SAMPLES {
            input.resize(MIN_AUDIO_SAMPLES, 0.0);
        }

        let text = self.engine.transcribe(&input)?;
        if text != self.text {
            log::debug!("asr: partial {text:?}");
            self.text = text;
        }
        Ok(())
    }
}

impl<E: SttEngine> Recognizer for StreamingRecognizer<E> {
    fn accept_waveform(&mut self, samples: &[f32]) -> Result<(), SttError> {
        if samples.is_empty() {
            return Ok(());
        }

        if self.endpoint.feed(samples) {
            self.dirty = true;
        }
        self.audio.push_slice(samples);
        self.since_decode += samples.len();

        if self.dirty && (self.since_decode >= self.decode_interval || self.endpoint.pause_reached())
        {
            self.decode()?;
        }

        let has_text = !self.text.trim().is_empty();
        self.at_endpoint = self.endpoint.is_endpoint(has_text);

        if self.at_endpoint && !has_text {
            // Nothing recognisable: drop the noise instead of re-decoding it.
            self.audio.clear();
            self.endpoint.reset();
            self.since_decode = 0;
            self.dirty = false;
        }
        Ok(())
    }

    fn input_finished(&mut self) -> Result<(), SttError> {
        let result = if self.dirty || (self.text.is_empty() && !self.audio.is_empty()) {
            self.decode()
        } else {
            Ok(())
        };
        self.at_endpoint = true;
        result
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn is_endpoint(&self) -> bool {
        self.at_endpoint
    }

    fn reset(&mut self) {
        self.audio.clear();
        self.endpoint.reset();
        self.since_decode = 0;
        self.dirty = false;
        self.text.clear();
        self.at_endpoint = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asr::engine::MockSttEngine;

    fn voice(ms: usize) -> Vec<f32> {
        vec![0.3; 16 * ms]
    }

    fn silence(ms: usize) -> Vec<f32> {
        vec![0.0; 16 * ms]
    }

    fn recognizer(script: &[&str]) -> StreamingRecognizer<MockSttEngine> {
        let engine = MockSttEngine::script(script.iter().map(|s| Ok(s.to_string())).collect());
        StreamingRecognizer::new(engine, StreamingConfig::default())
    }

    #[test]
    fn decodes_once_per_interval_of_voiced_audio() {
        let mut rec = recognizer(&["我要", "我要咖啡"]);
        for _ in 0..9 {
            rec.accept_waveform(&voice(100)).unwrap();
        }
        assert_eq!(rec.engine().calls(), 0);
        assert_eq!(rec.text(), "");

        rec.accept_waveform(&voice(100)).unwrap();
        assert_eq!(rec.engine().calls(), 1);
        assert_eq!(rec.text(), "我要");
        assert!(!rec.is_endpoint());
    }

    #[test]
    fn pause_after_speech_is_an_endpoint() {
        let mut rec = recognizer(&["我要咖啡"]);
        rec.accept_waveform(&voice(500)).unwrap();
        for _ in 0..7 {
            rec.accept_waveform(&silence(100)).unwrap();
            assert!(!rec.is_endpoint());
        }
        rec.accept_waveform(&silence(100)).unwrap();
        assert_eq!(rec.text(), "我要咖啡");
        assert!(rec.is_endpoint());
        assert_eq!(rec.engine().calls(), 1);

        // Endpoint persists without re-decoding until reset.
        rec.accept_waveform(&silence(100)).unwrap();
        assert!(rec.is_endpoint());
        assert_eq!(rec.engine().calls(), 1);

        rec.reset();
        assert_eq!(rec.text(), "");
        assert!(!rec.is_endpoint());
    }

    #[test]
    fn pure_silence_never_decodes() {
        let mut rec = recognizer(&["幻听"]);
        for _ in 0..30 {
            rec.accept_waveform(&silence(100)).unwrap();
        }
        assert_eq!(rec.engine().calls(), 0);
        assert_eq!(rec.text(), "");
    }

    #[test]
    fn empty_decode_with_long_silence_discards_audio() {
        let mut rec = recognizer(&[""]);
        rec.accept_waveform(&voice(300)).unwrap();
        let mut fired = false;
        for _ in 0..20 {
            rec.accept_waveform(&silence(100)).unwrap();
            fired |= rec.is_endpoint();
        }
        assert!(fired, "rule 1 should fire on 2 s of silence without text");
        assert_eq!(rec.text(), "");
    }

    #[test]
    fn input_finished_flushes_and_forces_endpoint() {
        let mut rec = recognizer(&["三楼"]);
        rec.accept_waveform(&voice(300)).unwrap();
        assert_eq!(rec.engine().calls(), 0);
        rec.input_finished().unwrap();
        assert_eq!(rec.text(), "三楼");
        assert!(rec.is_endpoint());
    }

    #[test]
    fn engine_errors_propagate() {
        let engine = MockSttEngine::script(vec![Err(SttError::Transcription("boom".into()))]);
        let mut rec = StreamingRecognizer::new(engine, StreamingConfig::default());
        let err = rec.accept_waveform(&voice(1_000)).unwrap_err();
        assert!(matches!(err, SttError::Transcription(_)));
    }

    #[test]
    fn boxed_as_trait_object() {
        let mut rec: Box<dyn Recognizer> = Box::new(recognizer(&["x"]));
        rec.accept_waveform(&[]).unwrap();
        assert!(!rec.is_endpoint());
    }
}
