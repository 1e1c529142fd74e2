//! Endpoint detection from frame energy.
//!
//! An utterance ends when any rule fires:
//!
//! 1. nothing has been decoded yet and trailing silence ≥ `rule1` seconds;
//! 2. text has been decoded and trailing silence ≥ `rule2` seconds;
//! 3. the utterance is at least `rule3` seconds long.
//!
//! Rule 1 lets the recognizer discard long stretches of noise; rule 2 is the
//! normal end-of-turn pause; rule 3 caps runaway utterances.

use serde::{Deserialize, Serialize};

use crate::audio::VadDetector;

/// Endpoint thresholds in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointRules {
    pub rule1_min_trailing_silence: f32,
    pub rule2_min_trailing_silence: f32,
    pub rule3_min_utterance_length: f32,
}

impl Default for EndpointRules {
    fn default() -> Self {
        Self {
            rule1_min_trailing_silence: 2.0,
            rule2_min_trailing_silence: 0.8,
            rule3_min_utterance_length: 20.0,
        }
    }
}

impl EndpointRules {
    pub fn is_endpoint(&self, has_text: bool, trailing_silence: f32, utterance_len: f32) -> bool {
        (!has_text && trailing_silence >= self.rule1_min_trailing_silence)
            || (has_text && trailing_silence >= self.rule2_min_trailing_silence)
            || utterance_len >= self.rule3_min_utterance_length
    }
}

/// Running silence / length bookkeeping for the current utterance.
#[derive(Debug, Clone)]
pub struct EndpointDetector {
    vad: VadDetector,
    rules: EndpointRules,
    sample_rate: u32,
    total_samples: usize,
    trailing_silence_samples: usize,
    heard_voice: bool,
}

impl EndpointDetector {
    pub fn new(vad: VadDetector, rules: EndpointRules, sample_rate: u32) -> Self {
        Self {
            vad,
            rules,
            sample_rate: sample_rate.max(1),
            total_samples: 0,
            trailing_silence_samples: 0,
            heard_voice: false,
        }
    }

    /// Account for `chunk`; returns `true` if any frame in it was voiced.
    pub fn feed(&mut self, chunk: &[f32]) -> bool {
        let mut voiced_any = false;
        for frame in self.vad.frames(chunk) {
            self.total_samples += frame.len;
            if frame.voiced {
                voiced_any = true;
                self.heard_voice = true;
                self.trailing_silence_samples = 0;
            } else {
                self.trailing_silence_samples += frame.len;
            }
        }
        voiced_any
    }

    pub fn trailing_silence_secs(&self) -> f32 {
        self.trailing_silence_samples as f32 / self.sample_rate as f32
    }

    pub fn utterance_secs(&self) -> f32 {
        self.total_samples as f32 / self.sample_rate as f32
    }

    pub fn heard_voice(&self) -> bool {
        self.heard_voice
    }

    pub fn rules(&self) -> &EndpointRules {
        &self.rules
    }

    /// Whether the pause after decoded speech is long enough for rule 2.
    pub fn pause_reached(&self) -> bool {
        self.trailing_silence_secs() >= self.rules.rule2_min_trailing_silence
    }

    pub fn is_endpoint(&self, has_text: bool) -> bool {
        self.rules
            .is_endpoint(has_text, self.trailing_silence_secs(), self.utterance_secs())
    }

    pub fn reset(&mut self) {
        self.total_samples = 0;
        self.trailing_silence_samples = 0;
        self.heard_voice = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 16_000;

    fn detector() -> EndpointDetector {
        EndpointDetector::new(VadDetector::new(0.01), EndpointRules::default(), SR)
    }

    fn silence(ms: usize) -> Vec<f32> {
        vec![0.0; SR as usize * ms / 1000]
    }

    fn voice(ms: usize) -> Vec<f32> {
        vec![0.3; SR as usize * ms / 1000]
    }

    #[test]
    fn rules_table() {
        let rules = EndpointRules::default();
        assert!(!rules.is_endpoint(false, 1.9, 1.9));
        assert!(rules.is_endpoint(false, 2.0, 2.0));
        assert!(!rules.is_endpoint(true, 0.7, 3.0));
        assert!(rules.is_endpoint(true, 0.8, 3.0));
        assert!(rules.is_endpoint(true, 0.0, 20.0));
        assert!(rules.is_endpoint(false, 0.0, 20.0));
    }

    #[test]
    fn voice_resets_trailing_silence() {
        let mut d = detector();
        assert!(!d.feed(&silence(600)));
        assert!(d.feed(&voice(300)));
        assert_eq!(d.trailing_silence_secs(), 0.0);
        d.feed(&silence(900));
        assert!(d.pause_reached());
        assert!(d.is_endpoint(true));
        assert!(!d.is_endpoint(false));
        assert!(d.heard_voice());
    }

    #[test]
    fn utterance_length_accumulates_across_chunks() {
        let mut d = detector();
        for _ in 0..10 {
            d.feed(&voice(100));
        }
        assert!((d.utterance_secs() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn reset_clears_everything() {
        let mut d = detector();
        d.feed(&voice(500));
        d.feed(&silence(1000));
        d.reset();
        assert_eq!(d.utterance_secs(), 0.0);
        assert_eq!(d.trailing_silence_secs(), 0.0);
        assert!(!d.heard_voice());
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        let rules: EndpointRules = toml::from_str("rule2_min_trailing_silence = 1.2").unwrap();
        assert_eq!(rules.rule1_min_trailing_silence, 2.0);
        assert_eq!(rules.rule2_min_trailing_silence, 1.2);
    }
}
