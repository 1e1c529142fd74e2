//! Application settings, defaults and TOML persistence.
//!
//! Every section is `#[serde(default)]`, so a `settings.toml` only needs the
//! keys it wants to change.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::asr::EndpointRules;
use crate::audio::TARGET_SAMPLE_RATE;

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Whisper model and decoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// GGML file stem under the models directory (`ggml-<model>.bin`).
    pub model: String,
    /// ISO-639-1 code, or `"auto"`.
    pub language: String,
    /// How much new voiced audio triggers a re-decode of the utterance.
    pub decode_interval_ms: u32,
    /// Decoder threads; 0 picks automatically.
    pub threads: u32,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "base".into(),
            language: "zh".into(),
            decode_interval_ms: 1_000,
            threads: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Recognizer input rate. Only 16 000 is supported.
    pub sample_rate: u32,
    /// Producer read interval.
    pub buffer_ms: u32,
    /// Frame RMS above which audio counts as voice.
    pub vad_threshold: f32,
    /// Longest utterance kept for decoding; older audio is dropped.
    pub max_utterance_secs: u32,
    /// Input device name; `None` uses the system default.
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: TARGET_SAMPLE_RATE,
            buffer_ms: 100,
            vad_threshold: 0.01,
            max_utterance_secs: 30,
            device: None,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig / SessionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Key that starts / stops the session (e.g. `"F9"`).
    pub toggle_session_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle_session_key: "F9".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Start listening as soon as the app is up.
    pub auto_start: bool,
    /// Capacity of the producer → consumer hand-off channel.
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            channel_capacity: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Top-level configuration, persisted as `settings.toml`.
///
/// ```rust,no_run
/// use voice_concierge::config::AppConfig;
///
/// let config = AppConfig::load().unwrap(); // defaults on first run
/// assert_eq!(config.audio.sample_rate, 16_000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub stt: SttConfig,
    pub audio: AudioConfig,
    pub endpoint: EndpointRules,
    pub hotkey: HotkeyConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load from the platform `settings.toml`; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject values the audio path cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate != TARGET_SAMPLE_RATE {
            bail!(
                "audio.sample_rate must be {TARGET_SAMPLE_RATE}, got {}",
                self.audio.sample_rate
            );
        }
        if self.audio.buffer_ms == 0 {
            bail!("audio.buffer_ms must be > 0");
        }
        if self.session.channel_capacity == 0 {
            bail!("session.channel_capacity must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.stt.model, "base");
        assert_eq!(cfg.stt.language, "zh");
        assert_eq!(cfg.audio.buffer_ms, 100);
        assert_eq!(cfg.endpoint.rule1_min_trailing_silence, 2.0);
        assert_eq!(cfg.endpoint.rule2_min_trailing_silence, 0.8);
        assert_eq!(cfg.endpoint.rule3_min_utterance_length, 20.0);
        assert_eq!(cfg.hotkey.toggle_session_key, "F9");
        assert!(cfg.session.auto_start);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut cfg = AppConfig::default();
        cfg.stt.model = "small".into();
        cfg.audio.device = Some("USB Mic".into());
        cfg.endpoint.rule2_min_trailing_silence = 1.2;
        cfg.hotkey.toggle_session_key = "F10".into();
        cfg.session.auto_start = false;

        cfg.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[stt]\nmodel = \"tiny\"\n\n[session]\nauto_start = false\n").unwrap();

        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.stt.model, "tiny");
        assert_eq!(cfg.stt.language, "zh");
        assert!(!cfg.session.auto_start);
        assert_eq!(cfg.session.channel_capacity, 64);
    }

    #[test]
    fn unsupported_sample_rate_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[audio]\nsample_rate = 44100\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("sample_rate"), "{err}");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[stt\nmodel = 1").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
