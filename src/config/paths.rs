//! Platform directories resolved with `dirs`.
//!
//! ```text
//! config dir  settings.toml, user-lexicon.json
//!   Linux  ~/.config/voice-concierge/
//!   macOS  ~/Library/Application Support/voice-concierge/
//!   Windows %APPDATA%\voice-concierge\
//!
//! data dir    models/ggml-<name>.bin
//!   Linux  ~/.local/share/voice-concierge/
//! ```

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    /// Extra floor phrases appended to the built-in lexicon.
    pub user_lexicon_file: PathBuf,
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "voice-concierge";

    /// Falls back to the working directory when the platform has no
    /// standard location.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);
        Self::rooted(config_dir, data_dir)
    }

    /// Layout under explicit roots.
    pub fn rooted(config_dir: impl Into<PathBuf>, data_dir: impl AsRef<Path>) -> Self {
        let config_dir = config_dir.into();
        Self {
            settings_file: config_dir.join("settings.toml"),
            user_lexicon_file: config_dir.join("user-lexicon.json"),
            models_dir: data_dir.as_ref().join("models"),
            config_dir,
        }
    }

    /// GGML file for model `name`, e.g. `base` → `models/ggml-base.bin`.
    pub fn model_file(&self, name: &str) -> PathBuf {
        self.models_dir.join(format!("ggml-{name}.bin"))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        let paths = AppPaths::new();
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths
            .user_lexicon_file
            .file_name()
            .is_some_and(|n| n == "user-lexicon.json"));
        assert!(paths.config_dir.ends_with("voice-concierge"));
    }

    #[test]
    fn model_file_under_models_dir() {
        let paths = AppPaths::rooted("/cfg", "/data");
        assert_eq!(paths.model_file("base"), PathBuf::from("/data/models/ggml-base.bin"));
        assert_eq!(paths.settings_file, PathBuf::from("/cfg/settings.toml"));
    }
}
