//! Configuration: `AppConfig` sections, TOML persistence and `AppPaths`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AudioConfig, HotkeyConfig, SessionConfig, SttConfig};
