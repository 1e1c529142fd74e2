//! Global session-toggle hotkey, backed by `rdev`.
//!
//! `rdev::listen` blocks forever, so the listener lives on its own OS thread
//! and forwards [`SessionCommand::Toggle`](crate::session::SessionCommand)
//! into the runner's command channel.
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use voice_concierge::hotkey::{parse_key, ToggleListener};
//!
//! let (tx, _rx) = mpsc::channel(8);
//! let key = parse_key("F9").unwrap();
//! let _listener = ToggleListener::start(key, tx).unwrap();
//! ```

pub mod listener;

pub use listener::ToggleListener;

use rdev::Key;

const NAMED_KEYS: &[(&str, Key)] = &[
    ("F1", Key::F1),
    ("F2", Key::F2),
    ("F3", Key::F3),
    ("F4", Key::F4),
    ("F5", Key::F5),
    ("F6", Key::F6),
    ("F7", Key::F7),
    ("F8", Key::F8),
    ("F9", Key::F9),
    ("F10", Key::F10),
    ("F11", Key::F11),
    ("F12", Key::F12),
    ("ESCAPE", Key::Escape),
    ("ESC", Key::Escape),
    ("SPACE", Key::Space),
    ("ENTER", Key::Return),
    ("RETURN", Key::Return),
    ("TAB", Key::Tab),
    ("PAUSE", Key::Pause),
    ("SCROLLLOCK", Key::ScrollLock),
    ("PRINTSCREEN", Key::PrintScreen),
    ("INSERT", Key::Insert),
    ("HOME", Key::Home),
    ("END", Key::End),
];

const LETTER_KEYS: [Key; 26] = [
    Key::KeyA, Key::KeyB, Key::KeyC, Key::KeyD, Key::KeyE, Key::KeyF, Key::KeyG,
    Key::KeyH, Key::KeyI, Key::KeyJ, Key::KeyK, Key::KeyL, Key::KeyM, Key::KeyN,
    Key::KeyO, Key::KeyP, Key::KeyQ, Key::KeyR, Key::KeyS, Key::KeyT, Key::KeyU,
    Key::KeyV, Key::KeyW, Key::KeyX, Key::KeyY, Key::KeyZ,
];

/// Map a config key name (case-insensitive) to an [`rdev::Key`].
///
/// ```
/// use voice_concierge::hotkey::parse_key;
///
/// assert_eq!(parse_key("F9"), Some(rdev::Key::F9));
/// assert_eq!(parse_key("esc"), Some(rdev::Key::Escape));
/// assert_eq!(parse_key("q"), Some(rdev::Key::KeyQ));
/// assert_eq!(parse_key("Ctrl+Q"), None);
/// ```
pub fn parse_key(name: &str) -> Option<Key> {
    let upper = name.trim().to_ascii_uppercase();

    if let [letter @ b'A'..=b'Z'] = upper.as_bytes() {
        return Some(LETTER_KEYS[usize::from(letter - b'A')]);
    }

    NAMED_KEYS
        .iter()
        .find(|(n, _)| *n == upper)
        .map(|(_, key)| *key)
}
