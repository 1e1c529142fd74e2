//! `rdev::listen` on a dedicated thread, forwarding session toggles.
//!
//! rdev has no shutdown API: dropping [`ToggleListener`] only raises a flag
//! that makes the callback ignore further events.  The thread itself stays
//! parked in the OS event loop until the process exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use crate::session::SessionCommand;

pub struct ToggleListener {
    stop: Arc<AtomicBool>,
    _thread: JoinHandle<()>,
}

impl ToggleListener {
    /// Send [`SessionCommand::Toggle`] on every press of `key`.
    ///
    /// Auto-repeat while the key is held counts as one press.
    pub fn start(key: rdev::Key, tx: mpsc::Sender<SessionCommand>) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let mut gate = PressGate::default();
                let result = rdev::listen(move |event| {
                    if flag.load(Ordering::Relaxed) {
                        return;
                    }
                    if gate.on_event(&event.event_type, key) {
                        log::debug!("hotkey: {key:?} pressed, toggling session");
                        let _ = tx.blocking_send(SessionCommand::Toggle);
                    }
                });
                if let Err(e) = result {
                    log::error!("hotkey: rdev::listen failed: {e:?}");
                }
            })?;

        Ok(Self {
            stop,
            _thread: thread,
        })
    }
}

impl Drop for ToggleListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Turns raw press / release events into one trigger per physical press.
#[derive(Debug, Default)]
struct PressGate {
    held: bool,
}

impl PressGate {
    fn on_event(&mut self, event: &rdev::EventType, key: rdev::Key) -> bool {
        match *event {
            rdev::EventType::KeyPress(k) if k == key => !std::mem::replace(&mut self.held, true),
            rdev::EventType::KeyRelease(k) if k == key => {
                self.held = false;
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdev::{EventType, Key};

    #[test]
    fn auto_repeat_triggers_once() {
        let mut gate = PressGate::default();
        assert!(gate.on_event(&EventType::KeyPress(Key::F9), Key::F9));
        assert!(!gate.on_event(&EventType::KeyPress(Key::F9), Key::F9));
        assert!(!gate.on_event(&EventType::KeyRelease(Key::F9), Key::F9));
        assert!(gate.on_event(&EventType::KeyPress(Key::F9), Key::F9));
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut gate = PressGate::default();
        assert!(!gate.on_event(&EventType::KeyPress(Key::F8), Key::F9));
        assert!(!gate.on_event(&EventType::MouseMove { x: 1.0, y: 2.0 }, Key::F9));
    }
}
