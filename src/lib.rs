//! Voice concierge: a spoken elevator-floor and coffee-order assistant.
//!
//! Audio is captured on a producer thread, recognised incrementally, and
//! every completed utterance is run through a small dialogue state machine
//! that confirms floor requests and walks a customer through a coffee order.
//!
//! | Module       | Role                                                   |
//! |--------------|--------------------------------------------------------|
//! | [`lexicon`]  | floor phrase table and lookup                          |
//! | [`dialogue`] | entity extraction, state machine, transcript           |
//! | [`session`]  | utterance assembly, producer / consumer session runtime|
//! | [`asr`]      | streaming recognizer over Whisper                      |
//! | [`audio`]    | microphone and WAV sources, resampling, VAD            |
//! | [`hotkey`]   | global key to toggle the session                       |
//! | [`config`]   | `settings.toml` and platform paths                     |

pub mod asr;
pub mod audio;
pub mod config;
pub mod dialogue;
pub mod hotkey;
pub mod lexicon;
pub mod session;
