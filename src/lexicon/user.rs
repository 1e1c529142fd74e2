//! Optional user-supplied floor phrases.
//!
//! [`UserLexicon`] reads `user-lexicon.json` from the platform config
//! directory (see [`crate::config::AppPaths`]):
//!
//! ```json
//! [
//!   { "phrase": "顶楼", "floor": 30 },
//!   { "phrase": "lobby", "floor": 1 }
//! ]
//! ```
//!
//! The file is read once at startup.  ASCII letters in phrases are
//! upper-cased so they line up with the normalised utterance text; blank
//! phrases are dropped.

use std::path::Path;

use thiserror::Error;

use super::LexiconEntry;

/// Errors raised while loading the user lexicon.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read user lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("user lexicon {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Extra `(phrase, floor)` entries appended after the built-in table.
#[derive(Debug, Clone, Default)]
pub struct UserLexicon {
    entries: Vec<LexiconEntry>,
}

impl UserLexicon {
    /// Load from `path`.  A missing file yields an empty lexicon.
    pub fn load_from(path: &Path) -> Result<Self, LexiconError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: Vec<LexiconEntry> =
            serde_json::from_str(&data).map_err(|source| LexiconError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        log::info!(
            "lexicon: loaded {} user phrase(s) from {}",
            entries.len(),
            path.display()
        );
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<LexiconEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter_map(|e| {
                let phrase = e.phrase.trim().to_ascii_uppercase();
                (!phrase.is_empty()).then(|| LexiconEntry::new(phrase, e.floor))
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<LexiconEntry> {
        self.entries
    }
}
