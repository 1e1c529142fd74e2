//! Floor lexicon — static surface-phrase → floor-number table.
//!
//! [`Lexicon`] is built once at startup from the built-in table
//! ([`builtin::BUILTIN_FLOORS`]) plus an optional user extension
//! ([`UserLexicon`]) and is read-only afterwards.  Share it behind an `Arc`.
//!
//! # Matching
//!
//! [`Lexicon::lookup_floor`] walks the entries in enumeration order and
//! returns the floor of the **first** entry whose phrase is a substring of the
//! text.  There is no digit parsing and no longest-match tie-break; overlaps
//! are resolved purely by order.  [`Lexicon::shadowed`] reports entries that
//! can never win because an earlier phrase is contained in theirs.
//!
//! ```rust
//! use voice_concierge::lexicon::Lexicon;
//!
//! let lexicon = Lexicon::builtin();
//! assert_eq!(lexicon.lookup_floor("负三楼到了"), Some(-3));
//! assert_eq!(lexicon.lookup_floor("go to the NINETIETH floor"), Some(90));
//! assert_eq!(lexicon.lookup_floor("hello"), None);
//! ```

pub mod builtin;
pub mod user;

use serde::{Deserialize, Serialize};

pub use builtin::BUILTIN_FLOORS;
pub use user::{LexiconError, UserLexicon};

// ---------------------------------------------------------------------------
// LexiconEntry
// ---------------------------------------------------------------------------

/// One `(phrase, floor)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Surface phrase matched by substring containment.
    pub phrase: String,
    /// Floor number; negative values are basement levels.
    pub floor: i32,
}

impl LexiconEntry {
    pub fn new(phrase: impl Into<String>, floor: i32) -> Self {
        Self {
            phrase: phrase.into(),
            floor,
        }
    }
}

/// An entry that can never be returned by [`Lexicon::lookup_floor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shadowed {
    /// Index of the unreachable entry.
    pub index: usize,
    /// Index of the earlier entry whose phrase it contains.
    pub shadowed_by: usize,
}

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

/// Ordered, immutable floor lexicon.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// The built-in Chinese + English table only.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_FLOORS
                .iter()
                .map(|(phrase, floor)| LexiconEntry::new(*phrase, *floor)),
        )
    }

    /// Built-in table followed by `user` entries.  Built-ins keep priority.
    pub fn with_user(user: UserLexicon) -> Self {
        let mut lexicon = Self::builtin();
        let builtin_len = lexicon.entries.len();
        lexicon.entries.extend(user.into_entries());

        for s in lexicon.shadowed() {
            if s.index >= builtin_len {
                log::warn!(
                    "lexicon: user phrase {:?} can never match (contains earlier phrase {:?})",
                    lexicon.entries[s.index].phrase,
                    lexicon.entries[s.shadowed_by].phrase
                );
            }
        }
        lexicon
    }

    /// Build from an explicit ordered list (useful for tests).
    pub fn from_entries(entries: impl IntoIterator<Item = LexiconEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Floor of the first entry whose phrase occurs in `text`.
    pub fn lookup_floor(&self, text: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| !e.phrase.is_empty() && text.contains(e.phrase.as_str()))
            .map(|e| e.floor)
    }

    /// Entries that an earlier, contained phrase always beats.
    ///
    /// Quadratic; meant for a one-off check at load time.
    pub fn shadowed(&self) -> Vec<Shadowed> {
        let mut out = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let hit = self.entries[..index]
                .iter()
                .position(|earlier| entry.phrase.contains(earlier.phrase.as_str()));
            if let Some(shadowed_by) = hit {
                out.push(Shadowed { index, shadowed_by });
            }
        }
        out
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basement_phrasings() {
        let lex = Lexicon::builtin();
        assert_eq!(lex.lookup_floor("负三楼到了"), Some(-3));
        assert_eq!(lex.lookup_floor("去地下二层"), Some(-2));
        assert_eq!(lex.lookup_floor("SECOND FLOOR UNDERGROUND PLEASE"), Some(-2));
    }

    #[test]
    fn both_unit_words() {
        let lex = Lexicon::builtin();
        assert_eq!(lex.lookup_floor("我要去三十五楼"), Some(35));
        assert_eq!(lex.lookup_floor("我要去三十五层"), Some(35));
        assert_eq!(lex.lookup_floor("两楼"), Some(2));
        assert_eq!(lex.lookup_floor("十楼"), Some(10));
    }

    #[test]
    fn longer_phrase_wins_through_order() {
        let lex = Lexicon::builtin();
        assert_eq!(lex.lookup_floor("二十一楼"), Some(21));
        assert_eq!(lex.lookup_floor("十一层"), Some(11));
        assert_eq!(lex.lookup_floor("THE NINETY FIRST"), Some(91));
        assert_eq!(lex.lookup_floor("FIRST FLOOR UNDERGROUND"), Some(-1));
    }

    #[test]
    fn english_ordinals() {
        let lex = Lexicon::builtin();
        assert_eq!(lex.lookup_floor("go to the NINETIETH floor"), Some(90));
        assert_eq!(lex.lookup_floor("TWELFTH"), Some(12));
        assert_eq!(lex.lookup_floor("SIXTY FOURTH"), Some(64));
        assert_eq!(lex.lookup_floor("SEVENTY FOURTH"), Some(74));
        assert_eq!(lex.lookup_floor("SEVENTIETH"), Some(70));
        assert_eq!(lex.lookup_floor("SIXTIETH"), Some(60));
    }

    #[test]
    fn no_match() {
        let lex = Lexicon::builtin();
        assert_eq!(lex.lookup_floor("hello"), None);
        assert_eq!(lex.lookup_floor(""), None);
        // Digits are not parsed.
        assert_eq!(lex.lookup_floor("3楼"), None);
    }

    #[test]
    fn builtin_table_has_no_shadowed_entries() {
        assert!(Lexicon::builtin().shadowed().is_empty());
    }

    #[test]
    fn first_entry_wins_on_overlap() {
        let lex = Lexicon::from_entries([
            LexiconEntry::new("一楼", 1),
            LexiconEntry::new("十一楼", 11),
        ]);
        assert_eq!(lex.lookup_floor("十一楼"), Some(1));
        assert_eq!(
            lex.shadowed(),
            vec![Shadowed {
                index: 1,
                shadowed_by: 0
            }]
        );
    }

    #[test]
    fn user_entries_follow_builtins() {
        let user = UserLexicon::from_entries(vec![
            LexiconEntry::new("顶楼", 30),
            LexiconEntry::new("rooftop", 31),
        ]);
        let lex = Lexicon::with_user(user);
        assert_eq!(lex.len(), BUILTIN_FLOORS.len() + 2);
        assert_eq!(lex.lookup_floor("去顶楼"), Some(30));
        assert_eq!(lex.lookup_floor("THE ROOFTOP"), Some(31));
        // Built-in phrase still wins when both occur.
        assert_eq!(lex.lookup_floor("顶楼 五楼"), Some(5));
    }

    #[test]
    fn empty_phrase_never_matches() {
        let lex = Lexicon::from_entries([LexiconEntry::new("", 7)]);
        assert_eq!(lex.lookup_floor("anything"), None);
    }
}
