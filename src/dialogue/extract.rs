//! Entity extraction from finalized utterances.
//!
//! [`EntityExtractor`] answers four questions about an utterance:
//!
//! * which floor does it name ([`EntityExtractor::floor`], via the
//!   [`Lexicon`]),
//! * does it mention coffee,
//! * which coffee kind, latte checked before americano,
//! * which temperature, iced checked before hot.
//!
//! ASCII letters are upper-cased first so `coffee` and `COFFEE` behave
//! alike.  CJK keywords match by substring containment; English keywords
//! must match a whole word, so `PHOTO` or `SHOT` never order a hot drink.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;

const COFFEE_KEYWORDS: &[&str] = &["咖啡", "COFFEE"];

// ---------------------------------------------------------------------------
// Slot value types
// ---------------------------------------------------------------------------

/// Beverage type slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoffeeKind {
    Latte,
    Americano,
}

impl CoffeeKind {
    /// Label used in replies.
    pub fn label(&self) -> &'static str {
        match self {
            CoffeeKind::Latte => "拿铁",
            CoffeeKind::Americano => "美式",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            CoffeeKind::Latte => &["拿铁", "LATTE"],
            CoffeeKind::Americano => &["美式", "AMERICANO"],
        }
    }
}

/// Temperature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Temperature {
    Iced,
    Hot,
}

impl Temperature {
    pub fn label(&self) -> &'static str {
        match self {
            Temperature::Iced => "冰",
            Temperature::Hot => "热",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Temperature::Iced => &["冰", "ICED"],
            Temperature::Hot => &["热", "HOT"],
        }
    }
}

/// Priority order for the type slot.
const KIND_PRIORITY: [CoffeeKind; 2] = [CoffeeKind::Latte, CoffeeKind::Americano];
/// Priority order for the temperature slot.
const TEMPERATURE_PRIORITY: [Temperature; 2] = [Temperature::Iced, Temperature::Hot];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| contains_keyword(text, kw))
}

fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.is_ascii() {
        text.split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| word == keyword)
    } else {
        text.contains(keyword)
    }
}

// ---------------------------------------------------------------------------
// EntityExtractor
// ---------------------------------------------------------------------------

/// Keyword and lexicon matcher shared by every session.
///
/// ```rust
/// use std::sync::Arc;
/// use voice_concierge::dialogue::{CoffeeKind, EntityExtractor};
/// use voice_concierge::lexicon::Lexicon;
///
/// let extractor = EntityExtractor::new(Arc::new(Lexicon::builtin()));
/// assert_eq!(extractor.floor("带我去五楼"), Some(5));
/// assert!(extractor.mentions_coffee("来杯咖啡"));
/// assert_eq!(extractor.coffee_kind("美式就好"), Some(CoffeeKind::Americano));
/// ```
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    lexicon: Arc<Lexicon>,
}

impl EntityExtractor {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Floor named by `text`, if any.
    pub fn floor(&self, text: &str) -> Option<i32> {
        self.lexicon.lookup_floor(&normalise(text))
    }

    pub fn mentions_coffee(&self, text: &str) -> bool {
        contains_any(&normalise(text), COFFEE_KEYWORDS)
    }

    pub fn coffee_kind(&self, text: &str) -> Option<CoffeeKind> {
        let text = normalise(text);
        KIND_PRIORITY
            .into_iter()
            .find(|kind| contains_any(&text, kind.keywords()))
    }

    pub fn temperature(&self, text: &str) -> Option<Temperature> {
        let text = normalise(text);
        TEMPERATURE_PRIORITY
            .into_iter()
            .find(|t| contains_any(&text, t.keywords()))
    }
}

fn normalise(text: &str) -> String {
    text.to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(Arc::new(Lexicon::builtin()))
    }

    #[test]
    fn floor_goes_through_lexicon() {
        let x = extractor();
        assert_eq!(x.floor("负三楼到了"), Some(-3));
        assert_eq!(x.floor("hello"), None);
    }

    #[test]
    fn floor_matching_folds_ascii_case() {
        assert_eq!(extractor().floor("go to the ninetieth floor"), Some(90));
    }

    #[test]
    fn coffee_mentions() {
        let x = extractor();
        assert!(x.mentions_coffee("我要咖啡"));
        assert!(x.mentions_coffee("a coffee please"));
        assert!(!x.mentions_coffee("我要茶"));
    }

    #[test]
    fn latte_checked_before_americano() {
        let x = extractor();
        assert_eq!(x.coffee_kind("拿铁"), Some(CoffeeKind::Latte));
        assert_eq!(x.coffee_kind("美式"), Some(CoffeeKind::Americano));
        assert_eq!(x.coffee_kind("美式还是拿铁呢"), Some(CoffeeKind::Latte));
        assert_eq!(x.coffee_kind("AMERICANO"), Some(CoffeeKind::Americano));
        assert_eq!(x.coffee_kind("摩卡"), None);
    }

    #[test]
    fn iced_checked_before_hot() {
        let x = extractor();
        assert_eq!(x.temperature("冰的"), Some(Temperature::Iced));
        assert_eq!(x.temperature("热的"), Some(Temperature::Hot));
        assert_eq!(x.temperature("热的不要，冰的"), Some(Temperature::Iced));
        assert_eq!(x.temperature("hot"), Some(Temperature::Hot));
        assert_eq!(x.temperature("常温"), None);
    }

    #[test]
    fn english_keywords_match_whole_words() {
        let x = extractor();
        assert_eq!(x.temperature("take a photo"), None);
        assert_eq!(x.temperature("one more shot"), None);
        assert_eq!(x.temperature("HOT please"), Some(Temperature::Hot));
        assert_eq!(x.temperature("要hot的"), Some(Temperature::Hot));
        assert_eq!(x.temperature("iced, thanks"), Some(Temperature::Iced));
        assert_eq!(x.coffee_kind("lattes are sold out"), None);
        assert_eq!(x.coffee_kind("an americano"), Some(CoffeeKind::Americano));
        assert!(!x.mentions_coffee("coffeehouse"));
        assert!(x.mentions_coffee("coffee!"));
    }

    #[test]
    fn chinese_keywords_match_inside_words() {
        let x = extractor();
        assert_eq!(x.temperature("冰美式"), Some(Temperature::Iced));
        assert!(x.mentions_coffee("来杯咖啡吧"));
    }

    #[test]
    fn labels() {
        assert_eq!(CoffeeKind::Latte.label(), "拿铁");
        assert_eq!(CoffeeKind::Americano.label(), "美式");
        assert_eq!(Temperature::Iced.label(), "冰");
        assert_eq!(Temperature::Hot.label(), "热");
    }
}
