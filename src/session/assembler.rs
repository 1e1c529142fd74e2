//! Turns the recognizer's stream of partial results into spoken turns.
//!
//! The recognizer reports its current text after every buffer, many times per
//! utterance, and keeps reporting the same endpoint until it is reset.  The
//! assembler emits one [`FinalizedUtterance`] per turn:
//!
//! * nothing is finalized until non-blank text has been seen once;
//! * after that, an endpoint with non-blank text that differs from the last
//!   finalized text is emitted; blanks and repeats are dropped.

/// A completed spoken turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedUtterance {
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct UtteranceAssembler {
    started: bool,
    last_finalized: String,
}

impl UtteranceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_asr_event(&mut self, text: &str, is_endpoint: bool) -> Option<FinalizedUtterance> {
        if !self.started {
            if !text.trim().is_empty() {
                self.started = true;
            }
            return None;
        }

        if !is_endpoint || text.trim().is_empty() || text == self.last_finalized {
            if is_endpoint {
                log::trace!("session: suppressed endpoint text {text:?}");
            }
            return None;
        }

        self.last_finalized = text.to_string();
        Some(FinalizedUtterance {
            text: text.to_string(),
        })
    }

    pub fn reset(&mut self) {
        self.started = false;
        self.last_finalized.clear();
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalized(text: &str) -> Option<FinalizedUtterance> {
        Some(FinalizedUtterance { text: text.into() })
    }

    #[test]
    fn first_non_blank_text_only_marks_start() {
        let mut a = UtteranceAssembler::new();
        assert_eq!(a.on_asr_event("", false), None);
        assert!(!a.is_started());
        // Even an endpoint is swallowed by the start marker.
        assert_eq!(a.on_asr_event("三楼", true), None);
        assert!(a.is_started());
        assert_eq!(a.on_asr_event("三楼", true), finalized("三楼"));
    }

    #[test]
    fn partials_without_endpoint_are_ignored() {
        let mut a = UtteranceAssembler::new();
        a.on_asr_event("我", false);
        assert_eq!(a.on_asr_event("我要", false), None);
        assert_eq!(a.on_asr_event("我要咖啡", false), None);
        assert_eq!(a.on_asr_event("我要咖啡", true), finalized("我要咖啡"));
    }

    #[test]
    fn duplicate_endpoint_emits_once() {
        let mut a = UtteranceAssembler::new();
        a.on_asr_event("拿铁", false);
        assert_eq!(a.on_asr_event("拿铁", true), finalized("拿铁"));
        assert_eq!(a.on_asr_event("拿铁", true), None);
        assert_eq!(a.on_asr_event("拿铁", true), None);
    }

    #[test]
    fn blank_endpoint_is_suppressed() {
        let mut a = UtteranceAssembler::new();
        a.on_asr_event("冰", false);
        assert_eq!(a.on_asr_event("   ", true), None);
        assert_eq!(a.on_asr_event("", true), None);
    }

    #[test]
    fn changed_text_after_endpoint_is_a_new_turn() {
        let mut a = UtteranceAssembler::new();
        a.on_asr_event("你好", false);
        assert_eq!(a.on_asr_event("你好", true), finalized("你好"));
        assert_eq!(a.on_asr_event("你好三楼", true), finalized("你好三楼"));
    }

    #[test]
    fn reset_requires_a_new_start() {
        let mut a = UtteranceAssembler::new();
        a.on_asr_event("五楼", false);
        assert_eq!(a.on_asr_event("五楼", true), finalized("五楼"));

        a.reset();
        assert!(!a.is_started());
        assert_eq!(a.on_asr_event("五楼", true), None);
        // The same text is no longer a duplicate once reset.
        assert_eq!(a.on_asr_event("五楼", true), finalized("五楼"));
    }
}
