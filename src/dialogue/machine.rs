//! Multi-turn dialogue state machine.
//!
//! The conversation is an explicit value, [`DialogueContext`], and a turn is
//! the pure function [`transition`]: it borrows the current context and
//! returns the next context together with the reply events the turn
//! produced.  [`DialogueMachine`] is the single owner that applies those
//! transitions one utterance at a time.
//!
//! ```text
//! Idle ──floor phrase──▶ Idle                      (confirm floor)
//!      ──"咖啡"────────▶ AwaitingCoffeeType        (ask latte / americano)
//!      ──other─────────▶ Idle                      (echo user only)
//! AwaitingCoffeeType ──拿铁|美式──▶ AwaitingCoffeeTemperature
//!                    ──other─────▶ AwaitingCoffeeType   (silent)
//! AwaitingCoffeeTemperature ──冰|热──▶ Idle          (confirm order)
//!                           ──other──▶ AwaitingCoffeeTemperature (silent)
//! ```
//!
//! A floor phrase beats the coffee keyword in `Idle`.  Any turn that emits at
//! least one event asks for an ASR reset; a silent turn does not.

use serde::Serialize;

use super::extract::{CoffeeKind, EntityExtractor, Temperature};
use super::reply::ReplyEvent;

pub(crate) const ASK_COFFEE_KIND: &str = "好的，您是需要拿铁还是美式？";
pub(crate) const ASK_TEMPERATURE: &str = "您需要冰咖啡还是热咖啡？";

fn floor_reply(floor: i32) -> String {
    format!("您要去第 {floor} 楼")
}

fn order_reply(temperature: Temperature, kind: Option<CoffeeKind>) -> String {
    let kind = kind.map(|k| k.label()).unwrap_or_default();
    format!("您想要的是一份{}{}", temperature.label(), kind)
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

/// Where the conversation currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DialogueState {
    #[default]
    Idle,
    AwaitingCoffeeType,
    AwaitingCoffeeTemperature,
}

impl DialogueState {
    pub fn label(&self) -> &'static str {
        match self {
            DialogueState::Idle => "idle",
            DialogueState::AwaitingCoffeeType => "awaiting-coffee-type",
            DialogueState::AwaitingCoffeeTemperature => "awaiting-coffee-temperature",
        }
    }
}

/// Partially filled beverage order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoffeeOrder {
    pub kind: Option<CoffeeKind>,
    pub temperature: Option<Temperature>,
}

impl CoffeeOrder {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.temperature.is_none()
    }
}

/// Floor detected in the current turn, held until it is confirmed.
///
/// A newer detection overwrites an unconfirmed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FloorRequest {
    pub floor: Option<i32>,
}

impl FloorRequest {
    fn detect(&mut self, floor: i32) {
        if let Some(previous) = self.floor.replace(floor) {
            if previous != floor {
                log::debug!("dialogue: floor {previous} superseded by {floor}");
            }
        }
    }

    fn confirm(&mut self) -> Option<i32> {
        self.floor.take()
    }
}

/// Everything one conversation carries between turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DialogueContext {
    pub state: DialogueState,
    pub order: CoffeeOrder,
    pub floor: FloorRequest,
}

/// Result of feeding one utterance to [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: DialogueContext,
    pub events: Vec<ReplyEvent>,
    /// `true` exactly when `events` is non-empty.
    pub reset_asr: bool,
}

// ---------------------------------------------------------------------------
// transition
// ---------------------------------------------------------------------------

/// Compute the next context and reply events for `text`.
pub fn transition(ctx: &DialogueContext, extractor: &EntityExtractor, text: &str) -> Transition {
    let mut next = ctx.clone();
    let mut events = Vec::new();

    match ctx.state {
        DialogueState::Idle => {
            if let Some(floor) = extractor.floor(text) {
                next.floor.detect(floor);
            }

            if let Some(floor) = next.floor.confirm() {
                events.push(ReplyEvent::user(text));
                events.push(ReplyEvent::system(floor_reply(floor)));
            } else if extractor.mentions_coffee(text) {
                events.push(ReplyEvent::user(text));
                events.push(ReplyEvent::system(ASK_COFFEE_KIND));
                next.order = CoffeeOrder::default();
                next.state = DialogueState::AwaitingCoffeeType;
            } else {
                events.push(ReplyEvent::user(text));
            }
        }

        DialogueState::AwaitingCoffeeType => {
            if let Some(kind) = extractor.coffee_kind(text) {
                events.push(ReplyEvent::user(text));
                events.push(ReplyEvent::system(ASK_TEMPERATURE));
                next.order.kind = Some(kind);
                next.state = DialogueState::AwaitingCoffeeTemperature;
            }
        }

        DialogueState::AwaitingCoffeeTemperature => {
            if let Some(temperature) = extractor.temperature(text) {
                events.push(ReplyEvent::user(text));
                events.push(ReplyEvent::system(order_reply(
                    temperature,
                    ctx.order.kind,
                )));
                next.order = CoffeeOrder::default();
                next.state = DialogueState::Idle;
            }
        }
    }

    let reset_asr = !events.is_empty();
    Transition {
        next,
        events,
        reset_asr,
    }
}

// ---------------------------------------------------------------------------
// DialogueMachine
// ---------------------------------------------------------------------------

/// Reply events and reset directive of one consumed utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub events: Vec<ReplyEvent>,
    pub reset_asr: bool,
}

/// Sole owner of a session's [`DialogueContext`].
#[derive(Debug, Clone)]
pub struct DialogueMachine {
    extractor: EntityExtractor,
    context: DialogueContext,
}

impl DialogueMachine {
    pub fn new(extractor: EntityExtractor) -> Self {
        Self {
            extractor,
            context: DialogueContext::default(),
        }
    }

    /// Consume one finalized utterance.
    pub fn on_utterance(&mut self, text: &str) -> TurnOutcome {
        let Transition {
            next,
            events,
            reset_asr,
        } = transition(&self.context, &self.extractor, text);

        if next.state != self.context.state {
            log::debug!(
                "dialogue: {} -> {}",
                self.context.state.label(),
                next.state.label()
            );
        }
        self.context = next;

        TurnOutcome { events, reset_asr }
    }

    /// Back to `Idle` with an empty order.
    pub fn reset(&mut self) {
        self.context = DialogueContext::default();
    }

    pub fn state(&self) -> DialogueState {
        self.context.state
    }

    pub fn order(&self) -> CoffeeOrder {
        self.context.order
    }

    pub fn context(&self) -> &DialogueContext {
        &self.context
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
