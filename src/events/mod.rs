//! Session-scoped event bus.
//!
//! Rule effects are decoupled from their triggers through a synchronous
//! publish/subscribe bus owned by the game. A played face card publishes a
//! structured event; subscribed handlers apply the secondary effect (card
//! removal, discard routing, bid recomputation). Handlers for an event fire
//! synchronously in subscription order, and a handler may itself publish.
//!
//! The bus is constructed with the game and lives exactly as long as it;
//! there is no global state and tests need no teardown. Every published
//! event is also appended to a persistent history vector, giving a cheap
//! audit trail of the whole session.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::PlayerId;
use crate::rules::CaravanId;

/// Everything that can happen in a game, as a closed sum type. Handlers
/// pattern-match exhaustively; payload shape is compiler-checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The game transitioned from setup to the opening round.
    GameStarted,
    /// A turn completed and play passed to `player`.
    NextTurn { player: PlayerId },
    /// A card landed on `player`'s discard pile.
    CardDiscarded { player: PlayerId, card: CardId },
    /// A Jack was played onto `target`.
    JackPlayed {
        player: PlayerId,
        jack: CardId,
        target: CardId,
        caravan: CaravanId,
    },
    /// A Queen extended `caravan`.
    QueenPlayed {
        player: PlayerId,
        queen: CardId,
        caravan: CaravanId,
    },
    /// A King was attached to `target`.
    KingPlayed {
        player: PlayerId,
        king: CardId,
        target: CardId,
        caravan: CaravanId,
    },
    /// A Joker was played onto an Ace.
    JokerPlayedOnAce {
        player: PlayerId,
        joker: CardId,
        target: CardId,
        caravan: CaravanId,
    },
    /// A Joker was played onto a numbered card.
    JokerPlayedOnNumber {
        player: PlayerId,
        joker: CardId,
        target: CardId,
        caravan: CaravanId,
    },
    /// A caravan was emptied back to its owner's discard pile.
    CaravanDisbanded { caravan: CaravanId },
    /// Caravan bids must be refreshed from card state.
    BidsRecompute,
    /// The game reached a terminal state.
    GameOver { winner: Option<PlayerId> },
    /// A move was rejected for rule legality.
    InvalidPlay { reason: String },
    /// The engine was misused structurally.
    InvalidGameState { reason: String },
}

/// Discriminant of [`GameEvent`], used as the subscription key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    GameStarted,
    NextTurn,
    CardDiscarded,
    JackPlayed,
    QueenPlayed,
    KingPlayed,
    JokerPlayedOnAce,
    JokerPlayedOnNumber,
    CaravanDisbanded,
    BidsRecompute,
    GameOver,
    InvalidPlay,
    InvalidGameState,
}

impl GameEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::GameStarted => EventKind::GameStarted,
            GameEvent::NextTurn { .. } => EventKind::NextTurn,
            GameEvent::CardDiscarded { .. } => EventKind::CardDiscarded,
            GameEvent::JackPlayed { .. } => EventKind::JackPlayed,
            GameEvent::QueenPlayed { .. } => EventKind::QueenPlayed,
            GameEvent::KingPlayed { .. } => EventKind::KingPlayed,
            GameEvent::JokerPlayedOnAce { .. } => EventKind::JokerPlayedOnAce,
            GameEvent::JokerPlayedOnNumber { .. } => EventKind::JokerPlayedOnNumber,
            GameEvent::CaravanDisbanded { .. } => EventKind::CaravanDisbanded,
            GameEvent::BidsRecompute => EventKind::BidsRecompute,
            GameEvent::GameOver { .. } => EventKind::GameOver,
            GameEvent::InvalidPlay { .. } => EventKind::InvalidPlay,
            GameEvent::InvalidGameState { .. } => EventKind::InvalidGameState,
        }
    }
}

/// Names a rule-effect handler wired into the game. The game dispatches to
/// the handler body when the bus routes an event to its id; the indirection
/// keeps the bus free of closures over game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerId {
    /// Removes a Jack's target and routes the discards.
    JackEffect,
    /// Attaches a King and refreshes bids.
    KingEffect,
    /// Applies Joker removal by suit or value.
    JokerEffect,
    /// Refreshes every caravan bid from card state.
    BidRecompute,
}

/// Synchronous publish/subscribe channel scoped to one game session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventBus {
    subscribers: FxHashMap<EventKind, Vec<HandlerId>>,
    history: Vector<GameEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `kind`. Handlers fire in subscription order;
    /// subscribing the same handler twice fires it twice.
    pub fn subscribe(&mut self, kind: EventKind, handler: HandlerId) {
        self.subscribers.entry(kind).or_default().push(handler);
    }

    /// Handlers subscribed to `kind`, in subscription order. Returned by
    /// value so the caller can invoke handlers that mutate the game (and
    /// publish further events) while iterating.
    #[must_use]
    pub fn subscribers_for(&self, kind: EventKind) -> Vec<HandlerId> {
        self.subscribers.get(&kind).cloned().unwrap_or_default()
    }

    /// Append `event` to the session history.
    pub fn record(&mut self, event: GameEvent) {
        self.history.push_back(event);
    }

    /// Every event published so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<GameEvent> {
        &self.history
    }
}
