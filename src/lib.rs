//! # caravan-engine
//!
//! A rule engine for the two-player Caravan card game: players build three
//! ordered card sequences ("caravans") whose bids must land in the sold
//! band of 21 to 26, and win by selling a majority of caravans or by
//! running the opponent out of cards.
//!
//! ## Design Principles
//!
//! 1. **Validate Then Apply**: Every move is fully validated before any
//!    state changes. Rejected moves leave the game untouched.
//!
//! 2. **Cards Live In An Arena**: All card instances are owned by a
//!    [`CardArena`]; hands, caravans, discard piles, and attachment stacks
//!    hold ids. Moving a card is an id transfer, never an aliased mutation.
//!
//! 3. **Effects Flow Through Events**: Face-card effects are decoupled
//!    from their triggers by a session-scoped synchronous event bus.
//!    Handlers fire in subscription order and may publish recursively.
//!
//! 4. **Deterministic**: All randomness comes from a single seeded RNG, so
//!    a game is reproducible from its seed.
//!
//! ## Modules
//!
//! - `core`: Player ids, errors, deterministic RNG
//! - `cards`: Attributes, card instances, the arena, deck generation
//! - `rules`: Actions, caravan sequencing, player state and move
//!   enumeration
//! - `events`: The session event bus
//! - `game`: The turn state machine and win evaluation
//! - `ai`: Built-in strategies

pub mod ai;
pub mod cards;
pub mod core;
pub mod events;
pub mod game;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{EngineError, EngineResult, GameRng, GameRngState, PlayerId, PLAYER_COUNT};

pub use crate::cards::{
    generate_deck, Card, CardArena, CardId, Rank, Suit, Theme, ATTACH_CAPACITY, DECK_MAX, DECK_MIN,
};

pub use crate::rules::{
    Caravan, CaravanId, Direction, GameAction, MoveOptions, Player, PlayerAction, Target,
    CARAVAN_COUNT, HAND_SIZE, SOLD_MAX, SOLD_MIN,
};

pub use crate::events::{EventBus, EventKind, GameEvent, HandlerId};

pub use crate::game::{
    check_for_winner, Game, GamePhase, GameView, Strategy, OPENING_TURNS,
};

pub use crate::ai::{EasyStrategy, RandomStrategy};
