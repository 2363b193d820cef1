//! Engine error taxonomy.
//!
//! Two kinds of failure exist:
//!
//! - [`EngineError::InvalidPlay`]: an attempted move violates rule legality
//!   (wrong turn, illegal target, card not in hand, malformed attachment).
//! - [`EngineError::InvalidGameState`]: structural misuse of the engine
//!   (wrong player count, deck size out of bounds, AI move requested without
//!   a strategy, action submitted after game over).
//!
//! Both are raised synchronously, before any mutation for the offending
//! action (validate-then-apply). Failures are deterministic, never transient.

use thiserror::Error;

/// Error returned by every fallible engine operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A move that breaks game rules.
    #[error("invalid play: {0}")]
    InvalidPlay(String),

    /// Structural misuse of the engine outside any single move.
    #[error("invalid game state: {0}")]
    InvalidGameState(String),
}

impl EngineError {
    /// Construct an [`EngineError::InvalidPlay`].
    pub fn invalid_play(msg: impl Into<String>) -> Self {
        Self::InvalidPlay(msg.into())
    }

    /// Construct an [`EngineError::InvalidGameState`].
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidGameState(msg.into())
    }
}

/// Convenience alias used across the crate.
pub type EngineResult<T> = Result<T, EngineError>;
