//! Core building blocks: player identity, errors, deterministic RNG.

pub mod error;
pub mod player;
pub mod rng;

pub use error::{EngineError, EngineResult};
pub use player::{PlayerId, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
