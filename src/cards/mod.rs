//! Cards: attributes, instances, arena storage, and deck generation.

pub mod arena;
pub mod attributes;
pub mod card;
pub mod deck;

pub use arena::{CardArena, CardId};
pub use attributes::{Rank, Suit, Theme};
pub use card::{Card, ATTACH_CAPACITY};
pub use deck::{generate_deck, DECK_MAX, DECK_MIN};
