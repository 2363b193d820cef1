//! A single playable card and its face-card attachment rules.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::arena::{CardArena, CardId};
use super::attributes::{Rank, Suit, Theme};

/// Maximum number of face cards that may sit on a single card.
pub const ATTACH_CAPACITY: usize = 3;

/// A card instance. Holds rank/suit/theme plus an ordered, bounded stack of
/// attached face cards (ids into the owning arena).
///
/// Cards are created once by deck generation and then only move between
/// containers (hand, caravan, attachment stack, discard); they are never
/// duplicated or destroyed mid-game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub theme: Theme,
    /// Ids of face cards attached to this card, in attachment order.
    pub attached: SmallVec<[CardId; ATTACH_CAPACITY]>,
}

impl Card {
    /// Create a fresh card with no attachments.
    #[must_use]
    pub fn new(rank: Rank, suit: Suit, theme: Theme) -> Self {
        Self {
            rank,
            suit,
            theme,
            attached: SmallVec::new(),
        }
    }

    /// Whether this is a face card (Jack, Queen, King, Joker).
    #[must_use]
    pub fn is_face_card(&self) -> bool {
        self.rank.is_face()
    }

    /// Intrinsic numeric value of the rank, ignoring attachments.
    #[must_use]
    pub fn numeric_value(&self) -> u32 {
        self.rank.numeric_value()
    }

    /// Whether `candidate` may be attached to this card.
    ///
    /// Rejects when the attachment stack is full, when the candidate is a
    /// Queen (Queens extend a caravan, never attach), when the candidate is
    /// not a face card, or when this card is itself a face card (face cards
    /// attach only to valued cards).
    #[must_use]
    pub fn can_attach_face_card(&self, candidate: &Card) -> bool {
        if self.attached.len() >= ATTACH_CAPACITY {
            return false;
        }
        if candidate.rank == Rank::Queen {
            return false;
        }
        if !candidate.is_face_card() {
            return false;
        }
        if self.is_face_card() {
            return false;
        }
        true
    }

    /// Effective value: intrinsic numeric value doubled once per attached
    /// King. Jacks and Jokers never linger in the attachment stack, so in
    /// practice only Kings contribute.
    #[must_use]
    pub fn compute_value(&self, arena: &CardArena) -> u32 {
        let kings = self
            .attached
            .iter()
            .filter(|&&id| arena.get(id).map_or(false, |c| c.rank == Rank::King))
            .count() as u32;
        self.numeric_value() * 2u32.pow(kings)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}
