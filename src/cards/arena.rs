//! Card storage.
//!
//! All card instances for a game live in a single [`CardArena`], addressed
//! by stable [`CardId`]s. Hands, caravans, discard piles, and attachment
//! stacks hold ids, never card values, so moving a card between containers
//! is an id transfer and a card can never be aliased from two places.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::core::{EngineError, EngineResult};

/// Stable identifier for a card in a [`CardArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u64);

impl CardId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Owns every card instance in a game.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardArena {
    cards: FxHashMap<CardId, Card>,
    next_id: u64,
}

impl CardArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cards ever allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Allocate an id for `card` and store it.
    pub fn insert(&mut self, card: Card) -> CardId {
        let id = CardId(self.next_id);
        self.next_id += 1;
        self.cards.insert(id, card);
        id
    }

    /// Look up a card.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Look up a card mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    /// Look up a card that a container claims to hold. A miss means a
    /// container holds a stale id and is reported as state corruption.
    pub fn card(&self, id: CardId) -> EngineResult<&Card> {
        self.cards
            .get(&id)
            .ok_or_else(|| EngineError::invalid_state(format!("{id} not present in arena")))
    }

    /// Mutable variant of [`CardArena::card`].
    pub fn card_mut(&mut self, id: CardId) -> EngineResult<&mut Card> {
        self.cards
            .get_mut(&id)
            .ok_or_else(|| EngineError::invalid_state(format!("{id} not present in arena")))
    }

    /// Effective value of a card, including its King multiplier.
    pub fn effective_value(&self, id: CardId) -> EngineResult<u32> {
        Ok(self.card(id)?.compute_value(self))
    }

    /// Attach `face` onto `target`, validating the attachment rules.
    pub fn attach_face_card(&mut self, target: CardId, face: CardId) -> EngineResult<()> {
        let face_card = self.card(face)?;
        let target_card = self.card(target)?;
        if !target_card.can_attach_face_card(face_card) {
            return Err(EngineError::invalid_play(format!(
                "cannot attach {face_card} to {target_card}"
            )));
        }
        self.card_mut(target)?.attached.push(face);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::attributes::{Rank, Suit, Theme};

    fn insert(arena: &mut CardArena, rank: Rank, suit: Suit) -> CardId {
        arena.insert(Card::new(rank, suit, Theme::Default))
    }

    #[test]
    fn test_insert_and_get() {
        let mut arena = CardArena::new();
        let id = insert(&mut arena, Rank::Seven, Suit::Diamonds);

        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get(id).unwrap().rank, Rank::Seven);
        assert!(arena.get(CardId::new(999)).is_none());
    }

    #[test]
    fn test_stale_id_is_state_error() {
        let arena = CardArena::new();
        let err = arena.card(CardId::new(0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidGameState(_)));
    }

    #[test]
    fn test_attach_face_card() {
        let mut arena = CardArena::new();
        let seven = insert(&mut arena, Rank::Seven, Suit::Diamonds);
        let king = insert(&mut arena, Rank::King, Suit::Spades);

        arena.attach_face_card(seven, king).unwrap();
        assert_eq!(arena.get(seven).unwrap().attached.as_slice(), &[king]);
        assert_eq!(arena.effective_value(seven).unwrap(), 14);
    }

    #[test]
    fn test_attach_rejects_queen() {
        let mut arena = CardArena::new();
        let seven = insert(&mut arena, Rank::Seven, Suit::Diamonds);
        let queen = insert(&mut arena, Rank::Queen, Suit::Spades);

        let err = arena.attach_face_card(seven, queen).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPlay(_)));
    }

    #[test]
    fn test_attach_rejects_fourth_face_card() {
        let mut arena = CardArena::new();
        let seven = insert(&mut arena, Rank::Seven, Suit::Diamonds);
        for suit in [Suit::Spades, Suit::Hearts, Suit::Clubs] {
            let king = insert(&mut arena, Rank::King, suit);
            arena.attach_face_card(seven, king).unwrap();
        }
        assert_eq!(arena.effective_value(seven).unwrap(), 56);

        let fourth = insert(&mut arena, Rank::King, Suit::Diamonds);
        let err = arena.attach_face_card(seven, fourth).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPlay(_)));
    }
}
