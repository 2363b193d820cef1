//! Caravan sequencing rules, bid computation, and face-card removal
//! effects.
//!
//! A caravan is an ordered sequence of card ids with three pieces of
//! derived state: the current direction (locked once two valued cards are
//! present, changed only by a Queen or by removal), the current suit
//! (updated by every off-suit play), and the bid (always the sum of the
//! contained cards' effective values, recomputed from scratch after every
//! structural change).

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardArena, CardId, Rank, Suit};
use crate::core::{EngineError, EngineResult};

/// Lowest bid at which a caravan counts as sold.
pub const SOLD_MIN: u32 = 21;
/// Highest bid at which a caravan counts as sold.
pub const SOLD_MAX: u32 = 26;

/// Sequencing direction of a caravan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// One of a player's three card sequences.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Caravan {
    cards: Vec<CardId>,
    direction: Option<Direction>,
    suit: Option<Suit>,
    bid: u32,
}

impl Caravan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    #[must_use]
    pub fn suit(&self) -> Option<Suit> {
        self.suit
    }

    #[must_use]
    pub fn bid(&self) -> u32 {
        self.bid
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains(&id)
    }

    /// Whether the bid lands in the sold band [21, 26].
    #[must_use]
    pub fn is_sold(&self) -> bool {
        (SOLD_MIN..=SOLD_MAX).contains(&self.bid)
    }

    /// Last valued (non-face) card in the sequence, if any.
    #[must_use]
    pub fn last_valued_card(&self, arena: &CardArena) -> Option<CardId> {
        self.cards
            .iter()
            .rev()
            .copied()
            .find(|&id| arena.get(id).map_or(false, |c| !c.is_face_card()))
    }

    /// Sum of effective values over the contained cards. Equals `bid()`
    /// whenever the caravan is in a settled state.
    #[must_use]
    pub fn compute_value(&self, arena: &CardArena) -> u32 {
        self.cards
            .iter()
            .filter_map(|&id| arena.get(id))
            .map(|c| c.compute_value(arena))
            .sum()
    }

    /// Refresh the stored bid from the contained cards.
    pub fn recompute_bid(&mut self, arena: &CardArena) {
        self.bid = self.compute_value(arena);
    }

    /// Sequencing legality for adding `card` to the end of this caravan.
    ///
    /// Empty caravans accept only valued cards. On a non-empty caravan a
    /// valued card must differ in numeric value from the last valued card,
    /// and then either match the caravan's current suit (which overrides
    /// direction) or continue the locked direction. Face cards pass the
    /// structural check; which of them may actually extend the sequence
    /// (Queen) versus attach (Jack, King, Joker) is routed by the caller.
    #[must_use]
    pub fn can_add_card(&self, card: &Card, arena: &CardArena) -> bool {
        if self.cards.is_empty() {
            return !card.is_face_card();
        }

        let last_value = self
            .last_valued_card(arena)
            .and_then(|id| arena.get(id))
            .map(Card::numeric_value);

        if !card.is_face_card() {
            if last_value == Some(card.numeric_value()) {
                return false;
            }
        } else {
            return true;
        }

        if self.suit == Some(card.suit) {
            return true;
        }

        match (self.direction, last_value) {
            (Some(Direction::Ascending), Some(last)) => card.numeric_value() > last,
            (Some(Direction::Descending), Some(last)) => card.numeric_value() < last,
            _ => true,
        }
    }

    /// Append `id` to the sequence, updating suit, direction, and bid.
    pub fn add_card(&mut self, id: CardId, arena: &CardArena) -> EngineResult<()> {
        let card = arena.card(id)?;
        if !self.can_add_card(card, arena) {
            return Err(EngineError::invalid_play(format!(
                "cannot add {card} to this caravan"
            )));
        }

        if self.cards.is_empty() {
            self.suit = Some(card.suit);
        } else if card.rank == Rank::Queen {
            // A Queen reverses direction and retints the caravan. On a
            // caravan with no direction yet, the reversal lands Ascending.
            self.direction = Some(match self.direction {
                Some(dir) => dir.flipped(),
                None => Direction::Ascending,
            });
            self.suit = Some(card.suit);
        } else if !card.is_face_card() {
            if self.direction.is_none() {
                if let Some(last) = self.last_valued_card(arena) {
                    let last_value = arena.card(last)?.numeric_value();
                    self.direction = Some(if card.numeric_value() > last_value {
                        Direction::Ascending
                    } else {
                        Direction::Descending
                    });
                }
            }
            if self.suit != Some(card.suit) {
                self.suit = Some(card.suit);
            }
        }

        self.cards.push(id);
        self.recompute_bid(arena);
        Ok(())
    }

    /// Empty the caravan, returning the removed card ids in order. State
    /// resets to empty/none/0.
    pub fn disband(&mut self) -> Vec<CardId> {
        self.direction = None;
        self.suit = None;
        self.bid = 0;
        std::mem::take(&mut self.cards)
    }

    /// Jack effect: remove `target` and everything attached to it.
    ///
    /// Returns the removed ids (target first, then its attachments) for
    /// discard routing. Direction is re-derived from the cards that remain.
    pub fn apply_jack(&mut self, target: CardId, arena: &mut CardArena) -> EngineResult<Vec<CardId>> {
        let pos = self
            .cards
            .iter()
            .position(|&id| id == target)
            .ok_or_else(|| EngineError::invalid_play(format!("{target} is not in this caravan")))?;
        self.cards.remove(pos);

        let mut removed = vec![target];
        removed.extend(arena.card_mut(target)?.attached.drain(..));

        self.settle_after_removal(arena);
        Ok(removed)
    }

    /// Joker effect: targeting an Ace removes every other card of the
    /// Ace's suit from this caravan; targeting any other valued card
    /// removes every other card of equal numeric value. The target itself
    /// stays.
    ///
    /// Returns the removed ids (each followed by its attachments).
    pub fn apply_joker(&mut self, target: CardId, arena: &mut CardArena) -> EngineResult<Vec<CardId>> {
        if !self.contains(target) {
            return Err(EngineError::invalid_play(format!(
                "{target} is not in this caravan"
            )));
        }
        let target_card = arena.card(target)?;
        let by_suit = target_card.rank == Rank::Ace;
        let match_suit = target_card.suit;
        let match_value = target_card.numeric_value();

        let mut victims = Vec::new();
        self.cards.retain(|&id| {
            if id == target {
                return true;
            }
            let hit = arena.get(id).map_or(false, |c| {
                if by_suit {
                    c.suit == match_suit
                } else {
                    !c.is_face_card() && c.numeric_value() == match_value
                }
            });
            if hit {
                victims.push(id);
            }
            !hit
        });

        let mut removed = Vec::new();
        for id in victims {
            removed.push(id);
            removed.extend(arena.card_mut(id)?.attached.drain(..));
        }

        self.settle_after_removal(arena);
        Ok(removed)
    }

    /// Re-derive direction and bid after cards were removed mid-sequence.
    ///
    /// Fewer than two remaining valued cards clears the direction. When the
    /// two newly adjacent last valued cards are numerically equal the
    /// previous direction stands; otherwise it is recomputed from the pair.
    fn settle_after_removal(&mut self, arena: &CardArena) {
        let values: Vec<u32> = self
            .cards
            .iter()
            .filter_map(|&id| arena.get(id))
            .filter(|c| !c.is_face_card())
            .map(Card::numeric_value)
            .collect();

        if self.cards.is_empty() {
            self.suit = None;
        }
        if values.len() < 2 {
            self.direction = None;
        } else {
            let prev = values[values.len() - 2];
            let last = values[values.len() - 1];
            if prev != last {
                self.direction = Some(if last > prev {
                    Direction::Ascending
                } else {
                    Direction::Descending
                });
            }
        }

        self.recompute_bid(arena);
    }
}
