//! Player actions and their targets.
//!
//! Targets are decided at action-construction time: a `PlayCard` action
//! names either a caravan (extend the sequence) or a card (attach a face
//! card). The engine never infers the target kind from the card played.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::PlayerId;

/// Caravans per player.
pub const CARAVAN_COUNT: usize = 3;

/// Identifies one of a player's three caravans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaravanId {
    pub owner: PlayerId,
    /// Slot index, 0 to 2.
    pub slot: usize,
}

impl CaravanId {
    #[must_use]
    pub const fn new(owner: PlayerId, slot: usize) -> Self {
        Self { owner, slot }
    }
}

impl std::fmt::Display for CaravanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}'s caravan {}", self.owner, self.slot)
    }
}

/// What a played card is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Extend a caravan's sequence (valued cards and Queens).
    Caravan(CaravanId),
    /// Attach to a card already on a caravan (Jack, King, Joker).
    Card(CardId),
}

/// A single move by one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Play a card from hand at a target.
    PlayCard { card: CardId, target: Target },
    /// Empty one of your own caravans into your discard pile.
    DisbandCaravan { caravan: CaravanId },
    /// Discard a hand card and draw a replacement if the deck allows.
    DiscardDraw { card: CardId },
}

/// A move tagged with the player making it, as consumed by the turn loop
/// and produced by AI strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameAction {
    pub player: PlayerId,
    pub action: PlayerAction,
}

impl GameAction {
    #[must_use]
    pub const fn new(player: PlayerId, action: PlayerAction) -> Self {
        Self { player, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caravan_id_display() {
        let id = CaravanId::new(PlayerId::new(1), 2);
        assert_eq!(id.to_string(), "Player 1's caravan 2");
    }

    #[test]
    fn test_action_equality() {
        let a = GameAction::new(
            PlayerId::new(0),
            PlayerAction::DiscardDraw {
                card: CardId::new(3),
            },
        );
        assert_eq!(a, a);
        assert_ne!(
            a,
            GameAction::new(
                PlayerId::new(1),
                PlayerAction::DiscardDraw {
                    card: CardId::new(3),
                },
            )
        );
    }
}
