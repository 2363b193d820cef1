//! The "easy" opponent.

use crate::core::GameRng;
use crate::game::{GameView, Strategy};
use crate::rules::{GameAction, PlayerAction};

/// A pushover opponent for new players. Outside the opening round it
/// simply discards its first hand card every turn; during the opening
/// round it places cards at random.
pub struct EasyStrategy {
    rng: GameRng,
}

impl EasyStrategy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Strategy for EasyStrategy {
    fn pick_move(&mut self, view: &GameView<'_>) -> Option<GameAction> {
        if view.is_opening_round {
            let moves = view.legal_moves();
            return self.rng.choose(&moves).copied();
        }
        let card = view.current().hand().first().copied()?;
        Some(GameAction::new(
            view.current_player,
            PlayerAction::DiscardDraw { card },
        ))
    }
}
