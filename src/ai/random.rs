//! Uniformly random move selection.

use crate::core::GameRng;
use crate::game::{GameView, Strategy};
use crate::rules::GameAction;

/// Picks uniformly among all legal moves. Happily self-detrimental; useful
/// as a baseline and for randomized play-through tests.
pub struct RandomStrategy {
    rng: GameRng,
}

impl RandomStrategy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn pick_move(&mut self, view: &GameView<'_>) -> Option<GameAction> {
        let moves = view.legal_moves();
        self.rng.choose(&moves).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    #[test]
    fn test_picks_a_legal_move() {
        let mut game = Game::with_generated_decks(9, 30).unwrap();
        game.start().unwrap();

        let view = game.view();
        let legal = view.legal_moves();

        let mut strategy = RandomStrategy::new(17);
        let picked = strategy.pick_move(&view).unwrap();
        assert!(legal.contains(&picked));
    }
}
