//! Deck generation.
//!
//! A custom deck is a uniformly sampled set of cards, unique by the full
//! (rank, suit, theme) triple. With 14 ranks, 4 suits, and 9 themes there
//! are 504 distinct cards, comfortably above the maximum deck size.

use super::arena::{CardArena, CardId};
use super::attributes::{Rank, Suit, Theme};
use super::card::Card;
use crate::core::{EngineError, EngineResult, GameRng};

/// Smallest deck a player may bring to a game.
pub const DECK_MIN: usize = 30;
/// Largest deck a player may bring to a game.
pub const DECK_MAX: usize = 216;

/// Generate a random deck of `size` unique cards, allocating them in
/// `arena`. The returned ids are in draw order (last id drawn first).
/// Passing `include_face_cards: false` samples from valued ranks only.
pub fn generate_deck(
    size: usize,
    include_face_cards: bool,
    rng: &mut GameRng,
    arena: &mut CardArena,
) -> EngineResult<Vec<CardId>> {
    if !(DECK_MIN..=DECK_MAX).contains(&size) {
        return Err(EngineError::invalid_state(format!(
            "deck size {size} outside [{DECK_MIN}, {DECK_MAX}]"
        )));
    }

    let mut pool = Vec::with_capacity(Rank::ALL.len() * Suit::ALL.len() * Theme::ALL.len());
    for theme in Theme::ALL {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                if include_face_cards || !rank.is_face() {
                    pool.push((rank, suit, theme));
                }
            }
        }
    }
    rng.shuffle(&mut pool);

    Ok(pool
        .into_iter()
        .take(size)
        .map(|(rank, suit, theme)| arena.insert(Card::new(rank, suit, theme)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_deck_size_bounds() {
        let mut rng = GameRng::new(1);
        let mut arena = CardArena::new();
        assert!(generate_deck(29, true, &mut rng, &mut arena).is_err());
        assert!(generate_deck(217, true, &mut rng, &mut arena).is_err());
        assert!(generate_deck(30, true, &mut rng, &mut arena).is_ok());
        assert!(generate_deck(216, true, &mut rng, &mut arena).is_ok());
    }

    #[test]
    fn test_deck_cards_are_unique() {
        let mut rng = GameRng::new(7);
        let mut arena = CardArena::new();
        let deck = generate_deck(216, true, &mut rng, &mut arena).unwrap();

        let mut seen = HashSet::new();
        for id in &deck {
            let card = arena.get(*id).unwrap();
            assert!(seen.insert((card.rank, card.suit, card.theme)));
        }
        assert_eq!(seen.len(), 216);
    }

    #[test]
    fn test_valued_only_deck_has_no_faces() {
        let mut rng = GameRng::new(11);
        let mut arena = CardArena::new();
        let deck = generate_deck(216, false, &mut rng, &mut arena).unwrap();

        for id in &deck {
            assert!(!arena.get(*id).unwrap().is_face_card());
        }
    }

    #[test]
    fn test_deck_generation_is_deterministic() {
        let describe = |seed: u64| -> Vec<(Rank, Suit, Theme)> {
            let mut rng = GameRng::new(seed);
            let mut arena = CardArena::new();
            generate_deck(40, true, &mut rng, &mut arena)
                .unwrap()
                .iter()
                .map(|id| {
                    let c = arena.get(*id).unwrap();
                    (c.rank, c.suit, c.theme)
                })
                .collect()
        };

        assert_eq!(describe(42), describe(42));
        assert_ne!(describe(42), describe(43));
    }
}
