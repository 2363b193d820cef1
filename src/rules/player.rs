//! Player state: hand, deck, discard pile, three caravans, and the
//! legal-move surface.
//!
//! All card containers hold arena ids. Every mutation moves an id from one
//! container to another; nothing is ever duplicated.

use serde::{Deserialize, Serialize};

use super::action::{CaravanId, GameAction, PlayerAction, Target, CARAVAN_COUNT};
use super::caravan::Caravan;
use crate::cards::{CardArena, CardId, Rank};
use crate::core::{EngineError, EngineResult, PlayerId};

/// Cards held in hand after the initial deal and between turns.
pub const HAND_SIZE: usize = 8;

/// Valued cards guaranteed in the initial deal.
pub const INITIAL_VALUED_CARDS: usize = 3;

/// Switches for [`Player::generate_possible_moves`]. Defaults enumerate
/// everything under normal-round rules.
#[derive(Clone, Copy, Debug)]
pub struct MoveOptions {
    pub opening_round: bool,
    pub consider_discard: bool,
    pub consider_face_cards: bool,
    pub consider_disband: bool,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            opening_round: false,
            consider_discard: true,
            consider_face_cards: true,
            consider_disband: true,
        }
    }
}

impl MoveOptions {
    /// Options for the opening round: non-face cards onto empty own
    /// caravans, nothing else.
    #[must_use]
    pub fn opening() -> Self {
        Self {
            opening_round: true,
            consider_discard: false,
            consider_face_cards: false,
            consider_disband: false,
        }
    }
}

/// One side of the table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    hand: Vec<CardId>,
    /// Draw pile; cards are drawn from the end.
    deck: Vec<CardId>,
    discard: Vec<CardId>,
    caravans: [Caravan; CARAVAN_COUNT],
}

impl Player {
    /// Create a player holding `deck`, with an empty hand and empty
    /// caravans.
    #[must_use]
    pub fn new(id: PlayerId, deck: Vec<CardId>) -> Self {
        Self {
            id,
            hand: Vec::new(),
            deck,
            discard: Vec::new(),
            caravans: Default::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn hand(&self) -> &[CardId] {
        &self.hand
    }

    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn discard_pile(&self) -> &[CardId] {
        &self.discard
    }

    #[must_use]
    pub fn caravans(&self) -> &[Caravan; CARAVAN_COUNT] {
        &self.caravans
    }

    pub fn caravan(&self, slot: usize) -> EngineResult<&Caravan> {
        self.caravans
            .get(slot)
            .ok_or_else(|| EngineError::invalid_play(format!("no caravan slot {slot}")))
    }

    pub fn caravan_mut(&mut self, slot: usize) -> EngineResult<&mut Caravan> {
        self.caravans
            .get_mut(slot)
            .ok_or_else(|| EngineError::invalid_play(format!("no caravan slot {slot}")))
    }

    /// Slot of the caravan currently containing `card`, if any.
    #[must_use]
    pub fn caravan_of_card(&self, card: CardId) -> Option<usize> {
        self.caravans.iter().position(|c| c.contains(card))
    }

    /// Out of cards entirely: empty hand and empty deck.
    #[must_use]
    pub fn is_out_of_cards(&self) -> bool {
        self.hand.is_empty() && self.deck.is_empty()
    }

    #[must_use]
    pub fn can_draw_card(&self) -> bool {
        !self.deck.is_empty()
    }

    /// Shuffle this player's draw pile.
    pub fn shuffle_deck(&mut self, rng: &mut crate::core::GameRng) {
        rng.shuffle(&mut self.deck);
    }

    /// Refresh every caravan bid from card state.
    pub fn recompute_bids(&mut self, arena: &CardArena) {
        for caravan in &mut self.caravans {
            caravan.recompute_bid(arena);
        }
    }

    /// Move the top deck card into the hand.
    pub fn draw_card(&mut self) -> EngineResult<CardId> {
        let id = self
            .deck
            .pop()
            .ok_or_else(|| EngineError::invalid_play("cannot draw from an empty deck"))?;
        self.hand.push(id);
        Ok(id)
    }

    /// Draw up to `n` cards, stopping early if the deck runs out.
    pub fn draw_hand(&mut self, n: usize) {
        for _ in 0..n {
            if self.draw_card().is_err() {
                break;
            }
        }
    }

    /// Initial deal: pull the first `INITIAL_VALUED_CARDS` valued cards
    /// out of the shuffled deck, then pad the hand to [`HAND_SIZE`] from
    /// the top.
    pub fn deal_initial_hand(&mut self, arena: &CardArena) {
        let mut taken = 0;
        let mut i = self.deck.len();
        while i > 0 && taken < INITIAL_VALUED_CARDS {
            i -= 1;
            let valued = arena.get(self.deck[i]).map_or(false, |c| !c.is_face_card());
            if valued {
                self.hand.push(self.deck.remove(i));
                taken += 1;
            }
        }
        while self.hand.len() < HAND_SIZE && self.can_draw_card() {
            let _ = self.draw_card();
        }
    }

    /// Valued cards currently in hand.
    #[must_use]
    pub fn valued_cards(&self, arena: &CardArena) -> Vec<CardId> {
        self.hand
            .iter()
            .copied()
            .filter(|&id| arena.get(id).map_or(false, |c| !c.is_face_card()))
            .collect()
    }

    #[must_use]
    pub fn hand_contains(&self, card: CardId) -> bool {
        self.hand.contains(&card)
    }

    /// Take `card` out of the hand.
    pub fn remove_from_hand(&mut self, card: CardId) -> EngineResult<()> {
        let pos = self
            .hand
            .iter()
            .position(|&id| id == card)
            .ok_or_else(|| EngineError::invalid_play(format!("{card} is not in hand")))?;
        self.hand.remove(pos);
        Ok(())
    }

    /// Append `ids` to the discard pile, flattening out any face cards
    /// still attached to them.
    pub fn discard_removed(&mut self, ids: Vec<CardId>, arena: &mut CardArena) {
        for id in ids {
            if let Some(card) = arena.get_mut(id) {
                let attached: Vec<CardId> = card.attached.drain(..).collect();
                self.discard.push(id);
                self.discard.extend(attached);
            } else {
                self.discard.push(id);
            }
        }
    }

    /// Discard a hand card without drawing.
    pub fn discard_card(&mut self, card: CardId) -> EngineResult<()> {
        self.remove_from_hand(card)?;
        self.discard.push(card);
        Ok(())
    }

    /// Play a hand card onto one of this player's own caravans. Only
    /// valued cards and Queens extend a caravan.
    pub fn play_card(&mut self, card: CardId, slot: usize, arena: &CardArena) -> EngineResult<()> {
        if !self.hand_contains(card) {
            return Err(EngineError::invalid_play(format!("{card} is not in hand")));
        }
        let played = arena.card(card)?;
        if played.is_face_card() && played.rank != Rank::Queen {
            return Err(EngineError::invalid_play(format!(
                "{played} must target a card, not a caravan"
            )));
        }
        self.caravan(slot)?;
        // Validate before touching the hand.
        if !self.caravans[slot].can_add_card(played, arena) {
            return Err(EngineError::invalid_play(format!(
                "{played} cannot extend caravan {slot}"
            )));
        }
        self.remove_from_hand(card)?;
        self.caravans[slot].add_card(card, arena)
    }

    #[must_use]
    pub fn can_disband_caravan(&self, slot: usize) -> bool {
        self.caravans.get(slot).map_or(false, |c| !c.is_empty())
    }

    /// Disband a caravan, moving its cards (attachments included) to this
    /// player's discard pile.
    pub fn disband_caravan(&mut self, slot: usize, arena: &mut CardArena) -> EngineResult<Vec<CardId>> {
        if !self.can_disband_caravan(slot) {
            return Err(EngineError::invalid_play(format!(
                "caravan {slot} cannot be disbanded"
            )));
        }
        let removed = self.caravan_mut(slot)?.disband();
        self.discard_removed(removed.clone(), arena);
        Ok(removed)
    }

    /// Enumerate every legal move for this player, without duplicates.
    ///
    /// Normal rounds produce four categories: a discard-draw per hand
    /// card, a caravan play per legal (valued hand card, own caravan)
    /// pair, a face-card attachment per legal (face hand card, board card)
    /// pair across both players' caravans, and a disband per own
    /// non-empty caravan. The opening round restricts to valued cards on
    /// empty own caravans.
    #[must_use]
    pub fn generate_possible_moves(
        &self,
        arena: &CardArena,
        opponent: &Player,
        options: MoveOptions,
    ) -> Vec<GameAction> {
        let mut moves = Vec::new();

        if options.consider_discard && !options.opening_round {
            for &card in &self.hand {
                moves.push(self.action(PlayerAction::DiscardDraw { card }));
            }
        }

        for &card in &self.hand {
            let Some(played) = arena.get(card) else { continue };
            if played.is_face_card() {
                continue;
            }
            for (slot, caravan) in self.caravans.iter().enumerate() {
                if options.opening_round && !caravan.is_empty() {
                    continue;
                }
                if caravan.can_add_card(played, arena) {
                    moves.push(self.action(PlayerAction::PlayCard {
                        card,
                        target: Target::Caravan(CaravanId::new(self.id, slot)),
                    }));
                }
            }
        }

        if options.consider_face_cards && !options.opening_round {
            for &card in &self.hand {
                let Some(face) = arena.get(card) else { continue };
                if !face.is_face_card() || face.rank == Rank::Queen {
                    continue;
                }
                let board = self
                    .caravans
                    .iter()
                    .chain(opponent.caravans.iter())
                    .flat_map(|c| c.cards().iter().copied());
                for target in board {
                    let attachable = arena
                        .get(target)
                        .map_or(false, |t| t.can_attach_face_card(face));
                    if attachable {
                        moves.push(self.action(PlayerAction::PlayCard {
                            card,
                            target: Target::Card(target),
                        }));
                    }
                }
            }
        }

        if options.consider_disband && !options.opening_round {
            for slot in 0..CARAVAN_COUNT {
                if self.can_disband_caravan(slot) {
                    moves.push(self.action(PlayerAction::DisbandCaravan {
                        caravan: CaravanId::new(self.id, slot),
                    }));
                }
            }
        }

        moves
    }

    fn action(&self, action: PlayerAction) -> GameAction {
        GameAction::new(self.id, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Suit, Theme};

    fn insert(arena: &mut CardArena, rank: Rank, suit: Suit) -> CardId {
        arena.insert(Card::new(rank, suit, Theme::Default))
    }

    fn player_with_hand(
        arena: &mut CardArena,
        id: u8,
        hand: &[(Rank, Suit)],
    ) -> Player {
        let mut player = Player::new(PlayerId::new(id), Vec::new());
        for &(rank, suit) in hand {
            let card = insert(arena, rank, suit);
            player.hand.push(card);
        }
        player
    }

    #[test]
    fn test_draw_from_empty_deck_fails() {
        let mut player = Player::new(PlayerId::new(0), Vec::new());
        assert!(!player.can_draw_card());
        assert!(matches!(
            player.draw_card(),
            Err(EngineError::InvalidPlay(_))
        ));
    }

    #[test]
    fn test_draw_hand_stops_at_deck_end() {
        let mut arena = CardArena::new();
        let deck: Vec<CardId> = (0..5)
            .map(|_| insert(&mut arena, Rank::Four, Suit::Clubs))
            .collect();
        let mut player = Player::new(PlayerId::new(0), deck);

        player.draw_hand(8);
        assert_eq!(player.hand().len(), 5);
        assert_eq!(player.deck_size(), 0);
    }

    #[test]
    fn test_initial_deal_guarantees_valued_cards() {
        let mut arena = CardArena::new();
        // Deck top (draw end) is all face cards; valued cards are buried.
        let mut deck = Vec::new();
        for _ in 0..5 {
            deck.push(insert(&mut arena, Rank::Five, Suit::Hearts));
        }
        for _ in 0..8 {
            deck.push(insert(&mut arena, Rank::King, Suit::Spades));
        }
        let mut player = Player::new(PlayerId::new(0), deck);

        player.deal_initial_hand(&arena);
        assert_eq!(player.hand().len(), HAND_SIZE);
        let valued = player.valued_cards(&arena);
        assert!(valued.len() >= INITIAL_VALUED_CARDS);
    }

    #[test]
    fn test_play_card_moves_hand_to_caravan() {
        let mut arena = CardArena::new();
        let mut player = player_with_hand(&mut arena, 0, &[(Rank::Seven, Suit::Diamonds)]);
        let card = player.hand()[0];

        player.play_card(card, 0, &arena).unwrap();
        assert!(player.hand().is_empty());
        assert!(player.caravans()[0].contains(card));
        assert_eq!(player.caravan_of_card(card), Some(0));
    }

    #[test]
    fn test_play_card_rejects_attachable_face_cards() {
        let mut arena = CardArena::new();
        let mut player = player_with_hand(&mut arena, 0, &[(Rank::Jack, Suit::Spades)]);
        let jack = player.hand()[0];

        let err = player.play_card(jack, 0, &arena).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPlay(_)));
        // Rejection leaves the hand untouched.
        assert!(player.hand_contains(jack));
    }

    #[test]
    fn test_play_card_not_in_hand() {
        let mut arena = CardArena::new();
        let mut player = Player::new(PlayerId::new(0), Vec::new());
        let loose = insert(&mut arena, Rank::Four, Suit::Clubs);

        assert!(matches!(
            player.play_card(loose, 0, &arena),
            Err(EngineError::InvalidPlay(_))
        ));
    }

    #[test]
    fn test_disband_moves_cards_and_attachments_to_discard() {
        let mut arena = CardArena::new();
        let mut player = player_with_hand(
            &mut arena,
            0,
            &[(Rank::Seven, Suit::Diamonds), (Rank::Nine, Suit::Diamonds)],
        );
        let seven = player.hand()[0];
        let nine = player.hand()[1];
        player.play_card(seven, 0, &arena).unwrap();
        player.play_card(nine, 0, &arena).unwrap();
        let king = insert(&mut arena, Rank::King, Suit::Spades);
        arena.attach_face_card(seven, king).unwrap();

        assert!(player.can_disband_caravan(0));
        player.disband_caravan(0, &mut arena).unwrap();

        assert!(player.caravans()[0].is_empty());
        assert_eq!(player.discard_pile(), &[seven, king, nine]);
        assert!(arena.get(seven).unwrap().attached.is_empty());
    }

    #[test]
    fn test_cannot_disband_empty_caravan() {
        let player = Player::new(PlayerId::new(0), Vec::new());
        assert!(!player.can_disband_caravan(0));
        assert!(!player.can_disband_caravan(7));
    }

    #[test]
    fn test_move_enumeration_normal_round() {
        let mut arena = CardArena::new();
        let mut player = player_with_hand(
            &mut arena,
            0,
            &[
                (Rank::Seven, Suit::Diamonds),
                (Rank::King, Suit::Spades),
                (Rank::Queen, Suit::Hearts),
            ],
        );
        let mut opponent = player_with_hand(&mut arena, 1, &[(Rank::Five, Suit::Clubs)]);
        let opp_five = opponent.hand()[0];
        opponent.play_card(opp_five, 0, &arena).unwrap();

        // Give the player a board presence to attach to and disband.
        let own_three = insert(&mut arena, Rank::Three, Suit::Hearts);
        player.hand.push(own_three);
        player.play_card(own_three, 1, &arena).unwrap();

        let moves = player.generate_possible_moves(&arena, &opponent, MoveOptions::default());

        // 3 discard-draws (one per hand card).
        let discards = moves
            .iter()
            .filter(|m| matches!(m.action, PlayerAction::DiscardDraw { .. }))
            .count();
        assert_eq!(discards, 3);

        // The 7 can extend slots 0 and 2 (empty) and slot 1 (3 then 7
        // ascends). Queens and Kings are not enumerated as caravan plays.
        let caravan_plays = moves
            .iter()
            .filter(|m| {
                matches!(
                    m.action,
                    PlayerAction::PlayCard {
                        target: Target::Caravan(_),
                        ..
                    }
                )
            })
            .count();
        assert_eq!(caravan_plays, 3);

        // The King can attach to the own 3 and the opponent's 5.
        let attaches: Vec<_> = moves
            .iter()
            .filter(|m| {
                matches!(
                    m.action,
                    PlayerAction::PlayCard {
                        target: Target::Card(_),
                        ..
                    }
                )
            })
            .collect();
        assert_eq!(attaches.len(), 2);

        // One disband, for the single non-empty own caravan.
        let disbands = moves
            .iter()
            .filter(|m| matches!(m.action, PlayerAction::DisbandCaravan { .. }))
            .count();
        assert_eq!(disbands, 1);

        // Exhaustive and duplicate-free.
        let mut dedup = moves.clone();
        dedup.sort_by_key(|m| format!("{m:?}"));
        dedup.dedup();
        assert_eq!(dedup.len(), moves.len());
    }

    #[test]
    fn test_move_enumeration_opening_round() {
        let mut arena = CardArena::new();
        let mut player = player_with_hand(
            &mut arena,
            0,
            &[
                (Rank::Seven, Suit::Diamonds),
                (Rank::King, Suit::Spades),
            ],
        );
        let opponent = Player::new(PlayerId::new(1), Vec::new());

        // One caravan already occupied: no longer an opening target.
        let three = insert(&mut arena, Rank::Three, Suit::Hearts);
        player.hand.push(three);
        player.play_card(three, 0, &arena).unwrap();

        let moves = player.generate_possible_moves(&arena, &opponent, MoveOptions::opening());

        // Only the 7 on the two empty caravans; no discard, no attach, no
        // disband.
        assert_eq!(moves.len(), 2);
        for m in &moves {
            match m.action {
                PlayerAction::PlayCard {
                    target: Target::Caravan(cid),
                    ..
                } => assert_ne!(cid.slot, 0),
                other => panic!("unexpected opening move {other:?}"),
            }
        }
    }
}
