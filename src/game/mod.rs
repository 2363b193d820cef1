//! The turn and round state machine.
//!
//! A game is assembled in `Setup`, moves through `OpeningRound` into
//! `NormalRound` once each player has placed three cards, and ends in
//! `Over`, which is terminal. Every accepted action flows the same way:
//! validate, apply through the owning player, publish the resulting events,
//! let subscribed handlers apply secondary effects, refresh bids, evaluate
//! the win condition, advance the turn.

use crate::cards::{generate_deck, CardArena, CardId, Rank, DECK_MAX, DECK_MIN};
use crate::core::{EngineError, EngineResult, GameRng, PlayerId, PLAYER_COUNT};
use crate::events::{EventBus, EventKind, GameEvent, HandlerId};
use crate::rules::{CaravanId, GameAction, MoveOptions, Player, PlayerAction, Target};

mod winner;

pub use winner::check_for_winner;

/// Turns in the opening round, three per player.
pub const OPENING_TURNS: u32 = 6;

/// Lifecycle phase. Monotonic; `Over` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Setup,
    OpeningRound,
    NormalRound,
    Over,
}

/// Read-only snapshot handed to AI strategies.
pub struct GameView<'a> {
    pub players: &'a [Player],
    pub arena: &'a CardArena,
    pub current_player: PlayerId,
    pub is_opening_round: bool,
}

impl GameView<'_> {
    /// The player whose turn it is.
    #[must_use]
    pub fn current(&self) -> &Player {
        &self.players[self.current_player.index()]
    }

    /// The other player.
    #[must_use]
    pub fn opponent(&self) -> &Player {
        &self.players[self.current_player.opponent().index()]
    }

    /// Every legal move for the current player under the current phase.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<GameAction> {
        let options = if self.is_opening_round {
            MoveOptions::opening()
        } else {
            MoveOptions::default()
        };
        self.current()
            .generate_possible_moves(self.arena, self.opponent(), options)
    }
}

/// Picks the next move for an automated player.
pub trait Strategy {
    /// Choose a move for the current player, or `None` when no legal move
    /// exists.
    fn pick_move(&mut self, view: &GameView<'_>) -> Option<GameAction>;
}

/// A full two-player match.
pub struct Game {
    arena: CardArena,
    players: Vec<Player>,
    bus: EventBus,
    rng: GameRng,
    current_player: PlayerId,
    current_round: u32,
    phase: GamePhase,
    strategy: Option<Box<dyn Strategy>>,
}

impl Game {
    /// Create an empty game in `Setup`. Players must be added before
    /// [`Game::start`].
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::JackPlayed, HandlerId::JackEffect);
        bus.subscribe(EventKind::KingPlayed, HandlerId::KingEffect);
        bus.subscribe(EventKind::JokerPlayedOnAce, HandlerId::JokerEffect);
        bus.subscribe(EventKind::JokerPlayedOnNumber, HandlerId::JokerEffect);
        bus.subscribe(EventKind::BidsRecompute, HandlerId::BidRecompute);

        Self {
            arena: CardArena::new(),
            players: Vec::new(),
            bus,
            rng: GameRng::new(seed),
            current_player: PlayerId::new(0),
            current_round: 0,
            phase: GamePhase::Setup,
            strategy: None,
        }
    }

    /// Create a game with two players holding freshly generated decks of
    /// `deck_size` cards each.
    pub fn with_generated_decks(seed: u64, deck_size: usize) -> EngineResult<Self> {
        let mut game = Self::new(seed);
        for _ in 0..PLAYER_COUNT {
            let deck = generate_deck(deck_size, true, &mut game.rng, &mut game.arena)?;
            game.add_player(deck)?;
        }
        Ok(game)
    }

    /// Register a player holding `deck` (arena ids). Fails once the table
    /// is full or the game has started.
    pub fn add_player(&mut self, deck: Vec<CardId>) -> EngineResult<PlayerId> {
        if self.phase != GamePhase::Setup {
            return Err(self.state_failure("players can only join before the game starts"));
        }
        if self.players.len() >= PLAYER_COUNT {
            return Err(self.state_failure("the table is full"));
        }
        let id = PlayerId::new(self.players.len() as u8);
        self.players.push(Player::new(id, deck));
        Ok(id)
    }

    /// Cards allocated for this game.
    #[must_use]
    pub fn arena(&self) -> &CardArena {
        &self.arena
    }

    /// Allocate cards directly, for assembling custom decks.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut CardArena {
        &mut self.arena
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> EngineResult<&Player> {
        self.players
            .get(id.index())
            .ok_or_else(|| EngineError::invalid_state(format!("{id} has not joined")))
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Completed turns since the game started.
    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_opening_round(&self) -> bool {
        self.phase == GamePhase::OpeningRound
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Events published so far, oldest first.
    #[must_use]
    pub fn event_history(&self) -> &im::Vector<GameEvent> {
        self.bus.history()
    }

    /// Install the strategy used by [`Game::next_ai_move`].
    pub fn set_strategy(&mut self, strategy: Box<dyn Strategy>) {
        self.strategy = Some(strategy);
    }

    /// Snapshot of the game as strategies see it.
    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        GameView {
            players: &self.players,
            arena: &self.arena,
            current_player: self.current_player,
            is_opening_round: self.is_opening_round(),
        }
    }

    /// Shuffle decks, deal opening hands, and enter the opening round.
    ///
    /// Requires exactly two players, each with a deck of
    /// [`DECK_MIN`]..=[`DECK_MAX`] cards. The deal guarantees three valued
    /// cards and pads each hand to [`crate::rules::HAND_SIZE`].
    pub fn start(&mut self) -> EngineResult<()> {
        if self.phase != GamePhase::Setup {
            return Err(self.state_failure("the game has already started"));
        }
        if self.players.len() != PLAYER_COUNT {
            return Err(self.state_failure(format!(
                "a game needs exactly {PLAYER_COUNT} players, found {}",
                self.players.len()
            )));
        }
        for player in &self.players {
            let size = player.deck_size();
            if !(DECK_MIN..=DECK_MAX).contains(&size) {
                return Err(self.state_failure(format!(
                    "{} brought a deck of {size} cards, outside [{DECK_MIN}, {DECK_MAX}]",
                    player.id()
                )));
            }
        }

        for player in &mut self.players {
            player.shuffle_deck(&mut self.rng);
            player.deal_initial_hand(&self.arena);
        }

        self.phase = GamePhase::OpeningRound;
        log::info!("game started, {} to move", self.current_player);
        self.publish(GameEvent::GameStarted)
    }

    /// Force the game into `Over`, evaluating the winner as it stands.
    pub fn end(&mut self) -> EngineResult<()> {
        if self.phase == GamePhase::Over {
            return Ok(());
        }
        let winner = self.check_for_winner();
        self.phase = GamePhase::Over;
        log::info!("game ended, winner: {winner:?}");
        self.publish(GameEvent::GameOver { winner })
    }

    /// Evaluate the win condition without mutating anything.
    #[must_use]
    pub fn check_for_winner(&self) -> Option<PlayerId> {
        check_for_winner(&self.players)
    }

    /// Let the installed strategy take the current player's turn.
    pub fn next_ai_move(&mut self) -> EngineResult<()> {
        let mut strategy = self
            .strategy
            .take()
            .ok_or_else(|| self.state_failure("no AI strategy is set"))?;
        let picked = strategy.pick_move(&self.view());
        self.strategy = Some(strategy);

        let action =
            picked.ok_or_else(|| self.state_failure("the strategy produced no move"))?;
        self.play_turn(action)
    }

    /// Validate and apply one move, then advance the turn.
    pub fn play_turn(&mut self, action: GameAction) -> EngineResult<()> {
        match self.play_turn_inner(action) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    fn play_turn_inner(&mut self, action: GameAction) -> EngineResult<()> {
        match self.phase {
            GamePhase::Setup => {
                return Err(EngineError::invalid_state("the game has not started"))
            }
            GamePhase::Over => {
                return Err(EngineError::invalid_state("the game is over"))
            }
            GamePhase::OpeningRound | GamePhase::NormalRound => {}
        }
        if action.player != self.current_player {
            return Err(EngineError::invalid_play(format!(
                "it is {}'s turn, not {}'s",
                self.current_player, action.player
            )));
        }
        log::debug!("{} plays {:?}", action.player, action.action);

        match action.action {
            PlayerAction::PlayCard { card, target } => match target {
                Target::Caravan(caravan) => self.play_to_caravan(action.player, card, caravan)?,
                Target::Card(target) => self.play_to_card(action.player, card, target)?,
            },
            PlayerAction::DisbandCaravan { caravan } => {
                self.disband_caravan(action.player, caravan)?;
            }
            PlayerAction::DiscardDraw { card } => self.discard_draw(action.player, card)?,
        }

        self.publish(GameEvent::BidsRecompute)?;

        if let Some(winner) = self.check_for_winner() {
            self.phase = GamePhase::Over;
            log::info!("{winner} wins");
            return self.publish(GameEvent::GameOver {
                winner: Some(winner),
            });
        }

        self.current_player = self.current_player.opponent();
        self.current_round += 1;
        if self.phase == GamePhase::OpeningRound && self.current_round >= OPENING_TURNS {
            self.phase = GamePhase::NormalRound;
            log::debug!("opening round complete");
        }
        self.publish(GameEvent::NextTurn {
            player: self.current_player,
        })
    }

    fn play_to_caravan(
        &mut self,
        actor: PlayerId,
        card: CardId,
        caravan: CaravanId,
    ) -> EngineResult<()> {
        if caravan.owner != actor {
            return Err(EngineError::invalid_play(
                "cards can only extend your own caravans",
            ));
        }
        let played = self.arena.card(card)?;
        let is_queen = played.rank == Rank::Queen;
        if self.phase == GamePhase::OpeningRound {
            if played.is_face_card() {
                return Err(EngineError::invalid_play(
                    "only valued cards may be played during the opening round",
                ));
            }
            if !self.player(actor)?.caravan(caravan.slot)?.is_empty() {
                return Err(EngineError::invalid_play(
                    "opening plays must target an empty caravan",
                ));
            }
        }

        self.players[actor.index()].play_card(card, caravan.slot, &self.arena)?;

        if is_queen {
            self.publish(GameEvent::QueenPlayed {
                player: actor,
                queen: card,
                caravan,
            })?;
        }
        Ok(())
    }

    fn play_to_card(&mut self, actor: PlayerId, card: CardId, target: CardId) -> EngineResult<()> {
        if self.phase == GamePhase::OpeningRound {
            return Err(EngineError::invalid_play(
                "face cards may not be played during the opening round",
            ));
        }
        if !self.player(actor)?.hand_contains(card) {
            return Err(EngineError::invalid_play(format!("{card} is not in hand")));
        }
        let caravan = self.locate_board_card(target)?;

        let face = self.arena.card(card)?;
        let target_card = self.arena.card(target)?;
        if !target_card.can_attach_face_card(face) {
            return Err(EngineError::invalid_play(format!(
                "cannot attach {face} to {target_card}"
            )));
        }
        let rank = face.rank;
        let target_is_ace = target_card.rank == Rank::Ace;

        self.players[actor.index()].remove_from_hand(card)?;

        match rank {
            Rank::King => self.publish(GameEvent::KingPlayed {
                player: actor,
                king: card,
                target,
                caravan,
            }),
            Rank::Jack => self.publish(GameEvent::JackPlayed {
                player: actor,
                jack: card,
                target,
                caravan,
            }),
            Rank::Joker if target_is_ace => self.publish(GameEvent::JokerPlayedOnAce {
                player: actor,
                joker: card,
                target,
                caravan,
            }),
            Rank::Joker => self.publish(GameEvent::JokerPlayedOnNumber {
                player: actor,
                joker: card,
                target,
                caravan,
            }),
            // can_attach_face_card admits only Jacks, Kings, and Jokers.
            other => Err(EngineError::invalid_state(format!(
                "{other} passed the attachment check"
            ))),
        }
    }

    fn disband_caravan(&mut self, actor: PlayerId, caravan: CaravanId) -> EngineResult<()> {
        if self.phase == GamePhase::OpeningRound {
            return Err(EngineError::invalid_play(
                "caravans may not be disbanded during the opening round",
            ));
        }
        if caravan.owner != actor {
            return Err(EngineError::invalid_play(
                "only your own caravans can be disbanded",
            ));
        }
        let removed =
            self.players[actor.index()].disband_caravan(caravan.slot, &mut self.arena)?;
        self.publish(GameEvent::CaravanDisbanded { caravan })?;
        for card in removed {
            self.publish(GameEvent::CardDiscarded {
                player: actor,
                card,
            })?;
        }
        Ok(())
    }

    fn discard_draw(&mut self, actor: PlayerId, card: CardId) -> EngineResult<()> {
        if self.phase == GamePhase::OpeningRound {
            return Err(EngineError::invalid_play(
                "discarding is not legal during the opening round",
            ));
        }
        let player = &mut self.players[actor.index()];
        player.discard_card(card)?;
        if player.can_draw_card() {
            player.draw_card()?;
        }
        self.publish(GameEvent::CardDiscarded {
            player: actor,
            card,
        })
    }

    /// Record `event` in the session history and run its subscribed
    /// handlers synchronously, in subscription order. Handlers may publish
    /// further events; those nest on the call stack.
    pub fn publish(&mut self, event: GameEvent) -> EngineResult<()> {
        log::trace!("event {event:?}");
        self.bus.record(event.clone());
        for handler in self.bus.subscribers_for(event.kind()) {
            self.invoke(handler, &event)?;
        }
        Ok(())
    }

    fn invoke(&mut self, handler: HandlerId, event: &GameEvent) -> EngineResult<()> {
        match (handler, event) {
            (
                HandlerId::KingEffect,
                GameEvent::KingPlayed { king, target, .. },
            ) => {
                self.arena.attach_face_card(*target, *king)?;
                self.publish(GameEvent::BidsRecompute)
            }
            (
                HandlerId::JackEffect,
                GameEvent::JackPlayed {
                    jack, target, caravan, ..
                },
            ) => {
                let owner = caravan.owner;
                let mut removed = self.players[owner.index()]
                    .caravan_mut(caravan.slot)?
                    .apply_jack(*target, &mut self.arena)?;
                removed.push(*jack);
                self.players[owner.index()].discard_removed(removed.clone(), &mut self.arena);
                for card in removed {
                    self.publish(GameEvent::CardDiscarded {
                        player: owner,
                        card,
                    })?;
                }
                Ok(())
            }
            (
                HandlerId::JokerEffect,
                GameEvent::JokerPlayedOnAce {
                    player,
                    joker,
                    target,
                    caravan,
                }
                | GameEvent::JokerPlayedOnNumber {
                    player,
                    joker,
                    target,
                    caravan,
                },
            ) => {
                let owner = caravan.owner;
                let removed = self.players[owner.index()]
                    .caravan_mut(caravan.slot)?
                    .apply_joker(*target, &mut self.arena)?;
                self.players[owner.index()].discard_removed(removed.clone(), &mut self.arena);
                self.players[player.index()].discard_removed(vec![*joker], &mut self.arena);
                for card in removed {
                    self.publish(GameEvent::CardDiscarded {
                        player: owner,
                        card,
                    })?;
                }
                self.publish(GameEvent::CardDiscarded {
                    player: *player,
                    card: *joker,
                })
            }
            (HandlerId::BidRecompute, GameEvent::BidsRecompute) => {
                for player in &mut self.players {
                    player.recompute_bids(&self.arena);
                }
                Ok(())
            }
            // A handler subscribed to an event it does not understand is
            // inert.
            _ => Ok(()),
        }
    }

    fn locate_board_card(&self, id: CardId) -> EngineResult<CaravanId> {
        for player in &self.players {
            if let Some(slot) = player.caravan_of_card(id) {
                return Ok(CaravanId::new(player.id(), slot));
            }
        }
        Err(EngineError::invalid_play(format!(
            "{id} is not on any caravan"
        )))
    }

    fn state_failure(&mut self, msg: impl Into<String>) -> EngineError {
        let err = EngineError::invalid_state(msg);
        self.record_failure(&err);
        err
    }

    fn record_failure(&mut self, err: &EngineError) {
        log::debug!("rejected: {err}");
        match err {
            EngineError::InvalidPlay(reason) => self.bus.record(GameEvent::InvalidPlay {
                reason: reason.clone(),
            }),
            EngineError::InvalidGameState(reason) => {
                self.bus.record(GameEvent::InvalidGameState {
                    reason: reason.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Suit, Theme};
    use crate::rules::HAND_SIZE;

    fn deck_of(arena: &mut CardArena, n: usize) -> Vec<CardId> {
        // Alternating valued ranks keep the deal and caravan plays legal.
        let ranks = [Rank::Two, Rank::Five, Rank::Seven, Rank::Nine];
        let suits = Suit::ALL;
        (0..n)
            .map(|i| {
                arena.insert(Card::new(
                    ranks[i % ranks.len()],
                    suits[(i / ranks.len()) % suits.len()],
                    Theme::ALL[i % Theme::ALL.len()],
                ))
            })
            .collect()
    }

    fn started_game() -> Game {
        let mut game = Game::new(42);
        let deck_a = deck_of(&mut game.arena, 30);
        let deck_b = deck_of(&mut game.arena, 30);
        game.add_player(deck_a).unwrap();
        game.add_player(deck_b).unwrap();
        game.start().unwrap();
        game
    }

    #[test]
    fn test_start_requires_two_players() {
        let mut game = Game::new(1);
        assert!(matches!(
            game.start(),
            Err(EngineError::InvalidGameState(_))
        ));

        let deck = deck_of(&mut game.arena, 30);
        game.add_player(deck).unwrap();
        assert!(matches!(
            game.start(),
            Err(EngineError::InvalidGameState(_))
        ));
    }

    #[test]
    fn test_start_validates_deck_size() {
        let mut game = Game::new(1);
        let small = deck_of(&mut game.arena, 29);
        let fine = deck_of(&mut game.arena, 30);
        game.add_player(small).unwrap();
        game.add_player(fine).unwrap();

        assert!(matches!(
            game.start(),
            Err(EngineError::InvalidGameState(_))
        ));
    }

    #[test]
    fn test_start_deals_full_hands() {
        let game = started_game();
        for player in game.players() {
            assert_eq!(player.hand().len(), HAND_SIZE);
            assert!(player.valued_cards(game.arena()).len() >= 3);
        }
        assert!(game.is_opening_round());
        assert_eq!(game.event_history().front(), Some(&GameEvent::GameStarted));
    }

    #[test]
    fn test_third_player_rejected() {
        let mut game = Game::new(1);
        for _ in 0..2 {
            let deck = deck_of(&mut game.arena, 30);
            game.add_player(deck).unwrap();
        }
        let extra = deck_of(&mut game.arena, 30);
        assert!(matches!(
            game.add_player(extra),
            Err(EngineError::InvalidGameState(_))
        ));
    }

    #[test]
    fn test_wrong_player_rejected() {
        let mut game = started_game();
        let opponent = game.current_player().opponent();
        let card = game.player(opponent).unwrap().hand()[0];
        let action = GameAction::new(
            opponent,
            PlayerAction::PlayCard {
                card,
                target: Target::Caravan(CaravanId::new(opponent, 0)),
            },
        );

        assert!(matches!(
            game.play_turn(action),
            Err(EngineError::InvalidPlay(_))
        ));
        // The rejection is visible on the bus.
        assert!(matches!(
            game.event_history().back(),
            Some(GameEvent::InvalidPlay { .. })
        ));
    }

    #[test]
    fn test_opening_round_restrictions() {
        let mut game = started_game();
        let actor = game.current_player();
        let card = game.player(actor).unwrap().hand()[0];

        // No discarding during the opening round.
        let discard = GameAction::new(actor, PlayerAction::DiscardDraw { card });
        assert!(matches!(
            game.play_turn(discard),
            Err(EngineError::InvalidPlay(_))
        ));

        // No disbanding either.
        let disband = GameAction::new(
            actor,
            PlayerAction::DisbandCaravan {
                caravan: CaravanId::new(actor, 0),
            },
        );
        assert!(matches!(
            game.play_turn(disband),
            Err(EngineError::InvalidPlay(_))
        ));
    }

    #[test]
    fn test_opening_round_lasts_six_turns() {
        let mut game = started_game();
        for turn in 0..OPENING_TURNS {
            assert!(game.is_opening_round(), "turn {turn} should be opening");
            let action = game.view().legal_moves()[0];
            game.play_turn(action).unwrap();
        }
        assert_eq!(game.phase(), GamePhase::NormalRound);
        assert_eq!(game.current_round(), OPENING_TURNS);
    }

    #[test]
    fn test_action_after_game_over_rejected() {
        let mut game = started_game();
        game.end().unwrap();
        assert!(game.is_over());
        assert!(matches!(
            game.event_history().back(),
            Some(GameEvent::GameOver { .. })
        ));

        let actor = game.current_player();
        let card = game.player(actor).unwrap().hand()[0];
        let action = GameAction::new(actor, PlayerAction::DiscardDraw { card });
        assert!(matches!(
            game.play_turn(action),
            Err(EngineError::InvalidGameState(_))
        ));
    }

    #[test]
    fn test_next_ai_move_requires_strategy() {
        let mut game = started_game();
        assert!(matches!(
            game.next_ai_move(),
            Err(EngineError::InvalidGameState(_))
        ));
    }
}
