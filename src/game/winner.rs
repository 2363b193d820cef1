//! Win-condition evaluation.

use crate::core::PlayerId;
use crate::rules::{Player, CARAVAN_COUNT};

/// Evaluate the winner, if any.
///
/// A player whose opponent has run out of cards (empty hand and empty
/// deck) wins immediately, regardless of the board.
///
/// Otherwise the three caravan slots are compared pairwise. A slot where
/// both caravans are sold at the same bid is a tie, and any tie blocks a
/// win this evaluation. With no ties, a slot is credited to a player whose
/// caravan is sold there and either uncontested or the higher bid. A
/// player wins by holding strictly more sold caravans than the opponent
/// with at least two sold, or by leading the slot credits by at least two.
#[must_use]
pub fn check_for_winner(players: &[Player]) -> Option<PlayerId> {
    if players.len() != 2 {
        return None;
    }

    for player in players {
        if player.is_out_of_cards() {
            return Some(player.id().opponent());
        }
    }

    let mut sold = [0u32; 2];
    let mut credit = [0u32; 2];
    for slot in 0..CARAVAN_COUNT {
        let a = &players[0].caravans()[slot];
        let b = &players[1].caravans()[slot];

        if a.is_sold() && b.is_sold() && a.bid() == b.bid() {
            return None;
        }
        for (i, caravan) in [a, b].into_iter().enumerate() {
            if caravan.is_sold() {
                sold[i] += 1;
            }
        }
        match (a.is_sold(), b.is_sold()) {
            (true, false) => credit[0] += 1,
            (false, true) => credit[1] += 1,
            (true, true) if a.bid() > b.bid() => credit[0] += 1,
            (true, true) => credit[1] += 1,
            (false, false) => {}
        }
    }

    for (i, player) in players.iter().enumerate() {
        let opp = 1 - i;
        if sold[i] >= 2 && sold[i] > sold[opp] {
            return Some(player.id());
        }
        if credit[i] >= credit[opp] + 2 {
            return Some(player.id());
        }
    }
    None
}
