//! Game rules: actions, caravan sequencing, player move legality.

pub mod action;
pub mod caravan;
pub mod player;

pub use action::{CaravanId, GameAction, PlayerAction, Target, CARAVAN_COUNT};
pub use caravan::{Caravan, Direction, SOLD_MAX, SOLD_MIN};
pub use player::{MoveOptions, Player, HAND_SIZE, INITIAL_VALUED_CARDS};
