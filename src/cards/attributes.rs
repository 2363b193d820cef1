//! Card attributes: rank, suit, and cosmetic theme.
//!
//! Rank carries all rule-relevant data. Suit matters for sequencing and the
//! Joker-on-Ace effect; theme is purely cosmetic and only distinguishes
//! otherwise identical cards in a deck.

use serde::{Deserialize, Serialize};

/// Card rank. Ace through 10 are "valued" ranks with intrinsic numeric
/// value; Jack, Queen, King, and Joker are face ranks with value 0 and a
/// special effect instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Joker,
}

impl Rank {
    /// All ranks, valued ranks first.
    pub const ALL: [Rank; 14] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Joker,
    ];

    /// Intrinsic numeric value: Ace is 1, pip ranks are face value, face
    /// ranks are 0.
    #[must_use]
    pub const fn numeric_value(self) -> u32 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack | Rank::Queen | Rank::King | Rank::Joker => 0,
        }
    }

    /// Whether this rank is a face rank (Jack, Queen, King, Joker).
    #[must_use]
    pub const fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King | Rank::Joker)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rank::Ace => "Ace",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
            Rank::Joker => "Joker",
        };
        write!(f, "{name}")
    }
}

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All four suits.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Suit::Spades => "Spades",
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
        };
        write!(f, "{name}")
    }
}

/// Cosmetic card theme. Has no rule effect; distinguishes otherwise
/// identical (rank, suit) cards in a custom deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    Default,
    Vault21,
    UltraLuxe,
    SilverRush,
    TheTops,
    AtomicWrangler,
    Lucky38,
    Gomorrah,
    BisonSteve,
}

impl Theme {
    /// All themes.
    pub const ALL: [Theme; 9] = [
        Theme::Default,
        Theme::Vault21,
        Theme::UltraLuxe,
        Theme::SilverRush,
        Theme::TheTops,
        Theme::AtomicWrangler,
        Theme::Lucky38,
        Theme::Gomorrah,
        Theme::BisonSteve,
    ];
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Theme::Default => "Default",
            Theme::Vault21 => "Vault 21",
            Theme::UltraLuxe => "Ultra-Luxe",
            Theme::SilverRush => "Silver Rush",
            Theme::TheTops => "The Tops",
            Theme::AtomicWrangler => "Atomic Wrangler Casino",
            Theme::Lucky38 => "Lucky 38",
            Theme::Gomorrah => "Gomorrah",
            Theme::BisonSteve => "Bison Steve",
        };
        write!(f, "{name}")
    }
}
