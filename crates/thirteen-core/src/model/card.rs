use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A playing card. Field order makes the derived ordering match [`Card::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const THREE_OF_SPADES: Card = Card::new(Rank::Three, Suit::Spades);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Total order used for every strength comparison: `rank * 4 + suit`.
    pub const fn value(self) -> u8 {
        self.rank.value() * 4 + self.suit.index()
    }

    pub const fn is_two(self) -> bool {
        self.rank.is_two()
    }

    pub const fn is_three_of_spades(self) -> bool {
        matches!(self.rank, Rank::Three) && matches!(self.suit, Suit::Spades)
    }

    /// Rank followed by the suit glyph, e.g. `K♥`.
    pub fn label(self) -> String {
        format!("{}{}", self.rank, self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised card '{0}'")]
pub struct CardParseError(pub String);

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let split = trimmed
            .char_indices()
            .last()
            .map(|(idx, _)| idx)
            .ok_or_else(|| CardParseError(raw.to_string()))?;
        let (rank_part, suit_part) = trimmed.split_at(split);
        let rank = Rank::from_symbol(rank_part).ok_or_else(|| CardParseError(raw.to_string()))?;
        let suit = Suit::from_symbol(suit_part).ok_or_else(|| CardParseError(raw.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

/// Parses a whitespace separated list such as `"3S 3C 4D"`.
pub fn parse_cards(raw: &str) -> Result<Vec<Card>, CardParseError> {
    raw.split_whitespace().map(str::parse).collect()
}
