use core::fmt;
use serde::{Deserialize, Serialize};

/// Suits in tie-break order: Spades lowest, Hearts highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Spades = 0,
    Clubs = 1,
    Diamonds = 2,
    Hearts = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Clubs, Suit::Diamonds, Suit::Hearts];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Spades),
            1 => Some(Suit::Clubs),
            2 => Some(Suit::Diamonds),
            3 => Some(Suit::Hearts),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "♠",
            Suit::Clubs => "♣",
            Suit::Diamonds => "♦",
            Suit::Hearts => "♥",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "S" | "s" | "♠" => Some(Suit::Spades),
            "C" | "c" | "♣" => Some(Suit::Clubs),
            "D" | "d" | "♦" => Some(Suit::Diamonds),
            "H" | "h" | "♥" => Some(Suit::Hearts),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Spades => "S",
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn display_returns_ascii_symbols() {
        assert_eq!(Suit::Spades.to_string(), "S");
        assert_eq!(Suit::Hearts.to_string(), "H");
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(0), Some(Suit::Spades));
        assert_eq!(Suit::from_index(4), None);
    }

    #[test]
    fn spades_break_ties_lowest() {
        assert!(Suit::Spades < Suit::Clubs);
        assert!(Suit::Diamonds < Suit::Hearts);
    }

    #[test]
    fn from_symbol_accepts_ascii_and_glyphs() {
        assert_eq!(Suit::from_symbol("h"), Some(Suit::Hearts));
        assert_eq!(Suit::from_symbol("♣"), Some(Suit::Clubs));
        assert_eq!(Suit::from_symbol("x"), None);
    }
}
