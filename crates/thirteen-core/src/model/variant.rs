use core::fmt;
use serde::{Deserialize, Serialize};

/// Table format: four seats of thirteen, or three seats of seventeen with
/// one card left over for the swap phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    #[serde(alias = "13")]
    Thirteen,
    #[serde(alias = "17")]
    Seventeen,
}

impl Variant {
    pub const fn seat_count(self) -> usize {
        match self {
            Variant::Thirteen => 4,
            Variant::Seventeen => 3,
        }
    }

    pub const fn hand_size(self) -> usize {
        match self {
            Variant::Thirteen => 13,
            Variant::Seventeen => 17,
        }
    }

    pub const fn dealt_cards(self) -> usize {
        self.seat_count() * self.hand_size()
    }

    pub const fn has_swap_phase(self) -> bool {
        matches!(self, Variant::Seventeen)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Variant::Thirteen => "13",
            Variant::Seventeen => "17",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "13" | "thirteen" | "standard" => Some(Variant::Thirteen),
            "17" | "seventeen" | "swap" => Some(Variant::Seventeen),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Variant;
    use crate::model::deck::DECK_SIZE;

    #[test]
    fn thirteen_deals_the_whole_deck() {
        assert_eq!(Variant::Thirteen.dealt_cards(), DECK_SIZE);
        assert!(!Variant::Thirteen.has_swap_phase());
    }

    #[test]
    fn seventeen_leaves_one_card_for_the_swap() {
        assert_eq!(Variant::Seventeen.dealt_cards(), DECK_SIZE - 1);
        assert!(Variant::Seventeen.has_swap_phase());
    }

    #[test]
    fn from_str_parses_aliases() {
        assert_eq!(Variant::from_str("17"), Some(Variant::Seventeen));
        assert_eq!(Variant::from_str("Standard"), Some(Variant::Thirteen));
        assert_eq!(Variant::from_str("21"), None);
    }
}
