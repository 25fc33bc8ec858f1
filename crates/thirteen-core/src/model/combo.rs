//! Combination classification and the beat relation between combinations.

use crate::model::card::Card;
use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComboKind {
    Single,
    Pair,
    Triple,
    Quad,
    Straight,
    SeqPairs,
    Invalid,
}

impl ComboKind {
    pub const fn is_bomb(self) -> bool {
        matches!(self, ComboKind::Quad | ComboKind::SeqPairs)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ComboKind::Single => "Single",
            ComboKind::Pair => "Pair",
            ComboKind::Triple => "Triple",
            ComboKind::Quad => "Quad",
            ComboKind::Straight => "Straight",
            ComboKind::SeqPairs => "Consecutive Pairs",
            ComboKind::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for ComboKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived description of a set of cards. `value` is the value of the
/// highest card; `high` is that card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandIdentity {
    pub kind: ComboKind,
    pub value: u8,
    pub length: usize,
    pub high: Option<Card>,
}

impl HandIdentity {
    const INVALID: HandIdentity = HandIdentity {
        kind: ComboKind::Invalid,
        value: 0,
        length: 0,
        high: None,
    };

    pub fn is_valid(&self) -> bool {
        self.kind != ComboKind::Invalid
    }

    /// A single Two or a pair of Twos: the only combinations a bomb can beat.
    pub fn is_two_lead(&self) -> bool {
        matches!(self.kind, ComboKind::Single | ComboKind::Pair)
            && self.high.is_some_and(|card| card.is_two())
    }
}

pub fn identify(cards: &[Card]) -> HandIdentity {
    let mut sorted = cards.to_vec();
    sorted.sort_by_key(|card| card.value());
    let len = sorted.len();
    let Some(high) = sorted.last().copied() else {
        return HandIdentity::INVALID;
    };
    let ranks: Vec<u8> = sorted.iter().map(|card| card.rank.value()).collect();
    let same_rank = ranks.first() == ranks.last();

    let kind = match len {
        1 => ComboKind::Single,
        2 if same_rank => ComboKind::Pair,
        3 if same_rank => ComboKind::Triple,
        4 if same_rank => ComboKind::Quad,
        _ if len >= 3 && is_straight(&ranks) => ComboKind::Straight,
        _ if len >= 6 && len % 2 == 0 && is_seq_pairs(&ranks) => ComboKind::SeqPairs,
        _ => ComboKind::Invalid,
    };

    if kind == ComboKind::Invalid {
        return HandIdentity::INVALID;
    }

    HandIdentity {
        kind,
        value: high.value(),
        length: len,
        high: Some(high),
    }
}

fn contains_two(ranks: &[u8]) -> bool {
    ranks.contains(&Rank::Two.value())
}

fn is_straight(ranks: &[u8]) -> bool {
    !contains_two(ranks) && ranks.windows(2).all(|w| w[0] + 1 == w[1])
}

fn is_seq_pairs(ranks: &[u8]) -> bool {
    if contains_two(ranks) {
        return false;
    }
    let paired = ranks.chunks(2).all(|pair| pair[0] == pair[1]);
    let consecutive = ranks
        .chunks(2)
        .map(|pair| pair[0])
        .collect::<Vec<_>>()
        .windows(2)
        .all(|w| w[0] + 1 == w[1]);
    paired && consecutive
}

/// Whether `play` may be placed over `table` (`None` when leading).
pub fn beats(play: &[Card], table: Option<&[Card]>) -> bool {
    let table_identity = table.map(identify);
    beats_identity(&identify(play), table_identity.as_ref())
}

pub fn beats_identity(play: &HandIdentity, table: Option<&HandIdentity>) -> bool {
    if !play.is_valid() {
        return false;
    }
    let Some(table) = table else {
        return true;
    };

    if play.kind == table.kind && play.length == table.length {
        return play.value > table.value;
    }

    if !table.is_two_lead() {
        return false;
    }

    match (table.kind, play.kind) {
        (ComboKind::Single, ComboKind::Quad) => true,
        (ComboKind::Single, ComboKind::SeqPairs) => play.length >= 6,
        (ComboKind::Pair, ComboKind::Quad) => true,
        (ComboKind::Pair, ComboKind::SeqPairs) => play.length >= 8,
        _ => false,
    }
}

/// A bomb landing on a led Two.
pub fn is_chop(play: &HandIdentity, table: &HandIdentity) -> bool {
    table.is_two_lead() && play.kind.is_bomb() && beats_identity(play, Some(table))
}

/// Human readable name such as "Pair of Ks" or "3 Consecutive Pairs".
pub fn describe(cards: &[Card]) -> String {
    let identity = identify(cards);
    let Some(high) = identity.high else {
        return String::new();
    };
    let rank = high.rank;
    match identity.kind {
        ComboKind::Single => format!("Single {}", high.label()),
        ComboKind::Pair => format!("Pair of {rank}s"),
        ComboKind::Triple => format!("Triple {rank}s"),
        ComboKind::Quad => format!("Four of a Kind {rank}s"),
        ComboKind::Straight => format!("Straight {} High", high.label()),
        ComboKind::SeqPairs => format!("{} Consecutive Pairs", identity.length / 2),
        ComboKind::Invalid => String::new(),
    }
}
