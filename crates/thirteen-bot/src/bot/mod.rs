mod play;
mod structure;
mod swap;

pub use play::PlayPlanner;
pub use structure::structural_cards;
pub use swap::SwapPlanner;

use std::sync::OnceLock;
use thirteen_core::model::card::Card;
use thirteen_core::model::hand::Hand;
use thirteen_core::model::player::Seat;
use thirteen_core::model::rank::Rank;
use thirteen_core::model::round::RoundState;

/// Number of Twos in a deck.
pub const TWOS_IN_DECK: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    /// Plays the first legal move; leads its lowest card.
    EasyFirstLegal,
    #[default]
    NormalHeuristic,
}

impl BotDifficulty {
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| match std::env::var("THIRTEEN_BOT_DIFFICULTY") {
            Ok(raw) => Self::parse(&raw).unwrap_or_default(),
            Err(_) => BotDifficulty::default(),
        })
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" | "legacy" => Some(BotDifficulty::EasyFirstLegal),
            "normal" | "default" | "heuristic" => Some(BotDifficulty::NormalHeuristic),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::EasyFirstLegal => "easy",
            BotDifficulty::NormalHeuristic => "normal",
        }
    }
}

/// What a seat decided to do on its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Play(Vec<Card>),
    Pass,
    /// Already out of this trick; nothing to decide.
    Abstain,
}

/// Everything the decision rules look at, borrowed from the round.
#[derive(Debug, Clone, Copy)]
pub struct BotContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    /// Combination to beat. `None` when the seat is leading.
    pub table: Option<&'a [Card]>,
    pub has_passed: bool,
    /// Twos out of play: played this round, or sitting as the swap card.
    pub twos_seen: u8,
    pub opening_lead: bool,
}

impl<'a> BotContext<'a> {
    pub fn from_round(seat: Seat, round: &'a RoundState) -> Self {
        let swap_two = round.swap_card().is_some_and(|card| card.is_two());
        Self {
            seat,
            hand: round.hand(seat),
            table: round.table_for(seat),
            has_passed: round.has_passed(seat),
            twos_seen: round.twos_played() + u8::from(swap_two),
            opening_lead: round.opening_lead_required() && round.trick().is_empty(),
        }
    }

    pub fn is_leading(&self) -> bool {
        self.table.is_none()
    }

    /// Twos that may still turn up in an opponent's hand.
    pub fn twos_outstanding(&self) -> u8 {
        let own = self.hand.count_rank(Rank::Two) as u8;
        TWOS_IN_DECK.saturating_sub(self.twos_seen + own)
    }
}
