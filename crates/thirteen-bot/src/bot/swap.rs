use rand::Rng;
use thirteen_core::model::card::Card;
use thirteen_core::model::hand::Hand;
use thirteen_core::model::rank::Rank;
use thirteen_core::model::swap::SwapChoice;

/// Chance of taking an otherwise unremarkable swap card.
const SPECULATIVE_SWAP_PROBABILITY: f64 = 0.3;

pub struct SwapPlanner;

impl SwapPlanner {
    /// Whether to trade the seat's lowest card for the face-up swap card.
    pub fn choose<R: Rng + ?Sized>(hand: &Hand, offered: Card, rng: &mut R) -> (SwapChoice, &'static str) {
        let Some(lowest) = hand.lowest() else {
            return (SwapChoice::Keep, "empty_hand");
        };
        if offered.rank < Rank::Six {
            return (SwapChoice::Keep, "offer_too_low");
        }
        if offered.is_two() && !lowest.is_two() {
            return (SwapChoice::SwapLowest, "take_two");
        }
        if offered.rank == Rank::Ace && lowest.rank < Rank::Ten {
            return (SwapChoice::SwapLowest, "take_ace");
        }
        if hand.count_rank(offered.rank) > 0 {
            return (SwapChoice::SwapLowest, "complete_group");
        }
        if rng.gen_bool(SPECULATIVE_SWAP_PROBABILITY) {
            return (SwapChoice::SwapLowest, "speculative");
        }
        (SwapChoice::Keep, "keep")
    }
}
