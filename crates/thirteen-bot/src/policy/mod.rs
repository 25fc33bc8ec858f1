mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::{BotContext, Decision};
use thirteen_core::model::player::Seat;
use thirteen_core::model::round::RoundState;
use thirteen_core::model::swap::SwapChoice;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub round: &'a RoundState,
}

impl<'a> PolicyContext<'a> {
    pub fn new(seat: Seat, round: &'a RoundState) -> Self {
        Self { seat, round }
    }

    pub fn bot_context(&self) -> BotContext<'a> {
        BotContext::from_round(self.seat, self.round)
    }
}

/// Decision interface for CPU seats
pub trait Policy: Send {
    /// Choose a combination, a pass, or nothing (called during play)
    fn choose_play(&mut self, ctx: &PolicyContext) -> Decision;

    /// Keep or take the circulating swap card (called during the swap phase)
    fn choose_swap(&mut self, ctx: &PolicyContext) -> SwapChoice;
}
