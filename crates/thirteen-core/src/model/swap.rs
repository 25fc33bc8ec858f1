use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::Seat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Full circuits of uninterrupted swapping allowed before the phase closes.
const SWAP_CIRCUIT_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapChoice {
    Keep,
    /// Trade the seat's lowest card.
    SwapLowest,
    /// Trade a specific card.
    Swap(Card),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStep {
    Swapped { taken: Card, surrendered: Card },
    Kept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("swap phase already complete")]
    PhaseComplete,
    #[error("expected {expected} to decide but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{0} is not in hand")]
    CardNotInHand(Card),
    #[error("empty hand cannot swap")]
    EmptyHand,
}

/// The face-up card circulating during the pre-round swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapState {
    card: Card,
    turn: Seat,
    passes: usize,
    swaps: usize,
    seat_count: usize,
}

impl SwapState {
    pub fn new(card: Card, first: Seat, seat_count: usize) -> Self {
        Self {
            card,
            turn: first,
            passes: 0,
            swaps: 0,
            seat_count,
        }
    }

    pub fn card(&self) -> Card {
        self.card
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn swaps(&self) -> usize {
        self.swaps
    }

    /// Done once the card survives a full circuit, or the swap limit is hit.
    pub fn is_complete(&self) -> bool {
        self.passes >= self.seat_count || self.swaps >= self.seat_count * SWAP_CIRCUIT_LIMIT
    }

    pub fn submit(
        &mut self,
        seat: Seat,
        choice: SwapChoice,
        hand: &mut Hand,
    ) -> Result<SwapStep, SwapError> {
        if self.is_complete() {
            return Err(SwapError::PhaseComplete);
        }
        if seat != self.turn {
            return Err(SwapError::OutOfTurn {
                expected: self.turn,
                actual: seat,
            });
        }

        let surrendered = match choice {
            SwapChoice::Keep => None,
            SwapChoice::SwapLowest => Some(hand.lowest().ok_or(SwapError::EmptyHand)?),
            SwapChoice::Swap(card) => {
                if !hand.contains(card) {
                    return Err(SwapError::CardNotInHand(card));
                }
                Some(card)
            }
        };

        let step = match surrendered {
            Some(card) => {
                hand.remove(card);
                let taken = std::mem::replace(&mut self.card, card);
                hand.add(taken);
                self.passes = 0;
                self.swaps += 1;
                SwapStep::Swapped {
                    taken,
                    surrendered: card,
                }
            }
            None => {
                self.passes += 1;
                SwapStep::Kept
            }
        };

        self.turn = self.turn.next(self.seat_count);
        Ok(step)
    }
}
