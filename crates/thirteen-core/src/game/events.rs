use crate::game::session::Rejection;
use crate::model::card::Card;
use crate::model::player::Seat;
use crate::model::variant::Variant;
use serde::{Deserialize, Serialize};

/// Notifications for observers. Queued by the session and handed out by
/// `GameSession::drain_events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStarted {
        round: u32,
        variant: Variant,
        deal_starter: Seat,
    },
    SwapPhaseStarted {
        first_seat: Seat,
        card: Card,
    },
    SwapTaken {
        seat: Seat,
        surrendered: Card,
    },
    SwapKept {
        seat: Seat,
    },
    SwapPhaseEnded {
        final_card: Card,
    },
    PlayingStarted {
        leader: Seat,
    },
    CardsPlayed {
        seat: Seat,
        cards: Vec<Card>,
        description: String,
    },
    /// A bomb landed on a led Two.
    Chop {
        seat: Seat,
        victim: Seat,
    },
    Passed {
        seat: Seat,
    },
    TrickWon {
        winner: Seat,
        description: String,
    },
    TurnChanged {
        seat: Seat,
    },
    PlayerFinished {
        seat: Seat,
        placement: usize,
    },
    RoundFinished {
        ranking: Vec<Seat>,
    },
    InvalidMoveAttempted {
        seat: Seat,
        reason: Rejection,
    },
    SessionEnded,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::RoundStarted { .. } => "round_started",
            GameEvent::SwapPhaseStarted { .. } => "swap_phase_started",
            GameEvent::SwapTaken { .. } => "swap_taken",
            GameEvent::SwapKept { .. } => "swap_kept",
            GameEvent::SwapPhaseEnded { .. } => "swap_phase_ended",
            GameEvent::PlayingStarted { .. } => "playing_started",
            GameEvent::CardsPlayed { .. } => "cards_played",
            GameEvent::Chop { .. } => "chop",
            GameEvent::Passed { .. } => "passed",
            GameEvent::TrickWon { .. } => "trick_won",
            GameEvent::TurnChanged { .. } => "turn_changed",
            GameEvent::PlayerFinished { .. } => "player_finished",
            GameEvent::RoundFinished { .. } => "round_finished",
            GameEvent::InvalidMoveAttempted { .. } => "invalid_move_attempted",
            GameEvent::SessionEnded => "session_ended",
        }
    }
}
