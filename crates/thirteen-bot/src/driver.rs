//! Carries out a scheduled CPU turn against a live session.

use crate::bot::Decision;
use crate::policy::{Policy, PolicyContext};
use thirteen_core::game::schedule::{CpuTurn, TurnPhase};
use thirteen_core::game::session::{CpuAction, CpuOutcome, GameSession, Rejection};
use thirteen_core::model::player::Seat;
use thirteen_core::model::round::RoundState;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub seat: Seat,
    pub action: CpuAction,
    pub outcome: CpuOutcome,
}

/// Decides and applies the ticketed turn. The caller is expected to have
/// waited out `ticket.delay` already; a ticket that went stale meanwhile is
/// rejected without touching the session.
pub fn run_cpu_turn(
    session: &mut GameSession,
    ticket: &CpuTurn,
    policy: &mut dyn Policy,
) -> Result<TurnReport, Rejection> {
    if !session.is_live(ticket) {
        return Err(Rejection::StaleTicket);
    }
    let round = session.round().ok_or(Rejection::StaleTicket)?;
    let ctx = PolicyContext::new(ticket.seat, round);

    let action = match ticket.phase {
        TurnPhase::Swap => CpuAction::Swap(policy.choose_swap(&ctx)),
        TurnPhase::Play => match policy.choose_play(&ctx) {
            Decision::Play(cards) => CpuAction::Play(cards),
            Decision::Pass => CpuAction::Pass,
            Decision::Abstain => CpuAction::Abstain,
        },
    };
    let fallback = fallback_action(round, ticket.seat);

    match session.apply_cpu_action(ticket, action.clone()) {
        Ok(outcome) => Ok(TurnReport {
            seat: ticket.seat,
            action,
            outcome,
        }),
        Err(Rejection::StaleTicket) => Err(Rejection::StaleTicket),
        Err(reason) => {
            let Some(fallback) = fallback else {
                return Err(reason);
            };
            warn!(seat = ticket.seat.0, %reason, ?action, "cpu action rejected, falling back");
            let outcome = session.apply_cpu_action(ticket, fallback.clone())?;
            Ok(TurnReport {
                seat: ticket.seat,
                action: fallback,
                outcome,
            })
        }
    }
}

/// Lowest card when leading, otherwise a pass.
fn fallback_action(round: &RoundState, seat: Seat) -> Option<CpuAction> {
    if round.table_for(seat).is_some() {
        return Some(CpuAction::Pass);
    }
    let moves = round.legal_moves_for(seat);
    moves.into_iter().next().map(CpuAction::Play)
}
