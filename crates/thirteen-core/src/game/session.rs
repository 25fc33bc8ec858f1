use crate::game::events::GameEvent;
use crate::game::schedule::{CpuTurn, Pacing, TurnPhase};
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::player::{Player, Seat};
use crate::model::round::{PlayError, PlayOutcome, RoundPhase, RoundState, TrickResolution};
use crate::model::swap::{SwapChoice, SwapError, SwapStep};
use crate::model::variant::Variant;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

pub const DEFAULT_SEAT_NAMES: [&str; 4] = ["YOU", "Aaron", "Swan", "Hannah"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("it is not this seat's turn")]
    NotYourTurn,
    #[error("command not valid in the current phase")]
    WrongPhase,
    #[error("cards do not form a valid combination")]
    InvalidCombination,
    #[error("combination does not beat the table")]
    DoesNotBeatTable,
    #[error("the first lead must include 3♠")]
    OpeningLeadViolation,
    #[error("selected cards are not in hand")]
    CardsNotInHand,
    #[error("cannot pass while leading an empty table")]
    CannotPassWhenLeadingEmptyTable,
    #[error("no swap is in progress")]
    SwapNotAvailable,
    #[error("scheduled action belongs to an earlier state")]
    StaleTicket,
    #[error("engine bookkeeping fault")]
    EngineFault,
}

impl From<PlayError> for Rejection {
    fn from(err: PlayError) -> Self {
        match err {
            PlayError::NotInPlayPhase => Rejection::WrongPhase,
            PlayError::OutOfTurn { .. } => Rejection::NotYourTurn,
            PlayError::CardsNotInHand => Rejection::CardsNotInHand,
            PlayError::InvalidCombination => Rejection::InvalidCombination,
            PlayError::DoesNotBeatTable => Rejection::DoesNotBeatTable,
            PlayError::OpeningLeadViolation => Rejection::OpeningLeadViolation,
            PlayError::CannotPassWhenLeading => Rejection::CannotPassWhenLeadingEmptyTable,
            PlayError::NoEligibleSeat { .. } => Rejection::EngineFault,
        }
    }
}

impl From<SwapError> for Rejection {
    fn from(err: SwapError) -> Self {
        match err {
            SwapError::PhaseComplete => Rejection::SwapNotAvailable,
            SwapError::OutOfTurn { .. } => Rejection::NotYourTurn,
            SwapError::CardNotInHand(_) | SwapError::EmptyHand => Rejection::CardsNotInHand,
        }
    }
}

/// Coarse phase of the session, as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Menu,
    Swapping,
    Playing,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub variant: Variant,
    pub seat_names: Vec<String>,
    pub pacing: Pacing,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Thirteen,
            seat_names: DEFAULT_SEAT_NAMES.iter().map(|s| s.to_string()).collect(),
            pacing: Pacing::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Names for every seat, falling back to the built-in names.
    pub fn resolved_names(&self) -> Vec<String> {
        (0..self.variant.seat_count())
            .map(|idx| {
                self.seat_names
                    .get(idx)
                    .filter(|name| !name.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_SEAT_NAMES[idx].to_string())
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayAccepted {
    pub description: String,
    pub chop: bool,
    pub placement: Option<usize>,
    pub trick: Option<TrickResolution>,
    pub round_finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassAccepted {
    pub trick: Option<TrickResolution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapAccepted {
    pub step: SwapStep,
    pub phase_ended: bool,
}

/// What a CPU seat decided to do with its ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuAction {
    Play(Vec<Card>),
    Pass,
    Swap(SwapChoice),
    /// The seat has nothing to decide this turn.
    Abstain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuOutcome {
    Played(PlayAccepted),
    Passed(PassAccepted),
    Swapped(SwapAccepted),
    Abstained,
}

/// Owns the seats, the current round and the cross-round carry-over
/// (who won last, whether the opening-lead rule still applies).
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    names: Vec<String>,
    rng: StdRng,
    seed: u64,
    round: Option<RoundState>,
    round_number: u32,
    first_game: bool,
    last_winner: Option<Seat>,
    epoch: u64,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        let seed: u64 = rand::random();
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: SessionConfig, seed: u64) -> Self {
        let names = config.resolved_names();
        Self {
            config,
            names,
            rng: StdRng::seed_from_u64(seed),
            seed,
            round: None,
            round_number: 0,
            first_game: true,
            last_winner: None,
            epoch: 0,
            events: Vec::new(),
        }
    }

    /// Resumes a session around a round that is already under way, such as a
    /// prepared position. The round counts as round 1.
    pub fn from_round(config: SessionConfig, round: RoundState, seed: u64) -> Self {
        let mut session = Self::with_seed(config, seed);
        session.first_game = round.is_first_round();
        session.round_number = 1;
        session.round = Some(round);
        session.bump_epoch();
        session
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn seat_names(&self) -> &[String] {
        &self.names
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn last_winner(&self) -> Option<Seat> {
        self.last_winner
    }

    pub fn is_first_game(&self) -> bool {
        self.first_game
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn phase(&self) -> SessionPhase {
        match self.round.as_ref().map(RoundState::phase) {
            None => SessionPhase::Menu,
            Some(RoundPhase::Swapping(_)) => SessionPhase::Swapping,
            Some(RoundPhase::Playing) => SessionPhase::Playing,
            Some(RoundPhase::Finished) => SessionPhase::Finished,
        }
    }

    /// Seat expected to act, if any.
    pub fn active_seat(&self) -> Option<Seat> {
        match self.phase() {
            SessionPhase::Swapping | SessionPhase::Playing => {
                self.round.as_ref().map(RoundState::turn)
            }
            _ => None,
        }
    }

    /// Final ranking once the round is finished.
    pub fn ranking(&self) -> Option<&[Seat]> {
        self.round
            .as_ref()
            .filter(|round| round.is_finished())
            .map(RoundState::finished)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deals a new round. Valid from the menu or after a finished round.
    pub fn start_round(&mut self) -> Result<(), Rejection> {
        if !matches!(self.phase(), SessionPhase::Menu | SessionPhase::Finished) {
            return Err(Rejection::WrongPhase);
        }

        let variant = self.config.variant;
        let deal_starter = self.last_winner.unwrap_or(Seat::HUMAN);
        let deck = Deck::shuffled(&mut self.rng);
        let round = RoundState::deal(&deck, variant, deal_starter, self.first_game, &self.names);

        self.round_number += 1;
        self.bump_epoch();
        info!(
            round = self.round_number,
            variant = %variant,
            deal_starter = deal_starter.0,
            "round started"
        );
        self.events.push(GameEvent::RoundStarted {
            round: self.round_number,
            variant,
            deal_starter,
        });

        match round.phase() {
            RoundPhase::Swapping(state) => {
                self.events.push(GameEvent::SwapPhaseStarted {
                    first_seat: state.turn(),
                    card: state.card(),
                });
                self.events.push(GameEvent::TurnChanged { seat: state.turn() });
            }
            _ => {
                self.events.push(GameEvent::PlayingStarted {
                    leader: round.turn(),
                });
                self.events.push(GameEvent::TurnChanged { seat: round.turn() });
            }
        }
        self.round = Some(round);
        Ok(())
    }

    /// Abandons the current round and returns to the menu. Pending CPU
    /// tickets become stale.
    pub fn end_session(&mut self) {
        self.round = None;
        self.round_number = 0;
        self.first_game = true;
        self.last_winner = None;
        self.bump_epoch();
        info!("session ended");
        self.events.push(GameEvent::SessionEnded);
    }

    pub fn submit_move(&mut self, seat: Seat, cards: &[Card]) -> Result<PlayAccepted, Rejection> {
        let result = match self.round.as_mut() {
            Some(round) => round.play(seat, cards).map_err(Rejection::from),
            None => Err(Rejection::WrongPhase),
        };
        match result {
            Ok(outcome) => Ok(self.record_play(seat, cards, outcome)),
            Err(reason) => Err(self.reject(seat, reason)),
        }
    }

    pub fn pass(&mut self, seat: Seat) -> Result<PassAccepted, Rejection> {
        let result = match self.round.as_mut() {
            Some(round) => round.pass(seat).map_err(Rejection::from),
            None => Err(Rejection::WrongPhase),
        };
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(reason) => return Err(self.reject(seat, reason)),
        };

        self.bump_epoch();
        self.events.push(GameEvent::Passed { seat });
        self.record_resolution(outcome.resolution.as_ref());
        Ok(PassAccepted {
            trick: outcome.resolution,
        })
    }

    pub fn swap_decision(
        &mut self,
        seat: Seat,
        choice: SwapChoice,
    ) -> Result<SwapAccepted, Rejection> {
        let result = match self.round.as_mut() {
            Some(round) if matches!(round.phase(), RoundPhase::Swapping(_)) => {
                round.submit_swap(seat, choice).map_err(Rejection::from)
            }
            _ => Err(Rejection::SwapNotAvailable),
        };
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(reason) => return Err(self.reject(seat, reason)),
        };

        self.bump_epoch();
        match outcome.step {
            SwapStep::Swapped { surrendered, .. } => {
                self.events.push(GameEvent::SwapTaken { seat, surrendered });
            }
            SwapStep::Kept => self.events.push(GameEvent::SwapKept { seat }),
        }

        let final_card = self.round.as_ref().and_then(RoundState::swap_card);
        match (outcome.leader, final_card) {
            (Some(leader), Some(final_card)) => {
                self.events.push(GameEvent::SwapPhaseEnded { final_card });
                self.events.push(GameEvent::PlayingStarted { leader });
                self.events.push(GameEvent::TurnChanged { seat: leader });
            }
            _ => {
                if let Some(next) = self.active_seat() {
                    self.events.push(GameEvent::TurnChanged { seat: next });
                }
            }
        }

        Ok(SwapAccepted {
            step: outcome.step,
            phase_ended: outcome.leader.is_some(),
        })
    }

    /// Issues a ticket when a CPU seat is due to act. The caller waits out
    /// the delay and hands the ticket back with the decision.
    pub fn schedule_cpu_turn(&mut self) -> Option<CpuTurn> {
        let round = self.round.as_ref()?;
        let seat = self.active_seat()?;
        if !round.player(seat).is_some_and(Player::is_cpu) {
            return None;
        }
        let (phase, delay) = match round.phase() {
            RoundPhase::Swapping(_) => (TurnPhase::Swap, self.config.pacing.swap_delay()),
            RoundPhase::Playing => {
                let table_value = round
                    .table_for(seat)
                    .map(|cards| cards.iter().map(|card| card.value()).max().unwrap_or(0));
                let delay = self.config.pacing.play_delay(table_value, &mut self.rng);
                (TurnPhase::Play, delay)
            }
            RoundPhase::Finished => return None,
        };
        debug!(seat = seat.0, epoch = self.epoch, ?phase, ?delay, "cpu turn scheduled");
        Some(CpuTurn {
            seat,
            epoch: self.epoch,
            phase,
            delay,
        })
    }

    pub fn is_live(&self, ticket: &CpuTurn) -> bool {
        let phase_matches = matches!(
            (ticket.phase, self.phase()),
            (TurnPhase::Swap, SessionPhase::Swapping) | (TurnPhase::Play, SessionPhase::Playing)
        );
        ticket.epoch == self.epoch && phase_matches && self.active_seat() == Some(ticket.seat)
    }

    /// Applies a CPU decision through the same checks as human input.
    pub fn apply_cpu_action(
        &mut self,
        ticket: &CpuTurn,
        action: CpuAction,
    ) -> Result<CpuOutcome, Rejection> {
        if !self.is_live(ticket) {
            debug!(seat = ticket.seat.0, epoch = ticket.epoch, "stale cpu ticket dropped");
            return Err(Rejection::StaleTicket);
        }
        match action {
            CpuAction::Play(cards) => self.submit_move(ticket.seat, &cards).map(CpuOutcome::Played),
            CpuAction::Pass => self.pass(ticket.seat).map(CpuOutcome::Passed),
            CpuAction::Swap(choice) => self
                .swap_decision(ticket.seat, choice)
                .map(CpuOutcome::Swapped),
            CpuAction::Abstain => Ok(CpuOutcome::Abstained),
        }
    }

    pub fn legal_moves_for(&self, seat: Seat) -> Vec<Vec<Card>> {
        match self.round.as_ref() {
            Some(round) if matches!(round.phase(), RoundPhase::Playing) => {
                round.legal_moves_for(seat)
            }
            _ => Vec::new(),
        }
    }

    /// Cards that appear in at least one legal move.
    pub fn playable_cards(&self, seat: Seat) -> Vec<Card> {
        let mut cards: Vec<Card> = self.legal_moves_for(seat).into_iter().flatten().collect();
        cards.sort();
        cards.dedup();
        cards
    }

    /// True when the seat is up, faces a table, and holds nothing that beats it.
    pub fn must_pass(&self, seat: Seat) -> bool {
        let Some(round) = self.round.as_ref() else {
            return false;
        };
        matches!(round.phase(), RoundPhase::Playing)
            && round.turn() == seat
            && round.table_for(seat).is_some()
            && round.legal_moves_for(seat).is_empty()
    }

    fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn reject(&mut self, seat: Seat, reason: Rejection) -> Rejection {
        if reason == Rejection::EngineFault {
            error!(seat = seat.0, epoch = self.epoch, "engine fault while applying command");
        } else {
            debug!(seat = seat.0, %reason, "command rejected");
        }
        self.events.push(GameEvent::InvalidMoveAttempted { seat, reason });
        reason
    }

    fn record_play(&mut self, seat: Seat, cards: &[Card], outcome: PlayOutcome) -> PlayAccepted {
        self.bump_epoch();
        let mut played = cards.to_vec();
        played.sort();
        self.events.push(GameEvent::CardsPlayed {
            seat,
            cards: played,
            description: outcome.description.clone(),
        });
        if let (true, Some(victim)) = (outcome.chop, outcome.beaten) {
            self.events.push(GameEvent::Chop { seat, victim });
        }
        if let Some(placement) = outcome.placement {
            self.record_finish(seat, placement);
        }

        let round_finished = self.round.as_ref().is_some_and(RoundState::is_finished);
        if round_finished {
            if let Some(last) = outcome.last_place {
                let placement = self.round.as_ref().map_or(0, |round| round.finished().len());
                self.record_finish(last, placement);
            }
            let ranking = self
                .round
                .as_ref()
                .map(|round| round.finished().to_vec())
                .unwrap_or_default();
            info!(round = self.round_number, ?ranking, "round finished");
            self.events.push(GameEvent::RoundFinished { ranking });
        } else {
            self.record_resolution(outcome.resolution.as_ref());
        }

        PlayAccepted {
            description: outcome.description,
            chop: outcome.chop,
            placement: outcome.placement,
            trick: outcome.resolution,
            round_finished,
        }
    }

    fn record_finish(&mut self, seat: Seat, placement: usize) {
        if placement == 1 {
            self.last_winner = Some(seat);
            self.first_game = false;
        }
        self.events.push(GameEvent::PlayerFinished { seat, placement });
    }

    fn record_resolution(&mut self, resolution: Option<&TrickResolution>) {
        if let Some(resolution) = resolution {
            self.events.push(GameEvent::TrickWon {
                winner: resolution.winner,
                description: resolution.description.clone(),
            });
        }
        if let Some(next) = self.active_seat() {
            self.events.push(GameEvent::TurnChanged { seat: next });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CpuAction, GameSession, Rejection, SessionConfig, SessionPhase};
    use crate::game::events::GameEvent;
    use crate::model::card::Card;
    use crate::model::player::Seat;
    use crate::model::swap::SwapChoice;
    use crate::model::variant::Variant;

    fn started(variant: Variant, seed: u64) -> GameSession {
        let mut session = GameSession::with_seed(SessionConfig::with_variant(variant), seed);
        session.start_round().unwrap();
        session
    }

    #[test]
    fn new_session_sits_in_menu() {
        let session = GameSession::with_seed(SessionConfig::default(), 7);
        assert_eq!(session.phase(), SessionPhase::Menu);
        assert_eq!(session.active_seat(), None);
        assert!(session.is_first_game());
        assert_eq!(session.seat_names(), &["YOU", "Aaron", "Swan", "Hannah"]);
    }

    #[test]
    fn same_seed_deals_same_hands() {
        let a = started(Variant::Thirteen, 11);
        let b = started(Variant::Thirteen, 11);
        for seat in Seat::all(4) {
            assert_eq!(
                a.round().unwrap().hand(seat),
                b.round().unwrap().hand(seat)
            );
        }
    }

    #[test]
    fn start_round_emits_round_and_turn_events() {
        let mut session = started(Variant::Thirteen, 3);
        let events = session.drain_events();
        assert!(matches!(events[0], GameEvent::RoundStarted { round: 1, .. }));
        assert!(matches!(events[1], GameEvent::PlayingStarted { .. }));
        assert!(session.drain_events().is_empty());
        assert_eq!(session.start_round(), Err(Rejection::WrongPhase));
    }

    #[test]
    fn commands_outside_turn_are_rejected_without_change() {
        let mut session = started(Variant::Thirteen, 21);
        let leader = session.active_seat().unwrap();
        let other = leader.next(4);
        let card = session.round().unwrap().hand(other).cards()[0];
        let epoch = session.epoch();
        session.drain_events();

        assert_eq!(session.submit_move(other, &[card]), Err(Rejection::NotYourTurn));
        assert_eq!(session.pass(other), Err(Rejection::NotYourTurn));
        assert_eq!(session.epoch(), epoch);
        assert_eq!(session.round().unwrap().hand(other).len(), 13);
        assert_eq!(
            session.drain_events(),
            vec![
                GameEvent::InvalidMoveAttempted {
                    seat: other,
                    reason: Rejection::NotYourTurn,
                },
                GameEvent::InvalidMoveAttempted {
                    seat: other,
                    reason: Rejection::NotYourTurn,
                },
            ]
        );
    }

    #[test]
    fn swap_is_unavailable_in_thirteen_card_rounds() {
        let mut session = started(Variant::Thirteen, 2);
        let leader = session.active_seat().unwrap();
        assert_eq!(
            session.swap_decision(leader, SwapChoice::Keep),
            Err(Rejection::SwapNotAvailable)
        );
    }

    #[test]
    fn out_of_range_seats_are_rejected() {
        let mut session = started(Variant::Seventeen, 6);
        session.drain_events();
        let epoch = session.epoch();
        assert_eq!(
            session.swap_decision(Seat(3), SwapChoice::Keep),
            Err(Rejection::NotYourTurn)
        );
        assert_eq!(session.epoch(), epoch);
        assert_eq!(session.phase(), SessionPhase::Swapping);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::InvalidMoveAttempted {
                seat: Seat(3),
                reason: Rejection::NotYourTurn,
            }]
        );

        let session = started(Variant::Thirteen, 6);
        assert!(session.legal_moves_for(Seat(4)).is_empty());
        assert!(session.playable_cards(Seat(4)).is_empty());
        assert!(!session.must_pass(Seat(4)));
    }

    #[test]
    fn leader_can_open_with_three_of_spades() {
        let mut session = started(Variant::Thirteen, 8);
        let leader = session.active_seat().unwrap();
        assert!(
            session
                .round()
                .unwrap()
                .hand(leader)
                .contains(Card::THREE_OF_SPADES)
        );
        let accepted = session
            .submit_move(leader, &[Card::THREE_OF_SPADES])
            .unwrap();
        assert_eq!(accepted.description, "Single 3♠");
        assert_eq!(session.active_seat(), Some(leader.next(4)));
    }

    #[test]
    fn stale_tickets_do_not_fire() {
        let mut session = started(Variant::Thirteen, 4);
        let mut ticket = None;
        for _ in 0..8 {
            if let Some(found) = session.schedule_cpu_turn() {
                ticket = Some(found);
                break;
            }
            let seat = session.active_seat().unwrap();
            let moves = session.legal_moves_for(seat);
            session.submit_move(seat, &moves[0]).unwrap();
        }
        let ticket = ticket.expect("a cpu seat gets a turn");
        assert!(session.is_live(&ticket));

        session.end_session();
        assert!(!session.is_live(&ticket));
        assert_eq!(
            session.apply_cpu_action(&ticket, CpuAction::Pass),
            Err(Rejection::StaleTicket)
        );
        assert_eq!(session.phase(), SessionPhase::Menu);
    }

    #[test]
    fn human_seat_never_gets_a_ticket() {
        let mut session = started(Variant::Thirteen, 4);
        if session.active_seat() == Some(Seat::HUMAN) {
            assert!(session.schedule_cpu_turn().is_none());
        }
    }

    #[test]
    fn seventeen_card_round_opens_with_swap() {
        let mut session = started(Variant::Seventeen, 6);
        assert_eq!(session.phase(), SessionPhase::Swapping);
        let events = session.drain_events();
        assert!(
            events
                .iter()
                .any(|event| matches!(event, GameEvent::SwapPhaseStarted { .. }))
        );

        for _ in 0..3 {
            let seat = session.active_seat().unwrap();
            session.swap_decision(seat, SwapChoice::Keep).unwrap();
        }
        assert_eq!(session.phase(), SessionPhase::Playing);
        let events = session.drain_events();
        assert!(
            events
                .iter()
                .any(|event| matches!(event, GameEvent::SwapPhaseEnded { .. }))
        );
    }

    #[test]
    fn helpers_report_playable_cards() {
        let session = started(Variant::Thirteen, 12);
        let leader = session.active_seat().unwrap();
        assert!(session.playable_cards(leader).contains(&Card::THREE_OF_SPADES));
        assert!(
            session
                .legal_moves_for(leader)
                .iter()
                .all(|mv| mv.contains(&Card::THREE_OF_SPADES))
        );
        assert!(!session.must_pass(leader));
        assert!(!session.must_pass(leader.next(4)));
    }
}
