use crate::model::card::Card;
use crate::model::combo::{HandIdentity, beats_identity, describe, identify, is_chop};
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::moves::{containing, legal_moves};
use crate::model::player::{Player, Seat};
use crate::model::swap::{SwapChoice, SwapError, SwapState, SwapStep};
use crate::model::trick::TrickPile;
use crate::model::variant::Variant;
use thiserror::Error;
use tracing::{debug, error};

static EMPTY_HAND: Hand = Hand::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundPhase {
    Swapping(SwapState),
    Playing,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("round is not in the playing phase")]
    NotInPlayPhase,
    #[error("expected {expected} to act but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("selected cards are not all in hand")]
    CardsNotInHand,
    #[error("cards do not form a valid combination")]
    InvalidCombination,
    #[error("combination does not beat the table")]
    DoesNotBeatTable,
    #[error("the opening lead must include the three of spades")]
    OpeningLeadViolation,
    #[error("cannot pass while leading an empty table")]
    CannotPassWhenLeading,
    #[error("turn rotation found no eligible seat after {from}")]
    NoEligibleSeat { from: Seat },
}

/// How a trick ended and who leads the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickResolution {
    pub winner: Seat,
    pub description: String,
    pub leader: Seat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    pub identity: HandIdentity,
    pub description: String,
    /// Owner of the combination that was just beaten.
    pub beaten: Option<Seat>,
    pub chop: bool,
    /// Placement earned if this play emptied the hand.
    pub placement: Option<usize>,
    pub resolution: Option<TrickResolution>,
    /// Seat left holding cards when the round ended on this play.
    pub last_place: Option<Seat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub resolution: Option<TrickResolution>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub step: SwapStep,
    /// Set when this decision closed the swap phase.
    pub leader: Option<Seat>,
}

#[derive(Debug, Clone)]
pub struct RoundState {
    variant: Variant,
    players: Vec<Player>,
    phase: RoundPhase,
    turn: Seat,
    deal_starter: Seat,
    trick: TrickPile,
    passed: Vec<Seat>,
    finished: Vec<Seat>,
    first_round: bool,
    opening_lead: bool,
    discard: Vec<Card>,
    swap_card: Option<Card>,
    twos_played: u8,
    tricks_completed: usize,
}

impl RoundState {
    /// Deals round-robin from `deal_starter`. In the seventeen-card variant the
    /// first undealt card becomes the swap card.
    pub fn deal(
        deck: &Deck,
        variant: Variant,
        deal_starter: Seat,
        first_round: bool,
        names: &[String],
    ) -> Self {
        let seat_count = variant.seat_count();
        let mut players: Vec<Player> = Seat::all(seat_count)
            .map(|seat| {
                let name = names
                    .get(seat.index())
                    .cloned()
                    .unwrap_or_else(|| format!("Player {}", seat.0));
                Player::new(seat, name)
            })
            .collect();

        for (index, card) in deck.cards().iter().take(variant.dealt_cards()).enumerate() {
            let target = (deal_starter.index() + index) % seat_count;
            players[target].hand.add(*card);
        }

        let swap_card = if variant.has_swap_phase() {
            deck.cards().get(variant.dealt_cards()).copied()
        } else {
            None
        };

        let mut round = Self {
            variant,
            players,
            phase: RoundPhase::Playing,
            turn: deal_starter,
            deal_starter,
            trick: TrickPile::new(),
            passed: Vec::new(),
            finished: Vec::new(),
            first_round,
            opening_lead: false,
            discard: Vec::new(),
            swap_card,
            twos_played: 0,
            tricks_completed: 0,
        };

        match swap_card {
            Some(card) => {
                round.phase = RoundPhase::Swapping(SwapState::new(card, deal_starter, seat_count));
            }
            None => round.begin_play(),
        }
        round
    }

    /// Builds a round already in play from explicit hands.
    pub fn from_hands(variant: Variant, hands: Vec<Hand>, leader: Seat, opening_lead: bool) -> Self {
        let players = hands
            .into_iter()
            .enumerate()
            .map(|(idx, hand)| {
                let seat = Seat::from_index(idx);
                let mut player = Player::new(seat, format!("Player {idx}"));
                player.hand = hand;
                player
            })
            .collect();
        Self {
            variant,
            players,
            phase: RoundPhase::Playing,
            turn: leader,
            deal_starter: leader,
            trick: TrickPile::new(),
            passed: Vec::new(),
            finished: Vec::new(),
            first_round: opening_lead,
            opening_lead,
            discard: Vec::new(),
            swap_card: None,
            twos_played: 0,
            tricks_completed: 0,
        }
    }

    fn begin_play(&mut self) {
        let holder = self.seat_holding(Card::THREE_OF_SPADES);
        let (leader, opening_lead) = match (self.first_round, holder) {
            (true, Some(seat)) => (seat, true),
            _ => (self.deal_starter, false),
        };
        self.turn = leader;
        self.opening_lead = opening_lead;
        self.phase = RoundPhase::Playing;
        debug!(leader = leader.0, opening_lead, "round entering play");
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn seat_count(&self) -> usize {
        self.players.len()
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat.index())
    }

    /// The seat's cards; empty for a seat that is not at the table.
    pub fn hand(&self, seat: Seat) -> &Hand {
        self.player(seat).map_or(&EMPTY_HAND, |player| &player.hand)
    }

    /// Seat expected to act, in both the swap and the playing phase.
    pub fn turn(&self) -> Seat {
        match &self.phase {
            RoundPhase::Swapping(state) => state.turn(),
            _ => self.turn,
        }
    }

    pub fn deal_starter(&self) -> Seat {
        self.deal_starter
    }

    pub fn trick(&self) -> &TrickPile {
        &self.trick
    }

    pub fn passed(&self) -> &[Seat] {
        &self.passed
    }

    pub fn has_passed(&self, seat: Seat) -> bool {
        self.passed.contains(&seat)
    }

    /// Finish order so far; index + 1 is the placement.
    pub fn finished(&self) -> &[Seat] {
        &self.finished
    }

    pub fn winner(&self) -> Option<Seat> {
        self.finished.first().copied()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, RoundPhase::Finished)
    }

    /// Whether this is the first round of its session.
    pub fn is_first_round(&self) -> bool {
        self.first_round
    }

    pub fn opening_lead_required(&self) -> bool {
        self.opening_lead
    }

    /// The circulating card while swapping, or the card left over afterwards.
    pub fn swap_card(&self) -> Option<Card> {
        match &self.phase {
            RoundPhase::Swapping(state) => Some(state.card()),
            _ => self.swap_card,
        }
    }

    pub fn twos_played(&self) -> u8 {
        self.twos_played
    }

    pub fn tricks_completed(&self) -> usize {
        self.tricks_completed
    }

    /// Cards from tricks already cleared this round.
    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// The table as seen by `seat`: its own standing play counts as leading.
    pub fn table_for(&self, seat: Seat) -> Option<&[Card]> {
        match self.trick.owner() {
            Some(owner) if owner != seat => self.trick.table_cards(),
            _ => None,
        }
    }

    pub fn legal_moves_for(&self, seat: Seat) -> Vec<Vec<Card>> {
        let Some(player) = self.player(seat) else {
            return Vec::new();
        };
        let moves = legal_moves(player.hand.cards(), self.table_for(seat));
        if self.opening_lead && self.trick.is_empty() {
            containing(moves, Card::THREE_OF_SPADES)
        } else {
            moves
        }
    }

    fn seat_holding(&self, card: Card) -> Option<Seat> {
        self.players
            .iter()
            .find(|player| player.hand.contains(card))
            .map(|player| player.seat)
    }

    pub fn submit_swap(&mut self, seat: Seat, choice: SwapChoice) -> Result<SwapOutcome, SwapError> {
        let RoundPhase::Swapping(state) = &mut self.phase else {
            return Err(SwapError::PhaseComplete);
        };
        let expected = state.turn();
        let Some(player) = self.players.get_mut(seat.index()).filter(|_| seat == expected) else {
            return Err(SwapError::OutOfTurn {
                expected,
                actual: seat,
            });
        };
        let step = state.submit(seat, choice, &mut player.hand)?;
        debug!(seat = seat.0, ?step, "swap decision");

        if !state.is_complete() {
            return Ok(SwapOutcome { step, leader: None });
        }

        self.swap_card = Some(state.card());
        self.begin_play();
        Ok(SwapOutcome {
            step,
            leader: Some(self.turn),
        })
    }

    pub fn play(&mut self, seat: Seat, cards: &[Card]) -> Result<PlayOutcome, PlayError> {
        self.ensure_turn(seat)?;

        if cards.is_empty() || !self.hand(seat).contains_all(cards) {
            return Err(PlayError::CardsNotInHand);
        }
        let identity = identify(cards);
        if !identity.is_valid() {
            return Err(PlayError::InvalidCombination);
        }
        if self.opening_lead && self.trick.is_empty() && !cards.contains(&Card::THREE_OF_SPADES) {
            return Err(PlayError::OpeningLeadViolation);
        }
        let table = self.table_for(seat).map(identify);
        if !beats_identity(&identity, table.as_ref()) {
            return Err(PlayError::DoesNotBeatTable);
        }

        let beaten = self.trick.owner().filter(|owner| *owner != seat);
        let chop = table.is_some_and(|table| is_chop(&identity, &table));
        let description = describe(cards);

        self.players[seat.index()].hand.remove_all(cards);
        self.twos_played += cards.iter().filter(|card| card.is_two()).count() as u8;
        self.trick.push(seat, cards.to_vec());
        self.opening_lead = false;
        debug!(seat = seat.0, combo = %description, chop, "cards played");

        let mut outcome = PlayOutcome {
            identity,
            description,
            beaten,
            chop,
            placement: None,
            resolution: None,
            last_place: None,
        };

        if self.hand(seat).is_empty() {
            self.players[seat.index()].finished = true;
            self.finished.push(seat);
            outcome.placement = Some(self.finished.len());
            debug!(seat = seat.0, placement = self.finished.len(), "seat finished");
        }

        if self.active_count() <= 1 {
            outcome.last_place = self.close_round();
            return Ok(outcome);
        }

        outcome.resolution = self.resolve_trick_if_done()?;
        if outcome.resolution.is_none() {
            self.turn = self.next_eligible(seat)?;
        }
        Ok(outcome)
    }

    pub fn pass(&mut self, seat: Seat) -> Result<PassOutcome, PlayError> {
        self.ensure_turn(seat)?;
        if self.table_for(seat).is_none() {
            return Err(PlayError::CannotPassWhenLeading);
        }

        self.passed.push(seat);
        debug!(seat = seat.0, passes = self.passed.len(), "seat passed");

        let resolution = self.resolve_trick_if_done()?;
        if resolution.is_none() {
            self.turn = self.next_eligible(seat)?;
        }
        Ok(PassOutcome { resolution })
    }

    fn ensure_turn(&self, seat: Seat) -> Result<(), PlayError> {
        if !matches!(self.phase, RoundPhase::Playing) {
            return Err(PlayError::NotInPlayPhase);
        }
        if seat != self.turn {
            return Err(PlayError::OutOfTurn {
                expected: self.turn,
                actual: seat,
            });
        }
        Ok(())
    }

    /// The trick is over once passes reach one less than the number of seats
    /// still holding cards. A table owner who just went out counts as gone.
    fn resolve_trick_if_done(&mut self) -> Result<Option<TrickResolution>, PlayError> {
        let Some(owner) = self.trick.owner() else {
            return Ok(None);
        };
        let needed = self.active_count().saturating_sub(1).max(1);
        if self.passed.len() < needed {
            return Ok(None);
        }

        let description = self
            .trick
            .table()
            .map(|play| describe(&play.cards))
            .unwrap_or_default();
        for play in self.trick.clear() {
            self.discard.extend(play.cards);
        }
        self.passed.clear();
        self.tricks_completed += 1;

        let leader = if self.hand(owner).is_empty() {
            self.next_eligible(owner)?
        } else {
            owner
        };
        self.turn = leader;
        debug!(winner = owner.0, leader = leader.0, "trick cleared");

        Ok(Some(TrickResolution {
            winner: owner,
            description,
            leader,
        }))
    }

    /// Next seat after `from` that still holds cards and has not passed.
    fn next_eligible(&self, from: Seat) -> Result<Seat, PlayError> {
        let seat_count = self.seat_count();
        let mut candidate = from.next(seat_count);
        for _ in 0..seat_count * 2 {
            let active = self.player(candidate).is_some_and(Player::is_active);
            if active && !self.passed.contains(&candidate) {
                return Ok(candidate);
            }
            candidate = candidate.next(seat_count);
        }
        error!(
            from = from.0,
            passed = ?self.passed,
            finished = ?self.finished,
            "turn rotation found no eligible seat"
        );
        Err(PlayError::NoEligibleSeat { from })
    }

    fn close_round(&mut self) -> Option<Seat> {
        let last = self
            .players
            .iter()
            .find(|player| !player.hand.is_empty())
            .map(|player| player.seat);
        if let Some(seat) = last {
            self.finished.push(seat);
        }
        self.phase = RoundPhase::Finished;
        debug!(ranking = ?self.finished, "round finished");
        last
    }

    /// Every card currently accounted for: hands, table, cleared tricks, swap card.
    pub fn cards_in_play(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self
            .players
            .iter()
            .flat_map(|player| player.hand.iter().copied())
            .collect();
        cards.extend(self.trick.cards().copied());
        cards.extend(self.discard.iter().copied());
        if let Some(card) = self.swap_card() {
            cards.push(card);
        }
        cards.sort();
        cards
    }
}
