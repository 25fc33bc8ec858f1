use super::{Policy, PolicyContext};
use crate::bot::{BotDifficulty, Decision, PlayPlanner, SwapPlanner};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thirteen_core::model::card::Card;
use thirteen_core::model::swap::SwapChoice;
use tracing::{Level, event};

/// Rule-based CPU player wrapping the play and swap planners
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
    rng: StdRng,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self::with_seed(difficulty, rand::random())
    }

    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn easy() -> Self {
        Self::new(BotDifficulty::EasyFirstLegal)
    }

    pub fn normal() -> Self {
        Self::new(BotDifficulty::NormalHeuristic)
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }
}

impl Policy for HeuristicPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext) -> Decision {
        let bot_ctx = ctx.bot_context();
        let (decision, reason) = match self.difficulty {
            BotDifficulty::EasyFirstLegal => PlayPlanner::decide_easy(&bot_ctx),
            BotDifficulty::NormalHeuristic => PlayPlanner::decide(&bot_ctx),
        };
        log_play_decision(ctx, self.difficulty, &decision, reason);
        decision
    }

    fn choose_swap(&mut self, ctx: &PolicyContext) -> SwapChoice {
        let Some(offered) = ctx.round.swap_card() else {
            return SwapChoice::Keep;
        };
        let hand = ctx.round.hand(ctx.seat);
        let (choice, reason) = match self.difficulty {
            BotDifficulty::EasyFirstLegal => (SwapChoice::Keep, "easy_keep"),
            BotDifficulty::NormalHeuristic => SwapPlanner::choose(hand, offered, &mut self.rng),
        };
        log_swap_decision(ctx, self.difficulty, offered, choice, reason);
        choice
    }
}

fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn log_play_decision(
    ctx: &PolicyContext,
    difficulty: BotDifficulty,
    decision: &Decision,
    reason: &str,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let chosen = match decision {
        Decision::Play(cards) => format_cards(cards),
        Decision::Pass => "pass".to_string(),
        Decision::Abstain => "abstain".to_string(),
    };
    let table = ctx
        .round
        .table_for(ctx.seat)
        .map(format_cards)
        .unwrap_or_else(|| "-".to_string());

    event!(
        target: "thirteen_bot::play",
        Level::INFO,
        seat = ctx.seat.0,
        difficulty = difficulty.as_str(),
        hand_size = ctx.round.hand(ctx.seat).len(),
        table = %table,
        twos_played = ctx.round.twos_played(),
        chosen = %chosen,
        reason,
    );
}

fn log_swap_decision(
    ctx: &PolicyContext,
    difficulty: BotDifficulty,
    offered: Card,
    choice: SwapChoice,
    reason: &str,
) {
    event!(
        target: "thirteen_bot::swap",
        Level::INFO,
        seat = ctx.seat.0,
        difficulty = difficulty.as_str(),
        offered = %offered,
        choice = ?choice,
        reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use thirteen_core::model::card::parse_cards;
    use thirteen_core::model::deck::Deck;
    use thirteen_core::model::hand::Hand;
    use thirteen_core::model::player::Seat;
    use thirteen_core::model::round::RoundState;
    use thirteen_core::model::variant::Variant;

    fn build_round(hands: [&str; 4], leader: Seat) -> RoundState {
        let hands = hands
            .iter()
            .map(|raw| Hand::with_cards(parse_cards(raw).unwrap()))
            .collect();
        RoundState::from_hands(Variant::Thirteen, hands, leader, false)
    }

    #[test]
    fn easy_policy_returns_first_legal_move() {
        let round = build_round(["3S 4D 5C", "6S", "7S", "8S"], Seat(0));
        let mut policy = HeuristicPolicy::with_seed(BotDifficulty::EasyFirstLegal, 1);
        let ctx = PolicyContext::new(Seat(0), &round);
        assert_eq!(
            policy.choose_play(&ctx),
            Decision::Play(parse_cards("3S").unwrap())
        );
    }

    #[test]
    fn normal_policy_uses_play_planner() {
        let round = build_round(["3S 4D 5C", "6S", "7S", "8S"], Seat(0));
        let mut policy = HeuristicPolicy::with_seed(BotDifficulty::NormalHeuristic, 1);
        let ctx = PolicyContext::new(Seat(0), &round);
        assert_eq!(
            policy.choose_play(&ctx),
            Decision::Play(parse_cards("3S 4D 5C").unwrap())
        );
    }

    #[test]
    fn swap_choice_reads_the_offered_card() {
        let mut deck_cards = Deck::standard().cards().to_vec();
        let two = deck_cards.remove(48);
        deck_cards.push(two);
        let deck = Deck::from_cards(deck_cards);
        let round = RoundState::deal(&deck, Variant::Seventeen, Seat(1), false, &[]);
        assert_eq!(round.swap_card(), Some(two));

        let mut policy = HeuristicPolicy::with_seed(BotDifficulty::NormalHeuristic, 9);
        let ctx = PolicyContext::new(Seat(1), &round);
        assert_eq!(policy.choose_swap(&ctx), SwapChoice::SwapLowest);

        let mut easy = HeuristicPolicy::with_seed(BotDifficulty::EasyFirstLegal, 9);
        assert_eq!(easy.choose_swap(&ctx), SwapChoice::Keep);
    }
}
