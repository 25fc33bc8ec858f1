use super::{BotContext, Decision, structural_cards};
use std::cmp::Ordering;
use thirteen_core::model::card::Card;
use thirteen_core::model::combo::{ComboKind, HandIdentity, identify};
use thirteen_core::model::moves::{containing, legal_moves};

/// Table value at or above which a led Two invites an immediate counter.
const HIGH_TWO_THRESHOLD: u8 = 60;

pub struct PlayPlanner;

impl PlayPlanner {
    /// Picks a move for the seat, paired with a short reason for logging.
    pub fn decide(ctx: &BotContext<'_>) -> (Decision, &'static str) {
        if ctx.has_passed {
            return (Decision::Abstain, "already_passed");
        }
        if ctx.hand.is_empty() {
            return (Decision::Abstain, "empty_hand");
        }

        let table = ctx.table.map(identify);
        let mut candidates = legal_moves(ctx.hand.cards(), ctx.table);

        if let Some(counter) = table.as_ref().and_then(|table| counter_two(&candidates, table)) {
            return (Decision::Play(counter), "counter_two");
        }

        if ctx.opening_lead {
            candidates = containing(candidates, Card::THREE_OF_SPADES);
        }

        if ctx.is_leading() && ctx.twos_outstanding() > 0 {
            let hand_len = ctx.hand.len();
            candidates.retain(|mv| !identify(mv).kind.is_bomb() || mv.len() == hand_len);
        }

        let Some(table) = table else {
            return Self::lead(ctx, candidates);
        };

        if matches!(
            table.kind,
            ComboKind::Pair | ComboKind::Triple | ComboKind::Straight
        ) {
            let matching = candidates
                .iter()
                .filter(|mv| identify(mv).kind == table.kind)
                .min_by_key(|mv| identify(mv).value);
            if let Some(choice) = matching {
                return (Decision::Play(choice.clone()), "match_type");
            }
        }

        if candidates.len() > 1 && table.kind == ComboKind::Single {
            let structure = structural_cards(ctx.hand.cards());
            let is_structural = |mv: &Vec<Card>| mv.first().is_some_and(|c| structure.contains(c));
            candidates.sort_by(|a, b| {
                is_structural(a)
                    .cmp(&is_structural(b))
                    .then_with(|| identify(a).value.cmp(&identify(b).value))
            });
            return pick_first(candidates, "preserve_structure");
        }

        candidates.sort_by_key(|mv| identify(mv).value);
        pick_first(candidates, "lowest_beating")
    }

    /// The first legal move in generation order.
    pub fn decide_easy(ctx: &BotContext<'_>) -> (Decision, &'static str) {
        if ctx.has_passed || ctx.hand.is_empty() {
            return (Decision::Abstain, "already_passed");
        }
        let mut candidates = legal_moves(ctx.hand.cards(), ctx.table);
        if ctx.opening_lead {
            candidates = containing(candidates, Card::THREE_OF_SPADES);
        }
        pick_first(candidates, "easy_first_legal")
    }

    fn lead(ctx: &BotContext<'_>, mut candidates: Vec<Vec<Card>>) -> (Decision, &'static str) {
        if candidates.is_empty() {
            return match ctx.hand.lowest() {
                Some(card) => (Decision::Play(vec![card]), "fallback_lowest"),
                None => (Decision::Abstain, "empty_hand"),
            };
        }
        candidates.sort_by(|a, b| lead_order(&identify(a), &identify(b)));
        pick_first(candidates, "lead_shed_bulk")
    }
}

/// A led Two of high value meets a single higher Two straight away.
fn counter_two(candidates: &[Vec<Card>], table: &HandIdentity) -> Option<Vec<Card>> {
    if table.value < HIGH_TWO_THRESHOLD {
        return None;
    }
    candidates
        .iter()
        .find(|mv| mv.len() == 1 && mv[0].is_two() && mv[0].value() > table.value)
        .cloned()
}

/// Longer first, multi-card before singles, then lower value.
fn lead_order(a: &HandIdentity, b: &HandIdentity) -> Ordering {
    b.length
        .cmp(&a.length)
        .then_with(|| {
            let a_single = a.kind == ComboKind::Single;
            let b_single = b.kind == ComboKind::Single;
            a_single.cmp(&b_single)
        })
        .then_with(|| a.value.cmp(&b.value))
}

fn pick_first(candidates: Vec<Vec<Card>>, reason: &'static str) -> (Decision, &'static str) {
    match candidates.into_iter().next() {
        Some(choice) => (Decision::Play(choice), reason),
        None => (Decision::Pass, "no_beating_move"),
    }
}
