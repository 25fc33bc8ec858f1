use thirteen_bot::{BotDifficulty, Decision, HeuristicPolicy, Policy, PolicyContext, run_cpu_turn};
use thirteen_core::game::events::GameEvent;
use thirteen_core::game::session::{GameSession, SessionConfig, SessionPhase};
use thirteen_core::model::player::Seat;
use thirteen_core::model::variant::Variant;

/// Seat 0 has no ticket, so the same policy plays it through the human commands.
fn human_turn(session: &mut GameSession, policy: &mut HeuristicPolicy) {
    let round = session.round().expect("round in progress");
    let ctx = PolicyContext::new(Seat::HUMAN, round);
    if session.phase() == SessionPhase::Swapping {
        let choice = policy.choose_swap(&ctx);
        session.swap_decision(Seat::HUMAN, choice).unwrap();
        return;
    }
    match policy.choose_play(&ctx) {
        Decision::Play(cards) => {
            session.submit_move(Seat::HUMAN, &cards).unwrap();
        }
        Decision::Pass => {
            session.pass(Seat::HUMAN).unwrap();
        }
        Decision::Abstain => panic!("active seat abstained"),
    }
}

fn play_round(session: &mut GameSession, policy: &mut HeuristicPolicy) -> Vec<GameEvent> {
    session.start_round().unwrap();
    let mut events = session.drain_events();
    let mut guard = 0;
    while session.phase() != SessionPhase::Finished {
        match session.schedule_cpu_turn() {
            Some(ticket) => {
                run_cpu_turn(session, &ticket, policy).unwrap();
            }
            None => human_turn(session, policy),
        }
        events.extend(session.drain_events());
        guard += 1;
        assert!(guard < 2000, "round did not finish");
    }
    events
}

fn run_rounds(variant: Variant, difficulty: BotDifficulty, seed: u64, rounds: usize) {
    let mut session = GameSession::with_seed(SessionConfig::with_variant(variant), seed);
    let mut policy = HeuristicPolicy::with_seed(difficulty, seed);
    for round in 0..rounds {
        let events = play_round(&mut session, &mut policy);
        let ranking = session.ranking().unwrap().to_vec();
        assert_eq!(ranking.len(), variant.seat_count(), "round {round}");
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, GameEvent::InvalidMoveAttempted { .. })),
            "bots should only submit legal moves"
        );
        assert_eq!(session.last_winner(), Some(ranking[0]));
    }
}

#[test]
fn normal_bots_finish_thirteen_card_rounds() {
    run_rounds(Variant::Thirteen, BotDifficulty::NormalHeuristic, 42, 5);
}

#[test]
fn normal_bots_finish_seventeen_card_rounds() {
    run_rounds(Variant::Seventeen, BotDifficulty::NormalHeuristic, 17, 5);
}

#[test]
fn easy_bots_finish_rounds() {
    run_rounds(Variant::Thirteen, BotDifficulty::EasyFirstLegal, 3, 3);
}
