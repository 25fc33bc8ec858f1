use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thirteen_bot::{Decision, HeuristicPolicy, Policy, PolicyContext, run_cpu_turn};
use thirteen_core::game::serialization::RoundRecord;
use thirteen_core::game::session::{GameSession, Rejection, SessionConfig, SessionPhase};
use thirteen_core::model::player::Seat;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsError, StatsCollector, StatsSummary};
use crate::config::{BenchConfig, ResolvedOutputs};

/// Hard stop for a single round; a legal round needs far fewer turns.
const MAX_TURNS_PER_ROUND: usize = 5_000;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("round {round}: seat {seat} command rejected: {reason}")]
    Rejected {
        round: u32,
        seat: u8,
        reason: Rejection,
    },
    #[error("round {round} did not finish within {turns} turns")]
    Stalled { round: u32, turns: usize },
}

/// Plays seeded sessions with every seat driven by a bot.
pub struct SelfPlayRunner {
    config: BenchConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub rounds_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub stats: StatsSummary,
}

#[derive(Debug, Serialize)]
struct RoundRow<'a> {
    run_id: &'a str,
    round_id: String,
    seed: u64,
    #[serde(flatten)]
    record: &'a RoundRecord,
    turns: usize,
    winner: &'a str,
}

impl SelfPlayRunner {
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Execute the run, streaming one JSONL row per finished round.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let seed = self.config.session.seed.unwrap_or(0);
        let mut seeds = StdRng::seed_from_u64(seed);

        let session_config = SessionConfig {
            variant: self.config.session.variant,
            seat_names: self.config.seat_names(),
            ..SessionConfig::default()
        };
        let mut session = GameSession::with_seed(session_config, seeds.next_u64());
        let mut policies: Vec<HeuristicPolicy> = self
            .config
            .seats
            .iter()
            .map(|seat| HeuristicPolicy::with_seed(seat.bot_difficulty(), seeds.next_u64()))
            .collect();
        let mut stats = StatsCollector::new(&self.config);
        let mut rows_written = 0usize;

        for _ in 0..self.config.session.rounds {
            session.start_round().map_err(|reason| RunnerError::Rejected {
                round: session.round_number() + 1,
                seat: 0,
                reason,
            })?;
            let turns = play_round(&mut session, &mut policies, &mut stats)?;
            session.drain_events();

            let Some(record) = RoundRecord::capture(&session) else {
                return Err(RunnerError::Stalled {
                    round: session.round_number(),
                    turns,
                });
            };
            stats.record_round(&record)?;

            let winner = record
                .winner()
                .and_then(|seat| record.seat_names.get(seat.index()))
                .map(String::as_str)
                .unwrap_or("");
            let row = RoundRow {
                run_id: &self.config.run_id,
                round_id: format!("R{:05}", record.round),
                seed: session.seed(),
                record: &record,
                turns,
                winner,
            };
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }

        writer.flush()?;

        let summary = stats.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            rounds_played: self.config.session.rounds,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            stats: summary,
        })
    }
}

/// Runs the current round to completion and returns the number of turns taken.
fn play_round(
    session: &mut GameSession,
    policies: &mut [HeuristicPolicy],
    stats: &mut StatsCollector,
) -> Result<usize, RunnerError> {
    let round_number = session.round_number();
    let mut turns = 0usize;
    while session.phase() != SessionPhase::Finished {
        if turns >= MAX_TURNS_PER_ROUND {
            return Err(RunnerError::Stalled {
                round: round_number,
                turns,
            });
        }
        let Some(seat) = session.active_seat() else {
            break;
        };
        let policy = &mut policies[seat.index()];
        let started = Instant::now();

        let result = match session.schedule_cpu_turn() {
            Some(ticket) => run_cpu_turn(session, &ticket, policy).map(|_| ()),
            None => stand_in_turn(session, seat, policy),
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        result.map_err(|reason| RunnerError::Rejected {
            round: round_number,
            seat: seat.0,
            reason,
        })?;

        stats.record_decision(seat, elapsed_ms);
        event!(
            target: "thirteen_bench::decision",
            Level::DEBUG,
            round = round_number,
            seat = seat.0,
            turn = turns,
            elapsed_ms,
        );
        turns += 1;
    }
    Ok(turns)
}

/// The human seat never receives a ticket; its bot goes through the same
/// commands a person would use.
fn stand_in_turn(
    session: &mut GameSession,
    seat: Seat,
    policy: &mut HeuristicPolicy,
) -> Result<(), Rejection> {
    let round = session.round().ok_or(Rejection::WrongPhase)?;
    let ctx = PolicyContext::new(seat, round);
    if session.phase() == SessionPhase::Swapping {
        let choice = policy.choose_swap(&ctx);
        return session.swap_decision(seat, choice).map(|_| ());
    }
    match policy.choose_play(&ctx) {
        Decision::Play(cards) => session.submit_move(seat, &cards).map(|_| ()),
        Decision::Pass => session.pass(seat).map(|_| ()),
        Decision::Abstain => Err(Rejection::EngineFault),
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
