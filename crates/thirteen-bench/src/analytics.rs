use std::fs;
use std::path::Path;

use serde::Serialize;
use thirteen_core::game::serialization::RoundRecord;
use thirteen_core::model::player::Seat;
use thiserror::Error;

use crate::config::BenchConfig;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("round {round} ranks seat {seat} which is not configured")]
    UnknownSeat { round: u32, seat: u8 },
    #[error("round {round} has {found} placements, expected {expected}")]
    IncompleteRanking {
        round: u32,
        found: usize,
        expected: usize,
    },
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-seat placement counters from finished rounds.
pub struct StatsCollector {
    seats: Vec<SeatAccumulator>,
    rounds: usize,
}

struct SeatAccumulator {
    name: String,
    difficulty: String,
    placements: Vec<usize>,
    decisions: usize,
    decision_ms: f64,
}

impl StatsCollector {
    pub fn new(config: &BenchConfig) -> Self {
        let seat_count = config.seats.len();
        let seats = config
            .seats
            .iter()
            .map(|seat| SeatAccumulator {
                name: seat.name.clone(),
                difficulty: seat.difficulty.clone(),
                placements: vec![0; seat_count],
                decisions: 0,
                decision_ms: 0.0,
            })
            .collect();
        Self { seats, rounds: 0 }
    }

    pub fn record_round(&mut self, record: &RoundRecord) -> Result<(), AnalyticsError> {
        if record.ranking.len() != self.seats.len() {
            return Err(AnalyticsError::IncompleteRanking {
                round: record.round,
                found: record.ranking.len(),
                expected: self.seats.len(),
            });
        }
        for (idx, seat) in record.ranking.iter().enumerate() {
            let acc = self
                .seats
                .get_mut(seat.index())
                .ok_or(AnalyticsError::UnknownSeat {
                    round: record.round,
                    seat: seat.0,
                })?;
            acc.placements[idx] += 1;
        }
        self.rounds += 1;
        Ok(())
    }

    pub fn record_decision(&mut self, seat: Seat, elapsed_ms: f64) {
        if let Some(acc) = self.seats.get_mut(seat.index()) {
            acc.decisions += 1;
            acc.decision_ms += elapsed_ms;
        }
    }

    pub fn finalize(self) -> StatsSummary {
        let rounds = self.rounds;
        let seats = self
            .seats
            .into_iter()
            .map(|acc| {
                let total: usize = acc.placements.iter().sum();
                let weighted: usize = acc
                    .placements
                    .iter()
                    .enumerate()
                    .map(|(idx, count)| (idx + 1) * count)
                    .sum();
                let avg_placement = if total == 0 {
                    0.0
                } else {
                    weighted as f64 / total as f64
                };
                let win_rate = if total == 0 {
                    0.0
                } else {
                    acc.placements[0] as f64 / total as f64
                };
                let avg_ms_per_decision = if acc.decisions == 0 {
                    0.0
                } else {
                    acc.decision_ms / acc.decisions as f64
                };
                SeatReport {
                    name: acc.name,
                    difficulty: acc.difficulty,
                    rounds: total,
                    wins: acc.placements[0],
                    placements: acc.placements,
                    avg_placement,
                    win_rate,
                    decisions: acc.decisions,
                    avg_ms_per_decision,
                }
            })
            .collect();
        StatsSummary { rounds, seats }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatReport {
    pub name: String,
    pub difficulty: String,
    pub rounds: usize,
    pub wins: usize,
    /// Count of finishes per placement; index 0 is first place.
    pub placements: Vec<usize>,
    pub avg_placement: f64,
    pub win_rate: f64,
    pub decisions: usize,
    pub avg_ms_per_decision: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub rounds: usize,
    pub seats: Vec<SeatReport>,
}

impl StatsSummary {
    pub fn seat(&self, name: &str) -> Option<&SeatReport> {
        self.seats.iter().find(|seat| seat.name == name)
    }

    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Self-Play Summary\n\n");
        rows.push_str(&format!("Rounds played: {}\n\n", self.rounds));

        let placement_headers: String = (1..=self.seats.len())
            .map(|place| format!(" #{place} |"))
            .collect();
        let placement_rule: String = (1..=self.seats.len()).map(|_| "----|").collect();
        rows.push_str(&format!(
            "| Seat | Difficulty | Rounds | Wins | Win % | Avg Place |{placement_headers} Avg ms/decision |\n"
        ));
        rows.push_str(&format!(
            "|------|------------|--------|------|-------|-----------|{placement_rule}-----------------|\n"
        ));

        for seat in &self.seats {
            let placements: String = seat
                .placements
                .iter()
                .map(|count| format!(" {count} |"))
                .collect();
            rows.push_str(&format!(
                "| {name} | {difficulty} | {rounds} | {wins} | {win:.1}% | {avg:.2} |{placements} {latency:.3} |\n",
                name = seat.name,
                difficulty = seat.difficulty,
                rounds = seat.rounds,
                wins = seat.wins,
                win = seat.win_rate * 100.0,
                avg = seat.avg_placement,
                latency = seat.avg_ms_per_decision,
            ));
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path, self.to_markdown()).map_err(|source| AnalyticsError::Io {
            context: "writing summary markdown",
            source,
        })
    }
}
