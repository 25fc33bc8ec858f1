use super::session::GameSession;
use crate::model::player::Seat;
use crate::model::variant::Variant;
use serde::{Deserialize, Serialize};

/// Outcome of one finished round, as handed to statistics collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundRecord {
    pub round: u32,
    pub variant: Variant,
    /// Finish order; index + 1 is the placement.
    pub ranking: Vec<Seat>,
    pub seat_names: Vec<String>,
    #[serde(default)]
    pub first_round: bool,
}

impl RoundRecord {
    /// `None` until the current round has finished.
    pub fn capture(session: &GameSession) -> Option<Self> {
        let round = session.round()?;
        let ranking = session.ranking()?;
        Some(RoundRecord {
            round: session.round_number(),
            variant: session.variant(),
            ranking: ranking.to_vec(),
            seat_names: session.seat_names().to_vec(),
            first_round: round.is_first_round(),
        })
    }

    pub fn placement_of(&self, seat: Seat) -> Option<usize> {
        self.ranking
            .iter()
            .position(|candidate| *candidate == seat)
            .map(|idx| idx + 1)
    }

    pub fn winner(&self) -> Option<Seat> {
        self.ranking.first().copied()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::RoundRecord;
    use crate::game::session::{GameSession, SessionConfig};
    use crate::model::player::Seat;
    use crate::model::variant::Variant;

    fn sample() -> RoundRecord {
        RoundRecord {
            round: 3,
            variant: Variant::Thirteen,
            ranking: vec![Seat(2), Seat(0), Seat(3), Seat(1)],
            seat_names: vec!["YOU".into(), "Aaron".into(), "Swan".into(), "Hannah".into()],
            first_round: false,
        }
    }

    #[test]
    fn placements_follow_ranking_order() {
        let record = sample();
        assert_eq!(record.winner(), Some(Seat(2)));
        assert_eq!(record.placement_of(Seat(0)), Some(2));
        assert_eq!(record.placement_of(Seat(1)), Some(4));
        assert_eq!(record.placement_of(Seat(7)), None);
    }

    #[test]
    fn record_serializes_to_json() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"round\": 3"));
        assert!(json.contains("\"variant\": \"thirteen\""));
        assert_eq!(RoundRecord::from_json(&json).unwrap(), sample());
    }

    #[test]
    fn legacy_rows_without_first_round_flag_parse() {
        let legacy = r#"{
            "round": 1,
            "variant": "seventeen",
            "ranking": [1, 0, 2],
            "seat_names": ["YOU", "Aaron", "Swan"]
        }"#;
        let record = RoundRecord::from_json(legacy).unwrap();
        assert_eq!(record.variant, Variant::Seventeen);
        assert!(!record.first_round);
        assert_eq!(record.placement_of(Seat(0)), Some(2));
    }

    #[test]
    fn unfinished_rounds_have_no_record() {
        let mut session = GameSession::with_seed(SessionConfig::default(), 1);
        assert!(RoundRecord::capture(&session).is_none());
        session.start_round().unwrap();
        assert!(RoundRecord::capture(&session).is_none());
    }
}
