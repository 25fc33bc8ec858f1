use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable table position. Seat 0 is the human seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(pub u8);

impl Seat {
    pub const HUMAN: Seat = Seat(0);

    pub const fn from_index(index: usize) -> Self {
        Seat(index as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_human(self) -> bool {
        self.0 == 0
    }

    /// Next seat clockwise around a table of `seat_count` seats.
    pub const fn next(self, seat_count: usize) -> Seat {
        Seat(((self.0 as usize + 1) % seat_count) as u8)
    }

    pub fn all(seat_count: usize) -> impl Iterator<Item = Seat> {
        (0..seat_count).map(Seat::from_index)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    Human,
    Cpu,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
    pub kind: SeatKind,
    pub hand: Hand,
    pub finished: bool,
}

impl Player {
    pub fn new(seat: Seat, name: impl Into<String>) -> Self {
        let kind = if seat.is_human() {
            SeatKind::Human
        } else {
            SeatKind::Cpu
        };
        Self {
            seat,
            name: name.into(),
            kind,
            hand: Hand::new(),
            finished: false,
        }
    }

    pub fn is_cpu(&self) -> bool {
        matches!(self.kind, SeatKind::Cpu)
    }

    /// Seats still holding cards take part in turn rotation.
    pub fn is_active(&self) -> bool {
        !self.finished && !self.hand.is_empty()
    }
}
