use crate::model::player::Seat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 5;

/// How long CPU seats appear to think.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// 1 (slowest) to 5 (fastest).
    pub speed: u8,
    /// Pause longer when the table already holds something strong.
    pub fake_thinking: bool,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            speed: 3,
            fake_thinking: true,
        }
    }
}

impl Pacing {
    pub fn base_delay_ms(&self) -> u64 {
        match self.speed.clamp(MIN_SPEED, MAX_SPEED) {
            1 => 2000,
            2 => 1500,
            3 => 1000,
            4 => 500,
            _ => 200,
        }
    }

    /// Delay before a CPU plays. `table_value` is the value of the highest
    /// card currently on the table.
    pub fn play_delay<R: Rng + ?Sized>(&self, table_value: Option<u8>, rng: &mut R) -> Duration {
        let mut delay = self.base_delay_ms();
        if self.fake_thinking {
            match table_value {
                Some(value) if value > 50 => delay += 1500,
                Some(value) if value > 40 => delay += 800,
                _ => {}
            }
        }
        let jitter_cap = delay / 2;
        let jitter = if jitter_cap > 0 {
            rng.gen_range(0..jitter_cap)
        } else {
            0
        };
        Duration::from_millis(delay + jitter)
    }

    pub fn swap_delay(&self) -> Duration {
        if self.speed >= MAX_SPEED {
            Duration::from_millis(500)
        } else {
            Duration::from_millis(1500)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Swap,
    Play,
}

/// A pending CPU action. Only live while `epoch` matches the session's;
/// the caller waits out `delay` and hands the ticket back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTurn {
    pub seat: Seat,
    pub epoch: u64,
    pub phase: TurnPhase,
    pub delay: Duration,
}

#[cfg(test)]
mod tests {
    use super::{Pacing, TurnPhase};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    #[test]
    fn base_delay_follows_speed() {
        let expected = [(1, 2000), (2, 1500), (3, 1000), (4, 500), (5, 200)];
        for (speed, ms) in expected {
            let pacing = Pacing {
                speed,
                fake_thinking: false,
            };
            assert_eq!(pacing.base_delay_ms(), ms, "speed {speed}");
        }
    }

    #[test]
    fn out_of_range_speed_is_clamped() {
        let slow = Pacing {
            speed: 0,
            fake_thinking: false,
        };
        let fast = Pacing {
            speed: 9,
            fake_thinking: false,
        };
        assert_eq!(slow.base_delay_ms(), 2000);
        assert_eq!(fast.base_delay_ms(), 200);
    }

    #[test]
    fn strong_tables_slow_the_cpu_down() {
        let pacing = Pacing {
            speed: 5,
            fake_thinking: true,
        };
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let high = pacing.play_delay(Some(61), &mut rng);
            assert!(high >= Duration::from_millis(1700));
            assert!(high < Duration::from_millis(1700 + 850));

            let mid = pacing.play_delay(Some(45), &mut rng);
            assert!(mid >= Duration::from_millis(1000));
            assert!(mid < Duration::from_millis(1500));

            let empty = pacing.play_delay(None, &mut rng);
            assert!(empty >= Duration::from_millis(200));
            assert!(empty < Duration::from_millis(300));
        }
    }

    #[test]
    fn swap_delay_is_short_only_at_top_speed() {
        let mut pacing = Pacing::default();
        assert_eq!(pacing.swap_delay(), Duration::from_millis(1500));
        pacing.speed = 5;
        assert_eq!(pacing.swap_delay(), Duration::from_millis(500));
        assert_ne!(TurnPhase::Swap, TurnPhase::Play);
    }
}
