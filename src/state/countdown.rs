//! Countdown towards the target instant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

/// Time left until the target, broken into display components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    /// Break a strictly positive millisecond difference into components
    pub fn from_millis(difference: i64) -> Self {
        let difference = difference.max(0);
        Self {
            days: (difference / MS_PER_DAY) as u64,
            hours: ((difference / MS_PER_HOUR) % 24) as u64,
            minutes: ((difference / MS_PER_MINUTE) % 60) as u64,
            seconds: ((difference / MS_PER_SECOND) % 60) as u64,
        }
    }

    /// Reconstruct the duration at second precision
    pub fn total_millis(&self) -> u64 {
        self.days * MS_PER_DAY as u64
            + self.hours * MS_PER_HOUR as u64
            + self.minutes * MS_PER_MINUTE as u64
            + self.seconds * MS_PER_SECOND as u64
    }
}

/// Result of a single countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Target still ahead
    Remaining(Remaining),
    /// Target reached on this tick; reported once
    Crossed,
    /// Target was already crossed on an earlier tick
    Idle,
}

/// Fixed-target countdown. Ticks are driven by the caller.
#[derive(Debug, Clone)]
pub struct Countdown {
    target: DateTime<Utc>,
    crossed: bool,
}

impl Countdown {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            crossed: false,
        }
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    pub fn is_crossed(&self) -> bool {
        self.crossed
    }

    /// Recompute the remaining time against `now`.
    ///
    /// Once the target has been reached this reports `Crossed` a single time
    /// and every later call is a no-op returning `Idle`. A wall clock moved
    /// backwards after crossing does not resurrect the countdown.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.crossed {
            return TickOutcome::Idle;
        }

        let difference = (self.target - now).num_milliseconds();
        if difference <= 0 {
            self.crossed = true;
            TickOutcome::Crossed
        } else {
            TickOutcome::Remaining(Remaining::from_millis(difference))
        }
    }
}
