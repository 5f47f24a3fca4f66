use chrono::NaiveDate;

use crate::calendar;
use crate::save::current_timestamp;

/// Source of "today" and of card timestamps
pub trait Clock {
    fn today(&self) -> NaiveDate;

    /// Unix milliseconds
    fn now_millis(&self) -> u64;
}

/// Local calendar date, wall-clock timestamps
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        calendar::today()
    }

    fn now_millis(&self) -> u64 {
        current_timestamp()
    }
}

/// Frozen clock for tests and replays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now_millis: u64,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now_millis: u64) -> Self {
        Self { today, now_millis }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_millis(&self) -> u64 {
        self.now_millis
    }
}
