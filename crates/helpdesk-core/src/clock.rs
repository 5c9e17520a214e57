//! Wall-clock access for log timestamps and save times.

use chrono::{DateTime, Local};

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    at: DateTime<Local>,
}

impl FixedClock {
    #[must_use]
    pub const fn new(at: DateTime<Local>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.at
    }
}

/// Format a time of day the way log lines show it, e.g. `2:05:09 PM`.
#[must_use]
pub fn time_of_day(at: &DateTime<Local>) -> String {
    at.format("%-I:%M:%S %p").to_string()
}
