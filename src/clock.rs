//! Time source for scheduling runs
//!
//! The engine never reads the system clock itself. Callers hand it a `Clock`
//! and each run samples it exactly once.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Source of "now" in local calendar time
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at one instant, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self(at)
    }

    /// Frozen at a UTC instant, viewed in the local zone
    pub fn at_utc(at: DateTime<Utc>) -> Self {
        Self(at.with_timezone(&Local))
    }

    /// Frozen at a local wall-clock time.
    ///
    /// Returns `None` for times that do not exist or are ambiguous locally
    /// (DST transitions).
    pub fn at_local(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Local
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
