//! Task record and related types
//!
//! A Task is owned by the caller's store. The scheduler reads it and never
//! mutates it; every field must stay stable for the duration of one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SchedulerError};

/// Durations and budgets, in whole seconds
pub type Seconds = u64;

/// Sum durations, saturating at `Seconds::MAX` instead of overflowing
pub fn total_seconds<I: IntoIterator<Item = Seconds>>(durations: I) -> Seconds {
    durations.into_iter().fold(0, Seconds::saturating_add)
}

/// Importance classification of a task
///
/// Variants are declared lowest first so that `Ord` follows the ordinal:
/// `Optional < Core < Essential`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Nice to have, fills leftover time
    Optional,
    /// Should happen, competes on urgency
    Core,
    /// Must happen or the run fails
    Essential,
}

impl Tier {
    /// All tiers, most important first
    pub const ALL: [Tier; 3] = [Tier::Essential, Tier::Core, Tier::Optional];

    /// Numeric rank: Essential = 3, Core = 2, Optional = 1
    pub fn ordinal(self) -> u8 {
        match self {
            Tier::Essential => 3,
            Tier::Core => 2,
            Tier::Optional => 1,
        }
    }

    /// Returns true if this tier is at or above `minimum`
    pub fn at_least(self, minimum: Tier) -> bool {
        self >= minimum
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Essential => "essential",
            Tier::Core => "core",
            Tier::Optional => "optional",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "essential" => Ok(Tier::Essential),
            "core" => Ok(Tier::Core),
            "optional" => Ok(Tier::Optional),
            other => Err(format!("unknown tier '{}' (expected essential, core or optional)", other)),
        }
    }
}

/// Stable task identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A schedulable unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    //=== Identity ===
    /// Unique identifier
    pub id: TaskId,

    /// Display name, also the final tie-break key
    pub name: String,

    /// Importance tier
    pub tier: Tier,

    //=== Duration range ===
    /// Shortest acceptable allocation
    pub min_duration: Seconds,

    /// Preferred allocation; equal to `min_duration` for fixed tasks
    pub max_duration: Seconds,

    //=== Repetition ===
    /// When the task was last completed, if ever
    #[serde(default)]
    pub last_completed_at: Option<DateTime<Utc>>,

    /// Seconds between repetitions; 0 resets once per calendar day
    #[serde(default)]
    pub repetition_interval: Seconds,
}

impl Task {
    /// Create a never-completed, fixed-duration, daily task
    pub fn new(id: impl Into<String>, name: impl Into<String>, tier: Tier, duration: Seconds) -> Self {
        Self {
            id: TaskId::new(id),
            name: name.into(),
            tier,
            min_duration: duration,
            max_duration: duration,
            last_completed_at: None,
            repetition_interval: 0,
        }
    }

    /// Make the task elastic up to `max_duration`
    pub fn with_max_duration(mut self, max_duration: Seconds) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Set the last completion timestamp
    pub fn completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_completed_at = Some(at);
        self
    }

    /// Set the repetition interval
    pub fn every(mut self, interval: Seconds) -> Self {
        self.repetition_interval = interval;
        self
    }

    /// Returns true if the duration can stretch beyond its minimum
    pub fn is_elastic(&self) -> bool {
        self.max_duration > self.min_duration
    }

    /// Number of whole `step`-sized extensions that fit between min and max
    pub fn extension_steps(&self, step: Seconds) -> u64 {
        if step == 0 {
            return 0;
        }
        self.max_duration.saturating_sub(self.min_duration) / step
    }

    /// Check the invariants a catalog must uphold
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(SchedulerError::InvalidTask(format!("task '{}' has an empty id", self.name)));
        }
        if self.min_duration > self.max_duration {
            return Err(SchedulerError::InvalidTask(format!(
                "task '{}' has min_duration {}s > max_duration {}s",
                self.id, self.min_duration, self.max_duration
            )));
        }
        Ok(())
    }
}
