//! Interchangeable scheduling engines.
//!
//! Both engines take the same inputs and honor the same contract, so callers
//! (and the property tests) can swap them freely:
//! - `TwoStageScheduler`: tiered admission plus enhancement, linear-ish
//! - `ExhaustiveScheduler`: best-scoring subset, exponential, small inputs only

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::Clock;
use crate::domain::{ScheduledTask, Seconds, Task};
use crate::error::Result;
use crate::scheduler::assemble::assemble;
use crate::scheduler::enhance::Enhancer;
use crate::scheduler::exhaustive::Optimizer;
use crate::scheduler::select::{SchedulerConfig, TieredSelector, score_eligible};

/// A scheduling engine.
///
/// Implementations hold only immutable configuration, so one instance can
/// serve concurrent calls. The clock is read once per call.
pub trait SchedulingStrategy: Send + Sync {
    /// Short engine name for logs and output
    fn name(&self) -> &'static str;

    /// Fit `routine` into `available` seconds (already net of any buffer).
    ///
    /// Output is in routine order. An empty result is not an error.
    fn schedule(&self, routine: &[Task], available: Seconds, clock: &dyn Clock) -> Result<Vec<ScheduledTask>>;
}

/// Greedy tiered admission followed by enhancement.
#[derive(Debug, Clone, Default)]
pub struct TwoStageScheduler {
    config: SchedulerConfig,
}

impl TwoStageScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }
}

impl SchedulingStrategy for TwoStageScheduler {
    fn name(&self) -> &'static str {
        "two-stage"
    }

    fn schedule(&self, routine: &[Task], available: Seconds, clock: &dyn Clock) -> Result<Vec<ScheduledTask>> {
        let now = clock.now();
        let scored = score_eligible(routine, now, &self.config.priority);
        if scored.is_empty() {
            log::info!("No eligible tasks among {} in routine", routine.len());
            return Ok(Vec::new());
        }

        let admission = TieredSelector::new(self.config.tolerance_secs).admit(scored, available)?;
        let enhancement = Enhancer::new(self.config.increment_secs).enhance(&admission);
        let schedule = assemble(routine, &enhancement.allocations);

        log::info!(
            "Scheduled {} of {} tasks into {}s ({} admitted, {} enhancement steps, {}s unused)",
            schedule.len(),
            routine.len(),
            available,
            admission.admitted.len(),
            enhancement.trace.len(),
            enhancement.remaining
        );
        Ok(schedule)
    }
}

/// Exhaustive subset search; an empty schedule when nothing fits.
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveScheduler {
    optimizer: Optimizer,
}

impl ExhaustiveScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            optimizer: Optimizer::new(&config),
        }
    }
}

impl SchedulingStrategy for ExhaustiveScheduler {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn schedule(&self, routine: &[Task], available: Seconds, clock: &dyn Clock) -> Result<Vec<ScheduledTask>> {
        let schedule = self.optimizer.solve(routine, available, clock.now())?.unwrap_or_default();
        log::info!(
            "Exhaustive search placed {} of {} tasks into {}s",
            schedule.len(),
            routine.len(),
            available
        );
        Ok(schedule)
    }
}

/// Engine selector for configuration and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    #[default]
    TwoStage,
    Exhaustive,
}

impl Engine {
    /// Build the engine with the given configuration.
    pub fn strategy(self, config: SchedulerConfig) -> Box<dyn SchedulingStrategy> {
        match self {
            Engine::TwoStage => Box::new(TwoStageScheduler::new(config)),
            Engine::Exhaustive => Box::new(ExhaustiveScheduler::new(config)),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::TwoStage => write!(f, "two-stage"),
            Engine::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two-stage" | "greedy" => Ok(Engine::TwoStage),
            "exhaustive" | "optimal" => Ok(Engine::Exhaustive),
            other => Err(format!("unknown engine '{}' (expected two-stage or exhaustive)", other)),
        }
    }
}
