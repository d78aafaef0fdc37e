//! Scheduler module: fitting a routine into a time budget.
//!
//! This module provides:
//! - **Eligibility**: whether a task is due now (`is_eligible`).
//! - **Priority calculation**: urgency scores from tier, history and interval.
//! - **Stage 1 selection**: tiered admission with a small tolerance.
//! - **Stage 2 enhancement**: spending leftover time in fixed increments.
//! - **Exhaustive search**: an optimal-but-exponential alternative engine.
//!
//! # Architecture
//!
//! The two-stage engine runs:
//! 1. Filter eligible tasks and score them
//! 2. Admit essentials, then core and optional tasks by urgency
//! 3. Spend what is left on extensions (or late admissions)
//! 4. Emit the result in routine order
//!
//! Every run is a pure function of its inputs and one reading of the clock.
//!
//! # Example
//!
//! ```ignore
//! use routinr::clock::SystemClock;
//! use routinr::scheduler::schedule;
//!
//! let plan = schedule(&tasks, 45 * 60, &SystemClock)?;
//! ```

mod assemble;
mod eligibility;
mod enhance;
mod exhaustive;
mod priority;
mod select;
mod strategy;

pub use assemble::assemble;
pub use eligibility::is_eligible;
pub use enhance::{ActionKind, Enhancement, EnhancementStep, Enhancer};
pub use exhaustive::{Combinations, Optimizer, Subset};
pub use priority::{
    NEVER_COMPLETED_BOOST, OVERDUE_EXPONENT, PRIORITY_CORE, PRIORITY_ESSENTIAL, PRIORITY_INELIGIBLE,
    PRIORITY_OPTIONAL, PriorityConfig, base_priority, calculate_priority, overdue_factor,
};
pub use select::{
    Admission, Budget, EARLY_STOP_UTILIZATION, INCREMENT_SECS, MAX_EXHAUSTIVE_CANDIDATES, SchedulerConfig,
    ScoredTask, TOLERANCE_SECS, TieredSelector, by_urgency, score_eligible,
};
pub use strategy::{Engine, ExhaustiveScheduler, SchedulingStrategy, TwoStageScheduler};

use crate::clock::Clock;
use crate::domain::{ScheduledTask, Seconds, Task, Tier};
use crate::error::Result;

/// Schedule a routine with the two-stage engine and default settings.
pub fn schedule(routine: &[Task], available: Seconds, clock: &dyn Clock) -> Result<Vec<ScheduledTask>> {
    TwoStageScheduler::default().schedule(routine, available, clock)
}

/// Minimum time the eligible tasks at or above `minimum_tier` would take.
pub fn estimate_duration(routine: &[Task], minimum_tier: Tier, clock: &dyn Clock) -> Seconds {
    assemble::estimate_duration(routine, minimum_tier, clock.now())
}

/// Best-scoring subset with the exhaustive engine and default settings.
///
/// `None` if nothing fits, the essentials cannot be placed, or the input is
/// above the default candidate limit.
pub fn optimize(tasks: &[Task], available: Seconds, clock: &dyn Clock) -> Option<Vec<ScheduledTask>> {
    match Optimizer::default().solve(tasks, available, clock.now()) {
        Ok(schedule) => schedule,
        Err(e) => {
            log::info!("Exhaustive search found no schedule: {}", e);
            None
        }
    }
}
