//! Stage 1: tiered admission.
//!
//! The selector decides which eligible tasks get into the budget at their
//! minimum duration:
//! - Essential tasks first, in routine order, all or nothing
//! - Core tasks by urgency, skipping any that do not fit
//! - Optional tasks by urgency, same rules
//!
//! A task that overshoots the remaining budget by no more than the tolerance
//! is still admitted and the budget drops to zero. The tolerance is a single
//! allowance per run, so the total never exceeds `available + tolerance`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::domain::{Seconds, Task, TaskId, Tier, total_seconds};
use crate::error::{Result, SchedulerError};
use crate::scheduler::eligibility::is_eligible;
use crate::scheduler::priority::PriorityConfig;

/// Slack allowed when a task marginally exceeds the remaining budget.
pub const TOLERANCE_SECS: Seconds = 60;
/// Size of one enhancement step.
pub const INCREMENT_SECS: Seconds = 300;
/// Largest candidate set the exhaustive engine accepts.
pub const MAX_EXHAUSTIVE_CANDIDATES: usize = 20;
/// Utilization at which the exhaustive search stops looking.
pub const EARLY_STOP_UTILIZATION: f64 = 0.8;

/// Configuration shared by both scheduling engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Admission slack at the budget boundary.
    pub tolerance_secs: Seconds,
    /// Enhancement step size.
    pub increment_secs: Seconds,
    /// Exhaustive engine: refuse more non-essential candidates than this.
    pub max_exhaustive_candidates: usize,
    /// Exhaustive engine: stop once the best subset fills this share of the budget.
    pub early_stop_utilization: f64,
    /// Scoring weights.
    #[serde(skip)]
    pub priority: PriorityConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: TOLERANCE_SECS,
            increment_secs: INCREMENT_SECS,
            max_exhaustive_candidates: MAX_EXHAUSTIVE_CANDIDATES,
            early_stop_utilization: EARLY_STOP_UTILIZATION,
            priority: PriorityConfig::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the admission tolerance.
    pub fn with_tolerance(mut self, tolerance_secs: Seconds) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Set the enhancement step size.
    pub fn with_increment(mut self, increment_secs: Seconds) -> Self {
        self.increment_secs = increment_secs;
        self
    }

    /// Set the scoring weights.
    pub fn with_priority(mut self, priority: PriorityConfig) -> Self {
        self.priority = priority;
        self
    }

    /// Set the exhaustive engine's input limit.
    pub fn with_max_exhaustive_candidates(mut self, limit: usize) -> Self {
        self.max_exhaustive_candidates = limit;
        self
    }
}

/// An eligible task with its score for this run.
#[derive(Debug, Clone)]
pub struct ScoredTask<'a> {
    /// Position in the caller's routine
    pub index: usize,
    pub task: &'a Task,
    pub score: f64,
}

/// Drop duplicates and ineligible tasks, then score the rest.
///
/// The first occurrence of an id wins; later ones are logged and ignored.
pub fn score_eligible<'a>(routine: &'a [Task], now: DateTime<Local>, priority: &PriorityConfig) -> Vec<ScoredTask<'a>> {
    let mut seen: HashSet<&TaskId> = HashSet::new();
    let mut scored = Vec::new();

    for (index, task) in routine.iter().enumerate() {
        if !seen.insert(&task.id) {
            log::warn!("Duplicate routine entry '{}' at position {}, ignoring", task.id, index);
            continue;
        }
        if !is_eligible(task, now) {
            log::debug!("Task '{}' not due, skipping", task.id);
            continue;
        }
        scored.push(ScoredTask {
            index,
            task,
            score: priority.calculate_priority(task, now),
        });
    }

    scored
}

/// Order for core/optional admission: score desc, oldest completion first
/// (never completed counts as oldest), then routine position.
pub fn by_urgency(a: &ScoredTask<'_>, b: &ScoredTask<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.task.last_completed_at.cmp(&b.task.last_completed_at))
        .then_with(|| a.index.cmp(&b.index))
}

/// Remaining time plus the unspent part of the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub remaining: Seconds,
    pub tolerance_left: Seconds,
}

impl Budget {
    pub fn new(available: Seconds, tolerance: Seconds) -> Self {
        Self {
            remaining: available,
            tolerance_left: tolerance,
        }
    }

    /// Take `cost` from the budget, dipping into the tolerance if needed.
    ///
    /// Returns false and leaves the budget untouched if it cannot be paid.
    pub fn try_take(&mut self, cost: Seconds) -> bool {
        if cost <= self.remaining {
            self.remaining -= cost;
            return true;
        }
        let shortfall = cost - self.remaining;
        if shortfall <= self.tolerance_left {
            self.tolerance_left -= shortfall;
            self.remaining = 0;
            return true;
        }
        false
    }
}

/// Stage 1 result, consumed by the enhancement stage.
#[derive(Debug, Clone)]
pub struct Admission<'a> {
    /// Admitted tasks in admission order
    pub admitted: Vec<ScoredTask<'a>>,
    /// Eligible tasks that did not make it in
    pub unadmitted: Vec<ScoredTask<'a>>,
    pub budget: Budget,
}

impl Admission<'_> {
    /// Baseline allocation: every admitted task at its minimum.
    pub fn allocations(&self) -> HashMap<TaskId, Seconds> {
        self.admitted
            .iter()
            .map(|s| (s.task.id.clone(), s.task.min_duration))
            .collect()
    }

    pub fn remaining(&self) -> Seconds {
        self.budget.remaining
    }

    pub fn is_admitted(&self, id: &TaskId) -> bool {
        self.admitted.iter().any(|s| &s.task.id == id)
    }
}

/// Admits tasks tier by tier.
#[derive(Debug, Clone)]
pub struct TieredSelector {
    tolerance: Seconds,
}

impl TieredSelector {
    pub fn new(tolerance: Seconds) -> Self {
        Self { tolerance }
    }

    /// Run all three admission passes over scored, eligible tasks.
    pub fn admit<'a>(&self, scored: Vec<ScoredTask<'a>>, available: Seconds) -> Result<Admission<'a>> {
        let mut budget = Budget::new(available, self.tolerance);

        let (essential, rest): (Vec<_>, Vec<_>) = scored.into_iter().partition(|s| s.task.tier == Tier::Essential);
        let (core, optional): (Vec<_>, Vec<_>) = rest.into_iter().partition(|s| s.task.tier == Tier::Core);

        let mut admitted = admit_essentials(essential, &mut budget, available)?;
        let mut unadmitted = Vec::new();

        for (tier, pass) in [(Tier::Core, core), (Tier::Optional, optional)] {
            let (taken, skipped) = admit_greedy(pass, &mut budget);
            log::debug!(
                "{} pass: admitted {}, skipped {}, {}s left",
                tier,
                taken.len(),
                skipped.len(),
                budget.remaining
            );
            admitted.extend(taken);
            unadmitted.extend(skipped);
        }

        Ok(Admission {
            admitted,
            unadmitted,
            budget,
        })
    }
}

impl Default for TieredSelector {
    fn default() -> Self {
        Self::new(TOLERANCE_SECS)
    }
}

/// Admit every essential task in routine order, or fail the run.
pub fn admit_essentials<'a>(
    essential: Vec<ScoredTask<'a>>,
    budget: &mut Budget,
    available: Seconds,
) -> Result<Vec<ScoredTask<'a>>> {
    let required = total_seconds(essential.iter().map(|s| s.task.min_duration));
    let mut admitted = Vec::with_capacity(essential.len());

    for scored in essential {
        if !budget.try_take(scored.task.min_duration) {
            log::info!(
                "Essential task '{}' ({}s) does not fit: {}s needed, {}s available",
                scored.task.id,
                scored.task.min_duration,
                required,
                available
            );
            return Err(SchedulerError::InsufficientTime { required, available });
        }
        log::debug!("Admitted essential '{}' ({}s)", scored.task.id, scored.task.min_duration);
        admitted.push(scored);
    }

    Ok(admitted)
}

/// Greedy pass by urgency; returns (admitted, skipped).
fn admit_greedy<'a>(mut pass: Vec<ScoredTask<'a>>, budget: &mut Budget) -> (Vec<ScoredTask<'a>>, Vec<ScoredTask<'a>>) {
    pass.sort_by(by_urgency);

    let mut admitted = Vec::new();
    let mut skipped = Vec::new();
    for scored in pass {
        if budget.try_take(scored.task.min_duration) {
            log::debug!(
                "Admitted {} '{}' ({}s, score {:.2})",
                scored.task.tier,
                scored.task.id,
                scored.task.min_duration,
                scored.score
            );
            admitted.push(scored);
        } else {
            skipped.push(scored);
        }
    }

    (admitted, skipped)
}
