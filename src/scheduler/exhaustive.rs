//! Exhaustive subset search.
//!
//! An alternative to the two-stage engine for small inputs. Essential tasks
//! are forced in first, exactly as in Stage 1. Every subset of the remaining
//! eligible tasks is then a candidate, visited from the largest size down.
//! The winner has the highest total score, then the highest utilization of
//! the remaining budget.
//!
//! # Complexity
//!
//! `n` candidates mean up to `2^n` subsets, each summed in `O(n)`. This is
//! only viable for small sets (around 15-20 tasks), so callers must bound the
//! input: the search refuses more than `max_candidates` non-essential tasks.
//! Two shortcuts trim the work without changing the result's shape:
//! - a subset size is skipped when even its cheapest members overflow
//! - the search stops after a size whose best subset fills at least
//!   `early_stop_utilization` of the budget
//!
//! The early stop trades optimality for time: a smaller subset with a higher
//! score may exist below the size where the search stopped.
//!
//! Allocations are always at `min_duration`; there is no enhancement pass.

use chrono::{DateTime, Local};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::{ScheduledTask, Seconds, Task, TaskId, Tier, total_seconds};
use crate::error::{Result, SchedulerError};
use crate::scheduler::assemble::assemble;
use crate::scheduler::priority::PriorityConfig;
use crate::scheduler::select::{Budget, SchedulerConfig, ScoredTask, admit_essentials, score_eligible};

/// A feasible selection of non-essential candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct Subset {
    /// Indices into the candidate list, ascending
    pub members: Vec<usize>,
    pub score: f64,
    pub duration: Seconds,
}

impl Subset {
    /// Higher score wins; at equal score, the fuller subset wins.
    fn beats(&self, other: &Subset) -> bool {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.duration.cmp(&other.duration))
            == Ordering::Greater
    }
}

/// Share of `remaining` a subset uses; a zero budget counts as full.
fn utilization(duration: Seconds, remaining: Seconds) -> f64 {
    if remaining == 0 {
        1.0
    } else {
        duration as f64 / remaining as f64
    }
}

/// Exhaustive optimizer.
#[derive(Debug, Clone)]
pub struct Optimizer {
    tolerance: Seconds,
    early_stop_utilization: f64,
    max_candidates: usize,
    priority: PriorityConfig,
}

impl Optimizer {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            tolerance: config.tolerance_secs,
            early_stop_utilization: config.early_stop_utilization,
            max_candidates: config.max_exhaustive_candidates,
            priority: config.priority.clone(),
        }
    }

    /// Find the best-scoring schedule that fits `available`.
    ///
    /// - `Err(InsufficientTime)` if essential tasks cannot be placed
    /// - `Err(CandidateLimit)` if there are too many non-essential candidates
    /// - `Ok(None)` if nothing at all fits (or nothing is eligible)
    pub fn solve(&self, tasks: &[Task], available: Seconds, now: DateTime<Local>) -> Result<Option<Vec<ScheduledTask>>> {
        let scored = score_eligible(tasks, now, &self.priority);
        if scored.is_empty() {
            return Ok(None);
        }

        let (essential, candidates): (Vec<_>, Vec<_>) =
            scored.into_iter().partition(|s| s.task.tier == Tier::Essential);
        if candidates.len() > self.max_candidates {
            return Err(SchedulerError::CandidateLimit {
                count: candidates.len(),
                limit: self.max_candidates,
            });
        }

        let mut budget = Budget::new(available, self.tolerance);
        let forced = admit_essentials(essential, &mut budget, available)?;

        let mut allocations: HashMap<TaskId, Seconds> = forced
            .iter()
            .map(|s| (s.task.id.clone(), s.task.min_duration))
            .collect();

        if let Some(best) = self.best_subset(&candidates, budget.remaining) {
            log::debug!(
                "Best subset: {} tasks, score {:.2}, {}s of {}s",
                best.members.len(),
                best.score,
                best.duration,
                budget.remaining
            );
            for &i in &best.members {
                let task = candidates[i].task;
                allocations.insert(task.id.clone(), task.min_duration);
            }
        }

        if allocations.is_empty() {
            return Ok(None);
        }
        Ok(Some(assemble(tasks, &allocations)))
    }

    /// Search subsets of `candidates` that fit in `remaining`.
    pub fn best_subset(&self, candidates: &[ScoredTask<'_>], remaining: Seconds) -> Option<Subset> {
        let n = candidates.len();
        let mut durations: Vec<Seconds> = candidates.iter().map(|c| c.task.min_duration).collect();
        durations.sort_unstable();

        let mut best: Option<Subset> = None;
        for size in (1..=n).rev() {
            let cheapest = total_seconds(durations[..size].iter().copied());
            if cheapest > remaining {
                continue;
            }

            for members in Combinations::new(n, size) {
                let duration = total_seconds(members.iter().map(|&i| candidates[i].task.min_duration));
                if duration > remaining {
                    continue;
                }
                let score: f64 = members.iter().map(|&i| candidates[i].score).sum();
                let subset = Subset {
                    members,
                    score,
                    duration,
                };
                if best.as_ref().is_none_or(|b| subset.beats(b)) {
                    best = Some(subset);
                }
            }

            if let Some(b) = &best
                && utilization(b.duration, remaining) >= self.early_stop_utilization
            {
                log::debug!("Stopping search after size {}: utilization reached", size);
                break;
            }
        }

        best
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

/// k-combinations of `0..n` in lexicographic order.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        // Advance the rightmost index that still has room
        let k = self.indices.len();
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] < self.n - k + i {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }

        Some(current)
    }
}
