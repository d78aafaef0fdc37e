//! Stage 2: spend leftover budget.
//!
//! After admission, any remaining time goes to a pool of candidate actions:
//! - **AddTask**: admit an unadmitted eligible task at its minimum
//! - **Extend**: grow an admitted elastic task by one increment
//!
//! Each round picks the best affordable action by score, then cheaper cost,
//! then name (descending). Candidates are immutable; a round replaces the
//! executed candidate with its successor, if any. The loop never backtracks.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::{Seconds, Task, TaskId};
use crate::scheduler::select::{Admission, INCREMENT_SECS};

/// What a candidate does when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Admit the task at its minimum duration
    AddTask,
    /// Add one increment; `steps_left` counts this one
    Extend { steps_left: u64 },
}

/// One possible use of the remaining budget.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub task: &'a Task,
    pub score: f64,
    pub cost: Seconds,
    pub kind: ActionKind,
}

impl<'a> Candidate<'a> {
    fn add_task(task: &'a Task, score: f64) -> Self {
        Self {
            task,
            score,
            cost: task.min_duration,
            kind: ActionKind::AddTask,
        }
    }

    /// Extension candidate for a freshly admitted task, if it can grow.
    fn extend(task: &'a Task, score: f64, increment: Seconds) -> Option<Self> {
        let steps_left = task.extension_steps(increment);
        (steps_left > 0).then_some(Self {
            task,
            score,
            cost: increment,
            kind: ActionKind::Extend { steps_left },
        })
    }

    /// The candidate that replaces this one once executed.
    fn successor(&self, increment: Seconds) -> Option<Self> {
        match self.kind {
            ActionKind::AddTask => Self::extend(self.task, self.score, increment),
            ActionKind::Extend { steps_left } if steps_left > 1 => Some(Self {
                kind: ActionKind::Extend {
                    steps_left: steps_left - 1,
                },
                ..self.clone()
            }),
            ActionKind::Extend { .. } => None,
        }
    }
}

/// Ranking: score desc, cost asc, name desc, id desc.
///
/// Returns `Greater` when `a` should be picked over `b`.
pub fn rank(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| b.cost.cmp(&a.cost))
        .then_with(|| a.task.name.cmp(&b.task.name))
        .then_with(|| a.task.id.cmp(&b.task.id))
}

/// One executed action, for tracing and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementStep {
    pub task_id: TaskId,
    pub kind: ActionKind,
    pub cost: Seconds,
    pub remaining_after: Seconds,
}

/// Stage 2 result.
#[derive(Debug, Clone, Default)]
pub struct Enhancement {
    /// Final allocation per task
    pub allocations: HashMap<TaskId, Seconds>,
    pub remaining: Seconds,
    /// Executed actions, in order
    pub trace: Vec<EnhancementStep>,
}

/// Runs the enhancement loop.
#[derive(Debug, Clone)]
pub struct Enhancer {
    increment: Seconds,
}

impl Enhancer {
    pub fn new(increment: Seconds) -> Self {
        Self {
            increment: increment.max(1),
        }
    }

    /// Spend the budget left over after admission.
    pub fn enhance(&self, admission: &Admission<'_>) -> Enhancement {
        let mut allocations = admission.allocations();
        let mut remaining = admission.remaining();
        let mut trace = Vec::new();

        let mut candidates: Vec<Candidate<'_>> = admission
            .admitted
            .iter()
            .filter_map(|s| Candidate::extend(s.task, s.score, self.increment))
            .chain(admission.unadmitted.iter().map(|s| Candidate::add_task(s.task, s.score)))
            .collect();

        while remaining >= self.increment {
            let Some(best) = candidates
                .iter()
                .filter(|c| c.cost <= remaining)
                .max_by(|a, b| rank(a, b))
                .cloned()
            else {
                break;
            };

            remaining -= best.cost;
            let allocation = allocations.entry(best.task.id.clone()).or_insert(0);
            *allocation += best.cost;

            log::debug!(
                "Enhancement {:?} on '{}' (+{}s, score {:.2}), {}s left",
                best.kind,
                best.task.id,
                best.cost,
                best.score,
                remaining
            );
            trace.push(EnhancementStep {
                task_id: best.task.id.clone(),
                kind: best.kind,
                cost: best.cost,
                remaining_after: remaining,
            });

            candidates = candidates
                .into_iter()
                .filter(|c| c.task.id != best.task.id)
                .chain(best.successor(self.increment))
                .collect();
        }

        Enhancement {
            allocations,
            remaining,
            trace,
        }
    }
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::new(INCREMENT_SECS)
    }
}
