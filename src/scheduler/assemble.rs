//! Output assembly and duration estimates.

use chrono::{DateTime, Local};
use std::collections::{HashMap, HashSet};

use crate::domain::{ScheduledTask, Seconds, Task, TaskId, Tier, total_seconds};
use crate::scheduler::eligibility::is_eligible;

/// Emit allocated tasks in routine order.
///
/// Tasks without an allocation are omitted, and a repeated id is emitted once.
pub fn assemble(routine: &[Task], allocations: &HashMap<TaskId, Seconds>) -> Vec<ScheduledTask> {
    let mut emitted: HashSet<&TaskId> = HashSet::new();

    routine
        .iter()
        .filter_map(|task| {
            let allocated = *allocations.get(&task.id)?;
            emitted
                .insert(&task.id)
                .then(|| ScheduledTask::new(task.clone(), allocated))
        })
        .collect()
}

/// Sum of minimum durations over eligible tasks at or above `minimum_tier`.
///
/// Uses the same eligibility rule and duplicate handling as the schedulers,
/// without running admission.
pub fn estimate_duration(routine: &[Task], minimum_tier: Tier, now: DateTime<Local>) -> Seconds {
    let mut seen: HashSet<TaskId> = HashSet::new();

    total_seconds(
        routine
            .iter()
            .filter(|task| seen.insert(task.id.clone()))
            .filter(|task| task.tier.at_least(minimum_tier) && is_eligible(task, now))
            .map(|task| task.min_duration),
    )
}
