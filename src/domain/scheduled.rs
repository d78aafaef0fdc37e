//! Scheduler output types.

use serde::{Deserialize, Serialize};

use crate::domain::task::{Seconds, Task, Tier, total_seconds};

/// A task placed in a schedule with its final allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// The admitted task
    pub task: Task,
    /// Seconds allocated, within `[min_duration, max_duration]`
    pub allocated_duration: Seconds,
}

impl ScheduledTask {
    pub fn new(task: Task, allocated_duration: Seconds) -> Self {
        Self {
            task,
            allocated_duration,
        }
    }

    /// Seconds granted beyond the task's minimum
    pub fn extension(&self) -> Seconds {
        self.allocated_duration.saturating_sub(self.task.min_duration)
    }

    /// Returns true if the allocation grew past the minimum
    pub fn is_extended(&self) -> bool {
        self.extension() > 0
    }
}

/// Aggregate view of a schedule against its budget
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub available: Seconds,
    pub total_allocated: Seconds,
    /// Budget left unspent
    pub unused: Seconds,
    /// Seconds over budget, only ever non-zero within tolerance
    pub overrun: Seconds,
    pub essential: usize,
    pub core: usize,
    pub optional: usize,
    /// Tasks allocated beyond their minimum
    pub extended: usize,
}

impl ScheduleSummary {
    pub fn new(schedule: &[ScheduledTask], available: Seconds) -> Self {
        let total_allocated = total_seconds(schedule.iter().map(|s| s.allocated_duration));
        let count = |tier: Tier| schedule.iter().filter(|s| s.task.tier == tier).count();

        Self {
            available,
            total_allocated,
            unused: available.saturating_sub(total_allocated),
            overrun: total_allocated.saturating_sub(available),
            essential: count(Tier::Essential),
            core: count(Tier::Core),
            optional: count(Tier::Optional),
            extended: schedule.iter().filter(|s| s.is_extended()).count(),
        }
    }

    /// Number of scheduled tasks across all tiers
    pub fn task_count(&self) -> usize {
        self.essential + self.core + self.optional
    }
}
