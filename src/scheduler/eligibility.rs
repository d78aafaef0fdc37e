//! Eligibility: is a task due right now?
//!
//! A task is eligible if:
//! 1. It has never been completed, or
//! 2. Its interval is 0 and it was last completed before today (local calendar), or
//! 3. At least `repetition_interval` seconds have passed since its last completion.
//!
//! Every engine and the duration estimator go through `is_eligible`.

use chrono::{DateTime, Local, Utc};

use crate::domain::Task;

/// Check whether a task is a scheduling candidate at `now`.
pub fn is_eligible(task: &Task, now: DateTime<Local>) -> bool {
    let Some(last) = task.last_completed_at else {
        return true;
    };

    if task.repetition_interval == 0 {
        return last.with_timezone(&Local).date_naive() != now.date_naive();
    }

    seconds_since(last, now) >= i64::try_from(task.repetition_interval).unwrap_or(i64::MAX)
}

/// Signed seconds from `last` to `now`; negative if `last` lies in the future.
pub(crate) fn seconds_since(last: DateTime<Utc>, now: DateTime<Local>) -> i64 {
    now.with_timezone(&Utc).signed_duration_since(last).num_seconds()
}
