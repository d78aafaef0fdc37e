//! Domain types for routinr
//!
//! - Task: a unit of work with a tier, a duration range and repetition data
//! - Routine: an ordered list of task references plus a time buffer
//! - ScheduledTask / ScheduleSummary: scheduler output
//!
//! All of these are plain data. The scheduler reads them for one run and
//! keeps nothing afterward.

pub mod routine;
pub mod scheduled;
pub mod task;

pub use routine::{Routine, TaskSource};
pub use scheduled::{ScheduleSummary, ScheduledTask};
pub use task::{Seconds, Task, TaskId, Tier, total_seconds};
