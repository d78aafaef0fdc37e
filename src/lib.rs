//! Routinr - fits a routine's tasks into the time you have
//!
//! Tasks are tiered (essential, core, optional) and scored by urgency. The
//! scheduler admits what fits, then spends leftover time extending elastic
//! tasks, and returns the result in routine order.

pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod scheduler;
pub mod store;

pub use error::{Result, SchedulerError};
