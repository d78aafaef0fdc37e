//! Read-only task storage for routinr.
//!
//! Tasks and routines live in a YAML catalog owned by the user. The
//! scheduler never writes to it; it only resolves routines into task
//! snapshots through the `TaskSource` trait.
//!
//! # Example
//!
//! ```ignore
//! use routinr::store::TaskCatalog;
//!
//! let catalog = TaskCatalog::load("catalog.yml")?;
//! let routine = catalog.routine("morning")?;
//! let tasks = routine.resolve(&catalog);
//! ```

mod catalog;

pub use catalog::{TaskCatalog, TaskDef};
