//! Routines and the task read API they resolve against
//!
//! A routine is an ordered list of task references. Resolution is lenient: a
//! reference the source can no longer satisfy is logged and skipped, never
//! fatal for the whole routine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::task::{Seconds, Task, TaskId};
use crate::error::SchedulerError;

/// Read-only access to tasks by id
pub trait TaskSource {
    /// Look up a task; `None` if the id no longer resolves
    fn task(&self, id: &TaskId) -> Option<Task>;
}

impl TaskSource for HashMap<TaskId, Task> {
    fn task(&self, id: &TaskId) -> Option<Task> {
        self.get(id).cloned()
    }
}

impl TaskSource for [Task] {
    fn task(&self, id: &TaskId) -> Option<Task> {
        self.iter().find(|t| &t.id == id).cloned()
    }
}

/// An ordered sequence of task references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    /// Routine name, unique within a catalog
    pub name: String,

    /// Task references in the order they should run
    pub tasks: Vec<TaskId>,

    /// Slack held back from the time window before scheduling
    #[serde(default)]
    pub buffer_secs: Seconds,
}

impl Routine {
    pub fn new(name: impl Into<String>, tasks: Vec<TaskId>) -> Self {
        Self {
            name: name.into(),
            tasks,
            buffer_secs: 0,
        }
    }

    /// Set the buffer kept free at the end of the window
    pub fn with_buffer(mut self, buffer_secs: Seconds) -> Self {
        self.buffer_secs = buffer_secs;
        self
    }

    /// Budget handed to the scheduler for a given time window
    pub fn available_after_buffer(&self, window: Seconds) -> Seconds {
        window.saturating_sub(self.buffer_secs)
    }

    /// Resolve references to tasks, preserving order.
    ///
    /// Dangling references are logged as `TaskReferenceInvalid` and skipped.
    pub fn resolve<S: TaskSource + ?Sized>(&self, source: &S) -> Vec<Task> {
        let mut resolved = Vec::with_capacity(self.tasks.len());
        for id in &self.tasks {
            match source.task(id) {
                Some(task) => resolved.push(task),
                None => {
                    let err = SchedulerError::TaskReferenceInvalid(id.to_string());
                    log::warn!("Routine '{}': skipping entry: {}", self.name, err);
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::Tier;

    fn source() -> HashMap<TaskId, Task> {
        let mut map = HashMap::new();
        for task in [
            Task::new("a", "A", Tier::Essential, 600),
            Task::new("b", "B", Tier::Core, 300),
            Task::new("c", "C", Tier::Optional, 300),
        ] {
            map.insert(task.id.clone(), task);
        }
        map
    }

    #[test]
    fn test_resolve_preserves_order() {
        let routine = Routine::new("morning", vec!["c".into(), "a".into(), "b".into()]);
        let tasks = routine.resolve(&source());
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_resolve_skips_dangling_reference() {
        let routine = Routine::new("morning", vec!["a".into(), "gone".into(), "b".into()]);
        let tasks = routine.resolve(&source());
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_resolve_all_dangling() {
        let routine = Routine::new("ghost", vec!["x".into(), "y".into()]);
        assert!(routine.resolve(&source()).is_empty());
    }

    #[test]
    fn test_resolve_against_slice() {
        let tasks = vec![Task::new("a", "A", Tier::Core, 60)];
        let routine = Routine::new("r", vec!["a".into(), "b".into()]);
        let resolved = routine.resolve(tasks.as_slice());
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_available_after_buffer() {
        let routine = Routine::new("r", vec![]).with_buffer(300);
        assert_eq!(routine.available_after_buffer(3_600), 3_300);
        assert_eq!(routine.available_after_buffer(120), 0);
    }

    #[test]
    fn test_routine_deserialize_default_buffer() {
        let routine: Routine = serde_yaml::from_str("name: evening\ntasks: [a, b]\n").unwrap();
        assert_eq!(routine.buffer_secs, 0);
        assert_eq!(routine.tasks, vec![TaskId::from("a"), TaskId::from("b")]);
    }
}
