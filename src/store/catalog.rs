//! YAML task catalog.
//!
//! The catalog is the read side of the task store: a flat list of task
//! definitions plus the routines that reference them.
//!
//! ```yaml
//! tasks:
//!   - id: meds
//!     name: Take medication
//!     tier: essential
//!     duration: 120
//!   - id: stretch
//!     name: Stretch
//!     tier: core
//!     min_duration: 300
//!     max_duration: 900
//!     last_completed_at: 2026-06-09T07:10:00Z
//!     repetition_interval: 0
//! routines:
//!   - name: morning
//!     tasks: [meds, stretch]
//!     buffer_secs: 300
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::domain::{Routine, Seconds, Task, TaskId, TaskSource, Tier};
use crate::error::{Result, SchedulerError};

/// On-disk task definition; `max_duration` defaults to the minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDef {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    #[serde(alias = "duration")]
    pub min_duration: Seconds,
    #[serde(default)]
    pub max_duration: Option<Seconds>,
    #[serde(default)]
    pub last_completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repetition_interval: Seconds,
}

impl TryFrom<TaskDef> for Task {
    type Error = SchedulerError;

    fn try_from(def: TaskDef) -> Result<Self> {
        let task = Task {
            id: TaskId::new(def.id),
            name: def.name,
            tier: def.tier,
            min_duration: def.min_duration,
            max_duration: def.max_duration.unwrap_or(def.min_duration),
            last_completed_at: def.last_completed_at,
            repetition_interval: def.repetition_interval,
        };
        task.validate()?;
        Ok(task)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    tasks: Vec<TaskDef>,
    routines: Vec<Routine>,
}

/// Tasks and routines loaded from one catalog file.
#[derive(Debug, Clone, Default)]
pub struct TaskCatalog {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
    routines: Vec<Routine>,
}

impl TaskCatalog {
    /// Load a catalog from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let catalog = Self::from_yaml(&content)?;
        log::info!(
            "Loaded catalog from {}: {} tasks, {} routines",
            path.as_ref().display(),
            catalog.tasks.len(),
            catalog.routines.len()
        );
        Ok(catalog)
    }

    /// Parse and validate catalog YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)?;

        let mut catalog = Self::default();
        for def in file.tasks {
            catalog.insert(Task::try_from(def)?)?;
        }
        for routine in file.routines {
            catalog.add_routine(routine);
        }
        Ok(catalog)
    }

    /// Add a task; ids must be unique.
    pub fn insert(&mut self, task: Task) -> Result<()> {
        if self.index.contains_key(&task.id) {
            return Err(SchedulerError::InvalidTask(format!("duplicate task id '{}'", task.id)));
        }
        self.index.insert(task.id.clone(), self.tasks.len());
        self.tasks.push(task);
        Ok(())
    }

    /// Add or replace a routine by name.
    pub fn add_routine(&mut self, routine: Routine) {
        if let Some(existing) = self.routines.iter_mut().find(|r| r.name == routine.name) {
            log::warn!("Routine '{}' defined twice, keeping the later one", routine.name);
            *existing = routine;
        } else {
            self.routines.push(routine);
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn routines(&self) -> &[Routine] {
        &self.routines
    }

    /// Look up a routine by name.
    pub fn routine(&self, name: &str) -> Result<&Routine> {
        self.routines
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| SchedulerError::RoutineNotFound(name.to_string()))
    }
}

impl TaskSource for TaskCatalog {
    fn task(&self, id: &TaskId) -> Option<Task> {
        self.index.get(id).map(|&i| self.tasks[i].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG: &str = r#"
tasks:
  - id: meds
    name: Take medication
    tier: essential
    duration: 120
  - id: stretch
    name: Stretch
    tier: core
    min_duration: 300
    max_duration: 900
    last_completed_at: 2026-06-09T07:10:00Z
  - id: read
    name: Read
    tier: optional
    min_duration: 600
    repetition_interval: 172800
routines:
  - name: morning
    tasks: [meds, stretch, missing, read]
    buffer_secs: 300
  - name: evening
    tasks: [read]
"#;

    #[test]
    fn test_from_yaml() {
        let catalog = TaskCatalog::from_yaml(CATALOG).unwrap();
        assert_eq!(catalog.tasks().len(), 3);
        assert_eq!(catalog.routines().len(), 2);

        let meds = catalog.task(&TaskId::from("meds")).unwrap();
        assert_eq!(meds.min_duration, 120);
        assert_eq!(meds.max_duration, 120);

        let stretch = catalog.task(&TaskId::from("stretch")).unwrap();
        assert!(stretch.is_elastic());
        assert!(stretch.last_completed_at.is_some());

        let read = catalog.task(&TaskId::from("read")).unwrap();
        assert_eq!(read.repetition_interval, 172_800);
    }

    #[test]
    fn test_routine_lookup_and_resolve() {
        let catalog = TaskCatalog::from_yaml(CATALOG).unwrap();
        let routine = catalog.routine("morning").unwrap();
        assert_eq!(routine.buffer_secs, 300);

        let tasks = routine.resolve(&catalog);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["meds", "stretch", "read"]);
    }

    #[test]
    fn test_routine_not_found() {
        let catalog = TaskCatalog::from_yaml(CATALOG).unwrap();
        let err = catalog.routine("lunch").unwrap_err();
        assert!(matches!(err, SchedulerError::RoutineNotFound(name) if name == "lunch"));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let yaml = "tasks:\n  - id: x\n    name: X\n    tier: core\n    min_duration: 600\n    max_duration: 300\n";
        let err = TaskCatalog::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidTask(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let yaml = r#"
tasks:
  - { id: x, name: X, tier: core, duration: 60 }
  - { id: x, name: Y, tier: core, duration: 60 }
"#;
        let err = TaskCatalog::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate task id"));
    }

    #[test]
    fn test_rejects_unknown_tier() {
        let yaml = "tasks:\n  - { id: x, name: X, tier: urgent, duration: 60 }\n";
        let err = TaskCatalog::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, SchedulerError::Yaml(_)));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = TaskCatalog::from_yaml("{}").unwrap();
        assert!(catalog.tasks().is_empty());
        assert!(catalog.routines().is_empty());
    }

    #[test]
    fn test_duplicate_routine_keeps_later() {
        let mut catalog = TaskCatalog::default();
        catalog.add_routine(Routine::new("r", vec!["a".into()]));
        catalog.add_routine(Routine::new("r", vec!["b".into()]));
        assert_eq!(catalog.routines().len(), 1);
        assert_eq!(catalog.routine("r").unwrap().tasks, vec![TaskId::from("b")]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        let catalog = TaskCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.tasks().len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = TaskCatalog::load("/nonexistent/routinr/catalog.yml").unwrap_err();
        assert!(matches!(err, SchedulerError::Io(_)));
    }
}
