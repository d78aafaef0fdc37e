//! Scheduling property tests
//!
//! Runs the same invariants against every engine through the
//! `SchedulingStrategy` trait, over a handful of fixed routines and a sweep
//! of budgets.

use chrono::{TimeDelta, Utc};
use routinr::clock::{Clock, FixedClock};
use routinr::domain::{ScheduledTask, Seconds, Task, Tier};
use routinr::error::SchedulerError;
use routinr::scheduler::{ExhaustiveScheduler, SchedulingStrategy, TOLERANCE_SECS, TwoStageScheduler};

fn clock() -> FixedClock {
    FixedClock::at_local(2026, 6, 10, 9, 0, 0).unwrap()
}

fn hours_ago(hours: i64) -> chrono::DateTime<Utc> {
    clock().now().with_timezone(&Utc) - TimeDelta::hours(hours)
}

fn strategies() -> Vec<Box<dyn SchedulingStrategy>> {
    vec![
        Box::new(TwoStageScheduler::default()),
        Box::new(ExhaustiveScheduler::default()),
    ]
}

/// Equal minimums, distinct urgency: admission grows as a prefix.
fn steady_routine() -> Vec<Task> {
    vec![
        Task::new("shower", "Shower", Tier::Essential, 600),
        Task::new("stretch", "Stretch", Tier::Core, 300).with_max_duration(900),
        Task::new("plants", "Water plants", Tier::Core, 300)
            .completed_at(hours_ago(48))
            .every(86_400),
        Task::new("journal", "Journal", Tier::Optional, 300),
    ]
}

/// Ineligible, elastic and fixed tasks across all tiers.
fn mixed_routine() -> Vec<Task> {
    vec![
        Task::new("meds", "Take medication", Tier::Essential, 120),
        Task::new("stretch", "Stretch", Tier::Core, 300)
            .with_max_duration(900)
            .completed_at(hours_ago(26)),
        Task::new("read", "Read", Tier::Core, 600)
            .with_max_duration(1_800)
            .completed_at(hours_ago(1))
            .every(86_400),
        Task::new("journal", "Journal", Tier::Optional, 300).with_max_duration(600),
        Task::new("tidy", "Tidy desk", Tier::Optional, 180)
            .completed_at(hours_ago(72))
            .every(172_800),
        Task::new("vitamins", "Vitamins", Tier::Essential, 60),
    ]
}

/// The three-task routine from the design notes.
fn small_routine() -> Vec<Task> {
    vec![
        Task::new("a", "A", Tier::Essential, 600),
        Task::new("b", "B", Tier::Core, 300).with_max_duration(900),
        Task::new("c", "C", Tier::Optional, 300),
    ]
}

fn fixtures() -> Vec<(&'static str, Vec<Task>)> {
    vec![
        ("steady", steady_routine()),
        ("mixed", mixed_routine()),
        ("small", small_routine()),
    ]
}

fn budgets() -> impl Iterator<Item = Seconds> {
    (0..=3_600).step_by(60)
}

fn essential_total(routine: &[Task]) -> Seconds {
    routine
        .iter()
        .filter(|t| t.tier == Tier::Essential)
        .map(|t| t.min_duration)
        .sum()
}

fn total(schedule: &[ScheduledTask]) -> Seconds {
    schedule.iter().map(|s| s.allocated_duration).sum()
}

fn allocation(schedule: &[ScheduledTask], id: &str) -> Option<Seconds> {
    schedule
        .iter()
        .find(|s| s.task.id.as_str() == id)
        .map(|s| s.allocated_duration)
}

/// Every successful run over every fixture and budget.
fn successful_runs() -> Vec<(String, Vec<Task>, Seconds, Vec<ScheduledTask>)> {
    let clock = clock();
    let mut runs = Vec::new();
    for strategy in strategies() {
        for (name, routine) in fixtures() {
            for available in budgets() {
                if let Ok(schedule) = strategy.schedule(&routine, available, &clock) {
                    let label = format!("{}/{}/{}s", strategy.name(), name, available);
                    runs.push((label, routine.clone(), available, schedule));
                }
            }
        }
    }
    runs
}

/// Every essential task is scheduled whenever the essentials fit.
#[test]
fn test_essential_inviolability() {
    let clock = clock();
    for strategy in strategies() {
        for (name, routine) in fixtures() {
            for available in budgets().filter(|&b| b >= essential_total(&routine)) {
                let schedule = strategy
                    .schedule(&routine, available, &clock)
                    .unwrap_or_else(|e| panic!("{}/{}/{}s failed: {}", strategy.name(), name, available, e));
                for task in routine.iter().filter(|t| t.tier == Tier::Essential) {
                    assert!(
                        allocation(&schedule, task.id.as_str()).is_some(),
                        "{}/{}/{}s dropped essential '{}'",
                        strategy.name(),
                        name,
                        available,
                        task.id
                    );
                }
            }
        }
    }
}

/// The total never exceeds the budget by more than the tolerance.
#[test]
fn test_budget_respect() {
    for (label, _, available, schedule) in successful_runs() {
        assert!(
            total(&schedule) <= available + TOLERANCE_SECS,
            "{}: allocated {}s",
            label,
            total(&schedule)
        );
    }
}

/// Every allocation lies within the task's duration range.
#[test]
fn test_range_validity() {
    for (label, _, _, schedule) in successful_runs() {
        for entry in &schedule {
            assert!(
                entry.allocated_duration >= entry.task.min_duration && entry.allocated_duration <= entry.task.max_duration,
                "{}: '{}' allocated {}s outside [{}, {}]",
                label,
                entry.task.id,
                entry.allocated_duration,
                entry.task.min_duration,
                entry.task.max_duration
            );
        }
    }
}

/// Output follows routine order and never repeats a task.
#[test]
fn test_order_preservation() {
    for (label, routine, _, schedule) in successful_runs() {
        let positions: Vec<usize> = schedule
            .iter()
            .map(|s| {
                routine
                    .iter()
                    .position(|t| t.id == s.task.id)
                    .unwrap_or_else(|| panic!("{}: '{}' not in routine", label, s.task.id))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}: {:?}", label, positions);
    }
}

/// Ineligible tasks never appear.
#[test]
fn test_ineligible_tasks_excluded() {
    for (label, _, _, schedule) in successful_runs() {
        assert!(allocation(&schedule, "read").is_none(), "{}: scheduled 'read'", label);
    }
}

/// Same inputs and the same instant give the same schedule.
#[test]
fn test_determinism() {
    let clock = clock();
    for strategy in strategies() {
        for (name, routine) in fixtures() {
            for available in budgets() {
                let first = strategy.schedule(&routine, available, &clock);
                let second = strategy.schedule(&routine, available, &clock);
                match (first, second) {
                    (Ok(a), Ok(b)) => assert_eq!(a, b, "{}/{}/{}s", strategy.name(), name, available),
                    (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
                    _ => panic!("{}/{}/{}s: outcome changed between runs", strategy.name(), name, available),
                }
            }
        }
    }
}

/// More time never removes a task or shrinks an allocation.
#[test]
fn test_monotonicity() {
    let clock = clock();
    let routine = steady_routine();
    for strategy in strategies() {
        let runs: Vec<(Seconds, Vec<ScheduledTask>)> = budgets()
            .filter_map(|b| strategy.schedule(&routine, b, &clock).ok().map(|s| (b, s)))
            .collect();
        assert!(!runs.is_empty());

        for pair in runs.windows(2) {
            let (low_budget, low) = &pair[0];
            let (high_budget, high) = &pair[1];
            assert!(
                high.len() >= low.len(),
                "{}: {} tasks at {}s but {} at {}s",
                strategy.name(),
                low.len(),
                low_budget,
                high.len(),
                high_budget
            );
            for entry in low {
                let grown = allocation(high, entry.task.id.as_str()).unwrap_or(0);
                assert!(
                    grown >= entry.allocated_duration,
                    "{}: '{}' shrank from {}s to {}s between {}s and {}s",
                    strategy.name(),
                    entry.task.id,
                    entry.allocated_duration,
                    grown,
                    low_budget,
                    high_budget
                );
            }
        }
    }
}

/// Essentials needing 25 minutes cannot fit into 20.
#[test]
fn test_insufficient_time() {
    let routine = vec![
        Task::new("a", "A", Tier::Essential, 900),
        Task::new("b", "B", Tier::Core, 300),
        Task::new("c", "C", Tier::Essential, 600),
    ];
    for strategy in strategies() {
        let err = strategy.schedule(&routine, 1_200, &clock()).unwrap_err();
        assert!(
            matches!(
                err,
                SchedulerError::InsufficientTime {
                    required: 1_500,
                    available: 1_200
                }
            ),
            "{}: {:?}",
            strategy.name(),
            err
        );
    }
}

/// A 30 second shortfall is absorbed and leaves nothing for other tiers.
#[test]
fn test_tolerance_absorbs_small_shortfall() {
    let routine = vec![
        Task::new("a", "A", Tier::Essential, 900),
        Task::new("b", "B", Tier::Core, 300),
        Task::new("c", "C", Tier::Essential, 330),
    ];
    for strategy in strategies() {
        let schedule = strategy.schedule(&routine, 1_200, &clock()).unwrap();
        assert_eq!(allocation(&schedule, "a"), Some(900), "{}", strategy.name());
        assert_eq!(allocation(&schedule, "c"), Some(330), "{}", strategy.name());
        assert_eq!(allocation(&schedule, "b"), None, "{}", strategy.name());
        assert_eq!(total(&schedule), 1_230);
    }
}

/// An empty routine is an empty success.
#[test]
fn test_empty_routine() {
    for strategy in strategies() {
        let schedule = strategy.schedule(&[], 1_800, &clock()).unwrap();
        assert!(schedule.is_empty(), "{}", strategy.name());
    }
}

/// Nothing eligible is an empty success, not an error.
#[test]
fn test_nothing_eligible() {
    let routine = vec![
        Task::new("a", "A", Tier::Core, 300)
            .completed_at(hours_ago(2))
            .every(86_400),
    ];
    for strategy in strategies() {
        assert!(strategy.schedule(&routine, 1_800, &clock()).unwrap().is_empty());
    }
}

/// Only the exhaustive engine bounds its input size.
#[test]
fn test_candidate_limit() {
    let routine: Vec<Task> = (0..21)
        .map(|i| Task::new(format!("t{:02}", i), format!("Task {}", i), Tier::Optional, 60))
        .collect();

    let greedy = TwoStageScheduler::default().schedule(&routine, 600, &clock()).unwrap();
    // ten fit exactly, the eleventh rides on the tolerance
    assert_eq!(greedy.len(), 11);

    let err = ExhaustiveScheduler::default()
        .schedule(&routine, 600, &clock())
        .unwrap_err();
    assert!(matches!(err, SchedulerError::CandidateLimit { count: 21, limit: 20 }));
}
