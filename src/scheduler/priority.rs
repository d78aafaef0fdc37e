//! Priority calculation for task scheduling.
//!
//! Tasks are prioritized by:
//! - Base priority by tier (core=100, optional=10)
//! - Never-completed boost (+50% of base)
//! - Overdue factor ((elapsed / interval) ^ 1.5, only with a positive interval)
//!
//! Essential tasks are never ranked against the other tiers on score. When a
//! score is needed for them it is the fixed `PRIORITY_ESSENTIAL` sentinel.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::{Task, Tier};
use crate::scheduler::eligibility::{is_eligible, seconds_since};

/// Base priorities by tier.
/// Higher = more important = admitted first.
pub const PRIORITY_CORE: f64 = 100.0;
pub const PRIORITY_OPTIONAL: f64 = 10.0;

/// Sentinel for essential tasks. Core/optional scores are capped at
/// `f64::MAX`, so nothing else can reach it.
pub const PRIORITY_ESSENTIAL: f64 = f64::INFINITY;

/// Score for ineligible tasks; never selectable.
pub const PRIORITY_INELIGIBLE: f64 = f64::NEG_INFINITY;

/// Never-completed boost, as a fraction of the base priority.
pub const NEVER_COMPLETED_BOOST: f64 = 0.5;

/// Exponent applied to the elapsed/interval ratio.
pub const OVERDUE_EXPONENT: f64 = 1.5;

/// Get base priority for a non-essential tier.
pub fn base_priority(tier: Tier) -> f64 {
    PriorityConfig::default().base_priority(tier)
}

/// Overdue multiplier for a task at `now`.
///
/// 1.0 unless the task has both a completion time and a positive interval.
pub fn overdue_factor(task: &Task, now: DateTime<Local>) -> f64 {
    PriorityConfig::default().overdue_factor(task, now)
}

/// Calculate the priority score for a task with the default weights.
pub fn calculate_priority(task: &Task, now: DateTime<Local>) -> f64 {
    PriorityConfig::default().calculate_priority(task, now)
}

/// Priority configuration (for customization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    pub core: f64,
    pub optional: f64,
    pub never_completed_boost: f64,
    pub overdue_exponent: f64,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            core: PRIORITY_CORE,
            optional: PRIORITY_OPTIONAL,
            never_completed_boost: NEVER_COMPLETED_BOOST,
            overdue_exponent: OVERDUE_EXPONENT,
        }
    }
}

impl PriorityConfig {
    /// Get base priority for a tier with this config.
    pub fn base_priority(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Essential => PRIORITY_ESSENTIAL,
            Tier::Core => self.core,
            Tier::Optional => self.optional,
        }
    }

    pub fn overdue_factor(&self, task: &Task, now: DateTime<Local>) -> f64 {
        match task.last_completed_at {
            Some(last) if task.repetition_interval > 0 => {
                let elapsed = seconds_since(last, now).max(0) as f64;
                (elapsed / task.repetition_interval as f64).powf(self.overdue_exponent)
            }
            _ => 1.0,
        }
    }

    /// Calculate priority with custom config.
    ///
    /// Higher scores are more urgent:
    /// - Ineligible tasks get `PRIORITY_INELIGIBLE`
    /// - Essential tasks get `PRIORITY_ESSENTIAL`
    /// - Otherwise `(base + boost) * overdue_factor`
    pub fn calculate_priority(&self, task: &Task, now: DateTime<Local>) -> f64 {
        if !is_eligible(task, now) {
            return PRIORITY_INELIGIBLE;
        }
        if task.tier == Tier::Essential {
            return PRIORITY_ESSENTIAL;
        }

        let base = self.base_priority(task.tier);

        // Boost tasks that have never been done
        let boost = if task.last_completed_at.is_none() {
            base * self.never_completed_boost
        } else {
            0.0
        };

        ((base + boost) * self.overdue_factor(task, now)).min(f64::MAX)
    }
}
