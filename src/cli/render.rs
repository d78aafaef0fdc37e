//! Terminal rendering for schedules and estimates.

use colored::*;
use serde::Serialize;
use std::fmt::Write;

use crate::domain::{ScheduleSummary, ScheduledTask, Seconds, Tier};

/// Format seconds as `1h05m`, `12m30s`, `45s`.
pub fn format_duration(secs: Seconds) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    match (hours, minutes, seconds) {
        (0, 0, s) => format!("{}s", s),
        (0, m, 0) => format!("{}m", m),
        (0, m, s) => format!("{}m{:02}s", m, s),
        (h, m, _) => format!("{}h{:02}m", h, m),
    }
}

fn tier_label(tier: Tier) -> ColoredString {
    let label = format!("{:<9}", tier.to_string());
    match tier {
        Tier::Essential => label.red().bold(),
        Tier::Core => label.yellow(),
        Tier::Optional => label.dimmed(),
    }
}

/// Human-readable schedule listing followed by a summary line.
pub fn render_schedule(routine: &str, schedule: &[ScheduledTask], summary: &ScheduleSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ({} available)",
        "Schedule:".green().bold(),
        routine,
        format_duration(summary.available)
    );

    if schedule.is_empty() {
        let _ = writeln!(out, "  {}", "nothing fits".yellow());
        return out;
    }

    for entry in schedule {
        let extra = if entry.is_extended() {
            format!(" (+{})", format_duration(entry.extension())).cyan().to_string()
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  {} {:>8}  {}{}",
            tier_label(entry.task.tier),
            format_duration(entry.allocated_duration),
            entry.task.name,
            extra
        );
    }

    let _ = write!(
        out,
        "{} {} tasks, {} allocated",
        "Total:".green(),
        summary.task_count(),
        format_duration(summary.total_allocated)
    );
    if summary.overrun > 0 {
        let _ = write!(out, ", {}", format!("{} over", format_duration(summary.overrun)).yellow());
    } else {
        let _ = write!(out, ", {} unused", format_duration(summary.unused));
    }
    out.push('\n');
    out
}

/// Minimum duration per tier threshold.
pub fn render_estimates(routine: &str, estimates: &[(Tier, Seconds)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Estimate:".green().bold(), routine);
    for (tier, secs) in estimates {
        let _ = writeln!(out, "  {}+ {:>8}", tier_label(*tier), format_duration(*secs));
    }
    out
}

#[derive(Serialize)]
struct ScheduleReport<'a> {
    routine: &'a str,
    engine: String,
    schedule: &'a [ScheduledTask],
    summary: &'a ScheduleSummary,
}

/// JSON document with the schedule and its summary.
pub fn schedule_json(
    routine: &str,
    engine: impl ToString,
    schedule: &[ScheduledTask],
    summary: &ScheduleSummary,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ScheduleReport {
        routine,
        engine: engine.to_string(),
        schedule,
        summary,
    })
}
