//! Score composer: weighted sum of the four factors, scaled to 0-100.
//!
//! The final score is never re-clamped. Overdue urgency can exceed 1.0 and
//! custom weights need not sum to 1, so scores above 100 are legitimate.

use crate::factors::{dependency_score, effort_score, normalize_importance, DEFAULT_MAX_EFFORT_HOURS};
use crate::graph::DependencyMap;
use crate::strategy::Weights;
use crate::task::Task;
use crate::urgency::{urgency_score, UrgencyMeta, UrgencyStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HIGH_THRESHOLD: f64 = 75.0;
pub const MEDIUM_THRESHOLD: f64 = 50.0;

/// Hours at or below which a task counts as a quick win.
pub const QUICK_WIN_HOURS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityLabel {
    Low,
    Medium,
    High,
}

impl PriorityLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            PriorityLabel::High
        } else if score >= MEDIUM_THRESHOLD {
            PriorityLabel::Medium
        } else {
            PriorityLabel::Low
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriorityLabel::Low => "Low",
            PriorityLabel::Medium => "Medium",
            PriorityLabel::High => "High",
        };
        f.write_str(s)
    }
}

/// Per-factor breakdown, kept for debugging and `--explain` style output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub urgency_score: f64,
    pub importance_score: f64,
    pub effort_score: f64,
    pub dependency_score: f64,
    pub urgency_meta: UrgencyMeta,
    pub num_dependents: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskScore {
    pub score: f64,
    pub priority_label: PriorityLabel,
    pub explanation: String,
    pub details: ScoreDetails,
}

/// Scores tasks of one batch against a shared dependency map.
#[derive(Debug, Clone)]
pub struct Scorer<'a> {
    weights: Weights,
    dependencies: &'a DependencyMap,
    now: NaiveDateTime,
    max_effort_hours: f64,
}

impl<'a> Scorer<'a> {
    pub fn new(weights: Weights, dependencies: &'a DependencyMap, now: NaiveDateTime) -> Self {
        Self {
            weights,
            dependencies,
            now,
            max_effort_hours: DEFAULT_MAX_EFFORT_HOURS,
        }
    }

    pub fn with_max_effort_hours(mut self, hours: f64) -> Self {
        self.max_effort_hours = hours;
        self
    }

    pub fn score(&self, task: &Task) -> TaskScore {
        let (u, urgency_meta) = urgency_score(task.due_date.as_deref(), self.now);
        let i = normalize_importance(task.importance);
        let e = effort_score(task.estimated_hours, self.max_effort_hours);
        let d = dependency_score(
            &task.id,
            &self.dependencies.counts,
            self.dependencies.max_dependents,
        );

        let w = &self.weights;
        let raw = w.urgency * u + w.importance * i + w.effort * e + w.dependency * d;
        let score = raw * 100.0;

        let num_dependents = self.dependencies.dependents(&task.id);

        TaskScore {
            score,
            priority_label: PriorityLabel::from_score(score),
            explanation: explain(task, &urgency_meta, num_dependents),
            details: ScoreDetails {
                urgency_score: round_to(u, 3),
                importance_score: round_to(i, 3),
                effort_score: round_to(e, 3),
                dependency_score: round_to(d, 3),
                urgency_meta,
                num_dependents,
            },
        }
    }
}

/// Short human-readable reason, markers in fixed order.
fn explain(task: &Task, urgency: &UrgencyMeta, num_dependents: usize) -> String {
    let mut parts: Vec<String> = Vec::new();

    match (urgency.status, urgency.days_left) {
        (UrgencyStatus::Overdue, _) => {
            parts.push(format!("OVERDUE by {} days", urgency.late_by.unwrap_or_default()));
        }
        (UrgencyStatus::DueToday, _) => parts.push("Due TODAY".to_string()),
        (UrgencyStatus::Urgent, Some(days)) => parts.push(format!("Due in {days} days")),
        _ => {}
    }

    match task.importance {
        8.. => parts.push(format!("High importance ({}/10)", task.importance)),
        6..=7 => parts.push(format!("Medium importance ({}/10)", task.importance)),
        _ => {}
    }

    if task.estimated_hours <= QUICK_WIN_HOURS {
        parts.push(format!("Quick win ({:?}h)", task.estimated_hours));
    }

    if num_dependents > 0 {
        let plural = if num_dependents > 1 { "s" } else { "" };
        parts.push(format!("Blocks {num_dependents} task{plural}"));
    }

    if parts.is_empty() {
        "Standard priority task".to_string()
    } else {
        parts.join(". ")
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
