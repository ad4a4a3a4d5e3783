//! Importance, effort and dependency factors. Each maps into 0.0..=1.0.

use std::collections::HashMap;

/// Reference duration (hours) at which the effort score reaches 0.
pub const DEFAULT_MAX_EFFORT_HOURS: f64 = 40.0;

/// Map an importance rating of 1..=10 onto 0.0..=1.0.
pub fn normalize_importance(importance: u8) -> f64 {
    ((f64::from(importance) - 1.0) / 9.0).clamp(0.0, 1.0)
}

/// Quick-win score: shorter tasks score higher.
///
/// Log scale, so the gap between a 2h and a 4h task is much smaller than
/// between a 0.5h and a 2h task, and long tasks flatten out near 0.
/// A non-positive or non-finite `max_hours` falls back to the default.
pub fn effort_score(estimated_hours: f64, max_hours: f64) -> f64 {
    if estimated_hours <= 0.0 {
        return 1.0;
    }

    let max_hours = if max_hours.is_finite() && max_hours > 0.0 {
        max_hours
    } else {
        DEFAULT_MAX_EFFORT_HOURS
    };

    let score = 1.0 - (estimated_hours + 1.0).ln() / (max_hours + 1.0).ln();
    score.clamp(0.0, 1.0)
}

/// Share of the batch's largest fan-in that `task_id` accounts for.
pub fn dependency_score(task_id: &str, counts: &HashMap<String, usize>, max_dependents: usize) -> f64 {
    if max_dependents == 0 {
        return 0.0;
    }

    let dependents = counts.get(task_id).copied().unwrap_or(0);
    (dependents as f64 / max_dependents as f64).min(1.0)
}
