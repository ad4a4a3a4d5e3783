//! Urgency from due dates.
//!
//! Bands (days = due - today, time-of-day ignored):
//! - overdue: 1.0 plus a lateness bonus that saturates after one week (max 2.0)
//! - due today: 1.0
//! - 1..=3 days: 0.9 ramping up to ~0.966
//! - later: linear decay to 0 at 30 days
//!
//! Missing or malformed dates degrade to a neutral 0.5 instead of failing.

use crate::time::parse_due_date;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Score given to tasks without a usable due date.
pub const NEUTRAL_URGENCY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyStatus {
    NoDueDate,
    InvalidDate,
    Overdue,
    DueToday,
    Urgent,
    Normal,
}

/// What the urgency score was derived from; feeds the explanation text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrgencyMeta {
    pub status: UrgencyStatus,
    /// Calendar days until due (negative when overdue).
    pub days_left: Option<i64>,
    /// Days past due, only for overdue tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_by: Option<i64>,
}

impl UrgencyMeta {
    fn undated(status: UrgencyStatus) -> Self {
        Self {
            status,
            days_left: None,
            late_by: None,
        }
    }

    fn dated(status: UrgencyStatus, days_left: i64) -> Self {
        Self {
            status,
            days_left: Some(days_left),
            late_by: None,
        }
    }
}

/// Urgency score for an optional `YYYY-MM-DD` due date relative to `now`.
pub fn urgency_score(due_date: Option<&str>, now: NaiveDateTime) -> (f64, UrgencyMeta) {
    let raw = match due_date.map(str::trim) {
        None | Some("") => return (NEUTRAL_URGENCY, UrgencyMeta::undated(UrgencyStatus::NoDueDate)),
        Some(s) => s,
    };

    let Some(due) = parse_due_date(raw) else {
        return (NEUTRAL_URGENCY, UrgencyMeta::undated(UrgencyStatus::InvalidDate));
    };

    let days_left = (due - now.date()).num_days();

    match days_left {
        d if d < 0 => {
            let late_by = d.abs();
            let bonus = (late_by as f64 / 7.0).min(1.0);
            let meta = UrgencyMeta {
                late_by: Some(late_by),
                ..UrgencyMeta::dated(UrgencyStatus::Overdue, d)
            };
            (1.0 + bonus, meta)
        }
        0 => (1.0, UrgencyMeta::dated(UrgencyStatus::DueToday, 0)),
        d if d <= 3 => {
            let score = 0.9 + (3 - d) as f64 * 0.033;
            (score, UrgencyMeta::dated(UrgencyStatus::Urgent, d))
        }
        d => {
            let score = (1.0 - d as f64 / 30.0).clamp(0.0, 1.0);
            (score, UrgencyMeta::dated(UrgencyStatus::Normal, d))
        }
    }
}
