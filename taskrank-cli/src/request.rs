//! Schema checks applied before a batch reaches the engine.
//!
//! The engine tolerates anything; these rules reject requests that are
//! structurally wrong so the user hears about typos instead of getting a
//! silently normalized ranking. `--lenient` skips them.

use anyhow::{Result, bail};
use regex::Regex;
use taskrank_core::task::{MAX_IMPORTANCE, MIN_IMPORTANCE};
use taskrank_core::time::parse_due_date;

use crate::input::AnalyzeRequest;

const MAX_ID_LEN: usize = 100;
const MAX_TITLE_LEN: usize = 500;

/// Every rule violation in the request, in task order.
pub fn violations(req: &AnalyzeRequest) -> Result<Vec<String>> {
    let date_shape = Regex::new(r"^\d{4}-\d{2}-\d{2}$")?;
    let mut out = Vec::new();

    if req.tasks.is_empty() {
        out.push("tasks: at least one task is required".to_string());
    }

    for (idx, t) in req.tasks.iter().enumerate() {
        let at = match t.id() {
            Some(id) => format!("tasks[{idx}] ('{id}')"),
            None => format!("tasks[{idx}]"),
        };

        match t.id() {
            None => out.push(format!("{at}: id is required")),
            Some(id) if id.chars().count() > MAX_ID_LEN => {
                out.push(format!("{at}: id must be at most {MAX_ID_LEN} characters"));
            }
            Some(_) => {}
        }

        match t.title.as_deref() {
            None | Some("") => out.push(format!("{at}: title is required")),
            Some(title) if title.chars().count() > MAX_TITLE_LEN => {
                out.push(format!("{at}: title must be at most {MAX_TITLE_LEN} characters"));
            }
            Some(_) => {}
        }

        if let Some(due) = t.due_date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            if !date_shape.is_match(due) || parse_due_date(due).is_none() {
                out.push(format!("{at}: due_date must be in YYYY-MM-DD format (got '{due}')"));
            }
        }

        if let Some(hours) = t.estimated_hours {
            if hours.is_nan() || hours < 0.0 {
                out.push(format!("{at}: estimated_hours must be >= 0 (got {hours})"));
            }
        }

        if let Some(importance) = t.importance {
            if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&importance) {
                out.push(format!(
                    "{at}: importance must be between {MIN_IMPORTANCE} and {MAX_IMPORTANCE} (got {importance})"
                ));
            }
        }
    }

    if let Some(w) = &req.weights {
        if let Err(e) = w.validate() {
            out.push(format!("weights: {e}"));
        }
    }

    Ok(out)
}

pub fn validate(req: &AnalyzeRequest) -> Result<()> {
    let problems = violations(req)?;
    if problems.is_empty() {
        return Ok(());
    }
    bail!(
        "invalid request data ({} problem{}):\n  - {}",
        problems.len(),
        if problems.len() == 1 { "" } else { "s" },
        problems.join("\n  - ")
    );
}
