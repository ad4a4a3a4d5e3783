//! Load a task batch from a file or stdin.
//!
//! Accepted shapes, sniffed from the content:
//! - JSON object: `{"tasks": [...], "strategy": "...", "weights": {...}}`
//! - JSON array of tasks
//! - CSV with a header row: id,title,due_date,estimated_hours,importance,dependencies
//!   (dependencies separated by `;`)

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;
use taskrank_core::{Strategy, TaskInput, Weights};

/// A batch plus the optional strategy selection that came with it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub tasks: Vec<TaskInput>,
    #[serde(default)]
    pub strategy: Option<Strategy>,
    #[serde(default)]
    pub weights: Option<Weights>,
}

pub fn load_request(path: &Path) -> Result<AnalyzeRequest> {
    let raw = if path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read tasks from stdin")?;
        s
    } else {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };

    parse_request(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_request(raw: &str) -> Result<AnalyzeRequest> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') {
        Ok(serde_json::from_str(trimmed)?)
    } else if trimmed.starts_with('[') {
        let tasks: Vec<TaskInput> = serde_json::from_str(trimmed)?;
        Ok(AnalyzeRequest {
            tasks,
            ..AnalyzeRequest::default()
        })
    } else {
        Ok(AnalyzeRequest {
            tasks: parse_tasks_csv(trimmed)?,
            ..AnalyzeRequest::default()
        })
    }
}

fn parse_tasks_csv(raw: &str) -> Result<Vec<TaskInput>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let Some(id_col) = col("id") else {
        bail!("CSV header must include an 'id' column");
    };
    let title_col = col("title");
    let due_col = col("due_date");
    let hours_col = col("estimated_hours");
    let importance_col = col("importance");
    let deps_col = col("dependencies");

    let mut tasks = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // header is line 1
        let line = i + 2;

        let cell = |c: Option<usize>| -> Option<String> {
            c.and_then(|c| record.get(c))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let estimated_hours = match cell(hours_col) {
            Some(h) => Some(
                h.parse::<f64>()
                    .with_context(|| format!("line {line}: estimated_hours '{h}' is not a number"))?,
            ),
            None => None,
        };
        let importance = match cell(importance_col) {
            Some(v) => Some(
                v.parse::<i64>()
                    .with_context(|| format!("line {line}: importance '{v}' is not an integer"))?,
            ),
            None => None,
        };
        let dependencies = cell(deps_col)
            .map(|d| {
                d.split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        tasks.push(TaskInput {
            id: cell(Some(id_col)),
            title: cell(title_col),
            due_date: cell(due_col),
            estimated_hours,
            importance,
            dependencies,
        });
    }

    Ok(tasks)
}
