use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use taskrank_core::{AnalysisResult, StrategyCatalog, SuggestResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Table,
    Json,
}

pub fn print_analysis(result: &AnalysisResult, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(result)?),
        Format::Table => print!("{}", analysis_table(result)),
    }
    Ok(())
}

pub fn print_suggestions(resp: &SuggestResponse, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(resp)?),
        Format::Table => print!("{}", suggestions_table(resp)),
    }
    Ok(())
}

pub fn print_strategies(catalog: &StrategyCatalog, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(catalog)?),
        Format::Table => print!("{}", strategies_table(catalog)),
    }
    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn push_warnings(out: &mut String, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nWarnings:");
    for w in warnings {
        let _ = writeln!(out, "- {w}");
    }
}

pub fn analysis_table(result: &AnalysisResult) -> String {
    let w = result.weights;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Strategy: {} (u={} i={} e={} d={})\n",
        result.strategy, w.urgency, w.importance, w.effort, w.dependency
    );

    if result.analyzed.is_empty() {
        let _ = writeln!(out, "(no tasks)");
    } else {
        let _ = writeln!(
            out,
            "{:>3}  {:<12} {:<28} {:>7}  {:<6}  {}",
            "#", "id", "title", "score", "label", "why"
        );
        for (i, t) in result.analyzed.iter().enumerate() {
            let cycle = if t.in_circular_dependency { " [cycle]" } else { "" };
            let _ = writeln!(
                out,
                "{:>3}  {:<12} {:<28} {:>7.2}  {:<6}  {}{}",
                i + 1,
                truncate(&t.id, 12),
                truncate(&t.title, 28),
                t.score,
                t.priority_label.to_string(),
                t.explanation,
                cycle
            );
        }
    }

    push_warnings(&mut out, &result.warnings);
    out
}

pub fn suggestions_table(resp: &SuggestResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Top {} of {} tasks ({})\n",
        resp.suggestions.len(),
        resp.total_tasks,
        resp.strategy
    );
    for s in &resp.suggestions {
        let _ = writeln!(
            out,
            "{}. {} [{}] score={:.2} confidence={:?}",
            s.rank, s.task.title, s.task.id, s.task.score, s.confidence
        );
        let _ = writeln!(out, "   {}", s.recommendation);
    }
    push_warnings(&mut out, &resp.warnings);
    out
}

pub fn strategies_table(catalog: &StrategyCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:>5} {:>5} {:>5} {:>5}  {}",
        "strategy", "u", "i", "e", "d", "description"
    );
    for (st, w) in &catalog.strategies {
        let desc = catalog.descriptions.get(st).copied().unwrap_or("");
        let _ = writeln!(
            out,
            "{:<14} {:>5.2} {:>5.2} {:>5.2} {:>5.2}  {}",
            st.as_str(),
            w.urgency,
            w.importance,
            w.effort,
            w.dependency,
            desc
        );
    }
    out
}
