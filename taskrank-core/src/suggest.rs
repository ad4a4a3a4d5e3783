//! Top-N "what should I work on" view over an analysis result.

use crate::analyzer::{AnalysisResult, AnalyzedTask};
use crate::scoring::{HIGH_THRESHOLD, MEDIUM_THRESHOLD};
use crate::strategy::Strategy;
use serde::Serialize;

pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Moderate,
}

impl Confidence {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            Confidence::High
        } else if score >= MEDIUM_THRESHOLD {
            Confidence::Medium
        } else {
            Confidence::Moderate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    #[serde(flatten)]
    pub task: AnalyzedTask,
    /// 1-based.
    pub rank: usize,
    pub confidence: Confidence,
    pub recommendation: String,
}

/// Suggestions plus the batch context they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
    pub total_tasks: usize,
    pub strategy: Strategy,
    pub warnings: Vec<String>,
}

/// The first `count` tasks of an already-sorted result.
pub fn top_suggestions(result: &AnalysisResult, count: usize) -> Vec<Suggestion> {
    result
        .analyzed
        .iter()
        .take(count)
        .enumerate()
        .map(|(idx, task)| {
            let rank = idx + 1;
            Suggestion {
                rank,
                confidence: Confidence::from_score(task.score),
                recommendation: format!("Rank #{rank}: {}", task.explanation),
                task: task.clone(),
            }
        })
        .collect()
}

pub fn suggest(result: &AnalysisResult, count: usize) -> SuggestResponse {
    SuggestResponse {
        suggestions: top_suggestions(result, count),
        total_tasks: result.analyzed.len(),
        strategy: result.strategy,
        warnings: result.warnings.clone(),
    }
}
