//! Batch analysis: normalize, analyze the dependency graph once, score each
//! task, then rank.
//!
//! Nothing here fails. Bad fields are normalized, tasks without an id are
//! dropped, and graph problems (cycles, unknown ids) only produce warnings.

use crate::factors::DEFAULT_MAX_EFFORT_HOURS;
use crate::graph::{build_dependency_map, detect_cycles};
use crate::scoring::{round_to, PriorityLabel, ScoreDetails, Scorer};
use crate::strategy::{Strategy, Weights};
use crate::task::{Normalized, Task, TaskInput};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How a batch should be weighed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzeOptions {
    pub strategy: Strategy,
    /// Replaces the strategy's preset entirely when set.
    pub weights: Option<Weights>,
    pub max_effort_hours: f64,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            weights: None,
            max_effort_hours: DEFAULT_MAX_EFFORT_HOURS,
        }
    }
}

impl AnalyzeOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_max_effort_hours(mut self, hours: f64) -> Self {
        self.max_effort_hours = hours;
        self
    }

    pub fn resolved_weights(&self) -> Weights {
        self.weights.unwrap_or_else(|| self.strategy.weights())
    }
}

/// One scored task as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedTask {
    pub id: String,
    pub title: String,
    pub due_date: Option<String>,
    pub estimated_hours: f64,
    pub importance: u8,
    pub dependencies: Vec<String>,
    /// Rounded to 2 decimals.
    pub score: f64,
    pub priority_label: PriorityLabel,
    pub explanation: String,
    pub in_circular_dependency: bool,
    pub details: ScoreDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub analyzed: Vec<AnalyzedTask>,
    pub warnings: Vec<String>,
    pub strategy: Strategy,
    pub weights: Weights,
    pub cycles: Option<Vec<Vec<String>>>,
}

impl AnalysisResult {
    fn empty(strategy: Strategy, weights: Weights, warnings: Vec<String>) -> Self {
        Self {
            analyzed: Vec::new(),
            warnings,
            strategy,
            weights,
            cycles: None,
        }
    }
}

/// Score and rank a batch of tasks as of `now`.
pub fn analyze_tasks(tasks: Vec<TaskInput>, options: &AnalyzeOptions, now: NaiveDateTime) -> AnalysisResult {
    let strategy = options.strategy;

    if tasks.is_empty() {
        return AnalysisResult::empty(strategy, strategy.weights(), Vec::new());
    }

    let weights = options.resolved_weights();
    let mut warnings: Vec<String> = Vec::new();

    let mut valid: Vec<Task> = Vec::with_capacity(tasks.len());
    for (idx, input) in tasks.into_iter().enumerate() {
        match Task::normalize(input) {
            Normalized::Task(t) => valid.push(t),
            Normalized::Defaulted(t) => {
                warnings.push(format!("Task '{}' missing 'title' - using default", t.id));
                valid.push(t);
            }
            Normalized::MissingId => {
                debug!(index = idx, "dropping task without id");
                warnings.push(format!("Task at index {idx} missing 'id' field - skipped"));
            }
        }
    }

    if valid.is_empty() {
        warnings.push("No valid tasks to analyze".to_string());
        return AnalysisResult::empty(strategy, weights, warnings);
    }

    debug!(tasks = valid.len(), %strategy, "analyzing batch");

    let cycles = detect_cycles(&valid);
    if let Some(path) = cycles.first_path() {
        debug!(count = cycles.cycles.len(), "circular dependencies found");
        warnings.push(format!("Circular dependency detected: {path}"));
    }

    let dependency_map = build_dependency_map(&valid);
    if !dependency_map.missing.is_empty() {
        debug!(missing = ?dependency_map.missing, "unknown dependency ids");
        warnings.push(format!(
            "Missing dependency IDs referenced: {}",
            dependency_map.missing.join(", ")
        ));
    }

    // The dependency map is complete before any task is scored.
    let scorer = Scorer::new(weights, &dependency_map, now).with_max_effort_hours(options.max_effort_hours);

    let score_one = |task: Task| {
        let scored = scorer.score(&task);
        AnalyzedTask {
            in_circular_dependency: cycles.contains(&task.id),
            id: task.id,
            title: task.title,
            due_date: task.due_date,
            estimated_hours: task.estimated_hours,
            importance: task.importance,
            dependencies: task.dependencies,
            score: round_to(scored.score, 2),
            priority_label: scored.priority_label,
            explanation: scored.explanation,
            details: scored.details,
        }
    };

    #[cfg(feature = "parallel")]
    let mut analyzed: Vec<AnalyzedTask> = valid.into_par_iter().map(score_one).collect();
    #[cfg(not(feature = "parallel"))]
    let mut analyzed: Vec<AnalyzedTask> = valid.into_iter().map(score_one).collect();

    // score desc, dependents desc, hours asc
    analyzed.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.details.num_dependents.cmp(&a.details.num_dependents))
            .then_with(|| a.estimated_hours.total_cmp(&b.estimated_hours))
    });

    let cycles = if cycles.is_empty() { None } else { Some(cycles.cycles) };

    AnalysisResult {
        analyzed,
        warnings,
        strategy,
        weights,
        cycles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 30)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_analyze_empty_list() {
        let result = analyze_tasks(Vec::new(), &AnalyzeOptions::new(Strategy::Deadline), now());
        assert!(result.analyzed.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.weights, Strategy::Deadline.weights());
        assert!(result.cycles.is_none());
    }

    #[test]
    fn test_task_missing_id_skipped() {
        let input = TaskInput {
            title: Some("No ID task".into()),
            ..TaskInput::default()
        };
        let result = analyze_tasks(vec![input], &AnalyzeOptions::default(), now());
        assert!(result.analyzed.is_empty());
        assert_eq!(
            result.warnings,
            vec![
                "Task at index 0 missing 'id' field - skipped".to_string(),
                "No valid tasks to analyze".to_string(),
            ]
        );
    }

    #[test]
    fn test_all_dropped_echoes_custom_weights() {
        let custom = Weights::new(0.1, 0.2, 0.3, 0.4);
        let opts = AnalyzeOptions::default().with_weights(custom);
        let result = analyze_tasks(vec![TaskInput::default()], &opts, now());
        assert_eq!(result.weights, custom);
    }

    #[test]
    fn test_warning_order() {
        let tasks = vec![
            TaskInput {
                id: Some("t1".into()),
                dependencies: vec!["t2".into(), "ghost".into()],
                ..TaskInput::default()
            },
            TaskInput::new("t2", "Two").with_dependencies(["t1"]),
            TaskInput::default(),
        ];
        let result = analyze_tasks(tasks, &AnalyzeOptions::default(), now());
        assert_eq!(
            result.warnings,
            vec![
                "Task 't1' missing 'title' - using default".to_string(),
                "Task at index 2 missing 'id' field - skipped".to_string(),
                "Circular dependency detected: t1 -> t2 -> t1".to_string(),
                "Missing dependency IDs referenced: ghost".to_string(),
            ]
        );
        assert_eq!(result.cycles, Some(vec![vec!["t1".to_string(), "t2".to_string()]]));
    }

    #[test]
    fn test_tie_break_by_dependents_then_hours() {
        // Zero weights make every score 0, so only the tie-breaks order the batch.
        let opts = AnalyzeOptions::default().with_weights(Weights::new(0.0, 0.0, 0.0, 0.0));
        let tasks = vec![
            TaskInput::new("slow", "Slow").with_hours(8.0),
            TaskInput::new("quick", "Quick").with_hours(0.5),
            TaskInput::new("blocker", "Blocker").with_hours(20.0),
            TaskInput::new("child", "Child").with_hours(3.0).with_dependencies(["blocker"]),
        ];
        let result = analyze_tasks(tasks, &opts, now());
        let order: Vec<&str> = result.analyzed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["blocker", "quick", "child", "slow"]);
    }

    #[test]
    fn test_bad_max_effort_hours_keeps_scores_finite() {
        let tasks = vec![TaskInput::new("t1", "One").with_hours(1.0)];
        let bad = AnalyzeOptions::default().with_max_effort_hours(-5.0);
        let result = analyze_tasks(tasks.clone(), &bad, now());
        let t = &result.analyzed[0];
        assert!(t.score.is_finite());
        assert!((0.0..=1.0).contains(&t.details.effort_score));

        let default = analyze_tasks(tasks, &AnalyzeOptions::default(), now());
        assert_eq!(t.score, default.analyzed[0].score);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial_scoring() {
        let tasks: Vec<TaskInput> = (0..200)
            .map(|i| {
                TaskInput::new(format!("t{i}"), format!("Task {i}"))
                    .with_importance(i % 10 + 1)
                    .with_hours((i % 7) as f64)
                    .with_due_date(format!("2025-12-{:02}", i % 28 + 1))
                    .with_dependencies([format!("t{}", (i + 3) % 200)])
            })
            .collect();
        let opts = AnalyzeOptions::default();
        let result = analyze_tasks(tasks.clone(), &opts, now());

        let valid: Vec<Task> = tasks
            .into_iter()
            .filter_map(|t| match Task::normalize(t) {
                Normalized::Task(t) | Normalized::Defaulted(t) => Some(t),
                Normalized::MissingId => None,
            })
            .collect();
        let map = build_dependency_map(&valid);
        let scorer = Scorer::new(opts.resolved_weights(), &map, now());

        assert_eq!(result.analyzed.len(), valid.len());
        for analyzed in &result.analyzed {
            let task = valid.iter().find(|t| t.id == analyzed.id).unwrap();
            assert_eq!(analyzed.score, round_to(scorer.score(task).score, 2));
        }
        assert!(result.analyzed.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_score_rounded_to_two_places() {
        let result = analyze_tasks(
            vec![TaskInput::new("t1", "One").with_hours(3.0).with_importance(7)],
            &AnalyzeOptions::default(),
            now(),
        );
        let score = result.analyzed[0].score;
        assert_eq!(score, (score * 100.0).round() / 100.0);
    }

    #[test]
    fn test_result_serializes_like_api() {
        let result = analyze_tasks(
            vec![TaskInput::new("t1", "One").with_due_date("2025-12-01")],
            &AnalyzeOptions::default(),
            now(),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["strategy"], "smart_balance");
        assert_eq!(json["weights"]["u"], 0.35);
        assert!(json["cycles"].is_null());
        let first = &json["analyzed"][0];
        assert_eq!(first["id"], "t1");
        assert_eq!(first["in_circular_dependency"], false);
        assert!(first["priority_label"].is_string());
        assert_eq!(first["details"]["urgency_meta"]["status"], "urgent");
    }
}
