use chrono::{NaiveDate, NaiveDateTime};
use taskrank_core::{
    analyze_tasks, strategy_catalog, suggest, AnalyzeOptions, PriorityLabel, Strategy, TaskInput,
    Weights,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 30)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

fn opts(strategy: Strategy) -> AnalyzeOptions {
    AnalyzeOptions::new(strategy)
}

/// Urgent, important, quick work outranks distant, minor, long work.
#[test]
fn test_urgent_important_task_ranks_first() {
    let tasks = vec![
        TaskInput::new("later", "Nice to have")
            .with_due_date("2025-12-30")
            .with_hours(10.0)
            .with_importance(3),
        TaskInput::new("now", "Critical bug")
            .with_due_date("2025-12-01")
            .with_hours(2.0)
            .with_importance(10),
    ];

    let result = analyze_tasks(tasks, &opts(Strategy::SmartBalance), now());
    assert_eq!(result.analyzed.len(), 2);
    assert_eq!(result.analyzed[0].id, "now");
    assert!(result.analyzed[0].score > result.analyzed[1].score);
    assert_eq!(result.analyzed[0].priority_label, PriorityLabel::High);
    assert_eq!(result.analyzed[1].priority_label, PriorityLabel::Low);
    assert!(result.warnings.is_empty());
    assert!(result.cycles.is_none());
}

/// Mutually dependent tasks are still scored, but flagged and warned about.
#[test]
fn test_circular_dependency_flagged() {
    let tasks = vec![
        TaskInput::new("t1", "Task 1")
            .with_due_date("2025-12-05")
            .with_hours(2.0)
            .with_importance(7)
            .with_dependencies(["t2"]),
        TaskInput::new("t2", "Task 2")
            .with_due_date("2025-12-06")
            .with_hours(3.0)
            .with_importance(6)
            .with_dependencies(["t1"]),
        TaskInput::new("t3", "Independent").with_hours(1.0),
    ];

    let result = analyze_tasks(tasks, &opts(Strategy::SmartBalance), now());
    assert_eq!(result.analyzed.len(), 3);

    for t in &result.analyzed {
        let expected = t.id != "t3";
        assert_eq!(t.in_circular_dependency, expected, "flag for {}", t.id);
    }

    assert!(!result.warnings.is_empty());
    let warning = &result.warnings[0];
    assert!(warning.contains("t1") && warning.contains("t2") && warning.contains("->"));

    let cycles = result.cycles.expect("cycles reported");
    assert!(cycles[0].contains(&"t1".to_string()));
    assert!(cycles[0].contains(&"t2".to_string()));
}

/// Unknown dependency ids are reported but do not block scoring.
#[test]
fn test_missing_dependency_reported() {
    let tasks = vec![TaskInput::new("t1", "Task 1")
        .with_due_date("2025-12-05")
        .with_hours(2.0)
        .with_importance(7)
        .with_dependencies(["t999"])];

    let result = analyze_tasks(tasks, &opts(Strategy::SmartBalance), now());
    assert_eq!(result.analyzed.len(), 1);
    assert!(result.warnings.iter().any(|w| w.contains("t999")));
    assert_eq!(result.analyzed[0].details.num_dependents, 0);
}

/// `fastest` prefers the quick task, `high_impact` the important one.
#[test]
fn test_strategies_change_ranking() {
    let tasks = vec![
        TaskInput::new("t1", "Quick task")
            .with_due_date("2025-12-10")
            .with_hours(1.0)
            .with_importance(5),
        TaskInput::new("t2", "Important task")
            .with_due_date("2025-12-10")
            .with_hours(5.0)
            .with_importance(10),
    ];

    let fastest = analyze_tasks(tasks.clone(), &opts(Strategy::Fastest), now());
    let impact = analyze_tasks(tasks, &opts(Strategy::HighImpact), now());

    assert_eq!(fastest.analyzed[0].id, "t1");
    assert_eq!(impact.analyzed[0].id, "t2");
    assert_eq!(fastest.weights, Strategy::Fastest.weights());
}

/// A custom override replaces the preset rather than merging with it.
#[test]
fn test_custom_weights_override_preset() {
    let tasks = vec![
        TaskInput::new("t1", "Quick task").with_hours(1.0).with_importance(1),
        TaskInput::new("t2", "Important task").with_hours(30.0).with_importance(10),
    ];
    let only_effort = Weights::new(0.0, 0.0, 1.0, 0.0);

    let result = analyze_tasks(
        tasks,
        &opts(Strategy::HighImpact).with_weights(only_effort),
        now(),
    );

    assert_eq!(result.weights, only_effort);
    assert_eq!(result.strategy, Strategy::HighImpact);
    assert_eq!(result.analyzed[0].id, "t1");
}

/// Same input, same strategy: same scores, labels, order and warnings.
#[test]
fn test_analysis_is_idempotent() {
    let tasks = vec![
        TaskInput::new("a", "A").with_due_date("2025-12-02").with_dependencies(["b", "zzz"]),
        TaskInput::new("b", "B").with_hours(6.0).with_importance(9),
        TaskInput::new("c", "C").with_due_date("bogus").with_dependencies(["b"]),
        TaskInput::new("d", "D").with_dependencies(["d"]),
    ];

    let first = analyze_tasks(tasks.clone(), &opts(Strategy::Deadline), now());
    let second = analyze_tasks(tasks, &opts(Strategy::Deadline), now());
    assert_eq!(first, second);
}

/// Out-of-range values are clamped and the clamped values are returned.
#[test]
fn test_extreme_values_clamped() {
    let tasks = vec![TaskInput::new("t1", "Extreme task")
        .with_due_date("2025-12-05")
        .with_hours(-5.0)
        .with_importance(999)];

    let result = analyze_tasks(tasks, &opts(Strategy::SmartBalance), now());
    let t = &result.analyzed[0];
    assert_eq!(t.importance, 10);
    assert_eq!(t.estimated_hours, 0.0);
}

/// Missing fields fall back to importance 5 and 1 hour.
#[test]
fn test_missing_fields_get_defaults() {
    let tasks: Vec<TaskInput> =
        serde_json::from_str(r#"[{"id": "t1", "title": "Minimal task"}]"#).unwrap();

    let result = analyze_tasks(tasks, &AnalyzeOptions::default(), now());
    let t = &result.analyzed[0];
    assert_eq!(t.importance, 5);
    assert_eq!(t.estimated_hours, 1.0);
    assert!(t.dependencies.is_empty());
    assert!(result.warnings.is_empty());
}

/// Overdue bonus flows into the final score without re-clamping.
#[test]
fn test_overdue_deadline_exceeds_100() {
    let tasks = vec![TaskInput::new("late", "Late")
        .with_due_date("2025-11-01")
        .with_hours(0.0)
        .with_importance(10)];

    let result = analyze_tasks(tasks, &opts(Strategy::Deadline), now());
    // 0.6 * 2.0 + 0.25 + 0.05 = 1.5
    assert!((result.analyzed[0].score - 150.0).abs() < 1e-9);
}

/// A large batch is scored in full.
#[test]
fn test_very_long_task_list() {
    let tasks: Vec<TaskInput> = (0..100)
        .map(|i| {
            TaskInput::new(format!("t{i}"), format!("Task {i}"))
                .with_due_date("2025-12-10")
                .with_hours((i % 10 + 1) as f64)
                .with_importance(i % 10 + 1)
        })
        .collect();

    let result = analyze_tasks(tasks, &AnalyzeOptions::default(), now());
    assert_eq!(result.analyzed.len(), 100);
    assert!(result
        .analyzed
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
}

/// The suggestion view is a ranked prefix of the analysis.
#[test]
fn test_suggestions_follow_ranking() {
    let tasks = vec![
        TaskInput::new("t1", "One").with_due_date("2025-11-29").with_importance(9),
        TaskInput::new("t2", "Two").with_hours(12.0).with_importance(2),
        TaskInput::new("t3", "Three").with_due_date("2025-12-01"),
        TaskInput::new("t4", "Four").with_dependencies(["t3"]),
    ];

    let result = analyze_tasks(tasks, &AnalyzeOptions::default(), now());
    let resp = suggest(&result, 3);

    assert_eq!(resp.total_tasks, 4);
    let ids: Vec<&str> = resp.suggestions.iter().map(|s| s.task.id.as_str()).collect();
    let expected: Vec<&str> = result.analyzed.iter().take(3).map(|t| t.id.as_str()).collect();
    assert_eq!(ids, expected);
    assert_eq!(resp.suggestions[0].task.id, "t1");
    assert!(resp.suggestions[0].recommendation.starts_with("Rank #1: OVERDUE by 1 days"));
}

/// The catalog is static and needs no tasks.
#[test]
fn test_strategy_catalog() {
    let catalog = strategy_catalog();
    for st in Strategy::ALL {
        assert_eq!(catalog.strategies[&st], st.weights());
        assert!(!catalog.descriptions[&st].is_empty());
    }
}
