//! taskrank-core: priority scoring and ranking for task batches.
//!
//! Entry points:
//! - [`analyze_tasks`]: score and rank a batch
//! - [`top_suggestions`] / [`suggest`]: the top-N view of a ranked batch
//! - [`strategy_catalog`]: the built-in weight profiles

pub mod analyzer;
pub mod factors;
pub mod graph;
pub mod scoring;
pub mod strategy;
pub mod suggest;
pub mod task;
pub mod time;
pub mod urgency;

pub use analyzer::{analyze_tasks, AnalysisResult, AnalyzeOptions, AnalyzedTask};
pub use factors::{dependency_score, effort_score, normalize_importance, DEFAULT_MAX_EFFORT_HOURS};
pub use graph::{build_dependency_map, detect_cycles, CycleReport, DependencyMap};
pub use scoring::{PriorityLabel, ScoreDetails, Scorer, TaskScore};
pub use strategy::{strategy_catalog, Strategy, StrategyCatalog, Weights};
pub use suggest::{suggest, top_suggestions, Confidence, SuggestResponse, Suggestion, DEFAULT_SUGGESTION_COUNT};
pub use task::{Normalized, Task, TaskInput};
pub use urgency::{urgency_score, UrgencyMeta, UrgencyStatus};
