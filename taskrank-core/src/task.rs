//! Task model: raw input as submitted, and the normalized record the engine scores.

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMPORTANCE: u8 = 5;
pub const DEFAULT_ESTIMATED_HOURS: f64 = 1.0;
pub const MIN_IMPORTANCE: i64 = 1;
pub const MAX_IMPORTANCE: i64 = 10;

/// A task as submitted. Every field may be missing or out of range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub importance: Option<i64>,
    /// Anything other than a list of ids deserializes to an empty list.
    #[serde(default, deserialize_with = "lenient_id_list")]
    pub dependencies: Vec<String>,
}

impl TaskInput {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Identifier if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.is_empty())
    }
}

fn lenient_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdList {
        List(Vec<String>),
        Other(IgnoredAny),
    }

    Ok(match IdList::deserialize(deserializer)? {
        IdList::List(ids) => ids,
        IdList::Other(_) => Vec::new(),
    })
}

/// Normalized task. Defaults applied, ranges clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub due_date: Option<String>,
    /// Hours, >= 0.
    pub estimated_hours: f64,
    /// 1-10.
    pub importance: u8,
    pub dependencies: Vec<String>,
}

/// Outcome of normalizing one input.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Task(Task),
    /// Title was missing and defaulted; the task is still usable.
    Defaulted(Task),
    /// No id; the task cannot take part in the batch.
    MissingId,
}

impl Task {
    /// Apply defaults and clamps to a raw input.
    pub fn normalize(input: TaskInput) -> Normalized {
        let Some(id) = input.id().map(str::to_string) else {
            return Normalized::MissingId;
        };

        let (title, defaulted) = match input.title.filter(|t| !t.is_empty()) {
            Some(t) => (t, false),
            None => (format!("Task {id}"), true),
        };

        let importance = input
            .importance
            .map(|i| i.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE) as u8)
            .unwrap_or(DEFAULT_IMPORTANCE);

        // f64::max drops NaN in favor of 0.0.
        let estimated_hours = input
            .estimated_hours
            .unwrap_or(DEFAULT_ESTIMATED_HOURS)
            .max(0.0);

        let task = Task {
            id,
            title,
            due_date: input.due_date,
            estimated_hours,
            importance,
            dependencies: input.dependencies,
        };

        if defaulted {
            Normalized::Defaulted(task)
        } else {
            Normalized::Task(task)
        }
    }
}
