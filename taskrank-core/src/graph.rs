//! Dependency graph analysis over a task batch.
//!
//! Edges run from a task to the tasks it depends on. Ids that are not in the
//! batch never take part in traversal; they are only reported as missing.

use crate::task::Task;
use std::collections::{HashMap, HashSet};

/// Cycles found by [`detect_cycles`].
///
/// `cycles` is not an exhaustive enumeration, but every id that sits on any
/// cycle is in `members`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub cycles: Vec<Vec<String>>,
    pub members: HashSet<String>,
}

impl CycleReport {
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// First cycle rendered as a closed path, e.g. `a -> b -> a`.
    pub fn first_path(&self) -> Option<String> {
        let cycle = self.cycles.first()?;
        let first = cycle.first()?;
        let mut hops: Vec<&str> = cycle.iter().map(String::as_str).collect();
        hops.push(first);
        Some(hops.join(" -> "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Batch ids indexed in submission order, with in-batch edges only.
struct Graph<'a> {
    ids: Vec<&'a str>,
    edges: Vec<Vec<usize>>,
}

impl<'a> Graph<'a> {
    fn build(tasks: &'a [Task]) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut ids = Vec::new();
        for t in tasks {
            index.entry(t.id.as_str()).or_insert_with(|| {
                ids.push(t.id.as_str());
                ids.len() - 1
            });
        }

        // Duplicate ids share a node; their edges are merged.
        let mut edges = vec![Vec::new(); ids.len()];
        for t in tasks {
            let from = index[t.id.as_str()];
            for dep in &t.dependencies {
                if let Some(&to) = index.get(dep.as_str()) {
                    edges[from].push(to);
                }
            }
        }

        Self { ids, edges }
    }
}

/// Three-color DFS cycle detection.
///
/// Roots are tried in batch order. The current path lives on one explicit
/// stack: a node is gray exactly while it is on that stack, so revisiting a
/// gray node closes a cycle made of the stack suffix starting at it.
pub fn detect_cycles(tasks: &[Task]) -> CycleReport {
    let graph = Graph::build(tasks);
    let n = graph.ids.len();

    let mut color = vec![Color::White; n];
    let mut cycles: Vec<Vec<usize>> = Vec::new();

    for root in 0..n {
        if color[root] != Color::White {
            continue;
        }

        // (node, next edge to follow)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        color[root] = Color::Gray;

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let Some(&next) = graph.edges[node].get(frame.1) else {
                color[node] = Color::Black;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match color[next] {
                Color::Black => {}
                Color::Gray => {
                    if let Some(start) = stack.iter().position(|&(id, _)| id == next) {
                        cycles.push(stack[start..].iter().map(|&(id, _)| id).collect());
                    }
                }
                Color::White => {
                    color[next] = Color::Gray;
                    stack.push((next, 0));
                }
            }
        }
    }

    let cycles: Vec<Vec<String>> = cycles
        .into_iter()
        .map(|c| c.into_iter().map(|i| graph.ids[i].to_string()).collect())
        .collect();
    let members = cycles.iter().flatten().cloned().collect();

    CycleReport { cycles, members }
}

/// Fan-in per task: how many tasks in the batch list it as a dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyMap {
    pub counts: HashMap<String, usize>,
    /// Largest count in the batch, or 1 when nothing is depended on.
    pub max_dependents: usize,
    /// Referenced ids absent from the batch, first-seen order, no repeats.
    pub missing: Vec<String>,
}

impl DependencyMap {
    pub fn dependents(&self, id: &str) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }
}

impl Default for DependencyMap {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
            max_dependents: 1,
            missing: Vec::new(),
        }
    }
}

pub fn build_dependency_map(tasks: &[Task]) -> DependencyMap {
    let known: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut missing: Vec<String> = Vec::new();
    let mut seen_missing: HashSet<&str> = HashSet::new();

    for t in tasks {
        for dep in &t.dependencies {
            if known.contains(dep.as_str()) {
                *counts.entry(dep.clone()).or_default() += 1;
            } else if seen_missing.insert(dep.as_str()) {
                missing.push(dep.clone());
            }
        }
    }

    let max_dependents = counts.values().copied().max().unwrap_or(1);

    DependencyMap {
        counts,
        max_dependents,
        missing,
    }
}
