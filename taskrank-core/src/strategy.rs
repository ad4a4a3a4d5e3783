//! Strategies: named weight profiles over the four scoring factors.
//!
//! Weights are not required to sum to 1, so a final score is "percent-like"
//! rather than a true percentage.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    SmartBalance,
    Fastest,
    HighImpact,
    Deadline,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::Fastest,
        Strategy::HighImpact,
        Strategy::Deadline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::Fastest => "fastest",
            Strategy::HighImpact => "high_impact",
            Strategy::Deadline => "deadline",
        }
    }

    /// Preset weights for this strategy.
    pub fn weights(&self) -> Weights {
        match self {
            Strategy::SmartBalance => Weights::new(0.35, 0.35, 0.15, 0.15),
            Strategy::Fastest => Weights::new(0.15, 0.20, 0.50, 0.15),
            Strategy::HighImpact => Weights::new(0.15, 0.60, 0.10, 0.15),
            Strategy::Deadline => Weights::new(0.60, 0.25, 0.05, 0.10),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "Balanced approach considering all factors equally",
            Strategy::Fastest => "Prioritizes quick wins - tasks that take less time",
            Strategy::HighImpact => "Prioritizes importance over other factors",
            Strategy::Deadline => "Prioritizes urgent tasks based on due dates",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        match Strategy::ALL.iter().find(|st| st.as_str() == wanted) {
            Some(st) => Ok(*st),
            None => bail!(
                "unknown strategy '{s}' (expected one of: smart_balance, fastest, high_impact, deadline)"
            ),
        }
    }
}

/// Factor weights, each expected in 0.0..=1.0.
///
/// Serialized with the short keys `u`, `i`, `e`, `d`; an override must carry
/// exactly those four keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    #[serde(rename = "u")]
    pub urgency: f64,
    #[serde(rename = "i")]
    pub importance: f64,
    #[serde(rename = "e")]
    pub effort: f64,
    #[serde(rename = "d")]
    pub dependency: f64,
}

impl Weights {
    pub const fn new(urgency: f64, importance: f64, effort: f64, dependency: f64) -> Self {
        Self {
            urgency,
            importance,
            effort,
            dependency,
        }
    }

    /// Reject weights outside 0.0..=1.0.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in self.entries() {
            if !(0.0..=1.0).contains(&value) {
                bail!("weight '{key}' must be between 0 and 1 (got {value})");
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("u", self.urgency),
            ("i", self.importance),
            ("e", self.effort),
            ("d", self.dependency),
        ]
    }
}

impl Default for Weights {
    fn default() -> Self {
        Strategy::default().weights()
    }
}

impl FromStr for Weights {
    type Err = anyhow::Error;

    /// Parse `"u,i,e,d"`, e.g. `"0.4,0.3,0.2,0.1"`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [u, i, e, d] = parts.as_slice() else {
            bail!("weights must be four comma-separated numbers (u,i,e,d), got '{s}'");
        };

        let parse = |key: &str, raw: &str| -> Result<f64> {
            raw.parse::<f64>()
                .map_err(|_| anyhow::anyhow!("weight '{key}' is not a number: '{raw}'"))
        };

        let weights = Weights::new(parse("u", *u)?, parse("i", *i)?, parse("e", *e)?, parse("d", *d)?);
        weights.validate()?;
        Ok(weights)
    }
}

/// The built-in strategies, for listing without any task input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyCatalog {
    pub strategies: BTreeMap<Strategy, Weights>,
    pub descriptions: BTreeMap<Strategy, &'static str>,
}

pub fn strategy_catalog() -> StrategyCatalog {
    StrategyCatalog {
        strategies: Strategy::ALL.iter().map(|s| (*s, s.weights())).collect(),
        descriptions: Strategy::ALL.iter().map(|s| (*s, s.description())).collect(),
    }
}
