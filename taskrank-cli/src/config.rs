use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use taskrank_core::{Strategy, DEFAULT_MAX_EFFORT_HOURS, DEFAULT_SUGGESTION_COUNT};

use crate::render::Format;
use crate::state::{ensure_taskrank_home, taskrank_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    pub default_strategy: Strategy,
    pub suggestion_count: usize,
    /// Reference duration at which the effort factor bottoms out.
    pub max_effort_hours: f64,
    /// IANA name used to decide what "today" is.
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: Format,
    /// Used when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            default_strategy: Strategy::SmartBalance,
            suggestion_count: DEFAULT_SUGGESTION_COUNT,
            max_effort_hours: DEFAULT_MAX_EFFORT_HOURS,
            timezone: "UTC".to_string(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: Format::Table,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let hours = self.analysis.max_effort_hours;
        if !hours.is_finite() || hours <= 0.0 {
            bail!("analysis.max_effort_hours must be a positive number (got {hours})");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(taskrank_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate().with_context(|| format!("invalid {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = ensure_taskrank_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
