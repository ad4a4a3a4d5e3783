use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskrank_core::{
    analyze_tasks, strategy_catalog, suggest, time, AnalysisResult, AnalyzeOptions, Strategy,
    Weights,
};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod input;
mod render;
mod request;
mod state;

use config::Config;
use input::AnalyzeRequest;
use render::Format;

#[derive(Parser, Debug)]
#[command(
    name = "taskrank",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TASKRANK_BUILD_SHA"), ")"),
    about = "Rank tasks by urgency, importance, effort and dependencies"
)]
struct Cli {
    /// Debug logging (overrides RUST_LOG and config)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every task and print them in priority order
    Analyze(BatchArgs),

    /// Print the top N tasks to work on next
    Suggest {
        #[command(flatten)]
        batch: BatchArgs,

        /// Number of suggestions (default from config, fallback 3)
        #[arg(long)]
        count: Option<usize>,
    },

    /// List the built-in strategies and their weights
    Strategies {
        #[arg(long, value_enum)]
        format: Option<Format>,
    },

    /// Inspect or create ~/.taskrank/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Tasks file (JSON object, JSON array or CSV); `-` reads stdin
    #[arg(long, short, default_value = "-")]
    input: PathBuf,

    /// smart_balance | fastest | high_impact | deadline
    #[arg(long, short)]
    strategy: Option<Strategy>,

    /// Custom weights "u,i,e,d" replacing the strategy preset
    #[arg(long)]
    weights: Option<Weights>,

    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Evaluate due dates as of this day (YYYY-MM-DD) instead of today
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Skip request validation; let the engine normalize bad fields
    #[arg(long, default_value_t = false)]
    lenient: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands must work even when config.toml is broken.
    if let Command::Config { command } = &cli.command {
        init_logging(cli.verbose, &Config::default());
        return match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => config::show_config(),
            ConfigCommand::Path => {
                println!("{}", config::config_path()?.display());
                Ok(())
            }
        };
    }

    let cfg = config::load_config()?;
    init_logging(cli.verbose, &cfg);

    match cli.command {
        Command::Analyze(batch) => {
            let format = batch.format.unwrap_or(cfg.output.format);
            let result = run_batch(&batch, &cfg)?;
            render::print_analysis(&result, format)?;
        }

        Command::Suggest { batch, count } => {
            let format = batch.format.unwrap_or(cfg.output.format);
            let count = count.unwrap_or(cfg.analysis.suggestion_count);
            let result = run_batch(&batch, &cfg)?;
            render::print_suggestions(&suggest(&result, count), format)?;
        }

        Command::Strategies { format } => {
            render::print_strategies(&strategy_catalog(), format.unwrap_or(cfg.output.format))?;
        }

        Command::Config { .. } => {}
    }

    Ok(())
}

/// Logs go to stderr so JSON on stdout stays machine-readable.
fn init_logging(verbose: bool, cfg: &Config) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.output.log_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run_batch(batch: &BatchArgs, cfg: &Config) -> Result<AnalysisResult> {
    let req = input::load_request(&batch.input)?;

    if batch.lenient {
        debug!("request validation skipped");
    } else {
        request::validate(&req)?;
    }

    let options = resolve_options(batch, &req, cfg);
    let strategy = options.strategy;

    let now = reference_now(batch.today, &cfg.analysis.timezone)?;

    info!(
        tasks = req.tasks.len(),
        %strategy,
        custom_weights = options.weights.is_some(),
        "analyzing"
    );

    let result = analyze_tasks(req.tasks, &options, now);
    for w in &result.warnings {
        debug!(warning = %w);
    }
    Ok(result)
}

/// Strategy: flag > request body > config. Weights: flag > request body.
fn resolve_options(batch: &BatchArgs, req: &AnalyzeRequest, cfg: &Config) -> AnalyzeOptions {
    let strategy = batch
        .strategy
        .or(req.strategy)
        .unwrap_or(cfg.analysis.default_strategy);

    let options =
        AnalyzeOptions::new(strategy).with_max_effort_hours(cfg.analysis.max_effort_hours);
    match batch.weights.or(req.weights) {
        Some(w) => options.with_weights(w),
        None => options,
    }
}

fn reference_now(today: Option<NaiveDate>, tz: &str) -> Result<NaiveDateTime> {
    match today {
        Some(d) => Ok(time::start_of_day(d)),
        None => time::local_now(tz).with_context(|| format!("resolving today in {tz}")),
    }
}
