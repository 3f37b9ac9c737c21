//! CLI command definitions for labmark.
//!
//! The structured JSON report owns stdout; all diagnostics go to stderr via
//! tracing. Exit code 0 means every requested lab passed and the
//! leaderboard persisted; anything else is 1.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use tracing::error;

use crate::pipeline::{EvalConfig, Orchestrator};
use crate::runner::ExecutorConfig;

/// Lab submission evaluator and leaderboard maintainer.
#[derive(Parser)]
#[command(name = "labmark")]
#[command(about = "Evaluate lab submissions and update the leaderboard")]
#[command(version)]
#[command(
    long_about = "labmark runs per-task grading scripts against student submissions and \
records pass/fail results into a markdown leaderboard.\n\nExample usage:\n  \
labmark evaluate --path alice/lab1 bob/lab2 --base-dir ./grading"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Evaluate one or more submissions and update the leaderboard.
    #[command(alias = "eval")]
    Evaluate(EvaluateArgs),
}

/// Arguments for `labmark evaluate`.
#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// Evaluation paths, formatted as <username>/lab<N>.
    #[arg(short, long, num_args = 1.., required = true)]
    pub path: Vec<String>,

    /// Base directory containing code/, submit/ and the leaderboard.
    #[arg(short, long, default_value = ".", env = "LABMARK_BASE_DIR")]
    pub base_dir: PathBuf,

    /// Leaderboard document (default: <base-dir>/README.md).
    #[arg(long)]
    pub leaderboard: Option<PathBuf>,

    /// Interpreter used to run grading programs.
    #[arg(long, default_value = "python")]
    pub interpreter: String,

    /// Per-task timeout in seconds.
    #[arg(long, default_value = "60")]
    pub timeout_secs: u64,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parses arguments and runs the selected command.
pub async fn run() -> ExitCode {
    run_with_cli(parse_cli()).await
}

/// Runs the selected command with pre-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> ExitCode {
    match cli.command {
        Commands::Evaluate(args) => evaluate(args).await,
    }
}

async fn evaluate(args: EvaluateArgs) -> ExitCode {
    let executor = ExecutorConfig::new()
        .with_interpreter(args.interpreter)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let mut config = EvalConfig::new(args.base_dir).with_executor(executor);
    if let Some(leaderboard) = args.leaderboard {
        config = config.with_leaderboard(leaderboard);
    }

    match Orchestrator::new(config).run(&args.path).await {
        Ok(report) => {
            emit(&report.outcomes);
            if report.success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("evaluation run aborted: {e}");
            emit(&json!({ "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}

/// Writes the structured report to stdout as pretty-printed JSON.
fn emit<T: serde::Serialize>(report: &T) {
    match serde_json::to_string_pretty(report) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            error!("failed to serialize report: {e}");
            println!("{}", json!({ "error": format!("failed to serialize report: {e}") }));
        }
    }
}
