//! Racer CLI - launch DeepRacer reinforcement-learning training jobs
//!
//! Provides the `racer` command: assemble hyperparameters, build the training
//! job spec and hand it to the orchestration service.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{metrics, regions, submit, types::JobArgs};

/// Racer CLI - DeepRacer training job launcher
#[derive(Parser, Debug)]
#[command(name = "racer", author, version, about = "Racer - launch DeepRacer training jobs")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a training job
    ///
    /// Validates the region, assembles hyperparameters and submits the job
    /// once. Returns as soon as the service accepts it.
    Submit {
        #[command(flatten)]
        job: JobArgs,

        /// Build and log the job without contacting the service
        #[arg(long)]
        dry_run: bool,

        /// Output the job handle as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the assembled training job spec as JSON without submitting
    Spec {
        #[command(flatten)]
        job: JobArgs,
    },

    /// Extract metric samples from a training log
    Metrics {
        /// Log file to scan (reads stdin when omitted)
        log_file: Option<PathBuf>,

        /// Output samples as JSON
        #[arg(long)]
        json: bool,
    },

    /// List regions that can run training jobs
    Regions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries command output (often JSON); logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Submit { job, dry_run, json } => submit::execute(&job, dry_run, json).await?,
        Command::Spec { job } => submit::print_spec(&job)?,
        Command::Metrics { log_file, json } => metrics::execute(log_file, json)?,
        Command::Regions { json } => regions::execute(json)?,
    }

    Ok(())
}
