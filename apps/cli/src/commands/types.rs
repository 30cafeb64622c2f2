//! Shared command argument types.

use chrono::Utc;
use clap::Args;
use racer_training::{timestamped_job_name, JobName, LaunchOptions};
use std::path::PathBuf;

/// Arguments that describe which job to build.
#[derive(Args, Debug, Clone)]
pub struct JobArgs {
    /// Hyperparameter file (JSON object)
    #[arg(long, default_value = "hyperparams.json")]
    pub hyperparams: PathBuf,

    /// Settings file (TOML); defaults to ./racer.toml when present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Job name, also used as the S3 prefix (default: current)
    #[arg(long, conflicts_with = "timestamped")]
    pub job_name: Option<String>,

    /// Derive a unique `deepracer-sagemaker-<timestamp>` job name
    #[arg(long)]
    pub timestamped: bool,
}

impl JobArgs {
    pub fn launch_options(&self) -> LaunchOptions {
        let job_name = if self.timestamped {
            timestamped_job_name(Utc::now())
        } else {
            self.job_name.clone().map(JobName).unwrap_or_default()
        };
        LaunchOptions { job_name, hyperparams_path: self.hyperparams.clone() }
    }
}
