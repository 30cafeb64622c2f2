//! Training job submission.

use crate::commands::types::JobArgs;
use crate::config;
use anyhow::{Context, Result};
use colored::Colorize;
use racer_training::{launch, prepare_job, DryRunRunner, JobHandle, SageMakerRunner};

pub async fn execute(job: &JobArgs, dry_run: bool, json_output: bool) -> Result<()> {
    let settings = config::load_settings(job.config.as_deref())?;
    let options = job.launch_options();
    let layout = options.layout(&settings);

    let handle = if dry_run {
        launch(&settings, &options, &DryRunRunner).await
    } else {
        let runner = SageMakerRunner::from_settings(&settings, layout.clone())?;
        launch(&settings, &options, &runner).await
    }
    .context("Failed to launch training job")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&handle)?);
        return Ok(());
    }

    print_handle(&handle, &layout.job_location(), dry_run);
    Ok(())
}

pub fn print_spec(job: &JobArgs) -> Result<()> {
    let settings = config::load_settings(job.config.as_deref())?;
    let spec = prepare_job(&settings, &job.launch_options()).context("Failed to build training job spec")?;
    println!("{}", serde_json::to_string_pretty(&spec)?);
    Ok(())
}

fn print_handle(handle: &JobHandle, location: &str, dry_run: bool) {
    println!();
    if dry_run {
        println!("{}", "Dry run complete (nothing submitted)".bold().yellow());
    } else {
        println!("{}", "Training job submitted".bold().green());
    }
    println!("  Job: {}", handle.job_name.cyan());
    if let Some(arn) = &handle.job_arn {
        println!("  ARN: {}", arn.dimmed());
    }
    println!("  Checkpoints: {}", location.dimmed());
    println!();
    if !dry_run {
        println!("  {}", "The job runs remotely; follow its progress in the orchestration service.".dimmed());
        println!();
    }
}
