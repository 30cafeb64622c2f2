//! Scrape metric samples from a training log.

use anyhow::{Context, Result};
use colored::Colorize;
use racer_training::MetricScraper;
use std::path::PathBuf;

pub fn execute(log_file: Option<PathBuf>, json_output: bool) -> Result<()> {
    let log = match &log_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read log file: {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read log from stdin")?,
    };

    let scraper = MetricScraper::deepracer()?;
    let samples = scraper.scrape(&log);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }

    if samples.is_empty() {
        println!("  {}", "No metric samples found.".dimmed());
        return Ok(());
    }

    println!("{:<8} {:<22} {}", "Line", "Metric", "Value");
    println!("{}", "─".repeat(48));
    for sample in samples {
        println!("{:<8} {:<22} {}", sample.line, sample.name.cyan(), sample.value);
    }
    Ok(())
}
