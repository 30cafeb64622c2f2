//! Metric patterns for the training log stream.
//!
//! The orchestration service applies these regexes to every log line the
//! training container emits and charts the captured value. [`MetricScraper`]
//! applies the same table locally.

use crate::error::{LaunchError, LaunchResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

// Training> Name=main_level/agent, Worker=0, Episode=19, Total reward=-102.88, Steps=19019, Training iteration=1
// Policy training> Surrogate loss=-0.32664725184440613, KL divergence=7.255815035023261e-06, Entropy=2.83156156539917, training epoch=0, learning_rate=0.00025
// Testing> Name=main_level/agent, Worker=0, Episode=19, Total reward=1359.12, Steps=20015, Training iteration=2
const METRIC_PATTERNS: [(&str, &str); 4] = [
    ("reward-training", r"^Training>.*Total reward=(.*?),"),
    ("ppo-surrogate-loss", r"^Policy training>.*Surrogate loss=(.*?),"),
    ("ppo-entropy", r"^Policy training>.*Entropy=(.*?),"),
    ("reward-testing", r"^Testing>.*Total reward=(.*?),"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub name: String,
    /// Regular expression with exactly one capture group.
    pub regex: String,
}

/// The fixed DeepRacer metric table.
#[must_use]
pub fn metric_definitions() -> Vec<MetricDefinition> {
    METRIC_PATTERNS
        .iter()
        .map(|(name, regex)| MetricDefinition { name: (*name).to_string(), regex: (*regex).to_string() })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub name: String,
    pub value: f64,
    /// 1-based line number within the scraped log.
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct MetricScraper {
    patterns: Vec<(String, Regex)>,
}

impl MetricScraper {
    pub fn new(definitions: &[MetricDefinition]) -> LaunchResult<Self> {
        let mut patterns = Vec::with_capacity(definitions.len());
        for def in definitions {
            let regex = Regex::new(&def.regex).map_err(|e| LaunchError::InvalidValue {
                key: def.name.clone(),
                reason: e.to_string(),
            })?;
            // captures_len counts the implicit whole-match group
            if regex.captures_len() != 2 {
                return Err(LaunchError::InvalidValue {
                    key: def.name.clone(),
                    reason: format!("expected exactly one capture group, found {}", regex.captures_len() - 1),
                });
            }
            patterns.push((def.name.clone(), regex));
        }
        Ok(Self { patterns })
    }

    pub fn deepracer() -> LaunchResult<Self> {
        Self::new(&metric_definitions())
    }

    /// Samples on a single line; captures that do not parse as numbers are skipped.
    pub fn scrape_line(&self, line: &str, line_no: usize) -> Vec<MetricSample> {
        let mut samples = Vec::new();
        for (name, regex) in &self.patterns {
            let Some(raw) = regex.captures(line).and_then(|c| c.get(1)) else {
                continue;
            };
            match raw.as_str().trim().parse::<f64>() {
                Ok(value) => samples.push(MetricSample { name: name.clone(), value, line: line_no }),
                Err(_) => trace!(metric = %name, raw = raw.as_str(), line = line_no, "Non-numeric metric capture"),
            }
        }
        samples
    }

    pub fn scrape(&self, log: &str) -> Vec<MetricSample> {
        log.lines()
            .enumerate()
            .flat_map(|(idx, line)| self.scrape_line(line, idx + 1))
            .collect()
    }
}
