//! Hyperparameter loading and assembly.
//!
//! The hyperparameter file is plain JSON. It is parsed with `serde_json`, checked
//! against [`REQUIRED_KEYS`] and merged with the values derived from the launch
//! context into one flat [`HyperparameterSet`].

use crate::error::{LaunchError, LaunchResult};
use crate::job::RLCOACH_PRESET;
use crate::layout::StorageLayout;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Keys the trainer needs from the hyperparameter file, in schema order.
pub const REQUIRED_KEYS: [&str; 14] = [
    "batch_size",
    "beta_entropy",
    "discount_factor",
    "e_greedy_value",
    "epsilon_steps",
    "exploration_type",
    "loss_type",
    "lr",
    "num_episodes_between_training",
    "num_epochs",
    "pretrained",
    "stack_size",
    "term_cond_avg_score",
    "term_cond_max_episodes",
];

/// Gates the pretrained-model keys; not forwarded to the trainer itself.
pub const PRETRAINED_KEY: &str = "pretrained";

pub type HyperparameterSet = BTreeMap<String, HyperValue>;

/// A scalar hyperparameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl HyperValue {
    fn from_json(key: &str, value: &Value) -> LaunchResult<Self> {
        match value {
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .ok_or_else(|| invalid(key, "number out of range")),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                Err(invalid(key, "expected a number, boolean or string"))
            }
        }
    }

    /// Numeric view; `true` counts as 1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }

    /// JSON-encoded form the orchestration service expects for hyperparameters.
    pub fn to_wire(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => Value::from(*f).to_string(),
            Self::Text(s) => Value::String(s.clone()).to_string(),
        }
    }
}

impl std::fmt::Display for HyperValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            other => f.write_str(&other.to_wire()),
        }
    }
}

impl From<&str> for HyperValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for HyperValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A parsed, not yet validated hyperparameter file.
#[derive(Debug, Clone)]
pub struct HyperparameterFile {
    origin: String,
    values: Map<String, Value>,
}

impl HyperparameterFile {
    pub fn load(path: &Path) -> LaunchResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse file contents; `origin` is only used in error messages.
    pub fn parse(contents: &str, origin: &str) -> LaunchResult<Self> {
        let value: Value = serde_json::from_str(contents).map_err(|e| LaunchError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

        let Value::Object(values) = value else {
            return Err(LaunchError::Parse {
                path: origin.to_string(),
                message: "expected a JSON object at the top level".to_string(),
            });
        };

        Ok(Self { origin: origin.to_string(), values })
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Check every required key is present and scalar.
    pub fn validate(&self) -> LaunchResult<()> {
        for key in REQUIRED_KEYS {
            self.get(key)?;
        }
        self.pretrained_enabled()?;

        for key in self.values.keys().filter(|k| !REQUIRED_KEYS.contains(&k.as_str())) {
            debug!(key = %key, origin = %self.origin, "Ignoring unknown hyperparameter");
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> LaunchResult<HyperValue> {
        let value = self.values.get(key).ok_or_else(|| LaunchError::MissingKey(key.to_string()))?;
        HyperValue::from_json(key, value)
    }

    /// `pretrained > 0` enables starting from the pretrained model.
    pub fn pretrained_enabled(&self) -> LaunchResult<bool> {
        self.get(PRETRAINED_KEY)?
            .as_f64()
            .map(|v| v > 0.0)
            .ok_or_else(|| invalid(PRETRAINED_KEY, "expected a number"))
    }
}

/// Runtime values merged into every hyperparameter set.
#[derive(Debug, Clone)]
pub struct HyperparameterContext {
    pub layout: StorageLayout,
    pub region: String,
}

pub fn assemble_hyperparameters(
    file: &HyperparameterFile,
    context: &HyperparameterContext,
) -> LaunchResult<HyperparameterSet> {
    file.validate()?;

    let layout = &context.layout;
    let mut set = HyperparameterSet::new();
    set.insert("s3_bucket".to_string(), layout.bucket().into());
    set.insert("s3_prefix".to_string(), layout.prefix().into());
    set.insert("aws_region".to_string(), context.region.as_str().into());
    set.insert("model_metadata_s3_key".to_string(), layout.model_metadata_uri().into());
    set.insert("RLCOACH_PRESET".to_string(), RLCOACH_PRESET.into());

    for key in REQUIRED_KEYS.into_iter().filter(|k| *k != PRETRAINED_KEY) {
        set.insert(key.to_string(), file.get(key)?);
    }

    if file.pretrained_enabled()? {
        set.insert("pretrained_s3_bucket".to_string(), layout.bucket().into());
        set.insert("pretrained_s3_prefix".to_string(), layout.pretrained_prefix().into());
    }

    debug!(count = set.len(), origin = %file.origin(), "Assembled hyperparameters");
    Ok(set)
}

fn invalid(key: &str, reason: &str) -> LaunchError {
    LaunchError::InvalidValue { key: key.to_string(), reason: reason.to_string() }
}
