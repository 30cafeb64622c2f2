use crate::error::{LaunchError, LaunchResult};
use crate::hyperparams::HyperparameterSet;
use crate::layout::StorageLayout;
use crate::metrics::{metric_definitions, MetricDefinition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Job name (and S3 prefix) used unless a timestamped one is requested.
pub const DEFAULT_JOB_NAME: &str = "current";
pub const JOB_NAME_PREFIX: &str = "deepracer";
pub const RLCOACH_PRESET: &str = "deepracer";
/// 24 hours.
pub const MAX_RUN_SECONDS: u64 = 24 * 60 * 60;
/// Only single-instance training jobs are supported.
pub const INSTANCE_COUNT: u32 = 1;

pub const ENTRY_POINT: &str = "training_worker.py";
pub const SOURCE_DIR: &str = "src";
pub const DEPENDENCIES: [&str; 1] = ["common/sagemaker_rl"];
pub const TOOLKIT_VERSION: &str = "0.11";

const CPU_IMAGE: &str = "awsdeepracercommunity/deepracer-sagemaker:cpu";
const GPU_IMAGE: &str = "awsdeepracercommunity/deepracer-sagemaker:gpu";

/// Training job name; also the S3 prefix for checkpoints and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobName(pub String);

impl JobName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names must be 1-63 ASCII alphanumerics or hyphens, starting and ending
    /// with an alphanumeric.
    pub fn validate(&self) -> LaunchResult<()> {
        let name = self.0.as_str();
        let valid_chars = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        let valid_ends = name.starts_with(|c: char| c.is_ascii_alphanumeric())
            && name.ends_with(|c: char| c.is_ascii_alphanumeric());
        if name.is_empty() || name.len() > 63 || !valid_chars || !valid_ends {
            return Err(LaunchError::InvalidSpec(format!(
                "job name `{name}` must be 1-63 alphanumerics or hyphens"
            )));
        }
        Ok(())
    }
}

impl Default for JobName {
    fn default() -> Self {
        Self(DEFAULT_JOB_NAME.to_string())
    }
}

impl std::fmt::Display for JobName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// `deepracer-sagemaker-<yymmdd-HHMMSS>`; keeps the `sagemaker` keyword the
/// simulator looks for in the prefix.
#[must_use]
pub fn timestamped_job_name(now: DateTime<Utc>) -> JobName {
    JobName(format!("{JOB_NAME_PREFIX}-sagemaker-{}", now.format("%y%m%d-%H%M%S")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RlToolkit {
    Coach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RlFramework {
    Tensorflow,
}

/// Instance type and container image, picked by the GPU toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeProfile {
    pub instance_type: String,
    pub image: String,
}

impl ComputeProfile {
    #[must_use]
    pub fn from_gpu_toggle(gpu: bool) -> Self {
        if gpu {
            Self { instance_type: "local_gpu".to_string(), image: GPU_IMAGE.to_string() }
        } else {
            Self { instance_type: "local".to_string(), image: CPU_IMAGE.to_string() }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingJobSpec {
    pub job_name: JobName,
    pub base_job_name: String,
    pub created_at: DateTime<Utc>,
    pub entry_point: String,
    pub source_dir: PathBuf,
    pub dependencies: Vec<PathBuf>,
    pub toolkit: RlToolkit,
    pub toolkit_version: String,
    pub framework: RlFramework,
    pub image: String,
    pub instance_type: String,
    pub instance_count: u32,
    pub output_path: String,
    pub max_run_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    pub hyperparameters: HyperparameterSet,
    pub metric_definitions: Vec<MetricDefinition>,
}

impl TrainingJobSpec {
    #[must_use]
    pub fn new(
        job_name: JobName,
        layout: &StorageLayout,
        compute: ComputeProfile,
        hyperparameters: HyperparameterSet,
    ) -> Self {
        Self {
            base_job_name: job_name.0.clone(),
            job_name,
            created_at: Utc::now(),
            entry_point: ENTRY_POINT.to_string(),
            source_dir: PathBuf::from(SOURCE_DIR),
            dependencies: DEPENDENCIES.iter().map(PathBuf::from).collect(),
            toolkit: RlToolkit::Coach,
            toolkit_version: TOOLKIT_VERSION.to_string(),
            framework: RlFramework::Tensorflow,
            image: compute.image,
            instance_type: compute.instance_type,
            instance_count: INSTANCE_COUNT,
            output_path: layout.output_path(),
            max_run_seconds: MAX_RUN_SECONDS,
            role_arn: None,
            hyperparameters,
            metric_definitions: metric_definitions(),
        }
    }

    #[must_use]
    pub fn with_role(mut self, role_arn: Option<String>) -> Self {
        self.role_arn = role_arn;
        self
    }

    pub fn validate(&self) -> LaunchResult<()> {
        self.job_name.validate()?;
        if self.instance_count != INSTANCE_COUNT {
            return Err(LaunchError::InvalidSpec(format!(
                "only single-instance training is supported (got {})",
                self.instance_count
            )));
        }
        if self.image.trim().is_empty() {
            return Err(LaunchError::InvalidSpec("image is required".to_string()));
        }
        if self.max_run_seconds == 0 {
            return Err(LaunchError::InvalidSpec("max_run_seconds must be > 0".to_string()));
        }
        Ok(())
    }
}
