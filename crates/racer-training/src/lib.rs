//! Racer Training
//!
//! Launch primitives for DeepRacer reinforcement-learning training jobs:
//! - Collecting launch settings (`LaunchSettings`)
//! - Validating regions and assembling hyperparameters
//! - Metric-extraction patterns for the training log stream
//! - Building a `TrainingJobSpec` and submitting it through a `JobRunner`

pub mod error;
pub mod hyperparams;
pub mod job;
pub mod launch;
pub mod layout;
pub mod metrics;
pub mod region;
pub mod runner;
pub mod sagemaker;
pub mod settings;
pub mod sigv4;

pub use error::{LaunchError, LaunchResult};
pub use hyperparams::{
    assemble_hyperparameters, HyperValue, HyperparameterContext, HyperparameterFile,
    HyperparameterSet, REQUIRED_KEYS,
};
pub use job::{
    timestamped_job_name, ComputeProfile, JobName, RlFramework, RlToolkit, TrainingJobSpec,
    DEFAULT_JOB_NAME, MAX_RUN_SECONDS, RLCOACH_PRESET,
};
pub use launch::{launch, prepare_job, LaunchOptions};
pub use layout::StorageLayout;
pub use metrics::{metric_definitions, MetricDefinition, MetricSample, MetricScraper};
pub use region::{validate_region, SUPPORTED_REGIONS};
pub use runner::{DryRunRunner, JobHandle, JobRunner};
pub use sagemaker::SageMakerRunner;
pub use settings::LaunchSettings;
