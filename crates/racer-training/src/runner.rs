use crate::error::LaunchResult;
use crate::job::TrainingJobSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Returned once the orchestration service has accepted a job.
///
/// Acceptance says nothing about completion; progress is tracked by the
/// service itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_name: String,
    /// Service-assigned identifier, when the service returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_arn: Option<String>,
    pub runner: String,
}

/// Submits a training job without waiting for it to finish.
#[async_trait]
pub trait JobRunner: Send + Sync {
    fn id(&self) -> &'static str;

    async fn submit(&self, job: &TrainingJobSpec) -> LaunchResult<JobHandle>;
}

/// Logs the job instead of submitting it.
#[derive(Debug, Default)]
pub struct DryRunRunner;

#[async_trait]
impl JobRunner for DryRunRunner {
    fn id(&self) -> &'static str {
        "dry-run"
    }

    async fn submit(&self, job: &TrainingJobSpec) -> LaunchResult<JobHandle> {
        info!(
            job_name = %job.job_name,
            image = %job.image,
            instance_type = %job.instance_type,
            hyperparameters = job.hyperparameters.len(),
            "Dry run: training job not submitted"
        );
        Ok(JobHandle { job_name: job.job_name.0.clone(), job_arn: None, runner: self.id().to_string() })
    }
}
