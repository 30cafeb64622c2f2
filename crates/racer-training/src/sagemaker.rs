//! SageMaker-compatible orchestration backend.
//!
//! Submits a `CreateTrainingJob` request (AWS JSON 1.1 protocol, SigV4 signed)
//! and returns as soon as the service accepts the job.

use crate::error::{LaunchError, LaunchResult};
use crate::job::TrainingJobSpec;
use crate::layout::StorageLayout;
use crate::runner::{JobHandle, JobRunner};
use crate::settings::LaunchSettings;
use crate::sigv4::{self, Credentials, SigningContext};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

const SERVICE: &str = "sagemaker";
const TARGET: &str = "SageMaker.CreateTrainingJob";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const VOLUME_SIZE_GB: u32 = 30;
/// Python `logging.INFO`, read by the container's entry script.
const CONTAINER_LOG_LEVEL: u32 = 20;

pub struct SageMakerRunner {
    endpoint: Url,
    region: String,
    credentials: Credentials,
    layout: StorageLayout,
    client: Client,
}

impl SageMakerRunner {
    pub fn new(endpoint: Url, region: String, credentials: Credentials, layout: StorageLayout) -> LaunchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| LaunchError::Transport(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { endpoint, region, credentials, layout, client })
    }

    pub fn from_settings(settings: &LaunchSettings, layout: StorageLayout) -> LaunchResult<Self> {
        let endpoint_raw = settings.orchestration_endpoint();
        let endpoint = Url::parse(&endpoint_raw)
            .map_err(|e| LaunchError::Settings(format!("orchestration endpoint `{endpoint_raw}`: {e}")))?;
        let credentials = Credentials {
            access_key_id: settings.aws_access_key_id.clone(),
            secret_access_key: settings.aws_secret_access_key.clone(),
        };
        Self::new(endpoint, settings.aws_region.clone(), credentials, layout)
    }

    fn request_body(&self, job: &TrainingJobSpec) -> CreateTrainingJobRequest {
        let mut hyper_parameters: BTreeMap<String, String> =
            job.hyperparameters.iter().map(|(k, v)| (k.clone(), v.to_wire())).collect();

        let framework = [
            ("sagemaker_program", job.entry_point.clone()),
            ("sagemaker_submit_directory", self.layout.submit_directory(job.job_name.as_str())),
            ("sagemaker_region", self.region.clone()),
            ("sagemaker_job_name", job.job_name.0.clone()),
            ("sagemaker_estimator", "RLEstimator".to_string()),
        ];
        for (key, value) in framework {
            hyper_parameters.insert(key.to_string(), serde_json::Value::String(value).to_string());
        }
        hyper_parameters.insert("sagemaker_container_log_level".to_string(), CONTAINER_LOG_LEVEL.to_string());

        CreateTrainingJobRequest {
            training_job_name: job.job_name.0.clone(),
            algorithm_specification: AlgorithmSpecification {
                training_image: job.image.clone(),
                training_input_mode: "File".to_string(),
                metric_definitions: job
                    .metric_definitions
                    .iter()
                    .map(|m| WireMetricDefinition { name: m.name.clone(), regex: m.regex.clone() })
                    .collect(),
            },
            role_arn: job.role_arn.clone(),
            output_data_config: OutputDataConfig { s3_output_path: job.output_path.clone() },
            resource_config: ResourceConfig {
                instance_type: job.instance_type.clone(),
                instance_count: job.instance_count,
                volume_size_in_gb: VOLUME_SIZE_GB,
            },
            stopping_condition: StoppingCondition { max_runtime_in_seconds: job.max_run_seconds },
            hyper_parameters,
        }
    }
}

#[async_trait]
impl JobRunner for SageMakerRunner {
    fn id(&self) -> &'static str {
        "sagemaker"
    }

    async fn submit(&self, job: &TrainingJobSpec) -> LaunchResult<JobHandle> {
        let body = serde_json::to_vec(&self.request_body(job))?;
        let ctx = SigningContext {
            credentials: &self.credentials,
            region: &self.region,
            service: SERVICE,
            time: Utc::now(),
        };
        let signed = sigv4::sign(
            &ctx,
            "POST",
            &self.endpoint,
            &[("content-type", CONTENT_TYPE), ("x-amz-target", TARGET)],
            &body,
        )?;

        debug!(
            endpoint = %self.endpoint,
            job_name = %job.job_name,
            bytes = body.len(),
            "Submitting CreateTrainingJob"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", TARGET)
            .header("x-amz-date", &signed.amz_date)
            .header("authorization", &signed.authorization)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, endpoint = %self.endpoint, "Failed to reach orchestration service");
                LaunchError::Transport(format!("Network error: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Orchestration service returned error status");

            if status == 401 || status == 403 {
                return Err(LaunchError::Auth(format!("{status}: {error_text}")));
            }
            if status.is_server_error() {
                return Err(LaunchError::ServiceUnavailable(format!("{status}: {error_text}")));
            }
            return Err(LaunchError::Rejected(format!("{status}: {error_text}")));
        }

        let text = response.text().await.map_err(|e| LaunchError::Transport(e.to_string()))?;
        let accepted: CreateTrainingJobResponse = if text.trim().is_empty() {
            CreateTrainingJobResponse::default()
        } else {
            serde_json::from_str(&text)?
        };

        info!(job_name = %job.job_name, job_arn = ?accepted.training_job_arn, "Training job accepted");
        Ok(JobHandle {
            job_name: job.job_name.0.clone(),
            job_arn: accepted.training_job_arn,
            runner: self.id().to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateTrainingJobRequest {
    training_job_name: String,
    algorithm_specification: AlgorithmSpecification,
    #[serde(skip_serializing_if = "Option::is_none")]
    role_arn: Option<String>,
    output_data_config: OutputDataConfig,
    resource_config: ResourceConfig,
    stopping_condition: StoppingCondition,
    hyper_parameters: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AlgorithmSpecification {
    training_image: String,
    training_input_mode: String,
    metric_definitions: Vec<WireMetricDefinition>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireMetricDefinition {
    name: String,
    regex: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OutputDataConfig {
    #[serde(rename = "S3OutputPath")]
    s3_output_path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceConfig {
    instance_type: String,
    instance_count: u32,
    #[serde(rename = "VolumeSizeInGB")]
    volume_size_in_gb: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct StoppingCondition {
    max_runtime_in_seconds: u64,
}

#[derive(Debug, Default, Deserialize)]
struct CreateTrainingJobResponse {
    #[serde(rename = "TrainingJobArn")]
    training_job_arn: Option<String>,
}
