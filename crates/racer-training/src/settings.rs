//! Launch settings.
//!
//! Everything the launcher reads from its surroundings (credentials, region,
//! endpoints, bucket, GPU toggle) is collected here once and passed down
//! explicitly. Precedence, lowest first:
//!
//! 1. Built-in defaults (local MinIO-style storage)
//! 2. Optional TOML settings file
//! 3. Environment variables (`AWS_REGION`, `MODEL_S3_BUCKET`, ...)

use crate::error::{LaunchError, LaunchResult};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use url::Url;

pub const DEFAULT_ACCESS_KEY_ID: &str = "minio";
pub const DEFAULT_SECRET_ACCESS_KEY: &str = "miniokey";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_S3_ENDPOINT_URL: &str = "http://127.0.0.1:9000";
pub const DEFAULT_BUCKET: &str = "bucket";

#[derive(Clone, Deserialize)]
pub struct LaunchSettings {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_region: String,
    /// Object-storage endpoint the training container syncs checkpoints with.
    pub s3_endpoint_url: String,
    pub model_s3_bucket: String,
    /// Raw GPU toggle; see [`LaunchSettings::gpu_enabled`].
    pub enable_gpu_training: String,
    /// Orchestration endpoint override (defaults to the regional SageMaker API).
    #[serde(default)]
    pub sagemaker_endpoint_url: Option<String>,
    #[serde(default)]
    pub sagemaker_role_arn: Option<String>,
}

impl LaunchSettings {
    /// Load settings from the process environment, layered over an optional
    /// TOML file.
    pub fn load(config_file: Option<&Path>) -> LaunchResult<Self> {
        Self::from_sources(config_file, None)
    }

    /// Load settings from an explicit variable map instead of the process
    /// environment.
    pub fn from_vars<I, K, V>(vars: I) -> LaunchResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_sources(None, Some(collect_vars(vars)))
    }

    /// Same as [`LaunchSettings::from_vars`], with a TOML file underneath.
    pub fn from_file_and_vars<I, K, V>(config_file: &Path, vars: I) -> LaunchResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_sources(Some(config_file), Some(collect_vars(vars)))
    }

    fn from_sources(
        config_file: Option<&Path>,
        vars: Option<config::Map<String, String>>,
    ) -> LaunchResult<Self> {
        let mut builder = Config::builder()
            .set_default("aws_access_key_id", DEFAULT_ACCESS_KEY_ID)?
            .set_default("aws_secret_access_key", DEFAULT_SECRET_ACCESS_KEY)?
            .set_default("aws_region", DEFAULT_REGION)?
            .set_default("s3_endpoint_url", DEFAULT_S3_ENDPOINT_URL)?
            .set_default("model_s3_bucket", DEFAULT_BUCKET)?
            .set_default("enable_gpu_training", "false")?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let settings: Self = builder
            .add_source(Environment::default().source(vars))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> LaunchResult<()> {
        if self.model_s3_bucket.trim().is_empty() {
            return Err(LaunchError::Settings("MODEL_S3_BUCKET must not be empty".to_string()));
        }
        Url::parse(&self.s3_endpoint_url).map_err(|e| {
            LaunchError::Settings(format!("S3_ENDPOINT_URL `{}`: {}", self.s3_endpoint_url, e))
        })?;
        if let Some(endpoint) = &self.sagemaker_endpoint_url {
            Url::parse(endpoint).map_err(|e| {
                LaunchError::Settings(format!("SAGEMAKER_ENDPOINT_URL `{endpoint}`: {e}"))
            })?;
        }
        Ok(())
    }

    /// GPU training is on unless the toggle is unset or one of
    /// `false`, `0`, `no`, `off` (any case).
    pub fn gpu_enabled(&self) -> bool {
        parse_toggle(&self.enable_gpu_training)
    }

    pub fn orchestration_endpoint(&self) -> String {
        self.sagemaker_endpoint_url
            .clone()
            .unwrap_or_else(|| format!("https://api.sagemaker.{}.amazonaws.com", self.aws_region))
    }
}

impl std::fmt::Debug for LaunchSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchSettings")
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &"<redacted>")
            .field("aws_region", &self.aws_region)
            .field("s3_endpoint_url", &self.s3_endpoint_url)
            .field("model_s3_bucket", &self.model_s3_bucket)
            .field("enable_gpu_training", &self.enable_gpu_training)
            .field("sagemaker_endpoint_url", &self.sagemaker_endpoint_url)
            .field("sagemaker_role_arn", &self.sagemaker_role_arn)
            .finish()
    }
}

fn collect_vars<I, K, V>(vars: I) -> config::Map<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

fn parse_toggle(raw: &str) -> bool {
    !matches!(raw.trim().to_ascii_lowercase().as_str(), "" | "false" | "0" | "no" | "off")
}
