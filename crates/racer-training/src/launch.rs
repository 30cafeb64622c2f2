use crate::error::LaunchResult;
use crate::hyperparams::{assemble_hyperparameters, HyperparameterContext, HyperparameterFile};
use crate::job::{ComputeProfile, JobName, TrainingJobSpec};
use crate::layout::StorageLayout;
use crate::region::validate_region;
use crate::runner::{JobHandle, JobRunner};
use crate::settings::LaunchSettings;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub job_name: JobName,
    pub hyperparams_path: PathBuf,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self { job_name: JobName::default(), hyperparams_path: PathBuf::from("hyperparams.json") }
    }
}

impl LaunchOptions {
    #[must_use]
    pub fn layout(&self, settings: &LaunchSettings) -> StorageLayout {
        StorageLayout::new(settings.model_s3_bucket.clone(), self.job_name.0.clone())
    }
}

/// Run every local step of a launch: region check, hyperparameter assembly
/// and job construction. Nothing remote is touched.
pub fn prepare_job(settings: &LaunchSettings, options: &LaunchOptions) -> LaunchResult<TrainingJobSpec> {
    validate_region(&settings.aws_region)?;

    let layout = options.layout(settings);
    info!(
        location = %format!("{}{}", layout.output_path(), options.job_name),
        "Model checkpoints and other metadata will be stored"
    );

    let file = HyperparameterFile::load(&options.hyperparams_path)?;
    let context = HyperparameterContext { layout: layout.clone(), region: settings.aws_region.clone() };
    let hyperparameters = assemble_hyperparameters(&file, &context)?;

    let compute = ComputeProfile::from_gpu_toggle(settings.gpu_enabled());
    let spec = TrainingJobSpec::new(options.job_name.clone(), &layout, compute, hyperparameters)
        .with_role(settings.sagemaker_role_arn.clone());
    spec.validate()?;
    Ok(spec)
}

/// Prepare the job and submit it exactly once.
pub async fn launch(
    settings: &LaunchSettings,
    options: &LaunchOptions,
    runner: &dyn JobRunner,
) -> LaunchResult<JobHandle> {
    let spec = prepare_job(settings, options)?;

    info!(
        job_name = %spec.job_name,
        runner = runner.id(),
        image = %spec.image,
        instance_type = %spec.instance_type,
        "Submitting training job"
    );
    runner.submit(&spec).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaunchError;
    use crate::hyperparams::fixtures::{sample_with, SAMPLE_HYPERPARAMS};
    use crate::hyperparams::HyperValue;
    use crate::runner::testing::RecordingRunner;
    use serde_json::json;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        options: LaunchOptions,
    }

    fn fixture(contents: &str) -> Fixture {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hyperparams.json");
        std::fs::write(&path, contents).unwrap();
        Fixture { options: LaunchOptions { hyperparams_path: path, ..Default::default() }, _temp: temp }
    }

    fn settings(vars: &[(&str, &str)]) -> LaunchSettings {
        LaunchSettings::from_vars(vars.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn test_launch_submits_exactly_once() {
        let fx = fixture(SAMPLE_HYPERPARAMS);
        let runner = RecordingRunner::default();

        let handle = launch(&settings(&[]), &fx.options, &runner).await.unwrap();

        assert_eq!(runner.calls(), 1);
        assert_eq!(handle.job_name, "current");
        let submitted = runner.submitted.lock().unwrap();
        let spec = &submitted[0];
        assert_eq!(spec.instance_count, 1);
        assert_eq!(spec.instance_type, "local");
        assert_eq!(spec.image, "awsdeepracercommunity/deepracer-sagemaker:cpu");
        assert_eq!(spec.hyperparameters["s3_prefix"], HyperValue::Text("current".to_string()));
    }

    #[tokio::test]
    async fn test_gpu_toggle_selects_gpu_variants() {
        let fx = fixture(SAMPLE_HYPERPARAMS);
        let runner = RecordingRunner::default();

        launch(&settings(&[("ENABLE_GPU_TRAINING", "true")]), &fx.options, &runner).await.unwrap();

        let submitted = runner.submitted.lock().unwrap();
        assert_eq!(submitted[0].instance_type, "local_gpu");
        assert_eq!(submitted[0].image, "awsdeepracercommunity/deepracer-sagemaker:gpu");
        assert_eq!(submitted[0].instance_count, 1);
    }

    #[tokio::test]
    async fn test_unsupported_region_never_reaches_runner() {
        let fx = fixture(SAMPLE_HYPERPARAMS);
        let runner = RecordingRunner::default();

        for region in ["ap-southeast-2", "eu-central-1", "us-east-2"] {
            let result = launch(&settings(&[("AWS_REGION", region)]), &fx.options, &runner).await;
            assert!(matches!(result, Err(LaunchError::UnsupportedRegion { .. })), "{region}");
        }
        assert_eq!(runner.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_never_reaches_runner() {
        let fx = fixture(&sample_with("num_epochs", None));
        let runner = RecordingRunner::default();

        let result = launch(&settings(&[]), &fx.options, &runner).await;
        assert!(matches!(result, Err(LaunchError::MissingKey(key)) if key == "num_epochs"));
        assert_eq!(runner.calls(), 0);
    }

    #[tokio::test]
    async fn test_pretrained_flows_into_submitted_spec() {
        let fx = fixture(&sample_with("pretrained", Some(json!(1))));
        let runner = RecordingRunner::default();

        launch(&settings(&[("MODEL_S3_BUCKET", "racing")]), &fx.options, &runner).await.unwrap();

        let submitted = runner.submitted.lock().unwrap();
        let hp = &submitted[0].hyperparameters;
        assert_eq!(hp["pretrained_s3_bucket"], HyperValue::Text("racing".to_string()));
        assert_eq!(hp["pretrained_s3_prefix"], HyperValue::Text("rl-deepracer-pretrained".to_string()));
    }

    #[test]
    fn test_prepare_job_applies_role_and_job_name() {
        let fx = fixture(SAMPLE_HYPERPARAMS);
        let options = LaunchOptions { job_name: JobName::new("deepracer-sagemaker-240101-000000"), ..fx.options.clone() };
        let spec = prepare_job(
            &settings(&[("SAGEMAKER_ROLE_ARN", "arn:aws:iam::123456789012:role/racer")]),
            &options,
        )
        .unwrap();

        assert_eq!(spec.job_name.as_str(), "deepracer-sagemaker-240101-000000");
        assert_eq!(spec.role_arn.as_deref(), Some("arn:aws:iam::123456789012:role/racer"));
        assert_eq!(
            spec.hyperparameters["s3_prefix"],
            HyperValue::Text("deepracer-sagemaker-240101-000000".to_string())
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let options = LaunchOptions { hyperparams_path: PathBuf::from("/nonexistent/hyperparams.json"), ..Default::default() };
        assert!(matches!(prepare_job(&settings(&[]), &options), Err(LaunchError::Io(_))));
    }
}
