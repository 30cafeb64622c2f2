//! Integration tests for `racer submit` and `racer spec`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const HYPERPARAMS: &str = r#"{
    "batch_size": 64,
    "beta_entropy": 0.01,
    "discount_factor": 0.999,
    "e_greedy_value": 0.05,
    "epsilon_steps": 10000,
    "exploration_type": "categorical",
    "loss_type": "huber",
    "lr": 0.0003,
    "num_episodes_between_training": 20,
    "num_epochs": 10,
    "pretrained": 0,
    "stack_size": 1,
    "term_cond_avg_score": 350.0,
    "term_cond_max_episodes": 1000
}"#;

/// A `racer` command isolated from the caller's AWS environment.
fn racer(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("racer").unwrap();
    cmd.current_dir(dir)
        .env("AWS_ACCESS_KEY_ID", "minio")
        .env("AWS_SECRET_ACCESS_KEY", "miniokey")
        .env("AWS_REGION", "us-east-1")
        .env("MODEL_S3_BUCKET", "bucket")
        .env("ENABLE_GPU_TRAINING", "false")
        .env_remove("S3_ENDPOINT_URL")
        .env_remove("SAGEMAKER_ENDPOINT_URL")
        .env_remove("SAGEMAKER_ROLE_ARN");
    cmd
}

fn workspace(hyperparams: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("hyperparams.json"), hyperparams).unwrap();
    temp
}

fn spec_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.arg("spec").assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_spec_uses_cpu_variants_by_default() {
    let temp = workspace(HYPERPARAMS);
    let spec = spec_json(&mut racer(temp.path()));

    assert_eq!(spec["job_name"], "current");
    assert_eq!(spec["instance_type"], "local");
    assert_eq!(spec["image"], "awsdeepracercommunity/deepracer-sagemaker:cpu");
    assert_eq!(spec["instance_count"], 1);
    assert_eq!(spec["max_run_seconds"], 86_400);
    assert_eq!(spec["hyperparameters"]["RLCOACH_PRESET"], "deepracer");
    assert_eq!(spec["metric_definitions"].as_array().unwrap().len(), 4);
}

#[test]
fn test_spec_uses_gpu_variants_when_enabled() {
    let temp = workspace(HYPERPARAMS);
    let mut cmd = racer(temp.path());
    cmd.env("ENABLE_GPU_TRAINING", "true");
    let spec = spec_json(&mut cmd);

    assert_eq!(spec["instance_type"], "local_gpu");
    assert_eq!(spec["image"], "awsdeepracercommunity/deepracer-sagemaker:gpu");
}

#[test]
fn test_spec_reads_local_settings_file() {
    let temp = workspace(HYPERPARAMS);
    std::fs::write(temp.path().join("racer.toml"), "aws_region = \"eu-west-1\"\n").unwrap();
    let mut cmd = racer(temp.path());
    cmd.env_remove("AWS_REGION");
    let spec = spec_json(&mut cmd);

    assert_eq!(spec["hyperparameters"]["aws_region"], "eu-west-1");
}

#[test]
fn test_submit_dry_run() {
    let temp = workspace(HYPERPARAMS);
    racer(temp.path())
        .arg("submit")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete"))
        .stdout(predicate::str::contains("s3://bucket/current"));
}

#[test]
fn test_submit_rejects_unsupported_region() {
    let temp = workspace(HYPERPARAMS);
    racer(temp.path())
        .env("AWS_REGION", "ap-south-1")
        .arg("submit")
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported region `ap-south-1`"));
}

#[test]
fn test_submit_rejects_missing_key() {
    let temp = workspace(&HYPERPARAMS.replace("\"lr\": 0.0003,", ""));
    racer(temp.path())
        .arg("submit")
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing hyperparameter key: lr"));
}

#[test]
fn test_submit_rejects_malformed_file() {
    let temp = workspace("{ batch_size: 64 }");
    racer(temp.path())
        .arg("submit")
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse hyperparameter file"));
}

#[test]
fn test_submit_to_orchestration_endpoint() {
    let temp = workspace(HYPERPARAMS);
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_header("x-amz-target", "SageMaker.CreateTrainingJob")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"ResourceConfig": {"InstanceCount": 1, "InstanceType": "local"}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"TrainingJobArn": "arn:aws:sagemaker:us-east-1:000000000000:training-job/current"}"#)
        .expect(1)
        .create();

    let output = racer(temp.path())
        .env("SAGEMAKER_ENDPOINT_URL", server.url())
        .arg("submit")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let handle: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(handle["job_name"], "current");
    assert_eq!(handle["job_arn"], "arn:aws:sagemaker:us-east-1:000000000000:training-job/current");
    mock.assert();
}

#[test]
fn test_submit_surfaces_service_failure() {
    let temp = workspace(HYPERPARAMS);
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/").with_status(503).with_body("unavailable").expect(1).create();

    racer(temp.path())
        .env("SAGEMAKER_ENDPOINT_URL", server.url())
        .arg("submit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("orchestration service unavailable"));
    mock.assert();
}

#[test]
fn test_job_name_conflicts_with_timestamped() {
    let temp = workspace(HYPERPARAMS);
    racer(temp.path())
        .args(["spec", "--job-name", "trial-1", "--timestamped"])
        .assert()
        .failure();
}
