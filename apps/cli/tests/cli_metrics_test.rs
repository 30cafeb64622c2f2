//! Integration tests for `racer metrics` and `racer regions`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LOG: &str = "\
Training> Name=main_level/agent, Worker=0, Episode=19, Total reward=-102.88, Steps=19019, Training iteration=1
Policy training> Surrogate loss=-0.32664725184440613, KL divergence=7.255815035023261e-06, Entropy=2.83156156539917, training epoch=0, learning_rate=0.00025
Testing> Name=main_level/agent, Worker=0, Episode=19, Total reward=1359.12, Steps=20015, Training iteration=2
";

#[test]
fn test_metrics_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("training.log");
    std::fs::write(&path, LOG).unwrap();

    Command::cargo_bin("racer")
        .unwrap()
        .arg("metrics")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("reward-training"))
        .stdout(predicate::str::contains("-102.88"))
        .stdout(predicate::str::contains("1359.12"));
}

#[test]
fn test_metrics_json_from_stdin() {
    let output = Command::cargo_bin("racer")
        .unwrap()
        .args(["metrics", "--json"])
        .write_stdin(LOG)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let samples: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let samples = samples.as_array().unwrap();
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[1]["name"], "ppo-surrogate-loss");
    assert_eq!(samples[1]["value"], -0.326_647_251_844_406_13);
    assert_eq!(samples[3]["line"], 3);
}

#[test]
fn test_metrics_missing_file_fails() {
    Command::cargo_bin("racer")
        .unwrap()
        .args(["metrics", "/nonexistent/training.log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read log file"));
}

#[test]
fn test_regions_lists_supported_regions() {
    Command::cargo_bin("racer")
        .unwrap()
        .arg("regions")
        .assert()
        .success()
        .stdout(predicate::str::contains("us-east-1"))
        .stdout(predicate::str::contains("us-west-2"))
        .stdout(predicate::str::contains("eu-west-1"));
}
