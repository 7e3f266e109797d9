use repokit_cli::test_utils::BatchFixture;

use crate::common::TestProject;

/// Test validating a valid batch
#[test]
fn test_validate_valid_batch() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::basic()).unwrap();

    let output = project.run_repokit(&["validate", &batch]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("✓ Batch 1: 3 request(s), distro rhel7");
}

/// Test validating a batch with an unregistered kind
#[test]
fn test_validate_unknown_kind() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::unknown_kind()).unwrap();

    let output = project.run_repokit(&["validate", &batch]).unwrap();
    output
        .assert_failure()
        .assert_stdout_contains("✗ Batch 1: Unknown resource kind 'DebRepository'")
        .assert_stderr_contains("Validation failed");
}

/// Test validating a batch with two distro directives
#[test]
fn test_validate_duplicate_distro() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::duplicate_distro()).unwrap();

    let output = project.run_repokit(&["validate", &batch]).unwrap();
    output.assert_failure().assert_stdout_contains("duplicate 'distro' directive");
}

/// Test validating a batch with invalid syntax
#[test]
fn test_validate_invalid_syntax() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::invalid_syntax()).unwrap();

    let output = project.run_repokit(&["validate", &batch]).unwrap();
    output.assert_failure().assert_stdout_contains("✗");
}

/// Test validating a file that does not exist
#[test]
fn test_validate_missing_file() {
    let project = TestProject::new().unwrap();

    let output = project.run_repokit(&["validate", "nope.toml"]).unwrap();
    output.assert_failure().assert_stdout_contains("nope.toml");
}

/// JSON output reports every batch
#[test]
fn test_validate_json() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::indirect()).unwrap();

    let output = project
        .run_repokit(&[
            "validate",
            &batch,
            "--param",
            "distro=rhel8",
            "--param",
            "cdn=false",
            "--param",
            "yum_url=http://mirror",
            "--format",
            "json",
        ])
        .unwrap();
    output.assert_success();

    let results = output.json();
    assert_eq!(results["valid"], true);
    assert_eq!(results["batches"][0]["requests"], 2);
    assert_eq!(results["batches"][0]["distro"], "rhel8");
}

/// Missing parameters fail validation without building anything
#[test]
fn test_validate_missing_parameter() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::indirect()).unwrap();

    let output = project.run_repokit(&["validate", &batch, "--format", "json"]).unwrap();
    output.assert_failure();

    let results = output.json();
    assert_eq!(results["valid"], false);
    let error = results["batches"][0]["error"].as_str().unwrap();
    assert!(error.contains("No value bound for parameter 'cdn'"), "{error}");
}
