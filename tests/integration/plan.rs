use predicates::prelude::*;
use repokit_cli::test_utils::BatchFixture;

use crate::common::TestProject;

/// Plan a batch with its own distro directive
#[test]
fn test_plan_basic_batch() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::basic()).unwrap();

    let output = project.run_repokit(&["plan", &batch]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Batch 1 (distro rhel7)")
        .assert_stdout_contains("1. SatelliteToolsRepository [yum, red_hat]")
        .assert_stdout_contains("http://example.com/yum_6");
}

/// JSON output keeps batch order and resolved options
#[test]
fn test_plan_json_with_params() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::indirect()).unwrap();

    let output = project
        .run_repokit(&[
            "plan",
            &batch,
            "--param",
            "distro=rhel8",
            "--param",
            "cdn=true",
            "--param",
            "yum_url=http://mirror/yum",
            "--format",
            "json",
        ])
        .unwrap();
    output.assert_success();

    let plans = output.json();
    assert_eq!(plans[0]["distro"], "rhel8");
    assert_eq!(plans[0]["state"], "built");
    let repos = plans[0]["repositories"].as_array().unwrap();
    assert_eq!(repos[0]["kind"], "RHELAnsibleEngineRepository");
    assert_eq!(repos[0]["options"]["cdn"], true);
    assert_eq!(repos[1]["options"]["url"], "http://mirror/yum");
}

/// A parameter bound at function scope is invisible to a module-scoped plan
#[test]
fn test_plan_module_scope_ignores_function_params() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::indirect()).unwrap();

    let output = project
        .run_repokit(&["plan", &batch, "--scope", "module", "--param", "cdn=true"])
        .unwrap();
    output
        .assert_failure()
        .assert_stderr_contains("No value bound for parameter 'cdn' visible from module scope");

    let output = project
        .run_repokit(&[
            "plan",
            &batch,
            "--scope",
            "module",
            "--module-param",
            "cdn=true",
            "--session-param",
            "distro=rhel9",
            "--module-param",
            "yum_url=http://mirror/yum",
        ])
        .unwrap();
    output.assert_success().assert_stdout_contains("distro rhel9");
}

/// Dry-run setup prints the backend calls in order
#[test]
fn test_plan_with_setup() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::basic()).unwrap();

    let output = project
        .run_repokit(&["plan", &batch, "--setup", "--org-id", "7", "--lce-id", "9"])
        .unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Setup organization 7 / lifecycle environment 9");

    let ops: Vec<&str> = output
        .stdout
        .lines()
        .filter_map(|l| l.trim().strip_prefix("→ "))
        .collect();
    assert_eq!(
        ops,
        vec![
            "create_product",
            "enable_redhat_repository",
            "sync_repository",
            "create_repository",
            "sync_repository",
            "create_repository",
            "sync_repository",
            "create_content_view",
            "publish_content_view",
            "promote_content_view_version",
            "create_activation_key",
        ]
    );
}

/// Hosts are registered with the activation key after binding
#[test]
fn test_plan_with_setup_and_host() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::basic()).unwrap();

    let output = project
        .run_repokit(&["plan", &batch, "--setup", "--host", "client.example.com"])
        .unwrap();
    output.assert_success().assert_stdout_contains("host client.example.com registered");

    let ops: Vec<&str> = output
        .stdout
        .lines()
        .filter_map(|l| l.trim().strip_prefix("→ "))
        .collect();
    assert_eq!(
        ops[ops.len() - 5..],
        [
            "create_activation_key",
            "register_host",
            "enable_host_repository",
            "enable_host_repository",
            "enable_host_repository",
        ]
    );
}

/// A numeric distro parameter is a type error, not a missing distro
#[test]
fn test_plan_numeric_distro_param() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::without_distro()).unwrap();

    let output = project.run_repokit(&["plan", &batch, "--param", "distro=9"]).unwrap();
    output
        .assert_failure()
        .assert_stderr_contains("parameter 'distro' visible from function scope must be a string, got a number");
}

/// A missing distro at function scope fails with a suggestion
#[test]
fn test_plan_missing_distro() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::without_distro()).unwrap();

    let output = project.run_repokit(&["plan", &batch]).unwrap();
    output
        .assert_failure()
        .assert_stderr_contains("No distro available")
        .assert_stderr_contains("suggestion");
}

/// Unknown kinds are reported with close matches
#[test]
fn test_plan_unknown_kind() {
    let project = TestProject::new().unwrap();
    let batch = project
        .write_file("typo.toml", "distro = \"rhel8\"\nYumRepositry = { url = \"http://a\" }\n")
        .unwrap();

    let output = project.run_repokit(&["plan", batch.to_str().unwrap()]).unwrap();
    output
        .assert_failure()
        .assert_stderr_contains("Unknown resource kind 'YumRepositry'")
        .assert_stderr_contains("Did you mean: YumRepository");
}

/// A parametrization set yields one collection per batch
#[test]
fn test_plan_yaml_parametrization_set() {
    let project = TestProject::new().unwrap();
    project
        .write_file(
            "set.yaml",
            r#"
- distro: rhel7
  YumRepository:
    - url: http://a
    - url: http://b
- distro: rhel8
  SatelliteToolsRepository: {}
"#,
        )
        .unwrap();

    let output = project.run_repokit(&["plan", "set.yaml", "--format", "json"]).unwrap();
    output.assert_success();
    let plans = output.json();
    assert_eq!(plans.as_array().unwrap().len(), 2);
    assert_eq!(plans[0]["repositories"].as_array().unwrap().len(), 2);
    assert_eq!(plans[1]["distro"], "rhel8");
}

#[test]
fn test_plan_help() {
    let mut cmd = assert_cmd::Command::cargo_bin("repokit").unwrap();
    cmd.arg("plan")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--param"))
        .stdout(predicate::str::contains("--module-param"))
        .stdout(predicate::str::contains("--scope"))
        .stdout(predicate::str::contains("--setup"))
        .stdout(predicate::str::contains("--host"));
}

#[test]
fn test_org_id_without_setup_is_rejected() {
    let project = TestProject::new().unwrap();
    let batch = project.write_batch(&BatchFixture::basic()).unwrap();

    let mut cmd = assert_cmd::Command::cargo_bin("repokit").unwrap();
    cmd.current_dir(project.path())
        .args(["plan", &batch, "--org-id", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--setup"));
}
