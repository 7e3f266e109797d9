use repokit_cli::test_utils::BatchFixture;

use crate::common::TestProject;

const PROJECT_CONFIG: &str = r#"
default_distro = "rhel9"

[params]
cdn = true
yum_url = "http://mirror/yum"

[kinds.DebRepository]
content_type = "deb"
"#;

/// ./repokit.toml is discovered and its params bound at session scope
#[test]
fn test_project_config_is_discovered() {
    let project = TestProject::new().unwrap();
    project.write_file("repokit.toml", PROJECT_CONFIG).unwrap();
    let batch = project.write_batch(&BatchFixture::indirect()).unwrap();

    let output = project.run_repokit(&["plan", &batch, "--scope", "module"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("distro rhel9")
        .assert_stdout_contains("http://mirror/yum");
}

/// Kinds declared in the configuration are registered
#[test]
fn test_config_kinds_are_registered() {
    let project = TestProject::new().unwrap();
    project.write_file("repokit.toml", PROJECT_CONFIG).unwrap();
    let batch = project.write_batch(&BatchFixture::unknown_kind()).unwrap();

    project.run_repokit(&["validate", &batch]).unwrap().assert_success();
    project
        .run_repokit(&["kinds"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("DebRepository");
}

/// --config wins over ./repokit.toml
#[test]
fn test_explicit_config_flag() {
    let project = TestProject::new().unwrap();
    project.write_file("repokit.toml", PROJECT_CONFIG).unwrap();
    project.write_file("ci/repokit.toml", "default_distro = \"rhel6\"\n").unwrap();
    let batch = project.write_batch(&BatchFixture::without_distro()).unwrap();

    let output = project.run_repokit(&["--config", "ci/repokit.toml", "plan", &batch]).unwrap();
    output.assert_success().assert_stdout_contains("distro rhel6");
}

/// A named configuration file must exist
#[test]
fn test_missing_explicit_config() {
    let project = TestProject::new().unwrap();

    let output = project.run_repokit(&["--config", "missing.toml", "kinds"]).unwrap();
    output.assert_failure().assert_stderr_contains("missing.toml does not exist");
}

/// Broken configuration files are reported
#[test]
fn test_invalid_config() {
    let project = TestProject::new().unwrap();
    project.write_file("repokit.toml", "[kinds.Bad\n").unwrap();

    let output = project.run_repokit(&["kinds"]).unwrap();
    output.assert_failure().assert_stderr_contains("error");
}
