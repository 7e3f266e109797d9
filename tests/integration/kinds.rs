use crate::common::TestProject;

#[test]
fn test_kinds_lists_builtins() {
    let project = TestProject::new().unwrap();

    let output = project.run_repokit(&["kinds"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("YumRepository")
        .assert_stdout_contains("reposet:rhae");
}

#[test]
fn test_kinds_json() {
    let project = TestProject::new().unwrap();

    let output = project.run_repokit(&["kinds", "--format", "json"]).unwrap();
    output.assert_success();

    let kinds = output.json();
    let names: Vec<&str> =
        kinds.as_array().unwrap().iter().map(|k| k["kind"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "AnsibleRepository",
            "DockerRepository",
            "FileRepository",
            "RHELAnsibleEngineRepository",
            "RHELRepository",
            "SatelliteCapsuleRepository",
            "SatelliteToolsRepository",
            "YumRepository",
        ]
    );
}
