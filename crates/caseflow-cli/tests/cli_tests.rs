use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color against a test database
fn caseflow_cmd(temp_dir: &TempDir) -> Command {
    let db_path = temp_dir.path().join("cli_test.db");
    let mut cmd = Command::cargo_bin("caseflow").expect("Failed to find caseflow binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path);
    cmd
}

/// Creates CASE-000001 with steps `lease_details` and `vehicle`.
fn create_lease_case(temp_dir: &TempDir) {
    caseflow_cmd(temp_dir)
        .args([
            "case",
            "create",
            "new_lease",
            "--step",
            "lease_details:Lease Details",
            "--step",
            "vehicle:Vehicle",
        ])
        .assert()
        .success();
}

#[test]
fn test_cli_create_case() {
    let temp_dir = create_cli_test_environment();

    caseflow_cmd(&temp_dir)
        .args(["case", "create", "new_lease", "--step", "lease_details:Lease Details"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# CASE-000001 (new_lease)"))
        .stdout(predicate::str::contains("Lease Details `lease_details` (current)"));
}

#[test]
fn test_cli_create_case_requires_steps() {
    let temp_dir = create_cli_test_environment();

    caseflow_cmd(&temp_dir)
        .args(["case", "create", "new_lease"])
        .assert()
        .failure();
}

#[test]
fn test_cli_list_empty_cases() {
    let temp_dir = create_cli_test_environment();

    caseflow_cmd(&temp_dir)
        .args(["case", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cases found."));
}

#[test]
fn test_cli_default_command_lists_cases() {
    let temp_dir = create_cli_test_environment();
    create_lease_case(&temp_dir);

    caseflow_cmd(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("CASE-000001"))
        .stdout(predicate::str::contains("**Current step**: Lease Details"));
}

#[test]
fn test_cli_submit_advances_case() {
    let temp_dir = create_cli_test_environment();
    create_lease_case(&temp_dir);

    caseflow_cmd(&temp_dir)
        .args([
            "step",
            "submit",
            "CASE-000001",
            "lease_details",
            "--data",
            r#"{"lease_type":"DOV"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step saved and the case advanced."))
        .stdout(predicate::str::contains("- State: advanced"));

    caseflow_cmd(&temp_dir)
        .args(["case", "show", "CASE-000001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **lease_type**: DOV"))
        .stdout(predicate::str::contains("Vehicle `vehicle` (current)"));
}

#[test]
fn test_cli_submit_reads_data_file() {
    let temp_dir = create_cli_test_environment();
    create_lease_case(&temp_dir);
    let data_file = temp_dir.path().join("lease.json");
    fs::write(&data_file, r#"{"weeks": 52}"#).expect("Failed to write data file");
    let data_arg = format!("@{}", data_file.display());

    caseflow_cmd(&temp_dir)
        .args(["step", "submit", "CASE-000001", "lease_details", "--data", &data_arg])
        .assert()
        .success();

    caseflow_cmd(&temp_dir)
        .args(["step", "show", "CASE-000001", "lease_details"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **weeks**: `52`"));
}

#[test]
fn test_cli_submit_without_access_is_ignored() {
    let temp_dir = create_cli_test_environment();
    create_lease_case(&temp_dir);

    caseflow_cmd(&temp_dir)
        .args([
            "step",
            "submit",
            "CASE-000001",
            "lease_details",
            "--data",
            "{}",
            "--no-access",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing sent: no access to this step."));
}

#[test]
fn test_cli_advance_only_access_saves_without_moving() {
    let temp_dir = create_cli_test_environment();
    create_lease_case(&temp_dir);

    caseflow_cmd(&temp_dir)
        .args([
            "step",
            "submit",
            "CASE-000001",
            "lease_details",
            "--data",
            r#"{"lease_type":"DOV"}"#,
            "--access-scope",
            "advance-only",
            "--no-access",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("no access to advance this case"))
        .stdout(predicate::str::contains("- State: processed"));

    // With access restored the processed step advances without resubmitting
    caseflow_cmd(&temp_dir)
        .args(["step", "advance", "CASE-000001", "lease_details"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step saved and the case advanced."));
}

#[test]
fn test_cli_advance_requires_processed_step() {
    let temp_dir = create_cli_test_environment();
    create_lease_case(&temp_dir);

    caseflow_cmd(&temp_dir)
        .args(["step", "advance", "CASE-000001", "lease_details"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not been processed yet"));
}

#[test]
fn test_cli_submit_validation_failure() {
    let temp_dir = create_cli_test_environment();
    create_lease_case(&temp_dir);

    caseflow_cmd(&temp_dir)
        .args([
            "step",
            "submit",
            "CASE-000001",
            "lease_details",
            "--data",
            r#"{"lease_type":""}"#,
            "--require",
            "lease_type",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("- **lease_type**: is required"));
}

#[test]
fn test_cli_submit_to_closed_case_fails() {
    let temp_dir = create_cli_test_environment();
    create_lease_case(&temp_dir);

    caseflow_cmd(&temp_dir)
        .args(["case", "close", "CASE-000001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Closed case CASE-000001"));

    caseflow_cmd(&temp_dir)
        .args(["step", "submit", "CASE-000001", "vehicle", "--data", "{}"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Step was not saved"));

    caseflow_cmd(&temp_dir)
        .args(["case", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cases found."));

    caseflow_cmd(&temp_dir)
        .args(["case", "list", "--closed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CASE-000001"));
}

#[test]
fn test_cli_unknown_step() {
    let temp_dir = create_cli_test_environment();
    create_lease_case(&temp_dir);

    caseflow_cmd(&temp_dir)
        .args(["step", "show", "CASE-000001", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_cli_show_missing_case() {
    let temp_dir = create_cli_test_environment();

    caseflow_cmd(&temp_dir)
        .args(["case", "show", "CASE-000099"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CASE-000099"));
}

#[test]
fn test_cli_changes_command() {
    let temp_dir = create_cli_test_environment();
    let current = temp_dir.path().join("current.json");
    let baseline = temp_dir.path().join("baseline.json");
    fs::write(&current, r#"{"state":{"code":"NY","name":"New York"},"unit":""}"#)
        .expect("Failed to write snapshot");
    fs::write(&baseline, r#"{"state":"NY","unit":null}"#).expect("Failed to write snapshot");

    caseflow_cmd(&temp_dir)
        .arg("changes")
        .arg(&current)
        .arg(&baseline)
        .assert()
        .success()
        .stdout(predicate::str::contains("No manual changes."));

    fs::write(&current, r#"{"state":"NJ"}"#).expect("Failed to write snapshot");

    caseflow_cmd(&temp_dir)
        .arg("changes")
        .arg(&current)
        .arg(&baseline)
        .assert()
        .success()
        .stdout(predicate::str::contains("Manual changes detected."));
}
