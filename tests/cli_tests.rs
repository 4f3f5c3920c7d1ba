//! CLI integration tests using the REAL mdm-cleanup binary

mod common;

use common::{GUID_A, GUID_B, MDM_ISSUER, TestMachine, mdm_cleanup_cmd};
use predicates::prelude::*;
use serde_yaml::Value;

#[test]
fn test_help_output() {
    mdm_cleanup_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("MDM"))
        .stdout(predicate::str::contains("discover"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("certs"))
        .stdout(predicate::str::contains("cleanup"));
}

#[test]
fn test_version_output() {
    mdm_cleanup_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mdm-cleanup"))
        .stdout(predicate::str::contains("Defaults:"))
        .stdout(predicate::str::contains("LocalMachine\\My"));
}

#[test]
fn test_completions_bash() {
    mdm_cleanup_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mdm-cleanup"));
}

#[test]
fn test_completions_unknown_shell_fails() {
    mdm_cleanup_cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shell"));
}

#[cfg(not(windows))]
#[test]
fn test_without_snapshot_needs_windows() {
    mdm_cleanup_cmd()
        .env_remove("MDM_CLEANUP_SNAPSHOT")
        .arg("discover")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No system backend"))
        .stderr(predicate::str::contains("--snapshot"));
}

#[test]
fn test_missing_snapshot_file() {
    mdm_cleanup_cmd()
        .args(["--snapshot", "/nonexistent/machine.yaml", "discover"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load machine snapshot"));
}

#[test]
fn test_discover_lists_guid_folders() {
    let machine = TestMachine::enrolled(&[GUID_A, GUID_B]);
    machine.update(|map| {
        let folders = map
            .get_mut("scheduler")
            .and_then(|s| s.get_mut("folders"))
            .and_then(Value::as_sequence_mut)
            .unwrap();
        folders.push(Value::from(format!("{}\\not-a-guid", common::TASK_ROOT)));
    });

    machine
        .cmd()
        .args(["discover", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(GUID_A))
        .stdout(predicate::str::contains(GUID_B))
        .stdout(predicate::str::contains("not-a-guid").not());
}

#[test]
fn test_discover_json() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    let output = machine.cmd().args(["discover", "--json"]).output().unwrap();

    assert!(output.status.success());
    let ids: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ids, vec![GUID_A.to_string()]);
}

#[test]
fn test_inspect_is_read_only() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    let before = std::fs::read_to_string(&machine.snapshot).unwrap();

    machine
        .cmd()
        .args(["inspect", "--identifier", GUID_A])
        .assert()
        .success()
        .stdout(predicate::str::contains("DeviceEnroller"))
        .stdout(predicate::str::contains("Schedule #1 created by enrollment client"));

    assert_eq!(std::fs::read_to_string(&machine.snapshot).unwrap(), before);
}

#[test]
fn test_inspect_json() {
    let machine = TestMachine::enrolled(&[GUID_A, GUID_B]);
    let output = machine.cmd().args(["inspect", "--json"]).output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["registry"][0]["properties"].as_array().unwrap().len(), 4);
    assert_eq!(entries[0]["tasks"]["tasks"].as_array().unwrap().len(), 3);
}

#[test]
fn test_inspect_rejects_bad_identifier() {
    TestMachine::new()
        .cmd()
        .args(["inspect", "--identifier", "not-a-guid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid enrollment identifier"));
}

#[test]
fn test_certs_finds_mdm_certificate() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    machine
        .cmd()
        .arg("certs")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("CN={GUID_A}")))
        .stdout(predicate::str::contains("CN=web").not());
}

#[test]
fn test_certs_issuer_override() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    machine
        .cmd()
        .args(["certs", "--issuer", "CN=Some Other CA", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CN=web"));
}

#[test]
fn test_certs_json_lists_found_certificates() {
    let machine = TestMachine::enrolled(&[GUID_A, GUID_B]);
    let output = machine.cmd().args(["certs", "--json"]).output().unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["result"], "found");
    let certs = json["certificates"].as_array().unwrap();
    assert_eq!(certs.len(), 2);
    assert!(certs.iter().all(|c| c["issuer"] == MDM_ISSUER));
    assert_eq!(certs[0]["subject"], format!("CN={GUID_A}"));
}

#[test]
fn test_certs_json_without_match_times_out() {
    let machine = TestMachine::new();
    let output = machine.cmd().args(["certs", "--json"]).output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["result"], "timed_out");
    assert_eq!(json["polls"], 1);
}

#[test]
fn test_certs_unknown_store_fails() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    machine
        .cmd()
        .args(["certs", "--store", "Cert:\\LocalMachine\\Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot open certificate store"));
}

#[test]
fn test_cleanup_without_tty_needs_yes() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    let before = std::fs::read_to_string(&machine.snapshot).unwrap();

    machine
        .cmd()
        .arg("cleanup")
        .write_stdin("y\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    assert_eq!(std::fs::read_to_string(&machine.snapshot).unwrap(), before);
}

#[test]
fn test_cleanup_removes_everything() {
    let machine = TestMachine::enrolled(&[GUID_A, GUID_B]);

    machine
        .cmd()
        .args(["cleanup", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 succeeded"));

    assert_eq!(machine.task_count(), 0);
    assert_eq!(machine.registry_key_count(), 0);
    assert_eq!(machine.certificate_issuers(), vec!["CN=Some Other CA".to_string()]);
}

#[test]
fn test_cleanup_twice_is_harmless() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    machine.cmd().args(["cleanup", "-y"]).assert().success();
    let after_first = std::fs::read_to_string(&machine.snapshot).unwrap();

    machine
        .cmd()
        .args(["cleanup", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No enrollments found"));

    assert_eq!(std::fs::read_to_string(&machine.snapshot).unwrap(), after_first);
}

#[test]
fn test_cleanup_json_summary() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    let output = machine
        .cmd()
        .args(["cleanup", "-y", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["counts"]["succeeded"], 1);
    assert_eq!(json["counts"]["failed"], 0);
    assert_eq!(json["records"][0]["identifier"], GUID_A);
    assert_eq!(json["records"][0]["status"], "success");
}

#[test]
fn test_cleanup_partial_failure_exits_zero_and_keeps_stuck_task() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    machine.update(|map| {
        let mut failures = serde_yaml::Mapping::new();
        failures.insert(
            Value::from("tasks"),
            Value::Sequence(vec![Value::from(format!(
                "{}\\{GUID_A}\\Schedule #2 created by enrollment client",
                common::TASK_ROOT
            ))]),
        );
        map.insert(Value::from("failures"), Value::Mapping(failures));
    });

    machine
        .cmd()
        .args(["cleanup", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PARTIAL"));

    assert_eq!(machine.task_count(), 1);
    assert_eq!(machine.registry_key_count(), 0);
}

#[test]
fn test_cleanup_scheduler_unavailable_fails_with_summary() {
    let machine = TestMachine::enrolled(&[GUID_A]);
    machine.update(|map| {
        let scheduler = map
            .get_mut("scheduler")
            .and_then(Value::as_mapping_mut)
            .unwrap();
        scheduler.insert(Value::from("unavailable"), Value::from(true));
    });

    machine
        .cmd()
        .args(["cleanup", "-y"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Summary"))
        .stderr(predicate::str::contains("Cleanup incomplete"));

    assert_eq!(machine.task_count(), 3);
    assert_eq!(machine.certificate_issuers().len(), 2);
}

#[test]
fn test_cleanup_registry_failure_marks_identifiers_failed() {
    let machine = TestMachine::enrolled(&[GUID_A, GUID_B]);
    machine.update(|map| {
        let registry = map
            .get_mut("registry")
            .and_then(Value::as_mapping_mut)
            .unwrap();
        registry.insert(Value::from("inaccessible"), Value::from(true));
    });

    let output = machine
        .cmd()
        .args(["cleanup", "-y", "--json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["counts"]["failed"], 2);
    assert_eq!(json["records"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cleanup_store_override_from_env() {
    let machine = TestMachine::enrolled(&[GUID_A]);

    machine
        .cmd()
        .env("MDM_CLEANUP_ISSUER", "CN=Some Other CA")
        .args(["cleanup", "-y"])
        .assert()
        .success();

    // only the overridden issuer's certificate is gone
    assert_eq!(machine.certificate_issuers(), vec![MDM_ISSUER.to_string()]);
}
