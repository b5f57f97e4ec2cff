#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn medrec_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("medrec"));
    cmd.env("MEDREC_DATA_DIR", data_dir.as_os_str())
        .env_remove("MEDREC_PAGE_SIZE")
        .env_remove("MEDREC_EXPORT_DIR")
        .env_remove("MEDREC_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn login(data_dir: &Path, user: &str, password: &str) {
    medrec_cmd(data_dir)
        .args(["login", user, "--password", password])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome"));
}

fn add(data_dir: &Path, name: &str, uid: &str, extra: &[&str]) {
    medrec_cmd(data_dir)
        .args(["add", "--name", name, "--uid", uid])
        .args(extra)
        .assert()
        .success()
        .stdout(predicate::str::contains("Record added successfully"));
}

#[test]
fn test_commands_require_login() {
    let temp = TempDir::new().unwrap();
    medrec_cmd(temp.path())
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: You must be logged in"));
}

#[test]
fn test_bad_password_fails() {
    let temp = TempDir::new().unwrap();
    medrec_cmd(temp.path())
        .args(["login", "admin", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
    medrec_cmd(temp.path())
        .args(["whoami"])
        .assert()
        .failure();
}

#[test]
fn test_add_list_show_edit_workflow() {
    let temp = TempDir::new().unwrap();
    login(temp.path(), "doctor", "doctor123");

    medrec_cmd(temp.path())
        .args(["whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dr. Sarah Smith"));

    // Naked invocation lists.
    medrec_cmd(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No records yet"));

    add(
        temp.path(),
        "Ada Lovelace",
        "11111111111",
        &["--blood-group", "O+", "--height", "170", "--weight", "60"],
    );
    add(temp.path(), "Grace Hopper", "22222222222", &["--blood-group", "A-"]);

    medrec_cmd(temp.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Grace Hopper"))
        .stdout(predicate::str::contains("Ada Lovelace"))
        .stdout(predicate::str::contains("Page 1 of 1"));

    // Filtering keeps the canonical index of the remaining row.
    medrec_cmd(temp.path())
        .args(["list", "--filter", "bloodGroup=O+"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  2. Ada Lovelace"))
        .stdout(predicate::str::contains("Grace Hopper").not());

    medrec_cmd(temp.path())
        .args(["list", "--search", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records match the current filters"));

    medrec_cmd(temp.path())
        .args(["edit", "11111111111", "notes", "allergic to penicillin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Record updated successfully"));

    medrec_cmd(temp.path())
        .args(["show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allergic to penicillin"))
        .stdout(predicate::str::contains("updatedBy"))
        .stdout(predicate::str::contains("(normal)"));
}

#[test]
fn test_validation_and_duplicates_are_errors() {
    let temp = TempDir::new().unwrap();
    login(temp.path(), "admin", "admin123");

    medrec_cmd(temp.path())
        .args(["add", "--name", "Ada", "--uid", "123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UID must be exactly 11 digits"));

    add(temp.path(), "Ada", "11111111111", &[]);
    medrec_cmd(temp.path())
        .args(["add", "--name", "Other", "--uid", "11111111111"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    medrec_cmd(temp.path())
        .args(["edit", "1", "createdAt", "2020-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be edited"));
}

#[test]
fn test_delete_permissions_and_undo() {
    let temp = TempDir::new().unwrap();
    login(temp.path(), "nurse", "nurse123");
    add(temp.path(), "Ada", "11111111111", &[]);

    medrec_cmd(temp.path())
        .args(["delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "You do not have permission to delete records",
        ));

    login(temp.path(), "admin", "admin123");
    medrec_cmd(temp.path())
        .args(["delete", "11111111111"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Record deleted successfully"));

    medrec_cmd(temp.path())
        .args(["undo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deletion undone"));

    medrec_cmd(temp.path())
        .args(["undo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to undo"));

    medrec_cmd(temp.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada"));
}

#[test]
fn test_export_and_import_round_trip() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();

    login(source.path(), "admin", "admin123");
    add(source.path(), "Ada", "11111111111", &[]);
    add(source.path(), "Grace", "22222222222", &[]);

    let csv = files.path().join("records.csv");
    medrec_cmd(source.path())
        .args(["export", "--format", "csv", "-o"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Records exported as CSV"));
    let text = fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("id,name,uid,"));

    medrec_cmd(source.path())
        .args(["export", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"uid\": \"22222222222\""));

    login(target.path(), "doctor", "doctor123");
    medrec_cmd(target.path())
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 records successfully"));

    medrec_cmd(target.path())
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Skipped record with duplicate UID: 11111111111",
        ))
        .stdout(predicate::str::contains("No records were imported"));

    let txt = files.path().join("records.txt");
    fs::write(&txt, "hello").unwrap();
    medrec_cmd(target.path())
        .arg("import")
        .arg(&txt)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn test_export_default_path_uses_export_dir() {
    let temp = TempDir::new().unwrap();
    let exports = temp.path().join("exports");
    login(temp.path(), "admin", "admin123");
    add(temp.path(), "Ada", "11111111111", &[]);

    medrec_cmd(temp.path())
        .env("MEDREC_EXPORT_DIR", exports.as_os_str())
        .args(["export", "--format", "json"])
        .assert()
        .success();

    let written: Vec<_> = fs::read_dir(&exports)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("patient_records_"));
    assert!(written[0].ends_with(".json"));
}

#[test]
fn test_stats_and_json_output() {
    let temp = TempDir::new().unwrap();
    login(temp.path(), "admin", "admin123");
    add(temp.path(), "Ada", "11111111111", &["--blood-group", "B+"]);

    medrec_cmd(temp.path())
        .args(["stats", "--range", "month"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total records"))
        .stdout(predicate::str::contains("Week 4"));

    let output = medrec_cmd(temp.path())
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["action"], "list");
    assert_eq!(value["rows"][0]["index"], 1);
    assert_eq!(value["rows"][0]["record"]["bloodGroup"], "B+");
    assert_eq!(value["page"]["totalRecords"], 1);
}

#[test]
fn test_config_reads_toml_and_template() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("medrec.toml"), "page_size = 2\n").unwrap();

    medrec_cmd(temp.path())
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("page_size = 2"));

    medrec_cmd(temp.path())
        .args(["config", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export_dir"));

    login(temp.path(), "admin", "admin123");
    for (name, uid) in [("A", "11111111111"), ("B", "22222222222"), ("C", "33333333333")] {
        add(temp.path(), name, uid, &[]);
    }
    medrec_cmd(temp.path())
        .args(["list", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 2 of 2"));
}
