//! Integration tests for `todo config` via CLI.
//!
//! Config lives in KDL files: `.todo/config.kdl` in the project and
//! `$TODO_CONFIG_DIR/config.kdl` for the whole system.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_config_list_defaults() {
    let env = TestEnv::new();

    env.todo()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("editor = <unset> (unset)"))
        .stdout(predicate::str::contains("output-format = human (default)"))
        .stdout(predicate::str::contains("branch-prefix = feature/ (default)"));
}

#[test]
fn test_config_set_project_then_get() {
    let env = TestEnv::new();

    env.todo()
        .args(["config", "set", "branch-prefix", "task/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set branch-prefix = task/"));

    assert!(env.path().join(".todo").join("config.kdl").exists());

    env.todo()
        .args(["config", "get", "branch-prefix"])
        .assert()
        .success()
        .stdout(predicate::str::diff("task/\n"));

    env.todo()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("branch-prefix = task/ (project)"));
}

#[test]
fn test_config_set_system() {
    let env = TestEnv::new();

    env.todo()
        .args(["config", "set", "--system", "editor", "nano"])
        .assert()
        .success();

    assert!(env.config_path().join("config.kdl").exists());

    env.todo()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("editor = nano (system)"));
}

#[test]
fn test_env_overrides_config_file() {
    let env = TestEnv::new();

    env.todo()
        .args(["config", "set", "editor", "nano"])
        .assert()
        .success();

    env.todo()
        .args(["config", "get", "editor"])
        .env("TODO_EDITOR", "vim")
        .assert()
        .success()
        .stdout(predicate::str::diff("vim\n"));
}

#[test]
fn test_config_output_format_json() {
    let env = TestEnv::new();

    env.todo()
        .args(["config", "set", "output-format", "json"])
        .assert()
        .success();

    env.todo()
        .args(["config", "get", "output-format"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\":\"json\""));
}

#[test]
fn test_config_rejects_unknown_key() {
    let env = TestEnv::new();

    env.todo()
        .args(["config", "get", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key 'colour'"));

    env.todo()
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure();
}

#[test]
fn test_config_rejects_bad_output_format() {
    let env = TestEnv::new();

    env.todo()
        .args(["config", "set", "output-format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let env = TestEnv::new();
    std::fs::write(env.config_path().join("config.kdl"), "editor \"unterminated\n").unwrap();

    env.todo()
        .args(["config", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_config_set_repairs_malformed_project_file() {
    let env = TestEnv::new();
    std::fs::create_dir_all(env.path().join(".todo")).unwrap();
    std::fs::write(
        env.path().join(".todo").join("config.kdl"),
        "editor \"unterminated\n",
    )
    .unwrap();

    env.todo()
        .args(["config", "get", "editor"])
        .assert()
        .failure();

    env.todo()
        .args(["config", "set", "editor", "nano"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set editor = nano"))
        .stdout(predicate::str::contains("could not be parsed"));

    env.todo()
        .args(["config", "get", "editor"])
        .assert()
        .success()
        .stdout(predicate::str::diff("nano\n"));
}
