use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfvm").unwrap();
    cmd.env("BFVM_CONFIG", "/nonexistent/bfvm.toml")
        .env_remove("BFVM_LOG")
        .env_remove("BFVM_TIMEOUT_MS")
        .env_remove("BFVM_MAX_STEPS");
    cmd
}

fn infinite_bf() -> &'static str {
    "+[]" // increments to 1, then [] loops forever
}

#[test]
fn step_limit_flag_aborts_infinite_loop() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .args(["run", "--max-steps", "50", "-i", infinite_bf()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (50)"))
        .stdout(predicate::str::contains("Execution aborted").not());
}

#[test]
fn step_limit_from_env() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .env("BFVM_MAX_STEPS", "20")
        .args(["run", "-i", infinite_bf()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (20)"));
}

#[test]
fn flag_overrides_env() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .env("BFVM_MAX_STEPS", "20")
        .args(["run", "--max-steps", "30", "-i", infinite_bf()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (30)"));
}

#[test]
fn step_limit_from_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bfvm.toml");
    std::fs::write(&path, "[run]\nmax_steps = 7\n").unwrap();
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .env("BFVM_CONFIG", &path)
        .args(["run", "-i", infinite_bf()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (7)"));
}

#[test]
fn timeout_flag_aborts_infinite_loop() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .args(["run", "--timeout", "100", "-i", infinite_bf()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout exceeded (100 ms)"));
}

#[test]
fn finished_program_is_not_aborted_by_limits() {
    cargo_bin()
        .args(["run", "--max-steps", "3", "-i", "+++"])
        .assert()
        .success();
}

#[test]
fn broken_settings_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bfvm.toml");
    std::fs::write(&path, "[run\n").unwrap();
    cargo_bin()
        .env("BFVM_CONFIG", &path)
        .args(["run", "-i", "++++++++[>++++++++<-]>."])
        .assert()
        .success()
        .stdout("@")
        .stderr(predicate::str::contains("using default settings"));
}
