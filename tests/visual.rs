// The state dump writes cursor movement sequences; these tests only look for
// the rendered rows.
use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfvm").unwrap();
    cmd.env("BFVM_CONFIG", "/nonexistent/bfvm.toml")
        .env_remove("BFVM_LOG")
        .env_remove("BFVM_TICK_MS");
    cmd
}

#[test]
fn visual_flag_dumps_state() {
    cargo_bin()
        .args(["run", "--visual", "-i", "+>++<."])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("tape@0  | 01 02 00")
                .and(predicate::str::contains("program | "))
                .and(predicate::str::ends_with("\u{1}")),
        );
}

#[test]
fn decimal_cells() {
    cargo_bin()
        .args(["run", "--visual", "--cells", "dec", "-i", "+>++"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tape@0  |   1   2   0"));
}

#[test]
fn tick_implies_visual() {
    cargo_bin()
        .args(["run", "--tick", "1", "-i", "+."])
        .assert()
        .success()
        .stdout(predicate::str::contains("output  | \\x01"));
}

#[test]
fn no_dump_without_visual() {
    cargo_bin()
        .args(["run", "-i", "+."])
        .assert()
        .success()
        .stdout(predicate::str::contains("tape@").not());
}
