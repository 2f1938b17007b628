use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfvm").unwrap();
    cmd.env("BFVM_CONFIG", "/nonexistent/bfvm.toml")
        .env_remove("BFVM_LOG")
        .env_remove("BFVM_TICK_MS")
        .env_remove("BFVM_TIMEOUT_MS")
        .env_remove("BFVM_MAX_STEPS");
    cmd
}

fn read_to_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn eight_times_eight_prints_at_sign() {
    cargo_bin()
        .args(["run", "-i", "++++++++[>++++++++<-]>."])
        .assert()
        .success()
        .stdout("@")
        .stderr(predicate::str::is_empty());
}

#[test]
fn program_from_file() {
    let tf = read_to_tempfile("++++++++[>++++++++<-]>.\n");
    cargo_bin()
        .arg("run")
        .arg("--file")
        .arg(tf.path())
        .assert()
        .success()
        .stdout("@");
}

#[test]
fn comments_are_skipped() {
    cargo_bin()
        .args(["run", "-i", "print this: ++++++++[>++++++++<-]>. done"])
        .assert()
        .success()
        .stdout("@");
}

#[test]
fn empty_file_runs_zero_steps() {
    let tf = read_to_tempfile("");
    cargo_bin()
        .arg("run")
        .arg("-f")
        .arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_program_is_a_usage_error() {
    cargo_bin()
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no program supplied").and(predicate::str::contains("Usage:")));
}

#[test]
fn literal_and_file_together_is_a_usage_error() {
    let tf = read_to_tempfile("+");
    cargo_bin()
        .args(["run", "-i", "+"])
        .arg("-f")
        .arg(tf.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("together"));
}

#[test]
fn unreadable_file_fails() {
    cargo_bin()
        .args(["run", "-f", "/nonexistent/program.bf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read program file"));
}

#[test]
fn unbalanced_bracket_reports_position() {
    cargo_bin()
        .args(["run", "-i", "+-["])
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("unbalanced bracket '['")
                .and(predicate::str::contains("at instruction 2"))
                .and(predicate::str::contains("  ^")),
        );
}

#[test]
fn data_pointer_underflow_reports_pointer() {
    cargo_bin()
        .args(["run", "-i", "<"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("data pointer out of range (ptr=-1, op=<)"));
}

#[test]
fn tape_len_flag_bounds_the_tape() {
    cargo_bin()
        .args(["run", "--tape-len", "2", "-i", ">>"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ptr=2").and(predicate::str::contains("at instruction 1")));
}

#[test]
fn output_before_an_error_is_kept() {
    let program = format!("{}.<", "+".repeat(65));
    cargo_bin()
        .args(["run", "-i", &program])
        .assert()
        .code(1)
        .stdout("A");
}

#[test]
fn runs_are_deterministic() {
    let program = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.";
    let first = cargo_bin().args(["run", "-i", program]).assert().success();
    let second = cargo_bin().args(["run", "-i", program]).assert().success();
    assert_eq!(first.get_output().stdout, b"Hello ");
    assert_eq!(first.get_output().stdout, second.get_output().stdout);
}

#[test]
fn debug_logs_go_to_stderr() {
    cargo_bin()
        .env("BFVM_LOG", "debug")
        .args(["run", "-i", "+."])
        .assert()
        .success()
        .stdout("\u{1}")
        .stderr(predicate::str::contains("run finished"));
}

#[test]
fn no_subcommand_prints_usage() {
    cargo_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn help_flag_exits_zero() {
    cargo_bin()
        .args(["run", "--help"])
        .assert()
        .code(0)
        .stderr(predicate::str::contains("--instructions"));
}
