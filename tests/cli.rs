use assert_cmd::Command;
use predicates::prelude::*;

/// Piped stdin means no keyboard; the dashboard refuses to start.
#[test]
fn refuses_to_run_without_a_terminal() {
    let mut cmd = Command::cargo_bin("vqe-watch").unwrap();
    cmd.arg("stream.json")
        .write_stdin("")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("please run interactively."));
}

#[test]
fn help_describes_the_path_argument() {
    let mut cmd = Command::cargo_bin("vqe-watch").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[PATH]"))
        .stdout(predicate::str::contains("VQE_QUANTUM_PROVIDER"));
}

#[test]
fn extra_arguments_are_rejected() {
    let mut cmd = Command::cargo_bin("vqe-watch").unwrap();
    cmd.args(["a.json", "b.json"]).assert().failure().code(2);
}
