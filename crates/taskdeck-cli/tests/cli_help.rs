use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("taskdeck")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("forgot-password"))
        .stdout(predicate::str::contains("verify-otp"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("tasks"))
        .stdout(predicate::str::contains("--api-url"));
}

#[test]
fn test_tasks_help_shows_subcommands() {
    cargo_bin_cmd!("taskdeck")
        .args(["tasks", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("taskdeck")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}

#[test]
fn test_login_requires_email_and_password_flags() {
    cargo_bin_cmd!("taskdeck")
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}
