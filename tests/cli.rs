// CLI behavior of the wgsentry binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn version_flag_prints_and_exits_cleanly() {
    Command::cargo_bin("wgsentry")
        .expect("binary")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wgsentry v"));
}

#[test]
fn build_info_flag_prints_build_details() {
    Command::cargo_bin("wgsentry")
        .expect("binary")
        .arg("--build-info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile:"));
}

#[test]
fn missing_configuration_fails_fast_with_a_diagnostic() {
    Command::cargo_bin("wgsentry")
        .expect("binary")
        .env_remove("TELEGRAM_TOKEN")
        .env_remove("ADMIN_ID")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TELEGRAM_TOKEN"));
}
