use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("ccc").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ccc"))
        .stdout(predicate::str::contains("compare-countries"));
}

#[test]
fn cli_rejects_unknown_join_policy() {
    let mut cmd = Command::cargo_bin("ccc").unwrap();
    cmd.args(["codes", "--join", "merge"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("merge"));
}

#[test]
fn cli_rejects_zero_timeout() {
    let mut cmd = Command::cargo_bin("ccc").unwrap();
    cmd.args(["currencies", "--timeout", "0"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn cli_reports_transport_failure() {
    // Nothing listens on the discard port; the request fails without retries.
    let mut cmd = Command::cargo_bin("ccc").unwrap();
    cmd.args([
        "population",
        "--country",
        "Czech Republic",
        "--base-url",
        "http://127.0.0.1:9",
        "--timeout",
        "2",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("transport error"));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn top_cities_online() {
    let mut cmd = Command::cargo_bin("ccc").unwrap();
    cmd.args(["top-cities", "--country", "Czech Republic"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No."));
}
