use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

#[test]
fn version_flag() {
    cargo_bin_cmd!("sunset")
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("sunset"));
}

#[test]
fn lifecycle_text_output() {
    let home = TempDir::new().expect("temp home");
    cargo_bin_cmd!("sunset")
        .env("HOME", home.path())
        .args(["--today", "2027-03-01", "lifecycle", "meta", "export"])
        .assert()
        .success()
        .stdout(contains("SCHEDULED_SOON"))
        .stdout(contains("days_left=30"));
}

#[test]
fn lifecycle_unknown_command_fails() {
    let home = TempDir::new().expect("temp home");
    cargo_bin_cmd!("sunset")
        .env("HOME", home.path())
        .args(["lifecycle", "meta", "nope"])
        .assert()
        .failure()
        .stderr(contains("unknown command: meta nope"));
}
