mod common;

use common::TestEnv;
use predicates::str::contains;

fn run_help(env: &TestEnv, args: &[&str]) {
    env.at("2026-10-19")
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let env = TestEnv::new();

    // top-level
    run_help(&env, &[]);

    // built-in commands
    run_help(&env, &["list"]);
    run_help(&env, &["lifecycle"]);
    run_help(&env, &["login"]);
    run_help(&env, &["cleanup"]);

    // command tree
    run_help(&env, &["meta"]);
    run_help(&env, &["meta", "show"]);
    run_help(&env, &["meta", "path"]);
    run_help(&env, &["meta", "export"]);
    run_help(&env, &["session"]);
    run_help(&env, &["session", "status"]);
    run_help(&env, &["session", "debug"]);
}

#[test]
fn tree_help_renders_handler_usage() {
    let env = TestEnv::new();
    env.at("2026-10-19")
        .args(["meta", "export", "-h"])
        .assert()
        .success()
        .stdout(contains("Usage: sunset meta export"))
        .stdout(contains("--output"));
}
