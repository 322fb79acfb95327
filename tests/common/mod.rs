#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");
        Self {
            _tmp: tmp,
            home,
            work,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("sunset");
        cmd.env("HOME", &self.home)
            .env_remove("SUNSET_TODAY")
            .env_remove("NO_COLOR");
        cmd
    }

    /// Command with the clock pinned.
    pub fn at(&self, today: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--today").arg(today);
        cmd
    }

    pub fn run_json(&self, today: &str, args: &[&str]) -> Value {
        let out = self
            .at(today)
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn write_response(&self, response: &Value) -> PathBuf {
        let path = self.work.join("login_response.json");
        fs::write(
            &path,
            serde_json::to_string_pretty(response).expect("serialize response"),
        )
        .expect("write login response");
        path
    }

    /// Logs in with a response carrying the given metadata entries.
    pub fn login_with(&self, meta: Vec<Value>) {
        let path = self.write_response(&serde_json::json!({
            "version": "4.1.0",
            "meta": meta,
            "warnings": []
        }));
        self.cmd()
            .arg("login")
            .arg("--meta")
            .arg(&path)
            .assert()
            .success();
    }

    pub fn cache_path(&self) -> PathBuf {
        self.home.join(".config/sunset/commands_meta.json")
    }

    pub fn write_config(&self, toml: &str) {
        let dir = self.home.join(".config/sunset");
        fs::create_dir_all(&dir).expect("create config dir");
        fs::write(dir.join("config.toml"), toml).expect("write config");
    }
}

pub fn entry(command: &str, subcommand: &str, deprecation: Value) -> Value {
    serde_json::json!({
        "command": command,
        "subcommand": subcommand,
        "deprecation": deprecation
    })
}
