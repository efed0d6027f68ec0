//! Shared helpers for integration tests

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// An isolated environment: config and log file live in a temp dir.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Sandbox with a config file holding `content`.
    pub fn with_config(content: &str) -> Self {
        let sandbox = Self::new();
        std::fs::write(sandbox.config_path(), content).expect("Failed to write config");
        sandbox
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `ytloop` with this sandbox's environment, for assert_cmd checks.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("ytloop").expect("ytloop binary");
        cmd.env("YTLOOP_CONFIG", self.config_path())
            .env("XDG_STATE_HOME", self.dir.path().join("state"))
            .env("NO_COLOR", "1")
            .env_remove("YTLOOP_LOG");
        cmd
    }

    /// Run ytloop and capture (stdout, stderr, exit code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_ytloop"))
            .args(args)
            .env("YTLOOP_CONFIG", self.config_path())
            .env("XDG_STATE_HOME", self.dir.path().join("state"))
            .env("NO_COLOR", "1")
            .env_remove("YTLOOP_LOG")
            .output()
            .expect("Failed to execute ytloop");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code().unwrap_or(-1);

        (stdout, stderr, exit_code)
    }
}
