#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub const SLOT_FILE: &str = "cute_tasks_v1.json";

/// Scratch store directory plus an isolated (absent) config file.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn slot_path(&self) -> PathBuf {
        self.dir.path().join(SLOT_FILE)
    }

    pub fn write_tasks(&self, tasks: serde_json::Value) {
        std::fs::write(self.slot_path(), serde_json::to_string_pretty(&tasks).unwrap())
            .expect("write slot file");
    }

    pub fn stored_tasks(&self) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(self.slot_path()).unwrap()).unwrap()
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_cute_tasks"));
        command
            .current_dir(self.dir.path())
            .env("CUTE_TASKS_STORE_DIR", self.dir.path())
            .env("CUTE_TASKS_CONFIG_PATH", self.dir.path().join("config.json"))
            .env("CUTE_TASKS_DISABLE_NOTIFICATIONS", "1")
            .env_remove("RUST_LOG");
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .stdin(Stdio::null())
            .output()
            .expect("failed to run cute_tasks")
    }

    pub fn run_with_input(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command()
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn cute_tasks");

        child
            .stdin
            .as_mut()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");

        child.wait_with_output().expect("failed to read output")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn sample_tasks() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "text": "water plants",
            "completed": true,
            "createdAt": "2025-12-20T00:00:00.000Z"
        },
        {
            "id": 2,
            "text": "buy milk",
            "completed": false,
            "createdAt": "2025-12-20T01:00:00.000Z"
        },
        {
            "id": 3,
            "text": "call mom",
            "completed": true,
            "createdAt": "2025-12-20T02:00:00.000Z"
        }
    ])
}
