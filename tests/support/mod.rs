#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Scratch data directory plus a command builder preset for one user.
pub struct TestBot {
    dir: TempDir,
}

impl TestBot {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_file(&self) -> PathBuf {
        self.dir.path().join("todos.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_store(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.store_file()).expect("read store");
        serde_json::from_str(&raw).expect("parse store")
    }

    pub fn read_guild(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.dir.path().join("guild.json")).expect("read guild");
        serde_json::from_str(&raw).expect("parse guild")
    }

    /// `taskbot` bound to this data dir, invoked as `user`/`name`.
    pub fn cmd(&self, user: u64, name: &str) -> Command {
        let mut cmd = Command::cargo_bin("taskbot").expect("binary");
        cmd.current_dir(self.dir.path())
            .env("DISCORD_TOKEN", "test-token")
            .env_remove("RUST_LOG")
            .env_remove("TASKBOT_DATA_DIR")
            .arg("--data-dir")
            .arg(self.dir.path())
            .arg("--user")
            .arg(user.to_string())
            .arg("--name")
            .arg(name);
        cmd
    }
}
