//! Shared test utilities for lastpass-collector integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading and
//!   host `LASTPASS_*` leakage.
//! - Give every test its own config file and checkpoint directory.
//!
//! Invariants:
//! - Commands never read the user's real config or checkpoints.

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CUSTOMER_ID: &str = "8771312";
#[allow(dead_code)]
pub const PROVISIONING_HASH: &str = "abc123def456";

/// Temporary home for one test's config file and checkpoints.
pub struct Sandbox {
    dir: TempDir,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn checkpoint_dir(&self) -> PathBuf {
        self.dir.path().join("checkpoints")
    }

    pub fn checkpoint_file(&self, input: &str) -> PathBuf {
        self.checkpoint_dir().join(format!("{input}.json"))
    }

    pub fn write_checkpoint(&self, input: &str, content: &str) {
        std::fs::create_dir_all(self.checkpoint_dir()).unwrap();
        std::fs::write(self.checkpoint_file(input), content).unwrap();
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).unwrap();
    }

    /// Hermetic `lastpass-collector` command without credentials.
    pub fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("lastpass-collector");

        // Hermeticity: prevent loading local .env
        cmd.env("DOTENV_DISABLED", "1");

        for (key, _) in std::env::vars() {
            if key.starts_with("LASTPASS_") {
                cmd.env_remove(&key);
            }
        }
        cmd.env_remove("RUST_LOG");

        cmd.env("LASTPASS_CONFIG_PATH", self.config_path());
        cmd.env("LASTPASS_CHECKPOINT_DIR", self.checkpoint_dir());
        cmd
    }

    /// Hermetic command with valid-looking credentials.
    pub fn cmd_with_credentials(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("LASTPASS_CID", CUSTOMER_ID);
        cmd.env("LASTPASS_PROVHASH", PROVISIONING_HASH);
        cmd
    }
}
