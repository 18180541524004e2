//! Shared test utilities for coop CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Give every test its own persisted-state file.
//!
//! Invariants / Assumptions:
//! - No `COOP_*` variable leaks in from the host.
//! - The returned `TempDir` must outlive the command.

use assert_cmd::Command;
use tempfile::TempDir;

/// Returns a hermetic `coop` command and the directory holding its state file.
pub fn coop_cmd() -> (Command, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("coop");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("COOP_BASE_URL")
        .env_remove("COOP_USERNAME")
        .env_remove("COOP_PASSWORD")
        .env_remove("COOP_TIMEOUT")
        .env_remove("COOP_CONNECT_TIMEOUT")
        .env_remove("COOP_MAX_RETRIES")
        .env_remove("COOP_SKIP_VERIFY");
    cmd.env("COOP_STATE_PATH", dir.path().join("session.json"));

    (cmd, dir)
}

/// Hermetic `coop` command bound to `base_url` and sharing the state file in `dir`.
#[allow(dead_code)]
pub fn coop_cmd_in(dir: &TempDir, base_url: &str) -> Command {
    let (mut cmd, _unused) = coop_cmd();
    cmd.env("COOP_STATE_PATH", dir.path().join("session.json"));
    cmd.env("COOP_BASE_URL", base_url);
    cmd
}
