//! Path helpers for the persisted state file.
//!
//! Uses the `directories` crate for platform-appropriate paths:
//! - Linux: `~/.config/coop-admin/session.json`
//! - macOS: `~/Library/Application Support/coop-admin/session.json`
//! - Windows: `%AppData%\coop-admin\config\session.json`

use std::path::PathBuf;

use anyhow::Context;

use crate::constants::{APP_DIR_NAME, STATE_FILE_NAME};

/// Returns the default path of the persisted client state file.
pub fn default_state_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_DIR_NAME)
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join(STATE_FILE_NAME))
}
