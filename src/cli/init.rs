//! taskbot init command implementation
//!
//! Writes a default `.taskbot.toml` into the data directory.

use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILENAME};
use crate::error::Result;
use crate::output::{emit_reply, OutputOptions};
use crate::platform::Reply;

pub fn run(data_dir: &Path, output: OutputOptions) -> Result<()> {
    let created = ensure_config(data_dir)?;
    let path = data_dir.join(CONFIG_FILENAME);

    let reply = if created {
        Reply::message(format!("Wrote {}", path.display()))
    } else {
        Reply::message(format!("{} already exists", path.display()))
    };
    emit_reply(output, "init", &reply)
}

/// Create the config file unless one is already there.
fn ensure_config(data_dir: &Path) -> Result<bool> {
    let path: PathBuf = data_dir.join(CONFIG_FILENAME);
    if path.exists() {
        return Ok(false);
    }
    std::fs::create_dir_all(data_dir)?;
    Config::default().save(&path)?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(true)
}
