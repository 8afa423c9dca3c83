//! Init command - write a sample config file

use crate::config::Config;
use anyhow::{Context, Result};

/// Write `.repograde.toml` in the current directory, refusing to clobber
/// an existing one.
pub fn run() -> Result<()> {
    let path = std::env::current_dir()
        .context("cannot determine working directory")?
        .join(".repograde.toml");

    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    std::fs::write(&path, Config::sample())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}
