//! Locating and parsing `ngdeps.toml`.
//!
//! Discovery walks from a starting directory up to the filesystem root and
//! stops at the first `ngdeps.toml`. An explicit path given with `--config`
//! skips discovery.
//!
//! Parse failures are reported as [`NgdepsError::ConfigParseError`] carrying
//! the file name and the TOML parser's message, so the user sees the line
//! and column of the mistake.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::constants::CONFIG_FILE_NAME;
use crate::core::NgdepsError;

/// Parse a TOML configuration file into the specified type.
///
/// # Examples
///
/// ```rust,no_run
/// use ngdeps_cli::config::{ProjectConfig, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: ProjectConfig = parse_config(Path::new("ngdeps.toml"))?;
/// println!("{} source root(s)", config.roots.len());
/// # Ok(())
/// # }
/// ```
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content).map_err(|e| {
        NgdepsError::ConfigParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Find `ngdeps.toml` in `start` or any of its parents.
///
/// # Errors
///
/// Returns [`NgdepsError::ConfigNotFound`] when the filesystem root is
/// reached without finding a configuration file.
pub fn find_config_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("Using configuration {}", candidate.display());
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(NgdepsError::ConfigNotFound.into());
        }
    }
}

/// Use `explicit` when given, otherwise search from the current directory.
pub fn find_config(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) => Err(NgdepsError::FileSystemError {
            operation: "open configuration file".to_string(),
            path: path.display().to_string(),
        }
        .into()),
        None => {
            let current = std::env::current_dir()
                .context("Cannot determine current working directory")?;
            find_config_from(&current)
        }
    }
}
