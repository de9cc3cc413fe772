//! File system helpers.
//!
//! Template rewrites go through [`atomic_write`] so that an interrupted run
//! never leaves a half-written HTML file behind.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// Content goes to a temporary file in the target directory which is synced
/// and then persisted over `path`, so readers see either the old or the new
/// content.
///
/// # Examples
///
/// ```rust,no_run
/// use ngdeps_cli::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("public/index.html"), b"<!doctype html>")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in: {}", dir.display()))?;
    temp.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp.path().display()))?;
    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    temp.persist(path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Render a path with `/` separators regardless of platform.
///
/// File identifiers end up in `src` attributes, which always use forward
/// slashes.
pub fn to_slash_path(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '\\' {
        rendered.replace('\\', "/")
    } else {
        rendered.into_owned()
    }
}
