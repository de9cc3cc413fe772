//! Cross-platform utilities and helpers
//!
//! - [`fs`] - Atomic writes and path normalisation
//! - [`progress`] - Spinners and bars for long-running operations
//!
//! # Example
//!
//! ```rust,no_run
//! use ngdeps_cli::utils::{atomic_write, spinner_with_message};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let spinner = spinner_with_message("Injecting tags");
//! atomic_write(Path::new("index.html"), b"<html></html>")?;
//! spinner.finish_and_clear();
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, to_slash_path};
pub use progress::{ProgressBar, spinner_with_message};
