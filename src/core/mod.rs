//! Core types for ngdeps
//!
//! This module holds the error system shared by every other module:
//! - [`NgdepsError`] - Enumerated error types covering all fatal ngdeps failure modes
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format
//!
//! # Examples
//!
//! ```rust
//! use ngdeps_cli::core::{NgdepsError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(NgdepsError::ConfigNotFound.into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, NgdepsError, user_friendly_error};
