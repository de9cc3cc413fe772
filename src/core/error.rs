//! Error handling for ngdeps
//!
//! This module provides the error types and user-friendly error reporting for
//! ngdeps. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`NgdepsError`] - Enumerated error types for every fatal failure in ngdeps
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! Advisory findings (inject violations, duplicate providers, cycles in
//! non-strict runs) are *not* errors; they are collected as
//! [`BuildIssue`](crate::graph::BuildIssue) and
//! [`InjectViolation`](crate::validate::InjectViolation) values and only
//! escalated into [`NgdepsError::ValidationFailed`] by strict invocations.
//!
//! # Error Conversion and Context
//!
//! Library code returns [`anyhow::Result`] and attaches context to I/O and TOML
//! failures where they happen. Use [`user_friendly_error`] to convert any error
//! into a user-friendly format with contextual suggestions; raw
//! [`std::io::Error`] and [`toml::de::Error`] values are mapped to
//! [`NgdepsError::FileSystemError`] and [`NgdepsError::ConfigParseError`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use ngdeps_cli::core::{NgdepsError, user_friendly_error};
//!
//! let error = NgdepsError::UnknownModule {
//!     name: "app".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for ngdeps operations
///
/// Each variant represents one fatal failure mode. Anything that aborts an
/// invocation ends up here, usually wrapped in an [`anyhow::Error`] on its way
/// to the CLI.
///
/// # Error Categories
///
/// ## Configuration
/// - [`ConfigNotFound`] - ngdeps.toml missing
/// - [`ConfigParseError`] - Invalid TOML in the configuration file
/// - [`ConfigError`] - Semantically invalid configuration
///
/// ## Graph
/// - [`RootNotFound`] - A configured source root does not exist
/// - [`UnknownModule`] - A requested root module is not in the graph
/// - [`CircularDependency`] - Resolution hit a cycle
/// - [`ValidationFailed`] - Strict mode escalated advisory findings
///
/// ## Templates
/// - [`MissingMarker`] - A marker label is absent from a template
/// - [`MissingRootModule`] - A begin marker does not name a module
/// - [`TemplateError`] - A tag template failed to render
///
/// [`ConfigNotFound`]: NgdepsError::ConfigNotFound
/// [`ConfigParseError`]: NgdepsError::ConfigParseError
/// [`ConfigError`]: NgdepsError::ConfigError
/// [`RootNotFound`]: NgdepsError::RootNotFound
/// [`UnknownModule`]: NgdepsError::UnknownModule
/// [`CircularDependency`]: NgdepsError::CircularDependency
/// [`ValidationFailed`]: NgdepsError::ValidationFailed
/// [`MissingMarker`]: NgdepsError::MissingMarker
/// [`MissingRootModule`]: NgdepsError::MissingRootModule
/// [`TemplateError`]: NgdepsError::TemplateError
#[derive(Error, Debug, Clone)]
pub enum NgdepsError {
    /// No ngdeps.toml was found in the current directory or any parent
    #[error("Configuration file ngdeps.toml not found in current directory or any parent directory")]
    ConfigNotFound,

    /// Configuration file has invalid TOML syntax
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Path to the configuration file
        file: String,
        /// Parser message
        reason: String,
    },

    /// Configuration is syntactically valid but unusable
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What is wrong
        message: String,
    },

    /// A configured source root does not exist or is not a directory
    #[error("Source root not found: {path}")]
    RootNotFound {
        /// The root path as resolved
        path: String,
    },

    /// The requested module was never seen during the scan
    #[error("Module '{name}' not found in the scanned sources")]
    UnknownModule {
        /// Module name as requested
        name: String,
    },

    /// Module dependencies form a cycle
    #[error("Circular dependency detected: {chain}")]
    CircularDependency {
        /// Cycle rendered as `A -> B -> A`
        chain: String,
    },

    /// A marker label is absent from a template file
    #[error("Marker '{label}' not found in {file}")]
    MissingMarker {
        /// Template file
        file: String,
        /// The missing label
        label: String,
    },

    /// A begin marker does not carry a module name
    #[error("Marker '{label}' in {file} does not name a root module")]
    MissingRootModule {
        /// Template file
        file: String,
        /// The begin label
        label: String,
    },

    /// A tag template could not be compiled or rendered
    #[error("Failed to render tag template '{name}': {reason}")]
    TemplateError {
        /// Template name (`script` or `style`)
        name: String,
        /// Underlying renderer message
        reason: String,
    },

    /// Strict mode turned advisory findings into a failure
    #[error("Validation failed with {count} issue(s)")]
    ValidationFailed {
        /// Number of findings that caused the failure
        count: usize,
    },

    /// File system operation failed
    #[error("File system error: {operation}")]
    FileSystemError {
        /// What was being done
        operation: String,
        /// Affected path
        path: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`NgdepsError`] and adds optional suggestions for
/// resolution and additional details. This is the primary way ngdeps presents
/// errors to CLI users.
///
/// # Display Format
///
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying ngdeps error
    pub error: NgdepsError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`NgdepsError`]
    #[must_use]
    pub const fn new(error: NgdepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`NgdepsError`] (anywhere in the chain), [`std::io::Error`] and
/// [`toml::de::Error`]; everything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ngdeps_error) = error.chain().find_map(|e| e.downcast_ref::<NgdepsError>()) {
        return create_error_context(ngdeps_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(NgdepsError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the source roots and templates")
                .with_details("ngdeps needs read access to every source root and write access to every template");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(NgdepsError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(
                    "This error occurs when a required file or directory cannot be found",
                );
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(NgdepsError::ConfigParseError {
            file: "ngdeps.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your ngdeps.toml file. Verify quotes, brackets, and indentation");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(NgdepsError::Other {
        message,
    })
}

/// Create appropriate [`ErrorContext`] with suggestions for specific ngdeps errors
fn create_error_context(error: NgdepsError) -> ErrorContext {
    let (suggestion, details): (Option<String>, Option<String>) = match &error {
        NgdepsError::ConfigNotFound => (
            Some("Create an ngdeps.toml file listing your [[roots]] and [[templates]], or pass --config".to_string()),
            Some("ngdeps looks for ngdeps.toml in the current directory and parent directories up to the filesystem root".to_string()),
        ),

        NgdepsError::ConfigParseError { file, .. } => (
            Some(format!(
                "Check the TOML syntax in {file}. Common issues: missing quotes, unmatched brackets, invalid characters"
            )),
            None,
        ),

        NgdepsError::RootNotFound { path } => (
            Some(format!(
                "Create '{path}' or fix the [[roots]] entry; root paths are relative to the directory containing ngdeps.toml"
            )),
            None,
        ),

        NgdepsError::UnknownModule { name } => (
            Some("Check the module name for typos and make sure the declaring file lives under a configured root".to_string()),
            Some(format!(
                "No scanned file contains angular.module('{name}', [...]) or a reference to it"
            )),
        ),

        NgdepsError::CircularDependency { chain } => (
            Some("Review the module dependency lists and remove circular references".to_string()),
            Some(format!(
                "Circular dependency chain detected: {chain}. Modules cannot depend on themselves directly or indirectly"
            )),
        ),

        NgdepsError::MissingMarker { label, .. } => (
            Some(format!("Add a '<!-- {label} -->' comment where the tags should go")),
            Some("Templates are left untouched when any marker is missing".to_string()),
        ),

        NgdepsError::MissingRootModule { label, .. } => {
            (Some(format!("Write the root module after the label, e.g. '<!-- {label} app -->'")), None)
        }

        NgdepsError::TemplateError { .. } => (
            Some("Check the [tags] templates in ngdeps.toml; available variables are {{ path }} and {{ async }}".to_string()),
            None,
        ),

        NgdepsError::ValidationFailed { .. } => (
            Some("Fix the reported issues or run without --strict to treat them as warnings".to_string()),
            None,
        ),

        _ => (None, None),
    };

    ErrorContext {
        error,
        suggestion,
        details,
    }
}
