//! Integration test suite for ngdeps
//!
//! End-to-end tests running the `ngdeps` binary against temporary projects.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **inject**: template rewriting, strict mode, dry runs
//! - **validate**: text and JSON validation reports
//! - **resolve**: load order, files and tree output
//! - **graph**: DOT export
//! - **errors**: configuration and scan failures

#[path = "../common/mod.rs"]
mod common;

mod errors;
mod graph;
mod inject;
mod resolve;
mod validate;
