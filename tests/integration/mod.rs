//! Integration test suite for pkgmeta
//!
//! End-to-end tests that run the `pkgmeta` binary against metadata files in
//! temporary directories, plus library-level resolution scenarios.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **common**: Command builder isolated from the user's config and environment
//! - **cli_output**: Flag, version and variable output
//! - **cli_errors**: Exit codes and error messages
//! - **config_layers**: Config file and environment layering
//! - **resolution**: Library-level resolution through the public API

mod common;

mod cli_errors;
mod cli_output;
mod config_layers;
mod resolution;
