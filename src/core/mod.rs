//! Core types shared across pkgmeta.
//!
//! - [`error`] - The [`PkgError`] type, [`ErrorContext`] and
//!   [`user_friendly_error`] for CLI reporting
//!
//! Library entry points return `Result<T, PkgError>` so callers can match on
//! the failure; the binary converts into [`anyhow::Error`] at the boundary.

pub mod error;

pub use error::{ErrorContext, PkgError, user_friendly_error};

/// Result alias used by the parser, resolver and verifier.
pub type Result<T, E = PkgError> = std::result::Result<T, E>;
