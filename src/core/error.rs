//! Error handling for pkgmeta
//!
//! This module provides the error type shared by the parser, resolver and
//! flag aggregator, plus user-friendly error reporting for the command line.
//! The error system follows two principles:
//! 1. **Strongly-typed errors** so library callers can match on the failure
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`PkgError`] - Enumerated error kinds for every failure the core reports
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for display
//! - [`user_friendly_error`] - Maps any [`anyhow::Error`] to an [`ErrorContext`]
//!
//! # Error Categories
//!
//! - **Parsing**: [`PkgError::OpenError`], [`PkgError::DuplicateField`],
//!   [`PkgError::DuplicateVariable`], [`PkgError::UndefinedVariable`],
//!   [`PkgError::MalformedConstraint`]
//! - **Resolution**: [`PkgError::NotFound`], [`PkgError::CircularDependency`]
//! - **Verification**: [`PkgError::VersionMismatch`], [`PkgError::ConflictDetected`],
//!   [`PkgError::MissingRequiredField`], [`PkgError::InternalInvariant`]
//!
//! Parse errors are subject to the strict/permissive policy of the parser;
//! verification errors are always fatal for the package being resolved.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pkgmeta_cli::core::{PkgError, user_friendly_error};
//!
//! let error = PkgError::NotFound {
//!     name: "gtk+-3.0".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::version::Comparison;

/// Errors produced while parsing, resolving and verifying packages.
///
/// Every variant carries enough context to diagnose the failure without
/// re-reading the metadata files: the offending file, the field, and for
/// verification failures the packages, operator and versions involved.
#[derive(Error, Debug)]
pub enum PkgError {
    /// A metadata file could not be opened or read.
    #[error("Failed to open '{}': {source}", .path.display())]
    OpenError {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A scalar field (or `Cflags`) appears twice in one file.
    #[error("{field} field occurs twice in '{path}'")]
    DuplicateField {
        /// Field name as written in the file
        field: String,
        /// File being parsed
        path: String,
    },

    /// A variable is defined twice in one file.
    #[error("Duplicate definition of variable '{name}' in '{path}'")]
    DuplicateVariable {
        /// Variable name
        name: String,
        /// File being parsed
        path: String,
    },

    /// A `${name}` reference names no global, package or implicit variable.
    #[error("Variable '{name}' not defined in '{path}'")]
    UndefinedVariable {
        /// Variable name
        name: String,
        /// File being parsed
        path: String,
    },

    /// A dependency list or flag list could not be interpreted.
    ///
    /// Covers an operator without a version, an unknown operator, and flag
    /// values that are not valid shell syntax.
    #[error("Malformed {field} field in '{path}': {reason}")]
    MalformedConstraint {
        /// Field name as written in the file
        field: String,
        /// File being parsed
        path: String,
        /// What was wrong with the value
        reason: String,
    },

    /// No metadata file and no legacy provider knows the package.
    #[error(
        "Package {name} was not found in the pkg-config search path.\n\
         Perhaps you should add the directory containing `{name}.pc'\n\
         to the PKG_CONFIG_PATH environment variable"
    )]
    NotFound {
        /// Lookup name
        name: String,
    },

    /// A `Requires` constraint is not satisfied by the resolved dependency.
    #[error(
        "Package '{package}' requires '{dependency} {comparison} {required}' but version of {found_name} is {found_version}"
    )]
    VersionMismatch {
        /// Name of the package declaring the constraint
        package: String,
        /// Lookup name of the dependency
        dependency: String,
        /// Constraint operator
        comparison: Comparison,
        /// Constraint operand
        required: String,
        /// `Name:` of the resolved dependency
        found_name: String,
        /// `Version:` of the resolved dependency
        found_version: String,
    },

    /// A transitively required package matches a transitively declared conflict.
    #[error(
        "Version {version} of {name} creates a conflict.\n\
         ({conflict_name} {comparison} {conflict_version} conflicts with {owner_name} {owner_version})"
    )]
    ConflictDetected {
        /// `Name:` of the required package
        name: String,
        /// `Version:` of the required package
        version: String,
        /// Package named by the conflict entry
        conflict_name: String,
        /// Conflict operator
        comparison: Comparison,
        /// Conflict operand
        conflict_version: String,
        /// `Name:` of the package declaring the conflict
        owner_name: String,
        /// `Version:` of the package declaring the conflict
        owner_version: String,
    },

    /// `Name`, `Version` or `Description` is missing after parsing.
    #[error("Package '{package}' has no {field}: field")]
    MissingRequiredField {
        /// Field that is missing
        field: &'static str,
        /// Key (or name) of the package
        package: String,
    },

    /// The resolver produced a package without a key.
    #[error("Internal pkgmeta error, {message}, please file a bug report")]
    InternalInvariant {
        /// Description of the broken invariant
        message: String,
    },

    /// A package is required again while it is still being resolved.
    #[error("Circular dependency detected: {chain}")]
    CircularDependency {
        /// The chain of lookup names, joined with arrows
        chain: String,
    },

    /// The same global variable is defined twice.
    #[error("Variable '{name}' defined twice globally")]
    DuplicateGlobalVariable {
        /// Variable name
        name: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },
}

impl PkgError {
    /// Whether the strict/permissive policy may downgrade this error to a warning.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DuplicateField { .. }
                | Self::DuplicateVariable { .. }
                | Self::UndefinedVariable { .. }
                | Self::MalformedConstraint { .. }
        )
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`PkgError`] and adds optional suggestions and
/// details. This is the primary way pkgmeta presents errors to CLI users.
///
/// # Display Format
///
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PkgError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: PkgError) -> Self {
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

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Known [`PkgError`] variants get tailored suggestions; anything else is
/// wrapped as a [`PkgError::ConfigError`] carrying the full error chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<PkgError>() {
        Ok(pkg_error) => create_error_context(pkg_error),
        Err(error) => {
            if let Some(io_error) = error.downcast_ref::<std::io::Error>()
                && io_error.kind() == std::io::ErrorKind::PermissionDenied
            {
                return ErrorContext::new(PkgError::ConfigError {
                    message: format!("{error:#}"),
                })
                .with_suggestion("Check the permissions of the metadata and configuration files");
            }

            ErrorContext::new(PkgError::ConfigError {
                message: format!("{error:#}"),
            })
        }
    }
}

fn create_error_context(error: PkgError) -> ErrorContext {
    match &error {
        PkgError::NotFound {
            name,
        } => {
            let suggestion = format!(
                "Add the directory containing `{name}.pc` to PKG_CONFIG_PATH or pass the .pc file path directly"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        PkgError::VersionMismatch {
            dependency,
            ..
        } => {
            let suggestion = format!("Install a version of '{dependency}' that satisfies the constraint");
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Requires and Requires.private constraints are checked when a package is resolved")
        }
        PkgError::ConflictDetected {
            ..
        } => ErrorContext::new(error)
            .with_details("Conflicts declared anywhere in the dependency graph apply to every package it pulls in"),
        PkgError::UndefinedVariable {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Define the variable in the .pc file, pass --define-variable, or use --permissive to substitute an empty value",
        ),
        PkgError::DuplicateField {
            ..
        }
        | PkgError::DuplicateVariable {
            ..
        }
        | PkgError::MalformedConstraint {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Fix the metadata file, or use --permissive to continue with a best-effort value"),
        PkgError::CircularDependency {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Remove one of the Requires entries that closes the cycle"),
        PkgError::MissingRequiredField {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Every .pc file must declare Name, Version and Description"),
        _ => ErrorContext::new(error),
    }
}
