//! Version comparison and constraint evaluation.
//!
//! This module answers the two questions the resolver asks about versions:
//! how two version strings order relative to each other ([`compare`]) and
//! whether a version satisfies a `Requires`/`Conflicts` constraint
//! ([`satisfies`]).
//!
//! # Module Organization
//!
//! - [`comparison`] - The segment-wise comparison algorithm
//! - [`Comparison`] - The operator of a constraint (`=`, `>=`, `<`, ...)
//!
//! # Examples
//!
//! ```rust
//! use pkgmeta_cli::version::{satisfies, Comparison};
//!
//! assert!(satisfies(Comparison::GreaterThanEqual, "2.4.1", "2.4"));
//! assert!(!satisfies(Comparison::LessThan, "2.4.1", "2.4"));
//! assert!(satisfies(Comparison::AlwaysMatch, "anything", ""));
//! ```

pub mod comparison;

pub use comparison::compare;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An operator token that is not one of `=`, `>=`, `<=`, `>`, `<`, `!=`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown version comparison operator '{operator}'")]
pub struct UnknownComparison {
    /// The rejected token
    pub operator: String,
}

/// Operator of a version constraint.
///
/// Parsed from the operator token of a module list entry. Entries without an
/// operator use [`Comparison::AlwaysMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Comparison {
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanEqual,
    /// `>=`
    GreaterThanEqual,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// No operator; any version satisfies the constraint.
    #[default]
    AlwaysMatch,
}

impl Comparison {
    /// The operator as written in metadata files, or `(any)` for
    /// [`Comparison::AlwaysMatch`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanEqual => "<=",
            Self::GreaterThanEqual => ">=",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::AlwaysMatch => "(any)",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = UnknownComparison;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Equal),
            ">=" => Ok(Self::GreaterThanEqual),
            "<=" => Ok(Self::LessThanEqual),
            ">" => Ok(Self::GreaterThan),
            "<" => Ok(Self::LessThan),
            "!=" => Ok(Self::NotEqual),
            other => Err(UnknownComparison {
                operator: other.to_string(),
            }),
        }
    }
}

/// Test `version` against `operand` under `comparison`.
///
/// The left-hand side is the actual version, the right-hand side is the
/// operand of the constraint: `satisfies(GreaterThanEqual, "1.0", "2")` asks
/// whether `1.0 >= 2`.
#[must_use]
pub fn satisfies(comparison: Comparison, version: &str, operand: &str) -> bool {
    let ordering = || compare(version, operand);

    match comparison {
        Comparison::LessThan => ordering() == Ordering::Less,
        Comparison::GreaterThan => ordering() == Ordering::Greater,
        Comparison::LessThanEqual => ordering() != Ordering::Greater,
        Comparison::GreaterThanEqual => ordering() != Ordering::Less,
        Comparison::Equal => ordering() == Ordering::Equal,
        Comparison::NotEqual => ordering() != Ordering::Equal,
        Comparison::AlwaysMatch => true,
    }
}
