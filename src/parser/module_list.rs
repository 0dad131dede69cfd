//! Module list scanner for `Requires`, `Requires.private` and `Conflicts`.
//!
//! A module list is a comma and/or whitespace separated list of
//! `name [operator version]` entries. Commas behave exactly like whitespace so
//! that substituted-away entries (`Requires: ${maybe}, glib`) leave no trace.
//! The tricky part is whitespace: `foo >= 1.0, bar` is two entries, not four,
//! so a name followed by whitespace and then an operator character must keep
//! scanning into the operator and version.
//!
//! Splitting is a six-state machine driven one byte at a time:
//!
//! | state            | byte                           | next state        |
//! |------------------|--------------------------------|-------------------|
//! | `Outside`        | separator                      | `Outside`         |
//! | `Outside`        | other (entry starts)           | `InName`          |
//! | `InName`         | whitespace, operator ahead     | `BeforeOperator`  |
//! | `InName`         | whitespace, no operator ahead  | `Outside`         |
//! | `InName`         | comma                          | `Outside`         |
//! | `BeforeOperator` | operator char                  | `InOperator`      |
//! | `InOperator`     | non-operator char              | `AfterOperator`   |
//! | `AfterOperator`  | non-whitespace                 | `InVersion`       |
//! | `InVersion`      | separator                      | `Outside`         |
//!
//! Every transition into `Outside` from another state ends an entry.

use tracing::debug;

use crate::core::{PkgError, Result};
use crate::package::RequiredVersion;
use crate::parser::ParseOptions;
use crate::parser::tokenizer::is_space;
use crate::version::Comparison;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InName,
    BeforeOperator,
    InOperator,
    AfterOperator,
    InVersion,
}

const fn is_separator(c: u8) -> bool {
    c == b',' || is_space(c)
}

const fn is_operator_char(c: u8) -> bool {
    matches!(c, b'<' | b'>' | b'!' | b'=')
}

/// Compute the state after consuming `bytes[pos]`.
fn transition(state: ScanState, bytes: &[u8], pos: usize) -> ScanState {
    let c = bytes[pos];

    match state {
        ScanState::Outside if is_separator(c) => ScanState::Outside,
        ScanState::Outside => ScanState::InName,
        ScanState::InName if is_space(c) => {
            let ahead = bytes[pos..].iter().copied().find(|&b| !is_space(b));
            if ahead.is_some_and(is_operator_char) {
                ScanState::BeforeOperator
            } else {
                ScanState::Outside
            }
        }
        ScanState::InName if is_separator(c) => ScanState::Outside,
        ScanState::InName => ScanState::InName,
        ScanState::BeforeOperator if is_operator_char(c) => ScanState::InOperator,
        // Only whitespace can precede the operator found by the lookahead.
        ScanState::BeforeOperator => ScanState::BeforeOperator,
        ScanState::InOperator if is_operator_char(c) => ScanState::InOperator,
        ScanState::InOperator => ScanState::AfterOperator,
        ScanState::AfterOperator if is_space(c) => ScanState::AfterOperator,
        ScanState::AfterOperator => ScanState::InVersion,
        ScanState::InVersion if is_separator(c) => ScanState::Outside,
        ScanState::InVersion => ScanState::InVersion,
    }
}

/// Split a module list into one string per `name [operator version]` entry.
///
/// # Examples
///
/// ```rust
/// use pkgmeta_cli::parser::module_list::split_module_list;
///
/// assert_eq!(split_module_list("foo >= 1.0, bar baz"), ["foo >= 1.0", "bar", "baz"]);
/// ```
#[must_use]
pub fn split_module_list(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut modules = Vec::new();
    let mut state = ScanState::Outside;
    let mut start = 0;

    for pos in 0..bytes.len() {
        let last_state = state;
        state = transition(state, bytes, pos);

        if state == ScanState::InName && last_state == ScanState::Outside {
            start = pos;
        } else if state == ScanState::Outside && last_state != ScanState::Outside {
            modules.push(&input[start..pos]);
        }
    }

    if state != ScanState::Outside {
        modules.push(&input[start..]);
    }

    modules
}

/// Split off the next whitespace-delimited word and skip the whitespace after it.
fn take_word(s: &str, is_delimiter: fn(u8) -> bool) -> (&str, &str) {
    let end = s.bytes().position(is_delimiter).unwrap_or(s.len());
    let (word, rest) = s.split_at(end);
    let skip = rest.bytes().take_while(|&b| is_delimiter(b)).count();
    (word, &rest[skip..])
}

/// Parse a substituted module list into constraint entries owned by `owner`.
///
/// `field` and `path` are used for diagnostics only.
///
/// # Errors
///
/// In strict mode an unknown operator, or an operator without a version,
/// fails with [`PkgError::MalformedConstraint`]. In permissive mode the
/// problem is logged; an unknown operator leaves the entry unconstrained and a
/// missing version becomes `"0"`.
pub fn parse_module_list(
    input: &str,
    owner: &str,
    field: &str,
    path: &str,
    options: &ParseOptions,
) -> Result<Vec<RequiredVersion>> {
    let mut entries = Vec::new();

    for module in split_module_list(input) {
        let (name, rest) = take_word(module, is_space);
        let (operator, rest) = take_word(rest, is_space);
        let (version, _) = take_word(rest, is_separator);

        let mut entry = RequiredVersion::any(name, owner);

        if !operator.is_empty() {
            match operator.parse::<Comparison>() {
                Ok(comparison) => entry.comparison = comparison,
                Err(err) => {
                    options.recover(PkgError::MalformedConstraint {
                        field: field.to_string(),
                        path: path.to_string(),
                        reason: format!("{err} after package name '{name}'"),
                    })?;
                    entries.push(entry);
                    continue;
                }
            }
        }

        if entry.comparison != Comparison::AlwaysMatch && version.is_empty() {
            options.recover(PkgError::MalformedConstraint {
                field: field.to_string(),
                path: path.to_string(),
                reason: format!("comparison operator but no version after package name '{name}'"),
            })?;
            entry.version = Some("0".to_string());
            entries.push(entry);
            continue;
        }

        if !version.is_empty() {
            entry.version = Some(version.to_string());
        }

        debug!("{field} entry '{entry}' in '{path}'");
        entries.push(entry);
    }

    Ok(entries)
}
