//! POSIX-shell-style word splitting and escaping.
//!
//! Flag fields (`Libs`, `Cflags`) are split into arguments the way a shell
//! would split them, without any expansion: quoting and backslash escapes are
//! honoured, nothing is executed. Splitting is done by `shell-words`;
//! [`shell_escape`] produces the inverse, so a classified flag can be joined
//! back into a command line safely.

use thiserror::Error;

/// A string could not be split into shell words.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source}. (The text was '{text}')")]
pub struct ShellSplitError {
    /// The text being split
    pub text: String,
    /// Failure reported by `shell-words`
    #[source]
    pub source: shell_words::ParseError,
}

/// Split an already variable-substituted string into shell words.
///
/// Empty or whitespace-only input yields no words.
///
/// # Errors
///
/// Returns [`ShellSplitError`] for unbalanced quotes.
///
/// # Examples
///
/// ```rust
/// use pkgmeta_cli::parser::shell::split_shell_arguments;
///
/// let args = split_shell_arguments(r#"-I"/opt/my dir" -DNAME='a b' -L/x\ y"#).unwrap();
/// assert_eq!(args, ["-I/opt/my dir", "-DNAME=a b", "-L/x y"]);
/// ```
pub fn split_shell_arguments(input: &str) -> Result<Vec<String>, ShellSplitError> {
    shell_words::split(input).map_err(|source| ShellSplitError {
        text: input.to_string(),
        source,
    })
}

/// Remove one level of shell quoting.
///
/// Unquoted whitespace runs collapse to a single space.
///
/// # Errors
///
/// Returns [`ShellSplitError`] when the quoting is unbalanced.
pub fn shell_unquote(input: &str) -> Result<String, ShellSplitError> {
    Ok(split_shell_arguments(input)?.join(" "))
}

/// Characters that never need escaping.
fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '%' | '+' | ',' | '-' | '.' | '/' | ':' | '=' | '@' | '^' | '_' | '~')
}

/// Backslash-escape every character outside the safe set.
///
/// The result splits back into exactly one word equal to `input`
/// (for non-empty input).
#[must_use]
pub fn shell_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        if !is_safe(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
