//! Classification of `Libs`, `Libs.private` and `Cflags` arguments.
//!
//! Each shell word is trimmed and shell-escaped before classification, so the
//! stored flag text can be joined into a command line as is. Options that
//! take their operand as a separate word (`-framework Cocoa`,
//! `-isystem /opt/include`) are joined into a single flag so later
//! deduplication never separates an option from its operand.

use crate::package::{Flag, FlagKind};
use crate::parser::shell::shell_escape;
use crate::parser::tokenizer::{is_space, trim};

/// How library flags are spelled on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagSyntax {
    /// `-lfoo`, `-L/dir`
    #[default]
    Gnu,
    /// `foo.lib`, `/libpath:dir`
    Msvc,
}

impl FlagSyntax {
    const fn library_name_prefix(self) -> &'static str {
        match self {
            Self::Gnu => "-l",
            Self::Msvc => "",
        }
    }

    const fn library_name_suffix(self) -> &'static str {
        match self {
            Self::Gnu => "",
            Self::Msvc => ".lib",
        }
    }

    const fn library_path_prefix(self) -> &'static str {
        match self {
            Self::Gnu => "-L",
            Self::Msvc => "/libpath:",
        }
    }
}

fn escaped(arg: &str) -> String {
    shell_escape(trim(arg))
}

/// Text after a two-character option such as `-l` or `-I`.
fn operand(arg: &str) -> &str {
    arg[2..].trim_start_matches(|c: char| c.is_ascii() && is_space(c as u8))
}

/// Classify the words of a `Libs` or `Libs.private` field.
#[must_use]
pub fn classify_libs(args: &[String], syntax: FlagSyntax) -> Vec<Flag> {
    let mut flags = Vec::with_capacity(args.len());
    let mut i = 0;

    while i < args.len() {
        let arg = escaped(&args[i]);

        // `-lib:` is a C# compiler option, not a library name.
        if arg.starts_with("-l") && !arg.starts_with("-lib:") {
            let text = format!(
                "{}{}{}",
                syntax.library_name_prefix(),
                operand(&arg),
                syntax.library_name_suffix()
            );
            flags.push(Flag::new(FlagKind::LibraryName, text));
        } else if arg.starts_with("-L") {
            flags.push(Flag::new(
                FlagKind::LibraryPath,
                format!("{}{}", syntax.library_path_prefix(), operand(&arg)),
            ));
        } else if (arg == "-framework" || arg == "-Wl,-framework") && i + 1 < args.len() {
            let framework = escaped(&args[i + 1]);
            flags.push(Flag::new(FlagKind::Other, format!("{arg} {framework}")));
            i += 1;
        } else if !arg.is_empty() {
            flags.push(Flag::new(FlagKind::Other, arg));
        }

        i += 1;
    }

    flags
}

/// Classify the words of a `Cflags` field.
#[must_use]
pub fn classify_cflags(args: &[String]) -> Vec<Flag> {
    let mut flags = Vec::with_capacity(args.len());
    let mut i = 0;

    while i < args.len() {
        let arg = escaped(&args[i]);

        if arg.starts_with("-I") {
            flags.push(Flag::new(FlagKind::IncludePath, format!("-I{}", operand(&arg))));
        } else if (arg == "-isystem" || arg == "-idirafter") && i + 1 < args.len() {
            // These control the search path, so they count as include paths.
            let dir = escaped(&args[i + 1]);
            flags.push(Flag::new(FlagKind::IncludePath, format!("{arg} {dir}")));
            i += 1;
        } else if !arg.is_empty() {
            flags.push(Flag::new(FlagKind::Other, arg));
        }

        i += 1;
    }

    flags
}
