//! Metadata file parsing.
//!
//! A metadata file is read one logical line at a time (see [`tokenizer`]) and
//! every line is classified as a keyword field (`Name: ...`), a variable
//! assignment (`prefix = /usr`), or ignored. Field values are trimmed and have
//! `${variable}` references substituted before their field-specific parser
//! sees them:
//!
//! | Field | Parser |
//! |-------|--------|
//! | `Name`, `Version`, `Description`, `URL` | scalar, at most once per file |
//! | `Requires`, `Requires.private`, `Conflicts` | [`module_list`] |
//! | `Libs`, `Libs.private`, `Cflags`/`CFlags` | [`shell`] split, then [`flags`] |
//!
//! Unknown keywords are skipped so that files written for newer tools still
//! load.
//!
//! # Strict and permissive parsing
//!
//! Every recoverable parse problem goes through [`ParseOptions::recover`]. In
//! strict mode (the default) the problem aborts parsing; in permissive mode it
//! is logged and parsing continues with a best-effort value.

pub mod flags;
pub mod module_list;
pub mod shell;
pub mod tokenizer;

use indexmap::IndexMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{MAIN_SEPARATOR, Path};
use tracing::{debug, warn};

use crate::constants::PKGCONFIG_DIR_NAME;
use crate::core::{PkgError, Result};
use crate::package::Package;

pub use flags::FlagSyntax;

/// Settings that change how metadata files are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Abort on the first recoverable parse problem
    pub strict: bool,
    /// Relocate the prefix variable of files living in a `pkgconfig` directory
    pub define_prefix: bool,
    /// Name of the variable treated as the installation prefix
    pub prefix_variable: String,
    /// Spelling of library name and path flags
    pub flag_syntax: FlagSyntax,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: true,
            define_prefix: false,
            prefix_variable: crate::constants::DEFAULT_PREFIX_VARIABLE.to_string(),
            flag_syntax: FlagSyntax::Gnu,
        }
    }
}

impl ParseOptions {
    /// Fail with `err` in strict mode, log it and carry on otherwise.
    ///
    /// # Errors
    ///
    /// Returns `err` unchanged when parsing is strict, or when `err` is not a
    /// recoverable parse error.
    pub fn recover(&self, err: PkgError) -> Result<()> {
        if self.strict || !err.is_recoverable() {
            Err(err)
        } else {
            warn!("{err}");
            Ok(())
        }
    }
}

/// Everything a parse needs besides the package itself.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    /// Parse behaviour
    pub options: &'a ParseOptions,
    /// Process-wide variables, consulted before package variables
    pub globals: &'a IndexMap<String, String>,
}

impl<'a> ParseContext<'a> {
    /// Bundle options and globals.
    #[must_use]
    pub const fn new(options: &'a ParseOptions, globals: &'a IndexMap<String, String>) -> Self {
        Self { options, globals }
    }

    fn lookup(&self, pkg: &Package, name: &str) -> Option<String> {
        self.globals.get(name).cloned().or_else(|| pkg.variable(name))
    }
}

/// Expand `$$` and `${name}` references in `raw`.
///
/// Names resolve against the global variables first, then the package's own
/// variables, then the implicit `pcfiledir`. A `${` without a closing brace
/// takes the rest of the string as the variable name.
///
/// # Errors
///
/// In strict mode an undefined variable fails with
/// [`PkgError::UndefinedVariable`]; in permissive mode it expands to nothing.
///
/// # Examples
///
/// ```rust
/// use indexmap::IndexMap;
/// use pkgmeta_cli::package::Package;
/// use pkgmeta_cli::parser::{ParseContext, ParseOptions, substitute};
///
/// let mut pkg = Package::new("foo", "/usr/lib/pkgconfig");
/// pkg.variables.insert("prefix".into(), "/usr".into());
///
/// let options = ParseOptions::default();
/// let globals = IndexMap::new();
/// let ctx = ParseContext::new(&options, &globals);
///
/// let value = substitute(&pkg, "${prefix}/lib costs $$5", "foo.pc", ctx).unwrap();
/// assert_eq!(value, "/usr/lib costs $5");
/// ```
pub fn substitute(pkg: &Package, raw: &str, path: &str, ctx: ParseContext<'_>) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("$$") {
            out.push('$');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("${") {
            let (name, remainder) = match after.find('}') {
                Some(end) => (&after[..end], &after[end + 1..]),
                None => (after, ""),
            };

            match ctx.lookup(pkg, name) {
                Some(value) => out.push_str(&value),
                None => ctx.options.recover(PkgError::UndefinedVariable {
                    name: name.to_string(),
                    path: path.to_string(),
                })?,
            }
            rest = remainder;
        } else {
            out.push('$');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn trim_and_substitute(pkg: &Package, raw: &str, path: &str, ctx: ParseContext<'_>) -> Result<String> {
    substitute(pkg, tokenizer::trim(raw), path, ctx)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    Name,
    Version,
    Description,
    Url,
}

impl Scalar {
    const fn field(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Version => "Version",
            Self::Description => "Description",
            Self::Url => "URL",
        }
    }

    fn slot(self, pkg: &mut Package) -> &mut Option<String> {
        match self {
            Self::Name => &mut pkg.name,
            Self::Version => &mut pkg.version,
            Self::Description => &mut pkg.description,
            Self::Url => &mut pkg.url,
        }
    }
}

fn parse_scalar(pkg: &mut Package, scalar: Scalar, value: &str, path: &str, ctx: ParseContext<'_>) -> Result<()> {
    if scalar.slot(pkg).is_some() {
        return ctx.options.recover(PkgError::DuplicateField {
            field: scalar.field().to_string(),
            path: path.to_string(),
        });
    }

    let value = trim_and_substitute(pkg, value, path, ctx)?;
    *scalar.slot(pkg) = Some(value);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DepsField {
    Requires,
    RequiresPrivate,
    Conflicts,
}

fn parse_deps(pkg: &mut Package, which: DepsField, value: &str, path: &str, ctx: ParseContext<'_>) -> Result<()> {
    let field = match which {
        DepsField::Requires => "Requires",
        DepsField::RequiresPrivate => "Requires.private",
        DepsField::Conflicts => "Conflicts",
    };

    let value = trim_and_substitute(pkg, value, path, ctx)?;
    let entries = module_list::parse_module_list(&value, &pkg.key, field, path, ctx.options)?;

    match which {
        DepsField::Requires => pkg.requires_entries.extend(entries),
        DepsField::RequiresPrivate => pkg.requires_private_entries.extend(entries),
        DepsField::Conflicts => pkg.conflicts.extend(entries),
    }
    Ok(())
}

/// Substitute and shell-split a flag field. `None` means the field is skipped.
fn split_flag_field(
    pkg: &Package,
    field: &str,
    value: &str,
    path: &str,
    ctx: ParseContext<'_>,
) -> Result<Option<Vec<String>>> {
    let value = trim_and_substitute(pkg, value, path, ctx)?;

    match shell::split_shell_arguments(&value) {
        Ok(args) => Ok(Some(args)),
        Err(err) => {
            ctx.options.recover(PkgError::MalformedConstraint {
                field: field.to_string(),
                path: path.to_string(),
                reason: format!("couldn't parse {field} field into an argument vector: {err}"),
            })?;
            Ok(None)
        }
    }
}

fn parse_libs(pkg: &mut Package, private: bool, value: &str, path: &str, ctx: ParseContext<'_>) -> Result<()> {
    let field = if private {
        "Libs.private"
    } else {
        "Libs"
    };

    let Some(args) = split_flag_field(pkg, field, value, path, ctx)? else {
        return Ok(());
    };

    let parsed = flags::classify_libs(&args, ctx.options.flag_syntax);
    if private {
        pkg.libs_private.extend(parsed);
    } else {
        pkg.libs.extend(parsed);
    }
    Ok(())
}

fn parse_cflags(pkg: &mut Package, value: &str, path: &str, ctx: ParseContext<'_>) -> Result<()> {
    if !pkg.cflags.is_empty() {
        return ctx.options.recover(PkgError::DuplicateField {
            field: "Cflags".to_string(),
            path: path.to_string(),
        });
    }

    if let Some(args) = split_flag_field(pkg, "Cflags", value, path, ctx)? {
        pkg.cflags.extend(flags::classify_cflags(&args));
    }
    Ok(())
}

/// The grandparent of `metadata_dir`, normalised to forward slashes and
/// shell-escaped so it survives later flag splitting.
fn relocated_prefix(metadata_dir: &Path) -> Option<String> {
    let is_pkgconfig_dir = metadata_dir
        .file_name()
        .is_some_and(|base| base.to_string_lossy().eq_ignore_ascii_case(PKGCONFIG_DIR_NAME));
    if !is_pkgconfig_dir {
        return None;
    }

    let prefix = metadata_dir.parent().and_then(Path::parent).unwrap_or_else(|| Path::new(""));
    let prefix = prefix.to_string_lossy().replace('\\', "/");
    Some(shell::shell_escape(&prefix))
}

fn parse_variable(pkg: &mut Package, name: &str, value: &str, path: &str, ctx: ParseContext<'_>) -> Result<()> {
    let options = ctx.options;
    let mut value = value.to_string();

    if options.define_prefix && name == options.prefix_variable {
        if let Some(prefix) = relocated_prefix(&pkg.metadata_dir) {
            debug!("Variable declaration, '{name}' overridden with '{prefix}'");
            pkg.orig_prefix = Some(value);
            pkg.variables.insert(name.to_string(), prefix);
            return Ok(());
        }
    } else if options.define_prefix
        && let Some(orig) = pkg.orig_prefix.as_deref().filter(|orig| !orig.is_empty())
        && let Some(tail) = value.strip_prefix(orig)
        && tail.starts_with(['/', MAIN_SEPARATOR])
    {
        let prefix = pkg.variables.get(&options.prefix_variable).cloned().unwrap_or_default();
        value = format!("{prefix}{tail}");
    }

    if pkg.variables.contains_key(name) {
        return options.recover(PkgError::DuplicateVariable {
            name: name.to_string(),
            path: path.to_string(),
        });
    }

    let value = trim_and_substitute(pkg, &value, path, ctx)?;
    debug!("Variable declaration, '{name}' has value '{value}'");
    pkg.variables.insert(name.to_string(), value);
    Ok(())
}

const fn is_tag_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'.'
}

fn skip_space(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_ascii() && tokenizer::is_space(c as u8))
}

/// Classify one logical line and apply it to `pkg`.
///
/// # Errors
///
/// Propagates field errors that [`ParseOptions::recover`] does not absorb.
pub fn parse_line(pkg: &mut Package, raw_line: &str, path: &str, ctx: ParseContext<'_>) -> Result<()> {
    let line = tokenizer::trim(raw_line);
    if line.is_empty() {
        return Ok(());
    }

    let tag_len = line.bytes().take_while(|&c| is_tag_byte(c)).count();
    let (tag, rest) = line.split_at(tag_len);
    let rest = skip_space(rest);

    if let Some(value) = rest.strip_prefix(':') {
        let value = skip_space(value);

        match tag {
            "Name" => parse_scalar(pkg, Scalar::Name, value, path, ctx),
            "Description" => parse_scalar(pkg, Scalar::Description, value, path, ctx),
            "Version" => parse_scalar(pkg, Scalar::Version, value, path, ctx),
            "URL" => parse_scalar(pkg, Scalar::Url, value, path, ctx),
            "Requires.private" => parse_deps(pkg, DepsField::RequiresPrivate, value, path, ctx),
            "Requires" => parse_deps(pkg, DepsField::Requires, value, path, ctx),
            "Conflicts" => parse_deps(pkg, DepsField::Conflicts, value, path, ctx),
            "Libs.private" => parse_libs(pkg, true, value, path, ctx),
            "Libs" => parse_libs(pkg, false, value, path, ctx),
            "Cflags" | "CFlags" => parse_cflags(pkg, value, path, ctx),
            _ => {
                debug!("Unknown keyword '{tag}' in '{path}'");
                Ok(())
            }
        }
    } else if let Some(value) = rest.strip_prefix('=') {
        parse_variable(pkg, tag, skip_space(value), path, ctx)
    } else {
        Ok(())
    }
}

/// Parse the metadata file at `path` into a package keyed `key`.
///
/// # Errors
///
/// Fails with [`PkgError::OpenError`] when the file cannot be opened or read,
/// and with any field error strict parsing does not absorb.
pub fn parse_metadata_file(key: &str, path: &Path, ctx: ParseContext<'_>) -> Result<Package> {
    let shown = path.display().to_string();
    let open_error = |source| PkgError::OpenError {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(open_error)?;
    let mut reader = BufReader::new(file);

    debug!("Parsing package file '{shown}'");

    let metadata_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let mut pkg = Package::new(key, metadata_dir);
    let mut saw_content = false;

    while let Some(line) = tokenizer::read_logical_line(&mut reader).map_err(open_error)? {
        saw_content |= !tokenizer::trim(&line).is_empty();
        parse_line(&mut pkg, &line, &shown, ctx)?;
    }

    if !saw_content {
        warn!("Package file '{shown}' appears to be empty");
    }

    Ok(pkg)
}

/// Value of a package variable with one level of shell quoting removed.
///
/// Values that are not quoted, or whose quoting is broken, are returned raw.
#[must_use]
pub fn parse_package_variable(pkg: &Package, name: &str, globals: &IndexMap<String, String>) -> Option<String> {
    let value = globals.get(name).cloned().or_else(|| pkg.variable(name))?;

    if !value.starts_with(['"', '\'']) {
        return Some(value);
    }

    match shell::shell_unquote(&value) {
        Ok(unquoted) => Some(unquoted),
        Err(err) => {
            debug!("Couldn't unquote value of '{name}': {err}");
            Some(value)
        }
    }
}
