//! Global constants used throughout the pkgmeta codebase.
//!
//! This module contains file-naming conventions, well-known variable names and
//! environment variable names that are shared across the parser, resolver and
//! command-line front end. Defining them centrally keeps the metadata file
//! conventions discoverable in one place.

/// File extension of metadata files, including the leading dot.
pub const PC_EXTENSION: &str = ".pc";

/// Suffix appended to a package name to find its uninstalled variant.
///
/// `foo` prefers `foo-uninstalled.pc` when such a file can be located.
pub const UNINSTALLED_SUFFIX: &str = "-uninstalled";

/// Marker used to detect uninstalled variants by name.
pub const UNINSTALLED_MARKER: &str = "uninstalled";

/// Marker used to detect uninstalled variants by file path.
pub const UNINSTALLED_FILE_MARKER: &str = "uninstalled.pc";

/// Implicit variable holding the directory that contains the metadata file.
pub const PCFILEDIR_VARIABLE: &str = "pcfiledir";

/// Default name of the variable that prefix redefinition rewrites.
pub const DEFAULT_PREFIX_VARIABLE: &str = "prefix";

/// Conventional directory name for metadata files (`<prefix>/lib/pkgconfig`).
///
/// Compared case-insensitively when deciding whether a package is relocatable.
pub const PKGCONFIG_DIR_NAME: &str = "pkgconfig";

/// Colon separated (semicolon on Windows) list of extra search directories.
pub const ENV_PKG_CONFIG_PATH: &str = "PKG_CONFIG_PATH";

/// Replaces the built-in system search directories when set.
pub const ENV_PKG_CONFIG_LIBDIR: &str = "PKG_CONFIG_LIBDIR";

/// Disables the uninstalled-variant preference when set to any value.
pub const ENV_DISABLE_UNINSTALLED: &str = "PKG_CONFIG_DISABLE_UNINSTALLED";

/// Overrides the location of the configuration file.
pub const ENV_CONFIG_PATH: &str = "PKGMETA_CONFIG";

/// System directories searched after the configured search path.
pub const DEFAULT_SYSTEM_DIRS: &[&str] = &[
    "/usr/local/lib/pkgconfig",
    "/usr/local/share/pkgconfig",
    "/usr/lib/pkgconfig",
    "/usr/share/pkgconfig",
];
