//! Configuration management for pkgmeta
//!
//! Settings are layered, later layers overriding earlier ones:
//!
//! 1. **Defaults** - strict parsing, uninstalled packages preferred, the
//!    conventional system `pkgconfig` directories
//! 2. **Config file** - `$PKGMETA_CONFIG`, or `config.toml` under the
//!    platform config directory (`~/.config/pkgmeta/config.toml` on Linux)
//! 3. **Environment** - `PKG_CONFIG_PATH`, `PKG_CONFIG_LIBDIR`,
//!    `PKG_CONFIG_DISABLE_UNINSTALLED`
//! 4. **Command line** - applied by the CLI on top of the loaded [`Config`]
//!
//! # Config File
//!
//! ```toml
//! # Searched before the system directories, in order
//! search_paths = ["/opt/local/lib/pkgconfig"]
//!
//! # Replaces the system directories entirely
//! libdir = ["/sysroot/usr/lib/pkgconfig"]
//!
//! strict = true
//! disable_uninstalled = false
//! define_prefix = false
//! prefix_variable = "prefix"
//! msvc_syntax = false
//! static_linking = false
//!
//! # Global variables, overriding package variables of the same name
//! [variables]
//! sysroot = "/sysroot"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    DEFAULT_PREFIX_VARIABLE, DEFAULT_SYSTEM_DIRS, ENV_CONFIG_PATH, ENV_DISABLE_UNINSTALLED, ENV_PKG_CONFIG_LIBDIR,
    ENV_PKG_CONFIG_PATH,
};
use crate::parser::{FlagSyntax, ParseOptions};
use crate::resolver::{Resolver, ResolverOptions, SearchPath};

/// Parse a TOML configuration file into the specified type.
///
/// # Errors
///
/// Returns an error naming `path` if the file cannot be read or does not
/// deserialize into `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

const fn default_strict() -> bool {
    true
}

fn default_prefix_variable() -> String {
    DEFAULT_PREFIX_VARIABLE.to_string()
}

/// Effective pkgmeta settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directories searched before the system directories, in order
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Replacement for the default system directories
    #[serde(default)]
    pub libdir: Option<Vec<PathBuf>>,

    /// Abort on recoverable parse problems instead of warning
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// Never prefer `<name>-uninstalled` packages
    #[serde(default)]
    pub disable_uninstalled: bool,

    /// Relocate the prefix of files found in a `pkgconfig` directory
    #[serde(default)]
    pub define_prefix: bool,

    /// Variable treated as the installation prefix
    #[serde(default = "default_prefix_variable")]
    pub prefix_variable: String,

    /// Spell library flags for the MSVC toolchain
    #[serde(default)]
    pub msvc_syntax: bool,

    /// Include private dependencies and `Libs.private`
    #[serde(default)]
    pub static_linking: bool,

    /// Global variable definitions
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            libdir: None,
            strict: default_strict(),
            disable_uninstalled: false,
            define_prefix: false,
            prefix_variable: default_prefix_variable(),
            msvc_syntax: false,
            static_linking: false,
            variables: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Location of the user config file: `$PKGMETA_CONFIG`, else the platform
    /// config directory. `None` if neither can be determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("pkgmeta").join("config.toml")))
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from '{}'", path.display());
        parse_config(path)
    }

    /// Load the config file layer.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply the environment layer from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var_os(name).map(|value| value.to_string_lossy().into_owned()));
    }

    /// Apply the environment layer using `lookup` to read variables.
    ///
    /// `PKG_CONFIG_PATH` entries are searched before configured search paths,
    /// `PKG_CONFIG_LIBDIR` replaces the system directories, and any value of
    /// `PKG_CONFIG_DISABLE_UNINSTALLED` disables the uninstalled preference.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(paths) = lookup(ENV_PKG_CONFIG_PATH) {
            let mut dirs: Vec<PathBuf> = split_path_list(&paths);
            debug!("{ENV_PKG_CONFIG_PATH} adds {} search directories", dirs.len());
            dirs.append(&mut self.search_paths);
            self.search_paths = dirs;
        }

        if let Some(libdir) = lookup(ENV_PKG_CONFIG_LIBDIR) {
            self.libdir = Some(split_path_list(&libdir));
        }

        if lookup(ENV_DISABLE_UNINSTALLED).is_some() {
            self.disable_uninstalled = true;
        }
    }

    /// Every directory to scan, in priority order.
    #[must_use]
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        let system = self.libdir.clone().unwrap_or_else(|| DEFAULT_SYSTEM_DIRS.iter().map(PathBuf::from).collect());
        self.search_paths.iter().cloned().chain(system).collect()
    }

    /// Parser and resolver switches derived from this config.
    #[must_use]
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            parse: ParseOptions {
                strict: self.strict,
                define_prefix: self.define_prefix,
                prefix_variable: self.prefix_variable.clone(),
                flag_syntax: if self.msvc_syntax {
                    FlagSyntax::Msvc
                } else {
                    FlagSyntax::Gnu
                },
            },
            disable_uninstalled: self.disable_uninstalled,
        }
    }

    /// Build a resolver that searches this config's directories and knows its
    /// global variables.
    ///
    /// # Errors
    ///
    /// Propagates global variable definition errors.
    pub fn into_resolver(self) -> crate::core::Result<Resolver> {
        let search_path = SearchPath::scan(self.search_dirs());
        debug!("Search path indexes {} packages", search_path.len());

        let mut resolver = Resolver::new(search_path).with_options(self.resolver_options());
        for (name, value) in self.variables {
            resolver.define_global_variable(name, value)?;
        }
        Ok(resolver)
    }
}

/// Split a `PATH`-style list, dropping empty entries.
fn split_path_list(list: &str) -> Vec<PathBuf> {
    std::env::split_paths(list).filter(|path| !path.as_os_str().is_empty()).collect()
}
