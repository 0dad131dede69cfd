//! Command-line interface for pkgmeta.
//!
//! `pkgmeta` takes one or more module names (module-list syntax, so
//! `"glib-2.0 >= 2.40" gio-2.0` works) and prints whatever the options ask
//! for:
//!
//! ```bash
//! # Compiler and linker flags
//! pkgmeta --cflags --libs gtk+-3.0
//!
//! # Static linking pulls in Requires.private and Libs.private
//! pkgmeta --libs --static libpng
//!
//! # Scripting
//! pkgmeta --exists "zlib >= 1.2" && echo found
//! pkgmeta --variable=libdir glib-2.0
//!
//! # Everything that can be found
//! pkgmeta --list-all
//! ```
//!
//! Settings come from the config file and environment (see
//! [`crate::config`]); the flags here override both.
//!
//! # Exit Status
//!
//! `0` on success, `1` on any error and when a predicate option
//! (`--exists`, `--atleast-version`, `--uninstalled`, ...) does not hold.

mod query;


use anyhow::{Result, bail};
use clap::Parser;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub use query::Query;

/// Main CLI structure for pkgmeta.
#[derive(Parser, Debug)]
#[command(
    name = "pkgmeta",
    about = "Query compiler and linker flags of installed components",
    version,
    long_about = "pkgmeta reads .pc metadata files, resolves their dependencies and prints \
                  deduplicated compiler and linker flags."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Modules to query, in module-list syntax
    #[arg(value_name = "MODULES")]
    pub(crate) modules: Vec<String>,

    /// Print all compiler flags
    #[arg(long)]
    pub(crate) cflags: bool,

    /// Print only include path flags
    #[arg(long = "cflags-only-I")]
    pub(crate) cflags_only_include: bool,

    /// Print compiler flags other than include paths
    #[arg(long)]
    pub(crate) cflags_only_other: bool,

    /// Print all linker flags
    #[arg(long)]
    pub(crate) libs: bool,

    /// Print only `-l` flags
    #[arg(long = "libs-only-l")]
    pub(crate) libs_only_names: bool,

    /// Print only `-L` flags
    #[arg(long = "libs-only-L")]
    pub(crate) libs_only_paths: bool,

    /// Print linker flags other than `-l` and `-L`
    #[arg(long)]
    pub(crate) libs_only_other: bool,

    /// Output flags for static linking
    #[arg(long = "static")]
    pub(crate) static_linking: bool,

    /// Print the version of each module
    #[arg(long)]
    pub(crate) modversion: bool,

    /// Print the value of a variable of each module
    #[arg(long, value_name = "NAME")]
    pub(crate) variable: Option<String>,

    /// Define a global variable, overriding package variables
    #[arg(long = "define-variable", value_name = "NAME=VALUE")]
    pub(crate) define_variable: Vec<String>,

    /// Succeed if every module exists (and satisfies its constraint)
    #[arg(long)]
    pub(crate) exists: bool,

    /// Succeed if every module is at least this version
    #[arg(long, value_name = "VERSION")]
    pub(crate) atleast_version: Option<String>,

    /// Succeed if every module is exactly this version
    #[arg(long, value_name = "VERSION")]
    pub(crate) exact_version: Option<String>,

    /// Succeed if every module is at most this version
    #[arg(long, value_name = "VERSION")]
    pub(crate) max_version: Option<String>,

    /// List every package in the search path
    #[arg(long)]
    pub(crate) list_all: bool,

    /// Succeed if any uninstalled package is used
    #[arg(long)]
    pub(crate) uninstalled: bool,

    /// Never prefer uninstalled packages
    #[arg(long)]
    pub(crate) disable_uninstalled: bool,

    /// Warn about malformed metadata instead of failing
    #[arg(long)]
    pub(crate) permissive: bool,

    /// Derive the prefix variable from the metadata file location
    #[arg(long)]
    pub(crate) define_prefix: bool,

    /// Spell library flags for the MSVC toolchain
    #[arg(long)]
    pub(crate) msvc_syntax: bool,

    /// Print the public dependencies of each module
    #[arg(long)]
    pub(crate) print_requires: bool,

    /// Print the private dependencies of each module
    #[arg(long)]
    pub(crate) print_requires_private: bool,

    /// Log resolution details to stderr
    #[arg(long, conflicts_with = "quiet")]
    pub(crate) debug: bool,

    /// Log only errors
    #[arg(long)]
    pub(crate) quiet: bool,

    /// Path to a config file
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
}

impl Cli {
    /// Run with the process config and environment, writing to stdout.
    ///
    /// Returns whether the command succeeded; `false` maps to exit status 1
    /// without an error message.
    ///
    /// # Errors
    ///
    /// Returns configuration, resolution and output errors.
    pub fn execute(self) -> Result<bool> {
        self.init_logging();

        let mut config = Config::load(self.config.as_deref())?;
        config.apply_env();

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.execute_with_config(config, &mut out)
    }

    /// Run against an already layered `config`, writing results to `out`.
    ///
    /// # Errors
    ///
    /// Returns configuration, resolution and output errors.
    pub fn execute_with_config(self, mut config: Config, out: &mut dyn Write) -> Result<bool> {
        self.apply_to_config(&mut config);

        let static_linking = config.static_linking;
        let mut resolver = config.into_resolver()?;
        for definition in &self.define_variable {
            let Some((name, value)) = definition.split_once('=') else {
                bail!("--define-variable argument does not have a value for the variable: '{definition}'");
            };
            resolver.define_global_variable(name.trim(), value.trim())?;
        }

        if self.list_all {
            query::list_all(&mut resolver, out)?;
            return Ok(true);
        }

        if self.modules.is_empty() {
            bail!("Must specify package names on the command line");
        }

        debug!("Querying modules: {}", self.modules.join(" "));
        Query::new(&self, static_linking).run(&mut resolver, out)
    }

    /// Layer the command-line switches over `config`.
    pub fn apply_to_config(&self, config: &mut Config) {
        if self.permissive {
            config.strict = false;
        }
        if self.disable_uninstalled {
            config.disable_uninstalled = true;
        }
        if self.define_prefix {
            config.define_prefix = true;
        }
        if self.msvc_syntax {
            config.msvc_syntax = true;
        }
        if self.static_linking {
            config.static_linking = true;
        }
    }

    fn init_logging(&self) {
        let filter = if self.debug {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(std::io::stderr().is_terminal())
            .without_time()
            .try_init();
    }
}
