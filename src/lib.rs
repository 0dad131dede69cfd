//! pkgmeta - component metadata resolver
//!
//! Reads `.pc` metadata files describing installed libraries, resolves their
//! dependencies and answers build-time questions about them: which compiler
//! and linker flags to use, which version is installed, what a variable is
//! set to.
//!
//! # Architecture Overview
//!
//! A query goes through four stages:
//!
//! 1. [`resolver::SearchPath`] indexes the metadata files found in the search
//!    directories, first directory winning
//! 2. [`parser`] turns a file into a [`package::Package`], expanding `${var}`
//!    references and classifying flags
//! 3. [`resolver::Resolver`] resolves each `Requires` entry recursively,
//!    verifies version constraints and conflicts, and publishes the package
//!    into a [`package::PackageGraph`]
//! 4. [`flags::FlagAggregator`] walks the graph and emits deduplicated flags
//!
//! # Core Modules
//!
//! - [`cli`] - The `pkgmeta` command line
//! - [`config`] - Config file and environment layering
//! - [`core`] - Error types and user-facing error display
//! - [`flags`] - Transitive flag collection and deduplication
//! - [`package`] - Package model and the package arena
//! - [`parser`] - Metadata file parsing, variable expansion, module lists
//! - [`resolver`] - Lookup, dependency resolution and verification
//! - [`version`] - Version comparison and constraint operators
//!
//! # Metadata File Format
//!
//! ```text
//! prefix=/usr
//! libdir=${prefix}/lib
//! includedir=${prefix}/include
//!
//! Name: libfoo
//! Description: The foo library
//! Version: 1.2.3
//! Requires: glib-2.0 >= 2.40
//! Requires.private: zlib
//! Conflicts: libfoo-legacy < 1.0
//! Libs: -L${libdir} -lfoo
//! Libs.private: -lm
//! Cflags: -I${includedir}/foo
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pkgmeta_cli::flags::FlagAggregator;
//! use pkgmeta_cli::resolver::{Resolver, SearchPath};
//!
//! # fn example() -> pkgmeta_cli::core::Result<()> {
//! let mut resolver = Resolver::new(SearchPath::scan(["/usr/lib/pkgconfig"]));
//! let id = resolver.resolve("libfoo")?;
//!
//! let flags = FlagAggregator::new(resolver.graph());
//! println!("{} {}", flags.all_cflags(&[id]), flags.all_libs(&[id]));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod flags;
pub mod package;
pub mod parser;
pub mod resolver;
pub mod version;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
