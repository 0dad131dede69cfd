//! Test utilities for pkgmeta
//!
//! Helpers for writing `.pc` files into throwaway directories and for turning
//! on logging inside tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use pkgmeta_cli::test_utils::PcFixture;
//!
//! let fixture = PcFixture::new();
//! fixture.package("zlib", "1.3", "Libs: -lz\n");
//!
//! let mut resolver = fixture.resolver();
//! let id = resolver.resolve("zlib").unwrap();
//! assert_eq!(resolver.graph()[id].version(), "1.3");
//! ```

use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::resolver::{Resolver, SearchPath};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` if given, else `RUST_LOG` if set; otherwise logging stays
/// off. Only the first call has any effect.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// A temporary metadata directory.
///
/// Panics on I/O failure; it only exists for tests.
#[derive(Debug)]
pub struct PcFixture {
    dir: TempDir,
}

impl Default for PcFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl PcFixture {
    /// Create an empty metadata directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Directory holding the metadata files.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `file` inside the fixture, creating parent
    /// directories as needed.
    pub fn write(&self, file: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.dir.path().join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Write `<name>.pc` with `Name`, `Version` and a `Description` of
    /// `"<name> package"`, followed by `extra`.
    pub fn package(&self, name: &str, version: &str, extra: &str) -> PathBuf {
        let contents = format!("Name: {name}\nVersion: {version}\nDescription: {name} package\n{extra}");
        self.write(format!("{name}.pc"), &contents)
    }

    /// A resolver searching only this fixture's directory.
    #[must_use]
    pub fn resolver(&self) -> Resolver {
        Resolver::new(SearchPath::scan([self.dir.path()]))
    }
}
