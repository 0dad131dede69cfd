//! Metadata file discovery.
//!
//! [`SearchPath`] indexes the `*.pc` files of an ordered list of directories.
//! Directories are scanned non-recursively; when two directories contain a
//! file for the same package, the earlier directory wins.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::{PC_EXTENSION, UNINSTALLED_MARKER};

/// Name → metadata file lookup consulted by the resolver.
pub trait Locator {
    /// Path of the installed metadata file for `name`, if known.
    fn locate(&self, name: &str) -> Option<PathBuf>;

    /// Every package name this locator knows about, in discovery order.
    fn names(&self) -> Vec<String>;
}

/// Whether `name` looks like a path to a metadata file rather than a package name.
#[must_use]
pub fn is_metadata_path(name: &str) -> bool {
    name.len() > PC_EXTENSION.len() && name.ends_with(PC_EXTENSION)
}

/// Whether `name` already denotes an uninstalled variant.
#[must_use]
pub fn is_uninstalled_name(name: &str) -> bool {
    name.len() > UNINSTALLED_MARKER.len() && name.ends_with(UNINSTALLED_MARKER)
}

/// Package key for a metadata file path: the file name without its extension.
#[must_use]
pub fn key_from_path(path: &str) -> String {
    let file_name = Path::new(path).file_name().map_or_else(|| path.into(), |name| name.to_string_lossy());
    file_name.strip_suffix(PC_EXTENSION).unwrap_or(&file_name).to_string()
}

/// Ordered set of directories searched for metadata files.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
    locations: IndexMap<String, PathBuf>,
}

impl SearchPath {
    /// Scan `dirs` in order and index every metadata file found.
    ///
    /// Unreadable directories are skipped.
    pub fn scan<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut search_path = Self::default();
        for dir in dirs {
            search_path.add_dir(dir.into());
        }
        search_path
    }

    fn add_dir(&mut self, dir: PathBuf) {
        if !dir.is_dir() {
            debug!("Cannot open directory '{}' in package search path", dir.display());
            self.dirs.push(dir);
            return;
        }

        debug!("Scanning directory '{}'", dir.display());

        let entries = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok);

        for entry in entries {
            let file_name = entry.file_name().to_string_lossy();

            if !is_metadata_path(&file_name) || entry.file_type().is_dir() {
                debug!("Ignoring file '{file_name}' in search directory; not a {PC_EXTENSION} file");
                continue;
            }

            let name = &file_name[..file_name.len() - PC_EXTENSION.len()];
            if self.locations.contains_key(name) {
                debug!("File '{file_name}' ignored, we already know about package '{name}'");
                continue;
            }

            debug!("Will find package '{name}' in file '{}'", entry.path().display());
            self.locations.insert(name.to_string(), entry.path().to_path_buf());
        }

        self.dirs.push(dir);
    }

    /// Directories in search order.
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Number of indexed packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether no metadata file was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Locator for SearchPath {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.locations.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.locations.keys().cloned().collect()
    }
}
