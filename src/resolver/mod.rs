//! Dependency resolution.
//!
//! [`Resolver`] is the explicit context every lookup goes through. It owns the
//! package arena, the global variable table and the parse options, and talks
//! to two collaborators:
//!
//! - a [`Locator`] mapping package names to installed metadata files
//! - an optional [`LegacyProvider`] consulted when no metadata file exists
//!
//! # Resolution
//!
//! Resolving a name:
//!
//! 1. returns the published package if the name was resolved before
//! 2. treats names ending in `.pc` as file paths
//! 3. prefers `<name>-uninstalled` when such a package exists (unless
//!    disabled, or the name already is an uninstalled variant)
//! 4. asks the locator, then the legacy provider
//! 5. parses the file, resolves every `Requires` and `Requires.private`
//!    entry recursively, verifies the result and publishes it
//!
//! Each lookup name is parsed at most once per resolver. Nothing is published
//! for a name whose resolution failed, so a failed lookup can be retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use pkgmeta_cli::resolver::{Resolver, SearchPath};
//!
//! # fn example() -> pkgmeta_cli::core::Result<()> {
//! let mut resolver = Resolver::new(SearchPath::scan(["/usr/lib/pkgconfig"]));
//! let id = resolver.resolve("glib-2.0")?;
//! println!("{}", resolver.graph()[id].version());
//! # Ok(())
//! # }
//! ```

pub mod locator;
pub mod verify;

use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::constants::{UNINSTALLED_FILE_MARKER, UNINSTALLED_SUFFIX};
use crate::core::{PkgError, Result};
use crate::package::{Package, PackageGraph, PackageId, RequiredVersion};
use crate::parser::{ParseContext, ParseOptions, parse_metadata_file};
use crate::version::Comparison;

pub use locator::{Locator, SearchPath};

/// Fallback source for packages that have no metadata file.
///
/// Packages returned here are used as-is: they are neither parsed nor
/// verified, and the resolver does not publish them under their name. Each
/// name is asked for at most once per resolver.
pub trait LegacyProvider {
    /// Build a package for `name`, if this provider knows it.
    fn lookup(&self, name: &str) -> Option<Package>;
}

/// Behaviour switches for a [`Resolver`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    /// How metadata files are parsed
    pub parse: ParseOptions,
    /// Never prefer `<name>-uninstalled` packages
    pub disable_uninstalled: bool,
}

/// One row of [`Resolver::list_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    /// Package key
    pub key: String,
    /// `Name:` field
    pub name: String,
    /// `Description:` field
    pub description: String,
}

/// Resolution context: package arena, global variables and collaborators.
pub struct Resolver {
    graph: PackageGraph,
    globals: IndexMap<String, String>,
    options: ResolverOptions,
    locator: Box<dyn Locator>,
    legacy: Option<Box<dyn LegacyProvider>>,
    legacy_ids: HashMap<String, PackageId>,
    in_flight: Vec<String>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("packages", &self.graph.len())
            .field("globals", &self.globals)
            .field("options", &self.options)
            .field("legacy", &self.legacy.is_some())
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Create a resolver with default options and no legacy provider.
    pub fn new(locator: impl Locator + 'static) -> Self {
        Self {
            graph: PackageGraph::new(),
            globals: IndexMap::new(),
            options: ResolverOptions::default(),
            locator: Box::new(locator),
            legacy: None,
            legacy_ids: HashMap::new(),
            in_flight: Vec::new(),
        }
    }

    /// Replace the resolver options.
    #[must_use]
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Install a fallback provider for packages without metadata files.
    #[must_use]
    pub fn with_legacy_provider(mut self, provider: impl LegacyProvider + 'static) -> Self {
        self.legacy = Some(Box::new(provider));
        self
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// The arena of every package resolved so far.
    #[must_use]
    pub const fn graph(&self) -> &PackageGraph {
        &self.graph
    }

    /// Global variables in definition order.
    #[must_use]
    pub const fn globals(&self) -> &IndexMap<String, String> {
        &self.globals
    }

    /// Define a process-wide variable that overrides package variables.
    ///
    /// # Errors
    ///
    /// Fails with [`PkgError::DuplicateGlobalVariable`] if `name` is already defined.
    pub fn define_global_variable(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        let value = value.into();

        if self.globals.contains_key(&name) {
            return Err(PkgError::DuplicateGlobalVariable {
                name,
            });
        }

        debug!("Global variable definition '{name}' = '{value}'");
        self.globals.insert(name, value);
        Ok(())
    }

    /// Value of `name` for package `id`: globals first, then the package.
    #[must_use]
    pub fn variable(&self, id: PackageId, name: &str) -> Option<String> {
        self.globals.get(name).cloned().or_else(|| self.graph.get(id)?.variable(name))
    }

    /// Resolve `name` to a published (or legacy) package.
    ///
    /// # Errors
    ///
    /// Fails with [`PkgError::NotFound`] when nothing provides the package, and
    /// with any parse, dependency or verification error along the way.
    pub fn resolve(&mut self, name: &str) -> Result<PackageId> {
        self.resolve_internal(name, true, true)?.ok_or_else(|| PkgError::NotFound {
            name: name.to_string(),
        })
    }

    fn resolve_internal(&mut self, name: &str, warn_if_missing: bool, allow_legacy: bool) -> Result<Option<PackageId>> {
        if let Some(id) = self.graph.lookup(name) {
            return Ok(Some(id));
        }

        debug!("Looking for package '{name}'");

        let by_path = locator::is_metadata_path(name);
        let location = if by_path {
            debug!("Considering '{name}' to be a filename rather than a package name");
            Some(PathBuf::from(name))
        } else {
            if !self.options.disable_uninstalled && !locator::is_uninstalled_name(name) {
                let uninstalled = format!("{name}{UNINSTALLED_SUFFIX}");
                if let Some(id) = self.resolve_internal(&uninstalled, false, false)? {
                    debug!("Preferring uninstalled version of package '{name}'");
                    return Ok(Some(id));
                }
            }
            self.locator.locate(name)
        };

        let Some(location) = location else {
            if allow_legacy {
                if let Some(&id) = self.legacy_ids.get(name) {
                    return Ok(Some(id));
                }
                if let Some(pkg) = self.legacy.as_ref().and_then(|legacy| legacy.lookup(name)) {
                    debug!("Returning values for '{name}' from a legacy provider");
                    let id = self.graph.insert(pkg);
                    self.legacy_ids.insert(name.to_string(), id);
                    return Ok(Some(id));
                }
            }

            if warn_if_missing {
                return Err(PkgError::NotFound {
                    name: name.to_string(),
                });
            }
            return Ok(None);
        };

        if self.in_flight.iter().any(|pending| pending == name) {
            let mut chain = self.in_flight.clone();
            chain.push(name.to_string());
            return Err(PkgError::CircularDependency {
                chain: chain.join(" -> "),
            });
        }

        self.in_flight.push(name.to_string());
        let result = self.load(name, location, by_path);
        self.in_flight.pop();

        result.map(Some)
    }

    /// Parse, link, verify and publish the package at `location`.
    fn load(&mut self, name: &str, location: PathBuf, by_path: bool) -> Result<PackageId> {
        let key = if by_path {
            locator::key_from_path(name)
        } else {
            name.to_string()
        };

        debug!("Reading '{name}' from file '{}'", location.display());
        let ctx = ParseContext::new(&self.options.parse, &self.globals);
        let mut pkg = parse_metadata_file(&key, &location, ctx)?;

        if location.to_string_lossy().contains(UNINSTALLED_FILE_MARKER) {
            pkg.uninstalled = true;
        }

        for entry in pkg.requires_entries.clone() {
            let id = self.resolve(&entry.name)?;
            pkg.requires.push(id);
            record_required_version(&mut pkg, entry);
        }

        for entry in pkg.requires_private_entries.clone() {
            let id = self.resolve(&entry.name)?;
            pkg.requires_private.push(id);
            record_required_version(&mut pkg, entry);
        }

        verify::verify_package(&self.graph, &pkg)?;

        debug!("Adding '{key}' to list of known packages, returning as package '{name}'");
        let id = self.graph.insert(pkg);
        self.graph.register(key, id);
        self.graph.register(name, id);
        Ok(id)
    }

    /// Resolve every package the locator knows about.
    ///
    /// Packages that fail to resolve are reported and skipped. Rows are sorted
    /// by key.
    pub fn list_all(&mut self) -> Vec<PackageSummary> {
        let mut rows = Vec::new();

        for name in self.locator.names() {
            match self.resolve(&name) {
                Ok(id) => {
                    let pkg = &self.graph[id];
                    rows.push(PackageSummary {
                        key: name,
                        name: pkg.name().to_string(),
                        description: pkg.description().to_string(),
                    });
                }
                Err(err) => warn!("Skipping package '{name}': {err}"),
            }
        }

        rows.sort_by(|a, b| a.key.cmp(&b.key));
        rows
    }
}

/// Remember the constraint on `entry.name`; an unconstrained entry never
/// replaces a constrained one.
fn record_required_version(pkg: &mut Package, entry: RequiredVersion) {
    let keeps_existing = entry.comparison == Comparison::AlwaysMatch
        && pkg
            .required_versions
            .get(&entry.name)
            .is_some_and(|existing| existing.comparison != Comparison::AlwaysMatch);

    if !keeps_existing {
        pkg.required_versions.insert(entry.name.clone(), entry);
    }
}
