//! Package graph model.
//!
//! A [`Package`] is one parsed metadata file. Packages reference each other
//! through [`PackageId`] indices into a [`PackageGraph`] arena rather than
//! through owning pointers, so the `Requires` graph and the `Conflicts`
//! back-references never form reference cycles. The resolver's cache *is* the
//! arena: once a package is inserted it is only ever handed out by shared
//! reference.
//!
//! # Lifecycle
//!
//! 1. The parser builds a `Package` and fills its scalar fields, variables,
//!    dependency entries and flags.
//! 2. The resolver links `requires`/`requires_private` to resolved ids and
//!    fills `required_versions`.
//! 3. After verification the package is inserted into the graph and becomes
//!    read-only, apart from its memoized merged flag strings.

use indexmap::IndexMap;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::path::{Path, PathBuf};

use crate::constants::PCFILEDIR_VARIABLE;
use crate::version::{Comparison, satisfies};

/// Index of a package inside a [`PackageGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(usize);

impl PackageId {
    /// Position of the package in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Classification of one compiler or linker token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    /// `-lfoo` (or `foo.lib` with MSVC syntax)
    LibraryName,
    /// `-L/dir` (or `/libpath:dir` with MSVC syntax)
    LibraryPath,
    /// `-I/dir`, `-isystem dir`, `-idirafter dir`
    IncludePath,
    /// Anything else, passed through verbatim
    Other,
}

/// One classified, shell-escaped flag.
///
/// `text` may span two arguments for joined options such as
/// `-framework Cocoa` or `-isystem /opt/include`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Flag {
    /// What kind of flag this is
    pub kind: FlagKind,
    /// The fully formed flag text
    pub text: String,
}

impl Flag {
    /// Create a flag of the given kind.
    pub fn new(kind: FlagKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One `name [op version]` entry of a `Requires`, `Requires.private` or
/// `Conflicts` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredVersion {
    /// Lookup name of the dependency
    pub name: String,
    /// Constraint operator
    pub comparison: Comparison,
    /// Constraint operand, absent iff `comparison` is always-match
    pub version: Option<String>,
    /// Key of the package that declared the entry
    pub owner: String,
}

impl RequiredVersion {
    /// An unconstrained entry.
    pub fn any(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comparison: Comparison::AlwaysMatch,
            version: None,
            owner: owner.into(),
        }
    }

    /// Whether `version` satisfies this constraint.
    #[must_use]
    pub fn matches(&self, version: &str) -> bool {
        satisfies(self.comparison, version, self.version.as_deref().unwrap_or_default())
    }
}

impl fmt::Display for RequiredVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {} {}", self.name, self.comparison, version),
            None => f.write_str(&self.name),
        }
    }
}

/// One resolved metadata unit.
#[derive(Debug, Default)]
pub struct Package {
    /// Unique identifier: the lookup name, or the file stem for path lookups
    pub key: String,
    /// `Name:` field
    pub name: Option<String>,
    /// `Version:` field
    pub version: Option<String>,
    /// `Description:` field
    pub description: Option<String>,
    /// `URL:` field
    pub url: Option<String>,
    /// Variables in declaration order; always contains `pcfiledir`
    pub variables: IndexMap<String, String>,
    /// Directory containing the metadata file
    pub metadata_dir: PathBuf,
    /// `Requires:` entries in file order
    pub requires_entries: Vec<RequiredVersion>,
    /// `Requires.private:` entries in file order
    pub requires_private_entries: Vec<RequiredVersion>,
    /// `Conflicts:` entries in file order
    pub conflicts: Vec<RequiredVersion>,
    /// Resolved public dependencies, one per `requires_entries` item
    pub requires: Vec<PackageId>,
    /// Resolved private dependencies, one per `requires_private_entries` item
    pub requires_private: Vec<PackageId>,
    /// Constraint per dependency name across public and private entries
    pub required_versions: HashMap<String, RequiredVersion>,
    /// `Cflags:` flags in file order
    pub cflags: Vec<Flag>,
    /// `Libs:` flags in file order
    pub libs: Vec<Flag>,
    /// `Libs.private:` flags in file order
    pub libs_private: Vec<Flag>,
    /// Sourced from an uninstalled-variant file
    pub uninstalled: bool,
    /// Value originally written for the prefix variable before redefinition
    pub(crate) orig_prefix: Option<String>,
    l_libs_merged: OnceCell<String>,
    i_cflags_merged: OnceCell<String>,
}

impl Package {
    /// Create an empty package for the file in `metadata_dir`.
    ///
    /// The implicit `pcfiledir` variable is defined immediately.
    pub fn new(key: impl Into<String>, metadata_dir: impl Into<PathBuf>) -> Self {
        let metadata_dir = metadata_dir.into();
        let mut variables = IndexMap::new();
        variables.insert(PCFILEDIR_VARIABLE.to_string(), metadata_dir.to_string_lossy().into_owned());

        Self {
            key: key.into(),
            variables,
            metadata_dir,
            ..Self::default()
        }
    }

    /// `Name:` or an empty string.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// `Version:` or an empty string.
    #[must_use]
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or_default()
    }

    /// `Description:` or an empty string.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Directory containing the metadata file.
    #[must_use]
    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    /// Look up a package variable, falling back to the implicit `pcfiledir`.
    ///
    /// Global variables are not consulted here; see
    /// [`Resolver::variable`](crate::resolver::Resolver::variable).
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned().or_else(|| {
            (name == PCFILEDIR_VARIABLE).then(|| self.metadata_dir.to_string_lossy().into_owned())
        })
    }

    /// Own `Libs:` flags of one kind, in file order.
    pub fn libs_of_kind(&self, kind: FlagKind) -> impl Iterator<Item = &Flag> {
        self.libs.iter().filter(move |flag| flag.kind == kind)
    }

    /// Own `Libs.private:` flags of one kind, in file order.
    pub fn libs_private_of_kind(&self, kind: FlagKind) -> impl Iterator<Item = &Flag> {
        self.libs_private.iter().filter(move |flag| flag.kind == kind)
    }

    /// Own `Cflags:` flags of one kind, in file order.
    pub fn cflags_of_kind(&self, kind: FlagKind) -> impl Iterator<Item = &Flag> {
        self.cflags.iter().filter(move |flag| flag.kind == kind)
    }

    pub(crate) const fn l_libs_merged(&self) -> &OnceCell<String> {
        &self.l_libs_merged
    }

    pub(crate) const fn i_cflags_merged(&self) -> &OnceCell<String> {
        &self.i_cflags_merged
    }
}

/// Arena of resolved packages with a lookup-name index.
///
/// Several lookup names may map to one package: the package key and, for
/// packages requested by file path, the path itself.
#[derive(Debug, Default)]
pub struct PackageGraph {
    packages: Vec<Package>,
    index: HashMap<String, PackageId>,
}

impl PackageGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package without making it findable by name.
    pub fn insert(&mut self, package: Package) -> PackageId {
        let id = PackageId(self.packages.len());
        self.packages.push(package);
        id
    }

    /// Make `id` findable under `name`. The first registration of a name wins.
    pub fn register(&mut self, name: impl Into<String>, id: PackageId) {
        self.index.entry(name.into()).or_insert(id);
    }

    /// Find a published package by lookup name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<PackageId> {
        self.index.get(name).copied()
    }

    /// Borrow a package.
    #[must_use]
    pub fn get(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(id.0)
    }

    /// Number of packages in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the arena holds no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate over packages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages.iter().enumerate().map(|(i, pkg)| (PackageId(i), pkg))
    }
}

impl Index<PackageId> for PackageGraph {
    type Output = Package;

    fn index(&self, id: PackageId) -> &Self::Output {
        &self.packages[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_package_defines_pcfiledir() {
        let pkg = Package::new("foo", "/usr/lib/pkgconfig");
        assert_eq!(pkg.variables.get("pcfiledir").map(String::as_str), Some("/usr/lib/pkgconfig"));
        assert_eq!(pkg.variable("pcfiledir").as_deref(), Some("/usr/lib/pkgconfig"));
        assert_eq!(pkg.variable("prefix"), None);
    }

    #[test]
    fn test_required_version_display() {
        let mut req = RequiredVersion::any("glib-2.0", "gtk");
        assert_eq!(req.to_string(), "glib-2.0");

        req.comparison = Comparison::GreaterThanEqual;
        req.version = Some("2.40".to_string());
        assert_eq!(req.to_string(), "glib-2.0 >= 2.40");
        assert!(req.matches("2.42.1"));
        assert!(!req.matches("2.38"));
    }

    #[test]
    fn test_graph_register_first_wins() {
        let mut graph = PackageGraph::new();
        let a = graph.insert(Package::new("a", "."));
        let b = graph.insert(Package::new("b", "."));

        graph.register("x", a);
        graph.register("x", b);

        assert_eq!(graph.lookup("x"), Some(a));
        assert_eq!(graph[b].key, "b");
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_flags_of_kind_preserve_order() {
        let mut pkg = Package::new("a", ".");
        pkg.libs = vec![
            Flag::new(FlagKind::LibraryName, "-la"),
            Flag::new(FlagKind::LibraryPath, "-L/x"),
            Flag::new(FlagKind::LibraryName, "-lb"),
        ];

        let names: Vec<_> = pkg.libs_of_kind(FlagKind::LibraryName).map(|f| f.text.as_str()).collect();
        assert_eq!(names, ["-la", "-lb"]);
    }
}
