//! Compiler and linker flag aggregation.
//!
//! Flags are collected depth first over the dependency graph: a package's own
//! flags come before those of the packages it requires. Two deduplication
//! policies are then applied depending on the flag kind:
//!
//! - **front-preserving** for `-L` and `-I`: the first occurrence of each flag
//!   wins, so search paths keep the priority of the package that named them
//!   first
//! - **back-preserving** for `-l`: the last occurrence wins, so a library
//!   still appears after every library that depends on it
//!
//! "Other" flags are passed through in collection order without
//! deduplication, since their meaning can depend on repetition and position.
//!
//! ```rust
//! use pkgmeta_cli::flags::{strip_duplicates, strip_duplicates_from_back};
//!
//! let flags = ["A", "B", "A", "C", "B"];
//! assert_eq!(strip_duplicates(&flags), ["A", "B", "C"]);
//! assert_eq!(strip_duplicates_from_back(&flags), ["A", "C", "B"]);
//! ```

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::package::{Flag, FlagKind, Package, PackageGraph, PackageId};

/// Keep the first occurrence of every distinct flag.
#[must_use]
pub fn strip_duplicates<'a>(flags: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    flags.iter().copied().filter(|flag| seen.insert(*flag)).collect()
}

/// Keep the last occurrence of every distinct flag, at its original position.
#[must_use]
pub fn strip_duplicates_from_back<'a>(flags: &[&'a str]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut kept: Vec<&str> = flags.iter().rev().copied().filter(|flag| seen.insert(*flag)).collect();
    kept.reverse();
    kept
}

/// Which flag list of a package is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Libs,
    Cflags,
}

/// Collects flags for one or more resolved packages.
#[derive(Debug, Clone, Copy)]
pub struct FlagAggregator<'g> {
    graph: &'g PackageGraph,
    static_linking: bool,
}

impl<'g> FlagAggregator<'g> {
    /// Aggregate over packages in `graph`, following public `Requires` only.
    #[must_use]
    pub const fn new(graph: &'g PackageGraph) -> Self {
        Self {
            graph,
            static_linking: false,
        }
    }

    /// Also follow `Requires.private` and include `Libs.private`.
    #[must_use]
    pub const fn static_linking(mut self, enabled: bool) -> Self {
        self.static_linking = enabled;
        self
    }

    fn own_flags(&self, pkg: &'g Package, source: Source, kind: FlagKind) -> impl Iterator<Item = &'g Flag> {
        let (primary, private) = match source {
            Source::Cflags => (pkg.cflags.as_slice(), &[][..]),
            Source::Libs if self.static_linking => (pkg.libs.as_slice(), pkg.libs_private.as_slice()),
            Source::Libs => (pkg.libs.as_slice(), &[][..]),
        };

        primary.iter().chain(private).filter(move |flag| flag.kind == kind)
    }

    fn fill(&self, id: PackageId, source: Source, kind: FlagKind, out: &mut Vec<&'g str>) {
        let pkg = &self.graph[id];
        out.extend(self.own_flags(pkg, source, kind).map(|flag| flag.text.as_str()));

        for &dep in &pkg.requires {
            self.fill(dep, source, kind, out);
        }
        if self.static_linking {
            for &dep in &pkg.requires_private {
                self.fill(dep, source, kind, out);
            }
        }
    }

    fn collect(&self, roots: &[PackageId], source: Source, kind: FlagKind) -> Vec<&'g str> {
        let mut out = Vec::new();
        for &root in roots {
            self.fill(root, source, kind, &mut out);
        }
        out
    }

    /// `-l` flags, back-deduplicated.
    #[must_use]
    pub fn library_names(&self, roots: &[PackageId]) -> String {
        strip_duplicates_from_back(&self.collect(roots, Source::Libs, FlagKind::LibraryName)).join(" ")
    }

    /// `-L` flags, front-deduplicated.
    #[must_use]
    pub fn library_paths(&self, roots: &[PackageId]) -> String {
        strip_duplicates(&self.collect(roots, Source::Libs, FlagKind::LibraryPath)).join(" ")
    }

    /// Unclassified `Libs` flags in collection order.
    #[must_use]
    pub fn other_libs(&self, roots: &[PackageId]) -> String {
        self.collect(roots, Source::Libs, FlagKind::Other).join(" ")
    }

    /// `-I`, `-isystem` and `-idirafter` flags, front-deduplicated.
    #[must_use]
    pub fn include_paths(&self, roots: &[PackageId]) -> String {
        strip_duplicates(&self.collect(roots, Source::Cflags, FlagKind::IncludePath)).join(" ")
    }

    /// Unclassified `Cflags` flags in collection order.
    #[must_use]
    pub fn other_cflags(&self, roots: &[PackageId]) -> String {
        self.collect(roots, Source::Cflags, FlagKind::Other).join(" ")
    }

    /// Other flags, then library paths, then library names.
    #[must_use]
    pub fn all_libs(&self, roots: &[PackageId]) -> String {
        join_parts([self.other_libs(roots), self.library_paths(roots), self.library_names(roots)])
    }

    /// Other flags, then include paths.
    #[must_use]
    pub fn all_cflags(&self, roots: &[PackageId]) -> String {
        join_parts([self.other_cflags(roots), self.include_paths(roots)])
    }

    /// Merged `-l` flags of a single package and its dependencies.
    ///
    /// Computed once per package; static-linking aggregation bypasses the cache.
    #[must_use]
    pub fn package_library_names(&self, id: PackageId) -> String {
        if self.static_linking {
            return self.library_names(&[id]);
        }
        self.graph[id].l_libs_merged().get_or_init(|| self.library_names(&[id])).clone()
    }

    /// Merged include flags of a single package and its dependencies.
    ///
    /// Computed once per package.
    #[must_use]
    pub fn package_include_paths(&self, id: PackageId) -> String {
        if self.static_linking {
            return self.include_paths(&[id]);
        }
        self.graph[id].i_cflags_merged().get_or_init(|| self.include_paths(&[id])).clone()
    }
}

fn join_parts<const N: usize>(parts: [String; N]) -> String {
    parts.into_iter().filter(|part| !part.is_empty()).collect::<Vec<_>>().join(" ")
}

/// Space-joined value of `name` across `ids`; packages without it are skipped.
#[must_use]
pub fn packages_get_var(
    graph: &PackageGraph,
    globals: &IndexMap<String, String>,
    ids: &[PackageId],
    name: &str,
) -> String {
    ids.iter()
        .filter_map(|&id| globals.get(name).cloned().or_else(|| graph.get(id)?.variable(name)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(text: &str) -> Flag {
        let kind = if text.starts_with("-l") {
            FlagKind::LibraryName
        } else if text.starts_with("-L") {
            FlagKind::LibraryPath
        } else if text.starts_with("-I") {
            FlagKind::IncludePath
        } else {
            FlagKind::Other
        };
        Flag::new(kind, text)
    }

    fn add(graph: &mut PackageGraph, key: &str, libs: &[&str], cflags: &[&str], requires: &[&str]) -> PackageId {
        let mut pkg = Package::new(key, "/d");
        pkg.libs = libs.iter().map(|text| flag(text)).collect();
        pkg.cflags = cflags.iter().map(|text| flag(text)).collect();
        pkg.requires = requires.iter().map(|name| graph.lookup(name).unwrap()).collect();
        let id = graph.insert(pkg);
        graph.register(key, id);
        id
    }

    #[test]
    fn test_dedup_policies() {
        let flags = ["A", "B", "A", "C", "B"];
        assert_eq!(strip_duplicates(&flags), ["A", "B", "C"]);
        assert_eq!(strip_duplicates_from_back(&flags), ["A", "C", "B"]);
        assert!(strip_duplicates(&[]).is_empty());
    }

    #[test]
    fn test_library_names_keep_dependents_first() {
        let mut graph = PackageGraph::new();
        add(&mut graph, "glib", &["-lglib"], &[], &[]);
        add(&mut graph, "gobject", &["-lgobject", "-lglib"], &[], &["glib"]);
        let gio = add(&mut graph, "gio", &["-lgio"], &[], &["gobject", "glib"]);

        let agg = FlagAggregator::new(&graph);
        assert_eq!(agg.library_names(&[gio]), "-lgio -lgobject -lglib");
    }

    #[test]
    fn test_paths_keep_first_occurrence() {
        let mut graph = PackageGraph::new();
        add(&mut graph, "b", &["-L/b", "-L/shared"], &["-I/b", "-I/shared"], &[]);
        let a = add(&mut graph, "a", &["-L/shared", "-L/a"], &["-I/a", "-I/shared"], &["b"]);

        let agg = FlagAggregator::new(&graph);
        assert_eq!(agg.library_paths(&[a]), "-L/shared -L/a -L/b");
        assert_eq!(agg.include_paths(&[a]), "-I/a -I/shared -I/b");
    }

    #[test]
    fn test_other_flags_are_not_deduplicated() {
        let mut graph = PackageGraph::new();
        add(&mut graph, "b", &["-pthread"], &["-DB"], &[]);
        let a = add(&mut graph, "a", &["-pthread", "-lm"], &["-DA"], &["b"]);

        let agg = FlagAggregator::new(&graph);
        assert_eq!(agg.other_libs(&[a]), "-pthread -pthread");
        assert_eq!(agg.other_cflags(&[a]), "-DA -DB");
    }

    #[test]
    fn test_multiple_roots() {
        let mut graph = PackageGraph::new();
        let x = add(&mut graph, "x", &["-lx", "-lz"], &[], &[]);
        let y = add(&mut graph, "y", &["-ly", "-lz"], &[], &[]);

        let agg = FlagAggregator::new(&graph);
        assert_eq!(agg.library_names(&[x, y]), "-lx -ly -lz");
    }

    #[test]
    fn test_all_libs_and_cflags_ordering() {
        let mut graph = PackageGraph::new();
        let a = add(&mut graph, "a", &["-la", "-L/a", "-pthread"], &["-I/a", "-DA"], &[]);

        let agg = FlagAggregator::new(&graph);
        assert_eq!(agg.all_libs(&[a]), "-pthread -L/a -la");
        assert_eq!(agg.all_cflags(&[a]), "-DA -I/a");
    }

    #[test]
    fn test_empty_outputs() {
        let mut graph = PackageGraph::new();
        let a = add(&mut graph, "a", &[], &[], &[]);

        let agg = FlagAggregator::new(&graph);
        assert_eq!(agg.all_libs(&[a]), "");
        assert_eq!(agg.all_cflags(&[a]), "");
    }

    #[test]
    fn test_static_linking_follows_private_edges() {
        let mut graph = PackageGraph::new();
        let z = add(&mut graph, "z", &["-lz"], &[], &[]);
        let mut app = Package::new("app", "/d");
        app.libs = vec![flag("-lapp")];
        app.libs_private = vec![flag("-lm")];
        app.requires_private = vec![z];
        let app = graph.insert(app);

        assert_eq!(FlagAggregator::new(&graph).library_names(&[app]), "-lapp");
        assert_eq!(FlagAggregator::new(&graph).static_linking(true).library_names(&[app]), "-lapp -lm -lz");
    }

    #[test]
    fn test_per_package_merge_is_memoized() {
        let mut graph = PackageGraph::new();
        add(&mut graph, "b", &["-lb"], &["-I/b"], &[]);
        let a = add(&mut graph, "a", &["-la", "-lb"], &["-I/a"], &["b"]);

        let agg = FlagAggregator::new(&graph);
        assert_eq!(agg.package_library_names(a), "-la -lb");
        assert_eq!(graph[a].l_libs_merged().get().map(String::as_str), Some("-la -lb"));
        assert_eq!(agg.package_include_paths(a), "-I/a -I/b");
        assert_eq!(agg.package_include_paths(a), "-I/a -I/b");
    }

    #[test]
    fn test_packages_get_var() {
        let mut graph = PackageGraph::new();
        let mut a = Package::new("a", "/a");
        a.variables.insert("libdir".into(), "/a/lib".into());
        let a = graph.insert(a);
        let b = graph.insert(Package::new("b", "/b"));
        let mut c = Package::new("c", "/c");
        c.variables.insert("libdir".into(), "/c/lib".into());
        let c = graph.insert(c);

        let globals = IndexMap::new();
        assert_eq!(packages_get_var(&graph, &globals, &[a, b, c], "libdir"), "/a/lib /c/lib");
        assert_eq!(packages_get_var(&graph, &globals, &[a, b], "pcfiledir"), "/a /b");
        assert_eq!(packages_get_var(&graph, &globals, &[b], "libdir"), "");
    }
}
