//! Constraint verification for freshly resolved packages.
//!
//! A package is checked once, after its dependencies are linked and before it
//! is published into the graph:
//!
//! 1. `key`, `Name`, `Version` and `Description` must be present.
//! 2. Every `Requires` and `Requires.private` entry must be satisfied by the
//!    package it resolved to, entry by entry.
//! 3. No package reachable through `Requires` edges (the package itself
//!    included) may match a `Conflicts` entry declared anywhere in that same
//!    reachable set.

use tracing::debug;

use crate::core::{PkgError, Result};
use crate::package::{Package, PackageGraph, RequiredVersion};

/// Check `pkg` against its already-published dependencies in `graph`.
///
/// # Errors
///
/// - [`PkgError::InternalInvariant`] when the package has no key
/// - [`PkgError::MissingRequiredField`] when `Name`, `Version` or `Description` is absent
/// - [`PkgError::VersionMismatch`] when a declared constraint is unmet
/// - [`PkgError::ConflictDetected`] when a transitive conflict matches
pub fn verify_package(graph: &PackageGraph, pkg: &Package) -> Result<()> {
    check_required_fields(pkg)?;
    check_required_versions(graph, pkg)?;
    check_conflicts(graph, pkg)
}

fn check_required_fields(pkg: &Package) -> Result<()> {
    if pkg.key.is_empty() {
        return Err(PkgError::InternalInvariant {
            message: "package with no key".to_string(),
        });
    }

    let missing = |field: &'static str, package: &str| PkgError::MissingRequiredField {
        field,
        package: package.to_string(),
    };

    if pkg.name.is_none() {
        return Err(missing("Name", &pkg.key));
    }
    if pkg.version.is_none() {
        return Err(missing("Version", pkg.name()));
    }
    if pkg.description.is_none() {
        return Err(missing("Description", pkg.name()));
    }
    Ok(())
}

fn check_required_versions(graph: &PackageGraph, pkg: &Package) -> Result<()> {
    let public = pkg.requires_entries.iter().zip(&pkg.requires);
    let private = pkg.requires_private_entries.iter().zip(&pkg.requires_private);

    for (entry, &id) in public.chain(private) {
        let dep = &graph[id];
        if entry.matches(dep.version()) {
            continue;
        }

        return Err(PkgError::VersionMismatch {
            package: pkg.name().to_string(),
            dependency: entry.name.clone(),
            comparison: entry.comparison,
            required: entry.version.clone().unwrap_or_default(),
            found_name: dep.name().to_string(),
            found_version: dep.version().to_string(),
        });
    }
    Ok(())
}

/// Every package reachable from `pkg` through public `Requires`, depth first,
/// `pkg` itself first. Packages reached along several paths appear repeatedly.
fn all_required<'a>(graph: &'a PackageGraph, pkg: &'a Package) -> Vec<&'a Package> {
    fn walk<'a>(graph: &'a PackageGraph, pkg: &'a Package, out: &mut Vec<&'a Package>) {
        for &id in &pkg.requires {
            let dep = &graph[id];
            out.push(dep);
            walk(graph, dep, out);
        }
    }

    let mut out = vec![pkg];
    walk(graph, pkg, &mut out);
    out
}

fn check_conflicts(graph: &PackageGraph, pkg: &Package) -> Result<()> {
    let required = all_required(graph, pkg);
    let conflicts: Vec<(&RequiredVersion, &Package)> = required
        .iter()
        .flat_map(|owner| owner.conflicts.iter().map(move |conflict| (conflict, *owner)))
        .collect();

    for dep in &required {
        for &(conflict, owner) in &conflicts {
            let names_match = conflict.name == dep.key || conflict.name == dep.name();
            if names_match && conflict.matches(dep.version()) {
                return Err(PkgError::ConflictDetected {
                    name: dep.name().to_string(),
                    version: dep.version().to_string(),
                    conflict_name: conflict.name.clone(),
                    comparison: conflict.comparison,
                    conflict_version: conflict.version.clone().unwrap_or_default(),
                    owner_name: owner.name().to_string(),
                    owner_version: owner.version().to_string(),
                });
            }
        }
    }

    debug!(
        "Package '{}' verified against {} required packages and {} conflicts",
        pkg.key,
        required.len(),
        conflicts.len()
    );
    Ok(())
}
