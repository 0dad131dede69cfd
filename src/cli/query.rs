//! Module queries behind the `pkgmeta` command.

use anyhow::{Result, bail};
use std::io::Write;
use tracing::debug;

use super::Cli;
use crate::flags::FlagAggregator;
use crate::package::{PackageGraph, PackageId, RequiredVersion};
use crate::parser::{module_list::parse_module_list, parse_package_variable};
use crate::resolver::Resolver;
use crate::version::{Comparison, satisfies};

const COMMAND_LINE: &str = "command line";

/// What to compute for the modules named on the command line.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    modules: &'a [String],
    cli: &'a Cli,
    static_linking: bool,
}

impl<'a> Query<'a> {
    /// Build a query from parsed arguments and the effective static linking
    /// setting.
    #[must_use]
    pub fn new(cli: &'a Cli, static_linking: bool) -> Self {
        Self {
            modules: &cli.modules,
            cli,
            static_linking,
        }
    }

    const fn is_predicate(&self) -> bool {
        self.cli.exists
            || self.cli.uninstalled
            || self.cli.atleast_version.is_some()
            || self.cli.exact_version.is_some()
            || self.cli.max_version.is_some()
    }

    const fn wants_cflags(&self) -> bool {
        self.cli.cflags || self.cli.cflags_only_include || self.cli.cflags_only_other
    }

    const fn wants_libs(&self) -> bool {
        self.cli.libs || self.cli.libs_only_names || self.cli.libs_only_paths || self.cli.libs_only_other
    }

    /// Resolve the requested modules and write the requested output.
    ///
    /// Returns `false` when a predicate option does not hold. Predicates
    /// produce no output.
    ///
    /// # Errors
    ///
    /// Resolution and constraint failures, unless a predicate option is set;
    /// write failures always.
    pub fn run(&self, resolver: &mut Resolver, out: &mut dyn Write) -> Result<bool> {
        let ids = match self.resolve_modules(resolver) {
            Ok(ids) => ids,
            Err(err) if self.is_predicate() => {
                debug!("Predicate fails: {err}");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        let graph = resolver.graph();

        if let Some(bound) = self.version_bound() {
            let (comparison, version) = bound;
            debug!("Checking modules against '{comparison} {version}'");
            return Ok(ids.iter().all(|&id| satisfies(comparison, graph[id].version(), version)));
        }

        if self.cli.uninstalled {
            return Ok(any_uninstalled(graph, &ids));
        }

        if self.cli.exists {
            return Ok(true);
        }

        if self.cli.modversion {
            for &id in &ids {
                writeln!(out, "{}", graph[id].version())?;
            }
        }

        if self.cli.print_requires {
            for &id in &ids {
                for entry in &graph[id].requires_entries {
                    writeln!(out, "{entry}")?;
                }
            }
        }

        if self.cli.print_requires_private {
            for &id in &ids {
                for entry in &graph[id].requires_private_entries {
                    writeln!(out, "{entry}")?;
                }
            }
        }

        if let Some(name) = &self.cli.variable {
            let values: Vec<String> = ids
                .iter()
                .filter_map(|&id| parse_package_variable(&graph[id], name, resolver.globals()))
                .collect();
            writeln!(out, "{}", values.join(" "))?;
        }

        if self.wants_cflags() || self.wants_libs() {
            let aggregator = FlagAggregator::new(graph).static_linking(self.static_linking);
            writeln!(out, "{}", self.flag_line(&aggregator, &ids))?;
        }

        Ok(true)
    }

    fn version_bound(&self) -> Option<(Comparison, &str)> {
        let cli = self.cli;
        cli.atleast_version
            .as_deref()
            .map(|v| (Comparison::GreaterThanEqual, v))
            .or_else(|| cli.exact_version.as_deref().map(|v| (Comparison::Equal, v)))
            .or_else(|| cli.max_version.as_deref().map(|v| (Comparison::LessThanEqual, v)))
    }

    fn resolve_modules(&self, resolver: &mut Resolver) -> Result<Vec<PackageId>> {
        let requested = parse_module_list(
            &self.modules.join(" "),
            COMMAND_LINE,
            COMMAND_LINE,
            COMMAND_LINE,
            &resolver.options().parse,
        )?;

        if requested.is_empty() {
            bail!("Must specify package names on the command line");
        }

        let mut ids = Vec::with_capacity(requested.len());
        for entry in &requested {
            let id = resolver.resolve(&entry.name)?;
            check_requested(resolver.graph(), id, entry)?;
            ids.push(id);
        }
        Ok(ids)
    }

    fn flag_line(&self, aggregator: &FlagAggregator<'_>, ids: &[PackageId]) -> String {
        let cli = self.cli;
        let mut parts = Vec::new();

        if cli.cflags {
            parts.push(aggregator.all_cflags(ids));
        } else {
            if cli.cflags_only_other {
                parts.push(aggregator.other_cflags(ids));
            }
            if cli.cflags_only_include {
                parts.push(aggregator.include_paths(ids));
            }
        }

        if cli.libs {
            parts.push(aggregator.all_libs(ids));
        } else {
            if cli.libs_only_other {
                parts.push(aggregator.other_libs(ids));
            }
            if cli.libs_only_paths {
                parts.push(aggregator.library_paths(ids));
            }
            if cli.libs_only_names {
                parts.push(aggregator.library_names(ids));
            }
        }

        parts.retain(|part| !part.is_empty());
        parts.join(" ")
    }
}

/// Fail if the resolved package does not satisfy the command-line constraint.
fn check_requested(graph: &PackageGraph, id: PackageId, entry: &RequiredVersion) -> Result<()> {
    let pkg = &graph[id];
    if entry.matches(pkg.version()) {
        return Ok(());
    }
    bail!("Requested '{entry}' but version of {} is {}", pkg.name(), pkg.version())
}

fn any_uninstalled(graph: &PackageGraph, ids: &[PackageId]) -> bool {
    ids.iter().any(|&id| {
        let pkg = &graph[id];
        pkg.uninstalled || any_uninstalled(graph, &pkg.requires)
    })
}

/// Print one row per package the resolver can find.
///
/// # Errors
///
/// Returns write failures.
pub fn list_all(resolver: &mut Resolver, out: &mut dyn Write) -> Result<()> {
    let rows = resolver.list_all();
    let width = rows.iter().map(|row| row.key.len()).max().unwrap_or(0);

    for row in rows {
        writeln!(out, "{:width$} {} - {}", row.key, row.name, row.description)?;
    }
    Ok(())
}
