//! Shared helpers for running the `pkgmeta` binary.

use assert_cmd::Command;
use std::path::Path;

/// A `pkgmeta` command that only sees `libdir`.
///
/// The user's config file and any inherited `PKG_CONFIG_*` variables are
/// masked so tests behave the same on every machine.
pub fn pkgmeta(libdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pkgmeta").unwrap();
    cmd.env("PKG_CONFIG_LIBDIR", libdir)
        .env("PKGMETA_CONFIG", libdir.join("no-such-config.toml"))
        .env_remove("PKG_CONFIG_PATH")
        .env_remove("PKG_CONFIG_DISABLE_UNINSTALLED")
        .env_remove("RUST_LOG");
    cmd
}
