//! Config file, environment and command-line layering.

use pkgmeta_cli::config::Config;
use pkgmeta_cli::test_utils::PcFixture;
use predicates::prelude::*;
use serial_test::serial;
use std::path::PathBuf;

use crate::common::pkgmeta;

#[test]
fn test_pkg_config_path_searched_first() {
    let system = PcFixture::new();
    system.package("foo", "1.0", "");
    let overlay = PcFixture::new();
    overlay.package("foo", "2.0", "");

    pkgmeta(system.path())
        .env("PKG_CONFIG_PATH", overlay.path())
        .args(["--modversion", "foo"])
        .assert()
        .success()
        .stdout("2.0\n");
}

#[test]
fn test_libdir_replaces_system_dirs() {
    let empty = PcFixture::new();

    pkgmeta(empty.path())
        .args(["--exists", "definitely-not-installed-anywhere"])
        .assert()
        .failure();
}

#[test]
fn test_config_file_settings() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1", "prefix=/usr\nLibs: -L${prefix}/lib -lfoo\n");
    fixture.package("dup", "1", "Version: 2\n");

    let extra = PcFixture::new();
    extra.package("bar", "3", "");

    let config = fixture.write(
        "pkgmeta.toml",
        &format!(
            "search_paths = [{:?}]\nstrict = false\nmsvc_syntax = true\n\n[variables]\nprefix = \"/sys\"\n",
            extra.path().display().to_string()
        ),
    );

    pkgmeta(fixture.path())
        .arg("--config")
        .arg(&config)
        .args(["--libs", "foo"])
        .assert()
        .success()
        .stdout("/libpath:/sys/lib foo.lib\n");

    pkgmeta(fixture.path())
        .arg("--config")
        .arg(&config)
        .args(["--modversion", "bar", "dup"])
        .assert()
        .success()
        .stdout("3\n1\n");
}

#[test]
fn test_config_from_environment_variable() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1", "");
    let config = fixture.write("config.toml", "static_linking = true\n");
    fixture.package("bar", "1", "Libs: -lbar\nLibs.private: -lextra\n");

    pkgmeta(fixture.path())
        .env("PKGMETA_CONFIG", &config)
        .args(["--libs", "bar"])
        .assert()
        .success()
        .stdout("-lbar -lextra\n");
}

#[test]
fn test_invalid_config_is_reported() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1", "");
    let config = fixture.write("config.toml", "unknown_key = 1\n");

    pkgmeta(fixture.path())
        .arg("--config")
        .arg(&config)
        .args(["--modversion", "foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_missing_explicit_config_is_reported() {
    let fixture = PcFixture::new();

    pkgmeta(fixture.path())
        .args(["--config", "/nonexistent/pkgmeta.toml", "--modversion", "foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
#[serial]
fn test_apply_env_reads_process_environment() {
    let fixture = PcFixture::new();
    let saved = std::env::var_os("PKG_CONFIG_LIBDIR");

    // SAFETY: serialized with every other test touching the process environment
    unsafe {
        std::env::set_var("PKG_CONFIG_LIBDIR", fixture.path());
    }

    let mut config = Config::default();
    config.apply_env();
    assert_eq!(config.libdir, Some(vec![PathBuf::from(fixture.path())]));

    // SAFETY: as above
    unsafe {
        match saved {
            Some(value) => std::env::set_var("PKG_CONFIG_LIBDIR", value),
            None => std::env::remove_var("PKG_CONFIG_LIBDIR"),
        }
    }
}
