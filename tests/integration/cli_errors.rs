//! Exit codes and error reporting of the `pkgmeta` binary.

use pkgmeta_cli::test_utils::PcFixture;
use predicates::prelude::*;

use crate::common::pkgmeta;

#[test]
fn test_exists_exit_codes() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1.0", "");

    pkgmeta(fixture.path()).args(["--exists", "foo"]).assert().success().stdout("");
    pkgmeta(fixture.path()).args(["--exists", "foo >= 1.0"]).assert().success();
    pkgmeta(fixture.path()).args(["--exists", "foo > 1.0"]).assert().failure().code(1).stdout("");
    pkgmeta(fixture.path())
        .args(["--exists", "missing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error").not());
}

#[test]
fn test_version_predicates() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1.10", "");

    pkgmeta(fixture.path()).args(["--atleast-version", "1.9", "foo"]).assert().success();
    pkgmeta(fixture.path()).args(["--atleast-version", "1.11", "foo"]).assert().failure();
    pkgmeta(fixture.path()).args(["--exact-version", "1.10", "foo"]).assert().success();
    pkgmeta(fixture.path()).args(["--exact-version", "1.1", "foo"]).assert().failure();
    pkgmeta(fixture.path()).args(["--max-version", "2", "foo"]).assert().success();
    pkgmeta(fixture.path()).args(["--max-version", "1.9", "foo"]).assert().failure();
}

#[test]
fn test_not_found() {
    let fixture = PcFixture::new();

    pkgmeta(fixture.path())
        .args(["--libs", "nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Package nope was not found in the pkg-config search path."))
        .stderr(predicate::str::contains("PKG_CONFIG_PATH"));
}

#[test]
fn test_requested_version_mismatch() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1.0", "");

    pkgmeta(fixture.path())
        .args(["--libs", "foo >= 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Requested 'foo >= 2' but version of foo is 1.0"));
}

#[test]
fn test_dependency_version_mismatch() {
    let fixture = PcFixture::new();
    fixture.package("dep", "1.0", "");
    fixture.package("app", "1", "Requires: dep >= 2\n");

    pkgmeta(fixture.path())
        .args(["--cflags", "app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package 'app' requires 'dep >= 2' but version of dep is 1.0"));
}

#[test]
fn test_transitive_conflict() {
    let fixture = PcFixture::new();
    fixture.package("c", "1", "Conflicts: a < 99\n");
    fixture.package("b", "1", "Requires: c\n");
    fixture.package("a", "5", "Requires: b\n");

    pkgmeta(fixture.path())
        .args(["--libs", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Version 5 of a creates a conflict."))
        .stderr(predicate::str::contains("(a < 99 conflicts with c 1)"));
}

#[test]
fn test_circular_dependency() {
    let fixture = PcFixture::new();
    fixture.package("x", "1", "Requires: y\n");
    fixture.package("y", "1", "Requires: x\n");

    pkgmeta(fixture.path())
        .args(["--libs", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency detected: x -> y -> x"));
}

#[test]
fn test_missing_description() {
    let fixture = PcFixture::new();
    fixture.write("bare.pc", "Name: bare\nVersion: 1\n");

    pkgmeta(fixture.path())
        .args(["--modversion", "bare"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package 'bare' has no Description: field"));
}

#[test]
fn test_strict_and_permissive_parsing() {
    let fixture = PcFixture::new();
    fixture.package("dup", "1", "Version: 2\n");

    pkgmeta(fixture.path())
        .args(["--modversion", "dup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Version field occurs twice"));

    pkgmeta(fixture.path())
        .args(["--permissive", "--modversion", "dup"])
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("Version field occurs twice"));
}

#[test]
fn test_undefined_variable() {
    let fixture = PcFixture::new();
    fixture.package("undef", "1", "Libs: -L${nowhere}/lib\n");

    pkgmeta(fixture.path())
        .args(["--libs", "undef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Variable 'nowhere' not defined"));
}

#[test]
fn test_duplicate_global_variable() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1", "");

    pkgmeta(fixture.path())
        .args(["--define-variable=a=1", "--define-variable=a=2", "--modversion", "foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Variable 'a' defined twice globally"));
}

#[test]
fn test_no_modules() {
    let fixture = PcFixture::new();

    pkgmeta(fixture.path())
        .arg("--cflags")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Must specify package names on the command line"));
}

#[test]
fn test_quiet_suppresses_warnings() {
    let fixture = PcFixture::new();
    fixture.package("dup", "1", "Version: 2\n");

    pkgmeta(fixture.path())
        .args(["--permissive", "--quiet", "--modversion", "dup"])
        .assert()
        .success()
        .stderr("");
}
