//! Output of successful `pkgmeta` queries.

use pkgmeta_cli::test_utils::PcFixture;
use predicates::prelude::*;

use crate::common::pkgmeta;

fn gtk_like() -> PcFixture {
    let fixture = PcFixture::new();
    fixture.package(
        "glib",
        "2.80.0",
        "prefix=/usr\nlibdir=${prefix}/lib\nincludedir=${prefix}/include\n\
         Libs: -L${libdir} -lglib\nCflags: -I${includedir}/glib\n",
    );
    fixture.package(
        "gio",
        "2.80.0",
        "prefix=/usr\nlibdir=${prefix}/lib\nincludedir=${prefix}/include\n\
         Requires: glib\nLibs: -L${libdir} -lgio\nCflags: -I${includedir}/gio -I${includedir}/glib\n",
    );
    fixture.package(
        "gtk",
        "3.24.41",
        "prefix=/opt/gtk\nRequires: gio >= 2.56, glib\nLibs: -L${prefix}/lib -lgtk -pthread\nCflags: -pthread -I${prefix}/include\n",
    );
    fixture
}

#[test]
fn test_cflags_and_libs_are_transitive_and_deduplicated() {
    let fixture = gtk_like();

    pkgmeta(fixture.path())
        .args(["--cflags", "gtk"])
        .assert()
        .success()
        .stdout("-pthread -I/opt/gtk/include -I/usr/include/gio -I/usr/include/glib\n");

    pkgmeta(fixture.path())
        .args(["--libs", "gtk"])
        .assert()
        .success()
        .stdout("-pthread -L/opt/gtk/lib -L/usr/lib -lgtk -lgio -lglib\n");
}

#[test]
fn test_cflags_and_libs_share_one_line() {
    let fixture = gtk_like();

    pkgmeta(fixture.path())
        .args(["--cflags", "--libs", "glib"])
        .assert()
        .success()
        .stdout("-I/usr/include/glib -L/usr/lib -lglib\n");
}

#[test]
fn test_modversion_for_several_modules() {
    let fixture = gtk_like();

    pkgmeta(fixture.path())
        .args(["--modversion", "gtk glib"])
        .assert()
        .success()
        .stdout("3.24.41\n2.80.0\n");
}

#[test]
fn test_constraint_in_module_argument() {
    let fixture = gtk_like();

    pkgmeta(fixture.path())
        .args(["--modversion", "gio >= 2.56"])
        .assert()
        .success()
        .stdout("2.80.0\n");
}

#[test]
fn test_variable_and_define_variable() {
    let fixture = gtk_like();

    pkgmeta(fixture.path()).args(["--variable=libdir", "glib"]).assert().success().stdout("/usr/lib\n");

    pkgmeta(fixture.path())
        .args(["--define-variable=prefix=/sysroot/usr", "--libs-only-L", "glib"])
        .assert()
        .success()
        .stdout("-L/sysroot/usr/lib\n");
}

#[test]
fn test_missing_variable_prints_empty_line() {
    let fixture = gtk_like();

    pkgmeta(fixture.path()).args(["--variable=nothing", "glib"]).assert().success().stdout("\n");
}

#[test]
fn test_pcfiledir_is_builtin() {
    let fixture = PcFixture::new();
    fixture.package("here", "1", "Cflags: -I${pcfiledir}/include\n");

    let expected = format!("-I{}/include\n", fixture.path().display());
    pkgmeta(fixture.path()).args(["--cflags", "here"]).assert().success().stdout(expected);
}

#[test]
fn test_static_includes_private_dependencies() {
    let fixture = PcFixture::new();
    fixture.package("z", "1.3", "Libs: -lz\n");
    fixture.package("png", "1.6", "Requires.private: z\nLibs: -lpng16\nLibs.private: -lm\n");

    pkgmeta(fixture.path()).args(["--libs", "png"]).assert().success().stdout("-lpng16\n");
    pkgmeta(fixture.path()).args(["--libs", "--static", "png"]).assert().success().stdout("-lpng16 -lm -lz\n");
}

#[test]
fn test_private_requires_cflags_not_included() {
    let fixture = PcFixture::new();
    fixture.package("z", "1.3", "Cflags: -I/z\n");
    fixture.package("png", "1.6", "Requires.private: z\nCflags: -I/png\n");

    pkgmeta(fixture.path()).args(["--cflags", "png"]).assert().success().stdout("-I/png\n");
}

#[test]
fn test_msvc_syntax() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1", "Libs: -L/opt/foo/lib -lfoo\n");

    pkgmeta(fixture.path())
        .args(["--libs", "--msvc-syntax", "foo"])
        .assert()
        .success()
        .stdout("/libpath:/opt/foo/lib foo.lib\n");
}

#[test]
fn test_lookup_by_path() {
    let fixture = PcFixture::new();
    let path = fixture.write("elsewhere/custom.pc", "Name: Custom\nVersion: 0.3\nDescription: by path\n");

    pkgmeta(fixture.path())
        .arg("--modversion")
        .arg(&path)
        .assert()
        .success()
        .stdout("0.3\n");
}

#[test]
fn test_list_all() {
    let fixture = gtk_like();
    fixture.write("broken.pc", "Name: broken\n");

    pkgmeta(fixture.path())
        .arg("--list-all")
        .assert()
        .success()
        .stdout(predicate::str::contains("gio  gio - gio package\n"))
        .stdout(predicate::str::contains("glib glib - glib package\n"))
        .stdout(predicate::str::contains("gtk  gtk - gtk package\n"))
        .stdout(predicate::str::contains("broken").not());
}

#[test]
fn test_print_requires() {
    let fixture = gtk_like();

    pkgmeta(fixture.path())
        .args(["--print-requires", "gtk"])
        .assert()
        .success()
        .stdout("gio >= 2.56\nglib\n");
}

#[test]
fn test_uninstalled_variant_is_preferred() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1.0", "Cflags: -I/installed\n");
    fixture.write("foo-uninstalled.pc", "Name: foo\nVersion: 1.1\nDescription: build tree\nCflags: -I/build\n");

    pkgmeta(fixture.path()).args(["--cflags", "foo"]).assert().success().stdout("-I/build\n");
    pkgmeta(fixture.path()).args(["--uninstalled", "foo"]).assert().success();

    pkgmeta(fixture.path())
        .args(["--cflags", "--disable-uninstalled", "foo"])
        .assert()
        .success()
        .stdout("-I/installed\n");

    pkgmeta(fixture.path())
        .env("PKG_CONFIG_DISABLE_UNINSTALLED", "1")
        .args(["--modversion", "foo"])
        .assert()
        .success()
        .stdout("1.0\n");
}

#[cfg(unix)]
#[test]
fn test_define_prefix_relocates() {
    let fixture = PcFixture::new();
    fixture.write(
        "lib/pkgconfig/reloc.pc",
        "prefix=/usr\nlibdir=/usr/lib\nName: reloc\nVersion: 1\nDescription: moved\nLibs: -L${libdir} -lreloc\n",
    );
    let libdir = fixture.path().join("lib/pkgconfig");

    pkgmeta(&libdir)
        .args(["--libs", "reloc"])
        .assert()
        .success()
        .stdout("-L/usr/lib -lreloc\n");

    let expected = format!("-L{}/lib -lreloc\n", fixture.path().display());
    pkgmeta(&libdir).args(["--libs", "--define-prefix", "reloc"]).assert().success().stdout(expected);
}
