//! Resolution scenarios through the library API.

use pkgmeta_cli::config::Config;
use pkgmeta_cli::core::PkgError;
use pkgmeta_cli::flags::{FlagAggregator, packages_get_var};
use pkgmeta_cli::resolver::{Resolver, SearchPath};
use pkgmeta_cli::test_utils::{PcFixture, init_test_logging};

#[test]
fn test_diamond_dependencies() {
    init_test_logging(None);
    let fixture = PcFixture::new();
    fixture.package("base", "1", "Libs: -L/base -lbase\nCflags: -I/base\n");
    fixture.package("left", "1", "Requires: base\nLibs: -L/left -lleft\nCflags: -I/left\n");
    fixture.package("right", "1", "Requires: base\nLibs: -L/right -lright\nCflags: -I/right\n");
    fixture.package("top", "1", "Requires: left right\nLibs: -ltop\n");

    let mut resolver = fixture.resolver();
    let top = resolver.resolve("top").unwrap();
    let graph = resolver.graph();
    assert_eq!(graph.len(), 4);

    let flags = FlagAggregator::new(graph);
    assert_eq!(flags.library_names(&[top]), "-ltop -lleft -lright -lbase");
    assert_eq!(flags.library_paths(&[top]), "-L/left -L/base -L/right");
    assert_eq!(flags.include_paths(&[top]), "-I/left -I/base -I/right");

    assert_eq!(flags.package_library_names(top), "-ltop -lleft -lright -lbase");
    assert_eq!(flags.package_library_names(top), flags.library_names(&[top]));
}

#[test]
fn test_several_roots() {
    let fixture = PcFixture::new();
    fixture.package("a", "1", "prefix=/a\nLibs: -la\n");
    fixture.package("b", "1", "Libs: -lb -la\n");

    let mut resolver = fixture.resolver();
    let a = resolver.resolve("a").unwrap();
    let b = resolver.resolve("b").unwrap();

    let flags = FlagAggregator::new(resolver.graph());
    assert_eq!(flags.library_names(&[a, b]), "-lb -la");
    assert_eq!(packages_get_var(resolver.graph(), resolver.globals(), &[a, b], "prefix"), "/a");
}

#[test]
fn test_first_search_directory_wins() {
    let first = PcFixture::new();
    first.package("dup", "1", "");
    let second = PcFixture::new();
    second.package("dup", "2", "");
    second.package("only-second", "1", "");

    let search_path = SearchPath::scan([first.path(), second.path()]);
    assert_eq!(search_path.len(), 2);

    let mut resolver = Resolver::new(search_path);
    let id = resolver.resolve("dup").unwrap();
    assert_eq!(resolver.graph()[id].version(), "1");
    assert!(resolver.resolve("only-second").is_ok());
}

#[test]
fn test_failed_resolution_can_be_retried() {
    let fixture = PcFixture::new();
    fixture.package("app", "1", "Requires: later >= 2\n");
    fixture.write("later.pc", "Name: later\nVersion: 2.0\n");

    let mut resolver = fixture.resolver();
    assert!(matches!(resolver.resolve("app"), Err(PkgError::MissingRequiredField { .. })));
    assert!(resolver.graph().lookup("app").is_none());
    assert!(resolver.graph().lookup("later").is_none());

    fixture.write("later.pc", "Name: later\nVersion: 2.1\nDescription: upgraded\n");
    let app = resolver.resolve("app").unwrap();
    let later = resolver.graph()[app].requires[0];
    assert_eq!(resolver.graph()[later].version(), "2.1");
}

#[test]
fn test_repeated_dependency_keeps_constraint() {
    let fixture = PcFixture::new();
    fixture.package("dep", "1.0", "");
    fixture.package("app", "1", "Requires: dep >= 2\nRequires.private: dep\n");

    let err = fixture.resolver().resolve("app").unwrap_err();
    assert_eq!(err.to_string(), "Package 'app' requires 'dep >= 2' but version of dep is 1.0");
}

#[test]
fn test_config_builds_resolver() {
    let fixture = PcFixture::new();
    fixture.package("foo", "1", "prefix=/usr\nCflags: -I${prefix}/include\n");

    let mut config = Config {
        libdir: Some(vec![fixture.path().to_path_buf()]),
        ..Config::default()
    };
    config.variables.insert("prefix".to_string(), "/sdk".to_string());

    let mut resolver = config.into_resolver().unwrap();
    let id = resolver.resolve("foo").unwrap();
    assert_eq!(FlagAggregator::new(resolver.graph()).all_cflags(&[id]), "-I/sdk/include");
}
