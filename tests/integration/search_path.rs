//! Integration tests for loading modules from search directories

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use yangtree_compiler::{Input, ModuleRegistry, ModuleSource, RegistryConfig, SearchPathSource};
use yangtree_foundation::ErrorCode;
use yangtree_syntax::SchemaFormat;

fn write(dir: &Path, file: &str, text: &str) {
    fs::write(dir.join(file), text).unwrap();
}

fn module(name: &str, revision: Option<&str>) -> String {
    let revision = revision.map(|r| format!("revision {r};")).unwrap_or_default();
    format!("module {name} {{ namespace urn:{name}; prefix {name}; {revision} leaf x {{ type string; }} }}")
}

// =============================================================================
// File Selection
// =============================================================================

#[test]
fn newest_revision_file_wins() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "lib@2020-01-01.yang", &module("lib", Some("2020-01-01")));
    write(dir.path(), "lib@2023-06-30.yang", &module("lib", Some("2023-06-30")));
    write(dir.path(), "lib.yang", &module("lib", None));

    let mut registry = ModuleRegistry::new(RegistryConfig::with_dirs([dir.path()]));
    let id = registry.load("lib", None, false, false).unwrap();
    let entry = registry.get(id).unwrap();

    assert_eq!(entry.revision(), Some("2023-06-30"));
    assert_eq!(entry.path(), Some(dir.path().join("lib@2023-06-30.yang").as_path()));
}

#[test]
fn exact_revision_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "lib@2020-01-01.yang", &module("lib", Some("2020-01-01")));
    write(dir.path(), "lib@2023-06-30.yang", &module("lib", Some("2023-06-30")));

    let mut registry = ModuleRegistry::new(RegistryConfig::with_dirs([dir.path()]));
    let id = registry.load("lib", Some("2020-01-01"), false, false).unwrap();
    assert_eq!(registry.get(id).unwrap().revision(), Some("2020-01-01"));
}

#[test]
fn unrevisioned_file_is_the_fallback() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "lib.yang", &module("lib", Some("2021-05-05")));

    let mut source = SearchPathSource::new(vec![dir.path().to_path_buf()]);
    let found = source.fetch("lib", Some("2021-05-05")).unwrap().unwrap();
    assert_eq!(found.format, SchemaFormat::Yang);
    assert_eq!(found.origin, Some(dir.path().join("lib.yang")));

    assert!(source.fetch("other", None).unwrap().is_none());
}

#[test]
fn directories_are_searched_in_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write(second.path(), "dep.yang", &module("dep", None));
    write(
        first.path(),
        "app.yang",
        "module app { namespace urn:app; prefix a; import dep { prefix d; } }",
    );

    let config = RegistryConfig::with_dirs([first.path(), second.path()]);
    let mut registry = ModuleRegistry::new(config);
    let app = registry.load("app", None, true, false).unwrap();
    let dep = registry.find("dep", None).unwrap();
    assert_eq!(registry.resolve_prefix(app, "d"), Some(dep));
    assert_eq!(
        registry.get(dep).unwrap().path(),
        Some(second.path().join("dep.yang").as_path())
    );
}

#[test]
fn yin_files_are_found() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "conf.yin",
        r#"<module name="conf" xmlns="urn:ietf:params:xml:ns:yang:yin:1">
  <namespace uri="urn:conf"/>
  <prefix value="c"/>
  <leaf name="enabled"><type name="boolean"/></leaf>
</module>"#,
    );

    let mut registry = ModuleRegistry::new(RegistryConfig::with_dirs([dir.path()]));
    let id = registry.load("conf", None, true, false).unwrap();
    assert_eq!(registry.compiled(id).unwrap().data.len(), 1);
}

#[test]
fn missing_directory_means_not_found() {
    let dir = TempDir::new().unwrap();
    let gone = dir.path().join("does-not-exist");
    let mut registry = ModuleRegistry::new(RegistryConfig::with_dirs([gone]));
    let err = registry.load("anything", None, false, false).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

// =============================================================================
// Direct Inputs
// =============================================================================

#[test]
fn path_input_records_origin() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("standalone.yang");
    fs::write(&file, module("standalone", None)).unwrap();

    let mut registry = ModuleRegistry::in_memory();
    let id = registry
        .parse_module(Input::path(&file), SchemaFormat::Yang, true)
        .unwrap();
    assert_eq!(registry.get(id).unwrap().path(), Some(file.as_path()));
}

#[test]
fn open_file_input() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("opened.yang");
    fs::write(&file, module("opened", None)).unwrap();

    let mut registry = ModuleRegistry::in_memory();
    let handle = fs::File::open(&file).unwrap();
    let id = registry
        .parse_module(Input::from(handle), SchemaFormat::Yang, false)
        .unwrap();
    assert_eq!(registry.get(id).unwrap().name(), "opened");
    assert_eq!(registry.get(id).unwrap().path(), None);
}

#[test]
fn unreadable_path_is_io_error() {
    let dir = TempDir::new().unwrap();
    let mut registry = ModuleRegistry::in_memory();
    let err = registry
        .parse_module(Input::path(dir.path().join("missing.yang")), SchemaFormat::Yang, false)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Io);
}
