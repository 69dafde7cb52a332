//! Integration tests for typedef and grouping collision checks

use yangtree_compiler::{Input, ModuleRegistry};
use yangtree_foundation::{ErrorCode, MemorySink, Severity};
use yangtree_syntax::SchemaFormat;

use crate::registry_with;

fn load(text: &str) -> (ModuleRegistry, MemorySink, yangtree_foundation::Result<yangtree_schema::ModuleId>) {
    let sink = MemorySink::new();
    let mut registry = ModuleRegistry::in_memory().with_sink(sink.clone());
    let result = registry.parse_module(Input::memory(text), SchemaFormat::Yang, false);
    (registry, sink, result)
}

// =============================================================================
// Typedefs
// =============================================================================

#[test]
fn duplicate_typedef_in_one_scope() {
    let (registry, _, result) = load(
        "module m {\n namespace urn:m;\n prefix m;\n container c {\n  typedef t { type string; }\n  typedef t { type int8; }\n }\n}",
    );
    let err = result.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    assert_eq!(err.line(), Some(5));
    assert!(registry.is_empty());
}

#[test]
fn duplicate_top_level_typedef() {
    let (_, _, result) = load(
        "module m { namespace urn:m; prefix m; typedef t { type string; } typedef t { type string; } }",
    );
    assert_eq!(result.unwrap_err().code(), ErrorCode::AlreadyExists);
}

#[test]
fn shadowing_is_reported_as_a_note() {
    let (registry, sink, result) = load(
        "module m {\n namespace urn:m;\n prefix m;\n typedef t { type string; }\n container c {\n  typedef t { type int8; }\n }\n}",
    );
    result.unwrap();
    assert_eq!(registry.len(), 1);

    let notes = sink.with_severity(Severity::Note);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].line, Some(6));
    assert!(notes[0].message.contains("line 4"));
}

#[test]
fn same_name_in_sibling_scopes_is_fine() {
    let (_, sink, result) = load(
        "module m { namespace urn:m; prefix m; \
         container a { typedef t { type string; } } \
         container b { typedef t { type int8; } } }",
    );
    result.unwrap();
    assert!(sink.diagnostics().is_empty());
}

#[test]
fn typedef_named_like_a_builtin() {
    let (_, _, result) = load("module m { namespace urn:m; prefix m; typedef int32 { type string; } }");
    assert_eq!(result.unwrap_err().code(), ErrorCode::Validation);

    let (_, _, nested) = load(
        "module m { namespace urn:m; prefix m; container c { typedef boolean { type string; } } }",
    );
    assert_eq!(nested.unwrap_err().code(), ErrorCode::Validation);
}

#[test]
fn top_level_typedef_shared_with_submodule() {
    let sub = "submodule s { belongs-to m { prefix m; } typedef t { type string; } }";
    let mut registry = registry_with(&[("s", None, sub)]);
    let err = registry
        .parse_module(
            Input::memory("module m { namespace urn:m; prefix m; include s; typedef t { type int8; } }"),
            SchemaFormat::Yang,
            false,
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);
}

#[test]
fn submodule_notes_survive_a_failed_check() {
    let sub = "submodule s {\n belongs-to m { prefix m; }\n typedef t { type string; }\n \
               container c {\n  typedef t { type int8; }\n }\n grouping g;\n grouping g;\n}";
    let sink = MemorySink::new();
    let mut registry = registry_with(&[("s", None, sub)]).with_sink(sink.clone());
    let err = registry
        .parse_module(
            Input::memory("module m { namespace urn:m; prefix m; include s; }"),
            SchemaFormat::Yang,
            false,
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);

    let notes = sink.with_severity(Severity::Note);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].line, Some(5));
    assert_eq!(sink.with_severity(Severity::Error).len(), 1);
}

// =============================================================================
// Groupings
// =============================================================================

#[test]
fn duplicate_grouping_in_one_scope() {
    let (_, _, result) = load(
        "module m { namespace urn:m; prefix m; \
         list l { key k; leaf k { type string; } grouping g; grouping g; } }",
    );
    assert_eq!(result.unwrap_err().code(), ErrorCode::AlreadyExists);
}

#[test]
fn nested_grouping_shadowing_is_a_note() {
    let (_, sink, result) = load(
        "module m {\n namespace urn:m;\n prefix m;\n grouping g { leaf a { type string; } }\n container c {\n  grouping g { leaf b { type string; } }\n }\n}",
    );
    result.unwrap();
    let notes = sink.with_severity(Severity::Note);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].line, Some(6));
}

#[test]
fn grouping_inside_grouping_shadowing_outer() {
    let (_, sink, result) = load(
        "module m { namespace urn:m; prefix m; \
         grouping outer { grouping inner; container c { grouping inner; } } }",
    );
    result.unwrap();
    assert_eq!(sink.with_severity(Severity::Note).len(), 1);
}
