//! Integration tests for prefix resolution and prefix collisions

use yangtree_compiler::{PrefixTarget, resolve_compiled_prefix, resolve_prefix};
use yangtree_foundation::{ErrorCode, ErrorKind};

use crate::{parse, registry_with};

const TYPES: &str = "module types { namespace urn:types; prefix t; typedef percent { type uint8; } }";

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn own_and_import_prefixes() {
    let mut registry = registry_with(&[("types", None, TYPES)]);
    let id = parse(
        &mut registry,
        "module app { namespace urn:app; prefix a; import types { prefix t; } }",
    );
    let module = registry.parsed(id).unwrap();

    assert_eq!(resolve_prefix(module, "a"), Some(PrefixTarget::Own));
    let Some(PrefixTarget::Import(import)) = resolve_prefix(module, "t") else {
        panic!("expected an import");
    };
    assert_eq!(import.name, "types");
    assert_eq!(import.module, registry.find("types", None));
    assert_eq!(resolve_prefix(module, "x"), None);
}

#[test]
fn prefix_slices_compare_exact_bytes() {
    let mut registry = registry_with(&[("types", None, TYPES)]);
    let id = parse(
        &mut registry,
        "module app { namespace urn:app; prefix a; import types { prefix t; } }",
    );
    let module = registry.parsed(id).unwrap();

    let reference = "t:percent";
    let (prefix, _) = reference.split_once(':').unwrap();
    assert!(resolve_prefix(module, prefix).is_some());
    assert!(resolve_prefix(module, "t:").is_none());
    assert!(resolve_prefix(module, "").is_none());
}

#[test]
fn registry_resolves_through_parsed_and_compiled_tables() {
    let mut registry = registry_with(&[("types", None, TYPES)]);
    let app = "module app { namespace urn:app; prefix a; import types { prefix t; } \
               leaf level { type t:percent; } }";

    let parsed_only = parse(&mut registry, app);
    let types = registry.find("types", None).unwrap();
    assert_eq!(registry.resolve_prefix(parsed_only, "t"), Some(types));
    assert_eq!(registry.resolve_prefix(parsed_only, "a"), Some(parsed_only));

    registry.implement(parsed_only).unwrap();
    let compiled = registry.compiled(parsed_only).unwrap();
    assert_eq!(resolve_compiled_prefix(compiled, "t"), Some(types));
    assert_eq!(resolve_compiled_prefix(compiled, "a"), Some(parsed_only));
    assert_eq!(resolve_compiled_prefix(compiled, "nope"), None);
}

// =============================================================================
// Collisions
// =============================================================================

#[test]
fn import_prefix_equal_to_own_prefix() {
    let mut registry = registry_with(&[("types", None, TYPES)]);
    let err = registry
        .parse_module(
            "module app {\n namespace urn:app;\n prefix t;\n import types { prefix t; }\n}".into(),
            yangtree_syntax::SchemaFormat::Yang,
            false,
        )
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    assert!(matches!(err.kind, ErrorKind::AlreadyExists { ref what, .. } if what == "prefix"));
    assert_eq!(err.line(), Some(3));
    assert!(registry.find("app", None).is_none());
}

#[test]
fn two_imports_with_one_prefix() {
    let other = "module other { namespace urn:other; prefix o; }";
    let mut registry = registry_with(&[("types", None, TYPES), ("other", None, other)]);
    let err = registry
        .parse_module(
            "module app {\n namespace urn:app;\n prefix a;\n import types { prefix x; }\n import other { prefix x; }\n}"
                .into(),
            yangtree_syntax::SchemaFormat::Yang,
            false,
        )
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    assert_eq!(err.line(), Some(4));
}

#[test]
fn import_without_prefix_is_invalid() {
    let mut registry = registry_with(&[("types", None, TYPES)]);
    let result = registry.parse_module(
        "module app { namespace urn:app; prefix a; import types; }".into(),
        yangtree_syntax::SchemaFormat::Yang,
        false,
    );
    assert_eq!(result.unwrap_err().code(), ErrorCode::Validation);
}
