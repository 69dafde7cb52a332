//! Integration tests for the module registry

use std::cell::RefCell;
use std::rc::Rc;

use yangtree_compiler::{FreeScope, ModuleRegistry};
use yangtree_foundation::{Error, ErrorCode, MemorySink, Result, Severity};
use yangtree_schema::{CompiledNode, ModuleId, ParsedModule};

use crate::registry_with;

const OLD: &str = "module m { namespace urn:m; prefix m; revision 2020-01-01; leaf a { type string; } }";
const NEW: &str = "module m { namespace urn:m; prefix m; revision 2024-01-01; revision 2020-01-01; \
                   leaf a { type string; } leaf b { type int8; } }";

fn two_revisions() -> ModuleRegistry {
    registry_with(&[("m", Some("2020-01-01"), OLD), ("m", Some("2024-01-01"), NEW)])
}

// =============================================================================
// Revisions
// =============================================================================

#[test]
fn revisions_are_ordered_newest_first() {
    let mut registry = two_revisions();
    let old = registry.load("m", Some("2020-01-01"), false, false).unwrap();
    let new = registry.load("m", Some("2024-01-01"), false, false).unwrap();

    assert_eq!(registry.revisions("m"), [new, old]);
    assert_eq!(registry.find("m", None), Some(new));
    assert_eq!(registry.find("m", Some("2020-01-01")), Some(old));
    assert!(registry.get(new).unwrap().is_latest_revision());
    assert!(!registry.get(old).unwrap().is_latest_revision());
    assert_eq!(registry.get(new).unwrap().revision(), Some("2024-01-01"));
}

#[test]
fn unrevisioned_load_fetches_newest() {
    let mut registry = two_revisions();
    let id = registry.load("m", None, false, false).unwrap();
    assert_eq!(registry.get(id).unwrap().revision(), Some("2024-01-01"));
}

#[test]
fn source_with_wrong_revision_is_rejected() {
    let mut registry = registry_with(&[("m", Some("2024-01-01"), OLD)]);
    let err = registry.load("m", Some("2024-01-01"), false, false).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
    assert!(registry.is_empty());
}

#[test]
fn source_with_wrong_name_is_rejected() {
    let mut registry = registry_with(&[("alias", None, OLD)]);
    let err = registry.load("alias", None, false, false).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
    assert!(registry.find("m", None).is_none());
}

#[test]
fn submodule_source_is_not_a_module() {
    let mut registry = registry_with(&[("s", None, "submodule s { belongs-to m { prefix m; } }")]);
    let err = registry.load("s", None, false, false).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
}

// =============================================================================
// Implementation
// =============================================================================

#[test]
fn promotion_compiles_in_place() {
    let mut registry = two_revisions();
    let id = registry.load("m", Some("2024-01-01"), false, false).unwrap();
    assert!(registry.compiled(id).is_none());

    let again = registry.load("m", Some("2024-01-01"), true, false).unwrap();
    assert_eq!(again, id);
    assert!(registry.get(id).unwrap().is_implemented());
    assert_eq!(registry.compiled(id).unwrap().data.len(), 2);
    assert_eq!(registry.len(), 1);
}

#[test]
fn only_one_revision_is_implemented() {
    let mut registry = two_revisions();
    let old = registry.load("m", Some("2020-01-01"), true, false).unwrap();

    let err = registry.load("m", Some("2024-01-01"), true, false).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.find_implemented("m"), Some(old));

    let new = registry.load("m", Some("2024-01-01"), false, false).unwrap();
    assert_eq!(registry.implement(new).unwrap_err().code(), ErrorCode::Validation);
    assert!(!registry.get(new).unwrap().is_implemented());
}

#[test]
fn implementing_twice_is_a_no_op() {
    let mut registry = two_revisions();
    let id = registry.load("m", None, true, false).unwrap();
    registry.implement(id).unwrap();
    registry.implement(id).unwrap();
    assert_eq!(registry.find_implemented("m"), Some(id));
}

#[test]
fn failed_promotion_leaves_entry_parsed_only() {
    let broken = "module b { namespace urn:b; prefix b; list l { leaf k { type string; } } }";
    let mut registry = registry_with(&[("b", None, broken)]);
    let id = registry.load("b", None, false, false).unwrap();

    assert_eq!(registry.implement(id).unwrap_err().code(), ErrorCode::Validation);
    let entry = registry.get(id).unwrap();
    assert!(!entry.is_implemented());
    assert!(entry.parsed().is_some());
    assert!(entry.compiled().is_none());
}

// =============================================================================
// Import Cycles
// =============================================================================

#[test]
fn import_cycle_is_detected() {
    let a = "module a { namespace urn:a; prefix a; import b { prefix b; } }";
    let b = "module b { namespace urn:b; prefix b; import a { prefix a; } }";
    let sink = MemorySink::new();
    let mut registry = registry_with(&[("a", None, a), ("b", None, b)]).with_sink(sink.clone());

    let err = registry.load("a", None, true, false).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
    assert!(err.to_string().contains("a -> b -> a"));
    assert!(registry.is_empty());
    assert!(registry.loading_stack().is_empty());
    assert_eq!(sink.with_severity(Severity::Error).len(), 1);
}

// =============================================================================
// Custom Checks
// =============================================================================

#[test]
fn custom_check_sees_registry_and_module() {
    let mut registry = two_revisions();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let mut check = move |reg: &ModuleRegistry, module: &ParsedModule| -> Result<()> {
        log.borrow_mut().push((reg.len(), module.revision().map(str::to_string)));
        Ok(())
    };

    registry
        .load_with_check("m", Some("2020-01-01"), false, false, &mut check)
        .unwrap();
    registry
        .load_with_check("m", Some("2024-01-01"), false, false, &mut check)
        .unwrap();

    assert_eq!(
        *seen.borrow(),
        [
            (0, Some("2020-01-01".to_string())),
            (1, Some("2024-01-01".to_string())),
        ]
    );
}

#[test]
fn custom_check_is_skipped_for_registered_modules() {
    let mut registry = two_revisions();
    registry.load("m", None, false, false).unwrap();

    let mut calls = 0;
    let mut check = |_: &ModuleRegistry, _: &ParsedModule| -> Result<()> {
        calls += 1;
        Ok(())
    };
    registry.load_with_check("m", None, false, false, &mut check).unwrap();
    assert_eq!(calls, 0);
}

#[test]
fn custom_check_rejection_registers_nothing() {
    let mut registry = two_revisions();
    let mut check = |_: &ModuleRegistry, module: &ParsedModule| -> Result<()> {
        Err(Error::validation("policy forbids this module", module.span.line))
    };
    let err = registry.load_with_check("m", None, true, false, &mut check).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
    assert!(registry.is_empty());
}

// =============================================================================
// Freeing
// =============================================================================

#[test]
fn free_compiled_runs_destructor_once_per_node() {
    let mut registry = two_revisions();
    let id = registry.load("m", None, true, false).unwrap();

    let compiled = registry.get_mut(id).unwrap().compiled_mut().unwrap();
    let ids: Vec<_> = compiled.iter_nodes().map(|(nid, _)| nid).collect();
    for (i, nid) in ids.iter().enumerate() {
        compiled.node_mut(*nid).private = Some(Box::new(i));
    }

    let mut freed = Vec::new();
    let mut destructor = |node: &CompiledNode, private: Option<Box<dyn std::any::Any>>| {
        let value = private.and_then(|p| p.downcast::<usize>().ok()).map(|b| *b);
        freed.push((node.name.clone(), value));
    };
    registry.free_module(id, FreeScope::Compiled, &mut destructor).unwrap();

    assert_eq!(freed.len(), ids.len());
    freed.sort();
    assert_eq!(freed, [("a".to_string(), Some(0)), ("b".to_string(), Some(1))]);

    let entry = registry.get(id).unwrap();
    assert!(entry.compiled().is_none());
    assert!(entry.parsed().is_some());
    assert!(entry.is_implemented());
}

#[test]
fn freed_parsed_tree_and_require_parsed() {
    let mut registry = two_revisions();
    let id = registry.load("m", None, false, false).unwrap();
    registry
        .free_module(id, FreeScope::Parsed, &mut |_: &CompiledNode, _: Option<Box<dyn std::any::Any>>| {})
        .unwrap();

    assert_eq!(
        registry.load("m", None, false, true).unwrap_err().code(),
        ErrorCode::NotFound
    );
    assert_eq!(registry.load("m", None, false, false).unwrap(), id);
    assert_eq!(registry.implement(id).unwrap_err().code(), ErrorCode::NotFound);
}

#[test]
fn free_all_and_unknown_id() {
    let mut registry = two_revisions();
    let id = registry.load("m", None, true, false).unwrap();
    let mut count = 0;
    let mut destructor = |_: &CompiledNode, _: Option<Box<dyn std::any::Any>>| count += 1;

    registry.free_module(id, FreeScope::All, &mut destructor).unwrap();
    let entry = registry.get(id).unwrap();
    assert!(entry.parsed().is_none() && entry.compiled().is_none());

    let err = registry
        .free_module(ModuleId(99), FreeScope::All, &mut destructor)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
    assert_eq!(count, 2);
}
