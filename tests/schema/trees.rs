//! Integration tests for parsed and compiled trees

use yangtree_foundation::{Revision, Span};
use yangtree_schema::{
    BuiltinType, CompiledBody, CompiledModule, CompiledNode, CompiledType, ModuleId, NodeKind,
    ParsedModule, ParsedNode, Prefix,
};

// =============================================================================
// Parsed Trees
// =============================================================================

#[test]
fn ancestors_walk_to_the_top() {
    let mut module = ParsedModule::new("m", Prefix::new("m", Span::at_line(2)));
    let top = module.add_node(ParsedNode::new(NodeKind::Container, "top", Span::at_line(3)));
    let mut mid = ParsedNode::new(NodeKind::Grouping, "g", Span::at_line(4));
    mid.parent = Some(top);
    let mid = module.add_node(mid);

    assert_eq!(module.ancestors(mid).collect::<Vec<_>>(), [mid, top]);
    assert_eq!(module.ancestors(top).collect::<Vec<_>>(), [top]);
}

#[test]
fn revision_is_the_first_entry() {
    let mut module = ParsedModule::new("m", Prefix::new("m", Span::at_line(1)));
    assert_eq!(module.revision(), None);

    module.revisions.push(Revision::new("2024-01-01", Span::at_line(3)));
    module.revisions.push(Revision::new("2020-01-01", Span::at_line(4)));
    assert_eq!(module.revision(), Some("2024-01-01"));
}

#[test]
fn node_ids_index_the_arena() {
    let mut module = ParsedModule::default();
    let a = module.add_node(ParsedNode::new(NodeKind::Leaf, "a", Span::at_line(1)));
    let b = module.add_node(ParsedNode::new(NodeKind::Leaf, "b", Span::at_line(2)));

    assert_eq!(module.node_count(), 2);
    assert_eq!(module.node(b).name, "b");
    assert_eq!(a.index(), 0);
    assert!(module.get_node(b).is_some());

    let names: Vec<&str> = module.iter_nodes().map(|(_, n)| n.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn modules_are_not_submodules() {
    let module = ParsedModule::new("m", Prefix::new("m", Span::at_line(1)));
    assert!(!module.is_submodule());
    assert!(module.submodules().is_empty());
}

// =============================================================================
// Compiled Trees
// =============================================================================

#[test]
fn take_nodes_empties_the_module() {
    let mut module = CompiledModule::new(ModuleId(3), "m");
    let leaf = module.add_node(CompiledNode::new(
        "x",
        ModuleId(3),
        CompiledBody::Leaf {
            ty: CompiledType::builtin(BuiltinType::Int32),
            default: None,
            units: None,
            mandatory: false,
        },
    ));
    module.data.push(leaf);

    let nodes = module.take_nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(module.node_count(), 0);
    assert!(module.data.is_empty());
}

#[test]
fn private_data_is_reported_but_not_printed() {
    let mut node = CompiledNode::new("x", ModuleId(0), CompiledBody::AnyData { mandatory: false });
    node.private = Some(Box::new(42_u32));
    let debug = format!("{node:?}");
    assert!(debug.contains("private: true"));
}

#[test]
fn builtin_type_names_itself() {
    let ty = CompiledType::builtin(BuiltinType::Uint64);
    assert_eq!(ty.name, "uint64");
    assert_eq!(ty.base, BuiltinType::Uint64);
}
