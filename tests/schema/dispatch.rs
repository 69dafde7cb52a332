//! Integration tests for node shape dispatch
//!
//! Every accessor must answer for every node kind; these tests pin down
//! which kinds own which slot.

use yangtree_foundation::Span;
use yangtree_schema::{
    BuiltinType, CompiledBody, CompiledKind, CompiledNode, CompiledType, ModuleId,
    NodeKind, ParsedNode, compiled_node_actions_mut, compiled_node_children,
    compiled_node_children_mut, compiled_node_descendants, compiled_node_notifications_mut,
    node_actions, node_actions_mut, node_children, node_children_mut, node_groupings,
    node_groupings_mut, node_notifications, node_notifications_mut, node_typedefs,
    node_typedefs_mut,
};

fn parsed(kind: NodeKind) -> ParsedNode {
    ParsedNode::new(kind, "n", Span::at_line(1))
}

fn compiled(kind: CompiledKind) -> CompiledNode {
    let ty = || CompiledType::builtin(BuiltinType::String);
    let body = match kind {
        CompiledKind::Container => CompiledBody::Container {
            presence: None,
            children: Vec::new(),
            actions: Vec::new(),
            notifications: Vec::new(),
        },
        CompiledKind::List => CompiledBody::List {
            keys: Vec::new(),
            children: Vec::new(),
            actions: Vec::new(),
            notifications: Vec::new(),
        },
        CompiledKind::Leaf => CompiledBody::Leaf {
            ty: ty(),
            default: None,
            units: None,
            mandatory: false,
        },
        CompiledKind::LeafList => CompiledBody::LeafList {
            ty: ty(),
            defaults: Vec::new(),
            units: None,
        },
        CompiledKind::Choice => CompiledBody::Choice {
            default: None,
            mandatory: false,
            children: Vec::new(),
        },
        CompiledKind::Case => CompiledBody::Case { children: Vec::new() },
        CompiledKind::AnyData => CompiledBody::AnyData { mandatory: false },
        CompiledKind::AnyXml => CompiledBody::AnyXml { mandatory: false },
        CompiledKind::Rpc => CompiledBody::Rpc { input: None, output: None },
        CompiledKind::Action => CompiledBody::Action { input: None, output: None },
        CompiledKind::Input => CompiledBody::Input { children: Vec::new() },
        CompiledKind::Output => CompiledBody::Output { children: Vec::new() },
        CompiledKind::Notification => CompiledBody::Notification { children: Vec::new() },
    };
    CompiledNode::new("n", ModuleId(0), body)
}

fn kinds_with(check: impl Fn(&ParsedNode) -> bool) -> Vec<NodeKind> {
    NodeKind::ALL
        .into_iter()
        .filter(|kind| check(&parsed(*kind)))
        .collect()
}

// =============================================================================
// Parsed Nodes
// =============================================================================

#[test]
fn typedef_owners() {
    use NodeKind::*;
    assert_eq!(
        kinds_with(|n| node_typedefs(n).is_some()),
        [Container, List, Grouping, Rpc, Action, Input, Output, Notification]
    );
}

#[test]
fn grouping_owners_match_typedef_owners() {
    assert_eq!(
        kinds_with(|n| node_groupings(n).is_some()),
        kinds_with(|n| node_typedefs(n).is_some())
    );
}

#[test]
fn action_and_notification_owners() {
    use NodeKind::*;
    let expected = [Container, List, Augment, Grouping];
    let mut actions = kinds_with(|n| node_actions(n).is_some());
    let mut notifications = kinds_with(|n| node_notifications(n).is_some());
    actions.sort_by_key(|k| k.keyword());
    notifications.sort_by_key(|k| k.keyword());
    let mut expected = expected.to_vec();
    expected.sort_by_key(|k| k.keyword());
    assert_eq!(actions, expected);
    assert_eq!(notifications, expected);
}

#[test]
fn child_slot_owners() {
    use NodeKind::*;
    assert_eq!(
        kinds_with(|n| node_children(n).is_some()),
        [Container, List, Choice, Case, Uses, Augment, Grouping, Input, Output, Notification]
    );
}

#[test]
fn leaves_own_nothing() {
    for kind in [NodeKind::Leaf, NodeKind::LeafList, NodeKind::AnyData, NodeKind::AnyXml] {
        let node = parsed(kind);
        assert!(node_typedefs(&node).is_none(), "{}", kind.keyword());
        assert!(node_groupings(&node).is_none());
        assert!(node_actions(&node).is_none());
        assert!(node_notifications(&node).is_none());
        assert!(node_children(&node).is_none());
    }
}

#[test]
fn mutable_accessors_agree_with_shared_ones() {
    for kind in NodeKind::ALL {
        let mut node = parsed(kind);
        assert_eq!(node_typedefs(&node).is_some(), node_typedefs_mut(&mut node).is_some());
        assert_eq!(node_groupings(&node).is_some(), node_groupings_mut(&mut node).is_some());
        assert_eq!(node_actions(&node).is_some(), node_actions_mut(&mut node).is_some());
        assert_eq!(
            node_notifications(&node).is_some(),
            node_notifications_mut(&mut node).is_some()
        );
        assert_eq!(node_children(&node).is_some(), node_children_mut(&mut node).is_some());
    }
}

#[test]
fn writes_through_mutable_slot_are_visible() {
    let mut node = parsed(NodeKind::Container);
    let other = parsed(NodeKind::Leaf);
    let mut module = yangtree_schema::ParsedModule::default();
    let id = module.add_node(other);

    node_children_mut(&mut node).unwrap().push(id);
    assert_eq!(node_children(&node).unwrap(), &vec![id]);
}

// =============================================================================
// Compiled Nodes
// =============================================================================

#[test]
fn compiled_child_owners() {
    use CompiledKind::*;
    let owners: Vec<CompiledKind> = CompiledKind::ALL
        .into_iter()
        .filter(|kind| compiled_node_children(&compiled(*kind)).is_some())
        .collect();
    assert_eq!(owners, [Container, List, Choice, Case, Input, Output, Notification]);
}

#[test]
fn compiled_action_and_notification_owners() {
    for kind in CompiledKind::ALL {
        let mut node = compiled(kind);
        let owns = matches!(kind, CompiledKind::Container | CompiledKind::List);
        assert_eq!(compiled_node_actions_mut(&mut node).is_some(), owns);
        assert_eq!(compiled_node_notifications_mut(&mut node).is_some(), owns);
        assert_eq!(
            compiled_node_children(&node).is_some(),
            compiled_node_children_mut(&mut node).is_some()
        );
    }
}

#[test]
fn descendants_cover_every_slot() {
    let mut module = yangtree_schema::CompiledModule::new(ModuleId(0), "m");
    let leaf = module.add_node(compiled(CompiledKind::Leaf));
    let action = module.add_node(compiled(CompiledKind::Action));
    let notif = module.add_node(compiled(CompiledKind::Notification));

    let mut container = compiled(CompiledKind::Container);
    compiled_node_children_mut(&mut container).unwrap().push(leaf);
    compiled_node_actions_mut(&mut container).unwrap().push(action);
    compiled_node_notifications_mut(&mut container).unwrap().push(notif);
    assert_eq!(compiled_node_descendants(&container), [leaf, action, notif]);

    let input = module.add_node(compiled(CompiledKind::Input));
    let rpc = CompiledNode::new(
        "op",
        ModuleId(0),
        CompiledBody::Rpc {
            input: Some(input),
            output: None,
        },
    );
    assert_eq!(compiled_node_descendants(&rpc), [input]);
}

#[test]
fn compiled_leaves_have_no_descendants() {
    for kind in [CompiledKind::Leaf, CompiledKind::LeafList, CompiledKind::AnyData, CompiledKind::AnyXml] {
        assert!(compiled_node_descendants(&compiled(kind)).is_empty());
    }
}

#[test]
fn compiled_kind_keywords_are_distinct() {
    let mut keywords: Vec<&str> = CompiledKind::ALL.iter().map(|k| k.keyword()).collect();
    keywords.sort_unstable();
    keywords.dedup();
    assert_eq!(keywords.len(), CompiledKind::ALL.len());
}
