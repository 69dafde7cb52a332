//! Node shape dispatch.
//!
//! Each accessor returns the requested substructure slot for the kinds that
//! own one and `None` for every other kind. The matches are exhaustive on
//! purpose: adding a node kind fails to build until every accessor decides
//! about it.

use crate::compiled::{CompiledBody, CompiledNode};
use crate::ids::{CompiledNodeId, NodeId};
use crate::parsed::{NodeBody, ParsedNode, Typedef};

// =============================================================================
// Parsed nodes
// =============================================================================

/// Returns the typedefs of a node.
#[must_use]
pub fn node_typedefs(node: &ParsedNode) -> Option<&Vec<Typedef>> {
    match &node.body {
        NodeBody::Container(b) => Some(&b.typedefs),
        NodeBody::List(b) => Some(&b.typedefs),
        NodeBody::Grouping(b) => Some(&b.typedefs),
        NodeBody::Rpc(b) | NodeBody::Action(b) => Some(&b.typedefs),
        NodeBody::Input(b) | NodeBody::Output(b) => Some(&b.typedefs),
        NodeBody::Notification(b) => Some(&b.typedefs),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::Choice(_)
        | NodeBody::Case(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Uses(_)
        | NodeBody::Augment(_) => None,
    }
}

/// Returns the typedefs of a node mutably.
pub fn node_typedefs_mut(node: &mut ParsedNode) -> Option<&mut Vec<Typedef>> {
    match &mut node.body {
        NodeBody::Container(b) => Some(&mut b.typedefs),
        NodeBody::List(b) => Some(&mut b.typedefs),
        NodeBody::Grouping(b) => Some(&mut b.typedefs),
        NodeBody::Rpc(b) | NodeBody::Action(b) => Some(&mut b.typedefs),
        NodeBody::Input(b) | NodeBody::Output(b) => Some(&mut b.typedefs),
        NodeBody::Notification(b) => Some(&mut b.typedefs),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::Choice(_)
        | NodeBody::Case(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Uses(_)
        | NodeBody::Augment(_) => None,
    }
}

/// Returns the groupings scoped to a node.
#[must_use]
pub fn node_groupings(node: &ParsedNode) -> Option<&Vec<NodeId>> {
    match &node.body {
        NodeBody::Container(b) => Some(&b.groupings),
        NodeBody::List(b) => Some(&b.groupings),
        NodeBody::Grouping(b) => Some(&b.groupings),
        NodeBody::Rpc(b) | NodeBody::Action(b) => Some(&b.groupings),
        NodeBody::Input(b) | NodeBody::Output(b) => Some(&b.groupings),
        NodeBody::Notification(b) => Some(&b.groupings),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::Choice(_)
        | NodeBody::Case(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Uses(_)
        | NodeBody::Augment(_) => None,
    }
}

/// Returns the groupings scoped to a node mutably.
pub fn node_groupings_mut(node: &mut ParsedNode) -> Option<&mut Vec<NodeId>> {
    match &mut node.body {
        NodeBody::Container(b) => Some(&mut b.groupings),
        NodeBody::List(b) => Some(&mut b.groupings),
        NodeBody::Grouping(b) => Some(&mut b.groupings),
        NodeBody::Rpc(b) | NodeBody::Action(b) => Some(&mut b.groupings),
        NodeBody::Input(b) | NodeBody::Output(b) => Some(&mut b.groupings),
        NodeBody::Notification(b) => Some(&mut b.groupings),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::Choice(_)
        | NodeBody::Case(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Uses(_)
        | NodeBody::Augment(_) => None,
    }
}

/// Returns the actions of a node.
#[must_use]
pub fn node_actions(node: &ParsedNode) -> Option<&Vec<NodeId>> {
    match &node.body {
        NodeBody::Container(b) => Some(&b.actions),
        NodeBody::List(b) => Some(&b.actions),
        NodeBody::Grouping(b) => Some(&b.actions),
        NodeBody::Augment(b) => Some(&b.actions),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::Choice(_)
        | NodeBody::Case(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Uses(_)
        | NodeBody::Rpc(_)
        | NodeBody::Action(_)
        | NodeBody::Input(_)
        | NodeBody::Output(_)
        | NodeBody::Notification(_) => None,
    }
}

/// Returns the actions of a node mutably.
pub fn node_actions_mut(node: &mut ParsedNode) -> Option<&mut Vec<NodeId>> {
    match &mut node.body {
        NodeBody::Container(b) => Some(&mut b.actions),
        NodeBody::List(b) => Some(&mut b.actions),
        NodeBody::Grouping(b) => Some(&mut b.actions),
        NodeBody::Augment(b) => Some(&mut b.actions),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::Choice(_)
        | NodeBody::Case(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Uses(_)
        | NodeBody::Rpc(_)
        | NodeBody::Action(_)
        | NodeBody::Input(_)
        | NodeBody::Output(_)
        | NodeBody::Notification(_) => None,
    }
}

/// Returns the notifications of a node.
#[must_use]
pub fn node_notifications(node: &ParsedNode) -> Option<&Vec<NodeId>> {
    match &node.body {
        NodeBody::Container(b) => Some(&b.notifications),
        NodeBody::List(b) => Some(&b.notifications),
        NodeBody::Grouping(b) => Some(&b.notifications),
        NodeBody::Augment(b) => Some(&b.notifications),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::Choice(_)
        | NodeBody::Case(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Uses(_)
        | NodeBody::Rpc(_)
        | NodeBody::Action(_)
        | NodeBody::Input(_)
        | NodeBody::Output(_)
        | NodeBody::Notification(_) => None,
    }
}

/// Returns the notifications of a node mutably.
pub fn node_notifications_mut(node: &mut ParsedNode) -> Option<&mut Vec<NodeId>> {
    match &mut node.body {
        NodeBody::Container(b) => Some(&mut b.notifications),
        NodeBody::List(b) => Some(&mut b.notifications),
        NodeBody::Grouping(b) => Some(&mut b.notifications),
        NodeBody::Augment(b) => Some(&mut b.notifications),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::Choice(_)
        | NodeBody::Case(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Uses(_)
        | NodeBody::Rpc(_)
        | NodeBody::Action(_)
        | NodeBody::Input(_)
        | NodeBody::Output(_)
        | NodeBody::Notification(_) => None,
    }
}

/// Returns the child slot of a node.
///
/// For `uses` this is the list of its inline augments.
#[must_use]
pub fn node_children(node: &ParsedNode) -> Option<&Vec<NodeId>> {
    match &node.body {
        NodeBody::Container(b) => Some(&b.children),
        NodeBody::List(b) => Some(&b.children),
        NodeBody::Choice(b) => Some(&b.children),
        NodeBody::Case(b) => Some(&b.children),
        NodeBody::Uses(b) => Some(&b.augments),
        NodeBody::Augment(b) => Some(&b.children),
        NodeBody::Grouping(b) => Some(&b.children),
        NodeBody::Input(b) | NodeBody::Output(b) => Some(&b.children),
        NodeBody::Notification(b) => Some(&b.children),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Rpc(_)
        | NodeBody::Action(_) => None,
    }
}

/// Returns the child slot of a node mutably.
pub fn node_children_mut(node: &mut ParsedNode) -> Option<&mut Vec<NodeId>> {
    match &mut node.body {
        NodeBody::Container(b) => Some(&mut b.children),
        NodeBody::List(b) => Some(&mut b.children),
        NodeBody::Choice(b) => Some(&mut b.children),
        NodeBody::Case(b) => Some(&mut b.children),
        NodeBody::Uses(b) => Some(&mut b.augments),
        NodeBody::Augment(b) => Some(&mut b.children),
        NodeBody::Grouping(b) => Some(&mut b.children),
        NodeBody::Input(b) | NodeBody::Output(b) => Some(&mut b.children),
        NodeBody::Notification(b) => Some(&mut b.children),
        NodeBody::Leaf(_)
        | NodeBody::LeafList(_)
        | NodeBody::AnyData(_)
        | NodeBody::AnyXml(_)
        | NodeBody::Rpc(_)
        | NodeBody::Action(_) => None,
    }
}

// =============================================================================
// Compiled nodes
// =============================================================================

/// Returns the child slot of a compiled node.
#[must_use]
pub fn compiled_node_children(node: &CompiledNode) -> Option<&Vec<CompiledNodeId>> {
    match &node.body {
        CompiledBody::Container { children, .. }
        | CompiledBody::List { children, .. }
        | CompiledBody::Choice { children, .. }
        | CompiledBody::Case { children }
        | CompiledBody::Input { children }
        | CompiledBody::Output { children }
        | CompiledBody::Notification { children } => Some(children),
        CompiledBody::Leaf { .. }
        | CompiledBody::LeafList { .. }
        | CompiledBody::AnyData { .. }
        | CompiledBody::AnyXml { .. }
        | CompiledBody::Rpc { .. }
        | CompiledBody::Action { .. } => None,
    }
}

/// Returns the child slot of a compiled node mutably.
pub fn compiled_node_children_mut(node: &mut CompiledNode) -> Option<&mut Vec<CompiledNodeId>> {
    match &mut node.body {
        CompiledBody::Container { children, .. }
        | CompiledBody::List { children, .. }
        | CompiledBody::Choice { children, .. }
        | CompiledBody::Case { children }
        | CompiledBody::Input { children }
        | CompiledBody::Output { children }
        | CompiledBody::Notification { children } => Some(children),
        CompiledBody::Leaf { .. }
        | CompiledBody::LeafList { .. }
        | CompiledBody::AnyData { .. }
        | CompiledBody::AnyXml { .. }
        | CompiledBody::Rpc { .. }
        | CompiledBody::Action { .. } => None,
    }
}

/// Returns the actions of a compiled node mutably.
pub fn compiled_node_actions_mut(node: &mut CompiledNode) -> Option<&mut Vec<CompiledNodeId>> {
    match &mut node.body {
        CompiledBody::Container { actions, .. } | CompiledBody::List { actions, .. } => {
            Some(actions)
        }
        CompiledBody::Leaf { .. }
        | CompiledBody::LeafList { .. }
        | CompiledBody::Choice { .. }
        | CompiledBody::Case { .. }
        | CompiledBody::AnyData { .. }
        | CompiledBody::AnyXml { .. }
        | CompiledBody::Rpc { .. }
        | CompiledBody::Action { .. }
        | CompiledBody::Input { .. }
        | CompiledBody::Output { .. }
        | CompiledBody::Notification { .. } => None,
    }
}

/// Returns the notifications of a compiled node mutably.
pub fn compiled_node_notifications_mut(
    node: &mut CompiledNode,
) -> Option<&mut Vec<CompiledNodeId>> {
    match &mut node.body {
        CompiledBody::Container { notifications, .. }
        | CompiledBody::List { notifications, .. } => Some(notifications),
        CompiledBody::Leaf { .. }
        | CompiledBody::LeafList { .. }
        | CompiledBody::Choice { .. }
        | CompiledBody::Case { .. }
        | CompiledBody::AnyData { .. }
        | CompiledBody::AnyXml { .. }
        | CompiledBody::Rpc { .. }
        | CompiledBody::Action { .. }
        | CompiledBody::Input { .. }
        | CompiledBody::Output { .. }
        | CompiledBody::Notification { .. } => None,
    }
}

/// Returns every node id a compiled node refers to as a descendant:
/// children, actions, notifications, input and output.
#[must_use]
pub fn compiled_node_descendants(node: &CompiledNode) -> Vec<CompiledNodeId> {
    match &node.body {
        CompiledBody::Container {
            children,
            actions,
            notifications,
            ..
        }
        | CompiledBody::List {
            children,
            actions,
            notifications,
            ..
        } => children
            .iter()
            .chain(actions)
            .chain(notifications)
            .copied()
            .collect(),
        CompiledBody::Choice { children, .. }
        | CompiledBody::Case { children }
        | CompiledBody::Input { children }
        | CompiledBody::Output { children }
        | CompiledBody::Notification { children } => children.clone(),
        CompiledBody::Rpc { input, output } | CompiledBody::Action { input, output } => {
            input.iter().chain(output.iter()).copied().collect()
        }
        CompiledBody::Leaf { .. }
        | CompiledBody::LeafList { .. }
        | CompiledBody::AnyData { .. }
        | CompiledBody::AnyXml { .. } => Vec::new(),
    }
}
