//! Parsed and compiled YANG schema trees.
//!
//! This crate provides:
//! - [`ParsedModule`] - The source-shaped tree of one module or submodule
//! - [`CompiledModule`] - The resolved tree consumed by downstream tools
//! - [`shape`] - Per-kind access to typedef, grouping, action, notification
//!   and child slots
//! - [`BuiltinType`] - The built-in types of the language

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
pub mod compiled;
pub mod ids;
pub mod parsed;
pub mod shape;

pub use builtin::BuiltinType;
pub use compiled::{
    CompiledBody, CompiledImport, CompiledKind, CompiledModule, CompiledNode, CompiledType,
    TypedefOrigin,
};
pub use ids::{CompiledNodeId, ModuleId, NodeId};
pub use parsed::{
    ActionBody, AnyBody, AugmentBody, BelongsTo, CaseBody, ChoiceBody, ContainerBody, Deviate,
    DeviateKind, Deviation, Extension,
    ExtensionInstance, Feature, GroupingBody, Import, InOutBody, Include, LeafBody, LeafListBody,
    ListBody, NodeBody, NodeKind, NotificationBody, ParsedModule, ParsedNode, Prefix, Refine,
    Restriction, TypeRef, Typedef, UsesBody, YangVersion,
};
pub use shape::{
    compiled_node_actions_mut, compiled_node_children, compiled_node_children_mut,
    compiled_node_descendants, compiled_node_notifications_mut, node_actions, node_actions_mut,
    node_children, node_children_mut, node_groupings, node_groupings_mut, node_notifications,
    node_notifications_mut, node_typedefs, node_typedefs_mut,
};
