//! The compiled schema tree.
//!
//! A [`CompiledModule`] is the resolved counterpart of a parsed module:
//! groupings are expanded, types point at their built-in base, and the import
//! table maps prefixes straight to registry handles.

use std::any::Any;
use std::fmt;

use crate::builtin::BuiltinType;
use crate::ids::{CompiledNodeId, ModuleId, next_index};
use crate::parsed::Restriction;

// =============================================================================
// Types
// =============================================================================

/// One step of a type's derivation chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedefOrigin {
    /// Name of the typedef.
    pub name: String,
    /// Module defining the typedef.
    pub module: String,
}

/// A fully resolved type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledType {
    /// Name as written at the use site.
    pub name: String,
    /// The built-in type at the root of the derivation chain.
    pub base: BuiltinType,
    /// Typedefs traversed from the use site to the base, outermost first.
    pub derived_from: Vec<TypedefOrigin>,
    /// Default inherited from the typedef chain.
    pub default: Option<String>,
    /// Units inherited from the typedef chain.
    pub units: Option<String>,
    /// Restrictions collected along the chain, innermost last.
    pub restrictions: Vec<Restriction>,
    /// Resolved union members.
    pub members: Vec<CompiledType>,
    /// Enumeration member names.
    pub enums: Vec<String>,
    /// Leafref target path.
    pub path: Option<String>,
}

impl CompiledType {
    /// Creates a type that is directly a built-in.
    #[must_use]
    pub fn builtin(base: BuiltinType) -> Self {
        Self {
            name: base.name().to_string(),
            base,
            derived_from: Vec::new(),
            default: None,
            units: None,
            restrictions: Vec::new(),
            members: Vec::new(),
            enums: Vec::new(),
            path: None,
        }
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// The closed set of compiled node kinds.
///
/// Groupings, uses and augments do not survive compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompiledKind {
    /// `container`
    Container,
    /// `list`
    List,
    /// `leaf`
    Leaf,
    /// `leaf-list`
    LeafList,
    /// `choice`
    Choice,
    /// `case`
    Case,
    /// `anydata`
    AnyData,
    /// `anyxml`
    AnyXml,
    /// `rpc`
    Rpc,
    /// `action`
    Action,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `notification`
    Notification,
}

impl CompiledKind {
    /// Every compiled node kind.
    pub const ALL: [CompiledKind; 13] = [
        Self::Container,
        Self::List,
        Self::Leaf,
        Self::LeafList,
        Self::Choice,
        Self::Case,
        Self::AnyData,
        Self::AnyXml,
        Self::Rpc,
        Self::Action,
        Self::Input,
        Self::Output,
        Self::Notification,
    ];

    /// Returns the statement keyword of this kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::List => "list",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::AnyData => "anydata",
            Self::AnyXml => "anyxml",
            Self::Rpc => "rpc",
            Self::Action => "action",
            Self::Input => "input",
            Self::Output => "output",
            Self::Notification => "notification",
        }
    }
}

/// Kind-specific part of a compiled node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompiledBody {
    /// `container`
    Container {
        /// Presence meaning.
        presence: Option<String>,
        /// Data children.
        children: Vec<CompiledNodeId>,
        /// Actions.
        actions: Vec<CompiledNodeId>,
        /// Notifications.
        notifications: Vec<CompiledNodeId>,
    },
    /// `list`
    List {
        /// Key leaf names.
        keys: Vec<String>,
        /// Data children.
        children: Vec<CompiledNodeId>,
        /// Actions.
        actions: Vec<CompiledNodeId>,
        /// Notifications.
        notifications: Vec<CompiledNodeId>,
    },
    /// `leaf`
    Leaf {
        /// Resolved type.
        ty: CompiledType,
        /// Effective default.
        default: Option<String>,
        /// Effective units.
        units: Option<String>,
        /// Mandatory flag.
        mandatory: bool,
    },
    /// `leaf-list`
    LeafList {
        /// Resolved element type.
        ty: CompiledType,
        /// Effective defaults.
        defaults: Vec<String>,
        /// Effective units.
        units: Option<String>,
    },
    /// `choice`
    Choice {
        /// Default case.
        default: Option<String>,
        /// Mandatory flag.
        mandatory: bool,
        /// Cases.
        children: Vec<CompiledNodeId>,
    },
    /// `case`
    Case {
        /// Data children.
        children: Vec<CompiledNodeId>,
    },
    /// `anydata`
    AnyData {
        /// Mandatory flag.
        mandatory: bool,
    },
    /// `anyxml`
    AnyXml {
        /// Mandatory flag.
        mandatory: bool,
    },
    /// `rpc`
    Rpc {
        /// The input node.
        input: Option<CompiledNodeId>,
        /// The output node.
        output: Option<CompiledNodeId>,
    },
    /// `action`
    Action {
        /// The input node.
        input: Option<CompiledNodeId>,
        /// The output node.
        output: Option<CompiledNodeId>,
    },
    /// `input`
    Input {
        /// Data children.
        children: Vec<CompiledNodeId>,
    },
    /// `output`
    Output {
        /// Data children.
        children: Vec<CompiledNodeId>,
    },
    /// `notification`
    Notification {
        /// Data children.
        children: Vec<CompiledNodeId>,
    },
}

impl CompiledBody {
    /// Returns the kind tag of this body.
    #[must_use]
    pub const fn kind(&self) -> CompiledKind {
        match self {
            Self::Container { .. } => CompiledKind::Container,
            Self::List { .. } => CompiledKind::List,
            Self::Leaf { .. } => CompiledKind::Leaf,
            Self::LeafList { .. } => CompiledKind::LeafList,
            Self::Choice { .. } => CompiledKind::Choice,
            Self::Case { .. } => CompiledKind::Case,
            Self::AnyData { .. } => CompiledKind::AnyData,
            Self::AnyXml { .. } => CompiledKind::AnyXml,
            Self::Rpc { .. } => CompiledKind::Rpc,
            Self::Action { .. } => CompiledKind::Action,
            Self::Input { .. } => CompiledKind::Input,
            Self::Output { .. } => CompiledKind::Output,
            Self::Notification { .. } => CompiledKind::Notification,
        }
    }
}

/// A compiled schema node.
pub struct CompiledNode {
    /// Node name.
    pub name: String,
    /// Module whose namespace the node belongs to.
    pub module: ModuleId,
    /// Enclosing node; `None` at module top level.
    pub parent: Option<CompiledNodeId>,
    /// Effective config flag.
    pub config: bool,
    /// Description.
    pub description: Option<String>,
    /// `if-feature` expressions, including those inherited from `uses`.
    pub if_features: Vec<String>,
    /// `when` condition.
    pub when: Option<String>,
    /// Kind-specific part.
    pub body: CompiledBody,
    /// Data attached by the embedding application.
    pub private: Option<Box<dyn Any>>,
}

impl CompiledNode {
    /// Creates a node with default flags.
    #[must_use]
    pub fn new(name: impl Into<String>, module: ModuleId, body: CompiledBody) -> Self {
        Self {
            name: name.into(),
            module,
            parent: None,
            config: true,
            description: None,
            if_features: Vec::new(),
            when: None,
            body,
            private: None,
        }
    }

    /// Returns the kind tag.
    #[must_use]
    pub const fn kind(&self) -> CompiledKind {
        self.body.kind()
    }
}

impl fmt::Debug for CompiledNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledNode")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("parent", &self.parent)
            .field("config", &self.config)
            .field("body", &self.body)
            .field("private", &self.private.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CompiledModule
// =============================================================================

/// One resolved import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledImport {
    /// Local prefix.
    pub prefix: String,
    /// Registry entry of the imported module.
    pub module: ModuleId,
}

/// A compiled module.
#[derive(Debug, Default)]
pub struct CompiledModule {
    /// Registry handle of this module.
    pub id: ModuleId,
    /// Module name.
    pub name: String,
    /// Newest revision.
    pub revision: Option<String>,
    /// Namespace URI.
    pub namespace: String,
    /// Own prefix.
    pub prefix: String,
    /// Import table.
    pub imports: Vec<CompiledImport>,
    /// Features defined by the module and its submodules.
    pub features: Vec<String>,
    /// Top-level data nodes.
    pub data: Vec<CompiledNodeId>,
    /// RPCs.
    pub rpcs: Vec<CompiledNodeId>,
    /// Top-level notifications.
    pub notifications: Vec<CompiledNodeId>,
    nodes: Vec<CompiledNode>,
}

impl CompiledModule {
    /// Creates an empty compiled module.
    #[must_use]
    pub fn new(id: ModuleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a node to the arena and returns its id.
    pub fn add_node(&mut self, node: CompiledNode) -> CompiledNodeId {
        let id = CompiledNodeId(next_index(self.nodes.len()));
        self.nodes.push(node);
        id
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this module.
    #[must_use]
    pub fn node(&self, id: CompiledNodeId) -> &CompiledNode {
        &self.nodes[id.index()]
    }

    /// Returns the node with the given id mutably.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this module.
    pub fn node_mut(&mut self, id: CompiledNodeId) -> &mut CompiledNode {
        &mut self.nodes[id.index()]
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates every node with its id.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (CompiledNodeId, &CompiledNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (CompiledNodeId(next_index(i)), node))
    }

    /// Drains the node arena, leaving the module without nodes.
    pub fn take_nodes(&mut self) -> Vec<CompiledNode> {
        self.data.clear();
        self.rpcs.clear();
        self.notifications.clear();
        std::mem::take(&mut self.nodes)
    }
}
