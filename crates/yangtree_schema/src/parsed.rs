//! The parsed schema tree.
//!
//! A [`ParsedModule`] mirrors the source structure of one (sub)module. Its
//! schema nodes live in an arena owned by the module; every node keeps a
//! non-owning [`NodeId`] link to its parent so that scoped lookups can walk
//! outwards.

use yangtree_foundation::{Revision, Span};

use crate::ids::{ModuleId, NodeId, next_index};

// =============================================================================
// Module-level statements
// =============================================================================

/// A prefix declaration with its location.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Prefix {
    /// The prefix string.
    pub value: String,
    /// Location of the `prefix` statement.
    pub span: Span,
}

impl Prefix {
    /// Creates a new prefix declaration.
    #[must_use]
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }
}

/// An `import` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    /// Name of the imported module.
    pub name: String,
    /// Local prefix assigned to the imported module.
    pub prefix: Prefix,
    /// Requested revision, if pinned.
    pub revision: Option<String>,
    /// Location of the `import` statement.
    pub span: Span,
    /// Registry entry of the imported module, once loaded.
    pub module: Option<ModuleId>,
}

impl Import {
    /// Creates an unresolved import.
    #[must_use]
    pub fn new(name: impl Into<String>, prefix: Prefix, span: Span) -> Self {
        Self {
            name: name.into(),
            prefix,
            revision: None,
            span,
            module: None,
        }
    }
}

/// An `include` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Include {
    /// Name of the included submodule.
    pub name: String,
    /// Requested revision, if pinned.
    pub revision: Option<String>,
    /// Location of the `include` statement.
    pub span: Span,
    /// The parsed submodule, once loaded.
    pub submodule: Option<Box<ParsedModule>>,
}

impl Include {
    /// Creates an unresolved include.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            revision: None,
            span,
            submodule: None,
        }
    }
}

/// The `belongs-to` statement of a submodule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BelongsTo {
    /// Name of the main module.
    pub module: String,
    /// Prefix the submodule uses for its main module.
    pub prefix: Prefix,
}

/// A `feature` definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feature {
    /// Feature name.
    pub name: String,
    /// Location of the statement.
    pub span: Span,
}

/// An `extension` definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extension {
    /// Extension name.
    pub name: String,
    /// Name of the extension's argument, if it takes one.
    pub argument: Option<String>,
    /// Location of the statement.
    pub span: Span,
}

/// An instance of an extension (`prefix:keyword argument;`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionInstance {
    /// The prefixed keyword.
    pub keyword: String,
    /// The argument, if any.
    pub argument: Option<String>,
    /// Location of the statement.
    pub span: Span,
}

/// YANG language version of a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum YangVersion {
    /// Version 1 (RFC 6020).
    #[default]
    V1,
    /// Version 1.1 (RFC 7950).
    V1_1,
}

// =============================================================================
// Types and typedefs
// =============================================================================

/// A restriction substatement of a type (`range`, `length`, `pattern`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Restriction {
    /// The restriction keyword.
    pub keyword: String,
    /// The restriction argument.
    pub value: String,
}

/// A `type` statement as written.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TypeRef {
    /// Type name, possibly `prefix:name`.
    pub name: String,
    /// Location of the `type` statement.
    pub span: Span,
    /// Range, length, and pattern restrictions.
    pub restrictions: Vec<Restriction>,
    /// Member types of a union.
    pub members: Vec<TypeRef>,
    /// Names of enumeration members.
    pub enums: Vec<String>,
    /// Target path of a leafref.
    pub path: Option<String>,
}

impl TypeRef {
    /// Creates a bare type reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            ..Self::default()
        }
    }
}

/// A `typedef` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typedef {
    /// Name of the derived type.
    pub name: String,
    /// The base type.
    pub type_ref: TypeRef,
    /// Default value.
    pub default: Option<String>,
    /// Units.
    pub units: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Location of the statement.
    pub span: Span,
}

impl Typedef {
    /// Creates a typedef deriving from `type_ref`.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef, span: Span) -> Self {
        Self {
            name: name.into(),
            type_ref,
            default: None,
            units: None,
            description: None,
            span,
        }
    }
}

/// A `refine` statement inside `uses`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Refine {
    /// Descendant path of the refined node.
    pub target: String,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement default.
    pub default: Option<String>,
    /// Replacement mandatory flag.
    pub mandatory: Option<bool>,
    /// Replacement presence.
    pub presence: Option<String>,
    /// Replacement config flag.
    pub config: Option<bool>,
    /// Location of the statement.
    pub span: Span,
}

/// What a `deviate` statement does to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviateKind {
    /// `deviate not-supported`: the target is removed.
    NotSupported,
    /// `deviate add`
    Add,
    /// `deviate replace`
    Replace,
    /// `deviate delete`
    Delete,
}

impl DeviateKind {
    /// Every deviate kind.
    pub const ALL: [DeviateKind; 4] = [Self::NotSupported, Self::Add, Self::Replace, Self::Delete];

    /// Parses the argument of a `deviate` statement.
    #[must_use]
    pub fn from_argument(argument: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.argument() == argument)
    }

    /// Returns the `deviate` argument naming this kind.
    #[must_use]
    pub const fn argument(self) -> &'static str {
        match self {
            Self::NotSupported => "not-supported",
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Delete => "delete",
        }
    }
}

/// A `deviate` statement with the properties it touches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deviate {
    /// Operation.
    pub kind: DeviateKind,
    /// New type (`replace` only).
    pub type_ref: Option<TypeRef>,
    /// Units.
    pub units: Option<String>,
    /// Default values; more than one only for leaf-lists.
    pub defaults: Vec<String>,
    /// Config flag (`add` and `replace`).
    pub config: Option<bool>,
    /// Mandatory flag (`add` and `replace`).
    pub mandatory: Option<bool>,
    /// Location of the statement.
    pub span: Span,
}

impl Deviate {
    /// Creates a deviate that touches no property yet.
    #[must_use]
    pub fn new(kind: DeviateKind, span: Span) -> Self {
        Self {
            kind,
            type_ref: None,
            units: None,
            defaults: Vec::new(),
            config: None,
            mandatory: None,
            span,
        }
    }
}

/// A `deviation` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deviation {
    /// Absolute schema node identifier of the deviated node.
    pub target: String,
    /// Description.
    pub description: Option<String>,
    /// Deviates in source order.
    pub deviates: Vec<Deviate>,
    /// Location of the statement.
    pub span: Span,
}

// =============================================================================
// Schema nodes
// =============================================================================

/// The closed set of parsed node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
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
    /// `uses`
    Uses,
    /// `augment`
    Augment,
    /// `grouping`
    Grouping,
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

impl NodeKind {
    /// Every parsed node kind.
    pub const ALL: [NodeKind; 16] = [
        Self::Container,
        Self::List,
        Self::Leaf,
        Self::LeafList,
        Self::Choice,
        Self::Case,
        Self::AnyData,
        Self::AnyXml,
        Self::Uses,
        Self::Augment,
        Self::Grouping,
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
            Self::Uses => "uses",
            Self::Augment => "augment",
            Self::Grouping => "grouping",
            Self::Rpc => "rpc",
            Self::Action => "action",
            Self::Input => "input",
            Self::Output => "output",
            Self::Notification => "notification",
        }
    }
}

/// Body of a `container`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ContainerBody {
    /// Presence meaning, if a presence container.
    pub presence: Option<String>,
    /// Scoped typedefs.
    pub typedefs: Vec<Typedef>,
    /// Scoped groupings.
    pub groupings: Vec<NodeId>,
    /// Data children.
    pub children: Vec<NodeId>,
    /// Actions.
    pub actions: Vec<NodeId>,
    /// Notifications.
    pub notifications: Vec<NodeId>,
}

/// Body of a `list`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ListBody {
    /// Space-separated key leaf names.
    pub key: Option<String>,
    /// Scoped typedefs.
    pub typedefs: Vec<Typedef>,
    /// Scoped groupings.
    pub groupings: Vec<NodeId>,
    /// Data children.
    pub children: Vec<NodeId>,
    /// Actions.
    pub actions: Vec<NodeId>,
    /// Notifications.
    pub notifications: Vec<NodeId>,
}

/// Body of a `leaf`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LeafBody {
    /// The leaf's type.
    pub type_ref: TypeRef,
    /// Default value.
    pub default: Option<String>,
    /// Units.
    pub units: Option<String>,
    /// Mandatory flag.
    pub mandatory: Option<bool>,
}

/// Body of a `leaf-list`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LeafListBody {
    /// The element type.
    pub type_ref: TypeRef,
    /// Default values.
    pub defaults: Vec<String>,
    /// Units.
    pub units: Option<String>,
}

/// Body of a `choice`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ChoiceBody {
    /// Default case.
    pub default: Option<String>,
    /// Mandatory flag.
    pub mandatory: Option<bool>,
    /// Cases and shorthand cases.
    pub children: Vec<NodeId>,
}

/// Body of a `case`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CaseBody {
    /// Data children.
    pub children: Vec<NodeId>,
}

/// Body of `anydata` and `anyxml`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AnyBody {
    /// Mandatory flag.
    pub mandatory: Option<bool>,
}

/// Body of a `uses`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UsesBody {
    /// Name of the grouping, possibly prefixed.
    pub grouping: String,
    /// Refinements of the instantiated nodes.
    pub refines: Vec<Refine>,
    /// Inline `augment` statements (the node's child slot).
    pub augments: Vec<NodeId>,
}

/// Body of an `augment`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AugmentBody {
    /// Target schema node identifier.
    pub target: String,
    /// Data children added to the target.
    pub children: Vec<NodeId>,
    /// Actions added to the target.
    pub actions: Vec<NodeId>,
    /// Notifications added to the target.
    pub notifications: Vec<NodeId>,
}

/// Body of a `grouping`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GroupingBody {
    /// Scoped typedefs.
    pub typedefs: Vec<Typedef>,
    /// Nested groupings.
    pub groupings: Vec<NodeId>,
    /// Data children.
    pub children: Vec<NodeId>,
    /// Actions.
    pub actions: Vec<NodeId>,
    /// Notifications.
    pub notifications: Vec<NodeId>,
}

/// Body of `rpc` and `action`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ActionBody {
    /// Scoped typedefs.
    pub typedefs: Vec<Typedef>,
    /// Scoped groupings.
    pub groupings: Vec<NodeId>,
    /// The `input` node.
    pub input: Option<NodeId>,
    /// The `output` node.
    pub output: Option<NodeId>,
}

/// Body of `input` and `output`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct InOutBody {
    /// Scoped typedefs.
    pub typedefs: Vec<Typedef>,
    /// Scoped groupings.
    pub groupings: Vec<NodeId>,
    /// Data children.
    pub children: Vec<NodeId>,
}

/// Body of a `notification`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct NotificationBody {
    /// Scoped typedefs.
    pub typedefs: Vec<Typedef>,
    /// Scoped groupings.
    pub groupings: Vec<NodeId>,
    /// Data children.
    pub children: Vec<NodeId>,
}

/// Kind-specific part of a parsed node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeBody {
    /// `container`
    Container(ContainerBody),
    /// `list`
    List(ListBody),
    /// `leaf`
    Leaf(LeafBody),
    /// `leaf-list`
    LeafList(LeafListBody),
    /// `choice`
    Choice(ChoiceBody),
    /// `case`
    Case(CaseBody),
    /// `anydata`
    AnyData(AnyBody),
    /// `anyxml`
    AnyXml(AnyBody),
    /// `uses`
    Uses(UsesBody),
    /// `augment`
    Augment(AugmentBody),
    /// `grouping`
    Grouping(GroupingBody),
    /// `rpc`
    Rpc(ActionBody),
    /// `action`
    Action(ActionBody),
    /// `input`
    Input(InOutBody),
    /// `output`
    Output(InOutBody),
    /// `notification`
    Notification(NotificationBody),
}

impl NodeBody {
    /// Creates an empty body of the given kind.
    #[must_use]
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Container => Self::Container(ContainerBody::default()),
            NodeKind::List => Self::List(ListBody::default()),
            NodeKind::Leaf => Self::Leaf(LeafBody::default()),
            NodeKind::LeafList => Self::LeafList(LeafListBody::default()),
            NodeKind::Choice => Self::Choice(ChoiceBody::default()),
            NodeKind::Case => Self::Case(CaseBody::default()),
            NodeKind::AnyData => Self::AnyData(AnyBody::default()),
            NodeKind::AnyXml => Self::AnyXml(AnyBody::default()),
            NodeKind::Uses => Self::Uses(UsesBody::default()),
            NodeKind::Augment => Self::Augment(AugmentBody::default()),
            NodeKind::Grouping => Self::Grouping(GroupingBody::default()),
            NodeKind::Rpc => Self::Rpc(ActionBody::default()),
            NodeKind::Action => Self::Action(ActionBody::default()),
            NodeKind::Input => Self::Input(InOutBody::default()),
            NodeKind::Output => Self::Output(InOutBody::default()),
            NodeKind::Notification => Self::Notification(NotificationBody::default()),
        }
    }

    /// Returns the kind tag of this body.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Container(_) => NodeKind::Container,
            Self::List(_) => NodeKind::List,
            Self::Leaf(_) => NodeKind::Leaf,
            Self::LeafList(_) => NodeKind::LeafList,
            Self::Choice(_) => NodeKind::Choice,
            Self::Case(_) => NodeKind::Case,
            Self::AnyData(_) => NodeKind::AnyData,
            Self::AnyXml(_) => NodeKind::AnyXml,
            Self::Uses(_) => NodeKind::Uses,
            Self::Augment(_) => NodeKind::Augment,
            Self::Grouping(_) => NodeKind::Grouping,
            Self::Rpc(_) => NodeKind::Rpc,
            Self::Action(_) => NodeKind::Action,
            Self::Input(_) => NodeKind::Input,
            Self::Output(_) => NodeKind::Output,
            Self::Notification(_) => NodeKind::Notification,
        }
    }
}

/// A parsed schema node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedNode {
    /// Node name (the grouping name for `uses`, the target for `augment`).
    pub name: String,
    /// Enclosing node; `None` at module top level.
    pub parent: Option<NodeId>,
    /// Location of the statement.
    pub span: Span,
    /// Description.
    pub description: Option<String>,
    /// Explicit config flag.
    pub config: Option<bool>,
    /// `if-feature` expressions.
    pub if_features: Vec<String>,
    /// `when` condition.
    pub when: Option<String>,
    /// Kind-specific part.
    pub body: NodeBody,
}

impl ParsedNode {
    /// Creates a node with an empty body of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind, name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            parent: None,
            span,
            description: None,
            config: None,
            if_features: Vec::new(),
            when: None,
            body: NodeBody::empty(kind),
        }
    }

    /// Returns the kind tag.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.body.kind()
    }
}

// =============================================================================
// ParsedModule
// =============================================================================

/// A parsed module or submodule.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ParsedModule {
    /// Module name.
    pub name: String,
    /// Location of the `module`/`submodule` statement.
    pub span: Span,
    /// Own prefix. For submodules, the `belongs-to` prefix.
    pub prefix: Prefix,
    /// Namespace URI (modules only).
    pub namespace: Option<String>,
    /// Language version.
    pub yang_version: YangVersion,
    /// `belongs-to`, present only for submodules.
    pub belongs_to: Option<BelongsTo>,
    /// Organization.
    pub organization: Option<String>,
    /// Contact.
    pub contact: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Imports in source order.
    pub imports: Vec<Import>,
    /// Includes in source order.
    pub includes: Vec<Include>,
    /// Revisions, newest first once normalized.
    pub revisions: Vec<Revision>,
    /// Feature definitions.
    pub features: Vec<Feature>,
    /// Extension definitions.
    pub extensions: Vec<Extension>,
    /// Extension instances at module level.
    pub extension_instances: Vec<ExtensionInstance>,
    /// Top-level typedefs.
    pub typedefs: Vec<Typedef>,
    /// Top-level groupings.
    pub groupings: Vec<NodeId>,
    /// Top-level data nodes.
    pub data: Vec<NodeId>,
    /// RPCs.
    pub rpcs: Vec<NodeId>,
    /// Top-level notifications.
    pub notifications: Vec<NodeId>,
    /// Top-level augments.
    pub augments: Vec<NodeId>,
    /// Deviations.
    pub deviations: Vec<Deviation>,
    /// Node arena.
    nodes: Vec<ParsedNode>,
}

impl ParsedModule {
    /// Creates an empty module.
    #[must_use]
    pub fn new(name: impl Into<String>, prefix: Prefix) -> Self {
        Self {
            name: name.into(),
            prefix,
            ..Self::default()
        }
    }

    /// Returns true for submodules.
    #[must_use]
    pub fn is_submodule(&self) -> bool {
        self.belongs_to.is_some()
    }

    /// Returns the newest revision, if any.
    ///
    /// Only meaningful once revisions were normalized.
    #[must_use]
    pub fn revision(&self) -> Option<&str> {
        self.revisions.first().map(|r| r.date.as_str())
    }

    /// Adds a node to the arena and returns its id.
    pub fn add_node(&mut self, node: ParsedNode) -> NodeId {
        let id = NodeId(next_index(self.nodes.len()));
        self.nodes.push(node);
        id
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this module.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ParsedNode {
        &self.nodes[id.index()]
    }

    /// Returns the node with the given id mutably.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this module.
    pub fn node_mut(&mut self, id: NodeId) -> &mut ParsedNode {
        &mut self.nodes[id.index()]
    }

    /// Returns the node with the given id, if it belongs to this module.
    #[must_use]
    pub fn get_node(&self, id: NodeId) -> Option<&ParsedNode> {
        self.nodes.get(id.index())
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates every node with its id.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &ParsedNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(next_index(i)), node))
    }

    /// Iterates `start` and then each of its ancestors, innermost first.
    pub fn ancestors(&self, start: NodeId) -> Ancestors<'_> {
        Ancestors {
            module: self,
            next: Some(start),
        }
    }

    /// Returns the import using `prefix`.
    #[must_use]
    pub fn import_by_prefix(&self, prefix: &str) -> Option<&Import> {
        self.imports.iter().find(|imp| imp.prefix.value == prefix)
    }

    /// Returns the loaded submodules of this module, recursively.
    ///
    /// A submodule reached through several includes is listed once, at its
    /// first occurrence.
    pub fn submodules(&self) -> Vec<&ParsedModule> {
        let mut out = Vec::new();
        self.collect_submodules(&mut out);
        out
    }

    fn collect_submodules<'a>(&'a self, out: &mut Vec<&'a ParsedModule>) {
        for include in &self.includes {
            let Some(sub) = include.submodule.as_deref() else {
                continue;
            };
            if out.iter().any(|seen| seen.name == sub.name) {
                continue;
            }
            out.push(sub);
            sub.collect_submodules(out);
        }
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    module: &'a ParsedModule,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.module.get_node(current).and_then(|n| n.parent);
        Some(current)
    }
}
