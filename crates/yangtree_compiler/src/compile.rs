//! Compilation of a parsed module into its compiled tree.
//!
//! The compiler works on a private [`CompiledModule`]; the caller installs it
//! only when compilation succeeded. Steps:
//!
//! 1. Build the import table and feature list of the module and its
//!    submodules.
//! 2. Compile data nodes, rpcs and notifications. Each `uses` is replaced by
//!    a fresh instance of its grouping, with refines and augments applied.
//! 3. Apply top-level augments.
//! 4. Apply deviations.

use tracing::debug;
use yangtree_foundation::{Error, Result};
use yangtree_schema::{
    BuiltinType, CompiledBody, CompiledImport, CompiledKind, CompiledModule, CompiledNode,
    CompiledNodeId, CompiledType, DeviateKind, Deviation, ModuleId, NodeBody, NodeId, NodeKind, ParsedModule, TypeRef,
    Typedef, TypedefOrigin, UsesBody, compiled_node_actions_mut, compiled_node_children,
    compiled_node_children_mut, compiled_node_notifications_mut,
};

use crate::amend::{apply_deviate, apply_refine, find_absolute, find_descendant};
use crate::lookup::{LookupScope, TypedefLookup, find_grouping, find_typedef};
use crate::prefix::{PrefixTarget, resolve_prefix, split_prefixed};
use crate::registry::ModuleRegistry;

/// Compiles `parsed` as module `id` of `registry`.
///
/// # Errors
/// - `NotFound` for an unresolved import, prefix, typedef, grouping or
///   schema node path
/// - `Validation` for semantic errors (recursive groupings or typedefs,
///   config conflicts, bad list keys, invalid refines, foreign augments or
///   deviations, deviates that do not fit their target)
pub fn compile_module(
    registry: &ModuleRegistry,
    id: ModuleId,
    parsed: &ParsedModule,
) -> Result<CompiledModule> {
    let mut compiler = Compiler {
        registry,
        out: CompiledModule::new(id, &parsed.name),
        groupings: Vec::new(),
        typedefs: Vec::new(),
    };
    compiler.compile(parsed)?;
    debug!(
        module = %parsed.name,
        ?id,
        nodes = compiler.out.node_count(),
        "module compiled"
    );
    Ok(compiler.out)
}

/// A module or submodule together with its main module.
#[derive(Clone, Copy)]
struct Unit<'a> {
    unit: &'a ParsedModule,
    main: &'a ParsedModule,
}

impl<'a> Unit<'a> {
    fn scope(self, node: Option<NodeId>) -> LookupScope<'a> {
        LookupScope {
            unit: self.unit,
            main: self.main,
            node,
        }
    }
}

/// Properties inherited down the tree.
#[derive(Clone, Copy)]
struct Flags {
    config: bool,
    operation: bool,
}

impl Flags {
    const DATA: Self = Self {
        config: true,
        operation: false,
    };
    const OPERATION: Self = Self {
        config: false,
        operation: true,
    };
}

struct Compiler<'a> {
    registry: &'a ModuleRegistry,
    out: CompiledModule,
    /// Groupings being instantiated, for recursion detection.
    groupings: Vec<(&'a ParsedModule, NodeId)>,
    /// Typedefs being resolved, for loop detection.
    typedefs: Vec<&'a Typedef>,
}

impl<'a> Compiler<'a> {
    fn compile(&mut self, main: &'a ParsedModule) -> Result<()> {
        self.out.revision = main.revision().map(str::to_string);
        self.out.namespace = main.namespace.clone().unwrap_or_default();
        self.out.prefix = main.prefix.value.clone();

        let units: Vec<&'a ParsedModule> = std::iter::once(main).chain(main.submodules()).collect();
        for unit in &units {
            for import in &unit.imports {
                let module = import
                    .module
                    .ok_or_else(|| Error::not_found("module", &import.name))?;
                if !self.out.imports.iter().any(|i| i.prefix == import.prefix.value) {
                    self.out.imports.push(CompiledImport {
                        prefix: import.prefix.value.clone(),
                        module,
                    });
                }
            }
            self.out
                .features
                .extend(unit.features.iter().map(|f| f.name.clone()));
        }

        for &unit in &units {
            let u = Unit { unit, main };
            for &id in &unit.data {
                let added = self.compile_child(u, id, None, Flags::DATA)?;
                self.attach_top(&added, unit.node(id).span.line)?;
            }
            for &id in &unit.rpcs {
                let rpc = self.compile_node(u, id, None, Flags::OPERATION)?;
                self.out.rpcs.push(rpc);
            }
            for &id in &unit.notifications {
                let notification = self.compile_node(u, id, None, Flags::OPERATION)?;
                self.out.notifications.push(notification);
            }
        }

        for &unit in &units {
            let u = Unit { unit, main };
            for &id in &unit.augments {
                self.apply_top_augment(u, id)?;
            }
        }

        let units: Vec<Unit<'a>> = units.into_iter().map(|unit| Unit { unit, main }).collect();
        self.apply_deviations(&units)
    }

    // -------------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------------

    /// Compiles a child statement; a `uses` yields its grouping's nodes.
    fn compile_child(
        &mut self,
        u: Unit<'a>,
        id: NodeId,
        parent: Option<CompiledNodeId>,
        flags: Flags,
    ) -> Result<Vec<CompiledNodeId>> {
        match &u.unit.node(id).body {
            NodeBody::Uses(body) => self.expand_uses(u, id, body, parent, flags),
            NodeBody::Grouping(_) | NodeBody::Augment(_) => Ok(Vec::new()),
            NodeBody::Container(_)
            | NodeBody::List(_)
            | NodeBody::Leaf(_)
            | NodeBody::LeafList(_)
            | NodeBody::Choice(_)
            | NodeBody::Case(_)
            | NodeBody::AnyData(_)
            | NodeBody::AnyXml(_)
            | NodeBody::Rpc(_)
            | NodeBody::Action(_)
            | NodeBody::Input(_)
            | NodeBody::Output(_)
            | NodeBody::Notification(_) => Ok(vec![self.compile_node(u, id, parent, flags)?]),
        }
    }

    fn compile_node(
        &mut self,
        u: Unit<'a>,
        id: NodeId,
        parent: Option<CompiledNodeId>,
        inherited: Flags,
    ) -> Result<CompiledNodeId> {
        let node = u.unit.node(id);
        let line = node.span.line;
        let flags = node_flags(&node.name, node.config, inherited, line)?;

        let body = match &node.body {
            NodeBody::Container(b) => CompiledBody::Container {
                presence: b.presence.clone(),
                children: Vec::new(),
                actions: Vec::new(),
                notifications: Vec::new(),
            },
            NodeBody::List(b) => CompiledBody::List {
                keys: b
                    .key
                    .as_deref()
                    .map(|k| k.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
                children: Vec::new(),
                actions: Vec::new(),
                notifications: Vec::new(),
            },
            NodeBody::Leaf(b) => {
                let ty = self.resolve_type(u, Some(id), &b.type_ref)?;
                let mandatory = b.mandatory.unwrap_or(false);
                if mandatory && b.default.is_some() {
                    return Err(Error::validation(
                        format!("leaf \"{}\" is mandatory and has a default", node.name),
                        line,
                    ));
                }
                let default = if mandatory {
                    None
                } else {
                    b.default.clone().or_else(|| ty.default.clone())
                };
                let units = b.units.clone().or_else(|| ty.units.clone());
                CompiledBody::Leaf {
                    ty,
                    default,
                    units,
                    mandatory,
                }
            }
            NodeBody::LeafList(b) => {
                let ty = self.resolve_type(u, Some(id), &b.type_ref)?;
                let defaults = if b.defaults.is_empty() {
                    ty.default.iter().cloned().collect()
                } else {
                    b.defaults.clone()
                };
                let units = b.units.clone().or_else(|| ty.units.clone());
                CompiledBody::LeafList {
                    ty,
                    defaults,
                    units,
                }
            }
            NodeBody::Choice(b) => CompiledBody::Choice {
                default: b.default.clone(),
                mandatory: b.mandatory.unwrap_or(false),
                children: Vec::new(),
            },
            NodeBody::Case(_) => CompiledBody::Case {
                children: Vec::new(),
            },
            NodeBody::AnyData(b) => CompiledBody::AnyData {
                mandatory: b.mandatory.unwrap_or(false),
            },
            NodeBody::AnyXml(b) => CompiledBody::AnyXml {
                mandatory: b.mandatory.unwrap_or(false),
            },
            NodeBody::Rpc(_) => CompiledBody::Rpc {
                input: None,
                output: None,
            },
            NodeBody::Action(_) => CompiledBody::Action {
                input: None,
                output: None,
            },
            NodeBody::Input(_) => CompiledBody::Input {
                children: Vec::new(),
            },
            NodeBody::Output(_) => CompiledBody::Output {
                children: Vec::new(),
            },
            NodeBody::Notification(_) => CompiledBody::Notification {
                children: Vec::new(),
            },
            NodeBody::Uses(_) | NodeBody::Grouping(_) | NodeBody::Augment(_) => {
                return Err(Error::invalid_argument(format!(
                    "\"{}\" does not compile to a schema node",
                    node.kind().keyword()
                )));
            }
        };

        let mut compiled = CompiledNode::new(node.name.clone(), self.out.id, body);
        compiled.parent = parent;
        compiled.config = flags.config;
        compiled.description.clone_from(&node.description);
        compiled.if_features.clone_from(&node.if_features);
        compiled.when.clone_from(&node.when);
        let cid = self.out.add_node(compiled);

        match &node.body {
            NodeBody::Container(b) => {
                self.compile_children(u, &b.children, cid, flags)?;
                self.compile_operations(u, &b.actions, &b.notifications, cid, line)?;
            }
            NodeBody::List(b) => {
                self.compile_children(u, &b.children, cid, flags)?;
                self.compile_operations(u, &b.actions, &b.notifications, cid, line)?;
                self.check_keys(cid, line)?;
            }
            NodeBody::Choice(b) => {
                for &child in &b.children {
                    self.compile_choice_member(u, child, cid, flags)?;
                }
                self.check_default_case(cid, line)?;
            }
            NodeBody::Case(b) => self.compile_children(u, &b.children, cid, flags)?,
            NodeBody::Input(b) | NodeBody::Output(b) => {
                self.compile_children(u, &b.children, cid, flags)?;
            }
            NodeBody::Notification(b) => self.compile_children(u, &b.children, cid, flags)?,
            NodeBody::Rpc(b) | NodeBody::Action(b) => {
                let input = b
                    .input
                    .map(|i| self.compile_node(u, i, Some(cid), Flags::OPERATION))
                    .transpose()?;
                let output = b
                    .output
                    .map(|o| self.compile_node(u, o, Some(cid), Flags::OPERATION))
                    .transpose()?;
                if let CompiledBody::Rpc { input: i, output: o }
                | CompiledBody::Action { input: i, output: o } = &mut self.out.node_mut(cid).body
                {
                    *i = input;
                    *o = output;
                }
            }
            NodeBody::Leaf(_)
            | NodeBody::LeafList(_)
            | NodeBody::AnyData(_)
            | NodeBody::AnyXml(_)
            | NodeBody::Uses(_)
            | NodeBody::Grouping(_)
            | NodeBody::Augment(_) => {}
        }
        Ok(cid)
    }

    fn compile_children(
        &mut self,
        u: Unit<'a>,
        children: &[NodeId],
        parent: CompiledNodeId,
        flags: Flags,
    ) -> Result<()> {
        for &child in children {
            let added = self.compile_child(u, child, Some(parent), flags)?;
            self.attach(parent, &added, u.unit.node(child).span.line)?;
        }
        Ok(())
    }

    /// Compiles a member of a choice, wrapping shorthand nodes in an
    /// implicit case of the same name.
    fn compile_choice_member(
        &mut self,
        u: Unit<'a>,
        member: NodeId,
        choice: CompiledNodeId,
        flags: Flags,
    ) -> Result<CompiledNodeId> {
        let node = u.unit.node(member);
        let line = node.span.line;
        if node.kind() == NodeKind::Case {
            let case = self.compile_node(u, member, Some(choice), flags)?;
            self.attach(choice, &[case], line)?;
            return Ok(case);
        }

        let mut case = CompiledNode::new(
            node.name.clone(),
            self.out.id,
            CompiledBody::Case {
                children: Vec::new(),
            },
        );
        case.parent = Some(choice);
        case.config = flags.config;
        let case = self.out.add_node(case);
        let added = self.compile_child(u, member, Some(case), flags)?;
        self.attach(case, &added, line)?;
        self.attach(choice, &[case], line)?;
        Ok(case)
    }

    /// Compiles actions and notifications into their slots of `parent`.
    fn compile_operations(
        &mut self,
        u: Unit<'a>,
        actions: &[NodeId],
        notifications: &[NodeId],
        parent: CompiledNodeId,
        line: u32,
    ) -> Result<()> {
        for &action in actions {
            let id = self.compile_node(u, action, Some(parent), Flags::OPERATION)?;
            let node = self.out.node_mut(parent);
            let name = node.name.clone();
            compiled_node_actions_mut(node)
                .ok_or_else(|| no_slot("actions", &name, line))?
                .push(id);
        }
        for &notification in notifications {
            let id = self.compile_node(u, notification, Some(parent), Flags::OPERATION)?;
            let node = self.out.node_mut(parent);
            let name = node.name.clone();
            compiled_node_notifications_mut(node)
                .ok_or_else(|| no_slot("notifications", &name, line))?
                .push(id);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Groupings and augments
    // -------------------------------------------------------------------------

    fn expand_uses(
        &mut self,
        u: Unit<'a>,
        uses_id: NodeId,
        body: &'a UsesBody,
        parent: Option<CompiledNodeId>,
        flags: Flags,
    ) -> Result<Vec<CompiledNodeId>> {
        let uses = u.unit.node(uses_id);
        let line = uses.span.line;
        let def = find_grouping(self.registry, &body.grouping, u.scope(Some(uses_id)))?;
        if self
            .groupings
            .iter()
            .any(|&(unit, g)| std::ptr::eq(unit, def.unit) && g == def.item)
        {
            return Err(Error::validation(
                format!("grouping \"{}\" is used recursively", body.grouping),
                line,
            ));
        }

        self.groupings.push((def.unit, def.item));
        let instance = Unit {
            unit: def.unit,
            main: def.main,
        };
        let expanded = self.instantiate(instance, def.item, parent, flags, line);
        self.groupings.pop();
        let added = expanded?;

        self.inherit_conditions(&added, &uses.if_features, uses.when.as_ref());
        for refine in &body.refines {
            apply_refine(&mut self.out, &added, refine)?;
        }
        for &augment in &body.augments {
            let NodeBody::Augment(ab) = &u.unit.node(augment).body else {
                continue;
            };
            let target = find_descendant(&self.out, &added, &ab.target)?;
            self.augment_into(u, augment, target)?;
        }
        Ok(added)
    }

    /// Compiles a fresh copy of a grouping's content under `parent`.
    fn instantiate(
        &mut self,
        u: Unit<'a>,
        grouping: NodeId,
        parent: Option<CompiledNodeId>,
        flags: Flags,
        line: u32,
    ) -> Result<Vec<CompiledNodeId>> {
        let NodeBody::Grouping(body) = &u.unit.node(grouping).body else {
            return Err(Error::invalid_argument("uses target is not a grouping"));
        };
        let mut added = Vec::new();
        for &child in &body.children {
            added.extend(self.compile_child(u, child, parent, flags)?);
        }
        if !body.actions.is_empty() || !body.notifications.is_empty() {
            let parent = parent.ok_or_else(|| no_slot("actions", "the module", line))?;
            self.compile_operations(u, &body.actions, &body.notifications, parent, line)?;
        }
        Ok(added)
    }

    /// Adds the content of augment `augment` to `target`.
    fn augment_into(&mut self, u: Unit<'a>, augment: NodeId, target: CompiledNodeId) -> Result<()> {
        let node = u.unit.node(augment);
        let NodeBody::Augment(body) = &node.body else {
            return Err(Error::invalid_argument("not an augment"));
        };
        let line = node.span.line;
        let target_node = self.out.node(target);
        let flags = Flags {
            config: target_node.config,
            operation: self.in_operation(target),
        };
        let is_choice = target_node.kind() == CompiledKind::Choice;

        let mut added = Vec::new();
        for &child in &body.children {
            if is_choice {
                added.push(self.compile_choice_member(u, child, target, flags)?);
                continue;
            }
            if u.unit.node(child).kind() == NodeKind::Case {
                return Err(Error::validation(
                    format!("augment target \"{}\" is not a choice", body.target),
                    line,
                ));
            }
            let ids = self.compile_child(u, child, Some(target), flags)?;
            self.attach(target, &ids, line)?;
            added.extend(ids);
        }
        self.inherit_conditions(&added, &node.if_features, node.when.as_ref());
        self.compile_operations(u, &body.actions, &body.notifications, target, line)
    }

    /// Applies a top-level augment; only the module's own nodes can be
    /// targeted.
    fn apply_top_augment(&mut self, u: Unit<'a>, augment: NodeId) -> Result<()> {
        let node = u.unit.node(augment);
        let NodeBody::Augment(body) = &node.body else {
            return Err(Error::invalid_argument("not an augment"));
        };
        let target = self.own_target(u, "augment", &body.target, node.span.line)?;
        self.augment_into(u, augment, target)
    }

    /// Resolves the absolute path of a top-level augment or deviation to
    /// one of the module's own nodes.
    fn own_target(&self, u: Unit<'a>, what: &str, path: &str, line: u32) -> Result<CompiledNodeId> {
        if !path.starts_with('/') {
            return Err(Error::validation(
                format!("{what} target \"{path}\" is not an absolute path"),
                line,
            ));
        }
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let (Some(prefix), _) = split_prefixed(segment) else {
                continue;
            };
            match resolve_prefix(u.unit, prefix) {
                None => return Err(Error::not_found("prefix", prefix)),
                Some(PrefixTarget::Own) => {}
                Some(PrefixTarget::Import(import)) => {
                    return Err(Error::validation(
                        format!(
                            "{what} of \"{path}\" targets module \"{}\"; only own nodes can be the target",
                            import.name
                        ),
                        line,
                    ));
                }
            }
        }
        find_absolute(&self.out, path).map_err(|_| Error::not_found(&format!("{what} target"), path))
    }

    /// Applies the deviations of the module and its submodules, in source
    /// order. Targets are resolved before any deviation is applied.
    fn apply_deviations(&mut self, units: &[Unit<'a>]) -> Result<()> {
        let mut resolved: Vec<(Unit<'a>, &'a Deviation, CompiledNodeId)> = Vec::new();
        for &u in units {
            for deviation in &u.unit.deviations {
                let target = self.own_target(u, "deviation", &deviation.target, deviation.span.line)?;
                resolved.push((u, deviation, target));
            }
        }

        for (i, &(_, deviation, target)) in resolved.iter().enumerate() {
            let removes = |d: &Deviation| d.deviates.iter().any(|x| x.kind == DeviateKind::NotSupported);
            let shared = resolved[..i].iter().find(|&&(_, _, other)| other == target);
            if let Some(&(_, earlier, _)) = shared {
                if removes(deviation) || removes(earlier) {
                    return Err(Error::validation(
                        format!(
                            "\"{}\" is deviated more than once with one deviation being \"not-supported\"",
                            deviation.target
                        ),
                        deviation.span.line,
                    ));
                }
            }
        }

        for (u, deviation, target) in resolved {
            for deviate in &deviation.deviates {
                let ty = deviate
                    .type_ref
                    .as_ref()
                    .map(|type_ref| self.resolve_type(u, None, type_ref))
                    .transpose()?;
                apply_deviate(&mut self.out, target, &deviation.target, deviate, ty)?;
            }
            debug!(target = %deviation.target, "deviation applied");
        }
        Ok(())
    }

    fn inherit_conditions(
        &mut self,
        ids: &[CompiledNodeId],
        if_features: &[String],
        when: Option<&String>,
    ) {
        for &id in ids {
            let node = self.out.node_mut(id);
            node.if_features.extend(if_features.iter().cloned());
            if node.when.is_none() {
                node.when = when.cloned();
            }
        }
    }

    // -------------------------------------------------------------------------
    // Types
    // -------------------------------------------------------------------------

    /// Resolves a type reference to its built-in base, recording the typedef
    /// chain and collecting restrictions, default and units along it.
    fn resolve_type(
        &mut self,
        u: Unit<'a>,
        node: Option<NodeId>,
        type_ref: &'a TypeRef,
    ) -> Result<CompiledType> {
        let mut ty = match find_typedef(self.registry, &type_ref.name, u.scope(node))? {
            TypedefLookup::Builtin(base) => {
                check_builtin(base, type_ref)?;
                CompiledType::builtin(base)
            }
            TypedefLookup::Typedef(def) => {
                if self.typedefs.iter().any(|&t| std::ptr::eq(t, def.item)) {
                    return Err(Error::validation(
                        format!("typedef \"{}\" is derived from itself", def.item.name),
                        def.item.span.line,
                    ));
                }
                self.typedefs.push(def.item);
                let inner = self.resolve_type(
                    Unit {
                        unit: def.unit,
                        main: def.main,
                    },
                    def.scope,
                    &def.item.type_ref,
                );
                self.typedefs.pop();

                let mut ty = inner?;
                ty.derived_from.insert(
                    0,
                    TypedefOrigin {
                        name: def.item.name.clone(),
                        module: def.main.name.clone(),
                    },
                );
                if def.item.default.is_some() {
                    ty.default.clone_from(&def.item.default);
                }
                if def.item.units.is_some() {
                    ty.units.clone_from(&def.item.units);
                }
                ty
            }
        };

        ty.name.clone_from(&type_ref.name);
        ty.restrictions.extend(type_ref.restrictions.iter().cloned());
        if !type_ref.enums.is_empty() {
            ty.enums.clone_from(&type_ref.enums);
        }
        if type_ref.path.is_some() {
            ty.path.clone_from(&type_ref.path);
        }
        if !type_ref.members.is_empty() {
            ty.members = type_ref
                .members
                .iter()
                .map(|member| self.resolve_type(u, node, member))
                .collect::<Result<_>>()?;
        }
        Ok(ty)
    }

    // -------------------------------------------------------------------------
    // Checks and helpers
    // -------------------------------------------------------------------------

    /// Appends `added` to the children of `parent`, rejecting duplicate names.
    fn attach(&mut self, parent: CompiledNodeId, added: &[CompiledNodeId], line: u32) -> Result<()> {
        let Some(existing) = compiled_node_children(self.out.node(parent)) else {
            return Err(no_slot("child nodes", &self.out.node(parent).name, line));
        };
        self.ensure_unique(existing, added, line)?;
        if let Some(slot) = compiled_node_children_mut(self.out.node_mut(parent)) {
            slot.extend_from_slice(added);
        }
        Ok(())
    }

    /// Appends `added` to the top-level data nodes.
    fn attach_top(&mut self, added: &[CompiledNodeId], line: u32) -> Result<()> {
        self.ensure_unique(&self.out.data, added, line)?;
        self.out.data.extend_from_slice(added);
        Ok(())
    }

    fn ensure_unique(
        &self,
        existing: &[CompiledNodeId],
        added: &[CompiledNodeId],
        line: u32,
    ) -> Result<()> {
        for (i, &id) in added.iter().enumerate() {
            let name = &self.out.node(id).name;
            if existing
                .iter()
                .chain(&added[..i])
                .any(|&other| self.out.node(other).name == *name)
            {
                return Err(Error::validation(
                    format!("duplicate sibling node \"{name}\""),
                    line,
                ));
            }
        }
        Ok(())
    }

    fn check_keys(&self, list: CompiledNodeId, line: u32) -> Result<()> {
        let node = self.out.node(list);
        let CompiledBody::List { keys, children, .. } = &node.body else {
            return Ok(());
        };
        if keys.is_empty() && node.config {
            return Err(Error::validation(
                format!("configuration list \"{}\" has no key", node.name),
                line,
            ));
        }
        for key in keys {
            let is_leaf = children.iter().any(|&child| {
                let child = self.out.node(child);
                child.name == *key && child.kind() == CompiledKind::Leaf
            });
            if !is_leaf {
                return Err(Error::validation(
                    format!("key \"{key}\" of list \"{}\" is not a child leaf", node.name),
                    line,
                ));
            }
        }
        Ok(())
    }

    fn check_default_case(&self, choice: CompiledNodeId, line: u32) -> Result<()> {
        let node = self.out.node(choice);
        let CompiledBody::Choice {
            default: Some(default),
            children,
            ..
        } = &node.body
        else {
            return Ok(());
        };
        if children.iter().any(|&c| self.out.node(c).name == *default) {
            Ok(())
        } else {
            Err(Error::validation(
                format!("default case \"{default}\" of choice \"{}\" does not exist", node.name),
                line,
            ))
        }
    }

    /// Returns true if `id` lies inside an rpc, action or notification.
    fn in_operation(&self, id: CompiledNodeId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.out.node(id);
            if matches!(
                node.kind(),
                CompiledKind::Rpc
                    | CompiledKind::Action
                    | CompiledKind::Input
                    | CompiledKind::Output
                    | CompiledKind::Notification
            ) {
                return true;
            }
            current = node.parent;
        }
        false
    }
}

/// Computes the flags of a node from its own `config` and its parent's.
fn node_flags(name: &str, config: Option<bool>, inherited: Flags, line: u32) -> Result<Flags> {
    if inherited.operation {
        return Ok(inherited);
    }
    match config {
        Some(true) if !inherited.config => Err(Error::validation(
            format!("configuration node \"{name}\" under state data"),
            line,
        )),
        Some(config) => Ok(Flags {
            config,
            operation: false,
        }),
        None => Ok(inherited),
    }
}

/// Checks substatements a built-in type requires.
fn check_builtin(base: BuiltinType, type_ref: &TypeRef) -> Result<()> {
    let missing = match base {
        BuiltinType::Enumeration if type_ref.enums.is_empty() => "enum",
        BuiltinType::Union if type_ref.members.is_empty() => "type",
        BuiltinType::Leafref if type_ref.path.is_none() => "path",
        _ => return Ok(()),
    };
    Err(Error::validation(
        format!("type \"{}\" requires a \"{missing}\" statement", base.name()),
        type_ref.span.line,
    ))
}

fn no_slot(what: &str, parent: &str, line: u32) -> Error {
    Error::validation(format!("\"{parent}\" cannot hold {what}"), line)
}
