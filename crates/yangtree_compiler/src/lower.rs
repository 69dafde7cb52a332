//! Lowering of generic statements into a parsed module.
//!
//! Lowering gives meaning to keywords. It runs inside a [`ParserContext`]:
//! every node declaring a typedef or grouping is deferred there for the
//! collision checks, and each import and include is loaded through the
//! registry as soon as its statement is read.

use tracing::trace;
use yangtree_foundation::{Error, Result, Revision, check_date, sort_revisions};
use yangtree_schema::{
    BelongsTo, Deviate, DeviateKind, Deviation, Extension, ExtensionInstance, Feature, Import, Include, NodeBody, NodeId, NodeKind,
    ParsedNode, Prefix, Refine, Restriction, TypeRef, Typedef, YangVersion, node_actions_mut,
    node_children_mut, node_groupings_mut, node_notifications_mut, node_typedefs_mut,
};
use yangtree_syntax::Statement;

use crate::context::ParserContext;
use crate::prefix::check_prefix;
use crate::registry::ModuleRegistry;

/// Core statements that are accepted but not modeled.
const IGNORED: &[&str] = &[
    "reference",
    "status",
    "must",
    "min-elements",
    "max-elements",
    "ordered-by",
    "unique",
    "identity",
];

/// Maps a data definition keyword to its node kind.
fn node_kind(keyword: &str) -> Option<NodeKind> {
    NodeKind::ALL.into_iter().find(|kind| kind.keyword() == keyword)
}

/// Lowers a `module` or `submodule` statement into `ctx.module`.
///
/// Imports are loaded (parsed only, unless the registry implements
/// everything) and includes are loaded into the module. Revisions are
/// normalized newest first.
///
/// # Errors
/// `Validation` for misplaced, unknown or missing statements and malformed
/// arguments; `AlreadyExists` for prefix collisions; any error from loading
/// an import or include.
pub fn lower_module(
    registry: &mut ModuleRegistry,
    ctx: &mut ParserContext,
    stmt: &Statement,
) -> Result<()> {
    let is_submodule = match stmt.keyword.as_str() {
        "module" => false,
        "submodule" => true,
        other => {
            return Err(Error::validation(
                format!("expected \"module\" or \"submodule\", found \"{other}\""),
                stmt.span.line,
            ));
        }
    };
    ctx.module.name = stmt.arg()?.to_string();
    ctx.module.span = stmt.span;
    ctx.enter(stmt.span);
    trace!(module = %ctx.module.name, is_submodule, "lowering module");

    for child in &stmt.children {
        ctx.enter(child.span);
        lower_module_child(registry, ctx, child, is_submodule)?;
        ctx.leave();
    }

    let line = stmt.span.line;
    if is_submodule {
        if ctx.module.belongs_to.is_none() {
            return Err(missing("belongs-to", "submodule", line));
        }
    } else {
        if ctx.module.namespace.is_none() {
            return Err(missing("namespace", "module", line));
        }
        if ctx.module.prefix.value.is_empty() {
            return Err(missing("prefix", "module", line));
        }
    }
    sort_revisions(&mut ctx.module.revisions)?;
    ctx.leave();
    Ok(())
}

fn lower_module_child(
    registry: &mut ModuleRegistry,
    ctx: &mut ParserContext,
    child: &Statement,
    is_submodule: bool,
) -> Result<()> {
    match child.keyword.as_str() {
        "yang-version" => {
            ctx.module.yang_version = match child.arg()? {
                "1" => YangVersion::V1,
                "1.1" => YangVersion::V1_1,
                other => {
                    return Err(Error::validation(
                        format!("invalid yang-version \"{other}\""),
                        child.span.line,
                    ));
                }
            };
        }
        "namespace" if !is_submodule => ctx.module.namespace = Some(child.arg()?.to_string()),
        "prefix" if !is_submodule => {
            let prefix = Prefix::new(child.arg()?, child.span);
            check_prefix(&ctx.module, &prefix)?;
            ctx.module.prefix = prefix;
        }
        "belongs-to" if is_submodule => {
            let prefix_stmt = child
                .child("prefix")
                .ok_or_else(|| missing("prefix", "belongs-to", child.span.line))?;
            let prefix = Prefix::new(prefix_stmt.arg()?, prefix_stmt.span);
            check_prefix(&ctx.module, &prefix)?;
            ctx.module.prefix = prefix.clone();
            ctx.module.belongs_to = Some(BelongsTo {
                module: child.arg()?.to_string(),
                prefix,
            });
        }
        "import" => lower_import(registry, ctx, child)?,
        "include" => {
            let mut include = Include::new(child.arg()?, child.span);
            include.revision = revision_date(child)?;
            registry.load_submodule(ctx, &mut include)?;
            ctx.module.includes.push(include);
        }
        "organization" => ctx.module.organization = Some(child.arg()?.to_string()),
        "contact" => ctx.module.contact = Some(child.arg()?.to_string()),
        "description" => ctx.module.description = Some(child.arg()?.to_string()),
        "revision" => {
            let date = child.arg()?;
            check_date(date, "revision", child.span.line)?;
            let mut revision = Revision::new(date, child.span);
            revision.description = child.child_arg("description").map(str::to_string);
            revision.reference = child.child_arg("reference").map(str::to_string);
            ctx.module.revisions.push(revision);
        }
        "feature" => ctx.module.features.push(Feature {
            name: child.arg()?.to_string(),
            span: child.span,
        }),
        "extension" => ctx.module.extensions.push(Extension {
            name: child.arg()?.to_string(),
            argument: child.child_arg("argument").map(str::to_string),
            span: child.span,
        }),
        "typedef" => {
            let typedef = lower_typedef(child)?;
            ctx.module.typedefs.push(typedef);
        }
        "grouping" => {
            let id = lower_node(ctx, child, None)?;
            ctx.module.groupings.push(id);
        }
        "container" | "list" | "leaf" | "leaf-list" | "choice" | "anydata" | "anyxml" | "uses" => {
            let id = lower_node(ctx, child, None)?;
            ctx.module.data.push(id);
        }
        "rpc" => {
            let id = lower_node(ctx, child, None)?;
            ctx.module.rpcs.push(id);
        }
        "notification" => {
            let id = lower_node(ctx, child, None)?;
            ctx.module.notifications.push(id);
        }
        "augment" => {
            let id = lower_node(ctx, child, None)?;
            ctx.module.augments.push(id);
        }
        "deviation" => {
            let deviation = lower_deviation(child)?;
            ctx.module.deviations.push(deviation);
        }
        keyword if IGNORED.contains(&keyword) => {
            trace!(keyword, line = child.span.line, "statement not modeled");
        }
        _ if child.is_extension_instance() => {
            ctx.module.extension_instances.push(ExtensionInstance {
                keyword: child.keyword.clone(),
                argument: child.argument.clone(),
                span: child.span,
            });
        }
        other => {
            return Err(Error::validation(
                format!(
                    "unexpected statement \"{other}\" in {}",
                    if is_submodule { "submodule" } else { "module" }
                ),
                child.span.line,
            ));
        }
    }
    Ok(())
}

fn lower_import(
    registry: &mut ModuleRegistry,
    ctx: &mut ParserContext,
    stmt: &Statement,
) -> Result<()> {
    let name = stmt.arg()?;
    let prefix_stmt = stmt
        .child("prefix")
        .ok_or_else(|| missing("prefix", "import", stmt.span.line))?;
    let prefix = Prefix::new(prefix_stmt.arg()?, prefix_stmt.span);
    check_prefix(&ctx.module, &prefix)?;

    if name == ctx.main_name() {
        return Err(Error::validation(
            format!("module \"{name}\" imports itself"),
            stmt.span.line,
        ));
    }

    let mut import = Import::new(name, prefix, stmt.span);
    import.revision = revision_date(stmt)?;
    import.module = Some(registry.load_import(name, import.revision.as_deref())?);
    ctx.module.imports.push(import);
    Ok(())
}

/// Reads and checks an optional `revision-date` substatement.
fn revision_date(stmt: &Statement) -> Result<Option<String>> {
    match stmt.child("revision-date") {
        Some(date) => {
            let value = date.arg()?;
            check_date(value, "revision-date", date.span.line)?;
            Ok(Some(value.to_string()))
        }
        None => Ok(None),
    }
}

// =============================================================================
// Schema nodes
// =============================================================================

/// Lowers a schema node statement and its subtree into the arena.
fn lower_node(ctx: &mut ParserContext, stmt: &Statement, parent: Option<NodeId>) -> Result<NodeId> {
    let kind = node_kind(&stmt.keyword).ok_or_else(|| {
        Error::validation(
            format!("\"{}\" is not a schema node", stmt.keyword),
            stmt.span.line,
        )
    })?;
    let name = match kind {
        NodeKind::Input | NodeKind::Output => kind.keyword(),
        _ => stmt.arg()?,
    };

    let mut node = ParsedNode::new(kind, name, stmt.span);
    node.parent = parent;
    match &mut node.body {
        NodeBody::Uses(body) => body.grouping = name.to_string(),
        NodeBody::Augment(body) => body.target = name.to_string(),
        _ => {}
    }
    let id = ctx.module.add_node(node);

    ctx.enter(stmt.span);
    for child in &stmt.children {
        lower_substatement(ctx, id, child)?;
    }
    ctx.leave();

    let node = ctx.module.node(id);
    let missing_type = match &node.body {
        NodeBody::Leaf(body) => body.type_ref.name.is_empty(),
        NodeBody::LeafList(body) => body.type_ref.name.is_empty(),
        _ => false,
    };
    if missing_type {
        return Err(missing("type", kind.keyword(), stmt.span.line));
    }
    Ok(id)
}

/// Lowers one substatement of node `id`.
fn lower_substatement(ctx: &mut ParserContext, id: NodeId, child: &Statement) -> Result<()> {
    let kind = ctx.module.node(id).kind();
    let line = child.span.line;
    let misplaced = || {
        Error::validation(
            format!("unexpected statement \"{}\" in {}", child.keyword, kind.keyword()),
            line,
        )
    };

    match child.keyword.as_str() {
        "description" => ctx.module.node_mut(id).description = Some(child.arg()?.to_string()),
        "config" => ctx.module.node_mut(id).config = Some(parse_bool(child)?),
        "if-feature" => ctx
            .module
            .node_mut(id)
            .if_features
            .push(child.arg()?.to_string()),
        "when" => ctx.module.node_mut(id).when = Some(child.arg()?.to_string()),
        "typedef" => {
            let typedef = lower_typedef(child)?;
            node_typedefs_mut(ctx.module.node_mut(id))
                .ok_or_else(misplaced)?
                .push(typedef);
            ctx.defer_typedef_scope(id);
        }
        "grouping" => {
            if node_groupings_mut(ctx.module.node_mut(id)).is_none() {
                return Err(misplaced());
            }
            let grouping = lower_node(ctx, child, Some(id))?;
            if let Some(slot) = node_groupings_mut(ctx.module.node_mut(id)) {
                slot.push(grouping);
            }
            ctx.defer_grouping_scope(id);
        }
        "action" => {
            if node_actions_mut(ctx.module.node_mut(id)).is_none() {
                return Err(misplaced());
            }
            let action = lower_node(ctx, child, Some(id))?;
            if let Some(slot) = node_actions_mut(ctx.module.node_mut(id)) {
                slot.push(action);
            }
        }
        "notification" => {
            if node_notifications_mut(ctx.module.node_mut(id)).is_none() {
                return Err(misplaced());
            }
            let notification = lower_node(ctx, child, Some(id))?;
            if let Some(slot) = node_notifications_mut(ctx.module.node_mut(id)) {
                slot.push(notification);
            }
        }
        "input" | "output" => {
            if !matches!(kind, NodeKind::Rpc | NodeKind::Action) {
                return Err(misplaced());
            }
            let io = lower_node(ctx, child, Some(id))?;
            if let NodeBody::Rpc(body) | NodeBody::Action(body) = &mut ctx.module.node_mut(id).body {
                let slot = if child.keyword == "input" {
                    &mut body.input
                } else {
                    &mut body.output
                };
                if slot.is_some() {
                    return Err(Error::validation(
                        format!("duplicate \"{}\" statement", child.keyword),
                        line,
                    ));
                }
                *slot = Some(io);
            }
        }
        "augment" => {
            if kind != NodeKind::Uses {
                return Err(misplaced());
            }
            let augment = lower_node(ctx, child, Some(id))?;
            if let Some(slot) = node_children_mut(ctx.module.node_mut(id)) {
                slot.push(augment);
            }
        }
        "refine" => {
            let refine = lower_refine(child)?;
            match &mut ctx.module.node_mut(id).body {
                NodeBody::Uses(body) => body.refines.push(refine),
                _ => return Err(misplaced()),
            }
        }
        "type" => {
            let type_ref = lower_type(child)?;
            match &mut ctx.module.node_mut(id).body {
                NodeBody::Leaf(body) => body.type_ref = type_ref,
                NodeBody::LeafList(body) => body.type_ref = type_ref,
                _ => return Err(misplaced()),
            }
        }
        "default" => {
            let value = child.arg()?.to_string();
            match &mut ctx.module.node_mut(id).body {
                NodeBody::Leaf(body) => body.default = Some(value),
                NodeBody::LeafList(body) => body.defaults.push(value),
                NodeBody::Choice(body) => body.default = Some(value),
                _ => return Err(misplaced()),
            }
        }
        "units" => {
            let value = child.arg()?.to_string();
            match &mut ctx.module.node_mut(id).body {
                NodeBody::Leaf(body) => body.units = Some(value),
                NodeBody::LeafList(body) => body.units = Some(value),
                _ => return Err(misplaced()),
            }
        }
        "mandatory" => {
            let value = parse_bool(child)?;
            match &mut ctx.module.node_mut(id).body {
                NodeBody::Leaf(body) => body.mandatory = Some(value),
                NodeBody::Choice(body) => body.mandatory = Some(value),
                NodeBody::AnyData(body) | NodeBody::AnyXml(body) => body.mandatory = Some(value),
                _ => return Err(misplaced()),
            }
        }
        "presence" => {
            let value = child.arg()?.to_string();
            match &mut ctx.module.node_mut(id).body {
                NodeBody::Container(body) => body.presence = Some(value),
                _ => return Err(misplaced()),
            }
        }
        "key" => {
            let value = child.arg()?.to_string();
            match &mut ctx.module.node_mut(id).body {
                NodeBody::List(body) => body.key = Some(value),
                _ => return Err(misplaced()),
            }
        }
        keyword if IGNORED.contains(&keyword) => {}
        _ if child.is_extension_instance() => {
            trace!(keyword = %child.keyword, line, "extension instance on node");
        }
        keyword => {
            let Some(child_kind) = node_kind(keyword) else {
                return Err(misplaced());
            };
            if !accepts_child(kind, child_kind) {
                return Err(misplaced());
            }
            let data = lower_node(ctx, child, Some(id))?;
            if let Some(slot) = node_children_mut(ctx.module.node_mut(id)) {
                slot.push(data);
            }
        }
    }
    Ok(())
}

/// Returns true if a `child` data node may appear directly under `parent`.
fn accepts_child(parent: NodeKind, child: NodeKind) -> bool {
    use NodeKind as K;
    let data = matches!(
        child,
        K::Container | K::List | K::Leaf | K::LeafList | K::Choice | K::AnyData | K::AnyXml
    );
    match parent {
        K::Container
        | K::List
        | K::Case
        | K::Grouping
        | K::Input
        | K::Output
        | K::Notification => data || child == K::Uses,
        K::Augment => data || matches!(child, K::Uses | K::Case),
        K::Choice => data || child == K::Case,
        K::Leaf
        | K::LeafList
        | K::AnyData
        | K::AnyXml
        | K::Uses
        | K::Rpc
        | K::Action => false,
    }
}

// =============================================================================
// Types, typedefs and refines
// =============================================================================

fn lower_typedef(stmt: &Statement) -> Result<Typedef> {
    let type_stmt = stmt
        .child("type")
        .ok_or_else(|| missing("type", "typedef", stmt.span.line))?;
    let mut typedef = Typedef::new(stmt.arg()?, lower_type(type_stmt)?, stmt.span);
    typedef.default = stmt.child_arg("default").map(str::to_string);
    typedef.units = stmt.child_arg("units").map(str::to_string);
    typedef.description = stmt.child_arg("description").map(str::to_string);
    Ok(typedef)
}

fn lower_type(stmt: &Statement) -> Result<TypeRef> {
    let mut type_ref = TypeRef::new(stmt.arg()?, stmt.span);
    for child in &stmt.children {
        match child.keyword.as_str() {
            "range" | "length" | "pattern" => type_ref.restrictions.push(Restriction {
                keyword: child.keyword.clone(),
                value: child.arg()?.to_string(),
            }),
            "enum" => type_ref.enums.push(child.arg()?.to_string()),
            "type" => type_ref.members.push(lower_type(child)?),
            "path" => type_ref.path = Some(child.arg()?.to_string()),
            _ => {}
        }
    }
    Ok(type_ref)
}

fn lower_refine(stmt: &Statement) -> Result<Refine> {
    let mut refine = Refine {
        target: stmt.arg()?.to_string(),
        span: stmt.span,
        ..Refine::default()
    };
    for child in &stmt.children {
        match child.keyword.as_str() {
            "description" => refine.description = Some(child.arg()?.to_string()),
            "default" => refine.default = Some(child.arg()?.to_string()),
            "mandatory" => refine.mandatory = Some(parse_bool(child)?),
            "presence" => refine.presence = Some(child.arg()?.to_string()),
            "config" => refine.config = Some(parse_bool(child)?),
            _ => {}
        }
    }
    Ok(refine)
}

// =============================================================================
// Deviations
// =============================================================================

fn lower_deviation(stmt: &Statement) -> Result<Deviation> {
    let mut deviation = Deviation {
        target: stmt.arg()?.to_string(),
        description: None,
        deviates: Vec::new(),
        span: stmt.span,
    };
    for child in &stmt.children {
        match child.keyword.as_str() {
            "description" => deviation.description = Some(child.arg()?.to_string()),
            "reference" => {}
            "deviate" => deviation.deviates.push(lower_deviate(child)?),
            _ if child.is_extension_instance() => {}
            other => {
                return Err(Error::validation(
                    format!("unexpected statement \"{other}\" in deviation"),
                    child.span.line,
                ));
            }
        }
    }

    if deviation.deviates.is_empty() {
        return Err(missing("deviate", "deviation", stmt.span.line));
    }
    let not_supported = deviation
        .deviates
        .iter()
        .any(|d| d.kind == DeviateKind::NotSupported);
    if not_supported && deviation.deviates.len() > 1 {
        return Err(Error::validation(
            format!(
                "deviation of \"{}\" combines \"not-supported\" with other deviates",
                deviation.target
            ),
            stmt.span.line,
        ));
    }
    Ok(deviation)
}

fn lower_deviate(stmt: &Statement) -> Result<Deviate> {
    let argument = stmt.arg()?;
    let kind = DeviateKind::from_argument(argument).ok_or_else(|| {
        Error::validation(
            format!("invalid deviate \"{argument}\""),
            stmt.span.line,
        )
    })?;
    let mut deviate = Deviate::new(kind, stmt.span);

    for child in &stmt.children {
        let keyword = child.keyword.as_str();
        let allowed = match (kind, keyword) {
            (_, _) if child.is_extension_instance() => continue,
            (DeviateKind::NotSupported, _) => false,
            (DeviateKind::Replace, "type") => {
                deviate.type_ref = Some(lower_type(child)?);
                true
            }
            (DeviateKind::Add | DeviateKind::Replace | DeviateKind::Delete, "units") => {
                deviate.units = Some(child.arg()?.to_string());
                true
            }
            (DeviateKind::Add | DeviateKind::Replace | DeviateKind::Delete, "default") => {
                deviate.defaults.push(child.arg()?.to_string());
                true
            }
            (DeviateKind::Add | DeviateKind::Replace, "config") => {
                deviate.config = Some(parse_bool(child)?);
                true
            }
            (DeviateKind::Add | DeviateKind::Replace, "mandatory") => {
                deviate.mandatory = Some(parse_bool(child)?);
                true
            }
            (DeviateKind::Add | DeviateKind::Delete, "must" | "unique")
            | (DeviateKind::Add | DeviateKind::Replace, "min-elements" | "max-elements") => {
                trace!(keyword, line = child.span.line, "statement not modeled");
                true
            }
            _ => false,
        };
        if !allowed {
            return Err(Error::validation(
                format!("unexpected statement \"{keyword}\" in deviate {argument}"),
                child.span.line,
            ));
        }
    }

    if kind == DeviateKind::Replace && deviate.defaults.len() > 1 {
        return Err(Error::validation(
            "deviate replace takes at most one default",
            stmt.span.line,
        ));
    }
    Ok(deviate)
}

fn parse_bool(stmt: &Statement) -> Result<bool> {
    match stmt.arg()? {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(Error::validation(
            format!("invalid value \"{other}\" of \"{}\"", stmt.keyword),
            stmt.span.line,
        )),
    }
}

fn missing(keyword: &str, parent: &str, line: u32) -> Error {
    Error::validation(
        format!("missing mandatory \"{keyword}\" statement in {parent}"),
        line,
    )
}
