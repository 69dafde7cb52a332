//! Schema node paths, refines and deviations over a compiled tree.

use yangtree_foundation::{Error, Result};
use yangtree_schema::{
    CompiledBody, CompiledModule, CompiledNodeId, CompiledType, Deviate, DeviateKind, Refine,
    compiled_node_descendants,
};

use crate::prefix::split_prefixed;

/// Splits a schema node identifier into its node names, prefixes included.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Resolves a descendant schema node identifier (`a/b/c`) starting from
/// `roots`.
///
/// Prefixes on the segments are not checked; they name the module the
/// nodes are instantiated in.
///
/// # Errors
/// `NotFound` if a segment does not match.
pub fn find_descendant(
    module: &CompiledModule,
    roots: &[CompiledNodeId],
    path: &str,
) -> Result<CompiledNodeId> {
    let mut candidates = roots.to_vec();
    let mut found = None;
    for segment in segments(path) {
        let (_, name) = split_prefixed(segment);
        let next = candidates
            .iter()
            .copied()
            .find(|&id| module.node(id).name == name)
            .ok_or_else(|| Error::not_found("schema node", path))?;
        candidates = compiled_node_descendants(module.node(next));
        found = Some(next);
    }
    found.ok_or_else(|| Error::not_found("schema node", path))
}

/// Resolves an absolute schema node identifier (`/a:b/a:c`) in `module`.
///
/// # Errors
/// `NotFound` if a segment does not match.
pub fn find_absolute(module: &CompiledModule, path: &str) -> Result<CompiledNodeId> {
    let roots: Vec<_> = module
        .data
        .iter()
        .chain(&module.rpcs)
        .chain(&module.notifications)
        .copied()
        .collect();
    find_descendant(module, &roots, path)
}

/// Applies `refine` to its target below `roots`.
///
/// # Errors
/// `NotFound` for a missing target; `Validation` for a property the target
/// kind does not have.
pub fn apply_refine(
    module: &mut CompiledModule,
    roots: &[CompiledNodeId],
    refine: &Refine,
) -> Result<()> {
    let target = find_descendant(module, roots, &refine.target)?;
    let line = refine.span.line;
    let node = module.node_mut(target);
    let keyword = node.body.kind().keyword();
    let invalid = |property: &str| {
        Error::validation(
            format!(
                "refine of \"{}\" cannot change \"{property}\" of a {keyword}",
                refine.target
            ),
            line,
        )
    };

    if let Some(default) = &refine.default {
        match &mut node.body {
            CompiledBody::Leaf { default: slot, .. } | CompiledBody::Choice { default: slot, .. } => {
                *slot = Some(default.clone());
            }
            _ => return Err(invalid("default")),
        }
    }
    if let Some(mandatory) = refine.mandatory {
        match &mut node.body {
            CompiledBody::Leaf { mandatory: slot, .. }
            | CompiledBody::Choice { mandatory: slot, .. }
            | CompiledBody::AnyData { mandatory: slot }
            | CompiledBody::AnyXml { mandatory: slot } => *slot = mandatory,
            _ => return Err(invalid("mandatory")),
        }
    }
    if let Some(presence) = &refine.presence {
        match &mut node.body {
            CompiledBody::Container { presence: slot, .. } => *slot = Some(presence.clone()),
            _ => return Err(invalid("presence")),
        }
    }
    if let Some(config) = refine.config {
        node.config = config;
    }
    if let Some(description) = &refine.description {
        node.description = Some(description.clone());
    }

    if let CompiledBody::Leaf { default: Some(_), mandatory: true, .. } = &node.body {
        return Err(Error::validation(
            format!("refined leaf \"{}\" is mandatory and has a default", refine.target),
            line,
        ));
    }
    Ok(())
}

/// Applies one `deviate` of the deviation of `path` to `target`.
///
/// `ty` is the replacement type of a `deviate replace`, already resolved.
/// Presence checks look at the compiled values, so units and defaults
/// inherited from a typedef count as present. Every compiled node has a
/// config value; `add` and `replace` of config both set it.
///
/// # Errors
/// `Validation` when the target kind lacks the property, `add` meets a
/// value already present, `replace` or `delete` meets none, or `delete`
/// names a value the target does not have.
pub fn apply_deviate(
    module: &mut CompiledModule,
    target: CompiledNodeId,
    path: &str,
    deviate: &Deviate,
    ty: Option<CompiledType>,
) -> Result<()> {
    let line = deviate.span.line;
    let verb = deviate.kind.argument();
    if deviate.kind == DeviateKind::NotSupported {
        return remove_node(module, target, line);
    }

    let node = module.node_mut(target);
    let keyword = node.body.kind().keyword();
    let invalid = |property: &str| {
        Error::validation(
            format!("deviate {verb} of \"{path}\" cannot change \"{property}\" of a {keyword}"),
            line,
        )
    };
    let amend = |slot: &mut Option<String>, property: &str, value: &str| {
        amend_value(slot, deviate.kind, property, value, path, line)
    };

    if let Some(ty) = ty {
        match &mut node.body {
            CompiledBody::Leaf { ty: slot, .. } | CompiledBody::LeafList { ty: slot, .. } => *slot = ty,
            _ => return Err(invalid("type")),
        }
    }
    if let Some(units) = &deviate.units {
        match &mut node.body {
            CompiledBody::Leaf { units: slot, .. } | CompiledBody::LeafList { units: slot, .. } => {
                amend(slot, "units", units)?;
            }
            _ => return Err(invalid("units")),
        }
    }
    if !deviate.defaults.is_empty() {
        match &mut node.body {
            CompiledBody::Leaf { default: slot, .. } | CompiledBody::Choice { default: slot, .. } => {
                let [value] = deviate.defaults.as_slice() else {
                    return Err(Error::validation(
                        format!("deviate {verb} of \"{path}\" gives a {keyword} more than one default"),
                        line,
                    ));
                };
                amend(slot, "default", value)?;
            }
            CompiledBody::LeafList { defaults, .. } => {
                amend_list(defaults, deviate, path)?;
            }
            _ => return Err(invalid("default")),
        }
    }
    if let Some(mandatory) = deviate.mandatory {
        match &mut node.body {
            CompiledBody::Leaf { mandatory: slot, .. }
            | CompiledBody::Choice { mandatory: slot, .. }
            | CompiledBody::AnyData { mandatory: slot }
            | CompiledBody::AnyXml { mandatory: slot } => {
                if deviate.kind == DeviateKind::Add && *slot {
                    return Err(Error::validation(
                        format!("deviate add of \"{path}\": \"mandatory\" already exists"),
                        line,
                    ));
                }
                *slot = mandatory;
            }
            _ => return Err(invalid("mandatory")),
        }
    }
    if deviate.config.is_some()
        && !matches!(
            node.body,
            CompiledBody::Container { .. }
                | CompiledBody::List { .. }
                | CompiledBody::Leaf { .. }
                | CompiledBody::LeafList { .. }
                | CompiledBody::Choice { .. }
                | CompiledBody::AnyData { .. }
                | CompiledBody::AnyXml { .. }
        )
    {
        return Err(invalid("config"));
    }

    if let CompiledBody::Leaf { default: Some(_), mandatory: true, .. }
    | CompiledBody::Choice { default: Some(_), mandatory: true, .. } = &node.body
    {
        return Err(Error::validation(
            format!("deviated {keyword} \"{path}\" is mandatory and has a default"),
            line,
        ));
    }
    let default_case = match &node.body {
        CompiledBody::Choice { default: Some(default), children, .. } => {
            Some((default.clone(), children.clone()))
        }
        _ => None,
    };
    if let Some((default, cases)) = default_case {
        if !cases.iter().any(|&c| module.node(c).name == default) {
            return Err(Error::validation(
                format!("default case \"{default}\" of deviated choice \"{path}\" does not exist"),
                line,
            ));
        }
    }

    match deviate.config {
        Some(config) => set_config(module, target, config, path, line),
        None => Ok(()),
    }
}

/// Adds, replaces or deletes a single-valued property.
fn amend_value(
    slot: &mut Option<String>,
    kind: DeviateKind,
    property: &str,
    value: &str,
    path: &str,
    line: u32,
) -> Result<()> {
    let verb = kind.argument();
    let current = slot.clone();
    match (kind, current.as_deref()) {
        (DeviateKind::Add, None) | (DeviateKind::Replace, Some(_)) => {
            *slot = Some(value.to_string());
            Ok(())
        }
        (DeviateKind::Delete, Some(existing)) if existing == value => {
            *slot = None;
            Ok(())
        }
        (DeviateKind::Add, Some(existing)) => Err(Error::validation(
            format!("deviate add of \"{path}\": \"{property}\" already exists with value \"{existing}\""),
            line,
        )),
        (DeviateKind::Delete, Some(existing)) => Err(Error::validation(
            format!(
                "deviate delete of \"{path}\": \"{property}\" \"{value}\" does not match \"{existing}\""
            ),
            line,
        )),
        (DeviateKind::Replace | DeviateKind::Delete, None) => Err(Error::validation(
            format!("deviate {verb} of \"{path}\": \"{property}\" is not present"),
            line,
        )),
        (DeviateKind::NotSupported, _) => Ok(()),
    }
}

/// Adds or deletes leaf-list default values.
fn amend_list(defaults: &mut Vec<String>, deviate: &Deviate, path: &str) -> Result<()> {
    let line = deviate.span.line;
    match deviate.kind {
        DeviateKind::Add => defaults.extend(deviate.defaults.iter().cloned()),
        DeviateKind::Delete => {
            for value in &deviate.defaults {
                let Some(pos) = defaults.iter().position(|d| d == value) else {
                    return Err(Error::validation(
                        format!("deviate delete of \"{path}\": default \"{value}\" is not present"),
                        line,
                    ));
                };
                defaults.remove(pos);
            }
        }
        DeviateKind::Replace | DeviateKind::NotSupported => {
            return Err(Error::validation(
                format!(
                    "deviate {} of \"{path}\" cannot change \"default\" of a leaf-list",
                    deviate.kind.argument()
                ),
                line,
            ));
        }
    }
    Ok(())
}

/// Sets the config flag of `target`; `false` also applies to its subtree.
fn set_config(
    module: &mut CompiledModule,
    target: CompiledNodeId,
    config: bool,
    path: &str,
    line: u32,
) -> Result<()> {
    if config {
        let parent_is_state = module
            .node(target)
            .parent
            .is_some_and(|parent| !module.node(parent).config);
        if parent_is_state {
            return Err(Error::validation(
                format!("deviated node \"{path}\" is configuration under state data"),
                line,
            ));
        }
        module.node_mut(target).config = true;
        return Ok(());
    }

    let mut pending = vec![target];
    while let Some(id) = pending.pop() {
        let node = module.node_mut(id);
        node.config = false;
        pending.extend(compiled_node_descendants(node));
    }
    Ok(())
}

/// Unlinks `target` from its parent, or from the module top level.
///
/// The node stays in the arena.
fn remove_node(module: &mut CompiledModule, target: CompiledNodeId, line: u32) -> Result<()> {
    let name = module.node(target).name.clone();
    let Some(parent) = module.node(target).parent else {
        for slot in [&mut module.data, &mut module.rpcs, &mut module.notifications] {
            slot.retain(|&id| id != target);
        }
        return Ok(());
    };

    let parent_node = module.node(parent);
    let blocked = match &parent_node.body {
        CompiledBody::List { keys, .. } => keys.contains(&name).then_some("key of list"),
        CompiledBody::Choice { default, .. } => {
            (default.as_deref() == Some(name.as_str())).then_some("default case of choice")
        }
        _ => None,
    };
    if let Some(role) = blocked {
        return Err(Error::validation(
            format!(
                "\"{name}\" is the {role} \"{}\" and cannot be not-supported",
                parent_node.name
            ),
            line,
        ));
    }

    match &mut module.node_mut(parent).body {
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
        } => {
            children.retain(|&id| id != target);
            actions.retain(|&id| id != target);
            notifications.retain(|&id| id != target);
        }
        CompiledBody::Choice { children, .. }
        | CompiledBody::Case { children }
        | CompiledBody::Input { children }
        | CompiledBody::Output { children }
        | CompiledBody::Notification { children } => children.retain(|&id| id != target),
        CompiledBody::Rpc { input, output } | CompiledBody::Action { input, output } => {
            if *input == Some(target) {
                *input = None;
            }
            if *output == Some(target) {
                *output = None;
            }
        }
        CompiledBody::Leaf { .. }
        | CompiledBody::LeafList { .. }
        | CompiledBody::AnyData { .. }
        | CompiledBody::AnyXml { .. } => {}
    }
    Ok(())
}
