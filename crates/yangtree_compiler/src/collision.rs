//! Typedef and grouping name collision checks.
//!
//! Both checks run once over the deferred scope sets of a
//! [`ParserContext`], after the whole module is read. Two definitions with
//! the same name in one scope are an error; an inner definition hiding an
//! outer one is accepted with a note.

use std::collections::HashMap;

use yangtree_foundation::{Error, Result, Span};
use yangtree_schema::{BuiltinType, NodeId, ParsedModule, node_groupings, node_typedefs};

use crate::context::ParserContext;

/// Checks typedef names of the module in `ctx`.
///
/// # Errors
/// `AlreadyExists` for a duplicate in one scope or across the top level of
/// the module and its submodules; `Validation` for a typedef named like a
/// built-in type.
pub fn check_typedefs(ctx: &mut ParserContext) -> Result<()> {
    let module = &ctx.module;
    let top = top_level_names(module, |unit| {
        unit.typedefs.iter().map(|td| (td.name.as_str(), td.span)).collect()
    })?;
    for (name, span) in &top {
        reject_builtin_name(name, *span)?;
    }

    let mut notes = Vec::new();
    for &scope in ctx.typedef_scopes() {
        let Some(typedefs) = node_typedefs(module.node(scope)) else {
            continue;
        };
        let mut seen: HashMap<&str, Span> = HashMap::new();
        for td in typedefs {
            reject_builtin_name(&td.name, td.span)?;
            if let Some(original) = seen.insert(&td.name, td.span) {
                return Err(Error::already_exists("typedef", &td.name, original));
            }
            let outer = module
                .ancestors(scope)
                .skip(1)
                .find_map(|id| {
                    node_typedefs(module.node(id))
                        .and_then(|tds| tds.iter().find(|t| t.name == td.name))
                        .map(|t| t.span)
                })
                .or_else(|| top.get(td.name.as_str()).copied());
            if let Some(outer) = outer {
                notes.push((
                    td.span.line,
                    format!(
                        "typedef \"{}\" shadows the typedef declared on line {}",
                        td.name, outer.line
                    ),
                ));
            }
        }
    }

    for (line, message) in notes {
        ctx.note(line, message);
    }
    Ok(())
}

/// Checks grouping names of the module in `ctx`.
///
/// # Errors
/// `AlreadyExists` for a duplicate in one scope or across the top level of
/// the module and its submodules.
pub fn check_groupings(ctx: &mut ParserContext) -> Result<()> {
    let module = &ctx.module;
    let top = top_level_names(module, |unit| {
        unit.groupings
            .iter()
            .map(|&g| {
                let node = unit.node(g);
                (node.name.as_str(), node.span)
            })
            .collect()
    })?;

    let mut notes = Vec::new();
    for &scope in ctx.grouping_scopes() {
        let Some(groupings) = node_groupings(module.node(scope)) else {
            continue;
        };
        let mut seen: HashMap<&str, Span> = HashMap::new();
        for &id in groupings {
            let grouping = module.node(id);
            if let Some(original) = seen.insert(&grouping.name, grouping.span) {
                return Err(Error::already_exists("grouping", &grouping.name, original));
            }
            if let Some(outer) = outer_grouping(module, scope, &grouping.name)
                .or_else(|| top.get(grouping.name.as_str()).copied())
            {
                notes.push((
                    grouping.span.line,
                    format!(
                        "grouping \"{}\" shadows the grouping declared on line {}",
                        grouping.name, outer.line
                    ),
                ));
            }
        }
    }

    for (line, message) in notes {
        ctx.note(line, message);
    }
    Ok(())
}

/// Finds a grouping named `name` in a scope enclosing `scope`.
fn outer_grouping(module: &ParsedModule, scope: NodeId, name: &str) -> Option<Span> {
    module.ancestors(scope).skip(1).find_map(|id| {
        node_groupings(module.node(id))
            .and_then(|gs| gs.iter().find(|&&g| module.node(g).name == name))
            .map(|&g| module.node(g).span)
    })
}

/// Collects top-level names of a module and its submodules, failing on the
/// first duplicate.
fn top_level_names<'a>(
    module: &'a ParsedModule,
    names_of: impl Fn(&'a ParsedModule) -> Vec<(&'a str, Span)>,
) -> Result<HashMap<&'a str, Span>> {
    let mut seen = HashMap::new();
    let what = "top-level definition";
    for unit in std::iter::once(module).chain(module.submodules()) {
        for (name, span) in names_of(unit) {
            if let Some(original) = seen.insert(name, span) {
                return Err(Error::already_exists(what, name, original));
            }
        }
    }
    Ok(seen)
}

/// Rejects typedef names that are built-in type names.
fn reject_builtin_name(name: &str, span: Span) -> Result<()> {
    if BuiltinType::from_name(name).is_some() {
        return Err(Error::validation(
            format!("typedef name \"{name}\" collides with a built-in type"),
            span.line,
        ));
    }
    Ok(())
}
