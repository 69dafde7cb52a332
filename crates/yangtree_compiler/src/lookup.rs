//! Scoped typedef and grouping lookup.
//!
//! Resolution order for a possibly prefixed name referenced from a node:
//!
//! 1. A prefix naming another module: that module's top-level definitions
//!    only (its submodules included). Imported definitions are never
//!    node-scoped.
//! 2. Otherwise the referencing node and its ancestors, innermost first.
//! 3. The top level of the module and of every included submodule.
//! 4. For typedefs only: a built-in type of that name.
//! 5. `NotFound`.

use yangtree_foundation::{Error, Result};
use yangtree_schema::{
    BuiltinType, NodeId, ParsedModule, ParsedNode, Typedef, node_groupings, node_typedefs,
};

use crate::prefix::{PrefixTarget, resolve_prefix, split_prefixed};
use crate::registry::ModuleRegistry;

/// Where a definition was found.
#[derive(Clone, Copy, Debug)]
pub struct Definition<'a, T> {
    /// The definition itself.
    pub item: T,
    /// Node whose scope holds the definition; `None` at top level.
    pub scope: Option<NodeId>,
    /// Module or submodule whose tree holds the definition.
    pub unit: &'a ParsedModule,
    /// Main module of `unit`.
    pub main: &'a ParsedModule,
}

/// Result of a typedef lookup.
#[derive(Clone, Copy, Debug)]
pub enum TypedefLookup<'a> {
    /// A typedef.
    Typedef(Definition<'a, &'a Typedef>),
    /// No typedef, but the name is a built-in type.
    Builtin(BuiltinType),
}

/// The modules a reference is resolved in.
#[derive(Clone, Copy, Debug)]
pub struct LookupScope<'a> {
    /// Module or submodule holding the referencing node.
    pub unit: &'a ParsedModule,
    /// Main module of `unit`.
    pub main: &'a ParsedModule,
    /// The referencing node, if any.
    pub node: Option<NodeId>,
}

impl<'a> LookupScope<'a> {
    /// Creates a scope for a reference from `node` inside a main module.
    #[must_use]
    pub fn module(module: &'a ParsedModule, node: Option<NodeId>) -> Self {
        Self {
            unit: module,
            main: module,
            node,
        }
    }

    /// Returns the same modules with a different referencing node.
    #[must_use]
    pub fn at(self, node: Option<NodeId>) -> Self {
        Self { node, ..self }
    }
}

/// Finds the typedef `name` as seen from `scope`.
///
/// # Errors
/// Returns `NotFound` for an undeclared prefix, an import whose parsed tree
/// is unavailable, or a name that is neither defined nor built in.
pub fn find_typedef<'a>(
    registry: &'a ModuleRegistry,
    name: &str,
    scope: LookupScope<'a>,
) -> Result<TypedefLookup<'a>> {
    let found = find(
        registry,
        name,
        scope,
        |_, node, local| {
            node_typedefs(node).and_then(|tds| tds.iter().find(|td| td.name == local))
        },
        |module, local| module.typedefs.iter().find(|td| td.name == local),
    )?;

    if let Some(def) = found {
        return Ok(TypedefLookup::Typedef(def));
    }
    if !name.contains(':') {
        if let Some(builtin) = BuiltinType::from_name(name) {
            return Ok(TypedefLookup::Builtin(builtin));
        }
    }
    Err(Error::not_found("typedef", name))
}

/// Finds the grouping `name` as seen from `scope`.
///
/// # Errors
/// Returns `NotFound` for an undeclared prefix, an import whose parsed tree
/// is unavailable, or an undefined grouping.
pub fn find_grouping<'a>(
    registry: &'a ModuleRegistry,
    name: &str,
    scope: LookupScope<'a>,
) -> Result<Definition<'a, NodeId>> {
    find(
        registry,
        name,
        scope,
        |unit, node, local| {
            node_groupings(node)
                .and_then(|gs| gs.iter().copied().find(|g| unit.node(*g).name == local))
        },
        |module, local| {
            module
                .groupings
                .iter()
                .copied()
                .find(|g| module.node(*g).name == local)
        },
    )?
    .ok_or_else(|| Error::not_found("grouping", name))
}

/// Shared lookup walk.
fn find<'a, T>(
    registry: &'a ModuleRegistry,
    name: &str,
    scope: LookupScope<'a>,
    in_node: impl Fn(&'a ParsedModule, &'a ParsedNode, &str) -> Option<T>,
    at_top: impl Fn(&'a ParsedModule, &str) -> Option<T>,
) -> Result<Option<Definition<'a, T>>> {
    let (prefix, local) = split_prefixed(name);

    if let Some(prefix) = prefix {
        match resolve_prefix(scope.unit, prefix) {
            None => return Err(Error::not_found("prefix", prefix)),
            Some(PrefixTarget::Import(import)) => {
                let id = import
                    .module
                    .ok_or_else(|| Error::not_found("module", &import.name))?;
                let target = registry
                    .parsed(id)
                    .ok_or_else(|| Error::not_found("parsed module", &import.name))?;
                return Ok(search_top(target, target, local, &at_top));
            }
            Some(PrefixTarget::Own) => {}
        }
    }

    if let Some(start) = scope.node {
        for id in scope.unit.ancestors(start) {
            if let Some(item) = in_node(scope.unit, scope.unit.node(id), local) {
                return Ok(Some(Definition {
                    item,
                    scope: Some(id),
                    unit: scope.unit,
                    main: scope.main,
                }));
            }
        }
    }

    if let Some(item) = at_top(scope.unit, local) {
        return Ok(Some(Definition {
            item,
            scope: None,
            unit: scope.unit,
            main: scope.main,
        }));
    }
    Ok(search_top(scope.main, scope.main, local, &at_top))
}

/// Searches the top level of `module` and its submodules.
fn search_top<'a, T>(
    module: &'a ParsedModule,
    main: &'a ParsedModule,
    local: &str,
    at_top: &impl Fn(&'a ParsedModule, &str) -> Option<T>,
) -> Option<Definition<'a, T>> {
    std::iter::once(module)
        .chain(module.submodules())
        .find_map(|unit| {
            at_top(unit, local).map(|item| Definition {
                item,
                scope: None,
                unit,
                main,
            })
        })
}
