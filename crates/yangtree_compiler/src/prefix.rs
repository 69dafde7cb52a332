//! Prefix resolution and prefix collision checking.

use yangtree_foundation::{Error, Result};
use yangtree_schema::{CompiledModule, Import, ModuleId, ParsedModule, Prefix};

/// What a prefix of a parsed module refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixTarget<'a> {
    /// The module itself (its own prefix, or `belongs-to` prefix).
    Own,
    /// An imported module.
    Import(&'a Import),
}

impl PrefixTarget<'_> {
    /// Returns the registry entry of an imported target, if loaded.
    #[must_use]
    pub fn module_id(&self) -> Option<ModuleId> {
        match self {
            Self::Own => None,
            Self::Import(import) => import.module,
        }
    }
}

/// Resolves `prefix` in a parsed module's import table.
///
/// `prefix` may be a slice of a larger identifier; only its exact bytes are
/// compared. Returns `None` when nothing matches.
#[must_use]
pub fn resolve_prefix<'a>(module: &'a ParsedModule, prefix: &str) -> Option<PrefixTarget<'a>> {
    if module.prefix.value == prefix {
        return Some(PrefixTarget::Own);
    }
    module
        .imports
        .iter()
        .find(|import| import.prefix.value == prefix)
        .map(PrefixTarget::Import)
}

/// Resolves `prefix` in a compiled module's import table.
///
/// The own prefix resolves to the module's own id.
#[must_use]
pub fn resolve_compiled_prefix(module: &CompiledModule, prefix: &str) -> Option<ModuleId> {
    if module.prefix == prefix {
        return Some(module.id);
    }
    module
        .imports
        .iter()
        .find(|import| import.prefix == prefix)
        .map(|import| import.module)
}

/// Checks that `candidate` does not collide with the own prefix or any import
/// prefix of `module`.
///
/// The declaration at the candidate's own location is skipped, so a prefix
/// that is already part of the module does not collide with itself.
///
/// # Errors
/// Returns `AlreadyExists` carrying the location of the earlier declaration.
pub fn check_prefix(module: &ParsedModule, candidate: &Prefix) -> Result<()> {
    let own = &module.prefix;
    if !own.value.is_empty() && own.value == candidate.value && own.span != candidate.span {
        return Err(Error::already_exists("prefix", &candidate.value, own.span));
    }
    if let Some(import) = module
        .imports
        .iter()
        .find(|i| i.prefix.value == candidate.value && i.prefix.span != candidate.span)
    {
        return Err(Error::already_exists("prefix", &candidate.value, import.prefix.span));
    }
    Ok(())
}

/// Splits `prefix:name` into its parts.
#[must_use]
pub fn split_prefixed(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}
