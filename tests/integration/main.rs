//! End-to-end integration tests
//!
//! Tests that load whole module sets through the registry: imports,
//! submodules, search paths, and compilation results.

mod end_to_end;
mod search_path;

use yangtree_compiler::{MemorySource, ModuleRegistry, RegistryConfig};
use yangtree_schema::{CompiledModule, CompiledNode, CompiledNodeId, compiled_node_descendants};

/// Creates a registry backed by the given `(name, text)` sources.
pub fn registry_with(sources: &[(&str, &str)]) -> ModuleRegistry {
    let store = sources
        .iter()
        .fold(MemorySource::new(), |store, (name, text)| store.with(*name, None, *text));
    ModuleRegistry::with_source(RegistryConfig::default().with_search_cwd(false), store)
}

/// Follows a `/`-separated path of node names from the module's top level.
pub fn node_at<'a>(module: &'a CompiledModule, path: &str) -> &'a CompiledNode {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let first = segments.next().unwrap();
    let mut current: CompiledNodeId = module
        .data
        .iter()
        .chain(&module.rpcs)
        .chain(&module.notifications)
        .copied()
        .find(|id| module.node(*id).name == first)
        .unwrap_or_else(|| panic!("no top-level node {first}"));
    for segment in segments {
        current = compiled_node_descendants(module.node(current))
            .into_iter()
            .find(|id| module.node(*id).name == segment)
            .unwrap_or_else(|| panic!("no node {segment} in {path}"));
    }
    module.node(current)
}
