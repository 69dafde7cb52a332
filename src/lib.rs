//! yangtree - YANG schema compiler
//!
//! This crate re-exports all layers of the yangtree system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: yangtree_compiler   - Registry, loader, lookup, collision checks, compilation
//! Layer 2: yangtree_schema     - Parsed and compiled trees, node shape dispatch
//! Layer 1: yangtree_syntax     - YANG and YIN statement readers
//! Layer 0: yangtree_foundation - Core types (Error, Span, Diagnostic, Revision)
//! ```

pub use yangtree_compiler as compiler;
pub use yangtree_foundation as foundation;
pub use yangtree_schema as schema;
pub use yangtree_syntax as syntax;
