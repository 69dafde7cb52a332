//! Module registry, loader, and schema compiler for yangtree.
//!
//! This crate provides:
//! - [`ModuleRegistry`] - Loading, implementing and freeing modules
//! - [`ParserContext`] - State of one module parse
//! - Prefix resolution, scoped typedef/grouping lookup, and collision checks
//! - [`compile_module`] - Building a compiled tree from a parsed module
//! - [`ModuleSource`] - Backing stores for module text

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod amend;
pub mod collision;
pub mod compile;
pub mod config;
pub mod context;
pub mod lookup;
pub mod lower;
pub mod prefix;
pub mod registry;
pub mod source;

pub use collision::{check_groupings, check_typedefs};
pub use compile::compile_module;
pub use config::RegistryConfig;
pub use context::ParserContext;
pub use lookup::{Definition, LookupScope, TypedefLookup, find_grouping, find_typedef};
pub use lower::lower_module;
pub use prefix::{PrefixTarget, check_prefix, resolve_compiled_prefix, resolve_prefix};
pub use registry::{CustomCheck, FreeScope, LoadedModule, ModuleRegistry, PrivateDestructor};
pub use source::{Input, MemorySource, ModuleSource, SearchPathSource, SourceText};
