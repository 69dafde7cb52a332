//! Module registry and loader.
//!
//! The `ModuleRegistry` tracks:
//! - Every loaded module, by name and revision (newest first)
//! - Which revision of a module is implemented (at most one per name)
//! - The loading stack for import cycle detection
//!
//! A registry is an ordinary value owned by the caller. It has no internal
//! locking; embedders sharing one across threads must serialize access.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};
use yangtree_foundation::{
    Diagnostic, DiagnosticSink, Error, ErrorKind, Result, TracingSink, check_date, is_newer,
};
use yangtree_schema::{CompiledModule, CompiledNode, Include, ModuleId, ParsedModule};
use yangtree_syntax::{SchemaFormat, Statement, parse_source};

use crate::collision::{check_groupings, check_typedefs};
use crate::compile::compile_module;
use crate::config::RegistryConfig;
use crate::context::ParserContext;
use crate::lower::lower_module;
use crate::prefix::{PrefixTarget, resolve_compiled_prefix, resolve_prefix};
use crate::source::{Input, MemorySource, ModuleSource, SearchPathSource};

// =============================================================================
// Extension points
// =============================================================================

/// A caller policy run against every freshly parsed module before it is
/// registered.
pub trait CustomCheck {
    /// Accepts or rejects `module`.
    ///
    /// # Errors
    /// Any error rejects the module; it is not registered.
    fn check(&mut self, registry: &ModuleRegistry, module: &ParsedModule) -> Result<()>;
}

impl<F> CustomCheck for F
where
    F: FnMut(&ModuleRegistry, &ParsedModule) -> Result<()>,
{
    fn check(&mut self, registry: &ModuleRegistry, module: &ParsedModule) -> Result<()> {
        self(registry, module)
    }
}

/// Releases data the embedding application attached to compiled nodes.
pub trait PrivateDestructor {
    /// Called once per compiled node with the node's private data.
    fn destroy(&mut self, node: &CompiledNode, private: Option<Box<dyn Any>>);
}

impl<F> PrivateDestructor for F
where
    F: FnMut(&CompiledNode, Option<Box<dyn Any>>),
{
    fn destroy(&mut self, node: &CompiledNode, private: Option<Box<dyn Any>>) {
        self(node, private);
    }
}

/// Which trees [`ModuleRegistry::free_module`] releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FreeScope {
    /// Only the parsed tree.
    Parsed,
    /// Only the compiled tree.
    Compiled,
    /// Both trees.
    All,
}

// =============================================================================
// LoadedModule
// =============================================================================

/// A registry entry.
#[derive(Debug)]
pub struct LoadedModule {
    id: ModuleId,
    name: String,
    revision: Option<String>,
    implemented: bool,
    latest_revision: bool,
    parsed: Option<ParsedModule>,
    compiled: Option<CompiledModule>,
    path: Option<PathBuf>,
}

impl LoadedModule {
    /// Returns the registry handle.
    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Returns the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the newest revision of the module source.
    #[must_use]
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// Returns true once the module was promoted to implemented.
    #[must_use]
    pub fn is_implemented(&self) -> bool {
        self.implemented
    }

    /// Returns true if no newer revision of this module is registered.
    #[must_use]
    pub fn is_latest_revision(&self) -> bool {
        self.latest_revision
    }

    /// Returns the parsed tree, unless freed.
    #[must_use]
    pub fn parsed(&self) -> Option<&ParsedModule> {
        self.parsed.as_ref()
    }

    /// Returns the compiled tree, if implemented and not freed.
    #[must_use]
    pub fn compiled(&self) -> Option<&CompiledModule> {
        self.compiled.as_ref()
    }

    /// Returns the compiled tree mutably, for attaching private data.
    pub fn compiled_mut(&mut self) -> Option<&mut CompiledModule> {
        self.compiled.as_mut()
    }

    /// Returns the file the module was read from.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

// =============================================================================
// ModuleRegistry
// =============================================================================

/// Registry of loaded modules.
///
/// Provides:
/// - Load-once lookup by name and revision
/// - Promotion of parsed-only modules to implemented
/// - Submodule loading for includes
/// - Cycle detection during loading
pub struct ModuleRegistry {
    /// Search and implementation settings.
    config: RegistryConfig,
    /// Entries, indexed by `ModuleId`.
    modules: Vec<LoadedModule>,
    /// Map from module name to its entries, newest revision first.
    by_name: HashMap<String, Vec<ModuleId>>,
    /// Where module sources come from.
    source: Box<dyn ModuleSource>,
    /// Where diagnostics go.
    sink: Box<dyn DiagnosticSink>,
    /// Modules currently being loaded (for cycle detection).
    loading_stack: Vec<String>,
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("config", &self.config)
            .field("modules", &self.modules.len())
            .field("loading_stack", &self.loading_stack)
            .finish_non_exhaustive()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl ModuleRegistry {
    /// Creates a registry reading modules from the configured search path.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        let source = SearchPathSource::from_config(&config);
        Self::with_source(config, source)
    }

    /// Creates a registry reading modules from a custom backing store.
    #[must_use]
    pub fn with_source(config: RegistryConfig, source: impl ModuleSource + 'static) -> Self {
        Self {
            config,
            modules: Vec::new(),
            by_name: HashMap::new(),
            source: Box::new(source),
            sink: Box::new(TracingSink),
            loading_stack: Vec::new(),
        }
    }

    /// Creates a registry with an empty in-memory store.
    ///
    /// Modules can only enter it through [`ModuleRegistry::parse_module`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_source(RegistryConfig::default().with_search_cwd(false), MemorySource::new())
    }

    /// Builder method to install a diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.set_sink(sink);
        self
    }

    /// Replaces the diagnostic sink.
    pub fn set_sink(&mut self, sink: impl DiagnosticSink + 'static) {
        self.sink = Box::new(sink);
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns the number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Returns the entry for `id`.
    #[must_use]
    pub fn get(&self, id: ModuleId) -> Option<&LoadedModule> {
        self.modules.get(id.index())
    }

    /// Returns the entry for `id` mutably.
    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut LoadedModule> {
        self.modules.get_mut(id.index())
    }

    /// Iterates all entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &LoadedModule> {
        self.modules.iter()
    }

    /// Returns the parsed tree of `id`.
    #[must_use]
    pub fn parsed(&self, id: ModuleId) -> Option<&ParsedModule> {
        self.get(id).and_then(LoadedModule::parsed)
    }

    /// Returns the compiled tree of `id`.
    #[must_use]
    pub fn compiled(&self, id: ModuleId) -> Option<&CompiledModule> {
        self.get(id).and_then(LoadedModule::compiled)
    }

    /// Finds `name` at `revision`, or its newest revision when `None`.
    #[must_use]
    pub fn find(&self, name: &str, revision: Option<&str>) -> Option<ModuleId> {
        let ids = self.by_name.get(name)?;
        match revision {
            Some(rev) => ids
                .iter()
                .copied()
                .find(|id| self.modules[id.index()].revision.as_deref() == Some(rev)),
            None => ids.first().copied(),
        }
    }

    /// Finds the entry of `name` with exactly `revision` (`None` matching an
    /// unrevisioned module).
    fn find_exact(&self, name: &str, revision: Option<&str>) -> Option<ModuleId> {
        self.by_name.get(name)?.iter().copied().find(|id| {
            self.modules[id.index()].revision.as_deref() == revision
        })
    }

    /// Returns the implemented revision of `name`, if any.
    #[must_use]
    pub fn find_implemented(&self, name: &str) -> Option<ModuleId> {
        self.by_name
            .get(name)?
            .iter()
            .copied()
            .find(|id| self.modules[id.index()].implemented)
    }

    /// Returns every registered revision of `name`, newest first.
    #[must_use]
    pub fn revisions(&self, name: &str) -> &[ModuleId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Resolves `prefix` as seen from module `id`.
    ///
    /// Uses the compiled import table when present, otherwise the parsed one.
    #[must_use]
    pub fn resolve_prefix(&self, id: ModuleId, prefix: &str) -> Option<ModuleId> {
        let entry = self.get(id)?;
        if let Some(compiled) = &entry.compiled {
            return resolve_compiled_prefix(compiled, prefix);
        }
        match resolve_prefix(entry.parsed.as_ref()?, prefix)? {
            PrefixTarget::Own => Some(id),
            PrefixTarget::Import(import) => import.module,
        }
    }

    // -------------------------------------------------------------------------
    // Loading stack
    // -------------------------------------------------------------------------

    /// Check if a module is currently being loaded (cycle detection).
    #[must_use]
    pub fn is_loading(&self, name: &str) -> bool {
        self.loading_stack.iter().any(|n| n == name)
    }

    /// Push a module onto the loading stack.
    ///
    /// Returns an error if the module is already being loaded (cycle detected).
    fn begin_loading(&mut self, name: &str) -> Result<()> {
        if self.is_loading(name) {
            return Err(self.cycle_error(name));
        }
        self.loading_stack.push(name.to_string());
        Ok(())
    }

    /// Pop a module from the loading stack.
    fn finish_loading(&mut self, name: &str) {
        if let Some(pos) = self.loading_stack.iter().rposition(|n| n == name) {
            self.loading_stack.remove(pos);
        }
    }

    /// Builds the error for a module that imports itself through `name`.
    fn cycle_error(&self, name: &str) -> Error {
        let cycle: Vec<_> = self
            .loading_stack
            .iter()
            .skip_while(|n| *n != name)
            .map(String::as_str)
            .collect();
        Error::validation(
            format!("import cycle detected: {} -> {name}", cycle.join(" -> ")),
            0,
        )
    }

    /// Returns the current loading stack (for debugging).
    #[must_use]
    pub fn loading_stack(&self) -> &[String] {
        &self.loading_stack
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Loads module `name`, or returns the already registered entry.
    ///
    /// With `revision` set, only that revision matches; otherwise the newest
    /// registered revision does. An existing parsed-only entry is promoted
    /// when `implement` is set.
    ///
    /// # Errors
    /// - `NotFound` when the store has no such module, or `require_parsed`
    ///   is set and the entry's parsed tree was freed
    /// - `Validation` when the source is invalid, names another module,
    ///   imports itself, or a different revision is already implemented
    /// - `InvalidArgument` for a malformed `revision`
    pub fn load(
        &mut self,
        name: &str,
        revision: Option<&str>,
        implement: bool,
        require_parsed: bool,
    ) -> Result<ModuleId> {
        self.run_reported(|reg| reg.load_inner(name, revision, implement, require_parsed, None))
    }

    /// Like [`ModuleRegistry::load`], running `check` on a freshly parsed
    /// module before registering it.
    ///
    /// # Errors
    /// As [`ModuleRegistry::load`], plus whatever `check` returns.
    pub fn load_with_check(
        &mut self,
        name: &str,
        revision: Option<&str>,
        implement: bool,
        require_parsed: bool,
        check: &mut dyn CustomCheck,
    ) -> Result<ModuleId> {
        self.run_reported(|reg| {
            reg.load_inner(name, revision, implement, require_parsed, Some(check))
        })
    }

    /// Loads an import of the module being parsed.
    pub(crate) fn load_import(&mut self, name: &str, revision: Option<&str>) -> Result<ModuleId> {
        let implement = self.config.all_implemented;
        self.load_inner(name, revision, implement, true, None)
    }

    fn load_inner(
        &mut self,
        name: &str,
        revision: Option<&str>,
        implement: bool,
        require_parsed: bool,
        check: Option<&mut dyn CustomCheck>,
    ) -> Result<ModuleId> {
        let implement = implement || self.config.all_implemented;
        if let Some(rev) = revision {
            check_date(rev, "revision", 0)
                .map_err(|_| Error::invalid_argument(format!("invalid revision \"{rev}\"")))?;
        }

        if let Some(id) = self.find(name, revision) {
            trace!(module = name, ?id, "module already loaded");
            if require_parsed && self.modules[id.index()].parsed.is_none() {
                return Err(Error::not_found("parsed module", name));
            }
            if implement {
                self.implement_inner(id)?;
            }
            return Ok(id);
        }

        if self.is_loading(name) {
            return Err(self.cycle_error(name));
        }

        debug!(module = name, revision, "loading module");
        let source = self
            .source
            .fetch(name, revision)?
            .ok_or_else(|| Error::not_found("module", name))?;
        let stmt = parse_source(&source.text, source.format)?;
        if stmt.keyword != "module" {
            return Err(Error::validation(
                format!("expected module \"{name}\", found \"{}\"", stmt.keyword),
                stmt.span.line,
            ));
        }
        self.install(&stmt, Some((name, revision)), source.origin, implement, check)
    }

    /// Lowers, checks, optionally compiles, and registers a module.
    fn install(
        &mut self,
        stmt: &Statement,
        expected: Option<(&str, Option<&str>)>,
        path: Option<PathBuf>,
        implement: bool,
        check: Option<&mut dyn CustomCheck>,
    ) -> Result<ModuleId> {
        let name = stmt.arg()?.to_string();
        self.begin_loading(&name)?;
        let parsed = self.parse_statement(stmt);
        self.finish_loading(&name);
        let parsed = parsed?;

        if let Some((expected_name, expected_revision)) = expected {
            if parsed.name != expected_name {
                return Err(Error::validation(
                    format!(
                        "module name mismatch: expected \"{expected_name}\", found \"{}\"",
                        parsed.name
                    ),
                    parsed.span.line,
                ));
            }
            if let Some(rev) = expected_revision {
                if parsed.revision() != Some(rev) {
                    return Err(Error::validation(
                        format!(
                            "revision mismatch of module \"{}\": expected {rev}, found {}",
                            parsed.name,
                            parsed.revision().unwrap_or("none")
                        ),
                        parsed.span.line,
                    ));
                }
            }
        }

        if let Some(existing) = self.find_exact(&parsed.name, parsed.revision()) {
            debug!(module = %parsed.name, "module already registered, reusing entry");
            if implement {
                self.implement_inner(existing)?;
            }
            return Ok(existing);
        }

        if let Some(check) = check {
            check.check(self, &parsed)?;
        }

        let next = u32::try_from(self.modules.len()).map_err(|_| Error::new(ErrorKind::OutOfMemory))?;
        let id = ModuleId(next);
        let compiled = if implement {
            self.ensure_implementable(&parsed.name, id, parsed.span.line)?;
            Some(compile_module(self, id, &parsed)?)
        } else {
            None
        };

        info!(
            module = %parsed.name,
            revision = parsed.revision(),
            implemented = implement,
            "module registered"
        );
        self.register(LoadedModule {
            id,
            name: parsed.name.clone(),
            revision: parsed.revision().map(str::to_string),
            implemented: implement,
            latest_revision: false,
            parsed: Some(parsed),
            compiled,
            path,
        });
        Ok(id)
    }

    /// Builds and checks the parsed tree of a module statement.
    fn parse_statement(&mut self, stmt: &Statement) -> Result<ParsedModule> {
        let mut ctx = ParserContext::new(stmt.arg()?);
        let checked = lower_module(self, &mut ctx, stmt)
            .and_then(|()| check_typedefs(&mut ctx))
            .and_then(|()| check_groupings(&mut ctx));
        self.flush(ctx.take_diagnostics());
        checked?;
        Ok(ctx.into_module())
    }

    /// Adds an entry and updates the per-name revision order.
    fn register(&mut self, entry: LoadedModule) {
        let id = entry.id;
        let name = entry.name.clone();
        self.modules.push(entry);

        let modules = &self.modules;
        let ids = self.by_name.entry(name).or_default();
        let pos = ids
            .iter()
            .position(|other| {
                is_newer(
                    modules[id.index()].revision.as_deref(),
                    modules[other.index()].revision.as_deref(),
                )
            })
            .unwrap_or(ids.len());
        ids.insert(pos, id);
        for (i, other) in ids.clone().into_iter().enumerate() {
            self.modules[other.index()].latest_revision = i == 0;
        }
    }

    // -------------------------------------------------------------------------
    // Implementation
    // -------------------------------------------------------------------------

    /// Promotes a parsed-only module to implemented by compiling it.
    ///
    /// Implementing an implemented module is a no-op. On failure the entry
    /// stays parsed-only.
    ///
    /// # Errors
    /// - `Validation` if another revision of the module is implemented
    /// - `NotFound` if the parsed tree was freed
    /// - any compilation error
    pub fn implement(&mut self, id: ModuleId) -> Result<()> {
        self.run_reported(|reg| reg.implement_inner(id))
    }

    fn implement_inner(&mut self, id: ModuleId) -> Result<()> {
        let entry = self
            .modules
            .get(id.index())
            .ok_or_else(|| Error::invalid_argument(format!("unknown module id {}", id.0)))?;
        if entry.implemented {
            return Ok(());
        }
        let name = entry.name.clone();
        let line = entry.parsed.as_ref().map_or(0, |p| p.span.line);
        self.ensure_implementable(&name, id, line)?;

        let parsed = self.modules[id.index()]
            .parsed
            .take()
            .ok_or_else(|| Error::not_found("parsed module", &name))?;
        debug!(module = %name, "implementing module");
        let compiled = compile_module(self, id, &parsed);
        let entry = &mut self.modules[id.index()];
        entry.parsed = Some(parsed);
        entry.compiled = Some(compiled?);
        entry.implemented = true;
        Ok(())
    }

    /// Fails if a revision of `name` other than `id` is implemented.
    fn ensure_implementable(&self, name: &str, id: ModuleId, line: u32) -> Result<()> {
        match self.find_implemented(name) {
            Some(other) if other != id => {
                let other_rev = self.modules[other.index()].revision.as_deref().unwrap_or("none");
                Err(Error::validation(
                    format!(
                        "module \"{name}\" is already implemented in revision {other_rev}"
                    ),
                    line,
                ))
            }
            _ => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Submodules
    // -------------------------------------------------------------------------

    /// Loads the submodule named by `include` into it.
    ///
    /// The submodule is parsed in a context derived from `ctx`, checked to
    /// belong to `ctx`'s main module, and stored in `include`. It is never
    /// registered on its own.
    ///
    /// # Errors
    /// - `Validation` for circular includes, a wrong `belongs-to`, or a
    ///   source that is not the requested submodule
    /// - `NotFound` if the store has no such submodule
    pub fn load_submodule(&mut self, ctx: &mut ParserContext, include: &mut Include) -> Result<()> {
        let name = include.name.clone();
        let line = include.span.line;
        if ctx.is_including(&name) {
            return Err(Error::validation(
                format!(
                    "circular include of \"{name}\" ({})",
                    ctx.include_stack().join(" -> ")
                ),
                line,
            ));
        }

        debug!(submodule = %name, main = ctx.main_name(), "loading submodule");
        let source = self
            .source
            .fetch(&name, include.revision.as_deref())?
            .ok_or_else(|| Error::not_found("submodule", &name))?;
        let stmt = parse_source(&source.text, source.format)?;
        if stmt.keyword != "submodule" || stmt.argument.as_deref() != Some(name.as_str()) {
            return Err(Error::validation(
                format!("\"{name}\" does not name a submodule source"),
                line,
            ));
        }

        let mut sub_ctx = ctx.for_submodule(&name);
        let checked = self.lower_submodule(&mut sub_ctx, &stmt, include, ctx.main_name());
        ctx.extend_diagnostics(sub_ctx.take_diagnostics());
        checked?;
        include.submodule = Some(Box::new(sub_ctx.into_module()));
        Ok(())
    }

    /// Lowers a fetched submodule and checks it against its include.
    fn lower_submodule(
        &mut self,
        sub_ctx: &mut ParserContext,
        stmt: &Statement,
        include: &Include,
        main: &str,
    ) -> Result<()> {
        let name = &include.name;
        let line = include.span.line;
        lower_module(self, sub_ctx, stmt)?;

        let belongs = sub_ctx
            .module
            .belongs_to
            .as_ref()
            .map(|b| b.module.clone())
            .unwrap_or_default();
        if belongs != main {
            return Err(Error::validation(
                format!("submodule \"{name}\" belongs to \"{belongs}\", not \"{main}\""),
                line,
            ));
        }
        if let Some(rev) = include.revision.as_deref() {
            if sub_ctx.module.revision() != Some(rev) {
                return Err(Error::validation(
                    format!("submodule \"{name}\" has no revision {rev}"),
                    line,
                ));
            }
        }

        check_typedefs(sub_ctx)?;
        check_groupings(sub_ctx)
    }

    // -------------------------------------------------------------------------
    // Direct input
    // -------------------------------------------------------------------------

    /// Parses a module from an explicit input and registers it.
    ///
    /// # Errors
    /// - `InvalidArgument` if the input holds a submodule
    /// - `Io` if the input cannot be read
    /// - any parse, validation or compilation error
    pub fn parse_module(
        &mut self,
        input: Input,
        format: SchemaFormat,
        implement: bool,
    ) -> Result<ModuleId> {
        self.run_reported(|reg| reg.parse_module_inner(input, format, implement, None))
    }

    /// Like [`ModuleRegistry::parse_module`] with a custom check.
    ///
    /// # Errors
    /// As [`ModuleRegistry::parse_module`], plus whatever `check` returns.
    pub fn parse_module_with_check(
        &mut self,
        input: Input,
        format: SchemaFormat,
        implement: bool,
        check: &mut dyn CustomCheck,
    ) -> Result<ModuleId> {
        self.run_reported(|reg| reg.parse_module_inner(input, format, implement, Some(check)))
    }

    fn parse_module_inner(
        &mut self,
        input: Input,
        format: SchemaFormat,
        implement: bool,
        check: Option<&mut dyn CustomCheck>,
    ) -> Result<ModuleId> {
        let (text, path) = input.read()?;
        let stmt = parse_source(&text, format)?;
        match stmt.keyword.as_str() {
            "module" => {}
            "submodule" => {
                return Err(Error::invalid_argument(format!(
                    "\"{}\" is a submodule; load its main module instead",
                    stmt.argument.as_deref().unwrap_or_default()
                )));
            }
            other => {
                return Err(Error::validation(
                    format!("expected \"module\", found \"{other}\""),
                    stmt.span.line,
                ));
            }
        }
        let implement = implement || self.config.all_implemented;
        self.install(&stmt, None, path, implement, check)
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Releases the trees of module `id` selected by `scope`.
    ///
    /// `destructor` sees every compiled node once, with its private data.
    /// The entry stays registered and keeps its implemented flag.
    ///
    /// # Errors
    /// `InvalidArgument` for an unknown id.
    pub fn free_module(
        &mut self,
        id: ModuleId,
        scope: FreeScope,
        destructor: &mut dyn PrivateDestructor,
    ) -> Result<()> {
        let entry = self
            .modules
            .get_mut(id.index())
            .ok_or_else(|| Error::invalid_argument(format!("unknown module id {}", id.0)))?;
        if matches!(scope, FreeScope::Compiled | FreeScope::All) {
            if let Some(mut compiled) = entry.compiled.take() {
                for mut node in compiled.take_nodes() {
                    let private = node.private.take();
                    destructor.destroy(&node, private);
                }
            }
        }
        if matches!(scope, FreeScope::Parsed | FreeScope::All) {
            entry.parsed = None;
        }
        debug!(module = %entry.name, ?scope, "module freed");
        Ok(())
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.modules.clear();
        self.by_name.clear();
        self.loading_stack.clear();
    }

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------

    /// Runs a public operation, reporting its error once at the outermost
    /// level.
    fn run_reported<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let outermost = self.loading_stack.is_empty();
        let result = op(self);
        if outermost {
            if let Err(err) = &result {
                self.sink.report(Diagnostic::from_error(err));
            }
        }
        result
    }

    /// Forwards collected notes to the sink.
    fn flush(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            self.sink.report(diagnostic);
        }
    }
}
