//! Per-parse state.
//!
//! A [`ParserContext`] lives for one parse of a module. Besides the module
//! under construction it carries the deferred typedef and grouping scope
//! sets, which collision checking consumes once the whole module is read,
//! and the include stack used to detect circular includes.

use yangtree_foundation::{Diagnostic, Span};
use yangtree_schema::{NodeId, ParsedModule};

/// State of one parse pass.
#[derive(Debug)]
pub struct ParserContext {
    /// The module or submodule being built.
    pub module: ParsedModule,
    /// Name of the main module the parse belongs to.
    main_name: String,
    /// Nodes that declared at least one typedef.
    typedef_scopes: Vec<NodeId>,
    /// Nodes that declared at least one grouping.
    grouping_scopes: Vec<NodeId>,
    /// Submodules currently being included, outermost first.
    include_stack: Vec<String>,
    /// Notes collected during the pass, flushed by the registry.
    diagnostics: Vec<Diagnostic>,
    /// Line of the statement being processed.
    line: u32,
    /// Nesting depth of the statement being processed.
    indent: u32,
}

impl ParserContext {
    /// Creates a context for parsing the main module `main_name`.
    #[must_use]
    pub fn new(main_name: impl Into<String>) -> Self {
        Self {
            module: ParsedModule::default(),
            main_name: main_name.into(),
            typedef_scopes: Vec::new(),
            grouping_scopes: Vec::new(),
            include_stack: Vec::new(),
            diagnostics: Vec::new(),
            line: 0,
            indent: 0,
        }
    }

    /// Creates the context for a submodule included from this one.
    #[must_use]
    pub fn for_submodule(&self, submodule: impl Into<String>) -> Self {
        let mut include_stack = self.include_stack.clone();
        include_stack.push(submodule.into());
        Self {
            include_stack,
            ..Self::new(self.main_name.clone())
        }
    }

    /// Returns the main module name.
    #[must_use]
    pub fn main_name(&self) -> &str {
        &self.main_name
    }

    /// Renames the main module once its statement has been read.
    pub fn set_main_name(&mut self, name: impl Into<String>) {
        self.main_name = name.into();
    }

    /// Returns the include stack, outermost first.
    #[must_use]
    pub fn include_stack(&self) -> &[String] {
        &self.include_stack
    }

    /// Returns true if `name` is being included or is the main module.
    #[must_use]
    pub fn is_including(&self, name: &str) -> bool {
        name == self.main_name || self.include_stack.iter().any(|n| n == name)
    }

    /// Defers a typedef scope for collision checking.
    pub fn defer_typedef_scope(&mut self, node: NodeId) {
        if !self.typedef_scopes.contains(&node) {
            self.typedef_scopes.push(node);
        }
    }

    /// Defers a grouping scope for collision checking.
    pub fn defer_grouping_scope(&mut self, node: NodeId) {
        if !self.grouping_scopes.contains(&node) {
            self.grouping_scopes.push(node);
        }
    }

    /// Returns the deferred typedef scopes.
    #[must_use]
    pub fn typedef_scopes(&self) -> &[NodeId] {
        &self.typedef_scopes
    }

    /// Returns the deferred grouping scopes.
    #[must_use]
    pub fn grouping_scopes(&self) -> &[NodeId] {
        &self.grouping_scopes
    }

    /// Records a note for the diagnostic sink.
    pub fn note(&mut self, line: u32, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::note(line, message));
    }

    /// Moves collected diagnostics out of the context.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Appends diagnostics from a nested context.
    pub fn extend_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Records the position of the statement being processed.
    pub fn enter(&mut self, span: Span) {
        self.line = span.line;
        self.indent += 1;
    }

    /// Leaves the statement entered last.
    pub fn leave(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Returns the current line.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the current nesting depth.
    #[must_use]
    pub const fn indent(&self) -> u32 {
        self.indent
    }

    /// Consumes the context and returns the built module.
    #[must_use]
    pub fn into_module(self) -> ParsedModule {
        self.module
    }
}
