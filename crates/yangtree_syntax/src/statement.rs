//! Generic statement tree.
//!
//! Both concrete syntaxes read into the same shape: a keyword, an optional
//! argument, and nested substatements. Giving meaning to keywords is the job
//! of the layer above.

use yangtree_foundation::{Error, Result, Span};

/// Concrete syntax of a module source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaFormat {
    /// YANG compact text syntax.
    Yang,
    /// YIN XML syntax.
    Yin,
}

impl SchemaFormat {
    /// Returns the conventional file extension (without the dot).
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Yang => "yang",
            Self::Yin => "yin",
        }
    }

    /// Guesses the format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yang" => Some(Self::Yang),
            "yin" => Some(Self::Yin),
            _ => None,
        }
    }
}

/// One statement with its substatements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    /// The keyword, possibly `prefix:name` for extension instances.
    pub keyword: String,
    /// The argument, if the statement has one.
    pub argument: Option<String>,
    /// Location of the keyword.
    pub span: Span,
    /// Substatements in source order.
    pub children: Vec<Statement>,
}

impl Statement {
    /// Creates a statement without substatements.
    #[must_use]
    pub fn new(keyword: impl Into<String>, argument: Option<String>, span: Span) -> Self {
        Self {
            keyword: keyword.into(),
            argument,
            span,
            children: Vec::new(),
        }
    }

    /// Adds a substatement (builder style).
    #[must_use]
    pub fn with_child(mut self, child: Statement) -> Self {
        self.children.push(child);
        self
    }

    /// Returns true if the keyword is a prefixed extension instance.
    #[must_use]
    pub fn is_extension_instance(&self) -> bool {
        self.keyword.contains(':')
    }

    /// Returns the argument or a validation error naming the keyword.
    ///
    /// # Errors
    /// Fails when the statement has no argument.
    pub fn arg(&self) -> Result<&str> {
        self.argument.as_deref().ok_or_else(|| {
            Error::validation(
                format!("missing argument of \"{}\"", self.keyword),
                self.span.line,
            )
        })
    }

    /// Returns the first substatement with the given keyword.
    #[must_use]
    pub fn child(&self, keyword: &str) -> Option<&Statement> {
        self.children.iter().find(|c| c.keyword == keyword)
    }

    /// Returns the argument of the first substatement with the given keyword.
    #[must_use]
    pub fn child_arg(&self, keyword: &str) -> Option<&str> {
        self.child(keyword).and_then(|c| c.argument.as_deref())
    }

    /// Iterates substatements with the given keyword.
    pub fn children_with<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Statement> {
        self.children.iter().filter(move |c| c.keyword == keyword)
    }

    /// Counts every statement in this subtree, including this one.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Statement::count).sum::<usize>()
    }
}
