//! Token types for the YANG compact syntax.
//!
//! Tokens are the output of the lexer and input to the parser.

use yangtree_foundation::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this token can start or continue an argument string.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self.kind, TokenKind::Word(_) | TokenKind::Quoted(_))
    }
}

/// Token types for the YANG compact syntax.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Unquoted string: keywords, identifiers, and bare arguments.
    Word(String),
    /// Single- or double-quoted string, escapes and indentation already processed.
    Quoted(String),
    /// `+` between quoted strings.
    Plus,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semicolon,
    /// `//` or `/* */` comment.
    Comment(String),
    /// End of input.
    Eof,
    /// Lexical error with message.
    Error(String),
}

impl TokenKind {
    /// Returns a human-readable name for the token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Word(_) => "word",
            Self::Quoted(_) => "quoted string",
            Self::Plus => "'+'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Semicolon => "';'",
            Self::Comment(_) => "comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
