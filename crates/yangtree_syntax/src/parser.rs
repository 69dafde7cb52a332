//! Parser for the YANG compact syntax.
//!
//! The parser converts a stream of tokens into a [`Statement`] tree:
//!
//! ```text
//! statement = keyword [argument] (";" / "{" *statement "}")
//! argument  = word / quoted *("+" quoted)
//! ```

use yangtree_foundation::{Error, Result, Span};

use crate::lexer::Lexer;
use crate::statement::Statement;
use crate::token::{Token, TokenKind};

/// Parser for YANG source code.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        let mut parser = Self { lexer, current };
        parser.skip_trivia();
        parser
    }

    /// Parses exactly one top-level statement followed by end of input.
    ///
    /// # Errors
    /// Returns an error if the source cannot be parsed.
    pub fn parse_module(&mut self) -> Result<Statement> {
        if self.current.kind == TokenKind::Eof {
            return Err(self.error("empty input, expected \"module\" or \"submodule\""));
        }
        let stmt = self.parse_statement()?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.error(&format!(
                "trailing {} after the top-level statement",
                self.current.kind.name()
            )));
        }
        Ok(stmt)
    }

    /// Parses one statement.
    fn parse_statement(&mut self) -> Result<Statement> {
        let span = self.current.span;
        let keyword = match &self.current.kind {
            TokenKind::Word(word) => word.clone(),
            TokenKind::Error(msg) => return Err(self.error(msg)),
            other => {
                return Err(self.error(&format!("expected keyword, found {}", other.name())));
            }
        };
        self.advance();

        let argument = self.parse_argument()?;
        let mut stmt = Statement::new(keyword, argument, span);

        match &self.current.kind {
            TokenKind::Semicolon => {
                self.advance();
            }
            TokenKind::LBrace => {
                self.advance();
                stmt.children = self.parse_block(span)?;
            }
            TokenKind::Error(msg) => return Err(self.error(msg)),
            other => {
                return Err(self.error(&format!(
                    "expected ';' or '{{' after \"{}\", found {}",
                    stmt.keyword,
                    other.name()
                )));
            }
        }

        Ok(stmt)
    }

    /// Parses substatements up to the closing brace.
    fn parse_block(&mut self, open: Span) -> Result<Vec<Statement>> {
        let mut children = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::RBrace => {
                    self.advance();
                    return Ok(children);
                }
                TokenKind::Eof => {
                    return Err(Error::parse(
                        "unterminated block, missing '}'",
                        open.line,
                        open.column,
                    ));
                }
                _ => children.push(self.parse_statement()?),
            }
        }
    }

    /// Parses an optional argument, joining `+` concatenations.
    fn parse_argument(&mut self) -> Result<Option<String>> {
        match &self.current.kind {
            TokenKind::Word(word) => {
                let word = word.clone();
                self.advance();
                Ok(Some(word))
            }
            TokenKind::Quoted(text) => {
                let mut value = text.clone();
                self.advance();
                while self.current.kind == TokenKind::Plus {
                    self.advance();
                    match &self.current.kind {
                        TokenKind::Quoted(next) => {
                            value.push_str(next);
                            self.advance();
                        }
                        other => {
                            return Err(self.error(&format!(
                                "expected quoted string after '+', found {}",
                                other.name()
                            )));
                        }
                    }
                }
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    /// Moves to the next non-comment token.
    fn advance(&mut self) {
        self.current = self.lexer.next_token();
        self.skip_trivia();
    }

    /// Skips comments.
    fn skip_trivia(&mut self) {
        while matches!(self.current.kind, TokenKind::Comment(_)) {
            self.current = self.lexer.next_token();
        }
    }

    /// Creates an error at the current token.
    fn error(&self, message: &str) -> Error {
        Error::parse(message, self.current.span.line, self.current.span.column)
    }
}

/// Parses YANG source text into its top-level statement.
///
/// # Errors
/// Returns a parse error describing the first syntax problem.
pub fn parse_yang(source: &str) -> Result<Statement> {
    Parser::new(source).parse_module()
}
