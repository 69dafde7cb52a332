//! Lexer for the YANG compact syntax.
//!
//! The lexer converts source text into a stream of tokens. Quoted strings
//! come out fully processed: escapes are resolved and the indentation of
//! multi-line double-quoted strings is stripped relative to the column of
//! the opening quote.

use yangtree_foundation::Span;

use crate::token::{Token, TokenKind};

/// Width of a tab when stripping indentation from double-quoted strings.
const TAB_WIDTH: u32 = 8;

/// Lexer for YANG source code.
pub struct Lexer<'src> {
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
    /// Whether the last produced token was a quoted string (enables `+`).
    after_quoted: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
            line: 1,
            column: 1,
            after_quoted: false,
        }
    }

    /// Returns the current line (1-based).
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the current column (1-based).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
            );
        };

        let kind = match c {
            '{' => {
                self.advance();
                TokenKind::LBrace
            }
            '}' => {
                self.advance();
                TokenKind::RBrace
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            '+' if self.after_quoted => {
                self.advance();
                TokenKind::Plus
            }
            '/' if self.peek_char_n(1) == Some('/') => self.scan_line_comment(),
            '/' if self.peek_char_n(1) == Some('*') => self.scan_block_comment(),
            '"' => self.scan_double_quoted(start_column),
            '\'' => self.scan_single_quoted(),
            _ => self.scan_word(),
        };

        self.after_quoted = matches!(kind, TokenKind::Quoted(_));
        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks at the character `n` positions ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans a `//` comment up to the end of the line.
    fn scan_line_comment(&mut self) -> TokenKind {
        self.advance();
        self.advance();
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        TokenKind::Comment(text)
    }

    /// Scans a `/* */` comment.
    fn scan_block_comment(&mut self) -> TokenKind {
        self.advance();
        self.advance();
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return TokenKind::Comment(text);
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => return TokenKind::Error("unterminated block comment".into()),
            }
        }
    }

    /// Scans a single-quoted string. No escapes are recognized inside.
    fn scan_single_quoted(&mut self) -> TokenKind {
        self.advance();
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('\'') => {
                    self.advance();
                    return TokenKind::Quoted(text);
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => return TokenKind::Error("unterminated single-quoted string".into()),
            }
        }
    }

    /// Scans a double-quoted string opened at `quote_column`.
    fn scan_double_quoted(&mut self, quote_column: u32) -> TokenKind {
        self.advance();
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return TokenKind::Quoted(text);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some(c) => {
                            return TokenKind::Error(format!("invalid escape sequence: \\{c}"));
                        }
                        None => {
                            return TokenKind::Error(
                                "unexpected end of input in string escape".into(),
                            );
                        }
                    };
                    self.advance();
                    text.push(escaped);
                }
                Some('\n') => {
                    let trimmed = text.trim_end_matches([' ', '\t']).len();
                    text.truncate(trimmed);
                    text.push('\n');
                    self.advance();
                    self.skip_indentation(quote_column);
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => return TokenKind::Error("unterminated double-quoted string".into()),
            }
        }
    }

    /// Skips leading whitespace of a continuation line, up to and including
    /// the column of the opening quote.
    fn skip_indentation(&mut self, quote_column: u32) {
        let mut width = 0;
        loop {
            let step = match self.peek_char() {
                Some(' ') => 1,
                Some('\t') => TAB_WIDTH,
                _ => break,
            };
            if width + step > quote_column {
                break;
            }
            width += step;
            self.advance();
        }
    }

    /// Scans an unquoted string.
    fn scan_word(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            let comment_start =
                c == '/' && matches!(self.peek_char_n(1), Some('/' | '*'));
            if c.is_whitespace() || matches!(c, '{' | '}' | ';' | '"' | '\'') || comment_start {
                break;
            }
            text.push(c);
            self.advance();
        }
        if text.is_empty() {
            let c = self.peek_char().unwrap_or('?');
            self.advance();
            return TokenKind::Error(format!("unexpected character: {c}"));
        }
        TokenKind::Word(text)
    }
}
