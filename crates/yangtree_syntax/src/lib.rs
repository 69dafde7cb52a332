//! Statement readers for the two concrete YANG syntaxes.
//!
//! This crate provides:
//! - [`Lexer`] and [`Parser`] - The YANG compact syntax
//! - [`parse_yin`] - The YIN XML syntax
//! - [`Statement`] - The generic statement tree both readers produce

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod lexer;
pub mod parser;
pub mod statement;
pub mod token;
pub mod yin;

pub use lexer::Lexer;
pub use parser::{Parser, parse_yang};
pub use statement::{SchemaFormat, Statement};
pub use token::{Token, TokenKind};
pub use yin::parse_yin;

use yangtree_foundation::Result;

/// Reads module source text in the given syntax into its top-level statement.
///
/// # Errors
/// Returns the first syntax error found.
pub fn parse_source(source: &str, format: SchemaFormat) -> Result<Statement> {
    match format {
        SchemaFormat::Yang => parse_yang(source),
        SchemaFormat::Yin => parse_yin(source),
    }
}
