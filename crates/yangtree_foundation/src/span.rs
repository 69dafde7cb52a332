//! Statement positions.
//!
//! Every statement, argument and declared name remembers where it was read,
//! so collisions can name the earlier declaration and validation failures
//! can name the offending line. A span also identifies a statement: two
//! declarations with equal spans are the same declaration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a token or statement sits in a module source.
///
/// `line` and `column` are 1-based. Readers that only see lines (YIN) leave
/// the byte offsets at zero. The default span (line 0) marks items built
/// outside any source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Line of the first character.
    pub line: u32,
    /// Column of the first character.
    pub column: u32,
}

impl Span {
    /// Creates a span from byte offsets and a starting position.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Creates a span that only knows its line.
    #[must_use]
    pub const fn at_line(line: u32) -> Self {
        Self {
            start: 0,
            end: 0,
            line,
            column: 1,
        }
    }
}
