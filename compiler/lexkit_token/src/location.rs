//! Source locations.

use std::fmt;

/// Position of a character in its source text.
///
/// `offset` is a byte offset; `line` and `column` are 1-based, with columns
/// counted in characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextLocation {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl TextLocation {
    /// Create a location from its parts.
    #[inline]
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        TextLocation {
            offset,
            line,
            column,
        }
    }

    /// Location of the first character of a source.
    #[inline]
    pub const fn start() -> Self {
        TextLocation::new(0, 1, 1)
    }

    /// Location of the character following `ch`, if `ch` sits at `self`.
    ///
    /// A `'\n'` starts a new line; every other character moves one column.
    #[must_use]
    pub fn advance_over(self, ch: char) -> Self {
        // `len_utf8` is at most 4.
        #[allow(clippy::cast_possible_truncation)]
        let offset = self.offset.saturating_add(ch.len_utf8() as u32);
        if ch == '\n' {
            TextLocation::new(offset, self.line.saturating_add(1), 1)
        } else {
            TextLocation::new(offset, self.line, self.column.saturating_add(1))
        }
    }
}

impl Default for TextLocation {
    fn default() -> Self {
        TextLocation::start()
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
