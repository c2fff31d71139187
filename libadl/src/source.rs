//! The character cursor over ADL source text.
//!
//! Backtracking in the grammar engine works purely by value: a rule copies
//! its cursor, attempts a sub-production on the copy, and either assigns the
//! advanced copy back (commit) or drops it (discard). Nothing upstream is
//! mutated until commit, so previously-read input is always available for
//! another attempt and no "unread" operation exists.

/// A position in a text stream.
///
/// Implementations must be cheap to copy; copying snapshots a position.
/// Two cursors over the same input subtract to a byte offset via `offset`.
pub trait Source: Copy {
    /// Next character, or `None` at end of input.
    fn peek(&self) -> Option<char>;

    /// Move past the character last returned by `peek`.
    fn advance(&mut self);

    /// Byte offset from the start of the input.
    fn offset(&self) -> usize;

    /// One-based line number, for diagnostics.
    fn line(&self) -> u32;

    /// One-based column number, for diagnostics.
    fn column(&self) -> u32;

    /// The text between this cursor and a later cursor over the same input.
    fn slice_to<'a>(&'a self, end: &Self) -> &'a str;

    /// The remaining unconsumed text.
    fn rest(&self) -> &str;
}

/// A `Source` over a UTF-8 string slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'t> {
    text: &'t str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'t> Cursor<'t> {
    /// Create a cursor at the start of `text`, at line 1, column 1.
    pub fn new(text: &'t str) -> Self {
        Cursor {
            text,
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl<'t> Source for Cursor<'t> {
    fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.offset += ch.len_utf8();
        }
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn line(&self) -> u32 {
        self.line
    }

    fn column(&self) -> u32 {
        self.column
    }

    fn slice_to<'a>(&'a self, end: &Self) -> &'a str {
        &self.text[self.offset..end.offset]
    }

    fn rest(&self) -> &str {
        &self.text[self.offset..]
    }
}
