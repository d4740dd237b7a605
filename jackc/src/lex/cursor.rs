//! Character scanner.
use std::str::CharIndices;

use itertools::{multipeek, MultiPeek};

/// Placeholder character for the position past the end of the source.
pub const EOF_CHAR: char = '\0';

/// Forward cursor over the characters of the source code.
///
/// The cursor starts out on a non-existant EOF char, and must be
/// advanced once before the first character is current.
pub struct Cursor<'a> {
    /// Iterator over UTF-8 encoded source code.
    ///
    /// Peeking advances the internal peek cursor of `MultiPeek`, so
    /// it's reset before every lookup to keep `peek()` idempotent.
    chars: MultiPeek<CharIndices<'a>>,
    /// Byte position and value of the current character.
    current: (u32, char),
    len: u32,
}

impl<'a> Cursor<'a> {
    /// The text must fit 32-bit offsets, which the lexer checks.
    pub fn new(text: &'a str) -> Self {
        debug_assert!(text.len() <= u32::MAX as usize);

        Self {
            chars: multipeek(text.char_indices()),
            current: (0, EOF_CHAR),
            len: text.len() as u32,
        }
    }

    /// The character under the cursor.
    #[inline]
    pub fn current(&self) -> char {
        self.current.1
    }

    /// Byte offset of the current character.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.current.0
    }

    /// Byte offset directly after the current character.
    #[inline]
    pub fn peek_offset(&self) -> u32 {
        if self.at_end() {
            self.len
        } else {
            self.current.0 + self.current.1.len_utf8() as u32
        }
    }

    /// The character after the current one, without advancing.
    pub fn peek(&mut self) -> char {
        self.chars.reset_peek();
        let c = self.chars.peek().map(|(_, c)| *c).unwrap_or(EOF_CHAR);
        self.chars.reset_peek();
        c
    }

    /// Advance the cursor and return the new current character.
    ///
    /// Stays on [`EOF_CHAR`] once the source is exhausted.
    pub fn next(&mut self) -> char {
        self.current = match self.chars.next() {
            Some((index, c)) => (index as u32, c),
            None => (self.len, EOF_CHAR),
        };
        self.current.1
    }

    /// Indicates whether the cursor has moved past the last character.
    ///
    /// The source may contain literal null characters, so
    /// [`EOF_CHAR`] alone doesn't mean the end was reached.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.current.0 >= self.len
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cursor_walk() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.current(), EOF_CHAR);

        assert_eq!(cursor.next(), 'a');
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.peek(), 'b');
        assert_eq!(cursor.peek(), 'b', "peek must not advance");

        assert_eq!(cursor.next(), 'b');
        assert_eq!(cursor.peek_offset(), 2);
        assert!(!cursor.at_end());

        assert_eq!(cursor.next(), EOF_CHAR);
        assert!(cursor.at_end());
        assert_eq!(cursor.next(), EOF_CHAR);
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_cursor_multibyte() {
        let mut cursor = Cursor::new("é;");
        cursor.next();
        assert_eq!(cursor.peek_offset(), 2);
        assert_eq!(cursor.next(), ';');
        assert_eq!(cursor.offset(), 2);
    }
}
