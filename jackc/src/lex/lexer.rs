//! Lexical analysis
use std::fmt::Write;

use log::trace;

use super::{
    cursor::{Cursor, EOF_CHAR},
    tokens::{Keyword, Span, Symbol, Token, TokenKind},
};
use crate::{
    error::{JackError, JackResult, LexError, LexErrorKind},
    xml::escape,
};

/// Largest source the lexer accepts. Spans are 32-bit byte offsets.
pub const MAX_SOURCE_LEN: usize = u32::MAX as usize;

pub struct Lexer<'a> {
    /// Character scanner
    cursor: Cursor<'a>,
    /// Keep reference to the source so the parser can
    /// slice fragments from it.
    original: &'a str,
    /// Start absolute byte position of the current token
    /// in the source.
    start_pos: u32,
    /// Source exceeds [`MAX_SOURCE_LEN`], nothing is scanned.
    oversized: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source_code: &'a str) -> Self {
        let oversized = !fits_span(source_code.len());
        let mut cursor = Cursor::new(if oversized { "" } else { source_code });

        // Prime the cursor so the first character is current.
        cursor.next();

        let start_pos = cursor.offset();

        Self {
            cursor,
            original: source_code,
            start_pos,
            oversized,
        }
    }

    /// Original source code that was passed in during construction.
    pub fn source_code(&self) -> &'a str {
        self.original
    }

    /// Scan the source characters and construct the next token.
    ///
    /// Each call starts with the cursor on the first character of
    /// the remaining source, and leaves it on the first character
    /// after the token it built. Whitespace and comments between
    /// tokens are discarded.
    ///
    /// Once the source is exhausted every call returns an
    /// [`TokenKind::EOF`] token.
    pub fn next_token(&mut self) -> JackResult<Token> {
        use TokenKind as TK;

        if self.oversized {
            let kind = LexErrorKind::SourceTooLarge(self.original.len());
            return Err(self.error(Span::new(0, 0), kind));
        }

        self.erase_trivia();
        self.start_token();

        let c = self.cursor.current();
        if c == EOF_CHAR && self.cursor.at_end() {
            return Ok(self.make_token(TK::EOF));
        }

        let token = match c {
            '"' => self.consume_string()?,
            '_' | 'a'..='z' | 'A'..='Z' => self.consume_ident(),
            '0'..='9' => self.consume_number(),
            _ => match Symbol::parse(c) {
                Some(symbol) => self.make_token(TK::Symbol(symbol)),
                None => {
                    let span = Span::new(self.start_pos, c.len_utf8() as u32);
                    return Err(self.error(span, LexErrorKind::UnknownChar(c)));
                }
            },
        };

        trace!("token {:?} {:?}", token.kind, token.span.fragment(self.original));

        Ok(token)
    }

    /// Indicates whether the lexer is at the end of the source.
    pub fn at_end(&self) -> bool {
        self.cursor.at_end()
    }

    #[inline(never)]
    #[cold]
    fn error(&self, span: Span, kind: LexErrorKind) -> JackError {
        LexError::new(self.original, span, kind).into()
    }

    /// Create a span using the starting position of the current token,
    /// and the end of the character under the cursor.
    fn make_span(&self) -> Span {
        let start = self.start_pos;
        let end = self.cursor.peek_offset();

        debug_assert!(end >= start);
        Span::new(start, end - start)
    }

    fn fragment(&self) -> &'a str {
        self.make_span().fragment(self.original)
    }

    /// Primes the lexer to consume the next token.
    fn start_token(&mut self) {
        self.start_pos = self.cursor.offset();
    }

    /// Build a token covering the source from the position stored
    /// by [`start_token`](Lexer::start_token) up to and including the
    /// current character, then step past it.
    fn make_token(&mut self, kind: TokenKind) -> Token {
        let token = Token {
            span: self.make_span(),
            kind,
        };

        self.cursor.next();

        token
    }
}

/// Specialised tokens.
impl<'a> Lexer<'a> {
    /// Skip whitespace, line comments and block comments until
    /// the cursor rests on a token character or the end.
    fn erase_trivia(&mut self) {
        loop {
            match (self.cursor.current(), self.cursor.peek()) {
                (c, _) if is_whitespace(c) => {
                    self.cursor.next();
                }
                ('/', '/') => self.erase_line_comment(),
                ('/', '*') => self.erase_block_comment(),
                _ => return,
            }
        }
    }

    /// Erase comment line up to, but not including, the trailing newline.
    fn erase_line_comment(&mut self) {
        while !is_newline(self.cursor.current()) && !self.cursor.at_end() {
            self.cursor.next();
        }
    }

    /// Erase a block comment, including both markers.
    ///
    /// Block comments don't nest. A comment that's never closed
    /// runs to the end of the source.
    fn erase_block_comment(&mut self) {
        debug_assert_eq!(self.cursor.current(), '/');

        // Step over the opening marker.
        self.cursor.next();
        self.cursor.next();

        while !self.cursor.at_end() {
            if self.cursor.current() == '*' && self.cursor.peek() == '/' {
                self.cursor.next();
                self.cursor.next();
                return;
            }
            self.cursor.next();
        }
    }

    /// Make an identifier or keyword token.
    fn consume_ident(&mut self) -> Token {
        debug_assert!(is_letter(self.cursor.current()));

        while is_letter_or_digit(self.cursor.peek()) {
            self.cursor.next();
        }

        let token_kind = match Keyword::parse(self.fragment()) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Ident,
        };

        self.make_token(token_kind)
    }

    /// Make an integer literal token.
    ///
    /// The digits are not range checked.
    fn consume_number(&mut self) -> Token {
        debug_assert!(is_digit(self.cursor.current()));

        while is_digit(self.cursor.peek()) {
            self.cursor.next();
        }

        self.make_token(TokenKind::Int)
    }

    /// Make a string literal token, quotes included in its span.
    ///
    /// There are no escape sequences, so the string ends at the
    /// next quote. Strings may not span lines.
    fn consume_string(&mut self) -> JackResult<Token> {
        debug_assert_eq!(self.cursor.current(), '"');

        loop {
            let c = self.cursor.next();

            if c == '"' {
                return Ok(self.make_token(TokenKind::Str));
            }

            if is_newline(c) || self.cursor.at_end() {
                let span = Span::new(self.start_pos, self.cursor.offset() - self.start_pos);
                return Err(self.error(span, LexErrorKind::UnterminatedString));
            }
        }
    }
}

/// Test whether the character is considered whitespace
/// that should be ignored by the parser later.
fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0020}' // space
            | '\u{0009}' // tab
            | '\u{000A}' // line feed
            | '\u{000D}' // carriage return
            | '\u{000C}' // form feed
            | '\u{00A0}' // no-break space
            | '\u{FEFF}' // zero width no-break space
    )
}

fn fits_span(len: usize) -> bool {
    len <= MAX_SOURCE_LEN
}

fn is_newline(c: char) -> bool {
    matches!(c, '\r' | '\n')
}

#[allow(clippy::manual_is_ascii_check)] // consistency with other functions
fn is_digit(c: char) -> bool {
    matches!(c, '0'..='9')
}

fn is_letter(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_')
}

fn is_letter_or_digit(c: char) -> bool {
    is_letter(c) || is_digit(c)
}

impl<'a> IntoIterator for Lexer<'a> {
    type Item = JackResult<Token>;
    type IntoIter = LexerIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        LexerIter {
            lexer: self,
            done: false,
        }
    }
}

/// Convenience iterator that wraps the lexer.
///
/// Yields the tokens up to and including one EOF token, or up to
/// and including the first error, then stops.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct LexerIter<'a> {
    done: bool,
    lexer: Lexer<'a>,
}

impl<'a> Iterator for LexerIter<'a> {
    type Item = JackResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.lexer.next_token();
        self.done = match &result {
            Ok(token) => token.kind == TokenKind::EOF,
            Err(_) => true,
        };

        Some(result)
    }
}

/// Write the XML token listing of the source.
///
/// Symbols that are special in XML are escaped.
pub fn write_tokens_xml<W: Write>(source_code: &str, w: &mut W) -> JackResult<()> {
    writeln!(w, "<tokens>")?;

    for result in Lexer::new(source_code) {
        let token = result?;

        if let Some(tag) = token.kind.xml_tag() {
            let text = escape(token.text(source_code));
            writeln!(w, "<{tag}> {text} </{tag}>")?;
        }
    }

    writeln!(w, "</tokens>")?;

    Ok(())
}
