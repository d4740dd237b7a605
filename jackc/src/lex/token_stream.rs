//! Token stream with a single token of look ahead.
use super::{Lexer, Token, TokenKind};
use crate::error::{JackError, JackResult, SyntaxError};

/// Pull based stream of tokens.
///
/// Tokens are lazily lexed. Peeking or consuming the next token
/// triggers the internal lexer. At most one token is buffered, which
/// is the current look ahead of the parser.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    /// Keep reference to the source so the parser can
    /// slice fragments from it.
    original: &'a str,
    /// Look ahead token that was lexed but not consumed yet.
    peeked: Option<Token>,
}

impl<'a> TokenStream<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            original: lexer.source_code(),
            lexer,
            peeked: None,
        }
    }

    pub fn source_code(&self) -> &'a str {
        self.original
    }

    /// Helper function to extract the token's text
    /// from the original source code.
    #[inline]
    pub fn text(&self, token: &Token) -> &'a str {
        token.text(self.original)
    }

    /// Return the current token without advancing the cursor.
    pub fn peek(&mut self) -> JackResult<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(&*self.peeked.insert(token))
    }

    /// Return the current token kind without advancing the cursor.
    #[inline]
    pub fn peek_kind(&mut self) -> JackResult<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    /// Consumes the current token regardless of kind.
    pub fn next_token(&mut self) -> JackResult<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    /// Consumes the current token if it matches the given token kind.
    ///
    /// Returns true when matched. Does not consume the token if
    /// the kinds do not match.
    pub fn match_token(&mut self, token_kind: TokenKind) -> JackResult<bool> {
        if self.peek_kind()? == token_kind {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Return the current token and advance the cursor.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] if the token kind doesn't match.
    /// The cursor is not advanced in that case.
    pub fn consume(&mut self, token_kind: TokenKind) -> JackResult<Token> {
        let token = self.peek()?.clone();

        if token.kind != token_kind {
            return Err(self.unexpected(&token, token_kind));
        }

        self.next_token()
    }

    /// Build the error for a token that doesn't fit the
    /// grammar, given a description of what does.
    #[inline(never)]
    #[cold]
    pub fn unexpected(&self, token: &Token, expected: impl ToString) -> JackError {
        let found = match token.kind {
            TokenKind::EOF => "end-of-file".to_string(),
            TokenKind::Str => format!("\"{}\"", self.text(token)),
            _ => format!("'{}'", self.text(token)),
        };

        SyntaxError::new(self.original, token.span, expected, found).into()
    }
}
