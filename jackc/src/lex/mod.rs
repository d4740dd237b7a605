//! Lexical analysis
mod cursor;
mod lexer;
mod token_stream;
mod tokens;

pub use self::{
    lexer::{write_tokens_xml, Lexer, LexerIter, MAX_SOURCE_LEN},
    token_stream::TokenStream,
    tokens::{Keyword, Span, Symbol, Token, TokenKind},
};
