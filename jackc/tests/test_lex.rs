use jackc::lex::{Keyword, Lexer, Symbol, TokenKind};

/// Kind and text of every token, including the final end-of-file.
fn tokens(source: &str) -> Vec<(TokenKind, &str)> {
    Lexer::new(source)
        .into_iter()
        .map(|result| {
            let token = result.unwrap();
            (token.kind, token.text(source))
        })
        .collect()
}

#[test]
fn test_lex_statement() {
    use TokenKind as TK;

    let source = "let a[i] = \"x y\" + 12;";
    assert_eq!(
        tokens(source),
        [
            (TK::Keyword(Keyword::Let), "let"),
            (TK::Ident, "a"),
            (TK::Symbol(Symbol::LeftBracket), "["),
            (TK::Ident, "i"),
            (TK::Symbol(Symbol::RightBracket), "]"),
            (TK::Symbol(Symbol::Eq), "="),
            (TK::Str, "x y"),
            (TK::Symbol(Symbol::Plus), "+"),
            (TK::Int, "12"),
            (TK::Symbol(Symbol::Semicolon), ";"),
            (TK::EOF, ""),
        ]
    );
}

#[test]
fn test_lex_comments_and_whitespace() {
    const SOURCE: &str = "\u{FEFF}// heading\r\n/** doc\n * block */\tclass_1 /* inline */ classy\n";

    assert_eq!(
        tokens(SOURCE),
        [
            (TokenKind::Ident, "class_1"),
            (TokenKind::Ident, "classy"),
            (TokenKind::EOF, ""),
        ]
    );
}

#[test]
fn test_lex_unterminated_block_comment() {
    assert_eq!(
        tokens("x /* never closed\n y"),
        [(TokenKind::Ident, "x"), (TokenKind::EOF, "")]
    );
}

#[test]
fn test_lex_symbols_adjacent() {
    let kinds: Vec<_> = tokens("~(a&b)|-c").into_iter().map(|(kind, _)| kind).collect();
    assert_eq!(kinds.len(), 10);
    assert_eq!(kinds[0], TokenKind::Symbol(Symbol::Tilde));
    assert_eq!(kinds[3], TokenKind::Symbol(Symbol::Amp));
    assert_eq!(kinds[6], TokenKind::Symbol(Symbol::Pipe));
    assert_eq!(kinds[7], TokenKind::Symbol(Symbol::Minus));
}

#[test]
fn test_lex_eof_once() {
    let mut lexer = Lexer::new("  ");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EOF);
    assert!(lexer.at_end());
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EOF);

    let mut iter = Lexer::new("x").into_iter();
    assert!(iter.next().is_some());
    assert!(iter.next().is_some());
    assert!(iter.next().is_none());
}

#[test]
fn test_lex_stops_at_error() {
    let results: Vec<_> = Lexer::new("a $ b").into_iter().collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[test]
fn test_tokens_xml() {
    let xml = jackc::tokens_xml("if (x < 1) { let s = \"hi\"; }").unwrap();
    let expected = [
        "<tokens>",
        "<keyword> if </keyword>",
        "<symbol> ( </symbol>",
        "<identifier> x </identifier>",
        "<symbol> &lt; </symbol>",
        "<integerConstant> 1 </integerConstant>",
        "<symbol> ) </symbol>",
        "<symbol> { </symbol>",
        "<keyword> let </keyword>",
        "<identifier> s </identifier>",
        "<symbol> = </symbol>",
        "<stringConstant> hi </stringConstant>",
        "<symbol> ; </symbol>",
        "<symbol> } </symbol>",
        "</tokens>",
    ];

    assert_eq!(xml.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn test_lex_fixture() {
    let source = include_str!("Point.jack");

    let keywords = tokens(source)
        .into_iter()
        .filter(|(kind, _)| matches!(kind, TokenKind::Keyword(_)))
        .count();
    let classes = tokens(source)
        .into_iter()
        .filter(|(kind, _)| kind.is_keyword(Keyword::Class))
        .count();

    assert!(keywords > 20);
    assert_eq!(classes, 1);
}
