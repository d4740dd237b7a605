use jackc::{compile_str, JackError, LexErrorKind};

fn compile_err(source: &str) -> JackError {
    match compile_str(source) {
        Ok(code) => panic!("expected compile error, got:\n{code}"),
        Err(err) => err,
    }
}

/// Expected and found descriptions of a syntax error.
fn syntax_err(source: &str) -> (String, String) {
    match compile_err(source) {
        JackError::Syntax(err) => (err.expected, err.found),
        err => panic!("expected syntax error: {err}"),
    }
}

#[test]
fn test_unknown_character() {
    let source = "class A {\n  function void f() {\n    return #;\n  }\n}";

    match compile_err(source) {
        JackError::Lex(err) => {
            assert_eq!(err.kind, LexErrorKind::UnknownChar('#'));
            assert_eq!(err.at.line_no, 3);
            assert_eq!(err.at.column, 12);
            assert_eq!(err.at.text, "    return #;");
        }
        err => panic!("expected lexical error: {err}"),
    }
}

#[test]
fn test_unterminated_string() {
    let source = "class A { function void f() { do Output.printString(\"oops);\n } }";

    match compile_err(source) {
        JackError::Lex(err) => assert_eq!(err.kind, LexErrorKind::UnterminatedString),
        err => panic!("expected lexical error: {err}"),
    }
}

#[test]
fn test_missing_semicolon() {
    let (expected, found) = syntax_err("class A { function void f() { return } }");
    assert_eq!(expected, "term");
    assert_eq!(found, "'}'");

    let (expected, found) = syntax_err("class A { field int x }");
    assert_eq!(expected, "';'");
    assert_eq!(found, "'}'");
}

#[test]
fn test_unexpected_end_of_input() {
    let (expected, found) = syntax_err("class A {");
    assert_eq!(expected, "subroutine declaration or '}'");
    assert_eq!(found, "end-of-file");
}

#[test]
fn test_trailing_tokens() {
    let (expected, found) = syntax_err("class A { } class B { }");
    assert_eq!(expected, "end-of-file");
    assert_eq!(found, "'class'");
}

#[test]
fn test_unknown_statement() {
    let (expected, found) = syntax_err("class A { function void f() { foo; } }");
    assert_eq!(expected, "statement or '}'");
    assert_eq!(found, "'foo'");
}

#[test]
fn test_bad_type() {
    let (expected, found) = syntax_err("class A { field 5 x; }");
    assert_eq!(expected, "type");
    assert_eq!(found, "'5'");

    let (expected, _) = syntax_err("class A { function ; f() { return; } }");
    assert_eq!(expected, "type or 'void'");
}

#[test]
fn test_missing_term() {
    let (expected, found) =
        syntax_err("class A { function void f() { var int x; let x = ; return; } }");
    assert_eq!(expected, "term");
    assert_eq!(found, "';'");
}

#[test]
fn test_integer_out_of_range() {
    let (expected, found) =
        syntax_err("class A { function int f() { return 99999999999; } }");
    assert!(expected.starts_with("integer constant"), "{expected}");
    assert_eq!(found, "'99999999999'");
}

#[test]
fn test_undefined_assignment_target() {
    match compile_err("class A { function void f() { let y = 1; return; } }") {
        JackError::Name(err) => {
            assert_eq!(err.name.as_str(), "y");
            assert_eq!(err.at.line_no, 1);
        }
        err => panic!("expected name error: {err}"),
    }
}

#[test]
fn test_undefined_variable_read() {
    let source = r#"
    class A {
        function int f() {
            var int x;
            let x = z + 1;
            return x;
        }
    }
    "#;

    match compile_err(source) {
        JackError::Name(err) => assert_eq!(err.name.as_str(), "z"),
        err => panic!("expected name error: {err}"),
    }
}

#[test]
fn test_field_not_visible_after_reset() {
    let source = r#"
    class A {
        function void f() { var int n; let n = 1; return; }
        function void g() { let n = 2; return; }
    }
    "#;

    assert!(matches!(compile_err(source), JackError::Name(_)));
}

#[test]
fn test_unresolved_call_receiver_is_not_an_error() {
    assert!(compile_str("class A { function void f() { do Nope.run(); return; } }").is_ok());
}

#[test]
fn test_error_display() {
    let err = compile_err("class A {\n  field int x\n}");
    let message = err.to_string();

    assert!(message.starts_with("syntax error: expected ';', found '}'"));
    assert!(message.contains("--> line 3, column 1"));
}

#[test]
fn test_too_many_fields() {
    let names: Vec<String> = (0..=u16::MAX as u32).map(|i| format!("f{i}")).collect();
    let source = format!("class A {{ field int {}; }}", names.join(", "));

    let (expected, found) = syntax_err(&source);
    assert_eq!(expected, "at most 65535 field variables");
    assert_eq!(found, "'f65535'");
}

#[test]
fn test_deeply_nested_expression() {
    let depth = 1000;
    let source = format!(
        "class A {{ function int f() {{ return {}1{}; }} }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );

    let (expected, found) = syntax_err(&source);
    assert_eq!(expected, "at most 256 levels of nesting");
    assert_eq!(found, "'('");

    let err = compile_err(&format!(
        "class A {{ function int f() {{ return {}1; }} }}",
        "-".repeat(depth)
    ));
    assert!(matches!(err, JackError::Syntax(_)));
}

#[test]
fn test_moderate_nesting_compiles() {
    let depth = 50;
    let source = format!(
        "class A {{ function int f() {{ return {}1{}; }} }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    assert!(compile_str(&source).is_ok());
}

#[test]
fn test_deeply_nested_blocks() {
    let depth = 300;
    let source = format!(
        "class A {{ function void f() {{ {} {} return; }} }}",
        "while (true) {".repeat(depth),
        "}".repeat(depth)
    );

    // Blocks and terms share one limit, so the condition of the
    // first loop past it is what fails.
    let (expected, _) = syntax_err(&source);
    assert_eq!(expected, "at most 256 levels of nesting");
}
