use feder_ast::Expr;
use feder_parsing::lexer::LexingError;
use feder_parsing::{parse_expression, parse_file, parse_program, tokenize};
use feder_tokens::number::Number;
use feder_tokens::spanned::Spanned;
use feder_tokens::token::{Token, TokenKind};
use std::io::Write;
use test_log::test;
use tracing::info;

mod common;

#[test]
fn test_parse_complete_program() {
    let (program, diagnostics) = parse_program("shapes", common::SHAPES);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert!(!program.has_error());
    info!("parsed:\n{program}");

    let rendered: Vec<String> = program.lines().iter().map(|line| line.to_string()).collect();
    assert_eq!(
        rendered,
        [
            "namespace shapes",
            "enum{T} Option",
            "func describe(o : Option{int}) : int",
            "(total := 0)",
            "for (i := 0); (i < 10); (i++)",
        ]
    );
}

#[test]
fn test_parsing_is_deterministic() {
    let (first, first_diagnostics) = parse_program("shapes", common::SHAPES);
    let (second, second_diagnostics) = parse_program("shapes", common::SHAPES);
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(first_diagnostics.len(), second_diagnostics.len());

    let (tokens, _) = tokenize("shapes", common::SHAPES);
    let (again, _) = tokenize("shapes", common::SHAPES);
    assert_eq!(tokens, again);
}

#[test]
fn test_good_line_then_bad_line() {
    let (program, diagnostics) = parse_program("test", "x := 1\ny := )\nz := 2\n");
    assert!(program.has_error());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].span().line_start(), 1);
    let rendered: Vec<String> = program.lines().iter().map(|line| line.to_string()).collect();
    assert_eq!(rendered, ["(x := 1)", "(z := 2)"]);
}

#[test]
fn test_good_call_then_bad_line() {
    let (program, diagnostics) = parse_program("test", "print(x)\ny := )\n");
    assert!(program.has_error());
    assert_eq!(diagnostics.len(), 1);
    let rendered: Vec<String> = program.lines().iter().map(|line| line.to_string()).collect();
    assert_eq!(rendered, ["print(x)"]);
}

#[test]
fn test_stray_terminator_at_top_level() {
    let (program, diagnostics) = parse_program("test", "a := 1\n;\nb := 2");
    assert!(program.has_error());
    assert_eq!(diagnostics[0].message(), "Expected end-of-file.");
    assert_eq!(program.lines().len(), 2);
}

#[test]
fn test_number_literals() {
    let value = |text: &str| match parse_expression("test", text) {
        Ok(Expr::Num(num)) => num.value(),
        other => panic!("{text:?} parsed to {other:?}"),
    };
    assert_eq!(value("42"), Number::I32(42));
    assert_eq!(value("0x1F"), Number::I32(31));
    assert_eq!(value("7uL"), Number::U64(7));
    assert_eq!(value("2.5f"), Number::F32(2.5));
    assert_eq!(value("2.5"), Number::F64(2.5));
}

#[test]
fn test_string_escapes() {
    let (tokens, diagnostics) = tokenize("test", r#""a\tb\n" '\\' '\''"#);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let kinds: Vec<TokenKind> = tokens.into_iter().map(Token::into_kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::String("a\tb\n".to_string()),
            TokenKind::Char('\\'),
            TokenKind::Char('\''),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_precedence_rendering() {
    let render = |text: &str| match parse_expression("test", text) {
        Ok(expr) => expr.to_string(),
        Err(diagnostics) => panic!("{text:?} failed: {diagnostics:?}"),
    };
    assert_eq!(render("a = b + c * d"), "(a = (b + (c * d)))");
    assert_eq!(render("a.b(c)[d]"), "(a . b)(c)[d]");
    assert_eq!(render("-x++"), "(-(x++))");
}

#[test]
fn test_array_forms() {
    let parsed = |text: &str| parse_expression("test", text).map_err(|d| format!("{d:?}"));
    assert!(matches!(parsed("[1, 2]"), Ok(Expr::ArrayList(_))));
    assert!(matches!(parsed("[0 ; 4]"), Ok(Expr::ArrayCon(_))));
    assert!(matches!(parsed("[4]"), Ok(Expr::ArrayIndex(_))));
    assert!(parsed("[1, 2").is_err());
}

#[test]
fn test_empty_trait_is_rejected() {
    let (program, diagnostics) = parse_program("test", "trait Empty\n;\n");
    assert!(program.has_error());
    assert_eq!(
        diagnostics[0].message(),
        "Traits with no inherited traits must declare at least one function."
    );
}

#[test]
fn test_parse_file() -> eyre::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(common::SHAPES.as_bytes())?;
    let (program, diagnostics) = parse_file(file.path())?;
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(program.lines().len(), 5);
    Ok(())
}

#[test]
fn test_parse_missing_file() {
    let dir = tempfile::tempdir().expect("could not create temp dir");
    let result = parse_file(&dir.path().join("missing.fd"));
    assert!(matches!(result, Err(LexingError::Io(_))));
}
