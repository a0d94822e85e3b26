//! The modes federc runs the front end in

use feder_parsing::lexer::Lexer;
use feder_parsing::parser::Parser;
use feder_tokens::token::TokenKind;
use std::io;
use std::io::Write;
use tracing::{debug, info};

/// Writes the name of every token up to the end of the input. Fails if any token was an error.
pub fn dump_tokens(mut lexer: Lexer, out: &mut impl Write) -> io::Result<bool> {
    let mut failed = false;
    for token in lexer.by_ref() {
        match token.kind() {
            TokenKind::Eof => break,
            TokenKind::Error => failed = true,
            _ => {}
        }
        writeln!(out, "{}", token.kind().name())?;
    }
    info!(
        "dumped tokens with {} diagnostics",
        lexer.diagnostics().len()
    );
    Ok(!failed)
}

/// Parses exactly one expression and writes its rendering
pub fn print_expression(mut parser: Parser, out: &mut impl Write) -> io::Result<bool> {
    match parser.parse_single_expression() {
        Ok(expr) => {
            writeln!(out, "{expr}")?;
            Ok(true)
        }
        Err(e) => {
            debug!("no expression: {e}");
            Ok(false)
        }
    }
}

/// Parses a program and writes its rendering. Fails if the program is incomplete.
pub fn print_program(mut parser: Parser, out: &mut impl Write) -> io::Result<bool> {
    let program = parser.parse_program();
    writeln!(out, "{program}")?;
    info!(
        "parsed {} lines with {} diagnostics, status={:?}",
        program.lines().len(),
        parser.diagnostics().len(),
        program.status()
    );
    Ok(!program.has_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use feder_tokens::diagnostic::Silent;
    use test_log::test;

    fn lexer(text: &str) -> Lexer {
        Lexer::from_text("test", text).with_sink(Silent)
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).expect("output is not utf-8")
    }

    #[test]
    fn test_dump_tokens() {
        let mut buffer = vec![];
        let ok = dump_tokens(lexer("x := 1\nf(x)"), &mut buffer).expect("could not write");
        assert!(ok);
        assert_eq!(
            output(buffer),
            "identifier\noperator\nnumber\nend-of-line\nidentifier\n(\nidentifier\n)\n"
        );
    }

    #[test]
    fn test_dump_tokens_with_error() {
        let mut buffer = vec![];
        let ok = dump_tokens(lexer("a $ b\nc"), &mut buffer).expect("could not write");
        assert!(!ok);
        assert_eq!(output(buffer), "identifier\nerror\nend-of-line\nidentifier\n");
    }

    #[test]
    fn test_print_expression() {
        let mut buffer = vec![];
        let ok = print_expression(Parser::new(lexer("1 + 2 * 3")), &mut buffer)
            .expect("could not write");
        assert!(ok);
        assert_eq!(output(buffer), "(1 + (2 * 3))\n");

        let mut buffer = vec![];
        let ok = print_expression(Parser::new(lexer("1 +")), &mut buffer).expect("could not write");
        assert!(!ok);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_print_program() {
        let mut buffer = vec![];
        let ok = print_program(Parser::new(lexer("x := 1\nx")), &mut buffer)
            .expect("could not write");
        assert!(ok);
        assert_eq!(output(buffer), "(x := 1)\nx\n");

        let mut buffer = vec![];
        let ok = print_program(Parser::new(lexer("x := )\ny := 2")), &mut buffer)
            .expect("could not write");
        assert!(!ok);
        assert_eq!(output(buffer), "(y := 2)\n");
    }
}
