#![doc = include_str!("../README.md")]

use crate::lexer::{Lexer, LexingError};
use crate::parser::Parser;
use feder_ast::{Expr, Program};
use feder_tokens::diagnostic::{Diagnostic, Silent};
use feder_tokens::token::Token;
use std::path::Path;

pub mod lexer;
pub mod parser;

/// Splits `text` into tokens, up to and including the end of file token.
///
/// Lexical errors show up as [Error](feder_tokens::token::TokenKind::Error) tokens, with their
/// diagnostics returned alongside.
pub fn tokenize(name: &str, text: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer::from_text(name, text).with_sink(Silent);
    let tokens = lexer.by_ref().collect();
    (tokens, lexer.diagnostics().to_vec())
}

/// Parses `text` as exactly one expression
pub fn parse_expression(name: &str, text: &str) -> Result<Expr, Vec<Diagnostic>> {
    let mut parser = Parser::new(Lexer::from_text(name, text).with_sink(Silent));
    parser
        .parse_single_expression()
        .map_err(|_| parser.diagnostics().to_vec())
}

/// Parses `text` as a program. The program is always produced, check
/// [has_error](Program::has_error) or the diagnostics to see whether it is complete.
pub fn parse_program(name: &str, text: &str) -> (Program, Vec<Diagnostic>) {
    parse_with(Parser::new(Lexer::from_text(name, text).with_sink(Silent)))
}

/// Parses a file as a program, failing only if the file can't be read.
pub fn parse_file(path: &Path) -> Result<(Program, Vec<Diagnostic>), LexingError> {
    let lexer = Lexer::read_path(path)?.with_sink(Silent);
    Ok(parse_with(Parser::new(lexer)))
}

fn parse_with(mut parser: Parser) -> (Program, Vec<Diagnostic>) {
    let program = parser.parse_program();
    (program, parser.diagnostics().to_vec())
}
