//! Builds the feder AST from a token stream.
//!
//! Expressions are parsed by precedence climbing over the operator table. Statement constructs
//! (declarations, `if`, `match`, loops) are entered from primary expressions by their keyword.

use crate::lexer::Lexer;
use feder_ast::{Expr, Program, ProgramStatus};
use feder_tokens::diagnostic::{Diagnostic, DiagnosticClass};
use feder_tokens::spanned::{Span, Spanned};
use feder_tokens::token::{Token, TokenKind};
use std::collections::VecDeque;
use tracing::{debug, trace};

mod control;
mod error;
mod expr;
mod items;

pub use error::*;

/// Creates the AST from a [Lexer]'s token stream.
///
/// Syntax errors are reported through the lexer's diagnostic sink as they are found. Parsing a
/// program never aborts: failed lines are skipped and mark the program
/// [Incomplete](ProgramStatus::Incomplete).
///
/// # Examples
/// ```
/// # use feder_parsing::lexer::Lexer;
/// # use feder_parsing::parser::Parser;
/// let lexer = Lexer::from_text("example", "x := 1 + 2");
/// let mut parser = Parser::new(lexer);
/// let program = parser.parse_program();
/// assert!(!program.has_error());
/// assert_eq!(program.to_string(), "(x := (1 + 2))");
/// ```
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    lookahead: VecDeque<Token>,
    last_span: Option<Span>,
    ignore_nl: bool,
    non_terminals: Vec<&'static str>,
}

impl Parser {
    /// Creates a new parser with a given lexer
    pub fn new(lexer: Lexer) -> Self {
        Self {
            lexer,
            lookahead: VecDeque::new(),
            last_span: None,
            ignore_nl: false,
            non_terminals: vec![],
        }
    }

    /// Every diagnostic reported so far, lexical ones included
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.lexer.diagnostics()
    }

    /// Parses a complete top-level program
    pub fn parse_program(&mut self) -> Program {
        self.program(true)
    }

    /// Parses exactly one expression, which must be followed by the end of the input
    pub fn parse_single_expression(&mut self) -> SyntaxResult<Expr> {
        let expr = match self.parse_expr(0, false) {
            Ok(expr) => expr,
            Err(e) => {
                self.report(e);
                return Err(ErrorKind::Reported.into());
            }
        };
        if !matches!(self.peek_kind(), TokenKind::Eof) {
            let error = self.error(ErrorKind::Custom(
                "After parsing one expression: EOF not reached!",
            ));
            self.report(error);
            return Err(ErrorKind::Reported.into());
        }
        Ok(expr)
    }

    /// Parses a primary expression followed by every operator binding at least as tight as
    /// `prec`. `fn_decl` stops at top-level commas, which separate function parameters.
    pub(crate) fn parse_expr(&mut self, prec: usize, fn_decl: bool) -> SyntaxResult<Expr> {
        let primary = self.parse_primary()?;
        self.parse_rhs(primary, prec, fn_decl)
    }

    /// Parses lines until something that can't start a line. At top level that is only the end
    /// of the input.
    pub(crate) fn program(&mut self, top_level: bool) -> Program {
        let diagnostics_before = self.diagnostics().len();
        let mut lines = vec![];
        let mut failed = false;
        trace!("starting program, top_level={top_level}");
        loop {
            while self
                .consume_if(|t| matches!(t.kind(), TokenKind::Nl))
                .is_some()
            {}
            let kind = self.peek_kind();
            if matches!(kind, TokenKind::Eof) {
                break;
            }
            if matches!(kind, TokenKind::Else) || !kind.is_primary() {
                if !top_level {
                    break;
                }
                let error = self.error(ErrorKind::Custom("Expected end-of-file."));
                self.report(error);
                failed = true;
                self.consume();
                self.recover_line();
                continue;
            }

            match self.parse_expr(0, false) {
                Ok(line) => lines.push(line),
                Err(e) => {
                    self.report(e);
                    failed = true;
                    self.recover_line();
                    continue;
                }
            }

            match self.peek_kind() {
                TokenKind::Nl => {
                    self.consume();
                }
                TokenKind::SemiColon | TokenKind::Else | TokenKind::Eof => {}
                _ => {
                    let error = self.error(ErrorKind::Custom("Expected end-of-line."));
                    self.report(error);
                    failed = true;
                    self.recover_line();
                }
            }
        }

        let status = if failed || self.diagnostics().len() > diagnostics_before {
            ProgramStatus::Incomplete
        } else {
            ProgramStatus::Complete
        };
        debug!(
            "finished program with {} lines, status={status:?}",
            lines.len()
        );
        Program::new(lines, status)
    }

    /// Skips to the start of the next line. Stops before a `;` or the end of the input, which
    /// belong to an enclosing construct.
    fn recover_line(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Eof | TokenKind::SemiColon => return,
                TokenKind::Nl => {
                    self.consume();
                    return;
                }
                _ => {
                    self.consume();
                }
            }
        }
    }

    fn fill(&mut self) {
        loop {
            if self.lookahead.is_empty() {
                let token = self.lexer.next_token();
                self.lookahead.push_back(token);
            }
            if self.ignore_nl
                && matches!(
                    self.lookahead.front().map(Token::kind),
                    Some(TokenKind::Nl)
                )
            {
                self.lookahead.pop_front();
                continue;
            }
            break;
        }
    }

    /// peek the current lookahead
    pub(crate) fn peek(&mut self) -> &Token {
        self.fill();
        &self.lookahead[0]
    }

    pub(crate) fn peek_kind(&mut self) -> &TokenKind {
        self.peek().kind()
    }

    pub(crate) fn consume(&mut self) -> Token {
        self.fill();
        let token = self
            .lookahead
            .pop_front()
            .unwrap_or_else(|| self.lexer.next_token());
        trace!("consumed {token:?}");
        self.last_span = Some(token.span());
        token
    }

    /// consumes if predicate matches
    pub(crate) fn consume_if<F>(&mut self, predicate: F) -> Option<Token>
    where
        F: FnOnce(&Token) -> bool,
    {
        if predicate(self.peek()) {
            Some(self.consume())
        } else {
            None
        }
    }

    /// Consumes a token of the expected kind, `name` being how the kind is reported
    pub(crate) fn expect<F>(&mut self, name: &str, predicate: F) -> SyntaxResult<Token>
    where
        F: FnOnce(&TokenKind) -> bool,
    {
        if predicate(self.peek_kind()) {
            Ok(self.consume())
        } else {
            let found = self.peek().clone();
            Err(self.error(ErrorKind::expected_token([name], found)))
        }
    }

    pub(crate) fn expect_nl(&mut self) -> SyntaxResult<Token> {
        self.expect("end-of-line", |k| matches!(k, TokenKind::Nl))
    }

    pub(crate) fn expect_semicolon(&mut self) -> SyntaxResult<Token> {
        self.expect(";", |k| matches!(k, TokenKind::SemiColon))
    }

    /// Sets the parser into a given ignore state.
    pub(crate) fn set_ignore_nl(&mut self, state: bool) {
        if self.ignore_nl == state {
            return;
        }
        self.ignore_nl = state;
        if state {
            while matches!(self.lookahead.front().map(Token::kind), Some(TokenKind::Nl)) {
                self.lookahead.pop_front();
            }
        }
    }

    /// Runs `func` with new lines ignored or not, restoring the previous state afterward
    pub(crate) fn with_ignore_nl<F: FnOnce(&mut Self) -> SyntaxResult<O>, O>(
        &mut self,
        state: bool,
        func: F,
    ) -> SyntaxResult<O> {
        let old_state = self.ignore_nl;
        self.set_ignore_nl(state);
        let ret = (func)(self);
        self.set_ignore_nl(old_state);
        ret
    }

    /// Runs a sub-parser, recording its name on the non terminal stack
    pub(crate) fn non_terminal<F: FnOnce(&mut Self) -> SyntaxResult<O>, O>(
        &mut self,
        name: &'static str,
        func: F,
    ) -> SyntaxResult<O> {
        trace!("starting parsing {name}");
        self.non_terminals.push(name);
        let ret = (func)(self);
        self.non_terminals.pop();
        trace!("after parsing {name}, ok={}", ret.is_ok());
        ret
    }

    /// An error located at the current lookahead
    pub(crate) fn error(&mut self, kind: ErrorKind) -> SyntaxError {
        let span = self.peek().span();
        self.error_with_span(kind, span)
    }

    pub(crate) fn error_with_span(&self, kind: ErrorKind, span: Span) -> SyntaxError {
        SyntaxError::new(kind, span, self.non_terminals.clone())
    }

    /// Emits the diagnostic for an error, unless that already happened
    pub(crate) fn report(&mut self, error: SyntaxError) {
        if error.is_reported() {
            return;
        }
        let class = if error.error_kind().is_semantic() {
            DiagnosticClass::Semantic
        } else {
            DiagnosticClass::Syntax
        };
        let span = error
            .location()
            .cloned()
            .or_else(|| self.last_span.clone())
            .unwrap_or_else(|| self.peek().span());
        trace!("reporting {error}");
        self.lexer.report(Diagnostic::new(
            class,
            error.error_kind().to_string(),
            span,
        ));
    }
}

impl From<Lexer> for Parser {
    fn from(value: Lexer) -> Self {
        Self::new(value)
    }
}
