//! Control flow: `if`, `match` and the `for`/`do` loops

use crate::parser::{ErrorKind, Parser, SyntaxResult};
use feder_ast::{
    BinOpExpr, Expr, ForExpr, IdExpr, IfCase, IfExpr, MatchCase, MatchExpr, Program, PLACEHOLDER,
};
use feder_tokens::operator::Operator;
use feder_tokens::spanned::Spanned;
use feder_tokens::token::TokenKind;

impl Parser {
    /// `if c` program (`else if c` program)* (`else` program)? `;`
    pub(crate) fn parse_if(&mut self) -> SyntaxResult<IfExpr> {
        let start = self.peek().span();
        self.with_ignore_nl(false, |parser| {
            let mut cases = vec![parser.parse_if_case()?];
            let mut else_case = None;
            while parser
                .consume_if(|t| matches!(t.kind(), TokenKind::Else))
                .is_some()
            {
                if matches!(parser.peek_kind(), TokenKind::If) {
                    cases.push(parser.parse_if_case()?);
                } else {
                    parser.consume_if(|t| matches!(t.kind(), TokenKind::Nl));
                    else_case = Some(parser.program(false));
                    break;
                }
            }
            parser.expect_semicolon()?;
            let span = start.merge(&cases[0].condition().span());
            Ok(IfExpr::new(span, cases, else_case))
        })
    }

    fn parse_if_case(&mut self) -> SyntaxResult<IfCase> {
        self.expect("if", |k| matches!(k, TokenKind::If))?;
        let condition = self.parse_expr(0, false)?;
        self.expect_nl()?;
        let program = self.program(false);
        if !matches!(self.peek_kind(), TokenKind::SemiColon | TokenKind::Else) {
            return Err(self.error(ErrorKind::Custom("Expected token ';' or 'else'.")));
        }
        Ok(IfCase::new(condition, program))
    }

    /// `match x` followed by one case per line, terminated by `;`. A case is a dotted path
    /// followed by `=>` program `;`. A path destructured with `(...)` may leave out the `=>`.
    /// The `_` case is the default.
    pub(crate) fn parse_match(&mut self) -> SyntaxResult<MatchExpr> {
        let keyword = self.consume();
        self.with_ignore_nl(false, |parser| {
            let scrutinee = parser.parse_expr(0, false)?;
            parser.expect_nl()?;
            let span = keyword.span().merge(&scrutinee.span());

            let mut cases = vec![];
            let mut default = None;
            let mut failed = false;
            loop {
                match parser.peek_kind() {
                    TokenKind::SemiColon | TokenKind::Eof => break,
                    TokenKind::Nl => {
                        parser.consume();
                        continue;
                    }
                    _ => {}
                }
                match parser.non_terminal("match case", Self::parse_match_case) {
                    Ok((pattern, program)) if pattern.as_identifier() == Some(PLACEHOLDER) => {
                        if default.is_some() {
                            let error = parser.error_with_span(
                                ErrorKind::Semantic(
                                    "Match statement must have just one default case.",
                                ),
                                pattern.span(),
                            );
                            parser.report(error);
                        } else {
                            default = Some(program);
                        }
                    }
                    Ok((pattern, program)) => cases.push(MatchCase::new(pattern, program)),
                    Err(e) => {
                        parser.report(e);
                        failed = true;
                        parser.recover_line();
                        continue;
                    }
                }
                if let Err(e) = parser.expect_nl() {
                    parser.report(e);
                    failed = true;
                    parser.recover_line();
                }
            }
            parser.expect_semicolon()?;

            if failed {
                return Err(ErrorKind::Reported.into());
            }
            if cases.is_empty() {
                return Err(parser.error_with_span(
                    ErrorKind::Semantic("Expected at least one match case."),
                    span,
                ));
            }
            Ok(MatchExpr::new(span, scrutinee, cases, default))
        })
    }

    fn parse_match_case(&mut self) -> SyntaxResult<(Expr, Program)> {
        let path = self.parse_path()?;
        let pattern = match self.peek_kind() {
            TokenKind::LParen => {
                let destructured = self.parse_primary()?;
                let span = path.span().merge(&destructured.span());
                self.consume_if(|t| t.operator() == Some(Operator::Implies));
                BinOpExpr::new(span, Operator::Call, path, destructured).into()
            }
            TokenKind::Operator(Operator::Implies) => {
                self.consume();
                path
            }
            _ => return Err(self.error(ErrorKind::Custom("Expected token '(' or '=>'."))),
        };
        let program = self.program(false);
        self.expect_semicolon()?;
        Ok((pattern, program))
    }

    /// `a.b.c` as an identifier or a chain of member accesses
    fn parse_path(&mut self) -> SyntaxResult<Expr> {
        let (span, name) = self.expect_identifier()?;
        let mut path: Expr = IdExpr::new(span, name).into();
        while self
            .consume_if(|t| t.operator() == Some(Operator::Member))
            .is_some()
        {
            let (span, name) = self.expect_identifier()?;
            let member = IdExpr::new(span, name);
            let span = path.span().merge(&member.span());
            path = BinOpExpr::new(span, Operator::Member, path, member.into()).into();
        }
        Ok(path)
    }

    /// `for [init ;] cond [; step]` program `;`, or
    /// `do [init ;] step` program `; for cond`
    pub(crate) fn parse_for(&mut self) -> SyntaxResult<ForExpr> {
        let keyword = self.consume();
        let post_condition = matches!(keyword.kind(), TokenKind::Do);
        self.with_ignore_nl(false, |parser| {
            let max_parts = if post_condition { 2 } else { 3 };
            let mut parts = vec![];
            if !matches!(parser.peek_kind(), TokenKind::Nl) {
                parts.push(parser.parse_expr(0, false)?);
                while parts.len() < max_parts
                    && parser
                        .consume_if(|t| matches!(t.kind(), TokenKind::SemiColon))
                        .is_some()
                {
                    parts.push(parser.parse_expr(0, false)?);
                }
            }

            let (mut init, mut condition, mut step) = (None, None, None);
            let count = parts.len();
            let mut parts = parts.into_iter();
            match (post_condition, count) {
                (_, 0) => {}
                (false, 1) => condition = parts.next(),
                (false, 2) => {
                    condition = parts.next();
                    step = parts.next();
                }
                (false, _) => {
                    init = parts.next();
                    condition = parts.next();
                    step = parts.next();
                }
                (true, 1) => step = parts.next(),
                (true, _) => {
                    init = parts.next();
                    step = parts.next();
                }
            }

            parser.expect_nl()?;
            let body = parser.program(false);
            parser.expect_semicolon()?;

            if post_condition {
                parser.expect("for", |k| matches!(k, TokenKind::For))?;
                condition = Some(parser.parse_expr(0, false)?);
                if !matches!(parser.peek_kind(), TokenKind::Nl | TokenKind::Eof) {
                    let found = parser.peek().clone();
                    return Err(parser.error(ErrorKind::expected_token(
                        ["end-of-line", "end-of-file"],
                        found,
                    )));
                }
            }

            Ok(ForExpr::new(
                keyword.span(),
                init,
                condition,
                step,
                body,
                post_condition,
            ))
        })
    }
}
