//! Primary expressions and the precedence climbing loop

use crate::parser::{ErrorKind, Parser, SyntaxResult};
use feder_ast::{
    ArrayConExpr, ArrayIndexExpr, ArrayListExpr, BinOpExpr, BraceExpr, CharExpr, Expr, IdExpr,
    NumExpr, StrExpr, TemplateExpr, UnOpExpr,
};
use feder_tokens::operator::{Operator, OperatorPosition};
use feder_tokens::spanned::Spanned;
use feder_tokens::token::{Token, TokenKind};

impl Parser {
    /// Parses one primary expression, dispatching on the current token
    pub(crate) fn parse_primary(&mut self) -> SyntaxResult<Expr> {
        let token = self.peek().clone();
        match token.kind() {
            TokenKind::Identifier(name) => {
                self.consume();
                Ok(IdExpr::new(token.span(), name.clone()).into())
            }
            TokenKind::Number(number) => {
                self.consume();
                Ok(NumExpr::new(token.span(), *number).into())
            }
            TokenKind::String(value) => {
                self.consume();
                Ok(StrExpr::new(token.span(), value.clone()).into())
            }
            TokenKind::Char(value) => {
                self.consume();
                Ok(CharExpr::new(token.span(), *value).into())
            }
            TokenKind::LParen => self.non_terminal("brace", Self::parse_brace),
            TokenKind::LBracket => self.non_terminal("array", Self::parse_array),
            TokenKind::LCurly => Ok(self.non_terminal("template", Self::parse_template)?.into()),
            TokenKind::Func | TokenKind::VirtualFunc => {
                Ok(self.non_terminal("func", Self::parse_function)?.into())
            }
            TokenKind::Class => Ok(self.non_terminal("class", Self::parse_class)?.into()),
            TokenKind::Trait => Ok(self.non_terminal("trait", Self::parse_trait)?.into()),
            TokenKind::Enum => Ok(self.non_terminal("enum", Self::parse_enum)?.into()),
            TokenKind::Namespace => {
                Ok(self.non_terminal("namespace", Self::parse_namespace)?.into())
            }
            TokenKind::If => Ok(self.non_terminal("if", Self::parse_if)?.into()),
            TokenKind::Match => Ok(self.non_terminal("match", Self::parse_match)?.into()),
            TokenKind::For | TokenKind::Do => {
                Ok(self.non_terminal("for", Self::parse_for)?.into())
            }
            TokenKind::Operator(op) => self.parse_left_unary(*op),
            TokenKind::Error => {
                self.consume();
                Err(ErrorKind::Reported.into())
            }
            other => Err(self.error(ErrorKind::NotPrimary(other.name().to_string()))),
        }
    }

    fn parse_left_unary(&mut self, op: Operator) -> SyntaxResult<Expr> {
        if !op.is_valid_at(OperatorPosition::LeftUnary) {
            return Err(self.error(ErrorKind::Custom(
                "Expected primary token or left-side unary operator.",
            )));
        }
        let op_token = self.consume();
        let operand = self.parse_expr(op.precedence(OperatorPosition::LeftUnary), false)?;
        let span = op_token.span().merge(&operand.span());
        Ok(UnOpExpr::new(span, op, OperatorPosition::LeftUnary, operand).into())
    }

    /// `( expr? )`
    fn parse_brace(&mut self) -> SyntaxResult<Expr> {
        let open = self.consume();
        self.with_ignore_nl(true, |parser| {
            if let Some(close) = parser.consume_if(|t| matches!(t.kind(), TokenKind::RParen)) {
                return Ok(BraceExpr::new(open.span().merge(&close.span()), None).into());
            }
            let inner = parser.parse_expr(0, false)?;
            let close = parser.expect(")", |k| matches!(k, TokenKind::RParen))?;
            Ok(BraceExpr::new(open.span().merge(&close.span()), Some(inner)).into())
        })
    }

    /// `[x ; n]`, `[a, b, ...]` or `[i]`
    fn parse_array(&mut self) -> SyntaxResult<Expr> {
        let open = self.consume();
        self.with_ignore_nl(true, |parser| {
            let first = parser.parse_expr(0, false)?;
            if parser
                .consume_if(|t| matches!(t.kind(), TokenKind::SemiColon))
                .is_some()
            {
                let size = parser.parse_expr(0, false)?;
                let close = parser.expect("]", |k| matches!(k, TokenKind::RBracket))?;
                let span = open.span().merge(&close.span());
                return Ok(ArrayConExpr::new(span, first, size).into());
            }
            let close = parser.expect("]", |k| matches!(k, TokenKind::RBracket))?;
            let span = open.span().merge(&close.span());
            if first.binary_operator() == Some(Operator::Comma) {
                Ok(ArrayListExpr::new(span, first.unchain(Operator::Comma)).into())
            } else {
                Ok(ArrayIndexExpr::new(span, first).into())
            }
        })
    }

    /// `{a, b, ...}`
    pub(crate) fn parse_template(&mut self) -> SyntaxResult<TemplateExpr> {
        let open = self.consume();
        self.with_ignore_nl(true, |parser| {
            let params = parser.parse_expr(0, false)?;
            let close = parser.expect("}", |k| matches!(k, TokenKind::RCurly))?;
            Ok(TemplateExpr::new(
                open.span().merge(&close.span()),
                params.unchain(Operator::Comma),
            ))
        })
    }

    /// Applies every operator following `lhs` that binds at least as tight as `prec`
    pub(crate) fn parse_rhs(
        &mut self,
        mut lhs: Expr,
        prec: usize,
        fn_decl: bool,
    ) -> SyntaxResult<Expr> {
        loop {
            let op_token = self.peek().clone();
            if !continues_expr(&op_token, prec, fn_decl) {
                break;
            }
            if let Some(op) = self.eat_right_unary(&op_token) {
                lhs = right_unary(lhs, op, &op_token);
                continue;
            }
            let op = match op_token.kind() {
                TokenKind::Operator(op) => {
                    self.consume();
                    *op
                }
                TokenKind::LParen => Operator::Call,
                TokenKind::LBracket => Operator::Index,
                _ => Operator::Template,
            };

            let mut rhs = self.parse_primary()?;
            loop {
                let next = self.peek().clone();
                let binds_tighter = next.precedence() > op_token.precedence()
                    || (next.is_right_associative() && next.precedence() == op_token.precedence());
                if !next.kind().is_binary_capable()
                    || !binds_tighter
                    || (fn_decl && next.operator() == Some(Operator::Comma))
                {
                    break;
                }
                if let Some(op) = self.eat_right_unary(&next) {
                    rhs = right_unary(rhs, op, &next);
                    continue;
                }
                rhs = self.parse_rhs(rhs, next.precedence(), fn_decl)?;
            }

            let span = lhs.span().merge(&rhs.span());
            lhs = BinOpExpr::new(span, op, lhs, rhs).into();
        }
        Ok(lhs)
    }

    /// Consumes `op_token` if it is a right-unary operator
    fn eat_right_unary(&mut self, op_token: &Token) -> Option<Operator> {
        let op = op_token
            .operator()
            .filter(|op| op.is_valid_at(OperatorPosition::RightUnary))?;
        self.consume();
        Some(op)
    }
}

fn right_unary(operand: Expr, op: Operator, op_token: &Token) -> Expr {
    let span = operand.span().merge(&op_token.span());
    UnOpExpr::new(span, op, OperatorPosition::RightUnary, operand).into()
}

fn continues_expr(token: &Token, prec: usize, fn_decl: bool) -> bool {
    token.kind().is_binary_capable()
        && token.precedence() > 0
        && token.precedence() >= prec
        && !(fn_decl && token.operator() == Some(Operator::Comma))
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use feder_ast::Expr;
    use feder_tokens::diagnostic::Silent;
    use test_log::test;

    fn parse(text: &str) -> Expr {
        let mut parser = Parser::new(Lexer::from_text("test", text).with_sink(Silent));
        match parser.parse_single_expression() {
            Ok(expr) => expr,
            Err(e) => panic!("{text:?} failed: {e} {:?}", parser.diagnostics()),
        }
    }

    fn render(text: &str) -> String {
        parse(text).to_string()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(render("1+2*3"), "(1 + (2 * 3))");
        assert_eq!(render("1*2+3"), "((1 * 2) + 3)");
        assert_eq!(render("a - b - c"), "((a - b) - c)");
        assert_eq!(render("a || b && c | d"), "(a || (b && (c | d)))");
        assert_eq!(render("a.b.c"), "((a . b) . c)");
    }

    #[test]
    fn test_right_associative() {
        assert_eq!(render("a := b := c"), "(a := (b := c))");
        assert_eq!(render("a = b += c"), "(a = (b += c))");
        assert_eq!(render("x : int = 1"), "((x : int) = 1)");
    }

    #[test]
    fn test_unary() {
        assert_eq!(render("-a * b"), "((-a) * b)");
        assert_eq!(render("i++"), "(i++)");
        assert_eq!(render("!a.b"), "(!(a . b))");
        assert_eq!(render("a + b++"), "(a + (b++))");
        assert_eq!(render("safe x"), "(safex)");
    }

    #[test]
    fn test_call_index_template() {
        assert_eq!(render("f(x, y)"), "f((x , y))");
        assert_eq!(render("f()"), "f()");
        assert_eq!(render("a[i]"), "a[i]");
        assert_eq!(render("Vec{T}"), "Vec{T}");
        assert_eq!(render("a.f(x)"), "(a . f)(x)");
    }

    #[test]
    fn test_arrays() {
        assert_eq!(render("[1,2,3]"), "[1, 2, 3]");
        assert_eq!(render("[x;5]"), "[x ; 5]");
        assert_eq!(render("[i]"), "[i]");
        assert_eq!(render("[\n1,\n2\n]"), "[1, 2]");
    }

    #[test]
    fn test_brace_ignores_new_lines() {
        assert_eq!(render("(a\n+ b)"), "((a + b))");
        assert_eq!(render("()"), "()");
    }

    #[test]
    fn test_trailing_tokens() {
        let mut parser = Parser::new(Lexer::from_text("test", "a b").with_sink(Silent));
        assert!(parser.parse_single_expression().is_err());
        assert_eq!(
            parser.diagnostics()[0].message(),
            "After parsing one expression: EOF not reached!"
        );
    }

    #[test]
    fn test_unary_only_operator_does_not_join() {
        let mut parser = Parser::new(Lexer::from_text("test", "a ! b").with_sink(Silent));
        assert!(parser.parse_single_expression().is_err());
        assert_eq!(
            parser.diagnostics()[0].message(),
            "After parsing one expression: EOF not reached!"
        );
    }

    #[test]
    fn test_not_a_primary() {
        let mut parser = Parser::new(Lexer::from_text("test", "* )").with_sink(Silent));
        assert!(parser.parse_single_expression().is_err());
        let mut parser = Parser::new(Lexer::from_text("test", "/ a").with_sink(Silent));
        assert!(parser.parse_single_expression().is_err());
        assert_eq!(
            parser.diagnostics()[0].message(),
            "Expected primary token or left-side unary operator."
        );
    }
}
