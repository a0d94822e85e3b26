//! Declarations: functions, classes, traits, enums and namespaces

use crate::parser::{ErrorKind, Parser, SyntaxResult};
use feder_ast::{
    ClassExpr, EnumExpr, Expr, FuncExpr, FuncParam, NamespaceExpr, TemplateExpr, TraitExpr,
    PLACEHOLDER,
};
use feder_tokens::operator::{Operator, OperatorPosition};
use feder_tokens::spanned::{Span, Spanned};
use feder_tokens::token::TokenKind;

enum ClassMember {
    Attribute(Expr),
    Constructor(FuncExpr),
    Function(FuncExpr),
}

impl Parser {
    /// `func{T} a.b(params) : R` followed by `;`, a body, or nothing for a function type
    pub(crate) fn parse_function(&mut self) -> SyntaxResult<FuncExpr> {
        let keyword = self.consume();
        let is_virtual = matches!(keyword.kind(), TokenKind::VirtualFunc);
        let span = keyword.span();
        self.with_ignore_nl(false, |parser| {
            let template = parser.parse_optional_template()?;
            let name = if matches!(parser.peek_kind(), TokenKind::Identifier(_)) {
                parser.parse_name_path()?
            } else {
                vec![]
            };
            let params = if matches!(parser.peek_kind(), TokenKind::LParen) {
                parser.parse_params()?
            } else {
                vec![]
            };
            let return_type = if parser
                .consume_if(|t| t.operator() == Some(Operator::Declare))
                .is_some()
            {
                let above_comma = Operator::Comma.precedence(OperatorPosition::Binary) + 1;
                Some(parser.parse_expr(above_comma, false)?)
            } else {
                None
            };

            if name.is_empty() {
                if is_virtual {
                    return Err(parser.error_with_span(
                        ErrorKind::Custom("Function types mustn't be virtual functions."),
                        span,
                    ));
                }
                if let Some(template) = template {
                    return Err(parser.error_with_span(
                        ErrorKind::Custom("Function types mustn't have a template."),
                        template.span(),
                    ));
                }
                return Ok(FuncExpr::new(span, name, None, params, return_type, None, false));
            }

            if parser
                .consume_if(|t| matches!(t.kind(), TokenKind::SemiColon))
                .is_some()
            {
                if name.len() != 1 {
                    return Err(parser.error_with_span(
                        ErrorKind::Custom(
                            "Reference name of declared function must be just 1 identifier.",
                        ),
                        span,
                    ));
                }
                return Ok(FuncExpr::new(
                    span,
                    name,
                    template,
                    params,
                    return_type,
                    None,
                    is_virtual,
                ));
            }

            parser.expect_nl()?;
            let body = parser.program(false);
            parser.expect_semicolon()?;
            Ok(FuncExpr::new(
                span,
                name,
                template,
                params,
                return_type,
                Some(body),
                is_virtual,
            ))
        })
    }

    /// `(p, p, ...)`, each parameter parsed as an expression and then taken apart
    fn parse_params(&mut self) -> SyntaxResult<Vec<FuncParam>> {
        self.consume();
        self.with_ignore_nl(true, |parser| {
            let mut params = vec![];
            loop {
                match parser.peek_kind() {
                    TokenKind::RParen => {
                        parser.consume();
                        return Ok(params);
                    }
                    TokenKind::Eof => {
                        let found = parser.peek().clone();
                        return Err(parser.error(ErrorKind::expected_token([")"], found)));
                    }
                    _ => {}
                }
                if !params.is_empty()
                    && parser
                        .consume_if(|t| t.operator() == Some(Operator::Comma))
                        .is_none()
                {
                    return Err(parser.error(ErrorKind::Custom("Expected tokens ',' or ')'.")));
                }
                let param = parser.parse_expr(0, true)?;
                params.push(parser.destructure_param(param)?);
            }
        })
    }

    /// Splits `name : type | guard => result` into its parts. Everything but the type is
    /// optional.
    fn destructure_param(&self, param: Expr) -> SyntaxResult<FuncParam> {
        let span = param.span();
        match param {
            Expr::BinOp(bin)
                if bin.op() == Operator::Implies
                    && bin.lhs().binary_operator() == Some(Operator::BitOr) =>
            {
                let (guarded, result) = bin.into_operands();
                match guarded {
                    Expr::BinOp(or) => {
                        let (ty, guard) = or.into_operands();
                        self.named_param(span, ty, Some(guard), Some(result))
                    }
                    ty => self.named_param(span, ty, None, Some(result)),
                }
            }
            Expr::BinOp(bin) if bin.op() == Operator::BitOr => {
                let (ty, guard) = bin.into_operands();
                match guard {
                    Expr::BinOp(implies) if implies.op() == Operator::Implies => {
                        let (guard, result) = implies.into_operands();
                        self.named_param(span, ty, Some(guard), Some(result))
                    }
                    guard => self.named_param(span, ty, Some(guard), None),
                }
            }
            ty => self.named_param(span, ty, None, None),
        }
    }

    fn named_param(
        &self,
        span: Span,
        ty: Expr,
        guard: Option<Expr>,
        guard_result: Option<Expr>,
    ) -> SyntaxResult<FuncParam> {
        match ty {
            Expr::BinOp(bin) if bin.op() == Operator::Declare => {
                let (name, ty) = bin.into_operands();
                match name {
                    Expr::Id(id) => Ok(FuncParam::new(span, id.name(), ty, guard, guard_result)),
                    other => Err(self.error_with_span(
                        ErrorKind::Custom("Expected identifier."),
                        other.span(),
                    )),
                }
            }
            ty => Ok(FuncParam::new(span, PLACEHOLDER, ty, guard, guard_result)),
        }
    }

    /// `class{T} Name :: Trait, ...` followed by a body of attributes, constructors and member
    /// functions, terminated by `;`
    pub(crate) fn parse_class(&mut self) -> SyntaxResult<ClassExpr> {
        let keyword = self.consume();
        self.with_ignore_nl(false, |parser| {
            let template = parser.parse_optional_template()?;
            let (name_span, name) = parser.expect_identifier()?;
            let traits = parser.parse_inherited()?;
            parser.expect_nl()?;

            let mut attributes = vec![];
            let mut constructors = vec![];
            let mut functions = vec![];
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
                let member = parser
                    .parse_expr(0, false)
                    .and_then(|expr| parser.class_member(expr, &name));
                match member {
                    Ok(ClassMember::Attribute(attribute)) => attributes.push(attribute),
                    Ok(ClassMember::Constructor(func)) => constructors.push(func),
                    Ok(ClassMember::Function(func)) => functions.push(func),
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
            Ok(ClassExpr::new(
                keyword.span().merge(&name_span),
                name,
                template,
                traits,
                attributes,
                constructors,
                functions,
            ))
        })
    }

    fn class_member(&self, expr: Expr, class_name: &str) -> SyntaxResult<ClassMember> {
        match expr {
            Expr::Func(func) if !func.is_type() => {
                if func.name().len() > 1 {
                    return Err(self.error_with_span(
                        ErrorKind::Custom("Function was expected to have just one identifier."),
                        func.span(),
                    ));
                }
                let name = &func.name()[0];
                if *name == class_name || *name == format!("_{class_name}") {
                    if func.is_virtual() {
                        return Err(self.error_with_span(
                            ErrorKind::Custom("Constructors must not be virtual functions!"),
                            func.span(),
                        ));
                    }
                    Ok(ClassMember::Constructor(func))
                } else {
                    Ok(ClassMember::Function(func))
                }
            }
            Expr::BinOp(bin) if bin.op() == Operator::Declare => {
                Ok(ClassMember::Attribute(bin.into()))
            }
            other => Err(self.error_with_span(
                ErrorKind::Custom("Excpected function or variable declaration."),
                other.span(),
            )),
        }
    }

    /// `trait{T} Name :: Trait, ...` followed by declared virtual functions, terminated by `;`
    pub(crate) fn parse_trait(&mut self) -> SyntaxResult<TraitExpr> {
        let keyword = self.consume();
        self.with_ignore_nl(false, |parser| {
            let template = parser.parse_optional_template()?;
            let (name_span, name) = parser.expect_identifier()?;
            let traits = parser.parse_inherited()?;
            parser.expect_nl()?;

            let mut functions = vec![];
            let mut failed = false;
            loop {
                match parser.peek_kind() {
                    TokenKind::Nl => {
                        parser.consume();
                        continue;
                    }
                    TokenKind::VirtualFunc => {}
                    _ => break,
                }
                match parser.non_terminal("func", Self::parse_function) {
                    Ok(func) => {
                        if !func.is_declared() || !func.is_virtual() {
                            let error = parser.error_with_span(
                                ErrorKind::Custom(
                                    "Traits must have just declared, virtual functions.",
                                ),
                                func.span(),
                            );
                            parser.report(error);
                            failed = true;
                        }
                        functions.push(func);
                    }
                    Err(e) => {
                        parser.report(e);
                        failed = true;
                    }
                }
                if let Err(e) = parser.expect_nl() {
                    parser.report(e);
                    failed = true;
                    parser.recover_line();
                }
            }
            parser.expect_semicolon()?;

            let span = keyword.span().merge(&name_span);
            if traits.is_empty() && functions.is_empty() {
                return Err(parser.error_with_span(
                    ErrorKind::Semantic(
                        "Traits with no inherited traits must declare at least one function.",
                    ),
                    span,
                ));
            }
            if failed {
                return Err(ErrorKind::Reported.into());
            }
            Ok(TraitExpr::new(span, name, template, traits, functions))
        })
    }

    /// `enum{T} Name` followed by one constructor per line, terminated by `;`
    pub(crate) fn parse_enum(&mut self) -> SyntaxResult<EnumExpr> {
        let keyword = self.consume();
        self.with_ignore_nl(false, |parser| {
            let template = parser.parse_optional_template()?;
            let (name_span, name) = parser.expect_identifier()?;
            parser.expect_nl()?;

            let mut constructors = vec![];
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
                let constructor = parser
                    .parse_expr(0, true)
                    .and_then(|expr| parser.enum_constructor(expr));
                match constructor {
                    Ok(constructor) => constructors.push(constructor),
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

            let span = keyword.span().merge(&name_span);
            if failed {
                return Err(ErrorKind::Reported.into());
            }
            if constructors.is_empty() {
                return Err(parser.error_with_span(
                    ErrorKind::Semantic("Enums must have at least one constructor."),
                    span,
                ));
            }
            Ok(EnumExpr::new(span, name, template, constructors))
        })
    }

    fn enum_constructor(&self, expr: Expr) -> SyntaxResult<Expr> {
        match expr {
            id @ Expr::Id(_) => Ok(id),
            Expr::BinOp(bin) if bin.op() == Operator::Call => {
                if bin.lhs().as_identifier().is_none() {
                    return Err(self.error_with_span(
                        ErrorKind::Custom("Expected identifier."),
                        bin.lhs().span(),
                    ));
                }
                Ok(bin.into())
            }
            other => Err(self.error_with_span(
                ErrorKind::Custom("Expected either identifier or constructor."),
                other.span(),
            )),
        }
    }

    /// `namespace Name` followed by a program, terminated by `;`
    pub(crate) fn parse_namespace(&mut self) -> SyntaxResult<NamespaceExpr> {
        let keyword = self.consume();
        self.with_ignore_nl(false, |parser| {
            let (name_span, name) = parser.expect_identifier()?;
            parser.expect_nl()?;
            let program = parser.program(false);
            parser.expect_semicolon()?;
            Ok(NamespaceExpr::new(
                keyword.span().merge(&name_span),
                name,
                program,
            ))
        })
    }

    fn parse_optional_template(&mut self) -> SyntaxResult<Option<TemplateExpr>> {
        if matches!(self.peek_kind(), TokenKind::LCurly) {
            Ok(Some(self.non_terminal("template", Self::parse_template)?))
        } else {
            Ok(None)
        }
    }

    /// `:: A, B, ...`, or nothing
    fn parse_inherited(&mut self) -> SyntaxResult<Vec<Expr>> {
        if self
            .consume_if(|t| t.operator() == Some(Operator::Cast))
            .is_some()
        {
            Ok(self.parse_expr(0, false)?.unchain(Operator::Comma))
        } else {
            Ok(vec![])
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> SyntaxResult<(Span, String)> {
        let token = self.expect("identifier", |k| matches!(k, TokenKind::Identifier(_)))?;
        let span = token.span();
        match token.into_kind() {
            TokenKind::Identifier(name) => Ok((span, name)),
            other => Err(self.error_with_span(
                ErrorKind::NotPrimary(other.name().to_string()),
                span,
            )),
        }
    }

    /// `a.b.c`
    fn parse_name_path(&mut self) -> SyntaxResult<Vec<String>> {
        let mut names = vec![self.expect_identifier()?.1];
        while self
            .consume_if(|t| t.operator() == Some(Operator::Member))
            .is_some()
        {
            names.push(self.expect_identifier()?.1);
        }
        Ok(names)
    }
}
