//! Declarations: functions, classes, traits, enums and namespaces

use crate::expr::TemplateExpr;
use crate::program::Program;
use crate::{Expr, PLACEHOLDER};
use feder_tokens::spanned::{Span, Spanned};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// One function parameter, `name : type | guard => result`
#[derive(Debug)]
pub struct FuncParam {
    span: Span,
    name: String,
    ty: Box<Expr>,
    guard: Option<Box<Expr>>,
    guard_result: Option<Box<Expr>>,
}

impl FuncParam {
    pub fn new(
        span: Span,
        name: impl Into<String>,
        ty: Expr,
        guard: Option<Expr>,
        guard_result: Option<Expr>,
    ) -> Self {
        Self {
            span,
            name: name.into(),
            ty: Box::new(ty),
            guard: guard.map(Box::new),
            guard_result: guard_result.map(Box::new),
        }
    }

    /// The parameter name, `_` if none was given
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Expr {
        &self.ty
    }

    pub fn guard(&self) -> Option<&Expr> {
        self.guard.as_deref()
    }

    pub fn guard_result(&self) -> Option<&Expr> {
        self.guard_result.as_deref()
    }
}

impl Spanned for FuncParam {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for FuncParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {}", self.name, self.ty)?;
        if let Some(guard) = &self.guard {
            write!(f, " | {guard}")?;
            if let Some(result) = &self.guard_result {
                write!(f, " => {result}")?;
            }
        }
        Ok(())
    }
}

/// A function definition, declaration or, without a name, a function type
#[derive(Debug)]
pub struct FuncExpr {
    span: Span,
    name: Vec<String>,
    template: Option<TemplateExpr>,
    params: Vec<FuncParam>,
    return_type: Option<Box<Expr>>,
    body: Option<Program>,
    is_virtual: bool,
}

impl FuncExpr {
    pub fn new(
        span: Span,
        name: Vec<String>,
        template: Option<TemplateExpr>,
        params: Vec<FuncParam>,
        return_type: Option<Expr>,
        body: Option<Program>,
        is_virtual: bool,
    ) -> Self {
        assert!(
            !name.is_empty() || (template.is_none() && body.is_none() && !is_virtual),
            "function types have no template, no body and are never virtual"
        );
        Self {
            span,
            name,
            template,
            params,
            return_type: return_type.map(Box::new),
            body,
            is_virtual,
        }
    }

    /// The dotted name path, empty for a function type
    pub fn name(&self) -> &[String] {
        &self.name
    }

    pub fn template(&self) -> Option<&TemplateExpr> {
        self.template.as_ref()
    }

    pub fn params(&self) -> &[FuncParam] {
        &self.params
    }

    pub fn return_type(&self) -> Option<&Expr> {
        self.return_type.as_deref()
    }

    pub fn body(&self) -> Option<&Program> {
        self.body.as_ref()
    }

    /// Whether this was introduced with `Func`
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    /// A nameless function is a function type
    pub fn is_type(&self) -> bool {
        self.name.is_empty()
    }

    /// Declared with `;` instead of a body
    pub fn is_declared(&self) -> bool {
        !self.is_type() && self.body.is_none()
    }

    pub(crate) fn is_statement(&self) -> bool {
        self.name.last().map(|n| n != PLACEHOLDER).unwrap_or(false)
    }
}

impl Spanned for FuncExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for FuncExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self.is_virtual { "Func" } else { "func" })?;
        if let Some(template) = &self.template {
            write!(f, "{template}")?;
        }
        if !self.name.is_empty() {
            write!(f, " {}", self.name.join("."))?;
        }
        if !self.params.is_empty() {
            write!(f, "({})", self.params.iter().join(", "))?;
        }
        if let Some(return_type) = &self.return_type {
            write!(f, " : {return_type}")?;
        }
        Ok(())
    }
}

fn fmt_header(
    f: &mut Formatter<'_>,
    keyword: &str,
    template: Option<&TemplateExpr>,
    name: &str,
    traits: &[Expr],
) -> std::fmt::Result {
    write!(f, "{keyword}")?;
    if let Some(template) = template {
        write!(f, "{template}")?;
    }
    write!(f, " {name}")?;
    if !traits.is_empty() {
        write!(f, " : {}", traits.iter().join(", "))?;
    }
    Ok(())
}

/// A class with its attributes, constructors and member functions
#[derive(Debug)]
pub struct ClassExpr {
    span: Span,
    name: String,
    template: Option<TemplateExpr>,
    traits: Vec<Expr>,
    attributes: Vec<Expr>,
    constructors: Vec<FuncExpr>,
    functions: Vec<FuncExpr>,
}

impl ClassExpr {
    pub fn new(
        span: Span,
        name: impl Into<String>,
        template: Option<TemplateExpr>,
        traits: Vec<Expr>,
        attributes: Vec<Expr>,
        constructors: Vec<FuncExpr>,
        functions: Vec<FuncExpr>,
    ) -> Self {
        Self {
            span,
            name: name.into(),
            template,
            traits,
            attributes,
            constructors,
            functions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> Option<&TemplateExpr> {
        self.template.as_ref()
    }

    /// The inherited traits
    pub fn traits(&self) -> &[Expr] {
        &self.traits
    }

    /// The `name : type` declarations of the class body
    pub fn attributes(&self) -> &[Expr] {
        &self.attributes
    }

    pub fn constructors(&self) -> &[FuncExpr] {
        &self.constructors
    }

    pub fn functions(&self) -> &[FuncExpr] {
        &self.functions
    }
}

impl Spanned for ClassExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for ClassExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_header(f, "class", self.template.as_ref(), &self.name, &self.traits)
    }
}

/// A trait made of inherited traits and declared virtual functions
#[derive(Debug)]
pub struct TraitExpr {
    span: Span,
    name: String,
    template: Option<TemplateExpr>,
    traits: Vec<Expr>,
    functions: Vec<FuncExpr>,
}

impl TraitExpr {
    pub fn new(
        span: Span,
        name: impl Into<String>,
        template: Option<TemplateExpr>,
        traits: Vec<Expr>,
        functions: Vec<FuncExpr>,
    ) -> Self {
        assert!(
            !traits.is_empty() || !functions.is_empty(),
            "traits inherit or declare something"
        );
        Self {
            span,
            name: name.into(),
            template,
            traits,
            functions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> Option<&TemplateExpr> {
        self.template.as_ref()
    }

    pub fn traits(&self) -> &[Expr] {
        &self.traits
    }

    pub fn functions(&self) -> &[FuncExpr] {
        &self.functions
    }
}

impl Spanned for TraitExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for TraitExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_header(f, "trait", self.template.as_ref(), &self.name, &self.traits)
    }
}

/// An enum. Constructors are identifiers or calls of identifiers, `Some(T)`.
#[derive(Debug)]
pub struct EnumExpr {
    span: Span,
    name: String,
    template: Option<TemplateExpr>,
    constructors: Vec<Expr>,
}

impl EnumExpr {
    pub fn new(
        span: Span,
        name: impl Into<String>,
        template: Option<TemplateExpr>,
        constructors: Vec<Expr>,
    ) -> Self {
        assert!(!constructors.is_empty(), "enums have at least one constructor");
        Self {
            span,
            name: name.into(),
            template,
            constructors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> Option<&TemplateExpr> {
        self.template.as_ref()
    }

    pub fn constructors(&self) -> &[Expr] {
        &self.constructors
    }
}

impl Spanned for EnumExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for EnumExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_header(f, "enum", self.template.as_ref(), &self.name, &[])
    }
}

/// A namespace around a program
#[derive(Debug)]
pub struct NamespaceExpr {
    span: Span,
    name: String,
    program: Program,
}

impl NamespaceExpr {
    pub fn new(span: Span, name: impl Into<String>, program: Program) -> Self {
        Self {
            span,
            name: name.into(),
            program,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Program {
        &self.program
    }
}

impl Spanned for NamespaceExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for NamespaceExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "namespace {}", self.name)
    }
}
