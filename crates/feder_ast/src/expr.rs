//! Literals, operator applications and bracketed groups

use crate::Expr;
use feder_tokens::number::Number;
use feder_tokens::operator::{Operator, OperatorPosition};
use feder_tokens::spanned::{Span, Spanned};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// An identifier
#[derive(Debug)]
pub struct IdExpr {
    span: Span,
    name: String,
}

impl IdExpr {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "identifiers are never empty");
        Self { span, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Spanned for IdExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for IdExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A numeric literal
#[derive(Debug)]
pub struct NumExpr {
    span: Span,
    value: Number,
}

impl NumExpr {
    pub fn new(span: Span, value: Number) -> Self {
        Self { span, value }
    }

    pub fn value(&self) -> Number {
        self.value
    }
}

impl Spanned for NumExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for NumExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A string literal, escapes already resolved
#[derive(Debug)]
pub struct StrExpr {
    span: Span,
    value: String,
}

impl StrExpr {
    pub fn new(span: Span, value: impl Into<String>) -> Self {
        Self {
            span,
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Spanned for StrExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for StrExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

/// A character literal
#[derive(Debug)]
pub struct CharExpr {
    span: Span,
    value: char,
}

impl CharExpr {
    pub fn new(span: Span, value: char) -> Self {
        Self { span, value }
    }

    pub fn value(&self) -> char {
        self.value
    }
}

impl Spanned for CharExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for CharExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.value)
    }
}

/// A binary operator applied to two operands. Calls, indexing and template applications are
/// binary operators too, with the bracketed group as the right operand.
#[derive(Debug)]
pub struct BinOpExpr {
    span: Span,
    op: Operator,
    lhs: Box<Expr>,
    rhs: Box<Expr>,
}

impl BinOpExpr {
    pub fn new(span: Span, op: Operator, lhs: Expr, rhs: Expr) -> Self {
        Self {
            span,
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn lhs(&self) -> &Expr {
        &self.lhs
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    /// Moves both operands out of this node
    pub fn into_operands(self) -> (Expr, Expr) {
        (*self.lhs, *self.rhs)
    }

    pub(crate) fn is_statement(&self) -> bool {
        matches!(
            self.op,
            Operator::Define | Operator::Declare | Operator::Call
        ) || self.op.is_assignment()
    }
}

impl Spanned for BinOpExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for BinOpExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.op.is_call_like() {
            write!(f, "{}{}", self.lhs, self.rhs)
        } else {
            write!(f, "({} {} {})", self.lhs, self.op, self.rhs)
        }
    }
}

/// A unary operator applied before or after its operand
#[derive(Debug)]
pub struct UnOpExpr {
    span: Span,
    op: Operator,
    position: OperatorPosition,
    operand: Box<Expr>,
}

impl UnOpExpr {
    pub fn new(span: Span, op: Operator, position: OperatorPosition, operand: Expr) -> Self {
        assert_ne!(
            position,
            OperatorPosition::Binary,
            "unary operators are either left or right of their operand"
        );
        Self {
            span,
            op,
            position,
            operand: Box::new(operand),
        }
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn position(&self) -> OperatorPosition {
        self.position
    }

    pub fn operand(&self) -> &Expr {
        &self.operand
    }

    pub(crate) fn is_statement(&self) -> bool {
        self.position == OperatorPosition::RightUnary
            && matches!(self.op, Operator::Inc | Operator::Dec)
    }
}

impl Spanned for UnOpExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for UnOpExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.position {
            OperatorPosition::RightUnary => write!(f, "({}{})", self.operand, self.op),
            _ => write!(f, "({}{})", self.op, self.operand),
        }
    }
}

/// A parenthesized group, possibly empty
#[derive(Debug)]
pub struct BraceExpr {
    span: Span,
    inner: Option<Box<Expr>>,
}

impl BraceExpr {
    pub fn new(span: Span, inner: Option<Expr>) -> Self {
        Self {
            span,
            inner: inner.map(Box::new),
        }
    }

    pub fn inner(&self) -> Option<&Expr> {
        self.inner.as_deref()
    }
}

impl Spanned for BraceExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for BraceExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            None => write!(f, "()"),
            Some(inner) => write!(f, "({inner})"),
        }
    }
}

/// A template parameter list, `{a, b}`
#[derive(Debug)]
pub struct TemplateExpr {
    span: Span,
    params: Vec<Expr>,
}

impl TemplateExpr {
    pub fn new(span: Span, params: Vec<Expr>) -> Self {
        assert!(!params.is_empty(), "templates have at least one parameter");
        Self { span, params }
    }

    pub fn params(&self) -> &[Expr] {
        &self.params
    }
}

impl Spanned for TemplateExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for TemplateExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.params.iter().join(", "))
    }
}

/// An array built from one element template and a size, `[x ; n]`
#[derive(Debug)]
pub struct ArrayConExpr {
    span: Span,
    element: Box<Expr>,
    size: Box<Expr>,
}

impl ArrayConExpr {
    pub fn new(span: Span, element: Expr, size: Expr) -> Self {
        Self {
            span,
            element: Box::new(element),
            size: Box::new(size),
        }
    }

    pub fn element(&self) -> &Expr {
        &self.element
    }

    pub fn size(&self) -> &Expr {
        &self.size
    }
}

impl Spanned for ArrayConExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for ArrayConExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} ; {}]", self.element, self.size)
    }
}

/// An array listing its elements, `[a, b, c]`
#[derive(Debug)]
pub struct ArrayListExpr {
    span: Span,
    elements: Vec<Expr>,
}

impl ArrayListExpr {
    pub fn new(span: Span, elements: Vec<Expr>) -> Self {
        assert!(elements.len() >= 2, "array lists have at least two elements");
        Self { span, elements }
    }

    pub fn elements(&self) -> &[Expr] {
        &self.elements
    }
}

impl Spanned for ArrayListExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for ArrayListExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.elements.iter().join(", "))
    }
}

/// A bracketed single expression, `[i]`
#[derive(Debug)]
pub struct ArrayIndexExpr {
    span: Span,
    index: Box<Expr>,
}

impl ArrayIndexExpr {
    pub fn new(span: Span, index: Expr) -> Self {
        Self {
            span,
            index: Box::new(index),
        }
    }

    pub fn index(&self) -> &Expr {
        &self.index
    }
}

impl Spanned for ArrayIndexExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for ArrayIndexExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::span;
    use test_log::test;

    fn id(name: &str) -> Expr {
        IdExpr::new(span(0), name).into()
    }

    #[test]
    #[should_panic]
    fn test_empty_identifier_is_a_defect() {
        let _ = IdExpr::new(span(0), "");
    }

    #[test]
    #[should_panic]
    fn test_single_element_array_list_is_a_defect() {
        let _ = ArrayListExpr::new(span(0), vec![id("a")]);
    }

    #[test]
    fn test_render_operators() {
        let args = BraceExpr::new(span(1), Some(id("x"))).into();
        let call = BinOpExpr::new(span(0), Operator::Call, id("f"), args);
        assert_eq!(call.to_string(), "f(x)");
        let subscript = ArrayIndexExpr::new(span(1), id("i")).into();
        let index = BinOpExpr::new(span(0), Operator::Index, id("a"), subscript);
        assert_eq!(index.to_string(), "a[i]");
        let left = UnOpExpr::new(span(0), Operator::Sub, OperatorPosition::LeftUnary, id("x"));
        assert_eq!(left.to_string(), "(-x)");
        let right = UnOpExpr::new(span(0), Operator::Inc, OperatorPosition::RightUnary, id("x"));
        assert_eq!(right.to_string(), "(x++)");
    }

    #[test]
    fn test_render_groups() {
        assert_eq!(BraceExpr::new(span(0), None).to_string(), "()");
        assert_eq!(TemplateExpr::new(span(0), vec![id("T"), id("U")]).to_string(), "{T, U}");
        assert_eq!(ArrayConExpr::new(span(0), id("x"), id("n")).to_string(), "[x ; n]");
        assert_eq!(ArrayListExpr::new(span(0), vec![id("a"), id("b")]).to_string(), "[a, b]");
        assert_eq!(StrExpr::new(span(0), "hi").to_string(), "\"hi\"");
        assert_eq!(CharExpr::new(span(0), 'c').to_string(), "'c'");
    }
}
