//! The feder abstract syntax tree.
//!
//! Every node owns its children. Nodes are built bottom-up by the parser and only ever change
//! by being moved into a newly built parent.

use feder_tokens::operator::Operator;
use feder_tokens::spanned::{Span, Spanned};
use std::fmt::{Display, Formatter};

pub mod control;
pub mod expr;
pub mod items;
pub mod program;

pub use control::{ForExpr, IfCase, IfExpr, MatchCase, MatchExpr};
pub use expr::{
    ArrayConExpr, ArrayIndexExpr, ArrayListExpr, BinOpExpr, BraceExpr, CharExpr, IdExpr, NumExpr,
    StrExpr, TemplateExpr, UnOpExpr,
};
pub use items::{ClassExpr, EnumExpr, FuncExpr, FuncParam, NamespaceExpr, TraitExpr};
pub use program::{Program, ProgramStatus};

/// The name used for "no name"
pub const PLACEHOLDER: &str = "_";

/// An expression
#[derive(Debug, derive_more::From)]
pub enum Expr {
    Id(IdExpr),
    Num(NumExpr),
    Str(StrExpr),
    Char(CharExpr),
    Func(FuncExpr),
    Class(ClassExpr),
    Trait(TraitExpr),
    Enum(EnumExpr),
    Namespace(NamespaceExpr),
    BinOp(BinOpExpr),
    UnOp(UnOpExpr),
    Brace(BraceExpr),
    Template(TemplateExpr),
    ArrayCon(ArrayConExpr),
    ArrayList(ArrayListExpr),
    ArrayIndex(ArrayIndexExpr),
    If(IfExpr),
    Match(MatchExpr),
    For(ForExpr),
}

impl Expr {
    /// Whether this expression is valid as a line of a program on its own
    pub fn is_statement(&self) -> bool {
        match self {
            Expr::Func(func) => func.is_statement(),
            Expr::Class(class) => class.name() != PLACEHOLDER,
            Expr::Trait(tr) => tr.name() != PLACEHOLDER,
            Expr::Enum(en) => en.name() != PLACEHOLDER,
            Expr::Namespace(nmsp) => nmsp.name() != PLACEHOLDER,
            Expr::BinOp(bin) => bin.is_statement(),
            Expr::UnOp(un) => un.is_statement(),
            Expr::If(_) | Expr::Match(_) | Expr::For(_) => true,
            Expr::Id(_)
            | Expr::Num(_)
            | Expr::Str(_)
            | Expr::Char(_)
            | Expr::Brace(_)
            | Expr::Template(_)
            | Expr::ArrayCon(_)
            | Expr::ArrayList(_)
            | Expr::ArrayIndex(_) => false,
        }
    }

    /// Whether this expression produces a value when it is the last line of a block
    pub fn has_return(&self) -> bool {
        match self {
            Expr::Id(id) => id.name() != PLACEHOLDER,
            Expr::Num(_) | Expr::Str(_) | Expr::Char(_) => true,
            Expr::Func(func) => func.is_type(),
            Expr::Class(_) | Expr::Trait(_) | Expr::Enum(_) | Expr::Namespace(_) => false,
            Expr::BinOp(bin) => !bin.is_statement() || bin.op() == Operator::Call,
            Expr::UnOp(_) => true,
            Expr::Brace(brace) => brace.inner().map(Expr::has_return).unwrap_or(false),
            Expr::Template(_) | Expr::ArrayCon(_) | Expr::ArrayList(_) | Expr::ArrayIndex(_) => {
                true
            }
            Expr::If(if_expr) => if_expr.has_return(),
            Expr::Match(match_expr) => match_expr.has_return(),
            Expr::For(_) => false,
        }
    }

    /// Gets the identifier if this is a plain identifier expression
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Expr::Id(id) => Some(id.name()),
            _ => None,
        }
    }

    /// Gets the operator if this is a binary operator expression
    pub fn binary_operator(&self) -> Option<Operator> {
        match self {
            Expr::BinOp(bin) => Some(bin.op()),
            _ => None,
        }
    }

    /// Splits a left-associative chain of `op`, such as `a, b, c` parsed as `((a, b), c)`, into
    /// its operands from left to right. Anything else becomes a single element.
    pub fn unchain(self, op: Operator) -> Vec<Expr> {
        let mut rev = vec![];
        let mut current = self;
        loop {
            match current {
                Expr::BinOp(bin) if bin.op() == op => {
                    let (lhs, rhs) = bin.into_operands();
                    rev.push(rhs);
                    current = lhs;
                }
                other => {
                    rev.push(other);
                    break;
                }
            }
        }
        rev.reverse();
        rev
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Id(e) => e.span(),
            Expr::Num(e) => e.span(),
            Expr::Str(e) => e.span(),
            Expr::Char(e) => e.span(),
            Expr::Func(e) => e.span(),
            Expr::Class(e) => e.span(),
            Expr::Trait(e) => e.span(),
            Expr::Enum(e) => e.span(),
            Expr::Namespace(e) => e.span(),
            Expr::BinOp(e) => e.span(),
            Expr::UnOp(e) => e.span(),
            Expr::Brace(e) => e.span(),
            Expr::Template(e) => e.span(),
            Expr::ArrayCon(e) => e.span(),
            Expr::ArrayList(e) => e.span(),
            Expr::ArrayIndex(e) => e.span(),
            Expr::If(e) => e.span(),
            Expr::Match(e) => e.span(),
            Expr::For(e) => e.span(),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Id(e) => e.fmt(f),
            Expr::Num(e) => e.fmt(f),
            Expr::Str(e) => e.fmt(f),
            Expr::Char(e) => e.fmt(f),
            Expr::Func(e) => e.fmt(f),
            Expr::Class(e) => e.fmt(f),
            Expr::Trait(e) => e.fmt(f),
            Expr::Enum(e) => e.fmt(f),
            Expr::Namespace(e) => e.fmt(f),
            Expr::BinOp(e) => e.fmt(f),
            Expr::UnOp(e) => e.fmt(f),
            Expr::Brace(e) => e.fmt(f),
            Expr::Template(e) => e.fmt(f),
            Expr::ArrayCon(e) => e.fmt(f),
            Expr::ArrayList(e) => e.fmt(f),
            Expr::ArrayIndex(e) => e.fmt(f),
            Expr::If(e) => e.fmt(f),
            Expr::Match(e) => e.fmt(f),
            Expr::For(e) => e.fmt(f),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use feder_tokens::spanned::{SourceFile, Span};
    use std::rc::Rc;

    /// A span into a throwaway source, for building nodes by hand
    pub fn span(col: usize) -> Span {
        thread_local! {
            static SOURCE: Rc<SourceFile> = Rc::new(SourceFile::new("test", ""));
        }
        SOURCE.with(|src| Span::new(src.clone(), (0, col), (0, col + 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::span;
    use feder_tokens::number::Number;
    use feder_tokens::operator::OperatorPosition;
    use test_log::test;

    fn id(name: &str) -> Expr {
        IdExpr::new(span(0), name).into()
    }

    fn bin(op: Operator, lhs: Expr, rhs: Expr) -> Expr {
        BinOpExpr::new(span(0), op, lhs, rhs).into()
    }

    #[test]
    fn test_unchain_keeps_source_order() {
        let chain = bin(
            Operator::Comma,
            bin(Operator::Comma, id("a"), id("b")),
            id("c"),
        );
        let parts = chain
            .unchain(Operator::Comma)
            .into_iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>();
        assert_eq!(parts, ["a", "b", "c"]);
    }

    #[test]
    fn test_unchain_single() {
        let parts = bin(Operator::Add, id("a"), id("b")).unchain(Operator::Comma);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].to_string(), "(a + b)");
    }

    #[test]
    fn test_is_statement() {
        assert!(bin(Operator::Assign, id("a"), id("b")).is_statement());
        assert!(bin(Operator::Define, id("a"), id("b")).is_statement());
        assert!(bin(Operator::Declare, id("a"), id("int")).is_statement());
        assert!(bin(Operator::Call, id("f"), BraceExpr::new(span(1), None).into()).is_statement());
        assert!(!bin(Operator::Lt, id("a"), id("b")).is_statement());
        assert!(!id("a").is_statement());
        let inc: Expr =
            UnOpExpr::new(span(0), Operator::Inc, OperatorPosition::RightUnary, id("i")).into();
        assert!(inc.is_statement());
    }

    #[test]
    fn test_has_return() {
        assert!(id("a").has_return());
        assert!(!id("_").has_return());
        assert!(Expr::from(NumExpr::new(span(0), Number::I32(1))).has_return());
        assert!(bin(Operator::Add, id("a"), id("b")).has_return());
        assert!(!bin(Operator::Assign, id("a"), id("b")).has_return());
        assert!(bin(Operator::Call, id("f"), BraceExpr::new(span(1), None).into()).has_return());
        assert!(!Expr::from(BraceExpr::new(span(0), None)).has_return());
        assert!(Expr::from(BraceExpr::new(span(0), Some(id("x")))).has_return());
    }
}
