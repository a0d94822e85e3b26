//! Control constructs: if, match and loops

use crate::program::Program;
use crate::Expr;
use feder_tokens::spanned::{Span, Spanned};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// One `if <cond>` branch
#[derive(Debug)]
pub struct IfCase {
    condition: Expr,
    program: Program,
}

impl IfCase {
    pub fn new(condition: Expr, program: Program) -> Self {
        Self { condition, program }
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn program(&self) -> &Program {
        &self.program
    }
}

/// An if statement with its `else if` chain and optional `else`
#[derive(Debug)]
pub struct IfExpr {
    span: Span,
    cases: Vec<IfCase>,
    else_case: Option<Program>,
}

impl IfExpr {
    pub fn new(span: Span, cases: Vec<IfCase>, else_case: Option<Program>) -> Self {
        assert!(!cases.is_empty(), "if statements have at least one case");
        Self {
            span,
            cases,
            else_case,
        }
    }

    pub fn cases(&self) -> &[IfCase] {
        &self.cases
    }

    pub fn else_case(&self) -> Option<&Program> {
        self.else_case.as_ref()
    }

    /// Only an if with an `else` where every branch yields a value has a return value
    pub fn has_return(&self) -> bool {
        match &self.else_case {
            None => false,
            Some(else_case) => {
                else_case.has_return() && self.cases.iter().all(|case| case.program.has_return())
            }
        }
    }
}

impl Spanned for IfExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for IfExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, case) in self.cases.iter().enumerate() {
            if i > 0 {
                write!(f, " else ")?;
            }
            write!(f, "if {}", case.condition)?;
        }
        if self.else_case.is_some() {
            write!(f, " else")?;
        }
        Ok(())
    }
}

/// One `pattern => block ;` case of a match
#[derive(Debug)]
pub struct MatchCase {
    pattern: Expr,
    program: Program,
}

impl MatchCase {
    pub fn new(pattern: Expr, program: Program) -> Self {
        Self { pattern, program }
    }

    pub fn pattern(&self) -> &Expr {
        &self.pattern
    }

    pub fn program(&self) -> &Program {
        &self.program
    }
}

/// A match over constructor patterns, with at most one `_` default case
#[derive(Debug)]
pub struct MatchExpr {
    span: Span,
    scrutinee: Box<Expr>,
    cases: Vec<MatchCase>,
    default: Option<Program>,
}

impl MatchExpr {
    pub fn new(
        span: Span,
        scrutinee: Expr,
        cases: Vec<MatchCase>,
        default: Option<Program>,
    ) -> Self {
        assert!(!cases.is_empty(), "match statements have at least one case");
        Self {
            span,
            scrutinee: Box::new(scrutinee),
            cases,
            default,
        }
    }

    pub fn scrutinee(&self) -> &Expr {
        &self.scrutinee
    }

    pub fn cases(&self) -> &[MatchCase] {
        &self.cases
    }

    pub fn default_case(&self) -> Option<&Program> {
        self.default.as_ref()
    }

    pub fn has_return(&self) -> bool {
        self.cases.iter().all(|case| case.program.has_return())
            && self.default.as_ref().map(Program::has_return).unwrap_or(true)
    }
}

impl Spanned for MatchExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for MatchExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "match {}", self.scrutinee)
    }
}

/// A `for` loop, or a `do ... for cond` loop when the condition is checked after the body
#[derive(Debug)]
pub struct ForExpr {
    span: Span,
    init: Option<Box<Expr>>,
    condition: Option<Box<Expr>>,
    step: Option<Box<Expr>>,
    body: Program,
    post_condition: bool,
}

impl ForExpr {
    pub fn new(
        span: Span,
        init: Option<Expr>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Program,
        post_condition: bool,
    ) -> Self {
        Self {
            span,
            init: init.map(Box::new),
            condition: condition.map(Box::new),
            step: step.map(Box::new),
            body,
            post_condition,
        }
    }

    pub fn init(&self) -> Option<&Expr> {
        self.init.as_deref()
    }

    pub fn condition(&self) -> Option<&Expr> {
        self.condition.as_deref()
    }

    pub fn step(&self) -> Option<&Expr> {
        self.step.as_deref()
    }

    pub fn body(&self) -> &Program {
        &self.body
    }

    /// Whether this is a `do` loop
    pub fn is_post_condition(&self) -> bool {
        self.post_condition
    }
}

impl Spanned for ForExpr {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for ForExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let head = if self.post_condition {
            vec![&self.init, &self.step]
        } else {
            vec![&self.init, &self.condition, &self.step]
        };
        let head = head.into_iter().flatten().join("; ");
        write!(f, "{}", if self.post_condition { "do" } else { "for" })?;
        if !head.is_empty() {
            write!(f, " {head}")?;
        }
        if self.post_condition {
            if let Some(condition) = &self.condition {
                write!(f, " ... for {condition}")?;
            }
        }
        Ok(())
    }
}
