//! Blocks of lines

use crate::Expr;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Whether every line of a program parsed cleanly
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ProgramStatus {
    #[default]
    Complete,
    /// Some line failed or a diagnostic was emitted while parsing
    Incomplete,
}

/// An ordered list of lines with an optional trailing value
#[derive(Debug, Default)]
pub struct Program {
    lines: Vec<Expr>,
    ret: bool,
    status: ProgramStatus,
}

impl Program {
    /// Creates a program. If the last line has a return value it is also the program's return
    /// expression.
    pub fn new(lines: Vec<Expr>, status: ProgramStatus) -> Self {
        let ret = lines.last().map(Expr::has_return).unwrap_or(false);
        Self { lines, ret, status }
    }

    /// Every line, including the one that supplies the return value
    pub fn lines(&self) -> &[Expr] {
        &self.lines
    }

    /// The last line, when it produces a value
    pub fn return_expr(&self) -> Option<&Expr> {
        self.lines.last().filter(|_| self.ret)
    }

    pub fn has_return(&self) -> bool {
        self.ret
    }

    pub fn status(&self) -> ProgramStatus {
        self.status
    }

    pub fn has_error(&self) -> bool {
        self.status == ProgramStatus::Incomplete
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.iter().join("\n"))
    }
}
