//! The operator table.
//!
//! Every operator token can appear as a left-unary, right-unary or binary operator. This module
//! is the only place that decides which positions are legal, how tightly each one binds and in
//! which direction it associates. Both the lexer (text and keyword mapping) and the parser
//! (precedence climbing) consult it.

use std::fmt::{Display, Formatter};
use strum::{EnumIter, IntoEnumIterator};

/// The position an operator is used at
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumIter)]
pub enum OperatorPosition {
    /// Before its operand, e.g. `-x`
    LeftUnary,
    /// After its operand, e.g. `x++`
    RightUnary,
    /// Between two operands
    Binary,
}

/// An operator
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumIter)]
pub enum Operator {
    /// `,`
    Comma,
    /// `:=`
    Define,
    /// `=`
    Assign,
    /// `&=`
    BitAndAssign,
    /// `^=`
    BitXorAssign,
    /// `|=`
    BitOrAssign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
    /// `%=`
    ModAssign,
    /// `<<=`
    ShlAssign,
    /// `>>=`
    ShrAssign,
    /// `&&`
    LogicalAnd,
    /// `||`
    LogicalOr,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `===`
    StrictEq,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `=>`
    Implies,
    /// `&`
    BitAnd,
    /// `^`
    BitXor,
    /// `|`
    BitOr,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `:`
    Declare,
    /// `::`
    Cast,
    /// `:?`
    TypeCheck,
    /// `!`
    Not,
    /// `~`
    BitNot,
    /// `++`
    Inc,
    /// `--`
    Dec,
    /// the `safe` keyword
    Safe,
    /// `.`
    Member,
    /// `->`
    DerefMember,
    /// `(` directly after an expression
    Call,
    /// `[` directly after an expression
    Index,
    /// `{` directly after an expression
    Template,
}

impl Operator {
    /// The source text of this operator. The call-like operators have no text of their own and
    /// render as their bracket pair.
    pub const fn text(&self) -> &'static str {
        match self {
            Operator::Comma => ",",
            Operator::Define => ":=",
            Operator::Assign => "=",
            Operator::BitAndAssign => "&=",
            Operator::BitXorAssign => "^=",
            Operator::BitOrAssign => "|=",
            Operator::AddAssign => "+=",
            Operator::SubAssign => "-=",
            Operator::MulAssign => "*=",
            Operator::DivAssign => "/=",
            Operator::ModAssign => "%=",
            Operator::ShlAssign => "<<=",
            Operator::ShrAssign => ">>=",
            Operator::LogicalAnd => "&&",
            Operator::LogicalOr => "||",
            Operator::Eq => "==",
            Operator::Neq => "!=",
            Operator::StrictEq => "===",
            Operator::Lte => "<=",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Implies => "=>",
            Operator::BitAnd => "&",
            Operator::BitXor => "^",
            Operator::BitOr => "|",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Declare => ":",
            Operator::Cast => "::",
            Operator::TypeCheck => ":?",
            Operator::Not => "!",
            Operator::BitNot => "~",
            Operator::Inc => "++",
            Operator::Dec => "--",
            Operator::Safe => "safe",
            Operator::Member => ".",
            Operator::DerefMember => "->",
            Operator::Call => "()",
            Operator::Index => "[]",
            Operator::Template => "{}",
        }
    }

    /// Finds the symbolic operator spelled exactly `text`
    pub fn from_text(text: &str) -> Option<Self> {
        Self::iter().find(|op| !op.is_call_like() && *op != Operator::Safe && op.text() == text)
    }

    /// Finds the operator a keyword stands for
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "safe" => Some(Operator::Safe),
            _ => None,
        }
    }

    /// The longest symbolic operator text, in characters
    pub const MAX_TEXT_LEN: usize = 3;

    /// Whether this operator is produced by a bracket following an expression rather than by an
    /// operator token
    pub const fn is_call_like(&self) -> bool {
        matches!(self, Operator::Call | Operator::Index | Operator::Template)
    }

    /// Whether this is `=` or one of the compound assignments
    pub const fn is_assignment(&self) -> bool {
        matches!(
            self,
            Operator::Assign
                | Operator::BitAndAssign
                | Operator::BitXorAssign
                | Operator::BitOrAssign
                | Operator::AddAssign
                | Operator::SubAssign
                | Operator::MulAssign
                | Operator::DivAssign
                | Operator::ModAssign
                | Operator::ShlAssign
                | Operator::ShrAssign
        )
    }

    pub const fn is_right_associative(&self) -> bool {
        matches!(self, Operator::Define | Operator::Declare) || self.is_assignment()
    }

    pub const fn is_left_associative(&self) -> bool {
        !self.is_right_associative()
    }

    /// Whether this operator may be used at `position`
    pub const fn is_valid_at(&self, position: OperatorPosition) -> bool {
        match position {
            OperatorPosition::LeftUnary => matches!(
                self,
                Operator::Dec
                    | Operator::Inc
                    | Operator::Add
                    | Operator::Sub
                    | Operator::Mul
                    | Operator::LogicalAnd
                    | Operator::BitNot
                    | Operator::Not
                    | Operator::Safe
            ),
            OperatorPosition::RightUnary => matches!(self, Operator::Dec | Operator::Inc),
            OperatorPosition::Binary => !matches!(
                self,
                Operator::Dec | Operator::Inc | Operator::BitNot | Operator::Not | Operator::Safe
            ),
        }
    }

    /// The precedence of this operator at `position`, higher binds tighter. `0` means the
    /// operator has no precedence at that position.
    pub const fn precedence(&self, position: OperatorPosition) -> usize {
        match position {
            OperatorPosition::LeftUnary => {
                if self.is_valid_at(OperatorPosition::LeftUnary) {
                    15
                } else {
                    0
                }
            }
            OperatorPosition::RightUnary => match self {
                Operator::Dec
                | Operator::Inc
                | Operator::Call
                | Operator::Index
                | Operator::Template => 16,
                _ => 0,
            },
            OperatorPosition::Binary => match self {
                Operator::Comma => 1,
                Operator::Define => 2,
                Operator::Implies => 3,
                op if op.is_assignment() => 3,
                Operator::LogicalOr => 4,
                Operator::LogicalAnd => 5,
                Operator::BitOr => 6,
                Operator::BitXor => 7,
                Operator::BitAnd => 8,
                Operator::Eq | Operator::Neq | Operator::StrictEq => 9,
                Operator::Lte | Operator::Gte | Operator::Lt | Operator::Gt => 10,
                Operator::Shl | Operator::Shr => 11,
                Operator::Add | Operator::Sub => 12,
                Operator::Mul | Operator::Div | Operator::Mod => 13,
                Operator::Cast | Operator::TypeCheck | Operator::Declare => 14,
                Operator::Call | Operator::Index | Operator::Template => 16,
                Operator::Member | Operator::DerefMember => 17,
                _ => 0,
            },
        }
    }

    /// The precedence an operator token has while it is waiting on the right of an expression:
    /// its binary precedence, or its right-unary precedence if it can not be binary.
    pub const fn token_precedence(&self) -> usize {
        if self.is_valid_at(OperatorPosition::Binary) {
            self.precedence(OperatorPosition::Binary)
        } else {
            self.precedence(OperatorPosition::RightUnary)
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}
