//! A lexical token from a source file

use crate::number::Number;
use crate::operator::Operator;
use crate::spanned::{Span, Spanned};
use std::fmt::{Debug, Formatter};

/// A lexical token from a source file
#[derive(Clone)]
pub struct Token {
    span: Span,
    kind: TokenKind,
}

impl Token {
    /// Creates a new token
    pub fn new(span: Span, kind: TokenKind) -> Self {
        Self { span, kind }
    }

    /// Gets the kind for this token
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Takes the kind out of this token
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// The precedence of this token when it follows an expression. Operators use the operator
    /// table, an opening bracket stands for a call, index or template application.
    pub fn precedence(&self) -> usize {
        match &self.kind {
            TokenKind::Operator(op) => op.token_precedence(),
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LCurly => 16,
            _ => 0,
        }
    }

    pub fn is_right_associative(&self) -> bool {
        match &self.kind {
            TokenKind::Operator(op) => op.is_right_associative(),
            _ => false,
        }
    }

    /// Gets the operator if this is an operator token
    pub fn operator(&self) -> Option<Operator> {
        match &self.kind {
            TokenKind::Operator(op) => Some(*op),
            _ => None,
        }
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// The kind for this token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Class,
    Enum,
    Trait,
    Func,
    /// `Func`, a virtual function
    VirtualFunc,
    Namespace,
    If,
    Else,
    For,
    Do,
    Match,
    Include,
    Import,
    Return,

    Identifier(String),

    // literals
    String(String),
    Char(char),
    Number(Number),

    LParen,
    RParen,
    LBracket,
    RBracket,
    LCurly,
    RCurly,
    SemiColon,

    Operator(Operator),
    /// `#` up to the end of the line
    Command(String),

    /// new line
    Nl,
    /// EOF, repeated for every token requested after the end of the input
    Eof,
    /// A lexical error, already reported when the token was produced
    Error,
}

impl TokenKind {
    /// Gets the keyword token spelled `ident`, if any
    pub fn keyword(ident: &str) -> Option<Self> {
        let kind = match ident {
            "class" => TokenKind::Class,
            "enum" => TokenKind::Enum,
            "trait" => TokenKind::Trait,
            "func" => TokenKind::Func,
            "Func" => TokenKind::VirtualFunc,
            "namespace" => TokenKind::Namespace,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "do" => TokenKind::Do,
            "match" => TokenKind::Match,
            "include" => TokenKind::Include,
            "import" => TokenKind::Import,
            "return" => TokenKind::Return,
            _ => return Operator::from_keyword(ident).map(TokenKind::Operator),
        };
        Some(kind)
    }

    /// The name of this kind of token, as printed by a token dump
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Class => "class",
            TokenKind::Enum => "enum",
            TokenKind::Trait => "trait",
            TokenKind::Func => "func",
            TokenKind::VirtualFunc => "Func",
            TokenKind::Namespace => "namespace",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::Do => "do",
            TokenKind::Match => "match",
            TokenKind::Include => "include",
            TokenKind::Import => "import",
            TokenKind::Return => "return",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::String(_) => "string",
            TokenKind::Char(_) => "character",
            TokenKind::Number(_) => "number",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LCurly => "{",
            TokenKind::RCurly => "}",
            TokenKind::SemiColon => ";",
            TokenKind::Operator(_) => "operator",
            TokenKind::Command(_) => "command",
            TokenKind::Nl => "end-of-line",
            TokenKind::Eof => "end-of-file",
            TokenKind::Error => "error",
        }
    }

    /// Whether a program line may start with this token
    pub fn is_primary(&self) -> bool {
        !matches!(
            self,
            TokenKind::Include
                | TokenKind::Import
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RCurly
                | TokenKind::SemiColon
                | TokenKind::Command(_)
        )
    }

    /// Whether this token can continue an expression as a binary, right-unary or call-like
    /// operator
    pub fn is_binary_capable(&self) -> bool {
        matches!(
            self,
            TokenKind::Operator(_) | TokenKind::LParen | TokenKind::LBracket | TokenKind::LCurly
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spanned::SourceFile;
    use std::rc::Rc;
    use test_log::test;

    #[test]
    fn test_keywords() {
        assert_eq!(TokenKind::keyword("Func"), Some(TokenKind::VirtualFunc));
        assert_eq!(
            TokenKind::keyword("safe"),
            Some(TokenKind::Operator(Operator::Safe))
        );
        assert_eq!(TokenKind::keyword("function"), None);
        assert_eq!(TokenKind::keyword("Class"), None);
    }

    #[test]
    fn test_primary_tokens() {
        assert!(TokenKind::Identifier("x".to_string()).is_primary());
        assert!(TokenKind::Nl.is_primary());
        assert!(!TokenKind::SemiColon.is_primary());
        assert!(!TokenKind::Command("x".to_string()).is_primary());
    }

    #[test]
    fn test_bracket_precedence() {
        let src = Rc::new(SourceFile::new("test", "("));
        let token = Token::new(Span::new(src, (0, 0), (0, 1)), TokenKind::LParen);
        assert_eq!(token.precedence(), 16);
        assert!(!token.is_right_associative());
    }
}
