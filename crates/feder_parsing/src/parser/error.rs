use crate::lexer::LexingError;
use feder_tokens::spanned::Span;
use feder_tokens::token::Token;
use feder_tokens::SpannedError;
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::io;

/// Represents an error occurring during parsing
#[derive(Debug, thiserror::Error)]
pub struct SyntaxError {
    pub kind: SpannedError<ErrorKind>,
    pub non_terminal_stack: Option<Vec<&'static str>>,
}

impl SyntaxError {
    /// Creates a new error
    pub fn new(
        kind: ErrorKind,
        location: impl Into<Option<Span>>,
        non_terminals: impl Into<Option<Vec<&'static str>>>,
    ) -> Self {
        Self {
            kind: SpannedError::new(kind, location),
            non_terminal_stack: non_terminals.into(),
        }
    }

    pub fn error_kind(&self) -> &ErrorKind {
        self.kind.error()
    }

    pub fn location(&self) -> Option<&Span> {
        self.kind.location()
    }

    /// Whether the diagnostic for this error was already emitted
    pub fn is_reported(&self) -> bool {
        matches!(self.error_kind(), ErrorKind::Reported)
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "syntax error: {}", self.kind)?;
        if let Some(non_terminals) = &self.non_terminal_stack {
            write!(f, "\nnon terminal stack:")?;
            for (idx, non_terminal) in non_terminals.iter().enumerate() {
                write!(f, "\n  {}: {}", idx, non_terminal)?;
            }
        }

        Ok(())
    }
}

impl<E> From<E> for SyntaxError
where
    E: Into<ErrorKind>,
{
    fn from(value: E) -> Self {
        Self::new(value.into(), None, None)
    }
}

/// [SyntaxError] kind
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Expected {}.", expected_list(.0))]
    ExpectedToken(Vec<String>, Option<Token>),
    #[error("{0}")]
    Custom(&'static str),
    /// A well-formed construct breaking a structural rule
    #[error("{0}")]
    Semantic(&'static str),
    #[error("Expected primary token, found {0}.")]
    NotPrimary(String),
    /// Stands for an error whose diagnostic was already emitted
    #[error("error already reported")]
    Reported,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ErrorKind {
    pub fn expected_token(
        token_kinds: impl IntoIterator<Item = impl AsRef<str>>,
        found: impl Into<Option<Token>>,
    ) -> Self {
        Self::ExpectedToken(
            token_kinds
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
            found.into(),
        )
    }

    /// Whether this error breaks a structural rule rather than the grammar
    pub fn is_semantic(&self) -> bool {
        matches!(self, ErrorKind::Semantic(_))
    }
}

impl From<LexingError> for ErrorKind {
    fn from(value: LexingError) -> Self {
        match value {
            LexingError::Io(io) => ErrorKind::Io(io),
            _ => ErrorKind::Reported,
        }
    }
}

fn expected_list(kinds: &[String]) -> String {
    match kinds {
        [one] => format!("token '{one}'"),
        kinds => format!("tokens {}", kinds.iter().map(|k| format!("'{k}'")).join(" or ")),
    }
}

pub type SyntaxResult<T = ()> = Result<T, SyntaxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_expected_token_message() {
        let kind = ErrorKind::expected_token([";"], None);
        assert_eq!(kind.to_string(), "Expected token ';'.");
        let kind = ErrorKind::expected_token(["end-of-line", "end-of-file"], None);
        assert_eq!(
            kind.to_string(),
            "Expected tokens 'end-of-line' or 'end-of-file'."
        );
    }

    #[test]
    fn test_display_without_location() {
        let error = SyntaxError::new(ErrorKind::Custom("Expected identifier."), None, vec!["enum"]);
        assert_eq!(
            error.to_string(),
            "syntax error: error: Expected identifier.\nnon terminal stack:\n  0: enum"
        );
        assert!(!error.is_reported());
    }
}
