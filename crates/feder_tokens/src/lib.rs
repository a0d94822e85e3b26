//! Spans, tokens, the operator table and diagnostics shared by the feder front end

use crate::spanned::Span;
use std::fmt::{Display, Formatter};

pub mod diagnostic;
pub mod number;
pub mod operator;
pub mod spanned;
pub mod token;

/// An error with a location.
///
/// Displays as the offending source line(s), a caret underline of the reported columns and
/// `error:<source name>:<line>: <error>`.
#[derive(Debug, Clone, thiserror::Error)]
pub struct SpannedError<E> {
    error: E,
    location: Option<Span>,
}

impl<E> SpannedError<E> {
    pub fn new(error: E, location: impl Into<Option<Span>>) -> Self {
        Self {
            error,
            location: location.into(),
        }
    }

    pub fn error(&self) -> &E {
        &self.error
    }

    pub fn location(&self) -> Option<&Span> {
        self.location.as_ref()
    }
}

impl<E: Display> Display for SpannedError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some(location) = &self.location else {
            return write!(f, "error: {}", self.error);
        };
        let source = location.source();
        for line in location.line_start()..=location.line_end() {
            if let Some(text) = source.line(line) {
                writeln!(f, "{text}")?;
            }
        }
        writeln!(
            f,
            "{}{}",
            " ".repeat(location.column_start()),
            "^".repeat(location.len().max(1))
        )?;
        write!(
            f,
            "error:{}:{}: {}",
            source.name(),
            location.line_start() + 1,
            self.error
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
    fn test_render_single_line() {
        let src = Rc::new(SourceFile::new("<arg>", "let x = $;\nnext"));
        let error = SpannedError::new("Invalid character '$'.", Span::new(src, (0, 8), (0, 9)));
        assert_eq!(
            error.to_string(),
            "let x = $;\n        ^\nerror:<arg>:1: Invalid character '$'."
        );
    }

    #[test]
    fn test_render_multi_line() {
        let src = Rc::new(SourceFile::new("file", "a +\n  bc"));
        let error = SpannedError::new("msg", Span::new(src, (0, 0), (1, 4)));
        assert_eq!(error.to_string(), "a +\n  bc\n^^^^\nerror:file:1: msg");
    }

    #[test]
    fn test_render_without_location() {
        let error = SpannedError::<&str>::new("msg", None);
        assert_eq!(error.to_string(), "error: msg");
    }
}
