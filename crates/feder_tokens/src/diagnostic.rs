//! Diagnostics emitted while lexing and parsing, and the sinks that receive them

use crate::spanned::{Span, Spanned};
use crate::SpannedError;
use std::fmt::{Debug, Display, Formatter};

/// Which stage found the problem
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, derive_more::Display)]
pub enum DiagnosticClass {
    /// A malformed character sequence
    #[display(fmt = "lexical")]
    Lexical,
    /// A token sequence that doesn't match the grammar
    #[display(fmt = "syntax")]
    Syntax,
    /// A well-formed construct that breaks a structural rule
    #[display(fmt = "semantic")]
    Semantic,
}

/// A message tied to a source location
#[derive(Debug, Clone)]
pub struct Diagnostic {
    class: DiagnosticClass,
    message: String,
    span: Span,
}

impl Diagnostic {
    pub fn new(class: DiagnosticClass, message: impl Into<String>, span: Span) -> Self {
        Self {
            class,
            message: message.into(),
            span,
        }
    }

    pub fn class(&self) -> DiagnosticClass {
        self.class
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Spanned for Diagnostic {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&SpannedError::new(&self.message, self.span.clone()), f)
    }
}

/// Receives every diagnostic as it is reported
pub trait DiagnosticSink: Debug {
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Renders diagnostics to stderr
#[derive(Debug, Default, Copy, Clone)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        eprintln!("{diagnostic}");
    }
}

/// Drops diagnostics. They are still recorded by whoever reported them.
#[derive(Debug, Default, Copy, Clone)]
pub struct Silent;

impl DiagnosticSink for Silent {
    fn report(&mut self, _diagnostic: &Diagnostic) {}
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spanned::SourceFile;
    use std::rc::Rc;
    use test_log::test;

    #[test]
    fn test_collecting_sink() {
        let src = Rc::new(SourceFile::new("test", "x"));
        let mut sink: Vec<Diagnostic> = vec![];
        sink.report(&Diagnostic::new(
            DiagnosticClass::Syntax,
            "Expected end-of-file.",
            Span::new(src, (0, 0), (0, 1)),
        ));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].class(), DiagnosticClass::Syntax);
        assert_eq!(sink[0].message(), "Expected end-of-file.");
        assert_eq!(sink[0].span().column_end(), 1);
    }
}
