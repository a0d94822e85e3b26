//! Source ranges and the source table they point into

use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A trait that can provide the [Span] of the complete context of a syntax node
pub trait Spanned {
    fn span(&self) -> Span;
}

/// The columns a tab advances the cursor by
pub const TAB_WIDTH: usize = 4;

/// An immutable table of the lines of one input, used for rendering diagnostics.
///
/// Lines are split with the same newline normalization the lexer uses (`\n`, `\r`, `\r\n` and
/// `\n\r` each end one line) and tabs are expanded to [TAB_WIDTH] spaces, so a column reported
/// by the lexer indexes directly into the stored line.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    lines: Vec<String>,
}

impl SourceFile {
    /// Creates a new source table from the complete text of an input
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: split_lines(text),
        }
    }

    /// The human-readable name of this input
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets a line by its 0-based index
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// All lines of this input
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

fn split_lines(text: &str) -> Vec<String> {
    let mut lines = vec![];
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' | '\r' => {
                if let Some(&next) = chars.peek() {
                    if (next == '\n' || next == '\r') && next != c {
                        chars.next();
                    }
                }
                lines.push(std::mem::take(&mut current));
            }
            '\t' => current.push_str(&" ".repeat(TAB_WIDTH)),
            c => current.push(c),
        }
    }
    lines.push(current);
    lines
}

/// A shared handle to a [SourceFile]
pub type SourceRef = Rc<SourceFile>;

/// A range of source code: 0-based lines and 0-based columns, the end column exclusive.
///
/// Bounds are stored pointwise, so `column_start <= column_end` and `line_start <= line_end`
/// always hold, even for ranges spanning multiple lines.
#[derive(Clone)]
pub struct Span {
    source: SourceRef,
    line_start: usize,
    line_end: usize,
    column_start: usize,
    column_end: usize,
}

impl Span {
    /// Creates a new span from a `(line, column)` start and end
    pub fn new(source: SourceRef, start: (usize, usize), end: (usize, usize)) -> Self {
        Self {
            source,
            line_start: start.0.min(end.0),
            line_end: start.0.max(end.0),
            column_start: start.1.min(end.1),
            column_end: start.1.max(end.1),
        }
    }

    /// Gets a zero-width span directly after this span
    pub fn end(&self) -> Self {
        Self {
            source: self.source.clone(),
            line_start: self.line_end,
            line_end: self.line_end,
            column_start: self.column_end,
            column_end: self.column_end,
        }
    }

    /// Creates a span that encompasses both, or `None` if the spans come from different sources
    pub fn join(&self, other: &Self) -> Option<Self> {
        if !Rc::ptr_eq(&self.source, &other.source) {
            None
        } else {
            Some(Self {
                source: self.source.clone(),
                line_start: self.line_start.min(other.line_start),
                line_end: self.line_end.max(other.line_end),
                column_start: self.column_start.min(other.column_start),
                column_end: self.column_end.max(other.column_end),
            })
        }
    }

    /// Like [join](Self::join), but falls back to `self` when the sources differ.
    ///
    /// Spans from different inputs have no meaningful union, so the fallback is lossy.
    pub fn merge(&self, other: &Self) -> Self {
        self.join(other).unwrap_or_else(|| self.clone())
    }

    /// The source this span points into
    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    pub fn line_start(&self) -> usize {
        self.line_start
    }

    pub fn line_end(&self) -> usize {
        self.line_end
    }

    pub fn column_start(&self) -> usize {
        self.column_start
    }

    pub fn column_end(&self) -> usize {
        self.column_end
    }

    /// The number of columns covered
    pub fn len(&self) -> usize {
        self.column_end - self.column_start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        self.clone()
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.source, &other.source)
            && self.line_start == other.line_start
            && self.line_end == other.line_end
            && self.column_start == other.column_start
            && self.column_end == other.column_end
    }
}

impl Eq for Span {}

impl Hash for Span {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.source).hash(state);
        self.line_start.hash(state);
        self.line_end.hash(state);
        self.column_start.hash(state);
        self.column_end.hash(state);
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}..{}:{}",
            self.source.name(),
            self.line_start,
            self.column_start,
            self.line_end,
            self.column_end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn source(text: &str) -> SourceRef {
        Rc::new(SourceFile::new("test", text))
    }

    #[test]
    fn test_split_lines_normalizes_terminators() {
        let src = SourceFile::new("test", "a\r\nb\n\rc\rd\n\ne");
        assert_eq!(src.lines(), &["a", "b", "c", "d", "", "e"]);
    }

    #[test]
    fn test_tabs_expanded() {
        let src = SourceFile::new("test", "\tx");
        assert_eq!(src.line(0), Some("    x"));
    }

    #[test]
    fn test_span_end() {
        let src = source("hello");
        let span = Span::new(src, (0, 0), (0, 5)).end();
        assert_eq!(span.column_start(), 5);
        assert!(span.is_empty());
    }

    #[test]
    fn test_join() {
        let src = source("abc def\nghi");
        let p1 = Span::new(src.clone(), (0, 4), (0, 7));
        let p2 = Span::new(src.clone(), (1, 0), (1, 3));
        assert_eq!(p1.join(&p2).unwrap(), Span::new(src, (0, 0), (1, 7)));
    }

    #[test]
    fn test_join_is_associative() {
        let src = source("abcdefgh\nabcdefgh\nabcdefgh");
        let a = Span::new(src.clone(), (0, 2), (0, 3));
        let b = Span::new(src.clone(), (1, 6), (1, 8));
        let c = Span::new(src.clone(), (2, 0), (2, 1));
        assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
    }

    #[test]
    fn test_merge_different_sources_keeps_lhs() {
        let a = Span::new(source("a"), (0, 0), (0, 1));
        let b = Span::new(source("b"), (0, 0), (0, 1));
        assert!(a.join(&b).is_none());
        assert_eq!(a.merge(&b), a);
    }
}
