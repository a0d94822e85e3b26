//! Responsible with converting source text into a token stream

use feder_tokens::diagnostic::{Diagnostic, DiagnosticClass, DiagnosticSink, StderrSink};
use feder_tokens::number::{Number, NumberKind};
use feder_tokens::operator::Operator;
use feder_tokens::spanned::{SourceFile, SourceRef, Span, Spanned, TAB_WIDTH};
use feder_tokens::token::{Token, TokenKind};
use feder_tokens::SpannedError;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;
use tracing::trace;

/// One input character with its position. Newline sequences are already folded into a single
/// `'\n'`.
#[derive(Debug, Copy, Clone)]
struct Cell {
    c: char,
    line: usize,
    column: usize,
}

/// Responsible with converting source text into a token stream.
///
/// Tokens are produced on demand. A lexical error never stops the lexer: it is reported, the rest
/// of the line is skipped and an [TokenKind::Error] token stands in for the malformed text.
#[derive(Debug)]
pub struct Lexer {
    source: SourceRef,
    cells: Vec<Cell>,
    index: usize,
    eof: (usize, usize),
    pushed: Vec<Token>,
    sink: Box<dyn DiagnosticSink>,
    diagnostics: Vec<Diagnostic>,
    finished: bool,
}

impl Lexer {
    /// Creates a new lexer over the complete text of an input
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let source = Rc::new(SourceFile::new(name, text));
        let (cells, eof) = cells(text);
        Self {
            source,
            cells,
            index: 0,
            eof,
            pushed: vec![],
            sink: Box::new(StderrSink),
            diagnostics: vec![],
            finished: false,
        }
    }

    /// Creates a new lexer, reading the whole input from `reader`
    pub fn new(name: impl Into<String>, mut reader: impl Read) -> Result<Self, LexingError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::from_text(name, &text))
    }

    /// Creates a new lexer from a path
    pub fn read_path(path: &Path) -> Result<Self, LexingError> {
        let file = File::open(path)?;
        Self::new(path.display().to_string(), file)
    }

    /// Replaces the sink diagnostics are sent to
    pub fn with_sink<S: DiagnosticSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// The source table of this input
    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// Every diagnostic reported so far, by this lexer or through it
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Records a diagnostic and sends it to the sink
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.sink.report(&diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Defers a token, returning it from the next call to [next_token](Self::next_token)
    pub fn push_token(&mut self, token: Token) {
        self.pushed.push(token);
    }

    /// Gets the next token. After the end of the input this keeps returning [TokenKind::Eof].
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pushed.pop() {
            return token;
        }
        let token = self.lex();
        trace!("lexed {token:?} at {:?}", token.span());
        token
    }

    fn lex(&mut self) -> Token {
        loop {
            while matches!(self.current(), Some(' ' | '\t' | '\u{b}')) {
                self.bump();
            }
            let start = self.index;
            match self.lex_kind() {
                Ok(Some(TokenKind::Nl)) => return self.single_column(start, TokenKind::Nl),
                Ok(Some(TokenKind::Eof)) => return self.single_column(start, TokenKind::Eof),
                Ok(Some(kind)) => return Token::new(self.span_from(start), kind),
                Ok(None) => continue,
                Err(error) => {
                    let span = error
                        .location()
                        .cloned()
                        .unwrap_or_else(|| self.span_from(start));
                    self.report(Diagnostic::new(
                        DiagnosticClass::Lexical,
                        error.error().to_string(),
                        span.clone(),
                    ));
                    while !matches!(self.current(), None | Some('\n')) {
                        self.bump();
                    }
                    return Token::new(span, TokenKind::Error);
                }
            }
        }
    }

    /// Lexes one token kind starting at the current character. `None` means a comment was skipped.
    fn lex_kind(&mut self) -> LexResult<Option<TokenKind>> {
        let Some(c) = self.current() else {
            return Ok(Some(TokenKind::Eof));
        };
        let kind = match c {
            '\n' => {
                self.bump();
                TokenKind::Nl
            }
            '/' if self.peek(1) == Some('/') => {
                while !matches!(self.current(), None | Some('\n')) {
                    self.bump();
                }
                return Ok(None);
            }
            '/' if self.peek(1) == Some('*') => {
                self.bump();
                self.bump();
                loop {
                    match self.current() {
                        None => return Err(LexingError::UnterminatedComment.into()),
                        Some('*') if self.peek(1) == Some('/') => {
                            self.bump();
                            self.bump();
                            return Ok(None);
                        }
                        Some(_) => self.bump(),
                    }
                }
            }
            '#' => {
                self.bump();
                let mut command = String::new();
                while let Some(c) = self.current().filter(|&c| c != '\n') {
                    command.push(c);
                    self.bump();
                }
                TokenKind::Command(command)
            }
            ';' => self.single(TokenKind::SemiColon),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LCurly),
            '}' => self.single(TokenKind::RCurly),
            '"' => self.lex_string()?,
            '\'' => self.lex_char()?,
            c if c.is_ascii_digit() => self.lex_number()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c => match self.lex_operator() {
                Some(op) => TokenKind::Operator(op),
                None => {
                    self.bump();
                    return Err(if c.is_ascii_graphic() {
                        LexingError::InvalidChar(c)
                    } else {
                        LexingError::NotPrintable
                    }
                    .into());
                }
            },
        };
        Ok(Some(kind))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    /// Longest operator text starting at the current character
    fn lex_operator(&mut self) -> Option<Operator> {
        for len in (1..=Operator::MAX_TEXT_LEN).rev() {
            let text = (0..len).map(|i| self.peek(i)).collect::<Option<String>>();
            if let Some(op) = text.as_deref().and_then(Operator::from_text) {
                for _ in 0..len {
                    self.bump();
                }
                return Some(op);
            }
        }
        None
    }

    fn lex_identifier(&mut self) -> TokenKind {
        let mut ident = String::new();
        while let Some(c) = self.current() {
            if c.is_ascii_alphabetic() || c == '_' || (ident != "_" && c.is_ascii_digit()) {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::keyword(&ident).unwrap_or(TokenKind::Identifier(ident))
    }

    fn lex_number(&mut self) -> LexResult<TokenKind> {
        let mut bits = 0_u64;
        let mut decimal = true;
        let mut text = String::new();

        if self.current() == Some('0') {
            self.bump();
            text.push('0');
            let radix = match self.current() {
                Some('x') => Some((16, "hexadecimal")),
                Some('o') => Some((8, "octal")),
                Some('b') => Some((2, "binary")),
                Some(c) if c.is_ascii_digit() => {
                    let zero = self.index - 1;
                    return Err(SpannedError::new(
                        LexingError::LeadingZero,
                        self.span_between(zero, self.index),
                    ));
                }
                _ => None,
            };
            if let Some((radix, name)) = radix {
                decimal = false;
                self.bump();
                if !self.current().map_or(false, |c| c.is_digit(radix)) {
                    return Err(SpannedError::new(
                        LexingError::ExpectedDigit(name),
                        self.span_between(self.index, self.index),
                    ));
                }
                while let Some(digit) = self.current().and_then(|c| c.to_digit(radix)) {
                    bits = bits.wrapping_mul(radix as u64).wrapping_add(digit as u64);
                    self.bump();
                }
            }
        } else {
            while let Some(c) = self.current().filter(char::is_ascii_digit) {
                text.push(c);
                bits = bits.wrapping_mul(10).wrapping_add(c as u64 - '0' as u64);
                self.bump();
            }
        }

        let number = if decimal && self.current() == Some('.') {
            self.bump();
            text.push('.');
            while let Some(c) = self.current().filter(char::is_ascii_digit) {
                text.push(c);
                self.bump();
            }
            match self.current() {
                Some('f') => {
                    self.bump();
                    Number::F32(text.parse().unwrap_or_default())
                }
                Some('F') => {
                    self.bump();
                    Number::F64(text.parse().unwrap_or_default())
                }
                _ => Number::F64(text.parse().unwrap_or_default()),
            }
        } else {
            let unsigned = self.current() == Some('u');
            if unsigned {
                self.bump();
            }
            let suffix = self.current().filter(|c| matches!(c, 's' | 'S' | 'l' | 'L'));
            if suffix.is_some() {
                self.bump();
            }
            let kind = NumberKind::from_suffix(suffix, unsigned).unwrap_or(if unsigned {
                NumberKind::U32
            } else {
                NumberKind::I32
            });
            Number::from_bits(bits, kind)
        };

        match self.current() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                Err(LexingError::InvalidAfterNumber(c).into())
            }
            _ => Ok(TokenKind::Number(number)),
        }
    }

    fn lex_escape(&mut self) -> LexResult<char> {
        let c = match self.current() {
            Some('0') => '\0',
            Some('\'') => '\'',
            Some('"') => '"',
            Some('\\') => '\\',
            Some('a') => '\u{7}',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('v') => '\u{b}',
            _ => return Err(LexingError::InvalidEscape.into()),
        };
        self.bump();
        Ok(c)
    }

    fn lex_string(&mut self) -> LexResult<TokenKind> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.current() {
                None => return Err(LexingError::UnterminatedString.into()),
                Some('"') => {
                    self.bump();
                    return Ok(TokenKind::String(value));
                }
                Some('\n') => {
                    self.bump();
                    while matches!(self.current(), Some(' ' | '\t' | '\u{b}')) {
                        self.bump();
                    }
                }
                Some('\\') => {
                    self.bump();
                    value.push(self.lex_escape()?);
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
    }

    fn lex_char(&mut self) -> LexResult<TokenKind> {
        self.bump();
        let value = match self.current() {
            Some('\\') => {
                self.bump();
                self.lex_escape()?
            }
            Some(c) if c.is_ascii_graphic() || c == ' ' => {
                self.bump();
                c
            }
            _ => return Err(LexingError::NotPrintable.into()),
        };
        if self.current() != Some('\'') {
            return Err(LexingError::UnterminatedChar.into());
        }
        self.bump();
        Ok(TokenKind::Char(value))
    }

    fn current(&self) -> Option<char> {
        self.peek(0)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.cells.get(self.index + offset).map(|cell| cell.c)
    }

    fn bump(&mut self) {
        if self.index < self.cells.len() {
            self.index += 1;
        }
    }

    fn position(&self, index: usize) -> (usize, usize) {
        self.cells
            .get(index)
            .map(|cell| (cell.line, cell.column))
            .unwrap_or(self.eof)
    }

    fn span_between(&self, start: usize, end: usize) -> Span {
        Span::new(self.source.clone(), self.position(start), self.position(end))
    }

    fn span_from(&self, start: usize) -> Span {
        self.span_between(start, self.index)
    }

    fn single_column(&self, start: usize, kind: TokenKind) -> Token {
        let (line, column) = self.position(start);
        Token::new(
            Span::new(self.source.clone(), (line, column), (line, column + 1)),
            kind,
        )
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields every token up to and including the first [TokenKind::Eof]
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if matches!(token.kind(), TokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}

/// Splits text into positioned characters, folding `\r`, `\n`, `\r\n` and `\n\r` into one newline
/// and advancing tabs by [TAB_WIDTH] columns. Also returns the end-of-input position.
fn cells(text: &str) -> (Vec<Cell>, (usize, usize)) {
    let mut cells = vec![];
    let (mut line, mut column) = (0, 0);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' | '\r' => {
                if let Some(&next) = chars.peek() {
                    if (next == '\n' || next == '\r') && next != c {
                        chars.next();
                    }
                }
                cells.push(Cell {
                    c: '\n',
                    line,
                    column,
                });
                line += 1;
                column = 0;
            }
            c => {
                cells.push(Cell { c, line, column });
                column += if c == '\t' { TAB_WIDTH } else { 1 };
            }
        }
    }
    (cells, (line, column))
}

type LexResult<T> = Result<T, SpannedError<LexingError>>;

/// A malformed character sequence, or a failure to read the input
#[derive(Debug, Error)]
pub enum LexingError {
    #[error("Expected {0} character!")]
    ExpectedDigit(&'static str),
    #[error("Number sequences can't be leaded by 0.")]
    LeadingZero,
    #[error("Invalid character '{0}' directly after number token.")]
    InvalidAfterNumber(char),
    #[error("Invalid escape sequence.")]
    InvalidEscape,
    #[error("Expected '\"' not end-of-file.")]
    UnterminatedString,
    #[error("Expected '.")]
    UnterminatedChar,
    #[error("Invalid not-printable character.")]
    NotPrintable,
    #[error("Expected '*/'.")]
    UnterminatedComment,
    #[error("Invalid character '{0}'.")]
    InvalidChar(char),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<LexingError> for SpannedError<LexingError> {
    fn from(value: LexingError) -> Self {
        SpannedError::new(value, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feder_tokens::diagnostic::Silent;
    use test_log::test;

    fn kinds(text: &str) -> Vec<TokenKind> {
        Lexer::from_text("test", text)
            .with_sink(Silent)
            .map(Token::into_kind)
            .collect()
    }

    fn number(text: &str) -> Number {
        match kinds(text).as_slice() {
            [TokenKind::Number(n), TokenKind::Eof] => *n,
            other => panic!("{text:?} lexed to {other:?}"),
        }
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(number("0x1A"), Number::I32(26));
        assert_eq!(number("0x1As"), Number::I8(26));
        assert_eq!(number("0o17"), Number::I32(15));
        assert_eq!(number("0b101uL"), Number::U64(5));
        assert_eq!(number("0"), Number::I32(0));
        assert_eq!(number("300us"), Number::U8(44));
        assert_eq!(number("3.14f"), Number::F32(3.14));
        assert_eq!(number("3.14"), Number::F64(3.14));
        assert_eq!(number("0.5F"), Number::F64(0.5));
    }

    #[test]
    fn test_number_errors() {
        let mut lexer = Lexer::from_text("test", "0x\n07\n12abc\n1").with_sink(Silent);
        let tokens = lexer.by_ref().map(Token::into_kind).collect::<Vec<_>>();
        assert_eq!(
            tokens,
            [
                TokenKind::Error,
                TokenKind::Nl,
                TokenKind::Error,
                TokenKind::Nl,
                TokenKind::Error,
                TokenKind::Nl,
                TokenKind::Number(Number::I32(1)),
                TokenKind::Eof
            ]
        );
        let messages = lexer
            .diagnostics()
            .iter()
            .map(|d| d.message().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            [
                "Expected hexadecimal character!",
                "Number sequences can't be leaded by 0.",
                "Invalid character 'a' directly after number token."
            ]
        );
        assert!(lexer
            .diagnostics()
            .iter()
            .all(|d| d.class() == DiagnosticClass::Lexical));
    }

    #[test]
    fn test_lex_strings_and_chars() {
        assert_eq!(
            kinds(r#""a\nb""#),
            [TokenKind::String("a\nb".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            kinds("\"ab\n    cd\""),
            [TokenKind::String("abcd".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            kinds(r"'\t' 'x'"),
            [TokenKind::Char('\t'), TokenKind::Char('x'), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_errors() {
        let mut lexer = Lexer::from_text("test", "\"abc\\q\"\n\"open").with_sink(Silent);
        let tokens = lexer.by_ref().map(Token::into_kind).collect::<Vec<_>>();
        assert_eq!(
            tokens,
            [TokenKind::Error, TokenKind::Nl, TokenKind::Error, TokenKind::Eof]
        );
        assert_eq!(lexer.diagnostics()[0].message(), "Invalid escape sequence.");
        assert_eq!(
            lexer.diagnostics()[1].message(),
            "Expected '\"' not end-of-file."
        );
    }

    #[test]
    fn test_maximal_munch() {
        assert_eq!(
            kinds("a <<= b || c | d |= e"),
            [
                TokenKind::Identifier("a".to_string()),
                TokenKind::Operator(Operator::ShlAssign),
                TokenKind::Identifier("b".to_string()),
                TokenKind::Operator(Operator::LogicalOr),
                TokenKind::Identifier("c".to_string()),
                TokenKind::Operator(Operator::BitOr),
                TokenKind::Identifier("d".to_string()),
                TokenKind::Operator(Operator::BitOrAssign),
                TokenKind::Identifier("e".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_identifiers_and_keywords() {
        assert_eq!(
            kinds("Func func safe _1 a1"),
            [
                TokenKind::VirtualFunc,
                TokenKind::Func,
                TokenKind::Operator(Operator::Safe),
                TokenKind::Identifier("_".to_string()),
                TokenKind::Number(Number::I32(1)),
                TokenKind::Identifier("a1".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_newline_normalization() {
        assert_eq!(
            kinds("a\r\nb\n\rc\rd\n\ne"),
            [
                TokenKind::Identifier("a".to_string()),
                TokenKind::Nl,
                TokenKind::Identifier("b".to_string()),
                TokenKind::Nl,
                TokenKind::Identifier("c".to_string()),
                TokenKind::Nl,
                TokenKind::Identifier("d".to_string()),
                TokenKind::Nl,
                TokenKind::Nl,
                TokenKind::Identifier("e".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments_and_commands() {
        assert_eq!(
            kinds("a // note\n/* block\n */ b #run x"),
            [
                TokenKind::Identifier("a".to_string()),
                TokenKind::Nl,
                TokenKind::Identifier("b".to_string()),
                TokenKind::Command("run x".to_string()),
                TokenKind::Eof
            ]
        );
        assert_eq!(kinds("/* open"), [TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::from_text("test", "\tab + 1\nx")
            .with_sink(Silent)
            .collect::<Vec<_>>();
        let ab = tokens[0].span();
        assert_eq!((ab.line_start(), ab.column_start(), ab.column_end()), (0, 4, 6));
        let plus = tokens[1].span();
        assert_eq!((plus.column_start(), plus.column_end()), (7, 8));
        let nl = tokens[3].span();
        assert_eq!((nl.line_start(), nl.column_start(), nl.column_end()), (0, 10, 11));
        let x = tokens[4].span();
        assert_eq!((x.line_start(), x.column_start()), (1, 0));
    }

    #[test]
    fn test_invalid_character_keeps_end_of_line() {
        let mut lexer = Lexer::from_text("test", "a $ b\nc").with_sink(Silent);
        let tokens = lexer.by_ref().map(Token::into_kind).collect::<Vec<_>>();
        assert_eq!(
            tokens,
            [
                TokenKind::Identifier("a".to_string()),
                TokenKind::Error,
                TokenKind::Nl,
                TokenKind::Identifier("c".to_string()),
                TokenKind::Eof
            ]
        );
        assert_eq!(
            lexer.diagnostics()[0].to_string(),
            "a $ b\n  ^\nerror:test:1: Invalid character '$'."
        );
    }

    #[test]
    fn test_pushed_tokens_come_first() {
        let mut lexer = Lexer::from_text("test", "a b").with_sink(Silent);
        let a = lexer.next_token();
        lexer.push_token(a);
        assert_eq!(
            lexer.next_token().into_kind(),
            TokenKind::Identifier("a".to_string())
        );
        assert_eq!(
            lexer.next_token().into_kind(),
            TokenKind::Identifier("b".to_string())
        );
    }

    #[test]
    fn test_read_from_reader() {
        let lexer = Lexer::new("reader", "x".as_bytes()).expect("reading from a slice");
        assert_eq!(lexer.source().name(), "reader");
    }
}
