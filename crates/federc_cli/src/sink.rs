use feder_tokens::diagnostic::{Diagnostic, DiagnosticSink};
use owo_colors::{OwoColorize, Stream};

/// Renders diagnostics to stderr as they are reported, highlighting the message line when
/// stderr supports colors
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoSink;

impl DiagnosticSink for EchoSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        eprintln!("{}", render(diagnostic));
    }
}

fn render(diagnostic: &Diagnostic) -> String {
    let rendered = diagnostic.to_string();
    match rendered.rsplit_once('\n') {
        Some((excerpt, message)) => format!(
            "{excerpt}\n{}",
            message.if_supports_color(Stream::Stderr, |m| m.red())
        ),
        None => rendered
            .if_supports_color(Stream::Stderr, |m| m.red())
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feder_parsing::lexer::Lexer;
    use feder_tokens::diagnostic::Silent;
    use test_log::test;

    #[test]
    fn test_render_keeps_excerpt() {
        let mut lexer = Lexer::from_text("main", "a $ b").with_sink(Silent);
        lexer.by_ref().for_each(drop);
        let rendered = render(&lexer.diagnostics()[0]);
        assert!(rendered.starts_with("a $ b\n  ^\n"), "{rendered:?}");
        assert!(rendered.contains("error:main:1: Invalid character '$'."));
    }
}
