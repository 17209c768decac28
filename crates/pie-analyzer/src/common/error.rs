//! Front-end error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream, WriteColor};
use thiserror::Error;
use super::{Diagnostic, Span, TextInput};

/// Syntax error with a byte span, produced while lexing or parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CompileError::Lexer { span, .. } | CompileError::Parser { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CompileError::Lexer { message, .. } | CompileError::Parser { message, .. } => message,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn report(&self, source: &TextInput, diagnostic: &Diagnostic) {
        let mut writer = self.writer.lock();
        emit(&mut writer, &self.config, source, diagnostic);
    }

    pub fn report_all(&self, source: &TextInput, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.report(source, diagnostic);
        }
    }

    /// Render diagnostics without color into a string
    pub fn render(source: &TextInput, diagnostics: &[Diagnostic]) -> String {
        let config = term::Config::default();
        let mut buffer = Buffer::no_color();
        for diagnostic in diagnostics {
            emit(&mut buffer, &config, source, diagnostic);
        }
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn emit(writer: &mut dyn WriteColor, config: &term::Config, source: &TextInput, diagnostic: &Diagnostic) {
    let report = to_report(diagnostic);
    if let Err(err) = term::emit(writer, config, source.file(), &report) {
        log::warn!("failed to render diagnostic: {err}");
    }
}

fn to_report(diagnostic: &Diagnostic) -> Report<()> {
    let range = diagnostic.location().span.range();
    let report = Report::error().with_message(diagnostic.kind());

    match diagnostic {
        Diagnostic::ParseError { message, .. } => report
            .with_labels(vec![Label::primary((), range).with_message(message.clone())]),

        Diagnostic::DupSymbol { name, kind, .. } => report
            .with_code("DupSymbol")
            .with_labels(vec![
                Label::primary((), range).with_message(format!("duplicate {kind} symbol '{name}'")),
            ]),

        Diagnostic::NoSuchSymbol { name, .. } => report
            .with_code("NoSuchSymbol")
            .with_labels(vec![
                Label::primary((), range).with_message(format!("no such symbol '{name}'")),
            ]),

        Diagnostic::TypeMismatch { expected, actual, .. } => report
            .with_code("TypeMismatch")
            .with_labels(vec![Label::primary((), range).with_message("type mismatch")])
            .with_notes(vec![format!("expected: {expected}, but got: {actual}")]),

        Diagnostic::ArgCountMismatch { expected, provided, .. } => report
            .with_code("ArgCountMismatch")
            .with_labels(vec![
                Label::primary((), range)
                    .with_message(format!("expected {expected} argument(s), but got {provided}")),
            ]),

        Diagnostic::TooFewOrTooManyReturns { expected, .. } => report
            .with_code("TooFewOrTooManyReturns")
            .with_labels(vec![
                Label::primary((), range)
                    .with_message(format!("expected {expected} return statement")),
            ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieType;

    #[test]
    fn test_render_includes_code_and_note() {
        let source = TextInput::new("<test>", "def moo() : Void is\n    return 1;\nend\n");
        let diagnostic = Diagnostic::type_mismatch(
            PieType::Void,
            PieType::Int32,
            source.locate(Span::new(31, 32)),
        );
        let rendered = DiagnosticReporter::render(&source, &[diagnostic]);

        assert!(rendered.contains("error[TypeMismatch]"));
        assert!(rendered.contains("expected: Void, but got: Int32"));
        assert!(rendered.contains("<test>:2:12"));
    }

    #[test]
    fn test_compile_error_accessors() {
        let err = CompileError::parser("expected ';'", Span::new(3, 4));
        assert_eq!(err.span(), Span::new(3, 4));
        assert_eq!(err.message(), "expected ';'");
    }
}
