//! Named source text and line/column locations

use super::Span;
use codespan_reporting::files::{Files, SimpleFile};
use std::fmt;

/// A script name paired with its raw text
///
/// Used to turn byte [`Span`]s into human readable [`SourceLocation`]s and
/// handed to the diagnostic renderer as its file database.
#[derive(Debug, Clone)]
pub struct TextInput {
    file: SimpleFile<String, String>,
}

impl TextInput {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file: SimpleFile::new(name.into(), text.into()),
        }
    }

    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn text(&self) -> &str {
        self.file.source()
    }

    /// File database view consumed by codespan-reporting
    pub fn file(&self) -> &SimpleFile<String, String> {
        &self.file
    }

    /// Resolve a span to 1-based begin/end line and column numbers
    pub fn locate(&self, span: Span) -> SourceLocation {
        let (begin_line, begin_col) = self.line_col(span.start);
        let (end_line, end_col) = self.line_col(span.end);
        SourceLocation {
            source: self.name().to_string(),
            span,
            begin_line,
            begin_col,
            end_line,
            end_col,
        }
    }

    fn line_col(&self, byte_index: usize) -> (usize, usize) {
        let byte_index = byte_index.min(self.text().len());
        match self.file.location((), byte_index) {
            Ok(loc) => (loc.line_number, loc.column_number),
            Err(_) => (1, 1),
        }
    }
}

/// Physical location of a syntactic entity in a named source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub source: String,
    pub span: Span,
    pub begin_line: usize,
    pub begin_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.begin_line, self.begin_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_line() {
        let input = TextInput::new("t.pie", "def f() : Void is\nend\n");
        let loc = input.locate(Span::new(4, 5));
        assert_eq!((loc.begin_line, loc.begin_col), (1, 5));
        assert_eq!((loc.end_line, loc.end_col), (1, 6));
        assert_eq!(loc.to_string(), "t.pie:1:5");
    }

    #[test]
    fn test_locate_later_line() {
        let input = TextInput::new("t.pie", "def f() : Void is\n    g();\nend\n");
        let loc = input.locate(Span::new(22, 23));
        assert_eq!((loc.begin_line, loc.begin_col), (2, 5));
    }

    #[test]
    fn test_locate_past_end_is_clamped() {
        let input = TextInput::new("t.pie", "end");
        let loc = input.locate(Span::new(3, 40));
        assert_eq!((loc.end_line, loc.end_col), (1, 4));
    }
}
