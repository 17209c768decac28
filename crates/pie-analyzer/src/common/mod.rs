//! Common infrastructure shared by the front end, checker and graph passes

mod diagnostic;
mod error;
mod source;
mod span;

pub use diagnostic::Diagnostic;
pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use source::{SourceLocation, TextInput};
pub use span::Span;
