//! Analysis driver
//!
//! [`PieAnalyzer`] owns the script text and runs the whole pipeline:
//! parse, check, and on success build the call graph. Every [`check`]
//! starts from scratch, so the same analyzer can be reused after the source
//! is replaced.
//!
//! [`check`]: PieAnalyzer::check

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::common::{Diagnostic, DiagnosticReporter, TextInput};
use crate::frontend::lexer::{Lexer, TokenKind};
use crate::frontend::{check_script, CheckResult, Parser};
use crate::graph::{build_call_graph, to_dot, CallGraph};

/// Configuration options for an analysis run
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Do not render diagnostics to stderr
    pub run_silent: bool,
    pub dump_tokens: bool,
    pub dump_ast: bool,
}

impl Options {
    pub fn silent() -> Self {
        Self {
            run_silent: true,
            ..Self::default()
        }
    }
}

/// Errors caused by driving the analyzer, as opposed to problems in the script
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("no script source has been set")]
    NoSource,

    #[error("script has {count} diagnostic(s); no call graph can be built")]
    InvalidScript { count: usize },

    #[error("cannot write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Piethon semantic analyzer
#[derive(Debug, Default)]
pub struct PieAnalyzer {
    source: Option<TextInput>,
    options: Options,
}

impl PieAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            source: None,
            options,
        }
    }

    /// Set the script to analyze, replacing any previous one
    pub fn set_script_code(&mut self, name: impl Into<String>, code: impl Into<String>) {
        self.source = Some(TextInput::new(name, code));
    }

    pub fn remove_source_code(&mut self) {
        self.source = None;
    }

    pub fn source(&self) -> Option<&TextInput> {
        self.source.as_ref()
    }

    /// Parse and check the current script
    ///
    /// The outer result only fails on misuse. The inner result is the
    /// checked script, or every diagnostic found (parse errors alone if the
    /// script does not parse).
    pub fn check(&self) -> AnalyzerResult<CheckResult> {
        let source = self.source.as_ref().ok_or(AnalyzerError::NoSource)?;
        info!("analyzing {}", source.name());

        if self.options.dump_tokens {
            dump_tokens(source.text());
        }

        info!("parsing...");
        let result = match Parser::new(source.text()).parse() {
            Ok(script) => {
                if self.options.dump_ast {
                    eprintln!("=== AST ===");
                    eprintln!("{:#?}", script);
                    eprintln!("=== End AST ===\n");
                }

                info!("checking...");
                check_script(script, source)
            }
            Err(errors) => {
                debug!("{} parse error(s); skipping semantic checks", errors.len());
                Err(errors
                    .iter()
                    .map(|err| Diagnostic::parse_error(err, source))
                    .collect())
            }
        };

        if let Err(diagnostics) = &result {
            info!("{} diagnostic(s)", diagnostics.len());
            if !self.options.run_silent {
                DiagnosticReporter::new().report_all(source, diagnostics);
            }
        }

        Ok(result)
    }

    /// Check the script and build its call graph
    pub fn build_graph(&self) -> AnalyzerResult<CallGraph> {
        match self.check()? {
            Ok(checked) => {
                info!("building call graph...");
                Ok(build_call_graph(&checked))
            }
            Err(diagnostics) => Err(AnalyzerError::InvalidScript {
                count: diagnostics.len(),
            }),
        }
    }

    /// Write `graph` to `path` as Graphviz DOT
    pub fn export_graph(&self, graph: &CallGraph, path: &Path, title: &str) -> AnalyzerResult<()> {
        fs::write(path, to_dot(graph, title)).map_err(|source| AnalyzerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("call graph written to {}", path.display());
        Ok(())
    }
}

fn dump_tokens(text: &str) {
    let mut lexer = Lexer::new(text);
    eprintln!("=== Tokens ===");
    loop {
        match lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => break,
            Ok(token) => eprintln!("{:?}", token),
            Err(err) => eprintln!("{}", err),
        }
    }
    eprintln!("=== End Tokens ===\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ProcNode;
    use pretty_assertions::assert_eq;

    const VALID: &str = "def g() : Void is
end

def f() : Void is
    g();
end

def m() : Int32 is
    f();
    g();
    return 0;
end
";

    fn analyzer(code: &str) -> PieAnalyzer {
        let mut analyzer = PieAnalyzer::with_options(Options::silent());
        analyzer.set_script_code("<test>", code);
        analyzer
    }

    #[test]
    fn test_check_without_source() {
        let analyzer = PieAnalyzer::with_options(Options::silent());
        assert!(matches!(analyzer.check(), Err(AnalyzerError::NoSource)));
        assert!(matches!(analyzer.build_graph(), Err(AnalyzerError::NoSource)));
    }

    #[test]
    fn test_removed_source() {
        let mut analyzer = analyzer(VALID);
        assert!(analyzer.check().unwrap().is_ok());

        analyzer.remove_source_code();
        assert!(analyzer.source().is_none());
        assert!(matches!(analyzer.check(), Err(AnalyzerError::NoSource)));
    }

    #[test]
    fn test_graph_for_invalid_script() {
        let analyzer = analyzer("def f() : Int32 is return true; end");
        assert!(matches!(
            analyzer.build_graph(),
            Err(AnalyzerError::InvalidScript { count: 1 })
        ));
    }

    #[test]
    fn test_parse_errors_skip_checking() {
        // the undeclared name would be a semantic error
        let analyzer = analyzer("def f() : Void is nope(); var := 1; end");
        let errors = analyzer.check().unwrap().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_parse_error());
        assert_eq!(errors[0].kind(), "Parse error");
    }

    #[test]
    fn test_check_is_idempotent() {
        let analyzer = analyzer(
            "def f(a : Int32) : Bool is
                var a : Bool := 1;
                return a;
            end",
        );

        let first = analyzer.check().unwrap().unwrap_err();
        let second = analyzer.check().unwrap().unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_echoing_does_not_change_result() {
        let code = "def f() : Int32 is return true; end\ndef g() : Void is h(1); end\n";
        let silent = analyzer(code);
        let mut echoing = PieAnalyzer::with_options(Options::default());
        echoing.set_script_code("<test>", code);

        let quiet = silent.check().unwrap();
        let loud = echoing.check().unwrap();
        assert_eq!(loud, quiet);
        assert_eq!(loud.unwrap_err().len(), 2);
    }

    #[test]
    fn test_replacing_source_starts_fresh() {
        let mut analyzer = analyzer("def f() : Void is end");
        assert!(analyzer.check().unwrap().is_ok());

        // `f` was declared by the previous script only
        analyzer.set_script_code("<second>", "def g() : Void is f(); end");
        let errors = analyzer.check().unwrap().unwrap_err();
        assert!(matches!(&errors[..], [Diagnostic::NoSuchSymbol { name, .. }] if name == "f"));
        assert_eq!(errors[0].location().source, "<second>");
    }

    #[test]
    fn test_graph_vertices_match_procedures() {
        let graph = analyzer(VALID).build_graph().unwrap();
        let names: Vec<_> = graph.vertices().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["g", "f", "m"]);
        assert_eq!(graph.in_degree(&ProcNode::new("g")), 2);
    }

    #[test]
    fn test_export_graph() {
        let analyzer = analyzer(VALID);
        let graph = analyzer.build_graph().unwrap();
        let path = std::env::temp_dir().join(format!("pie-analyzer-{}.dot", std::process::id()));

        analyzer.export_graph(&graph, &path, "calls").unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(written, to_dot(&graph, "calls"));
        assert!(written.contains("\"m\" -> \"f\";"));
    }

    #[test]
    fn test_export_to_bad_path() {
        let analyzer = analyzer(VALID);
        let graph = analyzer.build_graph().unwrap();
        let path = std::env::temp_dir().join("pie-analyzer-missing-dir").join("out.dot");

        assert!(matches!(
            analyzer.export_graph(&graph, &path, "calls"),
            Err(AnalyzerError::Io { .. })
        ));
    }
}
