//! Shared types used across the lexer, parser, resolver and evaluator:
//! source spans, the phased diagnostic taxonomy, and the `Reporter` that
//! both collects diagnostics and accumulates `print` output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in the original source text.
///
/// `line` is 1-based, `column` is 0-based (`start - lineStart`), matching the
/// lexer's own bookkeeping so a diagnostic's position is exactly what the
/// lexer saw when it produced the offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn dummy() -> Self {
        Self { line: 0, column: 0 }
    }
}

/// Which stage of the pipeline produced a diagnostic.
///
/// Per spec, static errors raised by the resolver are tagged `Runtime`
/// rather than getting their own phase — this keeps the three-phase
/// taxonomy stable and matches what the evaluator's own errors look like to
/// an embedding host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lexical,
    Syntax,
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Lexical => "Lexical",
            Phase::Syntax => "Syntax",
            Phase::Runtime => "Runtime",
        };
        write!(f, "{name}")
    }
}

/// A single diagnostic pinned to a source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub phase: Phase,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub lexeme: Option<String>,
}

impl Diagnostic {
    pub fn new(phase: Phase, message: impl Into<String>, span: Span) -> Self {
        Self {
            phase,
            message: message.into(),
            line: span.line,
            column: span.column,
            lexeme: None,
        }
    }

    pub fn with_lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.lexeme = Some(lexeme.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} Error] on line {} at column {}: {}",
            self.phase, self.line, self.column, self.message
        )?;
        if let Some(lexeme) = &self.lexeme {
            write!(f, " (at '{lexeme}')")?;
        }
        Ok(())
    }
}

/// Collects diagnostics and `print`ed output across the whole pipeline run.
///
/// Lexer errors accumulate and scanning continues (a degraded token stream);
/// parser/resolver/runtime errors abort their phase, and the embedding host
/// records only the first one. `Reporter` doesn't enforce that policy itself
/// — phases decide how many diagnostics to push — it just keeps the log.
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
    output: Vec<String>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn print(&mut self, line: String) {
        self.output.push(line);
    }

    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn into_parts(self) -> (Vec<Diagnostic>, Vec<String>) {
        (self.diagnostics, self.output)
    }
}
