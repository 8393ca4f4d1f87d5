//! The embedding entry point: wires the lexer, parser, resolver and
//! evaluator into the single function a host needs — [`run_source`] — plus
//! the ambient CLI/REPL stack built on top of it.

pub mod colors;
pub mod repl;

use ember_compiler::lexer::KeywordConfig;
use ember_core::Diagnostic;
use ember_rt::{Interpreter, RuntimeError};

/// The result of running one source program: whether it completed without
/// error, every diagnostic collected along the way, and the accumulated
/// `print` output.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub succeeded: bool,
    pub errors: Vec<Diagnostic>,
    pub output: Vec<String>,
}

/// Runs a complete Ember program end to end: lex, parse, resolve, evaluate.
///
/// Halts at the first phase that produces a diagnostic, per the pipeline's
/// documented behavior — a lexical error prevents parsing, a syntax error
/// prevents resolution, and a resolver error prevents evaluation. Whatever
/// output the program managed to `print` before a runtime error is still
/// returned.
pub fn run_source(source: &str) -> RunResult {
    run_source_with_keywords(source, KeywordConfig::default())
}

pub fn run_source_with_keywords(source: &str, keywords: KeywordConfig) -> RunResult {
    let compiled = match ember_compiler::compile_with_keywords(source, keywords) {
        Ok(compiled) => compiled,
        Err(err) => {
            return RunResult {
                succeeded: false,
                errors: err.diagnostics(),
                output: Vec::new(),
            };
        }
    };

    let mut interpreter = Interpreter::new(compiled.locals);
    match interpreter.run(&compiled.program.statements) {
        Ok(()) => RunResult {
            succeeded: true,
            errors: Vec::new(),
            output: interpreter.into_output(),
        },
        Err(err) => RunResult {
            succeeded: false,
            errors: vec![runtime_diagnostic(&err)],
            output: interpreter.into_output(),
        },
    }
}

fn runtime_diagnostic(err: &RuntimeError) -> Diagnostic {
    Diagnostic::new(ember_core::Phase::Runtime, err.message.clone(), err.token.span)
        .with_lexeme(err.token.lexeme.clone())
}

/// A REPL session: one interpreter whose global environment survives across
/// lines, even though each line is lexed/parsed/resolved as its own
/// self-contained program.
pub struct Session {
    interpreter: Interpreter,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(Default::default()),
        }
    }

    /// Compiles and runs one line against this session's existing globals,
    /// returning the diagnostics and output that line produced.
    pub fn eval_line(&mut self, source: &str) -> RunResult {
        let compiled = match ember_compiler::compile(source) {
            Ok(compiled) => compiled,
            Err(err) => {
                return RunResult {
                    succeeded: false,
                    errors: err.diagnostics(),
                    output: Vec::new(),
                };
            }
        };

        self.interpreter.set_locals(compiled.locals);
        match self.interpreter.run(&compiled.program.statements) {
            Ok(()) => RunResult {
                succeeded: true,
                errors: Vec::new(),
                output: self.interpreter.take_output(),
            },
            Err(err) => RunResult {
                succeeded: false,
                errors: vec![runtime_diagnostic(&err)],
                output: self.interpreter.take_output(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_arithmetic_is_printed() {
        let result = run_source("print 1 + 2;");
        assert!(result.succeeded);
        assert_eq!(result.output, vec!["3".to_string()]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn block_scoping_shadows_then_restores() {
        let result = run_source("let x = 10; { let x = 20; print x; } print x;");
        assert!(result.succeeded);
        assert_eq!(result.output, vec!["20".to_string(), "10".to_string()]);
    }

    #[test]
    fn closures_capture_independent_counters() {
        let result = run_source(
            r#"
            fun mk(){ let n=0; fun inc(){ n=n+1; return n; } return inc; }
            let f=mk();
            print f(); print f(); print f();
            "#,
        );
        assert!(result.succeeded);
        assert_eq!(
            result.output,
            vec!["1".to_string(), "2".to_string(), "3".to_string()]
        );
    }

    #[test]
    fn inheritance_dispatches_through_super() {
        let result = run_source(
            r#"
            class A{ speak(){print "A";} }
            class B inherits A{ speak(){ super.speak(); print "B"; } }
            B().speak();
            "#,
        );
        assert!(result.succeeded);
        assert_eq!(result.output, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn array_concatenation_and_indexing() {
        let result = run_source("let a=[1,2]; let b=[3,4]; print (a+b)[2];");
        assert!(result.succeeded);
        assert_eq!(result.output, vec!["3".to_string()]);
    }

    #[test]
    fn division_by_zero_halts_with_a_runtime_diagnostic() {
        let result = run_source("print 10/0;");
        assert!(!result.succeeded);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].phase, ember_core::Phase::Runtime);
        assert_eq!(result.errors[0].message, "Division by zero.");
    }

    #[test]
    fn top_level_return_is_a_resolver_failure_tagged_runtime() {
        let result = run_source("return 5;");
        assert!(!result.succeeded);
        assert_eq!(result.errors[0].phase, ember_core::Phase::Runtime);
        assert_eq!(result.errors[0].message, "Cannot return from top-level code.");
    }

    #[test]
    fn unterminated_string_is_a_lexical_failure() {
        let result = run_source("\"unterminated");
        assert!(!result.succeeded);
        assert_eq!(result.errors[0].phase, ember_core::Phase::Lexical);
        assert_eq!(result.errors[0].message, "Unterminated string.");
    }

    #[test]
    fn session_keeps_globals_alive_across_lines() {
        let mut session = Session::new();
        let first = session.eval_line("let count = 0;");
        assert!(first.succeeded);
        let second = session.eval_line("count = count + 1; print count;");
        assert!(second.succeeded);
        assert_eq!(second.output, vec!["1".to_string()]);
        let third = session.eval_line("count = count + 1; print count;");
        assert_eq!(third.output, vec!["2".to_string()]);
    }

    #[test]
    fn output_accumulated_before_a_runtime_error_is_preserved() {
        let result = run_source(r#"print "before"; print 1/0; print "after";"#);
        assert!(!result.succeeded);
        assert_eq!(result.output, vec!["before".to_string()]);
    }
}
