//! Lexer, parser and resolver for the Ember scripting language.
//!
//! [`compile`] runs the three static phases in order and stops at the first
//! one that fails, mirroring the pipeline's documented behavior: a lexical
//! error prevents parsing, a syntax error prevents resolution.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod resolve;
pub mod tokens;

use ember_core::{Diagnostic, Phase};
use lexer::{KeywordConfig, LexError, Lexer};
use parser::{ParseError, Parser};
use resolve::{LocalResolution, ResolveError};
use thiserror::Error;

/// A static-phase failure from any of the three compile-time stages.
#[derive(Debug, Error, Clone)]
pub enum CompileError {
    #[error("lexical error")]
    Lex(Vec<LexError>),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("resolve error")]
    Resolve(Vec<ResolveError>),
}

impl CompileError {
    /// Renders every diagnostic carried by this error at once.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CompileError::Lex(errors) => errors
                .iter()
                .map(|e| Diagnostic::new(Phase::Lexical, e.message(), e.span()))
                .collect(),
            CompileError::Parse(e) => vec![Diagnostic::new(
                Phase::Syntax,
                e.message.clone(),
                e.token.span,
            )
            .with_lexeme(e.token.lexeme.clone())],
            // Resolver errors are static, but the host-facing taxonomy tags
            // them Runtime rather than giving them their own phase.
            CompileError::Resolve(errors) => errors
                .iter()
                .map(|e| {
                    Diagnostic::new(Phase::Runtime, e.message.clone(), e.token.span)
                        .with_lexeme(e.token.lexeme.clone())
                })
                .collect(),
        }
    }
}

/// The output of a successful compile: a parsed program and its local
/// variable resolution, ready for the evaluator.
pub struct Compiled {
    pub program: ast::Program,
    pub locals: LocalResolution,
}

pub fn compile(source: &str) -> Result<Compiled, CompileError> {
    compile_with_keywords(source, KeywordConfig::default())
}

pub fn compile_with_keywords(
    source: &str,
    keywords: KeywordConfig,
) -> Result<Compiled, CompileError> {
    let (tokens, lex_errors) = Lexer::with_keywords(source, keywords).scan_tokens();
    if !lex_errors.is_empty() {
        return Err(CompileError::Lex(lex_errors));
    }

    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()?;

    let locals = resolve::resolve(&program).map_err(CompileError::Resolve)?;

    Ok(Compiled { program, locals })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_well_formed_program() {
        let compiled = compile("let x = 1; print x + 2;").unwrap();
        assert_eq!(compiled.program.statements.len(), 2);
    }

    #[test]
    fn lexical_error_prevents_parsing() {
        let err = compile("\"unterminated").unwrap_err();
        assert!(matches!(err, CompileError::Lex(_)));
        let diags = err.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].phase, Phase::Lexical);
        assert_eq!(diags[0].message, "Unterminated string.");
    }

    #[test]
    fn syntax_error_prevents_resolution() {
        let err = compile("print 1").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
        let diags = err.diagnostics();
        assert_eq!(diags[0].phase, Phase::Syntax);
        assert_eq!(diags[0].message, "Expect ';' after value.");
    }

    #[test]
    fn resolver_errors_are_tagged_runtime_not_their_own_phase() {
        let err = compile("return 1;").unwrap_err();
        assert!(matches!(err, CompileError::Resolve(_)));
        let diags = err.diagnostics();
        assert_eq!(diags[0].phase, Phase::Runtime);
        assert_eq!(diags[0].message, "Cannot return from top-level code.");
    }

    #[test]
    fn keyword_config_override_remaps_a_keyword() {
        let keywords = KeywordConfig::default().with_override("fn", tokens::TokenKind::Fun);
        let compiled = compile_with_keywords("fn f() { return 1; }", keywords).unwrap();
        assert_eq!(compiled.program.statements.len(), 1);
    }
}
