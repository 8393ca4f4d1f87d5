//! Converts source text into a token stream.
//!
//! Tracks `start`/`current` character indices, a 1-based `line`, and
//! `line_start` (the index of the first character of the current line) so a
//! token's column is simply `start - line_start`.

use crate::tokens::{keyword, Token, TokenKind};
use ember_core::Span;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LexError {
    #[error("Unterminated string.")]
    UnterminatedString { line: usize, column: usize },
    #[error("Unexpected character.")]
    UnexpectedCharacter { line: usize, column: usize },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { line, column } => Span::new(*line, *column),
            LexError::UnexpectedCharacter { line, column } => Span::new(*line, *column),
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// The stubbed keyword-configuration option point: a table of overrides
/// consulted before the fixed keyword table. Empty by default, so lexing
/// behaves exactly as spec'd; present so a host can remap keywords without
/// touching the lexer itself.
#[derive(Debug, Clone, Default)]
pub struct KeywordConfig {
    overrides: HashMap<String, TokenKind>,
}

impl KeywordConfig {
    pub fn with_override(mut self, text: impl Into<String>, kind: TokenKind) -> Self {
        self.overrides.insert(text.into(), kind);
        self
    }

    fn lookup(&self, text: &str) -> Option<TokenKind> {
        self.overrides
            .get(text)
            .cloned()
            .or_else(|| keyword(text))
    }
}

pub struct Lexer {
    source: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    line_start: usize,
    keywords: KeywordConfig,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self::with_keywords(source, KeywordConfig::default())
    }

    pub fn with_keywords(source: &str, keywords: KeywordConfig) -> Self {
        Self {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            line_start: 0,
            keywords,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<LexError>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }
        let span = self.span_at(self.current);
        self.tokens.push(Token::eof(span));
        (self.tokens, self.errors)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let ch = self.source[self.current];
        self.current += 1;
        ch
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.current + 1).copied()
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn span_at(&self, index: usize) -> Span {
        Span::new(self.line, index - self.line_start)
    }

    fn start_span(&self) -> Span {
        self.span_at(self.start)
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn push(&mut self, kind: TokenKind) {
        let lexeme = self.lexeme();
        let span = self.start_span();
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn scan_token(&mut self) {
        let ch = self.advance();
        match ch {
            '(' => self.push(TokenKind::LeftParen),
            ')' => self.push(TokenKind::RightParen),
            '{' => self.push(TokenKind::LeftBrace),
            '}' => self.push(TokenKind::RightBrace),
            '[' => self.push(TokenKind::LeftBracket),
            ']' => self.push(TokenKind::RightBracket),
            ',' => self.push(TokenKind::Comma),
            '.' => self.push(TokenKind::Dot),
            ';' => self.push(TokenKind::Semicolon),
            '%' => self.push(TokenKind::Percent),

            '-' => {
                if self.matches('-') {
                    self.push(TokenKind::MinusMinus);
                } else if self.matches('=') {
                    self.push(TokenKind::MinusEqual);
                } else {
                    self.push(TokenKind::Minus);
                }
            }
            '+' => {
                if self.matches('+') {
                    self.push(TokenKind::PlusPlus);
                } else if self.matches('=') {
                    self.push(TokenKind::PlusEqual);
                } else {
                    self.push(TokenKind::Plus);
                }
            }
            '*' => {
                if self.matches('=') {
                    self.push(TokenKind::StarEqual);
                } else {
                    self.push(TokenKind::Star);
                }
            }
            '/' => {
                if self.matches('/') {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                } else if self.matches('=') {
                    self.push(TokenKind::SlashEqual);
                } else {
                    self.push(TokenKind::Slash);
                }
            }
            '!' => {
                if self.matches('=') {
                    self.push(TokenKind::BangEqual);
                } else {
                    self.push(TokenKind::Bang);
                }
            }
            '=' => {
                if self.matches('=') {
                    self.push(TokenKind::EqualEqual);
                } else {
                    self.push(TokenKind::Equal);
                }
            }
            '<' => {
                if self.matches('=') {
                    self.push(TokenKind::LessEqual);
                } else {
                    self.push(TokenKind::Less);
                }
            }
            '>' => {
                if self.matches('=') {
                    self.push(TokenKind::GreaterEqual);
                } else {
                    self.push(TokenKind::Greater);
                }
            }
            '&' => {
                if self.matches('&') {
                    self.push(TokenKind::And);
                }
                // A lone `&` is silently dropped — see spec's known edge cases.
            }
            '|' => {
                if self.matches('|') {
                    self.push(TokenKind::Or);
                }
                // A lone `|` is silently dropped — see spec's known edge cases.
            }

            ' ' | '\r' | '\t' => {}
            '\n' => {
                self.line += 1;
                self.line_start = self.current;
            }

            '"' => self.scan_string(),

            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),

            _ => {
                let span = self.start_span();
                self.errors.push(LexError::UnexpectedCharacter {
                    line: span.line,
                    column: span.column,
                });
            }
        }
    }

    fn scan_string(&mut self) {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\\' {
                self.advance();
                if self.peek().is_some() {
                    self.advance();
                }
                continue;
            }
            if c == '\n' {
                self.line += 1;
                self.advance();
                self.line_start = self.current;
                continue;
            }
            self.advance();
        }

        if self.is_at_end() {
            let span = self.start_span();
            self.errors.push(LexError::UnterminatedString {
                line: span.line,
                column: span.column,
            });
            return;
        }

        // consume the closing quote
        self.advance();
        let content: String = self.source[self.start + 1..self.current - 1]
            .iter()
            .collect();
        self.push(TokenKind::StringLit(content));
    }

    fn scan_number(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // consume '.'
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text: String = self.source[self.start..self.current].iter().collect();
        let value: f64 = text.parse().expect("lexer only admits valid number text");
        self.push(TokenKind::Number(value));
    }

    fn scan_identifier(&mut self) {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let text: String = self.source[self.start..self.current].iter().collect();
        match self.keywords.lookup(&text) {
            Some(kind) => self.push(kind),
            None => self.push(TokenKind::Identifier(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::new(src).scan_tokens();
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_arithmetic_and_punctuation() {
        assert_eq!(
            kinds("1 + 2 * 3;"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Plus,
                TokenKind::Number(2.0),
                TokenKind::Star,
                TokenKind::Number(3.0),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn trailing_dot_is_its_own_token() {
        assert_eq!(
            kinds("42."),
            vec![TokenKind::Number(42.0), TokenKind::Dot, TokenKind::Eof]
        );
    }

    #[test]
    fn compound_and_postfix_operators() {
        assert_eq!(
            kinds("x += 1; x--;"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::PlusEqual,
                TokenKind::Number(1.0),
                TokenKind::Semicolon,
                TokenKind::Identifier("x".into()),
                TokenKind::MinusMinus,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes_are_not_decoded() {
        let (tokens, errors) = Lexer::new(r#""a\nb""#).scan_tokens();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::StringLit("a\\nb".to_string()));
    }

    #[test]
    fn unterminated_string_reports_and_emits_nothing() {
        let (tokens, errors) = Lexer::new("\"oops").scan_tokens();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
        assert_eq!(tokens.len(), 1); // just Eof
    }

    #[test]
    fn lone_ampersand_is_silently_dropped() {
        let (tokens, errors) = Lexer::new("a & b").scan_tokens();
        assert!(errors.is_empty());
        assert_eq!(
            tokens.iter().map(|t| &t.kind).collect::<Vec<_>>(),
            vec![
                &TokenKind::Identifier("a".into()),
                &TokenKind::Identifier("b".into()),
                &TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn double_ampersand_is_logical_and() {
        assert_eq!(
            kinds("a && b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::And,
                TokenKind::Identifier("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unexpected_character_is_reported_and_scanning_continues() {
        let (tokens, errors) = Lexer::new("1 $ 2").scan_tokens();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LexError::UnexpectedCharacter { .. }));
        assert_eq!(
            tokens.iter().map(|t| &t.kind).collect::<Vec<_>>(),
            vec![&TokenKind::Number(1.0), &TokenKind::Number(2.0), &TokenKind::Eof]
        );
    }

    #[test]
    fn line_and_column_tracking() {
        let (tokens, _) = Lexer::new("let x = 1;\nlet y = 2;").scan_tokens();
        let y_tok = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Identifier("y".into()))
            .unwrap();
        assert_eq!(y_tok.span.line, 2);
        assert_eq!(y_tok.span.column, 4);
    }
}
