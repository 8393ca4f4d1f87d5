//! Values, environments and the tree-walking evaluator for Ember.

pub mod environment;
pub mod interpreter;
pub mod value;

pub use interpreter::Interpreter;
pub use value::Value;

use ember_compiler::tokens::Token;
use thiserror::Error;

/// A runtime failure raised during evaluation, pinned to the token that
/// triggered it (an operator, a call's closing paren, a property name, ...).
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
    pub token: Token,
}
