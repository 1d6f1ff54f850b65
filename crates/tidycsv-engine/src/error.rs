//! Error types for formula evaluation.

use thiserror::Error;

/// Errors raised while checking or evaluating a formula cell.
///
/// The cleaning pipeline never surfaces these: a failing formula keeps its
/// original text. They exist so callers (and tests) can see why.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Formula must start with '='")]
    MissingEquals,

    #[error("Formula cannot be empty")]
    EmptyFormula,

    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Result is not a finite number")]
    NonFinite,
}

pub type FormulaResult<T> = std::result::Result<T, FormulaError>;
