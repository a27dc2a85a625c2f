/// Parsing errors.
///
/// Defines the errors raised while turning source text into postfix tokens:
/// unexpected characters for the current scanner state, unbalanced
/// parentheses, literals that cannot be represented, and structural problems
/// found while resolving operator precedence.
pub mod parse_error;
/// Evaluation errors.
///
/// Contains the errors raised while classifying or evaluating a generated
/// expression: unresolved variables, postfix sequences whose shape does not
/// match operator arities, unsupported operators, and math domain failures.
pub mod eval_error;

pub use eval_error::EvalError;
pub use parse_error::ParseError;
use thiserror::Error;

/// Any failure produced by the engine.
///
/// Most of the API returns the narrower [`ParseError`] or [`EvalError`];
/// this umbrella type exists for callers that run the whole pipeline in one
/// step, such as [`crate::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Lexing or parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Classification or evaluation failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
}
