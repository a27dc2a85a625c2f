//! # expreval
//!
//! expreval compiles one-line infix arithmetic and boolean expressions such
//! as `abs(supply12V - 12.0) <= 12.0*0.05` into postfix form and evaluates
//! them on demand, resolving variables against a live parameter provider at
//! every evaluation.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Error types for parsing and evaluation.
///
/// Parse errors come from `generate()`: unexpected characters for the
/// scanner state, unbalanced groups and unrepresentable literals. Evaluation
/// errors come from classification and evaluation: unresolved variables,
/// malformed postfix sequences, unsupported operators and math domain
/// failures.
pub mod error;
/// The expression engine.
///
/// Lexer, parser, evaluator and the `Expression` type tying them together,
/// along with parameter providers and evaluation scheduling.
pub mod interpreter;

pub use error::{Error, EvalError, ParseError};
pub use interpreter::{
    expression::{Expression, TokenView},
    provider::{ParameterProvider, ParameterTable, SharedProvider},
};

/// Generates and evaluates `text` in one step.
///
/// # Errors
/// Returns an error if the text does not parse, or if evaluation fails
/// (including when a referenced variable is missing from `provider`).
///
/// # Examples
/// ```
/// use std::{collections::HashMap, sync::Arc};
///
/// use expreval::evaluate;
///
/// let vars = HashMap::from([("A".to_string(), 10.0),
///                           ("B".to_string(), 20.0),
///                           ("C".to_string(), 40.0),
///                           ("D".to_string(), 30.0)]);
/// let provider = Arc::new(vars);
///
/// assert_eq!(evaluate("(A+B)*(D+C)", provider.clone()).unwrap(), 2100.0);
/// assert!(evaluate("A + missing", provider).is_err());
/// ```
pub fn evaluate(text: &str, provider: SharedProvider) -> Result<f64, Error> {
    let mut expr = Expression::with_text("expression", provider, text);
    expr.generate()?;
    Ok(expr.value()?)
}
