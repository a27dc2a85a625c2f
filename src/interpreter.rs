/// The evaluator module executes postfix token sequences.
///
/// Walks a postfix sequence with an explicit value stack, resolving
/// variables through the parameter provider as they are reached, and applies
/// the fixed semantics of every operator and function. It also classifies a
/// sequence as boolean or numeric from its final operator.
pub mod evaluator;
/// The expression module defines the public `Expression` type.
///
/// An expression owns its source text and token sequences and exposes the
/// generate / validate / evaluate lifecycle.
pub mod expression;
/// The lexer module turns expression text into infix tokens.
///
/// A character state machine recognizes numbers, names, operator symbols and
/// parenthesized groups. Groups are generated recursively as nested
/// expressions while scanning.
pub mod lexer;
/// The parser module arranges infix tokens into postfix order.
///
/// Uses an operator stack and the fixed precedence table; operators of equal
/// precedence are emitted left to right.
pub mod parser;
/// Parameter providers.
///
/// The trait expressions use to resolve variable names, and a thread-safe
/// table implementing it.
pub mod provider;
/// Evaluation ordering for sets of named expressions.
pub mod schedule;
/// Token types and the operator table.
pub mod token;
