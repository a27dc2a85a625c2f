use thiserror::Error;

/// Represents all errors that can occur while classifying or evaluating an
/// expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A variable has no binding in the parameter provider.
    #[error("Variable \"{name}\" is not defined")]
    UnresolvedVariable {
        /// Name of the variable.
        name: String,
    },
    /// Evaluation or classification was requested before `generate()`.
    #[error("Expression \"{name}\" has not been generated")]
    NotGenerated {
        /// Name of the expression.
        name: String,
    },
    /// An operator found fewer values on the stack than its arity.
    #[error("Operator \"{operator}\" needs {needed} value(s) but only {available} available")]
    StackUnderflow {
        /// The operator being applied.
        operator:  String,
        /// Its arity.
        needed:    usize,
        /// Values left on the stack.
        available: usize,
    },
    /// Evaluation did not end with exactly one value on the stack.
    #[error("Expression left {count} value(s) on the stack, expected 1")]
    LeftoverValues {
        /// Number of values remaining.
        count: usize,
    },
    /// The postfix sequence does not have the shape a result can be
    /// classified from.
    #[error("Malformed postfix sequence: {details}")]
    MalformedPostfix {
        /// What went wrong.
        details: String,
    },
    /// The operator has no semantics for the given number of operands.
    #[error("Operator \"{operator}\" is not supported with {arity} operand(s)")]
    UnsupportedOperator {
        /// The operator symbol or function name.
        operator: String,
        /// Number of operands it was applied to.
        arity:    usize,
    },
    /// The right hand side of `/` evaluated to zero.
    #[error("Division by zero")]
    DivisionByZero,
    /// A math function was applied outside of its domain.
    #[error("Math domain error: {operator}({argument})")]
    Domain {
        /// The function name.
        operator: String,
        /// The rejected argument, formatted.
        argument: String,
    },
    /// Named expressions reference each other in a cycle.
    #[error("Dependency cycle between expressions: {}", .names.join(", "))]
    DependencyCycle {
        /// Names of the expressions that could not be ordered.
        names: Vec<String>,
    },
}
