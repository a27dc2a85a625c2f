use crate::{
    error::EvalError,
    interpreter::{
        provider::ParameterProvider,
        token::{Arity, Operator, OperatorId, Token},
    },
};

/// Result type used by the evaluator.
pub type EvalResult<T> = Result<T, EvalError>;

/// Runs a postfix token sequence on a value stack.
///
/// Operands push their value: constants directly, variables through a fresh
/// `provider` lookup, groups by evaluating themselves. Operators pop their
/// operands and push the result. Exactly one value must remain.
///
/// # Errors
/// - [`EvalError::UnresolvedVariable`] if a variable has no binding.
/// - [`EvalError::StackUnderflow`] / [`EvalError::LeftoverValues`] if the
///   sequence does not match operator arities.
/// - Any error from [`apply_unary`] or [`apply_binary`].
pub fn execute(postfix: &[Token], provider: &dyn ParameterProvider) -> EvalResult<f64> {
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

    for token in postfix {
        let value = match token {
            Token::Constant(constant) => constant.value(),
            Token::Variable(name) => {
                provider.lookup(name)
                        .ok_or_else(|| EvalError::UnresolvedVariable { name: name.clone() })?
            },
            Token::Group(expr) => expr.value()?,
            Token::Operator(operator) => apply(*operator, &mut stack)?,
        };
        stack.push(value);
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(EvalError::LeftoverValues { count: stack.len() }),
    }
}

/// Pops the operands of `operator` and applies it.
fn apply(operator: Operator, stack: &mut Vec<f64>) -> EvalResult<f64> {
    let needed = operator.arity.count();
    if stack.len() < needed {
        return Err(EvalError::StackUnderflow { operator: operator.id.to_string(),
                                               needed,
                                               available: stack.len() });
    }

    let mut operands = stack.split_off(stack.len() - needed);
    match operator.arity {
        Arity::Unary => apply_unary(operator.id, operands[0]),
        Arity::Binary => {
            let rhs = operands.pop().unwrap_or_default();
            let lhs = operands.pop().unwrap_or_default();
            apply_binary(operator.id, lhs, rhs)
        },
    }
}

/// Applies a prefix operator or function to `x`.
///
/// # Errors
/// - [`EvalError::UnsupportedOperator`] for operators without one-operand
///   semantics (binary-only symbols, `sinh`, `cosh`, `tanh`).
/// - [`EvalError::Domain`] when the function is undefined at `x`, or has a
///   pole or overflows there (`log(0)`, `exp(1000)`).
///
/// # Example
/// ```
/// use expreval::interpreter::{evaluator::apply_unary, token::OperatorId};
///
/// assert_eq!(apply_unary(OperatorId::Subtract, 4.5).unwrap(), -4.5);
/// assert_eq!(apply_unary(OperatorId::Floor, -1.5).unwrap(), -2.0);
/// assert!(apply_unary(OperatorId::Sqrt, -1.0).is_err());
/// assert!(apply_unary(OperatorId::Log, 0.0).is_err());
/// assert!(apply_unary(OperatorId::Sinh, 1.0).is_err());
/// ```
pub fn apply_unary(id: OperatorId, x: f64) -> EvalResult<f64> {
    let value = match id {
        OperatorId::Add => x,
        OperatorId::Subtract => -x,
        OperatorId::Abs => x.abs(),
        OperatorId::Acos => x.acos(),
        OperatorId::Asin => x.asin(),
        OperatorId::Atan => x.atan(),
        OperatorId::Cos => x.cos(),
        OperatorId::Exp => x.exp(),
        OperatorId::Log => x.ln(),
        OperatorId::Log10 => x.log10(),
        OperatorId::Sin => x.sin(),
        OperatorId::Sqrt => x.sqrt(),
        OperatorId::Tan => x.tan(),
        OperatorId::Floor => x.floor(),
        _ => return Err(unsupported(id, Arity::Unary)),
    };

    if (value.is_nan() && !x.is_nan()) || (value.is_infinite() && x.is_finite()) {
        return Err(EvalError::Domain { operator: id.to_string(),
                                       argument: x.to_string() });
    }
    Ok(value)
}

/// Applies an infix operator as `lhs OP rhs`.
///
/// Comparisons produce `1.0` for true and `0.0` for false.
///
/// # Errors
/// - [`EvalError::DivisionByZero`] when dividing by zero.
/// - [`EvalError::Domain`] when `**` has no finite real result.
/// - [`EvalError::UnsupportedOperator`] for `->` and function names.
///
/// # Example
/// ```
/// use expreval::interpreter::{evaluator::apply_binary, token::OperatorId};
///
/// assert_eq!(apply_binary(OperatorId::Subtract, 10.0, 4.0).unwrap(), 6.0);
/// assert_eq!(apply_binary(OperatorId::Power, 2.0, 10.0).unwrap(), 1024.0);
/// assert_eq!(apply_binary(OperatorId::LessEqual, 0.2, 0.6).unwrap(), 1.0);
/// assert!(apply_binary(OperatorId::Divide, 1.0, 0.0).is_err());
/// ```
#[allow(clippy::float_cmp)]
pub fn apply_binary(id: OperatorId, lhs: f64, rhs: f64) -> EvalResult<f64> {
    let value = match id {
        OperatorId::Add => lhs + rhs,
        OperatorId::Subtract => lhs - rhs,
        OperatorId::Multiply => lhs * rhs,
        OperatorId::Divide => {
            if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            lhs / rhs
        },
        OperatorId::Power => {
            let value = lhs.powf(rhs);
            let finite = lhs.is_finite() && rhs.is_finite();
            if (value.is_nan() && !lhs.is_nan() && !rhs.is_nan()) || (value.is_infinite() && finite) {
                return Err(EvalError::Domain { operator: id.to_string(),
                                               argument: format!("{lhs}, {rhs}") });
            }
            value
        },
        OperatorId::Equal => truth(lhs == rhs),
        OperatorId::NotEqual => truth(lhs != rhs),
        OperatorId::Greater => truth(lhs > rhs),
        OperatorId::GreaterEqual => truth(lhs >= rhs),
        OperatorId::Less => truth(lhs < rhs),
        OperatorId::LessEqual => truth(lhs <= rhs),
        _ => return Err(unsupported(id, Arity::Binary)),
    };
    Ok(value)
}

/// Decides whether a postfix sequence yields a boolean.
///
/// A single token must be an operand and is never boolean. A longer sequence
/// must end in an operator, and is boolean when that operator is.
///
/// # Errors
/// Returns [`EvalError::MalformedPostfix`] when the sequence is empty or its
/// last token breaks the rules above.
pub fn classify(postfix: &[Token]) -> EvalResult<bool> {
    match postfix {
        [] => Err(EvalError::MalformedPostfix { details: "no tokens".to_string() }),
        [single] if single.is_operand() => Ok(false),
        [_] => Err(EvalError::MalformedPostfix { details: "single token is not an operand".to_string() }),
        [.., Token::Operator(last)] => Ok(last.is_boolean()),
        [..] => Err(EvalError::MalformedPostfix { details: "last token is not an operator".to_string() }),
    }
}

fn truth(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

fn unsupported(id: OperatorId, arity: Arity) -> EvalError {
    EvalError::UnsupportedOperator { operator: id.to_string(),
                                     arity:    arity.count() }
}
