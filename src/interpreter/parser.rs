use crate::{
    error::ParseError,
    interpreter::token::{Operator, Token},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Rearranges infix tokens into postfix order.
///
/// Operands go straight to the output. A binary operator first pops every
/// stacked operator whose precedence is not strictly lower than its own, so
/// operators of equal precedence (`**` included) associate to the left. A
/// prefix operator has no left operand and is pushed without popping. The
/// remaining stack is emitted last.
///
/// # Errors
/// Returns [`ParseError::Structure`] when the result is not a well formed
/// postfix program, i.e. some operator lacks operands or more than one value
/// would remain, and [`ParseError::EmptyExpression`] when there are no tokens
/// at all.
///
/// # Example
/// ```
/// use std::{collections::HashMap, sync::Arc};
///
/// use expreval::interpreter::{lexer::scan, parser::to_postfix, provider::SharedProvider};
///
/// let provider: SharedProvider = Arc::new(HashMap::<String, f64>::new());
/// let infix = scan("1+5+6*2", &provider).unwrap();
/// let postfix = to_postfix(&infix).unwrap();
/// let text: Vec<String> = postfix.iter().map(|t| t.to_string()).collect();
/// assert_eq!(text,
///            ["Int        : 1",
///             "Int        : 5",
///             "Operator   : +",
///             "Int        : 6",
///             "Int        : 2",
///             "Operator   : *",
///             "Operator   : +"]);
/// ```
pub fn to_postfix(infix: &[Token]) -> ParseResult<Vec<Token>> {
    let mut output = Vec::with_capacity(infix.len());
    let mut stack: Vec<Operator> = Vec::new();

    for token in infix {
        let Token::Operator(operator) = token else {
            output.push(token.clone());
            continue;
        };

        if !operator.is_prefix() {
            while let Some(top) = stack.last() {
                if operator.precedence() > top.precedence() {
                    break;
                }
                output.extend(stack.pop().map(Token::Operator));
            }
        }
        stack.push(*operator);
    }

    output.extend(stack.into_iter().rev().map(Token::Operator));

    check_shape(&output)?;
    Ok(output)
}

/// Verifies that `postfix` leaves exactly one value when executed.
fn check_shape(postfix: &[Token]) -> ParseResult<()> {
    if postfix.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    let mut depth = 0usize;
    for token in postfix {
        match token {
            Token::Operator(operator) => {
                let needed = operator.arity.count();
                if depth < needed {
                    return Err(ParseError::Structure { details: format!("operator '{}' is missing an operand",
                                                                        operator.id) });
                }
                depth = depth - needed + 1;
            },
            _ => depth += 1,
        }
    }

    if depth != 1 {
        return Err(ParseError::Structure { details: format!("{depth} operands are not joined by an operator") });
    }
    Ok(())
}
