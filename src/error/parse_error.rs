use thiserror::Error;

use crate::interpreter::lexer::ScanState;

/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character is not valid for the scanner state it was read in, or a
    /// two character operator (`==`, `!=`) is missing its second character.
    #[error("Parse error on '{ch}' 0x{code:X}. State: {state}")]
    Lex {
        /// The offending character.
        ch:    char,
        /// Its code point.
        code:  u32,
        /// The scanner state the character was read in.
        state: ScanState,
    },
    /// The input ended inside a parenthesized group.
    #[error("Unclosed parenthesis: input ended at nesting depth {depth}")]
    UnclosedParen {
        /// How many groups were still open.
        depth: usize,
    },
    /// The text holds nothing but whitespace.
    #[error("Expression is empty")]
    EmptyExpression,
    /// A `()` pair with nothing inside.
    #[error("Empty parenthesis group")]
    EmptyGroup,
    /// An integer literal cannot be represented exactly as a floating point
    /// value.
    #[error("Literal '{literal}' is too large")]
    LiteralTooLarge {
        /// The literal as written.
        literal: String,
    },
    /// The token stream could not be arranged into postfix order.
    #[error("Structure error: {details}")]
    Structure {
        /// What went wrong.
        details: String,
    },
}

impl ParseError {
    /// Builds a [`ParseError::Lex`] for `ch` read in `state`.
    ///
    /// # Example
    /// ```
    /// use expreval::{error::ParseError, interpreter::lexer::ScanState};
    ///
    /// let err = ParseError::lex('!', ScanState::Top);
    /// assert_eq!(err.to_string(), "Parse error on '!' 0x21. State: TOP");
    /// ```
    #[must_use]
    pub fn lex(ch: char, state: ScanState) -> Self {
        Self::Lex { ch,
                    code: u32::from(ch),
                    state }
    }
}
