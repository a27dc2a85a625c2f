use std::{fmt, sync::Arc};

use ordered_float::OrderedFloat;

use crate::{
    error::ParseError,
    interpreter::{
        expression::Expression,
        parser::ParseResult,
        provider::SharedProvider,
        token::{Constant, MAX_SAFE_INT, Operator, OperatorId, Token},
    },
};

/// Appended to the stripped input so every pending token is flushed.
const SENTINEL: char = ' ';

/// Characters that may start an operator symbol or a parenthesis.
const OPERATOR_CHARS: &str = "+-*/=!()<>";

/// States of the character scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    /// Start of input or just after an operator; `+`/`-` here are unary.
    Start,
    /// Between tokens.
    Top,
    /// Inside a variable or function name.
    Name,
    /// Inside the integer part of a number.
    Number,
    /// Inside the decimal part of a number.
    NumberDec,
    /// Inside the exponent of a number.
    NumberExp,
    /// Capturing the contents of a parenthesized group.
    Paren,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Start => "START",
                        Self::Top => "TOP",
                        Self::Name => "NAME",
                        Self::Number => "NUMBER",
                        Self::NumberDec => "NUMBER_DEC",
                        Self::NumberExp => "NUMBER_EXP",
                        Self::Paren => "PARAN",
                    })
    }
}

/// Scans one line of expression text into infix tokens.
///
/// Whitespace is removed before scanning. Each parenthesized group is
/// captured whole, generated as its own [`Expression`] sharing `provider`, and
/// emitted as a single [`Token::Group`] operand.
///
/// # Errors
/// - [`ParseError::Lex`] for a character that is invalid in the current
///   state, including `=` or `!` without a following `=`.
/// - [`ParseError::UnclosedParen`] and [`ParseError::EmptyGroup`] for
///   unbalanced or empty groups.
/// - [`ParseError::LiteralTooLarge`] for integers beyond `±(2^53 - 1)`.
/// - Any error raised while generating a nested group.
///
/// # Example
/// ```
/// use std::{collections::HashMap, sync::Arc};
///
/// use expreval::interpreter::{lexer::scan, provider::SharedProvider};
///
/// let provider: SharedProvider = Arc::new(HashMap::<String, f64>::new());
/// let tokens = scan("-x >= 2.5e-3", &provider).unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
/// assert_eq!(kinds, ["Operator", "Variable", "Operator", "Float"]);
/// ```
pub fn scan(text: &str, provider: &SharedProvider) -> ParseResult<Vec<Token>> {
    Scanner::new(text, provider).run()
}

struct Scanner<'p> {
    chars:    Vec<char>,
    index:    usize,
    state:    ScanState,
    pending:  String,
    depth:    usize,
    tokens:   Vec<Token>,
    provider: &'p SharedProvider,
}

impl<'p> Scanner<'p> {
    fn new(text: &str, provider: &'p SharedProvider) -> Self {
        let chars = text.chars()
                        .filter(|c| !c.is_whitespace())
                        .chain(std::iter::once(SENTINEL))
                        .collect();

        Self { chars,
               index: 0,
               state: ScanState::Start,
               pending: String::new(),
               depth: 0,
               tokens: Vec::new(),
               provider }
    }

    fn run(mut self) -> ParseResult<Vec<Token>> {
        while let Some(&ch) = self.chars.get(self.index) {
            self.index += 1;

            match self.state {
                ScanState::Start => self.start(ch),
                ScanState::Top => self.top(ch)?,
                ScanState::Name => self.name(ch),
                ScanState::Number | ScanState::NumberDec => self.number(ch)?,
                ScanState::NumberExp => self.exponent(ch)?,
                ScanState::Paren => self.paren(ch)?,
            }
        }

        if self.state == ScanState::Paren {
            return Err(ParseError::UnclosedParen { depth: self.depth });
        }

        Ok(self.tokens)
    }

    /// The character after the one being processed.
    fn peek(&self) -> char {
        self.chars.get(self.index).copied().unwrap_or(SENTINEL)
    }

    /// Re-reads the current character in `state`.
    fn reread_in(&mut self, state: ScanState) {
        self.index -= 1;
        self.state = state;
    }

    fn push_operator(&mut self, operator: Operator) {
        self.tokens.push(Token::Operator(operator));
        self.state = ScanState::Start;
    }

    fn start(&mut self, ch: char) {
        match ch {
            '+' => self.push_operator(Operator::unary(OperatorId::Add)),
            '-' => self.push_operator(Operator::unary(OperatorId::Subtract)),
            SENTINEL => {},
            _ => self.reread_in(ScanState::Top),
        }
    }

    fn top(&mut self, ch: char) -> ParseResult<()> {
        match ch {
            SENTINEL => {},
            c if c.is_ascii_alphabetic() => self.begin(c, ScanState::Name),
            c if c.is_ascii_digit() => self.begin(c, ScanState::Number),
            '.' => {
                self.pending.clear();
                self.pending.push_str("0.");
                self.state = ScanState::NumberDec;
            },
            '(' => {
                self.depth = 1;
                self.pending.clear();
                self.state = ScanState::Paren;
            },
            ')' => return Err(ParseError::lex(ch, ScanState::Top)),
            c if OPERATOR_CHARS.contains(c) => self.operator(c)?,
            _ => return Err(ParseError::lex(ch, ScanState::Top)),
        }
        Ok(())
    }

    fn begin(&mut self, ch: char, state: ScanState) {
        self.pending.clear();
        self.pending.push(ch);
        self.state = state;
    }

    /// Matches a one or two character operator symbol starting at `ch`.
    fn operator(&mut self, ch: char) -> ParseResult<()> {
        let next = self.peek();
        let mut symbol = String::from(ch);

        match (ch, next) {
            ('-', '>') | ('>' | '<' | '=' | '!', '=') | ('*', '*') => {
                symbol.push(next);
                self.index += 1;
            },
            ('=' | '!', _) => return Err(ParseError::lex(ch, ScanState::Top)),
            _ => {},
        }

        let id = OperatorId::from_symbol(&symbol).ok_or_else(|| ParseError::lex(ch, ScanState::Top))?;
        self.push_operator(Operator::binary(id));
        Ok(())
    }

    fn name(&mut self, ch: char) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            self.pending.push(ch);
            return;
        }

        let name = std::mem::take(&mut self.pending);
        match OperatorId::from_symbol(&name) {
            Some(id) => {
                self.tokens.push(Token::Operator(Operator::unary(id)));
                self.reread_in(ScanState::Start);
            },
            None => {
                self.tokens.push(Token::Variable(name));
                self.reread_in(ScanState::Top);
            },
        }
    }

    fn number(&mut self, ch: char) -> ParseResult<()> {
        match ch {
            c if c.is_ascii_digit() => self.pending.push(c),
            '.' if self.state == ScanState::Number => {
                self.pending.push(ch);
                self.state = ScanState::NumberDec;
            },
            'e' | 'E' => {
                self.pending.push(ch);
                if self.peek() == '-' {
                    self.pending.push('-');
                    self.index += 1;
                }
                self.state = ScanState::NumberExp;
            },
            c if is_terminator(c) => {
                self.flush_number()?;
                self.reread_in(ScanState::Top);
            },
            _ => return Err(ParseError::lex(ch, self.state)),
        }
        Ok(())
    }

    fn exponent(&mut self, ch: char) -> ParseResult<()> {
        match ch {
            c if c.is_ascii_digit() => self.pending.push(c),
            c if is_terminator(c) && self.pending.ends_with(|d: char| d.is_ascii_digit()) => {
                self.flush_number()?;
                self.reread_in(ScanState::Top);
            },
            _ => return Err(ParseError::lex(ch, ScanState::NumberExp)),
        }
        Ok(())
    }

    fn flush_number(&mut self) -> ParseResult<()> {
        let literal = std::mem::take(&mut self.pending);

        let constant = if literal.contains(['.', 'e', 'E']) {
            let value = literal.parse::<f64>()
                               .map_err(|_| ParseError::Structure { details: format!("invalid number '{literal}'") })?;
            Constant::Float(OrderedFloat(value))
        } else {
            match literal.parse::<i64>() {
                Ok(n) if n.abs() <= MAX_SAFE_INT => Constant::Int(n),
                _ => return Err(ParseError::LiteralTooLarge { literal }),
            }
        };

        self.tokens.push(Token::Constant(constant));
        Ok(())
    }

    fn paren(&mut self, ch: char) -> ParseResult<()> {
        match ch {
            '(' => {
                self.depth += 1;
                self.pending.push(ch);
            },
            ')' => {
                self.depth -= 1;
                if self.depth == 0 {
                    self.flush_group()?;
                    self.state = ScanState::Top;
                } else {
                    self.pending.push(ch);
                }
            },
            SENTINEL => {},
            _ => self.pending.push(ch),
        }
        Ok(())
    }

    fn flush_group(&mut self) -> ParseResult<()> {
        let text = std::mem::take(&mut self.pending);
        if text.is_empty() {
            return Err(ParseError::EmptyGroup);
        }

        let mut group = Expression::with_text(text.clone(), Arc::clone(self.provider), text);
        group.generate()?;
        self.tokens.push(Token::Group(Arc::new(group)));
        Ok(())
    }
}

/// Whether `ch` ends a pending number.
fn is_terminator(ch: char) -> bool {
    ch == SENTINEL || OPERATOR_CHARS.contains(ch)
}
