use std::{fmt, sync::Arc};

use ordered_float::OrderedFloat;

use crate::interpreter::expression::Expression;

/// Precedence shared by unary `+`/`-` and every named function.
pub const PREFIX_PRECEDENCE: u8 = 25;

/// Largest integer magnitude exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INT: i64 = 9_007_199_254_740_991;

/// Number of values an operator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Prefix operator or function: one operand.
    Unary,
    /// Infix operator: two operands.
    Binary,
}

impl Arity {
    /// Returns the operand count as a number.
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Unary => 1,
            Self::Binary => 2,
        }
    }
}

/// Identifies an operator symbol or a built-in function name.
///
/// Every identifier maps to a fixed row of the operator table: its source
/// text, its binary precedence and whether it produces a boolean result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `**`
    Power,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `->`, recognized but without evaluation semantics.
    Arrow,
    /// `abs`
    Abs,
    /// `acos`
    Acos,
    /// `asin`
    Asin,
    /// `atan`
    Atan,
    /// `cos`
    Cos,
    /// `cosh`
    Cosh,
    /// `exp`
    Exp,
    /// `log`
    Log,
    /// `log10`
    Log10,
    /// `sin`
    Sin,
    /// `sinh`
    Sinh,
    /// `sqrt`
    Sqrt,
    /// `tan`
    Tan,
    /// `tanh`
    Tanh,
    /// `floor`
    Floor,
}

impl OperatorId {
    /// Every operator, in table order.
    pub const ALL: [Self; 27] = [Self::Add,
                                 Self::Subtract,
                                 Self::Multiply,
                                 Self::Divide,
                                 Self::Power,
                                 Self::Equal,
                                 Self::NotEqual,
                                 Self::Greater,
                                 Self::GreaterEqual,
                                 Self::Less,
                                 Self::LessEqual,
                                 Self::Arrow,
                                 Self::Abs,
                                 Self::Acos,
                                 Self::Asin,
                                 Self::Atan,
                                 Self::Cos,
                                 Self::Cosh,
                                 Self::Exp,
                                 Self::Log,
                                 Self::Log10,
                                 Self::Sin,
                                 Self::Sinh,
                                 Self::Sqrt,
                                 Self::Tan,
                                 Self::Tanh,
                                 Self::Floor];

    /// Returns the `(symbol, precedence, is_boolean)` row of the operator
    /// table.
    const fn row(self) -> (&'static str, u8, bool) {
        match self {
            Self::Add => ("+", 10, false),
            Self::Subtract => ("-", 10, false),
            Self::Multiply => ("*", 20, false),
            Self::Divide => ("/", 20, false),
            Self::Power => ("**", 22, false),
            Self::Equal => ("==", 5, true),
            Self::NotEqual => ("!=", 5, true),
            Self::Greater => (">", 5, true),
            Self::GreaterEqual => (">=", 5, true),
            Self::Less => ("<", 5, true),
            Self::LessEqual => ("<=", 5, true),
            Self::Arrow => ("->", 30, false),
            Self::Abs => ("abs", PREFIX_PRECEDENCE, false),
            Self::Acos => ("acos", PREFIX_PRECEDENCE, false),
            Self::Asin => ("asin", PREFIX_PRECEDENCE, false),
            Self::Atan => ("atan", PREFIX_PRECEDENCE, false),
            Self::Cos => ("cos", PREFIX_PRECEDENCE, false),
            Self::Cosh => ("cosh", PREFIX_PRECEDENCE, false),
            Self::Exp => ("exp", PREFIX_PRECEDENCE, false),
            Self::Log => ("log", PREFIX_PRECEDENCE, false),
            Self::Log10 => ("log10", PREFIX_PRECEDENCE, false),
            Self::Sin => ("sin", PREFIX_PRECEDENCE, false),
            Self::Sinh => ("sinh", PREFIX_PRECEDENCE, false),
            Self::Sqrt => ("sqrt", PREFIX_PRECEDENCE, false),
            Self::Tan => ("tan", PREFIX_PRECEDENCE, false),
            Self::Tanh => ("tanh", PREFIX_PRECEDENCE, false),
            Self::Floor => ("floor", PREFIX_PRECEDENCE, false),
        }
    }

    /// Looks up an operator by its source text.
    ///
    /// # Example
    /// ```
    /// use expreval::interpreter::token::OperatorId;
    ///
    /// assert_eq!(OperatorId::from_symbol("**"), Some(OperatorId::Power));
    /// assert_eq!(OperatorId::from_symbol("log10"), Some(OperatorId::Log10));
    /// assert_eq!(OperatorId::from_symbol("supply12V"), None);
    /// ```
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.symbol() == symbol)
    }

    /// The operator as written in source text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        self.row().0
    }

    /// Precedence of the operator in its table form.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        self.row().1
    }

    /// Whether the operator produces a boolean (`1.0`/`0.0`) result.
    #[must_use]
    pub const fn is_boolean(self) -> bool {
        self.row().2
    }

    /// Whether the operator is a named function such as `sqrt`.
    #[must_use]
    pub fn is_function(self) -> bool {
        self.symbol().starts_with(|c: char| c.is_ascii_alphabetic())
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An operator token: which operator, and how many operands it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operator {
    /// The operator.
    pub id:    OperatorId,
    /// Its operand count in this position.
    pub arity: Arity,
}

impl Operator {
    /// An infix operator.
    #[must_use]
    pub const fn binary(id: OperatorId) -> Self {
        Self { id,
               arity: Arity::Binary }
    }

    /// A prefix operator or function.
    #[must_use]
    pub const fn unary(id: OperatorId) -> Self {
        Self { id,
               arity: Arity::Unary }
    }

    /// Precedence used when arranging operators into postfix order.
    ///
    /// Unary `+` and `-` bind as tightly as functions; every other operator
    /// takes its table precedence.
    ///
    /// # Example
    /// ```
    /// use expreval::interpreter::token::{Operator, OperatorId};
    ///
    /// assert_eq!(Operator::binary(OperatorId::Subtract).precedence(), 10);
    /// assert_eq!(Operator::unary(OperatorId::Subtract).precedence(), 25);
    /// ```
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match (self.arity, self.id) {
            (Arity::Unary, OperatorId::Add | OperatorId::Subtract) => PREFIX_PRECEDENCE,
            _ => self.id.precedence(),
        }
    }

    /// Whether this operator produces a boolean result.
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        self.id.is_boolean()
    }

    /// Whether this operator is written before its single operand.
    #[must_use]
    pub fn is_prefix(&self) -> bool {
        self.arity == Arity::Unary
    }
}

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Literal written without `.`, `e` or `E`.
    Int(i64),
    /// Literal written with a decimal point or an exponent.
    Float(OrderedFloat<f64>),
}

impl Constant {
    /// The literal as a floating point value.
    ///
    /// Integer literals are bounded by [`MAX_SAFE_INT`] when lexed, so the
    /// conversion is exact.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(x) => x.0,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{}", x.0),
        }
    }
}

/// A lexical unit of an expression.
///
/// Tokens are either operands, which produce a value directly, or operators,
/// which consume one or two values and produce one.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal.
    Constant(Constant),
    /// A named value resolved against the parameter provider when evaluated.
    Variable(String),
    /// An operator or function.
    Operator(Operator),
    /// A parenthesized sub-expression, generated when it was scanned.
    Group(Arc<Expression>),
}

impl Token {
    /// Whether the token produces a value directly.
    #[must_use]
    pub const fn is_operand(&self) -> bool {
        !self.is_operator()
    }

    /// Whether the token consumes values.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }

    /// Short name of the token kind, used in token dumps.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Constant(Constant::Int(_)) => "Int",
            Self::Constant(Constant::Float(_)) => "Float",
            Self::Variable(_) => "Variable",
            Self::Operator(_) => "Operator",
            Self::Group(_) => "Expression",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<10} : ", self.kind())?;
        match self {
            Self::Constant(c) => write!(f, "{c}"),
            Self::Variable(name) => f.write_str(name),
            Self::Operator(op) => write!(f, "{}", op.id),
            Self::Group(expr) => f.write_str(expr.expression()),
        }
    }
}
