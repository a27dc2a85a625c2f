use std::{cmp::Ordering, fmt};

use tracing::{debug, error, info, trace};

use crate::{
    error::EvalError,
    interpreter::{
        evaluator::{self, EvalResult},
        lexer,
        parser::{self, ParseResult},
        provider::SharedProvider,
        token::Token,
    },
};

/// Which token sequence [`Expression::show`] dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenView {
    /// Tokens in the order they were scanned.
    Infix,
    /// Tokens in evaluation order.
    Postfix,
}

/// A named arithmetic or boolean expression.
///
/// An `Expression` owns its source text and the two token sequences built
/// from it, and holds a shared reference to the [`SharedProvider`] its
/// variables are resolved against. It is built in two steps: `generate()`
/// scans and parses the text once, after which `value()` may be called any
/// number of times, each call looking variables up again.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use expreval::{Expression, ParameterTable};
///
/// let table = Arc::new(ParameterTable::from([("supply12V", 12.0)]));
/// let mut expr =
///     Expression::with_text("supply", table.clone(), "abs(supply12V - 12.0) <= 12.0*0.05");
/// expr.generate().unwrap();
///
/// assert!(expr.is_ok());
/// assert!(expr.is_boolean().unwrap());
/// assert_eq!(expr.value().unwrap(), 1.0);
///
/// table.set("supply12V", 13.0);
/// assert_eq!(expr.value().unwrap(), 0.0);
/// ```
#[derive(Clone)]
pub struct Expression {
    name:       String,
    source:     String,
    infix:      Vec<Token>,
    postfix:    Vec<Token>,
    provider:   SharedProvider,
    last_value: Option<f64>,
}

impl Expression {
    /// Creates an expression with no source text yet.
    #[must_use]
    pub fn new(name: impl Into<String>, provider: SharedProvider) -> Self {
        Self { name: name.into(),
               source: String::new(),
               infix: Vec::new(),
               postfix: Vec::new(),
               provider,
               last_value: None }
    }

    /// Creates an expression holding `text`. The text is not scanned until
    /// [`Expression::generate`] is called.
    #[must_use]
    pub fn with_text(name: impl Into<String>,
                     provider: SharedProvider,
                     text: impl Into<String>)
                     -> Self {
        let mut expr = Self::new(name, provider);
        expr.source = text.into();
        expr
    }

    /// Replaces the source text and discards the generated tokens.
    pub fn set_expression(&mut self, text: impl Into<String>) {
        self.source = text.into();
        self.clear();
    }

    /// The source text.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.source
    }

    /// The name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tokens in scan order; empty until generated.
    #[must_use]
    pub fn infix(&self) -> &[Token] {
        &self.infix
    }

    /// Tokens in evaluation order; empty until generated.
    #[must_use]
    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    /// The provider variables are resolved against.
    #[must_use]
    pub const fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// The value recorded by the last [`Expression::update_value`].
    #[must_use]
    pub const fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    fn clear(&mut self) {
        self.infix.clear();
        self.postfix.clear();
        self.last_value = None;
    }

    /// Scans and parses the source text into infix and postfix tokens.
    ///
    /// Running it again rebuilds both sequences from scratch. Variables are
    /// not looked up here; see [`Expression::validate`].
    ///
    /// # Errors
    /// Returns the [`crate::error::ParseError`] of the failing stage. Both
    /// token sequences are left empty on failure.
    #[tracing::instrument(level = "debug", skip(self), fields(name = %self.name))]
    pub fn generate(&mut self) -> ParseResult<()> {
        self.clear();
        debug!(source = %self.source, "generating expression");

        let infix = lexer::scan(&self.source, &self.provider)?;
        trace!(count = infix.len(), "scan tokens");
        for token in &infix {
            trace!(" {token}");
        }

        let postfix = parser::to_postfix(&infix)?;
        trace!(count = postfix.len(), "postfix tokens");
        for token in &postfix {
            trace!(" {token}");
        }

        self.infix = infix;
        self.postfix = postfix;
        Ok(())
    }

    /// Checks that every variable currently resolves, logging each one that
    /// does not.
    ///
    /// An expression that has not been generated has no variables and
    /// validates trivially.
    #[must_use]
    pub fn validate(&self) -> bool {
        info!(name = %self.name, source = %self.source, "validating expression");

        let missing = self.unresolved_vars();
        for name in &missing {
            error!(expression = %self.name, variable = %name, "variable not found");
        }
        missing.is_empty()
    }

    /// Same check as [`Expression::validate`], without logging.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.postfix.iter().all(|token| match token {
                                    Token::Variable(name) => self.provider.contains(name),
                                    Token::Group(group) => group.is_ok(),
                                    _ => true,
                                })
    }

    /// Every variable name referenced, including inside groups, in postfix
    /// order. Repeated references are listed each time.
    #[must_use]
    pub fn vars(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_vars(&mut names);
        names
    }

    fn collect_vars(&self, names: &mut Vec<String>) {
        for token in &self.postfix {
            match token {
                Token::Variable(name) => names.push(name.clone()),
                Token::Group(group) => group.collect_vars(names),
                _ => {},
            }
        }
    }

    /// The referenced variables that currently have no binding.
    #[must_use]
    pub fn unresolved_vars(&self) -> Vec<String> {
        self.vars()
            .into_iter()
            .filter(|name| !self.provider.contains(name))
            .collect()
    }

    /// Whether the expression yields a boolean (`1.0`/`0.0`) result, decided
    /// by its final operator.
    ///
    /// # Errors
    /// - [`EvalError::NotGenerated`] before [`Expression::generate`].
    /// - [`EvalError::MalformedPostfix`] if the postfix shape is invalid.
    pub fn is_boolean(&self) -> EvalResult<bool> {
        self.ensure_generated()?;
        evaluator::classify(&self.postfix)
    }

    /// Evaluates the expression against the current parameter values.
    ///
    /// # Errors
    /// - [`EvalError::NotGenerated`] before [`Expression::generate`].
    /// - [`EvalError::UnresolvedVariable`] for a variable with no binding.
    /// - Any operator failure, such as [`EvalError::DivisionByZero`].
    pub fn value(&self) -> EvalResult<f64> {
        self.ensure_generated()?;
        evaluator::execute(&self.postfix, self.provider.as_ref())
    }

    /// Evaluates the expression and records the result as
    /// [`Expression::last_value`].
    ///
    /// # Errors
    /// Same as [`Expression::value`]; the recorded value is left unchanged.
    pub fn update_value(&mut self) -> EvalResult<f64> {
        let value = self.value()?;
        debug!(name = %self.name, value, "expression updated");
        self.last_value = Some(value);
        Ok(value)
    }

    /// Orders expressions by result kind: numeric before boolean.
    ///
    /// # Errors
    /// Fails when either expression cannot be classified.
    pub fn cmp_result_kind(&self, other: &Self) -> EvalResult<Ordering> {
        Ok(self.is_boolean()?.cmp(&other.is_boolean()?))
    }

    /// Logs [`Expression::render`] at `info` level.
    pub fn show(&self, view: TokenView) {
        for line in self.render(view) {
            info!("{line}");
        }
    }

    /// Renders the token tree one token per line. Each group is expanded in
    /// place under its own `Expression` header, indented two more spaces.
    #[must_use]
    pub fn render(&self, view: TokenView) -> Vec<String> {
        let mut lines = Vec::new();
        self.render_into(&mut lines, "", view);
        lines
    }

    fn render_into(&self, lines: &mut Vec<String>, indent: &str, view: TokenView) {
        lines.push(format!("{indent}{:<10} : {}", "Expression", self.source));

        let nested = format!("{indent}  ");
        let tokens = match view {
            TokenView::Infix => &self.infix,
            TokenView::Postfix => &self.postfix,
        };
        for token in tokens {
            match token {
                Token::Group(group) => group.render_into(lines, &nested, view),
                _ => lines.push(format!("{nested}{token}")),
            }
        }
    }

    fn ensure_generated(&self) -> EvalResult<()> {
        if self.postfix.is_empty() {
            return Err(EvalError::NotGenerated { name: self.name.clone() });
        }
        Ok(())
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
        && self.source == other.source
        && self.infix == other.infix
        && self.postfix == other.postfix
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
         .field("name", &self.name)
         .field("source", &self.source)
         .field("infix", &self.infix)
         .field("postfix", &self.postfix)
         .field("last_value", &self.last_value)
         .finish_non_exhaustive()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.source)
    }
}
