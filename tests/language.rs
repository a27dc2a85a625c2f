use std::{collections::HashMap, sync::Arc};

use expreval::{EvalError, Expression, ParameterTable, SharedProvider};

fn provider(pairs: &[(&str, f64)]) -> Arc<ParameterTable> {
    Arc::new(pairs.iter().map(|&(name, value)| (name, value)).collect())
}

fn empty() -> SharedProvider {
    Arc::new(HashMap::<String, f64>::new())
}

fn generated(src: &str, provider: SharedProvider) -> Expression {
    let mut expr = Expression::with_text("test", provider, src);
    expr.generate()
        .unwrap_or_else(|e| panic!("Failed to generate '{src}': {e}"));
    expr
}

fn value_of(src: &str) -> f64 {
    generated(src, empty()).value()
                           .unwrap_or_else(|e| panic!("Failed to evaluate '{src}': {e}"))
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[test]
fn literal_expressions_are_repeatable() {
    let expr = generated("2.5*4-1", empty());
    let first = expr.value().unwrap();
    assert_eq!(first, 9.0);
    assert_eq!(expr.value().unwrap(), first);
    assert_eq!(expr.value().unwrap(), first);
}

#[test]
fn multiplication_binds_before_addition() {
    assert_eq!(value_of("1+5+6*2"), 18.0);
    assert_eq!(value_of("10-4-3"), 3.0);
    assert_eq!(value_of("8/4/2"), 1.0);
    assert_eq!(value_of("2*3**2"), 18.0);
}

#[test]
fn unary_operators() {
    assert_close(value_of("-45.67"), -45.67);
    assert_eq!(value_of("+3"), 3.0);
    assert_eq!(value_of("2*-3"), -6.0);
    assert_eq!(value_of("--3"), 3.0);
    assert_eq!(value_of("-abs(-4)"), -4.0);
    assert_eq!(value_of("abs-3"), 3.0);
}

#[test]
fn function_with_parenthesized_operand() {
    assert_close(value_of("100*sqrt(3.0)"), 100.0 * 3.0_f64.sqrt());
    assert_close(value_of("exp(log(5))"), 5.0);
    assert_close(value_of("log10(1000)"), 3.0);
    assert_eq!(value_of("floor(2.7)+floor(-2.5)"), -1.0);
    assert_close(value_of("sin(0)+cos(0)+tan(0)"), 1.0);
    assert_close(value_of("asin(1)*2"), std::f64::consts::PI);
    assert_close(value_of("acos(1)+atan(0)"), 0.0);
}

#[test]
fn nested_groups_with_variables() {
    let vars = provider(&[("A", 10.0), ("B", 20.0), ("C", 40.0), ("D", 30.0)]);
    let expr = generated("(A+B)*(D+C)", vars);
    assert!(expr.is_ok());
    assert_eq!(expr.value().unwrap(), 2100.0);
    assert_eq!(value_of("((1+2)*(3+(4-1)))/2"), 9.0);
}

#[test]
fn power_is_left_associative() {
    assert_eq!(value_of("2**3**2"), 64.0);
    assert_eq!(value_of("2**(3**2)"), 512.0);
    assert_eq!(value_of("-2**2"), 4.0);
}

#[test]
fn boolean_classification() {
    let expr = generated("50.0<55.0", empty());
    assert!(expr.is_boolean().unwrap());
    assert_eq!(expr.value().unwrap(), 1.0);

    let expr = generated("1+2", empty());
    assert!(!expr.is_boolean().unwrap());
    assert_eq!(expr.value().unwrap(), 3.0);

    let expr = generated("42", empty());
    assert!(!expr.is_boolean().unwrap());

    let expr = generated("(1<2)", empty());
    assert!(!expr.is_boolean().unwrap());
}

#[test]
fn comparison_operators() {
    assert_eq!(value_of("2==2"), 1.0);
    assert_eq!(value_of("2!=2"), 0.0);
    assert_eq!(value_of("3>2"), 1.0);
    assert_eq!(value_of("2>=3"), 0.0);
    assert_eq!(value_of("2<=2"), 1.0);
    assert_eq!(value_of("1+1 == 2"), 1.0);
}

#[test]
fn compound_boolean_with_function_and_variable() {
    let vars = provider(&[("supply12V", 12.0)]);
    let expr = generated("abs(supply12V - 12.0) <= 12.0*0.05", vars);
    assert!(expr.is_boolean().unwrap());
    assert_eq!(expr.value().unwrap(), 1.0);
}

#[test]
fn unresolved_variable_is_soft_until_evaluated() {
    let vars = provider(&[("A", 1.0)]);
    let expr = generated("A + StdDev", vars.clone());

    assert!(!expr.is_ok());
    assert!(!expr.validate());
    assert_eq!(expr.unresolved_vars(), ["StdDev"]);
    assert_eq!(expr.value(),
               Err(EvalError::UnresolvedVariable { name: "StdDev".to_string() }));

    vars.set("StdDev", 2.0);
    assert!(expr.is_ok());
    assert_eq!(expr.value().unwrap(), 3.0);

    vars.remove("A");
    assert!(!expr.validate());
}

#[test]
fn variables_are_case_sensitive() {
    let expr = generated("a*2", provider(&[("A", 1.0)]));
    assert!(!expr.is_ok());
}

#[test]
fn reevaluation_tracks_live_values() {
    let vars = provider(&[("A", 1.0), ("B", 2.0)]);
    let mut expr = generated("(A+B)*2", vars.clone());

    assert_eq!(expr.update_value().unwrap(), 6.0);
    assert_eq!(expr.last_value(), Some(6.0));

    vars.set("B", 4.0);
    assert_eq!(expr.update_value().unwrap(), 10.0);
    assert_eq!(expr.last_value(), Some(10.0));
}

#[test]
fn vars_are_flattened_in_postfix_order() {
    let vars = provider(&[]);
    let expr = generated("(A+B)*(D+C) - abs(A)", vars);
    assert_eq!(expr.vars(), ["A", "B", "D", "C", "A"]);
}

#[test]
fn evaluation_before_generate_is_error() {
    let expr = Expression::with_text("late", empty(), "1+2");
    assert_eq!(expr.value(), Err(EvalError::NotGenerated { name: "late".to_string() }));
    assert_eq!(expr.is_boolean(), Err(EvalError::NotGenerated { name: "late".to_string() }));
}

#[test]
fn set_expression_requires_new_generate() {
    let mut expr = generated("1+2", empty());
    expr.set_expression("3*3");
    assert_eq!(expr.expression(), "3*3");
    assert!(expr.value().is_err());

    expr.generate().unwrap();
    assert_eq!(expr.value().unwrap(), 9.0);
}

#[test]
fn generate_is_idempotent() {
    let mut expr = generated("1+2*3", empty());
    let postfix = expr.postfix().to_vec();
    expr.generate().unwrap();
    assert_eq!(expr.postfix(), postfix.as_slice());
    assert_eq!(expr.value().unwrap(), 7.0);
}

#[test]
fn failed_generate_clears_tokens() {
    let mut expr = generated("1+2", empty());
    expr.set_expression("1 ! 2");
    assert!(expr.generate().is_err());
    assert!(expr.infix().is_empty());
    assert!(expr.postfix().is_empty());
}

#[test]
fn whitespace_is_ignored() {
    assert_eq!(value_of("  1 +\t2 *  3 "), 7.0);
    assert_eq!(value_of("2 * * 3"), 8.0);
}

#[test]
fn numbers_in_every_form() {
    assert_eq!(value_of(".5"), 0.5);
    assert_eq!(value_of("1.5e2"), 150.0);
    assert_close(value_of("30e-12"), 30e-12);
    assert_eq!(value_of("2E3"), 2000.0);
    assert_eq!(value_of("7"), 7.0);
}

#[test]
fn operator_failures() {
    let err = |src: &str| generated(src, empty()).value().unwrap_err();

    assert_eq!(err("1/0"), EvalError::DivisionByZero);
    assert!(matches!(err("sqrt(-1)"), EvalError::Domain { .. }));
    assert!(matches!(err("log(-2)"), EvalError::Domain { .. }));
    assert_eq!(err("sinh(1)"),
               EvalError::UnsupportedOperator { operator: "sinh".to_string(),
                                                arity:    1, });
    assert_eq!(err("1->2"),
               EvalError::UnsupportedOperator { operator: "->".to_string(),
                                                arity:    2, });
}

#[test]
fn errors_inside_groups_propagate() {
    let expr = generated("2*(1/0)", empty());
    assert_eq!(expr.value(), Err(EvalError::DivisionByZero));
}

#[test]
fn result_kind_ordering() {
    let numeric = generated("1+2", empty());
    let boolean = generated("1<2", empty());
    assert_eq!(numeric.cmp_result_kind(&boolean).unwrap(), std::cmp::Ordering::Less);
    assert_eq!(boolean.cmp_result_kind(&numeric).unwrap(), std::cmp::Ordering::Greater);
    assert_eq!(numeric.cmp_result_kind(&numeric).unwrap(), std::cmp::Ordering::Equal);
}

#[test]
fn one_shot_evaluate() {
    assert_eq!(expreval::evaluate("6*7", empty()).unwrap(), 42.0);
    assert!(matches!(expreval::evaluate("6*", empty()),
                     Err(expreval::Error::Parse(_))));
    assert!(matches!(expreval::evaluate("x", empty()),
                     Err(expreval::Error::Eval(_))));
}
