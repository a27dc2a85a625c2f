use std::sync::Arc;

use expreval::{EvalError, Expression, ParameterTable, interpreter::schedule::evaluation_order};

fn generate_all(table: &Arc<ParameterTable>, sources: &[(&str, &str)]) -> Vec<Expression> {
    sources.iter()
           .map(|&(name, src)| {
               let mut expr = Expression::with_text(name, table.clone(), src);
               expr.generate()
                   .unwrap_or_else(|e| panic!("Failed to generate '{src}': {e}"));
               expr
           })
           .collect()
}

#[test]
fn dependencies_come_first() {
    let table = Arc::new(ParameterTable::from([("Vin", 12.0), ("Iin", 0.5)]));
    let exprs = generate_all(&table,
                             &[("pass", "efficiency >= 0.8"),
                               ("efficiency", "Pout / Pin"),
                               ("Pin", "Vin * Iin"),
                               ("Pout", "Pin - 1")]);

    assert_eq!(evaluation_order(&exprs).unwrap(), [2, 3, 1, 0]);
}

#[test]
fn numeric_results_before_booleans() {
    let table = Arc::new(ParameterTable::new());
    let exprs = generate_all(&table, &[("a", "1<2"), ("b", "1+2"), ("c", "3==3"), ("d", "4")]);

    assert_eq!(evaluation_order(&exprs).unwrap(), [1, 3, 0, 2]);
}

#[test]
fn cycles_are_reported() {
    let table = Arc::new(ParameterTable::new());
    let exprs = generate_all(&table, &[("x", "y + 1"), ("y", "x * 2"), ("z", "3")]);

    assert_eq!(evaluation_order(&exprs),
               Err(EvalError::DependencyCycle { names: vec!["x".to_string(), "y".to_string()] }));

    let exprs = generate_all(&table, &[("self", "self + 1")]);
    assert_eq!(evaluation_order(&exprs),
               Err(EvalError::DependencyCycle { names: vec!["self".to_string()] }));
}

#[test]
fn cycle_report_excludes_downstream_expressions() {
    let table = Arc::new(ParameterTable::new());
    let exprs = generate_all(&table,
                             &[("w", "x - 1"), ("x", "y + 1"), ("y", "x * 2"), ("z", "w > 0")]);

    assert_eq!(evaluation_order(&exprs),
               Err(EvalError::DependencyCycle { names: vec!["x".to_string(), "y".to_string()] }));
}

#[test]
fn repeated_references_count_once() {
    let table = Arc::new(ParameterTable::new());
    let exprs = generate_all(&table, &[("sq", "n * n + n"), ("n", "3")]);

    assert_eq!(evaluation_order(&exprs).unwrap(), [1, 0]);
}

#[test]
fn ordered_results_feed_later_expressions() {
    let table = Arc::new(ParameterTable::from([("Vin", 12.0), ("Iin", 0.5)]));
    let mut exprs = generate_all(&table,
                                 &[("pass", "(Pout / Pin) >= 0.8"),
                                   ("Pout", "Pin - 1"),
                                   ("Pin", "Vin * Iin")]);

    assert!(!exprs[0].is_ok());

    for i in evaluation_order(&exprs).unwrap() {
        let expr = &mut exprs[i];
        assert!(expr.validate(), "{} should resolve", expr.name());
        let value = expr.update_value().unwrap();
        table.set(expr.name(), value);
    }

    assert_eq!(exprs[2].last_value(), Some(6.0));
    assert_eq!(exprs[1].last_value(), Some(5.0));
    assert_eq!(exprs[0].last_value(), Some(1.0));
}

#[test]
fn ungenerated_expressions_cannot_be_ordered() {
    let table = Arc::new(ParameterTable::new());
    let exprs = vec![Expression::with_text("raw", table, "1+1")];
    assert!(matches!(evaluation_order(&exprs), Err(EvalError::NotGenerated { .. })));
}
