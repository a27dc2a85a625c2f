use std::{fs, path::Path, sync::Arc};

use expreval::{Expression, ParameterTable};
use walkdir::WalkDir;

/// What a case line expects from its expression.
enum Expected {
    Number(f64),
    Boolean(bool),
    Failure,
}

fn parse_expected(text: &str) -> Expected {
    match text {
        "true" => Expected::Boolean(true),
        "false" => Expected::Boolean(false),
        "error" => Expected::Failure,
        number => Expected::Number(number.parse()
                                         .unwrap_or_else(|e| panic!("Bad expected value '{number}': {e}"))),
    }
}

/// Runs every case in one file. Returns the number of cases.
///
/// Lines are either `@ NAME = VALUE` bindings, which apply to every later
/// case in the file, or `EXPRESSION => EXPECTED`.
fn run_case_file(path: &Path) -> usize {
    let content = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
    let table = Arc::new(ParameterTable::new());
    let mut count = 0;

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(binding) = line.strip_prefix('@') {
            let (name, value) = binding.split_once('=')
                                       .unwrap_or_else(|| panic!("Bad binding on line {}", number + 1));
            table.set(name.trim(), value.trim().parse().expect("binding value"));
            continue;
        }

        let (src, expected) = line.rsplit_once("=>")
                                  .unwrap_or_else(|| panic!("Missing '=>' on line {}", number + 1));
        let (src, expected) = (src.trim(), parse_expected(expected.trim()));
        count += 1;

        let mut expr = Expression::with_text(format!("{}:{}", path.display(), number + 1),
                                             table.clone(),
                                             src);
        let outcome = expr.generate()
                          .map_err(|e| e.to_string())
                          .and_then(|()| expr.value().map_err(|e| e.to_string()));

        match (expected, outcome) {
            (Expected::Failure, Err(_)) => {},
            (Expected::Failure, Ok(value)) => {
                panic!("{}: '{src}' evaluated to {value} but was expected to fail", expr.name())
            },
            (_, Err(e)) => panic!("{}: '{src}' failed: {e}", expr.name()),
            (Expected::Boolean(truth), Ok(value)) => {
                assert!(expr.is_boolean().unwrap(), "{}: '{src}' is not boolean", expr.name());
                assert_eq!(value, if truth { 1.0 } else { 0.0 }, "{}: '{src}'", expr.name());
            },
            (Expected::Number(want), Ok(value)) => {
                let tolerance = 1e-9 * want.abs().max(1.0);
                assert!((value - want).abs() <= tolerance,
                        "{}: '{src}' evaluated to {value}, expected {want}",
                        expr.name());
            },
        }
    }

    count
}

#[test]
fn case_files_evaluate_as_expected() {
    let mut count = 0;

    for entry in WalkDir::new("tests/cases").into_iter()
                                            .filter_map(Result::ok)
                                            .filter(|e| {
                                                e.path().extension().is_some_and(|ext| ext == "expr")
                                            })
    {
        count += run_case_file(entry.path());
    }

    assert!(count > 0, "No expression cases found in tests/cases");
}
