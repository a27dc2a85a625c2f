use std::{fs, path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use expreval::{Expression, ParameterTable, TokenView, interpreter::schedule::evaluation_order};
use tracing_subscriber::EnvFilter;

/// expreval evaluates arithmetic and boolean expressions against named
/// parameter values.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Reads expressions from a file, one per line, instead of the command
    /// line. Blank lines and lines starting with `#` are skipped.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Binds a parameter, e.g. `-D supply12V=12.1`. May be repeated.
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_binding)]
    defines: Vec<(String, f64)>,

    /// Logs the postfix tokens of each expression before evaluating it.
    #[arg(short, long)]
    show: bool,

    /// Enables debug logging unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    verbose: bool,

    /// Expressions to evaluate. Each result is published as `exprN` so later
    /// expressions can refer to earlier ones.
    expressions: Vec<String>,
}

fn parse_binding(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg.split_once('=')
                           .ok_or_else(|| format!("expected NAME=VALUE, found '{arg}'"))?;
    let value = value.trim()
                     .parse::<f64>()
                     .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose {
        "debug"
    } else if args.show {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();

    let texts = match &args.file {
        Some(path) => match fs::read_to_string(path) {
            Ok(contents) => contents.lines()
                                    .map(str::trim)
                                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                                    .map(str::to_string)
                                    .collect(),
            Err(e) => {
                eprintln!("Failed to read the input file '{}': {e}", path.display());
                return ExitCode::FAILURE;
            },
        },
        None => args.expressions.clone(),
    };

    let table = Arc::new(args.defines.iter().cloned().collect::<ParameterTable>());
    let mut failed = false;

    let mut exprs = Vec::with_capacity(texts.len());
    for (i, text) in texts.iter().enumerate() {
        let mut expr = Expression::with_text(format!("expr{}", i + 1), table.clone(), text.as_str());
        match expr.generate() {
            Ok(()) => exprs.push(expr),
            Err(e) => {
                eprintln!("{expr}: {e}");
                failed = true;
            },
        }
    }

    let order = match evaluation_order(&exprs) {
        Ok(order) => order,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    for i in order {
        let expr = &mut exprs[i];
        if args.show {
            expr.show(TokenView::Postfix);
        }

        if !expr.validate() {
            println!("{expr} -> unresolved: {}", expr.unresolved_vars().join(", "));
            failed = true;
            continue;
        }

        let is_boolean = expr.is_boolean().unwrap_or(false);
        match expr.update_value() {
            Ok(value) if is_boolean => println!("{expr} = {} ({value})", value != 0.0),
            Ok(value) => println!("{expr} = {value}"),
            Err(e) => {
                eprintln!("{expr}: {e}");
                failed = true;
                continue;
            },
        }

        if let Some(value) = expr.last_value() {
            table.set(expr.name(), value);
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
