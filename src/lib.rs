pub mod ast;
pub mod parser;
pub mod scanner;
pub mod tokens;

pub mod environment;
pub mod errors;
pub mod function;
pub mod interpreter;
pub mod stack;
pub mod value;

use ast::Stmt;
use errors::StaticError;
use parser::Parser;
use scanner::scan_tokens;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Scan and parse a program. Scan errors come first, then syntax errors, each in source order.
/// The statements are only safe to run when no errors came back.
pub fn parse_input(input: &str) -> (Vec<Stmt>, Vec<StaticError>) {
    let (tokens, scan_errors) = scan_tokens(input);
    let (stmts, parse_errors) = Parser::new(&tokens).parse();

    let errors = scan_errors
        .into_iter()
        .map(StaticError::from)
        .chain(parse_errors.into_iter().map(StaticError::from))
        .collect();

    (stmts, errors)
}

/// Install a stderr log subscriber filtered by `RUST_LOG`. Does nothing when it is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
