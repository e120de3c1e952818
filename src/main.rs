use rdlox::ast::Expr;
use rdlox::errors::StaticError;
use rdlox::interpreter::Interpreter;
use rdlox::parser::Parser;
use rdlox::scanner::scan_tokens;
use rdlox::{init_tracing, parse_input};

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use tracing::debug;

// Exit statuses, following sysexits.h.
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_NOINPUT: u8 = 66;
const EX_SOFTWARE: u8 = 70;
const EX_IOERR: u8 = 74;

#[derive(Clone, Copy, Debug)]
enum Command {
    Tokenize,
    Parse,
    Evaluate,
    Run,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "tokenize" => Some(Self::Tokenize),
            "parse" => Some(Self::Parse),
            "evaluate" => Some(Self::Evaluate),
            "run" => Some(Self::Run),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    // Run REPL if no file is provided.
    if args.len() == 1 {
        return repl();
    }

    let (command, path) = match args.as_slice() {
        [_, command, path] => match Command::from_arg(command) {
            Some(command) => (command, path),
            None => return usage(),
        },

        // A bare path is run.
        [_, path] if Command::from_arg(path).is_none() => (Command::Run, path),

        _ => return usage(),
    };

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Could not read file '{}': {}", path, e);
            return ExitCode::from(EX_NOINPUT);
        }
    };

    debug!(?command, path = %path, "starting");

    match command {
        Command::Tokenize => tokenize(&source),
        Command::Parse => parse(&source),
        Command::Evaluate => evaluate(&source),
        Command::Run => run(&source),
    }
}

fn usage() -> ExitCode {
    eprintln!("Usage: rdlox [tokenize|parse|evaluate|run] <file>");
    eprintln!("       rdlox            start a REPL");
    ExitCode::from(EX_USAGE)
}

fn report_static(errors: &[StaticError]) {
    for error in errors {
        eprintln!("{}", error);
    }
}

/// Print every token, then the end marker.
fn tokenize(source: &str) -> ExitCode {
    let (tokens, errors) = scan_tokens(source);

    for error in &errors {
        eprintln!("{}", error);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for token in &tokens {
        let _ = writeln!(out, "{}", token);
    }

    if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EX_DATAERR)
    }
}

/// Scan and parse a single expression, reporting any errors found on the way.
fn parse_expression(source: &str) -> Option<Expr> {
    let (tokens, scan_errors) = scan_tokens(source);
    let (expr, parse_errors) = Parser::new(&tokens).parse_expression();

    let errors: Vec<StaticError> = scan_errors
        .into_iter()
        .map(StaticError::from)
        .chain(parse_errors.into_iter().map(StaticError::from))
        .collect();

    if !errors.is_empty() {
        report_static(&errors);
        return None;
    }

    expr
}

fn parse(source: &str) -> ExitCode {
    match parse_expression(source) {
        Some(expr) => {
            println!("{}", expr);
            ExitCode::SUCCESS
        }
        None => ExitCode::from(EX_DATAERR),
    }
}

fn evaluate(source: &str) -> ExitCode {
    let Some(expr) = parse_expression(source) else {
        return ExitCode::from(EX_DATAERR);
    };

    let mut stdout = io::stdout();
    let mut interpreter = Interpreter::new(&mut stdout);

    match interpreter.evaluate(&expr) {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.report());
            ExitCode::from(EX_SOFTWARE)
        }
    }
}

fn run(source: &str) -> ExitCode {
    let (stmts, errors) = parse_input(source);

    // If there were any parsing errors, print them and exit.
    if !errors.is_empty() {
        report_static(&errors);
        return ExitCode::from(EX_DATAERR);
    }

    // Execute code if it parsed correctly.
    let mut stdout = io::stdout();
    let mut interpreter = Interpreter::new(&mut stdout);

    match interpreter.interpret(&stmts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.report());
            ExitCode::from(EX_SOFTWARE)
        }
    }
}

fn repl() -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut input = String::new();
    let mut interpreter = Interpreter::new(&mut stdout);

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        input.clear();
        match stdin.read_line(&mut input) {
            // End of input.
            Ok(0) => return ExitCode::SUCCESS,
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::from(EX_IOERR);
            }
        }

        // Provide alternative to CTRL+C for exiting REPL.
        if input.trim() == "exit()" {
            return ExitCode::SUCCESS;
        }

        // Parse input. Print errors if they occur. Execute code if there are none.
        let (stmts, errors) = parse_input(&input);

        if !errors.is_empty() {
            report_static(&errors);
            continue;
        }

        if let Err(e) = interpreter.interpret(&stmts) {
            eprintln!("{}", e.report());
        }
    }
}
