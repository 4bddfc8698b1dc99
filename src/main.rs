use std::fs;
use std::process;

use anyhow::{Context, Result};

use amper::interpreter::{Environment, Interpreter, Value};
use amper::lexer::Token;
use amper::parser::Parser;
use amper::repl;

fn main() -> Result<()> {
    match std::env::args().nth(1) {
        Some(path) => run_file(&path),
        None => repl::start(),
    }
}

fn run_file(path: &str) -> Result<()> {
    let source = fs::read_to_string(path).with_context(|| format!("could not read {path}"))?;

    let tokens = Token::lex(&source)?;
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        for error in parser.errors() {
            eprintln!("{error}");
        }
        process::exit(1);
    }

    let mut interpreter = Interpreter::new();
    let env = Environment::new();
    match interpreter.run(&program, &env) {
        Value::Error(message) => {
            eprintln!("ERROR: {message}");
            process::exit(1);
        }
        value => println!("{value}"),
    }

    Ok(())
}
