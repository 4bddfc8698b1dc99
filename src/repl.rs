//! Interactive read-eval-print loop.
//!
//! The environment, heap, and interpreter persist across lines, so bindings
//! and pointers created on one line are live on the next. Line history is
//! kept in a dot-file in the user's home directory.

use std::path::PathBuf;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::interpreter::{Env, Environment, Interpreter};
use crate::lexer::Token;
use crate::parser::Parser;

const PROMPT: &str = ">> ";
const HISTORY_FILE: &str = ".amper_history";

pub fn start() -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let history_path = history_path();
    // Missing on first run; nothing to report.
    let _ = editor.load_history(&history_path);

    let mut interpreter = Interpreter::new();
    let env = Environment::new();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                run_line(&line, &mut interpreter, &env);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    editor.save_history(&history_path)?;
    Ok(())
}

fn run_line(line: &str, interpreter: &mut Interpreter, env: &Env) {
    let tokens = match Token::lex(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        eprintln!("parser errors:");
        for error in parser.errors() {
            eprintln!("\t{error}");
        }
        return;
    }

    let value = interpreter.run(&program, env);
    println!("{value}");
}

fn history_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(HISTORY_FILE)
}
