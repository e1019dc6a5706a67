//! # Macaque
//!
//! This binary is the interpreter front end. With a source file it runs
//! the file in a fresh environment; without one it starts the REPL.

mod cli;

use cli::*;

use std::{error::Error, fs, path::PathBuf};

use colored::Colorize;
use log::info;
use macaque_lang::{evaluator::Evaluator, fresh_env, parser, repl::Repl};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    match args.file {
        Some(file) => run_file(file, args.dump_ast),
        None => {
            let mut repl = Repl::new()?;
            std::process::exit(repl.run());
        }
    }
}

fn run_file(file: PathBuf, dump_ast: bool) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(&file)?;

    let program = match parser::parse(&source) {
        Ok(program) => program,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", format!("parser error: {error}").red());
            }
            std::process::exit(-1);
        }
    };

    if dump_ast {
        info!("Parsed AST:\n{program:#?}");
    }

    let env = fresh_env();
    let mut evaluator = Evaluator::new();
    let result = evaluator.eval_program(&program, &env);

    if let Some(code) = evaluator.exit_status {
        std::process::exit(code);
    }

    if result.is_error() {
        eprintln!("{}", result.to_string().red());
        std::process::exit(-1);
    }

    println!("{result}");

    Ok(())
}
