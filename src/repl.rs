//! The interactive front end: a thin collaborator that feeds lines into
//! `run_program` against one persistent environment.

use colored::Colorize;
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::evaluator::Evaluator;
use crate::{fresh_env, run_program};

const PROMPT: &str = ">> ";

pub struct Repl {
    editor: DefaultEditor,
}

impl Repl {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    /// Read, evaluate, print, loop. Returns the exit code to terminate
    /// with, either from `exit(code)` or 0 once the input closes.
    pub fn run(&mut self) -> i32 {
        let env = fresh_env();
        let mut evaluator = Evaluator::new();

        loop {
            let line = match self.editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(_) => return 0,
            };

            if line.trim().is_empty() {
                continue;
            }
            let _ = self.editor.add_history_entry(&line);

            match run_program(&line, &env, &mut evaluator) {
                Ok(value) => {
                    if let Some(code) = evaluator.exit_status {
                        return code;
                    }

                    if value.is_error() {
                        println!("{}", value.to_string().red());
                    } else {
                        println!("{value}");
                    }
                }
                Err(errors) => {
                    for error in errors {
                        println!("{}", format!("parser error: {error}").red());
                    }
                }
            }
        }
    }
}
