pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;

use evaluator::environment::{Env, Environment};
use evaluator::value::Value;
use evaluator::Evaluator;
use parser::ParseError;

/// A new root environment. Builtins are not bound here; the evaluator
/// resolves them by fallback, so user bindings may shadow them.
pub fn fresh_env() -> Env {
    Environment::new()
}

/// Run a complete source text against `env`: lex, parse, and (when no
/// parse error was recorded) evaluate. Runtime errors are not `Err`s; they
/// come back as ordinary `Value::Error` results.
pub fn run_program(
    source: &str,
    env: &Env,
    evaluator: &mut Evaluator,
) -> Result<Value, Vec<ParseError>> {
    let program = parser::parse(source)?;

    Ok(evaluator.eval_program(&program, env))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_program_in_a_fresh_env() {
        let env = fresh_env();
        let mut evaluator =
            Evaluator::with_io(Box::new(std::io::empty()), Box::new(std::io::sink()));

        let result = run_program("let x = 2; x * 21", &env, &mut evaluator);

        assert_eq!(result, Ok(Value::Integer(42)));
    }

    #[test]
    fn test_environment_persists_between_runs() {
        let env = fresh_env();
        let mut evaluator =
            Evaluator::with_io(Box::new(std::io::empty()), Box::new(std::io::sink()));

        run_program("let greeting = \"hello\";", &env, &mut evaluator)
            .expect("definition should run");
        let result = run_program("greeting + \" again\"", &env, &mut evaluator);

        assert_eq!(result, Ok(Value::Str("hello again".into())));
    }

    #[test]
    fn test_parse_errors_are_surfaced() {
        let env = fresh_env();
        let mut evaluator =
            Evaluator::with_io(Box::new(std::io::empty()), Box::new(std::io::sink()));

        let errors = run_program("let = 5;", &env, &mut evaluator)
            .expect_err("should report parse errors");

        assert!(!errors.is_empty());
    }
}
