pub mod expression;
pub mod statement;

pub use expression::*;
pub use statement::*;

use std::fmt::Display;

/// Root of every parse: the list of top level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self
            .statements
            .iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<_>>();

        f.write_str(&statements.join("\n"))
    }
}
