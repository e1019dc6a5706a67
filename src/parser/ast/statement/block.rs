use std::fmt::Display;

use crate::lexer::Span;

use super::Statement;

/// A braced list of statements, as found in function bodies, `if` arms and
/// `while` loops. Blocks are not expressions on their own; braces in
/// expression position belong to hash literals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub position: Span,
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{}");
        }

        let statements = self
            .statements
            .iter()
            .map(|statement| statement.to_string())
            .collect::<Vec<_>>();

        write!(f, "{{ {} }}", statements.join(" "))
    }
}
