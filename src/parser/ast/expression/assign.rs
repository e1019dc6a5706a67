use std::fmt::Display;

use crate::lexer::Span;

use super::{Expression, Id};

/// Reassignment of an existing binding: `x = 42`. This is distinct from
/// `let`/`const`, which define a new binding in the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: Id,
    pub value: Box<Expression>,
    pub position: Span,
}

impl Display for Assign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

impl From<Assign> for Expression {
    fn from(value: Assign) -> Self {
        Expression::Assign(value)
    }
}
