use std::fmt::Display;

use crate::lexer::Span;

use super::super::statement::Block;
use super::{Expression, Id};

/// An anonymous function literal: `fn(x, y) { x + y }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub parameters: Vec<Id>,
    pub body: Block,
    pub position: Span,
}

impl Display for Lambda {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|parameter| parameter.to_string())
            .collect::<Vec<_>>();

        write!(f, "fn({}) {}", parameters.join(", "), self.body)
    }
}

impl From<Lambda> for Expression {
    fn from(value: Lambda) -> Self {
        Expression::Lambda(value)
    }
}
