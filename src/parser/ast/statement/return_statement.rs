use std::fmt::Display;

use crate::lexer::Span;

use super::super::Expression;
use super::Statement;

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
    pub position: Span,
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {};", self.value)
    }
}

impl From<ReturnStatement> for Statement {
    fn from(value: ReturnStatement) -> Self {
        Statement::Return(value)
    }
}
