use std::fmt::Display;

use crate::lexer::Span;

use super::Expression;

/// The two postfix forms: calls and index accesses. Both bind tighter than
/// any binary operator and chain left to right (`m["f"](1)[0]`).
#[derive(Debug, Clone, PartialEq)]
pub enum Postfix {
    Call {
        expr: Box<Expression>,
        args: Vec<Expression>,
        position: Span,
    },
    Index {
        expr: Box<Expression>,
        index: Box<Expression>,
        position: Span,
    },
}

impl Postfix {
    pub fn position(&self) -> Span {
        match self {
            Postfix::Call { position, .. } => *position,
            Postfix::Index { position, .. } => *position,
        }
    }
}

impl Display for Postfix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Postfix::Call { expr, args, .. } => {
                let args = args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>();
                write!(f, "{expr}({})", args.join(", "))
            }
            Postfix::Index { expr, index, .. } => write!(f, "({expr}[{index}])"),
        }
    }
}

impl From<Postfix> for Expression {
    fn from(value: Postfix) -> Self {
        Expression::Postfix(value)
    }
}
