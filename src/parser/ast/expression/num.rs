use std::fmt::Display;

use crate::lexer::Span;

use super::Expression;

#[derive(Debug, Clone, PartialEq)]
pub enum Num {
    Integer(i64, Span),
    FloatingPoint(f64, Span),
}

impl Num {
    pub fn position(&self) -> Span {
        match self {
            Num::Integer(_, position) => *position,
            Num::FloatingPoint(_, position) => *position,
        }
    }
}

/// The canonical text of a float: shortest decimal that round-trips, with
/// at least one fractional digit.
pub fn format_float(value: f64) -> String {
    let repr = format!("{value}");

    if value.is_finite() && !repr.contains('.') && !repr.contains('e') {
        return format!("{value:.1}");
    }

    repr
}

impl Display for Num {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Num::Integer(value, _) => write!(f, "{value}"),
            Num::FloatingPoint(value, _) => f.write_str(&format_float(*value)),
        }
    }
}

impl From<Num> for Expression {
    fn from(value: Num) -> Self {
        Expression::Num(value)
    }
}
