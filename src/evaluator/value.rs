use std::fmt::Display;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::parser::ast::{format_float, Block, Id};

use super::environment::Env;
use super::Evaluator;

pub type BuiltinFn = fn(&mut Evaluator, Vec<Value>) -> Value;

/// A named host function. Builtins resolve by name after an environment
/// lookup misses, so user bindings may shadow them.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub function: BuiltinFn,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A user function value: the literal's parameters and body plus the
/// environment captured at its point of definition.
#[derive(Clone)]
pub struct Function {
    pub parameters: Vec<Id>,
    pub body: Block,
    pub env: Env,
}

/// The captured environment may point back at this function (recursive
/// bindings), so `Debug` leaves it out.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Str(String),
    Null,
    Array(Vec<Value>),
    /// Entries map the normalized key to the original `(key, value)` pair,
    /// in insertion order, so display can reproduce the source keys.
    Hash(IndexMap<HashKey, (Value, Value)>),
    Function(Rc<Function>),
    Builtin(Builtin),
    /// Transient wrapper carrying a `return` upwards; never stored in a
    /// container or environment.
    Return(Box<Value>),
    /// Transient runtime error; any surrounding evaluation short-circuits.
    Error(String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(left), Value::Integer(right)) => left == right,
            (Value::Float(left), Value::Float(right)) => left == right,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Str(left), Value::Str(right)) => left == right,
            (Value::Null, Value::Null) => true,
            (Value::Array(left), Value::Array(right)) => left == right,
            (Value::Hash(left), Value::Hash(right)) => left == right,
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            (Value::Builtin(left), Value::Builtin(right)) => left == right,
            (Value::Return(left), Value::Return(right)) => left == right,
            (Value::Error(left), Value::Error(right)) => left == right,
            _ => false,
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Boolean(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Return(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
        }
    }

    /// Only `null` and `false` are falsy; `0`, `0.0` and empty containers
    /// all count as truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

/// Normalized representation of a hashable value. Equality is structural:
/// floats key by bit pattern, and an integer never collides with a float.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    Str(String),
    Float(u64),
}

impl HashKey {
    /// `None` when the value is not a hashable variant.
    pub fn from_value(value: &Value) -> Option<HashKey> {
        match value {
            Value::Integer(value) => Some(HashKey::Integer(*value)),
            Value::Float(value) => Some(HashKey::Float(value.to_bits())),
            Value::Boolean(value) => Some(HashKey::Boolean(*value)),
            Value::Str(value) => Some(HashKey::Str(value.clone())),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Float(value) => f.write_str(&format_float(*value)),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Str(value) => f.write_str(value),
            Value::Null => f.write_str("null"),
            Value::Array(elements) => {
                let elements = elements
                    .iter()
                    .map(|element| element.to_string())
                    .collect::<Vec<_>>();
                write!(f, "[{}]", elements.join(", "))
            }
            Value::Hash(pairs) => {
                let pairs = pairs
                    .values()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Value::Function(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|parameter| parameter.to_string())
                    .collect::<Vec<_>>();
                write!(f, "fn({}) {}", parameters.join(", "), function.body)
            }
            Value::Builtin(builtin) => write!(f, "builtin function {}", builtin.name),
            Value::Return(value) => value.fmt(f),
            Value::Error(message) => write!(f, "ERROR: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(13.37).to_string(), "13.37");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(
            Value::Array(vec![Value::Integer(1), Value::Str("a".into())]).to_string(),
            "[1, a]"
        );
        assert_eq!(
            Value::Error("boom".into()).to_string(),
            "ERROR: boom"
        );
    }

    #[test]
    fn test_hash_display_keeps_insertion_order() {
        let mut pairs = IndexMap::new();
        pairs.insert(
            HashKey::Str("b".into()),
            (Value::Str("b".into()), Value::Integer(2)),
        );
        pairs.insert(
            HashKey::Str("a".into()),
            (Value::Str("a".into()), Value::Integer(1)),
        );

        assert_eq!(Value::Hash(pairs).to_string(), "{b: 2, a: 1}");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::Float(0.0).is_truthy());
        assert!(Value::Str(String::new()).is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
    }

    #[test]
    fn test_hash_keys_are_structural() {
        assert_eq!(
            HashKey::from_value(&Value::Str("a".into())),
            HashKey::from_value(&Value::Str("a".into()))
        );
        assert_ne!(
            HashKey::from_value(&Value::Integer(1)),
            HashKey::from_value(&Value::Float(1.0))
        );
        assert_eq!(HashKey::from_value(&Value::Null), None);
        assert_eq!(HashKey::from_value(&Value::Array(vec![])), None);
    }
}
