use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::value::{Builtin, Value};
use super::Evaluator;

/// The built-in function table. Read-only after initialization; the
/// evaluator consults it after an environment lookup misses.
static BUILTINS: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    let mut m = HashMap::new();

    for builtin in [
        Builtin {
            name: "len",
            function: len,
        },
        Builtin {
            name: "first",
            function: first,
        },
        Builtin {
            name: "last",
            function: last,
        },
        Builtin {
            name: "rest",
            function: rest,
        },
        Builtin {
            name: "push",
            function: push,
        },
        Builtin {
            name: "puts",
            function: puts,
        },
        Builtin {
            name: "gets",
            function: gets,
        },
        Builtin {
            name: "type",
            function: type_of,
        },
        Builtin {
            name: "int",
            function: int,
        },
        Builtin {
            name: "str",
            function: str_of,
        },
        Builtin {
            name: "sumarr",
            function: sumarr,
        },
        Builtin {
            name: "zip",
            function: zip,
        },
        Builtin {
            name: "exit",
            function: exit,
        },
        Builtin {
            name: "help",
            function: help,
        },
    ] {
        m.insert(builtin.name, builtin);
    }

    m
});

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name).copied()
}

fn wrong_arity(expected: usize, got: usize) -> Value {
    Value::Error(format!(
        "wrong number of arguments: expected={expected}, got={got}"
    ))
}

fn unsupported(name: &str, value: &Value) -> Value {
    Value::Error(format!(
        "argument to `{name}` not supported, got {}",
        value.type_name()
    ))
}

/// `len(x)`: length of a string (in bytes), array or hash.
fn len(_evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }

    match &args[0] {
        Value::Str(value) => Value::Integer(value.len() as i64),
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        Value::Hash(pairs) => Value::Integer(pairs.len() as i64),
        other => unsupported("len", other),
    }
}

/// `first(a)`: head of an array, `null` when empty.
fn first(_evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }

    match &args[0] {
        Value::Array(elements) => elements.first().cloned().unwrap_or(Value::Null),
        other => unsupported("first", other),
    }
}

/// `last(a)`: last element of an array, `null` when empty.
fn last(_evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }

    match &args[0] {
        Value::Array(elements) => elements.last().cloned().unwrap_or(Value::Null),
        other => unsupported("last", other),
    }
}

/// `rest(a)`: a new array holding everything but the head, `null` when
/// empty.
fn rest(_evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }

    match &args[0] {
        Value::Array(elements) => {
            if elements.is_empty() {
                Value::Null
            } else {
                Value::Array(elements[1..].to_vec())
            }
        }
        other => unsupported("rest", other),
    }
}

/// `push(a, x)`: a new array with `x` appended; the original stays
/// untouched.
fn push(_evaluator: &mut Evaluator, mut args: Vec<Value>) -> Value {
    if args.len() != 2 {
        return wrong_arity(2, args.len());
    }

    let Some(value) = args.pop() else {
        unreachable!()
    };
    let Some(array) = args.pop() else {
        unreachable!()
    };

    match array {
        Value::Array(mut elements) => {
            elements.push(value);
            Value::Array(elements)
        }
        other => unsupported("push", &other),
    }
}

/// `puts(...)`: the display form of each argument on its own line.
fn puts(evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    for arg in &args {
        evaluator.write_line(&arg.to_string());
    }

    Value::Null
}

/// `gets()`: one line from the input, without the trailing newline;
/// `null` once the input is exhausted.
fn gets(evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if !args.is_empty() {
        return wrong_arity(0, args.len());
    }

    match evaluator.read_line() {
        Some(line) => Value::Str(line),
        None => Value::Null,
    }
}

/// `type(x)`: the type name as a string.
fn type_of(_evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }

    Value::Str(args[0].type_name().to_string())
}

/// `int(x)`: integer conversion. Floats truncate toward zero, strings are
/// parsed as decimal.
fn int(_evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }

    match &args[0] {
        Value::Integer(value) => Value::Integer(*value),
        Value::Float(value) => Value::Integer(value.trunc() as i64),
        Value::Str(value) => match value.trim().parse::<i64>() {
            Ok(parsed) => Value::Integer(parsed),
            Err(_) => Value::Error(format!("could not parse `{value}` as integer")),
        },
        other => unsupported("int", other),
    }
}

/// `str(x)`: the canonical display form of any value.
fn str_of(_evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }

    Value::Str(args[0].to_string())
}

/// `sumarr(a)`: sum of an array of numbers. The sum is an integer until a
/// float shows up; the empty array sums to `0`.
fn sumarr(_evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_arity(1, args.len());
    }

    let Value::Array(elements) = &args[0] else {
        return unsupported("sumarr", &args[0]);
    };

    let mut int_sum: i64 = 0;
    let mut float_sum: f64 = 0.0;
    let mut saw_float = false;

    for element in elements {
        match element {
            Value::Integer(value) => int_sum = int_sum.wrapping_add(*value),
            Value::Float(value) => {
                saw_float = true;
                float_sum += value;
            }
            other => return unsupported("sumarr", other),
        }
    }

    if saw_float {
        Value::Float(float_sum + int_sum as f64)
    } else {
        Value::Integer(int_sum)
    }
}

/// `zip(a, b)`: array of `[x, y]` pairs, truncated to the shorter input.
fn zip(_evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if args.len() != 2 {
        return wrong_arity(2, args.len());
    }

    let Value::Array(left) = &args[0] else {
        return unsupported("zip", &args[0]);
    };
    let Value::Array(right) = &args[1] else {
        return unsupported("zip", &args[1]);
    };

    let pairs = left
        .iter()
        .zip(right.iter())
        .map(|(x, y)| Value::Array(vec![x.clone(), y.clone()]))
        .collect();

    Value::Array(pairs)
}

/// `exit(code?)`: asks the host to terminate with `code` (default 0).
/// Observable only as a host side effect; evaluation unwinds afterwards.
fn exit(evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    let code = match args.as_slice() {
        [] => 0,
        [Value::Integer(code)] => *code as i32,
        [other] => return unsupported("exit", other),
        _ => return wrong_arity(1, args.len()),
    };

    evaluator.exit_status = Some(code);

    Value::Null
}

/// `help()`: a short overview of the built-in library.
fn help(evaluator: &mut Evaluator, args: Vec<Value>) -> Value {
    if !args.is_empty() {
        return wrong_arity(0, args.len());
    }

    evaluator.write_line("built-in functions:");
    evaluator.write_line("  len(x)       length of a string, array or hash");
    evaluator.write_line("  first(a)     head of an array");
    evaluator.write_line("  last(a)      last element of an array");
    evaluator.write_line("  rest(a)      all but the head of an array");
    evaluator.write_line("  push(a, x)   copy of a with x appended");
    evaluator.write_line("  puts(...)    print each argument on its own line");
    evaluator.write_line("  gets()       read one line from the input");
    evaluator.write_line("  type(x)      the type name of x");
    evaluator.write_line("  int(x)       convert to an integer");
    evaluator.write_line("  str(x)       convert to a string");
    evaluator.write_line("  sumarr(a)    sum of an array of numbers");
    evaluator.write_line("  zip(a, b)    pair up two arrays");
    evaluator.write_line("  exit(code?)  leave the interpreter");
    evaluator.write_line("  help()       this text");

    Value::Null
}
