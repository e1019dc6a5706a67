use macaque_lang::{
    evaluator::{value::Value, Evaluator},
    fresh_env, run_program,
};

/// End-to-end scenarios through the public entry points: one source text,
/// one fresh environment, no host I/O.
fn run(source: &str) -> Value {
    let env = fresh_env();
    let mut evaluator = Evaluator::with_io(Box::new(std::io::empty()), Box::new(std::io::sink()));

    run_program(source, &env, &mut evaluator).expect("program should parse")
}

#[test]
fn closures_capture_their_defining_environment() {
    let source = "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3)";
    assert_eq!(run(source), Value::Integer(5));
}

#[test]
fn bindings_are_mutable_unless_const() {
    assert_eq!(run("let x = 1; x = 2; x"), Value::Integer(2));
    assert_eq!(
        run("const y = 1; y = 2"),
        Value::Error("cannot reassign to const: y".into())
    );
}

#[test]
fn recursion_reaches_the_binding_through_the_closure() {
    let source = "let fact = fn(n) { if (n < 2) { 1 } else { n * fact(n - 1) } }; fact(5)";
    assert_eq!(run(source), Value::Integer(120));
}

#[test]
fn while_loops_accumulate() {
    let source = "let i = 0; let s = 0; while (i < 5) { s = s + i; i = i + 1 }; s";
    assert_eq!(run(source), Value::Integer(10));
}

#[test]
fn hash_keys_are_looked_up_structurally() {
    assert_eq!(
        run("{ \"a\": 1, true: 2, 3: 4 }[true]"),
        Value::Integer(2)
    );
    assert_eq!(run("{}[\"missing\"]"), Value::Null);
}

#[test]
fn mixed_arithmetic_promotes_to_float() {
    assert_eq!(run("1 + 2.0"), Value::Float(3.0));
    assert_eq!(run("7 % 3"), Value::Integer(1));
    assert_eq!(run("1 / 0"), Value::Error("division by zero".into()));
}

#[test]
fn string_operators() {
    assert_eq!(run("\"foo\" + \"bar\""), Value::Str("foobar".into()));
    assert_eq!(run("\"a\" == \"a\""), Value::Boolean(true));
    assert_eq!(
        run("\"a\" - \"b\""),
        Value::Error("unknown operator: STRING - STRING".into())
    );
}

#[test]
fn nested_returns_exit_the_function_not_the_block() {
    let source = "if (10 > 1) { if (10 > 1) { return 10; } return 1; }";
    assert_eq!(run(source), Value::Integer(10));
}

#[test]
fn out_of_range_indexing_yields_null() {
    assert_eq!(run("[1, 2, 3][5]"), Value::Null);
}

#[test]
fn builtins_are_available_without_bindings() {
    assert_eq!(run("len(\"hello\")"), Value::Integer(5));
    assert_eq!(run("first([1, 2, 3])"), Value::Integer(1));
    assert_eq!(
        run("let a = [1, 2]; let b = push(a, 3); [len(a), len(b)]"),
        Value::Array(vec![Value::Integer(2), Value::Integer(3)])
    );
}

#[test]
fn pure_programs_are_deterministic() {
    let source = "let xs = zip([1, 2, 3], [\"a\", \"b\"]); str(xs)";

    assert_eq!(run(source), run(source));
}
