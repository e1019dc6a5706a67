pub mod builtins;
pub mod environment;
pub mod value;

use std::io::{BufRead, Write};

use indexmap::IndexMap;
use std::rc::Rc;

use crate::parser::ast::{
    Assign, Binary, BinaryOperator, Block, Expression, HashLiteral, Id, If, Lambda, LetStatement,
    Num, Postfix, Prefix, PrefixOperator, Program, ReturnStatement, Statement, WhileLoop,
};

use self::environment::{Env, Environment, ReassignError};
use self::value::{Function, HashKey, Value};

/// Walks the AST and produces values. Owns the interpreter's input/output
/// pair (used by `gets`, `puts` and `help`) and the exit request raised by
/// the `exit` builtin.
pub struct Evaluator {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    /// Set by `exit(code)`. Evaluation unwinds once this is set; the host
    /// decides what to do with the code.
    pub exit_status: Option<i32>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// An evaluator talking to the process's stdin and stdout.
    pub fn new() -> Self {
        Self::with_io(
            Box::new(std::io::stdin().lock()),
            Box::new(std::io::stdout()),
        )
    }

    pub fn with_io(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self {
            input,
            output,
            exit_status: None,
        }
    }

    pub(crate) fn write_line(&mut self, text: &str) {
        let _ = writeln!(self.output, "{text}");
        let _ = self.output.flush();
    }

    pub(crate) fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();

        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
        }
    }

    /// Evaluates a program: statements in order, stopping at the first
    /// `return` (unwrapped here) or error, or when `exit` was called.
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> Value {
        let mut result = Value::Null;

        for statement in &program.statements {
            if self.exit_status.is_some() {
                break;
            }

            match self.eval_statement(statement, env) {
                Value::Return(value) => return *value,
                error @ Value::Error(_) => return error,
                value => result = value,
            }
        }

        result
    }

    fn eval_statement(&mut self, statement: &Statement, env: &Env) -> Value {
        match statement {
            Statement::Let(statement) => self.eval_let_statement(statement, env),
            Statement::Return(statement) => self.eval_return_statement(statement, env),
            Statement::WhileLoop(statement) => self.eval_while_loop(statement, env),
            Statement::Expression(expression) => self.eval_expression(expression, env),
        }
    }

    /// Blocks do not open a new scope; only function calls do. `return`
    /// and errors pass through still wrapped so the enclosing function or
    /// program can react.
    fn eval_block(&mut self, block: &Block, env: &Env) -> Value {
        let mut result = Value::Null;

        for statement in &block.statements {
            if self.exit_status.is_some() {
                return Value::Null;
            }

            let value = self.eval_statement(statement, env);
            if matches!(value, Value::Return(_) | Value::Error(_)) {
                return value;
            }
            result = value;
        }

        result
    }

    fn eval_let_statement(&mut self, statement: &LetStatement, env: &Env) -> Value {
        let value = self.eval_expression(&statement.value, env);
        if value.is_error() {
            return value;
        }

        env.borrow_mut()
            .define(&statement.name.name, value, statement.mutable);

        Value::Null
    }

    fn eval_return_statement(&mut self, statement: &ReturnStatement, env: &Env) -> Value {
        let value = self.eval_expression(&statement.value, env);
        if value.is_error() {
            return value;
        }

        Value::Return(Box::new(value))
    }

    fn eval_while_loop(&mut self, statement: &WhileLoop, env: &Env) -> Value {
        loop {
            if self.exit_status.is_some() {
                return Value::Null;
            }

            let condition = self.eval_expression(&statement.condition, env);
            if condition.is_error() {
                return condition;
            }
            if !condition.is_truthy() {
                return Value::Null;
            }

            let result = self.eval_block(&statement.block, env);
            if matches!(result, Value::Return(_) | Value::Error(_)) {
                return result;
            }
        }
    }

    fn eval_expression(&mut self, expression: &Expression, env: &Env) -> Value {
        match expression {
            Expression::Id(id) => self.eval_identifier(id, env),
            Expression::Num(Num::Integer(value, _)) => Value::Integer(*value),
            Expression::Num(Num::FloatingPoint(value, _)) => Value::Float(*value),
            Expression::Bool(value) => Value::Boolean(value.value),
            Expression::Str(value) => Value::Str(value.value.clone()),
            Expression::Prefix(prefix) => self.eval_prefix(prefix, env),
            Expression::Binary(binary) => self.eval_binary(binary, env),
            Expression::If(if_expression) => self.eval_if(if_expression, env),
            Expression::Lambda(lambda) => self.eval_lambda(lambda, env),
            Expression::Postfix(Postfix::Call { expr, args, .. }) => {
                self.eval_call(expr, args, env)
            }
            Expression::Postfix(Postfix::Index { expr, index, .. }) => {
                let left = self.eval_expression(expr, env);
                if left.is_error() {
                    return left;
                }

                let index = self.eval_expression(index, env);
                if index.is_error() {
                    return index;
                }

                Self::eval_index(left, index)
            }
            Expression::Array(array) => match self.eval_expressions(&array.elements, env) {
                Ok(elements) => Value::Array(elements),
                Err(error) => error,
            },
            Expression::Hash(hash) => self.eval_hash_literal(hash, env),
            Expression::Assign(assign) => self.eval_assign(assign, env),
        }
    }

    fn eval_identifier(&self, id: &Id, env: &Env) -> Value {
        if let Some(value) = env.borrow().get(&id.name) {
            return value;
        }

        if let Some(builtin) = builtins::lookup(&id.name) {
            return Value::Builtin(builtin);
        }

        Value::Error(format!("identifier not found: {}", id.name))
    }

    fn eval_prefix(&mut self, prefix: &Prefix, env: &Env) -> Value {
        let right = self.eval_expression(&prefix.right, env);
        if right.is_error() {
            return right;
        }

        match prefix.op {
            PrefixOperator::Negation => Value::Boolean(!right.is_truthy()),
            PrefixOperator::Minus => match right {
                Value::Integer(value) => Value::Integer(value.wrapping_neg()),
                Value::Float(value) => Value::Float(-value),
                other => Value::Error(format!("unknown operator: -{}", other.type_name())),
            },
        }
    }

    fn eval_binary(&mut self, binary: &Binary, env: &Env) -> Value {
        let left = self.eval_expression(&binary.left, env);
        if left.is_error() {
            return left;
        }

        let right = self.eval_expression(&binary.right, env);
        if right.is_error() {
            return right;
        }

        Self::eval_infix(binary.op, left, right)
    }

    /// Infix resolution order: integer pairs stay integral, any integer
    /// next to a float promotes, strings and booleans have their own small
    /// operator sets, everything else is a type error.
    fn eval_infix(op: BinaryOperator, left: Value, right: Value) -> Value {
        match (left, right) {
            (Value::Integer(left), Value::Integer(right)) => {
                Self::eval_integer_infix(op, left, right)
            }
            (Value::Integer(left), Value::Float(right)) => {
                Self::eval_float_infix(op, left as f64, right)
            }
            (Value::Float(left), Value::Integer(right)) => {
                Self::eval_float_infix(op, left, right as f64)
            }
            (Value::Float(left), Value::Float(right)) => Self::eval_float_infix(op, left, right),
            (Value::Str(left), Value::Str(right)) => Self::eval_string_infix(op, left, right),
            (Value::Boolean(left), Value::Boolean(right)) => match op {
                BinaryOperator::Equal => Value::Boolean(left == right),
                BinaryOperator::NotEqual => Value::Boolean(left != right),
                op => Value::Error(format!("unknown operator: BOOLEAN {op} BOOLEAN")),
            },
            (left, right) => {
                if left.type_name() != right.type_name() {
                    Value::Error(format!(
                        "type mismatch: {} {op} {}",
                        left.type_name(),
                        right.type_name()
                    ))
                } else {
                    Value::Error(format!(
                        "unknown operator: {} {op} {}",
                        left.type_name(),
                        right.type_name()
                    ))
                }
            }
        }
    }

    fn eval_integer_infix(op: BinaryOperator, left: i64, right: i64) -> Value {
        match op {
            BinaryOperator::Add => Value::Integer(left.wrapping_add(right)),
            BinaryOperator::Substract => Value::Integer(left.wrapping_sub(right)),
            BinaryOperator::Multiply => Value::Integer(left.wrapping_mul(right)),
            BinaryOperator::Divide => {
                if right == 0 {
                    Value::Error("division by zero".into())
                } else {
                    Value::Integer(left.wrapping_div(right))
                }
            }
            BinaryOperator::Modulo => {
                if right == 0 {
                    Value::Error("division by zero".into())
                } else {
                    Value::Integer(left.wrapping_rem(right))
                }
            }
            BinaryOperator::LessThan => Value::Boolean(left < right),
            BinaryOperator::GreaterThan => Value::Boolean(left > right),
            BinaryOperator::Equal => Value::Boolean(left == right),
            BinaryOperator::NotEqual => Value::Boolean(left != right),
        }
    }

    fn eval_float_infix(op: BinaryOperator, left: f64, right: f64) -> Value {
        match op {
            BinaryOperator::Add => Value::Float(left + right),
            BinaryOperator::Substract => Value::Float(left - right),
            BinaryOperator::Multiply => Value::Float(left * right),
            BinaryOperator::Divide => {
                if right == 0.0 {
                    Value::Error("division by zero".into())
                } else {
                    Value::Float(left / right)
                }
            }
            BinaryOperator::Modulo => {
                if right == 0.0 {
                    Value::Error("division by zero".into())
                } else {
                    Value::Float(left % right)
                }
            }
            BinaryOperator::LessThan => Value::Boolean(left < right),
            BinaryOperator::GreaterThan => Value::Boolean(left > right),
            BinaryOperator::Equal => Value::Boolean(left == right),
            BinaryOperator::NotEqual => Value::Boolean(left != right),
        }
    }

    fn eval_string_infix(op: BinaryOperator, left: String, right: String) -> Value {
        match op {
            BinaryOperator::Add => Value::Str(left + &right),
            BinaryOperator::Equal => Value::Boolean(left == right),
            BinaryOperator::NotEqual => Value::Boolean(left != right),
            op => Value::Error(format!("unknown operator: STRING {op} STRING")),
        }
    }

    fn eval_if(&mut self, if_expression: &If, env: &Env) -> Value {
        let condition = self.eval_expression(&if_expression.condition, env);
        if condition.is_error() {
            return condition;
        }

        if condition.is_truthy() {
            self.eval_block(&if_expression.consequence, env)
        } else if let Some(alternative) = &if_expression.alternative {
            self.eval_block(alternative, env)
        } else {
            Value::Null
        }
    }

    /// A function literal captures the environment it was defined in.
    fn eval_lambda(&self, lambda: &Lambda, env: &Env) -> Value {
        Value::Function(Rc::new(Function {
            parameters: lambda.parameters.clone(),
            body: lambda.body.clone(),
            env: Rc::clone(env),
        }))
    }

    fn eval_call(&mut self, function: &Expression, args: &[Expression], env: &Env) -> Value {
        let function = self.eval_expression(function, env);
        if function.is_error() {
            return function;
        }

        let args = match self.eval_expressions(args, env) {
            Ok(args) => args,
            Err(error) => return error,
        };

        self.apply_function(function, args)
    }

    fn apply_function(&mut self, function: Value, args: Vec<Value>) -> Value {
        match function {
            Value::Function(function) => {
                if function.parameters.len() != args.len() {
                    return Value::Error(format!(
                        "wrong number of arguments: expected={}, got={}",
                        function.parameters.len(),
                        args.len()
                    ));
                }

                // the call frame extends the captured environment, not the
                // caller's
                let env = Environment::new_enclosed(&function.env);
                for (parameter, arg) in function.parameters.iter().zip(args) {
                    env.borrow_mut().define(&parameter.name, arg, true);
                }

                match self.eval_block(&function.body, &env) {
                    Value::Return(value) => *value,
                    value => value,
                }
            }
            Value::Builtin(builtin) => (builtin.function)(self, args),
            other => Value::Error(format!("not a function: {}", other.type_name())),
        }
    }

    /// Left-to-right with error short-circuit; used for call arguments and
    /// array literals.
    fn eval_expressions(
        &mut self,
        expressions: &[Expression],
        env: &Env,
    ) -> Result<Vec<Value>, Value> {
        let mut values = vec![];

        for expression in expressions {
            let value = self.eval_expression(expression, env);
            if value.is_error() {
                return Err(value);
            }
            values.push(value);
        }

        Ok(values)
    }

    fn eval_index(left: Value, index: Value) -> Value {
        match (left, index) {
            (Value::Array(elements), Value::Integer(index)) => {
                if index < 0 || index as usize >= elements.len() {
                    Value::Null
                } else {
                    elements[index as usize].clone()
                }
            }
            (Value::Hash(pairs), index) => match HashKey::from_value(&index) {
                Some(key) => pairs
                    .get(&key)
                    .map(|(_, value)| value.clone())
                    .unwrap_or(Value::Null),
                None => Value::Error(format!("unusable as hash key: {}", index.type_name())),
            },
            (left, _) => Value::Error(format!(
                "index operator not supported: {}",
                left.type_name()
            )),
        }
    }

    fn eval_hash_literal(&mut self, hash: &HashLiteral, env: &Env) -> Value {
        let mut pairs = IndexMap::new();

        for (key_expression, value_expression) in &hash.pairs {
            let key = self.eval_expression(key_expression, env);
            if key.is_error() {
                return key;
            }

            let Some(hash_key) = HashKey::from_value(&key) else {
                return Value::Error(format!("unusable as hash key: {}", key.type_name()));
            };

            let value = self.eval_expression(value_expression, env);
            if value.is_error() {
                return value;
            }

            pairs.insert(hash_key, (key, value));
        }

        Value::Hash(pairs)
    }

    fn eval_assign(&mut self, assign: &Assign, env: &Env) -> Value {
        let value = self.eval_expression(&assign.value, env);
        if value.is_error() {
            return value;
        }

        let result = env.borrow_mut().reassign(&assign.name.name, value.clone());

        match result {
            Ok(()) => value,
            Err(ReassignError::NotFound) => {
                Value::Error(format!("identifier not found: {}", assign.name.name))
            }
            Err(ReassignError::Immutable) => {
                Value::Error(format!("cannot reassign to const: {}", assign.name.name))
            }
        }
    }
}
