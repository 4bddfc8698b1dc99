//! # Evaluator
//!
//! Recursive walker over the AST. Runtime failures are threaded through the
//! return channel as [`Value::Error`] and short-circuit whatever they pass
//! through; `return` produces a [`Value::Return`] marker that blocks hand
//! upward untouched and only function calls and the program root unwrap.
//!
//! The interpreter owns the pointer heap. Before each node is evaluated the
//! heap is given a chance to collect, with the current environment chain as
//! the root set.

mod builtins;
mod env;
mod heap;
mod value;

pub use builtins::Builtin;
pub use env::{Env, Environment};
pub use heap::Heap;
pub use value::{Function, HashKey, HashKeyKind, HashPair, Value};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::expression::{
    CallExpression, Expression, HashLiteral, IfExpression, InfixOperator, PrefixExpression,
    PrefixOperator,
};
use crate::ast::statement::{
    AssignmentStatement, BlockStatement, LetStatement, Statement, WhileStatement,
};
use crate::ast::Program;

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Boolean(value) => *value,
        _ => true,
    }
}

fn is_control(value: &Value) -> bool {
    matches!(value, Value::Return(_) | Value::Error(_))
}

pub struct Interpreter {
    heap: Heap,
}

impl Interpreter {
    pub fn new() -> Self {
        Self { heap: Heap::new() }
    }

    pub fn with_gc_threshold(threshold: usize) -> Self {
        Self {
            heap: Heap::with_threshold(threshold),
        }
    }

    /// Number of live heap cells. Exposed for hosts and tests that observe
    /// collection behavior.
    pub fn heap_size(&self) -> usize {
        self.heap.len()
    }

    /// Evaluate a program against `env`. A `return` at the top level ends
    /// the program with the returned value; otherwise the value of the last
    /// statement is the program's value.
    ///
    /// The end of a run is a collection safe point: transients allocated by
    /// discarded expressions do not outlive the program, while anything
    /// reachable from `env` survives into the next run.
    pub fn run(&mut self, program: &Program, env: &Env) -> Value {
        let result = self.eval_program(program, env);
        self.heap.collect(env);
        result
    }

    fn eval_program(&mut self, program: &Program, env: &Env) -> Value {
        let mut result = Value::Null;
        for stmt in &program.statements {
            let value = self.eval_statement(stmt, env);
            match value {
                Value::Return(inner) => return *inner,
                Value::Error(_) => return value,
                _ => result = value,
            }
        }
        result
    }

    fn maybe_collect(&mut self, env: &Env) {
        if self.heap.needs_collection() {
            self.heap.collect(env);
        }
    }

    fn eval_statement(&mut self, stmt: &Statement, env: &Env) -> Value {
        self.maybe_collect(env);
        match stmt {
            Statement::Let(stmt) => self.eval_let(stmt, env),
            Statement::Return(stmt) => {
                let value = self.eval_expression(&stmt.value, env);
                if value.is_error() {
                    return value;
                }
                Value::Return(Box::new(value))
            }
            Statement::While(stmt) => self.eval_while(stmt, env),
            Statement::Assignment(stmt) => self.eval_assignment(stmt, env),
            Statement::Expression(stmt) => self.eval_expression(&stmt.expression, env),
        }
    }

    fn eval_let(&mut self, stmt: &LetStatement, env: &Env) -> Value {
        let value = self.eval_expression(&stmt.value, env);
        if value.is_error() {
            return value;
        }
        if env.borrow().get_local(&stmt.name.value).is_some() {
            return Value::Error(format!(
                "Variable already initialized: {}",
                stmt.name.value
            ));
        }
        env.borrow_mut().set(stmt.name.value.clone(), value);
        Value::Null
    }

    /// Blocks that are not function bodies run in a fresh scope enclosed by
    /// the current one; function bodies run directly in the call frame the
    /// caller prepared. Return markers and errors pass through unwrapped.
    fn eval_block(&mut self, block: &BlockStatement, env: &Env) -> Value {
        let scope = if block.is_function_body {
            env.clone()
        } else {
            Environment::new_enclosed(env.clone())
        };

        let mut result = Value::Null;
        for stmt in &block.statements {
            let value = self.eval_statement(stmt, &scope);
            if is_control(&value) {
                return value;
            }
            result = value;
        }
        result
    }

    fn eval_while(&mut self, stmt: &WhileStatement, env: &Env) -> Value {
        loop {
            let condition = self.eval_expression(&stmt.condition, env);
            if condition.is_error() {
                return condition;
            }
            if !is_truthy(&condition) {
                return Value::Null;
            }
            // eval_block gives the body a fresh scope on every iteration, so
            // a `let` inside the body does not collide with the previous
            // round while assignments still reach outer names.
            let outcome = self.eval_block(&stmt.body, env);
            if is_control(&outcome) {
                return outcome;
            }
        }
    }

    fn eval_assignment(&mut self, stmt: &AssignmentStatement, env: &Env) -> Value {
        let value = self.eval_expression(&stmt.value, env);
        if value.is_error() {
            return value;
        }

        match &stmt.target {
            Expression::Identifier(ident) => {
                if env.borrow_mut().assign(&ident.value, value) {
                    Value::Null
                } else {
                    Value::Error(format!("Variable not initialized: {}", ident.value))
                }
            }
            Expression::Prefix(prefix) if prefix.operator == PrefixOperator::Deref => {
                let pointer = self.eval_expression(&prefix.right, env);
                if pointer.is_error() {
                    return pointer;
                }
                match pointer {
                    Value::Pointer(address) => {
                        self.heap.store(address, value);
                        Value::Null
                    }
                    other => Value::Error(format!(
                        "cannot assign through non-pointer type: {}",
                        other.type_name()
                    )),
                }
            }
            Expression::Index(index) => {
                let receiver = self.eval_expression(&index.left, env);
                if receiver.is_error() {
                    return receiver;
                }
                let key = self.eval_expression(&index.index, env);
                if key.is_error() {
                    return key;
                }
                match receiver {
                    Value::Array(elements) => match key {
                        Value::Integer(i) => {
                            let mut elements = elements.borrow_mut();
                            if i < 0 || i as usize >= elements.len() {
                                return Value::Error(format!("array index out of bounds: {i}"));
                            }
                            elements[i as usize] = value;
                            Value::Null
                        }
                        other => Value::Error(format!(
                            "array index is not an integer: {}",
                            other.type_name()
                        )),
                    },
                    other => Value::Error(format!(
                        "index assignment not supported for {}",
                        other.type_name()
                    )),
                }
            }
            target => Value::Error(format!("invalid assignment target: {target}")),
        }
    }

    fn eval_expression(&mut self, expr: &Expression, env: &Env) -> Value {
        self.maybe_collect(env);
        match expr {
            Expression::Identifier(ident) => self.eval_identifier(&ident.value, env),
            Expression::Integer(int) => Value::Integer(int.value),
            Expression::String(s) => Value::Str(s.value.clone()),
            Expression::Boolean(b) => Value::Boolean(b.value),
            Expression::Prefix(prefix) => self.eval_prefix(prefix, env),
            Expression::Infix(infix) => {
                let left = self.eval_expression(&infix.left, env);
                if left.is_error() {
                    return left;
                }
                let right = self.eval_expression(&infix.right, env);
                if right.is_error() {
                    return right;
                }
                eval_infix(infix.operator, left, right)
            }
            Expression::If(iff) => self.eval_if(iff, env),
            Expression::FuncLiteral(fnc) => Value::Function(Rc::new(Function {
                parameters: fnc.parameters.iter().map(|p| p.value.clone()).collect(),
                body: fnc.body.clone(),
                env: env.clone(),
            })),
            Expression::Call(call) => self.eval_call(call, env),
            Expression::Array(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    let value = self.eval_expression(element, env);
                    if value.is_error() {
                        return value;
                    }
                    elements.push(value);
                }
                Value::Array(Rc::new(RefCell::new(elements)))
            }
            Expression::Index(index) => {
                let receiver = self.eval_expression(&index.left, env);
                if receiver.is_error() {
                    return receiver;
                }
                let key = self.eval_expression(&index.index, env);
                if key.is_error() {
                    return key;
                }
                eval_index(receiver, key)
            }
            Expression::Hash(hash) => self.eval_hash_literal(hash, env),
        }
    }

    fn eval_identifier(&self, name: &str, env: &Env) -> Value {
        if let Some(value) = env.borrow().get(name) {
            return value;
        }
        if let Some(builtin) = Builtin::lookup(name) {
            return Value::Builtin(builtin);
        }
        Value::Error(format!("identifier not found: {name}"))
    }

    fn eval_prefix(&mut self, prefix: &PrefixExpression, env: &Env) -> Value {
        let right = self.eval_expression(&prefix.right, env);
        if right.is_error() {
            return right;
        }
        match prefix.operator {
            PrefixOperator::Bang => match right {
                Value::Boolean(value) => Value::Boolean(!value),
                Value::Null => Value::Boolean(true),
                _ => Value::Boolean(false),
            },
            PrefixOperator::Minus => match right {
                Value::Integer(value) => Value::Integer(-value),
                other => Value::Error(format!("unknown operator: -{}", other.type_name())),
            },
            PrefixOperator::Ref => Value::Pointer(self.heap.alloc(right)),
            PrefixOperator::Deref => match right {
                Value::Pointer(address) => match self.heap.load(address) {
                    Some(value) => value,
                    None => Value::Error(format!("dangling pointer: {address}")),
                },
                other => Value::Error(format!("unknown operator: *{}", other.type_name())),
            },
        }
    }

    fn eval_if(&mut self, iff: &IfExpression, env: &Env) -> Value {
        let condition = self.eval_expression(&iff.condition, env);
        if condition.is_error() {
            return condition;
        }
        if is_truthy(&condition) {
            self.eval_block(&iff.consequence, env)
        } else if let Some(alternative) = &iff.alternative {
            self.eval_block(alternative, env)
        } else {
            Value::Null
        }
    }

    fn eval_call(&mut self, call: &CallExpression, env: &Env) -> Value {
        let function = self.eval_expression(&call.function, env);
        if function.is_error() {
            return function;
        }
        let mut args = Vec::with_capacity(call.arguments.len());
        for arg in &call.arguments {
            let value = self.eval_expression(arg, env);
            if value.is_error() {
                return value;
            }
            args.push(value);
        }
        self.apply_function(function, args)
    }

    fn apply_function(&mut self, function: Value, args: Vec<Value>) -> Value {
        match function {
            Value::Function(function) => {
                if args.len() != function.parameters.len() {
                    return Value::Error(format!(
                        "wrong number of arguments: want={}, got={}",
                        function.parameters.len(),
                        args.len()
                    ));
                }
                let frame = Environment::new_enclosed(function.env.clone());
                for (name, value) in function.parameters.iter().zip(args) {
                    frame.borrow_mut().set(name.clone(), value);
                }
                match self.eval_block(&function.body, &frame) {
                    Value::Return(inner) => *inner,
                    other => other,
                }
            }
            Value::Builtin(builtin) => builtin.apply(&args),
            other => Value::Error(format!("not a Function {}", other.type_name())),
        }
    }

    fn eval_hash_literal(&mut self, hash: &HashLiteral, env: &Env) -> Value {
        let mut pairs = HashMap::new();
        for (key_expr, value_expr) in &hash.pairs {
            let key = self.eval_expression(key_expr, env);
            if key.is_error() {
                return key;
            }
            let Some(hash_key) = key.hash_key() else {
                return Value::Error(format!(
                    "{} can not be used as HashKey",
                    key.type_name()
                ));
            };
            let value = self.eval_expression(value_expr, env);
            if value.is_error() {
                return value;
            }
            pairs.insert(hash_key, HashPair { key, value });
        }
        Value::Hash(Rc::new(RefCell::new(pairs)))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn eval_index(receiver: Value, key: Value) -> Value {
    match (&receiver, &key) {
        (Value::Array(elements), Value::Integer(i)) => {
            let elements = elements.borrow();
            if *i < 0 || *i as usize >= elements.len() {
                // Reads are forgiving; only index assignment range-checks.
                Value::Null
            } else {
                elements[*i as usize].clone()
            }
        }
        (Value::Hash(pairs), _) => match key.hash_key() {
            Some(hash_key) => pairs
                .borrow()
                .get(&hash_key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Value::Null),
            None => Value::Error(format!("{} can not be used as HashKey", key.type_name())),
        },
        _ => Value::Error(format!(
            "Index Operator not supported for {}",
            receiver.type_name()
        )),
    }
}

fn eval_infix(operator: InfixOperator, left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => {
            eval_integer_infix(operator, left, right)
        }
        (Value::Str(left), Value::Str(right)) => match operator {
            InfixOperator::Plus => Value::Str(left + &right),
            _ => Value::Error(format!("unknown operator: STRING {operator} STRING")),
        },
        (left, right) => {
            if left.type_name() != right.type_name() {
                return Value::Error(format!(
                    "type mismatch: {} {} {}",
                    left.type_name(),
                    operator,
                    right.type_name()
                ));
            }
            match operator {
                InfixOperator::Eq => Value::Boolean(identical(&left, &right)),
                InfixOperator::NotEq => Value::Boolean(!identical(&left, &right)),
                _ => Value::Error(format!(
                    "unknown operator: {} {} {}",
                    left.type_name(),
                    operator,
                    right.type_name()
                )),
            }
        }
    }
}

/// Identity comparison for `==`/`!=` on non-integer, non-string operands.
/// Booleans and null are singletons, so identity and value equality
/// coincide; reference types compare by handle, pointers by address.
fn identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(left), Value::Boolean(right)) => left == right,
        (Value::Null, Value::Null) => true,
        (Value::Pointer(left), Value::Pointer(right)) => left == right,
        (Value::Array(left), Value::Array(right)) => Rc::ptr_eq(left, right),
        (Value::Hash(left), Value::Hash(right)) => Rc::ptr_eq(left, right),
        (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
        (Value::Builtin(left), Value::Builtin(right)) => left == right,
        _ => false,
    }
}

fn eval_integer_infix(operator: InfixOperator, left: i64, right: i64) -> Value {
    match operator {
        InfixOperator::Plus => Value::Integer(left + right),
        InfixOperator::Minus => Value::Integer(left - right),
        InfixOperator::Asterisk => Value::Integer(left * right),
        InfixOperator::Slash => {
            if right != 0 {
                Value::Integer(left / right)
            } else {
                // Divisor before dividend.
                Value::Error(format!("zero division: {right} / {left}"))
            }
        }
        InfixOperator::Lt => Value::Boolean(left < right),
        InfixOperator::Gt => Value::Boolean(left > right),
        InfixOperator::Eq => Value::Boolean(left == right),
        InfixOperator::NotEq => Value::Boolean(left != right),
    }
}
