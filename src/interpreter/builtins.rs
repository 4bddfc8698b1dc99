use std::cell::RefCell;
use std::rc::Rc;

use super::value::Value;

/// Built-in function identifiers. The table is consulted when an identifier
/// misses in the environment chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    Head,
    Last,
    Tail,
    Push,
}

fn wrong_arity(name: &str, need: usize, got: usize) -> Value {
    // The stray backtick is deliberate; tests compare this text verbatim.
    Value::Error(format!(
        "invalid number of arguments for `{name} need={need} got={got}"
    ))
}

fn wrong_argument(name: &str, got: &Value) -> Value {
    Value::Error(format!(
        "invalid argument for `{name}` expected ARRAY got {}",
        got.type_name()
    ))
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "len" => Some(Builtin::Len),
            "head" => Some(Builtin::Head),
            "last" => Some(Builtin::Last),
            "tail" => Some(Builtin::Tail),
            "push" => Some(Builtin::Push),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Head => "head",
            Builtin::Last => "last",
            Builtin::Tail => "tail",
            Builtin::Push => "push",
        }
    }

    pub fn apply(&self, args: &[Value]) -> Value {
        match self {
            Builtin::Len => {
                if args.len() != 1 {
                    return wrong_arity("len", 1, args.len());
                }
                match &args[0] {
                    Value::Str(value) => Value::Integer(value.len() as i64),
                    Value::Array(elements) => Value::Integer(elements.borrow().len() as i64),
                    other => Value::Error(format!(
                        "invalid argument for `len` got {}",
                        other.type_name()
                    )),
                }
            }
            Builtin::Head => {
                if args.len() != 1 {
                    return wrong_arity("head", 1, args.len());
                }
                match &args[0] {
                    Value::Array(elements) => {
                        elements.borrow().first().cloned().unwrap_or(Value::Null)
                    }
                    other => wrong_argument("head", other),
                }
            }
            Builtin::Last => {
                if args.len() != 1 {
                    return wrong_arity("last", 1, args.len());
                }
                match &args[0] {
                    Value::Array(elements) => {
                        elements.borrow().last().cloned().unwrap_or(Value::Null)
                    }
                    other => wrong_argument("last", other),
                }
            }
            Builtin::Tail => {
                if args.len() != 1 {
                    return wrong_arity("tail", 1, args.len());
                }
                match &args[0] {
                    Value::Array(elements) => {
                        let elements = elements.borrow();
                        if elements.is_empty() {
                            Value::Null
                        } else {
                            Value::Array(Rc::new(RefCell::new(elements[1..].to_vec())))
                        }
                    }
                    other => wrong_argument("tail", other),
                }
            }
            Builtin::Push => {
                if args.len() != 2 {
                    return wrong_arity("push", 2, args.len());
                }
                match &args[0] {
                    Value::Array(elements) => {
                        let mut appended = elements.borrow().clone();
                        appended.push(args[1].clone());
                        Value::Array(Rc::new(RefCell::new(appended)))
                    }
                    other => wrong_argument("push", other),
                }
            }
        }
    }
}
