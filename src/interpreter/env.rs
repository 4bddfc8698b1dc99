use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::value::Value;

/// Shared handle to an environment. Closures hold one of these, so a scope
/// stays alive as long as any function defined inside it does.
pub type Env = Rc<RefCell<Environment>>;

/// A lexical scope: a local binding map plus a link to the enclosing scope.
///
/// Name resolution walks the chain outward; writes through [`Environment::assign`]
/// land in the nearest scope that already binds the name.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Env>,
}

impl Environment {
    /// A fresh global scope.
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// A scope nested inside `outer`.
    pub fn new_enclosed(outer: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    /// Resolve a name, searching this scope and then the outer chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Resolve a name in this scope only.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.store.get(name).cloned()
    }

    /// Bind a name in this scope, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.store.insert(name.into(), value);
    }

    /// Overwrite the nearest existing binding for `name`, walking outward.
    /// Returns `false` if no scope in the chain binds it.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.store.get_mut(name) {
            *slot = value;
            true
        } else if let Some(outer) = &self.outer {
            outer.borrow_mut().assign(name, value)
        } else {
            false
        }
    }

    pub fn outer(&self) -> Option<&Env> {
        self.outer.as_ref()
    }

    /// All values bound in this scope (not the outer chain). The garbage
    /// collector traces from these.
    pub fn bindings(&self) -> impl Iterator<Item = &Value> {
        self.store.values()
    }
}
