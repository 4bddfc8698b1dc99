//! The addressable heap backing the `&` and `*` operators, reclaimed by a
//! mark-and-sweep collector.
//!
//! Only values created with `&expr` (or overwritten through `*p = v`) live
//! here; ordinary bindings stay in their environments. At collection time the
//! live environment chain is the root set: everything reachable from it,
//! through bindings, array elements, hash pairs, pointers, and captured
//! closure environments, is marked, and every unmarked cell is dropped.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::env::{Env, Environment};
use super::value::Value;

#[derive(Debug)]
struct HeapCell {
    value: Value,
    marked: bool,
}

#[derive(Debug)]
pub struct Heap {
    cells: HashMap<u64, HeapCell>,
    next_address: u64,
    threshold: usize,
}

impl Heap {
    /// Collection threshold used when none is configured: a sweep runs about
    /// once per ten live cells.
    pub const DEFAULT_THRESHOLD: usize = 10;

    pub fn new() -> Self {
        Self::with_threshold(Self::DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            cells: HashMap::new(),
            next_address: 0,
            threshold,
        }
    }

    /// Store a value in a fresh cell and return its address. Addresses are
    /// monotonically assigned and never reused.
    pub fn alloc(&mut self, value: Value) -> u64 {
        let address = self.next_address;
        self.next_address += 1;
        self.cells.insert(
            address,
            HeapCell {
                value,
                marked: false,
            },
        );
        address
    }

    /// Read the value at `address`, if the cell exists.
    pub fn load(&self, address: u64) -> Option<Value> {
        self.cells.get(&address).map(|cell| cell.value.clone())
    }

    /// Overwrite the cell at `address`, re-creating it unmarked.
    pub fn store(&mut self, address: u64, value: Value) {
        self.cells.insert(
            address,
            HeapCell {
                value,
                marked: false,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn needs_collection(&self) -> bool {
        self.cells.len() >= self.threshold
    }

    /// Run a full mark-and-sweep with `root` as the root set.
    ///
    /// Runs synchronously; callers never observe a half-swept heap. Any
    /// pointer reachable from `root` still refers to a live cell afterwards.
    pub fn collect(&mut self, root: &Env) {
        let mut visited = HashSet::new();
        self.mark_environment(root, &mut visited);

        self.cells.retain(|_, cell| cell.marked);
        for cell in self.cells.values_mut() {
            cell.marked = false;
        }
    }

    fn mark_environment(&mut self, env: &Env, visited: &mut HashSet<*const RefCell<Environment>>) {
        // Closure cycles (a function bound in the environment it captured)
        // would otherwise loop forever.
        if !visited.insert(Rc::as_ptr(env)) {
            return;
        }
        let env_ref = env.borrow();
        for value in env_ref.bindings() {
            self.mark_value(value, visited);
        }
        if let Some(outer) = env_ref.outer() {
            self.mark_environment(outer, visited);
        }
    }

    fn mark_value(&mut self, value: &Value, visited: &mut HashSet<*const RefCell<Environment>>) {
        match value {
            Value::Pointer(address) => {
                let inner = match self.cells.get_mut(address) {
                    Some(cell) if !cell.marked => {
                        cell.marked = true;
                        cell.value.clone()
                    }
                    _ => return,
                };
                self.mark_value(&inner, visited);
            }
            Value::Array(elements) => {
                for element in elements.borrow().iter() {
                    self.mark_value(element, visited);
                }
            }
            Value::Hash(pairs) => {
                for pair in pairs.borrow().values() {
                    self.mark_value(&pair.key, visited);
                    self.mark_value(&pair.value, visited);
                }
            }
            Value::Function(function) => {
                self.mark_environment(&function.env, visited);
            }
            Value::Return(inner) => {
                self.mark_value(inner, visited);
            }
            _ => {}
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
